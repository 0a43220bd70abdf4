#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod fill;
pub use fill::fill_missing;

mod frame;
pub use frame::{numeric_columns, returns_from_frame, styles_from_frame};

mod error;
pub use error::UtilsError;
