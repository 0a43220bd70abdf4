#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::PrimitivesError;

mod exposure;
pub use exposure::{ExposureVector, SIMPLEX_TOLERANCE};

mod factor;
pub use factor::{FactorName, StyleFactorMatrix};

mod period;
pub use period::Period;

mod series;
pub use series::ReturnSeries;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
