#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod linalg;
pub use linalg::{LstsqResult, OlsResult, lstsq, ordinary_least_squares};

mod nnls;
pub use nnls::{NnlsConfig, NnlsResult, nnls};

mod simplex;
pub use simplex::{SimplexLsqConfig, SimplexLsqResult, project_simplex, simplex_least_squares};

pub mod stats;

mod error;
pub use error::MathError;
