//! # ppe
//!
//! Portfolio performance evaluation in Rust.
//!
//! This crate provides a unified interface to the `ppe` workspace.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Core type definitions
//! - `traits`: Estimator trait abstractions
//! - `math`: Least squares solvers and return statistics
//! - `model`: Rolling returns-based style analysis and regressions
//! - `utils`: DataFrame adapters
//! - `parallel`: Fit rolling windows on the rayon pool
//! - `cli`: The `rbsa` command-line tool
//!
//! ## Example
//!
//! ```rust,ignore
//! use ppe::model::{RollingStyleAttribution, Window};
//! use ppe::primitives::Period;
//!
//! let result = RollingStyleAttribution::new().run(&returns, &styles, Period::Monthly)?;
//! result.print_summary();
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use ppe_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use ppe_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use ppe_math as math;
#[cfg(feature = "model")]
#[doc(inline)]
pub use ppe_model as model;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use ppe_utils as utils;
