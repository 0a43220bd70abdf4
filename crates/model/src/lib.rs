#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod attribution;
pub use attribution::{AttributionResult, AttributionRow, WindowFailure};

mod rbsa;
pub use rbsa::{RollingConfig, RollingStyleAttribution};

mod style;
pub use style::{NonNegativeStyleEstimator, SimplexStyleEstimator, SolverConfig};

mod policy;
pub use policy::FailurePolicy;

mod window;
pub use window::Window;

mod regression;
pub use regression::{SingleIndexFit, TimingFit, single_index, treynor_mazuy};

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use ppe_traits::StyleEstimator;

    pub use super::{
        AttributionResult, FailurePolicy, ModelError, RollingConfig, RollingStyleAttribution,
        SimplexStyleEstimator, Window,
    };
}
