//! Handling of windows that cannot be fitted.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// What a rolling run does with a window whose fit fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the earliest failing window and return its error.
    Abort,
    /// Drop the window's row from the output and record the failure.
    Skip,
    /// Keep the row with a missing exposure and record the failure.
    #[default]
    Fill,
}

impl FailurePolicy {
    /// Name used in configuration and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Skip => "skip",
            Self::Fill => "fill",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            "fill" => Ok(Self::Fill),
            other => Err(format!("unknown failure policy {other:?} (expected abort, skip or fill)")),
        }
    }
}
