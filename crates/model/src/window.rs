//! Rolling window length.

use std::{fmt, str::FromStr};

use ppe_primitives::Period;
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Length of the rolling window, either explicit or via a period code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Window {
    /// Number of observations.
    Observations(usize),
    /// Trading days in one period, e.g. 21 for [`Period::Monthly`].
    Period(Period),
}

impl Window {
    /// Resolve to a number of observations.
    ///
    /// Returns `None` for a period without a trading-day length ([`Period::Daily`]).
    #[must_use]
    pub const fn resolve(self) -> Option<usize> {
        match self {
            Self::Observations(n) => Some(n),
            Self::Period(p) => p.trading_days(),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::Period(Period::Monthly)
    }
}

impl From<usize> for Window {
    fn from(n: usize) -> Self {
        Self::Observations(n)
    }
}

impl From<Period> for Window {
    fn from(p: Period) -> Self {
        Self::Period(p)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observations(n) => write!(f, "{n}"),
            Self::Period(p) => write!(f, "{p}"),
        }
    }
}

impl FromStr for Window {
    type Err = ModelError;

    /// Parse an observation count or a period code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.parse::<usize>() {
            return Ok(Self::Observations(n));
        }
        s.parse::<Period>()
            .map(Self::Period)
            .map_err(|e| ModelError::InvalidInput(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Window::Observations(36), Some(36))]
    #[case(Window::Period(Period::Weekly), Some(5))]
    #[case(Window::Period(Period::Monthly), Some(21))]
    #[case(Window::Period(Period::Annual), Some(250))]
    #[case(Window::Period(Period::Daily), None)]
    fn resolve_window(#[case] window: Window, #[case] expected: Option<usize>) {
        assert_eq!(window.resolve(), expected);
    }

    #[rstest]
    #[case("3", Window::Observations(3))]
    #[case("q", Window::Period(Period::Quarterly))]
    #[case("s", Window::Period(Period::SemiAnnual))]
    fn parse_window(#[case] input: &str, #[case] expected: Window) {
        assert_eq!(input.parse::<Window>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn parse_unknown_code() {
        let err = "x".parse::<Window>().unwrap_err();
        assert!(matches!(err, ModelError::InvalidInput(msg) if msg.contains("\"x\"")));
    }

    #[test]
    fn conversions() {
        assert_eq!(Window::from(12), Window::Observations(12));
        assert_eq!(Window::from(Period::Monthly), Window::default());
    }
}
