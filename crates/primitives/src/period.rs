//! Observation period codes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::PrimitivesError;

/// Sampling frequency of a series, identified by a one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// Daily (`d`).
    #[serde(rename = "d")]
    Daily,
    /// Weekly (`w`).
    #[serde(rename = "w")]
    Weekly,
    /// Monthly (`m`).
    #[serde(rename = "m")]
    Monthly,
    /// Quarterly (`q`).
    #[serde(rename = "q")]
    Quarterly,
    /// Semi-annual (`s`).
    #[serde(rename = "s")]
    SemiAnnual,
    /// Annual (`y`).
    #[serde(rename = "y")]
    Annual,
}

impl Period {
    /// All periods, shortest first.
    pub const ALL: [Self; 6] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Quarterly,
        Self::SemiAnnual,
        Self::Annual,
    ];

    /// The one-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Daily => "d",
            Self::Weekly => "w",
            Self::Monthly => "m",
            Self::Quarterly => "q",
            Self::SemiAnnual => "s",
            Self::Annual => "y",
        }
    }

    /// Approximate number of trading days in one period.
    ///
    /// `Daily` has no entry in the trading-day table and returns `None`.
    #[must_use]
    pub const fn trading_days(self) -> Option<usize> {
        match self {
            Self::Daily => None,
            Self::Weekly => Some(5),
            Self::Monthly => Some(21),
            Self::Quarterly => Some(63),
            Self::SemiAnnual => Some(125),
            Self::Annual => Some(250),
        }
    }

    /// Approximate number of periods in one year, used for annualization.
    #[must_use]
    pub const fn periods_per_year(self) -> u32 {
        match self {
            Self::Daily => 250,
            Self::Weekly => 52,
            Self::Monthly => 12,
            Self::Quarterly => 4,
            Self::SemiAnnual => 2,
            Self::Annual => 1,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Period {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.code() == s)
            .ok_or_else(|| PrimitivesError::UnknownPeriod(s.to_string()))
    }
}
