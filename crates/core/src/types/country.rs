//! Countries offered on the checkout form.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a country code is not one the shop ships to.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported country code: {0}")]
pub struct CountryError(pub String);

/// ISO 3166-1 alpha-2 country the order ships to.
///
/// Always has a value (defaults to [`Country::UnitedStates`]), so the checkout
/// form never validates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Country {
    #[default]
    #[serde(rename = "US")]
    UnitedStates,
    #[serde(rename = "CA")]
    Canada,
    #[serde(rename = "GB")]
    UnitedKingdom,
    #[serde(rename = "AU")]
    Australia,
    #[serde(rename = "DE")]
    Germany,
    #[serde(rename = "FR")]
    France,
    #[serde(rename = "JP")]
    Japan,
    #[serde(rename = "IN")]
    India,
}

impl Country {
    /// Every country in the order shown on the checkout form.
    pub const ALL: [Self; 8] = [
        Self::UnitedStates,
        Self::Canada,
        Self::UnitedKingdom,
        Self::Australia,
        Self::Germany,
        Self::France,
        Self::Japan,
        Self::India,
    ];

    /// Two-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnitedStates => "US",
            Self::Canada => "CA",
            Self::UnitedKingdom => "GB",
            Self::Australia => "AU",
            Self::Germany => "DE",
            Self::France => "FR",
            Self::Japan => "JP",
            Self::India => "IN",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UnitedStates => "United States",
            Self::Canada => "Canada",
            Self::UnitedKingdom => "United Kingdom",
            Self::Australia => "Australia",
            Self::Germany => "Germany",
            Self::France => "France",
            Self::Japan => "Japan",
            Self::India => "India",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = CountryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|country| country.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CountryError(s.to_string()))
    }
}
