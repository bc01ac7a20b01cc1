//! Suggestion records returned by the autocomplete endpoint

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Borough-Block-Lot key identifying one tax lot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Bbl(String);

impl Bbl {
    /// Returns None for blank input
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Bbl(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Bbl {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Bbl::new(value).ok_or_else(|| "empty bbl".to_string())
    }
}

impl fmt::Display for Bbl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown borough: {0}")]
pub struct UnknownBorough(pub String);

/// The five boroughs, in borough-code order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Borough {
    Manhattan,
    Bronx,
    Brooklyn,
    Queens,
    StatenIsland,
}

impl Borough {
    pub const ALL: [Borough; 5] = [
        Borough::Manhattan,
        Borough::Bronx,
        Borough::Brooklyn,
        Borough::Queens,
        Borough::StatenIsland,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Borough::Manhattan => "Manhattan",
            Borough::Bronx => "Bronx",
            Borough::Brooklyn => "Brooklyn",
            Borough::Queens => "Queens",
            Borough::StatenIsland => "Staten Island",
        }
    }

    /// Leading digit of every BBL in this borough
    pub fn code(&self) -> u8 {
        match self {
            Borough::Manhattan => 1,
            Borough::Bronx => 2,
            Borough::Brooklyn => 3,
            Borough::Queens => 4,
            Borough::StatenIsland => 5,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Borough::Manhattan => "MN",
            Borough::Bronx => "BX",
            Borough::Brooklyn => "BK",
            Borough::Queens => "QN",
            Borough::StatenIsland => "SI",
        }
    }
}

impl FromStr for Borough {
    type Err = UnknownBorough;

    /// Accepts the name in any case, the two-letter code, or the digit
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        Borough::ALL
            .into_iter()
            .find(|b| {
                let name = b.name().replace(' ', "").to_ascii_lowercase();
                normalized == name
                    || normalized == b.abbreviation().to_ascii_lowercase()
                    || normalized == b.code().to_string()
            })
            .ok_or_else(|| UnknownBorough(s.to_string()))
    }
}

impl TryFrom<String> for Borough {
    type Error = UnknownBorough;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One candidate building
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "bbl")]
    pub identifier: Bbl,
    #[serde(rename = "address")]
    pub display_address: String,
    pub borough: Borough,
    #[serde(rename = "zipcode", default)]
    pub postal_code: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(rename = "units", default)]
    pub unit_count: Option<u32>,
}

impl Suggestion {
    pub fn new(
        identifier: Bbl,
        display_address: impl Into<String>,
        borough: Borough,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            identifier,
            display_address: display_address.into(),
            borough,
            postal_code: postal_code.into(),
            neighborhood: None,
            unit_count: None,
        }
    }

    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }

    pub fn with_units(mut self, units: u32) -> Self {
        self.unit_count = Some(units);
        self
    }

    /// Secondary line shown under the address
    ///
    /// `"<neighborhood>, <Borough> <zip> • <n> units"`, omitting the
    /// neighborhood when blank and the unit count when unknown or zero.
    pub fn detail_line(&self) -> String {
        let mut line = String::new();
        if let Some(neighborhood) = self.neighborhood.as_deref().filter(|n| !n.trim().is_empty()) {
            line.push_str(neighborhood);
            line.push_str(", ");
        }
        line.push_str(self.borough.name());
        if !self.postal_code.is_empty() {
            line.push(' ');
            line.push_str(&self.postal_code);
        }
        if let Some(units) = self.unit_count.filter(|u| *u > 0) {
            line.push_str(&format!(" • {} units", units));
        }
        line
    }
}

#[cfg(test)]
#[path = "suggestion_tests.rs"]
mod suggestion_tests;
