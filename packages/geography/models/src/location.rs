//! Query-time location references.
//!
//! A [`Location`] is built per query from a picker selection and is never
//! persisted. County and city variants carry their owning state's FIPS
//! code because the Census API requires a two-level geography clause for
//! them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GeoLevel;
use crate::fips::resolve_state_fips;

/// A geography that statistics can be requested for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum Location {
    /// The whole United States.
    Nation,
    /// A state (or DC / Puerto Rico).
    State {
        /// Two-digit state FIPS code.
        fips: String,
    },
    /// A county within a state.
    County {
        /// Three-digit county FIPS code (unique only within the state).
        fips: String,
        /// Owning state's two-digit FIPS code.
        state_fips: String,
    },
    /// A Census place (city, town, CDP) within a state.
    City {
        /// Five-digit place FIPS code (unique only within the state).
        fips: String,
        /// Owning state's two-digit FIPS code.
        state_fips: String,
    },
    /// A ZIP Code Tabulation Area.
    Zip {
        /// Five-digit ZCTA code.
        code: String,
    },
}

impl Location {
    /// Returns the geography level of this location.
    #[must_use]
    pub const fn level(&self) -> GeoLevel {
        match self {
            Self::Nation => GeoLevel::Nation,
            Self::State { .. } => GeoLevel::State,
            Self::County { .. } => GeoLevel::County,
            Self::City { .. } => GeoLevel::City,
            Self::Zip { .. } => GeoLevel::Zip,
        }
    }

    /// Returns the state FIPS code this location belongs to, if any.
    #[must_use]
    pub fn state_fips(&self) -> Option<&str> {
        match self {
            Self::State { fips } => Some(fips),
            Self::County { state_fips, .. } | Self::City { state_fips, .. } => Some(state_fips),
            Self::Nation | Self::Zip { .. } => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nation => f.write_str("us"),
            Self::State { fips } => write!(f, "state:{fips}"),
            Self::County { fips, state_fips } => write!(f, "county:{state_fips}:{fips}"),
            Self::City { fips, state_fips } => write!(f, "city:{state_fips}:{fips}"),
            Self::Zip { code } => write!(f, "zip:{code}"),
        }
    }
}

/// Error returned when a location string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location '{input}': {reason}")]
pub struct LocationParseError {
    /// The rejected input.
    pub input: String,
    /// What was wrong with it.
    pub reason: &'static str,
}

impl FromStr for Location {
    type Err = LocationParseError;

    /// Parses `us`, `state:06`, `county:06:037`, `city:06:44000`
    /// (or `place:06:44000`), and `zip:94103`. State segments also accept
    /// a two-letter abbreviation (`county:CA:037`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| LocationParseError {
            input: s.to_string(),
            reason,
        };
        let state = |segment: &str| {
            resolve_state_fips(segment)
                .map(str::to_string)
                .ok_or_else(|| err("unknown state"))
        };

        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [level] if level.eq_ignore_ascii_case("us") => Ok(Self::Nation),
            ["state", st] => Ok(Self::State { fips: state(*st)? }),
            ["county", st, fips] if !fips.is_empty() => Ok(Self::County {
                fips: (*fips).to_string(),
                state_fips: state(*st)?,
            }),
            ["city" | "place", st, fips] if !fips.is_empty() => Ok(Self::City {
                fips: (*fips).to_string(),
                state_fips: state(*st)?,
            }),
            ["zip", code] if !code.is_empty() => Ok(Self::Zip {
                code: (*code).to_string(),
            }),
            _ => Err(err(
                "expected us, state:<st>, county:<st>:<fips>, city:<st>:<fips>, or zip:<code>",
            )),
        }
    }
}
