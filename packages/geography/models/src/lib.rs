#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! US geography reference types.
//!
//! States, counties, and places are what the location pickers list;
//! a [`Location`] is what a statistics query is built from. FIPS codes
//! are stable identifiers, while names are cleaned for display.

pub mod fips;
pub mod location;
pub mod names;

pub use location::{Location, LocationParseError};

use serde::{Deserialize, Serialize};

/// A state (or state equivalent) as listed by the Census API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Display name (two-letter abbreviation when known).
    pub name: String,
    /// Two-digit state FIPS code.
    pub fips: String,
}

/// A county within a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct County {
    /// Display name without the state qualifier (e.g. "Cook County").
    pub name: String,
    /// Three-digit county FIPS code, unique only within its state.
    pub fips: String,
}

/// A Census place (city, town, village, CDP) within a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Display name with the entity-type suffix removed.
    pub name: String,
    /// Five-digit place FIPS code, unique only within its state.
    pub fips: String,
}

/// The five geography levels statistics can be requested at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoLevel {
    /// United States.
    Nation,
    /// State.
    State,
    /// County.
    County,
    /// City / Census place.
    City,
    /// ZIP Code Tabulation Area.
    Zip,
}

impl GeoLevel {
    /// Human-readable label for pickers and table headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nation => "USA",
            Self::State => "State",
            Self::County => "County",
            Self::City => "City",
            Self::Zip => "ZIP Code",
        }
    }
}
