//! Census API request descriptors.
//!
//! A [`CensusQuery`] is the `get=` variable list plus the `for=`/`in=`
//! geography clause. The variable list is copied in table order from
//! [`censusly_profile_models::variables`]; no extra variable is ever
//! appended, since the trailing FIPS cell comes from the geography echo
//! columns the API adds on its own.

use censusly_geography_models::Location;
use censusly_profile_models::{Category, variables};

use crate::CensusError;

/// A fully-specified request against one ACS vintage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusQuery {
    /// ACS vintage (path segment of the endpoint URL).
    pub year: u16,
    /// Ordered variable codes for `get=`.
    pub variables: Vec<&'static str>,
    /// Ordered `(key, value)` geography pairs (`for` first, then `in`).
    pub geography: Vec<(&'static str, String)>,
}

impl CensusQuery {
    /// Builds the Data Profile request for `category` at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::InvalidRequest`] if the location is missing
    /// an identifier (empty FIPS, empty owning-state FIPS, empty ZIP).
    pub fn profile(location: &Location, year: u16, category: Category) -> Result<Self, CensusError> {
        Ok(Self {
            year,
            variables: variables::variable_codes(category),
            geography: geography_clause(location)?,
        })
    }

    /// `NAME` lookup for every state.
    #[must_use]
    pub fn state_names(year: u16) -> Self {
        Self {
            year,
            variables: vec!["NAME"],
            geography: vec![("for", "state:*".to_string())],
        }
    }

    /// `NAME` lookup for every county in a state.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::InvalidRequest`] if `state_fips` is empty.
    pub fn county_names(year: u16, state_fips: &str) -> Result<Self, CensusError> {
        Ok(Self {
            year,
            variables: vec!["NAME"],
            geography: vec![
                ("for", "county:*".to_string()),
                ("in", format!("state:{}", require("state FIPS", state_fips)?)),
            ],
        })
    }

    /// `NAME` lookup for every place in a state.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::InvalidRequest`] if `state_fips` is empty.
    pub fn place_names(year: u16, state_fips: &str) -> Result<Self, CensusError> {
        Ok(Self {
            year,
            variables: vec!["NAME"],
            geography: vec![
                ("for", "place:*".to_string()),
                ("in", format!("state:{}", require("state FIPS", state_fips)?)),
            ],
        })
    }

    /// Query-string pairs in request order: `get`, then the geography
    /// clause.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(self.geography.len() + 1);
        params.push(("get", self.variables.join(",")));
        params.extend(self.geography.iter().cloned());
        params
    }

    /// The geography clause as unencoded query text
    /// (e.g. `for=county:037&in=state:06`).
    #[must_use]
    pub fn geography_text(&self) -> String {
        self.geography
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Builds the `for=`/`in=` pairs for a location.
///
/// # Errors
///
/// Returns [`CensusError::InvalidRequest`] if a required identifier is
/// empty.
pub fn geography_clause(location: &Location) -> Result<Vec<(&'static str, String)>, CensusError> {
    Ok(match location {
        Location::Nation => vec![("for", "us:1".to_string())],
        Location::State { fips } => vec![("for", format!("state:{}", require("state FIPS", fips)?))],
        Location::County { fips, state_fips } => vec![
            ("for", format!("county:{}", require("county FIPS", fips)?)),
            ("in", format!("state:{}", require("owning state FIPS", state_fips)?)),
        ],
        Location::City { fips, state_fips } => vec![
            ("for", format!("place:{}", require("place FIPS", fips)?)),
            ("in", format!("state:{}", require("owning state FIPS", state_fips)?)),
        ],
        Location::Zip { code } => vec![(
            "for",
            format!("zip code tabulation area:{}", require("ZIP code", code)?),
        )],
    })
}

fn require<'a>(what: &str, value: &'a str) -> Result<&'a str, CensusError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CensusError::InvalidRequest {
            message: format!("{what} is required"),
        })
    } else {
        Ok(trimmed)
    }
}
