#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Census Bureau ACS API access.
//!
//! [`CensusClient`](client::CensusClient) implements both source traits
//! against the public API. The orchestration layer only depends on the
//! traits, so tests substitute in-memory sources.

pub mod catalog;
pub mod client;
pub mod config;
pub mod http;
pub mod query;
pub mod response;

use async_trait::async_trait;
use censusly_geography_models::{County, Location, Place, State};
use censusly_profile_models::{Category, DecodeError, ProfileRecord};
use strum_macros::{AsRefStr, Display};

pub use catalog::GeographyCatalog;
pub use client::CensusClient;
pub use config::CensusConfig;
pub use query::CensusQuery;

/// Errors that can occur while querying the Census API.
#[derive(Debug, thiserror::Error)]
pub enum CensusError {
    /// The location is missing an identifier; no request was sent.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was missing.
        message: String,
    },

    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Request URL.
        url: String,
        /// Truncated response body.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response was JSON but not the expected table shape.
    #[error("Malformed response: {message}")]
    Malformed {
        /// Description of what was wrong.
        message: String,
    },

    /// The query matched nothing.
    #[error("No data found for {url}")]
    NoDataFound {
        /// Request URL.
        url: String,
    },

    /// The data row did not match the category's variable count.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Configuration could not be read or is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Coarse error classes for user-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum ErrorKind {
    /// Incomplete location input, caught before any network call.
    InvalidRequest,
    /// Transport failure, unexpected status, or unreadable body.
    NetworkFailure,
    /// Well-formed response with no matching row.
    NoDataFound,
    /// Row length did not match the requested variables.
    DecodeError,
}

impl CensusError {
    /// Classifies this error.
    ///
    /// Configuration errors surface as [`ErrorKind::InvalidRequest`]
    /// since they are caught before any request is sent.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest { .. } | Self::Config { .. } => ErrorKind::InvalidRequest,
            Self::Http(_) | Self::Status { .. } | Self::Json(_) | Self::Malformed { .. } => {
                ErrorKind::NetworkFailure
            }
            Self::NoDataFound { .. } => ErrorKind::NoDataFound,
            Self::Decode(_) => ErrorKind::DecodeError,
        }
    }
}

/// Fetches one category record for one location and year.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetches and decodes `category` for `location` from the `year`
    /// Data Profile.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError`] if the location is incomplete, the request
    /// fails, nothing matches, or the row does not decode.
    async fn fetch_profile(
        &self,
        location: &Location,
        category: Category,
        year: u16,
    ) -> Result<ProfileRecord, CensusError>;
}

/// Lists states and, per state, counties and places.
#[async_trait]
pub trait GeographySource: Send + Sync {
    /// Every state (with DC and Puerto Rico), names as the API returns them.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError`] if the request or parsing fails.
    async fn fetch_states(&self) -> Result<Vec<State>, CensusError>;

    /// Every county in a state, names cleaned for display.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError`] if the request or parsing fails.
    async fn fetch_counties(&self, state_fips: &str) -> Result<Vec<County>, CensusError>;

    /// Every place in a state, names cleaned for display.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError`] if the request or parsing fails.
    async fn fetch_places(&self, state_fips: &str) -> Result<Vec<Place>, CensusError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let invalid = CensusError::InvalidRequest {
            message: "ZIP code is required".to_string(),
        };
        assert_eq!(invalid.kind(), ErrorKind::InvalidRequest);

        let status = CensusError::Status {
            status: 500,
            url: "https://api.census.gov/data".to_string(),
            body: String::new(),
        };
        assert_eq!(status.kind(), ErrorKind::NetworkFailure);

        let empty = CensusError::NoDataFound {
            url: "https://api.census.gov/data".to_string(),
        };
        assert_eq!(empty.kind(), ErrorKind::NoDataFound);

        let decode = CensusError::from(DecodeError {
            category: Category::Overview,
            expected: 15,
            actual: 14,
        });
        assert_eq!(decode.kind(), ErrorKind::DecodeError);
        assert_eq!(
            decode.to_string(),
            "Decode error: Overview row has 14 cells, expected 15"
        );
    }
}
