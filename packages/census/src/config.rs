//! Census API configuration.
//!
//! The default configuration is embedded at compile time from
//! `config/census.toml`. Set `CENSUSLY_CONFIG` to a TOML file path to
//! replace it, and `CENSUSLY_BASE_URL` to point every request at a
//! different host (a local mirror or test server).

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Deserialize;

use crate::CensusError;

const DEFAULT_CONFIG: &str = include_str!("../config/census.toml");

/// Environment variable naming a replacement config file.
pub const CONFIG_PATH_ENV: &str = "CENSUSLY_CONFIG";

/// Environment variable overriding [`CensusConfig::base_url`].
pub const BASE_URL_ENV: &str = "CENSUSLY_BASE_URL";

/// Endpoints and ACS vintages used by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CensusConfig {
    /// API root, without a trailing slash (e.g. `"https://api.census.gov/data"`).
    pub base_url: String,
    /// Dataset path for Data Profile requests.
    pub profile_dataset: String,
    /// Dataset path for NAME/FIPS lookups.
    pub names_dataset: String,
    /// Vintage used for NAME/FIPS lookups.
    pub names_year: u16,
    /// Default year for "latest" requests.
    pub latest_year: u16,
    /// Years offered for historical toggling.
    #[serde(default)]
    pub historical_years: Vec<u16>,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("censusly/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for CensusConfig {
    /// The embedded configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (it is checked by tests).
    fn default() -> Self {
        Self::from_toml(DEFAULT_CONFIG)
            .unwrap_or_else(|e| panic!("Embedded census.toml is invalid: {e}"))
    }
}

impl CensusConfig {
    /// Parses and validates a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::Config`] if the document does not parse or
    /// fails [`Self::validate`].
    pub fn from_toml(source: &str) -> Result<Self, CensusError> {
        let config: Self = toml::de::from_str(source).map_err(|e| CensusError::Config {
            message: format!("Failed to parse census config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from `CENSUSLY_CONFIG` (or the embedded
    /// default), then applies the `CENSUSLY_BASE_URL` override.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::Config`] if the file cannot be read or the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, CensusError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                log::info!("Loading census config from {path}");
                let source = std::fs::read_to_string(&path).map_err(|e| CensusError::Config {
                    message: format!("Failed to read {path}: {e}"),
                })?;
                Self::from_toml(&source)?
            }
            Err(_) => Self::from_toml(DEFAULT_CONFIG)?,
        };

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            log::info!("Overriding census base URL with {base_url}");
            config.base_url = base_url;
            config.validate()?;
        }

        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::Config`] for an empty base URL, a historical
    /// year newer than `latest_year`, or a repeated historical year.
    pub fn validate(&self) -> Result<(), CensusError> {
        if self.base_url.trim().is_empty() {
            return Err(CensusError::Config {
                message: "base_url must not be empty".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for year in &self.historical_years {
            if *year > self.latest_year {
                return Err(CensusError::Config {
                    message: format!(
                        "historical year {year} is newer than latest_year {}",
                        self.latest_year
                    ),
                });
            }
            if !seen.insert(year) {
                return Err(CensusError::Config {
                    message: format!("historical year {year} is listed twice"),
                });
            }
        }

        Ok(())
    }

    /// Data Profile endpoint for `year`.
    #[must_use]
    pub fn profile_url(&self, year: u16) -> String {
        format!(
            "{}/{year}/{}",
            self.base_url.trim_end_matches('/'),
            self.profile_dataset
        )
    }

    /// NAME/FIPS lookup endpoint.
    #[must_use]
    pub fn names_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.names_year,
            self.names_dataset
        )
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Historical years, newest first.
    #[must_use]
    pub fn historical_years_desc(&self) -> Vec<u16> {
        let mut years = self.historical_years.clone();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = CensusConfig::default();
        assert_eq!(config.latest_year, 2023);
        assert_eq!(config.historical_years, vec![2022, 2021, 2020, 2019]);
        assert_eq!(config.names_year, 2022);
    }

    #[test]
    fn builds_endpoint_urls() {
        let config = CensusConfig::default();
        assert_eq!(
            config.profile_url(2021),
            "https://api.census.gov/data/2021/acs/acs5/profile"
        );
        assert_eq!(config.names_url(), "https://api.census.gov/data/2022/acs/acs5");
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let config = CensusConfig {
            base_url: "http://localhost:8080/data/".to_string(),
            ..CensusConfig::default()
        };
        assert_eq!(
            config.profile_url(2023),
            "http://localhost:8080/data/2023/acs/acs5/profile"
        );
    }

    #[test]
    fn rejects_future_historical_year() {
        let err = CensusConfig::from_toml(
            r#"
            base_url = "https://api.census.gov/data"
            profile_dataset = "acs/acs5/profile"
            names_dataset = "acs/acs5"
            names_year = 2022
            latest_year = 2021
            historical_years = [2022]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CensusError::Config { .. }));
    }

    #[test]
    fn rejects_duplicate_historical_year() {
        let config = CensusConfig {
            historical_years: vec![2020, 2020],
            ..CensusConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn optional_fields_default() {
        let config = CensusConfig::from_toml(
            r#"
            base_url = "https://api.census.gov/data"
            profile_dataset = "acs/acs5/profile"
            names_dataset = "acs/acs5"
            names_year = 2022
            latest_year = 2023
            "#,
        )
        .unwrap();
        assert!(config.historical_years.is_empty());
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("censusly/"));
    }

    #[test]
    fn historical_years_newest_first() {
        let config = CensusConfig {
            historical_years: vec![2019, 2022, 2020],
            ..CensusConfig::default()
        };
        assert_eq!(config.historical_years_desc(), vec![2022, 2020, 2019]);
    }
}
