//! [`CensusClient`]: the live Census API source.

use async_trait::async_trait;
use censusly_geography_models::{
    County, Location, Place, State,
    names::{clean_county_name, clean_place_name},
};
use censusly_profile_models::{Category, ProfileRecord};

use crate::config::CensusConfig;
use crate::query::CensusQuery;
use crate::response::{self, ResponseTable};
use crate::{CensusError, GeographySource, ProfileSource, http};

/// Cells per county/place name row: `NAME`, `state`, and the local FIPS.
const LOCAL_NAME_ROW_WIDTH: usize = 3;

/// Cells per state name row: `NAME` and `state`.
const STATE_NAME_ROW_WIDTH: usize = 2;

/// HTTP client for the ACS Data Profile and NAME/FIPS endpoints.
#[derive(Debug, Clone)]
pub struct CensusClient {
    http: reqwest::Client,
    config: CensusConfig,
}

impl CensusClient {
    /// Creates a client with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::Config`] if the configuration is invalid,
    /// or [`CensusError::Http`] if the HTTP client cannot be built.
    pub fn new(config: CensusConfig) -> Result<Self, CensusError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &CensusConfig {
        &self.config
    }

    async fn names_table(&self, query: &CensusQuery) -> Result<ResponseTable, CensusError> {
        let url = self.config.names_url();
        log::debug!("Fetching names: {url}?{}", query.geography_text());
        let body = http::get_json(&self.http, &url, &query.params()).await?;
        ResponseTable::parse(&body, &url)
    }
}

#[async_trait]
impl ProfileSource for CensusClient {
    async fn fetch_profile(
        &self,
        location: &Location,
        category: Category,
        year: u16,
    ) -> Result<ProfileRecord, CensusError> {
        let query = CensusQuery::profile(location, year, category)?;
        let url = self.config.profile_url(year);
        log::debug!("Fetching {category} {year} for {location}: {url}?{}", query.geography_text());

        let body = http::get_json(&self.http, &url, &query.params()).await?;
        let record = response::profile_record(&body, &url, category, &query.variables)?;

        log::info!("Loaded {category} {year} for {location}");
        Ok(record)
    }
}

#[async_trait]
impl GeographySource for CensusClient {
    async fn fetch_states(&self) -> Result<Vec<State>, CensusError> {
        let table = self
            .names_table(&CensusQuery::state_names(self.config.names_year))
            .await?;
        Ok(states_from_rows(table.complete_rows(STATE_NAME_ROW_WIDTH)))
    }

    async fn fetch_counties(&self, state_fips: &str) -> Result<Vec<County>, CensusError> {
        let query = CensusQuery::county_names(self.config.names_year, state_fips)?;
        let table = self.names_table(&query).await?;
        Ok(counties_from_rows(table.complete_rows(LOCAL_NAME_ROW_WIDTH)))
    }

    async fn fetch_places(&self, state_fips: &str) -> Result<Vec<Place>, CensusError> {
        let query = CensusQuery::place_names(self.config.names_year, state_fips)?;
        let table = self.names_table(&query).await?;
        Ok(places_from_rows(table.complete_rows(LOCAL_NAME_ROW_WIDTH)))
    }
}

fn states_from_rows(rows: Vec<Vec<String>>) -> Vec<State> {
    rows.into_iter()
        .filter_map(|row| {
            let [name, fips]: [String; 2] = row.try_into().ok()?;
            Some(State { name, fips })
        })
        .collect()
}

fn counties_from_rows(rows: Vec<Vec<String>>) -> Vec<County> {
    rows.into_iter()
        .filter_map(|row| {
            let [name, _state, fips]: [String; 3] = row.try_into().ok()?;
            Some(County {
                name: clean_county_name(&name),
                fips,
            })
        })
        .collect()
}

fn places_from_rows(rows: Vec<Vec<String>>) -> Vec<Place> {
    rows.into_iter()
        .filter_map(|row| {
            let [name, _state, fips]: [String; 3] = row.try_into().ok()?;
            Some(Place {
                name: clean_place_name(&name),
                fips,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rows(body: &serde_json::Value, width: usize) -> Vec<Vec<String>> {
        ResponseTable::parse(body, "https://api.census.gov/data/2022/acs/acs5")
            .unwrap()
            .complete_rows(width)
    }

    #[test]
    fn parses_state_rows() {
        let body = json!([["NAME", "state"], ["California", "06"], ["Puerto Rico", "72"]]);
        let states = states_from_rows(rows(&body, STATE_NAME_ROW_WIDTH));
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].name, "California");
        assert_eq!(states[1].fips, "72");
    }

    #[test]
    fn county_names_drop_state_suffix() {
        let body = json!([
            ["NAME", "state", "county"],
            ["Los Angeles County, California", "06", "037"]
        ]);
        let counties = counties_from_rows(rows(&body, LOCAL_NAME_ROW_WIDTH));
        assert_eq!(counties[0].name, "Los Angeles County");
        assert_eq!(counties[0].fips, "037");
    }

    #[test]
    fn place_names_are_cleaned_and_short_rows_skipped() {
        let body = json!([
            ["NAME", "state", "place"],
            ["Los Angeles city, California", "06", "44000"],
            ["East Los Angeles CDP, California", "06", "20802"],
            ["Truncated", "06"]
        ]);
        let places = places_from_rows(rows(&body, LOCAL_NAME_ROW_WIDTH));
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Los Angeles");
        assert_eq!(places[1].name, "East Los Angeles");
        assert_eq!(places[1].fips, "20802");
    }

    #[test]
    fn client_rejects_invalid_config() {
        let config = CensusConfig {
            base_url: String::new(),
            ..CensusConfig::default()
        };
        assert!(matches!(
            CensusClient::new(config),
            Err(CensusError::Config { .. })
        ));
    }
}
