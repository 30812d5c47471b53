//! State, county, and place lists for location pickers.
//!
//! States are fetched once. Counties and places belong to the selected
//! state and are replaced wholesale whenever a state is selected.

use censusly_geography_models::{County, Place, State, fips};

use crate::{CensusError, GeographySource};

/// Number of places returned by [`GeographyCatalog::search_places`] for
/// an empty search.
pub const DEFAULT_PLACE_RESULTS: usize = 20;

/// Cached geography lists over a [`GeographySource`].
#[derive(Debug)]
pub struct GeographyCatalog<G> {
    source: G,
    states: Option<Vec<State>>,
    selected_state: Option<String>,
    counties: Vec<County>,
    places: Vec<Place>,
}

impl<G: GeographySource> GeographyCatalog<G> {
    /// Creates an empty catalog.
    pub const fn new(source: G) -> Self {
        Self {
            source,
            states: None,
            selected_state: None,
            counties: Vec::new(),
            places: Vec::new(),
        }
    }

    /// Returns the state list, fetching it on first use.
    ///
    /// States are shown by two-letter abbreviation (names missing from
    /// the abbreviation table pass through) and sorted by that name.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError`] if the first fetch fails. A failed fetch is
    /// not cached, so the next call tries again.
    pub async fn states_if_needed(&mut self) -> Result<&[State], CensusError> {
        if self.states.is_none() {
            let mut states = self.source.fetch_states().await.inspect_err(|e| {
                log::warn!("Failed to load states: {e}");
            })?;
            for state in &mut states {
                state.name = fips::display_name(&state.name).to_string();
            }
            states.sort_by(|a, b| a.name.cmp(&b.name));
            log::info!("Loaded {} states", states.len());
            self.states = Some(states);
        }

        Ok(self.states.as_deref().unwrap_or_default())
    }

    /// Selects a state and loads its counties and places concurrently.
    ///
    /// Both lists are cleared up front, so a failure never leaves the
    /// previous state's lists attached to the new selection.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError`] if either fetch fails.
    pub async fn select_state(&mut self, state_fips: &str) -> Result<(), CensusError> {
        self.selected_state = Some(state_fips.to_string());
        self.counties.clear();
        self.places.clear();

        let (mut counties, mut places) = tokio::try_join!(
            self.source.fetch_counties(state_fips),
            self.source.fetch_places(state_fips),
        )
        .inspect_err(|e| log::warn!("Failed to load counties and cities for state {state_fips}: {e}"))?;

        counties.sort_by(|a, b| a.name.cmp(&b.name));
        places.sort_by(|a, b| a.name.cmp(&b.name));
        log::info!(
            "Loaded {} counties and {} places for state {state_fips}",
            counties.len(),
            places.len()
        );

        self.counties = counties;
        self.places = places;
        Ok(())
    }

    /// FIPS code of the selected state.
    #[must_use]
    pub fn selected_state(&self) -> Option<&str> {
        self.selected_state.as_deref()
    }

    /// Counties of the selected state, sorted by name.
    #[must_use]
    pub fn counties(&self) -> &[County] {
        &self.counties
    }

    /// Places of the selected state, sorted by name.
    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Places matching `text`: the first [`DEFAULT_PLACE_RESULTS`] when
    /// `text` is blank, otherwise every place whose name contains it,
    /// ignoring case.
    #[must_use]
    pub fn search_places(&self, text: &str) -> Vec<&Place> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return self.places.iter().take(DEFAULT_PLACE_RESULTS).collect();
        }
        self.places
            .iter()
            .filter(|place| place.name.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct FakeGeography {
        state_calls: AtomicUsize,
        fail_places: bool,
    }

    #[async_trait]
    impl GeographySource for FakeGeography {
        async fn fetch_states(&self) -> Result<Vec<State>, CensusError> {
            self.state_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                State {
                    name: "Texas".to_string(),
                    fips: "48".to_string(),
                },
                State {
                    name: "Alabama".to_string(),
                    fips: "01".to_string(),
                },
                State {
                    name: "Atlantis".to_string(),
                    fips: "99".to_string(),
                },
            ])
        }

        async fn fetch_counties(&self, state_fips: &str) -> Result<Vec<County>, CensusError> {
            Ok(vec![
                County {
                    name: format!("Zeta County {state_fips}"),
                    fips: "003".to_string(),
                },
                County {
                    name: format!("Alpha County {state_fips}"),
                    fips: "001".to_string(),
                },
            ])
        }

        async fn fetch_places(&self, state_fips: &str) -> Result<Vec<Place>, CensusError> {
            if self.fail_places {
                return Err(CensusError::NoDataFound {
                    url: format!("place:*&in=state:{state_fips}"),
                });
            }
            Ok((0..30)
                .map(|i| Place {
                    name: format!("Town {i:02}"),
                    fips: format!("{i:05}"),
                })
                .chain(std::iter::once(Place {
                    name: "Springfield".to_string(),
                    fips: "70000".to_string(),
                }))
                .collect())
        }
    }

    #[tokio::test]
    async fn states_are_abbreviated_sorted_and_cached() {
        let mut catalog = GeographyCatalog::new(FakeGeography::default());
        let names: Vec<String> = catalog
            .states_if_needed()
            .await
            .unwrap()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["AL", "Atlantis", "TX"]);

        catalog.states_if_needed().await.unwrap();
        assert_eq!(catalog.source.state_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn selecting_a_state_replaces_lists() {
        let mut catalog = GeographyCatalog::new(FakeGeography::default());
        catalog.select_state("06").await.unwrap();
        assert_eq!(catalog.counties()[0].name, "Alpha County 06");

        catalog.select_state("17").await.unwrap();
        assert_eq!(catalog.selected_state(), Some("17"));
        assert_eq!(catalog.counties().len(), 2);
        assert_eq!(catalog.counties()[1].name, "Zeta County 17");
        assert_eq!(catalog.places().len(), 31);
    }

    #[tokio::test]
    async fn failed_selection_leaves_empty_lists() {
        let mut catalog = GeographyCatalog::new(FakeGeography {
            fail_places: true,
            ..FakeGeography::default()
        });
        assert!(catalog.select_state("06").await.is_err());
        assert!(catalog.counties().is_empty());
        assert!(catalog.places().is_empty());
    }

    #[tokio::test]
    async fn place_search() {
        let mut catalog = GeographyCatalog::new(FakeGeography::default());
        catalog.select_state("17").await.unwrap();

        assert_eq!(catalog.search_places("").len(), DEFAULT_PLACE_RESULTS);
        assert_eq!(catalog.search_places("  ")[0].name, "Springfield");

        let hits = catalog.search_places("SPRING");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fips, "70000");

        assert_eq!(catalog.search_places("town 1").len(), 10);
    }
}
