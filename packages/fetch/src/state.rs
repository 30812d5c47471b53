//! Per-location, per-category fetch state.
//!
//! Every in-flight request holds a ticket. A response is only applied if
//! its slot still holds the same ticket; deselecting a year or dropping a
//! location's state removes the ticket, so a late response has nowhere to
//! land.

use std::collections::{BTreeMap, BTreeSet};

use censusly_census::{CensusError, ErrorKind};
use censusly_geography_models::Location;
use censusly_profile_models::{Category, ProfileRecord};

use crate::FetchOutcome;

/// Generation number attached to one request.
pub type Ticket = u64;

/// A failed fetch as recorded in state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Error class.
    pub kind: ErrorKind,
    /// Short user-facing message.
    pub message: String,
    /// Underlying error text.
    pub detail: String,
}

impl FetchFailure {
    pub(crate) fn new(message: impl Into<String>, error: &CensusError) -> Self {
        Self {
            kind: error.kind(),
            message: message.into(),
            detail: error.to_string(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.detail)
    }
}

/// Latest and historical records for one category at one location.
#[derive(Debug, Clone, Default)]
pub struct CategoryFetchState {
    latest: Option<ProfileRecord>,
    latest_ticket: Option<Ticket>,
    historical: BTreeMap<u16, ProfileRecord>,
    pending: BTreeMap<u16, Ticket>,
    error: Option<FetchFailure>,
    year_errors: BTreeMap<u16, FetchFailure>,
}

impl CategoryFetchState {
    /// The latest-year record, if loaded. Kept when a later refresh fails.
    #[must_use]
    pub const fn latest(&self) -> Option<&ProfileRecord> {
        self.latest.as_ref()
    }

    /// Whether a latest-year fetch is in flight.
    #[must_use]
    pub const fn is_loading_latest(&self) -> bool {
        self.latest_ticket.is_some()
    }

    /// Whether the latest record is neither loaded nor loading.
    #[must_use]
    pub const fn needs_latest(&self) -> bool {
        self.latest.is_none() && self.latest_ticket.is_none()
    }

    /// Loaded historical years.
    #[must_use]
    pub const fn historical(&self) -> &BTreeMap<u16, ProfileRecord> {
        &self.historical
    }

    /// Whether `year` is loaded or being fetched.
    #[must_use]
    pub fn is_selected(&self, year: u16) -> bool {
        self.historical.contains_key(&year) || self.pending.contains_key(&year)
    }

    /// Whether `year` is being fetched.
    #[must_use]
    pub fn is_pending(&self, year: u16) -> bool {
        self.pending.contains_key(&year)
    }

    /// Years loaded or being fetched.
    #[must_use]
    pub fn selected_years(&self) -> BTreeSet<u16> {
        self.historical
            .keys()
            .chain(self.pending.keys())
            .copied()
            .collect()
    }

    fn pending_years(&self) -> BTreeSet<u16> {
        self.pending.keys().copied().collect()
    }

    /// The most recent latest-year failure, cleared by the next success.
    #[must_use]
    pub const fn error(&self) -> Option<&FetchFailure> {
        self.error.as_ref()
    }

    /// The most recent failure for a historical year.
    #[must_use]
    pub fn year_error(&self, year: u16) -> Option<&FetchFailure> {
        self.year_errors.get(&year)
    }

    /// Marks a latest fetch as started. Returns `false` if one is already
    /// in flight.
    pub(crate) fn begin_latest(&mut self, ticket: Ticket) -> bool {
        if self.latest_ticket.is_some() {
            return false;
        }
        self.latest_ticket = Some(ticket);
        true
    }

    /// Applies a latest response. Returns `false` if the ticket is stale.
    pub(crate) fn finish_latest(
        &mut self,
        ticket: Ticket,
        result: Result<ProfileRecord, FetchFailure>,
    ) -> bool {
        if self.latest_ticket != Some(ticket) {
            return false;
        }
        self.latest_ticket = None;
        match result {
            Ok(record) => {
                self.latest = Some(record);
                self.error = None;
            }
            Err(failure) => self.error = Some(failure),
        }
        true
    }

    /// Marks a historical year as selected and in flight.
    pub(crate) fn begin_year(&mut self, year: u16, ticket: Ticket) {
        self.year_errors.remove(&year);
        self.pending.insert(year, ticket);
    }

    /// Deselects a year, evicting it if loaded or orphaning its request if
    /// in flight. Returns `None` if the year was not selected.
    pub(crate) fn deselect_year(&mut self, year: u16) -> Option<FetchOutcome> {
        self.year_errors.remove(&year);
        if self.historical.remove(&year).is_some() {
            Some(FetchOutcome::Evicted)
        } else if self.pending.remove(&year).is_some() {
            Some(FetchOutcome::Cancelled)
        } else {
            None
        }
    }

    /// Applies a historical-year response. Returns `false` if the ticket
    /// is stale. A failure leaves the year deselected.
    pub(crate) fn finish_year(
        &mut self,
        year: u16,
        ticket: Ticket,
        result: Result<ProfileRecord, FetchFailure>,
    ) -> bool {
        if self.pending.get(&year) != Some(&ticket) {
            return false;
        }
        self.pending.remove(&year);
        match result {
            Ok(record) => {
                self.historical.insert(year, record);
            }
            Err(failure) => {
                self.year_errors.insert(year, failure);
            }
        }
        true
    }
}

/// Fetch state for one location across every category.
#[derive(Debug, Clone)]
pub struct LocationFetchState {
    location: Location,
    categories: BTreeMap<Category, CategoryFetchState>,
}

impl LocationFetchState {
    /// Empty state for `location`.
    #[must_use]
    pub const fn new(location: Location) -> Self {
        Self {
            location,
            categories: BTreeMap::new(),
        }
    }

    /// The tracked location.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// State for `category`, if anything was ever requested for it.
    #[must_use]
    pub fn category(&self, category: Category) -> Option<&CategoryFetchState> {
        self.categories.get(&category)
    }

    pub(crate) fn category_mut(&mut self, category: Category) -> &mut CategoryFetchState {
        self.categories.entry(category).or_default()
    }

    /// Owned snapshot of one category.
    #[must_use]
    pub fn view(&self, category: Category) -> CategoryView {
        let state = self.categories.get(&category);
        CategoryView {
            location: self.location.clone(),
            category,
            latest: state.and_then(|s| s.latest.clone()),
            loading_latest: state.is_some_and(CategoryFetchState::is_loading_latest),
            historical: state.map(|s| s.historical.clone()).unwrap_or_default(),
            pending_years: state.map(CategoryFetchState::pending_years).unwrap_or_default(),
            error: state.and_then(|s| s.error.clone()),
            year_errors: state.map(|s| s.year_errors.clone()).unwrap_or_default(),
        }
    }
}

/// Point-in-time copy of one role's state for one category.
#[derive(Debug, Clone)]
pub struct CategoryView {
    /// Location the state belongs to.
    pub location: Location,
    /// Category the state belongs to.
    pub category: Category,
    /// Latest-year record.
    pub latest: Option<ProfileRecord>,
    /// Whether a latest-year fetch is in flight.
    pub loading_latest: bool,
    /// Loaded historical years.
    pub historical: BTreeMap<u16, ProfileRecord>,
    /// Historical years being fetched.
    pub pending_years: BTreeSet<u16>,
    /// Latest-year failure.
    pub error: Option<FetchFailure>,
    /// Historical-year failures.
    pub year_errors: BTreeMap<u16, FetchFailure>,
}

impl CategoryView {
    /// Loaded historical years, newest first.
    #[must_use]
    pub fn years_desc(&self) -> Vec<u16> {
        self.historical.keys().rev().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProfileRecord {
        ProfileRecord::placeholder(Category::Overview)
    }

    fn failure() -> FetchFailure {
        FetchFailure::new(
            "Failed to fetch latest data.",
            &CensusError::NoDataFound {
                url: "https://api.census.gov/data/2023/acs/acs5/profile".to_string(),
            },
        )
    }

    #[test]
    fn latest_failure_keeps_previous_record() {
        let mut state = CategoryFetchState::default();
        assert!(state.begin_latest(1));
        assert!(state.finish_latest(1, Ok(record())));

        assert!(state.begin_latest(2));
        assert!(state.finish_latest(2, Err(failure())));
        assert!(state.latest().is_some());
        assert_eq!(state.error().unwrap().kind, ErrorKind::NoDataFound);
        assert!(!state.is_loading_latest());
    }

    #[test]
    fn second_latest_begin_is_refused() {
        let mut state = CategoryFetchState::default();
        assert!(state.needs_latest());
        assert!(state.begin_latest(1));
        assert!(!state.needs_latest());
        assert!(!state.begin_latest(2));
        assert!(!state.finish_latest(2, Ok(record())));
        assert!(state.finish_latest(1, Ok(record())));
    }

    #[test]
    fn stale_year_response_is_dropped() {
        let mut state = CategoryFetchState::default();
        state.begin_year(2021, 1);
        assert_eq!(state.deselect_year(2021), Some(FetchOutcome::Cancelled));
        state.begin_year(2021, 2);

        assert!(!state.finish_year(2021, 1, Ok(record())));
        assert!(state.historical().is_empty());
        assert!(state.finish_year(2021, 2, Ok(record())));
        assert_eq!(state.historical().keys().copied().collect::<Vec<_>>(), vec![2021]);
    }

    #[test]
    fn failed_year_is_not_selected() {
        let mut state = CategoryFetchState::default();
        state.begin_year(2019, 7);
        assert!(state.is_selected(2019));
        assert_eq!(state.pending_years(), BTreeSet::from([2019]));
        assert!(state.finish_year(2019, 7, Err(failure())));
        assert!(!state.is_selected(2019));
        assert!(state.year_error(2019).is_some());
    }

    #[test]
    fn deselecting_unselected_year_is_none() {
        let mut state = CategoryFetchState::default();
        assert_eq!(state.deselect_year(2020), None);
    }

    #[test]
    fn view_of_untouched_category_is_empty() {
        let state = LocationFetchState::new(Location::Nation);
        let view = state.view(Category::Housing);
        assert!(view.latest.is_none());
        assert!(!view.loading_latest);
        assert!(view.historical.is_empty());
        assert!(view.years_desc().is_empty());
    }
}
