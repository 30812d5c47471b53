//! [`FetchOrchestrator`]: the primary/comparison fetch state machine.
//!
//! All state lives behind one mutex that is only held to plan a request
//! or to apply its response, never across an `.await`. Planning draws a
//! ticket from a single counter and stores it in the target slot; applying
//! checks the slot still holds it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use censusly_census::{CensusError, ProfileSource};
use censusly_geography_models::Location;
use censusly_profile_models::{Category, ProfileRecord};
use futures::future::join_all;
use tokio::sync::watch;

use crate::state::{CategoryView, FetchFailure, LocationFetchState, Ticket};
use crate::{FetchError, FetchOutcome, Role};

/// Drives fetches for a primary location and an optional comparison
/// location over a [`ProfileSource`].
///
/// Cloning is cheap; clones share state.
pub struct FetchOrchestrator<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for FetchOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    source: S,
    latest_year: u16,
    session: Mutex<Session>,
    revision: watch::Sender<u64>,
}

struct Session {
    last_ticket: Ticket,
    /// Set by any planning step that changed visible state.
    dirty: bool,
    primary: LocationFetchState,
    comparison: Option<LocationFetchState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearChange {
    Toggle,
    Select,
    Deselect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LatestMode {
    Refresh,
    IfMissing,
}

/// A request planned under the lock, to be sent after releasing it.
#[derive(Debug, Clone)]
struct Job {
    role: Role,
    category: Category,
    year: Option<u16>,
    ticket: Ticket,
    location: Location,
}

impl Job {
    fn failure_message(&self) -> String {
        match (self.year, self.role) {
            (Some(year), _) => format!("Failed to load data for {year}."),
            (None, Role::Primary) => "Failed to fetch latest data.".to_string(),
            (None, Role::Comparison) => "Failed to load comparison data.".to_string(),
        }
    }
}

enum Step {
    Done(FetchOutcome),
    Fetch(Job),
}

impl Session {
    const fn issue(&mut self) -> Ticket {
        self.last_ticket += 1;
        self.last_ticket
    }

    const fn role(&self, role: Role) -> Option<&LocationFetchState> {
        match role {
            Role::Primary => Some(&self.primary),
            Role::Comparison => self.comparison.as_ref(),
        }
    }

    const fn role_mut(&mut self, role: Role) -> Option<&mut LocationFetchState> {
        match role {
            Role::Primary => Some(&mut self.primary),
            Role::Comparison => self.comparison.as_mut(),
        }
    }

    fn plan_latest(&mut self, role: Role, category: Category, mode: LatestMode) -> Result<Step, FetchError> {
        let ticket = self.issue();
        let state = self.role_mut(role).ok_or(FetchError::NotComparing)?;
        let location = state.location().clone();
        let slot = state.category_mut(category);

        if mode == LatestMode::IfMissing && !slot.needs_latest() {
            return Ok(Step::Done(if slot.is_loading_latest() {
                FetchOutcome::AlreadyInFlight
            } else {
                FetchOutcome::Unchanged
            }));
        }
        if !slot.begin_latest(ticket) {
            return Ok(Step::Done(FetchOutcome::AlreadyInFlight));
        }
        self.dirty = true;

        Ok(Step::Fetch(Job {
            role,
            category,
            year: None,
            ticket,
            location,
        }))
    }

    fn plan_year(
        &mut self,
        role: Role,
        category: Category,
        year: u16,
        change: YearChange,
    ) -> Result<Step, FetchError> {
        let ticket = self.issue();
        let state = self.role_mut(role).ok_or(FetchError::NotComparing)?;
        let location = state.location().clone();
        let slot = state.category_mut(category);

        let select = match change {
            YearChange::Toggle => !slot.is_selected(year),
            YearChange::Select => true,
            YearChange::Deselect => false,
        };

        if !select {
            let Some(outcome) = slot.deselect_year(year) else {
                return Ok(Step::Done(FetchOutcome::Unchanged));
            };
            self.dirty = true;
            return Ok(Step::Done(outcome));
        }
        if slot.is_pending(year) {
            return Ok(Step::Done(FetchOutcome::AlreadyInFlight));
        }
        if slot.is_selected(year) {
            return Ok(Step::Done(FetchOutcome::Unchanged));
        }

        slot.begin_year(year, ticket);
        self.dirty = true;
        Ok(Step::Fetch(Job {
            role,
            category,
            year: Some(year),
            ticket,
            location,
        }))
    }

    /// Years selected on the primary for `category`, loaded or in flight.
    fn primary_years(&self, category: Category) -> Vec<u16> {
        self.primary
            .category(category)
            .map(|slot| slot.selected_years().into_iter().collect())
            .unwrap_or_default()
    }
}

impl<S: ProfileSource> FetchOrchestrator<S> {
    /// Creates an orchestrator tracking `primary`, with `latest_year` as
    /// the default year for latest fetches.
    pub fn new(source: S, primary: Location, latest_year: u16) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                source,
                latest_year,
                session: Mutex::new(Session {
                    last_ticket: 0,
                    dirty: false,
                    primary: LocationFetchState::new(primary),
                    comparison: None,
                }),
                revision,
            }),
        }
    }

    /// The default year for latest fetches.
    #[must_use]
    pub fn latest_year(&self) -> u16 {
        self.inner.latest_year
    }

    /// Subscribes to the revision counter, bumped on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// The current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// The primary location.
    #[must_use]
    pub fn primary_location(&self) -> Location {
        self.lock().primary.location().clone()
    }

    /// Whether a comparison location is active.
    #[must_use]
    pub fn is_comparing(&self) -> bool {
        self.lock().comparison.is_some()
    }

    /// The comparison location, if comparing.
    #[must_use]
    pub fn comparison_location(&self) -> Option<Location> {
        self.lock()
            .comparison
            .as_ref()
            .map(|state| state.location().clone())
    }

    /// Snapshot of one role's state for `category`. `None` for the
    /// comparison role while not comparing.
    #[must_use]
    pub fn snapshot(&self, role: Role, category: Category) -> Option<CategoryView> {
        self.lock().role(role).map(|state| state.view(category))
    }

    /// Replaces the primary location, dropping all primary and
    /// comparison state. Responses still in flight are discarded.
    pub fn set_primary(&self, location: Location) {
        {
            let mut session = self.lock();
            log::info!("Primary location set to {location}");
            session.primary = LocationFetchState::new(location);
            session.comparison = None;
        }
        self.bump();
    }

    /// Fetches the latest-year record for `role` and `category`.
    ///
    /// Ignored with [`FetchOutcome::AlreadyInFlight`] while the same fetch
    /// is running. On failure the previous record is kept and the error is
    /// recorded in the slot.
    ///
    /// # Errors
    ///
    /// * [`FetchError::NotComparing`] for the comparison role while not
    ///   comparing.
    /// * [`FetchError::Census`] if the request fails.
    pub async fn fetch_latest(&self, role: Role, category: Category) -> Result<FetchOutcome, FetchError> {
        let step = self.plan(|session| session.plan_latest(role, category, LatestMode::Refresh))?;
        self.finish(step).await
    }

    /// Toggles a historical year for one role: evicts it when selected
    /// (cancelling the request if still in flight), fetches it otherwise.
    ///
    /// # Errors
    ///
    /// * [`FetchError::NotComparing`] for the comparison role while not
    ///   comparing.
    /// * [`FetchError::Census`] if the fetch fails. The year is left
    ///   deselected and the error is recorded.
    pub async fn toggle_historical_year(
        &self,
        role: Role,
        category: Category,
        year: u16,
    ) -> Result<FetchOutcome, FetchError> {
        let step = self.plan(|session| session.plan_year(role, category, year, YearChange::Toggle))?;
        self.finish(step).await
    }

    /// Toggles a historical year on the primary and, while comparing,
    /// applies the resulting selection to the comparison location too.
    ///
    /// Returns the primary's outcome. Both sides run concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first [`FetchError`] from either side.
    pub async fn toggle_year(&self, category: Category, year: u16) -> Result<FetchOutcome, FetchError> {
        let (primary, comparison) = self.plan(|session| {
            let primary = session.plan_year(Role::Primary, category, year, YearChange::Toggle)?;
            let selected = session
                .primary
                .category(category)
                .is_some_and(|slot| slot.is_selected(year));
            let change = if selected {
                YearChange::Select
            } else {
                YearChange::Deselect
            };
            let comparison = if session.comparison.is_some() {
                Some(session.plan_year(Role::Comparison, category, year, change)?)
            } else {
                None
            };
            Ok((primary, comparison))
        })?;

        let (primary, comparison) = tokio::join!(self.finish(primary), async {
            match comparison {
                Some(step) => Some(self.finish(step).await),
                None => None,
            }
        });

        let outcome = primary?;
        comparison.transpose()?;
        Ok(outcome)
    }

    /// Starts comparing against `location`, replacing any previous
    /// comparison state.
    ///
    /// Fetches the comparison's latest record for `category` together with
    /// every year selected on the primary, including years still in flight
    /// there.
    ///
    /// # Errors
    ///
    /// Returns the first [`FetchError`] among those fetches. Every fetch
    /// still runs to completion and records its own result.
    pub async fn enter_comparison(&self, location: Location, category: Category) -> Result<(), FetchError> {
        let steps = self.plan(|session| {
            let years = session.primary_years(category);
            log::info!(
                "Comparing against {location} for {category} (years {years:?})"
            );
            session.comparison = Some(LocationFetchState::new(location));
            session.dirty = true;

            let mut steps = vec![session.plan_latest(Role::Comparison, category, LatestMode::Refresh)?];
            for year in years {
                steps.push(session.plan_year(Role::Comparison, category, year, YearChange::Select)?);
            }
            Ok(steps)
        })?;

        self.finish_all(steps).await
    }

    /// Stops comparing. Every category's comparison state is dropped and
    /// responses still in flight for it are discarded.
    pub fn exit_comparison(&self) {
        let was_comparing = {
            let mut session = self.lock();
            session.comparison.take().is_some()
        };
        if was_comparing {
            log::info!("Comparison cleared");
            self.bump();
        }
    }

    /// Brings `category` up to date when it is opened: fetches the latest
    /// record for each role that has neither loaded nor started it, and
    /// while comparing, fetches any primary-selected year the comparison
    /// is missing.
    ///
    /// # Errors
    ///
    /// Returns the first [`FetchError`] among those fetches.
    pub async fn open_category(&self, category: Category) -> Result<(), FetchError> {
        let steps = self.plan(|session| {
            let mut steps = vec![session.plan_latest(Role::Primary, category, LatestMode::IfMissing)?];
            if session.comparison.is_some() {
                steps.push(session.plan_latest(Role::Comparison, category, LatestMode::IfMissing)?);
                for year in session.primary_years(category) {
                    steps.push(session.plan_year(Role::Comparison, category, year, YearChange::Select)?);
                }
            }
            Ok(steps)
        })?;

        self.finish_all(steps).await
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.inner.revision.send_modify(|revision| *revision = revision.wrapping_add(1));
    }

    /// Runs `f` under the lock, then notifies subscribers if it changed
    /// anything.
    fn plan<T>(&self, f: impl FnOnce(&mut Session) -> Result<T, FetchError>) -> Result<T, FetchError> {
        let (planned, changed) = {
            let mut session = self.lock();
            let planned = f(&mut session);
            (planned, std::mem::take(&mut session.dirty))
        };
        if changed {
            self.bump();
        }
        planned
    }

    async fn finish(&self, step: Step) -> Result<FetchOutcome, FetchError> {
        match step {
            Step::Done(outcome) => Ok(outcome),
            Step::Fetch(job) => self.run(job).await,
        }
    }

    async fn finish_all(&self, steps: Vec<Step>) -> Result<(), FetchError> {
        join_all(steps.into_iter().map(|step| self.finish(step)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map(|_| ())
    }

    async fn run(&self, job: Job) -> Result<FetchOutcome, FetchError> {
        let year = job.year.unwrap_or(self.inner.latest_year);
        let result = self
            .inner
            .source
            .fetch_profile(&job.location, job.category, year)
            .await;
        self.apply(&job, result)
    }

    /// Stores a response if its slot still holds the job's ticket.
    fn apply(&self, job: &Job, result: Result<ProfileRecord, CensusError>) -> Result<FetchOutcome, FetchError> {
        let (stored, error) = match result {
            Ok(record) => (Ok(record), None),
            Err(e) => (Err(FetchFailure::new(job.failure_message(), &e)), Some(e)),
        };

        let applied = {
            let mut session = self.lock();
            session.role_mut(job.role).is_some_and(|state| {
                let slot = state.category_mut(job.category);
                match job.year {
                    Some(year) => slot.finish_year(year, job.ticket, stored),
                    None => slot.finish_latest(job.ticket, stored),
                }
            })
        };

        if !applied {
            log::debug!(
                "Discarding stale {} {} response for {} (ticket {})",
                job.role,
                job.category,
                job.location,
                job.ticket
            );
            return Ok(FetchOutcome::Discarded);
        }

        self.bump();
        match error {
            Some(e) => {
                log::warn!(
                    "{} {} {}: {}",
                    job.role,
                    job.category,
                    job.failure_message(),
                    e
                );
                Err(e.into())
            }
            None => Ok(FetchOutcome::Applied),
        }
    }
}
