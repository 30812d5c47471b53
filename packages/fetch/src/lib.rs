#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fetch state for a primary location and an optional comparison
//! location.
//!
//! [`FetchOrchestrator`] owns one [`LocationFetchState`] per role. Each
//! holds, per category, the latest-year record and a year → record map of
//! selected historical years. Presence in that map is selection: toggling
//! a year off removes it, toggling it on fetches it.

pub mod orchestrator;
pub mod state;

pub use orchestrator::FetchOrchestrator;
pub use state::{CategoryFetchState, CategoryView, FetchFailure, LocationFetchState};

use censusly_census::CensusError;
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// Errors returned by orchestrator operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The underlying request failed. The failure is also recorded in the
    /// affected slot's state.
    #[error(transparent)]
    Census(#[from] CensusError),

    /// A comparison-role operation was issued while not comparing.
    #[error("Not in comparison mode")]
    NotComparing,
}

/// Which of the two tracked locations an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The location the user picked first.
    Primary,
    /// The location being compared against the primary.
    Comparison,
}

/// What an orchestrator operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FetchOutcome {
    /// A response was received and stored.
    Applied,
    /// A loaded year was deselected and removed.
    Evicted,
    /// An in-flight year was deselected; its response will be dropped.
    Cancelled,
    /// The same fetch was already in flight; nothing was sent.
    AlreadyInFlight,
    /// The requested selection already held; nothing was sent.
    Unchanged,
    /// A response arrived for a slot that no longer expects it and was
    /// dropped.
    Discarded,
}
