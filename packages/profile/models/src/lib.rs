#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! ACS Data Profile categories and typed category records.
//!
//! Each [`Category`] owns a frozen, ordered table of Data Profile
//! variables (see [`variables`]). The same table drives the request's
//! `get=` list and the positional decoding of the response row, so the
//! variable order and the record field order cannot drift apart.

pub mod decode;
pub mod format;
pub mod records;
pub mod variables;

pub use decode::{DecodeError, RawRow, decode_record, expected_row_len};
pub use format::{ValueFormat, format_value, parse_numeric};
pub use records::{
    DemographicRecord, EconomicRecord, HousingRecord, OverviewRecord, ProfileRecord, SocialRecord,
};
pub use variables::FieldSpec;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One of the five statistical groupings shown for a location.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Category {
    /// Headline figures across all topics.
    Overview,
    /// Age, sex, race, and ethnicity.
    Demographic,
    /// Households, education, language, and ancestry.
    Social,
    /// Employment, income, insurance, and commuting.
    Economic,
    /// Occupancy, structure, value, and costs.
    Housing,
}

impl Category {
    /// Every category in display order.
    pub const ALL: &[Self] = &[
        Self::Overview,
        Self::Demographic,
        Self::Social,
        Self::Economic,
        Self::Housing,
    ];
}
