//! US state FIPS code and abbreviation lookups.
//!
//! The Census API reports states by full name (e.g. "New York") and
//! two-digit FIPS code. Pickers display the two-letter abbreviation
//! instead, so this module maps between all three for the 50 states,
//! the District of Columbia, and Puerto Rico.

/// `(fips, abbreviation, full Census name)` for every supported state
/// equivalent.
pub const STATES: &[(&str, &str, &str)] = &[
    ("01", "AL", "Alabama"),
    ("02", "AK", "Alaska"),
    ("04", "AZ", "Arizona"),
    ("05", "AR", "Arkansas"),
    ("06", "CA", "California"),
    ("08", "CO", "Colorado"),
    ("09", "CT", "Connecticut"),
    ("10", "DE", "Delaware"),
    ("11", "DC", "District of Columbia"),
    ("12", "FL", "Florida"),
    ("13", "GA", "Georgia"),
    ("15", "HI", "Hawaii"),
    ("16", "ID", "Idaho"),
    ("17", "IL", "Illinois"),
    ("18", "IN", "Indiana"),
    ("19", "IA", "Iowa"),
    ("20", "KS", "Kansas"),
    ("21", "KY", "Kentucky"),
    ("22", "LA", "Louisiana"),
    ("23", "ME", "Maine"),
    ("24", "MD", "Maryland"),
    ("25", "MA", "Massachusetts"),
    ("26", "MI", "Michigan"),
    ("27", "MN", "Minnesota"),
    ("28", "MS", "Mississippi"),
    ("29", "MO", "Missouri"),
    ("30", "MT", "Montana"),
    ("31", "NE", "Nebraska"),
    ("32", "NV", "Nevada"),
    ("33", "NH", "New Hampshire"),
    ("34", "NJ", "New Jersey"),
    ("35", "NM", "New Mexico"),
    ("36", "NY", "New York"),
    ("37", "NC", "North Carolina"),
    ("38", "ND", "North Dakota"),
    ("39", "OH", "Ohio"),
    ("40", "OK", "Oklahoma"),
    ("41", "OR", "Oregon"),
    ("42", "PA", "Pennsylvania"),
    ("44", "RI", "Rhode Island"),
    ("45", "SC", "South Carolina"),
    ("46", "SD", "South Dakota"),
    ("47", "TN", "Tennessee"),
    ("48", "TX", "Texas"),
    ("49", "UT", "Utah"),
    ("50", "VT", "Vermont"),
    ("51", "VA", "Virginia"),
    ("53", "WA", "Washington"),
    ("54", "WV", "West Virginia"),
    ("55", "WI", "Wisconsin"),
    ("56", "WY", "Wyoming"),
    ("72", "PR", "Puerto Rico"),
];

/// Returns the two-letter abbreviation for a full Census state name.
///
/// Returns `None` for names not in [`STATES`].
#[must_use]
pub fn abbreviation_for_name(name: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(_, _, full)| *full == name)
        .map(|(_, abbr, _)| *abbr)
}

/// Returns the display name for a state: its abbreviation when known,
/// otherwise the name unchanged.
#[must_use]
pub fn display_name(name: &str) -> &str {
    abbreviation_for_name(name).unwrap_or(name)
}

/// Maps a two-digit FIPS code to the state abbreviation.
#[must_use]
pub fn state_abbr(fips: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(code, _, _)| *code == fips)
        .map(|(_, abbr, _)| *abbr)
}

/// Maps a two-letter state abbreviation (any case) to its FIPS code.
#[must_use]
pub fn abbr_to_fips(abbr: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(_, code, _)| code.eq_ignore_ascii_case(abbr))
        .map(|(fips, _, _)| *fips)
}

/// Resolves a state given either its FIPS code or its abbreviation.
#[must_use]
pub fn resolve_state_fips(input: &str) -> Option<&'static str> {
    let input = input.trim();
    STATES
        .iter()
        .find(|(fips, _, _)| *fips == input)
        .map(|(fips, _, _)| *fips)
        .or_else(|| abbr_to_fips(input))
}
