//! The category → variable → field table.
//!
//! Every category's ordered variable list is declared exactly once, next
//! to its record type in [`crate::records`]. Query building reads the
//! codes from here and decoding assigns cells in the same order, so a
//! variable can only move together with its field.

use crate::format::ValueFormat;
use crate::records::{
    DemographicRecord, EconomicRecord, HousingRecord, OverviewRecord, SocialRecord,
};
use crate::Category;

/// Upper bound on variables per category request.
pub const MAX_VARIABLES: usize = 20;

/// One Data Profile variable and the record field it decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// Record field name.
    pub field: &'static str,
    /// Data Profile variable code (e.g. `DP05_0001E`).
    pub code: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Display format.
    pub format: ValueFormat,
}

/// Returns the ordered field table for a category.
#[must_use]
pub const fn fields(category: Category) -> &'static [FieldSpec] {
    match category {
        Category::Overview => OverviewRecord::FIELDS,
        Category::Demographic => DemographicRecord::FIELDS,
        Category::Social => SocialRecord::FIELDS,
        Category::Economic => EconomicRecord::FIELDS,
        Category::Housing => HousingRecord::FIELDS,
    }
}

/// Returns the ordered variable codes to request for a category.
#[must_use]
pub fn variable_codes(category: Category) -> Vec<&'static str> {
    fields(category).iter().map(|spec| spec.code).collect()
}

/// Returns the field spec at `index` of a category's table, or `None`
/// when the index is past the end.
#[must_use]
pub fn field_at(category: Category, index: usize) -> Option<&'static FieldSpec> {
    fields(category).get(index)
}

const _: () = {
    assert!(OverviewRecord::FIELDS.len() == 14);
    assert!(DemographicRecord::FIELDS.len() == 20);
    assert!(SocialRecord::FIELDS.len() == 20);
    assert!(EconomicRecord::FIELDS.len() == 20);
    assert!(HousingRecord::FIELDS.len() == 20);
    assert!(OverviewRecord::FIELDS.len() <= MAX_VARIABLES);
};
