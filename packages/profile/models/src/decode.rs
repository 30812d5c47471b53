//! Positional decoding of projected response rows.
//!
//! A projected row is the category's variable cells, in request order,
//! followed by exactly one geography echo cell. Any other length is a
//! hard error: a shifted row would decode into plausible but wrong
//! values with nothing to catch it downstream.

use crate::Category;
use crate::records::ProfileRecord;
use crate::variables::fields;

/// One response row: `None` where the API returned no value.
pub type RawRow = Vec<Option<String>>;

/// A row did not have the length its category requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{category} row has {actual} cells, expected {expected}")]
pub struct DecodeError {
    /// Category being decoded.
    pub category: Category,
    /// Required cell count (variables + 1).
    pub expected: usize,
    /// Cell count received.
    pub actual: usize,
}

/// Number of cells a projected row must have for `category`.
#[must_use]
pub const fn expected_row_len(category: Category) -> usize {
    fields(category).len() + 1
}

/// Checks that `row` holds `variable_count` cells plus the echo cell.
///
/// # Errors
///
/// Returns [`DecodeError`] on any mismatch.
pub(crate) const fn check_row_len(
    category: Category,
    variable_count: usize,
    row: &[Option<String>],
) -> Result<(), DecodeError> {
    let expected = variable_count + 1;
    if row.len() == expected {
        Ok(())
    } else {
        Err(DecodeError {
            category,
            expected,
            actual: row.len(),
        })
    }
}

/// Decodes a projected row into the typed record for `category`.
///
/// # Errors
///
/// Returns [`DecodeError`] if the row length does not equal
/// [`expected_row_len`].
pub fn decode_record(
    category: Category,
    row: &[Option<String>],
) -> Result<ProfileRecord, DecodeError> {
    ProfileRecord::decode(category, row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_lengths_include_echo_cell() {
        assert_eq!(expected_row_len(Category::Overview), 15);
        assert_eq!(expected_row_len(Category::Demographic), 21);
        assert_eq!(expected_row_len(Category::Social), 21);
        assert_eq!(expected_row_len(Category::Economic), 21);
        assert_eq!(expected_row_len(Category::Housing), 21);
    }

    #[test]
    fn mismatch_reports_both_lengths() {
        let row: RawRow = vec![Some("1".to_string()); 20];
        let err = decode_record(Category::Social, &row).unwrap_err();
        assert_eq!(
            err,
            DecodeError {
                category: Category::Social,
                expected: 21,
                actual: 20,
            }
        );
        assert_eq!(err.to_string(), "Social row has 20 cells, expected 21");
    }

    #[test]
    fn empty_row_is_rejected() {
        assert!(decode_record(Category::Overview, &[]).is_err());
    }
}
