//! Census API response tables.
//!
//! Every endpoint answers with a JSON array of arrays: a header row of
//! column names followed by data rows. Profile rows hold the requested
//! variables followed by geography echo columns whose count depends on the
//! geography level (`us`, `state`, `zip code tabulation area`, or `state`
//! plus `county`/`place`). [`project_row`] reduces a data row to the
//! variables plus one echo cell so the strict positional decoder sees the
//! same width at every level.

use censusly_profile_models::{Category, DecodeError, ProfileRecord, RawRow};
use serde_json::Value;

use crate::CensusError;

/// Values the API uses in place of an estimate (annotation codes for
/// "too few samples", "not applicable", and similar).
pub const SENTINEL_VALUES: &[&str] = &[
    "-666666666",
    "-999999999",
    "-888888888",
    "-555555555",
    "-333333333",
    "-222222222",
];

/// Header column carrying the state FIPS echo.
const STATE_COLUMN: &str = "state";

/// A parsed response: header names and normalized data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTable {
    /// Column names from the first row.
    pub header: Vec<String>,
    /// Data rows with placeholder markers normalized to `None`.
    pub rows: Vec<RawRow>,
}

impl ResponseTable {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// * [`CensusError::Malformed`] if the body is not an array of arrays
    ///   of strings/nulls, or the header contains a non-string cell.
    /// * [`CensusError::NoDataFound`] if there is no data row.
    pub fn parse(body: &Value, url: &str) -> Result<Self, CensusError> {
        let Value::Array(rows) = body else {
            return Err(malformed(format!("expected a JSON array, got {}", kind_of(body))));
        };

        let mut rows = rows.iter();
        let Some(header) = rows.next() else {
            return Err(CensusError::NoDataFound {
                url: url.to_string(),
            });
        };

        let header = parse_row(header)?
            .into_iter()
            .enumerate()
            .map(|(i, cell)| cell.ok_or_else(|| malformed(format!("header column {i} is empty"))))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = rows.map(parse_row).collect::<Result<Vec<_>, _>>()?;
        if rows.is_empty() {
            return Err(CensusError::NoDataFound {
                url: url.to_string(),
            });
        }

        Ok(Self { header, rows })
    }

    /// The row matching the query: the last data row.
    #[must_use]
    pub fn data_row(&self) -> Option<&RawRow> {
        self.rows.last()
    }

    /// Data rows with exactly `width` cells, all present, as owned strings.
    /// Other rows are skipped.
    #[must_use]
    pub fn complete_rows(&self, width: usize) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .filter(|row| row.len() == width)
            .filter_map(|row| row.iter().cloned().collect::<Option<Vec<_>>>())
            .collect()
    }
}

/// Parses a profile response and decodes its data row for `category`.
///
/// # Errors
///
/// Returns [`CensusError`] if the table is malformed or empty, a
/// requested variable is missing from the header, or the projected row
/// does not decode.
pub fn profile_record(
    body: &Value,
    url: &str,
    category: Category,
    variables: &[&str],
) -> Result<ProfileRecord, CensusError> {
    let table = ResponseTable::parse(body, url)?;
    let row = table.data_row().ok_or_else(|| CensusError::NoDataFound {
        url: url.to_string(),
    })?;
    let projected = project_row(&table.header, row, category, variables)?;
    Ok(ProfileRecord::decode(category, &projected)?)
}

/// Reduces a data row to `variables` in request order followed by one
/// geography echo cell: the `state` column when present, otherwise the
/// last non-variable column.
///
/// # Errors
///
/// * [`CensusError::Decode`] if the row and header widths differ or a
///   variable is missing from the header. `actual` counts the row's cells
///   with surplus echo columns removed, so it compares directly against
///   `variables + 1`.
/// * [`CensusError::Malformed`] if there is no echo column.
pub fn project_row(
    header: &[String],
    row: &RawRow,
    category: Category,
    variables: &[&str],
) -> Result<RawRow, CensusError> {
    let echo_columns = header
        .iter()
        .filter(|column| !variables.contains(&column.as_str()))
        .count();
    let width_error = || DecodeError {
        category,
        expected: variables.len() + 1,
        actual: row.len().saturating_sub(echo_columns.saturating_sub(1)),
    };

    if header.len() != row.len() {
        log::warn!(
            "{category} response header has {} columns but data row has {}",
            header.len(),
            row.len()
        );
        return Err(width_error().into());
    }

    let mut projected = Vec::with_capacity(variables.len() + 1);
    for variable in variables {
        let Some(index) = header.iter().position(|column| column == variable) else {
            log::warn!("{category} variable {variable} missing from response header");
            return Err(width_error().into());
        };
        projected.push(row[index].clone());
    }

    let echo = header
        .iter()
        .position(|column| column == STATE_COLUMN && !variables.contains(&STATE_COLUMN))
        .or_else(|| header.iter().rposition(|column| !variables.contains(&column.as_str())))
        .ok_or_else(|| malformed("response has no geography column".to_string()))?;
    projected.push(row[echo].clone());

    Ok(projected)
}

/// Normalizes one cell: nulls, empty strings and sentinels become `None`.
#[must_use]
pub fn normalize_cell(cell: Option<&str>) -> Option<String> {
    let value = cell?.trim();
    if value.is_empty() || SENTINEL_VALUES.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_row(row: &Value) -> Result<RawRow, CensusError> {
    let Value::Array(cells) = row else {
        return Err(malformed(format!("expected a row array, got {}", kind_of(row))));
    };

    cells
        .iter()
        .map(|cell| match cell {
            Value::Null => Ok(None),
            Value::String(s) => Ok(normalize_cell(Some(s.as_str()))),
            Value::Number(n) => Ok(normalize_cell(Some(n.to_string().as_str()))),
            other => Err(malformed(format!("unexpected cell {}", kind_of(other)))),
        })
        .collect()
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn malformed(message: String) -> CensusError {
    CensusError::Malformed { message }
}

#[cfg(test)]
mod tests {
    use censusly_profile_models::variables::variable_codes;
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    const URL: &str = "https://api.census.gov/data/2023/acs/acs5/profile";

    fn overview_body(echo_header: &[&str], echo_cells: &[&str]) -> Value {
        let codes = variable_codes(Category::Overview);
        let mut header: Vec<Value> = codes.iter().map(|c| json!(c)).collect();
        header.extend(echo_header.iter().map(|c| json!(c)));
        let mut row: Vec<Value> = (0..codes.len()).map(|i| json!(format!("{}", i * 10))).collect();
        row.extend(echo_cells.iter().map(|c| json!(c)));
        json!([header, row])
    }

    #[test]
    fn sentinels_and_blanks_become_none() {
        assert_eq!(normalize_cell(Some("-666666666")), None);
        assert_eq!(normalize_cell(Some("-222222222")), None);
        assert_eq!(normalize_cell(Some("  ")), None);
        assert_eq!(normalize_cell(None), None);
        assert_eq!(normalize_cell(Some("-5.2")), Some("-5.2".to_string()));
    }

    #[test]
    fn header_only_is_no_data() {
        let err = ResponseTable::parse(&json!([["NAME", "state"]]), URL).unwrap_err();
        assert!(matches!(err, CensusError::NoDataFound { .. }));
        let err = ResponseTable::parse(&json!([]), URL).unwrap_err();
        assert!(matches!(err, CensusError::NoDataFound { .. }));
    }

    #[test]
    fn non_table_bodies_are_malformed() {
        assert!(matches!(
            ResponseTable::parse(&json!({"error": "x"}), URL),
            Err(CensusError::Malformed { .. })
        ));
        assert!(matches!(
            ResponseTable::parse(&json!([["a"], [true]]), URL),
            Err(CensusError::Malformed { .. })
        ));
    }

    #[test]
    fn state_echo_is_used_for_county_rows() {
        let body = overview_body(&["state", "county"], &["06", "037"]);
        let record = profile_record(&body, URL, Category::Overview, &variable_codes(Category::Overview))
            .unwrap();
        assert_eq!(record.state_fips(), Some("06"));
        assert_eq!(record.value("total_population"), Some("0"));
        assert_eq!(record.value("median_gross_rent"), Some("130"));
    }

    #[test]
    fn last_echo_is_used_without_state_column() {
        let body = overview_body(&["zip code tabulation area"], &["94103"]);
        let record = profile_record(&body, URL, Category::Overview, &variable_codes(Category::Overview))
            .unwrap();
        assert_eq!(record.state_fips(), Some("94103"));

        let body = overview_body(&["us"], &["1"]);
        let record = profile_record(&body, URL, Category::Overview, &variable_codes(Category::Overview))
            .unwrap();
        assert_eq!(record.state_fips(), Some("1"));
    }

    #[test]
    fn projection_follows_request_order_not_header_order() {
        let header = vec!["B".to_string(), "A".to_string(), "state".to_string()];
        let row = vec![Some("b".to_string()), Some("a".to_string()), Some("06".to_string())];
        let projected = project_row(&header, &row, Category::Overview, &["A", "B"]).unwrap();
        assert_eq!(
            projected,
            vec![Some("a".to_string()), Some("b".to_string()), Some("06".to_string())]
        );
    }

    #[test]
    fn body_one_variable_short_is_decode_error() {
        let codes = variable_codes(Category::Overview);
        let short = &codes[..codes.len() - 1];
        let mut header: Vec<Value> = short.iter().map(|c| json!(c)).collect();
        header.push(json!("state"));
        let mut row: Vec<Value> = short.iter().map(|_| json!("1")).collect();
        row.push(json!("06"));
        let body = json!([header, row]);

        let err = profile_record(&body, URL, Category::Overview, &codes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        match err {
            CensusError::Decode(e) => {
                assert_eq!(e.expected, codes.len() + 1);
                assert_eq!(e.actual, codes.len());
            }
            other => panic!("expected a decode error, got {other:?}"),
        }
    }

    #[test]
    fn ragged_row_is_decode_error() {
        let codes = variable_codes(Category::Overview);
        let mut header: Vec<Value> = codes.iter().map(|c| json!(c)).collect();
        header.push(json!("state"));
        let row: Vec<Value> = codes.iter().map(|_| json!("1")).collect();
        let body = json!([header, row]);

        let err = profile_record(&body, URL, Category::Overview, &codes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        assert!(matches!(
            err,
            CensusError::Decode(DecodeError { expected, actual, .. })
                if expected == codes.len() + 1 && actual == codes.len()
        ));
    }

    #[test]
    fn county_rows_with_two_echo_columns_count_as_one() {
        let header = vec!["A".to_string(), "state".to_string(), "county".to_string()];
        let row = vec![Some("a".to_string()), Some("17".to_string())];
        let err = project_row(&header, &row, Category::Overview, &["A", "B"]).unwrap_err();
        assert!(matches!(
            err,
            CensusError::Decode(DecodeError {
                expected: 3,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn sentinel_cells_decode_as_unset() {
        let codes = variable_codes(Category::Overview);
        let mut header: Vec<Value> = codes.iter().map(|c| json!(c)).collect();
        header.push(json!("state"));
        let mut row: Vec<Value> = vec![json!("-666666666"), Value::Null];
        row.extend((2..codes.len()).map(|_| json!("1")));
        row.push(json!("17"));
        let body = json!([header, row]);

        let record = profile_record(&body, URL, Category::Overview, &codes).unwrap();
        assert_eq!(record.value("total_population"), None);
        assert_eq!(record.value("median_age"), None);
        assert_eq!(record.value("poverty_p"), Some("1"));
    }

    #[test]
    fn complete_rows_skip_short_and_null_rows() {
        let body = json!([
            ["NAME", "state", "place"],
            ["Chicago city, Illinois", "17", "14000"],
            ["Broken"],
            ["Nowhere CDP, Illinois", null, "99999"],
            ["Peoria city, Illinois", "17", "59000"]
        ]);
        let table = ResponseTable::parse(&body, URL).unwrap();
        let rows = table.complete_rows(3);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][2], "59000");
    }
}
