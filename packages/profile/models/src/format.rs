//! Display formatting for raw Data Profile values.
//!
//! Records keep the API's strings untouched; numeric parsing happens only
//! here, when a value is about to be shown.

use serde::{Deserialize, Serialize};

/// How a field's value should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// A count, shown with thousands separators.
    Number,
    /// A dollar amount, rounded to whole dollars.
    Currency,
    /// A percentage already scaled to 0-100.
    Percent,
    /// Any other measure (ages, minutes, sizes), one decimal place.
    Plain,
}

/// Text shown for absent or unparseable values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Parses a raw value as a number. Returns `None` for absent,
/// unparseable, or non-finite values.
#[must_use]
pub fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Formats a raw value for display.
#[must_use]
pub fn format_value(raw: Option<&str>, format: ValueFormat) -> String {
    let Some(value) = parse_numeric(raw) else {
        return NOT_AVAILABLE.to_string();
    };

    match format {
        ValueFormat::Number => {
            let fixed = format!("{:.2}", value.abs());
            let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
            signed(value, &group_thousands(trimmed))
        }
        ValueFormat::Currency => {
            let fixed = format!("{:.0}", value.abs());
            signed(value, &format!("${}", group_thousands(&fixed)))
        }
        ValueFormat::Percent => format!("{value:.1}%"),
        ValueFormat::Plain => format!("{value:.1}"),
    }
}

fn signed(value: f64, magnitude: &str) -> String {
    if value < 0.0 && magnitude.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{magnitude}")
    } else {
        magnitude.to_string()
    }
}

/// Inserts `,` separators into the integer part of an unsigned decimal
/// string (`"1234567.5"` becomes `"1,234,567.5"`).
fn group_thousands(unsigned: &str) -> String {
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_garbage_are_not_available() {
        assert_eq!(format_value(None, ValueFormat::Number), "N/A");
        assert_eq!(format_value(Some("..."), ValueFormat::Percent), "N/A");
        assert_eq!(format_value(Some(""), ValueFormat::Plain), "N/A");
    }

    #[test]
    fn numbers_get_separators() {
        assert_eq!(format_value(Some("3820124"), ValueFormat::Number), "3,820,124");
        assert_eq!(format_value(Some("999"), ValueFormat::Number), "999");
        assert_eq!(format_value(Some("2.53"), ValueFormat::Number), "2.53");
        assert_eq!(format_value(Some("1000.50"), ValueFormat::Number), "1,000.5");
    }

    #[test]
    fn currency_rounds_to_dollars() {
        assert_eq!(format_value(Some("75235"), ValueFormat::Currency), "$75,235");
        assert_eq!(format_value(Some("1234.6"), ValueFormat::Currency), "$1,235");
        assert_eq!(format_value(Some("-50"), ValueFormat::Currency), "-$50");
    }

    #[test]
    fn percent_and_plain_use_one_decimal() {
        assert_eq!(format_value(Some("12.34"), ValueFormat::Percent), "12.3%");
        assert_eq!(format_value(Some("38.5"), ValueFormat::Plain), "38.5");
        assert_eq!(format_value(Some("27"), ValueFormat::Plain), "27.0");
    }

    #[test]
    fn parse_numeric_rejects_non_finite() {
        assert_eq!(parse_numeric(Some(" 42 ")), Some(42.0));
        assert_eq!(parse_numeric(Some("NaN")), None);
        assert_eq!(parse_numeric(Some("inf")), None);
        assert_eq!(parse_numeric(None), None);
    }
}
