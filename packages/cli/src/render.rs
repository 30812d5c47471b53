//! Plain-text tables for the terminal.

use censusly_fetch::CategoryView;
use censusly_geography_models::{Location, fips};
use censusly_profile_models::{format_value, variables::fields};

/// Shown for a year whose record has not arrived.
const MISSING: &str = "-";

/// Short label for a location, used in column headers.
#[must_use]
pub fn location_label(location: &Location) -> String {
    let state = |code: &str| fips::state_abbr(code).map_or_else(|| code.to_string(), str::to_string);
    let level = location.level().label();
    match location {
        Location::Nation => level.to_string(),
        Location::State { fips } => state(fips),
        Location::County { fips, state_fips } | Location::City { fips, state_fips } => {
            format!("{level} {fips}, {}", state(state_fips))
        }
        Location::Zip { code } => format!("{level} {code}"),
    }
}

/// Renders rows as left-aligned columns separated by two spaces, with a
/// rule under the header.
#[must_use]
pub fn table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(header);
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

/// Renders one category as a metric table: for each location, the
/// latest year followed by the selected historical years, newest first.
#[must_use]
pub fn profile(latest_year: u16, views: &[&CategoryView]) -> String {
    let Some(first) = views.first() else {
        return String::new();
    };
    let specs = fields(first.category);

    let mut header = vec!["Metric".to_string()];
    let mut columns = Vec::new();
    for view in views {
        let label = location_label(&view.location);
        header.push(format!("{label} {latest_year}"));
        columns.push(view.latest.as_ref());
        for year in view.years_desc() {
            header.push(format!("{label} {year}"));
            columns.push(view.historical.get(&year));
        }
    }

    let rows: Vec<Vec<String>> = specs
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            std::iter::once(spec.label.to_string())
                .chain(columns.iter().map(|record| {
                    record.map_or_else(
                        || MISSING.to_string(),
                        |record| {
                            let raw = record.entries().get(index).and_then(|(_, value)| *value);
                            format_value(raw, spec.format)
                        },
                    )
                }))
                .collect()
        })
        .collect();

    let mut out = table(&header, &rows);
    for view in views {
        let label = location_label(&view.location);
        if let Some(failure) = &view.error {
            out.push_str(&format!("{label}: {failure}\n"));
        }
        for (year, failure) in &view.year_errors {
            out.push_str(&format!("{label} {year}: {failure}\n"));
        }
    }
    out
}
