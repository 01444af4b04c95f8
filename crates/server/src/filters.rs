//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{Datelike, NaiveDate};

use crate::models::FORM_DATE_FORMAT;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Utc::now().year())
}

/// Renders a `yyyy-MM-dd` date (or order-history key) as `Dec 17, 2023`.
///
/// Keys that are not dates are shown unchanged.
///
/// Usage in templates: `{{ date|long_date }}`
#[askama::filter_fn]
pub fn long_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_long_date(&value.to_string()))
}

fn format_long_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), FORM_DATE_FORMAT)
        .map_or_else(|_| raw.to_string(), |date| date.format("%b %-d, %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_date_formats_iso_dates() {
        assert_eq!(format_long_date("2023-12-17"), "Dec 17, 2023");
        assert_eq!(format_long_date("1840-01-01"), "Jan 1, 1840");
    }

    #[test]
    fn test_long_date_keeps_other_keys() {
        assert_eq!(format_long_date("week 51"), "week 51");
    }
}
