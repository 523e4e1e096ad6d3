//! # Domain Value Objects
//!
//! Small immutable values normalized out of the portal's Indonesian-formatted
//! text: calendar dates and rupiah amounts.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Indonesian month name to English month name
static MONTHS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Januari", "January"),
        ("Februari", "February"),
        ("Maret", "March"),
        ("April", "April"),
        ("Mei", "May"),
        ("Juni", "June"),
        ("Juli", "July"),
        ("Agustus", "August"),
        ("September", "September"),
        ("Oktober", "October"),
        ("November", "November"),
        ("Desember", "December"),
    ])
});

/// Calendar date as published on an announcement page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Date {
    pub year: i32,
    /// English month name
    pub month: String,
    pub month_int: u32,
    pub day: u32,
}

impl Date {
    /// Parse a `DD <Indonesian month> YYYY` string, e.g. `17 Januari 2022`.
    ///
    /// The input is trimmed and split on whitespace; the month token is
    /// translated to English before parsing. Returns `None` on any failure.
    pub fn parse_indonesian(raw: &str) -> Option<Self> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let [day, month, year] = tokens.as_slice() else {
            return None;
        };

        let month = MONTHS.get(*month)?;
        let parsed = NaiveDate::parse_from_str(&format!("{day} {month} {year}"), "%d %B %Y").ok()?;
        Some(Self::from(parsed))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.format("%B").to_string(),
            month_int: date.month(),
            day: date.day(),
        }
    }
}

/// English name for an Indonesian month name
pub fn english_month(indonesian: &str) -> Option<&'static str> {
    MONTHS.get(indonesian).copied()
}

/// Parse a rupiah amount such as `Rp 1.234.567,89`.
///
/// Thousands separators (`.`) are removed, the decimal comma becomes a dot
/// and the `Rp ` prefix is dropped before parsing.
pub fn parse_rupiah(raw: &str) -> Option<f64> {
    let normalized = raw.replace('.', "").replace(',', ".").replace("Rp ", "");
    normalized.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_indonesian_date() {
        let date = Date::parse_indonesian("17 Januari 2022").unwrap();
        assert_eq!(
            date,
            Date {
                year: 2022,
                month: "January".to_string(),
                month_int: 1,
                day: 17,
            }
        );
    }

    #[rstest]
    #[case("")]
    #[case("17 January 2022")]
    #[case("31 Februari 2022")]
    #[case("17 Januari")]
    #[case("Senin, 17 Januari 2022")]
    fn test_unparseable_dates(#[case] raw: &str) {
        assert_eq!(Date::parse_indonesian(raw), None);
    }

    #[test]
    fn test_date_tolerates_padding() {
        let date = Date::parse_indonesian("  05 Desember 2021 ").unwrap();
        assert_eq!((date.year, date.month_int, date.day), (2021, 12, 5));
        assert_eq!(date.month, "December");
    }

    #[test]
    fn test_month_table_is_complete() {
        let english: Vec<&str> = [
            "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus",
            "September", "Oktober", "November", "Desember",
        ]
        .into_iter()
        .filter_map(english_month)
        .collect();
        assert_eq!(english.len(), 12);
        assert_eq!(english[4], "May");
    }

    #[rstest]
    #[case("Rp 1.234.567,89", Some(1_234_567.89))]
    #[case("Rp 500.000,00", Some(500_000.0))]
    #[case("750000", Some(750_000.0))]
    #[case("Rp -", None)]
    #[case("", None)]
    fn test_parse_rupiah(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_rupiah(raw), expected);
    }
}
