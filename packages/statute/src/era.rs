//! Japanese era-based date conversion.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::numbering::{parse_number, to_ascii_digits};

/// A Japanese imperial era.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Era {
    /// Romanized name as used in e-Gov `Era` attributes.
    pub name: &'static str,
    /// Name in kanji.
    pub kanji: &'static str,
    /// Gregorian year in which the era's first year falls.
    pub start_year: i32,
}

/// Known eras, oldest first.
pub const ERAS: &[Era] = &[
    Era { name: "Meiji", kanji: "明治", start_year: 1868 },
    Era { name: "Taisho", kanji: "大正", start_year: 1912 },
    Era { name: "Showa", kanji: "昭和", start_year: 1926 },
    Era { name: "Heisei", kanji: "平成", start_year: 1989 },
    Era { name: "Reiwa", kanji: "令和", start_year: 2019 },
];

/// Era date written out in text, e.g. 昭和二十二年五月三日.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ERA_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(明治|大正|昭和|平成|令和)\s*(元|[〇一二三四五六七八九十百0-9]+)\s*年\s*([〇一二三四五六七八九十0-9]+)\s*月\s*([〇一二三四五六七八九十0-9]+)\s*日$",
    )
    .expect("valid regex")
});

/// Look up an era by romanized (case-insensitive, macrons allowed) or kanji name.
#[must_use]
pub fn find_era(name: &str) -> Option<&'static Era> {
    let folded = name.trim().to_lowercase().replace('ō', "o");
    ERAS.iter()
        .find(|era| era.kanji == folded || era.name.to_lowercase() == folded)
}

/// Convert an era date to an ISO `YYYY-MM-DD` string.
///
/// Returns `None` when a component is not numeric, the era is unknown, or
/// the result is not a calendar date. Out-of-range years are unavailable
/// rather than an overflow.
///
/// # Examples
/// ```
/// use roppo_statute::era::era_to_iso;
///
/// assert_eq!(era_to_iso("Showa", "22", "5", "3"), Some("1947-05-03".to_string()));
/// assert_eq!(era_to_iso("Unknown", "22", "5", "3"), None);
/// ```
#[must_use]
pub fn era_to_iso(era: &str, year: &str, month: &str, day: &str) -> Option<String> {
    let era = find_era(era)?;
    let era_year = if year.trim() == "元" {
        1
    } else {
        parse_number(year)?
    };
    if era_year == 0 {
        return None;
    }
    let month = parse_number(month)?;
    let day = parse_number(day)?;

    let year = era
        .start_year
        .checked_add(i32::try_from(era_year).ok()?)?
        .checked_sub(1)?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Normalize a date written as ISO, slash, compact or era text to ISO.
///
/// # Examples
/// ```
/// use roppo_statute::era::normalize_date;
///
/// assert_eq!(normalize_date("1947/05/03"), Some("1947-05-03".to_string()));
/// assert_eq!(normalize_date("昭和二十二年五月三日"), Some("1947-05-03".to_string()));
/// assert_eq!(normalize_date("someday"), None);
/// ```
#[must_use]
pub fn normalize_date(text: &str) -> Option<String> {
    let s = to_ascii_digits(text.trim());
    if s.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(&s, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    let caps = ERA_TEXT.captures(&s)?;
    era_to_iso(&caps[1], &caps[2], &caps[3], &caps[4])
}
