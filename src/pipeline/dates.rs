//! Date normalization — an ordered cascade of parse strategies.
//!
//! Strategies run in sequence, first success wins. Results that carry an
//! offset are converted to the local zone; naive results pass through
//! untouched, so callers see a mix of both ([`PointInTime`] keeps the two
//! apart). Nothing here returns an error: unparseable input, malformed
//! components and overflowing values all collapse to `None`.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::pipeline::types::PointInTime;

/// One parsing strategy in the cascade.
type Strategy = fn(&str) -> Option<PointInTime>;

/// Offset-carrying formats, tried before the naive ones.
const AWARE_FORMATS: [&str; 4] = [
    "%d %b %Y %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%d %b %Y %H:%M %z",
];

/// Naive date-time formats.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Naive date-only formats; midnight is assumed.
const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d %b %Y"];

/// Day-first slash formats for `d/m/y` style text. `%d/%m/%y` runs before
/// `%d/%m/%Y` — chrono's `%Y` would happily read a two-digit year as year
/// 24, while `%y` fails cleanly on four-digit input (trailing digits).
const DAY_FIRST_DATETIME_FORMATS: [&str; 2] = ["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];
const DAY_FIRST_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%y", "%d/%m/%Y"];

/// Ordered date-parsing cascade.
#[derive(Clone)]
pub struct DateNormalizer {
    strategies: &'static [Strategy],
}

impl DateNormalizer {
    const HEADER: &'static [Strategy] = &[
        parse_rfc2822,
        parse_rfc3339,
        parse_explicit,
        parse_free_text,
    ];

    const DAY_FIRST: &'static [Strategy] = &[
        parse_day_first,
        parse_rfc2822,
        parse_rfc3339,
        parse_explicit,
        parse_free_text,
    ];

    /// Cascade for header-style values: RFC 2822 first, then the general
    /// free-text grammars.
    pub fn header() -> Self {
        Self {
            strategies: Self::HEADER,
        }
    }

    /// Cascade that prefers day-first `d/m/y` readings, used for
    /// everything due-date related (`10/05/2024` is 10 May, not 5 Oct).
    pub fn day_first() -> Self {
        Self {
            strategies: Self::DAY_FIRST,
        }
    }

    /// First strategy to produce a value wins; `None` if none does.
    pub fn normalize(&self, value: &str) -> Option<PointInTime> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        for parse in self.strategies {
            if let Some(instant) = parse(trimmed) {
                return Some(instant);
            }
        }
        debug!(value = trimmed, "no date grammar matched");
        None
    }
}

fn zoned(dt: DateTime<FixedOffset>) -> PointInTime {
    PointInTime::Zoned(dt.with_timezone(&Local))
}

fn parse_rfc2822(value: &str) -> Option<PointInTime> {
    // Servers sometimes append a "(CEST)"-style comment chrono rejects.
    let bare = value.split_at(value.find(" (").unwrap_or(value.len())).0;
    DateTime::parse_from_rfc2822(bare.trim()).ok().map(zoned)
}

fn parse_rfc3339(value: &str) -> Option<PointInTime> {
    DateTime::parse_from_rfc3339(value).ok().map(zoned)
}

fn parse_explicit(value: &str) -> Option<PointInTime> {
    for fmt in AWARE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(zoned(dt));
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(PointInTime::ZoneUnknown(naive));
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Some(naive) = parse_naive_date(value, fmt) {
            return Some(naive);
        }
    }
    None
}

fn parse_day_first(value: &str) -> Option<PointInTime> {
    for fmt in DAY_FIRST_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(PointInTime::ZoneUnknown(naive));
        }
    }
    for fmt in DAY_FIRST_DATE_FORMATS {
        if let Some(naive) = parse_naive_date(value, fmt) {
            return Some(naive);
        }
    }
    None
}

fn parse_naive_date(value: &str, fmt: &str) -> Option<PointInTime> {
    NaiveDate::parse_from_str(value, fmt)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(PointInTime::ZoneUnknown)
}

/// Last resort: the general free-text grammar. Always produces an
/// offset-carrying value when it succeeds.
fn parse_free_text(value: &str) -> Option<PointInTime> {
    dateparser::parse(value)
        .ok()
        .map(|utc| PointInTime::Zoned(utc.with_timezone(&Local)))
}
