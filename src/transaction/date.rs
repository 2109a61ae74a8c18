//! Parsing and formatting of transaction dates.
//!
//! Dates travel as `YYYY-MM-DD` strings. Inputs may also be RFC 3339
//! date-times (what a browser's `Date.toJSON` produces), in which case the UTC
//! calendar date is used.

use serde::{Deserialize, Deserializer, Serializer};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, format_description::well_known,
    macros::format_description,
};

use crate::Error;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parse a calendar date or an RFC 3339 date-time.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is neither.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();

    Date::parse(text, DATE_FORMAT)
        .or_else(|_| {
            OffsetDateTime::parse(text, &well_known::Rfc3339)
                .map(|date_time| date_time.to_offset(time::UtcOffset::UTC).date())
        })
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Format `date` as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    // The format description only contains components that every `Date` has.
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Serde adapter for `YYYY-MM-DD` dates, use with `#[serde(with = "...")]`.
pub mod iso_date {
    use super::*;

    /// Serialize `date` as `YYYY-MM-DD`.
    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(*date))
    }

    /// Deserialize a `YYYY-MM-DD` date or an RFC 3339 date-time.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_date(&text).map_err(serde::de::Error::custom)
    }
}
