// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date handling and slot identity.
//!
//! All scheduling comparisons happen at date-only granularity (year, month,
//! day). Candidate expansion, the commitment index, and slot claim document
//! IDs must all derive identity through the routines here; a second
//! implementation of this logic anywhere else is a matching bug waiting to
//! happen.

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Weekday display names indexed by weekday number (0 = Sunday).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Weekday number for a calendar date: 0 = Sunday .. 6 = Saturday.
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Display name for a date's weekday.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[weekday_number(date) as usize]
}

/// Canonical date-only form used for storage and range queries.
///
/// Lexicographic order of this form matches chronological order, which is
/// what makes Firestore range filters on the `date` field correct.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Composite key identifying one (team, date) slot.
///
/// Used both as the commitment index key and as the slot claim document ID,
/// so the read path and the write path can never disagree on slot identity.
pub fn slot_key(team_id: &str, date: NaiveDate) -> String {
    let safe_team = urlencoding::encode(team_id);
    format!("{}_{}", safe_team, format_date(date))
}

/// A commitment date as it arrives from the store.
///
/// Older records were written by clients that stored epoch seconds or full
/// RFC3339 timestamps instead of plain dates. Every representation is
/// funneled through [`DateRepr::to_naive_date`] before any scheduling
/// comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateRepr {
    Epoch(i64),
    Text(String),
}

impl DateRepr {
    /// Canonical representation for newly written records.
    pub fn from_date(date: NaiveDate) -> Self {
        DateRepr::Text(format_date(date))
    }

    /// Normalize to a calendar date, ignoring any time-of-day component.
    ///
    /// RFC3339 timestamps keep the calendar date written in their own offset
    /// rather than being shifted to UTC, so "2024-03-05T23:30:00-07:00" stays
    /// March 5th.
    pub fn to_naive_date(&self) -> Result<NaiveDate, DateParseError> {
        match self {
            DateRepr::Epoch(secs) => DateTime::from_timestamp(*secs, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| DateParseError(format!("epoch seconds out of range: {}", secs))),
            DateRepr::Text(raw) => {
                if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    return Ok(date);
                }
                DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.date_naive())
                    .map_err(|_| DateParseError(format!("unparseable date: {:?}", raw)))
            }
        }
    }
}

/// A stored date that could not be normalized to a calendar date.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct DateParseError(String);
