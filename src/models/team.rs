// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Companionship team model for storage and API.

use crate::time_utils::weekday_number;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A companionship serving one geographic area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Document ID
    pub id: String,
    /// Area label shown on the calendar (e.g. "Downtown")
    pub area: String,
    /// Shared contact phone for the companionship
    pub phone: Option<String>,
    /// Member document IDs
    #[serde(default)]
    pub member_ids: Vec<String>,
    /// Weekday numbers (0 = Sunday .. 6 = Saturday) the team can host on.
    /// An active team with an empty set simply never appears on the calendar.
    #[serde(default)]
    pub host_weekdays: BTreeSet<u8>,
    /// Inactive teams are excluded from candidate expansion but keep their
    /// historical commitments.
    pub active: bool,
}

impl Team {
    /// Whether this team hosts on the given date's weekday.
    pub fn hosts_on(&self, date: NaiveDate) -> bool {
        self.host_weekdays.contains(&weekday_number(date))
    }
}
