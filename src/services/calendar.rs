// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar assembly service.
//!
//! Handles the read-side workflow:
//! 1. Load active teams and members
//! 2. Expand each team's hosting pattern into candidate dates
//! 3. Build the commitment index for the window
//! 4. Reconcile candidates against the index
//! 5. Join display data and group slots into a week-aligned day grid

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Member, Team};
use crate::services::commitment_index::CommitmentIndex;
use crate::services::reconcile::{reconcile, VirtualSlot};
use crate::services::recurrence;
use crate::time_utils::{weekday_name, weekday_number};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// Placeholder label for a team whose roster is currently empty. The team
/// still renders, since it may become staffed again.
const NO_ACTIVE_MEMBERS: &str = "No Active Members";

/// One day cell in the calendar grid.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: &'static str,
    /// False for padding days pulled in from adjacent weeks/months.
    pub in_period: bool,
    pub slots: Vec<SlotView>,
}

/// A virtual slot joined with team display data for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    #[serde(flatten)]
    pub slot: VirtualSlot,
    pub area: String,
    pub phone: Option<String>,
    /// Active member names, sorted alphabetically and joined for display.
    pub display_name: String,
    /// Allergies merged across active members, deduplicated and sorted.
    pub allergies: Vec<String>,
    /// Dietary preferences merged across active members.
    pub dietary_preferences: Vec<String>,
}

/// Which teams a calendar read covers.
#[derive(Debug, Clone)]
pub enum TeamScope {
    All,
    Team(String),
}

/// Read-side service composing candidate expansion, the commitment index,
/// reconciliation, and grid assembly.
///
/// Every call re-reads teams, members, and commitments from the store.
#[derive(Clone)]
pub struct CalendarService {
    db: FirestoreDb,
}

impl CalendarService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Assemble the calendar grid for an inclusive period.
    ///
    /// An inverted period yields an empty grid, not an error.
    pub async fn calendar_for_period(
        &self,
        scope: TeamScope,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Vec<CalendarDay>> {
        if period_start > period_end {
            return Ok(Vec::new());
        }

        let teams = match &scope {
            TeamScope::All => self.db.get_active_teams().await?,
            TeamScope::Team(id) => {
                let team = self
                    .db
                    .get_team(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))?;
                if team.active {
                    vec![team]
                } else {
                    Vec::new()
                }
            }
        };

        let (members, records) = futures_util::try_join!(
            self.db.get_active_members(),
            self.db.get_commitments_in_range(period_start, period_end)
        )?;
        let members_by_id: HashMap<&str, &Member> =
            members.iter().map(|m| (m.id.as_str(), m)).collect();

        // The index must be complete before reconciliation starts; merging
        // against a partial index would report taken slots as available.
        let index = CommitmentIndex::build(records, period_start, period_end);

        let mut slots = Vec::new();
        for team in &teams {
            let roster: Vec<&Member> = team
                .member_ids
                .iter()
                .filter_map(|id| members_by_id.get(id.as_str()).copied())
                .collect();

            let candidates = recurrence::expand(team, roster.len(), period_start, period_end);
            for slot in reconcile(candidates, &index) {
                slots.push(make_slot_view(slot, team, &roster));
            }
        }

        tracing::debug!(
            teams = teams.len(),
            commitments = index.len(),
            slots = slots.len(),
            "Assembled calendar slots"
        );

        Ok(assemble_grid(slots, period_start, period_end))
    }
}

/// Join a reconciled slot with its team's display data.
fn make_slot_view(slot: VirtualSlot, team: &Team, roster: &[&Member]) -> SlotView {
    let mut names: Vec<&str> = roster.iter().map(|m| m.name.as_str()).collect();
    names.sort_unstable();
    let display_name = if names.is_empty() {
        NO_ACTIVE_MEMBERS.to_string()
    } else {
        names.join(" & ")
    };

    SlotView {
        slot,
        area: team.area.clone(),
        phone: team.phone.clone(),
        display_name,
        allergies: merged_allergies(roster),
        dietary_preferences: merged_preferences(roster),
    }
}

fn merged_allergies(roster: &[&Member]) -> Vec<String> {
    let mut merged: Vec<String> = roster
        .iter()
        .flat_map(|m| m.allergies.iter().cloned())
        .collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

fn merged_preferences(roster: &[&Member]) -> Vec<String> {
    let mut merged: Vec<String> = roster
        .iter()
        .flat_map(|m| m.dietary_preferences.iter().cloned())
        .collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

/// Group slots into a week-aligned grid.
///
/// The grid runs from the Sunday on or before the period start through the
/// Saturday on or after the period end, so partial weeks at the edges are
/// filled with adjacent-month days marked `in_period: false`. A day with no
/// slots is an empty cell, not an error.
pub fn assemble_grid(
    slots: Vec<SlotView>,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Vec<CalendarDay> {
    if period_start > period_end {
        return Vec::new();
    }

    let grid_start = period_start - Duration::days(weekday_number(period_start) as i64);
    let grid_end = period_end + Duration::days((6 - weekday_number(period_end)) as i64);

    let mut by_date: HashMap<NaiveDate, Vec<SlotView>> = HashMap::new();
    for view in slots {
        by_date.entry(view.slot.date).or_default().push(view);
    }

    grid_start
        .iter_days()
        .take_while(|d| *d <= grid_end)
        .map(|date| CalendarDay {
            date,
            weekday: weekday_name(date),
            in_period: date >= period_start && date <= period_end,
            slots: by_date.remove(&date).unwrap_or_default(),
        })
        .collect()
}
