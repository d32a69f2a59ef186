// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Merge of candidate dates with the commitment index into virtual slots.

use crate::models::Commitment;
use crate::services::commitment_index::CommitmentIndex;
use crate::services::recurrence::CandidateDate;
use chrono::NaiveDate;
use serde::Serialize;

/// Whether a virtual slot is open for signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Taken,
}

/// A computed signup slot.
///
/// Identity is structural: two virtual slots are the same iff (team_id,
/// date) match. There is no stored slot record anywhere to go stale.
#[derive(Debug, Clone, Serialize)]
pub struct VirtualSlot {
    pub team_id: String,
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub attendee_count: u32,
    pub status: SlotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment: Option<Commitment>,
}

/// Attach matching commitments to candidate dates.
///
/// A pure merge: one O(1) index lookup per candidate, candidate order
/// preserved, neither input mutated. The index must be fully built before
/// this runs - a partial index would report false `available` statuses.
pub fn reconcile(candidates: Vec<CandidateDate>, index: &CommitmentIndex) -> Vec<VirtualSlot> {
    candidates
        .into_iter()
        .map(|candidate| {
            let commitment = index.get(&candidate.team_id, candidate.date).cloned();
            let status = if commitment.is_some() {
                SlotStatus::Taken
            } else {
                SlotStatus::Available
            };
            VirtualSlot {
                team_id: candidate.team_id,
                date: candidate.date,
                weekday: candidate.weekday,
                attendee_count: candidate.attendee_count,
                status,
                commitment,
            }
        })
        .collect()
}
