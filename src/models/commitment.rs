// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Meal commitment model - the only persisted scheduling fact.

use crate::time_utils::DateRepr;
use serde::{Deserialize, Serialize};

/// Status of a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentStatus {
    /// Default on creation
    Confirmed,
    /// Reserved for a future multi-step confirmation flow. Nothing in the
    /// current signup path produces it, but stored records carrying it still
    /// occupy their slot.
    Pending,
    /// Terminal; the record is retained but frees its (team, date) pair
    Cancelled,
    /// Terminal; stamped after the date passes (managed externally)
    Completed,
}

impl CommitmentStatus {
    /// Whether a commitment with this status occupies its (team, date) slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, CommitmentStatus::Cancelled)
    }
}

/// A meal signup for one team on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commitment {
    /// Document ID (UUID v4)
    pub id: String,
    /// ID of the signed-in user who committed
    pub user_id: String,
    /// Contact snapshot captured at signup time, not live-joined
    pub contact_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Team the meal is for
    pub team_id: String,
    /// Calendar date of the meal
    pub date: DateRepr,
    /// Weekday label at signup time (display only)
    pub weekday: String,
    /// Expected number of attendees
    pub attendee_count: u32,
    pub status: CommitmentStatus,
    /// Preferred contact method ("email", "phone", "text")
    pub contact_preference: Option<String>,
    /// Free-text notes from the signer-upper
    pub notes: Option<String>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

/// Claim document enforcing at most one active commitment per (team, date).
///
/// Keyed by [`crate::time_utils::slot_key`]; written in the same transaction
/// as its commitment and deleted when that commitment is cancelled. Firestore
/// has no unique indexes, so the deterministic document ID is the store's
/// uniqueness primitive. The calendar read path never touches claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotClaim {
    pub commitment_id: String,
    pub team_id: String,
    /// Canonical "YYYY-MM-DD" date
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_occupies_slot() {
        assert!(CommitmentStatus::Confirmed.occupies_slot());
        assert!(CommitmentStatus::Pending.occupies_slot());
        assert!(CommitmentStatus::Completed.occupies_slot());
        assert!(!CommitmentStatus::Cancelled.occupies_slot());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CommitmentStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
        let parsed: CommitmentStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, CommitmentStatus::Cancelled);
    }
}
