// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Commitment lifecycle service: create, modify, cancel.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Commitment, CommitmentStatus, Team};
use crate::time_utils::{format_utc_rfc3339, weekday_name, DateRepr};
use chrono::NaiveDate;

/// Input for creating a commitment.
///
/// Identity comes from the authenticated caller, never from the body.
#[derive(Debug, Clone)]
pub struct NewCommitment {
    pub team_id: String,
    pub date: NaiveDate,
    pub attendee_count: u32,
    pub contact_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_preference: Option<String>,
    pub notes: Option<String>,
}

/// Fields the owning user may change after creation.
///
/// Team, date, and owner are immutable; moving a meal to another date is
/// cancel-then-recreate, which keeps the uniqueness invariant without a
/// second availability check mid-update.
#[derive(Debug, Clone, Default)]
pub struct CommitmentUpdate {
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_preference: Option<String>,
    pub notes: Option<String>,
    pub attendee_count: Option<u32>,
}

/// Write-side service for the commitment lifecycle.
#[derive(Clone)]
pub struct CommitmentService {
    db: FirestoreDb,
}

impl CommitmentService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Create a commitment for a virtual slot.
    ///
    /// Availability is re-derived against the authoritative store at write
    /// time rather than trusting whatever calendar the client rendered
    /// moments earlier, and the insert itself is a conditional write: the
    /// second of two racing signups gets `SlotUnavailable`, never a silent
    /// overwrite.
    pub async fn create(&self, user: &AuthUser, input: NewCommitment) -> Result<Commitment> {
        let team = self
            .db
            .get_team(&input.team_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", input.team_id)))?;

        ensure_team_hosts_on(&team, input.date)?;

        // Fast-path existence check. The transactional insert below is the
        // authoritative one; this just fails the common case cheaply.
        if self
            .db
            .get_slot_claim(&input.team_id, input.date)
            .await?
            .is_some()
        {
            return Err(AppError::SlotUnavailable);
        }

        let now = format_utc_rfc3339(chrono::Utc::now());
        let commitment = Commitment {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.user_id.clone(),
            contact_name: input.contact_name,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
            team_id: input.team_id,
            date: DateRepr::from_date(input.date),
            weekday: weekday_name(input.date).to_string(),
            attendee_count: input.attendee_count,
            status: CommitmentStatus::Confirmed,
            contact_preference: input.contact_preference,
            notes: input.notes,
            created_at: now.clone(),
            updated_at: now,
        };

        self.db
            .insert_commitment_claiming_slot(&commitment, input.date)
            .await?;

        tracing::info!(
            commitment_id = %commitment.id,
            team_id = %commitment.team_id,
            date = %input.date,
            "Commitment created"
        );

        Ok(commitment)
    }

    /// Update contact fields, notes, or attendee count on a commitment.
    pub async fn modify(
        &self,
        user: &AuthUser,
        id: &str,
        update: CommitmentUpdate,
    ) -> Result<Commitment> {
        let mut commitment = self.fetch_owned(user, id).await?;

        // A cancelled commitment is logically gone from the calendar; the
        // retained record is history, not something to edit.
        if commitment.status == CommitmentStatus::Cancelled {
            return Err(AppError::NotFound(format!("Commitment {} not found", id)));
        }

        if let Some(name) = update.contact_name {
            commitment.contact_name = name;
        }
        if let Some(email) = update.contact_email {
            commitment.contact_email = Some(email);
        }
        if let Some(phone) = update.contact_phone {
            commitment.contact_phone = Some(phone);
        }
        if let Some(preference) = update.contact_preference {
            commitment.contact_preference = Some(preference);
        }
        if let Some(notes) = update.notes {
            commitment.notes = Some(notes);
        }
        if let Some(count) = update.attendee_count {
            commitment.attendee_count = count;
        }
        commitment.updated_at = format_utc_rfc3339(chrono::Utc::now());

        self.db.update_commitment(&commitment).await?;

        tracing::info!(commitment_id = %id, "Commitment updated");

        Ok(commitment)
    }

    /// Cancel a commitment, freeing its (team, date) slot.
    ///
    /// The record is retained with `cancelled` status; the slot claim is
    /// removed in the same transaction, so the next calendar read shows the
    /// slot as available without any compensating slot write. Cancelling an
    /// already-cancelled commitment is a no-op.
    pub async fn cancel(&self, user: &AuthUser, id: &str) -> Result<()> {
        let mut commitment = self.fetch_owned(user, id).await?;

        if commitment.status == CommitmentStatus::Cancelled {
            return Ok(());
        }

        commitment.status = CommitmentStatus::Cancelled;
        commitment.updated_at = format_utc_rfc3339(chrono::Utc::now());

        self.db.cancel_commitment_releasing_slot(&commitment).await?;

        tracing::info!(
            commitment_id = %id,
            team_id = %commitment.team_id,
            "Commitment cancelled"
        );

        Ok(())
    }

    /// Commitments the calling user has made, most recent date first.
    pub async fn for_user(&self, user: &AuthUser) -> Result<Vec<Commitment>> {
        self.db.get_commitments_for_user(&user.user_id).await
    }

    async fn fetch_owned(&self, user: &AuthUser, id: &str) -> Result<Commitment> {
        let commitment = self
            .db
            .get_commitment(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Commitment {} not found", id)))?;
        ensure_owner(user, &commitment)?;
        Ok(commitment)
    }
}

/// A signup date must land on one of the team's hosting weekdays; a
/// client-supplied date is never trusted blindly, even though the calendar
/// UI only offers valid slots. Note this checks the team's *current*
/// schedule: commitments that predate a schedule edit are grandfathered and
/// never re-validated here.
fn ensure_team_hosts_on(team: &Team, date: NaiveDate) -> Result<()> {
    if !team.active || !team.hosts_on(date) {
        return Err(AppError::SlotUnavailable);
    }
    Ok(())
}

/// Only the owning user or an administrator may mutate a commitment.
fn ensure_owner(user: &AuthUser, commitment: &Commitment) -> Result<()> {
    if user.admin || user.user_id == commitment.user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
