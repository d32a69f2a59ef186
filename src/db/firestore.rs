// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Teams (companionship rosters and hosting patterns)
//! - Members (missionary display data)
//! - Commitments (meal signups)
//! - Slot claims (uniqueness guard for concurrent signups)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Commitment, Member, SlotClaim, Team};
use crate::time_utils::{format_date, slot_key};
use chrono::NaiveDate;

/// Upper bound appended to the end of a date range filter so stored RFC3339
/// timestamps on the final day (e.g. "2024-03-07T18:00:00Z") still match.
/// U+F8FF sorts after any character that appears in a date string.
const RANGE_END_SENTINEL: char = '\u{f8ff}';

/// Placeholder bearer token handed to the emulator, which accepts anything.
/// A static unsigned JWT keeps gcloud-sdk from hunting for real credentials
/// on dev machines.
fn emulator_token() -> gcloud_sdk::Token {
    gcloud_sdk::Token {
        token_type: "Bearer".to_string(),
        token: gcloud_sdk::SecretValue::new(
            "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJtZWFsYm9hcmQifQ."
                .to_string()
                .into(),
        ),
        expiry: chrono::Utc::now() + chrono::Duration::hours(1),
    }
}

/// Firestore database client.
///
/// `client` is `None` in offline test mode; every operation then returns a
/// database error instead of reaching the network.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Connect to the meal calendar's Firestore database.
    ///
    /// When FIRESTORE_EMULATOR_HOST is set (local development and the
    /// emulator-gated integration tests), authentication is bypassed.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        let client = if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            Self::connect_emulator(project_id).await?
        } else {
            Self::connect_cloud(project_id).await?
        };

        Ok(Self {
            client: Some(client),
        })
    }

    async fn connect_cloud(project_id: &str) -> Result<firestore::FirestoreDb, AppError> {
        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Firestore connection failed: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(client)
    }

    /// Unauthenticated connection for the emulator.
    async fn connect_emulator(project_id: &str) -> Result<firestore::FirestoreDb, AppError> {
        let token_source =
            gcloud_sdk::ExternalJwtFunctionSource::new(|| async { Ok(emulator_token()) });

        let client = firestore::FirestoreDb::with_options_token_source(
            firestore::FirestoreDbOptions::new(project_id.to_string()),
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Firestore emulator connection failed: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore emulator (unauthenticated)"
        );

        Ok(client)
    }

    /// Offline client for tests that never touch the store.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Firestore client offline".to_string()))
    }

    // ─── Team Operations ─────────────────────────────────────────

    /// Get all active teams, ordered by area label for stable rendering.
    pub async fn get_active_teams(&self) -> Result<Vec<Team>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TEAMS)
            .filter(|q| q.for_all([q.field("active").eq(true)]))
            .order_by([(
                "area",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a team by ID.
    pub async fn get_team(&self, team_id: &str) -> Result<Option<Team>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TEAMS)
            .obj()
            .one(team_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a team (admin tooling and test seeding).
    pub async fn upsert_team(&self, team: &Team) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::TEAMS)
            .document_id(&team.id)
            .object(team)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Member Operations ───────────────────────────────────────

    /// Get all active members.
    pub async fn get_active_members(&self) -> Result<Vec<Member>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::MEMBERS)
            .filter(|q| q.for_all([q.field("active").eq(true)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a member (admin tooling and test seeding).
    pub async fn upsert_member(&self, member: &Member) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::MEMBERS)
            .document_id(&member.id)
            .object(member)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Commitment Operations ───────────────────────────────────

    /// Get a commitment by ID.
    pub async fn get_commitment(&self, id: &str) -> Result<Option<Commitment>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::COMMITMENTS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all commitments dated within the inclusive window.
    ///
    /// Status filtering happens at the index-build layer, not here, so
    /// cancelled records stay visible to any caller that wants history.
    /// The end bound carries a sentinel suffix so legacy records that stored
    /// a full timestamp on the final day are still returned.
    pub async fn get_commitments_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Commitment>, AppError> {
        let start_bound = format_date(start);
        let end_bound = format!("{}{}", format_date(end), RANGE_END_SENTINEL);

        self.get_client()?
            .fluent()
            .select()
            .from(collections::COMMITMENTS)
            .filter(move |q| {
                q.for_all([
                    q.field("date").greater_than_or_equal(start_bound.clone()),
                    q.field("date").less_than_or_equal(end_bound.clone()),
                ])
            })
            .order_by([(
                "date",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all commitments made by one user, most recent date first.
    pub async fn get_commitments_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Commitment>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::COMMITMENTS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .order_by([(
                "date",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a full commitment record (post-creation field updates).
    pub async fn update_commitment(&self, commitment: &Commitment) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COMMITMENTS)
            .document_id(&commitment.id)
            .object(commitment)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Slot Claim Operations ───────────────────────────────────

    /// Look up the claim for a (team, date) slot, if any.
    ///
    /// Presence of a claim means an active commitment holds the slot; claims
    /// are deleted in the same transaction that cancels their commitment.
    pub async fn get_slot_claim(
        &self,
        team_id: &str,
        date: NaiveDate,
    ) -> Result<Option<SlotClaim>, AppError> {
        self.get_slot_claim_by_key(&slot_key(team_id, date)).await
    }

    async fn get_slot_claim_by_key(&self, key: &str) -> Result<Option<SlotClaim>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SLOT_CLAIMS)
            .obj()
            .one(key)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Atomic Signup Operations ────────────────────────────────

    /// Atomically store a new commitment and claim its (team, date) slot.
    ///
    /// This method uses a Firestore transaction so the claim and the
    /// commitment are written together or not at all. Reading the claim
    /// first registers it for conflict detection: if another request claims
    /// the same slot concurrently, this commit fails instead of silently
    /// overwriting the winner, and the loser gets `SlotUnavailable`.
    pub async fn insert_commitment_claiming_slot(
        &self,
        commitment: &Commitment,
        date: NaiveDate,
    ) -> Result<(), AppError> {
        let key = slot_key(&commitment.team_id, date);

        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // 1. Read the claim within the transaction to register it for
        //    conflict detection
        let existing: Option<SlotClaim> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SLOT_CLAIMS)
            .obj()
            .one(&key)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read slot claim in transaction: {}", e))
            })?;

        // 2. Already claimed - the slot is taken, roll back without writing
        if existing.is_some() {
            let _ = transaction.rollback().await;
            return Err(AppError::SlotUnavailable);
        }

        let claim = SlotClaim {
            commitment_id: commitment.id.clone(),
            team_id: commitment.team_id.clone(),
            date: format_date(date),
        };

        // 3. Add claim write to transaction
        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::SLOT_CLAIMS)
            .document_id(&key)
            .object(&claim)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add slot claim to transaction: {}", e))
            })?;

        // 4. Add commitment write to transaction
        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::COMMITMENTS)
            .document_id(&commitment.id)
            .object(commitment)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add commitment to transaction: {}", e))
            })?;

        // 5. Commit atomically. A concurrent signup for the same slot makes
        //    the commit fail; re-check the claim so the loser sees
        //    SlotUnavailable rather than a generic database error.
        if let Err(commit_err) = transaction.commit().await {
            let now_claimed = self
                .get_slot_claim_by_key(&key)
                .await
                .unwrap_or(None)
                .is_some();
            if now_claimed {
                tracing::info!(slot = %key, "Lost signup race for slot");
                return Err(AppError::SlotUnavailable);
            }
            return Err(AppError::Database(format!(
                "Transaction commit failed: {}",
                commit_err
            )));
        }

        tracing::info!(
            commitment_id = %commitment.id,
            slot = %key,
            "Commitment stored and slot claimed"
        );

        Ok(())
    }

    /// Atomically store a cancelled commitment and release its slot claim.
    ///
    /// The commitment record is retained (history/audit); only the claim is
    /// deleted, which is what frees the (team, date) pair for the next
    /// signup. If the stored date cannot be normalized the status update
    /// still happens and the stray claim, if any, is logged.
    pub async fn cancel_commitment_releasing_slot(
        &self,
        commitment: &Commitment,
    ) -> Result<(), AppError> {
        let date = match commitment.date.to_naive_date() {
            Ok(date) => date,
            Err(err) => {
                tracing::warn!(
                    commitment_id = %commitment.id,
                    error = %err,
                    "Cancelling commitment with unparseable date; slot claim not released"
                );
                return self.update_commitment(commitment).await;
            }
        };
        let key = slot_key(&commitment.team_id, date);

        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::COMMITMENTS)
            .document_id(&commitment.id)
            .object(commitment)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add commitment to transaction: {}", e))
            })?;

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SLOT_CLAIMS)
            .document_id(&key)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add claim deletion to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            commitment_id = %commitment.id,
            slot = %key,
            "Commitment cancelled and slot released"
        );

        Ok(())
    }
}
