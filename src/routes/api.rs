// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Commitment;
use crate::services::calendar::{CalendarDay, TeamScope};
use crate::services::signup::{CommitmentUpdate, NewCommitment};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Longest period a single calendar request may cover.
const MAX_PERIOD_DAYS: i64 = 366;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/calendar", get(get_calendar))
        .route(
            "/api/commitments",
            get(get_my_commitments).post(create_commitment),
        )
        .route(
            "/api/commitments/{id}",
            patch(modify_commitment).delete(cancel_commitment),
        )
}

fn parse_date(raw: &str, param: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        crate::error::AppError::BadRequest(format!(
            "Invalid '{}' parameter: must be a YYYY-MM-DD date",
            param
        ))
    })
}

// ─── Calendar ────────────────────────────────────────────────

#[derive(Deserialize)]
struct CalendarQuery {
    /// First day of the period (YYYY-MM-DD, inclusive)
    start: String,
    /// Last day of the period (YYYY-MM-DD, inclusive)
    end: String,
    /// Restrict to a single team
    team: Option<String>,
}

/// Calendar response.
#[derive(Serialize)]
pub struct CalendarResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<CalendarDay>,
}

/// Get the meal calendar grid for a period.
async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>> {
    let start = parse_date(&params.start, "start")?;
    let end = parse_date(&params.end, "end")?;

    if (end - start).num_days() > MAX_PERIOD_DAYS {
        return Err(crate::error::AppError::BadRequest(format!(
            "Period too long: at most {} days per request",
            MAX_PERIOD_DAYS
        )));
    }

    let scope = match params.team {
        Some(id) => TeamScope::Team(id),
        None => TeamScope::All,
    };

    tracing::debug!(start = %start, end = %end, scope = ?scope, "Fetching calendar");

    let days = state
        .calendar_service
        .calendar_for_period(scope, start, end)
        .await?;

    Ok(Json(CalendarResponse { start, end, days }))
}

// ─── Commitments ─────────────────────────────────────────────

/// Commitment as returned by the API. The stored date is normalized to a
/// canonical YYYY-MM-DD string regardless of its wire representation.
#[derive(Serialize)]
pub struct CommitmentResponse {
    pub id: String,
    pub team_id: String,
    pub date: String,
    pub weekday: String,
    pub attendee_count: u32,
    pub status: crate::models::CommitmentStatus,
    pub contact_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_preference: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Commitment> for CommitmentResponse {
    fn from(c: Commitment) -> Self {
        let date = match c.date.to_naive_date() {
            Ok(d) => crate::time_utils::format_date(d),
            Err(_) => match &c.date {
                crate::time_utils::DateRepr::Text(raw) => raw.clone(),
                crate::time_utils::DateRepr::Epoch(secs) => secs.to_string(),
            },
        };
        Self {
            id: c.id,
            team_id: c.team_id,
            date,
            weekday: c.weekday,
            attendee_count: c.attendee_count,
            status: c.status,
            contact_name: c.contact_name,
            contact_email: c.contact_email,
            contact_phone: c.contact_phone,
            contact_preference: c.contact_preference,
            notes: c.notes,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct MyCommitmentsResponse {
    pub commitments: Vec<CommitmentResponse>,
    pub total: u32,
}

/// Get the calling user's commitments, most recent date first.
async fn get_my_commitments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MyCommitmentsResponse>> {
    let commitments = state.commitment_service.for_user(&user).await?;

    let commitments: Vec<CommitmentResponse> =
        commitments.into_iter().map(CommitmentResponse::from).collect();
    let total = commitments.len() as u32;

    Ok(Json(MyCommitmentsResponse { commitments, total }))
}

#[derive(Deserialize, Validate)]
struct CreateCommitmentRequest {
    #[validate(length(min = 1, max = 100))]
    team_id: String,
    /// Meal date (YYYY-MM-DD)
    date: String,
    #[validate(range(min = 1, max = 50))]
    attendee_count: u32,
    #[validate(length(min = 1, max = 100))]
    contact_name: String,
    #[validate(email)]
    contact_email: Option<String>,
    #[validate(length(max = 30))]
    contact_phone: Option<String>,
    #[validate(length(max = 20))]
    contact_preference: Option<String>,
    #[validate(length(max = 1000))]
    notes: Option<String>,
}

/// Sign up to provide a meal for a team on a date.
async fn create_commitment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateCommitmentRequest>,
) -> Result<Json<CommitmentResponse>> {
    req.validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;
    let date = parse_date(&req.date, "date")?;

    let input = NewCommitment {
        team_id: req.team_id,
        date,
        attendee_count: req.attendee_count,
        contact_name: req.contact_name,
        contact_email: req.contact_email,
        contact_phone: req.contact_phone,
        contact_preference: req.contact_preference,
        notes: req.notes,
    };

    let commitment = state.commitment_service.create(&user, input).await?;

    Ok(Json(CommitmentResponse::from(commitment)))
}

#[derive(Deserialize, Validate, Default)]
struct UpdateCommitmentRequest {
    #[validate(length(min = 1, max = 100))]
    contact_name: Option<String>,
    #[validate(email)]
    contact_email: Option<String>,
    #[validate(length(max = 30))]
    contact_phone: Option<String>,
    #[validate(length(max = 20))]
    contact_preference: Option<String>,
    #[validate(length(max = 1000))]
    notes: Option<String>,
    #[validate(range(min = 1, max = 50))]
    attendee_count: Option<u32>,
}

/// Update contact fields, notes, or attendee count on a commitment.
///
/// Team and date are immutable; moving a meal is cancel-then-recreate.
async fn modify_commitment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCommitmentRequest>,
) -> Result<Json<CommitmentResponse>> {
    req.validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;

    let update = CommitmentUpdate {
        contact_name: req.contact_name,
        contact_email: req.contact_email,
        contact_phone: req.contact_phone,
        contact_preference: req.contact_preference,
        notes: req.notes,
        attendee_count: req.attendee_count,
    };

    let commitment = state.commitment_service.modify(&user, &id, update).await?;

    Ok(Json(CommitmentResponse::from(commitment)))
}

/// Response for commitment cancellation.
#[derive(Serialize)]
pub struct CancelResponse {
    pub success: bool,
    pub message: String,
}

/// Cancel a commitment, freeing its slot for the next signup.
async fn cancel_commitment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<CancelResponse>> {
    state.commitment_service.cancel(&user, &id).await?;

    Ok(Json(CancelResponse {
        success: true,
        message: "Commitment cancelled. The slot is open again.".to_string(),
    }))
}
