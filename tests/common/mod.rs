// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use mealboard::config::Config;
use mealboard::db::FirestoreDb;
use mealboard::models::{Member, Team};
use mealboard::routes::create_router;
use mealboard::services::{CalendarService, CommitmentService};
use mealboard::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let state = Arc::new(AppState {
        calendar_service: CalendarService::new(db.clone()),
        commitment_service: CommitmentService::new(db.clone()),
        config,
        db,
    });

    (create_router(state.clone()), state)
}

/// Create a test JWT token.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, admin: bool, signing_key: &[u8]) -> String {
    mealboard::middleware::auth::create_jwt(user_id, admin, signing_key)
        .expect("Failed to create test JWT")
}

/// Team fixture hosting on the given weekday numbers.
#[allow(dead_code)]
pub fn make_team(id: &str, area: &str, weekdays: &[u8], member_ids: &[&str]) -> Team {
    Team {
        id: id.to_string(),
        area: area.to_string(),
        phone: Some("555-0100".to_string()),
        member_ids: member_ids.iter().map(|s| s.to_string()).collect(),
        host_weekdays: weekdays.iter().copied().collect(),
        active: true,
    }
}

/// Member fixture.
#[allow(dead_code)]
pub fn make_member(id: &str, name: &str) -> Member {
    Member {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
        dietary_preferences: vec![],
        allergies: vec![],
        notes: None,
        active: true,
    }
}
