// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mealboard: meal signup coordination for missionary companionships
//!
//! This crate provides the backend API for the meal calendar: it derives
//! which dates each companionship can be signed up for from its weekly
//! hosting pattern, reconciles those virtual slots against actual signups,
//! and manages the signup lifecycle.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{CalendarService, CommitmentService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub calendar_service: CalendarService,
    pub commitment_service: CommitmentService,
}
