// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod commitment;
pub mod member;
pub mod team;

pub use commitment::{Commitment, CommitmentStatus, SlotClaim};
pub use member::Member;
pub use team::Team;
