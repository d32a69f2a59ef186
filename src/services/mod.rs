// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod calendar;
pub mod commitment_index;
pub mod reconcile;
pub mod recurrence;
pub mod signup;

pub use calendar::{CalendarDay, CalendarService, SlotView, TeamScope};
pub use commitment_index::CommitmentIndex;
pub use reconcile::{SlotStatus, VirtualSlot};
pub use recurrence::CandidateDate;
pub use signup::{CommitmentService, CommitmentUpdate, NewCommitment};
