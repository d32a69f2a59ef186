//! Missionary member model for storage and API.

use serde::{Deserialize, Serialize};

/// An individual missionary.
///
/// Members contribute display data only (names, allergies, preferences);
/// the scheduling algorithm works purely in terms of teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Document ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact email (may be None if not shared)
    pub email: Option<String>,
    /// Dietary preferences (e.g. "vegetarian")
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    /// Food allergies
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Inactive members are excluded from rosters and display joins
    pub active: bool,
}
