// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Date-windowed lookup of active commitments keyed by (team, date).

use crate::models::Commitment;
use crate::time_utils::slot_key;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Index of active commitments for one calendar window.
///
/// Built fresh for every calendar read and never cached across requests;
/// caching here would reintroduce exactly the staleness the virtual-slot
/// design exists to avoid.
#[derive(Debug, Default)]
pub struct CommitmentIndex {
    by_slot: HashMap<String, Commitment>,
}

impl CommitmentIndex {
    /// Index commitments falling inside the inclusive window.
    ///
    /// Cancelled records never occupy a slot and are skipped. A record whose
    /// date cannot be normalized is skipped and logged; one bad row must not
    /// blank out the whole calendar. Duplicate (team, date) keys should not
    /// occur under the uniqueness invariant - if one does, the later record
    /// wins and the collision is logged as a data-integrity concern.
    pub fn build(
        records: Vec<Commitment>,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Self {
        let mut by_slot = HashMap::new();

        for commitment in records {
            if !commitment.status.occupies_slot() {
                continue;
            }

            let date = match commitment.date.to_naive_date() {
                Ok(date) => date,
                Err(err) => {
                    tracing::warn!(
                        commitment_id = %commitment.id,
                        error = %err,
                        "Skipping commitment with unparseable date"
                    );
                    continue;
                }
            };

            if date < window_start || date > window_end {
                continue;
            }

            let key = slot_key(&commitment.team_id, date);
            if let Some(previous) = by_slot.insert(key.clone(), commitment) {
                tracing::warn!(
                    slot = %key,
                    replaced_commitment_id = %previous.id,
                    "Duplicate active commitments for one slot"
                );
            }
        }

        Self { by_slot }
    }

    /// Look up the active commitment for a (team, date) pair.
    ///
    /// Key derivation goes through the same [`slot_key`] routine as `build`,
    /// so a commitment can never invisibly fail to match its candidate.
    pub fn get(&self, team_id: &str, date: NaiveDate) -> Option<&Commitment> {
        self.by_slot.get(&slot_key(team_id, date))
    }

    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommitmentStatus;
    use crate::time_utils::DateRepr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_commitment(id: &str, team_id: &str, raw_date: DateRepr) -> Commitment {
        Commitment {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            contact_name: "Pat Doe".to_string(),
            contact_email: Some("pat@example.com".to_string()),
            contact_phone: None,
            team_id: team_id.to_string(),
            date: raw_date,
            weekday: "Tuesday".to_string(),
            attendee_count: 2,
            status: CommitmentStatus::Confirmed,
            contact_preference: None,
            notes: None,
            created_at: "2024-03-01T12:00:00Z".to_string(),
            updated_at: "2024-03-01T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_build_indexes_by_team_and_date() {
        let records = vec![
            make_commitment("c1", "downtown", DateRepr::Text("2024-03-05".to_string())),
            make_commitment("c2", "northside", DateRepr::Text("2024-03-05".to_string())),
        ];

        let index = CommitmentIndex::build(records, date(2024, 3, 1), date(2024, 3, 7));

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("downtown", date(2024, 3, 5)).unwrap().id, "c1");
        assert_eq!(index.get("northside", date(2024, 3, 5)).unwrap().id, "c2");
        assert!(index.get("downtown", date(2024, 3, 6)).is_none());
    }

    #[test]
    fn test_build_skips_cancelled() {
        let mut cancelled =
            make_commitment("c1", "downtown", DateRepr::Text("2024-03-05".to_string()));
        cancelled.status = CommitmentStatus::Cancelled;

        let index = CommitmentIndex::build(vec![cancelled], date(2024, 3, 1), date(2024, 3, 7));

        assert!(index.is_empty());
    }

    #[test]
    fn test_build_window_bounds_inclusive() {
        let records = vec![
            make_commitment("on-start", "t", DateRepr::Text("2024-03-01".to_string())),
            make_commitment("on-end", "t2", DateRepr::Text("2024-03-07".to_string())),
            make_commitment("before", "t3", DateRepr::Text("2024-02-29".to_string())),
            make_commitment("after", "t4", DateRepr::Text("2024-03-08".to_string())),
        ];

        let index = CommitmentIndex::build(records, date(2024, 3, 1), date(2024, 3, 7));

        assert_eq!(index.len(), 2);
        assert!(index.get("t", date(2024, 3, 1)).is_some());
        assert!(index.get("t2", date(2024, 3, 7)).is_some());
        assert!(index.get("t3", date(2024, 2, 29)).is_none());
        assert!(index.get("t4", date(2024, 3, 8)).is_none());
    }

    #[test]
    fn test_build_skips_unparseable_date_without_failing() {
        let records = vec![
            make_commitment("bad", "t", DateRepr::Text("not-a-date".to_string())),
            make_commitment("good", "t", DateRepr::Text("2024-03-05".to_string())),
        ];

        let index = CommitmentIndex::build(records, date(2024, 3, 1), date(2024, 3, 7));

        // One bad record must not blank out the rest of the calendar
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("t", date(2024, 3, 5)).unwrap().id, "good");
    }

    #[test]
    fn test_build_normalizes_heterogeneous_dates_to_one_key() {
        // Epoch seconds and an RFC3339 timestamp for the same calendar day
        // both land on the date-only key
        let records = vec![
            make_commitment("epoch", "t1", DateRepr::Epoch(1_709_640_000)), // 2024-03-05
            make_commitment(
                "stamped",
                "t2",
                DateRepr::Text("2024-03-06T18:30:00Z".to_string()),
            ),
        ];

        let index = CommitmentIndex::build(records, date(2024, 3, 1), date(2024, 3, 7));

        assert_eq!(index.get("t1", date(2024, 3, 5)).unwrap().id, "epoch");
        assert_eq!(index.get("t2", date(2024, 3, 6)).unwrap().id, "stamped");
    }

    #[test]
    fn test_build_duplicate_key_later_record_wins() {
        let records = vec![
            make_commitment("first", "t", DateRepr::Text("2024-03-05".to_string())),
            make_commitment("second", "t", DateRepr::Text("2024-03-05".to_string())),
        ];

        let index = CommitmentIndex::build(records, date(2024, 3, 1), date(2024, 3, 7));

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("t", date(2024, 3, 5)).unwrap().id, "second");
    }
}
