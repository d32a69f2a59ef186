// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Candidate date expansion from weekly hosting patterns.

use crate::models::Team;
use crate::time_utils::weekday_name;
use chrono::NaiveDate;

/// Minimum expected attendee count for a candidate, regardless of roster size.
const MIN_ATTENDEES: u32 = 2;

/// A date on which a team could host a meal. Computed, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateDate {
    pub team_id: String,
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub attendee_count: u32,
}

/// Expand a team's weekly hosting pattern over an inclusive date window.
///
/// Returns candidates in ascending date order, one per matching calendar
/// date. Comparison is date-only (year, month, day), so month/year spans and
/// daylight-saving transitions cannot shift a weekday. A team with an empty
/// weekday set, or an inverted window, yields no candidates: scheduling gaps
/// are data states, not faults.
pub fn expand(
    team: &Team,
    active_member_count: usize,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<CandidateDate> {
    if !team.active || team.host_weekdays.is_empty() {
        return Vec::new();
    }

    let attendee_count = (active_member_count as u32).max(MIN_ATTENDEES);

    window_start
        .iter_days()
        .take_while(|d| *d <= window_end)
        .filter(|d| team.hosts_on(*d))
        .map(|date| CandidateDate {
            team_id: team.id.clone(),
            date,
            weekday: weekday_name(date),
            attendee_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_team(id: &str, weekdays: &[u8]) -> Team {
        Team {
            id: id.to_string(),
            area: format!("Area {}", id),
            phone: None,
            member_ids: vec![],
            host_weekdays: weekdays.iter().copied().collect(),
            active: true,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expand_skips_unavailable_weekdays() {
        // Mon-Sat team over a Fri..Thu window: everything but Sunday Mar 3
        let team = make_team("downtown", &[1, 2, 3, 4, 5, 6]);

        let candidates = expand(&team, 2, date(2024, 3, 1), date(2024, 3, 7));

        let dates: Vec<NaiveDate> = candidates.iter().map(|c| c.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 3, 1),
                date(2024, 3, 2),
                date(2024, 3, 4),
                date(2024, 3, 5),
                date(2024, 3, 6),
                date(2024, 3, 7),
            ]
        );
        assert!(candidates.iter().all(|c| c.team_id == "downtown"));
        assert_eq!(candidates[0].weekday, "Friday");
        assert_eq!(candidates[2].weekday, "Monday");
    }

    #[test]
    fn test_expand_is_ascending_without_duplicates() {
        let team = make_team("t", &[0, 1, 2, 3, 4, 5, 6]);

        let candidates = expand(&team, 2, date(2024, 1, 1), date(2024, 1, 31));

        assert_eq!(candidates.len(), 31);
        for pair in candidates.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_expand_window_bounds_inclusive() {
        // Both endpoints are Tuesdays
        let team = make_team("t", &[2]);

        let candidates = expand(&team, 2, date(2024, 3, 5), date(2024, 3, 12));

        let dates: Vec<NaiveDate> = candidates.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 5), date(2024, 3, 12)]);
    }

    #[test]
    fn test_expand_single_day_window() {
        let team = make_team("t", &[2]);

        assert_eq!(expand(&team, 2, date(2024, 3, 5), date(2024, 3, 5)).len(), 1);
        // Same day, wrong weekday
        assert!(expand(&team, 2, date(2024, 3, 6), date(2024, 3, 6)).is_empty());
    }

    #[test]
    fn test_expand_empty_weekday_set_yields_nothing() {
        let team = make_team("t", &[]);
        assert!(expand(&team, 5, date(2024, 3, 1), date(2024, 3, 31)).is_empty());
    }

    #[test]
    fn test_expand_inactive_team_yields_nothing() {
        let mut team = make_team("t", &[1, 2, 3]);
        team.active = false;
        assert!(expand(&team, 5, date(2024, 3, 1), date(2024, 3, 31)).is_empty());
    }

    #[test]
    fn test_expand_inverted_window_yields_nothing() {
        let team = make_team("t", &[1, 2, 3]);
        assert!(expand(&team, 2, date(2024, 3, 7), date(2024, 3, 1)).is_empty());
    }

    #[test]
    fn test_expand_spans_month_and_year_boundary() {
        // Wednesdays from late Dec 2023 into Jan 2024
        let team = make_team("t", &[3]);

        let candidates = expand(&team, 2, date(2023, 12, 25), date(2024, 1, 7));

        let dates: Vec<NaiveDate> = candidates.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![date(2023, 12, 27), date(2024, 1, 3)]);
    }

    #[test]
    fn test_expand_across_dst_transition() {
        // US DST began 2024-03-10; date-only comparison must not drop or
        // duplicate any day around it
        let team = make_team("t", &[0, 1, 2, 3, 4, 5, 6]);

        let candidates = expand(&team, 2, date(2024, 3, 8), date(2024, 3, 12));

        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[2].date, date(2024, 3, 10));
        assert_eq!(candidates[2].weekday, "Sunday");
    }

    #[test]
    fn test_expand_attendee_count_floor() {
        let team = make_team("t", &[2]);

        let solo = expand(&team, 1, date(2024, 3, 5), date(2024, 3, 5));
        assert_eq!(solo[0].attendee_count, 2);

        let empty = expand(&team, 0, date(2024, 3, 5), date(2024, 3, 5));
        assert_eq!(empty[0].attendee_count, 2);

        let trio = expand(&team, 3, date(2024, 3, 5), date(2024, 3, 5));
        assert_eq!(trio[0].attendee_count, 3);
    }
}
