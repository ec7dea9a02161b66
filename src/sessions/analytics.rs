// ABOUTME: On-demand aggregation over a user's completed fasting sessions
// ABOUTME: Totals, per-phase hours, plan usage, calendar-day streak, recents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use std::collections::{BTreeMap, HashSet};

use chrono::{Days, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{FastingPlan, FastingSession, SessionStatus};
use crate::sessions::phases::MetabolicPhase;
use crate::time_math::{minutes_to_hours, round_two};

/// How many sessions the summary lists individually
const RECENT_SESSION_COUNT: usize = 5;

/// Hours spent in each metabolic phase, two decimals
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PhaseHours {
    /// Hours in the fed phase
    pub fed: f64,
    /// Hours in the transition phase
    pub transition: f64,
    /// Hours in the fasting phase
    pub fasting: f64,
    /// Hours in the ketosis phase
    pub ketosis: f64,
}

impl PhaseHours {
    fn from_minutes(fed: i64, transition: i64, fasting: i64, ketosis: i64) -> Self {
        Self {
            fed: round_two(minutes_to_hours(fed)),
            transition: round_two(minutes_to_hours(transition)),
            fasting: round_two(minutes_to_hours(fasting)),
            ketosis: round_two(minutes_to_hours(ketosis)),
        }
    }

    /// Phase hours of a single fast of the given length
    #[must_use]
    pub fn of_duration(duration_minutes: i64) -> Self {
        let d = duration_minutes.max(0);
        Self::from_minutes(
            MetabolicPhase::Fed.minutes_within(d),
            MetabolicPhase::Transition.minutes_within(d),
            MetabolicPhase::Fasting.minutes_within(d),
            MetabolicPhase::Ketosis.minutes_within(d),
        )
    }
}

/// One line of the recent-session digest
#[derive(Debug, Clone, Serialize)]
pub struct RecentSession {
    /// Session id
    pub id: Uuid,
    /// Calendar day the fast ended
    pub date: NaiveDate,
    /// Plan the fast targeted
    pub plan: FastingPlan,
    /// Total length in minutes
    pub duration_minutes: i64,
    /// Phase split of this fast
    pub phase_hours: PhaseHours,
}

/// Aggregated statistics over a user's completed sessions.
///
/// Recomputed on demand; nothing here is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Number of completed sessions
    pub total_sessions: usize,
    /// Sum of all session lengths in hours
    pub total_duration_hours: f64,
    /// Mean session length in hours; zero with no sessions
    pub average_session_hours: f64,
    /// Longest single session in hours
    pub longest_session_hours: f64,
    /// Hours accumulated in each metabolic phase across all sessions
    pub phase_hours: PhaseHours,
    /// Completed-session count per plan, keyed by the plan ratio string
    pub plan_usage: BTreeMap<String, i64>,
    /// Consecutive calendar days (ending today or yesterday) with a fast
    pub current_streak_days: i64,
    /// Most recent sessions, newest first
    pub recent_sessions: Vec<RecentSession>,
}

/// Aggregate a user's sessions as of `today`.
///
/// In-progress sessions carry no duration and are excluded. An empty input
/// yields the all-zero summary.
#[must_use]
pub fn summarize_sessions(sessions: &[FastingSession], today: NaiveDate) -> SessionSummary {
    let mut completed: Vec<&FastingSession> = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
        .filter(|s| s.end_time.is_some() && s.duration_minutes.is_some())
        .collect();
    completed.sort_by(|a, b| b.end_time.cmp(&a.end_time));

    let mut total_minutes: i64 = 0;
    let mut longest_minutes: i64 = 0;
    let mut phase_minutes = [0_i64; 4];
    let mut plan_usage: BTreeMap<String, i64> = BTreeMap::new();

    for session in &completed {
        let duration = session.duration_minutes.unwrap_or(0).max(0);
        total_minutes += duration;
        longest_minutes = longest_minutes.max(duration);
        *plan_usage.entry(session.plan.as_str().to_owned()).or_insert(0) += 1;

        for (bucket, phase) in phase_minutes.iter_mut().zip(MetabolicPhase::ALL) {
            *bucket += phase.minutes_within(duration);
        }
    }

    let total_sessions = completed.len();
    #[allow(clippy::cast_precision_loss)]
    let average_session_hours = if total_sessions == 0 {
        0.0
    } else {
        round_two(minutes_to_hours(total_minutes) / total_sessions as f64)
    };

    let recent_sessions = completed
        .iter()
        .take(RECENT_SESSION_COUNT)
        .filter_map(|s| {
            let end_time = s.end_time?;
            let duration = s.duration_minutes?;
            Some(RecentSession {
                id: s.id,
                date: end_time.date_naive(),
                plan: s.plan,
                duration_minutes: duration,
                phase_hours: PhaseHours::of_duration(duration),
            })
        })
        .collect();

    SessionSummary {
        total_sessions,
        total_duration_hours: round_two(minutes_to_hours(total_minutes)),
        average_session_hours,
        longest_session_hours: round_two(minutes_to_hours(longest_minutes)),
        phase_hours: PhaseHours::from_minutes(
            phase_minutes[0],
            phase_minutes[1],
            phase_minutes[2],
            phase_minutes[3],
        ),
        plan_usage,
        current_streak_days: current_streak_days(&completed, today),
        recent_sessions,
    }
}

/// Consecutive calendar days with at least one completed session, walking
/// backward from `today`.
///
/// A streak whose latest day is yesterday still counts; anything older means
/// the streak is broken and the result is zero.
fn current_streak_days(completed: &[&FastingSession], today: NaiveDate) -> i64 {
    let days: HashSet<NaiveDate> = completed
        .iter()
        .filter_map(|s| s.end_time.map(|t| t.date_naive()))
        .collect();

    let mut cursor = if days.contains(&today) {
        today
    } else if let Some(yesterday) = today.checked_sub_days(Days::new(1)) {
        if days.contains(&yesterday) {
            yesterday
        } else {
            return 0;
        }
    } else {
        return 0;
    };

    let mut streak = 0_i64;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    streak
}
