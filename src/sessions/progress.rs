// ABOUTME: Measures a session's duration against its plan's fasting target
// ABOUTME: Completion is capped at 100%, remaining hours floored at zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use serde::Serialize;

use crate::models::FastingPlan;
use crate::time_math::{minutes_to_hours, round_two};

/// Progress of a session toward its plan's fasting window
#[derive(Debug, Clone, Serialize)]
pub struct PlanProgress {
    /// The plan being measured against
    pub plan: FastingPlan,
    /// Target fasting window in hours
    pub target_hours: u32,
    /// Hours fasted so far, two decimals
    pub completed_hours: f64,
    /// Share of the target reached, capped at 100, two decimals
    pub completion_percentage: f64,
    /// Hours left to the target, floored at zero, two decimals
    pub remaining_hours: f64,
}

/// Compute progress of a `duration_minutes`-long fast against `plan`
#[must_use]
pub fn plan_progress(duration_minutes: i64, plan: FastingPlan) -> PlanProgress {
    let target_hours = plan.target_hours();
    let completed = minutes_to_hours(duration_minutes.max(0));
    let target = f64::from(target_hours);

    PlanProgress {
        plan,
        target_hours,
        completed_hours: round_two(completed),
        completion_percentage: round_two((completed / target * 100.0).min(100.0)),
        remaining_hours: round_two((target - completed).max(0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_fast_reports_small_completion() {
        let progress = plan_progress(65, FastingPlan::SixteenEight);
        assert_eq!(progress.target_hours, 16);
        assert!((progress.completed_hours - 1.08).abs() < f64::EPSILON);
        assert!((progress.completion_percentage - 6.77).abs() < f64::EPSILON);
        assert!((progress.remaining_hours - 14.92).abs() < f64::EPSILON);
    }

    #[test]
    fn completion_caps_at_one_hundred() {
        let progress = plan_progress(20 * 60, FastingPlan::SixteenEight);
        assert!((progress.completion_percentage - 100.0).abs() < f64::EPSILON);
        assert!(progress.remaining_hours.abs() < f64::EPSILON);
    }

    #[test]
    fn exact_target_is_fully_complete() {
        let progress = plan_progress(16 * 60, FastingPlan::SixteenEight);
        assert!((progress.completion_percentage - 100.0).abs() < f64::EPSILON);
        assert!(progress.remaining_hours.abs() < f64::EPSILON);
    }

    #[test]
    fn zero_duration_has_full_target_remaining() {
        let progress = plan_progress(0, FastingPlan::EighteenSix);
        assert!(progress.completion_percentage.abs() < f64::EPSILON);
        assert!((progress.remaining_hours - 18.0).abs() < f64::EPSILON);
    }
}
