// ABOUTME: Partitions a fast's duration into metabolic phase buckets
// ABOUTME: Fixed physiological boundaries; minute buckets always sum to the input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use serde::Serialize;

use crate::time_math::{clamp_minutes, percentage_of};

/// Fed phase ends 4 hours in
const FED_END_MINUTES: i64 = 240;
/// Transition phase ends 12 hours in
const TRANSITION_END_MINUTES: i64 = 720;
/// Fasting phase ends 16 hours in; ketosis is open-ended after that
const FASTING_END_MINUTES: i64 = 960;

/// Named sub-interval of a fast mapped to an approximate physiological state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetabolicPhase {
    /// Digesting the last meal, 0-4h
    Fed,
    /// Glycogen stores draining, 4-12h
    Transition,
    /// Glycogen largely depleted, 12-16h
    Fasting,
    /// Ketone production ramps up, 16h onward
    Ketosis,
}

impl MetabolicPhase {
    /// All phases in chronological order
    pub const ALL: [Self; 4] = [Self::Fed, Self::Transition, Self::Fasting, Self::Ketosis];

    /// Dominant fuel source during this phase
    #[must_use]
    pub const fn fuel_source(self) -> &'static str {
        match self {
            Self::Fed => "glucose",
            Self::Transition => "glycogen + fat",
            Self::Fasting => "fat + glycogen",
            Self::Ketosis => "fat + ketones",
        }
    }

    /// Minute mark at which the phase begins
    #[must_use]
    pub const fn start_minute(self) -> i64 {
        match self {
            Self::Fed => 0,
            Self::Transition => FED_END_MINUTES,
            Self::Fasting => TRANSITION_END_MINUTES,
            Self::Ketosis => FASTING_END_MINUTES,
        }
    }

    /// Phase length in minutes; `None` for the open-ended ketosis phase
    #[must_use]
    pub const fn length_minutes(self) -> Option<i64> {
        match self {
            Self::Fed => Some(FED_END_MINUTES),
            Self::Transition => Some(TRANSITION_END_MINUTES - FED_END_MINUTES),
            Self::Fasting => Some(FASTING_END_MINUTES - TRANSITION_END_MINUTES),
            Self::Ketosis => None,
        }
    }

    /// Minutes of a `duration_minutes`-long fast spent in this phase
    #[must_use]
    pub fn minutes_within(self, duration_minutes: i64) -> i64 {
        let past_start = duration_minutes - self.start_minute();
        self.length_minutes()
            .map_or_else(|| past_start.max(0), |len| clamp_minutes(past_start, len))
    }
}

/// Time spent in one phase of a fast
#[derive(Debug, Clone, Serialize)]
pub struct PhaseSlice {
    /// Which phase
    pub phase: MetabolicPhase,
    /// Dominant fuel source label
    pub fuel_source: &'static str,
    /// Minutes of the fast spent in this phase
    pub minutes: i64,
    /// Share of the whole fast, percent with two decimals
    pub percentage: f64,
}

/// Partition a fast's duration across the four phases.
///
/// The minute buckets sum exactly to `duration_minutes` (negative input is
/// treated as zero); percentages are of the whole duration, two decimals.
#[must_use]
pub fn phase_breakdown(duration_minutes: i64) -> Vec<PhaseSlice> {
    let duration = duration_minutes.max(0);

    MetabolicPhase::ALL
        .into_iter()
        .map(|phase| {
            let minutes = phase.minutes_within(duration);
            PhaseSlice {
                phase,
                fuel_source: phase.fuel_source(),
                minutes,
                percentage: percentage_of(minutes, duration),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes_of(breakdown: &[PhaseSlice]) -> Vec<i64> {
        breakdown.iter().map(|p| p.minutes).collect()
    }

    #[test]
    fn short_fast_stays_in_fed_phase() {
        let breakdown = phase_breakdown(65);
        assert_eq!(minutes_of(&breakdown), vec![65, 0, 0, 0]);
        assert!((breakdown[0].percentage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ten_hour_fast_splits_fed_and_transition() {
        assert_eq!(minutes_of(&phase_breakdown(600)), vec![240, 360, 0, 0]);
    }

    #[test]
    fn long_fast_reaches_ketosis() {
        assert_eq!(minutes_of(&phase_breakdown(1000)), vec![240, 480, 240, 40]);
    }

    #[test]
    fn minutes_sum_to_duration_for_all_durations() {
        for d in 0..=2000 {
            let total: i64 = phase_breakdown(d).iter().map(|p| p.minutes).sum();
            assert_eq!(total, d, "phase minutes must sum to duration {d}");
        }
    }

    #[test]
    fn zero_duration_reports_zero_percentages() {
        for slice in phase_breakdown(0) {
            assert_eq!(slice.minutes, 0);
            assert!(slice.percentage.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn boundary_minute_belongs_to_the_next_phase() {
        // At exactly 240 minutes the fed bucket is full and transition empty.
        assert_eq!(minutes_of(&phase_breakdown(240)), vec![240, 0, 0, 0]);
        assert_eq!(minutes_of(&phase_breakdown(241)), vec![240, 1, 0, 0]);
    }
}
