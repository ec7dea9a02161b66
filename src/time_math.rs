// ABOUTME: Pure duration and percentage arithmetic shared by the session engine
// ABOUTME: Stateless helpers for minute/hour conversions, clamping, and rounding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Duration and percentage arithmetic.
//!
//! Everything here is a pure function over plain numbers or `chrono` types so
//! the calculators stay deterministic and trivially testable.

use chrono::{DateTime, Duration, Utc};

/// Whole minutes elapsed between two instants, floored, never negative.
#[must_use]
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_minutes().max(0)
}

/// Convert minutes to fractional hours.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn minutes_to_hours(minutes: i64) -> f64 {
    minutes as f64 / 60.0
}

/// Round to two decimal places, the precision used on the wire.
#[must_use]
pub fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part` as a percentage of `whole`, rounded to two decimals.
///
/// A `whole` of zero is treated as one so a zero-length session reports 0%
/// in every bucket instead of dividing by zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage_of(part: i64, whole: i64) -> f64 {
    round_two(part as f64 / whole.max(1) as f64 * 100.0)
}

/// Clamp `value` into `[0, max]`.
#[must_use]
pub fn clamp_minutes(value: i64, max: i64) -> i64 {
    value.clamp(0, max)
}

/// Backdating offset for a custom session start.
#[must_use]
pub fn offset_duration(hours: u32, minutes: u32) -> Duration {
    Duration::minutes(i64::from(hours) * 60 + i64::from(minutes))
}
