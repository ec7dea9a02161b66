// ABOUTME: Fasting session record with status, start mode, and plan enums
// ABOUTME: Owns the string mappings used for database storage and the wire
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Lifecycle state of a session.
///
/// `active` is the only initial state, `completed` is terminal, and the only
/// transition is `active -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Session is running; `end_time` not yet recorded
    Active,
    /// Session has been stopped; immutable aside from metadata edits
    Completed,
}

impl SessionStatus {
    /// Database/wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Parse the database representation
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown status string.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(AppError::invalid_input(format!(
                "Unknown session status: {other}"
            ))),
        }
    }
}

/// How the session's `start_time` was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    /// Started now
    Immediate,
    /// Backdated by an hour/minute offset supplied by the user
    Custom,
}

impl StartMode {
    /// Database/wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Custom => "custom",
        }
    }

    /// Parse the database representation
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown mode string.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "immediate" => Ok(Self::Immediate),
            "custom" => Ok(Self::Custom),
            other => Err(AppError::invalid_input(format!(
                "Unknown start mode: {other}"
            ))),
        }
    }
}

/// Intermittent-fasting plan the session aims to complete.
///
/// The first component of the ratio is the fasting window in hours and is
/// the target the progress calculator measures against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FastingPlan {
    /// 12 hours fasted, 12 hour eating window
    #[serde(rename = "12:12")]
    TwelveTwelve,
    /// 14 hours fasted, 10 hour eating window
    #[serde(rename = "14:10")]
    FourteenTen,
    /// 16 hours fasted, 8 hour eating window
    #[serde(rename = "16:8")]
    SixteenEight,
    /// 18 hours fasted, 6 hour eating window
    #[serde(rename = "18:6")]
    EighteenSix,
    /// 20 hours fasted, 4 hour eating window ("warrior")
    #[serde(rename = "20:4")]
    TwentyFour,
    /// 23 hours fasted, one meal a day
    #[serde(rename = "23:1")]
    Omad,
}

impl FastingPlan {
    /// Database/wire representation, e.g. `"16:8"`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwelveTwelve => "12:12",
            Self::FourteenTen => "14:10",
            Self::SixteenEight => "16:8",
            Self::EighteenSix => "18:6",
            Self::TwentyFour => "20:4",
            Self::Omad => "23:1",
        }
    }

    /// Parse the database representation
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a plan outside the supported set.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "12:12" => Ok(Self::TwelveTwelve),
            "14:10" => Ok(Self::FourteenTen),
            "16:8" => Ok(Self::SixteenEight),
            "18:6" => Ok(Self::EighteenSix),
            "20:4" => Ok(Self::TwentyFour),
            "23:1" => Ok(Self::Omad),
            other => Err(AppError::invalid_input(format!(
                "Unknown fasting plan: {other}"
            ))),
        }
    }

    /// Fasting-window target in hours
    #[must_use]
    pub const fn target_hours(self) -> u32 {
        match self {
            Self::TwelveTwelve => 12,
            Self::FourteenTen => 14,
            Self::SixteenEight => 16,
            Self::EighteenSix => 18,
            Self::TwentyFour => 20,
            Self::Omad => 23,
        }
    }
}

/// A bounded fasting interval owned by a single user.
///
/// `duration_minutes` is present iff `end_time` is present and always equals
/// the floored minute difference between the two timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastingSession {
    /// Unique session id
    pub id: Uuid,
    /// Owning user; sessions are never visible across users
    pub user_id: Uuid,
    /// When the fast began (possibly backdated for custom starts)
    pub start_time: DateTime<Utc>,
    /// When the fast ended; `None` while active
    pub end_time: Option<DateTime<Utc>>,
    /// Whole minutes between start and end; `None` while active
    pub duration_minutes: Option<i64>,
    /// Lifecycle state
    pub status: SessionStatus,
    /// How the start time was chosen
    pub start_mode: StartMode,
    /// Plan the session is measured against
    pub plan: FastingPlan,
    /// Why the session ended (`"completed"` unless the client said otherwise)
    pub end_reason: Option<String>,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last record mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl FastingSession {
    /// Whether the session is still running
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_roundtrips_through_str() {
        for plan in [
            FastingPlan::TwelveTwelve,
            FastingPlan::FourteenTen,
            FastingPlan::SixteenEight,
            FastingPlan::EighteenSix,
            FastingPlan::TwentyFour,
            FastingPlan::Omad,
        ] {
            assert_eq!(FastingPlan::parse(plan.as_str()).unwrap(), plan);
        }
    }

    #[test]
    fn plan_rejects_free_form_strings() {
        assert!(FastingPlan::parse("17:7").is_err());
        assert!(FastingPlan::parse("sixteen-eight").is_err());
    }

    #[test]
    fn plan_serializes_as_ratio_string() {
        let json = serde_json::to_string(&FastingPlan::SixteenEight).unwrap();
        assert_eq!(json, "\"16:8\"");
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert!(SessionStatus::parse("paused").is_err());
    }
}
