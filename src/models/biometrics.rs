// ABOUTME: Biometric log records: weight, blood pressure, blood sugar, BMI
// ABOUTME: Field ranges are validated before any write; BMI is derived on read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::time_math::round_two;

/// Accepted weight range in kilograms
pub const WEIGHT_KG_RANGE: (f64, f64) = (20.0, 500.0);
/// Accepted systolic pressure range in mmHg
pub const SYSTOLIC_RANGE: (i64, i64) = (60, 250);
/// Accepted diastolic pressure range in mmHg
pub const DIASTOLIC_RANGE: (i64, i64) = (40, 150);
/// Accepted pulse range in bpm
pub const PULSE_RANGE: (i64, i64) = (30, 220);
/// Accepted blood glucose range in mg/dL
pub const BLOOD_SUGAR_RANGE: (f64, f64) = (20.0, 600.0);
/// Accepted height range in centimeters
pub const HEIGHT_CM_RANGE: (f64, f64) = (50.0, 280.0);

/// When a blood sugar reading was taken relative to meals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementContext {
    /// After an overnight fast
    Fasting,
    /// Immediately before a meal
    BeforeMeal,
    /// Within two hours after a meal
    AfterMeal,
    /// No particular timing
    Random,
}

impl MeasurementContext {
    /// Database/wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fasting => "fasting",
            Self::BeforeMeal => "before_meal",
            Self::AfterMeal => "after_meal",
            Self::Random => "random",
        }
    }

    /// Parse the database representation
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a context outside the supported set.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "fasting" => Ok(Self::Fasting),
            "before_meal" => Ok(Self::BeforeMeal),
            "after_meal" => Ok(Self::AfterMeal),
            "random" => Ok(Self::Random),
            other => Err(AppError::invalid_input(format!(
                "Unknown measurement context: {other}"
            ))),
        }
    }
}

/// A single body-weight reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightLog {
    /// Unique log id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Free-form note
    pub note: Option<String>,
    /// When the reading was taken (may be backdated)
    pub logged_at: DateTime<Utc>,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last record mutation timestamp
    pub updated_at: DateTime<Utc>,
}

/// A single blood-pressure reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodPressureLog {
    /// Unique log id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Systolic pressure in mmHg
    pub systolic: i64,
    /// Diastolic pressure in mmHg
    pub diastolic: i64,
    /// Pulse in bpm, if measured
    pub pulse: Option<i64>,
    /// Free-form note
    pub note: Option<String>,
    /// When the reading was taken
    pub logged_at: DateTime<Utc>,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last record mutation timestamp
    pub updated_at: DateTime<Utc>,
}

/// A single blood-glucose reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodSugarLog {
    /// Unique log id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Glucose concentration in mg/dL
    pub value_mg_dl: f64,
    /// Timing of the reading relative to meals
    pub context: MeasurementContext,
    /// Free-form note
    pub note: Option<String>,
    /// When the reading was taken
    pub logged_at: DateTime<Utc>,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last record mutation timestamp
    pub updated_at: DateTime<Utc>,
}

/// Height and weight pair from which BMI is derived on read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiLog {
    /// Unique log id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Free-form note
    pub note: Option<String>,
    /// When the measurements were taken
    pub logged_at: DateTime<Utc>,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last record mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl BmiLog {
    /// Body-mass index, recomputed from the stored pair (never persisted)
    #[must_use]
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        round_two(self.weight_kg / (height_m * height_m))
    }

    /// WHO category label for the derived BMI
    #[must_use]
    pub fn category(&self) -> &'static str {
        bmi_category(self.bmi())
    }
}

/// WHO category label for a BMI value
#[must_use]
pub fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "underweight"
    } else if bmi < 25.0 {
        "normal"
    } else if bmi < 30.0 {
        "overweight"
    } else {
        "obese"
    }
}

/// Validate a weight reading
///
/// # Errors
///
/// Returns `InvalidInput` when the value is out of range.
pub fn validate_weight_kg(weight_kg: f64) -> AppResult<()> {
    validate_f64_range("weight_kg", weight_kg, WEIGHT_KG_RANGE)
}

/// Validate a blood-pressure reading
///
/// # Errors
///
/// Returns `InvalidInput` when any field is out of range or systolic does not
/// exceed diastolic.
pub fn validate_blood_pressure(
    systolic: i64,
    diastolic: i64,
    pulse: Option<i64>,
) -> AppResult<()> {
    validate_i64_range("systolic", systolic, SYSTOLIC_RANGE)?;
    validate_i64_range("diastolic", diastolic, DIASTOLIC_RANGE)?;
    if let Some(pulse) = pulse {
        validate_i64_range("pulse", pulse, PULSE_RANGE)?;
    }
    if systolic <= diastolic {
        return Err(AppError::invalid_input(
            "systolic must be greater than diastolic",
        ));
    }
    Ok(())
}

/// Validate a blood-glucose reading
///
/// # Errors
///
/// Returns `InvalidInput` when the value is out of range.
pub fn validate_blood_sugar(value_mg_dl: f64) -> AppResult<()> {
    validate_f64_range("value_mg_dl", value_mg_dl, BLOOD_SUGAR_RANGE)
}

/// Validate a height/weight pair for BMI logging
///
/// # Errors
///
/// Returns `InvalidInput` when either value is out of range.
pub fn validate_bmi_input(height_cm: f64, weight_kg: f64) -> AppResult<()> {
    validate_f64_range("height_cm", height_cm, HEIGHT_CM_RANGE)?;
    validate_f64_range("weight_kg", weight_kg, WEIGHT_KG_RANGE)
}

fn validate_f64_range(field: &str, value: f64, (min, max): (f64, f64)) -> AppResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(AppError::invalid_input(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

fn validate_i64_range(field: &str, value: i64, (min, max): (i64, i64)) -> AppResult<()> {
    if value < min || value > max {
        return Err(AppError::invalid_input(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_range_is_enforced() {
        assert!(validate_weight_kg(72.5).is_ok());
        assert!(validate_weight_kg(19.9).is_err());
        assert!(validate_weight_kg(500.1).is_err());
        assert!(validate_weight_kg(f64::NAN).is_err());
    }

    #[test]
    fn blood_pressure_requires_systolic_above_diastolic() {
        assert!(validate_blood_pressure(120, 80, Some(60)).is_ok());
        assert!(validate_blood_pressure(80, 80, None).is_err());
        assert!(validate_blood_pressure(120, 80, Some(500)).is_err());
    }

    #[test]
    fn bmi_is_derived_and_categorized() {
        let log = BmiLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            height_cm: 180.0,
            weight_kg: 81.0,
            note: None,
            logged_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!((log.bmi() - 25.0).abs() < f64::EPSILON);
        assert_eq!(log.category(), "overweight");
        assert_eq!(bmi_category(18.4), "underweight");
        assert_eq!(bmi_category(22.0), "normal");
        assert_eq!(bmi_category(31.0), "obese");
    }
}
