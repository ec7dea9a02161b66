// ABOUTME: Integration tests for the workout lifecycle and summary
// ABOUTME: Verifies the shared session pattern holds for exercise tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

// Test files: allow missing_docs and unwrap
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use chrono::{Duration, Utc};
use uuid::Uuid;

use vitalog_server::database::workouts::WorkoutManager;
use vitalog_server::errors::ErrorCode;
use vitalog_server::models::{ExerciseType, SessionStatus, StartMode};
use vitalog_server::sessions::tracker::CustomOffset;
use vitalog_server::workouts::{summarize_workouts, StopWorkoutOptions, WorkoutTracker};

async fn create_tracker() -> (WorkoutTracker, sqlx::SqlitePool) {
    let pool = common::create_test_pool().await;
    (WorkoutTracker::new(WorkoutManager::new(pool.clone())), pool)
}

#[tokio::test]
async fn start_and_stop_a_workout() {
    let (tracker, _pool) = create_tracker().await;
    let user = Uuid::new_v4();

    let workout = tracker
        .start(
            user,
            ExerciseType::Running,
            StartMode::Custom,
            Some(CustomOffset { hours: 0, minutes: 45 }),
        )
        .await
        .unwrap();
    assert_eq!(workout.status, SessionStatus::Active);
    assert_eq!(workout.exercise_type, ExerciseType::Running);

    let stopped = tracker
        .stop(
            user,
            workout.id,
            StopWorkoutOptions {
                end_time: None,
                calories_burned: Some(420),
                note: Some("tempo run".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(stopped.status, SessionStatus::Completed);
    assert_eq!(stopped.duration_minutes, Some(45));
    assert_eq!(stopped.calories_burned, Some(420));
    assert_eq!(stopped.note.as_deref(), Some("tempo run"));
}

#[tokio::test]
async fn only_one_workout_active_per_user() {
    let (tracker, _pool) = create_tracker().await;
    let user = Uuid::new_v4();

    tracker
        .start(user, ExerciseType::Cycling, StartMode::Immediate, None)
        .await
        .unwrap();

    let err = tracker
        .start(user, ExerciseType::Yoga, StartMode::Immediate, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ActiveSessionExists);
}

#[tokio::test]
async fn fasting_and_workout_invariants_are_independent() {
    // Both tables carry their own active-unique constraint; an active fast
    // does not block starting a workout.
    let pool = common::create_test_pool().await;
    let user = Uuid::new_v4();

    let fasting = vitalog_server::sessions::SessionTracker::new(
        vitalog_server::database::sessions::SessionManager::new(pool.clone()),
    );
    fasting
        .start(
            user,
            StartMode::Immediate,
            None,
            vitalog_server::models::FastingPlan::SixteenEight,
        )
        .await
        .unwrap();

    let workouts = WorkoutTracker::new(WorkoutManager::new(pool));
    workouts
        .start(user, ExerciseType::Walking, StartMode::Immediate, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn second_stop_reports_not_active() {
    let (tracker, _pool) = create_tracker().await;
    let user = Uuid::new_v4();

    let workout = tracker
        .start(user, ExerciseType::Hiit, StartMode::Immediate, None)
        .await
        .unwrap();
    tracker
        .stop(user, workout.id, StopWorkoutOptions::default())
        .await
        .unwrap();

    let err = tracker
        .stop(user, workout.id, StopWorkoutOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionNotActive);
}

#[tokio::test]
async fn stop_rejects_negative_calories_and_bad_end_time() {
    let (tracker, _pool) = create_tracker().await;
    let user = Uuid::new_v4();

    let workout = tracker
        .start(user, ExerciseType::Swimming, StartMode::Immediate, None)
        .await
        .unwrap();

    let err = tracker
        .stop(
            user,
            workout.id,
            StopWorkoutOptions {
                end_time: None,
                calories_burned: Some(-5),
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = tracker
        .stop(
            user,
            workout.id,
            StopWorkoutOptions {
                end_time: Some(workout.start_time - Duration::minutes(1)),
                calories_burned: None,
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    // Still active after the rejected stops
    assert!(tracker.current(user).await.unwrap().is_some());
}

#[tokio::test]
async fn summary_breaks_totals_down_by_exercise_type() {
    let (tracker, _pool) = create_tracker().await;
    let user = Uuid::new_v4();

    for (kind, minutes, calories) in [
        (ExerciseType::Running, 30, 300),
        (ExerciseType::Running, 60, 550),
        (ExerciseType::Yoga, 90, 180),
    ] {
        let workout = tracker
            .start(user, kind, StartMode::Immediate, None)
            .await
            .unwrap();
        tracker
            .stop(
                user,
                workout.id,
                StopWorkoutOptions {
                    end_time: Some(workout.start_time + Duration::minutes(minutes)),
                    calories_burned: Some(calories),
                    note: None,
                },
            )
            .await
            .unwrap();
    }

    let workouts = tracker.completed(user).await.unwrap();
    let summary = summarize_workouts(&workouts);

    assert_eq!(summary.total_workouts, 3);
    assert!((summary.total_duration_hours - 3.0).abs() < f64::EPSILON);
    assert_eq!(summary.total_calories, 1030);

    let running = summary.by_exercise_type.get("running").unwrap();
    assert_eq!(running.count, 2);
    assert!((running.hours - 1.5).abs() < f64::EPSILON);

    let yoga = summary.by_exercise_type.get("yoga").unwrap();
    assert_eq!(yoga.count, 1);
    assert!((yoga.hours - 1.5).abs() < f64::EPSILON);

    assert_eq!(summary.recent_workouts.len(), 3);
}

#[tokio::test]
async fn summary_of_no_workouts_is_all_zero() {
    let (tracker, _pool) = create_tracker().await;
    let workouts = tracker.completed(Uuid::new_v4()).await.unwrap();
    let summary = summarize_workouts(&workouts);

    assert_eq!(summary.total_workouts, 0);
    assert!(summary.total_duration_hours.abs() < f64::EPSILON);
    assert_eq!(summary.total_calories, 0);
    assert!(summary.by_exercise_type.is_empty());
    assert!(summary.recent_workouts.is_empty());
}
