// ABOUTME: Integration tests for phase, progress, and summary analytics
// ABOUTME: Exercises the calculators through the engine against seeded history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

// Test files: allow missing_docs and unwrap
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use chrono::{Duration, Utc};
use uuid::Uuid;

use vitalog_server::database::sessions::SessionManager;
use vitalog_server::models::{FastingPlan, StartMode};
use vitalog_server::sessions::tracker::{CustomOffset, StopOptions};
use vitalog_server::sessions::{
    phase_breakdown, plan_progress, summarize_sessions, SessionTracker,
};

async fn create_tracker() -> (SessionTracker<SessionManager>, sqlx::SqlitePool) {
    let pool = common::create_test_pool().await;
    (SessionTracker::new(SessionManager::new(pool.clone())), pool)
}

#[tokio::test]
async fn one_hour_fast_end_to_end() {
    let (tracker, _pool) = create_tracker().await;
    let user = Uuid::new_v4();

    // Start backdated 65 minutes, stop now: the distilled 16:8 scenario.
    let session = tracker
        .start(
            user,
            StartMode::Custom,
            Some(CustomOffset { hours: 1, minutes: 5 }),
            FastingPlan::SixteenEight,
        )
        .await
        .unwrap();
    let stopped = tracker
        .stop(user, session.id, StopOptions::default())
        .await
        .unwrap();

    let duration = stopped.duration_minutes.unwrap();
    assert_eq!(duration, 65);

    let phases = phase_breakdown(duration);
    let minutes: Vec<i64> = phases.iter().map(|p| p.minutes).collect();
    assert_eq!(minutes, vec![65, 0, 0, 0]);

    let progress = plan_progress(duration, stopped.plan);
    assert!((progress.completion_percentage - 6.77).abs() < f64::EPSILON);
    assert!((progress.remaining_hours - 14.92).abs() < f64::EPSILON);
}

#[tokio::test]
async fn summary_totals_and_phase_hours() {
    let (tracker, pool) = create_tracker().await;
    let user = Uuid::new_v4();

    // 600 minutes: 240 fed + 360 transition
    let end_a = Utc::now() - Duration::days(2);
    common::insert_completed_session(
        &pool,
        user,
        end_a - Duration::minutes(600),
        end_a,
        FastingPlan::SixteenEight,
    )
    .await;

    // 1000 minutes: 240 fed + 480 transition + 240 fasting + 40 ketosis
    let end_b = Utc::now() - Duration::days(1);
    common::insert_completed_session(
        &pool,
        user,
        end_b - Duration::minutes(1000),
        end_b,
        FastingPlan::EighteenSix,
    )
    .await;

    let sessions = tracker.completed(user).await.unwrap();
    let summary = summarize_sessions(&sessions, Utc::now().date_naive());

    assert_eq!(summary.total_sessions, 2);
    // 1600 minutes in total
    assert!((summary.total_duration_hours - 26.67).abs() < f64::EPSILON);
    assert!((summary.average_session_hours - 13.33).abs() < f64::EPSILON);
    assert!((summary.longest_session_hours - 16.67).abs() < f64::EPSILON);

    // Phase totals across both fasts
    assert!((summary.phase_hours.fed - 8.0).abs() < f64::EPSILON);
    assert!((summary.phase_hours.transition - 14.0).abs() < f64::EPSILON);
    assert!((summary.phase_hours.fasting - 4.0).abs() < f64::EPSILON);
    assert!((summary.phase_hours.ketosis - 0.67).abs() < f64::EPSILON);

    assert_eq!(summary.plan_usage.get("16:8"), Some(&1));
    assert_eq!(summary.plan_usage.get("18:6"), Some(&1));
}

#[tokio::test]
async fn summary_of_no_sessions_is_all_zero() {
    let (tracker, _pool) = create_tracker().await;
    let sessions = tracker.completed(Uuid::new_v4()).await.unwrap();
    let summary = summarize_sessions(&sessions, Utc::now().date_naive());

    assert_eq!(summary.total_sessions, 0);
    assert!(summary.total_duration_hours.abs() < f64::EPSILON);
    assert!(summary.average_session_hours.abs() < f64::EPSILON);
    assert!(summary.longest_session_hours.abs() < f64::EPSILON);
    assert_eq!(summary.current_streak_days, 0);
    assert!(summary.plan_usage.is_empty());
    assert!(summary.recent_sessions.is_empty());
}

#[tokio::test]
async fn active_sessions_are_excluded_from_aggregation() {
    let (tracker, pool) = create_tracker().await;
    let user = Uuid::new_v4();

    common::insert_session_days_ago(&pool, user, 1, 16, FastingPlan::SixteenEight).await;
    tracker
        .start(user, StartMode::Immediate, None, FastingPlan::SixteenEight)
        .await
        .unwrap();

    let sessions = tracker.completed(user).await.unwrap();
    let summary = summarize_sessions(&sessions, Utc::now().date_naive());
    assert_eq!(summary.total_sessions, 1);
}

#[tokio::test]
async fn streak_counts_consecutive_days_back_from_today() {
    let (tracker, pool) = create_tracker().await;
    let user = Uuid::new_v4();

    for days_ago in 0..3 {
        common::insert_session_days_ago(&pool, user, days_ago, 14, FastingPlan::FourteenTen).await;
    }
    // A gap at 3 days ago, then an older session that must not count
    common::insert_session_days_ago(&pool, user, 5, 14, FastingPlan::FourteenTen).await;

    let sessions = tracker.completed(user).await.unwrap();
    let summary = summarize_sessions(&sessions, Utc::now().date_naive());
    assert_eq!(summary.current_streak_days, 3);
}

#[tokio::test]
async fn streak_ending_yesterday_still_counts() {
    let (tracker, pool) = create_tracker().await;
    let user = Uuid::new_v4();

    common::insert_session_days_ago(&pool, user, 1, 16, FastingPlan::SixteenEight).await;
    common::insert_session_days_ago(&pool, user, 2, 16, FastingPlan::SixteenEight).await;

    let sessions = tracker.completed(user).await.unwrap();
    let summary = summarize_sessions(&sessions, Utc::now().date_naive());
    assert_eq!(summary.current_streak_days, 2);
}

#[tokio::test]
async fn streak_is_zero_without_a_session_today_or_yesterday() {
    let (tracker, pool) = create_tracker().await;
    let user = Uuid::new_v4();

    common::insert_session_days_ago(&pool, user, 2, 16, FastingPlan::SixteenEight).await;
    common::insert_session_days_ago(&pool, user, 3, 16, FastingPlan::SixteenEight).await;

    let sessions = tracker.completed(user).await.unwrap();
    let summary = summarize_sessions(&sessions, Utc::now().date_naive());
    assert_eq!(summary.current_streak_days, 0);
}

#[tokio::test]
async fn multiple_sessions_on_one_day_count_once_for_the_streak() {
    let (tracker, pool) = create_tracker().await;
    let user = Uuid::new_v4();

    common::insert_session_days_ago(&pool, user, 0, 2, FastingPlan::TwelveTwelve).await;
    common::insert_session_days_ago(&pool, user, 0, 4, FastingPlan::TwelveTwelve).await;

    let sessions = tracker.completed(user).await.unwrap();
    let summary = summarize_sessions(&sessions, Utc::now().date_naive());
    assert_eq!(summary.current_streak_days, 1);
    assert_eq!(summary.total_sessions, 2);
}

#[tokio::test]
async fn recent_sessions_are_newest_first_and_capped() {
    let (tracker, pool) = create_tracker().await;
    let user = Uuid::new_v4();

    for days_ago in 0..7 {
        common::insert_session_days_ago(&pool, user, days_ago, 16, FastingPlan::SixteenEight).await;
    }

    let sessions = tracker.completed(user).await.unwrap();
    let summary = summarize_sessions(&sessions, Utc::now().date_naive());

    assert_eq!(summary.recent_sessions.len(), 5);
    for pair in summary.recent_sessions.windows(2) {
        assert!(pair[0].date >= pair[1].date);
    }
    // A 16-hour fast reaches ketosis for no time at all: 960 minutes exactly
    let first = &summary.recent_sessions[0];
    assert_eq!(first.duration_minutes, 960);
    assert!(first.phase_hours.ketosis.abs() < f64::EPSILON);
}
