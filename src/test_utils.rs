//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Date helpers

use crate::config::AppConfig;
use crate::db::AppState;
use crate::projector::CycleProfile;
use crate::store;
use crate::templates::TemplateCatalog;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub const TEST_USER: &str = "test-user";

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Save a profile for TEST_USER anchored on 2024-01-01 and project 90 days from the anchor
pub async fn seed_test_profile(pool: &SqlitePool, cycle_length_days: u32) -> CycleProfile {
  let profile = mock_profile(cycle_length_days);
  store::save_profile_and_regenerate(pool, TEST_USER, &profile, profile.anchor_date(), 90)
    .await
    .expect("Failed to seed cycle profile");
  profile
}

/// App state over a test pool with the built-in template catalog
pub fn test_state(pool: SqlitePool) -> AppState {
  AppState {
    db: pool,
    config: AppConfig {
      database_url: "sqlite::memory:".to_string(),
      user_id: TEST_USER.to_string(),
      ..AppConfig::default()
    },
    templates: TemplateCatalog::builtin(),
  }
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Profile anchored on 2024-01-01
pub fn mock_profile(cycle_length_days: u32) -> CycleProfile {
  CycleProfile::new(date_ymd(2024, 1, 1), cycle_length_days).expect("valid test profile")
}

/// ---------------------------------------------------------------------------
/// Date Helpers
/// ---------------------------------------------------------------------------

pub fn date_ymd(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('cycle_profiles', 'cycle_events')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected 2 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_profile_writes_events() {
    let pool = setup_test_db().await;

    seed_test_profile(&pool, 28).await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cycle_events WHERE user_id = ?")
      .bind(TEST_USER)
      .fetch_one(&pool)
      .await
      .expect("Failed to count events");

    assert_eq!(count, 90);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let profile = mock_profile(30);
    assert_eq!(profile.cycle_length_days(), 30);
    assert_eq!(profile.anchor_date(), date_ymd(2024, 1, 1));
  }
}
