//! Cycle event store and profile source
//!
//! Future events are never patched: every write deletes the user's events
//! from the start date onward and inserts the fresh projection inside one
//! transaction, so readers see either the old set or the new one.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::models::{CycleEventRecord, CycleProfileRecord};
use crate::projector::{self, CycleError, CycleEvent, CycleProfile};

// ---------------------------------------------------------------------------
/// Error Handling
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error("No cycle profile for user {0}")]
    ProfileNotFound(String),

    #[error("Corrupt stored row: {0}")]
    CorruptRow(String),

    #[error("Event dated {date} precedes replacement start {from}")]
    EventBeforeStart { date: NaiveDate, from: NaiveDate },
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Profile Operations
// ---------------------------------------------------------------------------

/// Load a user's cycle profile, if one was saved
pub async fn load_profile(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<CycleProfile>, StoreError> {
    let mut conn = pool.acquire().await?;
    fetch_profile(&mut conn, user_id).await
}

async fn fetch_profile(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Option<CycleProfile>, StoreError> {
    let record = sqlx::query_as::<_, CycleProfileRecord>(
        r#"
        SELECT user_id, anchor_date, cycle_length_days, created_at, updated_at
        FROM cycle_profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;

    match record {
        Some(r) => Ok(Some(r.to_profile()?)),
        None => Ok(None),
    }
}

async fn upsert_profile(
    conn: &mut SqliteConnection,
    user_id: &str,
    profile: &CycleProfile,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO cycle_profiles (user_id, anchor_date, cycle_length_days, updated_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(user_id) DO UPDATE SET
            anchor_date = excluded.anchor_date,
            cycle_length_days = excluded.cycle_length_days,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(profile.anchor_date())
    .bind(profile.cycle_length_days() as i64)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(())
}

/// Save a profile and regenerate its future events in one transaction.
///
/// Returns the events that were written.
pub async fn save_profile_and_regenerate(
    pool: &SqlitePool,
    user_id: &str,
    profile: &CycleProfile,
    from: NaiveDate,
    horizon_days: u32,
) -> Result<Vec<CycleEvent>, StoreError> {
    let events = projector::project_events(profile, from, horizon_days)?;

    let mut tx = pool.begin().await?;
    upsert_profile(&mut tx, user_id, profile).await?;
    write_events(&mut tx, user_id, from, &events).await?;
    tx.commit().await?;

    info!(
        user_id,
        anchor = %profile.anchor_date(),
        cycle_length = profile.cycle_length_days(),
        events = events.len(),
        "Saved cycle profile and regenerated events"
    );

    Ok(events)
}

/// Remove a profile and every event derived from it
pub async fn delete_profile(pool: &SqlitePool, user_id: &str) -> Result<bool, StoreError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM cycle_events WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM cycle_profiles WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    info!(user_id, "Deleted cycle profile");
    Ok(deleted > 0)
}

// ---------------------------------------------------------------------------
// Event Operations
// ---------------------------------------------------------------------------

// Delete-then-insert; the caller owns the transaction.
async fn write_events(
    conn: &mut SqliteConnection,
    user_id: &str,
    from: NaiveDate,
    events: &[CycleEvent],
) -> Result<(), StoreError> {
    let removed = sqlx::query("DELETE FROM cycle_events WHERE user_id = ? AND date >= ?")
        .bind(user_id)
        .bind(from)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    for event in events {
        sqlx::query("INSERT INTO cycle_events (user_id, date, phase) VALUES (?1, ?2, ?3)")
            .bind(user_id)
            .bind(event.date)
            .bind(event.phase.as_str())
            .execute(&mut *conn)
            .await?;
    }

    debug!(user_id, removed, inserted = events.len(), "Replaced cycle events");
    Ok(())
}

/// Replace every event dated on or after `from` with `events`.
///
/// Events before `from` are left alone. Events in `events` dated before
/// `from` are rejected, since they would escape the delete.
pub async fn replace_future_events(
    pool: &SqlitePool,
    user_id: &str,
    from: NaiveDate,
    events: &[CycleEvent],
) -> Result<(), StoreError> {
    if let Some(stray) = events.iter().find(|e| e.date < from) {
        return Err(StoreError::EventBeforeStart {
            date: stray.date,
            from,
        });
    }

    let mut tx = pool.begin().await?;
    write_events(&mut tx, user_id, from, events).await?;
    tx.commit().await?;

    Ok(())
}

/// Rebuild future events from the stored profile.
///
/// The profile is read inside the write transaction.
pub async fn regenerate_events(
    pool: &SqlitePool,
    user_id: &str,
    from: NaiveDate,
    horizon_days: u32,
) -> Result<Vec<CycleEvent>, StoreError> {
    projector::validate_horizon(horizon_days)?;

    let mut tx = pool.begin().await?;
    let profile = fetch_profile(&mut tx, user_id)
        .await?
        .ok_or_else(|| StoreError::ProfileNotFound(user_id.to_string()))?;

    let events = projector::project_events(&profile, from, horizon_days)?;
    write_events(&mut tx, user_id, from, &events).await?;
    tx.commit().await?;

    info!(user_id, from = %from, events = events.len(), "Regenerated cycle events");
    Ok(events)
}

/// Stored events in `[from, to]`, ordered by date
pub async fn load_events(
    pool: &SqlitePool,
    user_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<CycleEvent>, StoreError> {
    let records = sqlx::query_as::<_, CycleEventRecord>(
        r#"
        SELECT id, user_id, date, phase, created_at
        FROM cycle_events
        WHERE user_id = ? AND date >= ? AND date <= ?
        ORDER BY date
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    records
        .iter()
        .map(|r| {
            r.to_event()
                .map_err(|e| StoreError::CorruptRow(format!("event {}: {}", r.id, e)))
        })
        .collect()
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
