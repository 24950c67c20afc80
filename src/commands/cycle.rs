//! Commands for the cycle profile, stored events, calendar and dashboard

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::require_profile;
use crate::db::AppState;
use crate::projector::{self, CycleEvent, CycleProfile};
use crate::status::CycleStatus;
use crate::store;

/// ---------------------------------------------------------------------------
/// Profile Commands
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ProfileUpdate {
  pub profile: CycleProfile,
  pub events_written: usize,
  pub first_date: Option<NaiveDate>,
  pub last_date: Option<NaiveDate>,
}

/// Save the user's cycle profile and regenerate events from `today` onward
pub async fn set_cycle_profile(
  state: &AppState,
  user_id: &str,
  anchor_date: NaiveDate,
  cycle_length_days: u32,
  today: NaiveDate,
) -> Result<ProfileUpdate, String> {
  let profile = CycleProfile::new(anchor_date, cycle_length_days).map_err(|e| e.to_string())?;

  let events = store::save_profile_and_regenerate(
    &state.db,
    user_id,
    &profile,
    today,
    state.config.horizon_days,
  )
  .await
  .map_err(|e| e.to_string())?;

  Ok(ProfileUpdate {
    profile,
    events_written: events.len(),
    first_date: events.first().map(|e| e.date),
    last_date: events.last().map(|e| e.date),
  })
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
  pub profile: CycleProfile,
  pub bands: projector::PhaseBands,
}

pub async fn get_cycle_profile(state: &AppState, user_id: &str) -> Result<ProfileView, String> {
  let profile = require_profile(state, user_id).await?;
  Ok(ProfileView {
    bands: profile.bands(),
    profile,
  })
}

pub async fn delete_cycle_profile(state: &AppState, user_id: &str) -> Result<bool, String> {
  store::delete_profile(&state.db, user_id)
    .await
    .map_err(|e| e.to_string())
}

/// ---------------------------------------------------------------------------
/// Event Commands
/// ---------------------------------------------------------------------------

/// Stored events for `days` days starting at `from`
pub async fn get_cycle_events(
  state: &AppState,
  user_id: &str,
  from: NaiveDate,
  days: u32,
) -> Result<Vec<CycleEvent>, String> {
  projector::validate_horizon(days).map_err(|e| e.to_string())?;
  let to = projector::offset_date(from, days as i64 - 1).map_err(|e| e.to_string())?;
  store::load_events(&state.db, user_id, from, to)
    .await
    .map_err(|e| e.to_string())
}

/// Rebuild stored events from the saved profile, starting at `from`
pub async fn regenerate_cycle_events(
  state: &AppState,
  user_id: &str,
  from: NaiveDate,
) -> Result<usize, String> {
  let events = store::regenerate_events(&state.db, user_id, from, state.config.horizon_days)
    .await
    .map_err(|e| e.to_string())?;
  Ok(events.len())
}

/// ---------------------------------------------------------------------------
/// Dashboard + Calendar
/// ---------------------------------------------------------------------------

pub async fn get_cycle_status(
  state: &AppState,
  user_id: &str,
  today: NaiveDate,
) -> Result<CycleStatus, String> {
  let profile = require_profile(state, user_id).await?;
  CycleStatus::compute(&profile, today).map_err(|e| e.to_string())
}

/// Month grid, projected from the profile so past months render too
pub async fn get_calendar_month(
  state: &AppState,
  user_id: &str,
  year: i32,
  month: u32,
) -> Result<Vec<CycleEvent>, String> {
  let profile = require_profile(state, user_id).await?;
  projector::calendar_month(&profile, year, month).map_err(|e| e.to_string())
}

/// ---------------------------------------------------------------------------
/// Preview
/// ---------------------------------------------------------------------------

/// Project phases for an unsaved profile. Nothing is written; the stored
/// events stay the source of truth.
pub fn preview_cycle(
  anchor_date: NaiveDate,
  cycle_length_days: u32,
  from: NaiveDate,
  days: u32,
) -> Result<Vec<CycleEvent>, String> {
  let profile = CycleProfile::new(anchor_date, cycle_length_days).map_err(|e| e.to_string())?;
  let events = projector::project_events(&profile, from, days).map_err(|e| e.to_string())?;
  info!(days, "Previewed cycle projection");
  Ok(events)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
