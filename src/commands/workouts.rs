//! Phase-gated workout template commands

use chrono::NaiveDate;
use serde::Serialize;

use super::require_profile;
use crate::db::AppState;
use crate::phase::{CyclePhase, PhaseGuidance};
use crate::projector;
use crate::templates::WorkoutTemplate;

#[derive(Debug, Serialize)]
pub struct PhaseWorkouts {
  pub date: NaiveDate,
  pub phase: CyclePhase,
  pub guidance: PhaseGuidance,
  pub templates: Vec<WorkoutTemplate>,
}

/// Templates suited to the user's phase on `date`
pub async fn get_workouts_for_date(
  state: &AppState,
  user_id: &str,
  date: NaiveDate,
) -> Result<PhaseWorkouts, String> {
  let profile = require_profile(state, user_id).await?;
  let phase = projector::phase_on_date(&profile, date);

  Ok(PhaseWorkouts {
    date,
    phase,
    guidance: phase.guidance(),
    templates: state.templates.for_phase(phase).into_iter().cloned().collect(),
  })
}
