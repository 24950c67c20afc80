pub mod cycle;
pub mod workouts;

use crate::db::AppState;
use crate::projector::CycleProfile;
use crate::store;

/// Stored profile for a user, or a front-end facing error when none exists yet
async fn require_profile(state: &AppState, user_id: &str) -> Result<CycleProfile, String> {
  store::load_profile(&state.db, user_id)
    .await
    .map_err(|e| e.to_string())?
    .ok_or_else(|| format!("No cycle profile for user {}; set one first", user_id))
}
