use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::projector::{CycleEvent, CycleProfile};
use crate::store::StoreError;

/// Row of `cycle_profiles`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CycleProfileRecord {
  pub user_id: String,
  pub anchor_date: NaiveDate,
  pub cycle_length_days: i64,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

impl CycleProfileRecord {
  /// Re-validate the stored values; a row edited outside the app may be out of range
  pub fn to_profile(&self) -> Result<CycleProfile, StoreError> {
    let length = u32::try_from(self.cycle_length_days).map_err(|_| {
      StoreError::CorruptRow(format!(
        "profile {}: cycle length {}",
        self.user_id, self.cycle_length_days
      ))
    })?;
    Ok(CycleProfile::new(self.anchor_date, length)?)
  }
}

/// Row of `cycle_events`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CycleEventRecord {
  pub id: i64,
  pub user_id: String,
  pub date: NaiveDate,
  pub phase: String,
  pub created_at: Option<DateTime<Utc>>,
}

impl CycleEventRecord {
  pub fn to_event(&self) -> Result<CycleEvent, String> {
    Ok(CycleEvent {
      date: self.date,
      phase: self.phase.parse()?,
    })
  }
}
