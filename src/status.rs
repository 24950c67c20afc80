//! Dashboard status banner
//!
//! Answers "what phase am I in today and how long until my next period?"
//! straight from the projector, so the banner never depends on stored events.

use chrono::NaiveDate;
use serde::Serialize;

use crate::phase::{CyclePhase, PhaseGuidance};
use crate::projector::{self, CycleError, CycleProfile};

#[derive(Debug, Clone, Serialize)]
pub struct CycleStatus {
  pub date: NaiveDate,
  pub phase: CyclePhase,
  pub phase_label: &'static str,
  /// 1-based day of the cycle
  pub cycle_day: u32,
  pub cycle_length_days: u32,
  /// 1-based day within the current phase
  pub day_of_phase: u32,
  /// Days left in the current phase, today included
  pub phase_days_remaining: u32,
  pub next_phase: CyclePhase,
  pub next_phase_starts: NaiveDate,
  pub next_period_date: NaiveDate,
  /// 0 while menstruating
  pub days_until_next_period: i64,
  pub guidance: PhaseGuidance,
}

impl CycleStatus {
  pub fn compute(profile: &CycleProfile, today: NaiveDate) -> Result<Self, CycleError> {
    let bands = profile.bands();
    let day = projector::cycle_day(profile, today);
    let phase = bands.phase_at(day);
    let band = bands.range_of(phase);

    let day_of_phase = day - band.start + 1;
    let phase_days_remaining = band.end - day;
    let next_phase = phase.next();
    let next_phase_starts = projector::offset_date(today, phase_days_remaining as i64)?;

    let next_period_date = projector::next_phase_onset(profile, today, CyclePhase::Menstrual)?;

    Ok(Self {
      date: today,
      phase,
      phase_label: phase.label(),
      cycle_day: day + 1,
      cycle_length_days: profile.cycle_length_days(),
      day_of_phase,
      phase_days_remaining,
      next_phase,
      next_phase_starts,
      next_period_date,
      days_until_next_period: (next_period_date - today).num_days(),
      guidance: phase.guidance(),
    })
  }

  /// One-line banner text for the dashboard header
  pub fn headline(&self) -> String {
    match self.days_until_next_period {
      0 => format!(
        "{} phase, day {} of your cycle. Period in progress.",
        self.phase_label, self.cycle_day
      ),
      1 => format!(
        "{} phase, day {} of your cycle. Next period tomorrow.",
        self.phase_label, self.cycle_day
      ),
      days => format!(
        "{} phase, day {} of your cycle. Next period in {} days.",
        self.phase_label, self.cycle_day, days
      ),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn profile_28() -> CycleProfile {
    CycleProfile::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 28).unwrap()
  }

  fn day(offset: i64) -> NaiveDate {
    profile_28().anchor_date() + Duration::days(offset)
  }

  #[test]
  fn test_status_during_period() {
    let status = CycleStatus::compute(&profile_28(), day(2)).unwrap();
    assert_eq!(status.phase, CyclePhase::Menstrual);
    assert_eq!(status.cycle_day, 3);
    assert_eq!(status.day_of_phase, 3);
    assert_eq!(status.phase_days_remaining, 3);
    assert_eq!(status.days_until_next_period, 0);
    assert_eq!(status.next_period_date, day(2));
    assert_eq!(status.next_phase, CyclePhase::Follicular);
    assert_eq!(status.next_phase_starts, day(5));
    assert!(status.headline().contains("Period in progress"));
  }

  #[test]
  fn test_status_in_luteal_phase() {
    let status = CycleStatus::compute(&profile_28(), day(20)).unwrap();
    assert_eq!(status.phase, CyclePhase::Luteal);
    assert_eq!(status.cycle_day, 21);
    assert_eq!(status.day_of_phase, 3);
    assert_eq!(status.phase_days_remaining, 8);
    assert_eq!(status.days_until_next_period, 8);
    assert_eq!(status.next_period_date, day(28));
    assert_eq!(status.next_phase_starts, day(28));
    assert!(status.headline().contains("Next period in 8 days"));
  }

  #[test]
  fn test_status_last_day_of_cycle() {
    let status = CycleStatus::compute(&profile_28(), day(27)).unwrap();
    assert_eq!(status.cycle_day, 28);
    assert_eq!(status.days_until_next_period, 1);
    assert!(status.headline().contains("tomorrow"));
  }

  #[test]
  fn test_status_before_anchor() {
    let status = CycleStatus::compute(&profile_28(), day(-1)).unwrap();
    assert_eq!(status.phase, CyclePhase::Luteal);
    assert_eq!(status.cycle_day, 28);
    assert_eq!(status.next_period_date, day(0));
  }

  #[test]
  fn test_status_at_last_representable_date() {
    let result = CycleStatus::compute(&profile_28(), NaiveDate::MAX);
    assert!(matches!(result, Err(CycleError::DateOutOfRange { .. })));
  }

  #[test]
  fn test_status_carries_phase_guidance() {
    let status = CycleStatus::compute(&profile_28(), day(14)).unwrap();
    assert_eq!(status.phase, CyclePhase::Ovulation);
    assert_eq!(status.guidance.phase, CyclePhase::Ovulation);
  }
}
