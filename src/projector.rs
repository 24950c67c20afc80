//! Cycle Phase Projector
//!
//! Partitions a cycle into four contiguous phase bands and answers date
//! queries against a user's cycle profile:
//! - which phase a calendar date falls in
//! - the (date, phase) sequence over a forward horizon
//! - when a given phase next begins
//!
//! Band allocation is sequential day counting, not proportional scaling:
//! - Menstrual and Ovulation keep fixed lengths (5 and 4 days)
//! - Follicular = floor((length - 5) / 2) - 2
//! - Luteal absorbs the remainder
//!
//! Everything here is pure. Dates are calendar dates with no time zone, and
//! days before the anchor wrap with Euclidean modulo.

use std::ops::Range;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::phase::CyclePhase;

pub const MIN_CYCLE_LENGTH_DAYS: u32 = 21;
pub const MAX_CYCLE_LENGTH_DAYS: u32 = 35;
pub const DEFAULT_CYCLE_LENGTH_DAYS: u32 = 28;
pub const DEFAULT_HORIZON_DAYS: u32 = 90;
pub const MAX_HORIZON_DAYS: u32 = 3650;

const MENSTRUAL_DAYS: u32 = 5;
const OVULATION_DAYS: u32 = 4;

// ---------------------------------------------------------------------------
/// Error Handling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CycleError {
    #[error("Cycle length must be between 21 and 35 days, got {0}")]
    InvalidCycleLength(u32),

    #[error("Horizon must be between 1 and 3650 days, got {0}")]
    InvalidHorizon(u32),

    #[error("Date out of range: {from} plus {days} days")]
    DateOutOfRange { from: NaiveDate, days: i64 },

    #[error("Invalid calendar month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

// ---------------------------------------------------------------------------
/// Phase Bands: day lengths of each phase for one cycle length
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseBands {
    pub menstrual: u32,
    pub follicular: u32,
    pub ovulation: u32,
    pub luteal: u32,
}

impl PhaseBands {
    /// Compute bands for a cycle length, rejecting lengths outside 21..=35
    pub fn for_cycle_length(cycle_length_days: u32) -> Result<Self, CycleError> {
        validate_cycle_length(cycle_length_days)?;
        Ok(Self::allocate(cycle_length_days))
    }

    // Caller guarantees the length is in range, so no band underflows.
    fn allocate(cycle_length_days: u32) -> Self {
        let follicular = (cycle_length_days - MENSTRUAL_DAYS) / 2 - 2;
        let luteal = cycle_length_days - MENSTRUAL_DAYS - follicular - OVULATION_DAYS;
        Self {
            menstrual: MENSTRUAL_DAYS,
            follicular,
            ovulation: OVULATION_DAYS,
            luteal,
        }
    }

    pub fn cycle_length(&self) -> u32 {
        self.menstrual + self.follicular + self.ovulation + self.luteal
    }

    pub fn len_of(&self, phase: CyclePhase) -> u32 {
        match phase {
            CyclePhase::Menstrual => self.menstrual,
            CyclePhase::Follicular => self.follicular,
            CyclePhase::Ovulation => self.ovulation,
            CyclePhase::Luteal => self.luteal,
        }
    }

    /// Half-open range of 0-indexed cycle days covered by a phase
    pub fn range_of(&self, phase: CyclePhase) -> Range<u32> {
        let start: u32 = CyclePhase::ALL
            .iter()
            .take_while(|p| **p != phase)
            .map(|p| self.len_of(*p))
            .sum();
        start..start + self.len_of(phase)
    }

    /// Phase for a 0-indexed cycle day (taken modulo the cycle length)
    pub fn phase_at(&self, cycle_day: u32) -> CyclePhase {
        let day = cycle_day % self.cycle_length();
        let mut boundary = 0;
        for phase in CyclePhase::ALL {
            boundary += self.len_of(phase);
            if day < boundary {
                return phase;
            }
        }
        CyclePhase::Luteal
    }
}

fn validate_cycle_length(cycle_length_days: u32) -> Result<(), CycleError> {
    if (MIN_CYCLE_LENGTH_DAYS..=MAX_CYCLE_LENGTH_DAYS).contains(&cycle_length_days) {
        Ok(())
    } else {
        Err(CycleError::InvalidCycleLength(cycle_length_days))
    }
}

// ---------------------------------------------------------------------------
/// Cycle Profile: anchor date + cycle length, validated on construction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCycleProfile")]
pub struct CycleProfile {
    anchor_date: NaiveDate,
    cycle_length_days: u32,
}

#[derive(Deserialize)]
struct RawCycleProfile {
    anchor_date: NaiveDate,
    cycle_length_days: u32,
}

impl TryFrom<RawCycleProfile> for CycleProfile {
    type Error = CycleError;

    fn try_from(raw: RawCycleProfile) -> Result<Self, Self::Error> {
        CycleProfile::new(raw.anchor_date, raw.cycle_length_days)
    }
}

impl CycleProfile {
    pub fn new(anchor_date: NaiveDate, cycle_length_days: u32) -> Result<Self, CycleError> {
        validate_cycle_length(cycle_length_days)?;
        Ok(Self {
            anchor_date,
            cycle_length_days,
        })
    }

    /// First day of the most recent menstrual onset
    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor_date
    }

    pub fn cycle_length_days(&self) -> u32 {
        self.cycle_length_days
    }

    pub fn bands(&self) -> PhaseBands {
        PhaseBands::allocate(self.cycle_length_days)
    }
}

// ---------------------------------------------------------------------------
/// Cycle Event: one projected calendar day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleEvent {
    pub date: NaiveDate,
    pub phase: CyclePhase,
}

/// Reject horizons outside 1..=MAX_HORIZON_DAYS
pub fn validate_horizon(horizon_days: u32) -> Result<(), CycleError> {
    if (1..=MAX_HORIZON_DAYS).contains(&horizon_days) {
        Ok(())
    } else {
        Err(CycleError::InvalidHorizon(horizon_days))
    }
}

/// `from + days`, or `DateOutOfRange` past chrono's calendar limits
pub fn offset_date(from: NaiveDate, days: i64) -> Result<NaiveDate, CycleError> {
    from.checked_add_signed(Duration::days(days))
        .ok_or(CycleError::DateOutOfRange { from, days })
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// 0-indexed day within the cycle that `date` falls on
pub fn cycle_day(profile: &CycleProfile, date: NaiveDate) -> u32 {
    let days_since_anchor = (date - profile.anchor_date).num_days();
    days_since_anchor.rem_euclid(profile.cycle_length_days as i64) as u32
}

pub fn phase_on_date(profile: &CycleProfile, date: NaiveDate) -> CyclePhase {
    profile.bands().phase_at(cycle_day(profile, date))
}

/// Project `horizon_days` consecutive days starting at `start`.
///
/// Emits whole band runs at a time instead of looking up every day.
pub fn project_events(
    profile: &CycleProfile,
    start: NaiveDate,
    horizon_days: u32,
) -> Result<Vec<CycleEvent>, CycleError> {
    validate_horizon(horizon_days)?;
    // The last date must exist before anything is allocated
    offset_date(start, horizon_days as i64 - 1)?;

    let bands = profile.bands();
    let length = bands.cycle_length();

    let mut events = Vec::with_capacity(horizon_days as usize);
    let mut dates = start.iter_days();
    let mut day = cycle_day(profile, start);
    let mut remaining = horizon_days;

    while remaining > 0 {
        let phase = bands.phase_at(day);
        let run = (bands.range_of(phase).end - day).min(remaining);

        for date in dates.by_ref().take(run as usize) {
            events.push(CycleEvent { date, phase });
        }

        day = (day + run) % length;
        remaining -= run;
    }

    Ok(events)
}

/// Earliest date on or after `from` whose phase is `target`.
///
/// Returns `from` itself when it already sits inside the target band.
pub fn next_phase_onset(
    profile: &CycleProfile,
    from: NaiveDate,
    target: CyclePhase,
) -> Result<NaiveDate, CycleError> {
    let bands = profile.bands();
    let day = cycle_day(profile, from);
    let band = bands.range_of(target);

    if band.contains(&day) {
        return Ok(from);
    }

    let offset = (band.start as i64 - day as i64).rem_euclid(bands.cycle_length() as i64);
    offset_date(from, offset)
}

/// Days from `from` until `target` next begins (0 when already in it)
pub fn days_until_phase(
    profile: &CycleProfile,
    from: NaiveDate,
    target: CyclePhase,
) -> Result<i64, CycleError> {
    Ok((next_phase_onset(profile, from, target)? - from).num_days())
}

/// Every day of a calendar month with its phase
pub fn calendar_month(
    profile: &CycleProfile,
    year: i32,
    month: u32,
) -> Result<Vec<CycleEvent>, CycleError> {
    let invalid = || CycleError::InvalidMonth { year, month };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;

    let days_in_month = (next_first - first).num_days() as u32;
    project_events(profile, first, days_in_month)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
