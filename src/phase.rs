//! Menstrual cycle phases and the training guidance attached to each one

use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Cycle Phase
/// ---------------------------------------------------------------------------

/// One of the four phases of a cycle, declared in cycle order so that
/// `Ord` follows Menstrual -> Follicular -> Ovulation -> Luteal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
  Menstrual,
  Follicular,
  Ovulation,
  Luteal,
}

impl CyclePhase {
  pub const ALL: [CyclePhase; 4] = [
    CyclePhase::Menstrual,
    CyclePhase::Follicular,
    CyclePhase::Ovulation,
    CyclePhase::Luteal,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      CyclePhase::Menstrual => "menstrual",
      CyclePhase::Follicular => "follicular",
      CyclePhase::Ovulation => "ovulation",
      CyclePhase::Luteal => "luteal",
    }
  }

  /// Human-facing label for banners and calendar legends
  pub fn label(&self) -> &'static str {
    match self {
      CyclePhase::Menstrual => "Menstrual",
      CyclePhase::Follicular => "Follicular",
      CyclePhase::Ovulation => "Ovulation",
      CyclePhase::Luteal => "Luteal",
    }
  }

  /// The phase that follows this one; Luteal wraps to the next cycle's Menstrual
  pub fn next(&self) -> Self {
    match self {
      CyclePhase::Menstrual => CyclePhase::Follicular,
      CyclePhase::Follicular => CyclePhase::Ovulation,
      CyclePhase::Ovulation => CyclePhase::Luteal,
      CyclePhase::Luteal => CyclePhase::Menstrual,
    }
  }

  pub fn guidance(&self) -> PhaseGuidance {
    match self {
      CyclePhase::Menstrual => PhaseGuidance {
        phase: *self,
        max_intensity: Intensity::Moderate,
        note: "Energy is usually lowest. Favour mobility, technique and light strength; \
               keep loads submaximal and let how you feel set the session.",
      },
      CyclePhase::Follicular => PhaseGuidance {
        phase: *self,
        max_intensity: Intensity::High,
        note: "Rising estrogen supports recovery. Good window for progressive overload \
               and heavier compound lifts.",
      },
      CyclePhase::Ovulation => PhaseGuidance {
        phase: *self,
        max_intensity: Intensity::High,
        note: "Strength tends to peak. Attempt top sets and power work, but warm up \
               thoroughly and keep landing mechanics clean.",
      },
      CyclePhase::Luteal => PhaseGuidance {
        phase: *self,
        max_intensity: Intensity::Moderate,
        note: "Higher perceived effort and body temperature. Hold loads steady, \
               prioritise hypertrophy volume and plan a deload late in the phase.",
      },
    }
  }
}

impl std::fmt::Display for CyclePhase {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for CyclePhase {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "menstrual" => Ok(Self::Menstrual),
      "follicular" => Ok(Self::Follicular),
      "ovulation" => Ok(Self::Ovulation),
      "luteal" => Ok(Self::Luteal),
      _ => Err(format!("Unknown cycle phase: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Training Intensity
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
  Low,      // Mobility, walking, technique
  Moderate, // Submaximal strength, steady volume
  High,     // Heavy compounds, power, top sets
}

impl Intensity {
  pub fn as_str(&self) -> &'static str {
    match self {
      Intensity::Low => "low",
      Intensity::Moderate => "moderate",
      Intensity::High => "high",
    }
  }
}

/// Coaching note and intensity cap for a phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseGuidance {
  pub phase: CyclePhase,
  pub max_intensity: Intensity,
  pub note: &'static str,
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_phase_string_roundtrip() {
    for phase in CyclePhase::ALL {
      let parsed: CyclePhase = phase.to_string().parse().unwrap();
      assert_eq!(parsed, phase);
    }
  }

  #[test]
  fn test_unknown_phase_rejected() {
    let result = "ovulatory".parse::<CyclePhase>();
    assert!(result.unwrap_err().contains("Unknown cycle phase"));
  }

  #[test]
  fn test_phase_order_follows_cycle() {
    assert!(CyclePhase::Menstrual < CyclePhase::Follicular);
    assert!(CyclePhase::Follicular < CyclePhase::Ovulation);
    assert!(CyclePhase::Ovulation < CyclePhase::Luteal);
  }

  #[test]
  fn test_next_wraps_to_menstrual() {
    assert_eq!(CyclePhase::Menstrual.next(), CyclePhase::Follicular);
    assert_eq!(CyclePhase::Luteal.next(), CyclePhase::Menstrual);
  }

  #[test]
  fn test_serde_uses_snake_case() {
    let json = serde_json::to_string(&CyclePhase::Ovulation).unwrap();
    assert_eq!(json, "\"ovulation\"");
    let parsed: CyclePhase = serde_json::from_str("\"luteal\"").unwrap();
    assert_eq!(parsed, CyclePhase::Luteal);
  }

  #[test]
  fn test_guidance_caps_intensity_in_low_energy_phases() {
    assert_eq!(CyclePhase::Menstrual.guidance().max_intensity, Intensity::Moderate);
    assert_eq!(CyclePhase::Luteal.guidance().max_intensity, Intensity::Moderate);
    assert_eq!(CyclePhase::Ovulation.guidance().max_intensity, Intensity::High);
  }
}
