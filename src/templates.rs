//! Phase-gated workout templates
//!
//! Each template lists the cycle phases it suits. Selection for a phase also
//! respects the phase's intensity cap, so a catalog that tags a heavy session
//! as luteal-friendly still won't surface it during the luteal phase.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::phase::{CyclePhase, Intensity};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum TemplateError {
  #[error("Failed to parse template catalog: {0}")]
  Parse(String),

  #[error("Failed to read template catalog: {0}")]
  Io(String),

  #[error("Template {0} is not assigned to any phase")]
  NoPhases(String),

  #[error("Duplicate template slug: {0}")]
  DuplicateSlug(String),
}

/// ---------------------------------------------------------------------------
/// Workout Template
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
  pub slug: String,
  pub name: String,
  pub focus: String,
  pub intensity: Intensity,
  pub duration_minutes: u32,
  pub phases: Vec<CyclePhase>,
}

impl WorkoutTemplate {
  pub fn suits(&self, phase: CyclePhase) -> bool {
    self.phases.contains(&phase) && self.intensity <= phase.guidance().max_intensity
  }
}

/// ---------------------------------------------------------------------------
/// Template Catalog
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TemplateCatalog {
  templates: Vec<WorkoutTemplate>,
}

impl TemplateCatalog {
  /// Build a catalog, rejecting phase-less templates and duplicate slugs
  pub fn new(templates: Vec<WorkoutTemplate>) -> Result<Self, TemplateError> {
    let mut seen = HashSet::new();
    for template in &templates {
      if template.phases.is_empty() {
        return Err(TemplateError::NoPhases(template.slug.clone()));
      }
      if !seen.insert(template.slug.as_str()) {
        return Err(TemplateError::DuplicateSlug(template.slug.clone()));
      }
    }
    Ok(Self { templates })
  }

  pub fn from_json(json: &str) -> Result<Self, TemplateError> {
    let templates: Vec<WorkoutTemplate> =
      serde_json::from_str(json).map_err(|e| TemplateError::Parse(e.to_string()))?;
    Self::new(templates)
  }

  pub fn load(path: &Path) -> Result<Self, TemplateError> {
    let json = std::fs::read_to_string(path)
      .map_err(|e| TemplateError::Io(format!("{}: {}", path.display(), e)))?;
    Self::from_json(&json)
  }

  pub fn templates(&self) -> &[WorkoutTemplate] {
    &self.templates
  }

  /// Templates suited to a phase, hardest first, then alphabetical
  pub fn for_phase(&self, phase: CyclePhase) -> Vec<&WorkoutTemplate> {
    let mut matching: Vec<&WorkoutTemplate> =
      self.templates.iter().filter(|t| t.suits(phase)).collect();
    matching.sort_by(|a, b| {
      b.intensity
        .cmp(&a.intensity)
        .then_with(|| a.name.cmp(&b.name))
    });
    matching
  }

  /// Default catalog; covers every phase with at least one template
  pub fn builtin() -> Self {
    use CyclePhase::*;

    let entries: [(&str, &str, &str, Intensity, u32, &[CyclePhase]); 8] = [
      (
        "restorative-mobility",
        "Restorative Mobility",
        "Hip and thoracic mobility, breathing, light core",
        Intensity::Low,
        30,
        &[Menstrual, Luteal],
      ),
      (
        "technique-primer",
        "Technique Primer",
        "Empty-bar and light-load squat, hinge and press patterning",
        Intensity::Low,
        40,
        &[Menstrual, Follicular],
      ),
      (
        "low-impact-strength",
        "Low-Impact Strength",
        "Machine and dumbbell full body at RPE 6-7",
        Intensity::Moderate,
        45,
        &[Menstrual, Luteal],
      ),
      (
        "heavy-compounds",
        "Heavy Compounds",
        "Squat, deadlift and bench top sets of 3-5 reps",
        Intensity::High,
        60,
        &[Follicular, Ovulation],
      ),
      (
        "power-plyometrics",
        "Power & Plyometrics",
        "Jumps, throws and Olympic lift variations",
        Intensity::High,
        45,
        &[Follicular, Ovulation],
      ),
      (
        "progressive-overload",
        "Progressive Overload",
        "Main lifts at planned load increases, 5x5",
        Intensity::High,
        55,
        &[Follicular],
      ),
      (
        "steady-hypertrophy",
        "Steady Hypertrophy",
        "Moderate loads, 8-12 reps, controlled tempo",
        Intensity::Moderate,
        50,
        &[Follicular, Ovulation, Luteal],
      ),
      (
        "deload-circuit",
        "Deload Circuit",
        "Reduced volume circuit at 60% of working loads",
        Intensity::Low,
        35,
        &[Luteal],
      ),
    ];

    let templates = entries
      .iter()
      .map(|(slug, name, focus, intensity, minutes, phases)| WorkoutTemplate {
        slug: slug.to_string(),
        name: name.to_string(),
        focus: focus.to_string(),
        intensity: *intensity,
        duration_minutes: *minutes,
        phases: phases.to_vec(),
      })
      .collect();

    Self { templates }
  }
}

impl Default for TemplateCatalog {
  fn default() -> Self {
    Self::builtin()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
