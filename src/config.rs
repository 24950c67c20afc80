use std::env;
use std::path::PathBuf;

use serde::Serialize;

use crate::projector::{DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DATABASE_URL: &str = "sqlite://cyclestrong.db?mode=rwc";
const DEFAULT_USER_ID: &str = "local";
const DEFAULT_LOG_FILTER: &str = "info";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value}")]
  Invalid { key: String, value: String },
}

/// ---------------------------------------------------------------------------
/// Application Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
  pub database_url: String,
  /// Days of cycle events written on every regeneration
  pub horizon_days: u32,
  /// Optional JSON workout template catalog; the built-in one is used otherwise
  pub templates_path: Option<PathBuf>,
  pub user_id: String,
  pub log_filter: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      horizon_days: DEFAULT_HORIZON_DAYS,
      templates_path: None,
      user_id: DEFAULT_USER_ID.to_string(),
      log_filter: DEFAULT_LOG_FILTER.to_string(),
    }
  }
}

impl AppConfig {
  /// Read configuration from the process environment.
  ///
  /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let horizon_days = match env::var("CYCLESTRONG_HORIZON_DAYS") {
      Ok(raw) => parse_horizon(&raw)?,
      Err(_) => defaults.horizon_days,
    };

    Ok(Self {
      database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
      horizon_days,
      templates_path: env::var("CYCLESTRONG_TEMPLATES")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from),
      user_id: env::var("CYCLESTRONG_USER").unwrap_or(defaults.user_id),
      log_filter: env::var("RUST_LOG").unwrap_or(defaults.log_filter),
    })
  }
}

fn parse_horizon(raw: &str) -> Result<u32, ConfigError> {
  let invalid = || ConfigError::Invalid {
    key: "CYCLESTRONG_HORIZON_DAYS".into(),
    value: raw.to_string(),
  };
  match raw.trim().parse::<u32>() {
    Ok(days) if (1..=MAX_HORIZON_DAYS).contains(&days) => Ok(days),
    _ => Err(invalid()),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const VARS: [&str; 5] = [
    "DATABASE_URL",
    "CYCLESTRONG_HORIZON_DAYS",
    "CYCLESTRONG_TEMPLATES",
    "CYCLESTRONG_USER",
    "RUST_LOG",
  ];

  fn unset_all() -> Vec<(&'static str, Option<&'static str>)> {
    VARS.iter().map(|k| (*k, None)).collect()
  }

  #[test]
  #[serial]
  fn test_defaults_when_env_empty() {
    temp_env::with_vars(unset_all(), || {
      let config = AppConfig::from_env().expect("defaults should load");
      assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
      assert_eq!(config.horizon_days, 90);
      assert_eq!(config.templates_path, None);
      assert_eq!(config.user_id, "local");
      assert_eq!(config.log_filter, "info");
    });
  }

  #[test]
  #[serial]
  fn test_env_overrides() {
    temp_env::with_vars(
      [
        ("DATABASE_URL", Some("sqlite::memory:")),
        ("CYCLESTRONG_HORIZON_DAYS", Some("120")),
        ("CYCLESTRONG_TEMPLATES", Some("/etc/cyclestrong/templates.json")),
        ("CYCLESTRONG_USER", Some("athlete-7")),
        ("RUST_LOG", Some("debug")),
      ],
      || {
        let config = AppConfig::from_env().expect("config should load");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.horizon_days, 120);
        assert_eq!(
          config.templates_path,
          Some(PathBuf::from("/etc/cyclestrong/templates.json"))
        );
        assert_eq!(config.user_id, "athlete-7");
        assert_eq!(config.log_filter, "debug");
      },
    );
  }

  #[test]
  #[serial]
  fn test_zero_horizon_rejected() {
    temp_env::with_var("CYCLESTRONG_HORIZON_DAYS", Some("0"), || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(err.to_string().contains("CYCLESTRONG_HORIZON_DAYS"));
    });
  }

  #[test]
  #[serial]
  fn test_horizon_upper_bound() {
    temp_env::with_var("CYCLESTRONG_HORIZON_DAYS", Some("3650"), || {
      let config = AppConfig::from_env().expect("config should load");
      assert_eq!(config.horizon_days, MAX_HORIZON_DAYS);
    });
    temp_env::with_var("CYCLESTRONG_HORIZON_DAYS", Some("3651"), || {
      assert!(AppConfig::from_env().is_err());
    });
    temp_env::with_var("CYCLESTRONG_HORIZON_DAYS", Some("4000000000"), || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(err.to_string().contains("4000000000"));
    });
  }

  #[test]
  #[serial]
  fn test_non_numeric_horizon_rejected() {
    temp_env::with_var("CYCLESTRONG_HORIZON_DAYS", Some("ninety"), || {
      assert!(AppConfig::from_env().is_err());
    });
  }

  #[test]
  #[serial]
  fn test_blank_templates_path_ignored() {
    temp_env::with_var("CYCLESTRONG_TEMPLATES", Some("  "), || {
      let config = AppConfig::from_env().expect("config should load");
      assert_eq!(config.templates_path, None);
    });
  }
}
