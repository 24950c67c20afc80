//! `cyclestrong` command line
//!
//! ```bash
//! # Save a profile (regenerates the next 90 days of events)
//! cyclestrong profile set --anchor 2024-05-01 --length 29
//!
//! # Dashboard banner for today
//! cyclestrong status
//!
//! # Phase-appropriate workouts for a date
//! cyclestrong workouts --date 2024-05-16
//!
//! # Try a profile without saving it
//! cyclestrong preview --anchor 2024-05-01 --length 26 --days 30
//! ```

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::commands;
use crate::config::AppConfig;
use crate::db::{self, AppState};
use crate::projector::{DEFAULT_CYCLE_LENGTH_DAYS, DEFAULT_HORIZON_DAYS};
use crate::templates::TemplateCatalog;

#[derive(Parser)]
#[command(
  name = "cyclestrong",
  version,
  about = "Cycle-aware strength coach",
  long_about = "Projects menstrual cycle phases from your profile and recommends phase-appropriate strength sessions."
)]
pub struct Cli {
  #[command(subcommand)]
  command: Command,

  /// Database URL override
  #[arg(long, global = true)]
  database_url: Option<String>,

  /// User id override
  #[arg(long, global = true)]
  user: Option<String>,

  /// Enable debug logging
  #[arg(long, short = 'v', global = true)]
  pub verbose: bool,
}

#[derive(Subcommand)]
enum Command {
  /// Cycle profile management
  Profile {
    #[command(subcommand)]
    action: ProfileCommand,
  },

  /// Show stored cycle events
  Events {
    /// First date (defaults to today)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Number of days
    #[arg(long, default_value_t = DEFAULT_CYCLE_LENGTH_DAYS)]
    days: u32,
  },

  /// Dashboard status: phase of the day and days until next period
  Status {
    #[arg(long)]
    date: Option<NaiveDate>,
  },

  /// Phase for every day of a month
  Calendar {
    #[arg(long)]
    year: i32,

    #[arg(long)]
    month: u32,
  },

  /// Workout templates suited to the phase on a date
  Workouts {
    #[arg(long)]
    date: Option<NaiveDate>,
  },

  /// List the whole template catalog
  Templates,

  /// Rebuild stored events from the saved profile
  Regenerate {
    #[arg(long)]
    from: Option<NaiveDate>,
  },

  /// Project phases for an unsaved profile
  Preview {
    #[arg(long)]
    anchor: NaiveDate,

    #[arg(long, default_value_t = DEFAULT_CYCLE_LENGTH_DAYS)]
    length: u32,

    #[arg(long)]
    from: Option<NaiveDate>,

    #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
    days: u32,
  },
}

#[derive(Subcommand)]
enum ProfileCommand {
  /// Save anchor date and cycle length, then regenerate events
  Set {
    /// First day of the most recent period
    #[arg(long)]
    anchor: NaiveDate,

    /// Cycle length in days (21-35)
    #[arg(long, default_value_t = DEFAULT_CYCLE_LENGTH_DAYS)]
    length: u32,
  },

  /// Show the saved profile and its phase bands
  Show,

  /// Delete the profile and every stored event
  Delete,
}

impl Cli {
  /// Flags win over environment
  pub fn apply_overrides(&self, config: &mut AppConfig) {
    if let Some(url) = &self.database_url {
      config.database_url = url.clone();
    }
    if let Some(user) = &self.user {
      config.user_id = user.clone();
    }
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
  let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
  println!("{}", json);
  Ok(())
}

fn load_templates(config: &AppConfig) -> Result<TemplateCatalog, String> {
  match &config.templates_path {
    Some(path) => {
      let catalog = TemplateCatalog::load(path).map_err(|e| e.to_string())?;
      info!(path = %path.display(), templates = catalog.templates().len(), "Loaded template catalog");
      Ok(catalog)
    }
    None => Ok(TemplateCatalog::builtin()),
  }
}

pub async fn execute(cli: Cli, config: AppConfig) -> Result<(), String> {
  let today = Local::now().date_naive();

  // Storage-free commands first
  match &cli.command {
    Command::Preview {
      anchor,
      length,
      from,
      days,
    } => {
      let events = commands::cycle::preview_cycle(*anchor, *length, from.unwrap_or(today), *days)?;
      return print_json(&events);
    }
    Command::Templates => {
      let catalog = load_templates(&config)?;
      return print_json(&catalog.templates());
    }
    _ => {}
  }

  let templates = load_templates(&config)?;
  let pool = db::initialize_db(&config.database_url)
    .await
    .map_err(|e| format!("Failed to initialize database: {}", e))?;
  let user_id = config.user_id.clone();
  let state = AppState {
    db: pool,
    config,
    templates,
  };

  let result = match cli.command {
    Command::Profile { action } => match action {
      ProfileCommand::Set { anchor, length } => {
        let update = commands::cycle::set_cycle_profile(&state, &user_id, anchor, length, today).await?;
        print_json(&update)
      }
      ProfileCommand::Show => print_json(&commands::cycle::get_cycle_profile(&state, &user_id).await?),
      ProfileCommand::Delete => {
        let deleted = commands::cycle::delete_cycle_profile(&state, &user_id).await?;
        print_json(&serde_json::json!({ "deleted": deleted }))
      }
    },
    Command::Events { from, days } => {
      let events =
        commands::cycle::get_cycle_events(&state, &user_id, from.unwrap_or(today), days).await?;
      print_json(&events)
    }
    Command::Status { date } => {
      let status = commands::cycle::get_cycle_status(&state, &user_id, date.unwrap_or(today)).await?;
      info!("{}", status.headline());
      print_json(&status)
    }
    Command::Calendar { year, month } => {
      print_json(&commands::cycle::get_calendar_month(&state, &user_id, year, month).await?)
    }
    Command::Workouts { date } => {
      let workouts =
        commands::workouts::get_workouts_for_date(&state, &user_id, date.unwrap_or(today)).await?;
      print_json(&workouts)
    }
    Command::Regenerate { from } => {
      let count =
        commands::cycle::regenerate_cycle_events(&state, &user_id, from.unwrap_or(today)).await?;
      print_json(&serde_json::json!({ "events_written": count }))
    }
    Command::Preview { .. } | Command::Templates => Ok(()),
  };

  state.db.close().await;
  result
}
