use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{GamedayError, Result};
use crate::models::{DateCriterion, MonthDayKey};
use crate::time_utils::parse_weekday;

/// Name of the per-user state directory under `$HOME`.
pub const APP_DIR_NAME: &str = ".gameday";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Historical game-day win/loss explorer
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gameday",
    about = "Explore a team's historical record by date, weekday and opponent",
    version
)]
pub struct Settings {
    /// Game history CSV file
    #[arg(long, default_value = "bruins_game_history.csv")]
    pub data_file: PathBuf,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "report"])]
    pub view: String,

    /// First season of the range (defaults to the earliest season)
    #[arg(long)]
    pub start_season: Option<String>,

    /// Last season of the range (defaults to the latest season)
    #[arg(long)]
    pub end_season: Option<String>,

    /// Explore a specific date of the year (MM-DD)
    #[arg(long, conflicts_with = "day")]
    pub date: Option<String>,

    /// Explore a day of the week (e.g. Saturday)
    #[arg(long)]
    pub day: Option<String>,

    /// Narrow the explored record to one opponent
    #[arg(long)]
    pub opponent: Option<String>,

    /// Timezone used to decide "today" (`auto` for the system timezone)
    #[arg(long, default_value = "America/New_York")]
    pub timezone: String,

    /// Display theme
    #[arg(long, default_value = "gold", value_parser = ["gold", "light", "dark", "auto"])]
    pub theme: String,

    /// Seconds between checks of the data file for changes (1-300)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=300))]
    pub reload_interval: u32,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Display configuration persisted to `~/.gameday/last_used.json`.
///
/// Filter selections are deliberately absent: they live only for one viewer
/// session.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload_interval: Option<u32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, resolve `"auto"` values, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "failed to clear saved configuration");
            }
            return Self::resolve_auto_values(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "timezone") {
            if let Some(v) = last.timezone {
                settings.timezone = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "data_file") {
            if let Some(v) = last.data_file {
                settings.data_file = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "reload_interval") {
            if let Some(v) = last.reload_interval {
                settings.reload_interval = v.clamp(1, 300);
            }
        }

        settings = Self::resolve_auto_values(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!(error = %e, "failed to persist configuration");
        }

        settings
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// The initial explore criterion from `--date` / `--day`.
    pub fn explore_criterion(&self) -> Result<Option<DateCriterion>> {
        if let Some(date) = &self.date {
            let key: MonthDayKey = date.parse()?;
            return Ok(Some(DateCriterion::MonthDay(key)));
        }
        if let Some(day) = &self.day {
            let weekday = parse_weekday(day)
                .ok_or_else(|| GamedayError::Config(format!("unknown day of week {day:?}")))?;
            return Ok(Some(DateCriterion::Weekday(weekday)));
        }
        Ok(None)
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            timezone: Some(s.timezone.clone()),
            data_file: Some(s.data_file.clone()),
            reload_interval: Some(s.reload_interval),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
