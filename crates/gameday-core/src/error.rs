use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the game-day dashboard.
#[derive(Error, Debug)]
pub enum GamedayError {
    /// The raw game-history file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The raw file is not well-formed CSV.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A canonical source column is absent from the header row.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Unnamed positional columns are not where the layout expects them.
    #[error("Unexpected column layout: {0}")]
    ColumnLayout(String),

    /// A row's date could not be parsed; normalization aborts.
    #[error("Unparseable date {value:?} on row {row}")]
    DateParse { row: usize, value: String },

    /// A row lacks a value the canonical table cannot do without.
    #[error("Missing {column} on row {row}")]
    MissingValue { row: usize, column: String },

    /// The start season sorts after the end season.
    #[error("Invalid season range: {start} is after {end}")]
    InvalidSeasonRange { start: String, end: String },

    /// A season named in the configuration is not present in the table.
    #[error("Unknown season: {0}")]
    UnknownSeason(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be produced or parsed.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GamedayError {
    /// `true` for the load-time failures that abort building the table.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            GamedayError::Csv(_)
                | GamedayError::MissingColumn(_)
                | GamedayError::ColumnLayout(_)
                | GamedayError::DateParse { .. }
                | GamedayError::MissingValue { .. }
        )
    }
}

/// Convenience alias used throughout the gameday crates.
pub type Result<T> = std::result::Result<T, GamedayError>;
