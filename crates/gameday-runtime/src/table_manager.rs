//! File-change aware owner of the canonical table.
//!
//! Wraps [`load_game_table`] and remembers the source file's modification
//! time. [`TableManager::refresh`] re-runs the pipeline only when that time
//! changes (or when forced). A failed reload keeps serving the previous
//! table and records the error for the UI.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use gameday_core::error::{GamedayError, Result};
use gameday_core::models::GameTable;
use gameday_data::analysis::{load_game_table, LoadMetadata};

/// What a call to [`TableManager::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Unchanged,
    Reloaded,
    Failed,
}

pub struct TableManager {
    path: PathBuf,
    table: Arc<GameTable>,
    metadata: LoadMetadata,
    /// Modification time observed at the last successful load.
    loaded_mtime: Option<SystemTime>,
    last_error: Option<String>,
}

impl TableManager {
    /// Perform the initial load. Any failure here is fatal to the caller.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let loaded_mtime = modified_time(&path);
        let result = load_game_table(&path)?;
        Ok(Self {
            path,
            table: Arc::new(result.table),
            metadata: result.metadata,
            loaded_mtime,
            last_error: None,
        })
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Reload when the file changed since the last successful load, or
    /// unconditionally when `force` is set.
    pub fn refresh(&mut self, force: bool) -> RefreshOutcome {
        let current_mtime = modified_time(&self.path);
        if !force && current_mtime == self.loaded_mtime {
            return RefreshOutcome::Unchanged;
        }

        match load_game_table(&self.path) {
            Ok(result) => {
                tracing::debug!(games = result.table.len(), "game table reloaded");
                self.table = Arc::new(result.table);
                self.metadata = result.metadata;
                self.loaded_mtime = current_mtime;
                self.last_error = None;
                RefreshOutcome::Reloaded
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed; keeping previous table");
                self.last_error = Some(describe_load_error(&e));
                // Remember the broken mtime so an unchanged broken file is not
                // re-parsed on every tick.
                self.loaded_mtime = current_mtime;
                RefreshOutcome::Failed
            }
        }
    }

    pub fn table(&self) -> Arc<GameTable> {
        Arc::clone(&self.table)
    }

    pub fn metadata(&self) -> &LoadMetadata {
        &self.metadata
    }

    /// Description of the last failed reload, cleared by a successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Status text for a failed reload.
fn describe_load_error(error: &GamedayError) -> String {
    if error.is_parse_error() {
        format!("data file could not be parsed: {error}")
    } else {
        format!("data file could not be read: {error}")
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
