//! Load pipeline: read the flat file, normalise it, report timings.

use std::path::Path;

use chrono::Utc;
use gameday_core::error::Result;
use gameday_core::models::GameTable;
use tracing::info;

use crate::normalizer::TableNormalizer;
use crate::reader::read_raw_table;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside a loaded table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadMetadata {
    /// ISO-8601 timestamp when the table was loaded.
    pub generated_at: String,
    /// Data rows read from the file.
    pub rows_read: usize,
    /// Games in the canonical table.
    pub games_loaded: usize,
    /// Distinct seasons in the canonical table.
    pub seasons: usize,
    /// Wall-clock seconds spent reading the file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent normalising rows.
    pub transform_time_seconds: f64,
}

/// The complete output of [`load_game_table`].
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub table: GameTable,
    pub metadata: LoadMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full load pipeline.
///
/// 1. Read the raw CSV from `path`.
/// 2. Normalise it with [`TableNormalizer`].
/// 3. Return the table plus [`LoadMetadata`].
///
/// Any read or parse failure aborts the load.
pub fn load_game_table(path: &Path) -> Result<LoadResult> {
    // ── Step 1: Read ──────────────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let raw = read_raw_table(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Normalise ─────────────────────────────────────────────────────
    let transform_start = std::time::Instant::now();
    let table = TableNormalizer::new().normalize(&raw)?;
    let transform_time = transform_start.elapsed().as_secs_f64();

    // ── Step 3: Build result ──────────────────────────────────────────────────
    let metadata = LoadMetadata {
        generated_at: Utc::now().to_rfc3339(),
        rows_read: raw.rows.len(),
        games_loaded: table.len(),
        seasons: table.seasons().len(),
        load_time_seconds: load_time,
        transform_time_seconds: transform_time,
    };

    info!(
        "Loaded {} games across {} seasons from {} in {:.3}s",
        metadata.games_loaded,
        metadata.seasons,
        path.display(),
        load_time + transform_time
    );

    Ok(LoadResult { table, metadata })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
