//! Flat-file loading for the game-history table.
//!
//! Reads the CSV export into an untyped [`RawTable`]: the header row plus
//! every data row as strings. No cleaning happens here; see
//! [`crate::normalizer`].

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use gameday_core::error::{GamedayError, Result};
use tracing::debug;

/// Header and rows exactly as they appear in the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cell at (`row`, `column`), `None` when the row is ragged or the cell
    /// is blank after trimming.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

/// Read the CSV file at `path`.
pub fn read_raw_table(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|source| GamedayError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_raw_table_from_reader(file)?;
    debug!(
        "Read {} rows, {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Read CSV data from any reader. Rows may be ragged.
pub fn read_raw_table_from_reader<R: Read>(rdr: R) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(rdr);

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
