//! Turns a [`RawTable`] into the canonical [`GameTable`].
//!
//! Columns are located by header name. The three columns the export leaves
//! unnamed (location, result letter, OT/SO marker) are resolved relative to
//! their named neighbours, and the layout is checked before any row is read
//! so that a shifted export fails loudly instead of mis-mapping fields.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use gameday_core::error::{GamedayError, Result};
use gameday_core::models::{GameRecord, GameTable, Location, Outcome, Season};
use regex::Regex;
use tracing::{debug, warn};

use crate::reader::RawTable;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y", "%a, %b %d, %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn unnamed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Unnamed: \d+$").expect("regex is valid"))
}

// ── Column resolution ─────────────────────────────────────────────────────────

/// Header positions of every canonical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub season: usize,
    pub game_number: Option<usize>,
    pub date: usize,
    pub location: usize,
    pub opponent: usize,
    pub goals_for: Option<usize>,
    pub goals_against: Option<usize>,
    pub outcome: usize,
    pub ot_so: Option<usize>,
    pub wins: Option<usize>,
    pub losses: Option<usize>,
    pub ties: Option<usize>,
    pub overtime_losses: Option<usize>,
    pub streak: Option<usize>,
}

impl ColumnMap {
    /// Resolve canonical positions from a header row.
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require =
            |name: &str| find(name).ok_or_else(|| GamedayError::MissingColumn(name.to_string()));
        let unnamed_at = |idx: usize| {
            headers
                .get(idx)
                .map(|h| {
                    let h = h.trim();
                    h.is_empty() || unnamed_pattern().is_match(h)
                })
                .unwrap_or(false)
        };

        let season = require("Season")?;
        let date = require("Date")?;
        let opponent = require("Opponent")?;
        let goals_for = find("GF");
        let goals_against = find("GA");

        let location = match find("Location") {
            Some(idx) => idx,
            None if unnamed_at(date + 1) => date + 1,
            None => {
                return Err(GamedayError::ColumnLayout(
                    "expected an unnamed location column right after Date".to_string(),
                ))
            }
        };

        let outcome = match find("Outcome") {
            Some(idx) => idx,
            None => {
                let ga = goals_against.ok_or_else(|| GamedayError::MissingColumn("GA".to_string()))?;
                if !unnamed_at(ga + 1) {
                    return Err(GamedayError::ColumnLayout(
                        "expected an unnamed result column right after GA".to_string(),
                    ));
                }
                ga + 1
            }
        };

        let ot_so = find("OT/SO").or_else(|| unnamed_at(outcome + 1).then_some(outcome + 1));

        let map = Self {
            season,
            game_number: find("GP"),
            date,
            location,
            opponent,
            goals_for,
            goals_against,
            outcome,
            ot_so,
            wins: find("W"),
            losses: find("L"),
            ties: find("T"),
            overtime_losses: find("OL"),
            streak: find("Streak"),
        };
        debug!("Resolved column layout: {:?}", map);
        Ok(map)
    }
}

// ── Field coercion ────────────────────────────────────────────────────────────

/// Parse a date cell, accepting the formats the export has used over time.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Lenient count coercion: integers and integral floats parse, anything else
/// becomes `None`.
pub fn coerce_count(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64).then(|| f as u32)
}

/// Merge the result letter and the OT/SO marker into one [`Outcome`].
///
/// Checks run W, then L, then T against the concatenated string, so a cell
/// carrying both "W" and "L" resolves to a win.
pub fn standardize_outcome(result: Option<&str>, marker: Option<&str>) -> Outcome {
    let merged = format!("{}{}", result.unwrap_or(""), marker.unwrap_or(""));
    let merged = merged.trim();
    let ot = merged.contains("OT");
    let so = merged.contains("SO");

    if merged.contains('W') {
        if ot {
            Outcome::WinOT
        } else if so {
            Outcome::WinSO
        } else {
            Outcome::Win
        }
    } else if merged.contains('L') {
        if ot {
            Outcome::LossOT
        } else if so {
            Outcome::LossSO
        } else {
            Outcome::Loss
        }
    } else if merged.contains('T') {
        Outcome::Tie
    } else {
        Outcome::Unknown
    }
}

// ── TableNormalizer ───────────────────────────────────────────────────────────

/// Stateless raw-to-canonical transformer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableNormalizer;

impl TableNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalise every row. The first unparseable date or missing required
    /// value aborts the whole table.
    pub fn normalize(&self, raw: &RawTable) -> Result<GameTable> {
        let columns = ColumnMap::resolve(&raw.headers)?;
        let mut records = Vec::with_capacity(raw.rows.len());

        for idx in 0..raw.rows.len() {
            records.push(self.normalize_row(raw, idx, &columns)?);
        }

        let unknown = records
            .iter()
            .filter(|r| r.outcome == Outcome::Unknown)
            .count();
        if unknown > 0 {
            warn!("{} games have no recognisable result marker", unknown);
        }
        let odd_locations = records
            .iter()
            .filter(|r| matches!(r.location, Location::Other(_)))
            .count();
        if odd_locations > 0 {
            warn!("{} games carry an unrecognised location marker", odd_locations);
        }

        Ok(GameTable::new(records))
    }

    fn normalize_row(&self, raw: &RawTable, idx: usize, columns: &ColumnMap) -> Result<GameRecord> {
        let row_number = idx + 1;
        let cell = |col: usize| raw.cell(idx, col);
        let count = |col: Option<usize>| col.and_then(|c| cell(c)).and_then(coerce_count);
        let required = |col: usize, name: &str| {
            cell(col).ok_or_else(|| GamedayError::MissingValue {
                row: row_number,
                column: name.to_string(),
            })
        };

        let date_text = cell(columns.date).unwrap_or("");
        let date = parse_date(date_text).ok_or_else(|| GamedayError::DateParse {
            row: row_number,
            value: date_text.to_string(),
        })?;

        Ok(GameRecord {
            season: Season::new(required(columns.season, "Season")?),
            game_number: count(columns.game_number),
            date,
            location: Location::from_marker(cell(columns.location)),
            opponent: required(columns.opponent, "Opponent")?.to_string(),
            goals_for: count(columns.goals_for),
            goals_against: count(columns.goals_against),
            outcome: standardize_outcome(cell(columns.outcome), columns.ot_so.and_then(|c| cell(c))),
            wins: count(columns.wins),
            losses: count(columns.losses),
            ties: count(columns.ties),
            overtime_losses: count(columns.overtime_losses),
            streak: columns.streak.and_then(|c| cell(c)).map(str::to_string),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_raw_table_from_reader;
    use chrono::Weekday;

    const HEADER: &str = "Season,GP,Date,,Opponent,GF,GA,,,W,L,T,OL,Streak,Att.,LOG,Notes";

    fn raw(rows: &[&str]) -> RawTable {
        let mut data = String::from(HEADER);
        for row in rows {
            data.push('\n');
            data.push_str(row);
        }
        read_raw_table_from_reader(data.as_bytes()).unwrap()
    }

    fn normalize(rows: &[&str]) -> Result<GameTable> {
        TableNormalizer::new().normalize(&raw(rows))
    }

    // ── Outcome standardisation ───────────────────────────────────────────────

    #[test]
    fn test_standardize_outcome_precedence() {
        assert_eq!(standardize_outcome(Some("W"), None), Outcome::Win);
        assert_eq!(standardize_outcome(Some("W"), Some("OT")), Outcome::WinOT);
        assert_eq!(standardize_outcome(Some("W"), Some("SO")), Outcome::WinSO);
        assert_eq!(standardize_outcome(Some("L"), None), Outcome::Loss);
        assert_eq!(standardize_outcome(Some("L"), Some("OT")), Outcome::LossOT);
        assert_eq!(standardize_outcome(Some("L"), Some("SO")), Outcome::LossSO);
        assert_eq!(standardize_outcome(Some("T"), None), Outcome::Tie);
        assert_eq!(standardize_outcome(None, None), Outcome::Unknown);
    }

    #[test]
    fn test_standardize_outcome_dual_marker_resolves_to_win() {
        assert_eq!(standardize_outcome(Some("WL"), None), Outcome::Win);
    }

    #[test]
    fn test_standardize_outcome_bare_ot_is_tie() {
        // "OT" contains a T and neither W nor L.
        assert_eq!(standardize_outcome(None, Some("OT")), Outcome::Tie);
        assert_eq!(standardize_outcome(None, Some("SO")), Outcome::Unknown);
    }

    // ── Coercion ──────────────────────────────────────────────────────────────

    #[test]
    fn test_coerce_count_is_lenient() {
        assert_eq!(coerce_count("4"), Some(4));
        assert_eq!(coerce_count(" 4.0 "), Some(4));
        assert_eq!(coerce_count("4.5"), None);
        assert_eq!(coerce_count("-1"), None);
        assert_eq!(coerce_count("n/a"), None);
        assert_eq!(coerce_count(""), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 1, 14).unwrap();
        assert_eq!(parse_date("2021-01-14"), Some(expected));
        assert_eq!(parse_date("01/14/2021"), Some(expected));
        assert_eq!(parse_date("2021-01-14 00:00:00"), Some(expected));
        assert_eq!(parse_date("Jan 14, 2021"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
    }

    // ── Column layout ─────────────────────────────────────────────────────────

    #[test]
    fn test_column_map_resolves_blank_headers() {
        let table = raw(&[]);
        let map = ColumnMap::resolve(&table.headers).unwrap();
        assert_eq!(map.location, 3);
        assert_eq!(map.outcome, 7);
        assert_eq!(map.ot_so, Some(8));
        assert_eq!(map.streak, Some(13));
    }

    #[test]
    fn test_column_map_accepts_pandas_style_names() {
        let headers: Vec<String> = [
            "Season", "GP", "Date", "Unnamed: 2", "Opponent", "GF", "GA", "Unnamed: 6",
            "Unnamed: 7", "W", "L",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let map = ColumnMap::resolve(&headers).unwrap();
        assert_eq!(map.location, 3);
        assert_eq!(map.outcome, 7);
        assert_eq!(map.ot_so, Some(8));
        assert_eq!(map.ties, None);
    }

    #[test]
    fn test_column_map_accepts_explicit_names() {
        let headers: Vec<String> = ["Season", "Date", "Opponent", "Location", "Outcome", "OT/SO"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let map = ColumnMap::resolve(&headers).unwrap();
        assert_eq!(map.location, 3);
        assert_eq!(map.outcome, 4);
        assert_eq!(map.ot_so, Some(5));
    }

    #[test]
    fn test_column_map_missing_required_column() {
        let headers: Vec<String> = ["Season", "GP", "Opponent"].iter().map(|s| s.to_string()).collect();
        let err = ColumnMap::resolve(&headers).unwrap_err();
        assert!(matches!(err, GamedayError::MissingColumn(ref c) if c == "Date"));
    }

    #[test]
    fn test_column_map_shifted_layout_fails() {
        let headers: Vec<String> = ["Season", "Date", "Opponent", "GF", "GA", "W"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = ColumnMap::resolve(&headers).unwrap_err();
        assert!(matches!(err, GamedayError::ColumnLayout(_)));
        assert!(err.is_parse_error());
    }

    // ── Rows ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_home_win() {
        let table = normalize(&["2021,1,2021-01-14,,Flyers,3,1,W,,1,0,0,0,W 1,0,2:30,"]).unwrap();
        let game = &table.records()[0];
        assert_eq!(game.outcome, Outcome::Win);
        assert!(game.is_win());
        assert_eq!(game.location, Location::Home);
        assert_eq!(game.month_day_key().to_string(), "01-14");
        assert_eq!(game.day_of_week(), Weekday::Thu);
        assert_eq!(game.goals_for, Some(3));
        assert_eq!(game.streak.as_deref(), Some("W 1"));
    }

    #[test]
    fn test_normalize_away_overtime_loss() {
        let table = normalize(&["2021,8,2021-02-03,@,Rangers,2,3,L,OT,4,2,0,2,L 1,,,"]).unwrap();
        let game = &table.records()[0];
        assert_eq!(game.outcome, Outcome::LossOT);
        assert!(!game.is_win());
        assert_eq!(game.location, Location::Away);
    }

    #[test]
    fn test_normalize_preserves_unknown_location() {
        let table = normalize(&["2021,8,2021-02-03,N,Rangers,2,3,L,,,,,,,,,"]).unwrap();
        assert_eq!(table.records()[0].location, Location::Other("N".to_string()));
    }

    #[test]
    fn test_normalize_lenient_numbers() {
        let table = normalize(&["1925,1,1924-12-01,,Maroons,x,1.0,W,,,,,,,,,"]).unwrap();
        let game = &table.records()[0];
        assert_eq!(game.goals_for, None);
        assert_eq!(game.goals_against, Some(1));
        assert_eq!(game.wins, None);
    }

    #[test]
    fn test_normalize_bad_date_fails_whole_table() {
        let err = normalize(&[
            "2021,1,2021-01-14,,Flyers,3,1,W,,,,,,,,,",
            "2021,2,not-a-date,,Flyers,3,1,W,,,,,,,,,",
        ])
        .unwrap_err();
        match err {
            GamedayError::DateParse { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_missing_opponent_fails() {
        let err = normalize(&["2021,1,2021-01-14,,,3,1,W,,,,,,,,,"]).unwrap_err();
        assert!(matches!(err, GamedayError::MissingValue { row: 1, .. }));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = raw(&[
            "2021,1,2021-01-14,,Flyers,3,1,W,,,,,,,,,",
            "2021,2,2021-01-16,@,Rangers,1,2,L,SO,,,,,,,,",
        ]);
        let normalizer = TableNormalizer::new();
        let first = normalizer.normalize(&input).unwrap();
        let second = normalizer.normalize(&input).unwrap();
        assert_eq!(first, second);
    }
}
