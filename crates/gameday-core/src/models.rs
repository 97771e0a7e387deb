use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Serialize, Serializer};

use crate::error::{GamedayError, Result};

/// Leap year used to validate month/day pairs so that February 29 is allowed.
pub const REFERENCE_LEAP_YEAR: i32 = 2020;

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Standardised result of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Win,
    #[serde(rename = "Win OT")]
    WinOT,
    #[serde(rename = "Win SO")]
    WinSO,
    Loss,
    #[serde(rename = "Loss OT")]
    LossOT,
    #[serde(rename = "Loss SO")]
    LossSO,
    Tie,
    Unknown,
}

impl Outcome {
    /// Display label, e.g. `"Win OT"`.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::WinOT => "Win OT",
            Outcome::WinSO => "Win SO",
            Outcome::Loss => "Loss",
            Outcome::LossOT => "Loss OT",
            Outcome::LossSO => "Loss SO",
            Outcome::Tie => "Tie",
            Outcome::Unknown => "Unknown",
        }
    }

    /// `true` for every label starting with "Win".
    pub fn is_win(&self) -> bool {
        self.label().starts_with("Win")
    }

    /// `true` for every label containing "Loss".
    pub fn is_loss(&self) -> bool {
        self.label().contains("Loss")
    }

    pub fn is_tie(&self) -> bool {
        *self == Outcome::Tie
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Location ──────────────────────────────────────────────────────────────────

/// Where a game was played.
///
/// Source rows carry an empty cell for home games and `@` for away games.
/// Anything else is kept verbatim in [`Location::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Home,
    Away,
    Other(String),
}

impl Location {
    /// Map a raw location marker to a [`Location`].
    ///
    /// Blank is home and `@` is away. Any other text is kept as-is.
    pub fn from_marker(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Location::Home,
            Some("@") => Location::Away,
            Some(other) => Location::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Location::Home => "Home",
            Location::Away => "Away",
            Location::Other(s) => s,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ── MonthDayKey ───────────────────────────────────────────────────────────────

/// A calendar date with the year stripped, formatted as `"MM-DD"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthDayKey {
    month: u32,
    day: u32,
}

impl MonthDayKey {
    /// Build a key, validating the pair against a leap year.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(REFERENCE_LEAP_YEAR, month, day).map(|_| Self { month, day })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Display for MonthDayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDayKey {
    type Err = GamedayError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GamedayError::Config(format!("invalid month-day {s:?}, expected MM-DD"));
        let (month, day) = s.trim().split_once('-').ok_or_else(invalid)?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        Self::new(month, day).ok_or_else(invalid)
    }
}

impl Serialize for MonthDayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Season ────────────────────────────────────────────────────────────────────

/// Season identifier as carried by the source (`"2021"`, `"2021-22"`, ...).
///
/// Seasons that start with a year order by that year; the rest order
/// lexically after them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Season(String);

impl Season {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading run of ASCII digits interpreted as a year.
    pub fn leading_year(&self) -> Option<i32> {
        let digits: String = self.0.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    fn sort_key(&self) -> (bool, i32, &str) {
        let year = self.leading_year();
        (year.is_none(), year.unwrap_or(0), self.0.as_str())
    }
}

impl Ord for Season {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Season {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Season {
    fn from(s: &str) -> Self {
        Season::new(s)
    }
}

// ── GameRecord ────────────────────────────────────────────────────────────────

/// One normalised game row.
///
/// The month-day key, weekday and win flag are derived on demand from `date`
/// and `outcome`, so they can never drift from the fields they depend on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub season: Season,
    pub game_number: Option<u32>,
    pub date: NaiveDate,
    pub location: Location,
    pub opponent: String,
    pub goals_for: Option<u32>,
    pub goals_against: Option<u32>,
    pub outcome: Outcome,
    /// Season-cumulative wins as carried by the source.
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub ties: Option<u32>,
    pub overtime_losses: Option<u32>,
    pub streak: Option<String>,
}

impl GameRecord {
    pub fn month_day_key(&self) -> MonthDayKey {
        MonthDayKey::from_date(self.date)
    }

    pub fn day_of_week(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn is_win(&self) -> bool {
        self.outcome.is_win()
    }
}

// ── SeasonRange / FilterSelection ─────────────────────────────────────────────

/// Inclusive range of seasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonRange {
    pub start: Season,
    pub end: Season,
}

impl SeasonRange {
    /// Build a range, rejecting a start that sorts after the end.
    pub fn new(start: Season, end: Season) -> Result<Self> {
        if start > end {
            return Err(GamedayError::InvalidSeasonRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, season: &Season) -> bool {
        *season >= self.start && *season <= self.end
    }
}

/// Date-of-year or weekday criterion for a record query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCriterion {
    MonthDay(MonthDayKey),
    Weekday(Weekday),
}

impl DateCriterion {
    pub fn matches(&self, record: &GameRecord) -> bool {
        match self {
            DateCriterion::MonthDay(key) => record.month_day_key() == *key,
            DateCriterion::Weekday(day) => record.day_of_week() == *day,
        }
    }
}

/// One viewer's current filter state.
///
/// Immutable; the presentation layer builds a new value on every change and
/// passes it explicitly to the query functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub season_range: SeasonRange,
    pub criterion: Option<DateCriterion>,
    pub opponent: Option<String>,
}

impl FilterSelection {
    pub fn new(season_range: SeasonRange) -> Self {
        Self {
            season_range,
            criterion: None,
            opponent: None,
        }
    }

    pub fn with_criterion(mut self, criterion: Option<DateCriterion>) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn with_opponent(mut self, opponent: Option<String>) -> Self {
        self.opponent = opponent;
        self
    }
}

// ── RecordSummary ─────────────────────────────────────────────────────────────

/// Win/loss/tie summary over a non-empty set of games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    /// `wins / total_games * 100`, rounded to two decimals.
    pub win_percentage: f64,
}

// ── GameTable ─────────────────────────────────────────────────────────────────

/// The canonical, read-only table of normalised games.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameTable {
    records: Vec<GameRecord>,
}

impl GameTable {
    pub fn new(records: Vec<GameRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct seasons in ascending order.
    pub fn seasons(&self) -> Vec<Season> {
        self.records
            .iter()
            .map(|r| r.season.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct opponent names in ascending order.
    pub fn opponents(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.opponent.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Range spanning the first through last season, `None` for an empty table.
    pub fn full_season_range(&self) -> Option<SeasonRange> {
        let seasons = self.seasons();
        let start = seasons.first()?.clone();
        let end = seasons.last()?.clone();
        Some(SeasonRange { start, end })
    }

    /// Games whose season falls inside `range`.
    pub fn in_season_range(&self, range: &SeasonRange) -> GameTable {
        GameTable::new(
            self.records
                .iter()
                .filter(|r| range.contains(&r.season))
                .cloned()
                .collect(),
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
