//! Per-viewer evaluation of a [`FilterSelection`].
//!
//! A viewer's selection is an immutable value; every change builds a new
//! one and re-runs [`DashboardView::build`] over the shared read-only table.
//! Nothing here holds state between calls.

use chrono::{Datelike, NaiveDate, Weekday};
use gameday_core::error::{GamedayError, Result};
use gameday_core::formatting::{format_month_day, weekday_plural};
use gameday_core::models::{
    DateCriterion, FilterSelection, GameRecord, GameTable, Location, MonthDayKey, Outcome,
    RecordSummary, Season, SeasonRange,
};
use gameday_core::time_utils::serialize_weekday;
use gameday_data::aggregator::{OpponentPerformance, RecordAggregator};
use gameday_data::analyzer::{DayAnalysis, DayOfWeekAnalyzer};
use serde::Serialize;

/// Games listed in the opponent detail panel.
pub const LAST_GAMES_SHOWN: usize = 5;

// ── Season range resolution ───────────────────────────────────────────────────

/// Build a season range from optional endpoints, defaulting to the first and
/// last season in `table`. Named seasons must exist in the table.
pub fn resolve_season_range(
    table: &GameTable,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<SeasonRange> {
    let full = table
        .full_season_range()
        .ok_or_else(|| GamedayError::Config("the game table is empty".to_string()))?;
    let seasons = table.seasons();
    let pick = |name: Option<&str>, default: &Season| -> Result<Season> {
        match name {
            None => Ok(default.clone()),
            Some(name) => {
                let season = Season::new(name);
                if seasons.contains(&season) {
                    Ok(season)
                } else {
                    Err(GamedayError::UnknownSeason(name.to_string()))
                }
            }
        }
    };
    SeasonRange::new(pick(start, &full.start)?, pick(end, &full.end)?)
}

// ── View types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayView {
    pub date: NaiveDate,
    pub month_day: MonthDayKey,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub on_date: Option<RecordSummary>,
    pub on_weekday: Option<RecordSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExploreView {
    /// `"January 14"` or `"Mondays"`.
    pub label: String,
    pub opponent: Option<String>,
    pub record: Option<RecordSummary>,
}

/// One line of the recent-games list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameLine {
    pub date: NaiveDate,
    pub location: Location,
    pub outcome: Outcome,
    pub goals_for: Option<u32>,
    pub goals_against: Option<u32>,
}

impl From<&GameRecord> for GameLine {
    fn from(record: &GameRecord) -> Self {
        Self {
            date: record.date,
            location: record.location.clone(),
            outcome: record.outcome,
            goals_for: record.goals_for,
            goals_against: record.goals_against,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentView {
    pub opponent: String,
    pub days: Option<DayAnalysis>,
    pub record: Option<RecordSummary>,
    pub last_games: Vec<GameLine>,
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub season_range: SeasonRange,
    pub games_in_range: usize,
    /// Sorted opponents of the season range.
    pub opponents: Vec<String>,
    pub today: TodayView,
    pub explore: Option<ExploreView>,
    /// `None` only when the season range has no games.
    pub opponent: Option<OpponentView>,
    pub all_teams: Vec<OpponentPerformance>,
}

impl DashboardView {
    /// Evaluate `selection` over `table` as of `today`.
    ///
    /// The opponent panels use the selected opponent, or the first opponent
    /// of the range when none is selected.
    pub fn build(table: &GameTable, selection: &FilterSelection, today: NaiveDate) -> Self {
        let filtered = table.in_season_range(&selection.season_range);
        let records = filtered.records();
        let opponents = filtered.opponents();

        let today_key = MonthDayKey::from_date(today);
        let today_view = TodayView {
            date: today,
            month_day: today_key,
            weekday: today.weekday(),
            on_date: RecordAggregator::record_on_date(records, today_key, None),
            on_weekday: RecordAggregator::record_on_day(records, today.weekday(), None),
        };

        let explore = selection.criterion.map(|criterion| ExploreView {
            label: criterion_label(criterion),
            opponent: selection.opponent.clone(),
            record: RecordAggregator::record_for(records, criterion, selection.opponent.as_deref()),
        });

        let focus = selection
            .opponent
            .clone()
            .or_else(|| opponents.first().cloned());
        let opponent = focus.map(|name| OpponentView {
            days: DayOfWeekAnalyzer::best_and_worst_day(records, &name),
            record: RecordAggregator::record_against(records, &name),
            last_games: RecordAggregator::last_games_against(records, &name, LAST_GAMES_SHOWN)
                .into_iter()
                .map(GameLine::from)
                .collect(),
            opponent: name,
        });

        Self {
            season_range: selection.season_range.clone(),
            games_in_range: filtered.len(),
            all_teams: RecordAggregator::opponent_win_percentages(records),
            opponents,
            today: today_view,
            explore,
            opponent,
        }
    }
}

/// Heading text for an explore criterion.
pub fn criterion_label(criterion: DateCriterion) -> String {
    match criterion {
        DateCriterion::MonthDay(key) => format_month_day(key),
        DateCriterion::Weekday(day) => weekday_plural(day),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
