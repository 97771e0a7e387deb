//! Best and worst weekday against an opponent.

use chrono::Weekday;
use gameday_core::formatting::percentage;
use gameday_core::models::GameRecord;
use gameday_core::time_utils::{serialize_weekday, WEEKDAYS};
use serde::Serialize;

use crate::aggregator::RecordTally;

/// Games and wins on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayStats {
    #[serde(serialize_with = "serialize_weekday")]
    pub day: Weekday,
    pub games_played: usize,
    pub wins: usize,
    pub win_percentage: f64,
}

impl DayStats {
    fn from_tally(day: Weekday, tally: &RecordTally) -> Self {
        Self {
            day,
            games_played: tally.games,
            wins: tally.wins,
            win_percentage: percentage(tally.wins as f64, tally.games as f64, 2),
        }
    }
}

/// Result of [`DayOfWeekAnalyzer::best_and_worst_day`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAnalysis {
    pub best: DayStats,
    pub worst: DayStats,
    /// Monday to Sunday, days without games omitted.
    pub per_day: Vec<DayStats>,
}

pub struct DayOfWeekAnalyzer;

impl DayOfWeekAnalyzer {
    /// Per-weekday performance against `opponent`, `None` if never played.
    ///
    /// Best is the highest win percentage and worst the lowest. Both break
    /// ties by most games played, then by Monday-first order.
    pub fn best_and_worst_day(records: &[GameRecord], opponent: &str) -> Option<DayAnalysis> {
        let mut tallies = [RecordTally::default(); 7];
        for record in records.iter().filter(|r| r.opponent == opponent) {
            tallies[record.day_of_week().num_days_from_monday() as usize].add_game(record);
        }

        let per_day: Vec<DayStats> = WEEKDAYS
            .iter()
            .zip(tallies.iter())
            .filter(|(_, tally)| tally.games > 0)
            .map(|(day, tally)| DayStats::from_tally(*day, tally))
            .collect();

        let mut best = *per_day.first()?;
        let mut worst = best;
        for stats in &per_day[1..] {
            if stats.win_percentage > best.win_percentage
                || (stats.win_percentage == best.win_percentage
                    && stats.games_played > best.games_played)
            {
                best = *stats;
            }
            if stats.win_percentage < worst.win_percentage
                || (stats.win_percentage == worst.win_percentage
                    && stats.games_played > worst.games_played)
            {
                worst = *stats;
            }
        }

        Some(DayAnalysis {
            best,
            worst,
            per_day,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
