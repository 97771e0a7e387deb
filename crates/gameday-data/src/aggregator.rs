//! Win/loss/tie summaries over subsets of the canonical table.

use std::collections::BTreeMap;

use chrono::Weekday;
use gameday_core::formatting::percentage;
use gameday_core::models::{DateCriterion, GameRecord, MonthDayKey, RecordSummary};
use serde::Serialize;

// ── RecordTally ───────────────────────────────────────────────────────────────

/// Running counts accumulated one game at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordTally {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
}

impl RecordTally {
    pub fn add_game(&mut self, record: &GameRecord) {
        self.games += 1;
        if record.is_win() {
            self.wins += 1;
        }
        if record.outcome.is_loss() {
            self.losses += 1;
        }
        if record.outcome.is_tie() {
            self.ties += 1;
        }
    }

    /// Summary of the tally, `None` when no game was added.
    pub fn summary(&self) -> Option<RecordSummary> {
        if self.games == 0 {
            return None;
        }
        Some(RecordSummary {
            total_games: self.games,
            wins: self.wins,
            losses: self.losses,
            ties: self.ties,
            win_percentage: percentage(self.wins as f64, self.games as f64, 2),
        })
    }
}

// ── OpponentPerformance ───────────────────────────────────────────────────────

/// Win rate against one opponent over every game in the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentPerformance {
    pub opponent: String,
    pub games_played: usize,
    pub wins: usize,
    /// Unrounded; callers format for display.
    pub win_percentage: f64,
}

// ── RecordAggregator ──────────────────────────────────────────────────────────

/// Stateless query functions over a slice of [`GameRecord`]s.
pub struct RecordAggregator;

impl RecordAggregator {
    /// Summarise every record matching `predicate`, or `None` if nothing does.
    pub fn compute_record<F>(records: &[GameRecord], predicate: F) -> Option<RecordSummary>
    where
        F: Fn(&GameRecord) -> bool,
    {
        let mut tally = RecordTally::default();
        for record in records.iter().filter(|r| predicate(r)) {
            tally.add_game(record);
        }
        tally.summary()
    }

    /// Record on a calendar date across all seasons.
    pub fn record_on_date(
        records: &[GameRecord],
        key: MonthDayKey,
        opponent: Option<&str>,
    ) -> Option<RecordSummary> {
        Self::record_for(records, DateCriterion::MonthDay(key), opponent)
    }

    /// Record on a weekday across all seasons.
    pub fn record_on_day(
        records: &[GameRecord],
        day: Weekday,
        opponent: Option<&str>,
    ) -> Option<RecordSummary> {
        Self::record_for(records, DateCriterion::Weekday(day), opponent)
    }

    pub fn record_for(
        records: &[GameRecord],
        criterion: DateCriterion,
        opponent: Option<&str>,
    ) -> Option<RecordSummary> {
        Self::compute_record(records, |r| {
            criterion.matches(r) && opponent.map_or(true, |o| r.opponent == o)
        })
    }

    /// Full record against one opponent.
    pub fn record_against(records: &[GameRecord], opponent: &str) -> Option<RecordSummary> {
        Self::compute_record(records, |r| r.opponent == opponent)
    }

    /// The `n` most recent games against `opponent`, newest first.
    pub fn last_games_against<'a>(
        records: &'a [GameRecord],
        opponent: &str,
        n: usize,
    ) -> Vec<&'a GameRecord> {
        let mut games: Vec<&GameRecord> = records.iter().filter(|r| r.opponent == opponent).collect();
        games.sort_by(|a, b| b.date.cmp(&a.date));
        games.truncate(n);
        games
    }

    /// Win percentage against every opponent, sorted by opponent name.
    pub fn opponent_win_percentages(records: &[GameRecord]) -> Vec<OpponentPerformance> {
        let mut by_opponent: BTreeMap<&str, RecordTally> = BTreeMap::new();
        for record in records {
            by_opponent
                .entry(record.opponent.as_str())
                .or_default()
                .add_game(record);
        }

        by_opponent
            .into_iter()
            .map(|(opponent, tally)| OpponentPerformance {
                opponent: opponent.to_string(),
                games_played: tally.games,
                wins: tally.wins,
                win_percentage: tally.wins as f64 / tally.games as f64 * 100.0,
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gameday_core::models::{Location, Outcome, Season};

    fn game(date: (i32, u32, u32), opponent: &str, outcome: Outcome) -> GameRecord {
        GameRecord {
            season: Season::new(date.0.to_string()),
            game_number: None,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            location: Location::Home,
            opponent: opponent.to_string(),
            goals_for: None,
            goals_against: None,
            outcome,
            wins: None,
            losses: None,
            ties: None,
            overtime_losses: None,
            streak: None,
        }
    }

    fn three_seasons_of_jan_14() -> Vec<GameRecord> {
        vec![
            game((2019, 1, 14), "Flyers", Outcome::Win),
            game((2020, 1, 14), "Rangers", Outcome::Loss),
            game((2021, 1, 14), "Flyers", Outcome::Tie),
            game((2021, 1, 15), "Flyers", Outcome::Win),
        ]
    }

    #[test]
    fn test_record_on_date_across_seasons() {
        let records = three_seasons_of_jan_14();
        let key = MonthDayKey::new(1, 14).unwrap();
        let summary = RecordAggregator::record_on_date(&records, key, None).unwrap();
        assert_eq!(
            summary,
            RecordSummary {
                total_games: 3,
                wins: 1,
                losses: 1,
                ties: 1,
                win_percentage: 33.33,
            }
        );
    }

    #[test]
    fn test_record_on_date_narrowed_by_opponent() {
        let records = three_seasons_of_jan_14();
        let key = MonthDayKey::new(1, 14).unwrap();
        let summary = RecordAggregator::record_on_date(&records, key, Some("Flyers")).unwrap();
        assert_eq!(summary.total_games, 2);
        assert_eq!(summary.win_percentage, 50.0);
    }

    #[test]
    fn test_unplayed_opponent_is_no_data() {
        let records = three_seasons_of_jan_14();
        let key = MonthDayKey::new(1, 14).unwrap();
        assert!(RecordAggregator::record_on_date(&records, key, Some("Kraken")).is_none());
        assert!(RecordAggregator::record_against(&records, "Kraken").is_none());
    }

    #[test]
    fn test_empty_table_is_no_data() {
        assert!(RecordAggregator::record_on_day(&[], Weekday::Mon, None).is_none());
    }

    #[test]
    fn test_overtime_variants_count_as_wins_and_losses() {
        let records = vec![
            game((2021, 2, 1), "Rangers", Outcome::WinSO),
            game((2021, 2, 8), "Rangers", Outcome::LossOT),
            game((2021, 2, 15), "Rangers", Outcome::Unknown),
        ];
        let summary = RecordAggregator::record_on_day(&records, Weekday::Mon, None).unwrap();
        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.ties, 0);
        assert_eq!(summary.win_percentage, 33.33);
    }

    #[test]
    fn test_win_percentage_bounds() {
        let all_wins = vec![game((2021, 1, 14), "Flyers", Outcome::Win)];
        let summary = RecordAggregator::record_against(&all_wins, "Flyers").unwrap();
        assert_eq!(summary.win_percentage, 100.0);

        let all_losses = vec![game((2021, 1, 14), "Flyers", Outcome::Loss)];
        let summary = RecordAggregator::record_against(&all_losses, "Flyers").unwrap();
        assert_eq!(summary.win_percentage, 0.0);
    }

    #[test]
    fn test_last_games_against_newest_first() {
        let records: Vec<GameRecord> = (1..=7)
            .map(|d| game((2021, 1, d), "Flyers", Outcome::Win))
            .chain(std::iter::once(game((2021, 1, 20), "Rangers", Outcome::Loss)))
            .collect();
        let last = RecordAggregator::last_games_against(&records, "Flyers", 5);
        let days: Vec<u32> = last.iter().map(|g| g.month_day_key().day()).collect();
        assert_eq!(days, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_opponent_win_percentages_sorted_by_name() {
        let records = vec![
            game((2021, 1, 1), "Rangers", Outcome::Win),
            game((2021, 1, 2), "Flyers", Outcome::Win),
            game((2021, 1, 3), "Flyers", Outcome::Loss),
            game((2021, 1, 4), "Flyers", Outcome::Loss),
        ];
        let perf = RecordAggregator::opponent_win_percentages(&records);
        assert_eq!(perf.len(), 2);
        assert_eq!(perf[0].opponent, "Flyers");
        assert_eq!(perf[0].games_played, 3);
        assert!((perf[0].win_percentage - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(perf[1].opponent, "Rangers");
        assert_eq!(perf[1].win_percentage, 100.0);
    }

    #[test]
    fn test_record_percentage_rounds_half_to_even() {
        let first_monday = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        let records: Vec<GameRecord> = (0..32)
            .map(|i| {
                let outcome = if i == 0 { Outcome::Win } else { Outcome::Loss };
                let mut g = game((2018, 1, 1), "Flyers", outcome);
                g.date = first_monday + chrono::Duration::days(7 * i);
                g
            })
            .collect();

        let summary = RecordAggregator::record_on_day(&records, Weekday::Mon, None).unwrap();
        assert_eq!(summary.total_games, 32);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.win_percentage, 3.12);
    }
}
