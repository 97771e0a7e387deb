//! Bordered tables for record summaries, per-weekday stats and recent games.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use gameday_core::formatting::{format_optional, format_percentage};
use gameday_core::models::RecordSummary;
use gameday_core::time_utils::weekday_name;
use gameday_runtime::data::analyzer::DayStats;
use gameday_runtime::session::GameLine;

use crate::themes::Theme;

fn bordered<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border)
        .title(format!(" {} ", title))
}

fn header_row<'a>(labels: &[&'a str], theme: &Theme) -> Row<'a> {
    Row::new(
        labels
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header))
            .collect::<Vec<_>>(),
    )
    .height(1)
}

fn row_style(i: usize, theme: &Theme) -> ratatui::style::Style {
    if i % 2 == 0 {
        theme.table_row
    } else {
        theme.table_row_alt
    }
}

/// Render one record summary, or `no_data` when there is none.
pub fn render_record_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    summary: Option<&RecordSummary>,
    no_data: &str,
    theme: &Theme,
) {
    let Some(summary) = summary else {
        render_no_data(frame, area, title, no_data, theme);
        return;
    };

    let header = header_row(
        &["Total Games", "Wins", "Losses", "Ties", "Win Percentage (%)"],
        theme,
    );
    let row = Row::new(vec![
        Cell::from(summary.total_games.to_string()),
        Cell::from(summary.wins.to_string()),
        Cell::from(summary.losses.to_string()),
        Cell::from(summary.ties.to_string()),
        Cell::from(format_percentage(summary.win_percentage))
            .style(theme.record_style(summary.win_percentage)),
    ])
    .style(theme.table_row);

    let widths = [
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(20),
    ];

    let table = Table::new(vec![row], widths)
        .header(header)
        .block(bordered(title, theme))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Render per-weekday stats, highlighting the best and worst days.
pub fn render_day_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    per_day: &[DayStats],
    best: Option<&DayStats>,
    theme: &Theme,
) {
    let header = header_row(&["Day", "Games", "Wins", "Win %"], theme);
    let rows: Vec<Row> = per_day
        .iter()
        .enumerate()
        .map(|(i, stats)| {
            let style = if best.map(|b| b.day) == Some(stats.day) {
                theme.table_highlight
            } else {
                row_style(i, theme)
            };
            Row::new(vec![
                Cell::from(weekday_name(stats.day)),
                Cell::from(stats.games_played.to_string()),
                Cell::from(stats.wins.to_string()),
                Cell::from(format_percentage(stats.win_percentage)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(title, theme))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Render the recent games list, newest first.
pub fn render_last_games(frame: &mut Frame, area: Rect, title: &str, games: &[GameLine], theme: &Theme) {
    let header = header_row(&["Date", "Location", "Outcome", "GF", "GA"], theme);
    let rows: Vec<Row> = games
        .iter()
        .enumerate()
        .map(|(i, game)| {
            let outcome_style = if game.outcome.is_win() {
                theme.success
            } else if game.outcome.is_loss() {
                theme.error
            } else {
                theme.warning
            };
            Row::new(vec![
                Cell::from(game.date.format("%Y-%m-%d").to_string()),
                Cell::from(game.location.to_string()),
                Cell::from(game.outcome.label()).style(outcome_style),
                Cell::from(format_optional(game.goals_for)),
                Cell::from(format_optional(game.goals_against)),
            ])
            .style(row_style(i, theme))
        })
        .collect();

    let widths = [
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(4),
        Constraint::Length(4),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(title, theme))
        .style(theme.text);
    frame.render_widget(table, area);
}

/// Render an informational "no games found" placeholder.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.warning)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(bordered(title, theme)),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use gameday_core::models::{Location, Outcome};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn summary() -> RecordSummary {
        RecordSummary {
            total_games: 3,
            wins: 1,
            losses: 1,
            ties: 1,
            win_percentage: 33.33,
        }
    }

    #[test]
    fn test_render_record_table_shows_percentage() {
        let mut terminal = Terminal::new(TestBackend::new(80, 6)).unwrap();
        let theme = Theme::gold();
        let summary = summary();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_record_table(frame, area, "Record", Some(&summary), "none", &theme);
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("33.33%"));
        assert!(text.contains("Total Games"));
    }

    #[test]
    fn test_render_record_table_no_data_message() {
        let mut terminal = Terminal::new(TestBackend::new(80, 6)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_record_table(frame, area, "Record", None, "No games found", &theme);
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("No games found"));
        assert!(!text.contains("0.00%"));
    }

    #[test]
    fn test_render_day_table_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let theme = Theme::light();
        let per_day = vec![
            DayStats {
                day: Weekday::Mon,
                games_played: 2,
                wins: 1,
                win_percentage: 50.0,
            },
            DayStats {
                day: Weekday::Sat,
                games_played: 1,
                wins: 1,
                win_percentage: 100.0,
            },
        ];
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_day_table(frame, area, "By Day", &per_day, per_day.get(1), &theme);
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Monday"));
        assert!(text.contains("Saturday"));
    }

    #[test]
    fn test_render_last_games() {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let theme = Theme::gold();
        let games = vec![GameLine {
            date: NaiveDate::from_ymd_opt(2021, 2, 3).unwrap(),
            location: Location::Away,
            outcome: Outcome::LossOT,
            goals_for: Some(2),
            goals_against: None,
        }];
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_last_games(frame, area, "Last 5", &games, &theme);
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("2021-02-03"));
        assert!(text.contains("Loss OT"));
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(10, 3)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, "Tiny", "No games found in range", &theme);
            })
            .unwrap();
    }
}
