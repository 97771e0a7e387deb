//! Full-screen dashboard layout.
//!
//! Header, control bar, today/explore record panels on the left with the
//! all-teams chart beneath, the opponent panels on the right, and a one-line
//! footer with key hints and the reload status.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use gameday_core::formatting::{format_month_day, format_percentage, weekday_plural};
use gameday_core::time_utils::weekday_name;
use gameday_runtime::data::analysis::LoadMetadata;
use gameday_runtime::data::analyzer::DayStats;
use gameday_runtime::session::{DashboardView, OpponentView};

use crate::components::header::Header;
use crate::components::win_bar::{WinBar, WinBarConfig};
use crate::controls::ControlState;
use crate::table_view;
use crate::themes::Theme;

const RECORD_HEIGHT: u16 = 4;

/// Everything [`render_dashboard`] draws from.
pub struct DashboardData<'a> {
    pub view: &'a DashboardView,
    pub controls: &'a ControlState,
    pub timezone: &'a str,
    /// Load that produced the table on screen.
    pub metadata: &'a LoadMetadata,
    /// Latest reload error, if any.
    pub status: Option<&'a str>,
}

pub fn render_dashboard(frame: &mut Frame, area: Rect, data: &DashboardData, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Header::HEIGHT),
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Header::new(&data.view.season_range, data.view.today.date, data.timezone, theme);
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), rows[0]);

    render_controls(frame, rows[1], data.controls, theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);

    render_left_column(frame, columns[0], data.view, theme);
    render_opponent_column(frame, columns[1], data.view.opponent.as_ref(), theme);

    render_footer(frame, rows[3], data, theme);
}

// ── Controls ──────────────────────────────────────────────────────────────────

fn render_controls(frame: &mut Frame, area: Rect, controls: &ControlState, theme: &Theme) {
    let mut spans = Vec::new();
    for control in controls.visible_controls() {
        let style = if control == controls.focus {
            theme.focused
        } else {
            theme.value
        };
        spans.push(Span::styled(format!("{}: ", control.label()), theme.label));
        spans.push(Span::styled(
            format!("‹ {} ›", controls.value_label(control)),
            style,
        ));
        spans.push(Span::raw("   "));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border)
                .title(" Filters "),
        );
    frame.render_widget(paragraph, area);
}

// ── Left column ───────────────────────────────────────────────────────────────

fn render_left_column(frame: &mut Frame, area: Rect, view: &DashboardView, theme: &Theme) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(RECORD_HEIGHT),
            Constraint::Length(RECORD_HEIGHT),
            Constraint::Length(RECORD_HEIGHT),
            Constraint::Min(3),
        ])
        .split(area);

    let today_label = format_month_day(view.today.month_day);
    table_view::render_record_table(
        frame,
        parts[0],
        &format!("Historical Record on {}", today_label),
        view.today.on_date.as_ref(),
        &format!("No historical games found on {} in the selected season range.", today_label),
        theme,
    );

    let weekday = weekday_plural(view.today.weekday);
    table_view::render_record_table(
        frame,
        parts[1],
        &format!("Historical Record on {}", weekday),
        view.today.on_weekday.as_ref(),
        &format!("No historical games found on {} in the selected season range.", weekday),
        theme,
    );

    match &view.explore {
        Some(explore) => {
            let title = match &explore.opponent {
                Some(opponent) => format!("Record against {} on {}", opponent, explore.label),
                None => format!("Overall record on {}", explore.label),
            };
            table_view::render_record_table(
                frame,
                parts[2],
                &title,
                explore.record.as_ref(),
                &format!("No games found on {} in the selected season range.", explore.label),
                theme,
            );
        }
        None => table_view::render_no_data(
            frame,
            parts[2],
            "Explore",
            "Choose a date or day of the week.",
            theme,
        ),
    }

    render_all_teams(frame, parts[3], view, theme);
}

fn render_all_teams(frame: &mut Frame, area: Rect, view: &DashboardView, theme: &Theme) {
    let title = "Win Percentage Against All Teams";
    if view.all_teams.is_empty() {
        table_view::render_no_data(frame, area, title, "No games in the selected season range.", theme);
        return;
    }

    let label_width = 22usize;
    // Borders, label, separator space and the " 100.00%" suffix.
    let chrome = 2 + label_width as u16 + 1 + 8;
    let bar_width = area.width.saturating_sub(chrome).max(1);

    let lines: Vec<Line> = view
        .all_teams
        .iter()
        .map(|team| {
            WinBar::new(&team.opponent, team.win_percentage, theme)
                .with_config(WinBarConfig {
                    label_width,
                    width: bar_width,
                    ..WinBarConfig::default()
                })
                .to_line()
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.panel_border)
            .title(format!(" {} ", title)),
    );
    frame.render_widget(paragraph, area);
}

// ── Right column ──────────────────────────────────────────────────────────────

fn render_opponent_column(
    frame: &mut Frame,
    area: Rect,
    opponent: Option<&OpponentView>,
    theme: &Theme,
) {
    let Some(opponent) = opponent else {
        table_view::render_no_data(
            frame,
            area,
            "Opponent",
            "No games in the selected season range.",
            theme,
        );
        return;
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Length(RECORD_HEIGHT),
            Constraint::Min(4),
        ])
        .split(area);

    let name = opponent.opponent.as_str();
    match &opponent.days {
        Some(days) => {
            let lines = vec![
                day_line("Best", name, &days.best, theme),
                day_line("Worst", name, &days.worst, theme),
            ];
            let paragraph = Paragraph::new(Text::from(lines)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.panel_border)
                    .title(" Best and Worst Day to Play "),
            );
            frame.render_widget(paragraph, parts[0]);
            table_view::render_day_table(
                frame,
                parts[1],
                "Win Percentage by Day of the Week",
                &days.per_day,
                Some(&days.best),
                theme,
            );
        }
        None => {
            let message = format!("No games found against {} in the selected season range.", name);
            table_view::render_no_data(frame, parts[0], "Best and Worst Day to Play", &message, theme);
            table_view::render_no_data(frame, parts[1], "Win Percentage by Day of the Week", "", theme);
        }
    }

    table_view::render_record_table(
        frame,
        parts[2],
        &format!("Record against {}", name),
        opponent.record.as_ref(),
        &format!("No games found against {} in the selected season range.", name),
        theme,
    );

    table_view::render_last_games(
        frame,
        parts[3],
        &format!("Last {} games against {}", opponent.last_games.len(), name),
        &opponent.last_games,
        theme,
    );
}

fn day_line<'a>(kind: &str, opponent: &str, stats: &DayStats, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{} day vs {}: ", kind, opponent), theme.label),
        Span::styled(weekday_name(stats.day), theme.value),
        Span::styled(
            format!(
                "  {} games, {} wins, ",
                stats.games_played, stats.wins
            ),
            theme.text,
        ),
        Span::styled(
            format_percentage(stats.win_percentage),
            theme.record_style(stats.win_percentage),
        ),
    ])
}

// ── Footer ────────────────────────────────────────────────────────────────────

fn render_footer(frame: &mut Frame, area: Rect, data: &DashboardData, theme: &Theme) {
    let mut spans = vec![Span::styled(
        "↑/↓ select  ←/→ change  r reload  q quit",
        theme.dim,
    )];
    spans.push(Span::styled(
        format!(
            "   {} of {} games in range, loaded in {:.2}s",
            data.view.games_in_range,
            data.metadata.games_loaded,
            data.metadata.load_time_seconds + data.metadata.transform_time_seconds
        ),
        theme.info,
    ));
    if let Some(status) = data.status {
        spans.push(Span::styled(format!("   reload failed: {}", status), theme.error));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
