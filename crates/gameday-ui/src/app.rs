//! Application state and TUI event loop.
//!
//! [`App`] owns the theme, the current game table and the filter controls.
//! Every frame rebuilds a [`DashboardView`] from those, so a table swap from
//! the reload loop shows up on the next draw.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;

use gameday_core::error::Result;
use gameday_core::models::{DateCriterion, GameTable};
use gameday_core::time_utils::today_in;
use gameday_runtime::data::analysis::LoadMetadata;
use gameday_runtime::orchestrator::{ReloadHandle, TableUpdate};
use gameday_runtime::session::{resolve_season_range, DashboardView};

use crate::controls::ControlState;
use crate::dashboard_view::{self, DashboardData};
use crate::table_view;
use crate::themes::Theme;

// ── AppAction / AppConfig ─────────────────────────────────────────────────────

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
    Reload,
}

/// Startup options for the dashboard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub theme_name: String,
    pub timezone: Tz,
    pub start_season: Option<String>,
    pub end_season: Option<String>,
    pub criterion: Option<DateCriterion>,
    pub opponent: Option<String>,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    pub timezone: Tz,
    pub table: Arc<GameTable>,
    /// Counts and timings of the load that produced `table`.
    pub metadata: LoadMetadata,
    pub controls: ControlState,
    /// Error from the most recent reload, cleared by the next good one.
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Fails when the table is empty or a configured season is unknown.
    pub fn new(
        table: Arc<GameTable>,
        metadata: LoadMetadata,
        config: AppConfig,
    ) -> Result<Self> {
        let range = resolve_season_range(
            &table,
            config.start_season.as_deref(),
            config.end_season.as_deref(),
        )?;
        let controls = ControlState::new(table.seasons(), &range, config.criterion, config.opponent);

        Ok(Self {
            theme: Theme::from_name(&config.theme_name),
            timezone: config.timezone,
            table,
            metadata,
            controls,
            status: None,
            should_quit: false,
        })
    }

    /// Evaluate the current controls against the table.
    pub fn view(&self, today: NaiveDate) -> Result<DashboardView> {
        let selection = self.controls.selection()?;
        Ok(DashboardView::build(&self.table, &selection, today))
    }

    /// Apply one key press to the controls.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.kind == KeyEventKind::Release {
            return AppAction::Continue;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                AppAction::Quit
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => AppAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => AppAction::Reload,
            KeyCode::Up | KeyCode::BackTab => {
                self.controls.focus_prev();
                AppAction::Continue
            }
            KeyCode::Down | KeyCode::Tab => {
                self.controls.focus_next();
                AppAction::Continue
            }
            KeyCode::Left => {
                self.adjust(-1);
                AppAction::Continue
            }
            KeyCode::Right => {
                self.adjust(1);
                AppAction::Continue
            }
            _ => AppAction::Continue,
        }
    }

    /// Swap in a table from the reload loop.
    pub fn update_table(&mut self, update: TableUpdate) {
        if !Arc::ptr_eq(&self.table, &update.table) {
            self.controls.set_seasons(update.table.seasons());
            self.table = update.table;
        }
        self.metadata = update.metadata;
        self.status = update.error;
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Ctrl+C` or the reload loop stops.
    ///
    /// Key handling polls crossterm with a 250 ms timeout; table updates are
    /// drained from `rx` with `try_recv` between polls.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<TableUpdate>,
        reload: &ReloadHandle,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => match self.handle_key(key) {
                        AppAction::Quit => self.should_quit = true,
                        AppAction::Reload => reload.request_reload(),
                        AppAction::Continue => {}
                    },
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            loop {
                match rx.try_recv() {
                    Ok(update) => self.update_table(update),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn adjust(&mut self, delta: i64) {
        let opponents = match self.controls.season_range() {
            Ok(range) => self.table.in_season_range(&range).opponents(),
            Err(_) => Vec::new(),
        };
        self.controls.adjust(delta, &opponents);
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let today = today_in(self.timezone);

        match self.view(today) {
            Ok(view) => {
                let data = DashboardData {
                    view: &view,
                    controls: &self.controls,
                    timezone: self.timezone.name(),
                    metadata: &self.metadata,
                    status: self.status.as_deref(),
                };
                dashboard_view::render_dashboard(frame, area, &data, &self.theme);
            }
            Err(e) => {
                table_view::render_no_data(frame, area, "Game Day Insights", &e.to_string(), &self.theme);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gameday_core::models::{GameRecord, Location, MonthDayKey, Outcome, Season};
    use ratatui::backend::TestBackend;

    fn game(date: (i32, u32, u32), opponent: &str, outcome: Outcome) -> GameRecord {
        GameRecord {
            season: Season::new(date.0.to_string()),
            game_number: None,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            location: Location::Home,
            opponent: opponent.to_string(),
            goals_for: Some(3),
            goals_against: Some(1),
            outcome,
            wins: None,
            losses: None,
            ties: None,
            overtime_losses: None,
            streak: None,
        }
    }

    fn table() -> Arc<GameTable> {
        Arc::new(GameTable::new(vec![
            game((2019, 1, 14), "Flyers", Outcome::Win),
            game((2020, 1, 14), "Rangers", Outcome::Loss),
            game((2021, 3, 2), "Flyers", Outcome::Win),
        ]))
    }

    fn config() -> AppConfig {
        AppConfig {
            theme_name: "gold".to_string(),
            timezone: chrono_tz::UTC,
            start_season: None,
            end_season: None,
            criterion: None,
            opponent: None,
        }
    }

    fn metadata() -> LoadMetadata {
        LoadMetadata {
            generated_at: "2024-01-14T12:00:00Z".to_string(),
            rows_read: 0,
            games_loaded: 0,
            seasons: 0,
            load_time_seconds: 0.0,
            transform_time_seconds: 0.0,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_app_creation_defaults_to_full_range() {
        let app = App::new(table(), metadata(), config()).unwrap();
        let range = app.controls.season_range().unwrap();
        assert_eq!(range.start, Season::new("2019"));
        assert_eq!(range.end, Season::new("2021"));
        assert!(app.status.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_app_creation_unknown_season_fails() {
        let mut cfg = config();
        cfg.start_season = Some("1850".to_string());
        assert!(App::new(table(), metadata(), cfg).is_err());
    }

    #[test]
    fn test_app_creation_empty_table_fails() {
        let empty = Arc::new(GameTable::new(Vec::new()));
        assert!(App::new(empty, metadata(), config()).is_err());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(table(), metadata(), config()).unwrap();
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), AppAction::Quit);
        assert_eq!(app.handle_key(key(KeyCode::Char('Q'))), AppAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), AppAction::Quit);
        assert_eq!(app.handle_key(key(KeyCode::Char('c'))), AppAction::Continue);
    }

    #[test]
    fn test_reload_key() {
        let mut app = App::new(table(), metadata(), config()).unwrap();
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))), AppAction::Reload);
    }

    #[test]
    fn test_arrow_keys_change_start_season() {
        let mut app = App::new(table(), metadata(), config()).unwrap();
        app.handle_key(key(KeyCode::Right));
        let range = app.controls.season_range().unwrap();
        assert_eq!(range.start, Season::new("2020"));

        app.handle_key(key(KeyCode::Left));
        let range = app.controls.season_range().unwrap();
        assert_eq!(range.start, Season::new("2019"));
    }

    #[test]
    fn test_focus_moves_with_tab() {
        let mut app = App::new(table(), metadata(), config()).unwrap();
        let first = app.controls.focus;
        app.handle_key(key(KeyCode::Tab));
        assert_ne!(app.controls.focus, first);
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.controls.focus, first);
    }

    #[test]
    fn test_view_uses_configured_criterion() {
        let mut cfg = config();
        cfg.criterion = Some(DateCriterion::MonthDay(MonthDayKey::new(1, 14).unwrap()));
        let app = App::new(table(), metadata(), cfg).unwrap();
        let view = app
            .view(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())
            .unwrap();
        let explore = view.explore.unwrap();
        assert_eq!(explore.record.unwrap().total_games, 2);
        assert_eq!(view.today.on_date.unwrap().total_games, 1);
    }

    #[test]
    fn test_update_table_swaps_and_keeps_selection() {
        let mut app = App::new(table(), metadata(), config()).unwrap();
        let bigger = Arc::new(GameTable::new(vec![
            game((2018, 1, 14), "Flyers", Outcome::Loss),
            game((2019, 1, 14), "Flyers", Outcome::Win),
            game((2020, 1, 14), "Rangers", Outcome::Loss),
            game((2021, 3, 2), "Flyers", Outcome::Win),
        ]));
        app.update_table(TableUpdate {
            table: bigger,
            metadata: LoadMetadata {
                rows_read: 4,
                games_loaded: 4,
                ..metadata()
            },
            error: None,
        });
        assert_eq!(app.table.len(), 4);
        assert_eq!(app.metadata.games_loaded, 4);
        let range = app.controls.season_range().unwrap();
        assert_eq!(range.start, Season::new("2019"));
        assert_eq!(range.end, Season::new("2021"));
    }

    #[test]
    fn test_update_table_records_reload_error() {
        let mut app = App::new(table(), metadata(), config()).unwrap();
        let same = Arc::clone(&app.table);
        app.update_table(TableUpdate {
            table: same,
            metadata: metadata(),
            error: Some("row 3: bad date".to_string()),
        });
        assert_eq!(app.status.as_deref(), Some("row 3: bad date"));
        assert_eq!(app.table.len(), 3);

        let same = Arc::clone(&app.table);
        app.update_table(TableUpdate {
            table: same,
            metadata: metadata(),
            error: None,
        });
        assert!(app.status.is_none());
    }

    #[test]
    fn test_render_does_not_panic() {
        let app = App::new(table(), metadata(), config()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }
}
