//! Keyboard-driven filter controls.
//!
//! [`ControlState`] is the viewer's editable filter state. Every read goes
//! through [`ControlState::selection`], which produces a fresh immutable
//! [`FilterSelection`] for the query layer.

use chrono::Weekday;
use gameday_core::error::{GamedayError, Result};
use gameday_core::models::{DateCriterion, FilterSelection, MonthDayKey, Season, SeasonRange};
use gameday_core::time_utils::{days_in_month, month_name, weekday_name};

/// Label of the opponent option that disables opponent narrowing.
pub const ALL_OPPONENTS: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    StartSeason,
    EndSeason,
    ExploreMode,
    Month,
    Day,
    Weekday,
    Opponent,
}

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::StartSeason => "Start Season",
            Control::EndSeason => "End Season",
            Control::ExploreMode => "Explore",
            Control::Month => "Month",
            Control::Day => "Day",
            Control::Weekday => "Day of Week",
            Control::Opponent => "Opponent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreMode {
    SpecificDate,
    DayOfWeek,
}

impl ExploreMode {
    pub fn label(&self) -> &'static str {
        match self {
            ExploreMode::SpecificDate => "Specific Date",
            ExploreMode::DayOfWeek => "Day of the Week",
        }
    }
}

// ── ControlState ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ControlState {
    pub focus: Control,
    seasons: Vec<Season>,
    start_idx: usize,
    end_idx: usize,
    pub mode: ExploreMode,
    pub month: u32,
    pub day: u32,
    pub weekday: Weekday,
    pub opponent: Option<String>,
}

impl ControlState {
    /// Initial state for `seasons` (ascending), positioned on `range`.
    ///
    /// Without a criterion the explore controls start on January 1.
    pub fn new(
        seasons: Vec<Season>,
        range: &SeasonRange,
        criterion: Option<DateCriterion>,
        opponent: Option<String>,
    ) -> Self {
        let start_idx = seasons.iter().position(|s| *s == range.start).unwrap_or(0);
        let end_idx = seasons
            .iter()
            .position(|s| *s == range.end)
            .unwrap_or_else(|| seasons.len().saturating_sub(1));

        let mut state = Self {
            focus: Control::StartSeason,
            seasons,
            start_idx,
            end_idx,
            mode: ExploreMode::SpecificDate,
            month: 1,
            day: 1,
            weekday: Weekday::Mon,
            opponent,
        };
        match criterion {
            Some(DateCriterion::MonthDay(key)) => {
                state.month = key.month();
                state.day = key.day();
            }
            Some(DateCriterion::Weekday(day)) => {
                state.mode = ExploreMode::DayOfWeek;
                state.weekday = day;
            }
            None => {}
        }
        state
    }

    // ── Derived values ────────────────────────────────────────────────────

    pub fn season_range(&self) -> Result<SeasonRange> {
        let start = self.seasons.get(self.start_idx);
        let end = self.seasons.get(self.end_idx);
        match (start, end) {
            (Some(start), Some(end)) => SeasonRange::new(start.clone(), end.clone()),
            _ => Err(GamedayError::Config("no seasons loaded".to_string())),
        }
    }

    pub fn criterion(&self) -> DateCriterion {
        match self.mode {
            ExploreMode::SpecificDate => {
                let key = MonthDayKey::new(self.month, self.day)
                    .or_else(|| MonthDayKey::new(self.month, 1))
                    .or_else(|| MonthDayKey::new(1, 1));
                match key {
                    Some(key) => DateCriterion::MonthDay(key),
                    None => DateCriterion::Weekday(self.weekday),
                }
            }
            ExploreMode::DayOfWeek => DateCriterion::Weekday(self.weekday),
        }
    }

    /// The immutable selection the query layer evaluates.
    pub fn selection(&self) -> Result<FilterSelection> {
        Ok(FilterSelection::new(self.season_range()?)
            .with_criterion(Some(self.criterion()))
            .with_opponent(self.opponent.clone()))
    }

    /// Controls shown for the current explore mode, top to bottom.
    pub fn visible_controls(&self) -> Vec<Control> {
        let mut controls = vec![Control::StartSeason, Control::EndSeason, Control::ExploreMode];
        match self.mode {
            ExploreMode::SpecificDate => controls.extend([Control::Month, Control::Day]),
            ExploreMode::DayOfWeek => controls.push(Control::Weekday),
        }
        controls.push(Control::Opponent);
        controls
    }

    pub fn value_label(&self, control: Control) -> String {
        match control {
            Control::StartSeason => self
                .seasons
                .get(self.start_idx)
                .map(Season::to_string)
                .unwrap_or_default(),
            Control::EndSeason => self
                .seasons
                .get(self.end_idx)
                .map(Season::to_string)
                .unwrap_or_default(),
            Control::ExploreMode => self.mode.label().to_string(),
            Control::Month => month_name(self.month).unwrap_or("?").to_string(),
            Control::Day => self.day.to_string(),
            Control::Weekday => weekday_name(self.weekday).to_string(),
            Control::Opponent => self.opponent.as_deref().unwrap_or(ALL_OPPONENTS).to_string(),
        }
    }

    // ── Navigation ────────────────────────────────────────────────────────

    pub fn focus_next(&mut self) {
        self.move_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.move_focus(-1);
    }

    fn move_focus(&mut self, delta: i64) {
        let controls = self.visible_controls();
        let pos = controls.iter().position(|c| *c == self.focus).unwrap_or(0);
        self.focus = controls[wrap(pos, delta, controls.len())];
    }

    /// Step the focused control's value by `delta`.
    ///
    /// `opponents` is the sorted opponent list of the current season range;
    /// the opponent control cycles through "All" followed by that list.
    pub fn adjust(&mut self, delta: i64, opponents: &[String]) {
        match self.focus {
            Control::StartSeason => {
                self.start_idx = clamp_step(self.start_idx, delta, 0, self.end_idx);
            }
            Control::EndSeason => {
                let last = self.seasons.len().saturating_sub(1);
                self.end_idx = clamp_step(self.end_idx, delta, self.start_idx, last);
            }
            Control::ExploreMode => {
                self.mode = match self.mode {
                    ExploreMode::SpecificDate => ExploreMode::DayOfWeek,
                    ExploreMode::DayOfWeek => ExploreMode::SpecificDate,
                };
            }
            Control::Month => {
                self.month = wrap(self.month as usize - 1, delta, 12) as u32 + 1;
                self.day = self.day.min(days_in_month(self.month));
            }
            Control::Day => {
                let days = days_in_month(self.month) as usize;
                self.day = wrap(self.day as usize - 1, delta, days) as u32 + 1;
            }
            Control::Weekday => {
                self.weekday = if delta >= 0 {
                    self.weekday.succ()
                } else {
                    self.weekday.pred()
                };
            }
            Control::Opponent => {
                let pos = self
                    .opponent
                    .as_ref()
                    .and_then(|o| opponents.iter().position(|x| x == o))
                    .map(|p| p + 1)
                    .unwrap_or(0);
                let next = wrap(pos, delta, opponents.len() + 1);
                self.opponent = next.checked_sub(1).map(|i| opponents[i].clone());
            }
        }
    }

    /// Replace the season list after a reload, keeping the selected seasons
    /// where they still exist.
    pub fn set_seasons(&mut self, seasons: Vec<Season>) {
        let start = self.seasons.get(self.start_idx).cloned();
        let end = self.seasons.get(self.end_idx).cloned();
        let last = seasons.len().saturating_sub(1);

        self.start_idx = start
            .and_then(|s| seasons.iter().position(|x| *x == s))
            .unwrap_or(0);
        self.end_idx = end
            .and_then(|s| seasons.iter().position(|x| *x == s))
            .unwrap_or(last)
            .max(self.start_idx)
            .min(last);
        self.seasons = seasons;
    }
}

fn wrap(pos: usize, delta: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (pos as i64 + delta).rem_euclid(len as i64) as usize
}

fn clamp_step(pos: usize, delta: i64, min: usize, max: usize) -> usize {
    (pos as i64 + delta).clamp(min as i64, max.max(min) as i64) as usize
}

// ── Tests ─────────────────────────────────────────────────────────────────────
