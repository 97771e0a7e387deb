use chrono::{Datelike, NaiveDate};
use gameday_core::formatting::format_date_heading;
use gameday_core::models::SeasonRange;
use gameday_core::time_utils::weekday_name;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Decoration placed either side of the application title.
pub const ORNAMENT: &str = "★ ★ ★";

pub const TITLE: &str = " GAME DAY INSIGHTS ";

/// Dashboard header rendering four lines:
///
/// 1. Application title between ornaments.
/// 2. A 60-column `=` separator.
/// 3. `[ seasons A to B | Weekday, Month DD | timezone ]`.
/// 4. An empty line.
pub struct Header<'a> {
    pub season_range: &'a SeasonRange,
    pub today: NaiveDate,
    pub timezone: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        season_range: &'a SeasonRange,
        today: NaiveDate,
        timezone: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            season_range,
            today,
            timezone,
            theme,
        }
    }

    /// Number of lines produced by [`Header::to_lines`].
    pub const HEIGHT: u16 = 4;

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let today = format!(
            "{}, {}",
            weekday_name(self.today.weekday()),
            format_date_heading(self.today)
        );

        vec![
            Line::from(vec![
                Span::styled(ORNAMENT, self.theme.header_accent),
                Span::styled(TITLE, self.theme.header),
                Span::styled(ORNAMENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ seasons ", self.theme.label),
                Span::styled(self.season_range.start.to_string(), self.theme.value),
                Span::styled(" to ", self.theme.label),
                Span::styled(self.season_range.end.to_string(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(today, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone.to_string(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gameday_core::models::Season;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn range() -> SeasonRange {
        SeasonRange::new(Season::new("1990"), Season::new("2021")).unwrap()
    }

    #[test]
    fn test_header_line_count() {
        let theme = Theme::gold();
        let range = range();
        let today = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        let lines = Header::new(&range, today, "America/New_York", &theme).to_lines();
        assert_eq!(lines.len(), Header::HEIGHT as usize);
        assert!(text(&lines[3]).is_empty());
    }

    #[test]
    fn test_header_title_line() {
        let theme = Theme::gold();
        let range = range();
        let today = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        let lines = Header::new(&range, today, "UTC", &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.contains("GAME DAY INSIGHTS"), "got: {title}");
        assert!(title.starts_with(ORNAMENT));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::gold();
        let range = range();
        let today = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        let lines = Header::new(&range, today, "America/New_York", &theme).to_lines();
        assert_eq!(
            text(&lines[2]),
            "[ seasons 1990 to 2021 | Sunday, January 14 | America/New_York ]"
        );
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let range = range();
        let today = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        let lines = Header::new(&range, today, "UTC", &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }
}
