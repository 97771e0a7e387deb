use gameday_core::formatting::format_percentage;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::themes::Theme;

/// Configuration controlling visual appearance of a win bar.
pub struct WinBarConfig {
    /// Columns reserved for the opponent name.
    pub label_width: usize,
    /// Columns of the bar itself, excluding label and percentage.
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for WinBarConfig {
    fn default() -> Self {
        Self {
            label_width: 24,
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── WinBar ───────────────────────────────────────────────────────────────────

/// One row of the all-teams chart: `label ████░░░░ 54.21%`.
pub struct WinBar<'a> {
    pub label: &'a str,
    /// Clamped to `[0.0, 100.0]`.
    pub percentage: f64,
    pub theme: &'a Theme,
    pub config: WinBarConfig,
}

impl<'a> WinBar<'a> {
    pub fn new(label: &'a str, percentage: f64, theme: &'a Theme) -> Self {
        Self {
            label,
            percentage: percentage.clamp(0.0, 100.0),
            theme,
            config: WinBarConfig::default(),
        }
    }

    pub fn with_config(mut self, config: WinBarConfig) -> Self {
        self.config = config;
        self
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = ((self.percentage / 100.0) * self.config.width as f64).round() as u16;
        let filled = filled.min(self.config.width);
        let empty = self.config.width - filled;

        let filled_str = self.config.filled_char.to_string().repeat(filled as usize);
        let empty_str = self.config.empty_char.to_string().repeat(empty as usize);

        Line::from(vec![
            Span::styled(fit_label(self.label, self.config.label_width), self.theme.label),
            Span::raw(" "),
            Span::styled(filled_str, self.theme.bar),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(
                format!(" {:>7}", format_percentage(self.percentage)),
                self.theme.record_style(self.percentage),
            ),
        ])
    }
}

/// Pad or truncate `label` to exactly `width` display columns.
///
/// Truncated labels end with `…`.
pub fn fit_label(label: &str, width: usize) -> String {
    if label.width() <= width {
        let pad = width - label.width();
        return format!("{label}{}", " ".repeat(pad));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
