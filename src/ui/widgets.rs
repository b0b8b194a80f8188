//! Custom TUI widgets

use super::theme::ThemeColors;
use crate::tests::{ResultStatus, TestResult};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Widget for displaying test results
pub struct ResultsPanel<'a> {
    results: &'a [TestResult],
    title: &'a str,
    colors: ThemeColors,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(results: &'a [TestResult], title: &'a str) -> Self {
        Self {
            results,
            title,
            colors: ThemeColors::default(),
        }
    }

    pub fn colors(mut self, colors: ThemeColors) -> Self {
        self.colors = colors;
        self
    }

    fn status_color(&self, status: ResultStatus) -> Color {
        match status {
            ResultStatus::Ok => self.colors.green,
            ResultStatus::Warning => self.colors.yellow,
            ResultStatus::Error => self.colors.red,
            ResultStatus::Info => self.colors.cyan,
        }
    }

    fn status_symbol(status: ResultStatus) -> &'static str {
        match status {
            ResultStatus::Ok => "[OK]",
            ResultStatus::Warning => "[!!]",
            ResultStatus::Error => "[XX]",
            ResultStatus::Info => "[--]",
        }
    }
}

impl<'a> Widget for ResultsPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.fg));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut y = inner.y;
        for result in self.results {
            if y >= inner.y + inner.height {
                break;
            }

            let color = self.status_color(result.status);
            let symbol = Self::status_symbol(result.status);

            let line = Line::from(vec![
                Span::styled(format!("{} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{}: ", result.label),
                    Style::default()
                        .fg(self.colors.fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(&result.value, Style::default().fg(color)),
            ]);

            buf.set_line(inner.x, y, &line, inner.width);
            y += 1;
        }
    }
}

/// Widget for the help screen
pub struct HelpPanel;

impl Widget for HelpPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Help - CogniBench")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = vec![
            "",
            " NAVIGATION",
            " -----------",
            " 1-5              : Open a test (from Home)",
            " Tab / Shift+Tab  : Switch between views",
            " Esc              : Back to Home (leaving resets the test)",
            " q / Esc          : Quit (from Home)",
            " e                : Export session report to JSON (from Home)",
            " ?                : Show this help",
            "",
            " TESTS",
            " -----------",
            " 1. Reaction      : Space/Enter to start, click on green",
            " 2. Sequence      : Enter to start, cells on 1234/qwer/asdf/zxcv, r resets",
            " 3. Digit Span    : Enter to start/submit, type digits, r resets",
            " 4. Typing        : Enter to start, type the passage",
            " 5. Aim           : Enter to start, click targets with the mouse",
            "",
            " Results are saved when a user is set in config.toml.",
        ];

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if line.starts_with(' ') && line.contains("---") {
                Style::default().fg(Color::DarkGray)
            } else if line.len() > 1 && line[1..].chars().all(|c| c.is_ascii_uppercase()) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            buf.set_string(inner.x, inner.y + i as u16, line, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    phase: &'a str,
    view: &'a str,
    elapsed: &'a str,
    attempts: usize,
    message: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(phase: &'a str, view: &'a str, elapsed: &'a str, attempts: usize) -> Self {
        Self {
            phase,
            view,
            elapsed,
            attempts,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Background
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", bg_style);
        }

        // Left side: view and phase
        let left = format!(" {} | {} ", self.view, self.phase);
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        // Center: message if any
        if let Some(msg) = self.message {
            let msg_style = Style::default().bg(Color::DarkGray).fg(Color::Yellow);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        // Right side: elapsed time and attempts
        let right = format!(" {} | Attempts: {} ", self.elapsed, self.attempts);
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}

/// Tab bar widget
pub struct TabBar<'a> {
    tabs: &'a [&'a str],
    selected: usize,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [&'a str], selected: usize) -> Self {
        Self { tabs, selected }
    }
}

impl<'a> Widget for TabBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut x = area.x;

        for (i, tab) in self.tabs.iter().enumerate() {
            let is_selected = i == self.selected;

            let style = if is_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            };

            let label = format!(" {} ", tab);
            let width = label.len() as u16;

            if x + width <= area.x + area.width {
                buf.set_string(x, area.y, &label, style);
                x += width;

                // Separator
                if i < self.tabs.len() - 1 && x < area.x + area.width {
                    buf.set_string(x, area.y, "|", Style::default().fg(Color::DarkGray));
                    x += 1;
                }
            }
        }

        // Fill rest with background
        for fill_x in x..area.x + area.width {
            buf.set_string(fill_x, area.y, " ", Style::default().bg(Color::DarkGray));
        }
    }
}
