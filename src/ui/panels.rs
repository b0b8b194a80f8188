//! Per-test play areas

use super::theme::ThemeColors;
use crate::tests::{
    AimPhase, AimTest, DigitSpanPhase, DigitSpanTest, ReactionPhase, ReactionTest, SequencePhase,
    SequenceRecallTest, TypingPhase, TypingTest,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Grid side length for the sequence test
const GRID_SIDE: u16 = 4;
const CELL_WIDTH: u16 = 7;
const CELL_HEIGHT: u16 = 3;

fn framed(title: &str, colors: &ThemeColors, area: Rect, buf: &mut Buffer) -> Rect {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.dim));
    let inner = block.inner(area);
    block.render(area, buf);
    inner
}

/// Write `text` centered on row `y` of `area`
fn centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    if y >= area.y + area.height {
        return;
    }
    let width = text.chars().count() as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    buf.set_stringn(x, y, text, area.width as usize, style);
}

/// Reaction signal: a colored field that turns green when it is time to click
pub struct ReactionPanel<'a> {
    test: &'a ReactionTest,
    colors: ThemeColors,
}

impl<'a> ReactionPanel<'a> {
    pub fn new(test: &'a ReactionTest, colors: ThemeColors) -> Self {
        Self { test, colors }
    }
}

impl<'a> Widget for ReactionPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = framed("Reaction", &self.colors, area, buf);
        let (fill, headline, hint) = match self.test.phase() {
            ReactionPhase::Ready => (self.colors.cell_off, "Ready".to_string(), "Space to start"),
            ReactionPhase::Waiting {
                countdown: Some(n),
            } => (self.colors.cell_off, format!("{}", n), "Get ready"),
            ReactionPhase::Waiting { countdown: None } => {
                (self.colors.red, "Wait for green...".to_string(), "")
            }
            ReactionPhase::Active { .. } => {
                (self.colors.green, "CLICK!".to_string(), "Space or Enter")
            }
            ReactionPhase::Complete { latency_ms } => (
                self.colors.cell_off,
                format!("{} ms - {}", latency_ms, ReactionTest::rating(latency_ms).label()),
                "Space to try again",
            ),
            ReactionPhase::Early => (
                self.colors.yellow,
                "Too early!".to_string(),
                "Space to try again",
            ),
        };

        buf.set_style(inner, Style::default().bg(fill));
        let middle = inner.y + inner.height / 2;
        let text = Style::default()
            .bg(fill)
            .fg(self.colors.bg)
            .add_modifier(Modifier::BOLD);
        centered(buf, inner, middle, &headline, text);
        centered(buf, inner, middle + 1, hint, text.remove_modifier(Modifier::BOLD));
    }
}

/// 4x4 sequence grid with key hints
pub struct SequenceGrid<'a> {
    test: &'a SequenceRecallTest,
    colors: ThemeColors,
}

impl<'a> SequenceGrid<'a> {
    pub fn new(test: &'a SequenceRecallTest, colors: ThemeColors) -> Self {
        Self { test, colors }
    }
}

impl<'a> Widget for SequenceGrid<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = framed("Sequence", &self.colors, area, buf);
        let status = match self.test.phase() {
            SequencePhase::Ready => format!("Level {} - Enter to start", self.test.level()),
            SequencePhase::Showing { .. } => "Watch the sequence".to_string(),
            SequencePhase::Memorizing { seconds_left } => format!("Memorize... {}", seconds_left),
            SequencePhase::Recalling => {
                let (done, total) = self.test.progress();
                format!("Repeat it: {}/{}", done, total)
            }
            SequencePhase::Complete {
                is_correct: true, ..
            } => "Correct! Enter for the next level".to_string(),
            SequencePhase::Complete { accuracy, .. } => {
                format!("Wrong ({}% right) - Enter to retry", accuracy)
            }
        };
        centered(buf, inner, inner.y, &status, Style::default().fg(self.colors.fg));

        let grid_w = GRID_SIDE * CELL_WIDTH;
        let grid_h = GRID_SIDE * CELL_HEIGHT;
        if inner.width < grid_w || inner.height < grid_h + 2 {
            centered(
                buf,
                inner,
                inner.y + 1,
                "Window too small",
                Style::default().fg(self.colors.dim),
            );
            return;
        }
        let x0 = inner.x + (inner.width - grid_w) / 2;
        let y0 = inner.y + 2;

        let revealed = self.test.revealed_cell();
        let last_input = self.test.input().last().copied();
        let correctness = self.test.input_correctness();
        let last_ok = correctness.last().copied().unwrap_or(true);
        let keys = ["1234", "qwer", "asdf", "zxcv"];

        for row in 0..GRID_SIDE {
            for col in 0..GRID_SIDE {
                let cell = (row * GRID_SIDE + col) as u8;
                let bg = if revealed == Some(cell) {
                    self.colors.cell_on
                } else if self.test.phase() == SequencePhase::Recalling && last_input == Some(cell)
                {
                    if last_ok {
                        self.colors.green
                    } else {
                        self.colors.red
                    }
                } else {
                    self.colors.cell_off
                };
                let rect = Rect::new(
                    x0 + col * CELL_WIDTH,
                    y0 + row * CELL_HEIGHT,
                    CELL_WIDTH - 1,
                    CELL_HEIGHT - 1,
                );
                buf.set_style(rect, Style::default().bg(bg));
                let label = keys[row as usize]
                    .chars()
                    .nth(col as usize)
                    .map(String::from)
                    .unwrap_or_default();
                centered(
                    buf,
                    rect,
                    rect.y,
                    &label,
                    Style::default().bg(bg).fg(self.colors.dim),
                );
            }
        }
    }
}

/// Digit display while showing, entry field while recalling
pub struct DigitSpanPanel<'a> {
    test: &'a DigitSpanTest,
    colors: ThemeColors,
}

impl<'a> DigitSpanPanel<'a> {
    pub fn new(test: &'a DigitSpanTest, colors: ThemeColors) -> Self {
        Self { test, colors }
    }
}

impl<'a> Widget for DigitSpanPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = framed("Digit Span", &self.colors, area, buf);
        let middle = inner.y + inner.height / 2;
        let big = Style::default()
            .fg(self.colors.cyan)
            .add_modifier(Modifier::BOLD);
        let hint = Style::default().fg(self.colors.dim);

        match self.test.phase() {
            DigitSpanPhase::Ready => {
                let text = format!(
                    "Level {}: remember {} digits",
                    self.test.level(),
                    DigitSpanTest::digit_count(self.test.level())
                );
                centered(buf, inner, middle, &text, big);
                centered(buf, inner, middle + 1, "Enter to start", hint);
            }
            DigitSpanPhase::Showing { seconds_left } => {
                let digits = DigitSpanTest::format_for_display(self.test.digits());
                centered(buf, inner, middle, &digits, big);
                centered(buf, inner, middle + 1, &format!("{}s", seconds_left), hint);
            }
            DigitSpanPhase::Recalling => {
                let entry = format!("{}_", DigitSpanTest::format_for_display(self.test.input()));
                centered(buf, inner, middle, &entry, big);
                centered(buf, inner, middle + 1, "Type the number, Enter to submit", hint);
            }
            DigitSpanPhase::Complete { is_correct } => {
                let (text, color) = if is_correct {
                    ("Correct!".to_string(), self.colors.green)
                } else {
                    (
                        format!(
                            "It was {}",
                            DigitSpanTest::format_for_display(self.test.digits())
                        ),
                        self.colors.red,
                    )
                };
                centered(buf, inner, middle, &text, big.fg(color));
                centered(buf, inner, middle + 1, "Enter to continue", hint);
            }
        }
    }
}

/// Typing passage, typed characters colored by correctness
pub struct TypingPassage<'a> {
    test: &'a TypingTest,
    colors: ThemeColors,
}

impl<'a> TypingPassage<'a> {
    pub fn new(test: &'a TypingTest, colors: ThemeColors) -> Self {
        Self { test, colors }
    }

    fn spans(&self) -> Vec<Span<'static>> {
        let mut typed = self.test.typed().chars();
        let mut cursor_drawn = false;
        self.test
            .sample()
            .chars()
            .map(|expected| {
                let style = match typed.next() {
                    Some(c) if c == expected => Style::default().fg(self.colors.green),
                    Some(_) => Style::default().fg(self.colors.bg).bg(self.colors.red),
                    None if !cursor_drawn => {
                        cursor_drawn = true;
                        Style::default().fg(self.colors.fg).add_modifier(Modifier::UNDERLINED)
                    }
                    None => Style::default().fg(self.colors.dim),
                };
                Span::styled(expected.to_string(), style)
            })
            .collect()
    }
}

impl<'a> Widget for TypingPassage<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header = match self.test.phase() {
            TypingPhase::Ready => "Typing - Enter to start".to_string(),
            TypingPhase::Active { seconds_left, .. } => {
                format!("Typing - {}s - {} wpm", seconds_left, self.test.wpm())
            }
            TypingPhase::Complete => "Typing - done, Enter to go again".to_string(),
        };
        let block = Block::default()
            .title(format!(" {} ", header))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.dim));

        let body = if self.test.phase() == TypingPhase::Ready {
            Line::from(Span::styled(
                "A passage appears when you start. You have 60 seconds.",
                Style::default().fg(self.colors.dim),
            ))
        } else {
            Line::from(self.spans())
        };

        Paragraph::new(body)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Aim play field scaled into the terminal area
pub struct AimField<'a> {
    test: &'a AimTest,
    colors: ThemeColors,
}

impl<'a> AimField<'a> {
    pub fn new(test: &'a AimTest, colors: ThemeColors) -> Self {
        Self { test, colors }
    }
}

impl<'a> Widget for AimField<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.colors.bg));
        if area.width == 0 || area.height == 0 {
            return;
        }

        let field = self.test.field();
        let target_style = Style::default().fg(self.colors.target);

        // A cell is drawn when a click on its centre would hit
        for target in self.test.targets() {
            for row in 0..area.height {
                let y = (f64::from(row) + 0.5) / f64::from(area.height) * field.height;
                for col in 0..area.width {
                    let x = (f64::from(col) + 0.5) / f64::from(area.width) * field.width;
                    if target.contains(x, y) {
                        buf.set_string(area.x + col, area.y + row, "█", target_style);
                    }
                }
            }
        }

        if self.test.targets().is_empty() {
            let middle = area.y + area.height / 2;
            let hint = match self.test.phase() {
                AimPhase::Ready => "Enter to start, then click the targets",
                AimPhase::Active { .. } => "",
                AimPhase::Complete => "Round over - Enter to play again",
            };
            centered(buf, area, middle, hint, Style::default().fg(self.colors.dim));
        }
    }
}
