//! Main application state and logic

use crate::config::{Config, ResultsConfig};
use crate::random::SeededRandom;
use crate::report::{SessionReport, SessionSummary};
use crate::results::{
    AuthenticatedSink, FanoutSink, JsonLinesSink, MemorySink, ResultSink, TestType,
    UserCapability,
};
use crate::tests::{
    AimPhase, AimTest, DigitSpanEvent, DigitSpanPhase, DigitSpanTest, PerformanceTest, PlayField,
    ReactionTest, SequenceEvent, SequencePhase, SequenceRecallTest, TestContext, TestResult,
    TypingEvent, TypingPhase, TypingTest,
};
use crate::timing::MonotonicClock;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Keys selecting the sequence grid cells, row by row
const GRID_KEYS: [[char; 4]; 4] = [
    ['1', '2', '3', '4'],
    ['q', 'w', 'e', 'r'],
    ['a', 's', 'd', 'f'],
    ['z', 'x', 'c', 'v'],
];

/// Current view/tab in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Home,
    Reaction,
    SequenceRecall,
    DigitSpan,
    Typing,
    Aim,
    Help,
}

impl AppView {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Reaction => "Reaction",
            Self::SequenceRecall => "Sequence",
            Self::DigitSpan => "Digit Span",
            Self::Typing => "Typing",
            Self::Aim => "Aim",
            Self::Help => "Help",
        }
    }

    pub fn all() -> &'static [AppView] {
        &[
            Self::Home,
            Self::Reaction,
            Self::SequenceRecall,
            Self::DigitSpan,
            Self::Typing,
            Self::Aim,
            Self::Help,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Home => 0,
            Self::Reaction => 1,
            Self::SequenceRecall => 2,
            Self::DigitSpan => 3,
            Self::Typing => 4,
            Self::Aim => 5,
            Self::Help => 6,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Home,
            1 => Self::Reaction,
            2 => Self::SequenceRecall,
            3 => Self::DigitSpan,
            4 => Self::Typing,
            5 => Self::Aim,
            _ => Self::Help,
        }
    }

    /// Test shown by this view, if any
    pub fn test_type(&self) -> Option<TestType> {
        match self {
            Self::Reaction => Some(TestType::Reaction),
            Self::SequenceRecall => Some(TestType::SequenceRecall),
            Self::DigitSpan => Some(TestType::DigitSpan),
            Self::Typing => Some(TestType::Typing),
            Self::Aim => Some(TestType::Aim),
            Self::Home | Self::Help => None,
        }
    }
}

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

/// Sink stack for a session
///
/// Every attempt lands in `history`; it is additionally persisted to the
/// JSON-lines log only when a user is configured.
pub fn session_sink(results: &ResultsConfig, history: Arc<MemorySink>) -> Arc<dyn ResultSink> {
    let mut persistent = FanoutSink::new();
    if let Some(path) = &results.log_path {
        persistent = persistent.with(Arc::new(JsonLinesSink::new(path.clone())));
    }
    let capability = results.user.as_deref().map(UserCapability::new);

    Arc::new(
        FanoutSink::new()
            .with(history)
            .with(Arc::new(AuthenticatedSink::new(persistent, capability))),
    )
}

/// Main application
pub struct App {
    /// Current view
    pub view: AppView,
    /// Application state
    pub state: AppState,
    /// Configuration
    pub config: Config,
    pub reaction: ReactionTest,
    pub sequence: SequenceRecallTest,
    pub digit_span: DigitSpanTest,
    pub typing: TypingTest,
    pub aim: AimTest,
    /// Every attempt recorded this session
    pub history: Arc<MemorySink>,
    /// Application start time
    pub start_time: Instant,
    /// Last status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
    /// Screen area of the aim play field from the last draw
    aim_area: Option<Rect>,
}

impl App {
    /// Application on the monotonic clock with the configured sinks
    pub fn new(config: Config) -> Self {
        let history = Arc::new(MemorySink::new());
        let sink = session_sink(&config.results, history.clone());
        let ctx = TestContext::new(MonotonicClock::shared(), sink);
        Self::with_context(config, ctx, history)
    }

    /// Application wired to an explicit clock and sink
    ///
    /// `history` is what the home screen and report read from; it should
    /// be reachable from `ctx.sink`.
    pub fn with_context(config: Config, ctx: TestContext, history: Arc<MemorySink>) -> Self {
        let seed = config.random.seed;
        // Distinct but reproducible stream per test
        let rng = |offset: u64| SeededRandom::boxed(seed.map(|s| s.wrapping_add(offset)));

        Self {
            view: AppView::Home,
            state: AppState::Running,
            reaction: ReactionTest::new(ctx.clone(), rng(0)),
            sequence: SequenceRecallTest::new(ctx.clone(), rng(1)),
            digit_span: DigitSpanTest::new(ctx.clone(), rng(2)),
            typing: TypingTest::new(ctx.clone(), rng(3)),
            aim: AimTest::new(ctx, rng(4)),
            config,
            history,
            start_time: Instant::now(),
            status_message: None,
            status_time: None,
            aim_area: None,
        }
    }

    /// Currently shown test, if any
    pub fn active_test(&self) -> Option<&dyn PerformanceTest> {
        match self.view {
            AppView::Reaction => Some(&self.reaction),
            AppView::SequenceRecall => Some(&self.sequence),
            AppView::DigitSpan => Some(&self.digit_span),
            AppView::Typing => Some(&self.typing),
            AppView::Aim => Some(&self.aim),
            AppView::Home | AppView::Help => None,
        }
    }

    fn active_test_mut(&mut self) -> Option<&mut dyn PerformanceTest> {
        match self.view {
            AppView::Reaction => Some(&mut self.reaction),
            AppView::SequenceRecall => Some(&mut self.sequence),
            AppView::DigitSpan => Some(&mut self.digit_span),
            AppView::Typing => Some(&mut self.typing),
            AppView::Aim => Some(&mut self.aim),
            AppView::Home | AppView::Help => None,
        }
    }

    /// Run due timers of the active test and surface its notices
    pub fn tick(&mut self) {
        self.poll_active();
        self.collect_notice();
    }

    fn poll_active(&mut self) {
        if let Some(test) = self.active_test_mut() {
            test.poll_timers();
        }
    }

    fn collect_notice(&mut self) {
        let notice = self.active_test_mut().and_then(|t| t.take_notice());
        if let Some(notice) = notice {
            self.set_status(notice);
        }
    }

    /// Switch views, discarding the state of the test being left
    pub fn open(&mut self, view: AppView) {
        if view == self.view {
            return;
        }
        match self.view {
            AppView::SequenceRecall => self.sequence.reset_progress(),
            AppView::DigitSpan => self.digit_span.reset_progress(),
            _ => {
                if let Some(test) = self.active_test_mut() {
                    test.reset();
                }
            }
        }
        log::debug!("view {} -> {}", self.view.name(), view.name());
        self.view = view;
        if view != AppView::Aim {
            self.aim_area = None;
        }
    }

    /// Switch to the next view
    pub fn next_view(&mut self) {
        let current = self.view.index();
        let next = (current + 1) % AppView::all().len();
        self.open(AppView::from_index(next));
    }

    /// Switch to the previous view
    pub fn prev_view(&mut self) {
        let current = self.view.index();
        let prev = if current == 0 {
            AppView::all().len() - 1
        } else {
            current - 1
        };
        self.open(AppView::from_index(prev));
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.open(AppView::Home);
        self.state = AppState::Quitting;
    }

    /// Route a key press to the current view
    pub fn handle_key(&mut self, code: KeyCode) {
        // Timers that fell due while the host was stalled come first
        self.poll_active();
        match self.view {
            AppView::Home => self.home_key(code),
            AppView::Help => {
                if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                    self.open(AppView::Home);
                }
            }
            _ if code == KeyCode::Esc => self.open(AppView::Home),
            _ if code == KeyCode::Tab => self.next_view(),
            _ if code == KeyCode::BackTab => self.prev_view(),
            AppView::Reaction => {
                if matches!(code, KeyCode::Char(' ') | KeyCode::Enter) {
                    self.reaction.press();
                }
            }
            AppView::SequenceRecall => self.sequence_key(code),
            AppView::DigitSpan => self.digit_span_key(code),
            AppView::Typing => self.typing_key(code),
            AppView::Aim => {
                let active = matches!(self.aim.phase(), AimPhase::Active { .. });
                if code == KeyCode::Enter && !active {
                    let field = self.play_field();
                    self.aim.start(field);
                }
            }
        }
        self.collect_notice();
    }

    fn home_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('?') => self.open(AppView::Help),
            KeyCode::Char('e') => {
                let filename = format!(
                    "cognibench_report_{}.json",
                    chrono::Utc::now().format("%Y%m%d_%H%M%S")
                );
                if let Err(e) = self.export_report(&filename) {
                    log::warn!("report export failed: {}", e);
                    self.set_status(format!("Export failed: {}", e));
                }
            }
            KeyCode::Tab => self.next_view(),
            KeyCode::BackTab => self.prev_view(),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '0' as usize;
                self.open(AppView::from_index(index));
            }
            _ => {}
        }
    }

    fn sequence_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.sequence.handle(SequenceEvent::Start),
            KeyCode::Char('r') if self.sequence.phase() != SequencePhase::Recalling => {
                self.sequence.reset_progress();
                self.set_status("Sequence progress reset".to_string());
            }
            KeyCode::Char(c) => {
                if let Some(cell) = grid_cell(c) {
                    self.sequence.handle(SequenceEvent::SelectCell(cell));
                }
            }
            _ => {}
        }
    }

    fn digit_span_key(&mut self, code: KeyCode) {
        let recalling = self.digit_span.phase() == DigitSpanPhase::Recalling;
        match code {
            KeyCode::Enter if recalling => self.digit_span.handle(DigitSpanEvent::Submit),
            KeyCode::Enter => self.digit_span.handle(DigitSpanEvent::Start),
            KeyCode::Backspace => self.digit_span.backspace(),
            KeyCode::Char('r') if !recalling => {
                self.digit_span.reset_progress();
                self.set_status("Digit span progress reset".to_string());
            }
            KeyCode::Char(c) => self.digit_span.type_text(c.encode_utf8(&mut [0; 4])),
            _ => {}
        }
    }

    fn typing_key(&mut self, code: KeyCode) {
        let active = matches!(self.typing.phase(), TypingPhase::Active { .. });
        match code {
            KeyCode::Enter if !active => self.typing.handle(TypingEvent::Start),
            KeyCode::Backspace => self.typing.backspace(),
            KeyCode::Char(c) => self.typing.type_char(c),
            _ => {}
        }
    }

    /// Route a mouse event; only left clicks on the aim field count
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.view != AppView::Aim {
            return;
        }
        self.poll_active();
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            if let Some((x, y)) = self.field_point(event.column, event.row) {
                self.aim.click(x, y);
            }
        }
        self.collect_notice();
    }

    /// Remember where the aim field was drawn
    pub fn set_aim_area(&mut self, area: Rect) {
        self.aim_area = Some(area);
    }

    /// Play field used for the next aim round
    pub fn play_field(&self) -> PlayField {
        PlayField::new(self.config.aim.field_width, self.config.aim.field_height)
    }

    /// Map a terminal cell to the center of its patch of play field
    pub fn field_point(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.aim_area?;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return None;
        }
        let field = match self.aim.phase() {
            AimPhase::Ready => self.play_field(),
            _ => self.aim.field(),
        };
        let x = (f64::from(column - area.x) + 0.5) / f64::from(area.width) * field.width;
        let y = (f64::from(row - area.y) + 0.5) / f64::from(area.height) * field.height;
        Some((x, y))
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still within the configured duration
    pub fn get_status(&self) -> Option<&str> {
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed() < self.config.status_duration() => {
                Some(msg)
            }
            _ => None,
        }
    }

    /// Get results for current view
    pub fn current_results(&self) -> Vec<TestResult> {
        match self.active_test() {
            Some(test) => test.get_results(),
            None => self.home_results(),
        }
    }

    /// Session overview for the home screen
    fn home_results(&self) -> Vec<TestResult> {
        let summary = SessionSummary::from_attempts(&self.history.attempts());
        let mut results = vec![
            TestResult::info("Session Time", self.elapsed_formatted()),
            TestResult::info("Attempts", format!("{}", summary.total_attempts)),
        ];

        for (i, test_type) in TestType::all().iter().enumerate() {
            let count = summary.counts.get(test_type).copied().unwrap_or(0);
            let value = match summary.best_scores.get(test_type) {
                Some(best) if *test_type == TestType::Reaction => {
                    format!("{} runs, best {} ms", count, best)
                }
                Some(best) => format!("{} runs, best {}", count, best),
                None => "not played".to_string(),
            };
            results.push(TestResult::info(
                format!("{}. {}", i + 1, test_type.display_name()),
                value,
            ));
        }

        results
    }

    /// Get elapsed time formatted
    pub fn elapsed_formatted(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }

    /// Generate a session report
    pub fn generate_report(&self) -> SessionReport {
        SessionReport::new(self.start_time, self.history.attempts())
    }

    /// Export session report to JSON file
    pub fn export_report(&mut self, filename: &str) -> Result<String, std::io::Error> {
        let report = self.generate_report();
        let path = Path::new(filename);
        report.export_json(path)?;
        log::info!("exported {} attempt(s) to {}", report.attempts.len(), filename);
        let msg = format!("Exported to {}", filename);
        self.set_status(msg.clone());
        Ok(msg)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Grid cell selected by a key, row-major
pub fn grid_cell(key: char) -> Option<u8> {
    let key = key.to_ascii_lowercase();
    GRID_KEYS.iter().enumerate().find_map(|(row, keys)| {
        keys.iter()
            .position(|&k| k == key)
            .map(|col| (row * keys.len() + col) as u8)
    })
}
