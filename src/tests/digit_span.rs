//! Number memory (digit span) test

use super::{PerformanceTest, TestContext, TestResult};
use crate::random::BoxedRandom;
use crate::results::{metadata, TestType};
use crate::timing::{Scheduler, TimerHandle, Timestamp};
use crate::utils::percent;
use serde_json::json;

const BASE_DIGITS: u32 = 3;
const MAX_DIGITS: u32 = 15;
const MIN_DISPLAY_SECS: u32 = 2;
const POINTS_PER_LEVEL: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitSpanPhase {
    Ready,
    Showing { seconds_left: u32 },
    Recalling,
    Complete { is_correct: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigitSpanEvent {
    Start,
    DisplayTick,
    /// New contents of the entry field; non-digits are dropped
    Input(String),
    Submit,
}

/// One submitted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitSpanAttempt {
    pub level: u32,
    pub correct: bool,
    pub number: String,
    pub input: String,
}

/// Digit span test
pub struct DigitSpanTest {
    ctx: TestContext,
    rng: BoxedRandom,
    timers: Scheduler<DigitSpanEvent>,
    phase: DigitSpanPhase,
    display_timer: Option<TimerHandle>,
    level: u32,
    score: u64,
    digits: String,
    input: String,
    history: Vec<DigitSpanAttempt>,
    notice: Option<String>,
}

impl DigitSpanTest {
    pub fn new(ctx: TestContext, rng: BoxedRandom) -> Self {
        Self {
            timers: Scheduler::new(ctx.clock.clone()),
            ctx,
            rng,
            phase: DigitSpanPhase::Ready,
            display_timer: None,
            level: 1,
            score: 0,
            digits: String::new(),
            input: String::new(),
            history: Vec::new(),
            notice: None,
        }
    }

    pub fn phase(&self) -> DigitSpanPhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// The number to remember
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn history(&self) -> &[DigitSpanAttempt] {
        &self.history
    }

    /// Number of digits shown at `level`
    pub fn digit_count(level: u32) -> u32 {
        (BASE_DIGITS + level).min(MAX_DIGITS)
    }

    /// Seconds the number stays on screen
    pub fn display_secs(digit_count: u32) -> u32 {
        // ceil(count * 0.5)
        MIN_DISPLAY_SECS.max((digit_count + 1) / 2)
    }

    /// Random number with `count` digits and no leading zero
    pub fn generate_digits(rng: &mut BoxedRandom, count: u32) -> String {
        (0..count)
            .map(|i| {
                let digit = if i == 0 {
                    1 + rng.index(9) as u32
                } else {
                    rng.index(10) as u32
                };
                char::from_digit(digit, 10).unwrap_or('0')
            })
            .collect()
    }

    /// Keep only ASCII digits
    pub fn sanitize(raw: &str) -> String {
        raw.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Number grouped with spaces between digits for display
    pub fn format_for_display(digits: &str) -> String {
        digits
            .chars()
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Highest level answered correctly this session
    pub fn highest_level(&self) -> u32 {
        self.history
            .iter()
            .filter(|a| a.correct)
            .map(|a| a.level)
            .max()
            .unwrap_or(0)
    }

    /// Percent of correct answers, 100 before any attempt
    pub fn session_accuracy(&self) -> u32 {
        let correct = self.history.iter().filter(|a| a.correct).count();
        percent(correct, self.history.len(), 100)
    }

    /// Append typed text to the entry field
    pub fn type_text(&mut self, text: &str) {
        let next = format!("{}{}", self.input, text);
        self.handle(DigitSpanEvent::Input(next));
    }

    pub fn backspace(&mut self) {
        let mut next = self.input.clone();
        next.pop();
        self.handle(DigitSpanEvent::Input(next));
    }

    /// Clear level, score and history
    pub fn reset_progress(&mut self) {
        self.reset();
        self.level = 1;
        self.score = 0;
        self.history.clear();
    }

    /// Transition function
    pub fn handle(&mut self, event: DigitSpanEvent) {
        use DigitSpanEvent as E;
        use DigitSpanPhase as P;

        match (self.phase, event) {
            (P::Ready | P::Complete { .. }, E::Start) => self.begin_attempt(),
            (P::Showing { seconds_left }, E::DisplayTick) => {
                if seconds_left <= 1 {
                    if let Some(handle) = self.display_timer.take() {
                        self.timers.cancel(handle);
                    }
                    self.phase = P::Recalling;
                } else {
                    self.phase = P::Showing {
                        seconds_left: seconds_left - 1,
                    };
                }
            }
            (P::Recalling, E::Input(raw)) => {
                self.input = Self::sanitize(&raw);
            }
            (P::Recalling, E::Submit) => self.submit(),
            (phase, event) => {
                log::debug!("digit span: ignoring {:?} in {:?}", event, phase);
            }
        }
    }

    fn begin_attempt(&mut self) {
        self.timers.cancel_all();
        let count = Self::digit_count(self.level);
        self.digits = Self::generate_digits(&mut self.rng, count);
        self.input.clear();
        self.phase = DigitSpanPhase::Showing {
            seconds_left: Self::display_secs(count),
        };
        self.display_timer = Some(self.timers.every(1000, DigitSpanEvent::DisplayTick));
    }

    fn submit(&mut self) {
        let is_correct = self.input == self.digits;
        let level = self.level;

        self.history.push(DigitSpanAttempt {
            level,
            correct: is_correct,
            number: self.digits.clone(),
            input: self.input.clone(),
        });
        if is_correct {
            self.score += u64::from(level) * POINTS_PER_LEVEL;
            self.level += 1;
        }
        self.phase = DigitSpanPhase::Complete { is_correct };

        self.notice = self.ctx.submit(
            TestType::DigitSpan,
            self.score,
            metadata(json!({
                "level": level,
                "isCorrect": is_correct,
                "totalAttempts": self.history.len(),
            })),
        );
    }
}

impl PerformanceTest for DigitSpanTest {
    fn name(&self) -> &'static str {
        "Number Memory"
    }

    fn description(&self) -> &'static str {
        "Remember the number and type it back"
    }

    fn test_type(&self) -> TestType {
        TestType::DigitSpan
    }

    fn phase_name(&self) -> &'static str {
        match self.phase {
            DigitSpanPhase::Ready => "ready",
            DigitSpanPhase::Showing { .. } => "showing",
            DigitSpanPhase::Recalling => "recalling",
            DigitSpanPhase::Complete { .. } => "complete",
        }
    }

    fn poll_timers(&mut self) {
        while let Some(fired) = self.timers.pop_due() {
            self.handle(fired.event);
        }
    }

    fn next_deadline(&self) -> Option<Timestamp> {
        self.timers.next_deadline()
    }

    fn is_complete(&self) -> bool {
        matches!(self.phase, DigitSpanPhase::Complete { .. })
    }

    fn get_results(&self) -> Vec<TestResult> {
        let mut results = vec![
            TestResult::info("Level", format!("{}", self.level)),
            TestResult::info("Score", format!("{}", self.score)),
            TestResult::info(
                "Digits",
                format!("{}", Self::digit_count(self.level)),
            ),
        ];

        match self.phase {
            DigitSpanPhase::Ready => {
                results.push(TestResult::info("Status", "Press Enter to start"));
            }
            DigitSpanPhase::Showing { seconds_left } => {
                results.push(TestResult::warning(
                    "Remember",
                    format!("{}  ({}s)", Self::format_for_display(&self.digits), seconds_left),
                ));
            }
            DigitSpanPhase::Recalling => {
                results.push(TestResult::info(
                    "Your answer",
                    format!("{}_", self.input),
                ));
            }
            DigitSpanPhase::Complete { is_correct } => {
                if is_correct {
                    results.push(TestResult::ok("Result", "Correct!"));
                } else {
                    results.push(TestResult::error("Result", "Wrong"));
                }
                if let Some(last) = self.history.last() {
                    results.push(TestResult::info(
                        "Number",
                        Self::format_for_display(&last.number),
                    ));
                    results.push(TestResult::info(
                        "You typed",
                        Self::format_for_display(&last.input),
                    ));
                }
            }
        }

        if !self.history.is_empty() {
            results.push(TestResult::info(
                "Attempts",
                format!("{}", self.history.len()),
            ));
            results.push(TestResult::info(
                "Accuracy",
                format!("{}%", self.session_accuracy()),
            ));
            results.push(TestResult::ok(
                "Highest Level",
                format!("{}", self.highest_level()),
            ));
        }

        results
    }

    fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn reset(&mut self) {
        self.timers.cancel_all();
        self.display_timer = None;
        self.phase = DigitSpanPhase::Ready;
        self.digits.clear();
        self.input.clear();
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SeededRandom};
    use crate::tests::test_helpers::Harness;

    /// Draws producing "4821" at level 1
    fn scripted_4821() -> BoxedRandom {
        // first digit: 1 + index(9) == 4 -> index 3; others index(10)
        ScriptedRandom::boxed(vec![3.5 / 9.0, 8.5 / 10.0, 2.5 / 10.0, 1.5 / 10.0])
    }

    #[test]
    fn display_duration_table() {
        assert_eq!(DigitSpanTest::display_secs(4), 2);
        assert_eq!(DigitSpanTest::display_secs(5), 3);
        assert_eq!(DigitSpanTest::display_secs(6), 3);
        assert_eq!(DigitSpanTest::display_secs(15), 8);
        assert_eq!(DigitSpanTest::display_secs(1), 2);
    }

    #[test]
    fn digit_count_is_capped() {
        assert_eq!(DigitSpanTest::digit_count(1), 4);
        assert_eq!(DigitSpanTest::digit_count(12), 15);
        assert_eq!(DigitSpanTest::digit_count(40), 15);
    }

    #[test]
    fn shows_then_recalls() {
        let harness = Harness::new();
        let mut test = DigitSpanTest::new(harness.context(), scripted_4821());

        test.handle(DigitSpanEvent::Start);
        assert_eq!(test.digits(), "4821");
        assert_eq!(test.phase(), DigitSpanPhase::Showing { seconds_left: 2 });

        harness.advance(&mut test, 1000);
        assert_eq!(test.phase(), DigitSpanPhase::Showing { seconds_left: 1 });
        harness.advance(&mut test, 1000);
        assert_eq!(test.phase(), DigitSpanPhase::Recalling);
        assert!(test.next_deadline().is_none());
    }

    #[test]
    fn correct_answer_advances_level() {
        let harness = Harness::new();
        let mut test = DigitSpanTest::new(harness.context(), scripted_4821());

        test.handle(DigitSpanEvent::Start);
        harness.advance(&mut test, 2000);
        test.type_text("4821");
        test.handle(DigitSpanEvent::Submit);

        assert_eq!(test.phase(), DigitSpanPhase::Complete { is_correct: true });
        assert_eq!(test.score(), 100);
        assert_eq!(test.level(), 2);

        let saved = harness.sink.attempts();
        assert_eq!(saved[0].score, 100);
        assert_eq!(saved[0].metadata_u64("level"), Some(1));
        assert_eq!(saved[0].metadata_bool("isCorrect"), Some(true));
        assert_eq!(saved[0].metadata_u64("totalAttempts"), Some(1));
    }

    #[test]
    fn wrong_answer_is_still_recorded() {
        let harness = Harness::new();
        let mut test = DigitSpanTest::new(harness.context(), scripted_4821());

        test.handle(DigitSpanEvent::Start);
        harness.advance(&mut test, 2000);
        test.type_text("4812");
        test.handle(DigitSpanEvent::Submit);

        assert_eq!(test.phase(), DigitSpanPhase::Complete { is_correct: false });
        assert_eq!(test.score(), 0);
        assert_eq!(test.level(), 1);
        assert_eq!(test.history().len(), 1);
        assert_eq!(test.session_accuracy(), 0);
        assert_eq!(harness.sink.len(), 1);
        assert_eq!(harness.sink.attempts()[0].metadata_bool("isCorrect"), Some(false));
    }

    #[test]
    fn non_digits_are_filtered() {
        let harness = Harness::new();
        let mut test = DigitSpanTest::new(harness.context(), scripted_4821());

        test.handle(DigitSpanEvent::Start);
        harness.advance(&mut test, 2000);
        test.handle(DigitSpanEvent::Input("4a8 2-1".to_string()));
        assert_eq!(test.input(), "4821");
        test.backspace();
        assert_eq!(test.input(), "482");
    }

    #[test]
    fn typing_while_showing_is_ignored() {
        let harness = Harness::new();
        let mut test = DigitSpanTest::new(harness.context(), scripted_4821());

        test.handle(DigitSpanEvent::Start);
        test.type_text("4821");
        test.handle(DigitSpanEvent::Submit);
        assert_eq!(test.input(), "");
        assert!(harness.sink.is_empty());
    }

    #[test]
    fn total_attempts_counts_every_submission() {
        let harness = Harness::new();
        let mut test = DigitSpanTest::new(harness.context(), Box::new(SeededRandom::new(3)));

        for _ in 0..3 {
            test.handle(DigitSpanEvent::Start);
            harness.advance(&mut test, 10_000);
            test.handle(DigitSpanEvent::Submit);
        }
        let saved = harness.sink.attempts();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[2].metadata_u64("totalAttempts"), Some(3));
    }

    #[test]
    fn reset_progress_clears_history() {
        let harness = Harness::new();
        let mut test = DigitSpanTest::new(harness.context(), scripted_4821());

        test.handle(DigitSpanEvent::Start);
        harness.advance(&mut test, 2000);
        test.type_text("4821");
        test.handle(DigitSpanEvent::Submit);
        assert_eq!(test.highest_level(), 1);

        test.reset_progress();
        assert_eq!(test.level(), 1);
        assert_eq!(test.score(), 0);
        assert!(test.history().is_empty());
        assert_eq!(test.session_accuracy(), 100);
    }

    #[test]
    fn reset_while_showing_cancels_timer() {
        let harness = Harness::new();
        let mut test = DigitSpanTest::new(harness.context(), scripted_4821());

        test.handle(DigitSpanEvent::Start);
        test.reset();
        harness.advance(&mut test, 5000);
        assert_eq!(test.phase(), DigitSpanPhase::Ready);
    }

    #[test]
    fn display_formatting() {
        assert_eq!(DigitSpanTest::format_for_display("4821"), "4 8 2 1");
        assert_eq!(DigitSpanTest::format_for_display(""), "");
    }
}
