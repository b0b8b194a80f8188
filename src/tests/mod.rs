//! Benchmark state machines
//!
//! Each test is an explicit phase enum plus a transition function fed by
//! user input and by its own scheduler's timers. Leaving a timed phase
//! cancels the timer that drove it, and `reset` cancels everything.

mod digit_span;

pub use aim::{AimAttempt, AimEvent, AimPhase, AimTest, PlayField, Target};
pub use digit_span::{DigitSpanAttempt, DigitSpanEvent, DigitSpanPhase, DigitSpanTest};
pub use reaction::{ReactionEvent, ReactionPhase, ReactionTest};
pub use sequence::{SequenceAttempt, SequenceEvent, SequencePhase, SequenceRecallTest};
pub use typing::{TypingAttempt, TypingEvent, TypingPhase, TypingTest, SAMPLE_TEXTS};

use crate::results::{Metadata, RecordOutcome, ResultSink, TestType};
use crate::timing::{SharedClock, Timestamp};
use std::sync::Arc;

/// Common trait for all benchmark tests
pub trait PerformanceTest {
    /// Name of the test
    fn name(&self) -> &'static str;

    /// Short description
    fn description(&self) -> &'static str;

    /// Which attempt type this test produces
    fn test_type(&self) -> TestType;

    /// Name of the current phase
    fn phase_name(&self) -> &'static str;

    /// Run every timer that is due now through the transition function
    fn poll_timers(&mut self);

    /// Earliest pending timer deadline, if any
    fn next_deadline(&self) -> Option<Timestamp>;

    /// Check if the current attempt reached its terminal phase
    fn is_complete(&self) -> bool;

    /// Get test results as formatted rows
    fn get_results(&self) -> Vec<TestResult>;

    /// Take the pending user-facing notice (e.g. a save failure)
    fn take_notice(&mut self) -> Option<String>;

    /// Cancel all timers and return to the ready phase
    fn reset(&mut self);
}

/// Collaborators shared by every test instance
#[derive(Clone)]
pub struct TestContext {
    pub clock: SharedClock,
    pub sink: Arc<dyn ResultSink>,
}

impl TestContext {
    pub fn new(clock: SharedClock, sink: Arc<dyn ResultSink>) -> Self {
        Self { clock, sink }
    }

    /// Hand a completed attempt to the sink
    ///
    /// Failures never affect the attempt; they come back as a notice for
    /// the user.
    pub fn submit(&self, test_type: TestType, score: u64, metadata: Metadata) -> Option<String> {
        match self.sink.record(test_type, score, metadata) {
            Ok(RecordOutcome::Recorded) => {
                log::info!("{} result saved (score {})", test_type, score);
                None
            }
            Ok(RecordOutcome::SkippedUnauthenticated) => {
                log::info!("{} result kept local (score {})", test_type, score);
                None
            }
            Err(e) => {
                log::warn!("failed to save {} result: {}", test_type, e);
                Some(format!("Test finished, but the result could not be saved: {}", e))
            }
        }
    }
}

/// Coarse performance band shown next to a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Excellent,
    Good,
    Average,
    NeedsPractice,
}

impl Rating {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::NeedsPractice => "Needs practice",
        }
    }

    pub fn status(&self) -> ResultStatus {
        match self {
            Self::Excellent | Self::Good => ResultStatus::Ok,
            Self::Average => ResultStatus::Warning,
            Self::NeedsPractice => ResultStatus::Error,
        }
    }
}

/// A single test result entry
#[derive(Debug, Clone)]
pub struct TestResult {
    pub label: String,
    pub value: String,
    pub status: ResultStatus,
}

impl TestResult {
    pub fn new(label: impl Into<String>, value: impl Into<String>, status: ResultStatus) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            status,
        }
    }

    pub fn ok(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Ok)
    }

    pub fn warning(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Warning)
    }

    pub fn error(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Error)
    }

    pub fn info(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, ResultStatus::Info)
    }

    /// Row showing a rating with its matching status
    pub fn rated(label: impl Into<String>, rating: Rating) -> Self {
        Self::new(label, rating.label(), rating.status())
    }
}

/// Status of a test result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Ok,
    Warning,
    Error,
    Info,
}
