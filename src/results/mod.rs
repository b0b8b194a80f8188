//! Test attempts and the persistence boundary they are handed to

mod sink;

pub use sink::{
    AuthenticatedSink, FanoutSink, JsonLinesSink, MemorySink, RecordOutcome, ResultSink,
    SinkError, UserCapability,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured per-attempt metadata
pub type Metadata = serde_json::Map<String, Value>;

/// Kind of benchmark that produced an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Reaction,
    SequenceRecall,
    DigitSpan,
    Typing,
    Aim,
}

impl TestType {
    pub fn all() -> &'static [TestType] {
        &[
            Self::Reaction,
            Self::SequenceRecall,
            Self::DigitSpan,
            Self::Typing,
            Self::Aim,
        ]
    }

    /// Stable wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reaction => "reaction",
            Self::SequenceRecall => "sequence_recall",
            Self::DigitSpan => "digit_span",
            Self::Typing => "typing",
            Self::Aim => "aim",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Reaction => "Reaction Time",
            Self::SequenceRecall => "Sequence Memory",
            Self::DigitSpan => "Number Memory",
            Self::Typing => "Typing Speed",
            Self::Aim => "Aim Trainer",
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed run of a test. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestAttempt {
    pub test_type: TestType,
    pub score: u64,
    pub metadata: Metadata,
    pub occurred_at: DateTime<Utc>,
}

impl TestAttempt {
    pub fn new(test_type: TestType, score: u64, metadata: Metadata) -> Self {
        Self {
            test_type,
            score,
            metadata,
            occurred_at: Utc::now(),
        }
    }

    /// Read an unsigned metadata field
    pub fn metadata_u64(&self, key: &str) -> Option<u64> {
        self.metadata.get(key).and_then(Value::as_u64)
    }

    /// Read a boolean metadata field
    pub fn metadata_bool(&self, key: &str) -> Option<bool> {
        self.metadata.get(key).and_then(Value::as_bool)
    }
}

/// Build a [`Metadata`] map from a `serde_json::json!` object literal
///
/// Non-object values produce an empty map.
pub fn metadata(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        _ => Metadata::new(),
    }
}
