//! Result sinks: where completed attempts are handed off
//!
//! Tests call [`ResultSink::record`] at most once per completed attempt and
//! never roll back on failure. Whether anything is persisted is decided by
//! the sink the host constructs, e.g. an [`AuthenticatedSink`] without a
//! user capability skips persistence entirely.

use super::{Metadata, TestAttempt, TestType};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Failure reported by a sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// What a sink did with an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// No authenticated user; the attempt stays local
    SkippedUnauthenticated,
}

/// Persistence boundary for completed attempts
pub trait ResultSink: Send + Sync {
    fn record(
        &self,
        test_type: TestType,
        score: u64,
        metadata: Metadata,
    ) -> Result<RecordOutcome, SinkError>;
}

impl<T: ResultSink + ?Sized> ResultSink for Arc<T> {
    fn record(
        &self,
        test_type: TestType,
        score: u64,
        metadata: Metadata,
    ) -> Result<RecordOutcome, SinkError> {
        (**self).record(test_type, score, metadata)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Keeps every recorded attempt in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    attempts: Mutex<Vec<TestAttempt>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all attempts in recording order
    pub fn attempts(&self) -> Vec<TestAttempt> {
        lock(&self.attempts).clone()
    }

    /// Attempts of a single test type
    pub fn attempts_for(&self, test_type: TestType) -> Vec<TestAttempt> {
        lock(&self.attempts)
            .iter()
            .filter(|a| a.test_type == test_type)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.attempts).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.attempts).clear();
    }
}

impl ResultSink for MemorySink {
    fn record(
        &self,
        test_type: TestType,
        score: u64,
        metadata: Metadata,
    ) -> Result<RecordOutcome, SinkError> {
        lock(&self.attempts).push(TestAttempt::new(test_type, score, metadata));
        Ok(RecordOutcome::Recorded)
    }
}

/// Appends one JSON object per attempt to a file
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every attempt in the file
    pub fn read_all(&self) -> Result<Vec<TestAttempt>, SinkError> {
        let contents = std::fs::read_to_string(&self.path)?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(SinkError::from))
            .collect()
    }
}

impl ResultSink for JsonLinesSink {
    fn record(
        &self,
        test_type: TestType,
        score: u64,
        metadata: Metadata,
    ) -> Result<RecordOutcome, SinkError> {
        let attempt = TestAttempt::new(test_type, score, metadata);
        let mut line = serde_json::to_string(&attempt)?;
        line.push('\n');

        let _guard = lock(&self.write_lock);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(RecordOutcome::Recorded)
    }
}

/// Proof that a user is signed in, handed to the sink at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCapability {
    pub user: String,
}

impl UserCapability {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }
}

/// Forwards to `inner` only when constructed with a user capability
pub struct AuthenticatedSink<S> {
    inner: S,
    capability: Option<UserCapability>,
}

impl<S: ResultSink> AuthenticatedSink<S> {
    pub fn new(inner: S, capability: Option<UserCapability>) -> Self {
        Self { inner, capability }
    }

    pub fn user(&self) -> Option<&str> {
        self.capability.as_ref().map(|c| c.user.as_str())
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ResultSink> ResultSink for AuthenticatedSink<S> {
    fn record(
        &self,
        test_type: TestType,
        score: u64,
        metadata: Metadata,
    ) -> Result<RecordOutcome, SinkError> {
        match &self.capability {
            Some(_) => self.inner.record(test_type, score, metadata),
            None => {
                log::debug!("no user signed in, {} result kept local", test_type);
                Ok(RecordOutcome::SkippedUnauthenticated)
            }
        }
    }
}

/// Records into several sinks
///
/// Every sink is attempted; the first error is returned afterwards.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn ResultSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl ResultSink for FanoutSink {
    fn record(
        &self,
        test_type: TestType,
        score: u64,
        metadata: Metadata,
    ) -> Result<RecordOutcome, SinkError> {
        let mut outcome = RecordOutcome::SkippedUnauthenticated;
        let mut first_error = None;

        for sink in &self.sinks {
            match sink.record(test_type, score, metadata.clone()) {
                Ok(RecordOutcome::Recorded) => outcome = RecordOutcome::Recorded,
                Ok(RecordOutcome::SkippedUnauthenticated) => {}
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(outcome),
        }
    }
}
