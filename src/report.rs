//! Session report and export functionality

use crate::results::{TestAttempt, TestType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Complete session report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: SessionSummary,
    /// Every attempt recorded this session, oldest first
    pub attempts: Vec<TestAttempt>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// Session duration in seconds
    pub duration_secs: f64,
}

/// Session summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_attempts: usize,
    /// Attempts per test type
    pub counts: BTreeMap<TestType, usize>,
    /// Best score per test type
    ///
    /// Lowest latency for reaction tests, highest score for everything else.
    pub best_scores: BTreeMap<TestType, u64>,
}

impl SessionSummary {
    pub fn from_attempts(attempts: &[TestAttempt]) -> Self {
        let mut counts = BTreeMap::new();
        let mut best_scores: BTreeMap<TestType, u64> = BTreeMap::new();

        for attempt in attempts {
            *counts.entry(attempt.test_type).or_insert(0) += 1;
            best_scores
                .entry(attempt.test_type)
                .and_modify(|best| {
                    *best = if attempt.test_type == TestType::Reaction {
                        (*best).min(attempt.score)
                    } else {
                        (*best).max(attempt.score)
                    }
                })
                .or_insert(attempt.score);
        }

        Self {
            total_attempts: attempts.len(),
            counts,
            best_scores,
        }
    }
}

impl SessionReport {
    /// Create a new session report
    pub fn new(start_time: Instant, attempts: Vec<TestAttempt>) -> Self {
        let duration_secs = start_time.elapsed().as_secs_f64();
        let now: DateTime<Utc> = Utc::now();

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                duration_secs,
            },
            summary: SessionSummary::from_attempts(&attempts),
            attempts,
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
