//! Benchmark run records and result metrics

use crate::stats::LatencyStats;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One image queued for inference
///
/// Built once at startup from the image source and immutable afterwards; the
/// payload is the base64-encoded file content, ready to be used as a request
/// body.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// File name, used as the item identifier in logs
    pub name: String,
    /// Base64-encoded image bytes
    pub payload: String,
}

impl ImageRecord {
    pub fn new<S: Into<String>>(name: S, payload: String) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Terminal state of one settled inference call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemStatus {
    /// The server returned a parseable success response
    Succeeded {
        /// Number of predictions in the response
        predictions: usize,
        /// Response body size in bytes
        body_size: usize,
    },
    /// The call failed; detail has already been logged by the runner
    Failed {
        /// Error category (see `AppError::category`)
        category: String,
        message: String,
    },
}

/// One settled item: identifier, outcome and per-call latency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub name: String,
    pub status: ItemStatus,
    pub latency: Duration,
}

impl ItemOutcome {
    pub fn succeeded<S: Into<String>>(
        name: S,
        predictions: usize,
        body_size: usize,
        latency: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            status: ItemStatus::Succeeded {
                predictions,
                body_size,
            },
            latency,
        }
    }

    pub fn failed<S: Into<String>, C: Into<String>, M: Into<String>>(
        name: S,
        category: C,
        message: M,
        latency: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            status: ItemStatus::Failed {
                category: category.into(),
                message: message.into(),
            },
            latency,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ItemStatus::Succeeded { .. })
    }
}

/// Aggregate result of one timed benchmark run
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// Wall-clock time the timed phase began
    pub started_at: DateTime<Local>,
    /// Elapsed time from first dispatch to last settlement
    pub elapsed: Duration,
    /// All settled items, in completion order
    pub outcomes: Vec<ItemOutcome>,
}

impl BenchmarkReport {
    pub fn new(started_at: DateTime<Local>, elapsed: Duration, outcomes: Vec<ItemOutcome>) -> Self {
        Self {
            started_at,
            elapsed,
            outcomes,
        }
    }

    /// Total number of settled items
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Requests per second over the whole batch; 0.0 for an empty or
    /// instantaneous run rather than a division by zero
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if self.outcomes.is_empty() || secs <= f64::EPSILON {
            return 0.0;
        }
        self.outcomes.len() as f64 / secs
    }

    /// Latency distribution over all settled items; None for an empty run
    pub fn latency_stats(&self) -> Option<LatencyStats> {
        LatencyStats::from_durations(self.outcomes.iter().map(|o| o.latency))
    }
}
