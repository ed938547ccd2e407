//! Latency statistics over a completed benchmark run

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Summary statistics over per-item latencies, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub count: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
}

impl LatencyStats {
    /// Compute statistics from an iterator of latencies; None if empty
    pub fn from_durations<I: IntoIterator<Item = Duration>>(latencies: I) -> Option<Self> {
        let mut values: Vec<f64> = latencies
            .into_iter()
            .map(|d| d.as_secs_f64() * 1000.0)
            .collect();
        if values.is_empty() {
            return None;
        }

        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = values.len();
        let sum: f64 = values.iter().sum();

        Some(Self {
            count,
            min_ms: values[0],
            max_ms: values[count - 1],
            mean_ms: sum / count as f64,
            p50_ms: percentile(&values, 50.0),
            p95_ms: percentile(&values, 95.0),
        })
    }
}

/// Nearest-rank percentile over a sorted slice
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}
