//! Warmup stage run before the timed batch
//!
//! Excludes cold-start latency from throughput measurement. Failures here are
//! fatal: the run aborts before any inference is dispatched.

use crate::{
    client::InferenceApi,
    error::{AppError, Result},
    models::{ImageRecord, WarmupMode},
    output::ProgressReporter,
};
use std::time::{Duration, Instant};

/// Warm the server up according to the configured mode.
///
/// Returns the warmup duration, or `None` when direct-inference warmup
/// short-circuits on an empty image set. Any request failure is promoted to a
/// fatal warmup error carrying the full HTTP diagnostic detail.
pub async fn run_warmup(
    client: &dyn InferenceApi,
    reporter: &dyn ProgressReporter,
    mode: WarmupMode,
    images: &[ImageRecord],
) -> Result<Option<Duration>> {
    match mode {
        WarmupMode::Inference => {
            let Some(first) = images.first() else {
                return Ok(None);
            };
            reporter.warmup_started(mode);

            let start = Instant::now();
            client.infer(first).await.map_err(fatal)?;
            let elapsed = start.elapsed();

            reporter.warmup_completed(elapsed);
            Ok(Some(elapsed))
        }
        WarmupMode::Start => {
            reporter.warmup_started(mode);

            let elapsed = client.start_model().await.map_err(fatal)?;

            reporter.warmup_completed(elapsed);
            Ok(Some(elapsed))
        }
    }
}

fn fatal(error: AppError) -> AppError {
    AppError::warmup(error.diagnostic_detail())
}
