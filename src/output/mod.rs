//! Console reporting for benchmark progress and results

use crate::{
    error::AppError,
    models::{BenchmarkReport, WarmupMode},
};
use colored::Colorize;
use std::time::Duration;

/// Sink for run progress and the final report
///
/// The runner and warmup stage report through this trait so tests can run
/// silently and assert on captured events instead of stdout.
pub trait ProgressReporter: Send + Sync {
    fn warmup_started(&self, mode: WarmupMode);
    fn warmup_completed(&self, elapsed: Duration);
    fn item_completed(&self, name: &str, predictions: usize, latency: Duration);
    fn item_failed(&self, name: &str, error: &AppError);
    fn summary(&self, report: &BenchmarkReport);
}

/// Console reporter used by the CLI
pub struct ConsoleReporter {
    enable_color: bool,
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(enable_color: bool, verbose: bool) -> Self {
        Self {
            enable_color,
            verbose,
        }
    }

    fn paint_ok(&self, text: String) -> String {
        if self.enable_color {
            text.green().to_string()
        } else {
            text
        }
    }

    fn paint_err(&self, text: String) -> String {
        if self.enable_color {
            text.red().to_string()
        } else {
            text
        }
    }

    fn paint_heading(&self, text: String) -> String {
        if self.enable_color {
            text.bold().to_string()
        } else {
            text
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn warmup_started(&self, mode: WarmupMode) {
        match mode {
            WarmupMode::Inference => println!("Warming up (first inference)..."),
            WarmupMode::Start => println!("Warming up (explicit start)..."),
        }
    }

    fn warmup_completed(&self, elapsed: Duration) {
        println!("Warmup took {:.2} seconds", elapsed.as_secs_f64());
    }

    fn item_completed(&self, name: &str, predictions: usize, latency: Duration) {
        println!(
            "{}",
            self.paint_ok(format!(
                "Inference on {} found {} objects in {:.2} seconds",
                name,
                predictions,
                latency.as_secs_f64()
            ))
        );
    }

    fn item_failed(&self, name: &str, error: &AppError) {
        println!("{}", self.paint_err(format!("Inference failed on {}", name)));
        println!("{}", error.diagnostic_detail());
    }

    fn summary(&self, report: &BenchmarkReport) {
        println!();
        println!(
            "Inferred {} times in {:.2} seconds, {:.1} fps",
            report.total(),
            report.elapsed.as_secs_f64(),
            report.throughput()
        );

        if report.failed() > 0 {
            println!(
                "{}",
                self.paint_err(format!(
                    "{} of {} inferences failed",
                    report.failed(),
                    report.total()
                ))
            );
        }

        if self.verbose {
            if let Some(stats) = report.latency_stats() {
                println!();
                println!("{}", self.paint_heading("Latency (ms):".to_string()));
                println!(
                    "  min {:.1} / mean {:.1} / p50 {:.1} / p95 {:.1} / max {:.1}",
                    stats.min_ms, stats.mean_ms, stats.p50_ms, stats.p95_ms, stats.max_ms
                );
                println!(
                    "  run started at {}",
                    report.started_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
    }
}

/// Reporter that discards everything; used by tests
#[derive(Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn warmup_started(&self, _mode: WarmupMode) {}
    fn warmup_completed(&self, _elapsed: Duration) {}
    fn item_completed(&self, _name: &str, _predictions: usize, _latency: Duration) {}
    fn item_failed(&self, _name: &str, _error: &AppError) {}
    fn summary(&self, _report: &BenchmarkReport) {}
}
