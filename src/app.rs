//! Main application orchestration

use crate::{
    cli::Cli,
    client::{HttpInferenceClient, InferenceApi},
    config::{display_config_summary, load_config},
    dataset::DatasetManager,
    error::Result,
    images::load_images,
    output::{ConsoleReporter, ProgressReporter},
    runner::BenchmarkRunner,
    warmup::run_warmup,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Coordinates configuration, image loading, warmup and the timed run
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the benchmark end to end
    pub async fn run(self) -> Result<()> {
        println!("{} v{}", crate::PKG_NAME, crate::VERSION);

        let config = load_config(self.cli.clone())?;

        if config.debug {
            println!("\nConfiguration:");
            println!("{}\n", display_config_summary(&config));
        }

        if config.api_key == crate::defaults::API_KEY_PLACEHOLDER {
            println!(
                "Warning: no API key found (.roboflow_key, ROBOFLOW_KEY or --api-key); \
                 requests will be rejected by the server"
            );
        }

        let image_dir = self.resolve_image_dir(&config).await?;
        let records = load_images(&image_dir)?;
        println!("Loaded {} images from {}", records.len(), image_dir.display());

        let client: Arc<dyn InferenceApi> = Arc::new(HttpInferenceClient::new(&config)?);
        let reporter: Arc<dyn ProgressReporter> =
            Arc::new(ConsoleReporter::new(config.enable_color, config.verbose));

        // Warmup failures abort here, before any inference is dispatched
        run_warmup(client.as_ref(), reporter.as_ref(), config.warmup, &records).await?;

        let runner = BenchmarkRunner::new(
            Arc::clone(&client),
            Arc::clone(&reporter),
            config.parallelism,
        );
        // Per-item failures surface in the summary only
        let report = runner.run(&records).await;
        reporter.summary(&report);

        Ok(())
    }

    /// Pick the image directory for the configured profile, downloading the
    /// dataset export first when needed
    async fn resolve_image_dir(&self, config: &crate::models::Config) -> Result<PathBuf> {
        if !config.dataset {
            return Ok(PathBuf::from(&config.images_dir));
        }

        // Workspace presence is guaranteed by config validation
        let workspace = config.workspace.as_deref().unwrap_or_default();

        let manager = DatasetManager::new(config)?;
        let dataset_dir = manager.ensure_local(workspace, &config.model).await?;

        // Exports nest images under split directories; fall back to the root
        // when the requested split is not present
        let split_dir = dataset_dir.join(&config.split);
        if split_dir.is_dir() {
            Ok(split_dir)
        } else {
            Ok(dataset_dir)
        }
    }
}
