//! Command-line interface definition and validation

use crate::models::WarmupMode;
use clap::Parser;

/// Inference Benchmarker - throughput measurement for image-inference HTTP APIs
#[derive(Parser, Debug, Clone)]
#[command(name = "ibench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Inference server base URL (e.g. "http://192.168.4.128:9001")
    #[arg(short, long)]
    pub server: Option<String>,

    /// Model identifier, e.g. "egohands-public/5"
    #[arg(short, long)]
    pub model: Option<String>,

    /// Workspace the model belongs to (required with --dataset)
    #[arg(short, long)]
    pub workspace: Option<String>,

    /// Dataset split to benchmark (train, valid, test)
    #[arg(long)]
    pub split: Option<String>,

    /// Maximum concurrent inference requests; 1 runs sequentially [default: 32]
    #[arg(short, long)]
    pub parallelism: Option<usize>,

    /// API key; overrides the .roboflow_key file and environment lookup
    #[arg(long)]
    pub api_key: Option<String>,

    /// Warmup mode: one real inference, or the explicit start endpoint
    #[arg(long, value_enum, default_value = "inference")]
    pub warmup: WarmupMode,

    /// Management API endpoint for dataset export links
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Local image directory for the local profile
    #[arg(long = "images")]
    pub images_dir: Option<String>,

    /// Benchmark a downloaded dataset export instead of a local directory
    #[arg(long)]
    pub dataset: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Write a .env.example template to the current directory and exit
    #[arg(long)]
    pub init_env: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.parallelism == Some(0) {
            return Err("--parallelism must be at least 1".to_string());
        }

        if self.dataset && self.workspace.is_none() && std::env::var("INFERENCE_WORKSPACE").is_err()
        {
            return Err(
                "--dataset requires --workspace (or the INFERENCE_WORKSPACE variable)".to_string(),
            );
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Conservative terminal color detection
fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match std::env::var("TERM") {
        Ok(term) => term != "dumb",
        Err(_) => false,
    }
}
