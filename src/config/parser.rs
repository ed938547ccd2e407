//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::{credentials::resolve_api_key, env::EnvManager},
    error::Result,
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Start with default configuration
        let mut config = Config::default();

        // Load from environment file if it exists
        EnvManager::load_env_file(self.cli.debug)?;

        // Merge environment variables into config
        config.merge_from_env()?;

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config);

        // Resolve the API key last so --api-key can short-circuit the lookup
        let api_key = resolve_api_key(self.cli.api_key.as_deref());
        if config.debug {
            println!("API key resolved from {}", api_key.describe_source());
        }
        config.api_key = api_key.value;

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref server) = self.cli.server {
            config.server = server.clone();
        }

        if let Some(ref model) = self.cli.model {
            config.model = model.clone();
        }

        if let Some(ref workspace) = self.cli.workspace {
            config.workspace = Some(workspace.clone());
        }

        if let Some(ref split) = self.cli.split {
            config.split = split.clone();
        }

        if let Some(parallelism) = self.cli.parallelism {
            config.parallelism = parallelism;
        }

        if let Some(ref api_endpoint) = self.cli.api_endpoint {
            config.api_endpoint = api_endpoint.clone();
        }

        if let Some(ref images_dir) = self.cli.images_dir {
            config.images_dir = images_dir.clone();
        }

        config.warmup = self.cli.warmup;
        config.dataset = self.cli.dataset || config.dataset;
        config.enable_color = self.cli.use_colors();
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Server: {}", config.server));
    summary.push(format!("Model: {}", config.model));
    if let Some(ref workspace) = config.workspace {
        summary.push(format!("Workspace: {}", workspace));
    }
    summary.push(format!(
        "Profile: {}",
        if config.dataset {
            format!("dataset (split: {})", config.split)
        } else {
            format!("local (images: {})", config.images_dir)
        }
    ));
    summary.push(format!("Parallelism: {}", config.parallelism));
    summary.push(format!("Warmup: {:?}", config.warmup));
    summary.push(format!("API Endpoint: {}", config.api_endpoint));
    summary.push(format!("Color Output: {}", config.enable_color));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::sync::Mutex;

    // Serializes tests that touch process-wide environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_without_model_fail_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();

        let cli = Cli::parse_from(["ibench"]);
        let parser = ConfigParser::new(cli);
        assert!(parser.parse().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();

        let cli = Cli::parse_from([
            "ibench",
            "--model",
            "egohands-public/5",
            "--server",
            "http://192.168.4.128:9001",
            "--parallelism",
            "4",
            "--warmup",
            "start",
            "--no-color",
            "--verbose",
        ]);
        let config = ConfigParser::new(cli).parse().unwrap();

        assert_eq!(config.model, "egohands-public/5");
        assert_eq!(config.server, "http://192.168.4.128:9001");
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.warmup, crate::models::WarmupMode::Start);
        assert!(!config.enable_color);
        assert!(config.verbose);
    }

    #[test]
    fn test_explicit_parallelism_beats_env_var() {
        let _guard = ENV_MUTEX.lock().unwrap();

        std::env::set_var("PARALLELISM", "4");
        let cli = Cli::parse_from([
            "ibench",
            "--model",
            "egohands-public/5",
            "--parallelism",
            "32",
        ]);
        let config = ConfigParser::new(cli).parse();
        std::env::remove_var("PARALLELISM");

        // An explicit flag wins even when it equals the built-in default
        assert_eq!(config.unwrap().parallelism, 32);
    }

    #[test]
    fn test_absent_parallelism_flag_keeps_env_value() {
        let _guard = ENV_MUTEX.lock().unwrap();

        std::env::set_var("PARALLELISM", "4");
        let cli = Cli::parse_from(["ibench", "--model", "egohands-public/5"]);
        let config = ConfigParser::new(cli).parse();
        std::env::remove_var("PARALLELISM");

        assert_eq!(config.unwrap().parallelism, 4);
    }

    #[test]
    fn test_out_of_range_env_parallelism_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();

        std::env::set_var("PARALLELISM", "4096");
        let cli = Cli::parse_from(["ibench", "--model", "egohands-public/5"]);
        let result = ConfigParser::new(cli).parse();
        std::env::remove_var("PARALLELISM");

        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_env_server_url_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();

        std::env::set_var("INFERENCE_SERVER", "not-a-url");
        let cli = Cli::parse_from(["ibench", "--model", "egohands-public/5"]);
        let result = ConfigParser::new(cli).parse();
        std::env::remove_var("INFERENCE_SERVER");

        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_api_key_ends_up_in_config() {
        let _guard = ENV_MUTEX.lock().unwrap();

        let cli = Cli::parse_from([
            "ibench",
            "--model",
            "egohands-public/5",
            "--api-key",
            "secret",
        ]);
        let config = ConfigParser::new(cli).parse().unwrap();
        assert_eq!(config.api_key, "secret");
    }

    #[test]
    fn test_dataset_profile_from_cli() {
        let _guard = ENV_MUTEX.lock().unwrap();

        let cli = Cli::parse_from([
            "ibench",
            "--model",
            "egohands-public/5",
            "--dataset",
            "--workspace",
            "my-team",
            "--split",
            "valid",
        ]);
        let config = ConfigParser::new(cli).parse().unwrap();

        assert!(config.dataset);
        assert_eq!(config.workspace.as_deref(), Some("my-team"));
        assert_eq!(config.split, "valid");
    }

    #[test]
    fn test_config_summary_mentions_profile() {
        let mut config = Config {
            model: "egohands-public/5".to_string(),
            ..Config::default()
        };
        let summary = display_config_summary(&config);
        assert!(summary.contains("local"));

        config.dataset = true;
        let summary = display_config_summary(&config);
        assert!(summary.contains("dataset"));
    }
}
