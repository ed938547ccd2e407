//! Inference Benchmarker - CLI entry point

use clap::Parser;
use inference_benchmarker::{app::App, cli::Cli, config::EnvManager};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    let use_colors = cli.use_colors();

    if cli.init_env {
        let path = Path::new(".env.example");
        if let Err(e) = EnvManager::save_example_env_file(path) {
            eprintln!("{}", e.format_for_console(use_colors));
            process::exit(e.exit_code());
        }
        println!("Wrote {}", path.display());
        return;
    }

    if let Err(e) = App::new(cli).run().await {
        eprintln!("{}", e.format_for_console(use_colors));
        process::exit(e.exit_code());
    }
}
