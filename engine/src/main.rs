// Colloquy Session Engine
// Main entry point for the colloquy binary

use clap::Parser;
use colloquy_engine::cli::{Cli, Command};
use colloquy_engine::config::Config;
use colloquy_engine::handlers::{handle_run, handle_tools};
use colloquy_engine::telemetry::init_telemetry_with_level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // CLI flag wins over config-driven log level; RUST_LOG wins over both
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(log_level);

    match cli.command {
        Command::Run {
            prompt,
            model,
            vars,
            prompt_file,
            max_loops,
        } => handle_run(&config, model, prompt, vars, prompt_file, max_loops).await,

        Command::Tools => handle_tools(),
    }
}
