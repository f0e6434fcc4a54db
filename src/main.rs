use std::path::PathBuf;
use std::process::ExitCode;

use benparse::config::Config;
use benparse::engine::{use_command, Command};
use clap::Parser;
use log::error;

/// Decode, inspect and check bencoded data such as .torrent files.
#[derive(Debug, Parser)]
#[command(name = "benparse", version)]
struct Cli {
    /// Accept dictionaries whose keys are not in sorted order
    #[arg(long, global = true)]
    relaxed: bool,

    /// Config file (defaults to ./benparse.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if cli.relaxed {
        config.relaxed_key_order = true;
    }

    match use_command(&cli.command, &config.decode_options()).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
