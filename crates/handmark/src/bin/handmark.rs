use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use handmark::{replay, HandmarkConfig};

#[cfg(not(feature = "tracing"))]
use std::str::FromStr;

#[cfg(not(feature = "tracing"))]
use log::LevelFilter;

#[cfg(feature = "tracing")]
use handmark::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use handmark::core::init_with_level;

#[derive(Parser, Debug)]
#[command(name = "handmark", version, about = "Replay captured frames through the hand gesture pipeline")]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit JSON log lines (tracing builds only)
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process every frame of the configured input directory
    Run {
        /// Path to a JSON config
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Write a default config to edit
    InitConfig {
        path: PathBuf,
        /// Directory of captured frames to reference in the config
        #[arg(long)]
        input_dir: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    #[cfg(not(feature = "tracing"))]
    {
        let level = LevelFilter::from_str(&cli.log_level).unwrap_or(LevelFilter::Info);
        init_with_level(level)?;
        if cli.json_logs {
            log::warn!("--json-logs needs the `tracing` feature; using plain logs");
        }
    }

    #[cfg(feature = "tracing")]
    {
        init_tracing(cli.json_logs);
        tracing::debug!(requested = %cli.log_level, "tracing builds filter with RUST_LOG");
    }

    match cli.command {
        Command::Run { config } => run(&config),
        Command::InitConfig { path, input_dir } => init_config(&path, input_dir),
    }
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info"))]
fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = HandmarkConfig::load_json(config_path)?;
    let report = replay(&cfg)?;

    let output_path = cfg.output_path();
    report.write_json(&output_path)?;
    println!(
        "processed {} frames, {} advance events",
        report.frames_processed, report.advances
    );
    println!("wrote report JSON to {}", output_path.display());
    Ok(())
}

fn init_config(path: &Path, input_dir: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = HandmarkConfig::default();
    if let Some(dir) = input_dir {
        cfg.input_dir = dir;
    }
    cfg.write_json(path)?;
    println!("wrote config to {}", path.display());
    Ok(())
}
