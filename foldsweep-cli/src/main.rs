//! foldsweep CLI: runs leave-one-fold-out multi-label sweeps.

mod commands;

use anyhow::Context;
use clap::Parser;
use foldsweep_core::ConfigOverrides;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// foldsweep: train on one fold, evaluate on the other nine
#[derive(Parser, Debug)]
#[command(name = "foldsweep", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (searched for foldsweep.toml)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run the sweep
    Run {
        /// Options to switch on, e.g. `ehd,mlknn`
        #[arg(short, long, value_delimiter = ',')]
        enable: Vec<String>,

        /// Prefix for every report file name
        #[arg(long)]
        run_id: Option<String>,

        /// Directory holding the partitions
        #[arg(long)]
        datasets: Option<PathBuf>,

        /// Directory receiving the reports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the JSON run log
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
    /// List the training tuples a run would execute
    Plan {
        /// Options to switch on, e.g. `ehd,mlknn`
        #[arg(short, long, value_delimiter = ',')]
        enable: Vec<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default foldsweep.toml into the workspace
    Init,
    /// Print the resolved configuration
    Show,
}

impl Commands {
    fn overrides(&self) -> ConfigOverrides {
        match self {
            Commands::Run {
                enable,
                run_id,
                datasets,
                output,
                log_dir,
            } => ConfigOverrides {
                run_id: run_id.clone(),
                dataset_dir: datasets.clone(),
                output_dir: output.clone(),
                log_dir: log_dir.clone(),
                enable: enable.clone(),
            },
            Commands::Plan { enable } => ConfigOverrides {
                enable: enable.clone(),
                ..Default::default()
            },
            Commands::Config { .. } => ConfigOverrides::default(),
        }
    }
}

/// Human-readable stderr output, plus a JSON log file when `log_file` is given.
fn init_tracing(
    verbose: u8,
    quiet: bool,
    log_file: Option<(PathBuf, String)>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let (json_layer, guard) = match log_file {
        Some((dir, name)) => {
            let appender = log_appender(&dir, &name)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();
    Ok(guard)
}

/// Single, never-rotated log file `<dir>/<name>`.
fn log_appender(dir: &Path, name: &str) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create log directory {}", dir.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .with_context(|| format!("Cannot open log file {name} in {}", dir.display()))
}

fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "foldsweep", "foldsweep")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let overrides = cli.command.overrides();
    let mut config =
        foldsweep_core::load_config(Some(&workspace), cli.config.as_deref(), Some(&overrides))
            .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let log_file = if matches!(cli.command, Commands::Run { .. }) {
        // Pin the run id so the log file and every report share it.
        let run_id = config.resolved_run_id();
        config.run_id = Some(run_id.clone());
        let dir = config.log_dir.clone().unwrap_or_else(default_log_dir);
        Some((dir, format!("{run_id}sweep.log")))
    } else {
        None
    };
    let _guard = init_tracing(cli.verbose, cli.quiet, log_file)?;

    commands::handle_command(cli.command, config, &workspace)
}
