//! Intel GPU Exporter CLI
//!
//! Runs `intel_gpu_top -J` and serves its samples as Prometheus metrics.
//! Without a subcommand the exporter runs.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use igpu_exporter::commands::{
    display_catalog, display_version, execute_replay, execute_run, validate_args, ReplayArgs,
    RunArgs,
};
use igpu_exporter::utils::config::{
    DEFAULT_BIND, DEFAULT_GPU_TOP_BIN, DEFAULT_PORT, DEFAULT_REFRESH_PERIOD_MS, READ_CHUNK_SIZE,
};
use igpu_exporter::utils::logging::init_logging;

/// Intel GPU Exporter - Prometheus metrics from intel_gpu_top
#[derive(Parser, Debug)]
#[command(name = "igpu-exporter")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute (defaults to running the exporter)
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunOptions,

    /// Enable debug logging
    #[arg(
        short,
        long,
        visible_alias = "verbose",
        env = "DEBUG",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    debug: bool,
}

/// Options for running the exporter, accepted before or after `run`
#[derive(Args, Debug)]
struct RunOptions {
    /// Sample period passed to intel_gpu_top, in milliseconds
    #[arg(
        long,
        env = "REFRESH_PERIOD_MS",
        default_value_t = DEFAULT_REFRESH_PERIOD_MS,
        global = true
    )]
    refresh_period_ms: u64,

    /// Port of the metrics endpoint
    #[arg(short, long, env = "EXPORTER_PORT", default_value_t = DEFAULT_PORT, global = true)]
    port: u16,

    /// Bind address of the metrics endpoint
    #[arg(long, env = "EXPORTER_BIND", default_value = DEFAULT_BIND, global = true)]
    bind: String,

    /// intel_gpu_top binary
    #[arg(long, env = "INTEL_GPU_TOP", default_value = DEFAULT_GPU_TOP_BIN, global = true)]
    gpu_top_bin: String,

    /// Drop any single sample larger than this many bytes
    #[arg(long, env = "MAX_FRAME_BYTES", global = true)]
    max_frame_bytes: Option<usize>,

    /// Bytes per read from intel_gpu_top
    #[arg(long, default_value_t = READ_CHUNK_SIZE, global = true)]
    read_chunk_size: usize,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the exporter (the default)
    Run,

    /// Feed a recorded `intel_gpu_top -J` capture through the exporter
    /// and print the resulting metrics
    Replay {
        /// Capture file, or `-` for stdin
        file: PathBuf,
    },

    /// Display the metric catalog
    Catalog {
        /// Show the source field of each metric
        #[arg(long)]
        show: bool,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    init_logging(cli.debug);

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let options = cli.run;
            let args = RunArgs {
                gpu_top_bin: options.gpu_top_bin,
                refresh_period_ms: options.refresh_period_ms,
                bind: options.bind,
                port: options.port,
                max_frame_bytes: options.max_frame_bytes,
                read_chunk_size: options.read_chunk_size,
            };

            // Validate args first
            validate_args(&args)?;

            execute_run(args)?;
        }

        Commands::Replay { file } => {
            let args = ReplayArgs {
                input: file,
                max_frame_bytes: cli.run.max_frame_bytes,
            };

            let stats = execute_replay(&args, &mut std::io::stdout().lock())?;
            info!(
                "Replayed {} samples ({} undecodable)",
                stats.records, stats.decode_failures
            );
        }

        Commands::Catalog { show, json } => {
            display_catalog(show, json)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
