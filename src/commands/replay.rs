//! Replay command implementation.
//!
//! Feeds a recorded `intel_gpu_top -J` capture through the same pipeline as
//! the run command and prints the exposition the endpoint would serve after
//! the last sample.

use super::run::build_framer;
use crate::metrics::{MetricCatalog, PrometheusSink};
use crate::output::render_text;
use crate::pipeline::{Pipeline, PipelineStats};
use crate::utils::config::READ_CHUNK_SIZE;
use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Arguments for the replay command
#[derive(Debug, Clone)]
pub struct ReplayArgs {
    /// Capture file; `-` reads stdin
    pub input: PathBuf,

    /// Optional cap on a single frame
    pub max_frame_bytes: Option<usize>,
}

/// Execute the replay command
///
/// **Public** - called from main.rs
///
/// # Arguments
/// * `args` - Replay arguments
/// * `out` - Where the exposition text is written
///
/// # Errors
/// * Input cannot be opened or read
/// * Output cannot be written
pub fn execute_replay(args: &ReplayArgs, out: &mut impl Write) -> Result<PipelineStats> {
    let catalog = MetricCatalog::intel_gpu_top();
    let sink = PrometheusSink::for_catalog(&catalog).context("Failed to register metrics")?;
    let mut pipeline = Pipeline::new(build_framer(args.max_frame_bytes), &catalog, &sink);

    let result = if args.input.as_os_str() == "-" {
        info!("Replaying capture from stdin");
        pipeline.run(&mut io::stdin().lock(), READ_CHUNK_SIZE)
    } else {
        info!("Replaying capture: {}", args.input.display());
        let mut file = File::open(&args.input)
            .with_context(|| format!("Failed to open {}", args.input.display()))?;
        pipeline.run(&mut file, READ_CHUNK_SIZE)
    };
    let stats = result.context("Failed to read capture")?;

    let text = render_text(sink.registry())?;
    out.write_all(text.as_bytes())
        .context("Failed to write exposition")?;

    Ok(stats)
}
