//! Run command implementation.
//!
//! The run command:
//! 1. Builds the metric catalog and registers its gauges
//! 2. Discovers the GPU device id
//! 3. Starts the metrics HTTP endpoint
//! 4. Spawns `intel_gpu_top -J` and feeds its output through the pipeline
//! 5. Reports how the monitor exited once its output ends

use crate::gpu_top::{discover_device_id, GpuTopCommand};
use crate::metrics::{MetricCatalog, MetricSink, PrometheusSink};
use crate::output::MetricsServer;
use crate::pipeline::{Pipeline, PipelineStats};
use crate::stream::StreamFramer;
use crate::utils::config::{
    DEFAULT_BIND, DEFAULT_GPU_TOP_BIN, DEFAULT_PORT, DEFAULT_REFRESH_PERIOD_MS,
    DEVICE_ID_HELP, DEVICE_ID_METRIC, READ_CHUNK_SIZE,
};
use anyhow::{bail, Context, Result};
use log::{debug, error, info, warn};

/// Arguments for the run command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// `intel_gpu_top` binary
    pub gpu_top_bin: String,

    /// Sample period passed to `intel_gpu_top -s`
    pub refresh_period_ms: u64,

    /// Bind address of the metrics endpoint
    pub bind: String,

    /// Port of the metrics endpoint
    pub port: u16,

    /// Optional cap on a single frame
    pub max_frame_bytes: Option<usize>,

    /// Bytes per read from the monitor
    pub read_chunk_size: usize,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            gpu_top_bin: DEFAULT_GPU_TOP_BIN.to_string(),
            refresh_period_ms: DEFAULT_REFRESH_PERIOD_MS,
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            max_frame_bytes: None,
            read_chunk_size: READ_CHUNK_SIZE,
        }
    }
}

impl RunArgs {
    /// `bind:port` for the metrics endpoint
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Build the framer for the configured size cap
pub fn build_framer(max_frame_bytes: Option<usize>) -> StreamFramer {
    max_frame_bytes.map_or_else(StreamFramer::new, StreamFramer::with_max_frame_bytes)
}

/// Validate run arguments
///
/// **Public** - called before execute_run to fail fast
pub fn validate_args(args: &RunArgs) -> Result<()> {
    if args.gpu_top_bin.trim().is_empty() {
        bail!("intel_gpu_top binary must not be empty");
    }

    if args.refresh_period_ms == 0 {
        bail!("Refresh period must be greater than 0 ms");
    }

    if args.read_chunk_size == 0 {
        bail!("Read chunk size must be greater than 0");
    }

    if args.max_frame_bytes == Some(0) {
        bail!("Max frame size must be greater than 0 when set");
    }

    Ok(())
}

/// Execute the run command
///
/// **Public** - main entry point called from main.rs
///
/// Blocks until the monitor's output ends.
///
/// # Errors
/// * Gauge registration or endpoint bind failures
/// * Monitor spawn failures
/// * Read errors on the monitor's stdout
pub fn execute_run(args: RunArgs) -> Result<PipelineStats> {
    let catalog = MetricCatalog::intel_gpu_top();
    debug!("Metric catalog has {} entries", catalog.len());

    let mut sink = PrometheusSink::for_catalog(&catalog).context("Failed to register metrics")?;
    sink.register_gauge(DEVICE_ID_METRIC, DEVICE_ID_HELP)
        .context("Failed to register device id metric")?;

    match discover_device_id(&args.gpu_top_bin) {
        Ok(device_id) => sink.set(DEVICE_ID_METRIC, f64::from(device_id)),
        Err(e) => warn!("Device discovery failed, {} stays 0: {}", DEVICE_ID_METRIC, e),
    }

    let server = MetricsServer::bind(&args.listen_addr())
        .with_context(|| format!("Failed to start metrics endpoint on {}", args.listen_addr()))?;
    let server = server
        .spawn(sink.registry().clone())
        .context("Failed to start metrics endpoint")?;

    let command = GpuTopCommand::new(args.gpu_top_bin.as_str(), args.refresh_period_ms);
    let mut process = command.spawn().context("Failed to start monitor")?;
    info!("Started {}", command);

    let mut stdout = process.take_stdout()?;
    let mut pipeline = Pipeline::new(build_framer(args.max_frame_bytes), &catalog, &sink);
    let result = pipeline.run(&mut stdout, args.read_chunk_size);
    drop(stdout);

    let report = process.shutdown()?;
    if report.failed() {
        error!("Error: {}", report.stderr.trim());
    }

    server.shutdown();
    info!("Finished");

    result.context("Monitor stream failed")
}
