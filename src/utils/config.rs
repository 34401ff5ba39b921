//! Configuration and constants for the exporter.

/// Default `intel_gpu_top` sample period in milliseconds
pub const DEFAULT_REFRESH_PERIOD_MS: u64 = 1000;

/// Default port for the metrics HTTP endpoint
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address for the metrics HTTP endpoint
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Default monitoring binary
pub const DEFAULT_GPU_TOP_BIN: &str = "intel_gpu_top";

/// Size of each blocking read from the monitor's stdout
pub const READ_CHUNK_SIZE: usize = 4096;

/// Time a monitor gets to exit after closing its stdout before it is killed
pub const SHUTDOWN_GRACE_MS: u64 = 1000;

/// Gauge holding the PCI device id discovered at startup
pub const DEVICE_ID_METRIC: &str = "igpu_device_id";
pub const DEVICE_ID_HELP: &str = "Intel GPU device id";

/// Key of the per-engine sub-object in an `intel_gpu_top -J` record
pub const ENGINES_KEY: &str = "engines";

/// An engine as exposed by the catalog, with the raw keys it may appear under.
#[derive(Debug, Clone, Copy)]
pub struct EngineAliases {
    /// Canonical engine identifier, used to build metric names
    pub engine: &'static str,
    /// Human readable label, used in help text
    pub label: &'static str,
    /// Raw keys in the `engines` object, most specific first
    pub keys: &'static [&'static str],
}

// Newer kernels (MTL/Xe) report instance-qualified keys, older ones the bare class.
// Order matters: it encodes which schema wins when both are present.
pub const ENGINE_ALIASES: &[EngineAliases] = &[
    EngineAliases {
        engine: "blitter_0",
        label: "Blitter 0",
        keys: &["Blitter/0", "Blitter"],
    },
    EngineAliases {
        engine: "render_3d_0",
        label: "Render 3D 0",
        keys: &["Render/3D/0", "Render/3D"],
    },
    EngineAliases {
        engine: "video_0",
        label: "Video 0",
        keys: &["Video/0", "Video"],
    },
    EngineAliases {
        engine: "video_enhance_0",
        label: "Video Enhance 0",
        keys: &["VideoEnhance/0", "VideoEnhance"],
    },
];

/// Fields read straight from a nested path: (metric name, help, path)
pub const DIRECT_FIELDS: &[(&str, &str, &[&str])] = &[
    ("igpu_frequency_actual", "Frequency actual MHz", &["frequency", "actual"]),
    ("igpu_frequency_requested", "Frequency requested MHz", &["frequency", "requested"]),
    ("igpu_imc_bandwidth_reads", "IMC reads MiB/s", &["imc-bandwidth", "reads"]),
    ("igpu_imc_bandwidth_writes", "IMC writes MiB/s", &["imc-bandwidth", "writes"]),
    ("igpu_interrupts", "Interrupts/s", &["interrupts", "count"]),
    ("igpu_period", "Period ms", &["period", "duration"]),
    ("igpu_power_gpu", "GPU power W", &["power", "GPU"]),
    ("igpu_power_package", "Package power W", &["power", "Package"]),
    ("igpu_rc6", "RC6 %", &["rc6", "value"]),
];

/// Value reported for a catalog entry whose source field is missing
pub const DEFAULT_METRIC_VALUE: f64 = 0.0;
