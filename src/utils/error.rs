//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::num::ParseIntError;
use thiserror::Error;

/// Errors that can occur while decoding a frame into a record
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Errors that can occur while driving the frame pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read from monitor stream: {0}")]
    Read(#[from] std::io::Error),
}

/// Errors that can occur while talking to `intel_gpu_top`
#[derive(Error, Debug)]
pub enum GpuTopError {
    #[error("Failed to spawn `{command}`: {source}")]
    SpawnFailed {
        command: String,
        source: std::io::Error,
    },

    #[error("No stdout pipe for `{0}`")]
    MissingStdout(String),

    #[error("No device id found in device listing: {0:?}")]
    NoDeviceId(String),

    #[error("Invalid device id `{raw}`: {source}")]
    InvalidDeviceId { raw: String, source: ParseIntError },

    #[error("Failed to wait for `{command}`: {source}")]
    WaitFailed {
        command: String,
        source: std::io::Error,
    },
}

/// Errors that can occur while registering metrics
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Metric registration failed: {0}")]
    RegistrationFailed(#[from] prometheus::Error),
}

/// Errors that can occur in the metrics HTTP endpoint
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {reason}")]
    BindFailed { addr: String, reason: String },

    #[error("Failed to encode metrics: {0}")]
    EncodeFailed(#[from] prometheus::Error),

    #[error("Failed to start server thread: {0}")]
    SpawnFailed(#[from] std::io::Error),
}
