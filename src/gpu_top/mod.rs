//! Running `intel_gpu_top`.
//!
//! This module handles:
//! - Discovering the GPU device id (`intel_gpu_top -L`)
//! - Spawning and stopping the JSON monitor (`intel_gpu_top -J`)

pub mod device;
pub mod monitor;

// Re-export main types
pub use device::{discover_device_id, parse_device_id};
pub use monitor::{ExitReport, GpuTopCommand, GpuTopProcess};
