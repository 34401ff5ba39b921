//! Device discovery through `intel_gpu_top -L`.

use crate::utils::error::GpuTopError;
use log::{debug, info};
use regex::Regex;
use std::process::Command;
use std::sync::LazyLock;

static DEVICE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"device=(\w+)").expect("device id pattern is valid"));

/// Discover the PCI device id of the first GPU
///
/// **Public** - called once at startup
///
/// # Arguments
/// * `bin` - `intel_gpu_top` binary to run
///
/// # Errors
/// * `GpuTopError::SpawnFailed` - binary could not be run
/// * `GpuTopError::NoDeviceId` / `InvalidDeviceId` - see [`parse_device_id`]
pub fn discover_device_id(bin: &str) -> Result<u32, GpuTopError> {
    let command = format!("{} -L", bin);
    debug!("Running {}", command);

    let output = Command::new(bin)
        .arg("-L")
        .output()
        .map_err(|source| GpuTopError::SpawnFailed { command, source })?;

    let listing = String::from_utf8_lossy(&output.stdout);
    let device_id = parse_device_id(&listing)?;

    info!("Found GPU device id 0x{:04x}", device_id);
    Ok(device_id)
}

/// Extract `device=<hex>` from the first line of a device listing
///
/// A listing line looks like
/// `card0  Intel Alderlake_p (Gen12)  pci:vendor=8086,device=46A6,card=0`.
pub fn parse_device_id(listing: &str) -> Result<u32, GpuTopError> {
    let first_line = listing.lines().next().unwrap_or_default();

    let Some(raw) = DEVICE_ID
        .captures(first_line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
    else {
        return Err(GpuTopError::NoDeviceId(first_line.to_string()));
    };

    u32::from_str_radix(&raw, 16).map_err(|source| GpuTopError::InvalidDeviceId { raw, source })
}
