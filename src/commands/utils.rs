use crate::metrics::{MetricCatalog, MetricSource};
use crate::utils::config::{DEVICE_ID_HELP, DEVICE_ID_METRIC};
use anyhow::Result;

/// Display the metric catalog
pub fn display_catalog(show_details: bool, json: bool) -> Result<()> {
    let catalog = MetricCatalog::intel_gpu_top();

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("Intel GPU Exporter Metric Catalog");
    println!("  {:<36} {}", DEVICE_ID_METRIC, DEVICE_ID_HELP);

    for spec in catalog.entries() {
        println!("  {:<36} {}", spec.name, spec.help);

        if show_details {
            match &spec.source {
                MetricSource::Engine { keys, field, .. } => {
                    println!("      from engines.{{{}}}.{}", keys.join("|"), field);
                }
                MetricSource::Path { path } => {
                    println!("      from {}", path.join("."));
                }
            }
        }
    }

    if !show_details {
        println!();
        println!("Use --show for the source field of each metric");
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Intel GPU Exporter v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Exposes intel_gpu_top statistics as Prometheus metrics.");
}
