use igpu_exporter::metrics::{normalize, MetricCatalog};
use serde_json::{json, Value};
use std::collections::HashMap;

fn normalized(record: &Value) -> HashMap<String, f64> {
    let catalog = MetricCatalog::intel_gpu_top();
    normalize(record, &catalog)
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[test]
fn test_blitter_instance_key() {
    let values = normalized(&json!({"engines": {"Blitter/0": {"busy": 12.5}}}));
    assert_eq!(values["igpu_engines_blitter_0_busy"], 12.5);
}

#[test]
fn test_blitter_legacy_key() {
    let values = normalized(&json!({"engines": {"Blitter": {"busy": 7.0}}}));
    assert_eq!(values["igpu_engines_blitter_0_busy"], 7.0);
}

#[test]
fn test_blitter_absent() {
    let values = normalized(&json!({"engines": {"Video/0": {"busy": 2.0}}}));

    assert_eq!(values["igpu_engines_blitter_0_busy"], 0.0);
    assert_eq!(values["igpu_engines_video_0_busy"], 2.0);
}

#[test]
fn test_all_engines_legacy_schema() {
    let record = json!({"engines": {
        "Render/3D": {"busy": 1.0, "sema": 2.0, "wait": 3.0, "unit": "%"},
        "Blitter": {"busy": 4.0, "sema": 5.0, "wait": 6.0, "unit": "%"},
        "Video": {"busy": 7.0, "sema": 8.0, "wait": 9.0, "unit": "%"},
        "VideoEnhance": {"busy": 10.0, "sema": 11.0, "wait": 12.0, "unit": "%"}
    }});
    let values = normalized(&record);

    assert_eq!(values["igpu_engines_render_3d_0_busy"], 1.0);
    assert_eq!(values["igpu_engines_blitter_0_sema"], 5.0);
    assert_eq!(values["igpu_engines_video_0_wait"], 9.0);
    assert_eq!(values["igpu_engines_video_enhance_0_busy"], 10.0);
}

#[test]
fn test_direct_fields() {
    let record = json!({
        "period": {"duration": 1000.25, "unit": "ms"},
        "frequency": {"requested": 1300.5, "actual": 1299.0, "unit": "MHz"},
        "interrupts": {"count": 412.3, "unit": "irq/s"},
        "rc6": {"value": 12.0, "unit": "%"},
        "power": {"GPU": 2.1, "Package": 9.8, "unit": "W"},
        "imc-bandwidth": {"reads": 2048.0, "writes": "512", "unit": "MiB/s"}
    });
    let values = normalized(&record);

    assert_eq!(values["igpu_period"], 1000.25);
    assert_eq!(values["igpu_frequency_requested"], 1300.5);
    assert_eq!(values["igpu_frequency_actual"], 1299.0);
    assert_eq!(values["igpu_interrupts"], 412.3);
    assert_eq!(values["igpu_rc6"], 12.0);
    assert_eq!(values["igpu_power_gpu"], 2.1);
    assert_eq!(values["igpu_power_package"], 9.8);
    assert_eq!(values["igpu_imc_bandwidth_reads"], 2048.0);
    assert_eq!(values["igpu_imc_bandwidth_writes"], 512.0);
}

#[test]
fn test_mistyped_fields_default_to_zero() {
    let record = json!({
        "power": "unavailable",
        "rc6": {"value": null},
        "frequency": {"actual": [1, 2]},
        "engines": {"Blitter/0": {"busy": {"nested": 1}}}
    });
    let values = normalized(&record);

    assert_eq!(values["igpu_power_gpu"], 0.0);
    assert_eq!(values["igpu_rc6"], 0.0);
    assert_eq!(values["igpu_frequency_actual"], 0.0);
    assert_eq!(values["igpu_engines_blitter_0_busy"], 0.0);
}

#[test]
fn test_total_coverage_on_empty_record() {
    let catalog = MetricCatalog::intel_gpu_top();
    let values = normalize(&json!({}), &catalog);

    assert_eq!(values.len(), catalog.len());
    for (spec, (name, value)) in catalog.entries().iter().zip(&values) {
        assert_eq!(spec.name, *name);
        assert_eq!(*value, 0.0);
    }
}
