use igpu_exporter::commands::{execute_replay, ReplayArgs};
use igpu_exporter::metrics::{MemorySink, MetricCatalog, MetricSink};
use igpu_exporter::pipeline::Pipeline;
use igpu_exporter::stream::StreamFramer;
use std::io::Write;

const END_TO_END: &str = r#"noise{"engines":{"Blitter/0":{"busy":12.5}},"frequency":{"actual":300,"requested":300}}"#;

#[test]
fn test_end_to_end_scenario() {
    let catalog = MetricCatalog::intel_gpu_top();

    let mut framer = StreamFramer::new();
    let frames = framer.feed(END_TO_END);
    assert_eq!(frames, vec![END_TO_END["noise".len()..].to_string()]);

    let sink = MemorySink::new();
    let mut pipeline = Pipeline::new(StreamFramer::new(), &catalog, &sink);
    let stats = pipeline.run(&mut END_TO_END.as_bytes(), 16).unwrap();

    assert_eq!(stats.frames, 1);
    assert_eq!(stats.records, 1);

    let snapshot = sink.snapshot();
    assert_eq!(snapshot.len(), catalog.len());
    for (name, value) in snapshot {
        let expected = match name.as_str() {
            "igpu_engines_blitter_0_busy" => 12.5,
            "igpu_frequency_actual" | "igpu_frequency_requested" => 300.0,
            _ => 0.0,
        };
        assert_eq!(value, expected, "{}", name);
    }
}

#[test]
fn test_decode_failure_leaves_sink_untouched() {
    let catalog = MetricCatalog::intel_gpu_top();
    let sink = MemorySink::new();
    let mut pipeline = Pipeline::new(StreamFramer::new(), &catalog, &sink);

    pipeline.feed(br#"{"rc6":{"value":40},"power":{"GPU":3}}"#);
    let before = sink.snapshot();

    assert!(!pipeline.process_frame(r#"{"rc6":{"value":,}}"#));
    pipeline.feed(br#"{"rc6" "value" 99}"#);

    assert_eq!(sink.snapshot(), before);
    assert_eq!(pipeline.stats().decode_failures, 2);
}

#[test]
fn test_absent_field_reverts_to_default() {
    let catalog = MetricCatalog::intel_gpu_top();
    let sink = MemorySink::new();
    let mut pipeline = Pipeline::new(StreamFramer::new(), &catalog, &sink);

    pipeline.feed(br#"{"power":{"GPU":3.5,"Package":10}}"#);
    assert_eq!(sink.get("igpu_power_gpu"), Some(3.5));

    pipeline.feed(br#"{"power":{"Package":11}}"#);
    assert_eq!(sink.get("igpu_power_gpu"), Some(0.0));
    assert_eq!(sink.get("igpu_power_package"), Some(11.0));
}

#[test]
fn test_frames_processed_in_arrival_order() {
    let catalog = MetricCatalog::intel_gpu_top();
    let sink = MemorySink::new();
    let mut pipeline = Pipeline::new(StreamFramer::new(), &catalog, &sink);

    pipeline.feed(br#"{"rc6":{"value":1}},{"rc6":{"value":2}},{"rc6":{"value":3}}"#);

    assert_eq!(sink.get("igpu_rc6"), Some(3.0));
    assert_eq!(pipeline.stats().records, 3);
}

#[test]
fn test_pipeline_through_trait_object() {
    let catalog = MetricCatalog::intel_gpu_top();
    let memory = MemorySink::new();
    let sink: &dyn MetricSink = &memory;
    let mut pipeline = Pipeline::new(StreamFramer::new(), &catalog, sink);

    pipeline.feed(br#"{"interrupts":{"count":12}}"#);
    assert_eq!(memory.get("igpu_interrupts"), Some(12.0));
}

#[test]
fn test_replay_capture_file() {
    let mut capture = tempfile::NamedTempFile::new().unwrap();
    write!(
        capture,
        "[\n{}\n,\n{}\n",
        r#"{"engines":{"Video/0":{"busy":5.5}},"rc6":{"value":80}}"#,
        r#"{"engines":{"Video":{"busy":6.5}},"rc6":{"value":70}}"#
    )
    .unwrap();

    let args = ReplayArgs {
        input: capture.path().to_path_buf(),
        max_frame_bytes: None,
    };
    let mut out = Vec::new();
    let stats = execute_replay(&args, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(stats.records, 2);
    assert!(text.contains("igpu_engines_video_0_busy 6.5"));
    assert!(text.contains("igpu_rc6 70"));
    assert!(text.contains("# HELP igpu_engines_video_0_busy Video 0 busy utilisation %"));
}

#[test]
fn test_replay_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let args = ReplayArgs {
        input: dir.path().join("missing.json"),
        max_frame_bytes: None,
    };

    assert!(execute_replay(&args, &mut Vec::new()).is_err());
}
