use super::*;

#[test]
fn default_plan_captures_twelve_seconds_at_thirty_fps() {
    let plan = CapturePlan::from_config(&ExportConfig::default()).unwrap();
    assert_eq!(plan.frame_count, 360);
    assert_eq!(plan.interval, Duration::from_nanos(33_333_333));
    assert_eq!(plan.resolution, Resolution::new(1920, 1080).unwrap());
    assert_eq!(plan.capture_delay, Duration::from_millis(16));
    assert_eq!(plan.quality, QualityPreset::High);
}

#[test]
fn partial_final_interval_rounds_up() {
    let cfg = ExportConfig {
        duration: Duration::from_millis(1010),
        fps: Fps::integer(10).unwrap(),
        ..ExportConfig::default()
    };
    assert_eq!(CapturePlan::from_config(&cfg).unwrap().frame_count, 11);
}

#[test]
fn slot_offsets_are_exact_for_rational_rates() {
    let cfg = ExportConfig {
        fps: Fps::new(30000, 1001).unwrap(),
        ..ExportConfig::default()
    };
    let plan = CapturePlan::from_config(&cfg).unwrap();
    assert_eq!(plan.slot_offset(0), Duration::ZERO);
    assert_eq!(plan.slot_offset(30000), Duration::from_secs(1001));
}

#[test]
fn plans_beyond_name_capacity_are_rejected() {
    let cfg = ExportConfig {
        duration: Duration::from_secs(40_000),
        ..ExportConfig::default()
    };
    let err = CapturePlan::from_config(&cfg).unwrap_err();
    assert!(matches!(err, SlidecastError::Validation(_)));
}

#[test]
fn drift_is_wall_time_beyond_nominal() {
    let stats = CaptureStats {
        frames: 360,
        duplicated: 0,
        wall_elapsed: Duration::from_millis(14_500),
        nominal: Duration::from_secs(12),
    };
    assert_eq!(stats.drift(), Duration::from_millis(2_500));

    let fast = CaptureStats {
        wall_elapsed: Duration::from_secs(6),
        ..stats
    };
    assert_eq!(fast.drift(), Duration::ZERO);
}

#[test]
fn method_for_maps_each_kind() {
    assert_eq!(method_for(CaptureMethodKind::Screenshot).name(), "screenshot");
    assert_eq!(method_for(CaptureMethodKind::Stream).name(), "stream");
}
