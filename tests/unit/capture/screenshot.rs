use std::{
    cell::{Cell, RefCell},
    path::Path,
    time::{Duration, Instant},
};

use super::*;
use crate::{
    config::presets::{ImageFormat, QualityPreset},
    foundation::core::{Fps, Resolution},
};

struct StepClock {
    start: Instant,
    offset: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl StepClock {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Cell::new(Duration::ZERO),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    fn advance(&self, d: Duration) {
        self.offset.set(self.offset.get() + d);
    }
}

impl Clock for StepClock {
    fn now(&self) -> Instant {
        self.start + self.offset.get()
    }

    fn sleep(&self, d: Duration) {
        self.sleeps.borrow_mut().push(d);
        self.advance(d);
    }
}

/// Page whose screenshots cost `cost` of simulated time and carry their own index.
struct TimedPage<'a> {
    clock: &'a StepClock,
    cost: Duration,
    shots: u64,
    fail_at: Option<u64>,
}

impl SlidePage for TimedPage<'_> {
    fn navigate(&mut self, _url: &str) -> SlidecastResult<()> {
        Ok(())
    }

    fn evaluate(
        &mut self,
        _script: &str,
        _await_promise: bool,
    ) -> SlidecastResult<Option<serde_json::Value>> {
        Ok(None)
    }

    fn screenshot(&mut self, _format: ImageFormat) -> SlidecastResult<Vec<u8>> {
        if self.fail_at == Some(self.shots) {
            return Err(SlidecastError::capture("target closed"));
        }
        self.clock.advance(self.cost);
        let bytes = self.shots.to_string().into_bytes();
        self.shots += 1;
        Ok(bytes)
    }

    fn close(&mut self) -> SlidecastResult<()> {
        Ok(())
    }
}

fn plan(fps: u32, duration: Duration) -> CapturePlan {
    let fps = Fps::integer(fps).unwrap();
    CapturePlan {
        resolution: Resolution::new(64, 36).unwrap(),
        fps,
        duration,
        interval: fps.frame_interval(),
        frame_count: fps.frames_for(duration),
        image_format: ImageFormat::Png,
        capture_delay: Duration::from_millis(16),
        quality: QualityPreset::High,
    }
}

#[test]
fn twelve_seconds_at_thirty_fps_yields_360_ordered_frames() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = StepClock::new();
    let mut page = TimedPage {
        clock: &clock,
        cost: Duration::ZERO,
        shots: 0,
        fail_at: None,
    };
    let plan = plan(30, Duration::from_secs(12));
    let mut seq = FrameSequence::create_in(tmp.path(), "slide", ImageFormat::Png).unwrap();

    let stats = capture_frames(&mut page, &clock, &plan, &mut seq).unwrap();
    assert_eq!(stats.frames, 360);
    assert_eq!(stats.duplicated, 0);
    assert_eq!(seq.len(), 360);

    let order: Vec<u64> = seq
        .frame_paths()
        .unwrap()
        .iter()
        .map(|p| std::fs::read_to_string(p).unwrap().parse().unwrap())
        .collect();
    assert_eq!(order, (0..360).collect::<Vec<_>>());
}

#[test]
fn sleep_subtracts_elapsed_and_capture_delay() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = StepClock::new();
    let mut page = TimedPage {
        clock: &clock,
        cost: Duration::from_millis(50),
        shots: 0,
        fail_at: None,
    };
    let plan = plan(10, Duration::from_secs(1));
    let mut seq = FrameSequence::create_in(tmp.path(), "slide", ImageFormat::Png).unwrap();

    let stats = capture_frames(&mut page, &clock, &plan, &mut seq).unwrap();
    let sleeps = clock.sleeps.borrow();
    assert_eq!(sleeps.len(), 10);
    assert!(sleeps.iter().all(|d| *d == Duration::from_millis(34)));
    assert_eq!(stats.wall_elapsed, Duration::from_millis(840));
    assert_eq!(stats.drift(), Duration::ZERO);
}

#[test]
fn slow_captures_drift_without_correction() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = StepClock::new();
    let mut page = TimedPage {
        clock: &clock,
        cost: Duration::from_millis(150),
        shots: 0,
        fail_at: None,
    };
    let plan = plan(10, Duration::from_secs(1));
    let mut seq = FrameSequence::create_in(tmp.path(), "slide", ImageFormat::Png).unwrap();

    let stats = capture_frames(&mut page, &clock, &plan, &mut seq).unwrap();
    assert_eq!(stats.frames, 10);
    assert!(clock.sleeps.borrow().iter().all(|d| d.is_zero()));
    assert_eq!(stats.wall_elapsed, Duration::from_millis(1500));
    assert_eq!(stats.drift(), Duration::from_millis(500));
}

#[test]
fn capture_error_aborts_and_keeps_written_frames() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = StepClock::new();
    let mut page = TimedPage {
        clock: &clock,
        cost: Duration::ZERO,
        shots: 0,
        fail_at: Some(5),
    };
    let plan = plan(10, Duration::from_secs(1));
    let mut seq = FrameSequence::create_in(tmp.path(), "slide", ImageFormat::Png).unwrap();

    let err = capture_frames(&mut page, &clock, &plan, &mut seq).unwrap_err();
    assert!(matches!(err, SlidecastError::Capture(_)));
    assert!(err.to_string().contains("frame 5"));
    assert_eq!(seq.len(), 5);
}

fn scratch_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn record_removes_frames_when_encoder_is_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let scratch = tmp.path().join(".frames");
    let out = tmp.path().join("classic").join("slide-background.mp4");
    let clock = StepClock::new();
    let mut page = TimedPage {
        clock: &clock,
        cost: Duration::ZERO,
        shots: 0,
        fail_at: None,
    };
    let job = CaptureJob {
        label: "slide",
        out_path: &out,
        scratch_dir: &scratch,
    };
    let encoder = Encoder::from_program("/definitely/not/a/real/ffmpeg-binary");

    let err = ScreenshotLoop
        .record(
            &mut page,
            &clock,
            &plan(10, Duration::from_secs(1)),
            &job,
            &encoder,
        )
        .unwrap_err();
    assert!(matches!(err, SlidecastError::Encode(_)));
    assert_eq!(page.shots, 10);
    assert!(scratch_is_empty(&scratch));
}

#[test]
fn record_removes_frames_after_capture_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let scratch = tmp.path().join(".frames");
    let out = tmp.path().join("slide.mp4");
    let clock = StepClock::new();
    let mut page = TimedPage {
        clock: &clock,
        cost: Duration::ZERO,
        shots: 0,
        fail_at: Some(3),
    };
    let job = CaptureJob {
        label: "slide",
        out_path: &out,
        scratch_dir: &scratch,
    };

    let err = ScreenshotLoop
        .record(
            &mut page,
            &clock,
            &plan(10, Duration::from_secs(1)),
            &job,
            &Encoder::from_program("ffmpeg"),
        )
        .unwrap_err();
    assert!(matches!(err, SlidecastError::Capture(_)));
    assert!(scratch_is_empty(&scratch));
    assert!(!out.exists());
}

#[cfg(unix)]
#[test]
fn failed_sequence_encode_leaves_no_output_behind() {
    use std::os::unix::fs::PermissionsExt as _;

    let tmp = tempfile::tempdir().unwrap();
    let prog = tmp.path().join("ffmpeg");
    std::fs::write(
        &prog,
        "#!/bin/sh\nfor last; do :; done\necho partial > \"$last\"\nexit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&prog, std::fs::Permissions::from_mode(0o755)).unwrap();

    let scratch = tmp.path().join(".frames");
    let out = tmp.path().join("classic").join("slide-background.mp4");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();
    let clock = StepClock::new();
    let mut page = TimedPage {
        clock: &clock,
        cost: Duration::ZERO,
        shots: 0,
        fail_at: None,
    };
    let job = CaptureJob {
        label: "slide",
        out_path: &out,
        scratch_dir: &scratch,
    };

    let err = ScreenshotLoop
        .record(
            &mut page,
            &clock,
            &plan(10, Duration::from_secs(1)),
            &job,
            &Encoder::from_program(&prog),
        )
        .unwrap_err();
    assert!(matches!(err, SlidecastError::Encode(_)));
    assert!(!out.exists());
    assert!(scratch_is_empty(&scratch));
}
