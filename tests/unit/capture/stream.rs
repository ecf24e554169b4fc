use std::{
    cell::Cell,
    io::Cursor,
    time::{Duration, Instant},
};

use super::*;
use crate::{
    config::presets::{ImageFormat, QualityPreset},
    encode::sink::InMemorySink,
    foundation::core::Fps,
};

struct StepClock {
    start: Instant,
    offset: Cell<Duration>,
}

impl StepClock {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    fn advance(&self, d: Duration) {
        self.offset.set(self.offset.get() + d);
    }

    fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for StepClock {
    fn now(&self) -> Instant {
        self.start + self.offset.get()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

fn png(width: u32, height: u32, shade: u8) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([shade, 0, 0, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Page returning solid frames whose red channel counts captures.
struct ShadedPage<'a> {
    clock: &'a StepClock,
    cost: Duration,
    size: (u32, u32),
    shots: u8,
}

impl SlidePage for ShadedPage<'_> {
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
        self.clock.advance(self.cost);
        let bytes = png(self.size.0, self.size.1, self.shots);
        self.shots += 1;
        Ok(bytes)
    }

    fn close(&mut self) -> SlidecastResult<()> {
        Ok(())
    }
}

fn plan() -> CapturePlan {
    let fps = Fps::integer(10).unwrap();
    CapturePlan {
        resolution: Resolution::new(4, 2).unwrap(),
        fps,
        duration: Duration::from_secs(1),
        interval: fps.frame_interval(),
        frame_count: 10,
        image_format: ImageFormat::Png,
        capture_delay: Duration::from_millis(16),
        quality: QualityPreset::High,
    }
}

#[test]
fn fast_page_fills_every_slot_with_a_fresh_frame() {
    let clock = StepClock::new();
    let mut page = ShadedPage {
        clock: &clock,
        cost: Duration::ZERO,
        size: (4, 2),
        shots: 0,
    };
    let mut sink = InMemorySink::new();

    let stats = record_stream(&mut page, &clock, &plan(), &mut sink).unwrap();
    assert_eq!(stats.frames, 10);
    assert_eq!(stats.duplicated, 0);
    assert_eq!(page.shots, 10);
    assert_eq!(clock.elapsed(), Duration::from_millis(900));
    assert!(sink.ended());
    assert_eq!(sink.config().unwrap().resolution, Resolution::new(4, 2).unwrap());
}

#[test]
fn overrunning_captures_are_repeated_for_missed_slots() {
    let clock = StepClock::new();
    let mut page = ShadedPage {
        clock: &clock,
        cost: Duration::from_millis(250),
        size: (4, 2),
        shots: 0,
    };
    let mut sink = InMemorySink::new();

    let stats = record_stream(&mut page, &clock, &plan(), &mut sink).unwrap();
    assert_eq!(stats.frames, 10);
    assert_eq!(page.shots, 4);
    assert_eq!(stats.duplicated, 6);

    let indices: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, (0..10).collect::<Vec<_>>());

    // Red channel of each emitted frame names the capture it came from.
    let shades: Vec<u8> = sink.frames().iter().map(|(_, f)| f.data[0]).collect();
    assert_eq!(shades, vec![0, 0, 1, 1, 1, 2, 2, 3, 3, 3]);
}

#[test]
fn screenshots_of_another_size_are_resized() {
    let clock = StepClock::new();
    let mut page = ShadedPage {
        clock: &clock,
        cost: Duration::ZERO,
        size: (8, 4),
        shots: 0,
    };
    let mut sink = InMemorySink::new();

    record_stream(&mut page, &clock, &plan(), &mut sink).unwrap();
    for (_, frame) in sink.frames() {
        assert_eq!((frame.width, frame.height), (4, 2));
        assert_eq!(frame.data.len(), 4 * 2 * 4);
    }
}

#[test]
fn undecodable_screenshot_is_capture_error() {
    let err = decode_frame(b"not an image", Resolution::new(4, 2).unwrap()).unwrap_err();
    assert!(matches!(err, SlidecastError::Capture(_)));
}

#[test]
fn decode_keeps_matching_frames_untouched() {
    let frame = decode_frame(&png(4, 2, 200), Resolution::new(4, 2).unwrap()).unwrap();
    assert_eq!(frame.data.len(), 32);
    assert!(frame.data.chunks(4).all(|px| px == [200, 0, 0, 255]));
}

#[cfg(unix)]
#[test]
fn failed_stream_encode_leaves_no_output_behind() {
    use std::os::unix::fs::PermissionsExt as _;

    let tmp = tempfile::tempdir().unwrap();
    let prog = tmp.path().join("ffmpeg");
    // Writes a truncated file, drains stdin, then fails.
    std::fs::write(
        &prog,
        "#!/bin/sh\nfor last; do :; done\necho partial > \"$last\"\ncat > /dev/null\n\
         echo 'muxer failed' >&2\nexit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&prog, std::fs::Permissions::from_mode(0o755)).unwrap();

    let out = tmp.path().join("modern").join("slide-background.mp4");
    let scratch = tmp.path().join(".frames");
    let job = CaptureJob {
        label: "slide",
        out_path: &out,
        scratch_dir: &scratch,
    };
    let clock = StepClock::new();
    let mut page = ShadedPage {
        clock: &clock,
        cost: Duration::ZERO,
        size: (4, 2),
        shots: 0,
    };

    let err = StreamRecorder
        .record(&mut page, &clock, &plan(), &job, &Encoder::from_program(&prog))
        .unwrap_err();
    assert!(matches!(err, SlidecastError::Encode(_)));
    assert!(!out.exists());
}
