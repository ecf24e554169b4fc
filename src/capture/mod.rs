//! Frame capture strategies.
//!
//! A [`CaptureMethod`] turns an isolated, animating page into an MP4 at the job's output path.
//! [`ScreenshotLoop`] writes an image sequence and encodes it afterwards; [`StreamRecorder`]
//! pipes decoded frames straight into the encoder.

use std::path::Path;
use std::time::Duration;

use crate::{
    browser::SlidePage,
    config::{
        export::{CaptureMethodKind, ExportConfig},
        presets::{ImageFormat, QualityPreset},
    },
    encode::ffmpeg::Encoder,
    foundation::{
        clock::Clock,
        core::{Fps, Resolution},
        error::{SlidecastError, SlidecastResult},
    },
};

/// Temporary frame storage.
pub mod frames;
mod screenshot;
mod stream;

pub use screenshot::{ScreenshotLoop, capture_frames};
pub use stream::{StreamRecorder, decode_frame, record_stream};

/// Timing and format of one capture session, derived from an [`ExportConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapturePlan {
    /// Viewport and output size.
    pub resolution: Resolution,
    /// Output frame rate.
    pub fps: Fps,
    /// Nominal clip length.
    pub duration: Duration,
    /// Nominal spacing between frames.
    pub interval: Duration,
    /// `ceil(duration / interval)`.
    pub frame_count: u64,
    /// Screenshot encoding.
    pub image_format: ImageFormat,
    /// Allowance subtracted from each sleep for screenshot overhead.
    pub capture_delay: Duration,
    /// Encoder quality.
    pub quality: QualityPreset,
}

impl CapturePlan {
    /// Derive the plan for `cfg`. Fails when the frame count exceeds the name capacity.
    pub fn from_config(cfg: &ExportConfig) -> SlidecastResult<Self> {
        let frame_count = cfg.frame_count();
        if frame_count == 0 {
            return Err(SlidecastError::validation("capture plan has no frames"));
        }
        if frame_count > frames::MAX_FRAMES {
            return Err(SlidecastError::validation(format!(
                "capture needs {frame_count} frames, more than the {} supported",
                frames::MAX_FRAMES
            )));
        }
        Ok(Self {
            resolution: cfg.dimensions(),
            fps: cfg.fps,
            duration: cfg.duration,
            interval: cfg.fps.frame_interval(),
            frame_count,
            image_format: cfg.image_format,
            capture_delay: cfg.timings.capture_delay,
            quality: cfg.quality,
        })
    }

    /// Offset of slot `idx` from the start of the recording (`idx * interval`, exact).
    pub fn slot_offset(&self, idx: u64) -> Duration {
        let nanos = u128::from(idx) * u128::from(self.fps.den) * 1_000_000_000
            / u128::from(self.fps.num);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// What a finished capture session measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Frames handed to the encoder.
    pub frames: u64,
    /// Frames repeated to fill slots missed by slow captures.
    pub duplicated: u64,
    /// Wall-clock time the session took.
    pub wall_elapsed: Duration,
    /// Planned clip length.
    pub nominal: Duration,
}

impl CaptureStats {
    /// Wall time beyond the nominal duration.
    pub fn drift(&self) -> Duration {
        self.wall_elapsed.saturating_sub(self.nominal)
    }

    pub(crate) fn log(&self, method: &str) {
        if self.drift() > Duration::ZERO {
            tracing::warn!(
                method,
                frames = self.frames,
                duplicated = self.duplicated,
                wall_ms = self.wall_elapsed.as_millis() as u64,
                nominal_ms = self.nominal.as_millis() as u64,
                "capture ran longer than the clip; playback will be faster than real time"
            );
        } else {
            tracing::debug!(
                method,
                frames = self.frames,
                duplicated = self.duplicated,
                wall_ms = self.wall_elapsed.as_millis() as u64,
                "capture finished"
            );
        }
    }
}

/// Where one capture session writes.
#[derive(Clone, Copy, Debug)]
pub struct CaptureJob<'a> {
    /// Slide name, used to label scratch directories.
    pub label: &'a str,
    /// Final MP4 path.
    pub out_path: &'a Path,
    /// Parent directory for temporary frame storage.
    pub scratch_dir: &'a Path,
}

/// Strategy that records a page into an MP4.
pub trait CaptureMethod {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Capture `plan.frame_count` frames from `page` and encode them to `job.out_path`.
    ///
    /// Temporary resources are released on every path, including errors.
    fn record(
        &self,
        page: &mut dyn SlidePage,
        clock: &dyn Clock,
        plan: &CapturePlan,
        job: &CaptureJob<'_>,
        encoder: &Encoder,
    ) -> SlidecastResult<CaptureStats>;
}

/// Remove whatever a failed recording left at `path`.
pub(crate) fn discard_partial_output(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output")
        }
    }
}

/// Strategy for `kind`.
pub fn method_for(kind: CaptureMethodKind) -> Box<dyn CaptureMethod> {
    match kind {
        CaptureMethodKind::Screenshot => Box::new(ScreenshotLoop),
        CaptureMethodKind::Stream => Box::new(StreamRecorder),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/plan.rs"]
mod tests;
