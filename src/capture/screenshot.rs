use crate::{
    browser::SlidePage,
    capture::{
        CaptureJob, CaptureMethod, CapturePlan, CaptureStats, discard_partial_output,
        frames::FrameSequence,
    },
    encode::ffmpeg::{Encoder, VideoEncodeOpts},
    foundation::{
        clock::Clock,
        core::FrameIndex,
        error::{SlidecastError, SlidecastResult},
    },
};

/// Open-loop screenshot capture into a temporary image sequence, encoded afterwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenshotLoop;

impl CaptureMethod for ScreenshotLoop {
    fn name(&self) -> &'static str {
        "screenshot"
    }

    #[tracing::instrument(skip_all, fields(slide = job.label, frames = plan.frame_count))]
    fn record(
        &self,
        page: &mut dyn SlidePage,
        clock: &dyn Clock,
        plan: &CapturePlan,
        job: &CaptureJob<'_>,
        encoder: &Encoder,
    ) -> SlidecastResult<CaptureStats> {
        let mut seq = FrameSequence::create_in(job.scratch_dir, job.label, plan.image_format)?;
        let result = capture_frames(page, clock, plan, &mut seq).and_then(|stats| {
            let opts = VideoEncodeOpts {
                fps: plan.fps,
                quality: plan.quality,
                out_path: job.out_path.to_path_buf(),
            };
            encoder.encode_sequence(&seq.input_pattern(), &opts)?;
            Ok(stats)
        });
        seq.cleanup();
        if result.is_err() {
            discard_partial_output(job.out_path);
        }
        result
    }
}

/// Capture `plan.frame_count` screenshots into `seq`.
///
/// After each frame the loop sleeps `interval - elapsed - capture_delay` (saturating at zero).
/// It never catches up: a slow browser stretches wall time and the resulting clip plays back
/// faster than the page ran. The first capture or write error ends the loop; frames already on
/// disk stay in `seq`.
pub fn capture_frames(
    page: &mut dyn SlidePage,
    clock: &dyn Clock,
    plan: &CapturePlan,
    seq: &mut FrameSequence,
) -> SlidecastResult<CaptureStats> {
    let start = clock.now();
    let progress_every = (plan.frame_count / 10).max(1);

    for i in 0..plan.frame_count {
        let frame_start = clock.now();
        let bytes = page.screenshot(plan.image_format).map_err(|e| match e {
            SlidecastError::Capture(msg) => {
                SlidecastError::capture(format!("frame {i}: {msg}"))
            }
            other => other,
        })?;
        seq.write_frame(FrameIndex(i), &bytes)?;

        let elapsed = clock.now().saturating_duration_since(frame_start);
        clock.sleep(
            plan.interval
                .saturating_sub(elapsed)
                .saturating_sub(plan.capture_delay),
        );

        if (i + 1) % progress_every == 0 {
            tracing::debug!(captured = i + 1, total = plan.frame_count, "capturing frames");
        }
    }

    let stats = CaptureStats {
        frames: plan.frame_count,
        duplicated: 0,
        wall_elapsed: clock.now().saturating_duration_since(start),
        nominal: plan.duration,
    };
    stats.log("screenshot");
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/screenshot.rs"]
mod tests;
