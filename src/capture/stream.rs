use crate::{
    browser::SlidePage,
    capture::{CaptureJob, CaptureMethod, CapturePlan, CaptureStats, discard_partial_output},
    encode::{
        ffmpeg::{Encoder, VideoEncodeOpts},
        sink::{FrameRgba, FrameSink, SinkConfig},
    },
    foundation::{
        clock::Clock,
        core::{FrameIndex, Resolution},
        error::{SlidecastError, SlidecastResult},
    },
};

/// Deadline-paced capture streamed into the encoder without touching disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct StreamRecorder;

impl CaptureMethod for StreamRecorder {
    fn name(&self) -> &'static str {
        "stream"
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
        let opts = VideoEncodeOpts {
            fps: plan.fps,
            quality: plan.quality,
            out_path: job.out_path.to_path_buf(),
        };
        let mut sink = encoder.stream_sink(&opts);
        let result = record_stream(page, clock, plan, &mut sink);
        // Stops a still-running encoder before its output is removed.
        drop(sink);
        if result.is_err() {
            discard_partial_output(job.out_path);
        }
        result
    }
}

/// Record exactly `plan.frame_count` frames into `sink`.
///
/// Slot `i` is due at `start + i * interval`. A capture that overruns later slots is repeated
/// for each slot that fully elapsed while it ran, so the clip length follows wall time.
pub fn record_stream(
    page: &mut dyn SlidePage,
    clock: &dyn Clock,
    plan: &CapturePlan,
    sink: &mut dyn FrameSink,
) -> SlidecastResult<CaptureStats> {
    sink.begin(SinkConfig {
        resolution: plan.resolution,
        fps: plan.fps,
    })?;

    let start = clock.now();
    let mut next = 0u64;
    let mut duplicated = 0u64;

    while next < plan.frame_count {
        let due = start + plan.slot_offset(next);
        clock.sleep(due.saturating_duration_since(clock.now()));

        let bytes = page.screenshot(plan.image_format)?;
        let frame = decode_frame(&bytes, plan.resolution)?;
        sink.push_frame(FrameIndex(next), &frame)?;
        next += 1;

        let elapsed = clock.now().saturating_duration_since(start);
        while next < plan.frame_count && plan.slot_offset(next + 1) <= elapsed {
            sink.push_frame(FrameIndex(next), &frame)?;
            next += 1;
            duplicated += 1;
        }
    }

    sink.end()?;

    let stats = CaptureStats {
        frames: next,
        duplicated,
        wall_elapsed: clock.now().saturating_duration_since(start),
        nominal: plan.duration,
    };
    if duplicated > 0 {
        tracing::warn!(duplicated, "slow captures were padded with repeated frames");
    }
    stats.log("stream");
    Ok(stats)
}

/// Decode screenshot bytes to RGBA8 at `target`, resizing when the browser returned another size.
pub fn decode_frame(bytes: &[u8], target: Resolution) -> SlidecastResult<FrameRgba> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| SlidecastError::capture(format!("decode screenshot: {e}")))?;
    let rgba = if img.width() == target.width && img.height() == target.height {
        img.to_rgba8()
    } else {
        tracing::debug!(
            got_w = img.width(),
            got_h = img.height(),
            target = %target,
            "resizing screenshot to output size"
        );
        img.resize_exact(
            target.width,
            target.height,
            image::imageops::FilterType::Triangle,
        )
        .to_rgba8()
    };
    Ok(FrameRgba {
        width: target.width,
        height: target.height,
        data: rgba.into_raw(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/capture/stream.rs"]
mod tests;
