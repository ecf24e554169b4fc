use std::io::Read as _;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use crate::config::presets::QualityPreset;
use crate::foundation::core::{Fps, FrameIndex, Resolution};
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Straight-alpha RGBA8 frame, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

/// Configuration provided to a [`FrameSink`] at the start of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output size.
    pub resolution: Resolution,
    /// Declared output frame rate.
    pub fps: Fps,
}

/// Sink contract for consuming recorded frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SlidecastResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgba) -> SlidecastResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> SlidecastResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRgba)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRgba)] {
        &self.frames
    }

    /// `true` once `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SlidecastResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgba) -> SlidecastResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SlidecastResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Sink that spawns `ffmpeg` and streams raw RGBA frames to its stdin.
pub struct FfmpegStreamSink {
    program: PathBuf,
    out_path: PathBuf,
    quality: QualityPreset,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegStreamSink {
    /// Create a sink writing `out_path` with the encoder at `program`.
    pub fn new(
        program: impl Into<PathBuf>,
        out_path: impl Into<PathBuf>,
        quality: QualityPreset,
    ) -> Self {
        Self {
            program: program.into(),
            out_path: out_path.into(),
            quality,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    /// Arguments passed to `ffmpeg` for `cfg`.
    pub fn args(&self, cfg: &SinkConfig) -> Vec<String> {
        let mut args: Vec<String> = [
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        args.push(cfg.resolution.to_string());
        // For rawvideo input, `-r` before `-i` sets the input frame rate.
        args.extend(["-r".to_string(), cfg.fps.ffmpeg_rate()]);
        args.extend(["-i", "pipe:0", "-an", "-c:v", "libx264"].map(String::from));
        args.extend([
            "-crf".to_string(),
            self.quality.crf().to_string(),
            "-preset".to_string(),
            self.quality.x264_preset().to_string(),
        ]);
        args.extend(["-pix_fmt", "yuv420p", "-movflags", "+faststart"].map(String::from));
        args.push(self.out_path.to_string_lossy().into_owned());
        args
    }
}

impl FrameSink for FfmpegStreamSink {
    fn begin(&mut self, cfg: SinkConfig) -> SlidecastResult<()> {
        cfg.resolution.validate()?;
        super::ffmpeg::ensure_parent_dir(&self.out_path)?;

        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(&cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            SlidecastError::encode(format!(
                "failed to spawn '{}': {e}",
                self.program.display()
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SlidecastError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| SlidecastError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgba) -> SlidecastResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SlidecastError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(SlidecastError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.resolution.width || frame.height != cfg.resolution.height {
            return Err(SlidecastError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}",
                frame.width, frame.height, cfg.resolution
            )));
        }
        if frame.data.len() != cfg.resolution.rgba_len() {
            return Err(SlidecastError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SlidecastError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        if let Err(e) = stdin.write_all(&frame.data) {
            // The encoder usually died; its stderr says why.
            let stderr = self.finish().map(|(_, stderr)| stderr).unwrap_or_default();
            let msg = if stderr.is_empty() {
                format!("failed to write frame to ffmpeg stdin: {e}")
            } else {
                format!("failed to write frame to ffmpeg stdin: {e}: {stderr}")
            };
            return Err(SlidecastError::encode(msg));
        }
        Ok(())
    }

    fn end(&mut self) -> SlidecastResult<()> {
        let (status, stderr) = self.finish()?;
        if !status.success() {
            return Err(SlidecastError::encode(format!(
                "ffmpeg exited with status {status}: {stderr}"
            )));
        }
        self.cfg = None;
        Ok(())
    }
}

impl FfmpegStreamSink {
    /// Close stdin, wait for the encoder and collect its trimmed stderr.
    fn finish(&mut self) -> SlidecastResult<(ExitStatus, String)> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| SlidecastError::encode("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            SlidecastError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| SlidecastError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| SlidecastError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        let stderr = String::from_utf8_lossy(&stderr_bytes).trim().to_string();
        Ok((status, stderr))
    }
}

impl Drop for FfmpegStreamSink {
    fn drop(&mut self) {
        // An aborted recording must not leave an orphaned encoder behind.
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
