use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::presets::QualityPreset;
use crate::encode::sink::FfmpegStreamSink;
use crate::foundation::core::Fps;
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Environment variable naming a bundled encoder binary.
pub const FFMPEG_PATH_ENV: &str = "FFMPEG_PATH";

/// Where the encoder binary was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderSource {
    /// `ffmpeg` on `PATH`.
    System,
    /// Explicitly configured binary (project file or `FFMPEG_PATH`).
    Bundled,
}

/// Parameters of one constant-frame-rate MP4 encode.
#[derive(Clone, Debug)]
pub struct VideoEncodeOpts {
    /// Declared input and output frame rate.
    pub fps: Fps,
    /// x264 quality bundle.
    pub quality: QualityPreset,
    /// Output MP4 path.
    pub out_path: PathBuf,
}

/// A resolved, runnable encoder binary.
#[derive(Clone, Debug)]
pub struct Encoder {
    program: PathBuf,
    source: EncoderSource,
}

impl Encoder {
    /// Find an encoder: `ffmpeg` on `PATH` first, then `bundled`, then `$FFMPEG_PATH`.
    ///
    /// Failing all three is a [`SlidecastError::Dependency`], which aborts the run.
    pub fn locate(bundled: Option<&Path>) -> SlidecastResult<Self> {
        if probe(Path::new("ffmpeg")) {
            tracing::info!("using system ffmpeg");
            return Ok(Self {
                program: PathBuf::from("ffmpeg"),
                source: EncoderSource::System,
            });
        }

        let env = std::env::var_os(FFMPEG_PATH_ENV).map(PathBuf::from);
        for candidate in bundled.map(Path::to_path_buf).into_iter().chain(env) {
            if probe(&candidate) {
                tracing::info!(path = %candidate.display(), "using bundled ffmpeg");
                return Ok(Self {
                    program: candidate,
                    source: EncoderSource::Bundled,
                });
            }
            tracing::warn!(path = %candidate.display(), "bundled ffmpeg candidate is not runnable");
        }

        Err(SlidecastError::dependency(format!(
            "ffmpeg not found on PATH and no runnable bundled encoder (set {FFMPEG_PATH_ENV})"
        )))
    }

    /// Use `program` without probing it.
    pub fn from_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            source: EncoderSource::Bundled,
        }
    }

    /// Encoder executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Where the executable came from.
    pub fn source(&self) -> EncoderSource {
        self.source
    }

    /// Encode an ordered image sequence (`frame_%06d.ext` pattern) into an MP4.
    #[tracing::instrument(skip(self, opts), fields(out = %opts.out_path.display()))]
    pub fn encode_sequence(&self, input_pattern: &Path, opts: &VideoEncodeOpts) -> SlidecastResult<()> {
        ensure_parent_dir(&opts.out_path)?;
        let output = Command::new(&self.program)
            .args(sequence_args(input_pattern, opts))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                SlidecastError::encode(format!(
                    "failed to spawn '{}': {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SlidecastError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    /// Streaming sink writing raw frames into a new encoder process.
    pub fn stream_sink(&self, opts: &VideoEncodeOpts) -> FfmpegStreamSink {
        FfmpegStreamSink::new(&self.program, &opts.out_path, opts.quality)
    }
}

/// Arguments for an image-sequence encode.
///
/// Both input and output rates are pinned so playback length is `frames / fps` regardless of
/// how long the capture actually took.
pub fn sequence_args(input_pattern: &Path, opts: &VideoEncodeOpts) -> Vec<String> {
    let rate = opts.fps.ffmpeg_rate();
    let mut args: Vec<String> = ["-y", "-loglevel", "error", "-r"]
        .into_iter()
        .map(String::from)
        .collect();
    args.push(rate.clone());
    args.push("-i".to_string());
    args.push(input_pattern.to_string_lossy().into_owned());
    args.extend(["-c:v", "libx264", "-crf"].map(String::from));
    args.push(opts.quality.crf().to_string());
    args.push("-preset".to_string());
    args.push(opts.quality.x264_preset().to_string());
    args.extend(["-pix_fmt", "yuv420p", "-movflags", "+faststart", "-r"].map(String::from));
    args.push(rate);
    args.push(opts.out_path.to_string_lossy().into_owned());
    args
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> SlidecastResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `program -version` runs successfully.
pub fn probe(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
