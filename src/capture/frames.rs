use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    config::presets::ImageFormat,
    foundation::core::FrameIndex,
    foundation::error::{SlidecastError, SlidecastResult},
};

/// Digits in a frame file index. Names sort lexicographically in capture order up to
/// [`MAX_FRAMES`].
pub const FRAME_INDEX_WIDTH: usize = 6;

/// Number of distinct zero-padded indices.
pub const MAX_FRAMES: u64 = 1_000_000;

/// `frame_000042.png`
pub fn frame_file_name(idx: FrameIndex, ext: &str) -> String {
    format!("frame_{:0width$}.{ext}", idx.0, width = FRAME_INDEX_WIDTH)
}

/// Ordered still frames of one capture session, stored in a temporary directory.
///
/// The directory is removed when the sequence is dropped or [`FrameSequence::cleanup`] is
/// called; removal failures are logged and swallowed.
#[derive(Debug)]
pub struct FrameSequence {
    dir: tempfile::TempDir,
    ext: &'static str,
    written: u64,
}

impl FrameSequence {
    /// Create an empty sequence in a fresh directory under `parent`.
    pub fn create_in(parent: &Path, label: &str, format: ImageFormat) -> SlidecastResult<Self> {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create scratch directory '{}'", parent.display()))?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{label}-"))
            .tempdir_in(parent)
            .with_context(|| format!("create frame directory in '{}'", parent.display()))?;
        Ok(Self {
            dir,
            ext: format.extension(),
            written: 0,
        })
    }

    /// Directory holding the frames.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Number of frames written so far.
    pub fn len(&self) -> u64 {
        self.written
    }

    /// `true` when no frame has been written.
    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Path frame `idx` is (or will be) stored at.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.path().join(frame_file_name(idx, self.ext))
    }

    /// `ffmpeg` image2 input pattern, e.g. `.../frame_%06d.png`.
    pub fn input_pattern(&self) -> PathBuf {
        self.dir
            .path()
            .join(format!("frame_%0{FRAME_INDEX_WIDTH}d.{}", self.ext))
    }

    /// Store the next frame. Frames must arrive in order starting at 0.
    pub fn write_frame(&mut self, idx: FrameIndex, bytes: &[u8]) -> SlidecastResult<PathBuf> {
        if idx.0 != self.written {
            return Err(SlidecastError::capture(format!(
                "frame sequence expected index {} but got {}",
                self.written, idx.0
            )));
        }
        if idx.0 >= MAX_FRAMES {
            return Err(SlidecastError::validation(format!(
                "frame index {} exceeds the {FRAME_INDEX_WIDTH}-digit name capacity",
                idx.0
            )));
        }
        let path = self.frame_path(idx);
        std::fs::write(&path, bytes)
            .with_context(|| format!("write frame '{}'", path.display()))?;
        self.written += 1;
        Ok(path)
    }

    /// Frame files currently on disk, sorted by name.
    pub fn frame_paths(&self) -> SlidecastResult<Vec<PathBuf>> {
        let mut out = Vec::new();
        let entries = std::fs::read_dir(self.dir.path())
            .with_context(|| format!("list frames in '{}'", self.dir.path().display()))?;
        for entry in entries {
            let entry = entry.context("read frame directory entry")?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(self.ext) {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }

    /// Remove the directory now.
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::warn!(dir = %path.display(), error = %e, "failed to remove frame directory");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/frames.rs"]
mod tests;
