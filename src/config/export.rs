use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;

use crate::{
    capture::frames::MAX_FRAMES,
    config::presets::{ImageFormat, QualityPreset, ResolutionPreset},
    foundation::core::{Fps, Resolution},
    foundation::error::{SlidecastError, SlidecastResult},
    slides::catalog::{Category, SlideDescriptor, default_catalog, filter_by_category},
};

/// Frame acquisition strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMethodKind {
    /// Timed screenshot loop into a frame directory, then one encoder pass.
    #[default]
    Screenshot,
    /// Deadline-paced capture streamed straight into the encoder.
    Stream,
}

impl CaptureMethodKind {
    /// Flag name.
    pub fn name(self) -> &'static str {
        match self {
            CaptureMethodKind::Screenshot => "screenshot",
            CaptureMethodKind::Stream => "stream",
        }
    }
}

/// Fixed waits applied around navigation and capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Upper bound for navigation and `readyState` polling.
    pub navigation_timeout: Duration,
    /// Wait after `readyState == complete`, before awaiting fonts.
    pub load_settle: Duration,
    /// Wait after fonts are ready.
    pub fonts_settle: Duration,
    /// Wait after the isolator ran.
    pub isolate_settle: Duration,
    /// Wait after restarting animations.
    pub sync_delay: Duration,
    /// Subtracted from each inter-frame sleep to absorb screenshot latency.
    pub capture_delay: Duration,
    /// Wait before taking the still frame.
    pub still_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            load_settle: Duration::from_millis(3000),
            fonts_settle: Duration::from_millis(1000),
            isolate_settle: Duration::from_millis(500),
            sync_delay: Duration::from_millis(2000),
            capture_delay: Duration::from_millis(16),
            still_delay: Duration::from_millis(2000),
        }
    }
}

impl Timings {
    /// All waits zeroed; navigation keeps a short bound. Used by tests and dry runs.
    pub fn immediate() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(5),
            load_settle: Duration::ZERO,
            fonts_settle: Duration::ZERO,
            isolate_settle: Duration::ZERO,
            sync_delay: Duration::ZERO,
            capture_delay: Duration::ZERO,
            still_delay: Duration::ZERO,
        }
    }
}

/// Immutable configuration for one export run.
///
/// Built once from defaults, an optional [`ProjectFile`] and [`ExportOverrides`], then passed
/// by reference to every stage.
#[derive(Clone, Debug)]
pub struct ExportConfig {
    /// Directory slide paths are resolved against.
    pub base_dir: PathBuf,
    /// Root of the category-partitioned output tree.
    pub output_dir: PathBuf,
    /// Parent of per-slide temporary frame directories.
    pub scratch_dir: PathBuf,
    /// Output resolution.
    pub resolution: ResolutionPreset,
    /// Encoder quality bundle.
    pub quality: QualityPreset,
    /// Nominal clip duration.
    pub duration: Duration,
    /// Nominal frame rate.
    pub fps: Fps,
    /// Frame acquisition strategy.
    pub method: CaptureMethodKind,
    /// Intermediate frame format for the screenshot loop.
    pub image_format: ImageFormat,
    /// Also write a PNG still per slide.
    pub include_stills: bool,
    /// Restart animations before capture (best effort).
    pub sync_animations: bool,
    /// Restrict the run to one category.
    pub only: Option<Category>,
    /// Bundled encoder used when `ffmpeg` is not on `PATH`.
    pub bundled_ffmpeg: Option<PathBuf>,
    /// Explicit Chromium executable.
    pub chrome_path: Option<PathBuf>,
    /// Fixed waits.
    pub timings: Timings,
    /// Slide catalog before category filtering.
    pub slides: Vec<SlideDescriptor>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let output_dir = PathBuf::from("mp4-backgrounds");
        Self {
            base_dir: PathBuf::from("."),
            scratch_dir: output_dir.join(".frames"),
            output_dir,
            resolution: ResolutionPreset::default(),
            quality: QualityPreset::default(),
            duration: Duration::from_secs(12),
            fps: Fps { num: 30, den: 1 },
            method: CaptureMethodKind::default(),
            image_format: ImageFormat::default(),
            include_stills: true,
            sync_animations: true,
            only: None,
            bundled_ffmpeg: None,
            chrome_path: None,
            timings: Timings::default(),
            slides: default_catalog(),
        }
    }
}

impl ExportConfig {
    /// Pixel dimensions of the configured resolution preset.
    pub fn dimensions(&self) -> Resolution {
        self.resolution.resolution()
    }

    /// Frames per clip: `ceil(duration / frame interval)`.
    pub fn frame_count(&self) -> u64 {
        self.fps.frames_for(self.duration)
    }

    /// Slides selected for this run, in catalog order.
    pub fn selected_slides(&self) -> Vec<SlideDescriptor> {
        filter_by_category(&self.slides, self.only)
    }

    /// Validate values that presets and overrides cannot guarantee.
    pub fn validate(&self) -> SlidecastResult<()> {
        self.dimensions().validate()?;
        if self.duration.is_zero() {
            return Err(SlidecastError::validation("duration must be non-zero"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.frame_count() > MAX_FRAMES {
            return Err(SlidecastError::validation(format!(
                "{} frames exceed the frame-name capacity of {MAX_FRAMES}",
                self.frame_count()
            )));
        }
        crate::slides::catalog::validate_catalog(&self.slides)?;
        Ok(())
    }

    /// Apply overrides; invalid values are logged and ignored, keeping the previous value.
    pub fn with_overrides(mut self, o: &ExportOverrides) -> Self {
        if let Some(name) = o.resolution.as_deref() {
            match ResolutionPreset::from_name(name) {
                Some(p) => self.resolution = p,
                None => tracing::warn!(
                    resolution = name,
                    kept = self.resolution.name(),
                    "unknown resolution preset ignored"
                ),
            }
        }
        if let Some(name) = o.quality.as_deref() {
            match QualityPreset::from_name(name) {
                Some(p) => self.quality = p,
                None => tracing::warn!(
                    quality = name,
                    kept = self.quality.name(),
                    "unknown quality preset ignored"
                ),
            }
        }
        match o.duration_secs {
            Some(0) => tracing::warn!("zero duration ignored"),
            Some(secs) => self.duration = Duration::from_secs(secs),
            None => {}
        }
        match o.fps {
            Some(0) => tracing::warn!("zero fps ignored"),
            Some(fps) => self.fps = Fps { num: fps, den: 1 },
            None => {}
        }
        if let Some(only) = o.only {
            self.only = Some(only);
        }
        if o.no_stills {
            self.include_stills = false;
        }
        if o.no_sync {
            self.sync_animations = false;
        }
        if let Some(method) = o.method {
            self.method = method;
        }
        if let Some(dir) = &o.base_dir {
            self.base_dir = dir.clone();
        }
        if let Some(dir) = &o.output_dir {
            self.scratch_dir = dir.join(".frames");
            self.output_dir = dir.clone();
        }
        if let Some(path) = &o.chrome_path {
            self.chrome_path = Some(path.clone());
        }
        self
    }
}

/// Per-invocation changes coming from CLI flags or the interactive menu.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportOverrides {
    /// Resolution preset name.
    pub resolution: Option<String>,
    /// Quality preset name.
    pub quality: Option<String>,
    /// Duration in whole seconds.
    pub duration_secs: Option<u64>,
    /// Integer frame rate.
    pub fps: Option<u32>,
    /// Category filter.
    pub only: Option<Category>,
    /// Skip still frames.
    pub no_stills: bool,
    /// Skip animation phase synchronization.
    pub no_sync: bool,
    /// Capture strategy.
    pub method: Option<CaptureMethodKind>,
    /// Slide base directory.
    pub base_dir: Option<PathBuf>,
    /// Output directory.
    pub output_dir: Option<PathBuf>,
    /// Chromium executable.
    pub chrome_path: Option<PathBuf>,
}

/// JSON project file. Every field is optional; absent fields keep the defaults.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    /// Slide base directory, relative to the project file.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    /// Output directory, relative to the project file.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Resolution preset name.
    #[serde(default)]
    pub resolution: Option<String>,
    /// Quality preset name.
    #[serde(default)]
    pub quality: Option<String>,
    /// Duration in seconds.
    #[serde(default)]
    pub duration_secs: Option<u64>,
    /// Integer frame rate.
    #[serde(default)]
    pub fps: Option<u32>,
    /// Capture strategy.
    #[serde(default)]
    pub method: Option<CaptureMethodKind>,
    /// Intermediate frame format.
    #[serde(default)]
    pub image_format: Option<ImageFormat>,
    /// Write still frames.
    #[serde(default)]
    pub include_stills: Option<bool>,
    /// Bundled encoder path, relative to the project file.
    #[serde(default)]
    pub bundled_ffmpeg: Option<PathBuf>,
    /// Replacement slide catalog.
    #[serde(default)]
    pub slides: Option<Vec<SlideDescriptor>>,
}

impl ProjectFile {
    /// Read and parse a project file.
    pub fn from_path(path: &Path) -> SlidecastResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open project file '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            SlidecastError::serde(format!("parse project file '{}': {e}", path.display()))
        })
    }

    /// Layer this file over `cfg`. Relative paths resolve against `root`.
    pub fn apply(self, mut cfg: ExportConfig, root: &Path) -> ExportConfig {
        let overrides = ExportOverrides {
            resolution: self.resolution,
            quality: self.quality,
            duration_secs: self.duration_secs,
            fps: self.fps,
            base_dir: self.base_dir.map(|p| root.join(p)),
            output_dir: self.output_dir.map(|p| root.join(p)),
            method: self.method,
            ..ExportOverrides::default()
        };
        cfg = cfg.with_overrides(&overrides);
        if let Some(fmt) = self.image_format {
            cfg.image_format = fmt;
        }
        if let Some(stills) = self.include_stills {
            cfg.include_stills = stills;
        }
        if let Some(p) = self.bundled_ffmpeg {
            cfg.bundled_ffmpeg = Some(root.join(p));
        }
        if let Some(slides) = self.slides {
            cfg.slides = slides;
        }
        cfg
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/export.rs"]
mod tests;
