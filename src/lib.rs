//! slidecast exports the animated backgrounds of Arctic HTML slides as looping MP4 clips.
//!
//! A run drives headless Chromium through a [`BrowserHost`], hides every text element of a
//! slide, keeps its CSS animations running and records frames at a fixed rate. Frames are
//! encoded with `ffmpeg` into H.264 MP4 files laid out per category, next to optional still
//! frames and a Markdown usage guide.
//!
//! - Build an [`ExportConfig`] (defaults, [`ProjectFile`], [`ExportOverrides`])
//! - Run [`run_export`], or drive an [`Exporter`] with your own browser, encoder and clock
//! - Inspect the returned [`RunSummary`]
#![forbid(unsafe_code)]

mod foundation;

/// Headless browser seam and the Chromium implementation.
pub mod browser;
/// Frame capture strategies.
pub mod capture;
/// Presets and per-run configuration.
pub mod config;
/// `ffmpeg` encoding.
pub mod encode;
/// Run orchestration and reporting.
pub mod export;
/// Markdown usage guide.
pub mod guide;
/// Text-menu shell.
pub mod interactive;
/// Listing of existing exports.
pub mod library;
/// Slide catalog.
pub mod slides;

pub use crate::foundation::clock::{Clock, SystemClock};
pub use crate::foundation::core::{Fps, FrameIndex, Resolution};
pub use crate::foundation::error::{SlidecastError, SlidecastResult};

pub use crate::browser::{BrowserHost, PageGuard, SlidePage};
pub use crate::capture::{CaptureMethod, CapturePlan, CaptureStats};
pub use crate::config::export::{
    CaptureMethodKind, ExportConfig, ExportOverrides, ProjectFile, Timings,
};
pub use crate::config::presets::{ImageFormat, QualityPreset, ResolutionPreset};
pub use crate::encode::ffmpeg::{Encoder, EncoderSource};
pub use crate::encode::sink::{FrameRgba, FrameSink, InMemorySink, SinkConfig};
pub use crate::export::{
    ExportOutcome, ExportResult, Exporter, RunSummary, run_export, run_stills, run_with,
};
pub use crate::slides::catalog::{Category, SlideDescriptor, SlideKind, default_catalog};
