use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    browser::{
        BrowserHost, PageGuard, SlidePage, file_url,
        isolate::{isolate_background, synchronize_animations},
        wait_until_ready,
    },
    capture::{CaptureJob, CaptureMethod, CapturePlan, method_for},
    config::{export::ExportConfig, presets::ImageFormat},
    encode::ffmpeg::{Encoder, ensure_parent_dir},
    export::report::{ExportOutcome, ExportResult, RunSummary},
    foundation::{
        clock::Clock,
        error::{SlidecastError, SlidecastResult},
    },
    slides::catalog::SlideDescriptor,
};

/// Runs the per-slide export sequence against one browser and one encoder.
///
/// Per slide:
/// 1. existence check of the source document
/// 2. open a page, navigate, wait for load and fonts
/// 3. isolate the background and optionally restart animations
/// 4. record and encode through the configured [`CaptureMethod`]
/// 5. optional still frame, then stat the output
///
/// Slides are independent: a failure is recorded and the next slide is attempted.
pub struct Exporter<'a> {
    cfg: &'a ExportConfig,
    host: &'a dyn BrowserHost,
    encoder: Option<&'a Encoder>,
    clock: &'a dyn Clock,
    method: Box<dyn CaptureMethod>,
}

impl<'a> Exporter<'a> {
    /// Exporter using the capture method selected in `cfg`.
    pub fn new(
        cfg: &'a ExportConfig,
        host: &'a dyn BrowserHost,
        encoder: &'a Encoder,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            cfg,
            host,
            encoder: Some(encoder),
            clock,
            method: method_for(cfg.method),
        }
    }

    /// Exporter able to capture still frames only; [`Exporter::run`] fails without an encoder.
    pub fn stills_only(
        cfg: &'a ExportConfig,
        host: &'a dyn BrowserHost,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            cfg,
            host,
            encoder: None,
            clock,
            method: method_for(cfg.method),
        }
    }

    /// Replace the capture method.
    pub fn with_method(mut self, method: Box<dyn CaptureMethod>) -> Self {
        self.method = method;
        self
    }

    fn resolution_label(&self) -> String {
        format!(
            "{} ({})",
            self.cfg.resolution.label(),
            self.cfg.dimensions()
        )
    }

    /// Export every selected slide.
    ///
    /// Only errors that make further slides pointless (see [`SlidecastError::is_fatal`]) are
    /// returned; everything else ends up in the summary.
    #[tracing::instrument(skip_all, fields(method = self.method.name()))]
    pub fn run(&self) -> SlidecastResult<RunSummary> {
        let encoder = self
            .encoder
            .ok_or_else(|| SlidecastError::dependency("no video encoder configured"))?;
        let plan = CapturePlan::from_config(self.cfg)?;
        let slides = self.cfg.selected_slides();
        tracing::info!(
            slides = slides.len(),
            frames = plan.frame_count,
            resolution = %plan.resolution,
            fps = %plan.fps,
            "starting export"
        );

        let mut summary = RunSummary::default();
        for slide in &slides {
            let outcome = match self.export_slide(slide, &plan, encoder) {
                Ok(outcome) => outcome,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!(slide = %slide.name, error = %e, "export failed");
                    ExportOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            summary.push(self.result(slide, outcome));
        }

        tracing::info!(
            exported = summary.exported_count(),
            failed = summary.failed_count(),
            "export finished"
        );
        Ok(summary)
    }

    /// Export still frames only, one PNG per selected slide.
    #[tracing::instrument(skip_all)]
    pub fn run_stills(&self) -> SlidecastResult<RunSummary> {
        let mut summary = RunSummary::default();
        for slide in self.cfg.selected_slides() {
            let outcome = match self.export_still(&slide) {
                Ok(outcome) => outcome,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!(slide = %slide.name, error = %e, "still export failed");
                    ExportOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            summary.push(self.result(&slide, outcome));
        }
        Ok(summary)
    }

    fn result(&self, slide: &SlideDescriptor, outcome: ExportOutcome) -> ExportResult {
        ExportResult {
            slide: slide.name.clone(),
            category: slide.category,
            resolution: self.resolution_label(),
            outcome,
        }
    }

    /// Export one slide to `{out}/{category}/{name}-background.mp4`.
    #[tracing::instrument(skip_all, fields(slide = %slide.name))]
    pub fn export_slide(
        &self,
        slide: &SlideDescriptor,
        plan: &CapturePlan,
        encoder: &Encoder,
    ) -> SlidecastResult<ExportOutcome> {
        tracing::info!(category = %slide.category, "exporting slide");
        let mut guard = self.prepare_page(slide)?;

        let out_path = slide.video_path(&self.cfg.output_dir);
        let job = CaptureJob {
            label: &slide.name,
            out_path: &out_path,
            scratch_dir: &self.cfg.scratch_dir,
        };
        let stats = self
            .method
            .record(guard.page(), self.clock, plan, &job, encoder)?;

        let still = if self.cfg.include_stills {
            match self.capture_still(guard.page(), slide) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, "still frame skipped");
                    None
                }
            }
        } else {
            None
        };

        let bytes = output_size(&out_path)?;
        tracing::info!(
            output = %out_path.display(),
            bytes,
            frames = stats.frames,
            "slide exported"
        );
        Ok(ExportOutcome::Exported {
            output: out_path,
            bytes,
            still,
            frames: stats.frames,
        })
    }

    /// Capture only the still frame of `slide`.
    #[tracing::instrument(skip_all, fields(slide = %slide.name))]
    pub fn export_still(&self, slide: &SlideDescriptor) -> SlidecastResult<ExportOutcome> {
        let mut guard = self.prepare_page(slide)?;
        let path = self.capture_still(guard.page(), slide)?;
        let bytes = output_size(&path)?;
        Ok(ExportOutcome::Exported {
            output: path,
            bytes,
            still: None,
            frames: 1,
        })
    }

    /// Open a page on `slide` with text hidden and the background animating.
    ///
    /// The returned guard closes the page when dropped.
    fn prepare_page(&self, slide: &SlideDescriptor) -> SlidecastResult<PageGuard> {
        let source = slide.source_path(&self.cfg.base_dir);
        if !source.is_file() {
            return Err(SlidecastError::missing_input(format!(
                "slide file not found: {}",
                source.display()
            )));
        }
        let url = file_url(&source)?;

        let mut guard = PageGuard::new(self.host.open_page()?);
        let timings = &self.cfg.timings;
        let page = guard.page();
        page.navigate(&url)?;
        wait_until_ready(page, timings, self.clock)?;
        isolate_background(page, slide, timings, self.clock)?;
        if self.cfg.sync_animations {
            synchronize_animations(page, timings, self.clock)?;
        }
        Ok(guard)
    }

    fn capture_still(
        &self,
        page: &mut dyn SlidePage,
        slide: &SlideDescriptor,
    ) -> SlidecastResult<PathBuf> {
        self.clock.sleep(self.cfg.timings.still_delay);
        let bytes = page.screenshot(ImageFormat::Png)?;
        let path = slide.still_path(&self.cfg.output_dir);
        ensure_parent_dir(&path)?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("write still frame '{}'", path.display()))?;
        Ok(path)
    }
}

/// Size of a finished output; missing or empty files are encode failures.
pub fn output_size(path: &Path) -> SlidecastResult<u64> {
    let meta = std::fs::metadata(path).map_err(|e| {
        SlidecastError::encode(format!("output '{}' was not created: {e}", path.display()))
    })?;
    if meta.len() == 0 {
        return Err(SlidecastError::encode(format!(
            "output '{}' is empty",
            path.display()
        )));
    }
    Ok(meta.len())
}
