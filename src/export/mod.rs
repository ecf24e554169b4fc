//! Run orchestration: one browser, one encoder, every selected slide in order.

use std::path::Path;

use chrono::NaiveDate;

use crate::{
    browser::{
        BrowserHost,
        chrome::{ChromeHost, ChromeOptions},
    },
    config::export::ExportConfig,
    encode::ffmpeg::Encoder,
    foundation::{
        clock::{Clock, SystemClock},
        error::SlidecastResult,
    },
    guide::write_guide,
};

/// Per-slide export sequence.
pub mod pipeline;
/// Per-slide results and run totals.
pub mod report;

pub use pipeline::Exporter;
pub use report::{ExportOutcome, ExportResult, RunSummary};

/// Export videos for `cfg` with the system clock, real Chromium and the located encoder.
///
/// A missing encoder or a browser that fails to launch aborts before any slide is processed.
pub fn run_export(cfg: &ExportConfig) -> SlidecastResult<RunSummary> {
    cfg.validate()?;
    let encoder = Encoder::locate(cfg.bundled_ffmpeg.as_deref())?;
    let host = launch_browser(cfg)?;
    let today = chrono::Local::now().date_naive();
    run_with(cfg, &host, &encoder, &SystemClock, today)
}

/// Export still frames only for `cfg`.
pub fn run_stills(cfg: &ExportConfig) -> SlidecastResult<RunSummary> {
    cfg.validate()?;
    let host = launch_browser(cfg)?;
    Exporter::stills_only(cfg, &host, &SystemClock).run_stills()
}

/// Export every selected slide, then write the usage guide dated `generated`.
pub fn run_with(
    cfg: &ExportConfig,
    host: &dyn BrowserHost,
    encoder: &Encoder,
    clock: &dyn Clock,
    generated: NaiveDate,
) -> SlidecastResult<RunSummary> {
    let summary = Exporter::new(cfg, host, encoder, clock).run()?;
    if let Err(e) = write_guide(cfg, &summary, generated) {
        tracing::warn!(error = %e, "failed to write usage guide");
    }
    remove_scratch_dir(&cfg.scratch_dir);
    Ok(summary)
}

/// Launch Chromium sized to the configured resolution.
pub fn launch_browser(cfg: &ExportConfig) -> SlidecastResult<ChromeHost> {
    let mut opts = ChromeOptions::new(cfg.dimensions());
    opts.executable = cfg.chrome_path.clone();
    opts.call_timeout = cfg.timings.navigation_timeout;
    ChromeHost::launch(&opts)
}

/// Remove the shared scratch directory if every per-slide directory is gone.
fn remove_scratch_dir(dir: &Path) {
    match std::fs::remove_dir(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "scratch directory left behind"),
    }
}
