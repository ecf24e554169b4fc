//! Headless browser seam.
//!
//! The exporter talks to the browser only through [`BrowserHost`] and [`SlidePage`]. The
//! Chromium implementation lives in [`chrome`]; tests substitute scripted fakes.

use std::path::Path;

use anyhow::Context as _;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{
    config::{export::Timings, presets::ImageFormat},
    foundation::clock::Clock,
    foundation::error::{SlidecastError, SlidecastResult},
};

/// Chromium over the DevTools protocol.
pub mod chrome;
/// Background isolation and animation restart scripts.
pub mod isolate;

/// One open document (a browser tab).
pub trait SlidePage {
    /// Navigate to `url` and wait for the navigation to commit.
    fn navigate(&mut self, url: &str) -> SlidecastResult<()>;
    /// Evaluate a JavaScript expression; returns its JSON value when it has one.
    fn evaluate(
        &mut self,
        script: &str,
        await_promise: bool,
    ) -> SlidecastResult<Option<serde_json::Value>>;
    /// Capture the current viewport as encoded image bytes.
    fn screenshot(&mut self, format: ImageFormat) -> SlidecastResult<Vec<u8>>;
    /// Close the page. Must be safe to call more than once.
    fn close(&mut self) -> SlidecastResult<()>;
}

/// A running browser able to open pages sized to the export viewport.
pub trait BrowserHost {
    /// Open a fresh page.
    fn open_page(&self) -> SlidecastResult<Box<dyn SlidePage>>;
}

/// Closes the wrapped page when dropped, so every exit path of a slide releases its tab.
pub struct PageGuard {
    page: Box<dyn SlidePage>,
}

impl PageGuard {
    /// Take ownership of `page`.
    pub fn new(page: Box<dyn SlidePage>) -> Self {
        Self { page }
    }

    /// Borrow the page.
    pub fn page(&mut self) -> &mut dyn SlidePage {
        self.page.as_mut()
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        if let Err(e) = self.page.close() {
            tracing::warn!(error = %e, "failed to close page");
        }
    }
}

/// Bytes kept literal in a `file://` path; everything else is percent-encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b':');

/// Build a `file://` URL for a local slide document.
pub fn file_url(path: &Path) -> SlidecastResult<String> {
    let abs = std::fs::canonicalize(path)
        .with_context(|| format!("resolve slide path '{}'", path.display()))?;
    let raw = abs.to_string_lossy().replace('\\', "/");
    let raw = raw.strip_prefix("//?/").unwrap_or(&raw);

    let sep = if raw.starts_with('/') { "" } else { "/" };
    Ok(format!(
        "file://{sep}{}",
        utf8_percent_encode(raw, PATH_SEGMENT)
    ))
}

const READY_POLL: std::time::Duration = std::time::Duration::from_millis(100);

/// Wait for the document to finish loading, then for web fonts, with the configured settles.
pub fn wait_until_ready(
    page: &mut dyn SlidePage,
    timings: &Timings,
    clock: &dyn Clock,
) -> SlidecastResult<()> {
    let started = clock.now();
    loop {
        let state = page.evaluate("document.readyState", false)?;
        if state.as_ref().and_then(|v| v.as_str()) == Some("complete") {
            break;
        }
        if clock.now().duration_since(started) >= timings.navigation_timeout {
            return Err(SlidecastError::browser(format!(
                "document not ready after {:?}",
                timings.navigation_timeout
            )));
        }
        clock.sleep(READY_POLL);
    }

    clock.sleep(timings.load_settle);
    page.evaluate("document.fonts.ready.then(() => true)", true)?;
    clock.sleep(timings.fonts_settle);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/browser/ready.rs"]
mod tests;
