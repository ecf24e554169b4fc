use std::{ffi::OsStr, path::PathBuf, sync::Arc, time::Duration};

use headless_chrome::{
    Browser, LaunchOptions, Tab, protocol::cdp::Page::CaptureScreenshotFormatOption,
};

use crate::{
    browser::{BrowserHost, SlidePage},
    config::presets::ImageFormat,
    foundation::core::Resolution,
    foundation::error::{SlidecastError, SlidecastResult},
};

/// Launch settings for [`ChromeHost`].
#[derive(Clone, Debug)]
pub struct ChromeOptions {
    /// Window (and therefore viewport) size.
    pub viewport: Resolution,
    /// Explicit executable; auto-detected when `None`.
    pub executable: Option<PathBuf>,
    /// Per-call DevTools timeout.
    pub call_timeout: Duration,
}

impl ChromeOptions {
    /// Options for `viewport` with auto-detected executable.
    pub fn new(viewport: Resolution) -> Self {
        Self {
            viewport,
            executable: None,
            call_timeout: Duration::from_secs(30),
        }
    }
}

// Local file access plus no sandbox so slides can load sibling CSS/fonts from disk.
const CHROME_ARGS: [&str; 6] = [
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-web-security",
    "--allow-running-insecure-content",
    "--allow-file-access-from-files",
    "--hide-scrollbars",
];

/// A headless Chromium process. Dropping it shuts the browser down.
pub struct ChromeHost {
    browser: Browser,
    call_timeout: Duration,
}

impl ChromeHost {
    /// Launch headless Chromium sized to `opts.viewport`.
    #[tracing::instrument(skip(opts), fields(viewport = %opts.viewport))]
    pub fn launch(opts: &ChromeOptions) -> SlidecastResult<Self> {
        opts.viewport.validate()?;
        let args: Vec<&OsStr> = CHROME_ARGS.into_iter().map(OsStr::new).collect();
        let launch = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((opts.viewport.width, opts.viewport.height)))
            .path(opts.executable.clone())
            .idle_browser_timeout(Duration::from_secs(300))
            .args(args)
            .build()
            .map_err(|e| SlidecastError::browser(format!("invalid launch options: {e}")))?;

        let browser = Browser::new(launch).map_err(|e| {
            SlidecastError::browser(format!(
                "failed to launch headless Chromium (is it installed?): {e}"
            ))
        })?;
        tracing::info!("headless browser launched");
        Ok(Self {
            browser,
            call_timeout: opts.call_timeout,
        })
    }
}

impl BrowserHost for ChromeHost {
    fn open_page(&self) -> SlidecastResult<Box<dyn SlidePage>> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| SlidecastError::browser(format!("failed to open tab: {e}")))?;
        tab.set_default_timeout(self.call_timeout);
        Ok(Box::new(ChromePage { tab, closed: false }))
    }
}

/// One Chromium tab.
pub struct ChromePage {
    tab: Arc<Tab>,
    closed: bool,
}

impl SlidePage for ChromePage {
    fn navigate(&mut self, url: &str) -> SlidecastResult<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| SlidecastError::browser(format!("navigation to '{url}' failed: {e}")))?;
        Ok(())
    }

    fn evaluate(
        &mut self,
        script: &str,
        await_promise: bool,
    ) -> SlidecastResult<Option<serde_json::Value>> {
        let obj = self
            .tab
            .evaluate(script, await_promise)
            .map_err(|e| SlidecastError::browser(format!("script evaluation failed: {e}")))?;
        Ok(obj.value)
    }

    fn screenshot(&mut self, format: ImageFormat) -> SlidecastResult<Vec<u8>> {
        let (fmt, quality) = match format {
            ImageFormat::Png => (CaptureScreenshotFormatOption::Png, None),
            ImageFormat::Jpeg { quality } => {
                (CaptureScreenshotFormatOption::Jpeg, Some(u32::from(quality)))
            }
        };
        self.tab
            .capture_screenshot(fmt, quality, None, true)
            .map_err(|e| SlidecastError::capture(format!("screenshot failed: {e}")))
    }

    fn close(&mut self) -> SlidecastResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.tab
            .close(true)
            .map_err(|e| SlidecastError::browser(format!("failed to close tab: {e}")))?;
        Ok(())
    }
}

/// Locate a Chromium executable the way [`ChromeHost::launch`] would.
pub fn find_chrome(explicit: Option<&std::path::Path>) -> SlidecastResult<PathBuf> {
    if let Some(p) = explicit {
        if p.is_file() {
            return Ok(p.to_path_buf());
        }
        return Err(SlidecastError::dependency(format!(
            "Chromium executable '{}' does not exist",
            p.display()
        )));
    }
    headless_chrome::browser::default_executable().map_err(|e| {
        SlidecastError::dependency(format!("no Chromium/Chrome executable found: {e}"))
    })
}
