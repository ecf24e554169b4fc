/// Convenience result type used across slidecast.
pub type SlidecastResult<T> = Result<T, SlidecastError>;

/// Top-level error taxonomy used by exporter APIs.
///
/// Everything except [`SlidecastError::Dependency`] is local to a single slide: the run
/// records it in the summary and moves on to the next slide.
#[derive(thiserror::Error, Debug)]
pub enum SlidecastError {
    /// Invalid user-provided configuration or plan values.
    #[error("validation error: {0}")]
    Validation(String),

    /// A slide source file does not exist.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Browser launch, navigation or in-page evaluation failed.
    #[error("browser error: {0}")]
    Browser(String),

    /// Frame acquisition failed part-way through a capture.
    #[error("capture error: {0}")]
    Capture(String),

    /// The external encoder could not be spawned or exited non-zero.
    #[error("encode error: {0}")]
    Encode(String),

    /// A required system dependency (encoder, browser) is unavailable.
    #[error("dependency error: {0}")]
    Dependency(String),

    /// Errors when serializing or deserializing project files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlidecastError {
    /// Build a [`SlidecastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlidecastError::MissingInput`] value.
    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    /// Build a [`SlidecastError::Browser`] value.
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Build a [`SlidecastError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`SlidecastError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SlidecastError::Dependency`] value.
    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::Dependency(msg.into())
    }

    /// Build a [`SlidecastError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` when this error must abort the whole run rather than a single slide.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Dependency(_))
    }

    /// Troubleshooting steps printed when a run aborts with this error.
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            Self::Dependency(_) => &[
                "Install ffmpeg and make sure `ffmpeg -version` works, or set FFMPEG_PATH",
                "Install Chromium or Google Chrome, or pass --chrome <PATH>",
                "Run `slidecast check` to see what was found",
            ],
            Self::Browser(_) => &[
                "Run `slidecast check` to verify the Chromium installation",
                "Pass --chrome <PATH> to pick a specific browser binary",
                "Check that the machine has enough memory for a headless browser",
            ],
            Self::MissingInput(_) => &[
                "Ensure all slide HTML files exist in the slides/ directory",
                "Pass --base-dir to point at the presentation checkout",
            ],
            Self::Validation(_) | Self::Serde(_) => &[
                "Check the preset names and numeric flags passed on the command line",
                "Check the project file against `slidecast export --help`",
            ],
            Self::Capture(_) | Self::Encode(_) | Self::Other(_) => &[
                "Verify there is enough free disk space for frames and videos",
                "Try a smaller resolution or a shorter duration",
            ],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
