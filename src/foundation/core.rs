use std::time::Duration;

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Absolute 0-based index of a captured frame within one capture session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> SlidecastResult<Self> {
        if den == 0 {
            return Err(SlidecastError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SlidecastError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Integer frame rate (`n/1`).
    pub fn integer(num: u32) -> SlidecastResult<Self> {
        Self::new(num, 1)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Nominal spacing between two frames.
    pub fn frame_interval(self) -> Duration {
        let nanos = u128::from(self.den) * 1_000_000_000 / u128::from(self.num);
        Duration::from_nanos(nanos as u64)
    }

    /// Frame interval in milliseconds, for display.
    pub fn frame_interval_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of frames needed to cover `duration`: `ceil(duration / interval)`.
    ///
    /// Computed in integer milliseconds so that e.g. 12000 ms @ 30 fps is exactly 360.
    /// Counts beyond `u64::MAX` saturate.
    pub fn frames_for(self, duration: Duration) -> u64 {
        let ms = duration.as_millis();
        let numer = ms * u128::from(self.num);
        let denom = 1000 * u128::from(self.den);
        u64::try_from(numer.div_ceil(denom)).unwrap_or(u64::MAX)
    }

    /// `ffmpeg` rate argument (`num/den`, or just `num` for integer rates).
    pub fn ffmpeg_rate(self) -> String {
        if self.den == 1 {
            self.num.to_string()
        } else {
            format!("{}/{}", self.num, self.den)
        }
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{:.3}", self.as_f64())
        }
    }
}

/// Viewport / output dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a resolution, rejecting zero and odd sizes (yuv420p needs even dimensions).
    pub fn new(width: u32, height: u32) -> SlidecastResult<Self> {
        let res = Self { width, height };
        res.validate()?;
        Ok(res)
    }

    /// Validate that the resolution can be encoded as yuv420p.
    pub fn validate(self) -> SlidecastResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SlidecastError::validation(
                "resolution width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(SlidecastError::validation(
                "resolution width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }

    /// Size of one RGBA8 frame in bytes.
    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
