use crate::foundation::core::Resolution;

/// Named output resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPreset {
    /// 1280x720.
    Hd,
    /// 1920x1080.
    #[default]
    Fhd,
    /// 3840x2160.
    Uhd,
    /// 1366x768, common projector/laptop panel size.
    Presentation,
}

impl ResolutionPreset {
    /// All presets, in menu order.
    pub const ALL: [ResolutionPreset; 4] = [
        ResolutionPreset::Hd,
        ResolutionPreset::Fhd,
        ResolutionPreset::Uhd,
        ResolutionPreset::Presentation,
    ];

    /// Flag name (`hd`, `fhd`, `uhd`, `presentation`).
    pub fn name(self) -> &'static str {
        match self {
            ResolutionPreset::Hd => "hd",
            ResolutionPreset::Fhd => "fhd",
            ResolutionPreset::Uhd => "uhd",
            ResolutionPreset::Presentation => "presentation",
        }
    }

    /// Human label.
    pub fn label(self) -> &'static str {
        match self {
            ResolutionPreset::Hd => "HD",
            ResolutionPreset::Fhd => "Full HD",
            ResolutionPreset::Uhd => "4K UHD",
            ResolutionPreset::Presentation => "Presentation",
        }
    }

    /// Pixel dimensions.
    pub fn resolution(self) -> Resolution {
        let (width, height) = match self {
            ResolutionPreset::Hd => (1280, 720),
            ResolutionPreset::Fhd => (1920, 1080),
            ResolutionPreset::Uhd => (3840, 2160),
            ResolutionPreset::Presentation => (1366, 768),
        };
        Resolution { width, height }
    }

    /// Look up a preset by flag name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Named bundle of x264 encoder parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// crf 28, `fast`.
    Low,
    /// crf 23, `medium`.
    Medium,
    /// crf 18, `slow`.
    #[default]
    High,
    /// crf 15, `veryslow`.
    Ultra,
}

impl QualityPreset {
    /// All presets, in menu order.
    pub const ALL: [QualityPreset; 4] = [
        QualityPreset::Low,
        QualityPreset::Medium,
        QualityPreset::High,
        QualityPreset::Ultra,
    ];

    /// Flag name.
    pub fn name(self) -> &'static str {
        match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
            QualityPreset::Ultra => "ultra",
        }
    }

    /// x264 constant rate factor.
    pub fn crf(self) -> u8 {
        match self {
            QualityPreset::Low => 28,
            QualityPreset::Medium => 23,
            QualityPreset::High => 18,
            QualityPreset::Ultra => 15,
        }
    }

    /// x264 speed/quality preset.
    pub fn x264_preset(self) -> &'static str {
        match self {
            QualityPreset::Low => "fast",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "slow",
            QualityPreset::Ultra => "veryslow",
        }
    }

    /// Look up a preset by flag name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Still-image format used for captured frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ImageFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// JPEG at the given quality (0-100).
    Jpeg {
        /// Encoder quality.
        quality: u8,
    },
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg { .. } => "jpeg",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/presets.rs"]
mod tests;
