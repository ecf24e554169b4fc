//! Markdown usage guide written next to the exported backgrounds.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;

use crate::{
    config::export::ExportConfig,
    export::report::{ExportOutcome, RunSummary, format_megabytes},
    foundation::error::SlidecastResult,
    slides::catalog::{Category, filter_by_category},
};

/// File name of the guide inside the output directory.
pub const GUIDE_FILE_NAME: &str = "BACKGROUNDS_GUIDE.md";

/// Guide for one run. Render with [`ToString`] or write with [`write_guide`].
pub struct Guide<'a> {
    cfg: &'a ExportConfig,
    summary: &'a RunSummary,
    generated: NaiveDate,
}

impl<'a> Guide<'a> {
    /// Guide describing `summary` for a run configured by `cfg`.
    pub fn new(cfg: &'a ExportConfig, summary: &'a RunSummary, generated: NaiveDate) -> Self {
        Self {
            cfg,
            summary,
            generated,
        }
    }

    fn summary_section(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let res = self.cfg.dimensions();
        writeln!(f, "## Export Summary")?;
        writeln!(f)?;
        writeln!(
            f,
            "- **Backgrounds Exported:** {}",
            self.summary.exported_count()
        )?;
        writeln!(f, "- **Failed Exports:** {}", self.summary.failed_count())?;
        writeln!(
            f,
            "- **Total File Size:** {}",
            format_megabytes(self.summary.total_bytes())
        )?;
        writeln!(
            f,
            "- **Resolution:** {} ({}×{})",
            self.cfg.resolution.label(),
            res.width,
            res.height
        )?;
        writeln!(
            f,
            "- **Duration:** {} seconds each",
            self.cfg.duration.as_secs_f64()
        )?;
        writeln!(f, "- **Format:** MP4 (H.264)")?;
        writeln!(f)
    }

    fn structure_section(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## File Structure")?;
        writeln!(f)?;
        writeln!(f, "```")?;
        writeln!(f, "{}/", self.cfg.output_dir.display())?;
        for category in Category::ALL {
            let slides = filter_by_category(&self.cfg.selected_slides(), Some(category));
            if slides.is_empty() {
                continue;
            }
            writeln!(f, "├── {category}/")?;
            for (i, slide) in slides.iter().enumerate() {
                let branch = if i + 1 == slides.len() { "└──" } else { "├──" };
                writeln!(f, "│   {branch} {}-background.mp4", slide.name)?;
            }
        }
        if self.cfg.include_stills {
            writeln!(f, "├── stills/")?;
            writeln!(f, "│   └── [slide-name]-still.png")?;
        }
        writeln!(f, "└── {GUIDE_FILE_NAME}")?;
        writeln!(f, "```")?;
        writeln!(f)
    }

    fn categories_section(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Background Types")?;
        for category in Category::ALL {
            let slides = filter_by_category(&self.cfg.selected_slides(), Some(category));
            if slides.is_empty() {
                continue;
            }
            writeln!(f)?;
            match category {
                Category::Classic => writeln!(f, "### Classic Arctic Style")?,
                Category::Modern => writeln!(f, "### Modern Arctic Style")?,
            }
            for slide in &slides {
                writeln!(f, "- **{}**: {}", slide.name, slide.description)?;
            }
        }
        writeln!(f)
    }

    fn import_section(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            "## PowerPoint Integration

1. **Design** → **Slide Size** → **Widescreen (16:9)**
2. **Right-click slide** → **Format Background**
3. **Picture or Texture Fill** → **File**, then select the MP4 background
4. Enable **Loop** and **Apply to All Slides**
5. Use **Send to Back** to layer content over the background

## Google Slides Integration

1. **Insert** → **Video** → **Upload**
2. Select the MP4 background file
3. Resize it to fill the slide
4. **Video options** → **Loop**
5. **Send to back** for layering

",
        )
    }

    fn specs_section(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Technical Specifications")?;
        writeln!(f)?;
        writeln!(f, "- **Video Codec:** H.264 (libx264, yuv420p)")?;
        writeln!(f, "- **Frame Rate:** {} fps", self.cfg.fps)?;
        writeln!(
            f,
            "- **Quality:** {} (CRF {}, preset {})",
            self.cfg.quality.name(),
            self.cfg.quality.crf(),
            self.cfg.quality.x264_preset()
        )?;
        writeln!(
            f,
            "- **Duration:** {}s (seamless loop)",
            self.cfg.duration.as_secs_f64()
        )?;
        writeln!(f, "- **Compatibility:** PowerPoint 2016+, Google Slides, Keynote")?;
        writeln!(f)
    }

    fn results_section(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Exported Backgrounds")?;
        for result in self.summary.exported() {
            let ExportOutcome::Exported {
                output,
                bytes,
                still,
                ..
            } = &result.outcome
            else {
                continue;
            };
            writeln!(f)?;
            writeln!(f, "### {}", result.slide)?;
            writeln!(f, "- **Category:** {}", result.category)?;
            writeln!(f, "- **File:** `{}`", output.display())?;
            writeln!(f, "- **File Size:** {}", format_megabytes(*bytes))?;
            writeln!(f, "- **Resolution:** {}", result.resolution)?;
            if let Some(still) = still {
                writeln!(f, "- **Still Frame:** `{}`", still.display())?;
            }
        }
        writeln!(f)?;

        if self.summary.failed_count() > 0 {
            writeln!(f, "## Failed Exports")?;
            writeln!(f)?;
            for result in self.summary.failed() {
                writeln!(
                    f,
                    "- **{}**: {}",
                    result.slide,
                    result.error().unwrap_or("unknown error")
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Guide<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Arctic Presentation Backgrounds")?;
        writeln!(f)?;
        self.summary_section(f)?;
        self.structure_section(f)?;
        self.categories_section(f)?;
        self.import_section(f)?;
        self.specs_section(f)?;
        self.results_section(f)?;
        writeln!(f, "---")?;
        writeln!(f, "*Export Date: {}*", self.generated.format("%Y-%m-%d"))?;
        writeln!(
            f,
            "*Total Files: {} assets*",
            self.summary.exported_count() + self.summary.still_count()
        )
    }
}

/// Path the guide is written to for `output_dir`.
pub fn guide_path(output_dir: &Path) -> PathBuf {
    output_dir.join(GUIDE_FILE_NAME)
}

/// Render and write the guide into the output directory.
pub fn write_guide(
    cfg: &ExportConfig,
    summary: &RunSummary,
    generated: NaiveDate,
) -> SlidecastResult<PathBuf> {
    let path = guide_path(&cfg.output_dir);
    std::fs::create_dir_all(&cfg.output_dir).with_context(|| {
        format!(
            "create output directory '{}'",
            cfg.output_dir.display()
        )
    })?;
    let text = Guide::new(cfg, summary, generated).to_string();
    std::fs::write(&path, text).with_context(|| format!("write guide '{}'", path.display()))?;
    tracing::info!(path = %path.display(), "usage guide written");
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/guide/guide.rs"]
mod tests;
