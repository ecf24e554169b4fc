use std::path::{Path, PathBuf};

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Visual style family a slide belongs to. Also the output sub-directory name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Flowing, organic Arctic backgrounds.
    Classic,
    /// Clean, minimal Arctic backgrounds.
    Modern,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 2] = [Category::Classic, Category::Modern];

    /// Lowercase name used for directories and flags.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Classic => "classic",
            Category::Modern => "modern",
        }
    }

    /// Parse a lowercase category name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" => Some(Category::Classic),
            "modern" => Some(Category::Modern),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of the slide in a deck. Carried through to the isolator but never branched on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    /// Deck opener.
    Title,
    /// Section divider.
    Section,
    /// Chart / statistics background.
    Data,
}

impl SlideKind {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            SlideKind::Title => "title",
            SlideKind::Section => "section",
            SlideKind::Data => "data",
        }
    }
}

/// One slide document to export.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SlideDescriptor {
    /// Source HTML path, relative to the configured base directory.
    pub file: PathBuf,
    /// Output stem, e.g. `arctic-title-classic`.
    pub name: String,
    /// Style family.
    pub category: Category,
    /// Slide role.
    pub kind: SlideKind,
    /// Human description used in the generated guide.
    pub description: String,
    /// Extra selectors hidden on this page only, e.g. the master index's navigation panels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hide: Vec<String>,
}

impl SlideDescriptor {
    /// Build a descriptor.
    pub fn new(
        file: impl Into<PathBuf>,
        name: impl Into<String>,
        category: Category,
        kind: SlideKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
            category,
            kind,
            description: description.into(),
            hide: Vec::new(),
        }
    }

    /// Also hide elements matching `selectors` on this page.
    pub fn with_hidden<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hide.extend(selectors.into_iter().map(Into::into));
        self
    }

    /// Absolute-or-relative source path under `base_dir`.
    pub fn source_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.file)
    }

    /// Video output path: `{out}/{category}/{name}-background.mp4`.
    pub fn video_path(&self, out_dir: &Path) -> PathBuf {
        out_dir
            .join(self.category.as_str())
            .join(format!("{}-background.mp4", self.name))
    }

    /// Still output path: `{out}/stills/{name}-still.png`.
    pub fn still_path(&self, out_dir: &Path) -> PathBuf {
        out_dir
            .join("stills")
            .join(format!("{}-still.png", self.name))
    }
}

/// The six slides shipped with the Arctic template.
pub fn default_catalog() -> Vec<SlideDescriptor> {
    use Category::{Classic, Modern};
    use SlideKind::{Data, Section, Title};

    vec![
        SlideDescriptor::new(
            "slides/slide-01-title.html",
            "arctic-title-classic",
            Classic,
            Title,
            "Classic Arctic title slide with flowing background elements",
        ),
        SlideDescriptor::new(
            "slides/slide-02-section-divider.html",
            "arctic-section-classic",
            Classic,
            Section,
            "Classic section divider with wave animation",
        ),
        SlideDescriptor::new(
            "slides/slide-03-data-insights.html",
            "arctic-data-classic",
            Classic,
            Data,
            "Classic data visualization background",
        ),
        SlideDescriptor::new(
            "slides/slide-modern-01-title.html",
            "arctic-title-modern",
            Modern,
            Title,
            "Modern minimalist title slide with subtle animations",
        ),
        SlideDescriptor::new(
            "slides/slide-modern-02-data.html",
            "arctic-data-modern",
            Modern,
            Data,
            "Modern data background with clean geometric elements",
        ),
        SlideDescriptor::new(
            "slides/slide-modern-03-section.html",
            "arctic-section-modern",
            Modern,
            Section,
            "Modern section divider with contemporary design",
        ),
    ]
}

/// Keep only slides of `only` (all slides when `None`), preserving catalog order.
pub fn filter_by_category(
    slides: &[SlideDescriptor],
    only: Option<Category>,
) -> Vec<SlideDescriptor> {
    slides
        .iter()
        .filter(|s| only.is_none_or(|c| s.category == c))
        .cloned()
        .collect()
}

/// Reject catalogs whose output names collide or are unusable as file stems.
pub fn validate_catalog(slides: &[SlideDescriptor]) -> SlidecastResult<()> {
    let mut seen = std::collections::HashSet::new();
    for s in slides {
        if s.name.is_empty() || s.name.contains(['/', '\\']) {
            return Err(SlidecastError::validation(format!(
                "slide name '{}' is not a valid file stem",
                s.name
            )));
        }
        if !seen.insert(s.name.as_str()) {
            return Err(SlidecastError::validation(format!(
                "duplicate slide name '{}'",
                s.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/slides/catalog.rs"]
mod tests;
