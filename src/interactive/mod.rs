//! Numbered text menu over the export pipeline.
//!
//! The menu only produces [`ExportOverrides`]; the caller supplies the function that actually
//! runs an export, so the shell works the same against a real browser or a test double.

use std::io::{BufRead, Write};

use anyhow::Context as _;

use crate::{
    config::export::{ExportConfig, ExportOverrides},
    export::report::RunSummary,
    foundation::error::SlidecastResult,
    library::{LISTING_LIMIT, list_exports, render_listing},
    slides::catalog::Category,
};

/// Choice made in the main menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Run an export with these overrides after confirmation.
    Export {
        /// Short description shown before confirming.
        title: &'static str,
        /// Changes applied to the base configuration.
        overrides: ExportOverrides,
    },
    /// List files in the output directory.
    ViewExports,
    /// Print usage information.
    Help,
    /// Leave the shell.
    Exit,
}

/// Choice made after an export finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextStep {
    /// Back to the main menu.
    MainMenu,
    /// List exports, then ask again.
    ViewExports,
    /// Leave the shell.
    Exit,
}

const MAIN_MENU: &str = "\
Export Options:
==================
1. Export all backgrounds (recommended)
2. Export classic style only
3. Export modern style only
4. Quick export (8 seconds, HD, no stills)
5. Premium export (4K, maximum quality)
6. Custom export options
7. View existing exports
8. Help & information
9. Exit
";

const HELP: &str = "\
Arctic Background Exporter Help
===============================

What this does:
- Converts Arctic slide animations to MP4 video backgrounds
- Creates files you can use in PowerPoint, Google Slides and Keynote
- Exports both classic (flowing) and modern (minimal) styles

Background types:
- Title slides for presentation openings
- Section dividers for transitions between sections
- Data slides for charts, graphs and statistics

Usage tips:
- Start with \"Export all backgrounds\" for the complete set
- Full HD gives the best quality/size balance
- Run `slidecast check` if an export fails to start
";

/// Line-oriented menu reading answers from `input` and printing prompts to `output`.
pub struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    /// Menu over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the menu, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, text: &str) -> SlidecastResult<()> {
        self.output
            .write_all(text.as_bytes())
            .context("write to terminal")?;
        Ok(())
    }

    /// Print `prompt` and read one trimmed line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> SlidecastResult<Option<String>> {
        self.say(prompt)?;
        self.output.flush().context("flush terminal")?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line).context("read answer")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask a yes/no question; anything not starting with `y` is no.
    pub fn confirm(&mut self, prompt: &str) -> SlidecastResult<bool> {
        let answer = self.ask(prompt)?.unwrap_or_default();
        Ok(answer.to_ascii_lowercase().starts_with('y'))
    }

    /// Show the main menu until a valid choice is entered. End of input means exit.
    pub fn main_choice(&mut self) -> SlidecastResult<MenuAction> {
        loop {
            self.say(MAIN_MENU)?;
            let Some(choice) = self.ask("\nChoose an option (1-9): ")? else {
                return Ok(MenuAction::Exit);
            };
            let action = match choice.as_str() {
                "1" => MenuAction::Export {
                    title: "Exporting all Arctic backgrounds",
                    overrides: ExportOverrides::default(),
                },
                "2" => MenuAction::Export {
                    title: "Exporting classic Arctic backgrounds",
                    overrides: ExportOverrides {
                        only: Some(Category::Classic),
                        ..ExportOverrides::default()
                    },
                },
                "3" => MenuAction::Export {
                    title: "Exporting modern Arctic backgrounds",
                    overrides: ExportOverrides {
                        only: Some(Category::Modern),
                        ..ExportOverrides::default()
                    },
                },
                "4" => MenuAction::Export {
                    title: "Quick export: 8 seconds, HD (1280x720), no still frames",
                    overrides: quick_overrides(),
                },
                "5" => MenuAction::Export {
                    title: "Premium export: 4K (3840x2160), ultra quality, 15 seconds",
                    overrides: premium_overrides(),
                },
                "6" => MenuAction::Export {
                    title: "Custom export",
                    overrides: self.custom_overrides()?,
                },
                "7" => MenuAction::ViewExports,
                "8" => MenuAction::Help,
                "9" => MenuAction::Exit,
                _ => {
                    self.say("Invalid choice. Please try again.\n\n")?;
                    continue;
                }
            };
            return Ok(action);
        }
    }

    /// Ask for resolution, quality, duration and style. Invalid answers fall back to defaults.
    pub fn custom_overrides(&mut self) -> SlidecastResult<ExportOverrides> {
        self.say(
            "\nResolution options:\n\
             1. HD (1280x720) - Fast, smaller files\n\
             2. Full HD (1920x1080) - Recommended\n\
             3. 4K (3840x2160) - Maximum quality\n\
             4. Presentation (1366x768) - Standard displays\n",
        )?;
        let resolution = match self.ask("\nChoose resolution (1-4): ")?.as_deref() {
            Some("1") => "hd",
            Some("3") => "uhd",
            Some("4") => "presentation",
            _ => "fhd",
        };

        self.say(
            "\nQuality options:\n\
             1. Low - Fast export\n\
             2. Medium - Balanced\n\
             3. High - Recommended\n\
             4. Ultra - Maximum quality\n",
        )?;
        let quality = match self.ask("\nChoose quality (1-4): ")?.as_deref() {
            Some("1") => "low",
            Some("2") => "medium",
            Some("4") => "ultra",
            _ => "high",
        };

        let duration = self
            .ask("\nDuration in seconds (default 12): ")?
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(12);

        self.say(
            "\nStyle options:\n\
             1. All backgrounds\n\
             2. Classic only\n\
             3. Modern only\n",
        )?;
        let only = match self.ask("\nChoose style (1-3): ")?.as_deref() {
            Some("2") => Some(Category::Classic),
            Some("3") => Some(Category::Modern),
            _ => None,
        };

        Ok(ExportOverrides {
            resolution: Some(resolution.to_string()),
            quality: Some(quality.to_string()),
            duration_secs: Some(duration),
            only,
            ..ExportOverrides::default()
        })
    }

    /// Ask what to do after an export. Anything unrecognised exits.
    pub fn next_step(&mut self) -> SlidecastResult<NextStep> {
        self.say(
            "\nWhat would you like to do next?\n\
             1. Return to main menu\n\
             2. View exports\n\
             3. Exit\n",
        )?;
        Ok(match self.ask("\nChoose option (1-3): ")?.as_deref() {
            Some("1") => NextStep::MainMenu,
            Some("2") => NextStep::ViewExports,
            _ => NextStep::Exit,
        })
    }

    fn view_exports(&mut self, cfg: &ExportConfig) -> SlidecastResult<()> {
        let entries = list_exports(&cfg.output_dir);
        let listing = render_listing(&cfg.output_dir, &entries, LISTING_LIMIT);
        self.say(&format!("\n{listing}\n"))
    }

    /// Run the menu loop against `base`, calling `export` for every confirmed export.
    ///
    /// Export errors are reported and the shell keeps going; only terminal IO errors end it.
    pub fn run(
        &mut self,
        base: &ExportConfig,
        export: &mut dyn FnMut(&ExportConfig) -> SlidecastResult<RunSummary>,
    ) -> SlidecastResult<()> {
        self.say("Arctic Presentation Background Exporter\n=======================================\n\n")?;
        loop {
            match self.main_choice()? {
                MenuAction::Exit => break,
                MenuAction::Help => self.say(HELP)?,
                MenuAction::ViewExports => self.view_exports(base)?,
                MenuAction::Export { title, overrides } => {
                    self.say(&format!("\n{title}\n"))?;
                    if !self.confirm("Run export with these settings? (y/n): ")? {
                        continue;
                    }
                    let cfg = base.clone().with_overrides(&overrides);
                    match export(&cfg) {
                        Ok(summary) => self.say(&format!("\n{summary}\n"))?,
                        Err(e) => {
                            tracing::error!(error = %e, "export failed");
                            let mut text = format!("\nExport failed: {e}\nCommon solutions:\n");
                            for hint in e.hints() {
                                text.push_str(&format!("- {hint}\n"));
                            }
                            self.say(&text)?;
                        }
                    }
                    if !self.after_export(base)? {
                        break;
                    }
                }
            }
        }
        self.say("\nThanks for using the Arctic Background Exporter!\n")
    }

    /// Returns `false` when the user chose to exit.
    fn after_export(&mut self, cfg: &ExportConfig) -> SlidecastResult<bool> {
        loop {
            match self.next_step()? {
                NextStep::MainMenu => return Ok(true),
                NextStep::ViewExports => self.view_exports(cfg)?,
                NextStep::Exit => return Ok(false),
            }
        }
    }
}

/// Overrides of the "quick" preset: 8 s, HD, no still frames.
pub fn quick_overrides() -> ExportOverrides {
    ExportOverrides {
        resolution: Some("hd".to_string()),
        duration_secs: Some(8),
        no_stills: true,
        ..ExportOverrides::default()
    }
}

/// Overrides of the "premium" preset: 4K, ultra quality, 15 s.
pub fn premium_overrides() -> ExportOverrides {
    ExportOverrides {
        resolution: Some("uhd".to_string()),
        quality: Some("ultra".to_string()),
        duration_secs: Some(15),
        ..ExportOverrides::default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interactive/menu.rs"]
mod tests;
