use std::io::Cursor;
use std::time::Duration;

use super::*;
use crate::config::presets::{QualityPreset, ResolutionPreset};
use crate::foundation::error::SlidecastError;

fn run_script(
    script: &str,
    export: &mut dyn FnMut(&ExportConfig) -> SlidecastResult<RunSummary>,
) -> String {
    let mut menu = Menu::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
    let tmp = tempfile::tempdir().unwrap();
    let base = ExportConfig {
        output_dir: tmp.path().join("out"),
        ..ExportConfig::default()
    };
    menu.run(&base, export).unwrap();
    String::from_utf8(menu.into_output()).unwrap()
}

#[test]
fn quick_export_runs_with_hd_eight_seconds_and_no_stills() {
    let mut seen = Vec::new();
    let out = run_script("4\ny\n3\n", &mut |cfg| {
        seen.push(cfg.clone());
        Ok(RunSummary::default())
    });

    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].resolution, ResolutionPreset::Hd);
    assert_eq!(seen[0].duration, Duration::from_secs(8));
    assert!(!seen[0].include_stills);
    assert!(out.contains("Exported 0 of 0 slides"));
    assert!(out.contains("Thanks for using"));
}

#[test]
fn premium_and_category_presets() {
    let mut seen = Vec::new();
    run_script("5\ny\n1\n2\nyes\n1\n3\nY\n3\n", &mut |cfg| {
        seen.push(cfg.clone());
        Ok(RunSummary::default())
    });

    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].resolution, ResolutionPreset::Uhd);
    assert_eq!(seen[0].quality, QualityPreset::Ultra);
    assert_eq!(seen[0].duration, Duration::from_secs(15));
    assert_eq!(seen[1].only, Some(Category::Classic));
    assert_eq!(seen[2].only, Some(Category::Modern));
}

#[test]
fn invalid_choices_reprompt_and_decline_skips_export() {
    let mut calls = 0;
    let out = run_script("0\nabc\n1\nn\n9\n", &mut |_| {
        calls += 1;
        Ok(RunSummary::default())
    });
    assert_eq!(calls, 0);
    assert_eq!(out.matches("Invalid choice").count(), 2);
}

#[test]
fn custom_answers_fall_back_to_defaults() {
    let mut menu = Menu::new(Cursor::new(b"3\n4\n20\n2\n".to_vec()), Vec::new());
    let o = menu.custom_overrides().unwrap();
    assert_eq!(o.resolution.as_deref(), Some("uhd"));
    assert_eq!(o.quality.as_deref(), Some("ultra"));
    assert_eq!(o.duration_secs, Some(20));
    assert_eq!(o.only, Some(Category::Classic));

    let mut menu = Menu::new(Cursor::new(b"7\nx\nsoon\n5\n".to_vec()), Vec::new());
    let o = menu.custom_overrides().unwrap();
    assert_eq!(o.resolution.as_deref(), Some("fhd"));
    assert_eq!(o.quality.as_deref(), Some("high"));
    assert_eq!(o.duration_secs, Some(12));
    assert_eq!(o.only, None);
}

#[test]
fn failed_export_prints_hints_and_keeps_shell_alive() {
    let out = run_script("1\ny\n1\n8\n9\n", &mut |_| {
        Err(SlidecastError::dependency("ffmpeg not found"))
    });
    assert!(out.contains("Export failed: dependency error: ffmpeg not found"));
    assert!(out.contains("FFMPEG_PATH"));
    assert!(out.contains("Arctic Background Exporter Help"));
}

#[test]
fn view_exports_reports_empty_directory() {
    let out = run_script("7\n9\n", &mut |_| Ok(RunSummary::default()));
    assert!(out.contains("No exports found"));
}

#[test]
fn end_of_input_exits() {
    let mut calls = 0;
    let out = run_script("", &mut |_| {
        calls += 1;
        Ok(RunSummary::default())
    });
    assert_eq!(calls, 0);
    assert!(out.contains("Thanks for using"));
}

#[test]
fn continue_menu_defaults_to_exit() {
    let mut menu = Menu::new(Cursor::new(b"2\n1\nwhatever\n".to_vec()), Vec::new());
    assert_eq!(menu.next_step().unwrap(), NextStep::ViewExports);
    assert_eq!(menu.next_step().unwrap(), NextStep::MainMenu);
    assert_eq!(menu.next_step().unwrap(), NextStep::Exit);
}
