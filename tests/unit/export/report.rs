use super::*;

fn exported(name: &str, bytes: u64, still: bool) -> ExportResult {
    ExportResult {
        slide: name.to_string(),
        category: Category::Classic,
        resolution: "Full HD (1920x1080)".to_string(),
        outcome: ExportOutcome::Exported {
            output: PathBuf::from(format!("out/classic/{name}-background.mp4")),
            bytes,
            still: still.then(|| PathBuf::from(format!("out/stills/{name}-still.png"))),
            frames: 360,
        },
    }
}

fn failed(name: &str, error: &str) -> ExportResult {
    ExportResult {
        slide: name.to_string(),
        category: Category::Modern,
        resolution: "Full HD (1920x1080)".to_string(),
        outcome: ExportOutcome::Failed {
            error: error.to_string(),
        },
    }
}

#[test]
fn summary_partitions_results_and_sums_sizes() {
    let mut summary = RunSummary::default();
    summary.push(exported("a", 3 * 1024 * 1024, true));
    summary.push(failed("b", "missing input: slides/b.html"));
    summary.push(exported("c", 1024 * 1024, false));

    assert_eq!(summary.exported_count(), 2);
    assert_eq!(summary.failed_count(), 1);
    assert_eq!(summary.total_bytes(), 4 * 1024 * 1024);
    assert_eq!(summary.still_count(), 1);

    let failed: Vec<_> = summary.failed().map(|r| r.slide.as_str()).collect();
    assert_eq!(failed, vec!["b"]);
    assert_eq!(
        summary.results[1].error(),
        Some("missing input: slides/b.html")
    );
    assert_eq!(summary.results[0].error(), None);
}

#[test]
fn megabytes_use_one_decimal() {
    assert_eq!(format_megabytes(0), "0.0 MB");
    assert_eq!(format_megabytes(1536 * 1024), "1.5 MB");
    assert_eq!(format_megabytes(12_900_000), "12.3 MB");
}

#[test]
fn display_lists_each_slide() {
    let mut summary = RunSummary::default();
    summary.push(exported("a", 2 * 1024 * 1024, false));
    summary.push(failed("b", "encode error: ffmpeg exited with status 1"));
    let text = summary.to_string();

    assert!(text.starts_with("Exported 1 of 2 slides (2.0 MB)\n"));
    assert!(text.contains("  ok   a -> out/classic/a-background.mp4 (2.0 MB)"));
    assert!(text.contains("  FAIL b: encode error: ffmpeg exited with status 1"));
}
