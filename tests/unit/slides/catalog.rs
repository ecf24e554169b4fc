use super::*;

#[test]
fn default_catalog_has_three_slides_per_category() {
    let all = default_catalog();
    assert_eq!(all.len(), 6);
    assert_eq!(filter_by_category(&all, Some(Category::Classic)).len(), 3);
    assert_eq!(filter_by_category(&all, Some(Category::Modern)).len(), 3);
    assert_eq!(filter_by_category(&all, None), all);
    validate_catalog(&all).unwrap();
}

#[test]
fn filter_preserves_catalog_order() {
    let modern = filter_by_category(&default_catalog(), Some(Category::Modern));
    let names: Vec<_> = modern.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "arctic-title-modern",
            "arctic-data-modern",
            "arctic-section-modern"
        ]
    );
}

#[test]
fn output_paths_are_category_partitioned() {
    let slide = &default_catalog()[0];
    let out = Path::new("out");
    assert_eq!(
        slide.video_path(out),
        Path::new("out/classic/arctic-title-classic-background.mp4")
    );
    assert_eq!(
        slide.still_path(out),
        Path::new("out/stills/arctic-title-classic-still.png")
    );
    assert_eq!(
        slide.source_path(Path::new("deck")),
        Path::new("deck/slides/slide-01-title.html")
    );
}

#[test]
fn duplicate_or_pathlike_names_are_rejected() {
    let mut slides = default_catalog();
    slides[1].name = slides[0].name.clone();
    assert!(validate_catalog(&slides).is_err());

    let mut slides = default_catalog();
    slides[0].name = "../escape".to_string();
    assert!(validate_catalog(&slides).is_err());
}

#[test]
fn descriptors_deserialize_from_lowercase_json() {
    let json = r#"{
        "file": "slides/custom.html",
        "name": "custom",
        "category": "modern",
        "kind": "section",
        "description": "Custom slide"
    }"#;
    let slide: SlideDescriptor = serde_json::from_str(json).unwrap();
    assert_eq!(slide.category, Category::Modern);
    assert_eq!(slide.kind, SlideKind::Section);
    assert_eq!(Category::from_name(" Classic "), Some(Category::Classic));
    assert_eq!(Category::from_name("retro"), None);
}

#[test]
fn project_catalog_entries_can_hide_their_own_panels() {
    let index: SlideDescriptor = serde_json::from_str(
        r#"{
            "file": "index.html",
            "name": "master",
            "category": "classic",
            "kind": "title",
            "description": "Master index background",
            "hide": [".master-header", ".quick-nav", ".templates-grid"]
        }"#,
    )
    .unwrap();
    assert_eq!(index.hide.len(), 3);
    assert_eq!(index.video_path(Path::new("out")), Path::new("out/classic/master-background.mp4"));

    assert!(default_catalog().iter().all(|s| s.hide.is_empty()));
    let json = serde_json::to_string(&default_catalog()[0]).unwrap();
    assert!(!json.contains("hide"));
}
