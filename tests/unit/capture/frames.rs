use super::*;

#[test]
fn frame_names_are_zero_padded() {
    assert_eq!(frame_file_name(FrameIndex(0), "png"), "frame_000000.png");
    assert_eq!(frame_file_name(FrameIndex(42), "jpeg"), "frame_000042.jpeg");
    assert_eq!(frame_file_name(FrameIndex(999_999), "png"), "frame_999999.png");
}

#[test]
fn sorted_names_follow_capture_order() {
    let tmp = tempfile::tempdir().unwrap();
    let mut seq = FrameSequence::create_in(tmp.path(), "slide", ImageFormat::Png).unwrap();
    for i in 0..120u64 {
        seq.write_frame(FrameIndex(i), i.to_string().as_bytes())
            .unwrap();
    }
    assert_eq!(seq.len(), 120);

    let contents: Vec<u64> = seq
        .frame_paths()
        .unwrap()
        .iter()
        .map(|p| std::fs::read_to_string(p).unwrap().parse().unwrap())
        .collect();
    assert_eq!(contents, (0..120).collect::<Vec<_>>());
}

#[test]
fn input_pattern_matches_frame_names() {
    let tmp = tempfile::tempdir().unwrap();
    let seq =
        FrameSequence::create_in(tmp.path(), "slide", ImageFormat::Jpeg { quality: 90 }).unwrap();
    let pattern = seq.input_pattern();
    assert_eq!(pattern.parent().unwrap(), seq.dir());
    assert_eq!(pattern.file_name().unwrap(), "frame_%06d.jpeg");
    assert!(seq.is_empty());
}

#[test]
fn out_of_order_writes_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let mut seq = FrameSequence::create_in(tmp.path(), "slide", ImageFormat::Png).unwrap();
    seq.write_frame(FrameIndex(0), b"a").unwrap();
    let err = seq.write_frame(FrameIndex(2), b"c").unwrap_err();
    assert!(matches!(err, SlidecastError::Capture(_)));
    assert_eq!(seq.len(), 1);
}

#[test]
fn directory_is_labelled_and_removed_on_cleanup() {
    let tmp = tempfile::tempdir().unwrap();
    let scratch = tmp.path().join(".frames");
    let mut seq = FrameSequence::create_in(&scratch, "arctic-title-classic", ImageFormat::Png)
        .unwrap();
    seq.write_frame(FrameIndex(0), b"a").unwrap();
    let dir = seq.dir().to_path_buf();
    assert!(
        dir.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("arctic-title-classic-")
    );

    seq.cleanup();
    assert!(!dir.exists());
    assert!(scratch.is_dir());
}

#[test]
fn directory_is_removed_on_drop() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = {
        let seq = FrameSequence::create_in(tmp.path(), "slide", ImageFormat::Png).unwrap();
        seq.dir().to_path_buf()
    };
    assert!(!dir.exists());
}
