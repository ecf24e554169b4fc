use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SlidecastError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SlidecastError::missing_input("x")
            .to_string()
            .contains("missing input:")
    );
    assert!(
        SlidecastError::browser("x")
            .to_string()
            .contains("browser error:")
    );
    assert!(
        SlidecastError::capture("x")
            .to_string()
            .contains("capture error:")
    );
    assert!(
        SlidecastError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        SlidecastError::dependency("x")
            .to_string()
            .contains("dependency error:")
    );
}

#[test]
fn only_dependency_errors_are_fatal() {
    assert!(SlidecastError::dependency("ffmpeg").is_fatal());
    assert!(!SlidecastError::encode("exit 1").is_fatal());
    assert!(!SlidecastError::missing_input("slide").is_fatal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SlidecastError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn every_error_has_troubleshooting_hints() {
    let errors = [
        SlidecastError::validation("x"),
        SlidecastError::missing_input("x"),
        SlidecastError::browser("x"),
        SlidecastError::capture("x"),
        SlidecastError::encode("x"),
        SlidecastError::dependency("x"),
        SlidecastError::serde("x"),
    ];
    for err in &errors {
        assert!(!err.hints().is_empty(), "{err}");
    }
    assert!(
        SlidecastError::dependency("ffmpeg")
            .hints()
            .iter()
            .any(|h| h.contains("FFMPEG_PATH"))
    );
}
