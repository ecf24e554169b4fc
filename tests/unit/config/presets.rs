use super::*;

#[test]
fn resolution_presets_match_their_dimensions() {
    assert_eq!(
        ResolutionPreset::Hd.resolution(),
        Resolution {
            width: 1280,
            height: 720
        }
    );
    assert_eq!(ResolutionPreset::Uhd.resolution().width, 3840);
    assert_eq!(ResolutionPreset::Presentation.resolution().height, 768);
    for p in ResolutionPreset::ALL {
        p.resolution().validate().unwrap();
        assert_eq!(ResolutionPreset::from_name(p.name()), Some(p));
    }
}

#[test]
fn quality_presets_map_to_crf_and_speed() {
    assert_eq!(QualityPreset::Low.crf(), 28);
    assert_eq!(QualityPreset::Medium.x264_preset(), "medium");
    assert_eq!(QualityPreset::High.crf(), 18);
    assert_eq!(QualityPreset::Ultra.x264_preset(), "veryslow");
    assert_eq!(QualityPreset::default(), QualityPreset::High);
}

#[test]
fn unknown_names_do_not_resolve() {
    assert_eq!(ResolutionPreset::from_name("8k"), None);
    assert_eq!(QualityPreset::from_name("lossless"), None);
    assert_eq!(ResolutionPreset::from_name(" FHD "), Some(ResolutionPreset::Fhd));
}

#[test]
fn image_format_extensions() {
    assert_eq!(ImageFormat::Png.extension(), "png");
    assert_eq!(ImageFormat::Jpeg { quality: 90 }.extension(), "jpeg");
}
