use super::*;

#[test]
fn defaults_point_at_platform_data_dir() {
    let cfg = AppConfig::default();
    assert!(cfg.data_dir.ends_with("glowup") || cfg.data_dir.ends_with(".glowup"));
    assert_eq!(cfg.public_base_url, DEFAULT_PUBLIC_URL);
    assert_eq!(cfg.font_dir, None);
}

#[test]
fn partial_file_keeps_defaults_for_missing_fields() {
    let cfg = AppConfig::from_json_str(r#"{ "sticker_seed": 9 }"#).unwrap();
    assert_eq!(cfg.sticker_seed, Some(9));
    assert_eq!(cfg.public_base_url, DEFAULT_PUBLIC_URL);
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(matches!(
        AppConfig::from_json_str(r#"{ "bucket": "x" }"#),
        Err(GlowupError::Validation(_))
    ));
}

#[test]
fn env_overrides_file_values() {
    let mut cfg = AppConfig::from_json_str(
        r#"{ "data_dir": "/from/file", "public_base_url": "http://file" }"#,
    )
    .unwrap();
    cfg.apply_env_with(|key| match key {
        ENV_DATA_DIR => Some("/from/env".to_string()),
        ENV_PUBLIC_URL => Some("   ".to_string()),
        ENV_FONT_DIR => Some("/fonts".to_string()),
        _ => None,
    });

    assert_eq!(cfg.data_dir, PathBuf::from("/from/env"));
    assert_eq!(cfg.public_base_url, "http://file");
    assert_eq!(cfg.font_dir, Some(PathBuf::from("/fonts")));
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(AppConfig::from_path(Path::new("target/glowup-no-such-config.json")).is_err());
}

#[test]
fn missing_font_dir_is_a_font_error() {
    let cfg = AppConfig {
        font_dir: Some(PathBuf::from("target/glowup-no-such-fonts")),
        ..AppConfig::default()
    };
    assert!(matches!(cfg.font_book(), Err(GlowupError::Font(_))));
}
