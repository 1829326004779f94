use super::*;

#[test]
fn defaults_from_empty_object() {
    let cfg = SceneConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, SceneConfig::default());
    assert!(cfg.animations_enabled);
    assert_eq!(cfg.speed(), 1.0);
}

#[test]
fn parses_camel_case_fields() {
    let json = r##"{
        "colorOverride": "#FF5C8A",
        "density": 1200,
        "speed": 0.5,
        "animationsEnabled": false,
        "tuning": { "glowRadius": 12.0 }
    }"##;
    let cfg = SceneConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.color_override, Some(Color::hex(0xFF5C8A)));
    assert_eq!(cfg.density, Some(1200));
    assert_eq!(cfg.speed(), 0.5);
    assert!(!cfg.animations_enabled);
    assert_eq!(cfg.tune("glowRadius", 3.0), 12.0);
    assert_eq!(cfg.tune("missing", 3.0), 3.0);
}

#[test]
fn rejects_unknown_fields_and_bad_speed() {
    let err = SceneConfig::from_reader(r#"{"sped": 1}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, SceneError::Serde(_)));

    let err = SceneConfig::from_reader(r#"{"speed": -1}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, SceneError::Validation(_)));
}

#[test]
fn only_density_feeds_generation_hash() {
    let base = SceneConfig::default();
    let cosmetic = SceneConfig {
        color_override: Some(Color::WHITE),
        speed: Some(3.0),
        animations_enabled: false,
        ..SceneConfig::default()
    };
    assert_eq!(base.generation_hash(), cosmetic.generation_hash());
    assert!(!base.regenerates(&cosmetic));

    let denser = SceneConfig {
        density: Some(5),
        ..SceneConfig::default()
    };
    assert_ne!(base.generation_hash(), denser.generation_hash());
    assert!(base.regenerates(&denser));
}

#[test]
fn from_path_reports_missing_file() {
    let err = SceneConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("not/here.json"));
}
