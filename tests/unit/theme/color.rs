use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgb(255, 0, 0));

    let c: Color = serde_json::from_value(json!("0000ff80")).unwrap();
    assert_eq!(c, Color::rgba(0, 0, 255, 0x80));

    assert!(Color::parse("#12345").is_err());
    assert!(Color::parse("#gg0000").is_err());
}

#[test]
fn parses_rgba_object_and_array() {
    let c: Color = serde_json::from_value(json!({"r": 1.0, "g": 0.5, "b": 0.0})).unwrap();
    assert_eq!(c, Color::rgb(255, 128, 0));

    let c: Color = serde_json::from_value(json!([0.0, 0.0, 1.0, 0.5])).unwrap();
    assert_eq!(c, Color::rgba(0, 0, 255, 128));

    assert!(serde_json::from_value::<Color>(json!([1.0, 2.0])).is_err());
}

#[test]
fn parses_hsla_object() {
    let c: Color = serde_json::from_value(json!({"h": 120.0, "s": 1.0, "l": 0.5})).unwrap();
    assert_eq!(c, Color::rgb(0, 255, 0));
}

#[test]
fn serializes_as_hex() {
    assert_eq!(
        serde_json::to_value(Color::hex(0x7FFFD4)).unwrap(),
        json!("#7fffd4")
    );
    assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
}

#[test]
fn shade_saturates_per_channel() {
    let c = Color::rgb(250, 10, 128).shade(20);
    assert_eq!(c, Color::rgb(255, 30, 148));
    let d = Color::rgb(250, 10, 128).shade(-20);
    assert_eq!(d, Color::rgb(230, 0, 108));
}

#[test]
fn fade_and_mix() {
    assert_eq!(Color::WHITE.fade(0.5).a, 128);
    assert_eq!(Color::WHITE.scale_alpha(0.0).a, 0);
    let m = Color::BLACK.mix(Color::WHITE, 0.5);
    assert_eq!(m, Color::rgb(128, 128, 128));
    assert_eq!(Color::BLACK.mix(Color::WHITE, 7.0), Color::WHITE);
}
