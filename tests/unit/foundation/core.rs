use super::*;

#[test]
fn hex_color_parses_long_and_short_forms() {
    assert_eq!(
        HexColor::parse("#ff8000").unwrap(),
        HexColor {
            r: 255,
            g: 128,
            b: 0
        }
    );
    assert_eq!(HexColor::parse("FFF").unwrap(), HexColor::WHITE);
    assert_eq!(HexColor::parse("#000").unwrap().to_hex(), "#000000");
}

#[test]
fn hex_color_rejects_garbage() {
    assert!(HexColor::parse("#12").is_err());
    assert!(HexColor::parse("#gggggg").is_err());
    assert!(HexColor::parse("").is_err());
    assert!(HexColor::parse("#ééé").is_err());
}

#[test]
fn clamp_percent_bounds_and_nan() {
    assert_eq!(clamp_percent(-3.0), 0.0);
    assert_eq!(clamp_percent(130.0), 100.0);
    assert_eq!(clamp_percent(42.5), 42.5);
    assert_eq!(clamp_percent(f64::NAN), 0.0);
}

#[test]
fn percent_to_px_uses_natural_dimensions() {
    let c = Canvas {
        width: 400,
        height: 200,
    };
    assert_eq!(c.percent_to_px(50.0, 50.0), Point::new(200.0, 100.0));
    assert_eq!(c.percent_to_px(100.0, 0.0), Point::new(400.0, 0.0));
}

#[test]
fn rng_is_deterministic_and_in_range() {
    let mut a = Rng64::new(7);
    let mut b = Rng64::new(7);
    for _ in 0..100 {
        let v = a.range(20.0, 80.0);
        assert_eq!(v, b.range(20.0, 80.0));
        assert!((20.0..80.0).contains(&v));
    }
}
