use super::*;

#[test]
fn every_preset_expression_parses() {
    for f in NamedFilter::ALL {
        let steps = parse_filter_expr(f.expression()).unwrap();
        assert_eq!(steps.is_empty(), f == NamedFilter::Original, "{}", f.name());
    }
}

#[test]
fn preset_steps_keep_declared_order() {
    assert_eq!(
        NamedFilter::Cool.steps(),
        vec![
            FilterFn::HueRotate { degrees: 180.0 },
            FilterFn::Saturate(1.2)
        ]
    );
    assert_eq!(
        NamedFilter::Vintage.steps(),
        vec![FilterFn::Sepia(0.5), FilterFn::Contrast(1.2)]
    );
}

#[test]
fn parse_accepts_units() {
    let steps = parse_filter_expr("brightness(150%) hue-rotate(0.5turn) blur(2px) sepia()")
        .unwrap();
    assert_eq!(
        steps,
        vec![
            FilterFn::Brightness(1.5),
            FilterFn::HueRotate { degrees: 180.0 },
            FilterFn::Blur { sigma_px: 2.0 },
            FilterFn::Sepia(1.0),
        ]
    );
    assert_eq!(parse_filter_expr("none").unwrap(), Vec::new());
}

#[test]
fn parse_rejects_malformed_input() {
    assert!(parse_filter_expr("glow(2)").is_err());
    assert!(parse_filter_expr("blur(3)").is_err());
    assert!(parse_filter_expr("contrast(-1)").is_err());
    assert!(parse_filter_expr("saturate(2").is_err());
    assert!(parse_filter_expr("hue-rotate(90)").is_err());
    assert!(parse_filter_expr("brightness(abc)").is_err());
}

#[test]
fn normalize_drops_identity_steps() {
    let steps = parse_filter_expr("brightness(1) contrast(100%) blur(0px) grayscale(0) sepia(0.2)")
        .unwrap();
    assert_eq!(normalize_steps(&steps), vec![FilterFn::Sepia(0.2)]);
}

#[test]
fn display_round_trips_through_parser() {
    let steps = NamedFilter::Soft.steps();
    let text = steps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(text, "brightness(1.1) contrast(0.9)");
    assert_eq!(parse_filter_expr(&text).unwrap(), steps);
}

#[test]
fn fmt_num_is_shortest_form() {
    assert_eq!(fmt_num(150.0), "150");
    assert_eq!(fmt_num(1.0), "1");
    assert_eq!(fmt_num(0.5), "0.5");
    assert_eq!(fmt_num(1.1), "1.1");
    assert_eq!(fmt_num(0.02), "0.02");
}

#[test]
fn preset_lookup_by_name() {
    assert_eq!(NamedFilter::from_name("b&w").unwrap(), NamedFilter::BlackWhite);
    assert_eq!(NamedFilter::from_name(" Drama ").unwrap(), NamedFilter::Drama);
    assert!(NamedFilter::from_name("Sparkle").is_err());
}
