use super::*;
use crate::edit::filters::NamedFilter;
use crate::overlay::model::{Sticker, TextPatch};

fn canvas() -> Canvas {
    Canvas {
        width: 400,
        height: 200,
    }
}

#[test]
fn stickers_precede_texts_regardless_of_insertion() {
    let mut m = OverlayModel::with_seed(11);
    let t1 = m.add_text("first", HexColor::WHITE).unwrap();
    let s1 = m.add_sticker(Sticker::Star);
    let t2 = m.add_text("second", HexColor::WHITE).unwrap();
    let s2 = m.add_sticker(Sticker::Heart);

    let plan = compile_plan(canvas(), &AdjustmentState::default(), &m);
    let ids: Vec<_> = plan.ops.iter().map(OverlayOp::id).collect();
    assert_eq!(ids, vec![s1, s2, t1, t2]);
}

#[test]
fn positions_resolve_against_natural_size() {
    let mut m = OverlayModel::with_seed(0);
    let s = m.add_sticker(Sticker::Sparkles);
    m.move_to(s, 25.0, 75.0);

    let plan = compile_plan(canvas(), &AdjustmentState::default(), &m);
    let OverlayOp::Sticker(op) = &plan.ops[0] else {
        panic!("expected sticker op");
    };
    assert_eq!(op.origin, Point::new(100.0, 150.0));
    assert_eq!(op.size_px, 48.0);
    assert_eq!(op.emoji, "✨");
}

#[test]
fn text_transform_is_translate_then_rotate() {
    let mut m = OverlayModel::with_seed(0);
    let id = m.add_text("tilt", HexColor::WHITE).unwrap();
    m.update_text(
        id,
        TextPatch {
            rotation: Some(90.0),
            ..Default::default()
        },
    );

    let plan = compile_plan(canvas(), &AdjustmentState::default(), &m);
    let OverlayOp::Text(op) = &plan.ops[0] else {
        panic!("expected text op");
    };
    let mapped = op.transform * Point::new(10.0, 0.0);
    assert!((mapped.x - 200.0).abs() < 1e-9);
    assert!((mapped.y - 110.0).abs() < 1e-9);
    assert_eq!(op.outline, HexColor::BLACK);
    assert_eq!(op.outline_width, 2.0);
}

#[test]
fn photo_fx_comes_from_adjustments_only() {
    let mut state = AdjustmentState::default();
    state.select_filter(NamedFilter::BlackWhite);
    let plan = compile_plan(canvas(), &state, &OverlayModel::with_seed(0));
    assert_eq!(plan.photo_fx, vec![FilterFn::Grayscale(1.0)]);
    assert!(!plan.has_overlays());
}
