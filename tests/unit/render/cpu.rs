use super::*;
use crate::{
    compile::{OverlayOp, compile_plan},
    edit::adjust::AdjustmentState,
    foundation::core::Point,
    overlay::model::{FontWeight, OverlayId, OverlayModel, Sticker},
    render::passes::execute_plan,
};

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

#[test]
fn empty_layer_is_fully_transparent() {
    let fonts = FontBook::empty();
    let mut backend = CpuBackend::new(&fonts);
    let plan = compile_plan(
        canvas(8, 5),
        &AdjustmentState::default(),
        &OverlayModel::with_seed(0),
    );
    let layer = execute_plan(&mut backend, &plan).unwrap();
    assert_eq!((layer.width, layer.height), (8, 5));
    assert_eq!(layer.data.len(), 8 * 5 * 4);
    assert!(layer.data.iter().all(|&b| b == 0));
}

#[test]
fn drawing_before_begin_is_rejected() {
    let fonts = FontBook::empty().with_emoji(FontFace::new(vec![0; 4], 0));
    let mut backend = CpuBackend::new(&fonts);
    let op = StickerOp {
        id: OverlayId(1),
        emoji: Sticker::Star.emoji(),
        origin: Point::new(1.0, 1.0),
        size_px: 48.0,
    };
    assert!(backend.draw_sticker(&op).is_err());
}

#[test]
fn missing_emoji_face_is_a_font_error() {
    let fonts = FontBook::empty();
    let mut backend = CpuBackend::new(&fonts);
    let mut model = OverlayModel::with_seed(0);
    model.add_sticker(Sticker::Heart);
    let plan = compile_plan(canvas(16, 16), &AdjustmentState::default(), &model);
    assert!(matches!(
        execute_plan(&mut backend, &plan),
        Err(GlowupError::Font(_))
    ));
}

#[test]
fn oversized_canvas_is_rejected() {
    let fonts = FontBook::empty();
    let mut backend = CpuBackend::new(&fonts);
    assert!(backend.begin_layer(canvas(70_000, 10)).is_err());
    assert!(backend.begin_layer(canvas(0, 10)).is_err());
}

#[test]
fn text_paints_outline_and_fill() {
    let fonts = FontBook::system();
    if fonts.text_face(FontWeight::Bold).is_err() {
        eprintln!("no system text font; skipping");
        return;
    }

    let mut model = OverlayModel::with_seed(0);
    let id = model
        .add_text("WW", HexColor::parse("#ff0000").unwrap())
        .unwrap();
    model.move_to(id, 10.0, 80.0);
    let plan = compile_plan(canvas(120, 60), &AdjustmentState::default(), &model);
    assert!(matches!(plan.ops[0], OverlayOp::Text(_)));

    let mut backend = CpuBackend::new(&fonts);
    let layer = execute_plan(&mut backend, &plan).unwrap();

    let covered: Vec<&[u8]> = layer
        .data
        .chunks_exact(4)
        .filter(|px| px[3] == 255)
        .collect();
    assert!(!covered.is_empty());
    assert!(covered.iter().any(|px| px[0] > 200 && px[1] < 50));
    assert!(covered.iter().any(|px| px[0] < 50 && px[1] < 50 && px[2] < 50));
}

#[test]
fn sticker_without_emoji_font_uses_text_face_or_reports_coverage() {
    let system = FontBook::system();
    let Ok(regular) = system.text_face(FontWeight::Normal) else {
        eprintln!("no system text font; skipping");
        return;
    };
    let fonts = FontBook::empty().with_regular(regular.clone());

    let mut model = OverlayModel::with_seed(0);
    let id = model.add_sticker(Sticker::Heart);
    model.move_to(id, 20.0, 90.0);
    let plan = compile_plan(canvas(64, 64), &AdjustmentState::default(), &model);

    let mut backend = CpuBackend::new(&fonts);
    match execute_plan(&mut backend, &plan) {
        Ok(layer) => assert!(layer.data.chunks_exact(4).any(|px| px[3] > 0)),
        Err(GlowupError::Font(msg)) => assert!(msg.contains("no glyph"), "{msg}"),
        Err(e) => panic!("unexpected error: {e}"),
    }
}
