use super::*;
use crate::edit::adjust::AdjustmentPatch;
use crate::foundation::core::HexColor;
use crate::overlay::model::{FontWeight, OverlayId, STICKER_SIZE, Sticker};

#[test]
fn parses_documented_shape() {
    let doc = EditDocument::from_json_str(
        r##"{
            "adjustment": { "brightness": 120, "beauty": 10 },
            "filter": "B&W",
            "texts": [{ "id": 1, "text": "hi", "x": 50, "y": 50, "color": "#ffffff",
                        "font_size": 32, "font_weight": "normal", "rotation": 15 }],
            "stickers": [{ "id": 4, "sticker": "⭐", "x": 30, "y": 40, "size": 48 }]
        }"##,
    )
    .unwrap();

    assert_eq!(doc.filter, NamedFilter::BlackWhite);
    assert_eq!(doc.adjustment.brightness, 120.0);
    assert_eq!(doc.adjustment.contrast, 100.0);
    assert_eq!(doc.texts[0].font_weight, FontWeight::Normal);
    assert_eq!(doc.stickers[0].sticker, Sticker::Star);

    let mut model = doc.overlay_model(Some(9)).unwrap();
    assert_eq!(model.len(), 2);
    assert_eq!(model.add_sticker(Sticker::Heart), OverlayId(5));
}

#[test]
fn rejects_bad_documents() {
    assert!(EditDocument::from_json_str("{\"filter\": \"Sparkle\"}").is_err());
    assert!(EditDocument::from_json_str("{\"bogus\": 1}").is_err());
    assert!(
        EditDocument::from_json_str(
            r##"{"texts": [{ "id": 1, "text": "x", "x": 0, "y": 0, "color": "blue",
                 "font_size": 20, "font_weight": "bold", "rotation": 0 }]}"##
        )
        .is_err()
    );
}

#[test]
fn capture_then_rebuild_preserves_state() {
    let mut state = AdjustmentState::default();
    state.set(AdjustmentPatch {
        saturation: Some(150.0),
        ..Default::default()
    });
    state.select_filter(NamedFilter::Cool);
    let mut model = OverlayModel::with_seed(1);
    model.add_text("caption", HexColor::parse("#ff0000").unwrap());
    let s = model.add_sticker(Sticker::Rainbow);
    model.move_to(s, 30.0, 62.5);

    let doc = EditDocument::capture(&state, &model);
    let json = doc.to_json_pretty().unwrap();
    let back = EditDocument::from_json_str(&json).unwrap();

    assert_eq!(back.adjustment_state(), state);
    assert_eq!(back.overlay_model(None).unwrap().list(), model.list());
}

#[test]
fn extreme_overlay_id_is_rejected_at_load() {
    let doc = EditDocument::from_json_str(
        r##"{"texts": [{ "id": 18446744073709551615, "text": "hi", "x": 50, "y": 50,
             "color": "#ffffff", "font_size": 32, "font_weight": "bold", "rotation": 0 }]}"##,
    )
    .unwrap();
    assert!(matches!(
        doc.overlay_model(Some(1)),
        Err(GlowupError::Validation(_))
    ));
}

#[test]
fn sticker_size_is_fixed_whatever_the_document_says() {
    for size in ["500", "0", "-3"] {
        let doc = EditDocument::from_json_str(&format!(
            r#"{{"stickers": [{{ "id": 1, "sticker": "⭐", "x": 50, "y": 50, "size": {size} }}]}}"#
        ))
        .unwrap();
        let model = doc.overlay_model(Some(1)).unwrap();
        let sizes: Vec<f32> = model.stickers().map(|s| s.size).collect();
        assert_eq!(sizes, vec![STICKER_SIZE], "size {size}");
    }
}

#[test]
fn hostile_positions_and_text_fields_are_clamped() {
    let doc = EditDocument::from_json_str(
        r##"{"texts": [{ "id": 3, "text": "big", "x": -40, "y": 1e9, "color": "#00ff00",
             "font_size": 900, "font_weight": "normal", "rotation": -720 }],
             "stickers": [{ "id": 1, "sticker": "🌈", "x": 250, "y": -1, "size": 48 }]}"##,
    )
    .unwrap();
    let model = doc.overlay_model(Some(1)).unwrap();

    let t = model.texts().next().unwrap();
    assert_eq!((t.x, t.y), (0.0, 100.0));
    assert_eq!(t.font_size, 72.0);
    assert_eq!(t.rotation, -180.0);
    let s = model.stickers().next().unwrap();
    assert_eq!((s.x, s.y), (100.0, 0.0));
    assert_eq!(model.list().first().map(Overlay::id), Some(OverlayId(1)));
}
