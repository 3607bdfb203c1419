use super::*;
use crate::overlay::model::FontWeight;
use crate::render::fonts::FontBook;

fn system_face() -> Option<FontFace> {
    let book = FontBook::system();
    match book.text_face(FontWeight::Bold) {
        Ok(face) => Some(face.clone()),
        Err(_) => {
            eprintln!("no system text font; skipping");
            None
        }
    }
}

#[test]
fn rejects_non_positive_size() {
    let mut engine = TextLayoutEngine::new();
    let face = FontFace::new(vec![0; 4], 0);
    assert!(engine.shape_line("x", &face, 0.0).is_err());
    assert!(engine.shape_line("x", &face, f32::NAN).is_err());
}

#[test]
fn garbage_font_bytes_are_a_font_error() {
    let mut engine = TextLayoutEngine::new();
    let face = FontFace::new(b"definitely not a font".to_vec(), 0);
    assert!(matches!(
        engine.shape_line("x", &face, 32.0),
        Err(GlowupError::Font(_))
    ));
}

#[test]
fn glyphs_sit_on_the_baseline() {
    let Some(face) = system_face() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let line = engine.shape_line("Hello", &face, 32.0).unwrap();
    assert_eq!(line.glyphs.len(), 5);
    assert!(line.glyphs.iter().all(|g| g.y.abs() < 0.5));
    assert!(line.glyphs.windows(2).all(|w| w[1].x > w[0].x));
    assert!(line.advance > 0.0);
}

#[test]
fn newlines_are_flattened() {
    let Some(face) = system_face() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let a = engine.shape_line("a b", &face, 20.0).unwrap();
    let b = engine.shape_line("a\nb", &face, 20.0).unwrap();
    assert_eq!(a, b);
}
