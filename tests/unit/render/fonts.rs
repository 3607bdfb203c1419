use super::*;

#[test]
fn empty_book_reports_font_errors() {
    let book = FontBook::empty();
    assert!(matches!(
        book.text_face(FontWeight::Bold),
        Err(GlowupError::Font(_))
    ));
    assert!(matches!(book.emoji_face(), Err(GlowupError::Font(_))));
    assert!(!book.has_text_face());
}

#[test]
fn bold_falls_back_to_regular() {
    let book = FontBook::empty().with_regular(FontFace::new(vec![1, 2, 3], 0));
    let face = book.text_face(FontWeight::Bold).unwrap();
    assert_eq!(face.bytes.as_slice(), &[1, 2, 3]);
    assert!(book.emoji_face().is_err());
}

#[test]
fn or_fills_only_missing_faces() {
    let a = FontBook::empty().with_bold(FontFace::new(vec![1], 0));
    let b = FontBook::empty()
        .with_bold(FontFace::new(vec![2], 0))
        .with_emoji(FontFace::new(vec![3], 1));
    let merged = a.or(b);
    assert_eq!(
        merged.text_face(FontWeight::Bold).unwrap().bytes.as_slice(),
        &[1]
    );
    assert_eq!(merged.emoji_face().unwrap().index, 1);
}

#[test]
fn missing_font_dir_is_an_error() {
    let err = FontBook::from_dir(Path::new("target/definitely-not-a-font-dir")).unwrap_err();
    assert!(matches!(err, GlowupError::Font(_)));
}

#[test]
fn stickers_fall_back_to_the_regular_face() {
    let emoji = FontBook::empty()
        .with_regular(FontFace::new(vec![1], 0))
        .with_emoji(FontFace::new(vec![9], 0));
    let (face, fallback) = emoji.sticker_face().unwrap();
    assert_eq!(face.bytes.as_slice(), &[9]);
    assert!(!fallback);

    let text_only = FontBook::empty().with_regular(FontFace::new(vec![1], 0));
    let (face, fallback) = text_only.sticker_face().unwrap();
    assert_eq!(face.bytes.as_slice(), &[1]);
    assert!(fallback);

    assert!(matches!(
        FontBook::empty().sticker_face(),
        Err(GlowupError::Font(_))
    ));
}
