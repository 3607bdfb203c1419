use super::*;

#[test]
fn encodes_png_signature_and_size() {
    let png = encode_png(3, 2, vec![7u8; 3 * 2 * 4]).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let back = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (3, 2));
    assert!(back.into_raw().iter().all(|&b| b == 7));
}

#[test]
fn short_buffer_is_an_encode_error() {
    assert!(matches!(
        encode_png(3, 2, vec![0u8; 5]),
        Err(GlowupError::Encode(_))
    ));
}
