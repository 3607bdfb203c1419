use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_keeps_natural_size_and_straight_alpha() {
    let src = vec![100u8, 50, 200, 128, 1, 2, 3, 255];
    let img = decode_image(&png_bytes(2, 1, src.clone())).unwrap();
    assert_eq!(img.canvas(), Canvas { width: 2, height: 1 });
    assert_eq!(img.rgba8, src);
}

#[test]
fn decode_rejects_garbage() {
    assert!(matches!(
        decode_image(b"not an image"),
        Err(GlowupError::ImageLoad(_))
    ));
    assert!(matches!(decode_image(&[]), Err(GlowupError::ImageLoad(_))));
}

#[test]
fn premultiply_matches_rounded_product() {
    let mut px = vec![100u8, 50, 200, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        px,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn opaque_pixels_survive_premultiply_round_trip() {
    let src = vec![12u8, 34, 56, 255, 0, 0, 0, 0];
    let mut px = src.clone();
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, src);
}
