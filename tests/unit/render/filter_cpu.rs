use super::*;

fn px(r: u8, g: u8, b: u8) -> Vec<u8> {
    vec![r, g, b, 255]
}

fn run(mut rgba: Vec<u8>, w: u32, h: u32, steps: &[FilterFn]) -> Vec<u8> {
    apply_filter_steps(&mut rgba, w, h, steps).unwrap();
    rgba
}

#[test]
fn empty_pipeline_is_exact_identity() {
    let src: Vec<u8> = (0..=255u8).flat_map(|v| [v, 255 - v, v / 2, v]).collect();
    assert_eq!(run(src.clone(), 16, 16, &[]), src);
}

#[test]
fn identity_steps_are_skipped() {
    let src = px(13, 200, 77);
    let steps = [
        FilterFn::Brightness(1.0),
        FilterFn::Blur { sigma_px: 0.0 },
        FilterFn::HueRotate { degrees: 360.0 },
    ];
    assert_eq!(run(src.clone(), 1, 1, &steps), src);
}

#[test]
fn brightness_scales_and_clamps() {
    assert_eq!(
        run(px(100, 200, 0), 1, 1, &[FilterFn::Brightness(1.5)]),
        px(150, 255, 0)
    );
    assert_eq!(
        run(px(100, 200, 0), 1, 1, &[FilterFn::Brightness(0.0)]),
        px(0, 0, 0)
    );
}

#[test]
fn contrast_pivots_on_mid_gray() {
    assert_eq!(
        run(px(0, 255, 128), 1, 1, &[FilterFn::Contrast(0.0)]),
        px(128, 128, 128)
    );
}

#[test]
fn grayscale_equalizes_channels() {
    let out = run(px(200, 30, 90), 1, 1, &[FilterFn::Grayscale(1.0)]);
    assert_eq!(out[0], out[1]);
    assert_eq!(out[1], out[2]);
    assert_eq!(out[3], 255);
}

#[test]
fn saturate_zero_matches_luma() {
    let out = run(px(255, 0, 0), 1, 1, &[FilterFn::Saturate(0.0)]);
    let expected = (0.213f32 * 255.0).round() as u8;
    assert!(out[..3].iter().all(|&c| c.abs_diff(expected) <= 1), "{out:?}");
}

#[test]
fn color_steps_leave_alpha_alone() {
    let src = vec![10u8, 20, 30, 77];
    let out = run(
        src,
        1,
        1,
        &[FilterFn::Sepia(1.0), FilterFn::HueRotate { degrees: 90.0 }],
    );
    assert_eq!(out[3], 77);
}

#[test]
fn blur_smooths_a_hard_edge() {
    let (w, h) = (8u32, 1u32);
    let src: Vec<u8> = (0..w)
        .flat_map(|x| if x < 4 { px(0, 0, 0) } else { px(255, 255, 255) })
        .collect();
    let out = run(src, w, h, &[FilterFn::Blur { sigma_px: 1.0 }]);
    let left_edge = out[3 * 4];
    let right_edge = out[4 * 4];
    assert!(left_edge > 0 && left_edge < 128, "{left_edge}");
    assert!(right_edge > 128 && right_edge < 255, "{right_edge}");
    assert_eq!(out[0], 0);
    assert_eq!(out[7 * 4], 255);
}
