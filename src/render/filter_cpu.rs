use rayon::prelude::*;

use crate::{
    edit::filters::FilterFn,
    foundation::error::GlowupResult,
    render::blur_cpu::{blur_rgba8_premul, radius_for_sigma},
    render::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
};

/// Row-major 3x3 color matrix applied to straight RGB in `[0, 1]`.
type Mat3 = [[f32; 3]; 3];

#[derive(Clone, Copy, Debug, PartialEq)]
enum ColorOp {
    Brightness(f32),
    Contrast(f32),
    Matrix(Mat3),
}

impl ColorOp {
    fn from_step(step: FilterFn) -> Option<Self> {
        Some(match step {
            FilterFn::Brightness(a) => Self::Brightness(a),
            FilterFn::Contrast(a) => Self::Contrast(a),
            FilterFn::Saturate(s) => Self::Matrix(saturate_matrix(s)),
            FilterFn::Grayscale(a) => Self::Matrix(grayscale_matrix(a)),
            FilterFn::Sepia(a) => Self::Matrix(sepia_matrix(a)),
            FilterFn::HueRotate { degrees } => Self::Matrix(hue_rotate_matrix(degrees)),
            FilterFn::Blur { .. } => return None,
        })
    }

    fn apply(&self, rgb: &mut [f32; 3]) {
        match *self {
            Self::Brightness(a) => {
                for c in rgb.iter_mut() {
                    *c *= a;
                }
            }
            Self::Contrast(a) => {
                for c in rgb.iter_mut() {
                    *c = (*c - 0.5) * a + 0.5;
                }
            }
            Self::Matrix(m) => {
                let [r, g, b] = *rgb;
                for (out, row) in rgb.iter_mut().zip(m.iter()) {
                    *out = row[0] * r + row[1] * g + row[2] * b;
                }
            }
        }
        for c in rgb.iter_mut() {
            *c = c.clamp(0.0, 1.0);
        }
    }
}

fn saturate_matrix(s: f32) -> Mat3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn grayscale_matrix(amount: f32) -> Mat3 {
    let g = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.2126 + 0.7874 * g, 0.7152 - 0.7152 * g, 0.0722 - 0.0722 * g],
        [0.2126 - 0.2126 * g, 0.7152 + 0.2848 * g, 0.0722 - 0.0722 * g],
        [0.2126 - 0.2126 * g, 0.7152 - 0.7152 * g, 0.0722 + 0.9278 * g],
    ]
}

fn sepia_matrix(amount: f32) -> Mat3 {
    let g = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * g, 0.769 - 0.769 * g, 0.189 - 0.189 * g],
        [0.349 - 0.349 * g, 0.686 + 0.314 * g, 0.168 - 0.168 * g],
        [0.272 - 0.272 * g, 0.534 - 0.534 * g, 0.131 + 0.869 * g],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> Mat3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

/// Apply filter steps in order to a straight-alpha RGBA8 photo.
///
/// Consecutive color steps run in float without intermediate quantization; each blur runs on
/// premultiplied pixels so transparent edges do not bleed dark fringes. Alpha is only changed by
/// blur.
#[tracing::instrument(skip(rgba, steps), fields(steps = steps.len()))]
pub fn apply_filter_steps(
    rgba: &mut [u8],
    width: u32,
    height: u32,
    steps: &[FilterFn],
) -> GlowupResult<()> {
    let mut run: Vec<ColorOp> = Vec::new();
    for &step in steps {
        if step.is_identity() {
            continue;
        }
        match ColorOp::from_step(step) {
            Some(op) => run.push(op),
            None => {
                apply_color_run(rgba, width, &run);
                run.clear();
                if let FilterFn::Blur { sigma_px } = step {
                    blur_straight_in_place(rgba, width, height, sigma_px)?;
                }
            }
        }
    }
    apply_color_run(rgba, width, &run);
    Ok(())
}

fn apply_color_run(rgba: &mut [u8], width: u32, ops: &[ColorOp]) {
    if ops.is_empty() || width == 0 {
        return;
    }
    rgba.par_chunks_mut(width as usize * 4).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let mut rgb = [
                f32::from(px[0]) / 255.0,
                f32::from(px[1]) / 255.0,
                f32::from(px[2]) / 255.0,
            ];
            for op in ops {
                op.apply(&mut rgb);
            }
            for (dst, v) in px[..3].iter_mut().zip(rgb) {
                *dst = (v * 255.0).round() as u8;
            }
        }
    });
}

fn blur_straight_in_place(
    rgba: &mut [u8],
    width: u32,
    height: u32,
    sigma_px: f32,
) -> GlowupResult<()> {
    let radius = radius_for_sigma(sigma_px);
    if radius == 0 {
        return Ok(());
    }
    premultiply_rgba8_in_place(rgba);
    let out = blur_rgba8_premul(rgba, width, height, radius, sigma_px)?;
    rgba.copy_from_slice(&out);
    unpremultiply_rgba8_in_place(rgba);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/filter_cpu.rs"]
mod tests;
