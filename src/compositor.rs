//! Flatten a photo, its filters and its overlays into one bitmap.

use crate::{
    compile::{CompositePlan, compile_plan},
    edit::adjust::AdjustmentState,
    foundation::{
        core::Canvas,
        error::{GlowupError, GlowupResult},
    },
    overlay::model::OverlayModel,
    render::{
        CpuBackend, FontBook, OverlayBackend,
        composite_cpu::over_in_place,
        decode::{
            DecodedImage, decode_image, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
        },
        encode::encode_png,
        execute_plan,
        filter_cpu::apply_filter_steps,
    },
};

/// Largest canvas side the CPU rasterizer accepts.
pub const MAX_CANVAS_SIDE: u32 = u16::MAX as u32;

/// Composited output as straight RGBA8 at the source photo's natural size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

impl RenderedImage {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn to_png(&self) -> GlowupResult<Vec<u8>> {
        encode_png(self.width, self.height, self.rgba8.clone())
    }

    pub fn into_png(self) -> GlowupResult<Vec<u8>> {
        encode_png(self.width, self.height, self.rgba8)
    }
}

/// Decode `source`, apply the adjustment pipeline to the photo and draw overlays on top.
///
/// Reads the editing state once; nothing is mutated.
#[tracing::instrument(skip_all, fields(source_bytes = source.len(), overlays = overlays.len()))]
pub fn render(
    source: &[u8],
    adjustments: &AdjustmentState,
    overlays: &OverlayModel,
    fonts: &FontBook,
) -> GlowupResult<RenderedImage> {
    let photo = decode_image(source)?;
    let plan = compile_plan(photo.canvas(), adjustments, overlays);
    let mut backend = CpuBackend::new(fonts);
    composite(photo, &plan, &mut backend)
}

/// [`render`], then PNG-encode the result.
pub fn render_png(
    source: &[u8],
    adjustments: &AdjustmentState,
    overlays: &OverlayModel,
    fonts: &FontBook,
) -> GlowupResult<Vec<u8>> {
    render(source, adjustments, overlays, fonts)?.into_png()
}

/// Run a compiled plan against an already decoded photo using `backend` for overlays.
pub fn composite<B: OverlayBackend + ?Sized>(
    photo: DecodedImage,
    plan: &CompositePlan,
    backend: &mut B,
) -> GlowupResult<RenderedImage> {
    let DecodedImage {
        width,
        height,
        mut rgba8,
    } = photo;
    if plan.canvas != (Canvas { width, height }) {
        return Err(GlowupError::validation(
            "composite plan canvas does not match photo size",
        ));
    }
    if width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
        return Err(GlowupError::validation(format!(
            "photo {width}x{height} exceeds the {MAX_CANVAS_SIDE}px per-side limit"
        )));
    }

    apply_filter_steps(&mut rgba8, width, height, &plan.photo_fx)?;

    if plan.has_overlays() {
        let layer = execute_plan(backend, plan)?;
        premultiply_rgba8_in_place(&mut rgba8);
        over_in_place(&mut rgba8, &layer.data, 1.0)?;
        unpremultiply_rgba8_in_place(&mut rgba8);
    }

    tracing::debug!(width, height, ops = plan.ops.len(), "composited");
    Ok(RenderedImage {
        width,
        height,
        rgba8,
    })
}
