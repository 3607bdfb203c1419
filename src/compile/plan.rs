use crate::{
    edit::adjust::AdjustmentState,
    edit::filters::FilterFn,
    foundation::core::{Affine, Canvas, HexColor, Point},
    overlay::model::{FontWeight, OverlayId, OverlayModel},
};

/// Width of the dark outline drawn behind text, in px.
pub const TEXT_OUTLINE_PX: f64 = 2.0;

#[derive(Clone, Debug, PartialEq)]
/// Everything the compositor needs for one export, resolved to pixel space.
///
/// A plan consists of:
/// - the canvas (the photo's natural size)
/// - photo filter steps, applied in order to the photo only (`photo_fx`)
/// - overlay draw operations, stickers first and texts after (`ops`)
pub struct CompositePlan {
    pub canvas: Canvas,
    pub photo_fx: Vec<FilterFn>,
    pub ops: Vec<OverlayOp>,
}

impl CompositePlan {
    /// Whether the overlay layer can be skipped entirely.
    pub fn has_overlays(&self) -> bool {
        !self.ops.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
/// One overlay draw on the transparent overlay layer.
pub enum OverlayOp {
    Sticker(StickerOp),
    Text(TextOp),
}

impl OverlayOp {
    pub fn id(&self) -> OverlayId {
        match self {
            Self::Sticker(s) => s.id,
            Self::Text(t) => t.id,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Emoji glyph run with its left/alphabetic-baseline origin at `origin`.
pub struct StickerOp {
    pub id: OverlayId,
    pub emoji: &'static str,
    pub origin: Point,
    pub size_px: f32,
}

#[derive(Clone, Debug, PartialEq)]
/// Outlined text drawn in its own local frame.
///
/// `transform` maps the text's local space (origin at left/alphabetic baseline) to canvas
/// pixels; it is built fresh for each op so rotations never accumulate.
pub struct TextOp {
    pub id: OverlayId,
    pub text: String,
    pub transform: Affine,
    pub font_size: f32,
    pub weight: FontWeight,
    pub fill: HexColor,
    pub outline: HexColor,
    pub outline_width: f64,
}

/// Resolve the editing state into a [`CompositePlan`] for a photo of size `canvas`.
pub fn compile_plan(
    canvas: Canvas,
    adjustments: &AdjustmentState,
    overlays: &OverlayModel,
) -> CompositePlan {
    let mut ops = Vec::with_capacity(overlays.len());

    for s in overlays.stickers() {
        ops.push(OverlayOp::Sticker(StickerOp {
            id: s.id,
            emoji: s.sticker.emoji(),
            origin: canvas.percent_to_px(s.x, s.y),
            size_px: s.size,
        }));
    }

    for t in overlays.texts() {
        let anchor = canvas.percent_to_px(t.x, t.y);
        let transform =
            Affine::translate(anchor.to_vec2()) * Affine::rotate(t.rotation.to_radians());
        ops.push(OverlayOp::Text(TextOp {
            id: t.id,
            text: t.text.clone(),
            transform,
            font_size: t.font_size,
            weight: t.font_weight,
            fill: t.color,
            outline: HexColor::BLACK,
            outline_width: TEXT_OUTLINE_PX,
        }));
    }

    CompositePlan {
        canvas,
        photo_fx: adjustments.photo_pipeline(),
        ops,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
