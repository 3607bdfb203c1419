use crate::{
    compile::{CompositePlan, OverlayOp, StickerOp, TextOp},
    foundation::{core::Canvas, error::GlowupResult},
    render::FrameRGBA,
};

/// Executes overlay draw ops onto a transparent layer the size of the canvas.
pub trait OverlayBackend {
    fn begin_layer(&mut self, canvas: Canvas) -> GlowupResult<()>;

    fn draw_sticker(&mut self, op: &StickerOp) -> GlowupResult<()>;

    fn draw_text(&mut self, op: &TextOp) -> GlowupResult<()>;

    /// Finish drawing and return the premultiplied layer.
    fn readback_rgba8(&mut self, plan: &CompositePlan) -> GlowupResult<FrameRGBA>;
}

/// Draw every overlay op of `plan`, in plan order, and read back the layer.
pub fn execute_plan<B: OverlayBackend + ?Sized>(
    backend: &mut B,
    plan: &CompositePlan,
) -> GlowupResult<FrameRGBA> {
    backend.begin_layer(plan.canvas)?;

    for op in &plan.ops {
        match op {
            OverlayOp::Sticker(s) => backend.draw_sticker(s)?,
            OverlayOp::Text(t) => backend.draw_text(t)?,
        }
    }

    backend.readback_rgba8(plan)
}

#[cfg(test)]
#[path = "../../tests/unit/render/passes.rs"]
mod tests;
