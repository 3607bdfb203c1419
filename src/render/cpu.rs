use std::collections::HashMap;

use crate::{
    compile::{CompositePlan, StickerOp, TextOp},
    foundation::{
        core::{Affine, Canvas, HexColor},
        error::{GlowupError, GlowupResult},
    },
    render::{
        FrameRGBA,
        fonts::{FontBook, FontFace},
        passes::OverlayBackend,
        text::{ShapedLine, TextLayoutEngine},
    },
};

/// CPU overlay rasterizer built on `vello_cpu`.
pub struct CpuBackend<'a> {
    fonts: &'a FontBook,
    layout: TextLayoutEngine,
    font_cache: HashMap<(usize, u32), vello_cpu::peniko::FontData>,
    surface: Option<CpuSurface>,
}

struct CpuSurface {
    canvas: Canvas,
    pixmap: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
}

impl<'a> CpuBackend<'a> {
    pub fn new(fonts: &'a FontBook) -> Self {
        Self {
            fonts,
            layout: TextLayoutEngine::new(),
            font_cache: HashMap::new(),
            surface: None,
        }
    }

    fn surface_mut(&mut self) -> GlowupResult<&mut CpuSurface> {
        self.surface
            .as_mut()
            .ok_or_else(|| GlowupError::validation("overlay layer was not started"))
    }

    fn font_data(&mut self, face: &FontFace) -> vello_cpu::peniko::FontData {
        self.font_cache
            .entry(face.key())
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                    face.index,
                )
            })
            .clone()
    }
}

impl OverlayBackend for CpuBackend<'_> {
    fn begin_layer(&mut self, canvas: Canvas) -> GlowupResult<()> {
        let (width, height) = canvas_to_u16(canvas)?;
        self.surface = Some(CpuSurface {
            canvas,
            pixmap: vello_cpu::Pixmap::new(width, height),
            ctx: vello_cpu::RenderContext::new(width, height),
        });
        Ok(())
    }

    fn draw_sticker(&mut self, op: &StickerOp) -> GlowupResult<()> {
        let (face, fallback) = self.fonts.sticker_face()?;
        let face = face.clone();
        let line = self.layout.shape_line(op.emoji, &face, op.size_px)?;
        if fallback && line.glyphs.iter().any(|g| g.id == 0) {
            return Err(GlowupError::font(format!(
                "no emoji font installed and the text font has no glyph for {}",
                op.emoji
            )));
        }
        let font = self.font_data(&face);

        let surface = self.surface_mut()?;
        let ctx = &mut surface.ctx;
        ctx.set_transform(affine_to_cpu(Affine::translate(op.origin.to_vec2())));
        ctx.set_paint(color_to_cpu(HexColor::BLACK));
        ctx.glyph_run(&font)
            .font_size(line.font_size)
            .fill_glyphs(glyphs_to_cpu(&line));
        Ok(())
    }

    fn draw_text(&mut self, op: &TextOp) -> GlowupResult<()> {
        let face = self.fonts.text_face(op.weight)?.clone();
        let line = self.layout.shape_line(&op.text, &face, op.font_size)?;
        let font = self.font_data(&face);

        let surface = self.surface_mut()?;
        let ctx = &mut surface.ctx;
        ctx.set_transform(affine_to_cpu(op.transform));

        if op.outline_width > 0.0 {
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(op.outline_width));
            ctx.set_paint(color_to_cpu(op.outline));
            ctx.glyph_run(&font)
                .font_size(line.font_size)
                .stroke_glyphs(glyphs_to_cpu(&line));
        }

        ctx.set_paint(color_to_cpu(op.fill));
        ctx.glyph_run(&font)
            .font_size(line.font_size)
            .fill_glyphs(glyphs_to_cpu(&line));
        Ok(())
    }

    fn readback_rgba8(&mut self, plan: &CompositePlan) -> GlowupResult<FrameRGBA> {
        let mut surface = self
            .surface
            .take()
            .ok_or_else(|| GlowupError::validation("overlay layer was not started"))?;
        if surface.canvas != plan.canvas {
            return Err(GlowupError::validation(
                "overlay layer size does not match plan canvas",
            ));
        }

        surface.ctx.flush();
        surface.ctx.render_to_pixmap(&mut surface.pixmap);

        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: surface.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn canvas_to_u16(canvas: Canvas) -> GlowupResult<(u16, u16)> {
    let width: u16 = canvas
        .width
        .try_into()
        .map_err(|_| GlowupError::validation("canvas width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .try_into()
        .map_err(|_| GlowupError::validation("canvas height exceeds u16"))?;
    if width == 0 || height == 0 {
        return Err(GlowupError::validation("canvas must be non-empty"));
    }
    Ok((width, height))
}

fn glyphs_to_cpu(line: &ShapedLine) -> impl Iterator<Item = vello_cpu::Glyph> + '_ {
    line.glyphs.iter().map(|g| vello_cpu::Glyph {
        id: g.id,
        x: g.x,
        y: g.y,
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn color_to_cpu(c: HexColor) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
