use std::collections::HashMap;

use crate::{
    foundation::error::{GlowupError, GlowupResult},
    render::fonts::FontFace,
};

/// One shaped glyph, positioned relative to the run origin (left edge, alphabetic baseline).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// A single shaped line of overlay text.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedLine {
    pub glyphs: Vec<PlacedGlyph>,
    pub font_size: f32,
    pub advance: f32,
}

/// Parley contexts plus the family names of faces already registered with them.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: HashMap<(usize, u32), String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &FontFace) -> GlowupResult<String> {
        if let Some(name) = self.families.get(&face.key()) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| GlowupError::font("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GlowupError::font("registered font family has no name"))?
            .to_string();

        self.families.insert(face.key(), family_name.clone());
        Ok(family_name)
    }

    /// Shape `text` as one line in `face` at `size_px`.
    ///
    /// Line breaks are flattened to spaces, the way a 2D canvas draws text. Glyph positions are
    /// shifted so the first baseline sits at `y = 0`.
    pub fn shape_line(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
    ) -> GlowupResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(GlowupError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let text: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        let family_name = self.family_for(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(&text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut baseline = None;
        for line in layout.lines() {
            let line_baseline = *baseline.get_or_insert(line.metrics().baseline);
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y - line_baseline,
                }));
            }
        }

        Ok(ShapedLine {
            glyphs,
            font_size: size_px,
            advance: layout.width(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
