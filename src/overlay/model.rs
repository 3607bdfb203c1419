use std::fmt;

use crate::foundation::core::{HexColor, Rng64, clamp_percent};
use crate::foundation::error::{GlowupError, GlowupResult};

/// Smallest text size offered by the editor, in px.
pub const TEXT_SIZE_MIN: f32 = 16.0;
/// Largest text size offered by the editor, in px.
pub const TEXT_SIZE_MAX: f32 = 72.0;
/// Size given to newly added text, in px.
pub const TEXT_SIZE_DEFAULT: f32 = 32.0;
/// Every sticker is drawn at this size, in px.
pub const STICKER_SIZE: f32 = 48.0;
/// Largest overlay id accepted from a stored document.
pub const MAX_OVERLAY_ID: u64 = (1 << 53) - 1;

/// Generation-order token naming one overlay for the life of a model.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    #[default]
    Bold,
}

/// The fixed emoji palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sticker {
    Smile,
    Heart,
    Star,
    Sparkles,
    Blossom,
    Butterfly,
    Rainbow,
    Dizzy,
    Ribbon,
    SparklingHeart,
}

impl Sticker {
    pub const ALL: [Self; 10] = [
        Self::Smile,
        Self::Heart,
        Self::Star,
        Self::Sparkles,
        Self::Blossom,
        Self::Butterfly,
        Self::Rainbow,
        Self::Dizzy,
        Self::Ribbon,
        Self::SparklingHeart,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Smile => "😊",
            Self::Heart => "❤️",
            Self::Star => "⭐",
            Self::Sparkles => "✨",
            Self::Blossom => "🌸",
            Self::Butterfly => "🦋",
            Self::Rainbow => "🌈",
            Self::Dizzy => "💫",
            Self::Ribbon => "🎀",
            Self::SparklingHeart => "💖",
        }
    }

    /// Palette entry for an emoji string; a missing variation selector is tolerated.
    pub fn from_emoji(s: &str) -> GlowupResult<Self> {
        let wanted = s.trim().trim_end_matches('\u{FE0F}');
        Self::ALL
            .into_iter()
            .find(|st| st.emoji().trim_end_matches('\u{FE0F}') == wanted)
            .ok_or_else(|| GlowupError::validation(format!("'{s}' is not in the sticker palette")))
    }
}

impl TryFrom<String> for Sticker {
    type Error = GlowupError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_emoji(&s)
    }
}

impl From<Sticker> for String {
    fn from(s: Sticker) -> Self {
        s.emoji().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextOverlay {
    pub id: OverlayId,
    pub text: String,
    /// Anchor x in percent of the photo width.
    pub x: f64,
    /// Anchor y in percent of the photo height.
    pub y: f64,
    pub color: HexColor,
    pub font_size: f32,
    pub font_weight: FontWeight,
    /// Degrees, clockwise, around the anchor.
    pub rotation: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StickerOverlay {
    pub id: OverlayId,
    pub sticker: Sticker,
    pub x: f64,
    pub y: f64,
    pub size: f32,
}

/// One annotation, text or sticker.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Overlay {
    Text(TextOverlay),
    Sticker(StickerOverlay),
}

impl Overlay {
    pub fn id(&self) -> OverlayId {
        match self {
            Self::Text(t) => t.id,
            Self::Sticker(s) => s.id,
        }
    }

    /// Percent-space anchor.
    pub fn position(&self) -> (f64, f64) {
        match self {
            Self::Text(t) => (t.x, t.y),
            Self::Sticker(s) => (s.x, s.y),
        }
    }

    fn set_position(&mut self, x: f64, y: f64) {
        let (px, py) = match self {
            Self::Text(t) => (&mut t.x, &mut t.y),
            Self::Sticker(s) => (&mut s.x, &mut s.y),
        };
        *px = clamp_percent(x);
        *py = clamp_percent(y);
    }
}

/// Partial text update from the editing panel. Every present field is clamped.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextPatch {
    pub text: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub color: Option<HexColor>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub rotation: Option<f64>,
}

fn clamp_font_size(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(TEXT_SIZE_MIN, TEXT_SIZE_MAX)
    } else {
        TEXT_SIZE_DEFAULT
    }
}

fn clamp_rotation(v: f64) -> f64 {
    if v.is_finite() { v.clamp(-180.0, 180.0) } else { 0.0 }
}

/// Ordered text and sticker annotations for the current photo.
#[derive(Clone, Debug)]
pub struct OverlayModel {
    items: Vec<Overlay>,
    next_id: u64,
    rng: Rng64,
}

impl Default for OverlayModel {
    fn default() -> Self {
        Self::with_rng(Rng64::from_clock())
    }
}

impl OverlayModel {
    /// Model whose sticker placement is reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Rng64::new(seed))
    }

    fn with_rng(rng: Rng64) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            rng,
        }
    }

    /// Rebuild a model from stored overlays.
    ///
    /// Items are ordered by id and the id counter resumes after the largest one. Sticker sizes
    /// are reset to [`STICKER_SIZE`].
    pub fn from_overlays(mut items: Vec<Overlay>, seed: Option<u64>) -> GlowupResult<Self> {
        items.sort_by_key(Overlay::id);
        if let Some(o) = items.last().filter(|o| o.id().0 > MAX_OVERLAY_ID) {
            return Err(GlowupError::validation(format!(
                "overlay id {} is out of range (max {MAX_OVERLAY_ID})",
                o.id()
            )));
        }
        if let Some(w) = items.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(GlowupError::validation(format!(
                "duplicate overlay id {}",
                w[0].id()
            )));
        }
        for item in &mut items {
            let (x, y) = item.position();
            item.set_position(x, y);
            match item {
                Overlay::Text(t) => {
                    if t.text.trim().is_empty() {
                        return Err(GlowupError::validation(format!(
                            "text overlay {} is empty",
                            t.id
                        )));
                    }
                    t.font_size = clamp_font_size(t.font_size);
                    t.rotation = clamp_rotation(t.rotation);
                }
                Overlay::Sticker(s) => s.size = STICKER_SIZE,
            }
        }

        let rng = seed.map_or_else(Rng64::from_clock, Rng64::new);
        let next_id = items.last().map_or(1, |o| o.id().0 + 1);
        Ok(Self {
            items,
            next_id,
            rng,
        })
    }

    fn alloc_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Append a text overlay at the photo center. Whitespace-only text is ignored.
    pub fn add_text(&mut self, text: &str, color: HexColor) -> Option<OverlayId> {
        if text.trim().is_empty() {
            return None;
        }
        let id = self.alloc_id();
        self.items.push(Overlay::Text(TextOverlay {
            id,
            text: text.to_string(),
            x: 50.0,
            y: 50.0,
            color,
            font_size: TEXT_SIZE_DEFAULT,
            font_weight: FontWeight::Bold,
            rotation: 0.0,
        }));
        tracing::debug!(%id, "text overlay added");
        Some(id)
    }

    /// Append a sticker at a random spot inside the central 60% of the photo.
    pub fn add_sticker(&mut self, sticker: Sticker) -> OverlayId {
        let id = self.alloc_id();
        let x = self.rng.range(20.0, 80.0);
        let y = self.rng.range(20.0, 80.0);
        self.items.push(Overlay::Sticker(StickerOverlay {
            id,
            sticker,
            x,
            y,
            size: STICKER_SIZE,
        }));
        tracing::debug!(%id, emoji = sticker.emoji(), "sticker added");
        id
    }

    /// Apply `patch` to the text overlay `id`. Returns `false` if no such text exists.
    ///
    /// A blank replacement text is ignored so text overlays never become empty.
    pub fn update_text(&mut self, id: OverlayId, patch: TextPatch) -> bool {
        let Some(t) = self.items.iter_mut().find_map(|o| match o {
            Overlay::Text(t) if t.id == id => Some(t),
            _ => None,
        }) else {
            return false;
        };

        if let Some(text) = patch.text.filter(|s| !s.trim().is_empty()) {
            t.text = text;
        }
        if let Some(x) = patch.x {
            t.x = clamp_percent(x);
        }
        if let Some(y) = patch.y {
            t.y = clamp_percent(y);
        }
        if let Some(color) = patch.color {
            t.color = color;
        }
        if let Some(size) = patch.font_size {
            t.font_size = clamp_font_size(size);
        }
        if let Some(weight) = patch.font_weight {
            t.font_weight = weight;
        }
        if let Some(rotation) = patch.rotation {
            t.rotation = clamp_rotation(rotation);
        }
        true
    }

    /// Move any overlay to a percent position, clamped to `[0, 100]`.
    pub fn move_to(&mut self, id: OverlayId, x: f64, y: f64) -> bool {
        match self.items.iter_mut().find(|o| o.id() == id) {
            Some(o) => {
                o.set_position(x, y);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: OverlayId) -> bool {
        let before = self.items.len();
        self.items.retain(|o| o.id() != id);
        self.items.len() != before
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.items.iter().find(|o| o.id() == id)
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.get(id).is_some()
    }

    /// Every overlay in append order.
    pub fn list(&self) -> &[Overlay] {
        &self.items
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextOverlay> {
        self.items.iter().filter_map(|o| match o {
            Overlay::Text(t) => Some(t),
            Overlay::Sticker(_) => None,
        })
    }

    pub fn stickers(&self) -> impl Iterator<Item = &StickerOverlay> {
        self.items.iter().filter_map(|o| match o {
            Overlay::Sticker(s) => Some(s),
            Overlay::Text(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every overlay. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/model.rs"]
mod tests;
