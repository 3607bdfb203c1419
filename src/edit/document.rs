use std::path::Path;

use anyhow::Context;

use crate::edit::adjust::{Adjustment, AdjustmentState};
use crate::edit::filters::NamedFilter;
use crate::foundation::error::{GlowupError, GlowupResult};
use crate::overlay::model::{Overlay, OverlayModel, StickerOverlay, TextOverlay};

/// Serializable snapshot of one edit: sliders, filter and overlays.
///
/// ```json
/// {
///   "adjustment": { "brightness": 120, "contrast": 100, "saturation": 100, "beauty": 10 },
///   "filter": "Warm",
///   "texts": [{ "id": 1, "text": "hi", "x": 50, "y": 50, "color": "#ffffff",
///               "font_size": 32, "font_weight": "bold", "rotation": 0 }],
///   "stickers": [{ "id": 2, "sticker": "⭐", "x": 30, "y": 40, "size": 48 }]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditDocument {
    pub adjustment: Adjustment,
    pub filter: NamedFilter,
    pub texts: Vec<TextOverlay>,
    pub stickers: Vec<StickerOverlay>,
}

impl EditDocument {
    /// Snapshot the live editing state.
    pub fn capture(state: &AdjustmentState, overlays: &OverlayModel) -> Self {
        Self {
            adjustment: state.get(),
            filter: state.filter(),
            texts: overlays.texts().cloned().collect(),
            stickers: overlays.stickers().cloned().collect(),
        }
    }

    pub fn from_json_str(s: &str) -> GlowupResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| GlowupError::validation(format!("invalid edit document: {e}")))
    }

    pub fn from_path(path: &Path) -> GlowupResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read edit document {}", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> GlowupResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GlowupError::Other(anyhow::anyhow!("serialize edit document: {e}")))
    }

    /// Rebuild the adjustment state (values clamped).
    pub fn adjustment_state(&self) -> AdjustmentState {
        AdjustmentState::new(self.adjustment, self.filter)
    }

    /// Rebuild the overlay model; `seed` fixes placement of stickers added afterwards.
    pub fn overlay_model(&self, seed: Option<u64>) -> GlowupResult<OverlayModel> {
        let items = self
            .texts
            .iter()
            .cloned()
            .map(Overlay::Text)
            .chain(self.stickers.iter().cloned().map(Overlay::Sticker))
            .collect();
        OverlayModel::from_overlays(items, seed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/document.rs"]
mod tests;
