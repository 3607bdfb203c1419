use std::{path::Path, sync::Arc};

use usvg::fontdb;

use crate::{
    foundation::error::{GlowupError, GlowupResult},
    overlay::model::FontWeight,
};

/// Families tried, in order, for sticker glyphs.
const EMOJI_FAMILIES: [&str; 5] = [
    "Noto Color Emoji",
    "Apple Color Emoji",
    "Segoe UI Emoji",
    "Twemoji Mozilla",
    "Noto Emoji",
];

/// Text families tried before the generic sans-serif and serif fallbacks.
const TEXT_FAMILIES: [&str; 6] = [
    "Inter",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

/// Raw font file plus the face index inside it (non-zero for collections).
#[derive(Clone)]
pub struct FontFace {
    pub bytes: Arc<Vec<u8>>,
    pub index: u32,
}

impl FontFace {
    pub fn new(bytes: Vec<u8>, index: u32) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index,
        }
    }

    /// Stable identity of this face for per-face caches.
    pub(crate) fn key(&self) -> (usize, u32) {
        (Arc::as_ptr(&self.bytes) as usize, self.index)
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Faces used to draw overlays: one regular, one bold and one emoji face.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    regular: Option<FontFace>,
    bold: Option<FontFace>,
    emoji: Option<FontFace>,
}

impl FontBook {
    /// A book with no faces; only overlay-free compositions can use it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_regular(mut self, face: FontFace) -> Self {
        self.regular = Some(face);
        self
    }

    pub fn with_bold(mut self, face: FontFace) -> Self {
        self.bold = Some(face);
        self
    }

    pub fn with_emoji(mut self, face: FontFace) -> Self {
        self.emoji = Some(face);
        self
    }

    /// Resolve faces from the fonts installed on this machine.
    #[tracing::instrument]
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let book = Self::from_database(&db);
        tracing::debug!(faces = db.len(), ?book, "system font book");
        book
    }

    /// Resolve faces from every `.ttf`/`.otf`/`.ttc` file in `dir` (non-recursive), falling back
    /// to system fonts for anything the directory does not provide.
    #[tracing::instrument]
    pub fn from_dir(dir: &Path) -> GlowupResult<Self> {
        if !dir.is_dir() {
            return Err(GlowupError::font(format!(
                "font directory {} does not exist",
                dir.display()
            )));
        }
        let mut local = fontdb::Database::new();
        load_fonts_from_dir(&mut local, dir);
        let from_dir = Self::from_database(&local);
        Ok(from_dir.or(Self::system()))
    }

    /// Fill missing faces from `other`.
    pub fn or(self, other: Self) -> Self {
        Self {
            regular: self.regular.or(other.regular),
            bold: self.bold.or(other.bold),
            emoji: self.emoji.or(other.emoji),
        }
    }

    fn from_database(db: &fontdb::Database) -> Self {
        let mut text_families: Vec<fontdb::Family<'_>> =
            TEXT_FAMILIES.iter().map(|&n| fontdb::Family::Name(n)).collect();
        text_families.extend([fontdb::Family::SansSerif, fontdb::Family::Serif]);
        let regular = query_face(db, &text_families, fontdb::Weight::NORMAL)
            .or_else(|| any_text_face(db));
        let bold = query_face(db, &text_families, fontdb::Weight::BOLD);

        let emoji_families: Vec<fontdb::Family<'_>> =
            EMOJI_FAMILIES.iter().map(|&n| fontdb::Family::Name(n)).collect();
        let emoji = query_face(db, &emoji_families, fontdb::Weight::NORMAL);

        Self {
            regular,
            bold,
            emoji,
        }
    }

    /// Face for text of the given weight. A missing weight falls back to the other text face.
    pub fn text_face(&self, weight: FontWeight) -> GlowupResult<&FontFace> {
        let (first, second) = match weight {
            FontWeight::Bold => (&self.bold, &self.regular),
            FontWeight::Normal => (&self.regular, &self.bold),
        };
        first
            .as_ref()
            .or(second.as_ref())
            .ok_or_else(|| GlowupError::font("no text font available for text overlays"))
    }

    pub fn emoji_face(&self) -> GlowupResult<&FontFace> {
        self.emoji
            .as_ref()
            .ok_or_else(|| GlowupError::font("no emoji font available for stickers"))
    }

    /// Face for sticker glyphs. Without an emoji face the regular text face stands in, and the
    /// returned flag is set so the caller can check that it covers the glyph.
    pub fn sticker_face(&self) -> GlowupResult<(&FontFace, bool)> {
        if let Some(face) = &self.emoji {
            return Ok((face, false));
        }
        self.text_face(FontWeight::Normal)
            .map(|face| (face, true))
            .map_err(|_| GlowupError::font("no emoji or text font available for stickers"))
    }

    pub fn has_text_face(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    pub fn has_emoji_face(&self) -> bool {
        self.emoji.is_some()
    }
}

fn query_face(
    db: &fontdb::Database,
    families: &[fontdb::Family<'_>],
    weight: fontdb::Weight,
) -> Option<FontFace> {
    let query = fontdb::Query {
        families,
        weight,
        ..Default::default()
    };
    let id = db.query(&query)?;
    db.with_face_data(id, |data, index| FontFace::new(data.to_vec(), index))
}

/// First face whose family is not an emoji family, for directories holding a single custom font.
fn any_text_face(db: &fontdb::Database) -> Option<FontFace> {
    let face = db.faces().find(|f| {
        !f.families
            .iter()
            .any(|(name, _)| name.to_ascii_lowercase().contains("emoji"))
    })?;
    db.with_face_data(face.id, |data, index| FontFace::new(data.to_vec(), index))
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
