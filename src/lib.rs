//! GlowUp is a photo editing engine: adjustment sliders, named color filters, text and emoji
//! overlays, and a CPU compositor that flattens everything into a PNG.
//!
//! # Pipeline overview
//!
//! 1. **Edit**: [`AdjustmentState`] (sliders + one [`NamedFilter`]) and [`OverlayModel`]
//!    (texts and stickers in percent space), moved by a [`DragController`].
//! 2. **Preview**: [`AdjustmentState::preview_expression`] derives the CSS-style filter string.
//! 3. **Compile**: `AdjustmentState + OverlayModel -> CompositePlan` (photo filter steps plus
//!    ordered overlay draw ops, stickers before texts).
//! 4. **Composite**: filter the photo on the CPU, rasterize overlays through an
//!    [`OverlayBackend`], blend, and encode PNG ([`render_png`]).
//! 5. **Persist**: an [`EditorSession`] exports to disk, shares, or saves into the signed-in
//!    user's gallery through a [`Gateway`] ([`LocalGateway`] keeps everything in SQLite and a
//!    directory).
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Overlays are never filtered**: filters apply to the photo only.
//! - **Identity is exact**: a default edit with no overlays reproduces the source pixels.
#![forbid(unsafe_code)]

mod compile;
mod edit;
mod foundation;
mod overlay;
mod render;

pub mod compositor;
pub mod config;
pub mod gateway;
pub mod session;

pub use compile::{CompositePlan, OverlayOp, StickerOp, TextOp, compile_plan};
pub use compositor::{MAX_CANVAS_SIDE, RenderedImage, composite, render, render_png};
pub use config::AppConfig;
pub use edit::adjust::{
    Adjustment, AdjustmentPatch, AdjustmentState, BEAUTY_BLUR_PER_UNIT, BEAUTY_MAX, PERCENT_MAX,
};
pub use edit::document::EditDocument;
pub use edit::filters::{FilterFn, NamedFilter, fmt_num, normalize_steps, parse_filter_expr};
pub use foundation::core::{
    Affine, Canvas, HexColor, Point, Rect, Rng64, Vec2, clamp_percent, unix_millis,
};
pub use foundation::error::{
    AuthErrorKind, DatabaseErrorKind, GlowupError, GlowupResult, StorageErrorKind,
};
pub use gateway::{
    AuthEvent, Gateway, LocalGateway, NewPhoto, PHOTOS_BUCKET, PhotoId, PhotoRow, SavedPhoto,
    SignUpMetadata, Subscription, User, UserId,
};
pub use overlay::drag::{DragController, DragState, PointerCapture};
pub use overlay::model::{
    FontWeight, MAX_OVERLAY_ID, Overlay, OverlayId, OverlayModel, STICKER_SIZE, Sticker,
    StickerOverlay, TEXT_SIZE_DEFAULT, TEXT_SIZE_MAX, TEXT_SIZE_MIN, TextOverlay, TextPatch,
};
pub use render::decode::{DecodedImage, decode_image};
pub use render::encode::encode_png;
pub use render::filter_cpu::apply_filter_steps;
pub use render::{CpuBackend, FontBook, FontFace, FrameRGBA, OverlayBackend, execute_plan};
pub use session::{
    EditorSession, Notice, NoticeKind, ShareOutcome, SharePayload, ShareTarget,
};
