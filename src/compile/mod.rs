pub(crate) mod plan;

pub use plan::{CompositePlan, OverlayOp, StickerOp, TextOp, compile_plan};
