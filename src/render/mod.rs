pub(crate) mod blur_cpu;
pub(crate) mod composite_cpu;
pub(crate) mod cpu;
pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod filter_cpu;
pub(crate) mod fonts;
pub(crate) mod passes;
pub(crate) mod text;

pub use cpu::CpuBackend;
pub use fonts::{FontBook, FontFace};
pub use passes::{OverlayBackend, execute_plan};

/// A readback of RGBA8 pixels, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}
