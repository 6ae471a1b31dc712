mod backend;
mod glyphs;
mod raster;
mod window;

pub use backend::{DrawCommand, HeadlessBackend, RenderBackend};
pub use window::{BackendError, PixelsBackend};

/// Horizontal advance of one character drawn by [`PixelsBackend::draw_text`].
pub const TEXT_ADVANCE_PX: f32 = raster::GLYPH_ADVANCE as f32;
