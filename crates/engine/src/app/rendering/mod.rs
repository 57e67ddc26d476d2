mod compositor;
mod frame;
mod text;
mod texture;

pub use compositor::{Compositor, DrawItem, RenderSink};
pub use frame::FramePresenter;
pub use text::{rasterize_text, TextColor, GLYPH_ADVANCE, TEXT_HEIGHT};
pub use texture::{Texture, TextureError, TextureHandle, TextureRegistry};

/// Edge length of one map tile in pixels. Also the size of the solid-fill
/// stand-in texture.
pub const TILE_SIZE: u32 = 16;
