mod game;
mod input;
mod loop_runner;
mod rendering;

pub use game::{EngineCtx, Game, GameCommand};
pub use input::{Dir, InputState, ALL_DIRS, ANSWER_COUNT, DIR_COUNT};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{
    rasterize_text, Compositor, DrawItem, FramePresenter, RenderSink, TextColor, Texture,
    TextureError, TextureHandle, TextureRegistry, GLYPH_ADVANCE, TEXT_HEIGHT, TILE_SIZE,
};
