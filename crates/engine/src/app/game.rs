use super::input::InputState;
use super::rendering::{Compositor, TextureRegistry};

/// Engine-owned services handed to the game each tick.
pub struct EngineCtx<'a> {
    pub textures: &'a mut TextureRegistry,
    pub compositor: &'a mut Compositor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    None,
    Quit,
}

/// The game side of the runtime. `load` runs once before the first tick;
/// `tick` advances the world by `delta_ms` and enqueues this frame's draws
/// on the compositor.
pub trait Game {
    fn load(&mut self, ctx: &mut EngineCtx) -> Result<(), String>;

    fn tick(&mut self, delta_ms: u64, input: &InputState, ctx: &mut EngineCtx) -> GameCommand;
}
