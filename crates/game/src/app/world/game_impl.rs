/// Top-level game: the world simulation plus the pause and quiz overlays.
pub struct AdventureGame {
    sim: WorldSimulator,
    ui: UiOverlay,
}

impl AdventureGame {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            sim: WorldSimulator::new(data_dir),
            ui: UiOverlay::new(),
        }
    }
}

impl Game for AdventureGame {
    fn load(&mut self, ctx: &mut EngineCtx) -> Result<(), String> {
        self.sim.load(ctx.textures)
    }

    fn tick(&mut self, delta_ms: u64, input: &InputState, ctx: &mut EngineCtx) -> GameCommand {
        self.ui.apply_input(input, &mut self.sim);
        if self.ui.exit_requested() {
            info!("shutdown_requested");
            return GameCommand::Quit;
        }

        // The overlays freeze the world underneath them.
        self.sim
            .set_paused(self.ui.menu_open() || self.sim.quiz.in_quiz());
        self.sim.tick(delta_ms, input, ctx.compositor);
        self.ui.render(&self.sim, ctx.textures, ctx.compositor);
        GameCommand::None
    }
}
