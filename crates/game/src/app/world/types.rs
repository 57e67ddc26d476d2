#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ObjectId(pub(crate) u64);

#[derive(Debug, Default)]
pub(crate) struct ObjectIdAllocator {
    next: u64,
}

impl ObjectIdAllocator {
    pub(crate) fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Which keyboard half steers a player object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlSlot {
    One,
    Two,
}

#[derive(Debug, Clone)]
pub(crate) enum ObjectKind {
    Player { controls: ControlSlot },
    Static,
    Pickup { hint: String },
}

/// What stepping into an object's footprint does to the mover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CollideOutcome {
    Block,
    Collect { hint: String },
}

/// Animation frames per facing. Objects without directional art populate
/// only `down` and render it for every facing.
#[derive(Debug, Clone, Default)]
pub(crate) struct SpriteSet {
    pub(crate) up: Vec<TextureHandle>,
    pub(crate) down: Vec<TextureHandle>,
    pub(crate) side: Vec<TextureHandle>,
}

impl SpriteSet {
    fn single(texture: TextureHandle) -> Self {
        Self {
            up: Vec::new(),
            down: vec![texture],
            side: Vec::new(),
        }
    }

    fn frames_for(&self, facing: Dir) -> &[TextureHandle] {
        let preferred = match facing {
            Dir::Up => &self.up,
            Dir::Down => &self.down,
            Dir::Left | Dir::Right => &self.side,
        };
        if preferred.is_empty() {
            &self.down
        } else {
            preferred
        }
    }
}

pub(crate) struct GameObject {
    pub(crate) id: ObjectId,
    pub(crate) kind: ObjectKind,
    pub(crate) map_x: i32,
    pub(crate) map_y: i32,
    pub(crate) screen_x: i32,
    pub(crate) screen_y: i32,
    pub(crate) size_x: i32,
    pub(crate) size_y: i32,
    pub(crate) frames: SpriteSet,
    pub(crate) current_frame: usize,
    pub(crate) loop_frame: usize,
    pub(crate) end_frame: usize,
    pub(crate) stop_frame: usize,
    pub(crate) facing: Dir,
    pub(crate) camera_anchor: bool,
    pub(crate) walker: Option<Walker>,
}

impl GameObject {
    /// Fixed scenery or pickup: one frame, one-cell-or-larger footprint,
    /// no walker, never a camera anchor.
    pub(crate) fn fixture(
        id: ObjectId,
        kind: ObjectKind,
        map_x: i32,
        map_y: i32,
        size_x: i32,
        size_y: i32,
        texture: TextureHandle,
    ) -> Self {
        Self {
            id,
            kind,
            map_x,
            map_y,
            screen_x: map_x * TILE,
            screen_y: map_y * TILE,
            size_x,
            size_y,
            frames: SpriteSet::single(texture),
            current_frame: 0,
            loop_frame: 0,
            end_frame: 0,
            stop_frame: 0,
            facing: Dir::Down,
            camera_anchor: false,
            walker: None,
        }
    }

    /// A walking player: six-frame walk cycle per facing, two-by-two tile
    /// footprint, camera anchor.
    pub(crate) fn player(
        id: ObjectId,
        controls: ControlSlot,
        map_x: i32,
        map_y: i32,
        frames: SpriteSet,
    ) -> Self {
        Self {
            id,
            kind: ObjectKind::Player { controls },
            map_x,
            map_y,
            screen_x: map_x * TILE,
            screen_y: map_y * TILE,
            size_x: 2,
            size_y: 2,
            frames,
            current_frame: 0,
            loop_frame: 1,
            end_frame: 4,
            stop_frame: 5,
            facing: Dir::Down,
            camera_anchor: true,
            walker: Some(Walker::at(map_x * TILE, map_y * TILE)),
        }
    }

    /// Steps the walk cycle: after `end_frame` the cycle restarts at
    /// `loop_frame`, so frame 0 is only ever shown at rest.
    pub(crate) fn advance_frame(&mut self, facing: Dir) {
        self.facing = facing;
        self.current_frame += 1;
        if self.current_frame > self.end_frame {
            self.current_frame = self.loop_frame;
        }
    }

    /// Alternates the two rest poses so a standing object still breathes.
    pub(crate) fn settle_frame(&mut self) {
        self.current_frame = if self.current_frame == self.stop_frame {
            0
        } else {
            self.stop_frame
        };
    }

    pub(crate) fn resting(&self) -> bool {
        self.current_frame == 0 || self.current_frame == self.stop_frame
    }

    /// Advances pixel interpolation and the walk animation for one tick.
    pub(crate) fn tick_motion(&mut self, delta_ms: u64) {
        let request = match self.walker.as_mut() {
            Some(walker) => walker.tick(delta_ms, &mut self.screen_x, &mut self.screen_y),
            None => return,
        };
        match request {
            FrameRequest::Advance(dir) => self.advance_frame(dir),
            FrameRequest::Settle => self.settle_frame(),
            FrameRequest::None => {}
        }
    }

    pub(crate) fn footprint(&self) -> FootprintCells {
        footprint_cells(self.map_x, self.map_y, self.size_x, self.size_y)
    }

    pub(crate) fn collide(&self) -> CollideOutcome {
        match &self.kind {
            ObjectKind::Pickup { hint } => CollideOutcome::Collect { hint: hint.clone() },
            _ => CollideOutcome::Block,
        }
    }

    pub(crate) fn center_tile(&self) -> (i32, i32) {
        (self.map_x + self.size_x / 2, self.map_y + self.size_y / 2)
    }

    pub(crate) fn enqueue_draw(&self, compositor: &mut Compositor) {
        let frames = self.frames.frames_for(self.facing);
        if frames.is_empty() {
            return;
        }
        let frame = self.current_frame.min(frames.len() - 1);
        compositor.enqueue(DrawItem {
            texture: frames[frame].clone(),
            x: self.screen_x,
            y: self.screen_y,
            flip_vertical: false,
            // Side art faces right; walking left mirrors it.
            flip_horizontal: self.facing == Dir::Left && !self.frames.side.is_empty(),
            layer: OBJECT_LAYER,
            overlay: false,
        });
    }
}

pub(crate) struct FootprintCells {
    x0: i32,
    x1: i32,
    y1: i32,
    cx: i32,
    cy: i32,
}

pub(crate) fn footprint_cells(x: i32, y: i32, size_x: i32, size_y: i32) -> FootprintCells {
    FootprintCells {
        x0: x,
        x1: x + size_x.max(1) - 1,
        y1: y + size_y.max(1) - 1,
        cx: x,
        cy: y,
    }
}

impl Iterator for FootprintCells {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.cy > self.y1 {
            return None;
        }
        let cell = (self.cx, self.cy);
        self.cx += 1;
        if self.cx > self.x1 {
            self.cx = self.x0;
            self.cy += 1;
        }
        Some(cell)
    }
}
