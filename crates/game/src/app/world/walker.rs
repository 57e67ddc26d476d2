/// What the walk animation should do after a motion tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameRequest {
    None,
    Advance(Dir),
    Settle,
}

/// Deadline-driven pixel interpolator. Tile logic moves in whole tiles;
/// this walks the on-screen position toward the destination one pixel per
/// `WALK_SPEED_MS_PER_PX` and asks for animation frames on its own slower
/// cadence.
#[derive(Debug, Clone)]
pub(crate) struct Walker {
    dest_x: i32,
    dest_y: i32,
    clock_ms: u64,
    move_deadline_ms: u64,
    anim_deadline_ms: u64,
}

impl Walker {
    pub(crate) fn at(x: i32, y: i32) -> Self {
        Self {
            dest_x: x,
            dest_y: y,
            clock_ms: 0,
            move_deadline_ms: 0,
            anim_deadline_ms: 0,
        }
    }

    /// Retargets the interpolation. Both deadlines become due immediately
    /// so a long idle never produces a burst of catch-up steps.
    pub(crate) fn set_destination(&mut self, x: i32, y: i32) {
        self.dest_x = x;
        self.dest_y = y;
        self.move_deadline_ms = self.clock_ms;
        self.anim_deadline_ms = self.clock_ms;
    }

    pub(crate) fn destination(&self) -> (i32, i32) {
        (self.dest_x, self.dest_y)
    }

    pub(crate) fn tick(&mut self, delta_ms: u64, screen_x: &mut i32, screen_y: &mut i32) -> FrameRequest {
        self.clock_ms += delta_ms;

        while self.clock_ms >= self.move_deadline_ms {
            let dx = self.dest_x - *screen_x;
            let dy = self.dest_y - *screen_y;
            if dx == 0 && dy == 0 {
                break;
            }
            // One pixel along the axis with more distance left; a tie means
            // the single-axis tile steps that feed us are already satisfied.
            if dx.abs() > dy.abs() {
                *screen_x += dx.signum();
            } else if dy.abs() > dx.abs() {
                *screen_y += dy.signum();
            } else {
                break;
            }
            self.move_deadline_ms += WALK_SPEED_MS_PER_PX;
        }

        if self.clock_ms >= self.anim_deadline_ms {
            self.anim_deadline_ms = self.clock_ms + WALK_FRAME_TIME_MS;
            let dx = self.dest_x - *screen_x;
            let dy = self.dest_y - *screen_y;
            if dx == 0 && dy == 0 {
                FrameRequest::Settle
            } else if dx.abs() >= dy.abs() {
                FrameRequest::Advance(if dx > 0 { Dir::Right } else { Dir::Left })
            } else {
                FrameRequest::Advance(if dy > 0 { Dir::Down } else { Dir::Up })
            }
        } else {
            FrameRequest::None
        }
    }
}
