/// One of the four grid directions. The discriminant order matches the
/// ordering sprite sets and movement tables are indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Left,
    Down,
    Right,
}

pub const DIR_COUNT: usize = 4;

pub const ALL_DIRS: [Dir; DIR_COUNT] = [Dir::Up, Dir::Left, Dir::Down, Dir::Right];

impl Dir {
    pub const fn index(self) -> usize {
        match self {
            Dir::Up => 0,
            Dir::Left => 1,
            Dir::Down => 2,
            Dir::Right => 3,
        }
    }

    /// Tile-space offset of one step in this direction. Y grows downward.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Left => (-1, 0),
            Dir::Down => (0, 1),
            Dir::Right => (1, 0),
        }
    }
}

pub const ANSWER_COUNT: usize = 3;

/// What the keyboard looked like for one simulation tick. Direction keys are
/// level-based (held state), everything else is a single-tick press edge
/// produced by the collector in the loop runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    player_dirs: [bool; DIR_COUNT],
    player2_dirs: [bool; DIR_COUNT],
    pause_pressed: bool,
    confirm_pressed: bool,
    answer_pressed: [bool; ANSWER_COUNT],
}

impl InputState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn player_dir_down(&self, dir: Dir) -> bool {
        self.player_dirs[dir.index()]
    }

    pub fn player2_dir_down(&self, dir: Dir) -> bool {
        self.player2_dirs[dir.index()]
    }

    pub fn pause_pressed(&self) -> bool {
        self.pause_pressed
    }

    pub fn confirm_pressed(&self) -> bool {
        self.confirm_pressed
    }

    pub fn answer_pressed(&self, index: usize) -> bool {
        index < ANSWER_COUNT && self.answer_pressed[index]
    }

    pub(crate) fn set_player_dir(&mut self, dir: Dir, is_down: bool) {
        self.player_dirs[dir.index()] = is_down;
    }

    pub(crate) fn set_player2_dir(&mut self, dir: Dir, is_down: bool) {
        self.player2_dirs[dir.index()] = is_down;
    }

    pub fn with_player_dir(mut self, dir: Dir, is_down: bool) -> Self {
        self.player_dirs[dir.index()] = is_down;
        self
    }

    pub fn with_player2_dir(mut self, dir: Dir, is_down: bool) -> Self {
        self.player2_dirs[dir.index()] = is_down;
        self
    }

    pub fn with_pause_pressed(mut self, pressed: bool) -> Self {
        self.pause_pressed = pressed;
        self
    }

    pub fn with_confirm_pressed(mut self, pressed: bool) -> Self {
        self.confirm_pressed = pressed;
        self
    }

    pub fn with_answer_pressed(mut self, index: usize, pressed: bool) -> Self {
        if index < ANSWER_COUNT {
            self.answer_pressed[index] = pressed;
        }
        self
    }

    pub(crate) fn set_edges(
        &mut self,
        pause: bool,
        confirm: bool,
        answers: [bool; ANSWER_COUNT],
    ) {
        self.pause_pressed = pause;
        self.confirm_pressed = confirm;
        self.answer_pressed = answers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_deltas_are_unit_steps() {
        for dir in ALL_DIRS {
            let (dx, dy) = dir.delta();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }

    #[test]
    fn builder_state_round_trips() {
        let state = InputState::empty()
            .with_player_dir(Dir::Left, true)
            .with_player2_dir(Dir::Up, true)
            .with_answer_pressed(2, true);

        assert!(state.player_dir_down(Dir::Left));
        assert!(!state.player_dir_down(Dir::Up));
        assert!(state.player2_dir_down(Dir::Up));
        assert!(state.answer_pressed(2));
        assert!(!state.answer_pressed(0));
    }

    #[test]
    fn out_of_range_answer_index_reads_false() {
        let state = InputState::empty().with_answer_pressed(9, true);
        assert!(!state.answer_pressed(9));
    }
}
