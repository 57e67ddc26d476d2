use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use engine::timeutil::split_playtime;
use engine::{
    Compositor, Dir, DrawItem, EngineCtx, Game, GameCommand, InputState, TextColor, TextureHandle,
    TextureRegistry, ALL_DIRS, DIR_COUNT, TILE_SIZE,
};
use rand::Rng;
use tracing::info;

const TILE: i32 = TILE_SIZE as i32;
// One pixel of interpolated travel per SPEED milliseconds; walk animation
// advances one frame per ten pixels of travel.
const WALK_SPEED_MS_PER_PX: u64 = 5;
const WALK_FRAME_TIME_MS: u64 = 10 * WALK_SPEED_MS_PER_PX;

const TILE_LAYER_GROUND: i32 = 0;
const OBJECT_LAYER: i32 = 1;
const TILE_LAYER_CANOPY: i32 = 2;
const UI_TEXT_LAYER: i32 = 10;
const UI_FOCUS_LAYER: i32 = 11;

const UI_MARGIN_PX: i32 = 8;
const UI_LINE_SPACING_PX: i32 = 12;
const UI_WRAP_CHARS: usize = 36;

// The logical viewport is 4m x 3m tiles; m grows to keep every camera
// anchor on screen and never shrinks back.
const VIEW_MULTIPLIER_START: i32 = 5;

const MAP_FILE: &str = "map.txt";
const QUESTION_FILE: &str = "questions.txt";
const PLAYER_SPRITE_DIR: &str = "player";

include!("types.rs");
include!("walker.rs");
include!("tilemap.rs");
include!("quiz.rs");
include!("simulator.rs");
include!("ui.rs");
include!("game_impl.rs");

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
