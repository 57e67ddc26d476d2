use super::*;

use tempfile::TempDir;

fn write_data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut map = String::from("0 0\n");
    for y in 0..4 {
        for x in 0..6 {
            map.push_str(&format!("{x} {y} grass.png 0 0\n"));
        }
    }
    map.push_str("0 2 chest.txt\n");
    fs::write(dir.path().join("map.txt"), map).unwrap();
    fs::write(
        dir.path().join("chest.txt"),
        "pickup chest.png 1 1\nCHECK THE WELL\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("questions.txt"),
        "WHAT GROWS ON TREES?\nAPPLES\nROCKS\nCLOUDS\n1 0 0\n",
    )
    .unwrap();
    dir
}

fn loaded_world(dir: &TempDir) -> (WorldSimulator, TextureRegistry) {
    let mut textures = TextureRegistry::new();
    let mut sim = WorldSimulator::new(dir.path().to_path_buf());
    sim.load(&mut textures).unwrap();
    (sim, textures)
}

#[test]
fn collision_outside_grid_blocks() {
    let map = TileMap::default();
    assert!(map.collision(0, 0));
    assert!(map.collision(-1, 5));
}

#[test]
fn map_descriptor_parses_tiles_and_placements() {
    let dir = tempfile::tempdir().unwrap();
    let map_path = dir.path().join("map.txt");
    fs::write(
        &map_path,
        "1 2\n0 0 grass.png 0 0\n1 0 tree.png 1 1\n3 1 chest.txt\n",
    )
    .unwrap();

    let mut textures = TextureRegistry::new();
    let mut map = TileMap::default();
    let placements = map.load(&map_path, dir.path(), &mut textures).unwrap();

    assert_eq!(map.spawn(), (1, 2));
    assert_eq!(map.size(), (2, 1));
    assert!(!map.collision(0, 0));
    assert!(map.collision(1, 0));
    assert!(map.collision(5, 5));
    assert_eq!(
        placements,
        vec![ObjectPlacement {
            path: dir.path().join("chest.txt"),
            x: 3,
            y: 1,
        }]
    );
}

#[test]
fn map_descriptor_rejects_bad_layer_index() {
    let dir = tempfile::tempdir().unwrap();
    let map_path = dir.path().join("map.txt");
    fs::write(&map_path, "0 0\n0 0 tile.png 0 5\n").unwrap();

    let mut textures = TextureRegistry::new();
    let mut map = TileMap::default();
    let error = map.load(&map_path, dir.path(), &mut textures).unwrap_err();
    assert!(error.contains("layer index"), "got: {error}");
}

#[test]
fn walker_crosses_a_tile_in_one_long_tick() {
    let mut walker = Walker::at(0, 0);
    let (mut x, mut y) = (0, 0);
    walker.set_destination(TILE, 0);

    let request = walker.tick(WALK_SPEED_MS_PER_PX * TILE as u64, &mut x, &mut y);
    assert_eq!((x, y), (TILE, 0));
    assert_eq!(request, FrameRequest::Settle);
}

#[test]
fn walker_reports_direction_of_travel() {
    let mut walker = Walker::at(0, 0);
    let (mut x, mut y) = (0, 0);
    walker.set_destination(0, -TILE);

    let request = walker.tick(WALK_SPEED_MS_PER_PX, &mut x, &mut y);
    assert_eq!(request, FrameRequest::Advance(Dir::Up));
    assert!(y < 0);
}

#[test]
fn walker_idle_time_does_not_bank_steps() {
    let mut walker = Walker::at(0, 0);
    let (mut x, mut y) = (0, 0);

    walker.tick(10_000, &mut x, &mut y);
    walker.set_destination(TILE, 0);
    assert_eq!(walker.destination(), (TILE, 0));
    walker.tick(WALK_SPEED_MS_PER_PX, &mut x, &mut y);

    // One step due at retarget time plus one earned by the new delta.
    assert_eq!(x, 2);
}

#[test]
fn walk_cycle_loops_and_rest_poses_alternate() {
    let mut textures = TextureRegistry::new();
    let frames = SpriteSet {
        up: Vec::new(),
        down: vec![textures.missing(); 6],
        side: Vec::new(),
    };
    let mut player = GameObject::player(ObjectId(1), ControlSlot::One, 0, 0, frames);

    let mut seen = Vec::new();
    for _ in 0..5 {
        player.advance_frame(Dir::Down);
        seen.push(player.current_frame);
    }
    assert_eq!(seen, vec![1, 2, 3, 4, 1]);

    player.current_frame = 0;
    player.settle_frame();
    assert_eq!(player.current_frame, player.stop_frame);
    player.settle_frame();
    assert_eq!(player.current_frame, 0);
}

#[test]
fn pickup_collection_removes_object_and_starts_quiz() {
    let dir = write_data_dir();
    let (mut sim, _textures) = loaded_world(&dir);
    let mut compositor = Compositor::new(320, 240);
    assert_eq!(sim.remaining_pickups(), 1);
    assert_eq!(sim.objects.len(), 3);

    let input = InputState::default().with_player_dir(Dir::Down, true);
    sim.tick(16, &input, &mut compositor);

    assert_eq!(sim.objects[0].map_y, 1);
    assert_eq!(sim.remaining_pickups(), 0);
    assert_eq!(sim.hints(), ["CHECK THE WELL".to_string()]);
    assert!(sim.quiz.in_quiz());
    assert_eq!(sim.objects.len(), 2);
}

#[test]
fn blocked_step_turns_without_moving() {
    let dir = write_data_dir();
    let (mut sim, _textures) = loaded_world(&dir);
    let mut compositor = Compositor::new(320, 240);

    // Player two stands directly to the right of player one.
    let input = InputState::default().with_player_dir(Dir::Right, true);
    sim.tick(16, &input, &mut compositor);

    assert_eq!((sim.objects[0].map_x, sim.objects[0].map_y), (0, 0));
    assert_eq!(sim.objects[0].facing, Dir::Right);
}

#[test]
fn step_off_the_map_is_blocked() {
    let dir = write_data_dir();
    let (mut sim, _textures) = loaded_world(&dir);
    let mut compositor = Compositor::new(320, 240);

    let input = InputState::default().with_player_dir(Dir::Up, true);
    sim.tick(16, &input, &mut compositor);

    assert_eq!((sim.objects[0].map_x, sim.objects[0].map_y), (0, 0));
    assert_eq!(sim.objects[0].facing, Dir::Up);
}

#[test]
fn camera_centers_on_truncated_anchor_mean() {
    let dir = write_data_dir();
    let (mut sim, _textures) = loaded_world(&dir);
    let mut compositor = Compositor::new(320, 240);

    sim.tick(16, &InputState::default(), &mut compositor);

    // Player centers sit at tiles (1, 1) and (3, 1).
    assert_eq!(compositor.center(), (2 * TILE, TILE));
    assert_eq!(compositor.logical_size(), (320, 240));
}

#[test]
fn viewport_grows_to_cover_anchor_spread_and_never_shrinks() {
    let dir = write_data_dir();
    let (mut sim, _textures) = loaded_world(&dir);
    let mut compositor = Compositor::new(320, 240);

    // Anchor centers at tiles (1, 1) and (31, 31): a 30x30 tile spread
    // needs the multiplier to reach 8 before 4m x 3m covers it.
    sim.objects[1].map_x = 30;
    sim.objects[1].map_y = 30;
    sim.tick(16, &InputState::default(), &mut compositor);
    assert_eq!(compositor.logical_size(), (512, 384));

    // Anchors rejoining does not shrink the viewport back.
    sim.objects[1].map_x = 2;
    sim.objects[1].map_y = 0;
    sim.tick(16, &InputState::default(), &mut compositor);
    assert_eq!(compositor.logical_size(), (512, 384));
}

#[test]
fn playtime_freezes_while_paused() {
    let dir = write_data_dir();
    let (mut sim, _textures) = loaded_world(&dir);
    let mut compositor = Compositor::new(320, 240);

    sim.set_paused(true);
    let input = InputState::default().with_player_dir(Dir::Down, true);
    sim.tick(500, &input, &mut compositor);
    assert_eq!(sim.playtime_ms(), 0);
    assert_eq!(sim.objects[0].map_y, 0);

    sim.set_paused(false);
    sim.tick(7, &InputState::default(), &mut compositor);
    assert_eq!(sim.playtime_ms(), 7);
}

#[test]
fn unload_object_frees_its_footprint() {
    let dir = write_data_dir();
    let (mut sim, _textures) = loaded_world(&dir);
    let mut compositor = Compositor::new(320, 240);
    let pickup_id = sim.objects[2].id;

    sim.unload_object(pickup_id);
    assert_eq!(sim.objects.len(), 2);

    // The freed cell no longer collects anything.
    let input = InputState::default().with_player_dir(Dir::Down, true);
    sim.tick(16, &input, &mut compositor);
    assert_eq!(sim.objects[0].map_y, 1);
    assert_eq!(sim.hints().len(), 0);
}

#[test]
fn object_descriptor_rejects_unknown_tag() {
    let dir = tempfile::tempdir().unwrap();
    let object_path = dir.path().join("portal.txt");
    fs::write(&object_path, "warp portal.png 1 1\n").unwrap();

    let mut textures = TextureRegistry::new();
    let mut sim = WorldSimulator::new(dir.path().to_path_buf());
    let error = sim
        .load_object(&object_path, 0, 0, &mut textures)
        .unwrap_err();
    assert!(error.contains("unknown type tag"), "got: {error}");
}

#[test]
fn pickup_descriptor_requires_a_hint() {
    let dir = tempfile::tempdir().unwrap();
    let object_path = dir.path().join("chest.txt");
    fs::write(&object_path, "pickup chest.png 1 1\n").unwrap();

    let mut textures = TextureRegistry::new();
    let mut sim = WorldSimulator::new(dir.path().to_path_buf());
    let error = sim
        .load_object(&object_path, 0, 0, &mut textures)
        .unwrap_err();
    assert!(error.contains("hint"), "got: {error}");
}

#[test]
fn quiz_accepts_only_the_exact_answer_set() {
    let dir = tempfile::tempdir().unwrap();
    let bank = dir.path().join("questions.txt");
    fs::write(&bank, "PICK THE FIRST\nA\nB\nC\n1 0 0\n").unwrap();

    let mut quiz = QuizManager::default();
    quiz.load(&bank).unwrap();
    quiz.start();
    quiz.tick();
    assert!(quiz.in_quiz());
    assert!(quiz.current_question().is_some());

    assert!(!quiz.submit([false, true, false]));
    assert!(quiz.in_quiz());
    assert!(!quiz.submit([true, true, false]));

    assert!(quiz.submit([true, false, false]));
    assert!(!quiz.in_quiz());
    assert!(quiz.current_question().is_none());
}

#[test]
fn exhausted_question_bank_never_enters_quiz() {
    let dir = tempfile::tempdir().unwrap();
    let bank = dir.path().join("questions.txt");
    fs::write(&bank, "ONLY ONE\nA\nB\nC\n0 1 1\n").unwrap();

    let mut quiz = QuizManager::default();
    quiz.load(&bank).unwrap();
    quiz.start();
    quiz.tick();
    assert!(quiz.submit([false, true, true]));

    quiz.start();
    assert!(!quiz.in_quiz());
    quiz.tick();
    assert!(quiz.current_question().is_none());
}

#[test]
fn quiz_submission_resets_answer_toggles() {
    let dir = write_data_dir();
    let (mut sim, _textures) = loaded_world(&dir);
    sim.quiz.start();
    sim.quiz.tick();
    let mut ui = UiOverlay::new();

    let toggle = InputState::default().with_answer_pressed(1, true);
    ui.apply_input(&toggle, &mut sim);
    assert!(ui.answer_selected[1]);

    // The bank's only question is correct on answer 1, so this submission
    // is wrong; the toggles still clear for the next attempt.
    let submit = InputState::default().with_confirm_pressed(true);
    ui.apply_input(&submit, &mut sim);
    assert!(sim.quiz.in_quiz());
    assert_eq!(ui.answer_selected, [false; QUIZ_ANSWERS]);
}

#[test]
fn question_bank_rejects_short_records() {
    let dir = tempfile::tempdir().unwrap();
    let bank = dir.path().join("questions.txt");
    fs::write(&bank, "TRUNCATED\nA\nB\n").unwrap();

    let mut quiz = QuizManager::default();
    let error = quiz.load(&bank).unwrap_err();
    assert!(error.contains("missing"), "got: {error}");
}

#[test]
fn wrap_text_breaks_on_semicolons_and_width() {
    assert_eq!(wrap_text("HELLO;WORLD", 36), vec!["HELLO", "WORLD"]);
    assert_eq!(wrap_text("ONE TWO THREE", 7), vec!["ONE TWO", "THREE"]);
    assert!(wrap_text("", 36).is_empty());
}

#[test]
fn footprint_covers_every_cell() {
    let cells: Vec<(i32, i32)> = footprint_cells(2, 3, 2, 2).collect();
    assert_eq!(cells, vec![(2, 3), (3, 3), (2, 4), (3, 4)]);
}
