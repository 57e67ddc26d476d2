/// Owns the tile map, the object list (players first), and the derived
/// occupancy grid, and drives one simulation tick end to end.
pub(crate) struct WorldSimulator {
    data_dir: PathBuf,
    tilemap: TileMap,
    objects: Vec<GameObject>,
    ids: ObjectIdAllocator,
    // Rebuilt from the object list every tick; never the source of truth.
    occupancy: HashMap<(i32, i32), ObjectId>,
    pending_removals: Vec<ObjectId>,
    playtime_ms: u64,
    paused: bool,
    remaining_pickups: u32,
    hints: Vec<String>,
    view_multiplier: i32,
    pub(crate) quiz: QuizManager,
}

impl WorldSimulator {
    pub(crate) fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            tilemap: TileMap::default(),
            objects: Vec::new(),
            ids: ObjectIdAllocator::default(),
            occupancy: HashMap::new(),
            pending_removals: Vec::new(),
            playtime_ms: 0,
            paused: false,
            remaining_pickups: 0,
            hints: Vec::new(),
            view_multiplier: VIEW_MULTIPLIER_START,
            quiz: QuizManager::default(),
        }
    }

    /// Loads the map, its placed objects, both players, and the question
    /// bank. Players sit at the front of the object list so they tick and
    /// draw before scenery.
    pub(crate) fn load(&mut self, textures: &mut TextureRegistry) -> Result<(), String> {
        let map_path = self.data_dir.join(MAP_FILE);
        let placements = self.tilemap.load(&map_path, &self.data_dir, textures)?;

        self.objects.clear();
        self.pending_removals.clear();
        self.hints.clear();
        self.remaining_pickups = 0;
        self.playtime_ms = 0;

        let (spawn_x, spawn_y) = self.tilemap.spawn();
        let sprite_dir = self.data_dir.join(PLAYER_SPRITE_DIR);
        for (controls, offset_x) in [(ControlSlot::One, 0), (ControlSlot::Two, 2)] {
            let frames = load_player_sprites(textures, &sprite_dir)?;
            let id = self.ids.allocate();
            self.objects.push(GameObject::player(
                id,
                controls,
                spawn_x + offset_x,
                spawn_y,
                frames,
            ));
        }

        for placement in placements {
            self.load_object(&placement.path, placement.x, placement.y, textures)?;
        }

        self.quiz.load(&self.data_dir.join(QUESTION_FILE))?;
        self.rebuild_occupancy();
        info!(
            objects = self.objects.len(),
            pickups = self.remaining_pickups,
            questions = self.quiz.question_count(),
            "world_loaded"
        );
        Ok(())
    }

    /// Parses an object descriptor and spawns it at (x, y). First line:
    /// `static|pickup texture_path size_x size_y`; a pickup's second line
    /// is its hint text.
    pub(crate) fn load_object(
        &mut self,
        path: &Path,
        x: i32,
        y: i32,
        textures: &mut TextureRegistry,
    ) -> Result<ObjectId, String> {
        let raw = fs::read_to_string(path)
            .map_err(|error| format!("read object {}: {error}", path.display()))?;
        let mut lines = raw.lines();
        let header = lines
            .next()
            .ok_or_else(|| format!("object {} is empty", path.display()))?;
        let mut tokens = header.split_whitespace();
        let tag = tokens
            .next()
            .ok_or_else(|| format!("object {} has no type tag", path.display()))?;
        let texture_path = tokens
            .next()
            .ok_or_else(|| format!("object {} has no texture path", path.display()))?;
        let size_x = next_i32(&mut tokens, "object width")?;
        let size_y = next_i32(&mut tokens, "object height")?;
        if size_x < 1 || size_y < 1 {
            return Err(format!(
                "object {} has degenerate size {size_x}x{size_y}",
                path.display()
            ));
        }

        let kind = match tag {
            "static" => ObjectKind::Static,
            "pickup" => {
                let hint = lines
                    .next()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .ok_or_else(|| format!("pickup {} is missing its hint line", path.display()))?;
                ObjectKind::Pickup {
                    hint: hint.to_string(),
                }
            }
            other => {
                return Err(format!(
                    "object {} has unknown type tag '{other}'",
                    path.display()
                ))
            }
        };

        let texture = textures
            .load(&self.data_dir.join(texture_path))
            .map_err(|error| error.to_string())?;
        if matches!(kind, ObjectKind::Pickup { .. }) {
            self.remaining_pickups = self.remaining_pickups.saturating_add(1);
        }
        let id = self.ids.allocate();
        self.objects
            .push(GameObject::fixture(id, kind, x, y, size_x, size_y, texture));
        self.rebuild_occupancy();
        Ok(id)
    }

    pub(crate) fn unload_object(&mut self, id: ObjectId) {
        self.objects.retain(|object| object.id != id);
        self.rebuild_occupancy();
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub(crate) fn playtime_ms(&self) -> u64 {
        self.playtime_ms
    }

    pub(crate) fn remaining_pickups(&self) -> u32 {
        self.remaining_pickups
    }

    pub(crate) fn hints(&self) -> &[String] {
        &self.hints
    }

    pub(crate) fn tick(&mut self, delta_ms: u64, input: &InputState, compositor: &mut Compositor) {
        if !self.paused {
            self.playtime_ms += delta_ms;
        }
        self.rebuild_occupancy();
        self.tilemap.render(compositor);

        let mut anchor_sum = (0i64, 0i64);
        let mut anchor_bounds: Option<(i32, i32, i32, i32)> = None;
        let mut anchor_count = 0i64;

        for index in 0..self.objects.len() {
            if !self.paused {
                self.objects[index].tick_motion(delta_ms);
                if let ObjectKind::Player { controls } = self.objects[index].kind {
                    if self.objects[index].resting() {
                        if let Some(dir) = held_dir(input, controls) {
                            self.try_step(index, dir);
                        }
                    }
                }
            }

            let object = &self.objects[index];
            object.enqueue_draw(compositor);
            if object.camera_anchor {
                let (cx, cy) = object.center_tile();
                anchor_sum.0 += cx as i64;
                anchor_sum.1 += cy as i64;
                anchor_count += 1;
                anchor_bounds = Some(match anchor_bounds {
                    None => (cx, cx, cy, cy),
                    Some((min_x, max_x, min_y, max_y)) => {
                        (min_x.min(cx), max_x.max(cx), min_y.min(cy), max_y.max(cy))
                    }
                });
            }
        }

        if anchor_count > 0 {
            // Truncating integer mean, in tiles, scaled back to pixels.
            let camera_x = (anchor_sum.0 / anchor_count) as i32;
            let camera_y = (anchor_sum.1 / anchor_count) as i32;
            compositor.set_center(camera_x * TILE, camera_y * TILE);

            if let Some((min_x, max_x, min_y, max_y)) = anchor_bounds {
                let span_x = max_x - min_x;
                let span_y = max_y - min_y;
                while 4 * self.view_multiplier < span_x && 3 * self.view_multiplier < span_y {
                    self.view_multiplier += 1;
                }
            }
            compositor.set_logical_size(
                (4 * self.view_multiplier * TILE) as u32,
                (3 * self.view_multiplier * TILE) as u32,
            );
        }

        self.quiz.tick();
        self.apply_pending_removals();
    }

    /// Attempts one tile step for the object at `index`. The object turns
    /// to face the direction even when the step is blocked. Walking into a
    /// pickup collects it and does not block.
    fn try_step(&mut self, index: usize, dir: Dir) {
        self.objects[index].facing = dir;
        let (dx, dy) = dir.delta();
        let target_x = self.objects[index].map_x + dx;
        let target_y = self.objects[index].map_y + dy;
        let size_x = self.objects[index].size_x;
        let size_y = self.objects[index].size_y;
        let self_id = self.objects[index].id;

        for (cx, cy) in footprint_cells(target_x, target_y, size_x, size_y) {
            if self.tilemap.collision(cx, cy) {
                return;
            }
        }

        let mut collected: Vec<ObjectId> = Vec::new();
        for (cx, cy) in footprint_cells(target_x, target_y, size_x, size_y) {
            let Some(other_id) = self.occupancy.get(&(cx, cy)).copied() else {
                continue;
            };
            if other_id == self_id {
                continue;
            }
            let Some(other) = self.objects.iter().find(|object| object.id == other_id) else {
                continue;
            };
            match other.collide() {
                CollideOutcome::Block => return,
                CollideOutcome::Collect { .. } => {
                    if !collected.contains(&other_id) {
                        collected.push(other_id);
                    }
                }
            }
        }

        for id in collected {
            self.collect_pickup(id);
        }

        let object = &mut self.objects[index];
        object.map_x = target_x;
        object.map_y = target_y;
        if let Some(walker) = object.walker.as_mut() {
            walker.set_destination(target_x * TILE, target_y * TILE);
        }
    }

    fn collect_pickup(&mut self, id: ObjectId) {
        if self.pending_removals.contains(&id) {
            return;
        }
        let Some(object) = self.objects.iter().find(|object| object.id == id) else {
            return;
        };
        let ObjectKind::Pickup { hint } = &object.kind else {
            return;
        };
        self.remaining_pickups = self.remaining_pickups.saturating_sub(1);
        self.hints.push(hint.clone());
        self.pending_removals.push(id);
        self.quiz.start();
        info!(remaining = self.remaining_pickups, "pickup_collected");
    }

    fn apply_pending_removals(&mut self) {
        if self.pending_removals.is_empty() {
            return;
        }
        let removals = std::mem::take(&mut self.pending_removals);
        self.objects.retain(|object| !removals.contains(&object.id));
        self.rebuild_occupancy();
    }

    fn rebuild_occupancy(&mut self) {
        self.occupancy.clear();
        for object in &self.objects {
            for cell in object.footprint() {
                self.occupancy.insert(cell, object.id);
            }
        }
    }
}

fn held_dir(input: &InputState, controls: ControlSlot) -> Option<Dir> {
    ALL_DIRS.into_iter().find(|dir| match controls {
        ControlSlot::One => input.player_dir_down(*dir),
        ControlSlot::Two => input.player2_dir_down(*dir),
    })
}

/// Six-frame walk cycle per facing: rest, step, rest, other step, rest,
/// alternate idle pose. Missing files fall back to the stand-in fill.
fn load_player_sprites(
    textures: &mut TextureRegistry,
    sprite_dir: &Path,
) -> Result<SpriteSet, String> {
    Ok(SpriteSet {
        up: load_walk_frames(textures, sprite_dir, "u")?,
        down: load_walk_frames(textures, sprite_dir, "d")?,
        side: load_walk_frames(textures, sprite_dir, "s")?,
    })
}

fn load_walk_frames(
    textures: &mut TextureRegistry,
    sprite_dir: &Path,
    prefix: &str,
) -> Result<Vec<TextureHandle>, String> {
    let load = |textures: &mut TextureRegistry, name: String| {
        textures
            .load(&sprite_dir.join(name))
            .map_err(|error| error.to_string())
    };
    let rest = load(textures, format!("{prefix}.png"))?;
    let step_a = load(textures, format!("{prefix}1.png"))?;
    let step_b = load(textures, format!("{prefix}2.png"))?;
    let idle_alt = load(textures, format!("{prefix}3.png"))?;
    Ok(vec![
        rest.clone(),
        step_a,
        rest.clone(),
        step_b,
        rest,
        idle_alt,
    ])
}
