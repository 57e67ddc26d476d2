const TILE_IMAGE_LAYERS: usize = 2;

#[derive(Debug, Clone, Default)]
pub(crate) struct TileCell {
    collision: bool,
    layers: [Option<TextureHandle>; TILE_IMAGE_LAYERS],
}

/// Object placement deferred to the world: a `.txt` reference inside a map
/// descriptor names an object file to load at that cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ObjectPlacement {
    pub(crate) path: PathBuf,
    pub(crate) x: i32,
    pub(crate) y: i32,
}

/// Dense tile grid. Storage grows to cover whatever cells the map
/// descriptor touches and only resets on reload.
#[derive(Default)]
pub(crate) struct TileMap {
    width: i32,
    height: i32,
    cells: Vec<TileCell>,
    spawn_x: i32,
    spawn_y: i32,
}

impl TileMap {
    pub(crate) fn spawn(&self) -> (i32, i32) {
        (self.spawn_x, self.spawn_y)
    }

    pub(crate) fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Anything outside the stored grid collides.
    pub(crate) fn collision(&self, x: i32, y: i32) -> bool {
        match self.cell_index(x, y) {
            Some(index) => self.cells[index].collision,
            None => true,
        }
    }

    /// Parses a map descriptor and rebuilds the grid from it. Returns the
    /// object placements found; the caller loads those. Format: a spawn
    /// coordinate pair, then `x y path` records until end of file, where a
    /// `.png` path is followed by its collision flag and tile layer index.
    pub(crate) fn load(
        &mut self,
        map_path: &Path,
        root: &Path,
        textures: &mut TextureRegistry,
    ) -> Result<Vec<ObjectPlacement>, String> {
        let raw = fs::read_to_string(map_path)
            .map_err(|error| format!("read map {}: {error}", map_path.display()))?;
        let mut tokens = raw.split_whitespace();

        self.width = 0;
        self.height = 0;
        self.cells.clear();
        self.spawn_x = next_i32(&mut tokens, "spawn x")?;
        self.spawn_y = next_i32(&mut tokens, "spawn y")?;

        let mut placements = Vec::new();
        loop {
            let x = match tokens.next() {
                Some(token) => parse_i32(token, "tile x")?,
                None => break,
            };
            let y = next_i32(&mut tokens, "tile y")?;
            let path = tokens
                .next()
                .ok_or_else(|| format!("map record at ({x}, {y}) is missing its path"))?;

            if path.ends_with(".png") {
                let collides = next_i32(&mut tokens, "tile collision flag")? != 0;
                let layer = next_i32(&mut tokens, "tile layer index")?;
                if !(0..TILE_IMAGE_LAYERS as i32).contains(&layer) {
                    return Err(format!("tile layer index {layer} at ({x}, {y}) is out of range"));
                }
                let texture = textures
                    .load(&root.join(path))
                    .map_err(|error| error.to_string())?;
                self.set_tile(x, y, collides, layer as usize, texture)?;
            } else if path.ends_with(".txt") {
                placements.push(ObjectPlacement {
                    path: root.join(path),
                    x,
                    y,
                });
            } else {
                return Err(format!("unsupported map entry {path} at ({x}, {y})"));
            }
        }

        info!(
            map = %map_path.display(),
            width = self.width,
            height = self.height,
            objects = placements.len(),
            "map_loaded"
        );
        Ok(placements)
    }

    pub(crate) fn set_tile(
        &mut self,
        x: i32,
        y: i32,
        collides: bool,
        layer: usize,
        texture: TextureHandle,
    ) -> Result<(), String> {
        if x < 0 || y < 0 {
            return Err(format!("tile coordinate ({x}, {y}) is negative"));
        }
        self.ensure_cell(x, y);
        let index = self
            .cell_index(x, y)
            .ok_or_else(|| format!("tile coordinate ({x}, {y}) out of grown bounds"))?;
        let cell = &mut self.cells[index];
        cell.collision = cell.collision || collides;
        cell.layers[layer] = Some(texture);
        Ok(())
    }

    /// Queues every stored tile image, ground layer below objects and the
    /// canopy layer above them.
    pub(crate) fn render(&self, compositor: &mut Compositor) {
        for y in 0..self.height {
            for x in 0..self.width {
                let Some(index) = self.cell_index(x, y) else {
                    continue;
                };
                for (layer, texture) in self.cells[index].layers.iter().enumerate() {
                    let Some(texture) = texture else { continue };
                    compositor.enqueue(DrawItem {
                        texture: texture.clone(),
                        x: x * TILE,
                        y: y * TILE,
                        flip_vertical: false,
                        flip_horizontal: false,
                        layer: if layer == 0 {
                            TILE_LAYER_GROUND
                        } else {
                            TILE_LAYER_CANOPY
                        },
                        overlay: false,
                    });
                }
            }
        }
    }

    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Grows the grid (never shrinks) so (x, y) is addressable, keeping
    /// existing cells in place.
    fn ensure_cell(&mut self, x: i32, y: i32) {
        let needed_w = self.width.max(x + 1);
        let needed_h = self.height.max(y + 1);
        if needed_w == self.width && needed_h == self.height {
            return;
        }
        let mut grown = vec![TileCell::default(); needed_w as usize * needed_h as usize];
        for old_y in 0..self.height {
            for old_x in 0..self.width {
                let old_index = old_y as usize * self.width as usize + old_x as usize;
                let new_index = old_y as usize * needed_w as usize + old_x as usize;
                grown[new_index] = self.cells[old_index].clone();
            }
        }
        self.width = needed_w;
        self.height = needed_h;
        self.cells = grown;
    }
}

fn next_i32<'a>(tokens: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<i32, String> {
    let token = tokens
        .next()
        .ok_or_else(|| format!("unexpected end of file, expected {what}"))?;
    parse_i32(token, what)
}

fn parse_i32(token: &str, what: &str) -> Result<i32, String> {
    token
        .parse::<i32>()
        .map_err(|_| format!("invalid {what} '{token}'"))
}
