use crate::components::*;

/// Grid of sprite-sheet references covering every room side by side.
///
/// Room `i` occupies columns `i * ROOM_CELLS .. (i + 1) * ROOM_CELLS`.
/// Cells outside the grid read as [`EMPTY_TILE`].
#[derive(Clone, Debug, Default)]
pub struct Tilemap {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileRef>,
}

impl Tilemap {
    pub fn filled(width: usize, height: usize, tile: TileRef) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; width * height],
        }
    }

    pub fn get(&self, x: i32, y: i32) -> TileRef {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return EMPTY_TILE;
        }
        self.tiles[y as usize * self.width + x as usize]
    }

    pub fn set(&mut self, x: i32, y: i32, tile: TileRef) {
        if x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32 {
            self.tiles[y as usize * self.width + x as usize] = tile;
        }
    }

    /// Number of whole rooms stored in the strip.
    pub fn room_count(&self) -> usize {
        self.width / ROOM_CELLS
    }

    /// The baked level strip: six playable rooms and the win screen.
    pub fn level_strip() -> Self {
        let mut map = Self::filled(ROOM_CELLS * ROOM_COUNT, ROOM_CELLS, EMPTY_TILE);

        // Room 0: flat floor, a ledge to hop on.
        map.ground(0, 0..16, 13);
        map.fill(0, 8..11, 11, PLATFORM_TILE);
        map.place(0, 4, 12, COIN_TILE);
        map.place(0, 6, 12, COIN_TILE);
        map.place(0, 9, 10, COIN_TILE);
        map.exit(0, 13);

        // Room 1: first pit, the chest behind it.
        map.ground(1, 0..6, 13);
        map.ground(1, 8..16, 13);
        map.place(1, 3, 12, COIN_TILE);
        map.place(1, 11, 12, CHEST_TILE);
        map.exit(1, 13);

        // Room 2: a spider patrols an island between two pits.
        map.ground(2, 0..3, 13);
        map.ground(2, 5..12, 13);
        map.ground(2, 14..16, 13);
        map.place(2, 8, 12, SPIDER_TILE);
        map.place(2, 6, 12, COIN_TILE);
        map.exit(2, 13);

        // Room 3: a spring launches over the tower.
        map.ground(3, 0..12, 13);
        map.ground(3, 12..16, 5);
        map.place(3, 10, 12, SPRING_TILE);
        map.place(3, 13, 4, COIN_TILE);
        map.exit(3, 5);

        // Room 4: drop down from the tower, second spider, chest.
        map.ground(4, 0..4, 5);
        map.ground(4, 4..16, 13);
        map.fill(4, 6..9, 9, PLATFORM_TILE);
        map.place(4, 7, 8, COIN_TILE);
        map.place(4, 10, 12, SPIDER_TILE);
        map.place(4, 14, 12, CHEST_TILE);
        map.exit(4, 13);

        // Room 5: semi-solid stairs.
        map.ground(5, 0..16, 13);
        map.fill(5, 4..7, 11, PLATFORM_TILE);
        map.fill(5, 8..11, 9, PLATFORM_TILE);
        map.place(5, 5, 10, COIN_TILE);
        map.place(5, 9, 8, COIN_TILE);
        map.place(5, 12, 12, SPRING_TILE);
        map.exit(5, 13);

        // Win screen.
        map.ground(WIN_ROOM, 0..16, 13);

        map
    }

    fn place(&mut self, room: usize, col: usize, row: usize, tile: TileRef) {
        self.set((room * ROOM_CELLS + col) as i32, row as i32, tile);
    }

    fn fill(&mut self, room: usize, cols: std::ops::Range<usize>, row: usize, tile: TileRef) {
        for col in cols {
            self.place(room, col, row, tile);
        }
    }

    /// Solid ground from `top` down to the bottom of the room.
    fn ground(&mut self, room: usize, cols: std::ops::Range<usize>, top: usize) {
        for row in top..ROOM_CELLS {
            let tile = if row == top {
                GROUND_TILE
            } else {
                TileRef::new(GROUND_TILE.u, GROUND_TILE.v + 1)
            };
            self.fill(room, cols.clone(), row, tile);
        }
    }

    /// Exit markers on the last column, covering the rows a player standing
    /// on a floor whose top row is `floor` can occupy.
    fn exit(&mut self, room: usize, floor: usize) {
        for row in floor.saturating_sub(3)..floor {
            self.place(room, ROOM_CELLS - 1, row, EXIT_TILE);
        }
    }
}

/// Tile lookup in one room's pixel coordinate space.
#[derive(Clone, Copy)]
pub struct RoomView<'a> {
    pub tilemap: &'a Tilemap,
    pub room: usize,
}

impl<'a> RoomView<'a> {
    pub fn new(tilemap: &'a Tilemap, room: usize) -> Self {
        Self { tilemap, room }
    }

    /// Horizontal pixel offset of the room inside the strip.
    pub fn offset(&self) -> f32 {
        self.room as f32 * MAP_SIZE
    }

    /// Tile under the room pixel `(x, y)`.
    pub fn block_at(&self, x: f32, y: f32) -> TileRef {
        let tx = ((x + self.offset()) / TILE_SIZE).floor() as i32;
        let ty = (y / TILE_SIZE).floor() as i32;
        self.tilemap.get(tx, ty)
    }
}

/// Whether `block` stops movement.
///
/// Rows below 25 are solid. Row 25 from column 3 on is a semi-solid
/// platform, solid only when `semi_collide` is set (moving down).
pub fn is_wall(block: TileRef, semi_collide: bool) -> bool {
    block.v > 25 || (semi_collide && block.v == 25 && block.u >= 3)
}
