use bevy::prelude::*;

/// Side of one tile in pixels.
pub const TILE_SIZE: f32 = 8.0;
/// Side of one room in pixels (16 tiles).
pub const MAP_SIZE: f32 = 16.0 * TILE_SIZE;
/// Cells per room side.
pub const ROOM_CELLS: usize = 16;
/// Rooms in the level strip, the last one being the win screen.
pub const ROOM_COUNT: usize = 7;
pub const WIN_ROOM: usize = ROOM_COUNT - 1;

/// Pixels per frame per frame.
pub const GRAVITY: f32 = 0.25;
/// Horizontal pixels per frame for one held direction key.
pub const SPEED: f32 = 1.0;
pub const JUMP: f32 = 4.0;
/// Frames per animation step.
pub const ANIM_SPEED: u32 = 4;

/// Reference to a cell of the sprite sheet, as stored in the tilemap.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, serde::Serialize)]
pub struct TileRef {
    pub u: u8,
    pub v: u8,
}

impl TileRef {
    pub const fn new(u: u8, v: u8) -> Self {
        Self { u, v }
    }
}

pub const EMPTY_TILE: TileRef = TileRef::new(0, 0);
/// Walking into this cell advances to the next room.
pub const EXIT_TILE: TileRef = TileRef::new(17, 0);
pub const COIN_TILE: TileRef = TileRef::new(4, 20);
pub const SPIDER_TILE: TileRef = TileRef::new(0, 19);
pub const SPRING_TILE: TileRef = TileRef::new(4, 22);
pub const CHEST_TILE: TileRef = TileRef::new(1, 20);
/// Solid ground (any tile below row 25 is solid).
pub const GROUND_TILE: TileRef = TileRef::new(1, 26);
/// Semi-solid platform, only solid when landed on from above.
pub const PLATFORM_TILE: TileRef = TileRef::new(3, 25);
/// Star shown above an opened chest.
pub const STAR_TILE: TileRef = TileRef::new(2, 24);

/// Running without a window.
#[derive(Resource, Clone, Copy, Default)]
pub struct HeadlessMode(pub bool);

/// Resolved startup settings used by the render/audio glue.
#[derive(Resource, Clone)]
pub struct GameConfig {
    pub window_scale: f32,
    pub background: Color,
    pub tileset: Option<String>,
    pub music: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_scale: 4.0,
            background: pyxel_color(12),
            tileset: None,
            music: None,
        }
    }
}

/// The default 16-colour pyxel palette, used for background and text.
pub fn pyxel_color(index: usize) -> Color {
    const PALETTE: [u32; 16] = [
        0x000000, 0x2B335F, 0x7E2072, 0x19959C, 0x8B4852, 0x395C98, 0xA9C1FF, 0xEEEEEE,
        0xD4186C, 0xD38441, 0xE9C35B, 0x70C6A9, 0x7696DE, 0xA3A3A3, 0xFF9798, 0xEDC7B0,
    ];
    let rgb = PALETTE[index % PALETTE.len()];
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}
