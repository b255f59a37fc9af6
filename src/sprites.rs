use bevy::prelude::*;

use crate::components::*;

/// Cells per row and column of the sprite sheet (256×256 pixels).
pub const SHEET_CELLS: u32 = 32;

pub struct SpritePlugin;

impl Plugin for SpritePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SpriteAssets::default())
            .add_systems(PreStartup, init_sprites);
    }
}

struct SheetHandles {
    image: Handle<Image>,
    layout: Handle<TextureAtlasLayout>,
}

/// The 8×8 sprite sheet, or coloured placeholders when none is configured.
#[derive(Resource, Default)]
pub struct SpriteAssets {
    sheet: Option<SheetHandles>,
}

impl SpriteAssets {
    pub fn sprite(&self, tile: TileRef) -> Sprite {
        match &self.sheet {
            Some(sheet) => Sprite::from_atlas_image(
                sheet.image.clone(),
                TextureAtlas {
                    layout: sheet.layout.clone(),
                    index: atlas_index(tile),
                },
            ),
            None => Sprite::from_color(placeholder_color(tile), Vec2::splat(TILE_SIZE)),
        }
    }
}

pub fn atlas_index(tile: TileRef) -> usize {
    tile.v as usize * SHEET_CELLS as usize + tile.u as usize
}

/// Flat colour standing in for a sheet cell.
pub fn placeholder_color(tile: TileRef) -> Color {
    match (tile.u, tile.v) {
        (_, v) if v > 25 => pyxel_color(4),
        (u, 25) if u >= 3 => pyxel_color(9),
        (17, 0) => pyxel_color(1),
        (4..=7, 20) => pyxel_color(10),
        (1, 20) => pyxel_color(9),
        (2, 24) => pyxel_color(10),
        (4..=6, 22) => pyxel_color(13),
        (0..=7, 19) => pyxel_color(0),
        // Player rows: normal form, then the alternate one.
        (_, 1..=3) => pyxel_color(8),
        (_, 4..=6) => pyxel_color(3),
        _ => pyxel_color(7),
    }
}

fn init_sprites(
    mut sprites: ResMut<SpriteAssets>,
    config: Res<GameConfig>,
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let Some(path) = config.tileset.as_deref() else {
        info!("[roomrun] No tileset configured, drawing placeholder quads");
        return;
    };
    let layout = TextureAtlasLayout::from_grid(
        UVec2::splat(TILE_SIZE as u32),
        SHEET_CELLS,
        SHEET_CELLS,
        None,
        None,
    );
    sprites.sheet = Some(SheetHandles {
        image: asset_server.load(path.to_string()),
        layout: layouts.add(layout),
    });
    info!("[roomrun] Loading tileset {}", path);
}
