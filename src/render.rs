use bevy::core::FrameCount;
use bevy::prelude::*;

use crate::animation::{coin_tile, entity_sprite, player_tile, SpriteCell};
use crate::components::*;
use crate::interaction::RoomEntity;
use crate::room::GameWorld;
use crate::sprites::SpriteAssets;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, (rebuild_room_tiles, draw_actors).chain());
    }
}

const TILE_Z: f32 = 0.0;
const ENTITY_Z: f32 = 1.0;
const PLAYER_Z: f32 = 2.0;
const HUD_Z: f32 = 3.0;

/// Static tile of the active room.
#[derive(Component)]
struct RoomTile;

/// Pooled sprite for the `n`th drawn actor (entities, player, HUD icons).
#[derive(Component)]
struct ActorSprite(usize);

/// Transform for an 8×8 cell whose top-left corner is at room pixel `(x, y)`.
///
/// Room pixels grow down from the top-left; the camera is centred on the
/// room with y up.
pub fn room_to_world(x: f32, y: f32, z: f32) -> Transform {
    let half = TILE_SIZE / 2.0;
    Transform::from_xyz(
        x + half - MAP_SIZE / 2.0,
        MAP_SIZE / 2.0 - y - half,
        z,
    )
}

fn spawn_camera(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scale: 1.0 / config.window_scale,
            ..OrthographicProjection::default_2d()
        },
    ));
}

fn rebuild_room_tiles(
    mut commands: Commands,
    world: Res<GameWorld>,
    sprites: Res<SpriteAssets>,
    tiles: Query<Entity, With<RoomTile>>,
    mut drawn_generation: Local<Option<u64>>,
) {
    let generation = world.room.generation();
    if *drawn_generation == Some(generation) {
        return;
    }
    *drawn_generation = Some(generation);

    for entity in tiles.iter() {
        commands.entity(entity).despawn();
    }

    let view = world.room.view();
    for col in 0..ROOM_CELLS {
        for row in 0..ROOM_CELLS {
            let x = col as f32 * TILE_SIZE;
            let y = row as f32 * TILE_SIZE;
            let tile = view.block_at(x, y);
            // Spawn markers are hidden behind the background.
            if tile == EMPTY_TILE || RoomEntity::from_marker(tile, x, y).is_some() {
                continue;
            }
            commands.spawn((RoomTile, sprites.sprite(tile), room_to_world(x, y, TILE_Z)));
        }
    }
}

/// Everything drawn over the tiles this frame, back to front.
fn actor_cells(world: &GameWorld, frame: u64) -> Vec<(SpriteCell, f32)> {
    let mut cells: Vec<(SpriteCell, f32)> = world
        .room
        .entities()
        .iter()
        .filter_map(|entity| entity_sprite(entity, frame))
        .map(|cell| (cell, ENTITY_Z))
        .collect();

    let player = &world.player;
    cells.push((
        SpriteCell {
            tile: player_tile(player),
            x: player.body.x,
            y: player.body.y,
        },
        PLAYER_Z,
    ));

    // HUD icons next to the counters.
    cells.push((
        SpriteCell {
            tile: coin_tile(frame),
            x: 0.0,
            y: 0.0,
        },
        HUD_Z,
    ));
    cells.push((
        SpriteCell {
            tile: STAR_TILE,
            x: 20.0,
            y: 0.0,
        },
        HUD_Z,
    ));
    cells
}

fn draw_actors(
    mut commands: Commands,
    world: Res<GameWorld>,
    sprites: Res<SpriteAssets>,
    frame: Res<FrameCount>,
    mut actors: Query<(&ActorSprite, &mut Sprite, &mut Transform, &mut Visibility)>,
) {
    let cells = actor_cells(&world, frame.0 as u64);
    let mut pooled = vec![false; cells.len()];

    for (slot, mut sprite, mut transform, mut visibility) in actors.iter_mut() {
        let Some(&(cell, z)) = cells.get(slot.0) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        pooled[slot.0] = true;
        *sprite = sprites.sprite(cell.tile);
        *transform = room_to_world(cell.x, cell.y, z);
        *visibility = Visibility::Inherited;
    }

    for (index, &(cell, z)) in cells.iter().enumerate() {
        if !pooled[index] {
            commands.spawn((
                ActorSprite(index),
                sprites.sprite(cell.tile),
                room_to_world(cell.x, cell.y, z),
                Visibility::Inherited,
            ));
        }
    }
}
