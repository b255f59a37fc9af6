//! Sprite-sheet cell selection for everything drawn over the tilemap.
//!
//! `frame` is the render frame counter; entity-owned counters are used
//! where the entity has one.

use crate::components::*;
use crate::interaction::RoomEntity;
use crate::player::Player;

/// One sprite to draw: sheet cell and room-pixel top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteCell {
    pub tile: TileRef,
    pub x: f32,
    pub y: f32,
}

fn step(counter: u64) -> u64 {
    counter / ANIM_SPEED as u64
}

pub fn player_tile(player: &Player) -> TileRef {
    let anim = step(player.anim_frame as u64);
    let (u, mut v) = if player.is_attacking() {
        let base = if player.body.right { 0 } else { 3 };
        (base + anim % 3, 1)
    } else {
        let v = if player.body.right { 2 } else { 3 };
        let u = if player.body.dx == 0.0 { 0 } else { anim % 9 };
        (u, v)
    };
    if player.skin {
        v += 3;
    }
    TileRef::new(u as u8, v)
}

/// Animated coin, also used as the HUD icon.
pub fn coin_tile(frame: u64) -> TileRef {
    TileRef::new(COIN_TILE.u + (step(frame) % 4) as u8, COIN_TILE.v)
}

pub fn entity_sprite(entity: &RoomEntity, frame: u64) -> Option<SpriteCell> {
    match entity {
        RoomEntity::Coin(coin) => (!coin.collected).then(|| SpriteCell {
            tile: coin_tile(frame),
            x: coin.x,
            y: coin.y,
        }),
        RoomEntity::Chest(chest) => {
            if !chest.opened {
                Some(SpriteCell {
                    tile: CHEST_TILE,
                    x: chest.x,
                    y: chest.y,
                })
            } else if chest.shows_star() {
                Some(SpriteCell {
                    tile: STAR_TILE,
                    x: chest.x,
                    y: chest.y - TILE_SIZE,
                })
            } else {
                None
            }
        }
        RoomEntity::Spring(spring) => Some(SpriteCell {
            tile: TileRef::new(
                SPRING_TILE.u + step(spring.anim_frame as u64) as u8,
                SPRING_TILE.v,
            ),
            x: spring.x,
            y: spring.y,
        }),
        RoomEntity::Spider(spider) => (!spider.dead).then(|| {
            let base = if spider.body.right { 0 } else { 4 };
            SpriteCell {
                tile: TileRef::new(base + (step(frame) % 4) as u8, SPIDER_TILE.v),
                x: spider.body.x,
                y: spider.body.y,
            }
        }),
    }
}
