//! Proximity-triggered room entities.
//!
//! Every trigger uses the Manhattan distance between the top-left corners
//! of the player and the entity, not a box overlap.

use crate::components::*;
use crate::physics_core::Body;
use crate::player::Player;
use crate::tilemap::{is_wall, RoomView};

pub const COIN_RANGE: f32 = 8.0;
pub const CHEST_RANGE: f32 = 6.0;
pub const SPRING_RANGE: f32 = 8.0;
pub const SPIDER_RANGE: f32 = 8.0;
/// Upward kick given by a spring.
pub const SPRING_IMPULSE: f32 = 6.0;
/// Frames the star stays visible above an opened chest.
pub const STAR_FRAMES: u32 = 15 * ANIM_SPEED;

pub fn manhattan(player: &Body, x: f32, y: f32) -> f32 {
    (player.x - x).abs() + (player.y - y).abs()
}

/// Something an entity did to the player this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityEvent {
    CoinCollected,
    StarCollected,
    SpringLaunched,
    SpiderKilled,
    /// The player touched a live spider without attacking.
    PlayerHit,
}

impl EntityEvent {
    pub fn name(self) -> &'static str {
        match self {
            EntityEvent::CoinCollected => "coin_collected",
            EntityEvent::StarCollected => "star_collected",
            EntityEvent::SpringLaunched => "spring_launched",
            EntityEvent::SpiderKilled => "spider_killed",
            EntityEvent::PlayerHit => "player_hit",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            collected: false,
        }
    }

    pub fn update(&mut self, player: &mut Player) -> Option<EntityEvent> {
        if !self.collected && manhattan(&player.body, self.x, self.y) < COIN_RANGE {
            self.collected = true;
            player.piece += 1;
            return Some(EntityEvent::CoinCollected);
        }
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chest {
    pub x: f32,
    pub y: f32,
    pub opened: bool,
    /// Frames since opening, drives the star display only.
    pub anim_frame: u32,
}

impl Chest {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            opened: false,
            anim_frame: 0,
        }
    }

    pub fn update(&mut self, player: &mut Player) -> Option<EntityEvent> {
        if !self.opened && manhattan(&player.body, self.x, self.y) < CHEST_RANGE {
            self.opened = true;
            player.etoile += 1;
            return Some(EntityEvent::StarCollected);
        }
        if self.opened {
            self.anim_frame = self.anim_frame.saturating_add(1);
        }
        None
    }

    pub fn shows_star(&self) -> bool {
        self.opened && self.anim_frame < STAR_FRAMES
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    pub x: f32,
    pub y: f32,
    /// 0 at rest, otherwise frames into the bounce animation.
    pub anim_frame: u32,
}

impl Spring {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, anim_frame: 0 }
    }

    pub fn update(&mut self, player: &mut Player) -> Option<EntityEvent> {
        if self.anim_frame == 0 && manhattan(&player.body, self.x, self.y) < SPRING_RANGE {
            self.anim_frame = 1;
            player.body.dy -= SPRING_IMPULSE;
            return Some(EntityEvent::SpringLaunched);
        }
        if self.anim_frame != 0 {
            self.anim_frame += 1;
            if self.anim_frame >= 3 * ANIM_SPEED {
                self.anim_frame = 0;
            }
        }
        None
    }
}

/// Walking enemy. Turns around before stepping off a ledge.
#[derive(Clone, Debug, PartialEq)]
pub struct Spider {
    pub body: Body,
    pub dead: bool,
}

impl Spider {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::at(x, y),
            dead: false,
        }
    }

    pub fn update(&mut self, player: &Player, room: &RoomView) -> Option<EntityEvent> {
        if self.dead {
            return None;
        }
        if self.body.dx == 0.0 {
            self.body.dx = 1.0;
        }

        let half = (self.body.size / 2) as f32;
        let floor_ahead = room.block_at(self.body.x + half + self.body.dx, self.body.y + half + TILE_SIZE);
        if !is_wall(floor_ahead, true) {
            self.body.dx = -self.body.dx;
        }
        self.body.step(room);

        if manhattan(&player.body, self.body.x, self.body.y) < SPIDER_RANGE {
            if player.is_attacking() {
                self.dead = true;
                return Some(EntityEvent::SpiderKilled);
            }
            return Some(EntityEvent::PlayerHit);
        }
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RoomEntity {
    Coin(Coin),
    Chest(Chest),
    Spring(Spring),
    Spider(Spider),
}

impl RoomEntity {
    /// The entity a marker tile spawns at room pixel `(x, y)`, if any.
    pub fn from_marker(tile: TileRef, x: f32, y: f32) -> Option<Self> {
        match tile {
            COIN_TILE => Some(RoomEntity::Coin(Coin::new(x, y))),
            SPIDER_TILE => Some(RoomEntity::Spider(Spider::new(x, y))),
            SPRING_TILE => Some(RoomEntity::Spring(Spring::new(x, y))),
            CHEST_TILE => Some(RoomEntity::Chest(Chest::new(x, y))),
            _ => None,
        }
    }

    pub fn update(&mut self, player: &mut Player, room: &RoomView) -> Option<EntityEvent> {
        match self {
            RoomEntity::Coin(coin) => coin.update(player),
            RoomEntity::Chest(chest) => chest.update(player),
            RoomEntity::Spring(spring) => spring.update(player),
            RoomEntity::Spider(spider) => spider.update(player, room),
        }
    }

    /// Current top-left corner.
    pub fn position(&self) -> (f32, f32) {
        match self {
            RoomEntity::Coin(c) => (c.x, c.y),
            RoomEntity::Chest(c) => (c.x, c.y),
            RoomEntity::Spring(s) => (s.x, s.y),
            RoomEntity::Spider(s) => (s.body.x, s.body.y),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RoomEntity::Coin(_) => "coin",
            RoomEntity::Chest(_) => "chest",
            RoomEntity::Spring(_) => "spring",
            RoomEntity::Spider(_) => "spider",
        }
    }
}
