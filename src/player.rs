use crate::components::*;
use crate::physics_core::{unit, Body};
use crate::room::Room;

/// Held keys for one tick, plus the edge-triggered form toggle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub attack: bool,
    pub down_pressed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum AttackState {
    Idle,
    Attacking,
}

/// State restored when the player dies.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct Checkpoint {
    pub x: f32,
    pub y: f32,
    pub piece: u32,
    pub etoile: u32,
}

/// What happened to the player during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerStep {
    /// Room entered through an exit tile.
    pub entered_room: Option<usize>,
    /// Fell below the room and respawned.
    pub fell: bool,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct Player {
    pub body: Body,
    pub attack: AttackState,
    /// Frames since the current attack (or since spawn) started.
    pub anim_frame: u32,
    /// Coins.
    pub piece: u32,
    /// Stars.
    pub etoile: u32,
    /// Alternate form: higher jump, no lunge.
    pub skin: bool,
    /// `dy` before gravity was added last tick.
    pub last_dy: f32,
    pub checkpoint: Checkpoint,
}

/// Starts above the first floor; dying before the first exit goes back
/// to the room's top-left corner.
impl Default for Player {
    fn default() -> Self {
        Self {
            checkpoint: Checkpoint::default(),
            ..Self::spawn(0.0, MAP_SIZE - 5.0 * TILE_SIZE)
        }
    }
}

impl Player {
    /// A fresh player at `(x, y)` whose checkpoint is that spot.
    pub fn spawn(x: f32, y: f32) -> Self {
        Self {
            body: Body::at(x, y),
            attack: AttackState::Attacking,
            anim_frame: 0,
            piece: 0,
            etoile: 0,
            skin: false,
            last_dy: 0.0,
            checkpoint: Checkpoint {
                x,
                y,
                piece: 0,
                etoile: 0,
            },
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.attack == AttackState::Attacking
    }

    fn is_grounded(&self) -> bool {
        self.body.dy == 0.0 && self.last_dy == 0.0
    }

    fn jump_impulse(&self) -> f32 {
        -JUMP * if self.skin { 1.0 } else { 0.75 }
    }

    /// One tick of input, physics, exit and fall checks.
    pub fn update(&mut self, input: &PlayerInput, room: &mut Room) -> PlayerStep {
        let mut step = PlayerStep::default();

        let mut ndx = 0.0;
        if input.left {
            ndx -= SPEED;
        }
        if input.right {
            ndx += SPEED;
        }
        if input.down_pressed {
            self.skin = !self.skin;
        }

        let ay = if self.is_grounded() && input.up {
            self.jump_impulse()
        } else {
            GRAVITY
        };

        match self.attack {
            AttackState::Attacking => {
                if self.anim_frame > ANIM_SPEED * 3 {
                    self.attack = AttackState::Idle;
                    self.anim_frame = 0;
                } else if !self.skin {
                    ndx += unit(ndx) * 2.0;
                }
            }
            AttackState::Idle => {
                if input.attack {
                    self.attack = AttackState::Attacking;
                    self.anim_frame = 0;
                }
            }
        }

        self.body.dx = ndx;
        self.last_dy = self.body.dy;
        self.body.dy += ay;
        self.body.step(&room.view());

        if room.view().block_at(self.body.x, self.body.y) == EXIT_TILE {
            self.body.x = MAP_SIZE - self.body.x;
            let next = room.index() + 1;
            room.load(next);
            self.checkpoint = self.capture();
            step.entered_room = Some(next);
        }

        if self.body.y > MAP_SIZE {
            self.kill(room);
            step.fell = true;
        }

        self.anim_frame = self.anim_frame.saturating_add(1);
        step
    }

    fn capture(&self) -> Checkpoint {
        Checkpoint {
            x: self.body.x,
            y: self.body.y,
            piece: self.piece,
            etoile: self.etoile,
        }
    }

    /// Reload the current room and go back to the last checkpoint.
    /// Velocity is kept as it was.
    pub fn kill(&mut self, room: &mut Room) {
        room.load(room.index());
        let Checkpoint {
            x,
            y,
            piece,
            etoile,
        } = self.checkpoint;
        self.body.x = x;
        self.body.y = y;
        self.piece = piece;
        self.etoile = etoile;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::RoomEntity;
    use crate::tilemap::Tilemap;
    use std::sync::Arc;

    /// Two rooms with a floor on row 13 and an exit on room 0's last column.
    fn two_rooms() -> Room {
        let mut map = Tilemap::filled(ROOM_CELLS * 2, ROOM_CELLS, EMPTY_TILE);
        for x in 0..(ROOM_CELLS * 2) as i32 {
            map.set(x, 13, GROUND_TILE);
        }
        for y in 10..13 {
            map.set(ROOM_CELLS as i32 - 1, y, EXIT_TILE);
        }
        map.set(3, 12, COIN_TILE);
        Room::new(Arc::new(map))
    }

    fn settle(player: &mut Player, room: &mut Room) {
        for _ in 0..40 {
            player.update(&PlayerInput::default(), room);
        }
    }

    fn held(f: impl FnOnce(&mut PlayerInput)) -> PlayerInput {
        let mut input = PlayerInput::default();
        f(&mut input);
        input
    }

    #[test]
    fn settles_on_floor_and_stays_grounded() {
        let mut room = two_rooms();
        let mut player = Player::spawn(40.0, 88.0);
        settle(&mut player, &mut room);
        assert!(player.body.y > 95.0 && player.body.y < 96.0);
        assert_eq!(player.body.dy, 0.0);
        assert_eq!(player.last_dy, 0.0);
    }

    #[test]
    fn left_and_right_cancel() {
        let mut room = two_rooms();
        let mut player = Player::spawn(40.0, 88.0);
        settle(&mut player, &mut room);
        let x = player.body.x;
        player.update(&held(|i| {
            i.left = true;
            i.right = true;
        }), &mut room);
        assert_eq!(player.body.x, x);
    }

    #[test]
    fn jump_height_depends_on_skin() {
        let mut room = two_rooms();
        let mut player = Player::spawn(40.0, 88.0);
        settle(&mut player, &mut room);
        player.update(&held(|i| i.up = true), &mut room);
        assert_eq!(player.body.dy, -3.0);

        settle(&mut player, &mut room);
        player.update(&held(|i| i.down_pressed = true), &mut room);
        assert!(player.skin);
        settle(&mut player, &mut room);
        player.update(&held(|i| i.up = true), &mut room);
        assert_eq!(player.body.dy, -4.0);
    }

    #[test]
    fn no_jump_while_airborne() {
        let mut room = two_rooms();
        let mut player = Player::spawn(40.0, 40.0);
        player.update(&PlayerInput::default(), &mut room);
        player.update(&held(|i| i.up = true), &mut room);
        assert!(player.body.dy > 0.0);
    }

    #[test]
    fn attack_lunges_then_times_out() {
        let mut room = two_rooms();
        let mut player = Player::spawn(20.0, 88.0);
        settle(&mut player, &mut room);
        assert_eq!(player.attack, AttackState::Idle);

        player.update(&held(|i| i.attack = true), &mut room);
        assert!(player.is_attacking());
        assert_eq!(player.anim_frame, 1);

        let x = player.body.x;
        player.update(&held(|i| i.right = true), &mut room);
        assert_eq!(player.body.x, x + 3.0);

        for _ in 0..11 {
            player.update(&PlayerInput::default(), &mut room);
        }
        assert!(player.is_attacking());
        player.update(&PlayerInput::default(), &mut room);
        assert_eq!(player.attack, AttackState::Idle);
    }

    #[test]
    fn alternate_skin_attacks_without_lunge() {
        let mut room = two_rooms();
        let mut player = Player::spawn(20.0, 88.0);
        settle(&mut player, &mut room);
        player.update(&held(|i| i.down_pressed = true), &mut room);
        player.update(&held(|i| i.attack = true), &mut room);
        let x = player.body.x;
        player.update(&held(|i| i.right = true), &mut room);
        assert_eq!(player.body.x, x + 1.0);
    }

    #[test]
    fn exit_tile_advances_room_and_mirrors_x() {
        let mut room = two_rooms();
        let mut player = Player::spawn(100.0, 88.0);
        settle(&mut player, &mut room);
        player.piece = 3;

        let mut entered = None;
        for _ in 0..40 {
            let step = player.update(&held(|i| i.right = true), &mut room);
            if step.entered_room.is_some() {
                entered = step.entered_room;
                break;
            }
        }
        assert_eq!(entered, Some(1));
        assert_eq!(room.index(), 1);
        assert_eq!(player.body.x, MAP_SIZE - (MAP_SIZE - TILE_SIZE));
        assert_eq!(
            player.checkpoint,
            Checkpoint {
                x: player.body.x,
                y: player.body.y,
                piece: 3,
                etoile: 0,
            }
        );
    }

    #[test]
    fn falling_out_respawns_and_resets_pickups() {
        let mut map = Tilemap::filled(ROOM_CELLS, ROOM_CELLS, EMPTY_TILE);
        for x in 0..8 {
            map.set(x, 13, GROUND_TILE);
        }
        map.set(2, 12, COIN_TILE);
        let mut room = Room::new(Arc::new(map));
        let mut player = Player::spawn(8.0, 88.0);
        player.checkpoint.piece = 2;
        player.checkpoint.etoile = 1;

        match &mut room.entities_mut()[0] {
            RoomEntity::Coin(coin) => coin.collected = true,
            other => panic!("unexpected entity {other:?}"),
        }
        player.piece = 3;

        let mut fell = false;
        player.body.x = 90.0;
        player.body.y = 100.0;
        for _ in 0..60 {
            if player.update(&PlayerInput::default(), &mut room).fell {
                fell = true;
                break;
            }
        }
        assert!(fell);
        assert_eq!((player.body.x, player.body.y), (8.0, 88.0));
        assert_eq!((player.piece, player.etoile), (2, 1));
        // The fall speed survives the respawn.
        assert_eq!(player.body.dy, 3.75);
        assert_eq!(player.last_dy, 3.5);
        let dy = player.body.dy;
        player.update(&PlayerInput::default(), &mut room);
        assert_eq!(player.body.y, 88.0 + dy + GRAVITY);
        match &room.entities()[0] {
            RoomEntity::Coin(coin) => assert!(!coin.collected),
            other => panic!("unexpected entity {other:?}"),
        }
    }

    #[test]
    fn first_death_returns_to_room_origin() {
        let mut map = Tilemap::filled(ROOM_CELLS, ROOM_CELLS, EMPTY_TILE);
        for x in 0..ROOM_CELLS as i32 {
            map.set(x, 13, GROUND_TILE);
        }
        map.set(6, 13, EMPTY_TILE);
        map.set(7, 13, EMPTY_TILE);
        map.set(10, 12, COIN_TILE);
        let mut room = Room::new(Arc::new(map));

        let mut player = Player::default();
        assert_eq!((player.body.x, player.body.y), (0.0, MAP_SIZE - 40.0));
        assert_eq!(player.checkpoint, Checkpoint::default());

        player.piece = 2;
        player.body.x = 52.0;
        let mut fell = false;
        for _ in 0..60 {
            if player.update(&PlayerInput::default(), &mut room).fell {
                fell = true;
                break;
            }
        }
        assert!(fell);
        assert_eq!((player.body.x, player.body.y), (0.0, 0.0));
        assert_eq!((player.piece, player.etoile), (0, 0));
    }

    #[test]
    fn animation_counter_saturates() {
        let mut room = two_rooms();
        let mut player = Player::spawn(40.0, 88.0);
        settle(&mut player, &mut room);
        assert_eq!(player.attack, AttackState::Idle);
        player.anim_frame = u32::MAX;
        player.update(&PlayerInput::default(), &mut room);
        assert_eq!(player.anim_frame, u32::MAX);
    }
}
