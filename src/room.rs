use std::sync::Arc;

use bevy::prelude::*;
use serde_json::json;

use crate::components::*;
use crate::events::GameEventBus;
use crate::input::InputLatch;
use crate::interaction::{EntityEvent, RoomEntity};
use crate::player::{Player, PlayerInput};
use crate::tilemap::{RoomView, Tilemap};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GameWorld::new(Arc::new(Tilemap::level_strip())))
            .insert_resource(GameEventBus::default())
            .add_systems(FixedUpdate, tick_world)
            .add_systems(Update, log_headless_events);
    }
}

fn tick_world(
    mut world: ResMut<GameWorld>,
    mut latch: ResMut<InputLatch>,
    mut events: ResMut<GameEventBus>,
) {
    let input = latch.take();
    world.update(&input, &mut events);
}

/// Without a window the event stream is the only visible output.
fn log_headless_events(
    headless: Res<HeadlessMode>,
    events: Res<GameEventBus>,
    mut seen: Local<u64>,
) {
    if !headless.0 {
        return;
    }
    for event in events.since(*seen) {
        info!("[roomrun] frame {} {} {}", event.frame, event.name, event.data);
    }
    *seen = events.frame;
}

/// The active room: its index and the entities scanned from its tiles.
///
/// Entities only appear through [`Room::load`], which throws away the
/// previous list.
#[derive(Clone, Debug)]
pub struct Room {
    tilemap: Arc<Tilemap>,
    index: usize,
    entities: Vec<RoomEntity>,
    /// Bumped on every load so renderers can rebuild.
    generation: u64,
}

impl Room {
    pub fn new(tilemap: Arc<Tilemap>) -> Self {
        Self::at(tilemap, 0)
    }

    pub fn at(tilemap: Arc<Tilemap>, index: usize) -> Self {
        let mut room = Self {
            tilemap,
            index,
            entities: Vec::new(),
            generation: 0,
        };
        room.load(index);
        room
    }

    /// Make `index` the active room and rescan its marker tiles,
    /// column by column, top to bottom.
    pub fn load(&mut self, index: usize) {
        self.entities.clear();
        self.index = index;
        self.generation = self.generation.wrapping_add(1);
        if index >= self.tilemap.room_count() {
            warn!(
                "[roomrun] Room {} is past the end of the level ({} rooms), it reads as empty",
                index,
                self.tilemap.room_count()
            );
        }

        let view = RoomView::new(&self.tilemap, index);
        for col in 0..ROOM_CELLS {
            for row in 0..ROOM_CELLS {
                let x = col as f32 * TILE_SIZE;
                let y = row as f32 * TILE_SIZE;
                if let Some(entity) = RoomEntity::from_marker(view.block_at(x, y), x, y) {
                    self.entities.push(entity);
                }
            }
        }
        debug!(
            "[roomrun] Loaded room {} with {} entities",
            index,
            self.entities.len()
        );
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> RoomView<'_> {
        RoomView::new(&self.tilemap, self.index)
    }

    pub fn entities(&self) -> &[RoomEntity] {
        &self.entities
    }

    #[cfg(test)]
    pub fn entities_mut(&mut self) -> &mut [RoomEntity] {
        &mut self.entities
    }
}

/// Everything the game loop mutates: the active room and the player.
#[derive(Resource, Clone, Debug)]
pub struct GameWorld {
    pub room: Room,
    pub player: Player,
}

impl GameWorld {
    pub fn new(tilemap: Arc<Tilemap>) -> Self {
        Self {
            room: Room::new(tilemap),
            player: Player::default(),
        }
    }

    /// Start in `room` instead of the first one.
    pub fn starting_at(tilemap: Arc<Tilemap>, room: usize) -> Self {
        Self {
            room: Room::at(tilemap, room),
            player: Player::default(),
        }
    }

    pub fn is_won(&self) -> bool {
        self.room.index >= WIN_ROOM
    }

    /// One frame: every room entity in scan order, then the player.
    pub fn update(&mut self, input: &PlayerInput, events: &mut GameEventBus) {
        let room_index = self.room.index;
        let tilemap = Arc::clone(&self.room.tilemap);
        let view = RoomView::new(&tilemap, room_index);
        // A spider hit reloads the room mid-loop; the walk carries on over
        // the fresh list from the next index.
        let mut i = 0;
        while i < self.room.entities.len() {
            let entity = &mut self.room.entities[i];
            if let Some(event) = entity.update(&mut self.player, &view) {
                let (x, y) = entity.position();
                events.emit(event.name(), json!({ "room": room_index, "x": x, "y": y }));
                if event == EntityEvent::PlayerHit {
                    self.player.kill(&mut self.room);
                    info!("[roomrun] Player killed by a spider in room {}", room_index);
                    events.emit("player_killed", json!({ "room": room_index, "cause": "spider" }));
                }
            }
            i += 1;
        }

        let step = self.player.update(input, &mut self.room);
        if let Some(entered) = step.entered_room {
            info!(
                "[roomrun] Entered room {} (coins {}, stars {})",
                entered, self.player.piece, self.player.etoile
            );
            events.emit(
                "room_entered",
                json!({
                    "room": entered,
                    "piece": self.player.piece,
                    "etoile": self.player.etoile,
                }),
            );
            if entered == WIN_ROOM {
                events.emit("game_won", json!({ "piece": self.player.piece, "etoile": self.player.etoile }));
            }
        }
        if step.fell {
            info!("[roomrun] Player fell out of room {}", self.room.index);
            events.emit("player_killed", json!({ "room": self.room.index, "cause": "fall" }));
        }

        events.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Coin;
    use crate::player::AttackState;

    fn strip(rooms: usize) -> Tilemap {
        let mut map = Tilemap::filled(ROOM_CELLS * rooms, ROOM_CELLS, EMPTY_TILE);
        for x in 0..(ROOM_CELLS * rooms) as i32 {
            map.set(x, 13, GROUND_TILE);
        }
        map
    }

    fn idle_world(map: Tilemap, x: f32) -> GameWorld {
        let mut world = GameWorld::new(Arc::new(map));
        world.player = Player::spawn(x, 95.75);
        world.player.attack = AttackState::Idle;
        world
    }

    #[test]
    fn load_scans_markers_column_major() {
        let mut map = strip(2);
        map.set(5, 2, COIN_TILE);
        map.set(2, 9, SPRING_TILE);
        map.set(2, 4, CHEST_TILE);
        map.set(ROOM_CELLS as i32 + 7, 12, SPIDER_TILE);

        let mut room = Room::new(Arc::new(map));
        let kinds: Vec<&str> = room.entities().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["chest", "spring", "coin"]);
        assert_eq!(room.entities()[0].position(), (16.0, 32.0));

        let generation = room.generation();
        room.load(1);
        assert_eq!(room.index(), 1);
        assert_eq!(room.generation(), generation + 1);
        let kinds: Vec<&str> = room.entities().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["spider"]);
        assert_eq!(room.entities()[0].position(), (56.0, 96.0));
    }

    #[test]
    fn player_sees_entity_changes_in_same_frame() {
        let mut map = strip(1);
        map.set(5, 12, SPRING_TILE);
        let mut world = idle_world(map, 40.0);
        let mut events = GameEventBus::default();

        world.update(&PlayerInput::default(), &mut events);
        assert_eq!(world.player.last_dy, -6.0);
        assert!(world.player.body.y < 95.75);
        assert_eq!(events.recent[0].name, "spring_launched");
    }

    #[test]
    fn coin_counts_before_player_moves() {
        let mut map = strip(1);
        map.set(5, 12, COIN_TILE);
        let mut world = idle_world(map, 36.0);
        let mut events = GameEventBus::default();

        world.update(&PlayerInput::default(), &mut events);
        assert_eq!(world.player.piece, 1);
        world.update(&PlayerInput::default(), &mut events);
        assert_eq!(world.player.piece, 1);
        assert_eq!(events.frame, 2);
    }

    #[test]
    fn spider_contact_respawns_player_and_resets_room() {
        let mut map = strip(1);
        map.set(3, 12, COIN_TILE);
        map.set(9, 12, SPIDER_TILE);
        let mut world = idle_world(map, 20.0);
        world.player.checkpoint.x = 0.0;
        world.player.checkpoint.y = 95.75;
        let mut events = GameEventBus::default();

        // Collect the coin first.
        world.update(&PlayerInput::default(), &mut events);
        assert_eq!(world.player.piece, 1);

        world.player.body.x = 70.0;
        world.update(&PlayerInput::default(), &mut events);

        assert_eq!(world.player.piece, 0);
        assert_eq!(world.player.body.y, 95.75);
        assert!(world.player.body.x <= 1.0);
        match &world.room.entities()[0] {
            RoomEntity::Coin(Coin { collected, .. }) => assert!(!collected),
            other => panic!("unexpected entity {other:?}"),
        }
        assert!(events.recent.iter().any(|e| e.name == "player_killed"));
    }

    #[test]
    fn exit_rebuilds_entities_for_next_room() {
        let mut map = strip(2);
        for y in 10..13 {
            map.set(ROOM_CELLS as i32 - 1, y, EXIT_TILE);
        }
        map.set(ROOM_CELLS as i32 + 10, 12, COIN_TILE);
        let mut world = idle_world(map, 119.0);
        let mut events = GameEventBus::default();
        let right = PlayerInput {
            right: true,
            ..Default::default()
        };

        world.update(&right, &mut events);
        assert_eq!(world.room.index(), 1);
        assert_eq!(world.player.body.x, 8.0);
        assert_eq!(world.room.entities().len(), 1);
        assert!(events.recent.iter().any(|e| e.name == "room_entered"));
    }

    #[test]
    fn level_strip_starts_with_scanned_room() {
        let world = GameWorld::new(Arc::new(Tilemap::level_strip()));
        assert_eq!(world.room.index(), 0);
        assert_eq!(world.room.entities().len(), 3);
        assert!(!world.is_won());
    }

    #[test]
    fn entities_after_a_spider_hit_still_update_that_frame() {
        let mut map = strip(1);
        map.set(3, 12, SPIDER_TILE);
        map.set(5, 12, COIN_TILE);
        let mut world = idle_world(map, 26.0);
        world.player.checkpoint.x = 40.0;
        world.player.checkpoint.y = 95.75;
        let mut events = GameEventBus::default();

        world.update(&PlayerInput::default(), &mut events);

        assert_eq!(world.player.piece, 1);
        match &world.room.entities()[1] {
            RoomEntity::Coin(Coin { collected, .. }) => assert!(collected),
            other => panic!("unexpected entity {other:?}"),
        }
        let names: Vec<&str> = events.recent.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["player_hit", "player_killed", "coin_collected"]);
    }
}
