use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::events::{GameEvent, GameEventBus};
use crate::player::PlayerInput;
use crate::room::GameWorld;
use crate::tilemap::Tilemap;

const ACTIONS: [&str; 5] = ["left", "right", "up", "down", "attack"];
/// One hour of play at 30 ticks per second.
pub const MAX_SIMULATION_FRAMES: u32 = 30 * 60 * 60;

/// Scripted input run without a window.
#[derive(Deserialize, Clone)]
pub struct SimulationRequest {
    pub inputs: Vec<SimInput>,
    pub max_frames: u32,
    #[serde(default = "default_record_interval")]
    pub record_interval: u32,
    #[serde(default)]
    pub start_room: usize,
}

fn default_record_interval() -> u32 {
    1
}

#[derive(Deserialize, Clone)]
pub struct SimInput {
    pub frame: u32,
    pub action: String,
    #[serde(default)]
    pub duration: u32,
}

#[derive(Serialize, Clone)]
pub struct SimulationResult {
    pub outcome: String,
    pub frames_elapsed: u32,
    pub room: usize,
    pub piece: u32,
    pub etoile: u32,
    pub skin: bool,
    pub trace: Vec<TraceFrame>,
    pub events: Vec<GameEvent>,
}

#[derive(Serialize, Clone)]
pub struct TraceFrame {
    pub frame: u32,
    pub room: usize,
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub attacking: bool,
}

impl SimulationRequest {
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let request: SimulationRequest =
            serde_json::from_str(contents).map_err(|e| format!("invalid simulation request: {e}"))?;
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<(), String> {
        if self.max_frames == 0 {
            return Err("max_frames must be positive".to_string());
        }
        if self.max_frames > MAX_SIMULATION_FRAMES {
            return Err(format!(
                "max_frames {} exceeds the limit of {}",
                self.max_frames, MAX_SIMULATION_FRAMES
            ));
        }
        if let Some(bad) = self
            .inputs
            .iter()
            .find(|i| !ACTIONS.contains(&i.action.as_str()))
        {
            return Err(format!(
                "unknown action '{}' at frame {} (expected one of {})",
                bad.action,
                bad.frame,
                ACTIONS.join(", ")
            ));
        }
        Ok(())
    }
}

pub fn load_request(path: &str) -> Result<SimulationRequest, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))?;
    SimulationRequest::from_json(&contents)
}

pub fn run_simulation(tilemap: Arc<Tilemap>, request: &SimulationRequest) -> SimulationResult {
    let mut world = GameWorld::starting_at(tilemap, request.start_room);
    let mut bus = GameEventBus::default();
    let mut trace = Vec::new();
    let mut outcome = "timeout".to_string();

    // Per-frame held actions.
    let frames = request.max_frames as usize;
    let mut active: Vec<Vec<&str>> = vec![Vec::new(); frames];
    for input in &request.inputs {
        let duration = input.duration.max(1);
        for f in input.frame..input.frame.saturating_add(duration).min(request.max_frames) {
            active[f as usize].push(input.action.as_str());
        }
    }

    let record_interval = request.record_interval.max(1);
    let mut prev_down = false;
    let mut frames_elapsed = 0;

    for frame in 0..request.max_frames {
        let held = &active[frame as usize];
        let down = held.contains(&"down");
        let input = PlayerInput {
            left: held.contains(&"left"),
            right: held.contains(&"right"),
            up: held.contains(&"up"),
            attack: held.contains(&"attack"),
            down_pressed: down && !prev_down,
        };
        prev_down = down;

        world.update(&input, &mut bus);
        frames_elapsed = frame + 1;

        if frame % record_interval == 0 {
            let body = &world.player.body;
            trace.push(TraceFrame {
                frame,
                room: world.room.index(),
                x: body.x,
                y: body.y,
                dx: body.dx,
                dy: body.dy,
                attacking: world.player.is_attacking(),
            });
        }

        if world.is_won() {
            outcome = "won".to_string();
            break;
        }
    }

    SimulationResult {
        outcome,
        frames_elapsed,
        room: world.room.index(),
        piece: world.player.piece,
        etoile: world.player.etoile,
        skin: world.player.skin,
        trace,
        events: bus.recent.into_iter().collect(),
    }
}
