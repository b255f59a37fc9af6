use std::collections::VecDeque;

use bevy::prelude::*;
use serde::Serialize;

const MAX_EVENTS: usize = 500;

#[derive(Serialize, Clone, Debug)]
pub struct GameEvent {
    pub name: String,
    pub data: serde_json::Value,
    pub frame: u64,
}

/// Bounded log of gameplay events, newest last.
#[derive(Resource, Default)]
pub struct GameEventBus {
    pub recent: VecDeque<GameEvent>,
    pub frame: u64,
    pub dropped_events: u64,
    last_overflow_log_frame: u64,
}

impl GameEventBus {
    pub fn emit(&mut self, name: impl Into<String>, data: serde_json::Value) {
        self.recent.push_back(GameEvent {
            name: name.into(),
            data,
            frame: self.frame,
        });
        if self.recent.len() > MAX_EVENTS {
            let excess = self.recent.len() - MAX_EVENTS;
            for _ in 0..excess {
                self.recent.pop_front();
            }
            self.dropped_events = self.dropped_events.saturating_add(excess as u64);
            if self.frame.saturating_sub(self.last_overflow_log_frame) >= 60 {
                self.last_overflow_log_frame = self.frame;
                warn!(
                    "[roomrun events] Dropped {} buffered events (total dropped: {})",
                    excess, self.dropped_events
                );
            }
        }
    }

    pub fn tick(&mut self) {
        self.frame = self.frame.saturating_add(1);
    }

    /// Events emitted at or after `frame`.
    pub fn since(&self, frame: u64) -> impl Iterator<Item = &GameEvent> {
        self.recent.iter().filter(move |e| e.frame >= frame)
    }
}
