use bevy::app::AppExit;
use bevy::prelude::*;

use crate::player::PlayerInput;

/// Input between two fixed ticks.
///
/// Held keys are sampled every render frame. The down-key edge is kept
/// until a tick consumes it so a press is never lost or applied twice
/// when render and tick rates differ.
#[derive(Resource, Default, Clone)]
pub struct InputLatch {
    held: PlayerInput,
    down_pressed: bool,
}

impl InputLatch {
    pub fn set_held(&mut self, left: bool, right: bool, up: bool, attack: bool) {
        self.held = PlayerInput {
            left,
            right,
            up,
            attack,
            down_pressed: false,
        };
    }

    pub fn press_down(&mut self) {
        self.down_pressed = true;
    }

    /// Input for the next tick; clears the latched edge.
    pub fn take(&mut self) -> PlayerInput {
        let input = PlayerInput {
            down_pressed: self.down_pressed,
            ..self.held
        };
        self.down_pressed = false;
        input
    }
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(InputLatch::default()).add_systems(
            PreUpdate,
            keyboard_to_latch.run_if(resource_exists::<ButtonInput<KeyCode>>),
        );
    }
}

fn keyboard_to_latch(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut latch: ResMut<InputLatch>,
    mut exit: EventWriter<AppExit>,
) {
    latch.set_held(
        keyboard.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]),
        keyboard.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]),
        keyboard.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]),
        keyboard.pressed(KeyCode::Space),
    );
    if keyboard.any_just_pressed([KeyCode::ArrowDown, KeyCode::KeyS]) {
        latch.press_down();
    }
    if keyboard.just_pressed(KeyCode::KeyQ) {
        info!("[roomrun] Quit requested");
        exit.send(AppExit::Success);
    }
}
