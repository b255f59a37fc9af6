use bevy::prelude::*;

use crate::room::GameWorld;

#[derive(Resource, Clone, Default)]
pub struct DebugOverlayConfig {
    pub show: bool,
}

pub struct DebugPlugin;

#[derive(Component)]
struct DebugOverlayText;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DebugOverlayConfig::default())
            .add_systems(Startup, setup_debug_overlay_text)
            .add_systems(
                Update,
                toggle_debug_overlay.run_if(resource_exists::<ButtonInput<KeyCode>>),
            )
            .add_systems(Update, update_debug_overlay_text);
    }
}

fn setup_debug_overlay_text(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(Color::srgba(0.95, 1.0, 0.98, 0.95)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(8.0),
            bottom: Val::Px(8.0),
            ..default()
        },
        Visibility::Hidden,
        DebugOverlayText,
    ));
}

fn toggle_debug_overlay(keyboard: Res<ButtonInput<KeyCode>>, mut config: ResMut<DebugOverlayConfig>) {
    if keyboard.just_pressed(KeyCode::F3) {
        config.show = !config.show;
    }
}

pub fn overlay_text(world: &GameWorld) -> String {
    let body = &world.player.body;
    format!(
        "Room: {}\nPos: {:.2}, {:.2}\nVel: {:.2}, {:.2}\nEntities: {} ({})\nAttacking: {}",
        world.room.index(),
        body.x,
        body.y,
        body.dx,
        body.dy,
        world.room.entities().len(),
        world
            .room
            .entities()
            .iter()
            .map(|e| e.kind())
            .collect::<Vec<_>>()
            .join(", "),
        world.player.is_attacking(),
    )
}

fn update_debug_overlay_text(
    config: Res<DebugOverlayConfig>,
    world: Res<GameWorld>,
    mut query: Query<(&mut Text, &mut Visibility), With<DebugOverlayText>>,
) {
    let Ok((mut text, mut visibility)) = query.get_single_mut() else {
        return;
    };
    if config.show {
        *visibility = Visibility::Visible;
        text.0 = overlay_text(&world);
    } else {
        *visibility = Visibility::Hidden;
    }
}
