use bevy::prelude::*;

use crate::components::*;
use crate::room::GameWorld;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
            .add_systems(Update, update_hud);
    }
}

#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
enum HudText {
    Coins,
    Stars,
    Bravo,
}

/// Pixel height of one text line at room scale.
const FONT_PX: f32 = 6.0;

fn hud_text(
    commands: &mut Commands,
    kind: HudText,
    scale: f32,
    x: f32,
    y: f32,
    color: Color,
    visibility: Visibility,
) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: FONT_PX * scale,
            ..default()
        },
        TextColor(color),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(x * scale),
            top: Val::Px(y * scale),
            ..default()
        },
        visibility,
        kind,
    ));
}

fn setup_hud(mut commands: Commands, config: Res<GameConfig>) {
    let scale = config.window_scale;
    let ink = pyxel_color(0);
    hud_text(&mut commands, HudText::Coins, scale, 10.0, 2.0, ink, Visibility::Visible);
    hud_text(&mut commands, HudText::Stars, scale, 30.0, 2.0, ink, Visibility::Visible);
    hud_text(
        &mut commands,
        HudText::Bravo,
        scale,
        MAP_SIZE / 2.0 - 14.0,
        MAP_SIZE / 2.0 - FONT_PX / 2.0,
        pyxel_color(8),
        Visibility::Hidden,
    );
}

fn update_hud(
    world: Res<GameWorld>,
    mut query: Query<(&HudText, &mut Text, &mut Visibility)>,
) {
    for (kind, mut text, mut visibility) in query.iter_mut() {
        match kind {
            HudText::Coins => text.0 = world.player.piece.to_string(),
            HudText::Stars => text.0 = world.player.etoile.to_string(),
            HudText::Bravo => {
                text.0 = "Bravo !".to_string();
                *visibility = if world.is_won() {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                };
            }
        }
    }
}
