use bevy::prelude::*;

use crate::components::GameConfig;

pub struct AudioPlugin;

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, start_music);
    }
}

#[derive(Component)]
struct BackgroundMusic;

fn start_music(mut commands: Commands, config: Res<GameConfig>, asset_server: Res<AssetServer>) {
    let Some(path) = config.music.as_deref() else {
        return;
    };
    info!("[roomrun] Looping music {}", path);
    commands.spawn((
        AudioPlayer::new(asset_server.load(path.to_string())),
        PlaybackSettings::LOOP,
        BackgroundMusic,
    ));
}
