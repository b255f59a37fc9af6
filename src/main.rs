mod animation;
mod audio;
mod components;
mod debug;
mod events;
mod input;
mod interaction;
mod physics_core;
mod player;
mod render;
mod room;
mod simulation;
mod sprites;
mod tilemap;
mod ui;

use std::sync::Arc;

use bevy::app::AppExit;
use bevy::prelude::*;
use components::{pyxel_color, GameConfig, HeadlessMode, MAP_SIZE};
use events::GameEventBus;

#[derive(serde::Deserialize, Default)]
struct StartupConfig {
    window_title: Option<String>,
    window_scale: Option<u32>,
    background_color: Option<[f32; 3]>,
    assets_dir: Option<String>,
    tileset: Option<String>,
    music: Option<String>,
    tick_hz: Option<f64>,
}

fn load_startup_config() -> StartupConfig {
    let path = std::env::var("ROOMRUN_GAME_CONFIG")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "game.json".to_string());
    match std::fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str::<StartupConfig>(&contents) {
            Ok(cfg) => {
                println!("[roomrun] Loaded startup config from {}", path);
                cfg
            }
            Err(e) => {
                eprintln!("[roomrun] Failed to parse {}: {}", path, e);
                StartupConfig::default()
            }
        },
        Err(_) => StartupConfig::default(),
    }
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn run_simulate(path: &str) -> Result<String, String> {
    let request = simulation::load_request(path)?;
    let result = simulation::run_simulation(Arc::new(tilemap::Tilemap::level_strip()), &request);
    serde_json::to_string_pretty(&result).map_err(|e| format!("failed to encode result: {e}"))
}

/// Headless runs stop after this many fixed ticks.
#[derive(Resource)]
struct TickBudget(u64);

fn stop_after_budget(
    budget: Res<TickBudget>,
    events: Res<GameEventBus>,
    mut exit: EventWriter<AppExit>,
) {
    if events.frame >= budget.0 {
        info!("[roomrun] Tick budget of {} reached", budget.0);
        exit.send(AppExit::Success);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--simulate") {
        let Some(path) = arg_value(&args, "--simulate") else {
            eprintln!("[roomrun] --simulate needs a request file");
            std::process::exit(2);
        };
        match run_simulate(path) {
            Ok(json) => {
                println!("{json}");
                return;
            }
            Err(e) => {
                eprintln!("[roomrun] Simulation failed: {e}");
                std::process::exit(2);
            }
        }
    }

    let headless = args.iter().any(|a| a == "--headless");
    let startup_config = load_startup_config();

    let window_scale = startup_config.window_scale.unwrap_or(4).max(1) as f32;
    let background = startup_config
        .background_color
        .map(|c| Color::srgb(c[0], c[1], c[2]))
        .unwrap_or_else(|| pyxel_color(12));
    let config = GameConfig {
        window_scale,
        background,
        tileset: env_override("ROOMRUN_TILESET").or(startup_config.tileset),
        music: startup_config.music,
    };
    let tick_hz = startup_config.tick_hz.filter(|hz| *hz > 0.0).unwrap_or(30.0);

    let mut app = App::new();
    app.insert_resource(HeadlessMode(headless));

    if headless {
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::log::LogPlugin::default());
        if let Some(ticks) = arg_value(&args, "--ticks").and_then(|v| v.parse::<u64>().ok()) {
            app.insert_resource(TickBudget(ticks))
                .add_systems(Update, stop_after_budget);
        }
        println!("[roomrun] Starting in HEADLESS mode");
    } else {
        // Env vars override game.json values
        let assets_dir = env_override("ROOMRUN_ASSETS_DIR")
            .or(startup_config.assets_dir)
            .unwrap_or_else(|| "assets".to_string());
        if assets_dir != "assets" {
            println!("[roomrun] Using game assets dir: {}", assets_dir);
        }

        let window_title = startup_config
            .window_title
            .unwrap_or_else(|| "roomrun".to_string());
        let side = MAP_SIZE * window_scale;

        app.add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: window_title,
                        resolution: (side, side).into(),
                        resizable: false,
                        present_mode: bevy::window::PresentMode::AutoVsync,
                        ..default()
                    }),
                    ..default()
                })
                .set(bevy::asset::AssetPlugin {
                    file_path: assets_dir,
                    ..default()
                })
                .set(bevy::render::texture::ImagePlugin::default_nearest()),
        );
        app.insert_resource(ClearColor(config.background));
        app.add_plugins(sprites::SpritePlugin)
            .add_plugins(render::RenderPlugin)
            .add_plugins(ui::UiPlugin)
            .add_plugins(audio::AudioPlugin)
            .add_plugins(debug::DebugPlugin);
        println!("[roomrun] Starting in WINDOWED mode");
    }

    app.insert_resource(config)
        .insert_resource(Time::<Fixed>::from_hz(tick_hz))
        .add_plugins(input::InputPlugin)
        .add_plugins(room::WorldPlugin);

    app.run();
}
