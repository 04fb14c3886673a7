//! infinite tile world – bootstrap
//!
//! Works with **Bevy 0.15**.

mod bullet;
mod camera;
mod chunk;
mod components;
mod config;
mod constants;
mod coords;
mod gradient;
mod hud;
mod input;
mod player;
mod render;
mod seeder;
mod sim;
mod terrain;
mod world;

use std::path::PathBuf;

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin,
    LogDiagnosticsPlugin,
};
use bevy::input::ButtonInput;
use bevy::log::{error, info};
use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::{MonitorSelection, PrimaryWindow, WindowMode};
use clap::Parser;

use bullet::Weapon;
use camera::camera_follow_system;
use config::{ConfigError, GameConfig, GenerationParams, PlayerConfig, Seed};
use constants::*;
use input::{sample_input_system, DebugFlags, FrameInput};
use player::Player;
use render::{
    draw_gizmos_system, sync_chunk_sprites_system, sync_player_sprite_system,
    ChunkSprites, SpriteRotationOffset, TilePalette,
};
use sim::{resize_viewport_system, simulation_system};
use world::WorldCache;

/* ------------------------------------------------------------------------ */
/* command line                                                             */
/* ------------------------------------------------------------------------ */
#[derive(Parser, Debug)]
#[command(version, about = "Walk an endless, seeded tile world")]
struct Cli {
    /// world seed, text or integer; overrides the config file
    #[arg(long)]
    seed: Option<String>,

    /// spawn x in world units
    #[arg(long, default_value_t = DEFAULT_PLAYER_X, allow_hyphen_values = true)]
    x: f64,

    /// spawn y in world units (grows downwards)
    #[arg(long, default_value_t = DEFAULT_PLAYER_Y, allow_hyphen_values = true)]
    y: f64,

    /// noise quality; overrides the config file
    #[arg(long, allow_hyphen_values = true)]
    quality: Option<f64>,

    /// TOML config; the built‑in one is used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load(cli: &Cli) -> Result<(GameConfig, GenerationParams), ConfigError> {
    let mut cfg = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::builtin()?,
    };
    if let Some(seed) = &cli.seed {
        cfg.world.seed = seed
            .parse::<i64>()
            .map_or_else(|_| Seed::Text(seed.clone()), Seed::Number);
    }
    if let Some(quality) = cli.quality {
        cfg.world.quality = quality;
    }
    let params = GenerationParams::new(&cfg.world)?;
    Ok((cfg, params))
}

/// what the startup system needs to spawn the player
#[derive(Resource)]
struct PlayerSpawn {
    position: DVec2,
    look: PlayerConfig,
    weapons: Vec<Weapon>,
}

/* ------------------------------------------------------------------------ */
/* startup                                                                  */
/* ------------------------------------------------------------------------ */
fn setup(mut commands: Commands, spawn: Res<PlayerSpawn>) {
    commands.spawn(Camera2d);
    commands.spawn(Player::new(spawn.position, spawn.weapons.clone()));
    render::spawn_player_sprite(&mut commands, &spawn.look);
    hud::spawn_hud(&mut commands);
}

/* ------------------------------------------------------------------------ */
/* F11 borderless‑fullscreen toggle                                         */
/* ------------------------------------------------------------------------ */
fn toggle_fullscreen(
    keys: Res<ButtonInput<KeyCode>>,
    mut window_q: Query<&mut Window, With<PrimaryWindow>>,
) {
    if keys.just_pressed(KeyCode::F11) {
        let Ok(mut window) = window_q.get_single_mut() else { return };
        window.mode = match window.mode {
            WindowMode::Windowed => {
                WindowMode::BorderlessFullscreen(MonitorSelection::Primary)
            }
            _ => WindowMode::Windowed,
        };
    }
}

fn exit_on_escape(keys: Res<ButtonInput<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
    }
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
/// log a fatal configuration problem; the app never starts
fn config_failure(e: &ConfigError) -> AppExit {
    error!("configuration: {e}");
    AppExit::error()
}

fn main() -> AppExit {
    let cli = Cli::parse();
    let (w, h) = DEFAULT_VIEWPORT;

    let mut app = App::new();
    app
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
            EntityCountDiagnosticsPlugin::default(),
        ))

        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(Color::srgb(0.0, 0.0, 0.0)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                resolution: (w as f32, h as f32).into(),
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }));

    /* config – LogPlugin is up from here on ------------------------------- */
    let (cfg, params) = match load(&cli) {
        Ok(loaded) => loaded,
        Err(e) => return config_failure(&e),
    };
    let spawn = PlayerSpawn {
        position: DVec2::new(cli.x, cli.y),
        look: cfg.player.clone(),
        weapons: cfg.weapons.iter().map(Weapon::from).collect(),
    };
    let palette = TilePalette::new(params.seed_number);

    app
        /* world state ----------------------------------------------------- */
        .insert_resource(WorldCache::new(params))
        .insert_resource(palette)
        .insert_resource(SpriteRotationOffset(cfg.player.rotation_offset_deg))
        .insert_resource(spawn)
        .init_resource::<ChunkSprites>()
        .init_resource::<FrameInput>()
        .init_resource::<DebugFlags>()

        /* startup systems ------------------------------------------------- */
        .add_systems(Startup, setup)

        /* frame‑update systems ------------------------------------------- */
        .add_systems(
            Update,
            (
                sample_input_system,        // keys / mouse → FrameInput
                resize_viewport_system,     // window size → view rect
                simulation_system,          // one ordered sim frame
                sync_chunk_sprites_system,  // spawn / drop chunk sprites
                sync_player_sprite_system,
                draw_gizmos_system,
                hud::update_hud_system,
            )
                .chain(),
        )
        .add_systems(Update, (toggle_fullscreen, exit_on_escape))

        /* post‑update (camera) -------------------------------------------- */
        .add_systems(PostUpdate, camera_follow_system);

    info!("spawning player at {},{}", cli.x, cli.y);
    app.run()
}
