//! chunk / player / bullet sprites mirrored from the simulation
//!
//! Nothing here feeds back into the simulation. The simulation is y‑down
//! (screen style); Bevy is y‑up, so every position goes through
//! [`to_screen`].

use std::collections::HashMap;

use bevy::color::Srgba;
use bevy::math::{DVec2, Isometry2d};
use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use rand::Rng;

use crate::chunk::Chunk;
use crate::components::{ChunkSprite, PlayerSprite};
use crate::config::PlayerConfig;
use crate::constants::*;
use crate::coords::ChunkCoord;
use crate::input::DebugFlags;
use crate::player::Player;
use crate::seeder::{Seeder, MODULUS};
use crate::terrain::{Feature, Tile, TileKind};
use crate::world::WorldCache;

/// sim (y‑down) → Bevy (y‑up)
#[inline]
pub fn to_screen(v: DVec2) -> Vec2 {
    Vec2::new(v.x as f32, -v.y as f32)
}

/// chunk sprite bookkeeping
#[derive(Resource, Default)]
pub struct ChunkSprites {
    live: HashMap<ChunkCoord, Entity>,
    epoch: u64,
}

/// banded colour variation shared by all tiles
#[derive(Resource)]
pub struct TilePalette {
    color_noise: Perlin,
}

impl TilePalette {
    pub fn new(seed_number: i64) -> Self {
        Self {
            color_noise: Perlin::new(seed_number as u32),
        }
    }

    fn color(&self, tile: &Tile) -> Color {
        let raw = self.color_noise.get([
            tile.abs_x as f64 * COLOR_NOISE_SCALE,
            tile.abs_y as f64 * COLOR_NOISE_SCALE,
        ]) as f32;

        /* bucket‑based colour banding */
        let step = (((raw + 1.0) * 0.5) * COLOR_VARIATION_LEVELS as f32)
            .floor()
            .clamp(0.0, (COLOR_VARIATION_LEVELS - 1) as f32);
        let norm = step / (COLOR_VARIATION_LEVELS as f32 - 1.0) * 2.0 - 1.0;
        let factor = 1.0 + norm * COLOR_VARIATION_STRENGTH;

        let base = match tile.kind {
            TileKind::Water  => Vec3::new(0.12, 0.35, 0.80),
            TileKind::Sand   => Vec3::new(0.86, 0.80, 0.55),
            TileKind::Grass  => Vec3::new(0.13, 0.70, 0.08),
            TileKind::Gravel => Vec3::new(0.55, 0.52, 0.48),
            TileKind::Stone  => Vec3::new(0.50, 0.50, 0.50),
        } * factor;

        Color::srgb(
            base.x.clamp(0.0, 1.0),
            base.y.clamp(0.0, 1.0),
            base.z.clamp(0.0, 1.0),
        )
    }
}

/* ===========================================================
   chunk sprites – spawn on view, drop on evict / leave view
   =========================================================== */
pub fn sync_chunk_sprites_system(
    mut commands: Commands,
    world: Res<WorldCache>,
    flags: Res<DebugFlags>,
    palette: Res<TilePalette>,
    mut sprites: ResMut<ChunkSprites>,
) {
    /* cache cleared → everything baked is stale */
    if sprites.epoch != world.epoch() {
        for (_, e) in sprites.live.drain() {
            commands.entity(e).despawn_recursive();
        }
        sprites.epoch = world.epoch();
    }

    let bounds = world.visible_bounds();
    sprites.live.retain(|coord, e| {
        let keep = bounds.contains(*coord) && world.chunk(*coord).is_some();
        if !keep {
            commands.entity(*e).despawn_recursive();
        }
        keep
    });

    for coord in bounds.iter() {
        if sprites.live.contains_key(&coord) || !world.is_visible(coord) {
            continue;
        }
        let Some(chunk) = world.chunk(coord) else { continue };
        let e = spawn_chunk(&mut commands, chunk, &palette, &flags);
        sprites.live.insert(coord, e);
    }
}

fn spawn_chunk(
    commands: &mut Commands,
    chunk: &Chunk,
    palette: &TilePalette,
    flags: &DebugFlags,
) -> Entity {
    let origin = chunk.rect().min;
    let tile_px = if flags.tile_overlay {
        TILE_SIZE as f32 - 1.0
    } else {
        TILE_SIZE as f32
    };
    let tile_centre = |t: &Tile| {
        origin + DVec2::new(t.local_x as f64 + 0.5, t.local_y as f64 + 0.5) * TILE_SIZE
    };

    commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            ChunkSprite,
        ))
        .with_children(|parent| {
            for tile in chunk.tiles() {
                parent.spawn((
                    Sprite {
                        color: palette.color(tile),
                        custom_size: Some(Vec2::splat(tile_px)),
                        ..default()
                    },
                    Transform::from_translation(to_screen(tile_centre(tile)).extend(0.0)),
                ));
            }

            /* features sit above the base layer */
            for (tile, feature) in chunk.features() {
                let color = match feature {
                    Feature::Tree => Color::srgb(0.05, 0.35, 0.05),
                };
                let key = ChunkCoord::new(tile.abs_x, tile.abs_y).packed_key() as i64;
                let mut rng = Seeder::new(key.rem_euclid(MODULUS - 1) + 1);
                let size = TILE_SIZE as f32 * rng.gen_range(0.55..0.8);
                let jitter = DVec2::new(rng.random_range(-3.0, 3.0), rng.random_range(-3.0, 3.0));
                parent.spawn((
                    Sprite {
                        color,
                        custom_size: Some(Vec2::splat(size)),
                        ..default()
                    },
                    Transform::from_translation(to_screen(tile_centre(tile) + jitter).extend(1.0)),
                ));
            }

            if flags.chunk_overlay {
                parent.spawn((
                    Text2d::new(chunk.coord.to_string()),
                    TextColor(Color::BLACK),
                    Transform::from_translation(
                        to_screen(origin + DVec2::splat(24.0)).extend(2.0),
                    ),
                ));
            }
        })
        .id()
}

/* ===========================================================
   player & bullets
   =========================================================== */
pub fn spawn_player_sprite(commands: &mut Commands, cfg: &PlayerConfig) {
    commands.spawn((
        Sprite {
            color: Color::srgb(0.9, 0.75, 0.6),
            custom_size: Some(Vec2::new(cfg.width, cfg.height)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        PlayerSprite,
    ));
}

#[derive(Resource)]
pub struct SpriteRotationOffset(pub f32);

pub fn sync_player_sprite_system(
    player_q: Query<&Player>,
    offset: Res<SpriteRotationOffset>,
    mut sprite_q: Query<&mut Transform, With<PlayerSprite>>,
) {
    let Ok(player) = player_q.get_single() else { return };
    let Ok(mut tf) = sprite_q.get_single_mut() else { return };

    tf.translation = to_screen(player.position).extend(tf.translation.z);
    // heading is clockwise from "up"; Bevy rotates counter‑clockwise
    let art_turn = offset.0.to_radians() - std::f32::consts::FRAC_PI_2;
    tf.rotation = Quat::from_rotation_z(-(player.heading as f32) - art_turn);
}

pub fn draw_gizmos_system(
    player_q: Query<&Player>,
    world: Res<WorldCache>,
    flags: Res<DebugFlags>,
    mut gizmos: Gizmos,
) {
    let Ok(player) = player_q.get_single() else { return };

    for b in player.bullets.iter() {
        let color = Srgba::hex(&b.template.color)
            .map(Color::from)
            .unwrap_or(Color::WHITE);
        gizmos.rect_2d(
            Isometry2d::from_translation(to_screen(b.position)),
            Vec2::new(b.template.width, b.template.height),
            color,
        );
    }

    if !flags.detail {
        return;
    }

    /* collision around the player: green = enterable, red = blocked */
    let (tx, ty) = player.current_tile();
    for dy in -1..=1 {
        for dx in -1..=1 {
            let centre = DVec2::new(
                (tx + dx) as f64 * TILE_SIZE - CHUNK_SIZE / 2.0 + TILE_SIZE / 2.0,
                (ty + dy) as f64 * TILE_SIZE - CHUNK_SIZE / 2.0 + TILE_SIZE / 2.0,
            );
            let color = if world.is_tile_walkable(centre) {
                Color::srgb(0.0, 1.0, 0.0)
            } else {
                Color::srgb(1.0, 0.0, 0.0)
            };
            gizmos.rect_2d(
                Isometry2d::from_translation(to_screen(centre)),
                Vec2::splat(TILE_SIZE as f32 - 2.0),
                color,
            );
        }
    }

    /* generation window (window + margin) */
    let view = world.view_rect();
    gizmos.rect_2d(
        Isometry2d::from_translation(to_screen(view.min + view.size / 2.0)),
        Vec2::new(view.size.x as f32, view.size.y as f32),
        Color::srgb(0.0, 0.0, 1.0),
    );
}
