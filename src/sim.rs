//! one simulation frame, in a fixed order, plus the Bevy glue that runs it

use bevy::log::debug;
use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::input::{DebugFlags, FrameInput};
use crate::player::Player;
use crate::world::WorldCache;

/// what happened during a frame, for logging & tests
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub visible_chunks: usize,
    pub evicted: usize,
    pub cache_cleared: bool,
    pub fired: bool,
}

/// Advance the world by `dt_ms`.
///
/// Order: player upkeep → move → fire → weapon cycle → rotate → debug
/// toggle → viewport → materialise visible chunks → eviction timer.
pub fn advance(
    world: &mut WorldCache,
    player: &mut Player,
    flags: &mut DebugFlags,
    input: &FrameInput,
    dt_ms: f64,
) -> FrameReport {
    let mut report = FrameReport::default();
    // the player is always drawn in the middle of the screen
    let origin = world.viewport_size() / 2.0;

    player.tick(dt_ms, flags.cheat);

    if let Some(dir) = input.direction {
        player.step(dt_ms, dir, input.running, world, flags.cheat);
    }
    if let Some(target) = input.fire {
        report.fired = player.shoot(origin, target);
    }
    player.cycle_weapon(input.scroll);
    if let Some(pointer) = input.pointer {
        player.rotate_towards(origin, pointer);
    }

    if let Some(toggle) = input.toggle {
        if flags.apply(toggle) {
            world.clear();
            report.cache_cleared = true;
        }
    }

    world.tick(dt_ms, player.position);
    report.visible_chunks = world.visible_chunks().len();
    report.evicted = world.update_eviction_timer(dt_ms);
    report
}

/* ===========================================================
   systems
   =========================================================== */
pub fn resize_viewport_system(
    window_q: Query<&Window, With<PrimaryWindow>>,
    mut world: ResMut<WorldCache>,
) {
    let Ok(window) = window_q.get_single() else { return };
    let size = DVec2::new(window.width() as f64, window.height() as f64);
    if world.viewport_size() != size {
        world.set_viewport_size(size.x, size.y);
    }
}

pub fn simulation_system(
    time: Res<Time>,
    input: Res<FrameInput>,
    mut world: ResMut<WorldCache>,
    mut flags: ResMut<DebugFlags>,
    mut player_q: Query<&mut Player>,
) {
    let Ok(mut player) = player_q.get_single_mut() else { return };
    let dt_ms = time.delta_secs_f64() * 1000.0;

    let report = advance(&mut world, &mut player, &mut flags, &input, dt_ms);
    if report.fired {
        debug!("shot fired, {} bullets in flight", player.bullets.len());
    }
    if report.evicted > 0 || report.cache_cleared {
        debug!(
            "{} chunks visible after sweep (evicted {}, cleared {})",
            report.visible_chunks, report.evicted, report.cache_cleared
        );
    }
}
