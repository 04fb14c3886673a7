//! per-frame input snapshot & debug toggles
//!
//! The simulation only ever sees [`FrameInput`]; how it was captured is the
//! business of [`sample_input_system`].

use bevy::input::mouse::MouseWheel;
use bevy::input::ButtonInput;
use bevy::log::info;
use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::player::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugToggle {
    TileOverlay,
    ChunkOverlay,
    InfoOverlay,
    Cheat,
    Detail,
    Hud,
}

/// everything the simulation needs from the outside for one frame
#[derive(Resource, Clone, Debug, Default)]
pub struct FrameInput {
    pub direction: Option<Direction>,
    pub running: bool,
    /// screen point of a click this frame
    pub fire: Option<DVec2>,
    /// wheel delta, > 0 = up
    pub scroll: f64,
    /// last known pointer position (screen)
    pub pointer: Option<DVec2>,
    /// at most one toggle per frame
    pub toggle: Option<DebugToggle>,
}

#[derive(Resource, Clone, Debug, PartialEq, Eq)]
pub struct DebugFlags {
    pub tile_overlay: bool,
    pub chunk_overlay: bool,
    pub info_overlay: bool,
    pub cheat: bool,
    pub detail: bool,
    pub hud: bool,
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self {
            tile_overlay: false,
            chunk_overlay: false,
            info_overlay: false,
            cheat: false,
            detail: false,
            hud: true,
        }
    }
}

impl DebugFlags {
    /// Flip one flag. Returns `true` when cached chunks bake the flag in
    /// and must be regenerated.
    pub fn apply(&mut self, toggle: DebugToggle) -> bool {
        let (flag, clears) = match toggle {
            DebugToggle::TileOverlay => (&mut self.tile_overlay, true),
            DebugToggle::ChunkOverlay => (&mut self.chunk_overlay, true),
            DebugToggle::InfoOverlay => (&mut self.info_overlay, false),
            DebugToggle::Cheat => (&mut self.cheat, false),
            DebugToggle::Detail => (&mut self.detail, true),
            DebugToggle::Hud => (&mut self.hud, false),
        };
        *flag = !*flag;
        info!("debug toggle {toggle:?} → {}", *flag);
        clears
    }
}

/* ===========================================================
   keyboard / mouse → FrameInput
   =========================================================== */
const TOGGLE_KEYS: [(KeyCode, DebugToggle); 6] = [
    (KeyCode::Digit1, DebugToggle::TileOverlay),
    (KeyCode::Digit2, DebugToggle::ChunkOverlay),
    (KeyCode::Digit3, DebugToggle::InfoOverlay),
    (KeyCode::Digit7, DebugToggle::Cheat),
    (KeyCode::Digit8, DebugToggle::Detail),
    (KeyCode::Digit9, DebugToggle::Hud),
];

pub fn sample_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut wheel: EventReader<MouseWheel>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    mut input: ResMut<FrameInput>,
) {
    /* W A S D, first one wins */
    input.direction = [
        (KeyCode::KeyW, Direction::Up),
        (KeyCode::KeyA, Direction::Left),
        (KeyCode::KeyS, Direction::Down),
        (KeyCode::KeyD, Direction::Right),
    ]
    .into_iter()
    .find(|(k, _)| keys.pressed(*k))
    .map(|(_, d)| d);

    input.running = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

    let cursor = window_q
        .get_single()
        .ok()
        .and_then(|w| w.cursor_position())
        .map(|c| c.as_dvec2());
    if cursor.is_some() {
        input.pointer = cursor;
    }
    input.fire = if mouse.just_pressed(MouseButton::Left) {
        input.pointer
    } else {
        None
    };

    input.scroll = wheel.read().map(|ev| ev.y as f64).sum::<f64>().clamp(-1.0, 1.0);

    input.toggle = TOGGLE_KEYS
        .into_iter()
        .find(|(k, _)| keys.just_pressed(*k))
        .map(|(_, t)| t);
}
