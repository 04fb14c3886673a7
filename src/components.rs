use bevy::prelude::*;

/* ===========================================================
   render‑side markers
   =========================================================== */

/// parent entity holding one chunk's tile sprites
#[derive(Component)]
pub struct ChunkSprite;

#[derive(Component)]
pub struct PlayerSprite;

/* ===========================================================
   hud
   =========================================================== */
#[derive(Component)]
pub struct HudText;
