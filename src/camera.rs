use bevy::prelude::*;

use crate::player::Player;
use crate::render::to_screen;

/// pixel snapping helper – keeps the camera on whole pixels so sprites never
/// land on half‑pixels and shimmer
#[inline]
fn snap(v: f32) -> f32 {
    v.round()      // 1 U = 1 screen pixel in the default 2‑D camera
}

/// camera locked on the player; the world has no edges to clamp against
pub fn camera_follow_system(
    mut cam_q: Query<&mut Transform, With<Camera>>,
    player_q:  Query<&Player>,
) {
    let Ok(mut cam_tf) = cam_q.get_single_mut() else { return };
    let Ok(player)     = player_q.get_single()  else { return };

    let p = to_screen(player.position);
    cam_tf.translation.x = snap(p.x);
    cam_tf.translation.y = snap(p.y);
}
