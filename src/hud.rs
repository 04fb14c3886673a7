//! on‑screen stats line and the optional debug info line

use bevy::prelude::*;

use crate::components::HudText;
use crate::coords::local_tile_index;
use crate::input::DebugFlags;
use crate::player::{Player, PlayerSnapshot};
use crate::world::WorldCache;

pub fn spawn_hud(commands: &mut Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
        HudText,
    ));
}

fn stats_line(s: &PlayerSnapshot) -> String {
    format!(
        "HP {}  ST {}  HUNGER {}  |  {} ({})",
        s.health, s.stamina, s.hunger, s.weapon_name, s.ammo
    )
}

fn info_line(world: &WorldCache, player: &Player, cheat: bool) -> String {
    let chunk = player.current_chunk();
    let (tx, ty) = player.current_tile();
    let (lx, ly) = local_tile_index(player.position);
    let kind = world
        .chunk(chunk)
        .and_then(|c| c.tile(lx, ly))
        .map_or("?", |t| t.kind.name());
    format!(
        "seed {}  visible {}  cached {}  pos {:.1},{:.1}  chunk {}  tile {},{} {}{}",
        world.params().seed,
        world.visible_chunk_count(),
        world.cached_chunk_count(),
        player.position.x,
        player.position.y,
        chunk,
        tx,
        ty,
        kind,
        if cheat { "  *" } else { "" },
    )
}

pub fn update_hud_system(
    world: Res<WorldCache>,
    flags: Res<DebugFlags>,
    player_q: Query<&Player>,
    mut hud_q: Query<(&mut Text, &mut Visibility), With<HudText>>,
) {
    let Ok(player) = player_q.get_single() else { return };
    let Ok((mut text, mut vis)) = hud_q.get_single_mut() else { return };

    if !flags.hud {
        *vis = Visibility::Hidden;
        return;
    }
    *vis = Visibility::Inherited;

    let mut s = stats_line(&player.snapshot());
    if flags.info_overlay {
        s.push('\n');
        s.push_str(&info_line(&world, player, flags.cheat));
    }
    text.0 = s;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::DVec2;

    use crate::bullet::Weapon;
    use crate::config::GameConfig;
    use crate::world::tests::default_world;

    #[test]
    fn test_stats_line_names_active_weapon() {
        let cfg = GameConfig::builtin().unwrap();
        let p = Player::new(DVec2::ZERO, cfg.weapons.iter().map(Weapon::from).collect());
        let line = stats_line(&p.snapshot());
        assert!(line.starts_with("HP 100  ST 100  HUNGER 0"));
        assert!(line.contains("Pistol (1000000)"));
    }

    #[test]
    fn test_info_line_marks_cheat() {
        let world = default_world();
        let p = Player::new(DVec2::new(300.0, -10.0), Vec::new());
        let plain = info_line(&world, &p, false);
        assert!(plain.contains("pos 300.0,-10.0"));
        assert!(plain.contains("chunk 1,0"));
        assert!(!plain.ends_with('*'));
        assert!(info_line(&world, &p, true).ends_with('*'));
    }
}
