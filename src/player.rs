//! the player entity: movement with terrain collision, vital stats,
//! weapons & its bullets

use bevy::log::debug;
use bevy::math::DVec2;
use bevy::prelude::Component;

use crate::bullet::{BulletSet, Weapon};
use crate::constants::*;
use crate::coords::{self, forward, ChunkCoord};
use crate::terrain::Accessibility;
use crate::world::WorldCache;

/// requested move, relative to the current heading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// unit step for `heading`; `Up` is always "forward"
    pub fn step(self, heading: f64) -> DVec2 {
        let (sin, cos) = heading.sin_cos();
        match self {
            Direction::Up => forward(heading),
            Direction::Left => DVec2::new(-cos, -sin),
            Direction::Down => DVec2::new(-sin, cos),
            Direction::Right => DVec2::new(cos, sin),
        }
    }
}

/* ===========================================================
   vital stats
   =========================================================== */
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub health: i32,
    pub stamina: i32,
    pub hunger: i32,
    stamina_ms: f64,
    hunger_ms: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: STAT_MAX,
            stamina: STAT_MAX,
            hunger: 0,
            stamina_ms: 0.0,
            hunger_ms: 0.0,
        }
    }
}

impl Stats {
    /// Stamina and hunger change only when their own accumulator crosses
    /// its interval, so the result does not depend on frame rate.
    fn tick(&mut self, dt_ms: f64, moving: bool, exerting: bool) {
        self.stamina_ms += dt_ms;
        self.hunger_ms += dt_ms;

        if self.stamina_ms >= STAMINA_TICK_MS {
            if moving {
                if self.stamina > 0 {
                    self.stamina -= if exerting { 2 } else { 1 };
                }
                self.stamina = self.stamina.max(0);
            } else if self.stamina < STAT_MAX && self.hunger < STAT_MAX {
                self.stamina = (self.stamina + 5).min(STAT_MAX);
            }
            self.stamina_ms = 0.0;
        }

        if self.hunger_ms >= HUNGER_TICK_MS {
            if self.hunger >= STAT_MAX {
                // starving
                self.health = (self.health - 1).max(0);
            } else {
                self.hunger += 1;
            }
            self.hunger_ms = 0.0;
        }
    }
}

/// plain data handed to the HUD
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub health: i32,
    pub stamina: i32,
    pub hunger: i32,
    pub ammo: u32,
    pub weapon_name: String,
}

/* ===========================================================
   player
   =========================================================== */
#[derive(Component, Clone, Debug)]
pub struct Player {
    pub position: DVec2,
    /// radians, 0 = up, clockwise
    pub heading: f64,
    pub moving: bool,
    pub running: bool,
    pub swimming: bool,
    pub stats: Stats,
    pub weapons: Vec<Weapon>,
    pub active_weapon: usize,
    pub bullets: BulletSet,
}

impl Player {
    pub fn new(position: DVec2, weapons: Vec<Weapon>) -> Self {
        debug!("player spawned at {position} with {} weapons", weapons.len());
        Self {
            position,
            heading: 0.0,
            moving: false,
            running: false,
            swimming: false,
            stats: Stats::default(),
            weapons,
            active_weapon: 0,
            bullets: BulletSet::default(),
        }
    }

    /// Per-frame upkeep: stats, bullets, then clear `moving` so only a
    /// move made this frame counts next frame.
    pub fn tick(&mut self, dt_ms: f64, cheat: bool) {
        if !cheat {
            self.stats
                .tick(dt_ms, self.moving, self.swimming || self.running);
        }
        self.bullets.integrate(dt_ms);
        self.moving = false;
    }

    fn speed(&self, running: bool, cheat: bool) -> f64 {
        if cheat {
            CHEAT_SPEED
        } else if self.swimming {
            SWIM_SPEED
        } else if running {
            RUN_SPEED
        } else {
            WALK_SPEED
        }
    }

    /// Try one step in `dir`. A blocked destination leaves the position
    /// untouched and clears the motion flags; it is not an error.
    pub fn step(
        &mut self,
        dt_ms: f64,
        dir: Direction,
        running: bool,
        world: &WorldCache,
        cheat: bool,
    ) -> Accessibility {
        let running = running && (self.swimming || self.stats.stamina > 0);
        let distance = self.speed(running, cheat) * (dt_ms / SPEED_TIME_SCALE);
        let dest = self.position + dir.step(self.heading) * distance;

        self.moving = true;
        self.running = false;
        self.swimming = false;

        let access = if cheat {
            Accessibility::Walkable
        } else {
            world.accessibility_at(dest)
        };

        match access {
            Accessibility::Blocked => self.moving = false,
            Accessibility::Swimmable => {
                self.position = dest;
                self.swimming = true;
            }
            Accessibility::Walkable => {
                self.position = dest;
                self.running = running;
            }
        }
        access
    }

    /// face the pointer; `origin` is where the player sits on screen
    pub fn rotate_towards(&mut self, origin: DVec2, pointer: DVec2) {
        self.heading = coords::heading(origin, pointer);
    }

    /// Fire the active weapon. No weapon or no ammo means no bullet.
    pub fn shoot(&mut self, origin: DVec2, target: DVec2) -> bool {
        let Some(weapon) = self.weapons.get_mut(self.active_weapon) else {
            return false;
        };
        self.bullets.spawn(weapon, self.position, origin, target)
    }

    pub fn next_weapon(&mut self) {
        if self.weapons.is_empty() {
            return;
        }
        self.active_weapon = (self.active_weapon + 1) % self.weapons.len();
        debug!("weapon → {}", self.weapons[self.active_weapon].name);
    }

    pub fn prev_weapon(&mut self) {
        if self.weapons.is_empty() {
            return;
        }
        self.active_weapon = match self.active_weapon {
            0 => self.weapons.len() - 1,
            i => (i - 1).min(self.weapons.len() - 1),
        };
        debug!("weapon → {}", self.weapons[self.active_weapon].name);
    }

    /// wheel up selects the previous weapon, wheel down the next
    pub fn cycle_weapon(&mut self, scroll: f64) {
        if scroll > 0.0 {
            self.prev_weapon();
        } else if scroll < 0.0 {
            self.next_weapon();
        }
    }

    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.active_weapon)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let (ammo, weapon_name) = self
            .active_weapon()
            .map_or((0, "None".to_string()), |w| (w.ammo, w.name.clone()));
        PlayerSnapshot {
            health: self.stats.health,
            stamina: self.stats.stamina,
            hunger: self.stats.hunger,
            ammo,
            weapon_name,
        }
    }

    pub fn current_chunk(&self) -> ChunkCoord {
        ChunkCoord::containing(self.position)
    }

    /// absolute tile index
    pub fn current_tile(&self) -> (i32, i32) {
        coords::tile_index(self.position)
    }
}
