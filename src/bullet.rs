//! projectiles: spawn from a weapon, integrate, expire by lifetime
//!
//! Bullets never touch terrain or entities; only their lifetime bounds
//! them.

use bevy::math::DVec2;

use crate::config::{BulletTemplate, WeaponConfig};
use crate::constants::SPEED_TIME_SCALE;
use crate::coords::{forward, heading};

/// a weapon with its remaining ammo
#[derive(Clone, Debug, PartialEq)]
pub struct Weapon {
    pub name: String,
    pub ammo: u32,
    pub bullet: BulletTemplate,
}

impl From<&WeaponConfig> for Weapon {
    fn from(cfg: &WeaponConfig) -> Self {
        Self {
            name: cfg.name.clone(),
            ammo: cfg.ammo,
            bullet: cfg.bullet.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    /// screen‑relative aim points at spawn
    pub source: DVec2,
    pub target: DVec2,
    /// world position
    pub position: DVec2,
    pub heading: f64,
    /// elapsed lifetime (ms)
    pub age: f64,
    pub template: BulletTemplate,
}

impl Bullet {
    #[inline]
    pub fn expired(&self) -> bool {
        self.age >= self.template.life_ms
    }
}

/// live bullets owned by one entity
#[derive(Clone, Debug, Default)]
pub struct BulletSet {
    bullets: Vec<Bullet>,
}

impl BulletSet {
    /// Fire `weapon` from `origin` (world) aimed from `source` towards
    /// `target` (both screen‑relative). Empty weapons do nothing.
    pub fn spawn(
        &mut self,
        weapon: &mut Weapon,
        origin: DVec2,
        source: DVec2,
        target: DVec2,
    ) -> bool {
        if weapon.ammo == 0 {
            return false;
        }
        weapon.ammo -= 1;

        self.bullets.push(Bullet {
            source,
            target,
            position: origin,
            heading: heading(source, target),
            age: 0.0,
            template: weapon.bullet.clone(),
        });
        true
    }

    /// Move every bullet, then drop the expired ones in one pass.
    pub fn integrate(&mut self, dt_ms: f64) -> usize {
        let scale = dt_ms / SPEED_TIME_SCALE;
        for b in &mut self.bullets {
            b.position += forward(b.heading) * b.template.speed * scale;
            b.age += dt_ms;
        }

        let before = self.bullets.len();
        self.bullets.retain(|b| !b.expired());
        before - self.bullets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter()
    }

    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }
}
