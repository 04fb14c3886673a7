//! typed game configuration (player sprite, weapons, world generation)
//!
//! Everything is deserialised from TOML into explicit structs; unknown keys
//! are rejected instead of being copied through.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;

/// shipped defaults
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../assets/config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid world generation parameters: {0}")]
    InvalidGeneration(String),

    #[error("no weapons configured")]
    NoWeapons,
}

/* ===========================================================
   seeds
   =========================================================== */
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(i64),
    Text(String),
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Text(DEFAULT_GEN_SEED.to_string())
    }
}

impl Seed {
    /// Strings: `|Σ code(i) · (31 XOR (i − 1))|` over UTF‑16 code units, with
    /// the XOR taken on 32‑bit signed integers. Numbers pass through.
    pub fn hash(&self) -> i64 {
        match self {
            Seed::Number(n) => *n,
            Seed::Text(s) => {
                let sum: i64 = s
                    .encode_utf16()
                    .enumerate()
                    .map(|(i, c)| c as i64 * (31i32 ^ (i as i32 - 1)) as i64)
                    .sum();
                sum.abs()
            }
        }
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{n}"),
            Seed::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/* ===========================================================
   world generation
   =========================================================== */
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct WorldSection {
    pub min: i32,
    pub max: i32,
    pub quality: f64,
    pub seed: Seed,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            min: DEFAULT_GEN_MIN,
            max: DEFAULT_GEN_MAX,
            quality: DEFAULT_GEN_QUALITY,
            seed: Seed::default(),
        }
    }
}

/// generation parameters plus the scalars derived from the seed
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParams {
    pub min: i32,
    pub max: i32,
    pub quality: f64,
    pub seed: Seed,
    /// hashed seed; drives the permutation shuffle
    pub seed_number: i64,
    /// `0.<decimal digits of |seed_number|>`
    pub seed_float: f64,
    /// `quality + seed_float`
    pub delta: f64,
}

impl GenerationParams {
    pub fn new(section: &WorldSection) -> Result<Self, ConfigError> {
        if section.min > section.max {
            return Err(ConfigError::InvalidGeneration(format!(
                "min ({}) is greater than max ({})",
                section.min, section.max
            )));
        }
        if !section.quality.is_finite() {
            return Err(ConfigError::InvalidGeneration(format!(
                "quality must be finite, got {}",
                section.quality
            )));
        }

        let seed_number = section.seed.hash();
        let seed_float = seed_fraction(seed_number)?;
        let delta = section.quality + seed_float;

        // both scalars divide every noise coordinate
        if seed_float == 0.0 {
            return Err(ConfigError::InvalidGeneration(format!(
                "seed {} hashes to 0, which leaves no fractional scale",
                section.seed
            )));
        }
        if delta == 0.0 || !delta.is_finite() {
            return Err(ConfigError::InvalidGeneration(format!(
                "quality {} cancels the seed scale",
                section.quality
            )));
        }

        Ok(Self {
            min: section.min,
            max: section.max,
            quality: section.quality,
            seed: section.seed.clone(),
            seed_number,
            seed_float,
            delta,
        })
    }

    #[cfg(test)]
    pub fn from_seed(seed: Seed) -> Result<Self, ConfigError> {
        Self::new(&WorldSection {
            seed,
            ..WorldSection::default()
        })
    }
}

/// parses `"0." + digits` so the value is the nearest double to that decimal
fn seed_fraction(seed_number: i64) -> Result<f64, ConfigError> {
    format!("0.{}", seed_number.unsigned_abs())
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidGeneration(e.to_string()))
}

/* ===========================================================
   player & weapons
   =========================================================== */
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    /// sprite art faces this many degrees off "up"
    pub rotation_offset_deg: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulletTemplate {
    pub width: f32,
    pub height: f32,
    pub speed: f64,
    pub life_ms: f64,
    /// `#rrggbb`
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaponConfig {
    pub name: String,
    pub ammo: u32,
    pub bullet: BulletTemplate,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    #[serde(default)]
    pub world: WorldSection,
    pub player: PlayerConfig,
    pub weapons: Vec<WeaponConfig>,
}

impl GameConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = toml::from_str(s)?;
        if cfg.weapons.is_empty() {
            return Err(ConfigError::NoWeapons);
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&s)
    }

    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG_TOML)
    }
}
