/// -------- tiles & world size --------
pub const TILE_SIZE: f64 = 32.0;
pub const CHUNK_SIZE: f64 = 512.0;
pub const CHUNK_TILES: i32 = (CHUNK_SIZE / TILE_SIZE) as i32; // 16 × 16 tiles

/// extra world units kept "on screen" around the window so neighbouring
/// chunks are generated before they scroll into view
pub const VIEWPORT_MARGIN: f64 = CHUNK_SIZE / 4.0;
pub const DEFAULT_VIEWPORT: (f64, f64) = (1280.0, 720.0);

/// -------- chunk cache --------
pub const CHUNK_TTL_MS: f64 = 5_000.0;
pub const EVICTION_INTERVAL_MS: f64 = 10_000.0;

/// -------- world generation defaults --------
pub const DEFAULT_GEN_MIN: i32 = 0;
pub const DEFAULT_GEN_MAX: i32 = 32;
pub const DEFAULT_GEN_SEED: &str = "default";
pub const DEFAULT_GEN_QUALITY: f64 = 128.0;

/// -------- player --------
pub const DEFAULT_PLAYER_X: f64 = 0.0;
pub const DEFAULT_PLAYER_Y: f64 = 0.0;

pub const WALK_SPEED: f64  = 5.0;
pub const RUN_SPEED: f64   = 8.0;
pub const SWIM_SPEED: f64  = 1.0;
pub const CHEAT_SPEED: f64 = 10.0;

/// speeds are "units per 60 ms"
pub const SPEED_TIME_SCALE: f64 = 60.0;

pub const STAT_MAX: i32 = 100;
pub const STAMINA_TICK_MS: f64 = 300.0;
pub const HUNGER_TICK_MS: f64  = 5_000.0;

/// -------- colour‑variation (renderer only) --------
pub const COLOR_NOISE_SCALE: f64 = 0.05;
pub const COLOR_VARIATION_LEVELS: i32 = 4;
pub const COLOR_VARIATION_STRENGTH: f32 = 0.2;
