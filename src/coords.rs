//! world → chunk → tile conversions, rectangles & headings
//!
//! World positions are the only stored coordinates; chunk and tile indices
//! are always derived from them. Chunk `(cx, cy)` covers world
//! `[cx·512 − 256, cx·512 + 256)` on each axis, so the origin sits in the
//! middle of chunk `(0, 0)`.

use std::f64::consts::TAU;

use bevy::math::DVec2;

use crate::constants::{CHUNK_SIZE, CHUNK_TILES, TILE_SIZE};

const HALF_CHUNK: f64 = CHUNK_SIZE / 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// chunk containing a world position
    pub fn containing(world: DVec2) -> Self {
        Self {
            x: ((world.x + HALF_CHUNK) / CHUNK_SIZE).floor() as i32,
            y: ((world.y + HALF_CHUNK) / CHUNK_SIZE).floor() as i32,
        }
    }

    /// Reference key space `(y << 16) XOR x`.
    ///
    /// Only collision‑free while both indices fit a signed 16‑bit range;
    /// the cache itself is keyed by the full coordinate pair.
    pub fn packed_key(self) -> i32 {
        self.y.wrapping_shl(16) ^ self.x
    }

    /// absolute tile index of this chunk's local `(0, 0)`
    pub fn first_tile(self) -> (i32, i32) {
        (self.x * CHUNK_TILES, self.y * CHUNK_TILES)
    }

    /// world‑space square covered by the chunk
    pub fn rect(self) -> Rect {
        let min = DVec2::new(
            self.x as f64 * CHUNK_SIZE - HALF_CHUNK,
            self.y as f64 * CHUNK_SIZE - HALF_CHUNK,
        );
        Rect::new(min, DVec2::splat(CHUNK_SIZE))
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// absolute tile index of a world position
pub fn tile_index(world: DVec2) -> (i32, i32) {
    (
        ((world.x + HALF_CHUNK) / TILE_SIZE).floor() as i32,
        ((world.y + HALF_CHUNK) / TILE_SIZE).floor() as i32,
    )
}

/// tile index inside the containing chunk, always in `0..CHUNK_TILES`
pub fn local_tile_index(world: DVec2) -> (i32, i32) {
    let (tx, ty) = tile_index(world);
    (tx.rem_euclid(CHUNK_TILES), ty.rem_euclid(CHUNK_TILES))
}

/// axis‑aligned rectangle, y grows downwards like screen space
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub min: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, size: DVec2) -> Self {
        Self { min, size }
    }

    pub fn from_center(center: DVec2, size: DVec2) -> Self {
        Self::new(center - size / 2.0, size)
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }

    /// Disjoint only when one lies strictly to a side of the other, so
    /// rectangles that share an edge still intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min, self.max());
        let (b_min, b_max) = (other.min, other.max());
        !(b_min.x > a_max.x || b_max.x < a_min.x || b_min.y > a_max.y || b_max.y < a_min.y)
    }
}

/// Heading from `from` to `to` in screen space: 0 points up, growing
/// clockwise. `atan2(dx, −dy)` reduced with a truncated remainder by 2π.
pub fn heading(from: DVec2, to: DVec2) -> f64 {
    (to.x - from.x).atan2(-(to.y - from.y)) % TAU
}

/// unit step for `heading` (up = −y)
#[inline]
pub fn forward(heading: f64) -> DVec2 {
    DVec2::new(heading.sin(), -heading.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_origin_sits_in_chunk_zero() {
        assert_eq!(ChunkCoord::containing(DVec2::ZERO), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(DVec2::new(255.9, -256.0)), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(DVec2::new(256.0, -256.1)), ChunkCoord::new(1, -1));
    }

    #[test]
    fn test_tile_indices() {
        assert_eq!(tile_index(DVec2::ZERO), (8, 8));
        assert_eq!(local_tile_index(DVec2::ZERO), (8, 8));
        assert_eq!(tile_index(DVec2::new(-256.0, -256.0)), (0, 0));
        assert_eq!(tile_index(DVec2::new(-257.0, 300.0)), (-1, 17));
        assert_eq!(local_tile_index(DVec2::new(-257.0, 300.0)), (15, 1));
    }

    #[test]
    fn test_local_tile_agrees_with_chunk() {
        let p = DVec2::new(-1234.5, 987.25);
        let chunk = ChunkCoord::containing(p);
        let (tx, ty) = tile_index(p);
        let (lx, ly) = local_tile_index(p);
        let (fx, fy) = chunk.first_tile();
        assert_eq!((fx + lx, fy + ly), (tx, ty));
    }

    #[test]
    fn test_packed_key_matches_reference_form() {
        assert_eq!(ChunkCoord::new(3, 2).packed_key(), (2 << 16) ^ 3);
        assert_eq!(ChunkCoord::new(-1, 0).packed_key(), -1);
    }

    #[test]
    fn test_packed_key_collides_outside_16_bits() {
        // x = 65536 spills into the y half of the key
        let a = ChunkCoord::new(65_536, 0);
        let b = ChunkCoord::new(0, 1);
        assert_eq!(a.packed_key(), b.packed_key());
    }

    #[test]
    fn test_packed_key_unique_on_small_grid() {
        let mut seen = HashSet::new();
        for y in -40..40 {
            for x in -40..40 {
                assert!(seen.insert(ChunkCoord::new(x, y).packed_key()));
            }
        }
    }

    #[test]
    fn test_chunk_rect() {
        let r = ChunkCoord::new(1, -1).rect();
        assert_eq!(r.min, DVec2::new(256.0, -768.0));
        assert_eq!(r.max(), DVec2::new(768.0, -256.0));
    }

    #[test]
    fn test_touching_rects_intersect() {
        let a = Rect::new(DVec2::ZERO, DVec2::splat(10.0));
        let b = Rect::new(DVec2::new(10.0, 0.0), DVec2::splat(10.0));
        let c = Rect::new(DVec2::new(10.1, 0.0), DVec2::splat(10.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_heading_cardinals() {
        let o = DVec2::ZERO;
        assert_eq!(heading(o, DVec2::new(0.0, -5.0)), 0.0);
        assert!((heading(o, DVec2::new(5.0, 0.0)) - FRAC_PI_2).abs() < 1e-12);
        assert!((heading(o, DVec2::new(0.0, 5.0)) - PI).abs() < 1e-12);
        assert!((heading(o, DVec2::new(-5.0, 0.0)) + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_heading_of_zero_vector_is_finite() {
        let p = DVec2::new(3.0, 4.0);
        assert!(heading(p, p).is_finite());
    }

    #[test]
    fn test_forward_points_up_at_zero() {
        let f = forward(0.0);
        assert_eq!(f, DVec2::new(0.0, -1.0));
    }

    proptest! {
        #[test]
        fn packed_key_unique_within_16_bits(
            x1 in -32768i32..32768, y1 in -32768i32..32768,
            x2 in -32768i32..32768, y2 in -32768i32..32768,
        ) {
            prop_assume!((x1, y1) != (x2, y2));
            let k1 = ChunkCoord::new(x1, y1).packed_key();
            let k2 = ChunkCoord::new(x2, y2).packed_key();
            prop_assert_ne!(k1, k2);
        }

        #[test]
        fn local_tile_in_range(x in -1.0e6f64..1.0e6, y in -1.0e6f64..1.0e6) {
            let (lx, ly) = local_tile_index(DVec2::new(x, y));
            prop_assert!((0..CHUNK_TILES).contains(&lx));
            prop_assert!((0..CHUNK_TILES).contains(&ly));
        }
    }
}
