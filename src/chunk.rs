//! a 16 × 16 block of classified tiles, generated in one go

use crate::config::GenerationParams;
use crate::constants::CHUNK_TILES;
use crate::coords::{ChunkCoord, Rect};
use crate::gradient::NoiseField;
use crate::terrain::{Feature, Tile};

const TILES_PER_CHUNK: usize = (CHUNK_TILES * CHUNK_TILES) as usize;

#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    /// row‑major, indexed by local coordinates
    tiles: Vec<Tile>,
    /// local coordinates of tiles carrying a feature, in generation order
    features: Vec<(i32, i32)>,
    /// logical clock (ms) at creation
    pub created_at: f64,
}

impl Chunk {
    /// sample + classify every tile of `coord`
    pub fn generate(
        coord: ChunkCoord,
        noise: &NoiseField,
        params: &GenerationParams,
        now: f64,
    ) -> Self {
        let (base_x, base_y) = coord.first_tile();
        let mut tiles = Vec::with_capacity(TILES_PER_CHUNK);
        let mut features = Vec::new();

        for ly in 0..CHUNK_TILES {
            for lx in 0..CHUNK_TILES {
                let (ax, ay) = (base_x + lx, base_y + ly);
                let n = noise.sample(
                    ax as f64 / params.seed_float / params.delta,
                    ay as f64 / params.seed_float / params.delta,
                    0.0,
                );
                let tile = Tile::from_sample((ax, ay), (lx, ly), n);
                if tile.feature.is_some() {
                    features.push((lx, ly));
                }
                tiles.push(tile);
            }
        }

        Self {
            coord,
            tiles,
            features,
            created_at: now,
        }
    }

    /// tile at local coordinates; `None` outside the chunk
    pub fn tile(&self, lx: i32, ly: i32) -> Option<&Tile> {
        if !(0..CHUNK_TILES).contains(&lx) || !(0..CHUNK_TILES).contains(&ly) {
            return None;
        }
        self.tiles.get((ly * CHUNK_TILES + lx) as usize)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// tiles with an overlay object, e.g. trees
    pub fn features(&self) -> impl Iterator<Item = (&Tile, Feature)> {
        self.features.iter().filter_map(|&(lx, ly)| {
            let tile = self.tile(lx, ly)?;
            tile.feature.map(|f| (tile, f))
        })
    }

    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.created_at
    }

    pub fn rect(&self) -> Rect {
        self.coord.rect()
    }
}
