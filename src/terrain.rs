//! tile kinds, sub‑features & the noise → terrain classifier

/// -------- tiles --------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    Water,
    Sand,
    Grass,
    /// never produced by [`classify`], walkable when present
    Gravel,
    Stone,
}

impl TileKind {
    pub fn name(self) -> &'static str {
        match self {
            TileKind::Water => "water",
            TileKind::Sand => "sand",
            TileKind::Grass => "grass",
            TileKind::Gravel => "gravel",
            TileKind::Stone => "stone",
        }
    }
}

/// objects drawn on top of the base terrain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    Tree,
}

/// how an entity may enter a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Accessibility {
    Blocked,
    Walkable,
    Swimmable,
}

impl Accessibility {
    /// derived from kind + feature only
    pub fn of(kind: TileKind, feature: Option<Feature>) -> Self {
        if feature.is_some() {
            return Accessibility::Blocked;
        }
        match kind {
            TileKind::Sand | TileKind::Grass | TileKind::Gravel => Accessibility::Walkable,
            TileKind::Water => Accessibility::Swimmable,
            TileKind::Stone => Accessibility::Blocked,
        }
    }

    #[inline]
    pub fn is_accessible(self) -> bool {
        self != Accessibility::Blocked
    }
}

/// -------- thresholds --------
const SAND_MAX: f64 = 0.1;
const GRASS_MAX: f64 = 0.4;
const TREE_BAND: (f64, f64) = (0.30, 0.35);

/// noise sample → (kind, feature)
pub fn classify(value: f64) -> (TileKind, Option<Feature>) {
    if value <= 0.0 {
        (TileKind::Water, None)
    } else if value <= SAND_MAX {
        (TileKind::Sand, None)
    } else if value <= GRASS_MAX {
        let tree = (TREE_BAND.0..=TREE_BAND.1).contains(&value);
        (TileKind::Grass, tree.then_some(Feature::Tree))
    } else {
        (TileKind::Stone, None)
    }
}

/// immutable once generated
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    /// absolute tile coordinates
    pub abs_x: i32,
    pub abs_y: i32,
    /// coordinates inside the owning chunk
    pub local_x: i32,
    pub local_y: i32,
    pub noise: f64,
    pub kind: TileKind,
    pub feature: Option<Feature>,
}

impl Tile {
    pub fn from_sample(abs: (i32, i32), local: (i32, i32), noise: f64) -> Self {
        let (kind, feature) = classify(noise);
        Self {
            abs_x: abs.0,
            abs_y: abs.1,
            local_x: local.0,
            local_y: local.1,
            noise,
            kind,
            feature,
        }
    }

    #[inline]
    pub fn accessibility(&self) -> Accessibility {
        Accessibility::of(self.kind, self.feature)
    }
}
