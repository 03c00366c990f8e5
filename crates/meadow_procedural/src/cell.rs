//! # Cell Data Model
//!
//! The world is tiled by square cells of `cell_size` world units.
//! Cell `(cx, cz)` covers `[cx·size, (cx+1)·size) × [cz·size, (cz+1)·size)`;
//! everything inside a cell is stored in *local* coordinates relative to
//! the cell center, so local positions lie in `[-size/2, size/2)`.
//!
//! Object categories are tagged enums: every variant carries exactly the
//! cosmetic payload it needs and nothing else.

use serde::{Deserialize, Serialize};

use crate::path::{CellPaths, Edge, PathEdge};
use crate::placement::Circle;

/// Cell coordinate (identifies a cell in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// X coordinate (in cells, not world units).
    pub x: i32,
    /// Z coordinate (in cells, not world units).
    pub z: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell containing the world position `(x, z)` (floor division).
    #[inline]
    #[must_use]
    pub fn from_world(x: f64, z: f64, cell_size: f64) -> Self {
        Self {
            x: (x / cell_size).floor() as i32,
            z: (z / cell_size).floor() as i32,
        }
    }

    /// World position of the cell center.
    #[inline]
    #[must_use]
    pub fn center(self, cell_size: f64) -> (f64, f64) {
        (
            (f64::from(self.x) + 0.5) * cell_size,
            (f64::from(self.z) + 0.5) * cell_size,
        )
    }

    /// Converts a local position of this cell to world space.
    #[inline]
    #[must_use]
    pub fn to_world(self, local_x: f64, local_z: f64, cell_size: f64) -> (f64, f64) {
        let (cx, cz) = self.center(cell_size);
        (cx + local_x, cz + local_z)
    }

    /// Chebyshev (king-move) distance in cells.
    #[inline]
    #[must_use]
    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// The cell across the given edge.
    #[inline]
    #[must_use]
    pub const fn neighbor(self, edge: Edge) -> Self {
        let (dx, dz) = edge.delta();
        Self::new(self.x.wrapping_add(dx), self.z.wrapping_add(dz))
    }
}

/// Tree variant tag, as named in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeVariant {
    /// Conifer built from stacked cones.
    Pine,
    /// Broadleaf with a lumpy crown.
    Oak,
    /// Slim pale trunk.
    Birch,
    /// Low shrub.
    Bush,
}

/// Tree shape with its per-variant payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TreeKind {
    /// Pine tree.
    Pine {
        /// Number of stacked cone tiers (3-5).
        tiers: u8,
    },
    /// Oak tree.
    Oak {
        /// Number of crown lobes (3-6).
        lobes: u8,
    },
    /// Birch tree.
    Birch {
        /// Trunk lean in radians.
        lean: f64,
    },
    /// Bush.
    Bush {
        /// Whether the bush carries berries.
        berries: bool,
    },
}

impl TreeKind {
    /// The tag this shape was generated from.
    #[must_use]
    pub const fn variant(&self) -> TreeVariant {
        match self {
            Self::Pine { .. } => TreeVariant::Pine,
            Self::Oak { .. } => TreeVariant::Oak,
            Self::Birch { .. } => TreeVariant::Birch,
            Self::Bush { .. } => TreeVariant::Bush,
        }
    }
}

/// A placed tree or bush.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tree {
    /// Local X.
    pub x: f64,
    /// Local Z.
    pub z: f64,
    /// Shape.
    pub kind: TreeKind,
    /// Size scalar.
    pub size: f64,
    /// Colour seed in `[0, 1)`.
    pub color_seed: f64,
    /// Placement radius.
    pub radius: f64,
}

/// Flower variant tag, as named in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowerVariant {
    /// Radial petals around a yellow center.
    Daisy,
    /// Closed cup.
    Tulip,
    /// Drooping bells along a stem.
    Bluebell,
}

/// Flower shape with its per-variant payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowerKind {
    /// Daisy.
    Daisy {
        /// Petal count (5-8).
        petals: u8,
    },
    /// Tulip.
    Tulip,
    /// Bluebell.
    Bluebell {
        /// Bell count (3-5).
        bells: u8,
    },
}

impl FlowerKind {
    /// The tag this shape was generated from.
    #[must_use]
    pub const fn variant(&self) -> FlowerVariant {
        match self {
            Self::Daisy { .. } => FlowerVariant::Daisy,
            Self::Tulip => FlowerVariant::Tulip,
            Self::Bluebell { .. } => FlowerVariant::Bluebell,
        }
    }
}

/// Colour in hue/saturation/brightness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsb {
    /// Hue in degrees, `[0, 360)`.
    pub hue: f64,
    /// Saturation, `[0, 100]`.
    pub saturation: f64,
    /// Brightness, `[0, 100]`.
    pub brightness: f64,
}

/// A placed flower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flower {
    /// Local X.
    pub x: f64,
    /// Local Z.
    pub z: f64,
    /// Shape.
    pub kind: FlowerKind,
    /// Size scalar.
    pub size: f64,
    /// Petal colour.
    pub color: Hsb,
    /// Stem tilt around X, radians.
    pub tilt_x: f64,
    /// Stem tilt around Z, radians.
    pub tilt_z: f64,
    /// Placement radius.
    pub radius: f64,
    /// Index of the cluster this flower belongs to; `None` for singles.
    pub cluster: Option<u8>,
}

/// Animal species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Rabbit.
    Rabbit,
    /// Deer.
    Deer,
    /// Fox.
    Fox,
    /// Ground-feeding bird.
    Bird,
}

/// A placed animal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animal {
    /// Local X.
    pub x: f64,
    /// Local Z.
    pub z: f64,
    /// Species.
    pub species: Species,
    /// Size scalar.
    pub size: f64,
    /// Colour seed in `[0, 1)`.
    pub color_seed: f64,
    /// Animation phase in radians.
    pub phase: f64,
    /// Placement radius.
    pub radius: f64,
}

/// Generated content of one cell. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct CellContent {
    /// Which cell this is.
    pub coord: CellCoord,
    /// Trees and bushes, in placement order.
    pub trees: Vec<Tree>,
    /// Flowers, cluster members first, then singles.
    pub flowers: Vec<Flower>,
    /// Animals.
    pub animals: Vec<Animal>,
    /// Path edges.
    pub paths: CellPaths,
}

impl CellContent {
    /// Number of placed decorative objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.trees.len() + self.flowers.len() + self.animals.len()
    }

    /// Placement circles of every decorative object, in local space.
    pub fn circles(&self) -> impl Iterator<Item = Circle> + '_ {
        let trees = self.trees.iter().map(|t| Circle::new(t.x, t.z, t.radius));
        let flowers = self.flowers.iter().map(|f| Circle::new(f.x, f.z, f.radius));
        let animals = self.animals.iter().map(|a| Circle::new(a.x, a.z, a.radius));
        trees.chain(flowers).chain(animals)
    }

    /// Every drawable thing in this cell, positioned in world space.
    pub fn objects(&self, cell_size: f64) -> impl Iterator<Item = WorldObject<'_>> + '_ {
        let coord = self.coord;
        let place = move |x: f64, z: f64, object| {
            let (wx, wz) = coord.to_world(x, z, cell_size);
            WorldObject { x: wx, z: wz, cell: coord, object }
        };

        let trees = self.trees.iter().map(move |t| place(t.x, t.z, ObjectRef::Tree(t)));
        let flowers = self.flowers.iter().map(move |f| place(f.x, f.z, ObjectRef::Flower(f)));
        let animals = self.animals.iter().map(move |a| place(a.x, a.z, ObjectRef::Animal(a)));
        let paths = self.paths.active().map(move |(edge, path)| {
            // Anchored at the spoke midpoint for distance culling.
            let (x, z) = edge.spoke_point(0.5, cell_size);
            place(x, z, ObjectRef::Path { edge, path })
        });

        trees.chain(flowers).chain(animals).chain(paths)
    }
}

/// Borrowed view of one drawable object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObjectRef<'a> {
    /// A tree or bush.
    Tree(&'a Tree),
    /// A flower.
    Flower(&'a Flower),
    /// An animal.
    Animal(&'a Animal),
    /// A path spoke from an edge midpoint to the cell center.
    Path {
        /// Edge the spoke starts from.
        edge: Edge,
        /// Curve parameters.
        path: &'a PathEdge,
    },
}

/// A drawable object with its world-space anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldObject<'a> {
    /// World X.
    pub x: f64,
    /// World Z.
    pub z: f64,
    /// Owning cell.
    pub cell: CellCoord,
    /// The object itself.
    pub object: ObjectRef<'a>,
}
