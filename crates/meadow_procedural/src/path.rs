//! # Path Network
//!
//! Dirt paths are decided per cell *boundary*, not per cell. Each shared
//! boundary has exactly one owning cell, and the random draws for that
//! boundary are made at the owner's coordinate, so both neighbours derive
//! the same answer without ever talking to each other.
//!
//! ```text
//!            (cx, cz-1)
//!       ┌───────────────┐
//!       │               │
//!       │      S        │
//!       ├───────●───────┤  <- owned by (cx, cz), north-south axis
//!       │      N        │
//!  W ●──┼──    ·     ───┼──● E   <- west edge owned by (cx, cz),
//!       │               │          east edge owned by (cx+1, cz)
//!       │      S        │
//!       └───────●───────┘
//!            (cx, cz)
//! ```
//!
//! An active edge draws a *spoke* from the edge midpoint (`t = 0`) to the
//! cell center (`t = 1`), bent sideways by
//! `offset(t) = amplitude · sin(tπ) · sin(phase)`. The offset is zero at
//! both ends, so spokes meet neighbours at edge midpoints and each other
//! at the center.

use std::f64::consts::{PI, TAU};

use crate::cell::CellCoord;
use crate::config::PathConfig;
use crate::hash::{CellRng, Salt, Stream};
use crate::placement::Circle;

/// One of the four sides of a cell. North is −z, west is −x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The −z side.
    North,
    /// The +z side.
    South,
    /// The +x side.
    East,
    /// The −x side.
    West,
}

impl Edge {
    /// All edges in canonical order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// The same boundary seen from the neighbouring cell.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Cell offset to the neighbour across this edge.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// Which family of boundaries this edge belongs to.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::NorthSouth,
            Self::East | Self::West => Axis::EastWest,
        }
    }

    /// Local point on this edge's spoke at parameter `t`, with no lateral offset.
    #[must_use]
    pub fn spoke_point(self, t: f64, cell_size: f64) -> (f64, f64) {
        self.point(t, 0.0, cell_size)
    }

    /// Local point at parameter `t` along the spoke, displaced `lateral`
    /// units perpendicular to it.
    fn point(self, t: f64, lateral: f64, cell_size: f64) -> (f64, f64) {
        let half = cell_size * 0.5;
        let along = half * (1.0 - t);
        match self {
            Self::North => (lateral, -along),
            Self::South => (lateral, along),
            Self::West => (-along, lateral),
            Self::East => (along, lateral),
        }
    }
}

/// Boundary family: boundaries crossed when walking north-south, or east-west.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal boundaries between `(cx, cz-1)` and `(cx, cz)`.
    NorthSouth,
    /// Vertical boundaries between `(cx-1, cz)` and `(cx, cz)`.
    EastWest,
}

impl Axis {
    const fn stream(self) -> Stream {
        match self {
            Self::NorthSouth => Stream::PathNorthSouth,
            Self::EastWest => Stream::PathEastWest,
        }
    }
}

/// Canonical identity of a shared boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    /// The owning cell: the one on the +z (or +x) side of the boundary.
    pub owner: CellCoord,
    /// Boundary family.
    pub axis: Axis,
}

impl EdgeKey {
    /// Canonical key for `edge` of `cell`.
    #[must_use]
    pub const fn of(cell: CellCoord, edge: Edge) -> Self {
        let owner = match edge {
            Edge::North | Edge::West => cell,
            Edge::South | Edge::East => cell.neighbor(edge),
        };
        Self {
            owner,
            axis: edge.axis(),
        }
    }
}

/// Curve parameters of one active path edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathEdge {
    /// Peak lateral displacement, world units.
    pub amplitude: f64,
    /// Phase in radians; scales the bend by `sin(phase)`.
    pub phase: f64,
}

impl PathEdge {
    /// Lateral centerline offset at normalized distance `t` in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn offset(&self, t: f64) -> f64 {
        self.amplitude * (t * PI).sin() * self.phase.sin()
    }

    /// `samples + 1` local centerline points of the spoke leaving `edge`,
    /// from the edge midpoint to the cell center.
    #[must_use]
    pub fn centerline(&self, edge: Edge, cell_size: f64, samples: usize) -> Vec<(f64, f64)> {
        let samples = samples.max(1);
        (0..=samples)
            .map(|i| {
                let t = i as f64 / samples as f64;
                edge.point(t, self.offset(t), cell_size)
            })
            .collect()
    }
}

/// Decides whether a path crosses the boundary `key`.
///
/// Every draw happens at the owning cell's coordinate in the axis stream,
/// which is what makes neighbours agree.
#[must_use]
pub fn edge_decision(key: EdgeKey, config: &PathConfig) -> Option<PathEdge> {
    let rng = CellRng::new(key.owner.x, key.owner.z);
    let stream = key.axis.stream();

    if !rng.chance(Salt::cell(stream, 0), config.probability) {
        return None;
    }

    Some(PathEdge {
        amplitude: rng.range(Salt::cell(stream, 1), 0.0, config.max_amplitude),
        phase: rng.range(Salt::cell(stream, 2), 0.0, TAU),
    })
}

/// The four path edges of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellPaths {
    /// −z edge.
    pub north: Option<PathEdge>,
    /// +z edge.
    pub south: Option<PathEdge>,
    /// +x edge.
    pub east: Option<PathEdge>,
    /// −x edge.
    pub west: Option<PathEdge>,
}

impl CellPaths {
    /// Resolves all four edges of `cell` through their canonical keys.
    #[must_use]
    pub fn resolve(cell: CellCoord, config: &PathConfig) -> Self {
        let decide = |edge| edge_decision(EdgeKey::of(cell, edge), config);
        Self {
            north: decide(Edge::North),
            south: decide(Edge::South),
            east: decide(Edge::East),
            west: decide(Edge::West),
        }
    }

    /// The entry for one edge.
    #[must_use]
    pub const fn get(&self, edge: Edge) -> Option<&PathEdge> {
        match edge {
            Edge::North => self.north.as_ref(),
            Edge::South => self.south.as_ref(),
            Edge::East => self.east.as_ref(),
            Edge::West => self.west.as_ref(),
        }
    }

    /// Active edges in canonical order.
    pub fn active(&self) -> impl Iterator<Item = (Edge, &PathEdge)> + '_ {
        Edge::ALL
            .into_iter()
            .filter_map(move |edge| self.get(edge).map(|path| (edge, path)))
    }

    /// True when no path touches this cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Largest amplitude among active edges (0 when none).
    #[must_use]
    pub fn max_amplitude(&self) -> f64 {
        self.active().map(|(_, path)| path.amplitude).fold(0.0, f64::max)
    }

    /// Exclusion corridors for decorative objects, one per active edge.
    ///
    /// Each corridor runs from its edge to `half_width` past the center so
    /// the junction is covered too.
    #[must_use]
    pub fn forbidden_bands(&self, cell_size: f64, config: &PathConfig) -> Vec<ForbiddenBand> {
        let half = cell_size * 0.5;
        let width = config.half_width + self.max_amplitude() + config.margin;

        self.active()
            .map(|(edge, _)| match edge {
                Edge::North => ForbiddenBand::new(-width, width, -half, width),
                Edge::South => ForbiddenBand::new(-width, width, -width, half),
                Edge::West => ForbiddenBand::new(-half, width, -width, width),
                Edge::East => ForbiddenBand::new(-width, half, -width, width),
            })
            .collect()
    }
}

/// Axis-aligned rectangle in cell-local space that objects must stay out of.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForbiddenBand {
    /// Left bound.
    pub min_x: f64,
    /// Right bound.
    pub max_x: f64,
    /// Near bound.
    pub min_z: f64,
    /// Far bound.
    pub max_z: f64,
}

impl ForbiddenBand {
    /// Creates a band from its bounds.
    #[must_use]
    pub const fn new(min_x: f64, max_x: f64, min_z: f64, max_z: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// True when the circle reaches into the band. Touching is allowed.
    #[must_use]
    pub fn intersects(&self, circle: &Circle) -> bool {
        let nearest_x = circle.x.clamp(self.min_x, self.max_x);
        let nearest_z = circle.z.clamp(self.min_z, self.max_z);
        let dx = circle.x - nearest_x;
        let dz = circle.z - nearest_z;
        dx * dx + dz * dz < circle.radius * circle.radius
    }

    /// True when the point lies inside the band.
    #[must_use]
    pub fn contains(&self, x: f64, z: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_z..=self.max_z).contains(&z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always() -> PathConfig {
        PathConfig {
            probability: 1.0,
            ..PathConfig::default()
        }
    }

    #[test]
    fn test_edge_keys_are_shared() {
        let cell = CellCoord::new(4, -7);
        for edge in Edge::ALL {
            let neighbor = cell.neighbor(edge);
            assert_eq!(
                EdgeKey::of(cell, edge),
                EdgeKey::of(neighbor, edge.opposite()),
                "{edge:?} of {cell:?}"
            );
        }
    }

    #[test]
    fn test_distinct_edges_have_distinct_keys() {
        let cell = CellCoord::new(0, 0);
        let keys: Vec<_> = Edge::ALL.iter().map(|&e| EdgeKey::of(cell, e)).collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_offset_vanishes_at_endpoints() {
        let path = PathEdge { amplitude: 37.0, phase: 1.1 };
        assert!(path.offset(0.0).abs() < 1e-9);
        assert!(path.offset(1.0).abs() < 1e-9);
        assert!(path.offset(0.5).abs() <= 37.0);
    }

    #[test]
    fn test_centerline_endpoints() {
        let path = PathEdge { amplitude: 30.0, phase: 1.3 };
        for edge in Edge::ALL {
            let line = path.centerline(edge, 400.0, 16);
            assert_eq!(line.len(), 17);
            let (sx, sz) = line[0];
            let (ex, ez) = line[16];
            // Starts on the boundary midpoint.
            assert!((sx.abs().max(sz.abs()) - 200.0).abs() < 1e-9);
            assert!(sx.abs().min(sz.abs()) < 1e-9);
            // Ends at the cell center.
            assert!(ex.abs() < 1e-9 && ez.abs() < 1e-9);
        }
    }

    #[test]
    fn test_probability_zero_disables_paths() {
        let config = PathConfig {
            probability: 0.0,
            ..PathConfig::default()
        };
        for x in -10..10 {
            for z in -10..10 {
                assert!(CellPaths::resolve(CellCoord::new(x, z), &config).is_empty());
            }
        }
    }

    #[test]
    fn test_probability_one_enables_all_edges() {
        let paths = CellPaths::resolve(CellCoord::new(2, 3), &always());
        assert_eq!(paths.active().count(), 4);
        assert!(paths.max_amplitude() <= PathConfig::default().max_amplitude);
    }

    #[test]
    fn test_bands_cover_centerline() {
        let config = always();
        let paths = CellPaths::resolve(CellCoord::new(-1, 9), &config);
        let bands = paths.forbidden_bands(400.0, &config);
        assert_eq!(bands.len(), 4);
        for ((edge, path), band) in paths.active().zip(&bands) {
            for (x, z) in path.centerline(edge, 400.0, 32) {
                assert!(band.contains(x, z), "{edge:?} point ({x}, {z}) outside {band:?}");
            }
        }
    }

    #[test]
    fn test_band_intersection() {
        let band = ForbiddenBand::new(-10.0, 10.0, -200.0, 10.0);
        assert!(band.intersects(&Circle::new(0.0, 0.0, 1.0)));
        assert!(band.intersects(&Circle::new(12.0, 0.0, 3.0)));
        assert!(!band.intersects(&Circle::new(13.0, 0.0, 3.0)));
        assert!(!band.intersects(&Circle::new(0.0, 20.0, 5.0)));
    }
}
