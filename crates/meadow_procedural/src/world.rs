//! # World Cache
//!
//! Sparse, append-only map from cell coordinates to generated content.
//! Cells are generated the first time they are needed and then kept for
//! the rest of the session. There is no eviction: memory grows with the
//! number of distinct cells visited.

use std::collections::HashMap;

use crate::cell::{CellContent, CellCoord, ObjectRef};
use crate::config::WorldConfig;
use crate::error::ConfigResult;
use crate::generator::CellGenerator;

/// Log a milestone every this many generated cells.
const MILESTONE_CELLS: u64 = 1024;

/// Counters for cache growth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Cells generated so far.
    pub cells_generated: u64,
    /// Decorative objects across all generated cells.
    pub objects_generated: u64,
}

/// A drawable object in world space, borrowed from the cache.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visible<'a> {
    /// World X.
    pub x: f64,
    /// World Z.
    pub z: f64,
    /// Squared distance to the query point.
    pub distance_sq: f64,
    /// The object.
    pub object: ObjectRef<'a>,
}

/// Owned cache of generated cells.
#[derive(Debug)]
pub struct WorldCache {
    generator: CellGenerator,
    cells: HashMap<CellCoord, CellContent>,
    stats: WorldStats,
}

impl WorldCache {
    /// Creates an empty cache for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(config: WorldConfig) -> ConfigResult<Self> {
        Ok(Self::with_generator(CellGenerator::new(config)?))
    }

    /// Creates an empty cache around an existing generator.
    #[must_use]
    pub fn with_generator(generator: CellGenerator) -> Self {
        Self {
            generator,
            cells: HashMap::new(),
            stats: WorldStats::default(),
        }
    }

    /// The generation configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        self.generator.config()
    }

    /// Returns the content of `coord`, generating it on first use.
    pub fn ensure(&mut self, coord: CellCoord) -> &CellContent {
        let Self {
            generator,
            cells,
            stats,
        } = self;

        cells.entry(coord).or_insert_with(|| {
            let content = generator.generate(coord);
            stats.cells_generated += 1;
            stats.objects_generated += content.object_count() as u64;
            if stats.cells_generated % MILESTONE_CELLS == 0 {
                tracing::info!(
                    "World cache holds {} cells ({} objects)",
                    stats.cells_generated,
                    stats.objects_generated
                );
            }
            content
        })
    }

    /// The content of `coord`, if it has been generated.
    #[must_use]
    pub fn get(&self, coord: CellCoord) -> Option<&CellContent> {
        self.cells.get(&coord)
    }

    /// True when `coord` is cached.
    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Ensures every cell within Chebyshev `radius` of `center`.
    ///
    /// Returns how many cells were newly generated.
    pub fn ensure_around(&mut self, center: CellCoord, radius: i32) -> usize {
        let before = self.cells.len();
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let coord = CellCoord::new(center.x.wrapping_add(dx), center.z.wrapping_add(dz));
                self.ensure(coord);
            }
        }
        self.cells.len() - before
    }

    /// Number of cached cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when no cell has been generated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Growth counters.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    /// Every cached cell, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = &CellContent> + '_ {
        self.cells.values()
    }

    /// Every object of every cached cell strictly closer than `draw_distance`
    /// to `(x, z)`.
    ///
    /// Walks the whole cache, not just the resident radius, so cells that
    /// scrolled out of range still draw whatever is close enough.
    pub fn visible(&self, x: f64, z: f64, draw_distance: f64) -> impl Iterator<Item = Visible<'_>> + '_ {
        let cell_size = self.config().cell_size;
        let limit_sq = draw_distance * draw_distance;

        self.cells
            .values()
            .flat_map(move |cell| cell.objects(cell_size))
            .filter_map(move |placed| {
                let dx = placed.x - x;
                let dz = placed.z - z;
                let distance_sq = dx * dx + dz * dz;
                (distance_sq < limit_sq).then_some(Visible {
                    x: placed.x,
                    z: placed.z,
                    distance_sq,
                    object: placed.object,
                })
            })
    }
}
