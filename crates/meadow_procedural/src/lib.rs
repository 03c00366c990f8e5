//! # Meadow Procedural Generation
//!
//! Deterministic generation of an endless meadow: trees, flowers, animals
//! and a sparse network of dirt paths, scattered cell by cell without
//! overlap.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: A cell's content is a pure function of its coordinate
//! 2. **Cellular**: The world is generated in fixed-size square cells
//! 3. **Seamless**: Neighbouring cells agree on shared path edges without coordination
//! 4. **Bounded**: Every placement has an attempt budget; nothing retries forever
//!
//! ## Core Components
//!
//! - `rand` / `CellRng`: Salted coordinate hash, the only source of randomness
//! - `Occupancy`: Greedy non-overlapping placement with forbidden bands
//! - `CellPaths`: Edge-canonical path network
//! - `CellGenerator`: Runs every placement pass for one cell
//! - `WorldCache`: Lazy, append-only cell map
//! - `WorldConfig`: All tuning, loadable from TOML, with named presets
//!
//! ## Example
//!
//! ```rust
//! use meadow_procedural::{CellCoord, WorldCache, WorldConfig};
//!
//! let mut world = WorldCache::new(WorldConfig::woodland())?;
//!
//! // Player at world position (100, 200)
//! let cell_size = world.config().cell_size;
//! let here = CellCoord::from_world(100.0, 200.0, cell_size);
//! world.ensure_around(here, 1);
//!
//! assert_eq!(world.len(), 9);
//! # Ok::<(), meadow_procedural::ConfigError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cell;
pub mod config;
pub mod error;
pub mod generator;
pub mod hash;
pub mod path;
pub mod placement;
pub mod world;

pub use cell::{
    Animal, CellContent, CellCoord, Flower, FlowerKind, FlowerVariant, Hsb, ObjectRef, Species,
    Tree, TreeKind, TreeVariant, WorldObject,
};
pub use config::{
    AnimalConfig, ClusterConfig, CountRange, FlowerConfig, PathConfig, SinglesConfig, Span,
    SpeciesEntry, TreePass, WorldConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use generator::CellGenerator;
pub use hash::{rand, CellRng, Salt, Stream};
pub use path::{edge_decision, Axis, CellPaths, Edge, EdgeKey, ForbiddenBand, PathEdge};
pub use placement::{try_place, Circle, Occupancy, Occupant};
pub use world::{Visible, WorldCache, WorldStats};
