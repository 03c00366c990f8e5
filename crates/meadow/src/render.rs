//! # Renderer Seam
//!
//! The frame loop hands every drawable thing to a [`Renderer`]. A real
//! frontend turns tagged objects into primitive meshes; [`DrawTally`]
//! just counts them, which is all headless runs and tests need.

use meadow_procedural::{CellCoord, ObjectRef};

/// Receives draw calls for one frame.
pub trait Renderer {
    /// Draws the ground tile of a cached cell, centred on `center`.
    fn draw_ground(&mut self, coord: CellCoord, center: (f64, f64));

    /// Draws one object at a world position.
    fn draw(&mut self, position: (f64, f64), object: ObjectRef<'_>);
}

/// Renderer that counts draw calls per category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawTally {
    /// Ground tiles.
    pub ground: u64,
    /// Trees and bushes.
    pub trees: u64,
    /// Flowers.
    pub flowers: u64,
    /// Animals.
    pub animals: u64,
    /// Path spokes.
    pub paths: u64,
}

impl DrawTally {
    /// Creates an empty tally.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ground: 0,
            trees: 0,
            flowers: 0,
            animals: 0,
            paths: 0,
        }
    }

    /// Objects drawn, ground excluded.
    #[must_use]
    pub const fn objects(&self) -> u64 {
        self.trees + self.flowers + self.animals + self.paths
    }

    /// Clears every counter.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Renderer for DrawTally {
    fn draw_ground(&mut self, _coord: CellCoord, _center: (f64, f64)) {
        self.ground += 1;
    }

    fn draw(&mut self, _position: (f64, f64), object: ObjectRef<'_>) {
        match object {
            ObjectRef::Tree(_) => self.trees += 1,
            ObjectRef::Flower(_) => self.flowers += 1,
            ObjectRef::Animal(_) => self.animals += 1,
            ObjectRef::Path { .. } => self.paths += 1,
        }
    }
}
