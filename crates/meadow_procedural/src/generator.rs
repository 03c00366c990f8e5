//! # Cell Generator
//!
//! Builds one cell's content from its coordinate alone. The sequence is
//! fixed:
//!
//! 1. Path edges and their forbidden bands
//! 2. Tree passes, in configuration order
//! 3. Flower clusters
//! 4. Single flowers
//! 5. Animals
//!
//! Every pass shares one [`Occupancy`], so earlier passes have priority
//! and nothing placed is ever displaced. Positions come from positional
//! salts (one per attempt); size, variant and colour come from cosmetic
//! salts, so the look of an object never depends on how many attempts
//! its placement took.

use std::f64::consts::TAU;

use crate::cell::{
    Animal, CellContent, CellCoord, Flower, FlowerKind, FlowerVariant, Hsb, Tree, TreeKind,
    TreeVariant,
};
use crate::config::{TreePass, WorldConfig};
use crate::error::ConfigResult;
use crate::hash::{CellRng, Salt, Stream};
use crate::path::CellPaths;
use crate::placement::{Circle, Occupancy, Occupant};

/// Deterministic generator for cell content.
#[derive(Clone, Debug)]
pub struct CellGenerator {
    config: WorldConfig,
}

impl CellGenerator {
    /// Creates a generator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure of `config`.
    pub fn new(config: WorldConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this generator was built with.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Generates the content of `coord`.
    ///
    /// Pure: the result depends on nothing but `coord` and the config.
    #[must_use]
    pub fn generate(&self, coord: CellCoord) -> CellContent {
        let build = self.build(coord);
        let content = build.content;
        tracing::debug!(
            "Generated cell ({}, {}): {} trees, {} flowers, {} animals, {} path edges, {} dropped",
            coord.x,
            coord.z,
            content.trees.len(),
            content.flowers.len(),
            content.animals.len(),
            content.paths.active().count(),
            build.dropped,
        );
        content
    }

    /// Runs every pass for `coord`.
    fn build(&self, coord: CellCoord) -> CellBuild<'_> {
        let config = &self.config;
        let paths = CellPaths::resolve(coord, &config.paths);
        let bands = paths.forbidden_bands(config.cell_size, &config.paths);

        let mut build = CellBuild {
            config,
            coord,
            rng: CellRng::new(coord.x, coord.z),
            occupancy: Occupancy::new(config.cell_size, bands),
            content: CellContent {
                coord,
                trees: Vec::new(),
                flowers: Vec::new(),
                animals: Vec::new(),
                paths,
            },
            dropped: 0,
            #[cfg(test)]
            cluster_centers: Vec::new(),
        };

        for (index, pass) in config.tree_passes.iter().enumerate() {
            build.tree_pass(index as u8, pass);
        }
        build.clusters();
        build.singles();
        build.animals();
        build
    }
}

/// Wraps a hue into `[0, 360)`.
fn wrap_hue(hue: f64) -> f64 {
    // rem_euclid of a tiny negative rounds up to 360 itself
    let wrapped = hue.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// State of one cell while its passes run.
struct CellBuild<'a> {
    config: &'a WorldConfig,
    coord: CellCoord,
    rng: CellRng,
    occupancy: Occupancy,
    content: CellContent,
    dropped: u32,
    /// Every cluster center found, marker or not.
    #[cfg(test)]
    cluster_centers: Vec<Circle>,
}

impl CellBuild<'_> {
    fn half(&self) -> f64 {
        self.config.cell_size * 0.5
    }

    /// Proposes uniformly over the positions where a circle of `radius`
    /// stays inside the cell.
    fn scatter(&self, stream: Stream, object: u32, radius: f64) -> impl Fn(u32) -> Circle {
        let rng = self.rng;
        let reach = (self.half() - radius).max(0.0);
        move |attempt| {
            Circle::new(
                rng.signed(Salt::position(stream, object, attempt, 0), reach),
                rng.signed(Salt::position(stream, object, attempt, 1), reach),
                radius,
            )
        }
    }

    fn drop_object(&mut self, what: &str, object: u32) {
        self.dropped += 1;
        tracing::trace!(
            "Dropped {} #{} in cell ({}, {}) after {} attempts",
            what,
            object,
            self.coord.x,
            self.coord.z,
            self.config.attempt_budget,
        );
    }

    fn tree_pass(&mut self, index: u8, pass: &TreePass) {
        let stream = Stream::TreePass(index);
        let budget = self.config.attempt_budget;
        let rng = self.rng;

        for i in 0..pass.count {
            let size = rng.range(Salt::cosmetic(stream, i, 0), pass.size.min, pass.size.max);
            let radius = size * pass.radius_factor;
            let propose = self.scatter(stream, i, radius);

            let Some(spot) = self.occupancy.place(budget, None, propose) else {
                self.drop_object(&pass.name, i);
                continue;
            };

            let pick = Salt::cosmetic(stream, i, 1);
            let variant = pass.variants[rng.index(pick, pass.variants.len())];
            let detail = Salt::cosmetic(stream, i, 2);
            let kind = match variant {
                TreeVariant::Pine => TreeKind::Pine {
                    tiers: 3 + rng.index(detail, 3) as u8,
                },
                TreeVariant::Oak => TreeKind::Oak {
                    lobes: 3 + rng.index(detail, 4) as u8,
                },
                TreeVariant::Birch => TreeKind::Birch {
                    lean: rng.signed(detail, 0.12),
                },
                TreeVariant::Bush => TreeKind::Bush {
                    berries: rng.chance(detail, 0.35),
                },
            };

            self.content.trees.push(Tree {
                x: spot.x,
                z: spot.z,
                kind,
                size,
                color_seed: rng.unit(Salt::cosmetic(stream, i, 3)),
                radius,
            });
        }
    }

    fn clusters(&mut self) {
        let config = self.config;
        let flowers = &config.flowers;
        let clusters = &flowers.clusters;
        let budget = self.config.attempt_budget;
        let rng = self.rng;

        let count = rng.count(
            Salt::cell(Stream::ClusterCount, 0),
            clusters.count.min,
            clusters.count.max,
        );

        for cl in 0..count {
            let propose = self.scatter(Stream::ClusterCenter, cl, clusters.center_clearance);
            let Some(center) = self.occupancy.find(budget, None, propose) else {
                self.drop_object("cluster", cl);
                continue;
            };
            let id = cl as u8;
            #[cfg(test)]
            self.cluster_centers.push(center);
            if self.config.cluster_markers_block {
                self.occupancy.claim(center, Occupant::ClusterMarker(id));
            }

            let large = rng.chance(
                Salt::position(Stream::ClusterSize, cl, 0, 0),
                clusters.large_chance,
            );
            let range = if large { clusters.large } else { clusters.small };
            let members = rng.count(
                Salt::position(Stream::ClusterSize, cl, 0, 1),
                range.min,
                range.max,
            );

            // One variant and base hue per cluster.
            let pick = Salt::cosmetic(Stream::ClusterSize, cl, 0);
            let variant = flowers.variants[rng.index(pick, flowers.variants.len())];
            let base_hue = rng.range(Salt::cosmetic(Stream::ClusterSize, cl, 1), 0.0, 360.0);

            let reach = clusters.radius * clusters.spread;
            for fi in 0..members {
                let object = (cl << 8) | fi;
                let stream = Stream::ClusterFlower;
                let size = rng.range(
                    Salt::cosmetic(stream, object, 0),
                    flowers.size.min,
                    flowers.size.max,
                );
                let radius = size * flowers.radius_factor;

                let spot = self.occupancy.place(budget, Some(id), |attempt| {
                    let draw = |field| Salt::position(stream, object, attempt, field);
                    let angle = rng.unit(draw(0)) * TAU;
                    let dist = rng.unit(draw(1)) * reach;
                    Circle::new(
                        center.x + angle.cos() * dist + rng.signed(draw(2), clusters.jitter),
                        center.z + angle.sin() * dist + rng.signed(draw(3), clusters.jitter),
                        radius,
                    )
                });
                let Some(spot) = spot else {
                    self.drop_object("cluster flower", object);
                    continue;
                };

                let jitter = rng.signed(Salt::cosmetic(stream, object, 3), 12.0);
                let hue = wrap_hue(base_hue + jitter);
                let flower = self.flower(stream, object, spot, size, variant, hue, Some(id));
                self.content.flowers.push(flower);
            }
        }
    }

    fn singles(&mut self) {
        let config = self.config;
        let flowers = &config.flowers;
        let singles = &flowers.singles;
        let budget = self.config.attempt_budget;
        let rng = self.rng;
        let stream = Stream::SingleFlower;

        let count = rng.count(
            Salt::cell(Stream::SingleCount, 0),
            singles.count.min,
            singles.count.max,
        );
        for i in 0..count {
            let size = rng.range(Salt::cosmetic(stream, i, 0), flowers.size.min, flowers.size.max);
            let radius = size * flowers.radius_factor + singles.clearance;
            let propose = self.scatter(stream, i, radius);

            let Some(spot) = self.occupancy.place(budget, None, propose) else {
                self.drop_object("flower", i);
                continue;
            };

            let pick = Salt::cosmetic(stream, i, 1);
            let variant = flowers.variants[rng.index(pick, flowers.variants.len())];
            let hue = rng.range(Salt::cosmetic(stream, i, 3), 0.0, 360.0);
            let flower = self.flower(stream, i, spot, size, variant, hue, None);
            self.content.flowers.push(flower);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn flower(
        &self,
        stream: Stream,
        object: u32,
        spot: Circle,
        size: f64,
        variant: FlowerVariant,
        hue: f64,
        cluster: Option<u8>,
    ) -> Flower {
        let flowers = &self.config.flowers;
        let rng = self.rng;
        let draw = |field| Salt::cosmetic(stream, object, field);
        let detail = draw(2);

        let kind = match variant {
            FlowerVariant::Daisy => FlowerKind::Daisy {
                petals: 5 + rng.index(detail, 4) as u8,
            },
            FlowerVariant::Tulip => FlowerKind::Tulip,
            FlowerVariant::Bluebell => FlowerKind::Bluebell {
                bells: 3 + rng.index(detail, 3) as u8,
            },
        };

        Flower {
            x: spot.x,
            z: spot.z,
            kind,
            size,
            color: Hsb {
                hue,
                saturation: rng.range(draw(4), flowers.saturation.min, flowers.saturation.max),
                brightness: rng.range(draw(5), flowers.brightness.min, flowers.brightness.max),
            },
            tilt_x: rng.signed(draw(6), flowers.max_tilt),
            tilt_z: rng.signed(draw(7), flowers.max_tilt),
            radius: spot.radius,
            cluster,
        }
    }

    fn animals(&mut self) {
        let config = self.config;
        let animals = &config.animals;
        let budget = self.config.attempt_budget;
        let rng = self.rng;
        let stream = Stream::Animal;

        let count = rng.count(
            Salt::cell(Stream::AnimalCount, 0),
            animals.count.min,
            animals.count.max,
        );
        for i in 0..count {
            let pick = Salt::cosmetic(stream, i, 0);
            let entry = &animals.species[rng.index(pick, animals.species.len())];
            let size = rng.range(Salt::cosmetic(stream, i, 1), entry.size.min, entry.size.max);
            let radius = size * animals.radius_factor;
            let propose = self.scatter(stream, i, radius);

            let Some(spot) = self.occupancy.place(budget, None, propose) else {
                self.drop_object("animal", i);
                continue;
            };

            self.content.animals.push(Animal {
                x: spot.x,
                z: spot.z,
                species: entry.species,
                size,
                color_seed: rng.unit(Salt::cosmetic(stream, i, 2)),
                phase: rng.unit(Salt::cosmetic(stream, i, 3)) * TAU,
                radius,
            });
        }
    }
}
