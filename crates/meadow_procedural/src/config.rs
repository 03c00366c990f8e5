//! # Generation Configuration
//!
//! All density, palette and mix tuning lives here, in one serde-derived
//! tree that loads from TOML. The demo variants are presets of the same
//! configuration rather than copies of the generator.
//!
//! Validation is eager: a [`WorldConfig`] that made it through
//! [`WorldConfig::validate`] can drive generation without any further
//! checks, and every salt it implies is addressable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cell::{FlowerVariant, Species, TreeVariant};
use crate::error::{ConfigError, ConfigResult};
use crate::hash::{MAX_ATTEMPT_INDEX, MAX_OBJECT_INDEX, MAX_TREE_PASSES};

/// Most clusters a cell may request (cluster index shares the object bits).
pub const MAX_CLUSTERS: u32 = 16;
/// Most flowers a single cluster may request.
pub const MAX_CLUSTER_MEMBERS: u32 = 256;

/// Inclusive float range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(self, field: &str) -> ConfigResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field: field.to_owned(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    fn validate_positive(self, field: &str) -> ConfigResult<()> {
        self.validate(field)?;
        positive(&format!("{field}.min"), self.min)
    }
}

/// Inclusive integer range for object counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    /// Fewest objects.
    pub min: u32,
    /// Most objects.
    pub max: u32,
}

impl CountRange {
    /// Creates a count range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Exactly `n`.
    #[must_use]
    pub const fn exactly(n: u32) -> Self {
        Self { min: n, max: n }
    }

    fn validate(self, field: &str, limit: u32) -> ConfigResult<()> {
        if self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field: field.to_owned(),
                min: f64::from(self.min),
                max: f64::from(self.max),
            });
        }
        at_most(&format!("{field}.max"), self.max, limit)
    }
}

/// Path network tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Chance that a given boundary carries a path.
    pub probability: f64,
    /// Visual half-width of the dirt strip.
    pub half_width: f64,
    /// Largest amplitude an edge may draw.
    pub max_amplitude: f64,
    /// Extra clearance added to every forbidden band.
    pub margin: f64,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            probability: 0.04,
            half_width: 14.0,
            max_amplitude: 40.0,
            margin: 6.0,
        }
    }
}

impl PathConfig {
    /// No paths anywhere.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            probability: 0.0,
            ..Self::default()
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        probability("paths.probability", self.probability)?;
        non_negative("paths.half_width", self.half_width)?;
        non_negative("paths.max_amplitude", self.max_amplitude)?;
        non_negative("paths.margin", self.margin)
    }
}

/// One batch of tree placements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreePass {
    /// Name used in logs.
    pub name: String,
    /// How many trees to attempt.
    pub count: u32,
    /// Placement radius per unit of size.
    pub radius_factor: f64,
    /// Variants to pick from.
    pub variants: Vec<TreeVariant>,
    /// Size scalar range.
    pub size: Span,
}

impl TreePass {
    /// Creates a pass.
    #[must_use]
    pub fn new(name: &str, count: u32, size: Span, radius_factor: f64, variants: &[TreeVariant]) -> Self {
        Self {
            name: name.to_owned(),
            count,
            size,
            radius_factor,
            variants: variants.to_vec(),
        }
    }

    fn validate(&self, index: usize) -> ConfigResult<()> {
        let field = format!("tree_passes[{index}]");
        at_most(&format!("{field}.count"), self.count, MAX_OBJECT_INDEX + 1)?;
        self.size.validate_positive(&format!("{field}.size"))?;
        positive(&format!("{field}.radius_factor"), self.radius_factor)?;
        if self.count > 0 && self.variants.is_empty() {
            return Err(ConfigError::EmptyVariants(field));
        }
        Ok(())
    }
}

/// Clustered flower pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Radius of the disc members scatter in.
    pub radius: f64,
    /// Fraction of `radius` used for the polar offset.
    pub spread: f64,
    /// Extra square jitter per member, ± this many units.
    pub jitter: f64,
    /// Free radius a cluster center needs; also the marker radius.
    pub center_clearance: f64,
    /// Chance a cluster is large.
    pub large_chance: f64,
    /// Clusters per cell.
    pub count: CountRange,
    /// Member count of a large cluster.
    pub large: CountRange,
    /// Member count of a small cluster.
    pub small: CountRange,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            count: CountRange::new(0, 2),
            radius: 35.0,
            spread: 0.85,
            jitter: 4.0,
            center_clearance: 20.0,
            large_chance: 0.7,
            large: CountRange::new(5, 15),
            small: CountRange::new(1, 4),
        }
    }
}

/// Singleton flower pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinglesConfig {
    /// Breathing room added to each single's placement radius.
    pub clearance: f64,
    /// Singles per cell.
    pub count: CountRange,
}

impl Default for SinglesConfig {
    fn default() -> Self {
        Self {
            count: CountRange::new(3, 6),
            clearance: 5.0,
        }
    }
}

/// Flower tuning shared by clusters and singles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    /// Placement radius per unit of size.
    pub radius_factor: f64,
    /// Variants to pick from.
    pub variants: Vec<FlowerVariant>,
    /// Largest stem tilt, radians.
    pub max_tilt: f64,
    /// Size scalar range.
    pub size: Span,
    /// Saturation range (0-100).
    pub saturation: Span,
    /// Brightness range (0-100).
    pub brightness: Span,
    /// Cluster pass.
    pub clusters: ClusterConfig,
    /// Singles pass.
    pub singles: SinglesConfig,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            clusters: ClusterConfig::default(),
            singles: SinglesConfig::default(),
            size: Span::new(0.7, 1.4),
            radius_factor: 3.0,
            variants: vec![FlowerVariant::Daisy, FlowerVariant::Tulip, FlowerVariant::Bluebell],
            saturation: Span::new(60.0, 98.0),
            brightness: Span::new(70.0, 98.0),
            max_tilt: 0.25,
        }
    }
}

impl FlowerConfig {
    fn validate(&self) -> ConfigResult<()> {
        let clusters = &self.clusters;
        clusters.count.validate("flowers.clusters.count", MAX_CLUSTERS)?;
        positive("flowers.clusters.radius", clusters.radius)?;
        non_negative("flowers.clusters.spread", clusters.spread)?;
        non_negative("flowers.clusters.jitter", clusters.jitter)?;
        positive("flowers.clusters.center_clearance", clusters.center_clearance)?;
        probability("flowers.clusters.large_chance", clusters.large_chance)?;
        clusters.large.validate("flowers.clusters.large", MAX_CLUSTER_MEMBERS)?;
        clusters.small.validate("flowers.clusters.small", MAX_CLUSTER_MEMBERS)?;

        self.singles.count.validate("flowers.singles.count", MAX_OBJECT_INDEX + 1)?;
        non_negative("flowers.singles.clearance", self.singles.clearance)?;

        self.size.validate_positive("flowers.size")?;
        positive("flowers.radius_factor", self.radius_factor)?;
        self.saturation.validate("flowers.saturation")?;
        self.brightness.validate("flowers.brightness")?;
        non_negative("flowers.max_tilt", self.max_tilt)?;

        let any_flowers = clusters.count.max > 0 || self.singles.count.max > 0;
        if any_flowers && self.variants.is_empty() {
            return Err(ConfigError::EmptyVariants("flowers".to_owned()));
        }
        Ok(())
    }
}

/// Size range of one species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    /// Which species.
    pub species: Species,
    /// Size scalar range.
    pub size: Span,
}

/// Animal pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimalConfig {
    /// Placement radius per unit of size.
    pub radius_factor: f64,
    /// Animals per cell.
    pub count: CountRange,
    /// Species mix, picked uniformly.
    pub species: Vec<SpeciesEntry>,
}

impl Default for AnimalConfig {
    fn default() -> Self {
        Self {
            count: CountRange::new(0, 2),
            radius_factor: 10.0,
            species: vec![
                SpeciesEntry { species: Species::Rabbit, size: Span::new(0.6, 0.9) },
                SpeciesEntry { species: Species::Deer, size: Span::new(1.4, 1.9) },
                SpeciesEntry { species: Species::Fox, size: Span::new(0.9, 1.2) },
                SpeciesEntry { species: Species::Bird, size: Span::new(0.4, 0.6) },
            ],
        }
    }
}

impl AnimalConfig {
    /// No animals.
    #[must_use]
    pub fn none() -> Self {
        Self {
            count: CountRange::exactly(0),
            ..Self::default()
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        self.count.validate("animals.count", MAX_OBJECT_INDEX + 1)?;
        positive("animals.radius_factor", self.radius_factor)?;
        for (i, entry) in self.species.iter().enumerate() {
            entry.size.validate_positive(&format!("animals.species[{i}].size"))?;
        }
        if self.count.max > 0 && self.species.is_empty() {
            return Err(ConfigError::EmptyVariants("animals".to_owned()));
        }
        Ok(())
    }
}

/// Complete world generation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Cell edge length, world units.
    pub cell_size: f64,
    /// Chebyshev radius (in cells) kept resident around the player.
    pub render_radius: i32,
    /// Draw distance as a multiple of `cell_size * render_radius`.
    pub draw_distance_factor: f64,
    /// Attempts per object before it is dropped.
    pub attempt_budget: u32,
    /// Whether cluster center markers keep blocking later passes.
    pub cluster_markers_block: bool,
    /// Path network.
    pub paths: PathConfig,
    /// Tree passes, in priority order.
    pub tree_passes: Vec<TreePass>,
    /// Flowers.
    pub flowers: FlowerConfig,
    /// Animals.
    pub animals: AnimalConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::woodland()
    }
}

impl WorldConfig {
    /// Names accepted by [`WorldConfig::preset`].
    pub const PRESETS: [&'static str; 3] = ["woodland", "flower_field", "sparse_meadow"];

    /// Trees, paths, flowers and animals.
    #[must_use]
    pub fn woodland() -> Self {
        use TreeVariant::{Birch, Bush, Oak, Pine};

        Self {
            cell_size: 400.0,
            render_radius: 3,
            draw_distance_factor: 1.1,
            attempt_budget: 20,
            cluster_markers_block: false,
            paths: PathConfig::default(),
            tree_passes: vec![
                TreePass::new("giant", 1, Span::new(1.6, 2.2), 28.0, &[Oak, Pine]),
                TreePass::new("medium", 5, Span::new(1.0, 1.4), 22.0, &[Pine, Oak, Birch]),
                TreePass::new("small", 6, Span::new(0.6, 0.9), 18.0, &[Pine, Birch]),
                TreePass::new("bushes", 4, Span::new(0.5, 0.9), 14.0, &[Bush]),
            ],
            flowers: FlowerConfig::default(),
            animals: AnimalConfig::default(),
        }
    }

    /// Flowers only: 2-4 dense clusters and a few singles per cell.
    /// Cluster centers stay reserved so singles keep out of the clumps.
    #[must_use]
    pub fn flower_field() -> Self {
        Self {
            cluster_markers_block: true,
            paths: PathConfig::disabled(),
            tree_passes: Vec::new(),
            flowers: FlowerConfig {
                clusters: ClusterConfig {
                    count: CountRange::new(2, 4),
                    center_clearance: 40.0,
                    large_chance: 1.0,
                    ..ClusterConfig::default()
                },
                variants: vec![FlowerVariant::Daisy],
                ..FlowerConfig::default()
            },
            animals: AnimalConfig::none(),
            ..Self::woodland()
        }
    }

    /// Thin cover: few trees, small clusters, wider path network.
    #[must_use]
    pub fn sparse_meadow() -> Self {
        use TreeVariant::{Birch, Bush, Oak};

        Self {
            paths: PathConfig {
                probability: 0.08,
                ..PathConfig::default()
            },
            tree_passes: vec![
                TreePass::new("lone", 2, Span::new(1.0, 1.5), 22.0, &[Oak, Birch]),
                TreePass::new("bushes", 3, Span::new(0.5, 0.8), 14.0, &[Bush]),
            ],
            flowers: FlowerConfig {
                clusters: ClusterConfig {
                    count: CountRange::new(0, 1),
                    large_chance: 0.3,
                    ..ClusterConfig::default()
                },
                singles: SinglesConfig {
                    count: CountRange::new(1, 3),
                    ..SinglesConfig::default()
                },
                ..FlowerConfig::default()
            },
            animals: AnimalConfig {
                count: CountRange::new(0, 1),
                ..AnimalConfig::default()
            },
            ..Self::woodland()
        }
    }

    /// Looks up a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] for unrecognised names.
    pub fn preset(name: &str) -> ConfigResult<Self> {
        match name {
            "woodland" => Ok(Self::woodland()),
            "flower_field" => Ok(Self::flower_field()),
            "sparse_meadow" => Ok(Self::sparse_meadow()),
            other => Err(ConfigError::UnknownPreset(other.to_owned())),
        }
    }

    /// Parses and validates a TOML document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the result is invalid.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Euclidean draw distance in world units.
    #[must_use]
    pub fn draw_distance(&self) -> f64 {
        self.cell_size * f64::from(self.render_radius) * self.draw_distance_factor
    }

    /// Rejects configurations that would misbehave at generation time.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("cell_size", self.cell_size)?;
        if self.render_radius < 0 {
            return Err(ConfigError::Negative {
                field: "render_radius".to_owned(),
                value: f64::from(self.render_radius),
            });
        }
        positive("draw_distance_factor", self.draw_distance_factor)?;
        if self.attempt_budget == 0 {
            return Err(ConfigError::NotPositive {
                field: "attempt_budget".to_owned(),
                value: 0.0,
            });
        }
        at_most("attempt_budget", self.attempt_budget, MAX_ATTEMPT_INDEX + 1)?;
        at_most("tree_passes", self.tree_passes.len() as u32, MAX_TREE_PASSES as u32)?;

        self.paths.validate()?;
        for (i, pass) in self.tree_passes.iter().enumerate() {
            pass.validate(i)?;
        }
        self.flowers.validate()?;
        self.animals.validate()
    }
}

fn positive(field: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            field: field.to_owned(),
            value,
        })
    }
}

fn non_negative(field: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative {
            field: field.to_owned(),
            value,
        })
    }
}

fn probability(field: &str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability {
            field: field.to_owned(),
            value,
        })
    }
}

fn at_most(field: &str, value: u32, limit: u32) -> ConfigResult<()> {
    if value <= limit {
        Ok(())
    } else {
        Err(ConfigError::LimitExceeded {
            field: field.to_owned(),
            value: u64::from(value),
            limit: u64::from(limit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for name in WorldConfig::PRESETS {
            let config = WorldConfig::preset(name).unwrap();
            config.validate().unwrap_or_else(|e| panic!("{name}: {e}"));
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(
            WorldConfig::preset("desert"),
            Err(ConfigError::UnknownPreset(name)) if name == "desert"
        ));
    }

    #[test]
    fn test_draw_distance() {
        let config = WorldConfig::woodland();
        assert!((config.draw_distance() - 400.0 * 3.0 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_inverted_size_range() {
        let mut config = WorldConfig::woodland();
        config.tree_passes[1].size = Span::new(2.0, 1.0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { ref field, .. } if field == "tree_passes[1].size"));
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        for bad in [0.0, -400.0, f64::NAN, f64::INFINITY] {
            let config = WorldConfig {
                cell_size: bad,
                ..WorldConfig::woodland()
            };
            assert!(matches!(config.validate(), Err(ConfigError::NotPositive { .. })));
        }
    }

    #[test]
    fn test_rejects_negative_render_radius() {
        let config = WorldConfig {
            render_radius: -1,
            ..WorldConfig::woodland()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Negative { .. })));
    }

    #[test]
    fn test_rejects_budget_outside_salt_layout() {
        let zero = WorldConfig {
            attempt_budget: 0,
            ..WorldConfig::woodland()
        };
        assert!(zero.validate().is_err());

        let huge = WorldConfig {
            attempt_budget: 257,
            ..WorldConfig::woodland()
        };
        assert!(matches!(huge.validate(), Err(ConfigError::LimitExceeded { .. })));

        let max = WorldConfig {
            attempt_budget: 256,
            ..WorldConfig::woodland()
        };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn test_rejects_too_many_clusters() {
        let mut config = WorldConfig::woodland();
        config.flowers.clusters.count = CountRange::new(0, 17);
        assert!(matches!(config.validate(), Err(ConfigError::LimitExceeded { .. })));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut config = WorldConfig::woodland();
        config.paths.probability = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidProbability { .. })));
    }

    #[test]
    fn test_rejects_empty_variants() {
        let mut config = WorldConfig::woodland();
        config.tree_passes[0].variants.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyVariants(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = WorldConfig::from_toml_str(
            r#"
            cell_size = 250.0

            [paths]
            probability = 0.5
            "#,
        )
        .unwrap();
        assert!((config.cell_size - 250.0).abs() < f64::EPSILON);
        assert!((config.paths.probability - 0.5).abs() < f64::EPSILON);
        assert!((config.paths.half_width - PathConfig::default().half_width).abs() < f64::EPSILON);
        assert_eq!(config.tree_passes, WorldConfig::woodland().tree_passes);
    }

    #[test]
    fn test_toml_tree_passes() {
        let config = WorldConfig::from_toml_str(
            r#"
            [[tree_passes]]
            name = "giant"
            count = 1
            size = { min = 1.0, max = 1.0 }
            radius_factor = 120.0
            variants = ["oak"]
            "#,
        )
        .unwrap();
        assert_eq!(config.tree_passes.len(), 1);
        assert_eq!(config.tree_passes[0].variants, vec![TreeVariant::Oak]);
    }

    #[test]
    fn test_toml_negative_count_is_a_parse_error() {
        let result = WorldConfig::from_toml_str(
            r#"
            [animals]
            count = { min = -1, max = 2 }
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = WorldConfig::load("/definitely/not/here/meadow.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
