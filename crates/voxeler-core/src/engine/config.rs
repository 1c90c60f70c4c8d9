use crate::core::io::filter::AtomFilter;
use nalgebra::Point3;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value '{value}' for parameter {parameter}")]
    InvalidValue {
        parameter: &'static str,
        value: String,
    },
}

/// Predicate deciding which relative offsets belong to a stamped sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SphereGeometry {
    /// `|dx| + |dy| + |dz| <= r`, an octahedron.
    Taxicab,
    /// The full cube, no predicate.
    Uniform,
    /// `dx^2 + dy^2 + dz^2 <= r^2`, a euclidean ball.
    Sphere,
}

impl FromStr for SphereGeometry {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "taxicab" => Ok(SphereGeometry::Taxicab),
            "uniform" => Ok(SphereGeometry::Uniform),
            "sphere" => Ok(SphereGeometry::Sphere),
            _ => Err(ConfigError::InvalidValue {
                parameter: "grid_geometry",
                value: s.to_string(),
            }),
        }
    }
}

/// Distance metric used by neighbor queries and placement tie resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Manhattan,
    Chebyshev,
    Euclidean,
}

impl Metric {
    /// Maps the metric to the sphere geometry of its unit ball.
    pub fn sphere_geometry(self) -> SphereGeometry {
        match self {
            Metric::Manhattan => SphereGeometry::Taxicab,
            Metric::Chebyshev => SphereGeometry::Uniform,
            Metric::Euclidean => SphereGeometry::Sphere,
        }
    }

    /// Distance between two grid cells, rounded to whole voxels.
    pub fn grid_distance(self, a: [i64; 3], b: [i64; 3]) -> i64 {
        let dx = (a[0] - b[0]).abs();
        let dy = (a[1] - b[1]).abs();
        let dz = (a[2] - b[2]).abs();
        match self {
            Metric::Manhattan => dx + dy + dz,
            Metric::Chebyshev => dx.max(dy).max(dz),
            Metric::Euclidean => (((dx * dx + dy * dy + dz * dz) as f64).sqrt()).round() as i64,
        }
    }

    /// Distance between two real-space points in Angstroms.
    pub fn real_distance(self, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        let dz = (a.z - b.z).abs();
        match self {
            Metric::Manhattan => dx + dy + dz,
            Metric::Chebyshev => dx.max(dy).max(dz),
            Metric::Euclidean => (dx * dx + dy * dy + dz * dz).sqrt(),
        }
    }
}

impl FromStr for Metric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manhattan" => Ok(Metric::Manhattan),
            // Minkowski is accepted as a legacy alias for the max norm.
            "chebyshev" | "minkowski" => Ok(Metric::Chebyshev),
            "euclidean" => Ok(Metric::Euclidean),
            _ => Err(ConfigError::InvalidValue {
                parameter: "scoring_metric",
                value: s.to_string(),
            }),
        }
    }
}

/// Normalizer applied to the raw overlap count of a structure pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// Smaller of the two occupied voxel counts.
    Min,
    /// Larger of the two occupied voxel counts.
    Max,
    /// Smallest occupied voxel count over the whole batch.
    GlobalMin,
    /// Largest occupied voxel count over the whole batch.
    GlobalMax,
    /// A fixed user-supplied constant.
    Constant(f64),
}

impl FromStr for Normalization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "min" => Ok(Normalization::Min),
            "max" => Ok(Normalization::Max),
            "global_min" => Ok(Normalization::GlobalMin),
            "global_max" => Ok(Normalization::GlobalMax),
            other => match f64::from_str(other) {
                Ok(value) if value.is_finite() && value > 0.0 => Ok(Normalization::Constant(value)),
                _ => Err(ConfigError::InvalidValue {
                    parameter: "comparison_normalization",
                    value: s.to_string(),
                }),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvationMethod {
    /// Deterministic greedy placement, one run.
    Itermax,
    /// Stochastic placement repeated over several runs with consensus output.
    Randomax,
}

impl SolvationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolvationMethod::Itermax => "itermax",
            SolvationMethod::Randomax => "randomax",
        }
    }
}

impl FromStr for SolvationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "itermax" => Ok(SolvationMethod::Itermax),
            "randomax" => Ok(SolvationMethod::Randomax),
            _ => Err(ConfigError::InvalidValue {
                parameter: "solubilization_method",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompareConfig {
    pub spacing: f64,
    pub geometry: SphereGeometry,
    pub normalization: Normalization,
    pub consider_elements: bool,
    pub memory_budget_gib: f64,
    pub filter: AtomFilter,
}

#[derive(Default)]
pub struct CompareConfigBuilder {
    spacing: Option<f64>,
    geometry: Option<SphereGeometry>,
    normalization: Option<Normalization>,
    consider_elements: Option<bool>,
    memory_budget_gib: Option<f64>,
    filter: Option<AtomFilter>,
}

impl CompareConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }
    pub fn geometry(mut self, geometry: SphereGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
    pub fn normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = Some(normalization);
        self
    }
    pub fn consider_elements(mut self, consider: bool) -> Self {
        self.consider_elements = Some(consider);
        self
    }
    pub fn memory_budget_gib(mut self, budget: f64) -> Self {
        self.memory_budget_gib = Some(budget);
        self
    }
    pub fn filter(mut self, filter: AtomFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn build(self) -> Result<CompareConfig, ConfigError> {
        let spacing = self
            .spacing
            .ok_or(ConfigError::MissingParameter("spacing"))?;
        validate_spacing(spacing)?;
        Ok(CompareConfig {
            spacing,
            geometry: self.geometry.unwrap_or(SphereGeometry::Sphere),
            normalization: self.normalization.unwrap_or(Normalization::Max),
            consider_elements: self.consider_elements.unwrap_or(true),
            memory_budget_gib: self.memory_budget_gib.unwrap_or(4.0),
            filter: self.filter.unwrap_or_default(),
        })
    }
}

/// The solvation shell around each atom, in Angstroms beyond its VdW surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolvationShell {
    pub min_radius: f64,
    pub max_radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub metric: Metric,
    pub max_neighbor_distance: f64,
    pub max_neighbor_number: usize,
    pub only_first_neighbor: bool,
    pub per_residue: bool,
    pub mean_score: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolvateConfig {
    pub spacing: f64,
    pub geometry: SphereGeometry,
    pub shell: SolvationShell,
    pub scoring: ScoringConfig,
    pub min_water_score: f64,
    pub method: SolvationMethod,
    pub runs: u32,
    pub acceptance_threshold: f64,
    pub occurrence_threshold: f64,
    pub occurrence_b_factor: bool,
    pub density_dir: PathBuf,
    pub normalize_densities: bool,
    pub filter: AtomFilter,
}

impl SolvateConfig {
    /// True when placements are subject to random acceptance draws.
    pub fn is_stochastic(&self) -> bool {
        self.method == SolvationMethod::Randomax
    }

    /// Number of placement runs: the configured count for the stochastic
    /// method, otherwise a single deterministic run.
    pub fn run_count(&self) -> u32 {
        if self.is_stochastic() { self.runs } else { 1 }
    }
}

#[derive(Default)]
pub struct SolvateConfigBuilder {
    spacing: Option<f64>,
    geometry: Option<SphereGeometry>,
    shell: Option<SolvationShell>,
    metric: Option<Metric>,
    max_neighbor_distance: Option<f64>,
    max_neighbor_number: Option<usize>,
    only_first_neighbor: Option<bool>,
    per_residue: Option<bool>,
    mean_score: Option<bool>,
    min_water_score: Option<f64>,
    method: Option<SolvationMethod>,
    runs: Option<u32>,
    acceptance_threshold: Option<f64>,
    occurrence_threshold: Option<f64>,
    occurrence_b_factor: Option<bool>,
    density_dir: Option<PathBuf>,
    normalize_densities: Option<bool>,
    filter: Option<AtomFilter>,
}

impl SolvateConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }
    pub fn geometry(mut self, geometry: SphereGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
    pub fn shell(mut self, min_radius: f64, max_radius: f64) -> Self {
        self.shell = Some(SolvationShell {
            min_radius: min_radius.min(max_radius),
            max_radius: min_radius.max(max_radius),
        });
        self
    }
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }
    pub fn max_neighbor_distance(mut self, distance: f64) -> Self {
        self.max_neighbor_distance = Some(distance);
        self
    }
    pub fn max_neighbor_number(mut self, count: usize) -> Self {
        self.max_neighbor_number = Some(count);
        self
    }
    pub fn only_first_neighbor(mut self, only_first: bool) -> Self {
        self.only_first_neighbor = Some(only_first);
        self
    }
    pub fn per_residue(mut self, per_residue: bool) -> Self {
        self.per_residue = Some(per_residue);
        self
    }
    pub fn mean_score(mut self, mean: bool) -> Self {
        self.mean_score = Some(mean);
        self
    }
    pub fn min_water_score(mut self, score: f64) -> Self {
        self.min_water_score = Some(score);
        self
    }
    pub fn method(mut self, method: SolvationMethod) -> Self {
        self.method = Some(method);
        self
    }
    pub fn runs(mut self, runs: u32) -> Self {
        self.runs = Some(runs);
        self
    }
    pub fn acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = Some(threshold);
        self
    }
    pub fn occurrence_threshold(mut self, threshold: f64) -> Self {
        self.occurrence_threshold = Some(threshold);
        self
    }
    pub fn occurrence_b_factor(mut self, occurrence: bool) -> Self {
        self.occurrence_b_factor = Some(occurrence);
        self
    }
    pub fn density_dir(mut self, dir: PathBuf) -> Self {
        self.density_dir = Some(dir);
        self
    }
    pub fn normalize_densities(mut self, normalize: bool) -> Self {
        self.normalize_densities = Some(normalize);
        self
    }
    pub fn filter(mut self, filter: AtomFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn build(self) -> Result<SolvateConfig, ConfigError> {
        let spacing = self
            .spacing
            .ok_or(ConfigError::MissingParameter("spacing"))?;
        validate_spacing(spacing)?;
        let density_dir = self
            .density_dir
            .ok_or(ConfigError::MissingParameter("density_dir"))?;

        let shell = self.shell.unwrap_or(SolvationShell {
            min_radius: 1.0,
            max_radius: 2.0,
        });
        if !(shell.min_radius.is_finite() && shell.max_radius.is_finite() && shell.min_radius > 0.0)
        {
            return Err(ConfigError::InvalidValue {
                parameter: "solubilization_radius",
                value: format!("{}, {}", shell.min_radius, shell.max_radius),
            });
        }

        let runs = self.runs.unwrap_or(1);
        if runs == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "launch_number",
                value: runs.to_string(),
            });
        }
        let acceptance_threshold = self.acceptance_threshold.unwrap_or(1.0);
        if !(0.0..=1.0).contains(&acceptance_threshold) {
            return Err(ConfigError::InvalidValue {
                parameter: "random_threshold",
                value: acceptance_threshold.to_string(),
            });
        }
        let occurrence_threshold = self.occurrence_threshold.unwrap_or(0.5);
        if !(0.0..=1.0).contains(&occurrence_threshold) {
            return Err(ConfigError::InvalidValue {
                parameter: "occurrences_threshold",
                value: occurrence_threshold.to_string(),
            });
        }

        Ok(SolvateConfig {
            spacing,
            geometry: self.geometry.unwrap_or(SphereGeometry::Sphere),
            shell,
            scoring: ScoringConfig {
                metric: self.metric.unwrap_or(Metric::Euclidean),
                max_neighbor_distance: self.max_neighbor_distance.unwrap_or(5.0),
                max_neighbor_number: self.max_neighbor_number.unwrap_or(10),
                only_first_neighbor: self.only_first_neighbor.unwrap_or(false),
                per_residue: self.per_residue.unwrap_or(false),
                mean_score: self.mean_score.unwrap_or(true),
            },
            min_water_score: self.min_water_score.unwrap_or(0.5),
            method: self.method.unwrap_or(SolvationMethod::Itermax),
            runs,
            acceptance_threshold,
            occurrence_threshold,
            occurrence_b_factor: self.occurrence_b_factor.unwrap_or(false),
            density_dir,
            normalize_densities: self.normalize_densities.unwrap_or(false),
            filter: self.filter.unwrap_or_default(),
        })
    }
}

fn validate_spacing(spacing: f64) -> Result<(), ConfigError> {
    if spacing.is_finite() && spacing > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            parameter: "spacing",
            value: spacing.to_string(),
        })
    }
}
