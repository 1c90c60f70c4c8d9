use crate::core::models::structure::Structure;
use crate::engine::config::{CompareConfig, Normalization};
use crate::engine::error::EngineError;
use crate::engine::frame::GridFrame;
use crate::engine::grid::CompareGrid;
use crate::engine::memory;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::rasterizer::rasterize_presence;
use crate::engine::sphere::SphereCache;
use itertools::Itertools;
use nalgebra::Point3;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A symmetric pairwise similarity matrix over a structure batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub names: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

#[instrument(skip_all, name = "comparison_workflow")]
pub fn run(
    structures: &[Structure],
    config: &CompareConfig,
    reporter: &ProgressReporter,
) -> Result<ComparisonResult, EngineError> {
    if structures.len() < 2 {
        return Err(EngineError::InsufficientStructures {
            found: structures.len(),
        });
    }
    let frame = shared_frame(structures, config.spacing)?;
    info!(
        structures = structures.len(),
        voxels = frame.len(),
        "comparison grid frame ready"
    );

    // === Phase 1: Occupied voxel counts per structure ===
    reporter.report(Progress::PhaseStart {
        name: "Rasterizing structures",
    });
    reporter.report(Progress::TaskStart {
        total_steps: structures.len() as u64,
    });
    let counts: Vec<usize> = {
        #[cfg(not(feature = "parallel"))]
        let iterator = structures.iter();
        #[cfg(feature = "parallel")]
        let iterator = structures.par_iter();
        iterator
            .map(|structure| {
                let count = rasterize(structure, frame, config).occupied_count();
                reporter.advance(1);
                count
            })
            .collect()
    };
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let global_min = counts.iter().copied().min().unwrap_or(0);
    let global_max = counts.iter().copied().max().unwrap_or(0);
    let normalizer = |first: usize, second: usize| -> f64 {
        match config.normalization {
            Normalization::Min => counts[first].min(counts[second]) as f64,
            Normalization::Max => counts[first].max(counts[second]) as f64,
            Normalization::GlobalMin => global_min as f64,
            Normalization::GlobalMax => global_max as f64,
            Normalization::Constant(value) => value,
        }
    };

    // === Phase 2: Pairwise overlap tasks ===
    reporter.report(Progress::PhaseStart {
        name: "Comparing structure pairs",
    });
    let pairs: Vec<(usize, usize)> = (0..structures.len()).tuple_combinations().collect();
    reporter.report(Progress::TaskStart {
        total_steps: pairs.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = pairs.iter();
    #[cfg(feature = "parallel")]
    let iterator = pairs.par_iter();

    let entries: Vec<(usize, usize, f64)> = iterator
        .map(|&(first, second)| -> Result<(usize, usize, f64), EngineError> {
            memory::wait_for_budget(config.memory_budget_gib);
            let grid_a = rasterize(&structures[first], frame, config);
            let grid_b = rasterize(&structures[second], frame, config);
            let overlap = grid_a.overlap_count(&grid_b);

            let normalizer = normalizer(first, second);
            if normalizer <= 0.0 {
                return Err(EngineError::ZeroNormalizer {
                    first: structures[first].name.clone(),
                    second: structures[second].name.clone(),
                });
            }
            reporter.advance(1);
            Ok((first, second, overlap as f64 / normalizer))
        })
        .collect::<Result<_, _>>()?;
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    // Task dispatch order is arbitrary; assembly is commutative.
    let mut matrix = vec![vec![0.0; structures.len()]; structures.len()];
    for (first, second, score) in entries {
        matrix[first][second] = score;
        matrix[second][first] = score;
    }
    for index in 0..structures.len() {
        let normalizer = normalizer(index, index);
        if normalizer > 0.0 {
            matrix[index][index] = counts[index] as f64 / normalizer;
        }
    }

    info!(pairs = pairs.len(), "pairwise comparison complete");
    Ok(ComparisonResult {
        names: structures.iter().map(|s| s.name.clone()).collect(),
        matrix,
    })
}

fn rasterize(structure: &Structure, frame: GridFrame, config: &CompareConfig) -> CompareGrid {
    // Task-local cache: pairwise tasks run concurrently and share nothing.
    let mut cache = SphereCache::new();
    rasterize_presence(
        structure,
        frame,
        config.geometry,
        config.consider_elements,
        &mut cache,
    )
}

fn shared_frame(structures: &[Structure], spacing: f64) -> Result<GridFrame, EngineError> {
    let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for structure in structures {
        let (low, high) = structure
            .extents()
            .ok_or_else(|| EngineError::EmptyStructure {
                name: structure.name.clone(),
            })?;
        for axis in 0..3 {
            min[axis] = min[axis].min(low[axis]);
            max[axis] = max[axis].max(high[axis]);
        }
    }
    GridFrame::for_comparison(min, max, spacing)
}
