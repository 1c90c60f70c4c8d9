use super::config::{Metric, ScoringConfig};
use super::grid::SoluGrid;
use super::progress::{Progress, ProgressReporter};
use crate::core::models::structure::Structure;
use crate::core::tables::density::ScoreTable;
use crate::core::tables::elements::WATER_CODE;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;
use std::collections::HashSet;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Spatial index over a structure's atom coordinates.
///
/// Queries run on a euclidean tree; for the other metrics the probe radius is
/// widened to a covering euclidean ball and hits are re-filtered exactly.
pub struct NeighborIndex {
    tree: KdTree<f64, 3>,
}

impl NeighborIndex {
    pub fn build(structure: &Structure) -> Self {
        let mut tree = KdTree::new();
        for (index, atom) in structure.atoms.iter().enumerate() {
            tree.add(
                &[atom.position.x, atom.position.y, atom.position.z],
                index as u64,
            );
        }
        Self { tree }
    }

    /// Atom indices within `radius` of `query` under `metric`, with their
    /// distances, sorted ascending.
    pub fn neighbors_within(
        &self,
        structure: &Structure,
        query: &Point3<f64>,
        radius: f64,
        metric: Metric,
    ) -> Vec<(usize, f64)> {
        // A manhattan ball fits inside the euclidean ball of the same radius;
        // a chebyshev ball needs the sqrt(3) blow-up.
        let probe = match metric {
            Metric::Manhattan | Metric::Euclidean => radius,
            Metric::Chebyshev => radius * 3.0_f64.sqrt(),
        };
        let mut neighbors: Vec<(usize, f64)> = self
            .tree
            .within::<SquaredEuclidean>(&[query.x, query.y, query.z], probe * probe)
            .into_iter()
            .filter_map(|found| {
                let atom = &structure.atoms[found.item as usize];
                let distance = metric.real_distance(query, &atom.position);
                (distance <= radius).then_some((found.item as usize, distance))
            })
            .collect();
        neighbors.sort_by(|a, b| a.1.total_cmp(&b.1));
        neighbors
    }
}

fn score_position(
    position: &Point3<f64>,
    structure: &Structure,
    index: &NeighborIndex,
    table: &ScoreTable,
    config: &ScoringConfig,
) -> f64 {
    let neighbors = index.neighbors_within(
        structure,
        position,
        config.max_neighbor_distance,
        config.metric,
    );
    let mut seen_residues = HashSet::new();
    let mut collected: Vec<f64> = Vec::new();
    let mut skipped = 0usize;

    for (rank, &(atom_index, distance)) in neighbors.iter().enumerate() {
        let atom = &structure.atoms[atom_index];
        if config.per_residue && !seen_residues.insert(atom.residue_key()) {
            skipped += 1;
            continue;
        }
        let label = format!("OOW_{}_{}", atom.class.as_str(), rank + 1);
        let score = table.nearest_score(&label, distance);
        if score == 0.0 {
            // Missing empirical data is an expected, non-fatal condition.
            skipped += 1;
        } else {
            collected.push(score);
        }
        let considered = rank + 1 - skipped;
        if config.only_first_neighbor && considered == 1 {
            break;
        }
        if considered == config.max_neighbor_number {
            break;
        }
    }

    if collected.is_empty() {
        0.0
    } else if config.mean_score {
        collected.iter().sum::<f64>() / collected.len() as f64
    } else {
        collected.iter().sum()
    }
}

/// Scores every water candidate cell of the grid in place.
///
/// Candidate voxels are independent and scored across the worker pool; the
/// whole set is then normalized by the maximum observed score. A zero maximum
/// leaves the raw scores untouched. Returns the number of candidates with a
/// positive final score.
#[instrument(skip_all, name = "scoring_task")]
pub fn score_positions(
    grid: &mut SoluGrid,
    structure: &Structure,
    table: &ScoreTable,
    config: &ScoringConfig,
    reporter: &ProgressReporter,
) -> usize {
    let candidates = grid.cells_with_code(WATER_CODE);
    let index = NeighborIndex::build(structure);
    let frame = *grid.frame();
    reporter.report(Progress::TaskStart {
        total_steps: candidates.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = candidates.iter();
    #[cfg(feature = "parallel")]
    let iterator = candidates.par_iter();

    let scores: Vec<f64> = iterator
        .map(|&cell| {
            let score = score_position(&frame.to_real(cell), structure, &index, table, config);
            reporter.advance(1);
            score
        })
        .collect();
    reporter.report(Progress::TaskFinish);

    let max_score = scores.iter().copied().fold(0.0_f64, f64::max);
    let mut scored = 0;
    for (&cell, &score) in candidates.iter().zip(&scores) {
        let value = if max_score > 0.0 {
            score / max_score
        } else {
            score
        };
        if value > 0.0 {
            scored += 1;
        }
        grid.set_score(cell, value as f32);
    }
    debug!(
        candidates = candidates.len(),
        scored, max_score, "candidate scoring finished"
    );
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::engine::config::SphereGeometry;
    use crate::engine::frame::GridFrame;
    use crate::engine::rasterizer::rasterize_tracked;
    use crate::engine::sphere::SphereCache;
    use crate::engine::surface::extract_shell;
    use crate::core::models::classify::AtomClass;

    fn oxygen_at(serial: u32, x: f64) -> Atom {
        Atom::new(serial, "O", Point3::new(x, 0.0, 0.0))
    }

    fn oxygen_table(max_rank: usize) -> ScoreTable {
        // Lone oxygen atoms classify as carbonyl through the element backup.
        let curves = (1..=max_rank)
            .map(|rank| {
                (
                    format!("OOW_{}_{rank}", AtomClass::Carbonyl.as_str()),
                    vec![(1.0, 0.8), (3.0, 0.4), (5.0, 0.1)],
                )
            })
            .collect();
        ScoreTable::from_curves(curves)
    }

    #[test]
    fn neighbors_are_sorted_by_ascending_distance() {
        let structure = Structure::new("s", vec![oxygen_at(1, 4.0), oxygen_at(2, 1.0)]);
        let index = NeighborIndex::build(&structure);
        let neighbors =
            index.neighbors_within(&structure, &Point3::origin(), 5.0, Metric::Euclidean);
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].0, 1);
        assert!(neighbors[0].1 < neighbors[1].1);
    }

    #[test]
    fn chebyshev_queries_find_diagonal_neighbors() {
        let structure = Structure::new(
            "s",
            vec![Atom::new(1, "O", Point3::new(2.0, 2.0, 2.0))],
        );
        let index = NeighborIndex::build(&structure);
        // Euclidean distance is ~3.46, beyond the radius; chebyshev is 2.
        assert!(
            index
                .neighbors_within(&structure, &Point3::origin(), 2.5, Metric::Euclidean)
                .is_empty()
        );
        assert_eq!(
            index
                .neighbors_within(&structure, &Point3::origin(), 2.5, Metric::Chebyshev)
                .len(),
            1
        );
    }

    #[test]
    fn scores_are_normalized_by_the_maximum() {
        let structure = Structure::new("s", vec![oxygen_at(1, 0.0)]);
        let frame =
            GridFrame::for_solvation(Point3::origin(), Point3::origin(), 1.0, 3.0).unwrap();
        let mut cache = SphereCache::new();
        let mut grid = rasterize_tracked(&structure, frame, SphereGeometry::Sphere, &mut cache);
        extract_shell(
            &mut grid,
            &structure,
            &crate::engine::config::SolvationShell {
                min_radius: 1.0,
                max_radius: 3.0,
            },
            SphereGeometry::Sphere,
            &mut cache,
        );

        let table = oxygen_table(10);
        let config = ScoringConfig {
            metric: Metric::Euclidean,
            max_neighbor_distance: 8.0,
            max_neighbor_number: 10,
            only_first_neighbor: false,
            per_residue: false,
            mean_score: true,
        };
        let scored = score_positions(
            &mut grid,
            &structure,
            &table,
            &config,
            &ProgressReporter::new(),
        );
        assert!(scored > 0);

        let max = grid
            .cells_with_code(WATER_CODE)
            .into_iter()
            .map(|cell| grid.score_at(cell))
            .fold(0.0_f32, f32::max);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_table_leaves_scores_at_zero() {
        let structure = Structure::new("s", vec![oxygen_at(1, 0.0)]);
        let frame =
            GridFrame::for_solvation(Point3::origin(), Point3::origin(), 1.0, 3.0).unwrap();
        let mut cache = SphereCache::new();
        let mut grid = rasterize_tracked(&structure, frame, SphereGeometry::Sphere, &mut cache);
        extract_shell(
            &mut grid,
            &structure,
            &crate::engine::config::SolvationShell {
                min_radius: 1.0,
                max_radius: 3.0,
            },
            SphereGeometry::Sphere,
            &mut cache,
        );

        let table = ScoreTable::from_curves(Default::default());
        let config = ScoringConfig {
            metric: Metric::Euclidean,
            max_neighbor_distance: 8.0,
            max_neighbor_number: 10,
            only_first_neighbor: false,
            per_residue: false,
            mean_score: true,
        };
        let scored = score_positions(
            &mut grid,
            &structure,
            &table,
            &config,
            &ProgressReporter::new(),
        );
        assert_eq!(scored, 0);
    }

    #[test]
    fn per_residue_mode_considers_one_atom_per_residue() {
        let mut near = oxygen_at(1, 1.0);
        near.res_seq = 5;
        near.chain_id = "A".to_string();
        let mut far = oxygen_at(2, 2.0);
        far.res_seq = 5;
        far.chain_id = "A".to_string();
        let structure = Structure::new("s", vec![near, far]);
        let index = NeighborIndex::build(&structure);
        let table = oxygen_table(2);

        let base = ScoringConfig {
            metric: Metric::Euclidean,
            max_neighbor_distance: 5.0,
            max_neighbor_number: 10,
            only_first_neighbor: false,
            per_residue: false,
            mean_score: false,
        };
        let both = score_position(&Point3::origin(), &structure, &index, &table, &base);
        let per_residue = score_position(
            &Point3::origin(),
            &structure,
            &index,
            &table,
            &ScoringConfig {
                per_residue: true,
                ..base
            },
        );
        // Summed scores shrink once the second atom of the residue is skipped.
        assert!(per_residue < both);
        assert!(per_residue > 0.0);
    }

    #[test]
    fn only_first_neighbor_stops_after_one_valid_score() {
        let structure = Structure::new("s", vec![oxygen_at(1, 1.0), oxygen_at(2, 2.0)]);
        let index = NeighborIndex::build(&structure);
        let table = oxygen_table(2);

        let config = ScoringConfig {
            metric: Metric::Euclidean,
            max_neighbor_distance: 5.0,
            max_neighbor_number: 10,
            only_first_neighbor: true,
            per_residue: false,
            mean_score: false,
        };
        let score = score_position(&Point3::origin(), &structure, &index, &table, &config);
        let expected = table.nearest_score(&format!("OOW_{}_1", AtomClass::Carbonyl.as_str()), 1.0);
        assert_eq!(score, expected);
    }
}
