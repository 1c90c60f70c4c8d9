use super::config::Metric;
use super::grid::SoluGrid;
use super::sphere::SphereCache;
use crate::core::tables::elements::{WATER_CODE, WATER_VDW_RADIUS};
use nalgebra::Point3;
use rand::Rng;
use tracing::{debug, instrument};

/// Parameters of one greedy placement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    pub metric: Metric,
    pub min_score: f64,
    pub stochastic: bool,
    pub acceptance_threshold: f64,
}

/// One placed water molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWater {
    pub cell: [i64; 3],
    pub position: Point3<f64>,
    pub score: f32,
}

struct PlacerState {
    scores: Vec<f32>,
    score_index: usize,
    repeat_count: i64,
    compute_distance: bool,
}

/// Greedily places waters at candidate cells in descending score order.
///
/// The grid is split in two: the structure grid keeps atoms and receives
/// accepted placements, a candidate grid keeps only scored water cells. Each
/// placement clears the water exclusion sphere from the candidate grid whether
/// or not the acceptance draw kept it. Ties at one score are resolved by an
/// isolation test, then by uniform random choice among the clustered rest.
/// This pass is inherently sequential; every placement reshapes the candidate
/// set the next iteration sees.
#[instrument(skip_all, name = "placement_task")]
pub(crate) fn place_waters(
    grid: &mut SoluGrid,
    options: &PlacementOptions,
    cache: &mut SphereCache,
    rng: &mut impl Rng,
) -> Vec<PlacedWater> {
    let frame = *grid.frame();
    let spacing = frame.spacing();
    let water_radius = (WATER_VDW_RADIUS / spacing).round() as i64;
    let exclusion = cache
        .get(options.metric.sphere_geometry(), water_radius)
        .to_vec();

    // Split the grid: placements land in `grid`, candidates live in the copy.
    let mut candidates = grid.clone();
    for cell in grid.cells_with_code(WATER_CODE) {
        grid.clear(cell);
    }
    for cell in candidates.occupied_cells() {
        if candidates.code_at(cell) != WATER_CODE {
            candidates.clear(cell);
        }
    }
    let floor = options.min_score.max(0.0) as f32;
    for cell in candidates.cells_with_code(WATER_CODE) {
        if candidates.score_at(cell) < floor {
            candidates.clear(cell);
        }
    }

    let mut state = PlacerState {
        scores: sorted_scores(&candidates, options.min_score),
        score_index: 0,
        repeat_count: 0,
        compute_distance: true,
    };
    let max_repeat = (10.0 / spacing) as i64;
    let mut placements = Vec::new();

    while state.score_index < state.scores.len() {
        let current = state.scores[state.score_index];
        let tied: Vec<[i64; 3]> = candidates
            .cells_with_code(WATER_CODE)
            .into_iter()
            .filter(|&cell| candidates.score_at(cell) == current)
            .collect();

        match tied.len() {
            0 => {
                state.compute_distance = true;
                state.repeat_count += 1;
                if state.repeat_count > max_repeat {
                    // Placements invalidated this score band wholesale;
                    // rebuild the list from what is left.
                    state.scores = sorted_scores(&candidates, options.min_score);
                    state.score_index = 0;
                    state.repeat_count = 0;
                } else {
                    state.score_index += 1;
                }
            }
            1 => {
                place(
                    grid,
                    &mut candidates,
                    tied[0],
                    current,
                    &exclusion,
                    options,
                    rng,
                    &mut placements,
                );
                state.compute_distance = true;
                state.score_index += 1;
            }
            _ if state.compute_distance => {
                // A candidate is isolated when no other tied candidate sits
                // within twice the water radius.
                let isolated: Vec<[i64; 3]> = tied
                    .iter()
                    .copied()
                    .filter(|&a| {
                        tied.iter().all(|&b| {
                            b == a || options.metric.grid_distance(a, b) > 2 * water_radius
                        })
                    })
                    .collect();
                if isolated.is_empty() {
                    let pick = tied[rng.gen_range(0..tied.len())];
                    place(
                        grid,
                        &mut candidates,
                        pick,
                        current,
                        &exclusion,
                        options,
                        rng,
                        &mut placements,
                    );
                } else {
                    for cell in isolated {
                        place(
                            grid,
                            &mut candidates,
                            cell,
                            current,
                            &exclusion,
                            options,
                            rng,
                            &mut placements,
                        );
                    }
                }
                state.compute_distance = false;
            }
            _ => {
                let pick = tied[rng.gen_range(0..tied.len())];
                place(
                    grid,
                    &mut candidates,
                    pick,
                    current,
                    &exclusion,
                    options,
                    rng,
                    &mut placements,
                );
                state.compute_distance = false;
            }
        }
    }

    debug!(placed = placements.len(), "greedy placement finished");
    placements
}

#[allow(clippy::too_many_arguments)]
fn place(
    grid: &mut SoluGrid,
    candidates: &mut SoluGrid,
    cell: [i64; 3],
    score: f32,
    exclusion: &[[i64; 3]],
    options: &PlacementOptions,
    rng: &mut impl Rng,
    placements: &mut Vec<PlacedWater>,
) {
    let accepted = !options.stochastic || rng.r#gen::<f64>() < options.acceptance_threshold;
    if accepted {
        grid.copy_cell(candidates, cell);
        placements.push(PlacedWater {
            cell,
            position: grid.frame().to_real(cell),
            score,
        });
    }
    // The exclusion sphere is cleared even for rejected draws, so a position
    // is never reconsidered within one run.
    for offset in exclusion {
        candidates.clear([
            cell[0] + offset[0],
            cell[1] + offset[1],
            cell[2] + offset[2],
        ]);
    }
}

fn sorted_scores(candidates: &SoluGrid, min_score: f64) -> Vec<f32> {
    let mut scores: Vec<f32> = candidates
        .cells_with_code(WATER_CODE)
        .into_iter()
        .map(|cell| candidates.score_at(cell))
        .collect();
    scores.sort_by(|a, b| b.total_cmp(a));
    scores.dedup();
    scores.retain(|&score| score as f64 >= min_score);
    if min_score <= 0.0 {
        scores.retain(|&score| score != 0.0);
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::frame::GridFrame;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn options(min_score: f64) -> PlacementOptions {
        PlacementOptions {
            metric: Metric::Euclidean,
            min_score,
            stochastic: false,
            acceptance_threshold: 1.0,
        }
    }

    fn empty_grid() -> SoluGrid {
        let frame = GridFrame::for_solvation(
            Point3::origin(),
            Point3::new(10.0, 10.0, 10.0),
            1.0,
            2.0,
        )
        .unwrap();
        SoluGrid::new(frame)
    }

    fn candidate(grid: &mut SoluGrid, cell: [i64; 3], score: f32) {
        grid.mark_water(cell);
        grid.set_score(cell, score);
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn highest_scores_are_placed_first() {
        let mut grid = empty_grid();
        candidate(&mut grid, [10, 10, 10], 0.6);
        candidate(&mut grid, [20, 10, 10], 1.0);

        let placements = place_waters(&mut grid, &options(0.5), &mut SphereCache::new(), &mut rng());
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].cell, [20, 10, 10]);
        assert_eq!(placements[0].score, 1.0);
        assert_eq!(grid.code_at([20, 10, 10]), WATER_CODE);
    }

    #[test]
    fn scores_below_the_minimum_are_never_placed() {
        let mut grid = empty_grid();
        candidate(&mut grid, [10, 10, 10], 0.4);
        candidate(&mut grid, [20, 10, 10], 0.5);

        let placements = place_waters(&mut grid, &options(0.5), &mut SphereCache::new(), &mut rng());
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].cell, [20, 10, 10]);
    }

    #[test]
    fn zero_scores_are_excluded_even_without_a_minimum() {
        let mut grid = empty_grid();
        candidate(&mut grid, [10, 10, 10], 0.0);
        candidate(&mut grid, [20, 10, 10], 0.3);

        let placements = place_waters(&mut grid, &options(0.0), &mut SphereCache::new(), &mut rng());
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].cell, [20, 10, 10]);
    }

    #[test]
    fn placements_respect_the_exclusion_radius() {
        let mut grid = empty_grid();
        // A row of tied candidates one voxel apart; water radius is 2 voxels
        // at 1 A spacing, so neighbors of a placement must be suppressed.
        for x in 10..=14 {
            candidate(&mut grid, [x, 10, 10], 0.8);
        }

        let placements = place_waters(&mut grid, &options(0.5), &mut SphereCache::new(), &mut rng());
        let water_radius = (WATER_VDW_RADIUS / 1.0).round() as i64;
        for (i, a) in placements.iter().enumerate() {
            for b in placements.iter().skip(i + 1) {
                assert!(Metric::Euclidean.grid_distance(a.cell, b.cell) > water_radius);
            }
        }
    }

    #[test]
    fn isolated_ties_are_all_placed() {
        let mut grid = empty_grid();
        // Far beyond 2 * water_radius = 4 voxels apart.
        candidate(&mut grid, [10, 10, 10], 0.9);
        candidate(&mut grid, [20, 10, 10], 0.9);
        candidate(&mut grid, [10, 20, 10], 0.9);

        let placements = place_waters(&mut grid, &options(0.5), &mut SphereCache::new(), &mut rng());
        assert_eq!(placements.len(), 3);
    }

    #[test]
    fn clustered_ties_place_exactly_one_per_round() {
        let mut grid = empty_grid();
        // Two candidates within the mutual exclusion distance.
        candidate(&mut grid, [10, 10, 10], 0.9);
        candidate(&mut grid, [12, 10, 10], 0.9);

        let placements = place_waters(&mut grid, &options(0.5), &mut SphereCache::new(), &mut rng());
        assert_eq!(placements.len(), 1);
    }

    #[test]
    fn full_acceptance_threshold_accepts_every_draw() {
        let mut grid = empty_grid();
        candidate(&mut grid, [10, 10, 10], 0.9);
        let always_accept = PlacementOptions {
            metric: Metric::Euclidean,
            min_score: 0.5,
            stochastic: true,
            acceptance_threshold: 1.0,
        };

        let placements =
            place_waters(&mut grid, &always_accept, &mut SphereCache::new(), &mut rng());
        assert_eq!(placements.len(), 1);
        assert_eq!(grid.code_at([10, 10, 10]), WATER_CODE);
    }

    #[test]
    fn rejected_draws_still_clear_their_position() {
        let mut grid = empty_grid();
        candidate(&mut grid, [10, 10, 10], 0.9);
        let never_accept = PlacementOptions {
            metric: Metric::Euclidean,
            min_score: 0.5,
            stochastic: true,
            acceptance_threshold: 0.0,
        };

        let placements =
            place_waters(&mut grid, &never_accept, &mut SphereCache::new(), &mut rng());
        assert!(placements.is_empty());
        assert_eq!(grid.code_at([10, 10, 10]), 0);
    }

    #[test]
    fn structure_cells_survive_placement() {
        let mut grid = empty_grid();
        grid.fill([20, 20, 20], 6, 42);
        candidate(&mut grid, [10, 10, 10], 0.9);

        place_waters(&mut grid, &options(0.5), &mut SphereCache::new(), &mut rng());
        assert_eq!(grid.code_at([20, 20, 20]), 6);
        assert_eq!(grid.serial_at([20, 20, 20]), 42);
    }
}
