use super::config::{SolvationShell, SphereGeometry};
use super::grid::SoluGrid;
use super::sphere::SphereCache;
use crate::core::models::structure::Structure;
use crate::core::tables::elements;
use tracing::debug;

// Shell radii below this are indistinguishable from the VdW surface itself.
const MIN_SHELL_RADIUS: f64 = 0.1;

/// Resolves the usable shell bounds from the configured ones.
///
/// The inner radius is clamped away from zero and a degenerate equal pair is
/// widened by doubling the outer radius, so the shell always has volume.
pub(crate) fn effective_shell(shell: &SolvationShell) -> (f64, f64) {
    let min_radius = shell.min_radius.max(MIN_SHELL_RADIUS);
    let max_radius = if min_radius == shell.max_radius {
        shell.max_radius * 2.0
    } else {
        shell.max_radius
    };
    (min_radius, max_radius)
}

/// Marks the solvation shell of a rasterized structure as water candidates.
///
/// On a scratch copy, an outer sphere of `vdw + max_radius` is stamped around
/// every atom, then an inner sphere of `vdw + min_radius` is cleared around
/// every atom. Scratch cells left occupied that are empty in the real grid
/// become water candidates there. Returns the number of marked cells.
pub fn extract_shell(
    grid: &mut SoluGrid,
    structure: &Structure,
    shell: &SolvationShell,
    geometry: SphereGeometry,
    cache: &mut SphereCache,
) -> usize {
    let spacing = grid.frame().spacing();
    let (min_radius, max_radius) = effective_shell(shell);
    let inner_voxels = (min_radius / spacing) as i64;
    let outer_voxels = (max_radius / spacing) as i64;

    let frame = *grid.frame();
    let mut scratch = grid.clone();

    for group in &structure.element_groups {
        if group.code == 0 {
            continue;
        }
        let radius = (elements::vdw_radius(&group.symbol) / spacing).round() as i64 + outer_voxels;
        let offsets = cache.get(geometry, radius);
        for &atom_index in &group.indices {
            let atom = &structure.atoms[atom_index];
            let center = frame.to_grid(&atom.position);
            for offset in offsets {
                scratch.fill(
                    [
                        center[0] + offset[0],
                        center[1] + offset[1],
                        center[2] + offset[2],
                    ],
                    group.code,
                    atom.serial,
                );
            }
        }
    }

    for group in &structure.element_groups {
        if group.code == 0 {
            continue;
        }
        let radius = (elements::vdw_radius(&group.symbol) / spacing).round() as i64 + inner_voxels;
        let offsets = cache.get(geometry, radius);
        for &atom_index in &group.indices {
            let center = frame.to_grid(&structure.atoms[atom_index].position);
            for offset in offsets {
                scratch.clear([
                    center[0] + offset[0],
                    center[1] + offset[1],
                    center[2] + offset[2],
                ]);
            }
        }
    }

    let mut marked = 0;
    for cell in scratch.occupied_cells() {
        if grid.mark_water(cell) {
            marked += 1;
        }
    }
    debug!(
        candidates = marked,
        inner_voxels, outer_voxels, "solvation shell extracted"
    );
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::tables::elements::WATER_CODE;
    use crate::engine::config::Metric;
    use crate::engine::frame::GridFrame;
    use crate::engine::rasterizer::rasterize_tracked;
    use nalgebra::Point3;

    fn single_oxygen() -> Structure {
        Structure::new("o", vec![Atom::new(1, "O", Point3::origin())])
    }

    fn shell(min_radius: f64, max_radius: f64) -> SolvationShell {
        SolvationShell {
            min_radius,
            max_radius,
        }
    }

    #[test]
    fn degenerate_shells_are_widened() {
        assert_eq!(effective_shell(&shell(2.0, 2.0)), (2.0, 4.0));
        assert_eq!(effective_shell(&shell(0.0, 2.0)), (MIN_SHELL_RADIUS, 2.0));
        assert_eq!(effective_shell(&shell(1.0, 2.0)), (1.0, 2.0));
    }

    #[test]
    fn candidates_are_empty_cells_within_the_shell() {
        let structure = single_oxygen();
        let spacing = 1.0;
        let bounds = shell(1.0, 3.0);
        let frame =
            GridFrame::for_solvation(Point3::origin(), Point3::origin(), spacing, 3.0).unwrap();
        let mut cache = SphereCache::new();
        let mut grid = rasterize_tracked(&structure, frame, SphereGeometry::Sphere, &mut cache);
        let occupied_before = grid.occupied_cells();

        let marked = extract_shell(
            &mut grid,
            &structure,
            &bounds,
            SphereGeometry::Sphere,
            &mut cache,
        );
        assert!(marked > 0);

        let vdw = elements::vdw_radius("O");
        let center = frame.to_grid(&Point3::origin());
        for cell in grid.cells_with_code(WATER_CODE) {
            // Candidates never overwrite structure cells.
            assert!(!occupied_before.contains(&cell));
            let distance = Metric::Euclidean.grid_distance(cell, center) as f64;
            let scaled_vdw = (vdw / spacing).round();
            assert!(distance > scaled_vdw + (1.0 / spacing).floor() - 1.0);
            assert!(distance <= scaled_vdw + (3.0 / spacing).ceil() + 1.0);
        }
    }

    #[test]
    fn shell_count_tracks_the_hollow_sphere_volume() {
        let structure = single_oxygen();
        let bounds = shell(1.0, 3.0);
        let frame =
            GridFrame::for_solvation(Point3::origin(), Point3::origin(), 1.0, 3.0).unwrap();
        let mut cache = SphereCache::new();
        let mut grid = rasterize_tracked(&structure, frame, SphereGeometry::Sphere, &mut cache);

        let marked = extract_shell(
            &mut grid,
            &structure,
            &bounds,
            SphereGeometry::Sphere,
            &mut cache,
        ) as f64;
        // Scaled radii: vdw 2, outer 2 + 3 = 5, inner 2 + 1 = 3.
        let outer = 4.0 / 3.0 * std::f64::consts::PI * 5.0_f64.powi(3);
        let inner = 4.0 / 3.0 * std::f64::consts::PI * 3.0_f64.powi(3);
        let expected = outer - inner;
        assert!((marked - expected).abs() / expected < 0.2);
    }
}
