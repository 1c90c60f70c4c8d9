use super::config::SphereGeometry;
use super::frame::GridFrame;
use super::grid::{CompareGrid, SoluGrid};
use super::sphere::SphereCache;
use crate::core::models::structure::Structure;
use crate::core::tables::elements;
use tracing::warn;

fn scaled_radius(symbol: &str, spacing: f64) -> i64 {
    (elements::vdw_radius(symbol) / spacing).round() as i64
}

/// Rasterizes a structure into a presence grid for comparison.
///
/// Every atom's VdW sphere is stamped with its element code, or with a
/// constant occupied marker when `consider_elements` is off. Overlapping
/// spheres resolve last-writer-wins, in element order then atom order.
pub fn rasterize_presence(
    structure: &Structure,
    frame: GridFrame,
    geometry: SphereGeometry,
    consider_elements: bool,
    cache: &mut SphereCache,
) -> CompareGrid {
    let mut grid = CompareGrid::new(frame);
    let spacing = frame.spacing();
    for group in &structure.element_groups {
        let code = if consider_elements && group.code > 0 {
            group.code
        } else {
            1
        };
        let offsets = cache.get(geometry, scaled_radius(&group.symbol, spacing));
        for &atom_index in &group.indices {
            let center = frame.to_grid(&structure.atoms[atom_index].position);
            for offset in offsets {
                grid.set(
                    [
                        center[0] + offset[0],
                        center[1] + offset[1],
                        center[2] + offset[2],
                    ],
                    code,
                );
            }
        }
    }
    grid
}

/// Rasterizes a structure into a tracked grid for solvation.
///
/// Stamped cells carry the element code and the serial of the stamping atom.
/// Groups whose element resolves to no code are skipped with a warning; they
/// cannot occupy cells.
pub fn rasterize_tracked(
    structure: &Structure,
    frame: GridFrame,
    geometry: SphereGeometry,
    cache: &mut SphereCache,
) -> SoluGrid {
    let mut grid = SoluGrid::new(frame);
    let spacing = frame.spacing();
    for group in &structure.element_groups {
        if group.code == 0 {
            warn!(
                element = %group.symbol,
                atoms = group.indices.len(),
                "unknown element symbol, atoms not rasterized"
            );
            continue;
        }
        let offsets = cache.get(geometry, scaled_radius(&group.symbol, spacing));
        for &atom_index in &group.indices {
            let atom = &structure.atoms[atom_index];
            let center = frame.to_grid(&atom.position);
            for offset in offsets {
                grid.fill(
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
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn structure(atoms: Vec<Atom>) -> Structure {
        Structure::new("test", atoms)
    }

    fn carbon(serial: u32, x: f64) -> Atom {
        Atom::new(serial, "C", Point3::new(x, 0.0, 0.0))
    }

    #[test]
    fn rasterization_is_deterministic() {
        let structure = structure(vec![
            carbon(1, 0.0),
            carbon(2, 2.0),
            Atom::new(3, "O", Point3::new(1.0, 1.0, 0.0)),
        ]);
        let (min, max) = structure.extents().unwrap();
        let frame = GridFrame::for_comparison(min, max, 1.0).unwrap();
        let mut cache = SphereCache::new();

        let first = rasterize_presence(&structure, frame, SphereGeometry::Sphere, true, &mut cache);
        let second =
            rasterize_presence(&structure, frame, SphereGeometry::Sphere, true, &mut cache);
        assert_eq!(first, second);
        assert!(first.occupied_count() > 0);
    }

    #[test]
    fn volume_only_mode_stamps_the_occupied_marker() {
        let structure = structure(vec![carbon(1, 0.0)]);
        let (min, max) = structure.extents().unwrap();
        let frame = GridFrame::for_comparison(min, max, 1.0).unwrap();
        let mut cache = SphereCache::new();

        let grid = rasterize_presence(&structure, frame, SphereGeometry::Sphere, false, &mut cache);
        let center = frame.to_grid(&Point3::origin());
        assert_eq!(grid.code_at(center), 1);
    }

    #[test]
    fn element_mode_stamps_atomic_numbers() {
        let structure = structure(vec![carbon(1, 0.0)]);
        let (min, max) = structure.extents().unwrap();
        let frame = GridFrame::for_comparison(min, max, 1.0).unwrap();
        let mut cache = SphereCache::new();

        let grid = rasterize_presence(&structure, frame, SphereGeometry::Sphere, true, &mut cache);
        let center = frame.to_grid(&Point3::origin());
        assert_eq!(grid.code_at(center), 6);
        // Scaled carbon radius at 1 A spacing is 2 voxels.
        assert_eq!(grid.code_at([center[0] + 2, center[1], center[2]]), 6);
        assert_eq!(grid.code_at([center[0] + 3, center[1], center[2]]), 0);
    }

    #[test]
    fn tracked_grids_record_the_stamping_atom() {
        let structure = structure(vec![carbon(7, 0.0)]);
        let (min, max) = structure.extents().unwrap();
        let frame = GridFrame::for_solvation(min, max, 1.0, 2.0).unwrap();
        let mut cache = SphereCache::new();

        let grid = rasterize_tracked(&structure, frame, SphereGeometry::Sphere, &mut cache);
        let center = frame.to_grid(&Point3::origin());
        assert_eq!(grid.code_at(center), 6);
        assert_eq!(grid.serial_at(center), 7);
        assert_eq!(grid.score_at(center), 0.0);
    }
}
