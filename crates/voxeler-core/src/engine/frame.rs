use super::error::EngineError;
use crate::core::tables::elements;
use nalgebra::{Point3, Vector3};

// Hard cap on grid allocation, hit long before address space runs out when a
// near-zero spacing slips through configuration.
const MAX_VOXELS: u128 = 1 << 32;

/// The shared coordinate frame of every grid built for one run.
///
/// A frame fixes the grid spacing, the padding (bleeding) voxels around the
/// real-space extents, and the integer offset that maps rounded real
/// coordinates into `[0, size)` per axis. Structures compared against each
/// other must be rasterized through the same frame so their cells align.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridFrame {
    spacing: f64,
    bleeding: i64,
    offset: Vector3<i64>,
    size: [usize; 3],
}

impl GridFrame {
    fn build(
        min: Point3<f64>,
        max: Point3<f64>,
        spacing: f64,
        bleeding: i64,
    ) -> Result<Self, EngineError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(EngineError::InvalidSpacing { spacing });
        }
        let mut offset = Vector3::zeros();
        let mut size = [0usize; 3];
        let mut voxels: u128 = 1;
        for axis in 0..3 {
            let low = (min[axis] / spacing).round() as i64;
            let high = (max[axis] / spacing).round() as i64;
            offset[axis] = bleeding - low;
            size[axis] = (2 * bleeding + high - low) as usize;
            voxels = voxels.saturating_mul(size[axis] as u128);
        }
        if voxels == 0 || voxels > MAX_VOXELS {
            return Err(EngineError::GridTooLarge {
                voxels,
                limit: MAX_VOXELS,
            });
        }
        Ok(Self {
            spacing,
            bleeding,
            offset,
            size,
        })
    }

    /// Frame for pairwise comparison grids.
    ///
    /// The bleeding covers the largest scaled VdW radius of the element table
    /// plus one voxel, so any stamped sphere stays in bounds.
    pub fn for_comparison(
        min: Point3<f64>,
        max: Point3<f64>,
        spacing: f64,
    ) -> Result<Self, EngineError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(EngineError::InvalidSpacing { spacing });
        }
        let bleeding = elements::max_scaled_radius(spacing) as i64 + 1;
        Self::build(min, max, spacing, bleeding)
    }

    /// Frame for solvation grids.
    ///
    /// The bleeding doubles the largest scaled VdW radius and adds twice the
    /// outer shell radius, leaving room for the surface stamp plus the water
    /// exclusion sphere around candidates sitting at the outermost shell.
    pub fn for_solvation(
        min: Point3<f64>,
        max: Point3<f64>,
        spacing: f64,
        max_shell_radius: f64,
    ) -> Result<Self, EngineError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(EngineError::InvalidSpacing { spacing });
        }
        let shell_voxels = (max_shell_radius / spacing) as i64;
        let bleeding = 2 * elements::max_scaled_radius(spacing) as i64 + 2 * shell_voxels;
        Self::build(min, max, spacing, bleeding)
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn bleeding(&self) -> i64 {
        self.bleeding
    }

    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    /// Total number of voxels in the frame.
    pub fn len(&self) -> usize {
        self.size[0] * self.size[1] * self.size[2]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maps a real-space point to its grid cell.
    pub fn to_grid(&self, position: &Point3<f64>) -> [i64; 3] {
        [
            (position.x / self.spacing).round() as i64 + self.offset.x,
            (position.y / self.spacing).round() as i64 + self.offset.y,
            (position.z / self.spacing).round() as i64 + self.offset.z,
        ]
    }

    /// Maps a grid cell back to the real-space point at its center.
    pub fn to_real(&self, cell: [i64; 3]) -> Point3<f64> {
        Point3::new(
            (cell[0] - self.offset.x) as f64 * self.spacing,
            (cell[1] - self.offset.y) as f64 * self.spacing,
            (cell[2] - self.offset.z) as f64 * self.spacing,
        )
    }

    pub fn contains(&self, cell: [i64; 3]) -> bool {
        (0..3).all(|axis| cell[axis] >= 0 && (cell[axis] as usize) < self.size[axis])
    }

    /// Flat storage index of a cell, `None` when out of bounds.
    pub fn index(&self, cell: [i64; 3]) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let [x, y, z] = cell.map(|c| c as usize);
        Some((x * self.size[1] + y) * self.size[2] + z)
    }

    /// Grid cell of a flat storage index.
    pub fn cell_of(&self, index: usize) -> [i64; 3] {
        let plane = self.size[1] * self.size[2];
        [
            (index / plane) as i64,
            (index % plane / self.size[2]) as i64,
            (index % self.size[2]) as i64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(spacing: f64) -> GridFrame {
        GridFrame::for_comparison(
            Point3::new(-2.0, 0.0, 1.0),
            Point3::new(3.0, 4.0, 6.0),
            spacing,
        )
        .unwrap()
    }

    #[test]
    fn round_trip_recovers_points_within_half_spacing() {
        let frame = frame(0.5);
        for point in [
            Point3::new(-2.0, 0.0, 1.0),
            Point3::new(3.0, 4.0, 6.0),
            Point3::new(0.3, 2.7, 3.14),
        ] {
            let cell = frame.to_grid(&point);
            assert!(frame.contains(cell));
            let recovered = frame.to_real(cell);
            for axis in 0..3 {
                assert!((recovered[axis] - point[axis]).abs() <= 0.25 + 1e-12);
            }
        }
    }

    #[test]
    fn extreme_spheres_stay_inside_the_bleeding_margin() {
        let frame = frame(0.5);
        let max_radius = elements::max_scaled_radius(0.5) as i64;
        for corner in [Point3::new(-2.0, 0.0, 1.0), Point3::new(3.0, 4.0, 6.0)] {
            let center = frame.to_grid(&corner);
            for offset in [-max_radius, max_radius] {
                assert!(frame.contains([center[0] + offset, center[1], center[2]]));
            }
        }
    }

    #[test]
    fn flat_indices_invert_to_cells() {
        let frame = frame(1.0);
        for cell in [[0, 0, 0], [1, 2, 3], [4, 4, 4]] {
            let index = frame.index(cell).unwrap();
            assert_eq!(frame.cell_of(index), cell);
        }
        assert_eq!(frame.index([-1, 0, 0]), None);
        let [sx, _, _] = frame.size();
        assert_eq!(frame.index([sx as i64, 0, 0]), None);
    }

    #[test]
    fn near_zero_spacing_is_rejected_before_allocation() {
        let result = GridFrame::for_comparison(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(100.0, 100.0, 100.0),
            1e-6,
        );
        assert!(matches!(result, Err(EngineError::GridTooLarge { .. })));
        assert!(matches!(
            GridFrame::for_comparison(Point3::origin(), Point3::origin(), 0.0),
            Err(EngineError::InvalidSpacing { .. })
        ));
    }

    #[test]
    fn solvation_bleeding_covers_shell_and_exclusion() {
        let spacing = 1.0;
        let frame = GridFrame::for_solvation(
            Point3::origin(),
            Point3::new(2.0, 2.0, 2.0),
            spacing,
            2.0,
        )
        .unwrap();
        let expected = 2 * elements::max_scaled_radius(spacing) as i64 + 4;
        assert_eq!(frame.bleeding(), expected);
    }
}
