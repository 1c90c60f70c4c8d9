use super::frame::GridFrame;
use crate::core::tables::elements::WATER_CODE;

/// Single-channel presence grid used by pairwise comparison.
///
/// Each cell holds one element code byte, 0 meaning empty. Writes outside the
/// frame are an invariant violation of the bleeding margin; they panic in
/// debug builds and clip silently in release builds.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareGrid {
    frame: GridFrame,
    cells: Vec<u8>,
}

impl CompareGrid {
    pub fn new(frame: GridFrame) -> Self {
        Self {
            cells: vec![0; frame.len()],
            frame,
        }
    }

    pub fn frame(&self) -> &GridFrame {
        &self.frame
    }

    pub fn code_at(&self, cell: [i64; 3]) -> u8 {
        self.frame.index(cell).map_or(0, |index| self.cells[index])
    }

    pub fn set(&mut self, cell: [i64; 3], code: u8) {
        debug_assert!(self.frame.contains(cell), "write outside grid bounds");
        if let Some(index) = self.frame.index(cell) {
            self.cells[index] = code;
        }
    }

    /// Number of non-empty cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&code| code != 0).count()
    }

    /// Number of cells occupied in both grids, the bitwise-and overlap.
    pub fn overlap_count(&self, other: &CompareGrid) -> usize {
        self.cells
            .iter()
            .zip(&other.cells)
            .filter(|&(&a, &b)| a != 0 && b != 0)
            .count()
    }
}

/// Three-channel grid used by the solvation pipeline.
///
/// Cells track the element code, the owning atom serial, and the empirical
/// score assigned to water candidates. The channels are kept as parallel flat
/// vectors so clearing or copying a cell touches all three.
#[derive(Debug, Clone, PartialEq)]
pub struct SoluGrid {
    frame: GridFrame,
    codes: Vec<u8>,
    serials: Vec<u32>,
    scores: Vec<f32>,
}

impl SoluGrid {
    pub fn new(frame: GridFrame) -> Self {
        let len = frame.len();
        Self {
            frame,
            codes: vec![0; len],
            serials: vec![0; len],
            scores: vec![0.0; len],
        }
    }

    pub fn frame(&self) -> &GridFrame {
        &self.frame
    }

    pub fn code_at(&self, cell: [i64; 3]) -> u8 {
        self.frame.index(cell).map_or(0, |index| self.codes[index])
    }

    pub fn serial_at(&self, cell: [i64; 3]) -> u32 {
        self.frame
            .index(cell)
            .map_or(0, |index| self.serials[index])
    }

    pub fn score_at(&self, cell: [i64; 3]) -> f32 {
        self.frame
            .index(cell)
            .map_or(0.0, |index| self.scores[index])
    }

    /// Writes an occupied cell, resetting its score.
    pub fn fill(&mut self, cell: [i64; 3], code: u8, serial: u32) {
        debug_assert!(self.frame.contains(cell), "write outside grid bounds");
        if let Some(index) = self.frame.index(cell) {
            self.codes[index] = code;
            self.serials[index] = serial;
            self.scores[index] = 0.0;
        }
    }

    /// Marks an empty cell as a water candidate; occupied cells are left alone.
    pub fn mark_water(&mut self, cell: [i64; 3]) -> bool {
        match self.frame.index(cell) {
            Some(index) if self.codes[index] == 0 => {
                self.codes[index] = WATER_CODE;
                self.serials[index] = 0;
                self.scores[index] = 0.0;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self, cell: [i64; 3]) {
        debug_assert!(self.frame.contains(cell), "write outside grid bounds");
        if let Some(index) = self.frame.index(cell) {
            self.codes[index] = 0;
            self.serials[index] = 0;
            self.scores[index] = 0.0;
        }
    }

    pub fn set_score(&mut self, cell: [i64; 3], score: f32) {
        debug_assert!(self.frame.contains(cell), "write outside grid bounds");
        if let Some(index) = self.frame.index(cell) {
            self.scores[index] = score;
        }
    }

    /// Copies one cell's three channels from another grid over the same frame.
    pub fn copy_cell(&mut self, other: &SoluGrid, cell: [i64; 3]) {
        debug_assert_eq!(self.frame, other.frame);
        if let Some(index) = self.frame.index(cell) {
            self.codes[index] = other.codes[index];
            self.serials[index] = other.serials[index];
            self.scores[index] = other.scores[index];
        }
    }

    /// Cells carrying exactly `code`, in flat storage order.
    pub fn cells_with_code(&self, code: u8) -> Vec<[i64; 3]> {
        self.codes
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == code)
            .map(|(index, _)| self.frame.cell_of(index))
            .collect()
    }

    /// Non-empty cells, in flat storage order.
    pub fn occupied_cells(&self) -> Vec<[i64; 3]> {
        self.codes
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != 0)
            .map(|(index, _)| self.frame.cell_of(index))
            .collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.codes.iter().filter(|&&code| code != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn frame() -> GridFrame {
        GridFrame::for_comparison(Point3::origin(), Point3::new(3.0, 3.0, 3.0), 1.0).unwrap()
    }

    #[test]
    fn overlap_counts_cells_occupied_in_both_grids() {
        let mut a = CompareGrid::new(frame());
        let mut b = CompareGrid::new(frame());
        a.set([4, 4, 4], 6);
        a.set([5, 4, 4], 8);
        b.set([4, 4, 4], 7);
        b.set([6, 4, 4], 8);

        assert_eq!(a.occupied_count(), 2);
        assert_eq!(a.overlap_count(&b), 1);
        assert_eq!(b.overlap_count(&a), 1);
    }

    #[test]
    fn out_of_bounds_reads_are_empty() {
        let grid = CompareGrid::new(frame());
        assert_eq!(grid.code_at([-1, 0, 0]), 0);
        assert_eq!(grid.code_at([1000, 0, 0]), 0);
    }

    #[test]
    fn water_marking_never_overwrites_atoms() {
        let mut grid = SoluGrid::new(frame());
        grid.fill([4, 4, 4], 6, 12);
        assert!(!grid.mark_water([4, 4, 4]));
        assert!(grid.mark_water([5, 4, 4]));

        assert_eq!(grid.code_at([4, 4, 4]), 6);
        assert_eq!(grid.serial_at([4, 4, 4]), 12);
        assert_eq!(grid.code_at([5, 4, 4]), WATER_CODE);
    }

    #[test]
    fn clearing_resets_all_three_channels() {
        let mut grid = SoluGrid::new(frame());
        grid.fill([4, 4, 4], 8, 3);
        grid.set_score([4, 4, 4], 0.7);
        grid.clear([4, 4, 4]);

        assert_eq!(grid.code_at([4, 4, 4]), 0);
        assert_eq!(grid.serial_at([4, 4, 4]), 0);
        assert_eq!(grid.score_at([4, 4, 4]), 0.0);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn cell_queries_report_storage_order() {
        let mut grid = SoluGrid::new(frame());
        grid.mark_water([2, 2, 2]);
        grid.mark_water([1, 1, 1]);
        grid.fill([3, 3, 3], 6, 1);

        assert_eq!(grid.cells_with_code(WATER_CODE), [[1, 1, 1], [2, 2, 2]]);
        assert_eq!(grid.occupied_cells().len(), 3);
    }

    #[test]
    fn copying_a_cell_moves_code_serial_and_score() {
        let mut source = SoluGrid::new(frame());
        source.mark_water([2, 2, 2]);
        source.set_score([2, 2, 2], 0.9);
        let mut target = SoluGrid::new(frame());
        target.copy_cell(&source, [2, 2, 2]);

        assert_eq!(target.code_at([2, 2, 2]), WATER_CODE);
        assert_eq!(target.score_at([2, 2, 2]), 0.9);
    }
}
