//! Board features used by the placement heuristic.
//!
//! Heights are measured from the floor: an empty column is 0, a column whose
//! top block sits in row 0 has height `grid.height()`.

use arrayvec::ArrayVec;

use tetris_ultimate_core::Grid;

/// Widest grid a config may describe
pub const MAX_COLUMNS: usize = 64;

pub type ColumnHeights = ArrayVec<u8, MAX_COLUMNS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardFeatures {
    pub max_height: u32,
    pub holes: u32,
    pub bumpiness: u32,
    pub deepest_well: u32,
}

impl BoardFeatures {
    pub fn from_grid(grid: &Grid) -> Self {
        let heights = column_heights(grid);
        Self {
            max_height: heights.iter().copied().max().unwrap_or(0) as u32,
            holes: count_holes(grid),
            bumpiness: bumpiness(&heights),
            deepest_well: deepest_well(&heights, grid.height()),
        }
    }
}

pub fn column_heights(grid: &Grid) -> ColumnHeights {
    (0..(grid.width() as usize).min(MAX_COLUMNS))
        .map(|x| grid.column_height(x))
        .collect()
}

/// Empty cells with at least one block somewhere above them in the same column
pub fn count_holes(grid: &Grid) -> u32 {
    let mut holes = 0;
    for x in 0..grid.width() as i8 {
        let mut covered = false;
        for y in 0..grid.height() as i8 {
            if grid.is_occupied(x, y) {
                covered = true;
            } else if covered {
                holes += 1;
            }
        }
    }
    holes
}

/// Sum of absolute height differences between adjacent columns
pub fn bumpiness(heights: &[u8]) -> u32 {
    heights
        .windows(2)
        .map(|w| w[0].abs_diff(w[1]) as u32)
        .sum()
}

/// Depth of the deepest single-column well; walls count as full columns
pub fn deepest_well(heights: &[u8], wall_height: u8) -> u32 {
    (0..heights.len())
        .map(|x| {
            let left = if x == 0 { wall_height } else { heights[x - 1] };
            let right = heights.get(x + 1).copied().unwrap_or(wall_height);
            left.min(right).saturating_sub(heights[x]) as u32
        })
        .max()
        .unwrap_or(0)
}
