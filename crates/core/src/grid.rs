//! Grid module - the locked-block playfield
//!
//! A `width x height` matrix stored as a flat row-major `Vec` for cache locality.
//! Coordinates: (x, y) where x grows left to right and y grows downward, so row 0
//! is the top of the playfield and row `height - 1` the floor.
//!
//! Out-of-bounds coordinates are never stored: every write goes through
//! [`Grid::index`], so no occupied cell can exist outside the playfield.

use serde::Serialize;

use crate::error::GridError;
use crate::pieces::PowerTag;
use crate::types::{PieceKind, PowerUpKind, GARBAGE_COLOR_ID};

/// Origin of a locked block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellTag {
    Piece(PieceKind),
    /// Inserted by a rising row
    Garbage,
}

impl CellTag {
    pub fn color_id(&self) -> u8 {
        match self {
            CellTag::Piece(kind) => kind.color_id(),
            CellTag::Garbage => GARBAGE_COLOR_ID,
        }
    }
}

/// A locked block, optionally carrying a power-up charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Block {
    pub tag: CellTag,
    pub power: Option<PowerUpKind>,
}

impl Block {
    pub fn new(tag: CellTag) -> Self {
        Self { tag, power: None }
    }
}

/// - `None`: empty cell
/// - `Some(Block)`: occupied cell
pub type Cell = Option<Block>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Row-major cells (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || y < 0 || x as u8 >= self.width || y as u8 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Cell at (x, y); `None` if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and empty
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn in_bounds(&self, x: i8, y: i8) -> bool {
        self.index(x, y).is_some()
    }

    /// True iff every offset lands on an in-bounds empty cell
    pub fn can_place(&self, shape: &[(i8, i8)], x: i8, y: i8) -> bool {
        shape
            .iter()
            .all(|&(dx, dy)| self.is_valid(x + dx, y + dy))
    }

    /// True iff every offset lands in bounds, occupied or not
    pub fn fits_bounds(&self, shape: &[(i8, i8)], x: i8, y: i8) -> bool {
        shape
            .iter()
            .all(|&(dx, dy)| self.in_bounds(x + dx, y + dy))
    }

    /// Lock a shape into the grid.
    ///
    /// Fails with [`GridError::InvalidLock`] and leaves the grid untouched when
    /// `can_place` is false for the same arguments.
    pub fn lock(
        &mut self,
        shape: &[(i8, i8)],
        x: i8,
        y: i8,
        tag: CellTag,
        power: Option<PowerTag>,
    ) -> Result<(), GridError> {
        if !self.can_place(shape, x, y) {
            return Err(GridError::InvalidLock { x, y });
        }
        self.write_shape(shape, x, y, tag, power);
        Ok(())
    }

    /// Lock a shape over whatever is there (Phantom mode).
    ///
    /// Bounds are still enforced.
    pub fn overwrite(
        &mut self,
        shape: &[(i8, i8)],
        x: i8,
        y: i8,
        tag: CellTag,
        power: Option<PowerTag>,
    ) -> Result<(), GridError> {
        if !self.fits_bounds(shape, x, y) {
            return Err(GridError::InvalidLock { x, y });
        }
        self.write_shape(shape, x, y, tag, power);
        Ok(())
    }

    fn write_shape(
        &mut self,
        shape: &[(i8, i8)],
        x: i8,
        y: i8,
        tag: CellTag,
        power: Option<PowerTag>,
    ) {
        for (i, &(dx, dy)) in shape.iter().enumerate() {
            let power = power
                .filter(|p| p.cell as usize == i)
                .map(|p| p.kind);
            self.set(x + dx, y + dy, Some(Block { tag, power }));
        }
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).is_some_and(|row| row.iter().all(|c| c.is_some()))
    }

    pub fn is_row_empty(&self, y: usize) -> bool {
        self.row(y).is_some_and(|row| row.iter().all(|c| c.is_none()))
    }

    fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let w = self.width as usize;
        Some(&self.cells[y * w..(y + 1) * w])
    }

    /// Full rows in ascending row index
    pub fn find_full_rows(&self) -> Vec<usize> {
        (0..self.height as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Remove `rows` and let everything above fall into the gap.
    ///
    /// Two-pointer compaction from the floor up: surviving rows keep their order
    /// and block contents; the top is refilled with empty rows.
    pub fn clear_and_compact(&mut self, rows: &[usize]) {
        let width = self.width as usize;
        let mut write_y = self.height as usize;

        for read_y in (0..self.height as usize).rev() {
            if rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * width;
                self.cells.copy_within(src..src + width, write_y * width);
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }
    }

    /// Push every row up by one and add a bottom row filled except at `holes`.
    ///
    /// Fails with [`GridError::Overflow`] (grid untouched) if the top row holds
    /// any block, since that block would leave the playfield.
    pub fn insert_bottom_row(&mut self, holes: &[u8], tag: CellTag) -> Result<(), GridError> {
        if !self.is_row_empty(0) {
            return Err(GridError::Overflow);
        }

        let width = self.width as usize;
        self.cells.copy_within(width.., 0);

        let bottom = (self.height as usize - 1) * width;
        for x in 0..width {
            self.cells[bottom + x] = if holes.contains(&(x as u8)) {
                None
            } else {
                Some(Block::new(tag))
            };
        }
        Ok(())
    }

    /// Largest row index holding any block (nearest the floor)
    pub fn lowest_occupied_row(&self) -> Option<usize> {
        (0..self.height as usize)
            .rev()
            .find(|&y| !self.is_row_empty(y))
    }

    /// Power-up charges carried by blocks in `rows`, scanned row by row
    pub fn power_tags_in_rows(&self, rows: &[usize]) -> Vec<PowerUpKind> {
        rows.iter()
            .filter_map(|&y| self.row(y))
            .flat_map(|row| row.iter().filter_map(|c| c.and_then(|b| b.power)))
            .collect()
    }

    /// Stack height of column `x` (0 when empty)
    pub fn column_height(&self, x: usize) -> u8 {
        let w = self.width as usize;
        (0..self.height as usize)
            .find(|&y| self.cells[y * w + x].is_some())
            .map(|y| self.height - y as u8)
            .unwrap_or(0)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Colour ids per row (0 = empty)
    pub fn to_u8_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| {
                row.iter()
                    .map(|c| c.map(|b| b.tag.color_id()).unwrap_or(0))
                    .collect()
            })
            .collect()
    }

    /// Build a grid from ASCII rows, top first: `.` is empty, `#` garbage,
    /// a piece letter that piece's colour.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as u8;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as u8;
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let tag = match ch {
                    '.' => continue,
                    '#' => CellTag::Garbage,
                    other => match PieceKind::from_str(&other.to_string()) {
                        Some(kind) => CellTag::Piece(kind),
                        None => CellTag::Garbage,
                    },
                };
                grid.set(x as i8, y as i8, Some(Block::new(tag)));
            }
        }
        grid
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(crate::types::GRID_WIDTH, crate::types::GRID_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAR: [(i8, i8); 4] = [(0, 0), (1, 0), (2, 0), (3, 0)];

    #[test]
    fn index_calculation() {
        let grid = Grid::new(10, 20);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(9, 0), Some(9));
        assert_eq!(grid.index(0, 1), Some(10));
        assert_eq!(grid.index(9, 19), Some(199));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(10, 0), None);
        assert_eq!(grid.index(0, 20), None);
    }

    #[test]
    fn failed_lock_leaves_grid_untouched() {
        let mut grid = Grid::new(10, 20);
        grid.set(2, 19, Some(Block::new(CellTag::Garbage)));
        let before = grid.clone();

        let err = grid.lock(&BAR, 0, 19, CellTag::Piece(PieceKind::I), None);
        assert_eq!(err, Err(GridError::InvalidLock { x: 0, y: 19 }));
        assert_eq!(grid, before);
    }

    #[test]
    fn lock_places_power_on_tagged_cell() {
        let mut grid = Grid::new(10, 20);
        let tag = PowerTag {
            cell: 2,
            kind: PowerUpKind::LineBomb,
        };
        grid.lock(&BAR, 0, 19, CellTag::Piece(PieceKind::I), Some(tag))
            .unwrap();

        assert_eq!(grid.get(2, 19).unwrap().unwrap().power, Some(PowerUpKind::LineBomb));
        assert_eq!(grid.get(1, 19).unwrap().unwrap().power, None);
    }

    #[test]
    fn overwrite_ignores_occupancy_not_bounds() {
        let mut grid = Grid::from_ascii(&["....", "####"]);
        let tag = CellTag::Piece(PieceKind::I);
        assert!(grid.overwrite(&BAR, 0, 1, tag, None).is_ok());
        assert_eq!(grid.get(0, 1), Some(Some(Block::new(tag))));
        assert!(grid.overwrite(&BAR, 1, 1, tag, None).is_err());
    }

    #[test]
    fn compaction_keeps_order_of_survivors() {
        let mut grid = Grid::from_ascii(&[
            "....",
            "t...",
            "####",
            "..z.",
            "####",
        ]);
        let rows = grid.find_full_rows();
        assert_eq!(rows, vec![2, 4]);

        grid.clear_and_compact(&rows);
        let expected = Grid::from_ascii(&[
            "....",
            "....",
            "....",
            "t...",
            "..z.",
        ]);
        assert_eq!(grid, expected);
    }

    #[test]
    fn insert_row_overflows_when_top_occupied() {
        let mut grid = Grid::from_ascii(&["..o.", "....", "...."]);
        let before = grid.clone();
        assert_eq!(
            grid.insert_bottom_row(&[0], CellTag::Garbage),
            Err(GridError::Overflow)
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn insert_row_shifts_stack_up() {
        let mut grid = Grid::from_ascii(&["....", "....", "l..."]);
        grid.insert_bottom_row(&[1, 3], CellTag::Garbage).unwrap();
        assert_eq!(grid, Grid::from_ascii(&["....", "l...", "#.#."]));
    }

    #[test]
    fn lowest_row_and_heights() {
        let grid = Grid::from_ascii(&["....", ".#..", "....", "...."]);
        assert_eq!(grid.lowest_occupied_row(), Some(1));
        assert_eq!(grid.column_height(1), 3);
        assert_eq!(grid.column_height(0), 0);
        assert_eq!(Grid::new(4, 4).lowest_occupied_row(), None);
    }
}
