//! Grid data model
//!
//! This module provides the program storage:
//! - [`vec2`]: Signed coordinate/displacement pairs
//! - [`cell`]: The tagged [`Cell`] value and the [`Operation`] set
//! - [`Grid`]: Fixed-size, row-major cell store with checked access
//!
//! # Addressing
//!
//! Cells are stored row-major, so `(x, y)` lives at index `y * width + x`.
//! Every access goes through [`Grid::index_of`]; coordinates outside
//! `[0, width) × [0, height)` yield [`GridError::OutOfBounds`] rather than
//! touching storage.

pub mod cell;
pub mod vec2;

pub use cell::{Cell, Number, Operation};
pub use vec2::Vec2;

use std::fmt;

/// Errors from grid access
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds {
        position: Vec2,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfBounds {
                position,
                width,
                height,
            } => write!(
                f,
                "Position {} is outside the {}x{} grid",
                position, height, width
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Requested dimensions cannot be allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTooLarge {
    pub height: usize,
    pub width: usize,
}

impl fmt::Display for GridTooLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A {}x{} grid is too large to allocate",
            self.height, self.width
        )
    }
}

impl std::error::Error for GridTooLarge {}

/// A fixed `height × width` array of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell `Nil`
    pub fn new(height: usize, width: usize) -> Result<Self, GridTooLarge> {
        let too_large = GridTooLarge { height, width };
        let len = width.checked_mul(height).ok_or(too_large)?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large)?;
        cells.resize(len, Cell::Nil);

        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a position addresses a cell of this grid
    pub fn contains(&self, position: Vec2) -> bool {
        self.index_of(position).is_some()
    }

    /// Row-major storage index, or `None` if out of bounds
    pub fn index_of(&self, position: Vec2) -> Option<usize> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    pub fn get(&self, x: i64, y: i64) -> Result<Cell, GridError> {
        self.get_at(Vec2::new(x, y))
    }

    pub fn set(&mut self, x: i64, y: i64, cell: Cell) -> Result<(), GridError> {
        self.set_at(Vec2::new(x, y), cell)
    }

    pub fn get_at(&self, position: Vec2) -> Result<Cell, GridError> {
        let index = self.checked_index(position)?;
        Ok(self.cells[index])
    }

    pub fn set_at(&mut self, position: Vec2, cell: Cell) -> Result<(), GridError> {
        let index = self.checked_index(position)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Iterate the cells of row `y` from left to right
    pub fn row(&self, y: usize) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Number of non-nil cells
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_nil()).count()
    }

    /// Total cell count
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn checked_index(&self, position: Vec2) -> Result<usize, GridError> {
        self.index_of(position).ok_or(GridError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_nil() {
        let grid = Grid::new(2, 3).unwrap();
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.occupied(), 0);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(grid.get(x, y), Ok(Cell::Nil));
            }
        }
    }

    #[test]
    fn test_row_major_addressing() {
        let mut grid = Grid::new(2, 3).unwrap();
        grid.set(2, 0, Cell::Number(1)).unwrap();
        grid.set(0, 1, Cell::Number(2)).unwrap();

        assert_eq!(grid.index_of(Vec2::new(2, 0)), Some(2));
        assert_eq!(grid.index_of(Vec2::new(0, 1)), Some(3));
        assert_eq!(grid.row(0), &[Cell::Nil, Cell::Nil, Cell::Number(1)]);
        assert_eq!(grid.row(1)[0], Cell::Number(2));
        assert!(grid.row(2).is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(2, 3).unwrap();
        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 2)] {
            assert_eq!(
                grid.get(x, y),
                Err(GridError::OutOfBounds {
                    position: Vec2::new(x, y),
                    width: 3,
                    height: 2,
                })
            );
            assert!(grid.set(x, y, Cell::Char('a')).is_err());
        }
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        assert_eq!(
            Grid::new(usize::MAX / 2, 4),
            Err(GridTooLarge {
                height: usize::MAX / 2,
                width: 4,
            })
        );
        assert!(Grid::new(usize::MAX / 64, 4).is_err());
    }
}
