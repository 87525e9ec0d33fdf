//! Fixed-size 2D grid backed by a flat vector.
//!
//! Both working surfaces of the engine live in one of these: the cell
//! classification grid and the score accumulator. Coordinates are `i32`
//! to match the wire types; `(0, 0)` is the bottom-left corner and `y`
//! grows upward. Indexing outside the grid is a caller bug and panics,
//! so everything that touches a grid stays inside the padded playfield.

use std::ops::{Index, IndexMut};

use crate::types::Coord;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: i32,
    height: i32,
    fill: T,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Creates a grid of `width * height` cells, all set to `fill`.
    /// `fill` is also what `reset` restores.
    pub fn new(width: i32, height: i32, fill: T) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Grid { width, height, fill, cells: vec![fill; (width * height) as usize] }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Restores every cell to the fill value without reallocating.
    pub fn reset(&mut self) {
        let fill = self.fill;
        self.cells.fill(fill);
    }

    pub fn contains(&self, at: Coord) -> bool {
        at.x >= 0 && at.x < self.width && at.y >= 0 && at.y < self.height
    }

    fn offset(&self, x: i32, y: i32) -> usize {
        assert!(
            x >= 0 && x < self.width && y >= 0 && y < self.height,
            "({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        (y * self.width + x) as usize
    }
}

impl<T: Copy> Index<(i32, i32)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (i32, i32)) -> &T {
        &self.cells[self.offset(x, y)]
    }
}

impl<T: Copy> IndexMut<(i32, i32)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (i32, i32)) -> &mut T {
        let at = self.offset(x, y);
        &mut self.cells[at]
    }
}

impl<T: Copy> Index<Coord> for Grid<T> {
    type Output = T;

    fn index(&self, at: Coord) -> &T {
        &self.cells[self.offset(at.x, at.y)]
    }
}

impl<T: Copy> IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, at: Coord) -> &mut T {
        let at = self.offset(at.x, at.y);
        &mut self.cells[at]
    }
}
