use crate::geometry::{Obstacle, Point};
use log::{debug, warn};

/// A grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(col: i32, row: i32) -> Self {
        Cell { col, row }
    }

    /// Manhattan distance in cell steps
    pub fn manhattan(&self, other: &Cell) -> i32 {
        (self.col - other.col).abs() + (self.row - other.row).abs()
    }
}

/// Blocked/free lookup rasterized from obstacle rectangles at a fixed cell size.
///
/// Built once per obstacle layout and never patched; a layout or cell size
/// change means building a new index. Cells are stored densely, indexed by
/// `col + row * cols`.
#[derive(Clone, Debug)]
pub struct GridIndex {
    pub cols: i32,
    pub rows: i32,
    pub cell_size: i32,
    blocked: Vec<bool>,
}

impl GridIndex {
    /// Rasterize `obstacles` over a `world_width` x `world_height` world.
    ///
    /// A cell is blocked iff it overlaps an obstacle by positive area. The
    /// right and bottom edges of each rectangle are exclusive, so a wall
    /// ending exactly on a cell boundary never marks the next cell.
    pub fn build(obstacles: &[Obstacle], world_width: i32, world_height: i32, cell_size: i32) -> Self {
        let cell_size = cell_size.max(1);
        let mut cols = ceil_div(world_width.max(0), cell_size);
        let mut rows = ceil_div(world_height.max(0), cell_size);
        let len = match dense_len(cols, rows) {
            Some(len) => len,
            None => {
                warn!(
                    "[GridIndex] {}x{} cells overflow the dense index, using an empty grid",
                    cols, rows
                );
                cols = 0;
                rows = 0;
                0
            }
        };
        let mut grid = GridIndex {
            cols,
            rows,
            cell_size,
            blocked: vec![false; len],
        };

        for obstacle in obstacles {
            if obstacle.is_empty() {
                continue;
            }
            let x0 = obstacle.left().div_euclid(cell_size).max(0);
            let y0 = obstacle.top().div_euclid(cell_size).max(0);
            let x1 = (obstacle.right() - 1).div_euclid(cell_size).min(cols - 1);
            let y1 = (obstacle.bottom() - 1).div_euclid(cell_size).min(rows - 1);

            for cy in y0..=y1 {
                for cx in x0..=x1 {
                    let id = grid.get_id(cx, cy);
                    grid.blocked[id] = true;
                }
            }
        }

        debug!(
            "[GridIndex] built {}x{} cells (cell_size={}) from {} obstacles, {} blocked",
            cols,
            rows,
            cell_size,
            obstacles.len(),
            grid.blocked_count()
        );

        grid
    }

    /// Number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.blocked.len()
    }

    /// Convert (col, row) to a dense cell index. Caller must pass in-bounds coordinates.
    pub fn get_id(&self, col: i32, row: i32) -> usize {
        col as usize + row as usize * self.cols as usize
    }

    /// Convert a dense cell index back to a cell
    pub fn get_cell(&self, id: usize) -> Cell {
        let cols = self.cols as usize;
        Cell::new((id % cols) as i32, (id / cols) as i32)
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && col < self.cols && row >= 0 && row < self.rows
    }

    /// Check if a cell is blocked. Out of bounds is considered blocked.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        if !self.in_bounds(cell.col, cell.row) {
            return true;
        }
        self.blocked[self.get_id(cell.col, cell.row)]
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| b).count()
    }

    /// All blocked cells in row-major order
    pub fn blocked_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(id, _)| self.get_cell(id))
    }

    /// First free cell scanning rows top to bottom, columns left to right
    pub fn first_free_cell(&self) -> Option<Cell> {
        self.blocked
            .iter()
            .position(|&b| !b)
            .map(|id| self.get_cell(id))
    }

    /// Map a world point to its cell, clamped into the grid even for points
    /// outside the world rectangle.
    pub fn world_to_cell(&self, point: Point) -> Cell {
        let cs = self.cell_size as f32;
        let col = (point.x / cs).floor() as i32;
        let row = (point.y / cs).floor() as i32;
        Cell::new(
            col.min(self.cols - 1).max(0),
            row.min(self.rows - 1).max(0),
        )
    }

    /// Geometric center of a cell in world coordinates
    pub fn cell_to_waypoint(&self, cell: Cell) -> Point {
        let cs = self.cell_size as f32;
        Point::new((cell.col as f32 + 0.5) * cs, (cell.row as f32 + 0.5) * cs)
    }

    /// In-bounds, unblocked cardinal neighbors in the order +col, -col, +row, -row.
    ///
    /// Both planners depend on this order for reproducible tie-breaking.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(move |(dc, dr)| Cell::new(cell.col + dc, cell.row + dr))
            .filter(move |&n| !self.is_blocked(n))
    }
}

/// Ceiling division for non-negative `value` and positive `divisor`
fn ceil_div(value: i32, divisor: i32) -> i32 {
    let value = i64::from(value);
    let divisor = i64::from(divisor);
    ((value + divisor - 1) / divisor) as i32
}

/// Dense array length for a `cols` x `rows` grid, `None` if it overflows
fn dense_len(cols: i32, rows: i32) -> Option<usize> {
    let cols = usize::try_from(cols).ok()?;
    let rows = usize::try_from(rows).ok()?;
    cols.checked_mul(rows)
}
