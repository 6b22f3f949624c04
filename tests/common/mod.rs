#![allow(dead_code)]

use mazenav::{Cell, GridIndex, MazeLayout, Obstacle, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub const CELL: i32 = 40;

/// Parsed ASCII maze fixture
pub struct Fixture {
    pub layout: MazeLayout,
    pub grid: GridIndex,
    pub start: Option<Cell>,
    pub goal: Option<Cell>,
}

/// Parse an ASCII maze
/// Format:
/// - ■: blocked cell
/// - □: free cell
/// - s: start (free)
/// - g: goal (free)
pub fn parse_maze(text: &str) -> Fixture {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    let rows = lines.len() as i32;
    let cols = lines.first().map(|l| l.chars().count()).unwrap_or(0) as i32;

    let mut obstacles = Vec::new();
    let mut start = None;
    let mut goal = None;

    for (y, line) in lines.iter().enumerate() {
        for (x, ch) in line.chars().enumerate() {
            let cell = Cell::new(x as i32, y as i32);
            match ch {
                '■' => obstacles.push(Obstacle::new(cell.col * CELL, cell.row * CELL, CELL, CELL)),
                's' => start = Some(cell),
                'g' => goal = Some(cell),
                _ => {}
            }
        }
    }

    let layout = MazeLayout::new(cols * CELL, rows * CELL, obstacles);
    let grid = GridIndex::build(&layout.obstacles, layout.world_width, layout.world_height, CELL);
    Fixture {
        layout,
        grid,
        start,
        goal,
    }
}

/// World point at the center of a cell
pub fn center(grid: &GridIndex, cell: Cell) -> Point {
    grid.cell_to_waypoint(cell)
}

/// Cell-aligned blocks scattered at `density`, seeded for reproducibility
pub fn random_layout(seed: u64, cols: i32, rows: i32, density: f64) -> MazeLayout {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut obstacles = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            if rng.gen_bool(density) {
                obstacles.push(Obstacle::new(col * CELL, row * CELL, CELL, CELL));
            }
        }
    }
    MazeLayout::new(cols * CELL, rows * CELL, obstacles)
}

/// Brute-force breadth-first step distances from `from`, independent of the planners
pub fn bfs_distances(grid: &GridIndex, from: Cell) -> Vec<Option<u32>> {
    let index = |c: Cell| (c.row * grid.cols + c.col) as usize;
    let mut dist = vec![None; (grid.cols * grid.rows) as usize];
    if grid.is_blocked(from) {
        return dist;
    }

    dist[index(from)] = Some(0);
    let mut queue = VecDeque::from([from]);
    while let Some(c) = queue.pop_front() {
        let d = dist[index(c)].unwrap_or(0);
        for (dc, dr) in [(0, 1), (1, 0), (0, -1), (-1, 0)] {
            let n = Cell::new(c.col + dc, c.row + dr);
            if grid.is_blocked(n) || dist[index(n)].is_some() {
                continue;
            }
            dist[index(n)] = Some(d + 1);
            queue.push_back(n);
        }
    }
    dist
}

/// Step distance between two cells, or None if disconnected
pub fn bfs_distance(grid: &GridIndex, from: Cell, to: Cell) -> Option<u32> {
    if grid.is_blocked(to) {
        return None;
    }
    bfs_distances(grid, from)[(to.row * grid.cols + to.col) as usize]
}

/// True if every consecutive pair of waypoints sits in cardinally adjacent free cells
pub fn is_connected_walk(grid: &GridIndex, waypoints: &[Point]) -> bool {
    let cells: Vec<Cell> = waypoints.iter().map(|&p| grid.world_to_cell(p)).collect();
    cells.iter().all(|&c| !grid.is_blocked(c))
        && cells.windows(2).all(|pair| pair[0].manhattan(&pair[1]) == 1)
}
