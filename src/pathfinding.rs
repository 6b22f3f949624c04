use crate::geometry::Point;
use crate::grid::{Cell, GridIndex};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;

/// Which planner (or the recorder) produced a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteKind {
    Shortest,
    Longest,
    Retrace,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteKind::Shortest => "shortest",
            RouteKind::Longest => "longest",
            RouteKind::Retrace => "retrace",
        };
        f.write_str(name)
    }
}

/// Ordered, kind-tagged waypoint sequence. Empty means no route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    kind: RouteKind,
    waypoints: Vec<Point>,
}

/// A labeled point part-way along a route
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressMarker {
    pub label: String,
    pub index: usize,
    pub position: Point,
}

impl Route {
    pub fn new(kind: RouteKind, waypoints: Vec<Point>) -> Self {
        Route { kind, waypoints }
    }

    pub fn empty(kind: RouteKind) -> Self {
        Route::new(kind, Vec::new())
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.waypoints.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of segments between waypoints
    pub fn steps(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Total Euclidean length in world units
    pub fn length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }

    /// Level progress flags at roughly a quarter and a third of the way along.
    ///
    /// Only routes with more than 8 waypoints get markers. Indices that
    /// collapse to the same waypoint produce a single marker, and markers
    /// never sit on the first or last waypoint.
    pub fn progress_markers(&self) -> Vec<ProgressMarker> {
        let n = self.waypoints.len();
        if n <= 8 {
            return Vec::new();
        }

        let mut indices = vec![n / 4, n / 3];
        indices.dedup();

        indices
            .into_iter()
            .zip(["1/4", "1/3"])
            .map(|(idx, label)| {
                let index = idx.clamp(1, n - 2);
                ProgressMarker {
                    label: label.to_string(),
                    index,
                    position: self.waypoints[index],
                }
            })
            .collect()
    }
}

/// Frontier entry for the shortest-route search
#[derive(Debug, Clone, Copy)]
struct FrontierNode {
    estimate: u32,
    cost: u32,
    /// Remaining ties go to the lower column, then the lower row
    col: i32,
    row: i32,
    cell: usize,
    parent: Option<usize>,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierNode {}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on every key: BinaryHeap is a max-heap
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.cost.cmp(&self.cost))
            .then_with(|| other.col.cmp(&self.col))
            .then_with(|| other.row.cmp(&self.row))
    }
}

/// Exact shortest route between two world points (A*, 4-connected, unit cost).
///
/// Returns an empty route if either endpoint maps to a blocked cell or the
/// goal cannot be reached.
pub fn shortest_route(grid: &GridIndex, start: Point, goal: Point) -> Route {
    let start_cell = grid.world_to_cell(start);
    let goal_cell = grid.world_to_cell(goal);

    trace!(
        "[shortest_route] ({},{}) -> ({},{})",
        start_cell.col,
        start_cell.row,
        goal_cell.col,
        goal_cell.row
    );

    if grid.is_blocked(start_cell) || grid.is_blocked(goal_cell) {
        debug!("[shortest_route] start or goal cell is blocked");
        return Route::empty(RouteKind::Shortest);
    }

    let heuristic = |cell: Cell| cell.manhattan(&goal_cell) as u32;

    let cell_count = grid.cell_count();
    let start_id = grid.get_id(start_cell.col, start_cell.row);
    let goal_id = grid.get_id(goal_cell.col, goal_cell.row);

    let mut best_cost = vec![u32::MAX; cell_count];
    let mut finalized = vec![false; cell_count];
    let mut came_from: Vec<Option<usize>> = vec![None; cell_count];
    let mut frontier = BinaryHeap::new();

    best_cost[start_id] = 0;
    frontier.push(FrontierNode {
        estimate: heuristic(start_cell),
        cost: 0,
        col: start_cell.col,
        row: start_cell.row,
        cell: start_id,
        parent: None,
    });

    let mut expanded = 0usize;
    while let Some(node) = frontier.pop() {
        if finalized[node.cell] {
            continue;
        }
        finalized[node.cell] = true;
        came_from[node.cell] = node.parent;
        expanded += 1;

        if node.cell == goal_id {
            break;
        }

        let current = grid.get_cell(node.cell);
        for next in grid.neighbors(current) {
            let next_id = grid.get_id(next.col, next.row);
            let cost = node.cost + 1;
            if cost < best_cost[next_id] {
                best_cost[next_id] = cost;
                frontier.push(FrontierNode {
                    estimate: cost + heuristic(next),
                    cost,
                    col: next.col,
                    row: next.row,
                    cell: next_id,
                    parent: Some(node.cell),
                });
            }
        }
    }

    if !finalized[goal_id] {
        debug!("[shortest_route] no route after expanding {} cells", expanded);
        return Route::empty(RouteKind::Shortest);
    }

    let cells = walk_back(goal_id, &came_from);
    debug!(
        "[shortest_route] found {} waypoints, expanded {} cells",
        cells.len(),
        expanded
    );
    to_route(grid, RouteKind::Shortest, &cells)
}

/// Breadth-first sweep result
struct Sweep {
    farthest: usize,
    distance: Vec<u32>,
    came_from: Vec<Option<usize>>,
}

/// Breadth-first search from `origin`. The farthest cell is the first one
/// discovered at the maximum distance.
fn sweep(grid: &GridIndex, origin: usize) -> Sweep {
    let cell_count = grid.cell_count();
    let mut distance = vec![u32::MAX; cell_count];
    let mut came_from: Vec<Option<usize>> = vec![None; cell_count];
    let mut queue = VecDeque::new();

    distance[origin] = 0;
    queue.push_back(origin);
    let mut farthest = origin;

    while let Some(id) = queue.pop_front() {
        let current = grid.get_cell(id);
        for next in grid.neighbors(current) {
            let next_id = grid.get_id(next.col, next.row);
            if distance[next_id] != u32::MAX {
                continue;
            }
            distance[next_id] = distance[id] + 1;
            came_from[next_id] = Some(id);
            if distance[next_id] > distance[farthest] {
                farthest = next_id;
            }
            queue.push_back(next_id);
        }
    }

    Sweep {
        farthest,
        distance,
        came_from,
    }
}

/// Approximate longest route via a double breadth-first eccentricity sweep.
///
/// This is a cheap lower bound on the maze's graph diameter, not the longest
/// simple path. A blocked start cell is replaced by the first free cell in
/// row-major order; a fully blocked grid yields an empty route.
pub fn longest_route_approx(grid: &GridIndex, start: Point) -> Route {
    let mut start_cell = grid.world_to_cell(start);
    if grid.is_blocked(start_cell) {
        match grid.first_free_cell() {
            Some(cell) => {
                debug!(
                    "[longest_route_approx] start ({},{}) blocked, using ({},{})",
                    start_cell.col, start_cell.row, cell.col, cell.row
                );
                start_cell = cell;
            }
            None => {
                debug!("[longest_route_approx] grid is fully blocked");
                return Route::empty(RouteKind::Longest);
            }
        }
    }

    let start_id = grid.get_id(start_cell.col, start_cell.row);
    let first = sweep(grid, start_id);
    let a = first.farthest;
    let second = sweep(grid, a);
    let b = second.farthest;

    trace!(
        "[longest_route_approx] eccentricity from start {}, sweep distance {}",
        first.distance[a],
        second.distance[b]
    );

    let cells = walk_back(b, &second.came_from);
    to_route(grid, RouteKind::Longest, &cells)
}

/// Follow predecessor links back from `end` and return the chain in forward order
fn walk_back(end: usize, came_from: &[Option<usize>]) -> Vec<usize> {
    let mut cells = vec![end];
    let mut current = end;
    while let Some(prev) = came_from[current] {
        cells.push(prev);
        current = prev;
    }
    cells.reverse();
    cells
}

fn to_route(grid: &GridIndex, kind: RouteKind, cells: &[usize]) -> Route {
    let waypoints = cells
        .iter()
        .map(|&id| grid.cell_to_waypoint(grid.get_cell(id)))
        .collect();
    Route::new(kind, waypoints)
}

/// Format route for display
pub fn format_route(route: &Route) -> String {
    if route.is_empty() {
        return "No route".to_string();
    }

    let mut result = String::new();
    for (i, p) in route.waypoints().iter().enumerate() {
        if i > 0 {
            result.push_str(" -> ");
        }
        result.push_str(&format!("({},{})", p.x, p.y));
    }
    result
}
