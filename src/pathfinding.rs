use crate::grid::{Grid, Position};
use crate::heap::MinHeap;
use tracing::{debug, trace};

/// A planned route: the visited cells, start first, and their summed edge cost
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub cells: Vec<Position>,
    pub cost: f64,
}

impl Route {
    pub fn start(&self) -> Position {
        self.cells[0]
    }

    pub fn target(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }

    /// Number of moves needed to walk the route
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// Find the cheapest route from `start` to `target` with Dijkstra's algorithm.
///
/// Only passable cells are entered. The start is always expanded, even when
/// it has just been marked impassable under the agent's feet. Returns `None`
/// when the target cannot be reached under the current passability.
///
/// Panics if either position lies outside the grid.
pub fn find_path(grid: &Grid, start: Position, target: Position) -> Option<Route> {
    let start_id = grid.id(start);
    let target_id = grid.id(target);

    let mut distances = vec![f64::INFINITY; grid.len()];
    let mut previous: Vec<Option<usize>> = vec![None; grid.len()];
    distances[start_id] = 0.0;

    let mut queue = MinHeap::with_capacity(grid.len());
    queue.push(start_id, |&id: &usize| distances[id]);

    let mut expanded = 0usize;
    while let Some(id) = queue.pop_min(|&id: &usize| distances[id]) {
        expanded += 1;
        if id == target_id {
            let route = Route {
                cells: reconstruct(grid, &previous, target_id),
                cost: distances[target_id],
            };
            debug!(
                %start, %target, cost = route.cost, steps = route.steps(), expanded,
                "route found"
            );
            return Some(route);
        }

        let current = grid.get_coords(id);
        for (_, next, weight) in grid.neighbors(current) {
            if !grid[next].passable {
                continue;
            }
            let next_id = grid.id(next);
            let candidate = distances[id] + weight;
            if candidate < distances[next_id] {
                trace!(from = %current, to = %next, distance = candidate, "relaxed");
                distances[next_id] = candidate;
                previous[next_id] = Some(id);
                queue.push(next_id, |&id: &usize| distances[id]);
            }
        }
    }

    debug!(%start, %target, expanded, "target unreachable");
    None
}

/// Walk predecessor links back from the target and reverse them
fn reconstruct(grid: &Grid, previous: &[Option<usize>], target_id: usize) -> Vec<Position> {
    let mut cells = Vec::new();
    let mut current = Some(target_id);
    while let Some(id) = current {
        cells.push(grid.get_coords(id));
        current = previous[id];
    }
    cells.reverse();
    cells
}

/// Sum of the direction-specific edge costs along consecutive cells.
/// A pair without an edge contributes `f64::INFINITY`.
pub fn path_cost(grid: &Grid, cells: &[Position]) -> f64 {
    let mut total = 0.0;
    for pair in cells.windows(2) {
        total += grid.edge_cost(pair[0], pair[1]).unwrap_or(f64::INFINITY);
    }
    total
}

/// Format path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(Position::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WALL;

    fn open_grid(width: i32, height: i32) -> Grid {
        Grid::uniform(width, height, &[], 1.0)
    }

    #[test]
    fn test_straight_line() {
        let grid = open_grid(5, 1);
        let route = find_path(&grid, Position::new(0, 0), Position::new(4, 0)).unwrap();
        assert_eq!(route.cells.len(), 5);
        assert_eq!(route.cost, 4.0);
        assert_eq!(route.start(), Position::new(0, 0));
        assert_eq!(route.target(), Position::new(4, 0));
    }

    #[test]
    fn test_start_equals_target() {
        let grid = open_grid(3, 3);
        let here = Position::new(1, 1);
        let route = find_path(&grid, here, here).unwrap();
        assert_eq!(route.cells, vec![here]);
        assert_eq!(route.cost, 0.0);
        assert_eq!(route.steps(), 0);
    }

    #[test]
    fn test_prefers_cheap_detour() {
        // Direct edge costs 10, the way around costs 3.
        let mut grid = open_grid(2, 2);
        grid.set_edge(Position::new(0, 0), Position::new(1, 0), 10.0).unwrap();
        let route = find_path(&grid, Position::new(0, 0), Position::new(1, 0)).unwrap();
        assert_eq!(route.cost, 3.0);
        assert_eq!(
            route.cells,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(1, 0),
            ]
        );
    }

    #[test]
    fn test_walled_off_target_is_unreachable() {
        let mut grid = open_grid(3, 3);
        for y in 0..3 {
            grid.set_cell_type(Position::new(1, y), WALL);
        }
        assert!(find_path(&grid, Position::new(0, 0), Position::new(2, 2)).is_none());
    }

    #[test]
    fn test_missing_edge_blocks_adjacent_cells() {
        let mut grid = Grid::new(2, 1);
        assert!(find_path(&grid, Position::new(0, 0), Position::new(1, 0)).is_none());
        grid.set_edge(Position::new(0, 0), Position::new(1, 0), 2.5).unwrap();
        let route = find_path(&grid, Position::new(0, 0), Position::new(1, 0)).unwrap();
        assert_eq!(route.cost, 2.5);
    }

    #[test]
    fn test_impassable_start_still_expands() {
        let mut grid = Grid::uniform(3, 1, &[0, 2, 0], 1.0);
        grid.set_impassable(Position::new(1, 0));
        let route = find_path(&grid, Position::new(1, 0), Position::new(2, 0)).unwrap();
        assert_eq!(route.cells, vec![Position::new(1, 0), Position::new(2, 0)]);
    }

    #[test]
    fn test_path_cost_matches_route_cost() {
        let mut grid = open_grid(4, 4);
        grid.set_edge(Position::new(1, 1), Position::new(2, 1), 4.0).unwrap();
        grid.set_edge(Position::new(0, 3), Position::new(1, 3), 0.5).unwrap();
        let route = find_path(&grid, Position::new(0, 0), Position::new(3, 3)).unwrap();
        assert_eq!(path_cost(&grid, &route.cells), route.cost);
    }

    #[test]
    fn test_format_path() {
        let path = [Position::new(0, 0), Position::new(1, 0)];
        assert_eq!(format_path(&path), "0-0 -> 1-0");
        assert_eq!(format_path(&[]), "No path");
    }
}
