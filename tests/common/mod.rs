#![allow(dead_code)]

use fogwalk::loader::load_scenario;
use fogwalk::{Event, Grid, Navigator, Objective, Position, RunReport, Scenario, SimulationConfig};
use std::path::Path;

/// Build a grid from text rows, top row first, every edge at `cost`.
///
/// `.` open, `#` wall, `2`-`9` lurking obstacle of that type.
/// The bottom row is `y = 0`, so the picture reads the way it is drawn.
pub fn grid_from_rows(rows: &[&str], cost: f64) -> Grid {
    let height = rows.len() as i32;
    let width = rows[0].chars().count() as i32;
    let mut kinds = vec![0u32; (width * height) as usize];

    for (row, line) in rows.iter().enumerate() {
        let y = height - 1 - row as i32;
        for (x, ch) in line.chars().enumerate() {
            let kind = match ch {
                '.' => 0,
                '#' => 1,
                d if d.is_ascii_digit() => d.to_digit(10).unwrap_or(0),
                other => panic!("unknown grid symbol {:?}", other),
            };
            kinds[(x as i32 + y * width) as usize] = kind;
        }
    }

    Grid::uniform(width, height, &kinds, cost)
}

pub fn scenario(grid: Grid, radius: u32, start: (i32, i32), objectives: Vec<Objective>) -> Scenario {
    Scenario {
        grid,
        radius,
        start: Position::new(start.0, start.1),
        objectives,
    }
}

/// Run a scenario and collect its events
pub fn run(scenario: Scenario, config: &SimulationConfig) -> (Vec<Event>, RunReport) {
    let mut events = Vec::new();
    let report = Navigator::new(scenario, config).run(&mut events);
    (events, report)
}

/// Cells the agent stepped onto, in order
pub fn moves(events: &[Event]) -> Vec<Position> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Moved { to } => Some(*to),
            _ => None,
        })
        .collect()
}

pub fn count_impassable(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::PathImpassable { .. }))
        .count()
}

/// Load a fixture directory holding land.txt, edges.txt and objectives.txt
pub fn load_fixture(dir: &Path) -> Scenario {
    load_scenario(
        &dir.join("land.txt"),
        &dir.join("edges.txt"),
        &dir.join("objectives.txt"),
    )
    .unwrap_or_else(|e| panic!("failed to load {}: {}", dir.display(), e))
}

/// Cheapest cost by trying every simple path. Only for tiny grids.
pub fn exhaustive_min_cost(grid: &Grid, start: Position, target: Position) -> Option<f64> {
    fn search(
        grid: &Grid,
        at: Position,
        target: Position,
        cost: f64,
        visited: &mut Vec<bool>,
        best: &mut Option<f64>,
    ) {
        if at == target {
            if best.map_or(true, |b| cost < b) {
                *best = Some(cost);
            }
            return;
        }
        for (_, next, weight) in grid.neighbors(at) {
            let id = grid.id(next);
            if visited[id] || !grid[next].passable {
                continue;
            }
            visited[id] = true;
            search(grid, next, target, cost + weight, visited, best);
            visited[id] = false;
        }
    }

    let mut visited = vec![false; grid.len()];
    visited[grid.id(start)] = true;
    let mut best = None;
    search(grid, start, target, 0.0, &mut visited, &mut best);
    best
}

/// Visualize a route on a grid, top row first
pub fn visualize_route(grid: &Grid, route: &[Position]) -> String {
    let mut result = String::new();
    for y in (0..grid.height).rev() {
        for x in 0..grid.width {
            let pos = Position::new(x, y);
            let cell = &grid[pos];
            let symbol = if route.first() == Some(&pos) {
                'S'
            } else if route.last() == Some(&pos) {
                'D'
            } else if route.contains(&pos) {
                '*'
            } else if !cell.passable {
                '█'
            } else {
                '.'
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}
