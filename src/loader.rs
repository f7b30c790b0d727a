//! Parsers for the three plain-text scenario inputs.
//!
//! Land:
//! ```text
//! W H
//! x y type
//! ...
//! ```
//! Every cell of the `W x H` grid must be listed exactly once.
//!
//! Edges, one symmetric weight per adjacent pair:
//! ```text
//! x1-y1,x2-y2 weight
//! ```
//! A weight of exactly `NO_EDGE` leaves the pair unconnected.
//!
//! Objectives:
//! ```text
//! radius
//! start_x start_y
//! x y [alternative ...]
//! ```

use crate::error::{Error, Result};
use crate::grid::{Grid, Position};
use crate::scenario::{Objective, Scenario};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

const LAND: &str = "land";
const EDGES: &str = "edges";
const OBJECTIVES: &str = "objectives";

/// Edge weight that marks a pair of cells as unconnected
pub const NO_EDGE: f64 = 100_000_001.0;

/// Sight radius, origin and objectives read from the objectives input
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveList {
    pub radius: u32,
    pub start: Position,
    pub objectives: Vec<Objective>,
}

/// Non-blank lines with their 1-based line numbers
fn numbered_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn parse_error(source_name: &'static str, line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        source_name,
        line,
        message: message.into(),
    }
}

fn parse_field<T: FromStr>(source_name: &'static str, line: usize, field: &str, what: &str) -> Result<T> {
    field
        .parse()
        .map_err(|_| parse_error(source_name, line, format!("invalid {}: {:?}", what, field)))
}

/// Split a line into exactly `N` whitespace-separated fields
fn fields<'a, const N: usize>(source_name: &'static str, line: usize, text: &'a str) -> Result<[&'a str; N]> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    parts
        .try_into()
        .map_err(|parts: Vec<&str>| {
            parse_error(source_name, line, format!("expected {} fields, found {}", N, parts.len()))
        })
}

fn out_of_bounds(grid: &Grid, position: Position) -> Error {
    Error::OutOfBounds {
        position,
        width: grid.width,
        height: grid.height,
    }
}

/// Parse the land description into a grid with no edges
pub fn parse_land(source: &str) -> Result<Grid> {
    let mut lines = numbered_lines(source);
    let (line, header) = lines
        .next()
        .ok_or_else(|| parse_error(LAND, 1, "missing grid dimensions"))?;
    let [w, h] = fields::<2>(LAND, line, header)?;
    let width: i32 = parse_field(LAND, line, w, "width")?;
    let height: i32 = parse_field(LAND, line, h, "height")?;
    if width <= 0 || height <= 0 {
        return Err(parse_error(LAND, line, format!("grid must not be empty, got {}x{}", width, height)));
    }
    if width.checked_mul(height).is_none() {
        return Err(parse_error(LAND, line, format!("grid of {}x{} cells is too large", width, height)));
    }

    let mut grid = Grid::new(width, height);
    let mut seen = vec![false; grid.len()];

    for (line, text) in lines {
        let [x, y, kind] = fields::<3>(LAND, line, text)?;
        let position = Position::new(
            parse_field(LAND, line, x, "x coordinate")?,
            parse_field(LAND, line, y, "y coordinate")?,
        );
        let kind: u32 = parse_field(LAND, line, kind, "cell type")?;

        let id = grid.get_id(position).ok_or_else(|| out_of_bounds(&grid, position))?;
        if std::mem::replace(&mut seen[id], true) {
            return Err(Error::DuplicateCell(position));
        }
        grid.set_cell_type(position, kind);
    }

    if let Some(id) = seen.iter().position(|&listed| !listed) {
        return Err(Error::MissingCell(grid.get_coords(id)));
    }
    Ok(grid)
}

fn parse_coordinate_pair(line: usize, text: &str) -> Result<Position> {
    let (x, y) = text
        .split_once('-')
        .ok_or_else(|| parse_error(EDGES, line, format!("expected x-y, found {:?}", text)))?;
    Ok(Position::new(
        parse_field(EDGES, line, x, "x coordinate")?,
        parse_field(EDGES, line, y, "y coordinate")?,
    ))
}

/// Apply edge records to `grid`. Returns the number of edges set; records
/// carrying `NO_EDGE` remove the pair instead and are not counted.
pub fn parse_edges(grid: &mut Grid, source: &str) -> Result<usize> {
    let mut count = 0;
    for (line, text) in numbered_lines(source) {
        let [pair, weight] = fields::<2>(EDGES, line, text)?;
        let (a, b) = pair
            .split_once(',')
            .ok_or_else(|| parse_error(EDGES, line, format!("expected a pair of cells, found {:?}", pair)))?;
        let a = parse_coordinate_pair(line, a)?;
        let b = parse_coordinate_pair(line, b)?;
        let weight: f64 = parse_field(EDGES, line, weight, "weight")?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(parse_error(EDGES, line, format!("weight must be finite and non-negative, got {}", weight)));
        }
        if weight == NO_EDGE {
            grid.remove_edge(a, b)?;
            continue;
        }
        grid.set_edge(a, b, weight)?;
        count += 1;
    }
    Ok(count)
}

/// Parse the objectives input
pub fn parse_objectives(source: &str) -> Result<ObjectiveList> {
    let mut lines = numbered_lines(source);

    let (line, text) = lines
        .next()
        .ok_or_else(|| parse_error(OBJECTIVES, 1, "missing visibility radius"))?;
    let [radius] = fields::<1>(OBJECTIVES, line, text)?;
    let radius: u32 = parse_field(OBJECTIVES, line, radius, "radius")?;

    let (line, text) = lines
        .next()
        .ok_or_else(|| parse_error(OBJECTIVES, line + 1, "missing start position"))?;
    let [x, y] = fields::<2>(OBJECTIVES, line, text)?;
    let start = Position::new(
        parse_field(OBJECTIVES, line, x, "x coordinate")?,
        parse_field(OBJECTIVES, line, y, "y coordinate")?,
    );

    let mut objectives = Vec::new();
    for (line, text) in lines {
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(parse_error(OBJECTIVES, line, "expected x y and optional alternatives"));
        }
        let mut objective = Objective::new(
            parse_field(OBJECTIVES, line, parts[0], "x coordinate")?,
            parse_field(OBJECTIVES, line, parts[1], "y coordinate")?,
        );
        for part in &parts[2..] {
            objective.alternatives.push(parse_field(OBJECTIVES, line, part, "alternative")?);
        }
        objectives.push(objective);
    }

    Ok(ObjectiveList {
        radius,
        start,
        objectives,
    })
}

/// Build a scenario from the three inputs held in memory
pub fn parse_scenario(land: &str, edges: &str, objectives: &str) -> Result<Scenario> {
    let mut grid = parse_land(land)?;
    let edge_count = parse_edges(&mut grid, edges)?;
    let list = parse_objectives(objectives)?;

    let scenario = Scenario {
        grid,
        radius: list.radius,
        start: list.start,
        objectives: list.objectives,
    };
    scenario.validate()?;
    info!(
        width = scenario.grid.width,
        height = scenario.grid.height,
        edges = edge_count,
        objectives = scenario.objectives.len(),
        radius = scenario.radius,
        "scenario loaded"
    );
    Ok(scenario)
}

/// Read and parse the three input files
pub fn load_scenario(land: &Path, edges: &Path, objectives: &Path) -> Result<Scenario> {
    parse_scenario(
        &fs::read_to_string(land)?,
        &fs::read_to_string(edges)?,
        &fs::read_to_string(objectives)?,
    )
}
