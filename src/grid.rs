use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Cell type that is always passable
pub const OPEN: u32 = 0;

/// Cell type that is never passable
pub const WALL: u32 = 1;

/// A position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The adjacent position one step in `direction`
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance, exact for integer coordinates
    pub fn distance_squared(&self, other: &Position) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.x, self.y)
    }
}

/// One of the four axis-aligned moves. `Up` increases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    /// Neighbour enumeration order
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Left, Direction::Up, Direction::Down];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Direction leading from `from` to `to`, if the two are adjacent
    pub fn between(from: Position, to: Position) -> Option<Self> {
        Direction::ALL.into_iter().find(|&d| from.step(d) == to)
    }

    fn slot(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Left => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }
}

/// A single grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// 0 = open, 1 = wall, 2 and above = lurking obstacle
    pub kind: u32,
    pub passable: bool,
    costs: [Option<f64>; 4],
}

impl Cell {
    pub fn new(kind: u32) -> Self {
        Cell {
            kind,
            passable: kind != WALL,
            costs: [None; 4],
        }
    }

    /// Traversal cost when leaving this cell in `direction`, `None` without an edge
    pub fn cost(&self, direction: Direction) -> Option<f64> {
        self.costs[direction.slot()]
    }

    /// True for obstacle types that hide until seen
    pub fn is_lurking(&self) -> bool {
        self.kind >= 2
    }
}

/// Grid of cells stored row-major, `id = x + y * width`
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
    /// Revision number - incremented whenever a cell changes
    revision: u64,
}

impl Grid {
    /// Create a grid with every cell open and no edges
    pub fn new(width: i32, height: i32) -> Self {
        let count = width.max(0) as usize * height.max(0) as usize;
        Grid {
            width,
            height,
            cells: vec![Cell::new(OPEN); count],
            revision: 0,
        }
    }

    /// Create a grid from per-cell types given in row-major order, all edges at `cost`
    pub fn uniform(width: i32, height: i32, kinds: &[u32], cost: f64) -> Self {
        let mut grid = Self::new(width, height);
        for (id, &kind) in kinds.iter().enumerate().take(grid.cells.len()) {
            let pos = grid.get_coords(id);
            grid.set_cell_type(pos, kind);
        }
        for y in 0..height {
            for x in 0..width {
                let here = Position::new(x, y);
                for direction in [Direction::Right, Direction::Up] {
                    let there = here.step(direction);
                    if grid.contains(there) {
                        grid.connect(here, direction, Some(cost));
                    }
                }
            }
        }
        grid
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Convert a position to its cell ID, `None` when out of bounds
    pub fn get_id(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.x + pos.y * self.width) as usize)
    }

    /// Cell ID of an in-bounds position.
    ///
    /// Panics when `pos` lies outside the grid.
    pub fn id(&self, pos: Position) -> usize {
        match self.get_id(pos) {
            Some(id) => id,
            None => panic!(
                "position {} is outside the {}x{} grid",
                pos, self.width, self.height
            ),
        }
    }

    /// Convert a cell ID back to its position
    pub fn get_coords(&self, id: usize) -> Position {
        let id = id as i32;
        Position::new(id % self.width, id / self.width)
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.get_id(pos).map(|id| &self.cells[id])
    }

    /// Iterate over every cell with its position
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(id, cell)| (self.get_coords(id), cell))
    }

    /// Set a cell's type and derive its passability from it
    pub fn set_cell_type(&mut self, pos: Position, kind: u32) {
        let id = self.id(pos);
        let cell = &mut self.cells[id];
        let passable = kind != WALL;
        if cell.kind != kind || cell.passable != passable {
            cell.kind = kind;
            cell.passable = passable;
            self.revision += 1;
        }
    }

    /// Record a symmetric edge between two adjacent cells
    pub fn set_edge(&mut self, a: Position, b: Position, weight: f64) -> Result<()> {
        let direction = self.adjacency(a, b)?;
        self.connect(a, direction, Some(weight));
        Ok(())
    }

    /// Drop the edge between two adjacent cells, if any
    pub fn remove_edge(&mut self, a: Position, b: Position) -> Result<()> {
        let direction = self.adjacency(a, b)?;
        self.connect(a, direction, None);
        Ok(())
    }

    fn adjacency(&self, a: Position, b: Position) -> Result<Direction> {
        for pos in [a, b] {
            if !self.contains(pos) {
                return Err(Error::OutOfBounds {
                    position: pos,
                    width: self.width,
                    height: self.height,
                });
            }
        }
        Direction::between(a, b).ok_or(Error::NotAdjacent(a, b))
    }

    fn connect(&mut self, from: Position, direction: Direction, weight: Option<f64>) {
        let to = from.step(direction);
        let (from_id, to_id) = (self.id(from), self.id(to));
        self.cells[from_id].costs[direction.slot()] = weight;
        self.cells[to_id].costs[direction.opposite().slot()] = weight;
        self.revision += 1;
    }

    /// Cost of the edge between two adjacent cells, `None` when there is no edge
    pub fn edge_cost(&self, from: Position, to: Position) -> Option<f64> {
        let direction = Direction::between(from, to)?;
        let cost = self.get(from)?.cost(direction)?;
        self.contains(to).then_some(cost)
    }

    /// Neighbours reachable over an edge, in right, left, up, down order.
    /// Passability is left to the caller.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = (Direction, Position, f64)> + '_ {
        let cell = &self[pos];
        Direction::ALL.into_iter().filter_map(move |direction| {
            let next = pos.step(direction);
            let cost = cell.cost(direction)?;
            self.contains(next).then_some((direction, next, cost))
        })
    }

    /// Mark a cell impassable. Returns true if it was passable before.
    pub fn set_impassable(&mut self, pos: Position) -> bool {
        let id = self.id(pos);
        let cell = &mut self.cells[id];
        if !cell.passable {
            return false;
        }
        cell.passable = false;
        self.revision += 1;
        true
    }

    /// Turn every cell of type `kind` into an open, passable cell.
    /// Returns the number of cells converted.
    pub fn convert_type_to_passable(&mut self, kind: u32) -> usize {
        let mut converted = 0;
        for cell in self.cells.iter_mut().filter(|c| c.kind == kind) {
            cell.kind = OPEN;
            cell.passable = true;
            converted += 1;
        }
        if converted > 0 {
            self.revision += 1;
        }
        converted
    }

    /// Get current grid revision number
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Index<Position> for Grid {
    type Output = Cell;

    fn index(&self, pos: Position) -> &Cell {
        &self.cells[self.id(pos)]
    }
}
