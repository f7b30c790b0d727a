use crate::grid::{Grid, Position};
use tracing::debug;

/// What a visibility sweep means for the route being walked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    /// Nothing newly revealed lies on the remaining route
    Clear,
    /// The route is blocked, discovered while standing on the run's origin
    InvalidatedAtStart,
    /// The route is blocked, discovered anywhere else
    InvalidatedElsewhere,
}

impl Sighting {
    pub fn is_invalidated(self) -> bool {
        !matches!(self, Sighting::Clear)
    }
}

/// Fog-of-war: lurking obstacles become impassable once the agent comes
/// within `radius` of them. Discovery is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FogOfWar {
    radius: u32,
}

impl FogOfWar {
    pub fn new(radius: u32) -> Self {
        FogOfWar { radius }
    }

    /// Reveal every lurking obstacle within Euclidean distance `radius` of
    /// `center` and return the cells that were newly marked impassable.
    pub fn reveal_around(&self, grid: &mut Grid, center: Position) -> Vec<Position> {
        let r = self.radius as i32;
        let limit = (self.radius as i64) * (self.radius as i64);
        let mut revealed = Vec::new();

        for dx in -r..=r {
            for dy in -r..=r {
                let pos = Position::new(center.x + dx, center.y + dy);
                if center.distance_squared(&pos) > limit {
                    continue;
                }
                let hidden = grid
                    .get(pos)
                    .is_some_and(|cell| cell.is_lurking() && cell.passable);
                if hidden && grid.set_impassable(pos) {
                    revealed.push(pos);
                }
            }
        }

        if !revealed.is_empty() {
            debug!(%center, count = revealed.len(), "obstacles revealed");
        }
        revealed
    }

    /// Reveal around `center` and classify the result against the part of the
    /// route not yet walked. `remaining` starts with the cell just entered.
    pub fn survey(
        &self,
        grid: &mut Grid,
        center: Position,
        remaining: &[Position],
        origin: Position,
    ) -> Sighting {
        let revealed = self.reveal_around(grid, center);
        let blocked = revealed.iter().any(|pos| remaining.contains(pos));

        match (blocked, center == origin) {
            (false, _) => Sighting::Clear,
            (true, true) => Sighting::InvalidatedAtStart,
            (true, false) => Sighting::InvalidatedElsewhere,
        }
    }
}
