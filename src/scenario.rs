use crate::error::{Error, Result};
use crate::grid::{Grid, Position};
use serde::{Deserialize, Serialize};

/// A waypoint the agent must reach, with the unlock alternatives offered there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub target: Position,
    /// Obstacle types the agent may unlock once the target is reached
    #[serde(default)]
    pub alternatives: Vec<u32>,
}

impl Objective {
    pub fn new(x: i32, y: i32) -> Self {
        Objective {
            target: Position::new(x, y),
            alternatives: Vec::new(),
        }
    }

    pub fn with_alternatives(mut self, alternatives: &[u32]) -> Self {
        self.alternatives = alternatives.to_vec();
        self
    }

    pub fn has_alternatives(&self) -> bool {
        !self.alternatives.is_empty()
    }
}

/// Everything a run needs: the grid, sight radius, origin and objectives
#[derive(Debug, Clone)]
pub struct Scenario {
    pub grid: Grid,
    pub radius: u32,
    pub start: Position,
    pub objectives: Vec<Objective>,
}

impl Scenario {
    /// Check that the start and every objective lie inside the grid
    pub fn validate(&self) -> Result<()> {
        let positions = std::iter::once(self.start)
            .chain(self.objectives.iter().map(|o| o.target));
        for position in positions {
            if !self.grid.contains(position) {
                return Err(Error::OutOfBounds {
                    position,
                    width: self.grid.width,
                    height: self.grid.height,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_outside_objective() {
        let scenario = Scenario {
            grid: Grid::new(2, 2),
            radius: 1,
            start: Position::new(0, 0),
            objectives: vec![Objective::new(1, 1), Objective::new(2, 1)],
        };
        match scenario.validate() {
            Err(Error::OutOfBounds { position, .. }) => assert_eq!(position, Position::new(2, 1)),
            other => panic!("expected out of bounds, got {:?}", other),
        }
    }

    #[test]
    fn test_alternatives_builder() {
        let objective = Objective::new(3, 4).with_alternatives(&[2, 5]);
        assert!(objective.has_alternatives());
        assert_eq!(objective.alternatives, vec![2, 5]);
        assert!(!Objective::new(0, 0).has_alternatives());
    }
}
