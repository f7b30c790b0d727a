//! Look-ahead choice between unlock alternatives.
//!
//! Each alternative is tried on a private clone of the live grid; the live
//! grid is only changed by the navigator once a choice has been made.

use crate::grid::{Grid, Position};
use crate::pathfinding::{find_path, path_cost};
use tracing::debug;

/// Outcome of trying one alternative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub alternative: u32,
    /// Cost of reaching the next objective after the unlock, `None` if unreachable
    pub cost: Option<f64>,
}

/// The alternative picked for commitment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    pub alternative: u32,
    pub cost: f64,
}

/// Simulate every alternative, in listed order, from `from` to `next_target`
pub fn evaluate_alternatives(
    grid: &Grid,
    from: Position,
    alternatives: &[u32],
    next_target: Position,
) -> Vec<Assessment> {
    alternatives
        .iter()
        .map(|&alternative| {
            let mut trial = grid.clone();
            trial.convert_type_to_passable(alternative);
            let cost = find_path(&trial, from, next_target)
                .map(|route| path_cost(&trial, &route.cells));
            debug!(alternative, ?cost, "alternative assessed");
            Assessment { alternative, cost }
        })
        .collect()
}

/// Pick the alternative with the strictly smallest cost to `next_target`.
///
/// Earlier alternatives win ties. Returns `None` when no alternative makes
/// the next objective reachable.
pub fn choose_alternative(
    grid: &Grid,
    from: Position,
    alternatives: &[u32],
    next_target: Position,
) -> Option<Choice> {
    let mut best: Option<Choice> = None;
    for assessment in evaluate_alternatives(grid, from, alternatives, next_target) {
        let Some(cost) = assessment.cost else {
            continue;
        };
        if best.map_or(true, |b| cost < b.cost) {
            best = Some(Choice {
                alternative: assessment.alternative,
                cost,
            });
        }
    }
    best
}
