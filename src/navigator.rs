//! The navigation controller.
//!
//! For each objective in turn the navigator plans a route over the live grid,
//! walks it one cell at a time while the fog-of-war reveals obstacles, replans
//! from wherever it stands when the route ahead is blocked, and at objectives
//! offering unlock alternatives commits the one that makes the next objective
//! cheapest. An unreachable objective ends the run.

use crate::config::SimulationConfig;
use crate::events::{Event, EventSink};
use crate::grid::{Grid, Position};
use crate::options::choose_alternative;
use crate::pathfinding::{find_path, format_path, Route};
use crate::scenario::{Objective, Scenario};
use crate::visibility::{FogOfWar, Sighting};
use tracing::{debug, info, warn};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every objective was reached
    Completed { objectives: usize },
    /// Objective number `objective` (1-based) could not be reached
    Aborted { objective: usize },
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

/// Final state handed back once a run is over
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub position: Position,
    pub grid: Grid,
}

/// Mutable state of one run. Created by `Navigator::new`, consumed by `run`.
#[derive(Debug, Clone)]
struct RunContext {
    grid: Grid,
    position: Position,
    /// Where the run started
    origin: Position,
}

/// Per-objective state machine
#[derive(Debug)]
enum Phase {
    Planning,
    Walking(Route),
    Reached,
    Blocked,
}

pub struct Navigator {
    context: RunContext,
    fog: FogOfWar,
    objectives: Vec<Objective>,
    initial_sweep: bool,
    max_replans: usize,
}

impl Navigator {
    pub fn new(scenario: Scenario, config: &SimulationConfig) -> Self {
        let max_replans = config.max_replans.unwrap_or(scenario.grid.len() + 1);
        Navigator {
            context: RunContext {
                grid: scenario.grid,
                position: scenario.start,
                origin: scenario.start,
            },
            fog: FogOfWar::new(scenario.radius),
            objectives: scenario.objectives,
            initial_sweep: config.initial_sweep,
            max_replans,
        }
    }

    /// Run every objective in order, reporting to `sink`
    pub fn run(mut self, sink: &mut impl EventSink) -> RunReport {
        if self.initial_sweep {
            let origin = self.context.origin;
            self.fog.reveal_around(&mut self.context.grid, origin);
        }

        let mut outcome = RunOutcome::Completed {
            objectives: self.objectives.len(),
        };
        for index in 0..self.objectives.len() {
            if !self.pursue(index, sink) {
                outcome = RunOutcome::Aborted { objective: index + 1 };
                break;
            }
        }
        info!(?outcome, position = %self.context.position, "run finished");

        RunReport {
            outcome,
            position: self.context.position,
            grid: self.context.grid,
        }
    }

    /// Drive one objective to completion. Returns false if it is unreachable.
    fn pursue(&mut self, index: usize, sink: &mut impl EventSink) -> bool {
        let number = index + 1;
        let target = self.objectives[index].target;
        let mut replans = 0;
        let mut phase = Phase::Planning;

        loop {
            phase = match phase {
                Phase::Planning => {
                    match find_path(&self.context.grid, self.context.position, target) {
                        Some(route) => {
                            debug!(objective = number, route = %format_path(&route.cells), "planned");
                            Phase::Walking(route)
                        }
                        None => Phase::Blocked,
                    }
                }
                Phase::Walking(route) => {
                    if self.walk(&route, sink).is_invalidated() {
                        replans += 1;
                        if replans > self.max_replans {
                            warn!(objective = number, replans, "replan limit exceeded");
                            Phase::Blocked
                        } else {
                            Phase::Planning
                        }
                    } else {
                        Phase::Reached
                    }
                }
                Phase::Reached => {
                    info!(objective = number, %target, replans, "objective reached");
                    sink.record(&Event::ObjectiveReached { objective: number });
                    if self.objectives[index].has_alternatives() {
                        self.decide(index, sink);
                    }
                    return true;
                }
                Phase::Blocked => {
                    info!(objective = number, %target, "objective unreachable");
                    sink.record(&Event::ObjectiveUnreachable { objective: number });
                    return false;
                }
            };
        }
    }

    /// Walk `route` from its second cell, surveying after every move.
    /// Stops at the first step that invalidates the rest of the route.
    fn walk(&mut self, route: &Route, sink: &mut impl EventSink) -> Sighting {
        for (step, &cell) in route.cells.iter().enumerate().skip(1) {
            self.context.position = cell;
            sink.record(&Event::Moved { to: cell });

            let sighting = self.fog.survey(
                &mut self.context.grid,
                cell,
                &route.cells[step..],
                self.context.origin,
            );
            match sighting {
                Sighting::Clear => {}
                Sighting::InvalidatedAtStart => {
                    debug!(at = %cell, "route blocked while at origin, replanning");
                    return sighting;
                }
                Sighting::InvalidatedElsewhere => {
                    debug!(at = %cell, "route blocked, replanning");
                    sink.record(&Event::PathImpassable { at: cell });
                    return sighting;
                }
            }
        }
        Sighting::Clear
    }

    /// Choose and commit an unlock alternative at objective `index`
    fn decide(&mut self, index: usize, sink: &mut impl EventSink) {
        let number = index + 1;
        let alternatives = &self.objectives[index].alternatives;

        let Some(next) = self.objectives.get(index + 1) else {
            debug!(objective = number, "no later objective to weigh alternatives against");
            sink.record(&Event::NoViableAlternative { objective: number });
            return;
        };

        match choose_alternative(&self.context.grid, self.context.position, alternatives, next.target) {
            Some(choice) => {
                let converted = self.context.grid.convert_type_to_passable(choice.alternative);
                info!(
                    objective = number,
                    alternative = choice.alternative,
                    cost = choice.cost,
                    converted,
                    "alternative chosen"
                );
                sink.record(&Event::AlternativeChosen {
                    objective: number,
                    alternative: choice.alternative,
                });
            }
            None => {
                info!(objective = number, ?alternatives, "no alternative reaches the next objective");
                sink.record(&Event::NoViableAlternative { objective: number });
            }
        }
    }
}
