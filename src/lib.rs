pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod heap;
pub mod loader;
pub mod navigator;
pub mod options;
pub mod pathfinding;
pub mod scenario;
pub mod visibility;

pub use config::{Config, SimulationConfig};
pub use error::{Error, Result};
pub use events::{Event, EventLog, EventSink, TranscriptWriter};
pub use grid::{Cell, Direction, Grid, Position};
pub use navigator::{Navigator, RunOutcome, RunReport};
pub use scenario::{Objective, Scenario};
pub use visibility::{FogOfWar, Sighting};
