//! Error types for fogwalk

use crate::grid::Position;
use thiserror::Error;

/// Errors raised at the crate boundary: loading, configuration and export.
///
/// The simulation itself never fails with an error; unreachable objectives are
/// reported as events.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{source_name} line {line}: {message}")]
    Parse {
        source_name: &'static str,
        line: usize,
        message: String,
    },

    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: i32,
        height: i32,
    },

    #[error("cell {0} is not listed in the land description")]
    MissingCell(Position),

    #[error("cell {0} is listed more than once")]
    DuplicateCell(Position),

    #[error("cells {0} and {1} are not adjacent")]
    NotAdjacent(Position, Position),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
