use thiserror::Error;

/// Errors produced while building schedules, worlds and environments
///
/// Simulation itself never fails: collisions, unseen states and unreachable goals are
/// ordinary outcomes, so only construction paths return this type.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid schedule: {reason}")]
    InvalidSchedule { reason: String },

    #[error("world map is empty")]
    EmptyWorld,

    #[error("row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("unrecognized tile '{symbol}' at row {row}, column {column}")]
    UnknownTile {
        symbol: char,
        row: usize,
        column: usize,
    },

    #[error("position ({x}, {z}) is outside the {width}x{depth} grid")]
    OutOfBounds {
        x: i32,
        z: i32,
        width: usize,
        depth: usize,
    },

    #[error("spawn point ({x}, {z}) is a wall")]
    SpawnOnWall { x: i32, z: i32 },

    #[error("no spawn points available")]
    NoSpawnPoints,

    #[error("not enough free cells: need {needed}, have {available}")]
    NotEnoughFreeCells { needed: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
