use std::io;

use thiserror::Error;

/// Reasons a grid cannot be turned into a [`Board`](crate::Board).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board has no cells")]
    Empty,

    #[error("row {row} has {len} cells but the board is {dimension}x{dimension}")]
    NotSquare {
        row: usize,
        len: usize,
        dimension: usize,
    },

    #[error("a {dimension}x{dimension} board needs {expected} cells, got {found}")]
    CellCount {
        dimension: usize,
        expected: usize,
        found: usize,
    },

    #[error("a {dimension}x{dimension} board has too many tiles")]
    TooLarge { dimension: usize },

    #[error("tile {value} is out of range or repeated")]
    NotPermutation { value: u16 },
}

/// Errors from reading the board text format.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input does not start with a board dimension")]
    MissingDimension,

    #[error("`{token}` is not a tile value")]
    InvalidToken { token: String },

    #[error("expected {expected} tiles, found {found}")]
    TileCount { expected: usize, found: usize },

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("failed to read board: {0}")]
    Io(#[from] io::Error),
}

/// Search gave up before proving either outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("search stopped after {expanded} expansions (limit {limit})")]
    ResourceExhausted { expanded: usize, limit: usize },
}
