//! Optimal solver for the N-puzzle (8-puzzle, 15-puzzle, ...).
//!
//! A [`Board`] is an immutable N×N grid of tiles with one blank. [`Solver`]
//! runs A* with the Manhattan heuristic on the board and, in lockstep, on its
//! twin: a copy with two tiles exchanged. Only one of the pair can reach the
//! goal, which settles solvability without counting inversions.
//!
//! ```
//! use npuzzle_solver::{Board, Solver};
//!
//! let board = Board::new(&[[1u16, 2, 3], [4, 5, 6], [7, 0, 8]]).unwrap();
//! let solver = Solver::new(board);
//! assert!(solver.is_solvable());
//! assert_eq!(solver.moves(), 1);
//! ```

pub mod board;
pub mod error;
pub mod frontier;
pub mod parse;
pub mod solver;

pub use board::{Board, Move};
pub use error::{BoardError, ParseError, SolveError};
pub use frontier::PriorityFrontier;
pub use parse::{parse_board, read_board};
pub use solver::{SearchLimits, SearchStats, Solver};
