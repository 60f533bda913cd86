//! # Rush Hour Solver Library
//!
//! This library provides the board model for Rush Hour sliding-block puzzles
//! and four best-first searches to solve them: A*, Dijkstra, greedy
//! best-first and uniform-cost search.
//!
//! It is used by three binaries:
//! - `rush_solver`: Loads a puzzle file, runs the selected algorithm and
//!   heuristic, then prints and optionally saves the solution.
//! - `human_player`: Allows interactive play from the command line, with undo.
//! - `heuristic_evaluator`: Compares every algorithm/heuristic pairing over
//!   seeded random boards.
//!
//! ## Modules
//! - `moves`: Directions, orientations and the `Move` value type.
//! - `piece`: The `Piece` vehicle and its move generation.
//! - `board`: The immutable `Board`, its validation, move application and goal test.
//! - `heuristics`: Manhattan, blocking-vehicle and combined estimators.
//! - `state`: `GameState` search nodes with path and costs.
//! - `solver`: The search family, its configuration and reports.
//! - `generator`: Seeded random boards.
//! - `utils`: Puzzle text parsing, loading and solution output.
//! - `error`: The crate's `PuzzleError`.

pub mod board;
pub mod error;
pub mod generator;
pub mod heuristics;
pub mod moves;
pub mod piece;
pub mod solver;
pub mod state;
pub mod utils;

pub use board::Board;
pub use error::PuzzleError;
pub use heuristics::Heuristic;
pub use moves::{Direction, Move, Orientation};
pub use solver::{solve, Algorithm, SearchConfig, SearchOutcome, SearchReport, SearchStats};
pub use state::GameState;
