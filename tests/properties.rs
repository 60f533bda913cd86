//! Property tests over generated boards.
//!
//! Invariants covered:
//! - A move changes only the cells of the piece it names.
//! - `reverse_move` undoes `apply_move` exactly.
//! - Along any successor chain, `g` equals the path length and replaying the
//!   path reproduces the board.
//! - Manhattan distance is zero exactly on solved boards.
use proptest::prelude::*;
use rush_hour_solver::board::Cell;
use rush_hour_solver::generator::{generate_board, GeneratorConfig};
use rush_hour_solver::heuristics::manhattan_distance;
use rush_hour_solver::{Board, GameState, Heuristic};

fn small_config(size: usize, blockers: usize) -> GeneratorConfig {
    GeneratorConfig {
        rows: size,
        cols: size,
        blockers,
        scramble_moves: 20,
        max_attempts: 30,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn moves_only_touch_their_piece(
        seed in any::<u64>(),
        size in 4usize..8,
        blockers in 0usize..10,
    ) {
        let board = generate_board(seed, &small_config(size, blockers)).unwrap();
        for mv in board.all_possible_moves() {
            let moved = board.apply_move(&mv).unwrap();
            let own = Cell::Piece(mv.piece_id());
            for (before, after) in board.cells().iter().zip(moved.cells()) {
                if before != after {
                    prop_assert!(*before == own || *after == own, "{} changed a foreign cell", mv);
                }
            }
            for (old, new) in board.pieces().iter().zip(moved.pieces()) {
                if old.id() != mv.piece_id() {
                    prop_assert_eq!(old, new);
                }
            }
        }
    }

    #[test]
    fn reverse_move_restores_board(
        seed in any::<u64>(),
        size in 4usize..8,
        blockers in 0usize..10,
    ) {
        let board = generate_board(seed, &small_config(size, blockers)).unwrap();
        for mv in board.all_possible_moves() {
            let moved = board.apply_move(&mv).unwrap();
            let restored = moved.reverse_move(&mv).unwrap();
            prop_assert_eq!(&restored, &board);
        }
    }

    #[test]
    fn path_cost_matches_path_length(
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<usize>(), 1..30),
    ) {
        let board = generate_board(seed, &small_config(6, 8)).unwrap();
        let mut state = GameState::new(board.clone(), Some(Heuristic::Combined));
        for choice in choices {
            let successors = state.successors().unwrap();
            if successors.is_empty() {
                break;
            }
            state = successors[choice % successors.len()].clone();
            prop_assert_eq!(state.g() as usize, state.moves().len());
            prop_assert_eq!(state.h(), Heuristic::Combined.evaluate(state.board()));
        }

        let mut replayed: Board = board;
        for mv in state.moves() {
            replayed = replayed.apply_move(mv).unwrap();
        }
        prop_assert_eq!(&replayed, state.board());
    }

    #[test]
    fn manhattan_zero_iff_solved(
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<usize>(), 0..40),
    ) {
        let mut board = generate_board(seed, &small_config(6, 4)).unwrap();
        for choice in choices {
            prop_assert_eq!(manhattan_distance(&board) == 0, board.is_solved());
            let moves = board.all_possible_moves();
            if moves.is_empty() {
                break;
            }
            board = board.apply_move(&moves[choice % moves.len()]).unwrap();
        }
        prop_assert_eq!(manhattan_distance(&board) == 0, board.is_solved());
    }
}
