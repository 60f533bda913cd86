//! Seeded random puzzle generation.
//!
//! Boards are built in three passes: a horizontal primary piece with an exit on
//! the right edge of its row, randomly placed blockers, then a scramble of
//! random legal moves. The same seed and config always give the same board.
//! Generated boards are never already solved, but they are not guaranteed to be
//! solvable.
use crate::board::{Board, PieceSpec, PuzzleDescriptor, EXIT_CHAR, PRIMARY_ID};
use crate::error::PuzzleError;
use crate::moves::Orientation;
use crate::piece::PIECE_LENGTHS;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Parameters for `generate_board`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub cols: usize,
    /// Upper bound on non-primary pieces; crowded boards may end up with fewer.
    pub blockers: usize,
    /// Number of random moves applied after placement.
    pub scramble_moves: usize,
    /// Placement tries per blocker before giving up on it.
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            rows: 6,
            cols: 6,
            blockers: 8,
            scramble_moves: 40,
            max_attempts: 50,
        }
    }
}

fn blocker_ids() -> impl Iterator<Item = char> {
    ('A'..='Z').filter(|&id| id != PRIMARY_ID && id != EXIT_CHAR)
}

/// Generates a random board from `seed`.
///
/// # Errors
/// `InvalidConfiguration` if the grid has fewer than 3 columns (no room for an
/// unsolved primary piece), has no rows, or more blockers are requested than
/// there are piece letters.
pub fn generate_board(seed: u64, config: &GeneratorConfig) -> Result<Board, PuzzleError> {
    if config.rows == 0 || config.cols < 3 {
        return Err(PuzzleError::invalid(format!(
            "cannot generate a {}x{} board, need at least 1 row and 3 columns",
            config.rows, config.cols
        )));
    }
    let available = blocker_ids().count();
    if config.blockers > available {
        return Err(PuzzleError::invalid(format!(
            "at most {} blockers fit in the piece alphabet, requested {}",
            available, config.blockers
        )));
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let (rows, cols) = (config.rows, config.cols);
    let mut occupied = vec![false; rows * cols];

    // Keep the primary's far end short of the last column so it starts unsolved.
    let primary_row = rng.gen_range(0..rows);
    let primary_col = rng.gen_range(0..cols - 2);
    occupied[primary_row * cols + primary_col] = true;
    occupied[primary_row * cols + primary_col + 1] = true;
    let mut pieces = vec![PieceSpec {
        id: PRIMARY_ID,
        row: primary_row as isize,
        col: primary_col as isize,
        length: 2,
        orientation: Orientation::Horizontal,
        is_primary: true,
    }];

    for id in blocker_ids().take(config.blockers) {
        let placed = (0..config.max_attempts).find_map(|_| {
            let length = if rng.gen_bool(0.75) {
                PIECE_LENGTHS[0]
            } else {
                PIECE_LENGTHS[1]
            };
            let orientation = if rng.gen_bool(0.5) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_row, max_col) = match orientation {
                Orientation::Horizontal => (rows, (cols + 1).checked_sub(length)?),
                Orientation::Vertical => ((rows + 1).checked_sub(length)?, cols),
            };
            if max_row == 0 || max_col == 0 {
                return None;
            }
            let row = rng.gen_range(0..max_row);
            let col = rng.gen_range(0..max_col);
            // A horizontal blocker in the primary's row could never leave it.
            if orientation == Orientation::Horizontal && row == primary_row {
                return None;
            }
            let cells: Vec<usize> = (0..length)
                .map(|i| match orientation {
                    Orientation::Horizontal => row * cols + col + i,
                    Orientation::Vertical => (row + i) * cols + col,
                })
                .collect();
            if cells.iter().any(|&i| occupied[i]) {
                return None;
            }
            for &i in &cells {
                occupied[i] = true;
            }
            Some(PieceSpec {
                id,
                row: row as isize,
                col: col as isize,
                length,
                orientation,
                is_primary: false,
            })
        });
        match placed {
            Some(spec) => pieces.push(spec),
            None => debug!("no room for blocker {} after {} attempts", id, config.max_attempts),
        }
    }

    let mut board = Board::from_descriptor(&PuzzleDescriptor {
        rows,
        cols,
        pieces,
        exit_row: primary_row as isize,
        exit_col: cols as isize,
        declared_non_primary: None,
    })?;

    for _ in 0..config.scramble_moves {
        let moves = board.all_possible_moves();
        if moves.is_empty() {
            break;
        }
        let mv = &moves[rng.gen_range(0..moves.len())];
        let next = board.apply_move(mv)?;
        if !next.is_solved() {
            board = next;
        }
    }

    debug!(
        "generated {}x{} board from seed {} with {} blockers",
        rows,
        cols,
        seed,
        board.pieces().len() - 1
    );
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_board() {
        let config = GeneratorConfig::default();
        for seed in 0..10 {
            let a = generate_board(seed, &config).unwrap();
            let b = generate_board(seed, &config).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_seeds_vary_boards() {
        let config = GeneratorConfig::default();
        let boards: Vec<Board> = (0..10)
            .map(|seed| generate_board(seed, &config).unwrap())
            .collect();
        assert!(boards.iter().any(|b| b != &boards[0]));
    }

    #[test]
    fn test_generated_boards_are_valid_and_unsolved() {
        let config = GeneratorConfig {
            rows: 5,
            cols: 7,
            blockers: 6,
            scramble_moves: 25,
            max_attempts: 30,
        };
        for seed in 0..20 {
            let board = generate_board(seed, &config).unwrap();
            assert_eq!((board.rows(), board.cols()), (5, 7));
            assert!(!board.is_solved());
            assert!(board.pieces().len() <= 7);
            let primary = board.primary_piece();
            assert_eq!(primary.id(), PRIMARY_ID);
            assert_eq!(board.exit_row(), primary.row());
            assert_eq!(board.exit_col(), 7);
            // The descriptor round-trips through full validation.
            assert_eq!(Board::from_descriptor(&board.to_descriptor()).unwrap(), board);
        }
    }

    #[test]
    fn test_rejects_impossible_configs() {
        let narrow = GeneratorConfig {
            cols: 2,
            ..GeneratorConfig::default()
        };
        assert!(generate_board(1, &narrow).is_err());

        let crowded = GeneratorConfig {
            blockers: 30,
            ..GeneratorConfig::default()
        };
        assert!(generate_board(1, &crowded).is_err());
    }

    #[test]
    fn test_no_scramble_keeps_placement() {
        let config = GeneratorConfig {
            blockers: 0,
            scramble_moves: 0,
            ..GeneratorConfig::default()
        };
        let board = generate_board(7, &config).unwrap();
        assert_eq!(board.pieces().len(), 1);
        assert!(board.primary_piece().col() <= 3);
    }
}
