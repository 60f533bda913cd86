use crate::board::Board;
use crate::error::PuzzleError;
use crate::heuristics::Heuristic;
use crate::moves::Move;
use std::hash::{Hash, Hasher};

/// A search node: one board, the moves that reached it and its costs.
///
/// Each state carries its whole path, so no parent pointers are needed and the
/// solution is read straight off the terminal state.
///
/// Equality and hashing look only at the board's grid cells. Two states reached
/// by different move orders compare equal if the pieces ended up in the same place.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    moves: Vec<Move>,
    g: u32,
    h: u32,
    heuristic: Option<Heuristic>,
}

impl GameState {
    /// Creates the root state for `board`, with `g = 0`.
    ///
    /// `heuristic` is `None` for uninformed searches, in which case `h` stays 0.
    pub fn new(board: Board, heuristic: Option<Heuristic>) -> Self {
        let h = heuristic.map_or(0, |heur| heur.evaluate(&board));
        GameState {
            board,
            moves: Vec::new(),
            g: 0,
            h,
            heuristic,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The moves taken from the initial board, in order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Path cost: the number of moves made, independent of how far each slid.
    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn f(&self) -> u32 {
        self.g + self.h
    }

    pub fn heuristic(&self) -> Option<Heuristic> {
        self.heuristic
    }

    pub fn is_goal(&self) -> bool {
        self.board.is_solved()
    }

    /// Expands this state by every legal move on its board.
    ///
    /// Each successor costs one more than its parent, whatever the slide length.
    pub fn successors(&self) -> Result<Vec<GameState>, PuzzleError> {
        self.board
            .all_possible_moves()
            .into_iter()
            .map(|mv| {
                let board = self.board.apply_move(&mv)?;
                let h = self.heuristic.map_or(0, |heur| heur.evaluate(&board));
                let mut moves = Vec::with_capacity(self.moves.len() + 1);
                moves.extend_from_slice(&self.moves);
                moves.push(mv);
                Ok(GameState {
                    board,
                    moves,
                    g: self.g + 1,
                    h,
                    heuristic: self.heuristic,
                })
            })
            .collect()
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.board.cells() == other.board.cells()
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.cells().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Direction;
    use crate::utils::board_from_str_array;
    use rustc_hash::FxHashSet;

    fn sample_board() -> Board {
        board_from_str_array(&[
            "6 6", "2", "......", "...A..", "PP.A..K", "......", "..BB..", "......",
        ])
        .unwrap()
    }

    #[test]
    fn test_initial_state_costs() {
        let board = sample_board();
        let plain = GameState::new(board.clone(), None);
        assert_eq!((plain.g(), plain.h(), plain.f()), (0, 0, 0));
        assert!(plain.moves().is_empty());

        let informed = GameState::new(board, Some(Heuristic::Combined));
        assert_eq!(informed.h(), 4 + 2);
        assert_eq!(informed.f(), informed.h());
    }

    #[test]
    fn test_successors_cost_one_per_move() {
        let state = GameState::new(sample_board(), Some(Heuristic::Manhattan));
        let successors = state.successors().unwrap();
        assert_eq!(successors.len(), state.board().all_possible_moves().len());
        for succ in &successors {
            assert_eq!(succ.g(), 1);
            assert_eq!(succ.moves().len(), 1);
            assert_eq!(succ.h(), Heuristic::Manhattan.evaluate(succ.board()));
            assert_eq!(succ.f(), succ.g() + succ.h());
            assert_eq!(succ.heuristic(), Some(Heuristic::Manhattan));
        }
        // The parent is untouched.
        assert!(state.moves().is_empty());

        let long_slide = successors
            .iter()
            .find(|s| s.moves()[0] == Move::new('B', Direction::Right, 2).unwrap())
            .unwrap();
        assert_eq!(long_slide.g(), 1);
    }

    #[test]
    fn test_identity_ignores_path_and_heuristic() {
        let board = sample_board();
        let a_up = Move::new('A', Direction::Up, 1).unwrap();
        let b_left = Move::new('B', Direction::Left, 1).unwrap();

        let via_a = board.apply_move(&a_up).unwrap().apply_move(&b_left).unwrap();
        let via_b = board.apply_move(&b_left).unwrap().apply_move(&a_up).unwrap();

        let s1 = GameState::new(via_a, None);
        let s2 = GameState::new(via_b, Some(Heuristic::Blocking));
        assert_eq!(s1, s2);

        let mut set = FxHashSet::default();
        set.insert(s1);
        assert!(set.contains(&s2));
    }

    #[test]
    fn test_goal_delegates_to_board() {
        let solved = board_from_str_array(&["1 4", "0", "..PPK"]).unwrap();
        assert!(GameState::new(solved, None).is_goal());
        assert!(!GameState::new(sample_board(), None).is_goal());
    }
}
