use crate::board::Board;
use crate::error::PuzzleError;
use crate::moves::{Direction, Move, Orientation};

/// Valid vehicle lengths.
pub const PIECE_LENGTHS: [usize; 2] = [2, 3];

/// An immutable vehicle on the board.
///
/// The anchor `(row, col)` is the piece's top-most / left-most cell; the piece
/// covers `length` contiguous cells from there along its orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    id: char,
    row: isize,
    col: isize,
    length: usize,
    orientation: Orientation,
    is_primary: bool,
}

impl Piece {
    /// Creates a piece, failing with `InvalidConfiguration` for lengths other than 2 or 3.
    pub fn new(
        id: char,
        row: isize,
        col: isize,
        length: usize,
        orientation: Orientation,
        is_primary: bool,
    ) -> Result<Self, PuzzleError> {
        if !PIECE_LENGTHS.contains(&length) {
            return Err(PuzzleError::invalid(format!(
                "piece {} has length {}, expected 2 or 3",
                id, length
            )));
        }
        Ok(Piece {
            id,
            row,
            col,
            length,
            orientation,
            is_primary,
        })
    }

    pub fn id(&self) -> char {
        self.id
    }

    pub fn row(&self) -> isize {
        self.row
    }

    pub fn col(&self) -> isize {
        self.col
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    /// Index of the first cell along the motion axis (column if horizontal, row if vertical).
    pub fn start(&self) -> isize {
        match self.orientation {
            Orientation::Horizontal => self.col,
            Orientation::Vertical => self.row,
        }
    }

    /// Index of the last cell along the motion axis.
    pub fn end(&self) -> isize {
        self.start() + self.length as isize - 1
    }

    /// Index of the fixed coordinate across the motion axis (row if horizontal, col if vertical).
    pub fn lane(&self) -> isize {
        match self.orientation {
            Orientation::Horizontal => self.row,
            Orientation::Vertical => self.col,
        }
    }

    /// The cells covered by this piece, from the anchor outwards.
    pub fn occupied_cells(&self) -> Vec<(isize, isize)> {
        (0..self.length as isize)
            .map(|i| match self.orientation {
                Orientation::Horizontal => (self.row, self.col + i),
                Orientation::Vertical => (self.row + i, self.col),
            })
            .collect()
    }

    /// Whether `(row, col)` is one of this piece's cells.
    pub fn covers(&self, row: isize, col: isize) -> bool {
        match self.orientation {
            Orientation::Horizontal => row == self.row && col >= self.col && col <= self.end(),
            Orientation::Vertical => col == self.col && row >= self.row && row <= self.end(),
        }
    }

    /// Counts how many cells in a row are traversable beyond the piece's edge in `direction`.
    pub(crate) fn free_run(&self, board: &Board, direction: Direction) -> usize {
        let (dr, dc) = direction.delta();
        // First probed cell sits just past the edge we are moving towards.
        let (mut r, mut c) = match direction {
            Direction::Left | Direction::Up => (self.row + dr, self.col + dc),
            Direction::Right => (self.row, self.end() + 1),
            Direction::Down => (self.end() + 1, self.col),
        };

        let mut run = 0;
        while board.is_cell_traversable(r, c) {
            run += 1;
            r += dr;
            c += dc;
        }
        run
    }

    /// Generates every legal slide for this piece on `board`.
    ///
    /// For each direction on the piece's axis, the maximal free run is measured and
    /// one move is emitted per step count from 1 up to that run, so every prefix of a
    /// long slide is available. The exit marker never blocks.
    pub fn possible_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::new();
        for direction in self.orientation.directions() {
            let max_steps = self.free_run(board, direction);
            for steps in 1..=max_steps {
                moves.push(Move::slide(self.id, direction, steps));
            }
        }
        moves
    }

    /// Returns a copy of this piece shifted by `mv`.
    ///
    /// Legality is not re-checked: only apply moves produced by `possible_moves`
    /// against the board this piece lives on.
    pub fn apply_move(&self, mv: &Move) -> Piece {
        let (dr, dc) = mv.direction().delta();
        let steps = mv.steps() as isize;
        Piece {
            row: self.row + dr * steps,
            col: self.col + dc * steps,
            ..*self
        }
    }
}
