//! Immutable Rush Hour board.
//!
//! This module defines:
//! - `Cell`: the content of one grid cell (empty, exit marker or a piece token).
//! - `PieceSpec` / `PuzzleDescriptor`: the validated input a `Board` is built from.
//! - `Board`: a grid snapshot with its piece roster and exit, supporting move
//!   generation, move application, undo and the goal test.
//!
//! Boards are never mutated in place. `apply_move` and `reverse_move` return a
//! fresh board, so a search can hold many boards that share nothing mutable.
use crate::error::PuzzleError;
use crate::moves::{Move, Orientation};
use crate::piece::Piece;
use log::debug;
use rustc_hash::FxHashSet;
use std::fmt;

/// Character used for the exit marker in grids and puzzle text.
pub const EXIT_CHAR: char = 'K';
/// Character used for empty cells in grids and puzzle text.
pub const EMPTY_CHAR: char = '.';
/// Conventional id of the primary piece in puzzle text.
pub const PRIMARY_ID: char = 'P';

/// Content of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    /// The in-grid exit. Traversable like an empty cell.
    Exit,
    /// A cell covered by the piece with this id.
    Piece(char),
}

impl Cell {
    /// Converts the cell to its puzzle-text character.
    pub fn to_char(&self) -> char {
        match self {
            Cell::Empty => EMPTY_CHAR,
            Cell::Exit => EXIT_CHAR,
            Cell::Piece(id) => *id,
        }
    }

    pub fn is_traversable(&self) -> bool {
        matches!(self, Cell::Empty | Cell::Exit)
    }
}

/// Which side of the grid the exit sits on, if it is outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitSide {
    Inside,
    Top,
    Bottom,
    Left,
    Right,
}

/// One vehicle in a `PuzzleDescriptor`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceSpec {
    pub id: char,
    pub row: isize,
    pub col: isize,
    pub length: usize,
    pub orientation: Orientation,
    pub is_primary: bool,
}

/// Everything needed to build a `Board`.
///
/// `exit_row` / `exit_col` may lie one unit outside the grid. When
/// `declared_non_primary` is set, the roster must contain exactly that many
/// non-primary pieces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleDescriptor {
    pub rows: usize,
    pub cols: usize,
    pub pieces: Vec<PieceSpec>,
    pub exit_row: isize,
    pub exit_col: isize,
    pub declared_non_primary: Option<usize>,
}

/// An immutable snapshot of the puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    pieces: Vec<Piece>,
    primary: usize,
    exit_row: isize,
    exit_col: isize,
}

impl Board {
    /// Builds and validates a board.
    ///
    /// # Errors
    /// `InvalidConfiguration` when the grid is empty, piece ids are reserved or
    /// duplicated, there is not exactly one primary piece, the declared piece
    /// count does not match, a piece leaves the grid or overlaps another, or the
    /// exit is not one unit-or-less from the grid on the primary piece's axis.
    pub fn from_descriptor(desc: &PuzzleDescriptor) -> Result<Board, PuzzleError> {
        if desc.rows == 0 || desc.cols == 0 {
            return Err(PuzzleError::invalid(format!(
                "board dimensions must be positive, got {}x{}",
                desc.rows, desc.cols
            )));
        }

        let mut seen_ids = FxHashSet::default();
        let mut pieces = Vec::with_capacity(desc.pieces.len());
        for spec in &desc.pieces {
            if spec.id == EMPTY_CHAR || spec.id == EXIT_CHAR || spec.id.is_whitespace() {
                return Err(PuzzleError::invalid(format!(
                    "'{}' cannot be used as a piece id",
                    spec.id
                )));
            }
            if !seen_ids.insert(spec.id) {
                return Err(PuzzleError::invalid(format!("duplicate piece id {}", spec.id)));
            }
            pieces.push(Piece::new(
                spec.id,
                spec.row,
                spec.col,
                spec.length,
                spec.orientation,
                spec.is_primary,
            )?);
        }

        let primaries: Vec<usize> = pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_primary())
            .map(|(i, _)| i)
            .collect();
        let primary = match primaries.as_slice() {
            [] => return Err(PuzzleError::invalid("no primary piece found")),
            [only] => *only,
            _ => {
                return Err(PuzzleError::invalid(format!(
                    "expected one primary piece, found {}",
                    primaries.len()
                )))
            }
        };

        if let Some(declared) = desc.declared_non_primary {
            let actual = pieces.len() - 1;
            if declared != actual {
                return Err(PuzzleError::invalid(format!(
                    "expected {} non-primary pieces, found {}",
                    declared, actual
                )));
            }
        }

        let rows = desc.rows as isize;
        let cols = desc.cols as isize;
        let (er, ec) = (desc.exit_row, desc.exit_col);
        let row_outside = er < 0 || er >= rows;
        let col_outside = ec < 0 || ec >= cols;
        if er < -1 || er > rows || ec < -1 || ec > cols || (row_outside && col_outside) {
            return Err(PuzzleError::invalid(format!(
                "exit ({}, {}) is not inside or directly beside the grid",
                er, ec
            )));
        }

        let primary_piece = pieces[primary];
        let collinear = match primary_piece.orientation() {
            Orientation::Horizontal => er == primary_piece.row(),
            Orientation::Vertical => ec == primary_piece.col(),
        };
        if !collinear {
            return Err(PuzzleError::invalid(format!(
                "exit ({}, {}) is not aligned with {} primary piece {}",
                er,
                ec,
                match primary_piece.orientation() {
                    Orientation::Horizontal => "horizontal",
                    Orientation::Vertical => "vertical",
                },
                primary_piece.id()
            )));
        }

        let mut board = Board {
            rows: desc.rows,
            cols: desc.cols,
            cells: vec![Cell::Empty; desc.rows * desc.cols],
            pieces,
            primary,
            exit_row: er,
            exit_col: ec,
        };
        if let Some(i) = board.index(er, ec) {
            board.cells[i] = Cell::Exit;
        }

        for piece in &board.pieces {
            for (r, c) in piece.occupied_cells() {
                let i = board.index(r, c).ok_or_else(|| {
                    PuzzleError::invalid(format!(
                        "piece {} leaves the grid at ({}, {})",
                        piece.id(),
                        r,
                        c
                    ))
                })?;
                if let Cell::Piece(other) = board.cells[i] {
                    return Err(PuzzleError::invalid(format!(
                        "pieces {} and {} overlap at ({}, {})",
                        other,
                        piece.id(),
                        r,
                        c
                    )));
                }
                board.cells[i] = Cell::Piece(piece.id());
            }
        }

        debug!(
            "built {}x{} board with {} pieces, exit at ({}, {})",
            board.rows,
            board.cols,
            board.pieces.len(),
            er,
            ec
        );
        Ok(board)
    }

    /// Describes this board in the form accepted by `from_descriptor`.
    pub fn to_descriptor(&self) -> PuzzleDescriptor {
        PuzzleDescriptor {
            rows: self.rows,
            cols: self.cols,
            pieces: self
                .pieces
                .iter()
                .map(|p| PieceSpec {
                    id: p.id(),
                    row: p.row(),
                    col: p.col(),
                    length: p.length(),
                    orientation: p.orientation(),
                    is_primary: p.is_primary(),
                })
                .collect(),
            exit_row: self.exit_row,
            exit_col: self.exit_col,
            declared_non_primary: Some(self.pieces.len() - 1),
        }
    }

    fn index(&self, row: isize, col: isize) -> Option<usize> {
        if row < 0 || col < 0 || row >= self.rows as isize || col >= self.cols as isize {
            None
        } else {
            Some(row as usize * self.cols + col as usize)
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn exit_row(&self) -> isize {
        self.exit_row
    }

    pub fn exit_col(&self) -> isize {
        self.exit_col
    }

    /// Row-major grid contents. This is the board's identity for deduplication.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell at `(row, col)`, or `None` outside the grid.
    pub fn cell(&self, row: isize, col: isize) -> Option<Cell> {
        self.index(row, col).map(|i| self.cells[i])
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: char) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id() == id)
    }

    pub fn primary_piece(&self) -> &Piece {
        &self.pieces[self.primary]
    }

    /// Which side the exit is on, or `ExitSide::Inside` for an in-grid exit.
    pub fn exit_side(&self) -> ExitSide {
        if self.exit_row < 0 {
            ExitSide::Top
        } else if self.exit_row >= self.rows as isize {
            ExitSide::Bottom
        } else if self.exit_col < 0 {
            ExitSide::Left
        } else if self.exit_col >= self.cols as isize {
            ExitSide::Right
        } else {
            ExitSide::Inside
        }
    }

    /// The in-grid cell the primary piece must cover to be solved.
    ///
    /// For an in-grid exit this is the exit itself; for an outside exit it is the
    /// boundary cell next to it.
    pub fn exit_target(&self) -> (isize, isize) {
        (
            self.exit_row.clamp(0, self.rows as isize - 1),
            self.exit_col.clamp(0, self.cols as isize - 1),
        )
    }

    /// True when `(row, col)` is inside the grid and empty or the exit.
    pub fn is_cell_traversable(&self, row: isize, col: isize) -> bool {
        self.cell(row, col).map_or(false, |cell| cell.is_traversable())
    }

    /// Every legal move of every piece, in roster order.
    pub fn all_possible_moves(&self) -> Vec<Move> {
        self.pieces
            .iter()
            .flat_map(|piece| piece.possible_moves(self))
            .collect()
    }

    /// Returns the board after `mv`.
    ///
    /// # Errors
    /// `PieceNotFound` if no piece has the move's id; `IllegalMove` if the
    /// direction is off the piece's axis or the slide is obstructed. Neither
    /// happens for moves taken from this board's `all_possible_moves`.
    pub fn apply_move(&self, mv: &Move) -> Result<Board, PuzzleError> {
        let idx = self
            .pieces
            .iter()
            .position(|p| p.id() == mv.piece_id())
            .ok_or(PuzzleError::PieceNotFound(mv.piece_id()))?;
        let old_piece = self.pieces[idx];

        let illegal = PuzzleError::IllegalMove {
            piece: old_piece.id(),
            direction: mv.direction(),
        };
        if mv.direction().orientation() != old_piece.orientation() {
            return Err(illegal);
        }
        if old_piece.free_run(self, mv.direction()) < mv.steps() {
            return Err(illegal);
        }
        let new_piece = old_piece.apply_move(mv);

        let mut cells = self.cells.clone();
        for (r, c) in old_piece.occupied_cells() {
            if let Some(i) = self.index(r, c) {
                cells[i] = Cell::Empty;
            }
        }
        if let Some(i) = self.index(self.exit_row, self.exit_col) {
            if cells[i] == Cell::Empty {
                cells[i] = Cell::Exit;
            }
        }
        for (r, c) in new_piece.occupied_cells() {
            if let Some(i) = self.index(r, c) {
                cells[i] = Cell::Piece(new_piece.id());
            }
        }

        let mut pieces = self.pieces.clone();
        pieces[idx] = new_piece;

        Ok(Board {
            rows: self.rows,
            cols: self.cols,
            cells,
            pieces,
            primary: self.primary,
            exit_row: self.exit_row,
            exit_col: self.exit_col,
        })
    }

    /// Undoes `mv` by applying the same slide in the opposite direction.
    pub fn reverse_move(&self, mv: &Move) -> Result<Board, PuzzleError> {
        self.apply_move(&mv.inverse())
    }

    /// True when the primary piece has reached the exit.
    ///
    /// An in-grid exit must be covered by the primary piece. An exit one unit
    /// outside the grid requires the primary piece to sit flush against that edge,
    /// which is the same as covering the boundary cell returned by `exit_target`.
    pub fn is_solved(&self) -> bool {
        let (r, c) = self.exit_target();
        self.primary_piece().covers(r, c)
    }

    /// Generates a string representation with ANSI colors.
    ///
    /// The primary piece is red, the piece named by `highlight` blue and the exit
    /// green. Cells are separated by spaces and an outside exit is drawn on its side.
    pub fn to_string_with_highlight(&self, highlight: Option<char>) -> String {
        let primary_id = self.primary_piece().id();
        let paint = |ch: char| -> String {
            if ch == EXIT_CHAR {
                format!("\x1b[32m{}\x1b[0m", ch)
            } else if ch == primary_id {
                format!("\x1b[31m{}\x1b[0m", ch)
            } else if Some(ch) == highlight && ch != EMPTY_CHAR {
                format!("\x1b[34m{}\x1b[0m", ch)
            } else {
                ch.to_string()
            }
        };

        self.to_string()
            .lines()
            .map(|line| line.chars().map(paint).collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Board {
    /// Writes the grid in puzzle-text form: one line per row, with `K` placed
    /// beside, above or below the grid when the exit is outside it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = self.exit_side();
        let mut lines: Vec<String> = Vec::with_capacity(self.rows + 2);
        let exit_line = || format!("{}{}", " ".repeat(self.exit_col as usize), EXIT_CHAR);

        if side == ExitSide::Top {
            lines.push(exit_line());
        }
        for r in 0..self.rows {
            let mut line = String::with_capacity(self.cols + 1);
            if side == ExitSide::Left {
                line.push(if r as isize == self.exit_row { EXIT_CHAR } else { ' ' });
            }
            line.extend(
                self.cells[r * self.cols..(r + 1) * self.cols]
                    .iter()
                    .map(Cell::to_char),
            );
            if side == ExitSide::Right && r as isize == self.exit_row {
                line.push(EXIT_CHAR);
            }
            lines.push(line);
        }
        if side == ExitSide::Bottom {
            lines.push(exit_line());
        }
        write!(f, "{}", lines.join("\n"))
    }
}
