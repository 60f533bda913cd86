//! Slide moves and the axis vocabulary they are expressed in.
//!
//! - `Orientation`: the fixed axis a piece travels on.
//! - `Direction`: one of the four slide directions; flipped with `-` or `opposite()`.
//! - `Move`: a slide of one piece by one or more cells.
use crate::error::PuzzleError;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// The axis a piece is allowed to travel on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The piece moves left and right.
    Horizontal,
    /// The piece moves up and down.
    Vertical,
}

impl Orientation {
    /// The two directions available on this axis, towards lower indices first.
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Orientation::Horizontal => [Direction::Left, Direction::Right],
            Orientation::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

/// A slide direction on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the direction pointing the other way along the same axis.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The axis this direction runs along.
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    /// Unit `(row, col)` offset of one cell in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Direction {
        self.opposite()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

impl FromStr for Direction {
    type Err = PuzzleError;

    /// Accepts the full names and their single-letter forms, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            other => Err(PuzzleError::invalid(format!(
                "unrecognized direction '{}'",
                other
            ))),
        }
    }
}

/// A single slide of one piece by `steps` cells.
///
/// A move costs one unit of path cost whatever its step count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    piece_id: char,
    direction: Direction,
    steps: usize,
}

impl Move {
    /// Creates a move, rejecting a zero step count.
    pub fn new(piece_id: char, direction: Direction, steps: usize) -> Result<Self, PuzzleError> {
        if steps == 0 {
            return Err(PuzzleError::invalid(format!(
                "move for piece {} must slide at least one cell",
                piece_id
            )));
        }
        Ok(Move {
            piece_id,
            direction,
            steps,
        })
    }

    // Used by move generation, where `steps` always comes from a 1.. range.
    pub(crate) fn slide(piece_id: char, direction: Direction, steps: usize) -> Self {
        debug_assert!(steps >= 1);
        Move {
            piece_id,
            direction,
            steps,
        }
    }

    pub fn piece_id(&self) -> char {
        self.piece_id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The move that undoes this one: same piece and distance, opposite direction.
    pub fn inverse(&self) -> Move {
        Move {
            piece_id: self.piece_id,
            direction: -self.direction,
            steps: self.steps,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.piece_id, self.direction, self.steps)
    }
}

impl FromStr for Move {
    type Err = PuzzleError;

    /// Parses `A-left-2`, `A-left` (one step) or the whitespace form `A left 2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = if trimmed.contains('-') {
            trimmed.split('-').collect()
        } else {
            trimmed.split_whitespace().collect()
        };

        let mut id_chars = parts.first().map(|p| p.chars()).into_iter().flatten();
        let piece_id = match (id_chars.next(), id_chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(PuzzleError::invalid(format!(
                    "invalid move format: '{}'",
                    trimmed
                )))
            }
        };

        match parts.len() {
            2 => Move::new(piece_id, parts[1].parse()?, 1),
            3 => {
                let steps = parts[2].trim().parse::<usize>().map_err(|_| {
                    PuzzleError::invalid(format!("invalid step count '{}'", parts[2]))
                })?;
                Move::new(piece_id, parts[1].parse()?, steps)
            }
            _ => Err(PuzzleError::invalid(format!(
                "invalid move format: '{}'",
                trimmed
            ))),
        }
    }
}
