use crate::board::{Board, Cell};
use crate::error::PuzzleError;
use crate::moves::Orientation;
use log::warn;
use std::fmt;
use std::str::FromStr;

/// Distance along the primary piece's axis from its nearest edge to the exit.
///
/// An exit outside the grid is measured to the boundary cell beside it, not past
/// it, so a solved board always scores 0.
///
/// # Arguments
/// * `board`: A reference to the `Board` to evaluate.
///
/// # Returns
/// The number of cells the primary piece still has to travel.
pub fn manhattan_distance(board: &Board) -> u32 {
    let primary = board.primary_piece();
    let (target_row, target_col) = board.exit_target();
    let target = match primary.orientation() {
        Orientation::Horizontal => target_col,
        Orientation::Vertical => target_row,
    };

    if target > primary.end() {
        (target - primary.end()) as u32
    } else if target < primary.start() {
        (primary.start() - target) as u32
    } else {
        0
    }
}

/// Counts occupied non-primary cells strictly between the primary piece and the exit.
///
/// The scanned range depends on where the exit is:
/// - beyond the grid: from the piece's edge to the boundary on that side;
/// - ahead of the piece: from just past its far end to just before the exit;
/// - behind the piece: from just past the exit to just before its anchor.
///
/// The in-grid exit cell itself is never counted, and the range is clamped to the grid.
pub fn blocking_vehicles(board: &Board) -> u32 {
    let primary = board.primary_piece();
    let horizontal = primary.orientation() == Orientation::Horizontal;
    let (axis_len, exit) = if horizontal {
        (board.cols() as isize, board.exit_col())
    } else {
        (board.rows() as isize, board.exit_row())
    };

    let (from, to) = if exit >= axis_len {
        (primary.end() + 1, axis_len - 1)
    } else if exit < 0 {
        (0, primary.start() - 1)
    } else if exit > primary.end() {
        (primary.end() + 1, exit - 1)
    } else if exit < primary.start() {
        (exit + 1, primary.start() - 1)
    } else {
        return 0;
    };
    let (from, to) = (from.max(0), to.min(axis_len - 1));

    let lane = primary.lane();
    let mut count = 0;
    for i in from..=to {
        let cell = if horizontal {
            board.cell(lane, i)
        } else {
            board.cell(i, lane)
        };
        if let Some(Cell::Piece(id)) = cell {
            if id != primary.id() {
                count += 1;
            }
        }
    }
    count
}

/// `manhattan + 2 * blocking`. Not admissible.
pub fn combined(board: &Board) -> u32 {
    manhattan_distance(board) + 2 * blocking_vehicles(board)
}

/// Selects which estimator an informed search uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Blocking,
    Combined,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [Heuristic::Manhattan, Heuristic::Blocking, Heuristic::Combined];

    /// Estimates the remaining cost of `board`.
    pub fn evaluate(self, board: &Board) -> u32 {
        match self {
            Heuristic::Manhattan => manhattan_distance(board),
            Heuristic::Blocking => blocking_vehicles(board),
            Heuristic::Combined => combined(board),
        }
    }

    /// Resolves a heuristic name, falling back to Manhattan for anything unknown.
    ///
    /// Use `str::parse::<Heuristic>()` instead to reject unknown names.
    pub fn from_name(name: &str) -> Heuristic {
        name.parse().unwrap_or_else(|_| {
            warn!("unknown heuristic '{}', using manhattan", name.trim());
            Heuristic::Manhattan
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Blocking => "blocking",
            Heuristic::Combined => "combined",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "blocking" => Ok(Heuristic::Blocking),
            "combined" => Ok(Heuristic::Combined),
            other => Err(PuzzleError::invalid(format!("unknown heuristic '{}'", other))),
        }
    }
}
