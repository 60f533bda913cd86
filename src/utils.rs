use crate::board::{Board, PieceSpec, PuzzleDescriptor, EMPTY_CHAR, EXIT_CHAR, PRIMARY_ID};
use crate::error::PuzzleError;
use crate::moves::Orientation;
use crate::solver::SearchReport;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

/// A puzzle file after parsing: the board descriptor plus the optional
/// algorithm and heuristic names given on trailing lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedPuzzle {
    pub descriptor: PuzzleDescriptor,
    pub algorithm: Option<String>,
    pub heuristic: Option<String>,
}

impl ParsedPuzzle {
    /// Builds the board, running the full `Board::from_descriptor` validation.
    pub fn board(&self) -> Result<Board, PuzzleError> {
        Board::from_descriptor(&self.descriptor)
    }
}

/// Parses an array of string slices into a `Board` object.
///
/// The slices are the lines of a puzzle file:
/// - line 1: `rows cols`
/// - line 2: the number of non-primary pieces
/// - then the grid, one line per row.
///
/// Grid characters are `.` for empty cells, `K` for the exit and uppercase
/// letters for pieces, with `P` as the primary piece. The exit can sit inside a
/// row, in an extra leading or trailing column, or alone on a line directly
/// above or below the grid. Short rows are padded with empty cells.
///
/// # Returns
/// * `Ok(Board)` if the text parses and describes a valid board.
/// * `Err(PuzzleError::Parse)` for malformed headers, wrong row counts or
///   unknown characters.
/// * `Err(PuzzleError::InvalidConfiguration)` for missing or duplicate exits,
///   pieces that are not straight runs, or any rejection from
///   `Board::from_descriptor`.
///
/// # Examples
/// ```
/// use rush_hour_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["2 4", "1", "PP..K", "AA.."]).unwrap();
/// assert_eq!(board.pieces().len(), 2);
/// assert!(!board.is_solved());
///
/// assert!(board_from_str_array(&["2 4", "1", "PP...", "AA.."]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, PuzzleError> {
    parse_lines(s)?.board()
}

/// Parses the full text of a puzzle file.
pub fn parse_puzzle(text: &str) -> Result<ParsedPuzzle, PuzzleError> {
    let lines: Vec<&str> = text.lines().collect();
    parse_lines(&lines)
}

/// Reads and parses a puzzle file.
pub fn load_puzzle_file<P: AsRef<Path>>(path: P) -> Result<ParsedPuzzle, PuzzleError> {
    let text = fs::read_to_string(path)?;
    parse_puzzle(&text)
}

fn parse_error(line: usize, message: impl Into<String>) -> PuzzleError {
    PuzzleError::Parse {
        line,
        message: message.into(),
    }
}

/// A line holding nothing but the exit marker, padded with spaces or dots.
fn exit_only_column(line: &str) -> Option<usize> {
    let mut column = None;
    for (i, ch) in line.chars().enumerate() {
        match ch {
            EXIT_CHAR if column.is_none() => column = Some(i),
            ' ' | EMPTY_CHAR => {}
            _ => return None,
        }
    }
    column
}

fn is_option_line(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .map_or(false, |ch| ch.is_ascii_lowercase())
}

fn parse_lines(s: &[&str]) -> Result<ParsedPuzzle, PuzzleError> {
    // (1-based line number, text), blank lines dropped.
    let lines: Vec<(usize, &str)> = s
        .iter()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let (header_line, header) = *lines.first().ok_or_else(|| parse_error(1, "empty puzzle"))?;
    let dims: Vec<usize> = header
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| parse_error(header_line, format!("expected 'rows cols', got '{}'", header)))?;
    let (rows, cols) = match dims.as_slice() {
        [rows, cols] => (*rows, *cols),
        _ => {
            return Err(parse_error(
                header_line,
                format!("expected 'rows cols', got '{}'", header),
            ))
        }
    };

    let (count_line, count) = *lines
        .get(1)
        .ok_or_else(|| parse_error(header_line + 1, "missing piece count"))?;
    let declared: usize = count
        .trim()
        .parse()
        .map_err(|_| parse_error(count_line, format!("expected a piece count, got '{}'", count)))?;

    let body = &lines[2..];
    // Options can only follow a complete grid.
    let option_start = body
        .iter()
        .skip(rows)
        .position(|(_, line)| is_option_line(line))
        .map_or(body.len(), |i| i + rows);
    let (grid_lines, option_lines) = body.split_at(option_start);
    if let Some((n, line)) = option_lines.iter().find(|(_, l)| !is_option_line(l)) {
        return Err(parse_error(*n, format!("unexpected grid line '{}' after options", line)));
    }
    if option_lines.len() > 2 {
        return Err(parse_error(
            option_lines[2].0,
            "expected at most an algorithm line and a heuristic line",
        ));
    }
    let option = |i: usize| option_lines.get(i).map(|(_, l)| l.trim().to_string());

    let mut exits: Vec<(isize, isize)> = Vec::new();
    let grid_rows: &[(usize, &str)] = if grid_lines.len() == rows + 1 {
        let (_, first) = grid_lines[0];
        let (_, last) = grid_lines[rows];
        if let Some(c) = exit_only_column(first) {
            exits.push((-1, c as isize));
            &grid_lines[1..]
        } else if let Some(c) = exit_only_column(last) {
            exits.push((rows as isize, c as isize));
            &grid_lines[..rows]
        } else {
            return Err(parse_error(
                grid_lines[rows].0,
                format!("expected {} grid rows, found {}", rows, grid_lines.len()),
            ));
        }
    } else if grid_lines.len() == rows {
        grid_lines
    } else {
        let line = grid_lines.last().map_or(count_line, |(n, _)| *n);
        return Err(parse_error(
            line,
            format!("expected {} grid rows, found {}", rows, grid_lines.len()),
        ));
    };

    let left_exit = grid_rows
        .iter()
        .any(|(_, line)| line.chars().count() == cols + 1 && line.starts_with(EXIT_CHAR));

    let mut cells: FxHashMap<char, usize> = FxHashMap::default();
    let mut roster: Vec<(char, Vec<(isize, isize)>)> = Vec::new();
    for (r, (n, line)) in grid_rows.iter().enumerate() {
        let mut chars: Vec<char> = line.chars().collect();
        if left_exit {
            // Rows without the exit may omit the blank exit column.
            match chars.first() {
                Some(&EXIT_CHAR) if chars.len() == cols + 1 => {
                    exits.push((r as isize, -1));
                    chars.remove(0);
                }
                Some(' ') => {
                    chars.remove(0);
                }
                _ => {}
            }
        }
        if chars.len() == cols + 1 && chars[cols] == EXIT_CHAR {
            exits.push((r as isize, cols as isize));
            chars.truncate(cols);
        }
        if chars.len() > cols {
            return Err(parse_error(
                *n,
                format!("row {} is too long: expected {} cells, found {}", r, cols, chars.len()),
            ));
        }
        chars.resize(cols, EMPTY_CHAR);

        for (c, ch) in chars.into_iter().enumerate() {
            let pos = (r as isize, c as isize);
            match ch {
                EMPTY_CHAR => {}
                EXIT_CHAR => exits.push(pos),
                id if id.is_ascii_uppercase() => match cells.get(&id) {
                    Some(&i) => roster[i].1.push(pos),
                    None => {
                        cells.insert(id, roster.len());
                        roster.push((id, vec![pos]));
                    }
                },
                id if id.is_ascii_lowercase() => {
                    return Err(parse_error(
                        *n,
                        format!("piece id '{}' in row {} col {} must be uppercase", id, r, c),
                    ))
                }
                other => {
                    return Err(parse_error(
                        *n,
                        format!("unrecognized character '{}' in row {} col {}", other, r, c),
                    ))
                }
            }
        }
    }

    let (exit_row, exit_col) = match exits.as_slice() {
        [] => return Err(PuzzleError::invalid("puzzle has no exit 'K'")),
        [only] => *only,
        _ => {
            return Err(PuzzleError::invalid(format!(
                "puzzle has {} exits, expected exactly one",
                exits.len()
            )))
        }
    };

    let pieces = roster
        .into_iter()
        .map(|(id, positions)| piece_spec(id, &positions))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedPuzzle {
        descriptor: PuzzleDescriptor {
            rows,
            cols,
            pieces,
            exit_row,
            exit_col,
            declared_non_primary: Some(declared),
        },
        algorithm: option(0),
        heuristic: option(1),
    })
}

/// Turns the cells carrying one letter into a piece, in row-major scan order.
fn piece_spec(id: char, positions: &[(isize, isize)]) -> Result<PieceSpec, PuzzleError> {
    let (row, col) = positions[0];
    let straight = |orientation: Orientation| {
        positions.iter().enumerate().all(|(i, &(r, c))| match orientation {
            Orientation::Horizontal => r == row && c == col + i as isize,
            Orientation::Vertical => c == col && r == row + i as isize,
        })
    };
    let orientation = if positions.len() < 2 {
        None
    } else if straight(Orientation::Horizontal) {
        Some(Orientation::Horizontal)
    } else if straight(Orientation::Vertical) {
        Some(Orientation::Vertical)
    } else {
        None
    };
    let orientation = orientation.ok_or_else(|| {
        PuzzleError::invalid(format!(
            "piece {} is not a straight run of 2 or 3 cells",
            id
        ))
    })?;

    Ok(PieceSpec {
        id,
        row,
        col,
        length: positions.len(),
        orientation,
        is_primary: id == PRIMARY_ID,
    })
}

/// Writes a board back out in puzzle-file form, header included.
pub fn board_to_puzzle_string(board: &Board) -> String {
    format!(
        "{} {}\n{}\n{}\n",
        board.rows(),
        board.cols(),
        board.pieces().len() - 1,
        board
    )
}

/// Formats a search result as readable text: the configuration, the initial
/// board, every move followed by the board after it, then the statistics.
pub fn format_solution(initial: &Board, report: &SearchReport) -> Result<String, PuzzleError> {
    let mut out = String::from("Rush Hour solution\n");
    out.push_str(&format!("Algorithm: {}\n", report.config));
    out.push_str(&format!("\nInitial board:\n{}\n\n", initial));

    match report.solution() {
        Some(state) => {
            let boards = report.replay(initial)?;
            for (i, (mv, board)) in state.moves().iter().zip(&boards).enumerate() {
                out.push_str(&format!("Move {}: {}\n{}\n\n", i + 1, mv, board));
            }
            out.push_str(&format!("Moves: {}\n", state.moves().len()));
        }
        None => out.push_str("No solution found\n"),
    }
    out.push_str(&format!("Nodes visited: {}\n", report.stats.nodes_visited));
    out.push_str(&format!("States expanded: {}\n", report.stats.states_expanded));
    out.push_str(&format!("Time: {} ms\n", report.stats.elapsed.as_millis()));
    Ok(out)
}

/// Writes `format_solution` output to `path`.
pub fn save_solution<P: AsRef<Path>>(
    path: P,
    initial: &Board,
    report: &SearchReport,
) -> Result<(), PuzzleError> {
    let text = format_solution(initial, report)?;
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, ExitSide};
    use crate::heuristics::Heuristic;
    use crate::solver::{a_star, uniform_cost};

    #[test]
    fn test_board_from_str_array_valid() {
        let board = board_from_str_array(&[
            "6 6", "3", "AA...B", ".....B", "PP....K", "..C...", "..C...", "......",
        ])
        .unwrap();
        assert_eq!(board.rows(), 6);
        assert_eq!(board.cols(), 6);
        assert_eq!(board.pieces().len(), 4);
        assert_eq!(board.primary_piece().id(), 'P');
        assert_eq!((board.exit_row(), board.exit_col()), (2, 6));
        let b = board.piece('B').unwrap();
        assert_eq!(b.orientation(), Orientation::Vertical);
        assert_eq!((b.row(), b.col(), b.length()), (0, 5, 2));
        assert_eq!(board.cell(3, 2), Some(Cell::Piece('C')));
    }

    #[test]
    fn test_exit_positions() {
        let left = board_from_str_array(&["3 5", "0", " .....", "K...PP", " ....."]).unwrap();
        assert_eq!((left.exit_row(), left.exit_col()), (1, -1));
        assert_eq!(left.exit_side(), ExitSide::Left);

        let top = board_from_str_array(&["4 3", "0", " K", "...", "...", ".P.", ".P."]).unwrap();
        assert_eq!((top.exit_row(), top.exit_col()), (-1, 1));

        let bottom = board_from_str_array(&["3 1", "0", ".", "P", "P", "K"]).unwrap();
        assert_eq!((bottom.exit_row(), bottom.exit_col()), (3, 0));

        let inside = board_from_str_array(&["1 6", "0", "K..PP."]).unwrap();
        assert_eq!((inside.exit_row(), inside.exit_col()), (0, 0));
        assert_eq!(inside.cell(0, 0), Some(Cell::Exit));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let board = board_from_str_array(&["2 4", "0", "PP..K", ".."]).unwrap();
        assert_eq!(board.cell(1, 3), Some(Cell::Empty));
    }

    #[test]
    fn test_invalid_characters_and_headers() {
        let bad_char = board_from_str_array(&["1 4", "0", "PP#.K"]);
        assert!(matches!(bad_char, Err(PuzzleError::Parse { line: 3, .. })));

        let bad_header = board_from_str_array(&["six six", "0", "PP..K"]);
        assert!(matches!(bad_header, Err(PuzzleError::Parse { line: 1, .. })));

        let bad_count = board_from_str_array(&["1 4", "x", "PP..K"]);
        assert!(matches!(bad_count, Err(PuzzleError::Parse { line: 2, .. })));

        let too_long = board_from_str_array(&["1 4", "0", "PP....K"]);
        assert!(matches!(too_long, Err(PuzzleError::Parse { .. })));

        let too_many_rows = board_from_str_array(&["1 4", "0", "PP..K", "....", "...."]);
        assert!(matches!(too_many_rows, Err(PuzzleError::Parse { .. })));
    }

    #[test]
    fn test_lowercase_piece_ids_are_reported() {
        let result = board_from_str_array(&["2 4", "1", "PP..K", "aa.."]);
        match result {
            Err(PuzzleError::Parse { line, message }) => {
                assert_eq!(line, 4);
                assert!(message.contains("must be uppercase"), "{}", message);
            }
            other => panic!("expected a parse error, got {:?}", other),
        }

        // Lowercase lines after a complete grid are still options.
        let parsed = parse_puzzle("2 4\n1\nPP..K\nAA..\nucs\n").unwrap();
        assert_eq!(parsed.algorithm.as_deref(), Some("ucs"));
    }

    #[test]
    fn test_left_exit_rows_may_skip_blank_column() {
        let board = board_from_str_array(&["3 4", "0", "....", "KPP..", "...."]).unwrap();
        assert_eq!((board.exit_row(), board.exit_col()), (1, -1));
        assert!(board.is_solved());
        assert_eq!(board.cell(0, 3), Some(Cell::Empty));

        let mixed = board_from_str_array(&["3 4", "0", " ....", "K..PP", "...."]).unwrap();
        assert_eq!(mixed.exit_side(), ExitSide::Left);
        assert_eq!(mixed.primary_piece().col(), 2);

        let bad = board_from_str_array(&["3 4", "0", "A....", "KPP..", "...."]);
        assert!(matches!(bad, Err(PuzzleError::Parse { line: 3, .. })));
    }

    #[test]
    fn test_exit_count_and_piece_shape() {
        let no_exit = board_from_str_array(&["1 4", "0", "PP.."]);
        assert!(matches!(no_exit, Err(PuzzleError::InvalidConfiguration(_))));

        let two_exits = board_from_str_array(&["1 4", "0", "KPP.K"]);
        assert!(matches!(two_exits, Err(PuzzleError::InvalidConfiguration(_))));

        let bent = board_from_str_array(&["2 4", "1", "PP..K", ".AA.", "..A."]);
        assert!(bent.is_err());

        let bent = board_from_str_array(&["3 4", "1", "PP..K", ".AA.", "..A."]);
        assert!(matches!(bent, Err(PuzzleError::InvalidConfiguration(_))));

        let single = board_from_str_array(&["2 4", "1", "PP..K", "A..."]);
        assert!(matches!(single, Err(PuzzleError::InvalidConfiguration(_))));

        let too_long = board_from_str_array(&["2 4", "1", "PP..K", "AAAA"]);
        assert!(matches!(too_long, Err(PuzzleError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_declared_count_checked() {
        assert!(board_from_str_array(&["2 4", "2", "PP..K", "AA.."]).is_err());
        assert!(board_from_str_array(&["2 4", "1", "PP..K", "AA.."]).is_ok());
    }

    #[test]
    fn test_parse_puzzle_reads_options() {
        let text = "2 4\n1\nPP..K\nAA..\nastar\ncombined\n";
        let parsed = parse_puzzle(text).unwrap();
        assert_eq!(parsed.algorithm.as_deref(), Some("astar"));
        assert_eq!(parsed.heuristic.as_deref(), Some("combined"));
        assert_eq!(parsed.board().unwrap().pieces().len(), 2);

        let plain = parse_puzzle("2 4\n1\nPP..K\nAA..\n").unwrap();
        assert_eq!(plain.algorithm, None);
        assert_eq!(plain.heuristic, None);

        assert!(parse_puzzle("2 4\n1\nPP..K\nucs\nAA..\n").is_err());
    }

    #[test]
    fn test_puzzle_string_round_trip() {
        let board = board_from_str_array(&[
            "6 6", "3", "AA...B", ".....B", "PP....K", "..C...", "..C...", "......",
        ])
        .unwrap();
        let text = board_to_puzzle_string(&board);
        assert!(text.starts_with("6 6\n3\n"));
        let reparsed = parse_puzzle(&text).unwrap().board().unwrap();
        assert_eq!(reparsed, board);
    }

    #[test]
    fn test_format_solution_lists_moves() {
        let board = board_from_str_array(&["4 4", "1", "....", "PP.AK", "...A", "...."]).unwrap();
        let report = uniform_cost(&board).unwrap();
        let text = format_solution(&board, &report).unwrap();
        assert!(text.contains("Algorithm: ucs"));
        assert!(text.contains("Move 1: A-down-1"));
        assert!(text.contains("Move 2: P-right-2"));
        assert!(text.contains("Moves: 2"));
        assert!(text.contains("Nodes visited: "));

        let stuck = board_from_str_array(&["2 3", "1", "PPAK", "..A"]).unwrap();
        let report = a_star(&stuck, Heuristic::Blocking).unwrap();
        let text = format_solution(&stuck, &report).unwrap();
        assert!(text.contains("No solution found"));
        assert!(!text.contains("Move 1"));
    }

    #[test]
    fn test_save_and_load_files() {
        let dir = std::env::temp_dir();
        let puzzle_path = dir.join(format!("rush_hour_puzzle_{}.txt", std::process::id()));
        let solution_path = dir.join(format!("rush_hour_solution_{}.txt", std::process::id()));

        fs::write(&puzzle_path, "1 5\n0\nPP...K\ngbfs\n").unwrap();
        let parsed = load_puzzle_file(&puzzle_path).unwrap();
        assert_eq!(parsed.algorithm.as_deref(), Some("gbfs"));
        let board = parsed.board().unwrap();

        let report = uniform_cost(&board).unwrap();
        save_solution(&solution_path, &board, &report).unwrap();
        let saved = fs::read_to_string(&solution_path).unwrap();
        assert!(saved.contains("Move 1: P-right-3"));

        fs::remove_file(&puzzle_path).unwrap();
        fs::remove_file(&solution_path).unwrap();

        assert!(matches!(
            load_puzzle_file(dir.join("rush_hour_missing_puzzle.txt")),
            Err(PuzzleError::Io(_))
        ));
    }
}
