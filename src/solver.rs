//! Best-first search over board configurations.
//!
//! All four algorithms run the same loop and differ only in the priority they
//! pop by and whether they keep a best-known-cost map:
//!
//! | Algorithm          | Priority | Heuristic | Relaxation |
//! |--------------------|----------|-----------|------------|
//! | A*                 | g + h    | yes       | yes        |
//! | Dijkstra           | g        | no        | yes        |
//! | Greedy best-first  | h        | yes       | no         |
//! | Uniform cost       | g        | no        | no         |
use crate::board::{Board, Cell};
use crate::error::PuzzleError;
use crate::heuristics::Heuristic;
use crate::state::GameState;
use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// The search strategy to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    #[default]
    AStar,
    Dijkstra,
    GreedyBestFirst,
    UniformCost,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::AStar,
        Algorithm::Dijkstra,
        Algorithm::GreedyBestFirst,
        Algorithm::UniformCost,
    ];

    /// Whether the algorithm consults a heuristic at all.
    pub fn uses_heuristic(self) -> bool {
        matches!(self, Algorithm::AStar | Algorithm::GreedyBestFirst)
    }

    /// Whether successors are filtered through a best-known-g map.
    fn relaxes(self) -> bool {
        matches!(self, Algorithm::AStar | Algorithm::Dijkstra)
    }

    fn priority(self, state: &GameState) -> u32 {
        match self {
            Algorithm::AStar => state.f(),
            Algorithm::Dijkstra | Algorithm::UniformCost => state.g(),
            Algorithm::GreedyBestFirst => state.h(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::AStar => "astar",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::GreedyBestFirst => "gbfs",
            Algorithm::UniformCost => "ucs",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "astar" | "a*" | "a-star" => Ok(Algorithm::AStar),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "gbfs" | "greedy" => Ok(Algorithm::GreedyBestFirst),
            "ucs" | "uniform" => Ok(Algorithm::UniformCost),
            other => Err(PuzzleError::invalid(format!("unknown algorithm '{}'", other))),
        }
    }
}

/// Algorithm and heuristic for one search call.
///
/// The heuristic is ignored by Dijkstra and uniform-cost search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
}

impl SearchConfig {
    pub fn new(algorithm: Algorithm, heuristic: Heuristic) -> Self {
        SearchConfig {
            algorithm,
            heuristic,
        }
    }

    /// The heuristic actually in effect, if any.
    pub fn active_heuristic(&self) -> Option<Heuristic> {
        self.algorithm.uses_heuristic().then_some(self.heuristic)
    }
}

impl fmt::Display for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.active_heuristic() {
            Some(h) => write!(f, "{} ({})", self.algorithm, h),
            None => write!(f, "{}", self.algorithm),
        }
    }
}

/// Counters gathered during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Every pop from the frontier, including stale duplicates.
    pub nodes_visited: usize,
    /// Distinct configurations closed and expanded.
    pub states_expanded: usize,
    pub elapsed: Duration,
}

/// How a search ended.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    /// The terminal state; its move list is the solution.
    Solved(GameState),
    /// Every reachable configuration was expanded without reaching the exit.
    NoSolution,
}

/// Outcome and statistics of one search.
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub config: SearchConfig,
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

impl SearchReport {
    pub fn solution(&self) -> Option<&GameState> {
        match &self.outcome {
            SearchOutcome::Solved(state) => Some(state),
            SearchOutcome::NoSolution => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.solution().is_some()
    }

    /// Number of moves in the solution, if one was found.
    pub fn move_count(&self) -> Option<usize> {
        self.solution().map(|s| s.moves().len())
    }

    /// Replays the solution from `initial`, returning the board after each move.
    ///
    /// The last board equals the terminal state's board. Returns an empty list
    /// when there is no solution or it has no moves.
    pub fn replay(&self, initial: &Board) -> Result<Vec<Board>, PuzzleError> {
        let mut boards = Vec::new();
        let mut current = initial.clone();
        for mv in self.solution().map(|s| s.moves()).unwrap_or_default() {
            current = current.apply_move(mv)?;
            boards.push(current.clone());
        }
        Ok(boards)
    }
}

/// Frontier entry ordered as a min-heap on `(priority, seq)`.
///
/// `seq` is the insertion counter, so equal priorities pop first-in first-out
/// and repeated runs pop in the same order.
struct Frontier {
    priority: u32,
    seq: u64,
    state: GameState,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Runs the configured search from `board`.
///
/// Returns `SearchOutcome::NoSolution` once the reachable configurations are
/// exhausted. Errors only surface if move application breaks its own invariants.
pub fn solve(board: &Board, config: SearchConfig) -> Result<SearchReport, PuzzleError> {
    let algorithm = config.algorithm;
    let start_time = Instant::now();
    debug!("starting {} on {}x{} board", config, board.rows(), board.cols());

    let mut open = BinaryHeap::new();
    let mut closed: FxHashSet<Box<[Cell]>> = FxHashSet::default();
    let mut best_g: FxHashMap<Box<[Cell]>, u32> = FxHashMap::default();
    let mut stats = SearchStats::default();
    let mut seq: u64 = 0;

    let start = GameState::new(board.clone(), config.active_heuristic());
    if algorithm.relaxes() {
        best_g.insert(start.board().cells().into(), 0);
    }
    open.push(Frontier {
        priority: algorithm.priority(&start),
        seq,
        state: start,
    });

    let mut outcome = SearchOutcome::NoSolution;
    while let Some(Frontier { state: current, .. }) = open.pop() {
        stats.nodes_visited += 1;
        trace!(
            "pop g={} h={} moves={}",
            current.g(),
            current.h(),
            current.moves().len()
        );

        if current.is_goal() {
            outcome = SearchOutcome::Solved(current);
            break;
        }

        if closed.contains(current.board().cells()) {
            continue;
        }
        closed.insert(current.board().cells().into());
        stats.states_expanded += 1;

        for successor in current.successors()? {
            let key = successor.board().cells();
            if closed.contains(key) {
                continue;
            }
            if algorithm.relaxes() {
                let improves = best_g.get(key).map_or(true, |&g| successor.g() < g);
                if !improves {
                    continue;
                }
                best_g.insert(key.into(), successor.g());
            }
            seq += 1;
            open.push(Frontier {
                priority: algorithm.priority(&successor),
                seq,
                state: successor,
            });
        }
    }

    stats.elapsed = start_time.elapsed();
    match &outcome {
        SearchOutcome::Solved(state) => debug!(
            "{} solved in {} moves, {} nodes visited, {} expanded, {:?}",
            config,
            state.moves().len(),
            stats.nodes_visited,
            stats.states_expanded,
            stats.elapsed
        ),
        SearchOutcome::NoSolution => debug!(
            "{} found no solution after {} nodes visited, {} expanded, {:?}",
            config, stats.nodes_visited, stats.states_expanded, stats.elapsed
        ),
    }

    Ok(SearchReport {
        config,
        outcome,
        stats,
    })
}

/// A* ordered by `g + h`.
pub fn a_star(board: &Board, heuristic: Heuristic) -> Result<SearchReport, PuzzleError> {
    solve(board, SearchConfig::new(Algorithm::AStar, heuristic))
}

/// Dijkstra ordered by `g`, with cost relaxation.
pub fn dijkstra(board: &Board) -> Result<SearchReport, PuzzleError> {
    solve(board, SearchConfig::new(Algorithm::Dijkstra, Heuristic::default()))
}

/// Greedy best-first search ordered by `h` alone.
pub fn greedy_best_first(board: &Board, heuristic: Heuristic) -> Result<SearchReport, PuzzleError> {
    solve(board, SearchConfig::new(Algorithm::GreedyBestFirst, heuristic))
}

/// Uniform-cost search ordered by `g`, without a relaxation map.
pub fn uniform_cost(board: &Board) -> Result<SearchReport, PuzzleError> {
    solve(board, SearchConfig::new(Algorithm::UniformCost, Heuristic::default()))
}
