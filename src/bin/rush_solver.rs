use clap::Parser;
use rush_hour_solver::solver::{solve, Algorithm, SearchConfig};
use rush_hour_solver::utils::{load_puzzle_file, save_solution};
use rush_hour_solver::{Board, Heuristic, PuzzleError};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search algorithm: astar, dijkstra, gbfs or ucs (overrides the puzzle file)
    #[clap(short, long)]
    algorithm: Option<String>,

    /// Heuristic for astar and gbfs: manhattan, blocking or combined (overrides the puzzle file)
    #[clap(short = 'H', long)]
    heuristic: Option<String>,

    /// Write the solution to this file
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Print boards without ANSI colors
    #[clap(long)]
    no_color: bool,

    /// Path to the puzzle file
    puzzle_file: PathBuf,
}

fn render(board: &Board, highlight: Option<char>, no_color: bool) -> String {
    if no_color {
        board.to_string()
    } else {
        board.to_string_with_highlight(highlight)
    }
}

fn run(args: &Args) -> Result<(), PuzzleError> {
    let parsed = load_puzzle_file(&args.puzzle_file)?;
    let board = parsed.board()?;

    let algorithm = match args.algorithm.as_ref().or(parsed.algorithm.as_ref()) {
        Some(name) => name.parse::<Algorithm>()?,
        None => Algorithm::default(),
    };
    let heuristic = args
        .heuristic
        .as_ref()
        .or(parsed.heuristic.as_ref())
        .map_or(Heuristic::default(), |name| Heuristic::from_name(name));
    let config = SearchConfig::new(algorithm, heuristic);

    println!("Loaded puzzle from {}\n", args.puzzle_file.display());
    println!("Initial board:\n{}\n", render(&board, None, args.no_color));
    println!("Searching with {}...\n", config);

    let report = solve(&board, config)?;
    match report.solution() {
        Some(state) => {
            println!("Solution found ({} moves):\n", state.moves().len());
            let boards = report.replay(&board)?;
            for (i, (mv, after)) in state.moves().iter().zip(&boards).enumerate() {
                println!("Move {}: {}", i + 1, mv);
                println!("{}\n", render(after, Some(mv.piece_id()), args.no_color));
            }
        }
        None => println!("No solution found.\n"),
    }
    println!("Nodes visited: {}", report.stats.nodes_visited);
    println!("States expanded: {}", report.stats.states_expanded);
    println!("Time: {} ms", report.stats.elapsed.as_millis());

    if let Some(path) = &args.output {
        save_solution(path, &board, &report)?;
        println!("\nSolution saved to {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
