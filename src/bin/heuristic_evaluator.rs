use clap::Parser;
use rush_hour_solver::generator::{generate_board, GeneratorConfig};
use rush_hour_solver::solver::{solve, Algorithm, SearchConfig};
use rush_hour_solver::Heuristic;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of random boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first board; board i uses seed + i
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Side length of the square boards
    #[clap(long, default_value_t = 6)]
    size: usize,

    /// Maximum number of non-primary pieces per board
    #[clap(short, long, default_value_t = 8)]
    pieces: usize,

    /// Random moves applied after placing the pieces
    #[clap(long, default_value_t = 40)]
    scramble: usize,
}

/// Running totals for one configuration.
#[derive(Default)]
struct Totals {
    solved: usize,
    moves: usize,
    /// Moves beyond the uniform-cost optimum, summed over solved boards.
    excess_moves: usize,
    nodes_visited: usize,
    elapsed: Duration,
}

fn all_configs() -> Vec<SearchConfig> {
    let mut configs = Vec::new();
    for algorithm in Algorithm::ALL {
        if algorithm.uses_heuristic() {
            for heuristic in Heuristic::ALL {
                configs.push(SearchConfig::new(algorithm, heuristic));
            }
        } else {
            configs.push(SearchConfig::new(algorithm, Heuristic::default()));
        }
    }
    configs
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let generator = GeneratorConfig {
        rows: args.size,
        cols: args.size,
        blockers: args.pieces,
        scramble_moves: args.scramble,
        ..GeneratorConfig::default()
    };
    let configs = all_configs();
    let mut totals: Vec<Totals> = configs.iter().map(|_| Totals::default()).collect();
    let mut unsolvable = 0;

    println!("Starting heuristic evaluation for {} boards...", args.boards);

    for board_idx in 0..args.boards {
        let current_seed = args.seed + board_idx as u64;
        let board = match generate_board(current_seed, &generator) {
            Ok(board) => board,
            Err(err) => {
                eprintln!("Error: cannot generate board {}: {}", board_idx, err);
                std::process::exit(1);
            }
        };

        println!("\nEvaluating Board {} (Seed: {})", board_idx, current_seed);

        let optimal = match solve(&board, SearchConfig::new(Algorithm::UniformCost, Heuristic::default())) {
            Ok(report) => report.move_count(),
            Err(err) => {
                eprintln!("Error: search failed on board {}: {}", board_idx, err);
                continue;
            }
        };
        let Some(optimal) = optimal else {
            println!("  No solution exists, skipping.");
            unsolvable += 1;
            continue;
        };

        for (config, total) in configs.iter().zip(totals.iter_mut()) {
            let report = match solve(&board, *config) {
                Ok(report) => report,
                Err(err) => {
                    eprintln!("Error: {} failed on board {}: {}", config, board_idx, err);
                    continue;
                }
            };
            let moves = report.move_count().unwrap_or_default();
            if report.is_solved() {
                total.solved += 1;
                total.moves += moves;
                total.excess_moves += moves.saturating_sub(optimal);
            }
            total.nodes_visited += report.stats.nodes_visited;
            total.elapsed += report.stats.elapsed;
            println!(
                "  Config: {:<22} Moves: {:<4} Nodes: {:<8} Time: {} ms",
                config.to_string(),
                moves,
                report.stats.nodes_visited,
                report.stats.elapsed.as_millis()
            );
        }
    }

    let evaluated = args.boards - unsolvable;
    println!("\n--- Evaluation Complete ---");
    println!("Number of boards generated: {}", args.boards);
    println!("Boards without a solution: {}", unsolvable);
    println!(
        "Configurations evaluated: {}",
        configs.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
    );
    if evaluated == 0 {
        return;
    }

    println!("\n--- Averages over {} solvable boards ---", evaluated);
    let mut averages: Vec<(String, f64, f64, f64, f64)> = configs
        .iter()
        .zip(&totals)
        .map(|(config, total)| {
            let per_solved = |value: usize| {
                if total.solved == 0 {
                    0.0
                } else {
                    value as f64 / total.solved as f64
                }
            };
            (
                config.to_string(),
                per_solved(total.moves),
                per_solved(total.excess_moves),
                total.nodes_visited as f64 / evaluated as f64,
                total.elapsed.as_secs_f64() * 1000.0 / evaluated as f64,
            )
        })
        .collect();

    // Fewest nodes first
    averages.sort_by(|a, b| a.3.partial_cmp(&b.3).unwrap_or(std::cmp::Ordering::Equal));

    for (name, moves, excess, nodes, millis) in averages {
        println!(
            "Config {:<22}: Moves = {:.2} (+{:.2}), Nodes = {:.1}, Time = {:.2} ms",
            name, moves, excess, nodes, millis
        );
    }
}
