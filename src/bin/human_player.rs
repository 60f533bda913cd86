use clap::Parser;
use rush_hour_solver::generator::{generate_board, GeneratorConfig};
use rush_hour_solver::solver::{solve, SearchConfig};
use rush_hour_solver::utils::load_puzzle_file;
use rush_hour_solver::{Board, Move, PuzzleError};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Puzzle file to play; a random board is generated when omitted
    puzzle_file: Option<PathBuf>,

    /// Seed for the random board
    #[clap(short, long, default_value_t = 514514)]
    seed: u64,

    /// Print boards without ANSI colors
    #[clap(long)]
    no_color: bool,
}

fn load_board(args: &Args) -> Result<Board, PuzzleError> {
    match &args.puzzle_file {
        Some(path) => load_puzzle_file(path)?.board(),
        None => generate_board(args.seed, &GeneratorConfig::default()),
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut board = match load_board(&args) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };
    let mut history: Vec<Move> = Vec::new();
    let mut last_piece: Option<char> = None;
    println!("Welcome to Rush Hour!");

    loop {
        println!("---------------------");
        println!("Moves: {}", history.len());
        if args.no_color {
            println!("{}", board);
        } else {
            println!("{}", board.to_string_with_highlight(last_piece));
        }

        if board.is_solved() {
            println!();
            println!("---------------------");
            println!("🎉 SOLVED! 🎉");
            println!("Total Moves: {}", history.len());
            println!("---------------------");
            break;
        }

        print!("Enter your move (e.g. 'A right 2'), 'h' for a hint, 'u' to undo, 'q' to quit: ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "u" => match history.pop() {
                Some(mv) => match board.reverse_move(&mv) {
                    Ok(previous) => {
                        board = previous;
                        last_piece = Some(mv.piece_id());
                        println!("Undid {}.", mv);
                    }
                    Err(err) => {
                        history.push(mv);
                        println!("Cannot undo {}: {}", mv, err);
                    }
                },
                None => println!("Nothing to undo."),
            },
            "h" => match solve(&board, SearchConfig::default()) {
                Ok(report) => match report.solution().and_then(|s| s.moves().first()) {
                    Some(mv) => println!(
                        "Hint: {} ({} moves left with {})",
                        mv,
                        report.move_count().unwrap_or_default(),
                        report.config
                    ),
                    None => println!("No solution exists from here. Try undoing."),
                },
                Err(err) => println!("Hint failed: {}", err),
            },
            text => match text.parse::<Move>() {
                Ok(mv) => match board.apply_move(&mv) {
                    Ok(next) => {
                        board = next;
                        last_piece = Some(mv.piece_id());
                        history.push(mv);
                    }
                    Err(err) => println!("Invalid move: {}", err),
                },
                Err(_) => println!("Invalid input format. Use 'piece direction steps', 'h', 'u' or 'q'."),
            },
        }
    }
}
