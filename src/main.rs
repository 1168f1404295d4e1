use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};

use npuzzle_solver::{read_board, Board, SearchLimits, Solver};

/// Finds a shortest sequence of slides that solves an N-puzzle.
#[derive(Parser, Debug)]
#[command(name = "npuzzle", version, about)]
struct Cli {
    /// Board file: the dimension N followed by N*N tiles, 0 for the blank.
    #[arg(required_unless_present = "random", conflicts_with = "random")]
    path: Option<PathBuf>,

    /// Solve a random scramble of an N×N board instead of reading a file.
    #[arg(long, value_name = "N")]
    random: Option<usize>,

    /// Number of random slides used to scramble the board.
    #[arg(long, default_value_t = 40)]
    scramble: usize,

    /// Seed for the scramble, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after expanding this many search nodes.
    #[arg(long, value_name = "K")]
    max_expansions: Option<usize>,

    /// Print the blank's moves along the solution.
    #[arg(long)]
    moves: bool,

    /// Print search statistics.
    #[arg(long)]
    stats: bool,

    /// Disable terminal styling.
    #[arg(long)]
    plain: bool,

    /// Log search progress at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let initial = load_board(cli)?;

    if cli.random.is_some() {
        println!("Scrambled puzzle:\n{}", render(&initial, cli.plain));
    }

    let limits = SearchLimits {
        max_expansions: cli.max_expansions,
    };
    let solver = Solver::with_limits(initial, limits)?;

    match solver.solution() {
        None => println!("{}", heading("No solution possible", cli.plain)),
        Some(path) => {
            let title = format!("Minimum number of moves = {}", solver.moves());
            println!("{}", heading(&title, cli.plain));
            for board in &path {
                println!("{}", render(board, cli.plain));
            }

            if cli.moves {
                if let Some(moves) = solver.solution_moves() {
                    let list: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                    println!("{}", list.join(" "));
                }
            }
        }
    }

    if cli.stats {
        let stats = solver.stats();
        println!(
            "expanded {} (twin {}), generated {} (twin {})",
            stats.expanded, stats.twin_expanded, stats.generated, stats.twin_generated
        );
    }

    Ok(())
}

fn load_board(cli: &Cli) -> Result<Board, Box<dyn Error>> {
    match (&cli.path, cli.random) {
        (_, Some(size)) => {
            let board = match cli.seed {
                Some(seed) => Board::scrambled(size, cli.scramble, &mut StdRng::seed_from_u64(seed))?,
                None => Board::scrambled(size, cli.scramble, &mut thread_rng())?,
            };
            Ok(board)
        }
        (Some(path), None) => Ok(read_board(path)?),
        (None, None) => Err("no board given".into()),
    }
}

fn heading(text: &str, plain: bool) -> String {
    if plain {
        text.to_string()
    } else {
        text.to_string().bold().to_string()
    }
}

/// Same layout as `Board`'s `Display`, with the blank dimmed.
fn render(board: &Board, plain: bool) -> String {
    if plain {
        return board.to_string();
    }

    let mut out = format!("{}\n", board.dimension());
    for row in board.rows() {
        for &val in row {
            let cell = format!("{:2} ", val);
            if val == 0 {
                let _ = write!(out, "{}", cell.dim());
            } else {
                out.push_str(&cell);
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_path_and_random_conflict() {
        assert!(Cli::try_parse_from(["npuzzle", "board.txt", "--random", "3"]).is_err());
        assert!(Cli::try_parse_from(["npuzzle"]).is_err());

        let cli = Cli::try_parse_from(["npuzzle", "--random", "3", "--seed", "9"]).unwrap();
        assert_eq!(cli.random, Some(3));
        assert_eq!(cli.scramble, 40);
        assert_eq!(cli.seed, Some(9));
    }

    #[test]
    fn test_seeded_scramble_is_reproducible() {
        let cli = Cli::try_parse_from(["npuzzle", "--random", "3", "--seed", "5"]).unwrap();
        assert_eq!(load_board(&cli).unwrap(), load_board(&cli).unwrap());
    }

    #[test]
    fn test_render_plain_matches_display() {
        let board = Board::goal(2).unwrap();
        assert_eq!(render(&board, true), "2\n 1  2 \n 3  0 \n");
        assert!(render(&board, false).contains(" 1  2 \n"));
    }
}
