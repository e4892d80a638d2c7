//! Cube Solver
//!
//! Scrambles a cube from a seed and finds a shortest move sequence back to
//! the scrambled state with a bidirectional breadth-first search. Also prints
//! scrambles and counts positions by distance from solved.

use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rcube::moves::{format_moves, NUM_FACES, NUM_MOVES};
use rcube::scaling::solve_batched;
use rcube::scramble::{scrambled_state, DEFAULT_SCRAMBLE_LENGTH};
use rcube::{display, search, CubeState, MoveTable, SearchConfig, SolveError};

/// Finds shortest move sequences between cube states.
#[derive(Parser)]
#[command(name = "rcube")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scramble the solved cube and search for a shortest solution.
    Solve(SolveArgs),
    /// Print a scramble and the resulting cube.
    Scramble {
        /// Seed for the scramble generator.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Number of random moves.
        #[arg(long, default_value_t = DEFAULT_SCRAMBLE_LENGTH)]
        length: usize,
    },
    /// Count positions at each distance from the solved cube.
    Census {
        /// Deepest distance to count.
        #[arg(long, default_value_t = 4)]
        depth: usize,
        /// Use only the six quarter turns instead of all 18 moves.
        #[arg(long)]
        quarter_only: bool,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// Seed for the scramble generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Number of random moves in the scramble.
    #[arg(long, default_value_t = 6)]
    length: usize,
    /// Abandon the search after this many positions.
    #[arg(long)]
    max_positions: Option<usize>,
    /// Recheck label conservation after every move.
    #[arg(long)]
    verify: bool,
    /// Use the split rotator/checker search.
    #[arg(long)]
    batched: bool,
}

impl Default for SolveArgs {
    fn default() -> Self {
        Self {
            seed: 0,
            length: 6,
            max_positions: None,
            verify: false,
            batched: false,
        }
    }
}

impl SolveArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            max_positions: self.max_positions,
            verify_states: self.verify,
            ..SearchConfig::default()
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let table = MoveTable::new();
    let result = table.validate().and_then(|()| match cli.command {
        Some(Command::Solve(args)) => run_solve(&table, &args),
        Some(Command::Scramble { seed, length }) => run_scramble(&table, seed, length),
        Some(Command::Census {
            depth,
            quarter_only,
        }) => run_census(&table, depth, quarter_only),
        None => run_solve(&table, &SolveArgs::default()),
    });

    if let Err(e) = result {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Installs the log subscriber; `RCUBE_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let log_format = std::env::var("RCUBE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rcube=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

/// Scrambles, solves, and prints the solution.
fn run_solve(table: &MoveTable, args: &SolveArgs) -> Result<(), SolveError> {
    let (goal, scramble) = scrambled_state(table, args.seed, args.length)?;
    let start = CubeState::solved();
    println!("Scramble ({} moves): {}", scramble.len(), format_moves(&scramble));
    print!("{}", display::render(&goal));

    let began = Instant::now();
    let (distance, positions) = if args.batched {
        let outcome = solve_batched(table, &start, &goal, &args.config())?;
        (outcome.distance, outcome.positions_explored)
    } else {
        let outcome = search::solve_with(table, &start, &goal, args.config())?;
        println!("Solution: {}", format_moves(&outcome.moves));
        (outcome.distance, outcome.positions_explored)
    };
    let elapsed = began.elapsed();

    println!("Distance: {}", distance);
    println!(
        "Explored {} positions in {:.2?} ({:.0} positions/s)",
        positions,
        elapsed,
        positions as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}

/// Prints a scramble and the cube it produces.
fn run_scramble(table: &MoveTable, seed: u64, length: usize) -> Result<(), SolveError> {
    let (state, moves) = scrambled_state(table, seed, length)?;
    println!("{}", format_moves(&moves));
    print!("{}", display::render(&state));
    Ok(())
}

/// Prints how many positions sit at each distance from solved.
fn run_census(table: &MoveTable, depth: usize, quarter_only: bool) -> Result<(), SolveError> {
    let moves: Vec<usize> = if quarter_only {
        (0..NUM_FACES).collect()
    } else {
        (0..NUM_MOVES).collect()
    };
    let counts = search::distance_census(table, &moves, depth)?;
    let mut total = 0;
    for (distance, count) in counts.iter().enumerate() {
        total += count;
        println!("distance {:>2}: {:>10} positions ({} total)", distance, count, total);
    }
    Ok(())
}
