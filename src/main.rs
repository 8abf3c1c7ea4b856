//! Command line front end: list legal moves, count perft nodes, or play random games.
//!
//! Usage: cargo run --release -- perft --depth 4
//!        cargo run -- moves --board "r3k2r/8/8/8/8/8/8/R3K2R" --castling KQkq
//!        RUST_LOG=chesskit=debug cargo run -- playout --plies 60 --seed 7

use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use itertools::Itertools;
use rand::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chesskit::perft::{perft, perft_divide, perft_parallel};
use chesskit::{
    draw_board, parse_board_notation, CastlingRights, ChessBoard, Color, DenseBoard, GameState,
    MoveGenerator, RuleSet, SparseBoard, STANDARD_BOARD_NOTATION,
};

#[derive(Parser, Debug)]
#[command(name = "chesskit")]
#[command(about = "Chess rules engine: legal moves, perft and random playouts")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the legal moves of a position
    Moves {
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Count the leaf nodes of the move tree
    Perft {
        #[command(flatten)]
        position: PositionArgs,

        #[arg(short, long, default_value_t = 3)]
        depth: u8,

        /// Split root moves across threads
        #[arg(long)]
        parallel: bool,

        /// Print the node count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Play random legal moves from the starting position, then take them all back
    Playout {
        #[arg(long, default_value_t = 40)]
        plies: usize,

        /// Seed for the move picker; random when absent
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args, Debug)]
struct PositionArgs {
    /// Board part of the position, ranks separated by `/`
    #[arg(long, default_value = STANDARD_BOARD_NOTATION)]
    board: String,

    /// Black to move
    #[arg(long)]
    black: bool,

    /// Castling rights such as `KQkq`, or `-`
    #[arg(long, default_value = "KQkq")]
    castling: String,

    /// Store the board in a map instead of a grid
    #[arg(long)]
    sparse: bool,
}

impl PositionArgs {
    fn game_state<B: ChessBoard>(&self) -> Result<GameState<B>> {
        let board: B = parse_board_notation(&self.board)?;
        let rights = CastlingRights::from_symbols(&self.castling)?;
        Ok(GameState::new(board, Color::from_is_white(!self.black)).with_castling_rights(rights))
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .map_err(|e| eyre!("invalid log filter `{}`: {}", cli.log_level, e))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Moves { position } => {
            if position.sparse {
                print_moves::<SparseBoard>(&position)
            } else {
                print_moves::<DenseBoard>(&position)
            }
        }
        Command::Perft {
            position,
            depth,
            parallel,
            divide,
        } => {
            if position.sparse {
                run_perft::<SparseBoard>(&position, depth, parallel, divide)
            } else {
                run_perft::<DenseBoard>(&position, depth, parallel, divide)
            }
        }
        Command::Playout { plies, seed } => run_playout(plies, seed),
    }
}

fn print_moves<B: ChessBoard>(position: &PositionArgs) -> Result<()> {
    let mut state = position.game_state::<B>()?;
    let rules = RuleSet::standard();
    let moves = rules.generate_moves(&mut state)?;

    print!("{}", draw_board(state.board()));
    println!();
    for mv in &moves {
        println!("{:<8} {}", mv.to_algebraic(), mv.to_human());
    }
    println!();
    println!("{} legal moves, {:?}", moves.len(), rules.status(&mut state)?);
    Ok(())
}

fn run_perft<B: ChessBoard>(
    position: &PositionArgs,
    depth: u8,
    parallel: bool,
    divide: bool,
) -> Result<()> {
    let mut state = position.game_state::<B>()?;
    let rules = RuleSet::standard();
    let start = Instant::now();

    let nodes = if divide {
        let divided = perft_divide(&mut state, &rules, depth)?;
        for (mv, nodes) in &divided {
            println!("{}: {}", mv, nodes);
        }
        divided.iter().map(|(_, nodes)| nodes).sum::<u64>()
    } else if parallel {
        perft_parallel(&state, &rules, depth)?
    } else {
        perft(&mut state, &rules, depth)?
    };

    let elapsed = start.elapsed();
    info!(depth, nodes, ?elapsed, "perft finished");
    println!();
    println!("Nodes searched: {}", nodes);
    println!(
        "Time: {:.3}s ({:.0} nodes/s)",
        elapsed.as_secs_f64(),
        nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}

fn run_playout(plies: usize, seed: Option<u64>) -> Result<()> {
    let seed = seed.unwrap_or_else(|| thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    let rules = RuleSet::standard();
    let mut state: GameState = GameState::standard();
    let start = state.clone();

    for _ in 0..plies {
        let moves = rules.generate_moves(&mut state)?.into_vec();
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        println!("{:<4} {}", state.history_len() + 1, mv.to_human());
        state.make_move(mv)?;
    }

    println!("{}", state.history().map(|mv| mv.to_algebraic()).join(" "));
    print!("{}", draw_board(state.board()));
    println!("{:?} after {} plies (seed {})", rules.status(&mut state)?, state.history_len(), seed);

    while state.history_len() > 0 {
        state.unmake_last_move()?;
    }
    if state != start {
        bail!("taking every move back did not restore the starting position");
    }
    info!(seed, "playout unwound cleanly");
    Ok(())
}
