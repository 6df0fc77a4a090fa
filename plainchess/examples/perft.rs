/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use clap::Parser;
use tracing_subscriber::EnvFilter;

use plainchess::{print_perft, Move, Position};

/// Compute total number of states reachable from a position, given a depth.
#[derive(Debug, Parser)]
struct Cli {
    /// Depth to run the perft.
    depth: usize,

    /// The FEN string of the position to run the perft on. Defaults to the starting position.
    #[arg(short, long)]
    fen: Option<String>,

    /// List of moves (such as `e2e4`) to apply to the position before running the perft.
    #[arg(required = false)]
    moves: Vec<String>,

    /// If set, perform a splitperft, displaying the number of nodes reachable after each move available from the root.
    #[arg(short, long, default_value = "false")]
    split: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    let mut position = match &args.fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::default(),
    };

    // Apply moves, if any were provided
    for mv_str in &args.moves {
        let mv = Move::from_uci(position.board(), mv_str)?;
        if !position.get_valid_moves().contains(&mv) {
            anyhow::bail!("{mv} is not legal in {position}");
        }
        position.make_move(mv);
    }

    println!(
        "Computing PERFT({}) of the following position:\n{:?}\n",
        args.depth, position
    );

    if args.split {
        print_perft::<true>(&mut position, args.depth);
    } else {
        print_perft::<false>(&mut position, args.depth);
    }

    Ok(())
}
