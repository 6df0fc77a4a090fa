/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{self, BufRead, Write};

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use plainchess::{Game, Selection, Square, BOARD_SIZE};

/// Play chess in the terminal, two players on one keyboard.
///
/// Type a square (such as `e2`) to select it, then another to move there.
/// Both squares may be typed at once (`e2e4`). `z` takes back the last move and `q` quits.
#[derive(Debug, Parser)]
struct Cli {
    /// FEN string of the position to start from. Defaults to the starting position.
    #[arg(short, long)]
    fen: Option<String>,

    /// Print the legal moves before every turn.
    #[arg(short, long, default_value = "false")]
    hints: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();
    let mut game = match &args.fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        draw(&game);

        let status = game.status();
        if status.is_over() {
            println!("{}", status.to_string().bold());
            println!("Type `z` to take back the last move, or anything else to quit.");
        } else {
            if args.hints {
                let hints = game
                    .legal_moves()
                    .iter()
                    .map(|mv| mv.chess_notation())
                    .collect::<Vec<_>>();
                println!("{}", hints.join(" ").dimmed());
            }
            print!("{} to move> ", game.side_to_move().name());
        }
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let input = line.trim();

        match input {
            "q" | "quit" => break,
            "z" => {
                if game.undo().is_none() {
                    println!("{}", "Nothing to take back.".yellow());
                }
                continue;
            }
            _ if status.is_over() => break,
            _ => {}
        }

        // One square per click; a full move is just two clicks
        let squares = input
            .as_bytes()
            .chunks(2)
            .map(|chunk| std::str::from_utf8(chunk).map_err(anyhow::Error::from))
            .map(|uci| uci.and_then(Square::from_uci))
            .collect::<anyhow::Result<Vec<_>>>();

        let squares = match squares {
            Ok(squares) => squares,
            Err(err) => {
                println!("{}", err.to_string().red());
                continue;
            }
        };

        for square in squares {
            match game.click(square) {
                Selection::Rejected(square) => {
                    println!("{}", format!("Illegal move. Selected {square}.").red())
                }
                Selection::Moved(mv) => println!("Played {}", mv.chess_notation().green()),
                Selection::Selected(_) | Selection::Deselected => {}
            }
        }
    }

    println!("Moves: {}", game.move_log().join(" "));
    Ok(())
}

/// Prints the board with alternating square shading, highlighting the selected square and the last move.
fn draw(game: &Game) {
    let last = game.last_move().map(|mv| mv.squares());

    println!();
    for row in 0..BOARD_SIZE as u8 {
        print!("{} ", Square::new(row, 0).rank_char());

        for col in 0..BOARD_SIZE as u8 {
            let square = Square::new(row, col);
            let text = match game.board().piece_at(square) {
                Some(piece) if piece.color().is_white() => {
                    format!(" {} ", piece.char()).bright_white().bold()
                }
                Some(piece) => format!(" {} ", piece.char()).black().bold(),
                None => "   ".normal(),
            };

            let text = if game.selected() == Some(square) {
                text.on_yellow()
            } else if last.is_some_and(|(from, to)| from == square || to == square) {
                text.on_green()
            } else if (row + col) % 2 == 0 {
                text.on_bright_black()
            } else {
                text.on_blue()
            };
            print!("{text}");
        }
        println!();
    }

    print!("  ");
    for col in 0..BOARD_SIZE as u8 {
        print!(" {} ", Square::new(0, col).file_char());
    }
    println!();

    if game.is_in_check() && !game.status().is_over() {
        println!("{}", "Check!".red().bold());
    }
}
