// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use e4::{repl, GameState};
use serde::Serialize;
use structopt::StructOpt;

/// Prints the legal moves available after playing a sequence of moves from the starting position.
#[derive(Debug, StructOpt)]
struct Options {
    /// Print the moves as a JSON document instead of one per line.
    #[structopt(long)]
    json: bool,

    /// Moves to play from the starting position before listing, e.g. `e2e4 e7e5`.
    #[structopt(name = "MOVES")]
    moves: Vec<String>,
}

#[derive(Serialize)]
struct MoveRecord {
    notation: String,
    capture: bool,
    promotion: bool,
    en_passant: bool,
}

#[derive(Serialize)]
struct Listing {
    side_to_move: String,
    in_check: bool,
    outcome: Option<String>,
    moves: Vec<MoveRecord>,
}

fn main() -> anyhow::Result<()> {
    let ops = Options::from_args();
    let mut game = GameState::new();
    for mov in &ops.moves {
        let (source, destination) = repl::parse_squares(&[mov.as_str()])?;
        game.play(source, destination)?;
    }

    let moves = game.legal_moves();
    if ops.json {
        let listing = Listing {
            side_to_move: game.side_to_move().to_string(),
            in_check: game.in_check(),
            outcome: game.outcome().map(|o| o.to_string()),
            moves: moves
                .iter()
                .map(|m| MoveRecord {
                    notation: m.notation(),
                    capture: m.is_capture(),
                    promotion: m.is_promotion(),
                    en_passant: m.is_en_passant(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for mov in moves {
            println!("{}", mov);
        }
    }

    Ok(())
}
