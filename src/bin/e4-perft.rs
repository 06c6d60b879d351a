// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::time::Instant;

use e4::{movegen, repl, GameState};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Options {
    /// The depth to search to.
    #[structopt(short, long)]
    depth: u32,

    /// If set, print the node count below each legal move of the root position.
    #[structopt(long)]
    divide: bool,

    /// Moves to play from the starting position before counting, e.g. `e2e4 e7e5`.
    #[structopt(name = "MOVES")]
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let ops = Options::from_args();
    let mut game = GameState::new();
    for mov in &ops.moves {
        let (source, destination) = repl::parse_squares(&[mov.as_str()])?;
        game.play(source, destination)?;
    }

    let start = Instant::now();
    let count = if ops.divide && ops.depth > 0 {
        let mut total = 0;
        for mov in game.legal_moves() {
            game.apply(mov);
            let nodes = movegen::perft(&mut game, ops.depth - 1);
            game.undo();
            println!("{}: {}", mov, nodes);
            total += nodes;
        }
        total
    } else {
        movegen::perft(&mut game, ops.depth)
    };

    println!("{}", count);
    eprintln!("{:?} elapsed", start.elapsed());
    Ok(())
}
