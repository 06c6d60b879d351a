// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use e4::tracing::game::{self, GameEvent};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Replays a game log, as produced by `e4 --game-log`, and prints the final position.
#[derive(Debug, StructOpt)]
struct Options {
    /// A game log to replay.
    #[structopt(name = "GAME_LOG", parse(from_os_str))]
    game_log: PathBuf,

    /// Print the board after every move.
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .with_env_filter(EnvFilter::from_env("E4_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Options::from_args();
    let file = File::open(&args.game_log)?;
    let reader = BufReader::new(file);
    let mut events = vec![];
    for line in reader.lines() {
        let line = line?;
        let event: GameEvent = serde_json::from_str(&line)?;
        events.push(event);
    }

    let verbose = args.verbose;
    let mut replayed = game::replay(events, |notation, pos| {
        if verbose {
            println!("{}", notation);
            println!("{}", pos);
        }
    })?;

    let game = &mut replayed.game;
    game.legal_moves();
    println!("== Final Position ===============");
    println!("{}", game);
    println!("== Game =========================");
    println!("{:<20} {}", "Games in Log:", replayed.games);
    let moves: Vec<_> = game.history().iter().map(|m| m.notation()).collect();
    println!("{:<20} {}", "Moves:", moves.join(" "));
    let outcome = game
        .outcome()
        .map(|o| o.to_string())
        .unwrap_or_else(|| "in progress".to_owned());
    println!("{:<20} {}", "Result:", outcome);
    if let Some(recorded) = replayed.recorded_outcome {
        println!("{:<20} {}", "Recorded Result:", recorded);
    }

    Ok(())
}
