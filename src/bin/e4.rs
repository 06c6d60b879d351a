// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{fs::File, path::PathBuf};

use e4::{repl, tracing::game::GameLogLayer};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

/// Play a game of chess over stdin and stdout.
#[derive(Debug, StructOpt)]
struct Options {
    /// If set, record every move applied and taken back to this file, one JSON object per line.
    #[structopt(long, parse(from_os_str))]
    game_log: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Options::from_args();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("E4_LOG")
                .from_env_lossy(),
        );

    let game_log = match args.game_log {
        Some(path) => Some(GameLogLayer::new(File::create(path)?)),
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(game_log)
        .try_init()?;

    repl::run()?;
    Ok(())
}
