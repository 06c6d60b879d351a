// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A line-oriented text protocol for playing a game of e4 from a terminal or another program.
//!
//! Each line is a command followed by its arguments:
//!
//! * `new` starts a new game from the standard position.
//! * `board` prints the board and the side to move.
//! * `moves` lists the legal moves for the side to move.
//! * `move e2e4` (or `move e2 e4`) plays a move.
//! * `undo` takes back the last move.
//! * `status` reports check, checkmate or stalemate.
//! * `history` lists the moves played so far.
//! * `quit` ends the session.

use std::io::{self, BufRead, Write};

use anyhow::anyhow;

use crate::{core::Square, GameState};

/// Runs the protocol over stdin and stdout until `quit` or end of input.
pub fn run() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with(stdin.lock(), stdout.lock())
}

pub fn run_with<R: BufRead, W: Write>(input: R, mut output: W) -> io::Result<()> {
    let mut game = GameState::new();
    for maybe_line in input.lines() {
        let line = maybe_line?;
        let components: Vec<_> = line.split_whitespace().collect();
        let (&command, arguments) = components.split_first().unwrap_or((&"", &[]));
        let result = match (command, arguments) {
            ("", []) => Ok(()),
            ("quit", []) => break,
            ("new", []) => {
                game = GameState::new();
                Ok(())
            }
            ("board", []) => write!(output, "{}", game).map_err(anyhow::Error::from),
            ("moves", []) => handle_moves(&mut game, &mut output),
            ("move", args) => handle_move(&mut game, args, &mut output),
            ("undo", []) => handle_undo(&mut game, &mut output),
            ("status", []) => handle_status(&mut game, &mut output),
            ("history", []) => handle_history(&game, &mut output),
            _ => Err(anyhow!("unrecognized command: {} {:?}", command, arguments)),
        };

        if let Err(e) = result {
            writeln!(output, "error: {}", e)?;
        }

        output.flush()?;
    }

    Ok(())
}

fn handle_moves<W: Write>(game: &mut GameState, output: &mut W) -> anyhow::Result<()> {
    let moves: Vec<_> = game.legal_moves().iter().map(|m| m.notation()).collect();
    writeln!(output, "{}", moves.join(" "))?;
    Ok(())
}

fn handle_move<W: Write>(game: &mut GameState, args: &[&str], output: &mut W) -> anyhow::Result<()> {
    let (source, destination) = parse_squares(args)?;
    let mov = game.play(source, destination)?;
    writeln!(output, "played {}", mov)?;
    report_outcome(game, output)
}

fn handle_undo<W: Write>(game: &mut GameState, output: &mut W) -> anyhow::Result<()> {
    let mov = match game.history().last() {
        Some(&mov) => mov,
        None => return Err(anyhow!("no moves to take back")),
    };

    game.undo();
    writeln!(output, "took back {}", mov)?;
    Ok(())
}

fn handle_status<W: Write>(game: &mut GameState, output: &mut W) -> anyhow::Result<()> {
    game.legal_moves();
    if let Some(outcome) = game.outcome() {
        writeln!(output, "{}", outcome)?;
    } else if game.in_check() {
        writeln!(output, "{} to move, in check", game.side_to_move())?;
    } else {
        writeln!(output, "{} to move", game.side_to_move())?;
    }

    Ok(())
}

fn handle_history<W: Write>(game: &GameState, output: &mut W) -> anyhow::Result<()> {
    let moves: Vec<_> = game.history().iter().map(|m| m.notation()).collect();
    writeln!(output, "{}", moves.join(" "))?;
    Ok(())
}

/// After a move, tells the player if the game has just ended.
fn report_outcome<W: Write>(game: &mut GameState, output: &mut W) -> anyhow::Result<()> {
    game.legal_moves();
    if let Some(outcome) = game.outcome() {
        writeln!(output, "{}", outcome)?;
    }

    Ok(())
}

/// Accepts either a single four-character token (`e2e4`) or two squares (`e2 e4`).
pub fn parse_squares(args: &[&str]) -> anyhow::Result<(Square, Square)> {
    match args {
        [both] if both.len() == 4 && both.is_ascii() => {
            let (source, destination) = both.split_at(2);
            Ok((source.parse()?, destination.parse()?))
        }
        [source, destination] => Ok((source.parse()?, destination.parse()?)),
        _ => Err(anyhow!("expected a move like e2e4, got {:?}", args)),
    }
}
