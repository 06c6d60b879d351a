// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tracing constants that are used elsewhere in e4.
//!
//! The code in `e4::tracing` operates by emitting events with known string values, so that they can be interpreted by
//! `tracing` Layers that are operating upon them. This module collects them all in one place.

/// The target of every event that describes a change to a game, as opposed to the work done to compute it.
pub const GAME: &str = "e4::game";

/// A move was applied to a game by `GameState::apply`.
pub const MOVE_APPLIED: &str = "move applied";

/// The most recent move of a game was taken back.
pub const MOVE_UNDONE: &str = "move undone";

/// Legal move generation found that the side to move has no moves.
pub const GAME_OVER: &str = "game over";

/// A fresh game was set up in the starting position.
pub const GAME_STARTED: &str = "game started";
