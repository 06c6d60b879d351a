// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `e4` chess rules library.
//!
//! `e4` knows how the pieces move and nothing more: it keeps track of a game in progress, generates the legal moves
//! for the side to move, applies and takes back moves, and recognizes checkmate and stalemate. Castling, draws by
//! repetition and the like are not part of its rules. As an executable, `e4` plays a game over a simple line-oriented
//! text protocol.

pub mod core;
pub mod movegen;
pub mod position;
pub mod repl;
pub mod tracing;

pub use crate::core::Move;
pub use crate::position::GameState;
