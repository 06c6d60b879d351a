// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{collections::HashMap, fmt::Debug, io::Write, sync::Mutex, time::SystemTime};

use anyhow::{anyhow, bail};
use derive_more::From;
use serde::{Deserialize, Serialize};
use tracing::{
    field::{Field, Visit},
    Event, Subscriber,
};
use tracing_subscriber::{layer::Context, Layer};

use crate::{core::Color, repl, tracing::constants, GameState};

#[derive(Debug, Serialize, Deserialize)]
pub struct GameEvent {
    pub timestamp: SystemTime,
    pub kind: GameEventKind,
}

#[derive(Debug, Serialize, Deserialize, From)]
pub enum GameEventKind {
    Started(StartEvent),
    Applied(MoveEvent),
    Undone(UndoEvent),
    Ended(EndEvent),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartEvent {}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveEvent {
    pub notation: String,
    pub side: Color,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UndoEvent {
    pub notation: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndEvent {
    pub outcome: String,
    pub plies: u64,
}

/// The GameLogLayer is a Layer that understands the events `GameState` emits when moves are applied and taken back,
/// and writes them to disk as one JSON object per line. Replaying the log with `replay` reproduces the games that
/// were played.
pub struct GameLogLayer {
    writer: Box<Mutex<dyn Write + Send + Sync>>,
}

impl GameLogLayer {
    pub fn new<W: Write + 'static + Send + Sync>(dest: W) -> GameLogLayer {
        GameLogLayer {
            writer: Box::new(Mutex::new(dest)),
        }
    }

    fn record_event<T: Into<GameEventKind>>(&self, kind: T) {
        let event = GameEvent {
            timestamp: SystemTime::now(),
            kind: kind.into(),
        };

        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };

        let result = serde_json::to_writer(&mut *writer, &event)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(&mut *writer))
            .and_then(|_| writer.flush());
        if let Err(e) = result {
            eprintln!("failed to write game event: {}", e);
        }
    }

    fn on_game_started(&self) {
        self.record_event(StartEvent {});
    }

    fn on_move_applied(&self, attrs: &HashMap<String, String>) {
        let side = match attrs.get("side").and_then(|s| parse_color(s)) {
            Some(side) => side,
            None => return,
        };

        if let Some(notation) = attrs.get("notation") {
            self.record_event(MoveEvent {
                notation: notation.clone(),
                side,
            });
        }
    }

    fn on_move_undone(&self, attrs: &HashMap<String, String>) {
        if let Some(notation) = attrs.get("notation") {
            self.record_event(UndoEvent {
                notation: notation.clone(),
            });
        }
    }

    fn on_game_over(&self, attrs: &HashMap<String, String>) {
        let outcome = match attrs.get("outcome") {
            Some(outcome) => outcome.clone(),
            None => return,
        };

        let plies = attrs
            .get("plies")
            .and_then(|p| p.parse().ok())
            .unwrap_or_default();
        self.record_event(EndEvent { outcome, plies });
    }
}

/// The state reached by replaying a game log.
pub struct Replay {
    /// The game being played when the log ends.
    pub game: GameState,
    /// Number of games the log started, including the last one.
    pub games: usize,
    /// The outcome the log recorded for the last game, if it recorded one.
    pub recorded_outcome: Option<String>,
}

/// Replays a sequence of game events, starting over from the standard position whenever a new game starts.
/// `on_move` is called after every applied move with its notation and the resulting game.
pub fn replay<I, F>(events: I, mut on_move: F) -> anyhow::Result<Replay>
where
    I: IntoIterator<Item = GameEvent>,
    F: FnMut(&str, &GameState),
{
    let mut replay = Replay {
        game: GameState::new(),
        games: 1,
        recorded_outcome: None,
    };

    for (index, event) in events.into_iter().enumerate() {
        let number = index + 1;
        match event.kind {
            GameEventKind::Started(_) => {
                // A log always opens with the start of its first game.
                if index > 0 {
                    replay.game = GameState::new();
                    replay.games += 1;
                    replay.recorded_outcome = None;
                }
            }
            GameEventKind::Applied(mov) => {
                let game = &mut replay.game;
                if mov.side != game.side_to_move() {
                    bail!(
                        "event {}: log has {} moving, but it is {}'s turn",
                        number,
                        mov.side,
                        game.side_to_move()
                    );
                }

                let (source, destination) = repl::parse_squares(&[mov.notation.as_str()])?;
                game.play(source, destination)
                    .map_err(|e| anyhow!("event {}: {}", number, e))?;
                on_move(&mov.notation, game);
            }
            GameEventKind::Undone(undo) => {
                let game = &mut replay.game;
                let last = game.history().last().map(|m| m.notation());
                if last.as_deref() != Some(undo.notation.as_str()) {
                    bail!(
                        "event {}: log takes back {}, which was not the last move",
                        number,
                        undo.notation
                    );
                }

                game.undo();
            }
            GameEventKind::Ended(end) => replay.recorded_outcome = Some(end.outcome),
        }
    }

    Ok(replay)
}

fn parse_color(s: &str) -> Option<Color> {
    match s {
        "white" => Some(Color::White),
        "black" => Some(Color::Black),
        _ => None,
    }
}

impl<S: Subscriber> Layer<S> for GameLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != constants::GAME {
            return;
        }

        let attrs = event.extract_fields();
        if let Some(event_str) = attrs.get("event") {
            match event_str.as_ref() {
                constants::GAME_STARTED => self.on_game_started(),
                constants::MOVE_APPLIED => self.on_move_applied(&attrs),
                constants::MOVE_UNDONE => self.on_move_undone(&attrs),
                constants::GAME_OVER => self.on_game_over(&attrs),
                _ => {}
            }
        }
    }
}

trait HasExtractableFields {
    fn extract_fields(&self) -> HashMap<String, String>;
}

impl HasExtractableFields for Event<'_> {
    fn extract_fields(&self) -> HashMap<String, String> {
        let mut extractor = HashMapExtractor(HashMap::new());
        self.record(&mut extractor);
        extractor.0
    }
}

struct HashMapExtractor(HashMap<String, String>);
impl Visit for HashMapExtractor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.0
            .insert(field.name().to_owned(), format!("{:?}", value));
    }
}
