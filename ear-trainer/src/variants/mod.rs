//! The three quiz games and the aggregate holding one of each

pub mod note_distance;
pub mod note_name;
pub mod piano;

pub use note_distance::NoteDistanceGame;
pub use note_name::NoteNameGame;
pub use piano::PianoGame;

use crate::game::{GameModel, Progression};
use crate::Result;
use ear_common::GameName;
use rand::seq::SliceRandom;
use serde::Serialize;

/// One instance of every game, created at startup and kept for the whole session
#[derive(Debug, Clone, PartialEq)]
pub struct Games {
    pub piano: PianoGame,
    pub note_name: NoteNameGame,
    pub note_distance: NoteDistanceGame,
}

impl Games {
    pub fn new() -> Result<Self> {
        Ok(Self {
            piano: PianoGame::create()?,
            note_name: NoteNameGame::create()?,
            note_distance: NoteDistanceGame::create()?,
        })
    }

    /// Display snapshot of one game
    pub fn view(&self, name: GameName) -> GameView {
        match name {
            GameName::Piano => GameView::of(&self.piano),
            GameName::NoteName => GameView::of(&self.note_name),
            GameName::NoteDistance => GameView::of(&self.note_distance),
        }
    }
}

/// Game state rendered to strings for a front end
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub game: GameName,
    pub level: u32,
    pub step: u32,
    pub level_count: u32,
    pub step_count: u32,
    pub choices: Vec<String>,
    pub last_guess: Option<String>,
    pub was_last_guess_correct: Option<bool>,
    pub guess_count: u64,
}

impl GameView {
    pub fn of<T: GameModel>(model: &T) -> Self {
        let game = model.game();
        Self {
            game: T::NAME,
            level: game.level,
            step: game.step,
            level_count: game.last_level(),
            step_count: game.step_count(game.level),
            choices: game.choices.iter().map(ToString::to_string).collect(),
            last_guess: game.last_guess.as_ref().map(ToString::to_string),
            was_last_guess_correct: game.was_last_guess_correct,
            guess_count: game.guess_count,
        }
    }
}

/// Random candidate other than `current`.
///
/// Falls back to any candidate when `current` is the only one, and to `None`
/// when there are no candidates.
pub(crate) fn sample_other<G: PartialEq + Clone>(candidates: &[G], current: &G) -> Option<G> {
    let mut rng = rand::thread_rng();
    let others: Vec<&G> = candidates.iter().filter(|c| *c != current).collect();
    others
        .choose(&mut rng)
        .copied()
        .cloned()
        .or_else(|| candidates.choose(&mut rng).cloned())
}
