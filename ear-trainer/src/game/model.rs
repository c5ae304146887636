//! Per-game behavior plugged into the shared engine

use super::engine;
use super::state::Progression;
use crate::audio::AudioPlayer;
use crate::variants::Games;
use crate::{Error, Result};
use async_trait::async_trait;
use ear_common::config::{AudioConfig, PacingConfig};
use ear_common::{GameName, Pitch, PitchClass};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Everything a game needs to play its question
pub struct PresentContext<'a> {
    pub audio: &'a dyn AudioPlayer,
    pub audio_config: &'a AudioConfig,
    pub pacing: &'a PacingConfig,
}

/// Abort check handed to a presentation, polled before each note
pub type AbortCheck = dyn Fn() -> bool + Send + Sync;

/// A quiz game: how it generates choices, plays its question, and paces itself
#[async_trait]
pub trait GameModel: Progression + Clone + fmt::Debug + Send + Sync + 'static {
    const NAME: GameName;

    /// Builds and initializes the game
    fn create() -> Result<Self>;

    /// Replaces `choices` with the choices for the current level
    fn refresh_choices(self) -> Result<Self>;

    /// Picks a new correct choice
    fn refresh_correct_choice(self) -> Result<Self>;

    /// Wait between a guess and the next presentation
    fn present_delay(was_correct: bool, pacing: &PacingConfig) -> Duration;

    /// Plays the current question and returns how many notes were played
    async fn present(&self, ctx: &PresentContext<'_>, should_abort: &AbortCheck) -> Result<usize>;

    /// Extracts this game's guess type
    fn guess_from(guess: GameGuess) -> Result<Self::Guess>;

    fn slot(games: &Games) -> &Self;
    fn slot_mut(games: &mut Games) -> &mut Self;

    /// Re-runs `init`, keeping the stored level and step
    fn reinit(self) -> Result<Self> {
        engine::init(self, Self::refresh_choices, Self::refresh_correct_choice)
    }

    /// Runs a refresh with this game's generators
    fn refreshed(self, force: bool) -> Result<Self> {
        engine::refresh(self, Self::refresh_choices, Self::refresh_correct_choice, force)
    }
}

/// A guess for any game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum GameGuess {
    Pitch(Pitch),
    PitchClass(PitchClass),
    Distance(u8),
}

impl GameGuess {
    /// Parses player input as a guess for `game`
    pub fn parse_for(game: GameName, input: &str) -> Result<GameGuess> {
        let input = input.trim();
        let invalid = || Error::InvalidGuess {
            game,
            guess: input.to_string(),
        };

        match game {
            GameName::Piano => input.parse().map(GameGuess::Pitch).map_err(|_| invalid()),
            GameName::NoteName => input
                .parse()
                .map(GameGuess::PitchClass)
                .map_err(|_| invalid()),
            GameName::NoteDistance => input
                .parse()
                .map(GameGuess::Distance)
                .map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for GameGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameGuess::Pitch(pitch) => write!(f, "{}", pitch),
            GameGuess::PitchClass(class) => write!(f, "{}", class),
            GameGuess::Distance(distance) => write!(f, "{}", distance),
        }
    }
}
