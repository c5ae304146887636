//! Note name game: name the pitch class played across every octave

use super::sample_other;
use crate::game::{engine, AbortCheck, GameGuess, GameModel, GameState, PresentContext, Progression};
use crate::variants::Games;
use crate::{Error, Result};
use async_trait::async_trait;
use ear_common::config::PacingConfig;
use ear_common::pitch::surrounding_pitch_classes;
use ear_common::{GameName, PitchClass};
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::debug;

pub const LEVEL_COUNT: u32 = PitchClass::ALL.len() as u32 - 1;

#[derive(Debug, Clone, PartialEq)]
pub struct NoteNameGame {
    pub game: GameState<PitchClass>,
    pub starting_pitch_class: PitchClass,
}

impl NoteNameGame {
    /// Uninitialized game, see [`GameModel::create`]
    pub fn blank() -> Self {
        let levels = engine::create_levels(LEVEL_COUNT);
        let step_counts = engine::step_counts_for(&levels, step_count_for_level);
        Self {
            game: GameState::new(levels, step_counts, PitchClass::C),
            starting_pitch_class: PitchClass::C,
        }
    }
}

pub fn step_count_for_level(level: u32) -> u32 {
    level * 2 + 1
}

fn pitch_class_count(level: u32) -> usize {
    (level as usize + 1).min(PitchClass::ALL.len())
}

impl Progression for NoteNameGame {
    type Guess = PitchClass;

    fn game(&self) -> &GameState<PitchClass> {
        &self.game
    }

    fn game_mut(&mut self) -> &mut GameState<PitchClass> {
        &mut self.game
    }
}

#[async_trait]
impl GameModel for NoteNameGame {
    const NAME: GameName = GameName::NoteName;

    fn create() -> Result<Self> {
        Self::blank().reinit()
    }

    fn refresh_choices(mut self) -> Result<Self> {
        let mut choices = surrounding_pitch_classes(
            self.starting_pitch_class,
            pitch_class_count(self.game.level),
        )?;
        choices.shuffle(&mut rand::thread_rng());
        self.game.choices = choices;
        Ok(self)
    }

    fn refresh_correct_choice(mut self) -> Result<Self> {
        if let Some(next) = sample_other(&self.game.choices, &self.game.correct_choice) {
            self.game.correct_choice = next;
        }
        Ok(self)
    }

    fn present_delay(was_correct: bool, pacing: &PacingConfig) -> Duration {
        if was_correct {
            pacing.correct_delay()
        } else {
            Duration::ZERO
        }
    }

    async fn present(&self, ctx: &PresentContext<'_>, _should_abort: &AbortCheck) -> Result<usize> {
        debug!("Note name game playing every {}", self.game.correct_choice);
        ctx.audio
            .play_concert(self.game.correct_choice, ctx.audio_config.concert_volume);
        Ok(1)
    }

    fn guess_from(guess: GameGuess) -> Result<PitchClass> {
        match guess {
            GameGuess::PitchClass(class) => Ok(class),
            other => Err(Error::InvalidGuess {
                game: Self::NAME,
                guess: other.to_string(),
            }),
        }
    }

    fn slot(games: &Games) -> &Self {
        &games.note_name
    }

    fn slot_mut(games: &mut Games) -> &mut Self {
        &mut games.note_name
    }
}
