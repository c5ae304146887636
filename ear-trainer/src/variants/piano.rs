//! Piano game: find the played key on the piano

use super::sample_other;
use crate::game::{engine, AbortCheck, GameGuess, GameModel, GameState, PresentContext, Progression};
use crate::variants::Games;
use crate::{Error, Result};
use async_trait::async_trait;
use ear_common::config::PacingConfig;
use ear_common::pitch::{pad_octaves, surrounding_pitches, PITCH_COUNT};
use ear_common::{GameName, Pitch, PitchClass};
use std::time::Duration;
use tracing::debug;

/// Two keys at the ends of the keyboard never become a level of their own
pub const LEVEL_COUNT: u32 = PITCH_COUNT as u32 - 2;

#[derive(Debug, Clone, PartialEq)]
pub struct PianoGame {
    pub game: GameState<Pitch>,

    /// The keyboard neighborhood is centered on this key
    pub starting_pitch: Pitch,
}

impl PianoGame {
    /// Uninitialized game, see [`GameModel::create`]
    pub fn blank() -> Self {
        let levels = engine::create_levels(LEVEL_COUNT);
        let step_counts = engine::step_counts_for(&levels, step_count_for_level);
        Self {
            game: GameState::new(levels, step_counts, Pitch::MIDDLE_C),
            starting_pitch: Pitch::MIDDLE_C,
        }
    }

    /// Keys the correct choice is drawn from at `level`
    pub fn pitches_for_level(&self, level: u32) -> Result<Vec<Pitch>> {
        let count = 2 * step_count_for_level(level) as usize;
        Ok(surrounding_pitches(self.starting_pitch, count)?)
    }
}

pub fn step_count_for_level(level: u32) -> u32 {
    (level + 2).min(10)
}

impl Progression for PianoGame {
    type Guess = Pitch;

    fn game(&self) -> &GameState<Pitch> {
        &self.game
    }

    fn game_mut(&mut self) -> &mut GameState<Pitch> {
        &mut self.game
    }
}

#[async_trait]
impl GameModel for PianoGame {
    const NAME: GameName = GameName::Piano;

    fn create() -> Result<Self> {
        Self::blank().reinit()
    }

    /// Shows whole octaves around the level's keys so the keyboard looks like a piano
    fn refresh_choices(mut self) -> Result<Self> {
        let pitches = self.pitches_for_level(self.game.level)?;
        self.game.choices = pad_octaves(&pitches, PitchClass::C)?;
        Ok(self)
    }

    fn refresh_correct_choice(mut self) -> Result<Self> {
        let pitches = self.pitches_for_level(self.game.level)?;
        if let Some(next) = sample_other(&pitches, &self.game.correct_choice) {
            self.game.correct_choice = next;
        }
        Ok(self)
    }

    fn present_delay(_was_correct: bool, pacing: &PacingConfig) -> Duration {
        pacing.piano_delay()
    }

    async fn present(&self, ctx: &PresentContext<'_>, _should_abort: &AbortCheck) -> Result<usize> {
        debug!("Piano game playing {}", self.game.correct_choice);
        ctx.audio
            .play_single(self.game.correct_choice, ctx.audio_config.single_volume);
        Ok(1)
    }

    fn guess_from(guess: GameGuess) -> Result<Pitch> {
        match guess {
            GameGuess::Pitch(pitch) => Ok(pitch),
            other => Err(Error::InvalidGuess {
                game: Self::NAME,
                guess: other.to_string(),
            }),
        }
    }

    fn slot(games: &Games) -> &Self {
        &games.piano
    }

    fn slot_mut(games: &mut Games) -> &mut Self {
        &mut games.piano
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create() {
        let game = PianoGame::create().unwrap();
        assert_eq!(game.game.levels.len(), 86);
        assert_eq!((game.game.level, game.game.step), (1, 0));
        assert_eq!(game.game.step_count(1), 3);
        assert_eq!(game.game.step_count(8), 10);
        assert_eq!(game.game.step_count(86), 10);
    }

    #[test]
    fn test_level_one_choices_are_padded_octaves() {
        let game = PianoGame::create().unwrap();
        // 6 keys around C4 span A#3..D#4 and pad to C3..B4
        let choices = &game.game.choices;
        assert_eq!(choices.len(), 24);
        assert_eq!(choices.first().unwrap().to_string(), "C3");
        assert_eq!(choices.last().unwrap().to_string(), "B4");
    }

    #[test]
    fn test_correct_choice_from_neighborhood() {
        let mut game = PianoGame::create().unwrap();
        let neighborhood = game.pitches_for_level(1).unwrap();
        for _ in 0..50 {
            let previous = game.game.correct_choice;
            game = game.refresh_correct_choice().unwrap();
            assert!(neighborhood.contains(&game.game.correct_choice));
            assert!(game.game.choices.contains(&game.game.correct_choice));
            assert_ne!(game.game.correct_choice, previous);
        }
    }

    #[test]
    fn test_guess_from() {
        assert_eq!(
            PianoGame::guess_from(GameGuess::Pitch(Pitch::MIDDLE_C)).unwrap(),
            Pitch::MIDDLE_C
        );
        assert!(PianoGame::guess_from(GameGuess::Distance(3)).is_err());
    }

    #[test]
    fn test_delay_ignores_correctness() {
        let pacing = PacingConfig::default();
        assert_eq!(PianoGame::present_delay(true, &pacing), Duration::from_millis(1000));
        assert_eq!(PianoGame::present_delay(false, &pacing), Duration::from_millis(1000));
    }
}
