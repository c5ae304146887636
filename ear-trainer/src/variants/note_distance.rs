//! Note distance game: count the semitones between two notes

use crate::audio::play_sequence;
use crate::game::{engine, AbortCheck, GameGuess, GameModel, GameState, PresentContext, Progression};
use crate::variants::Games;
use crate::{Error, Result};
use async_trait::async_trait;
use ear_common::config::PacingConfig;
use ear_common::pitch::{distance_between_pitches, surrounding_pitches, PITCH_COUNT};
use ear_common::{GameName, Pitch};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Three octaves of distances once the hand-picked levels are done
pub const LEVEL_COUNT: u32 = 39;

/// Distance sets for the first levels. One set is picked at random per refresh
/// when a level lists several.
const HARDCODED_DISTANCE_CHOICES: [&[&[u8]]; 4] = [
    &[&[1, 12]],
    &[&[1, 4, 12]],
    &[&[4, 7, 12]],
    &[&[2, 4]],
];

#[derive(Debug, Clone, PartialEq)]
pub struct NoteDistanceGame {
    pub game: GameState<u8>,
    pub starting_pitch: Pitch,

    /// The pair played by the current question, in ascending generation order
    pub current_pitches: Option<(Pitch, Pitch)>,
}

impl NoteDistanceGame {
    /// Uninitialized game, see [`GameModel::create`]
    pub fn blank() -> Self {
        let levels = engine::create_levels(LEVEL_COUNT);
        let step_counts = engine::step_counts_for(&levels, step_count_for_level);
        Self {
            game: GameState::new(levels, step_counts, 0),
            starting_pitch: Pitch::MIDDLE_C,
            current_pitches: None,
        }
    }

    /// Keys the first note of a question is drawn from at `level`
    pub fn pitches_for_level(&self, level: u32) -> Result<Vec<Pitch>> {
        Ok(surrounding_pitches(self.starting_pitch, pitch_count(level))?)
    }

    /// The pair in the order the current presentation plays it
    ///
    /// Every other presentation plays the pair backwards.
    pub fn playback_order(&self) -> Option<[Pitch; 2]> {
        let (first, second) = self.current_pitches?;
        if self.game.present_count % 2 == 0 {
            Some([second, first])
        } else {
            Some([first, second])
        }
    }
}

pub fn step_count_for_level(level: u32) -> u32 {
    (level * 3 / 2 + 2).min(24)
}

/// Distances offered at `level`
pub fn distance_choices(level: u32) -> Vec<u8> {
    let hardcoded = level
        .checked_sub(1)
        .and_then(|index| HARDCODED_DISTANCE_CHOICES.get(index as usize));
    match hardcoded {
        Some(sets) => sets
            .choose(&mut rand::thread_rng())
            .map(|set| set.to_vec())
            .unwrap_or_default(),
        None => {
            let max = level.saturating_sub(HARDCODED_DISTANCE_CHOICES.len() as u32) + 1;
            (1..=max.min(u8::MAX as u32) as u8).collect()
        }
    }
}

fn pitch_count(level: u32) -> usize {
    (level as usize * 6 + 6).min(PITCH_COUNT - 1)
}

/// Picks a distance and a pair of pitches that far apart.
///
/// The second pitch goes up or down at random, but always stays on the
/// keyboard so the pair really is `distance` apart.
fn next_pitches(pitches: &[Pitch], distances: &[u8]) -> Result<Option<(Pitch, Pitch)>> {
    let mut rng = rand::thread_rng();
    let (Some(&distance), Some(&first)) = (distances.choose(&mut rng), pitches.choose(&mut rng))
    else {
        return Ok(None);
    };

    let up = first.index() + distance as usize;
    let down = first.index().checked_sub(distance as usize);
    let second = match (up < PITCH_COUNT, down) {
        (true, Some(down)) => {
            if rng.gen_bool(0.5) {
                up
            } else {
                down
            }
        }
        (true, None) => up,
        (false, Some(down)) => down,
        (false, None) => {
            return Err(Error::Common(ear_common::Error::NotFound(format!(
                "no key {} semitones from {}",
                distance, first
            ))))
        }
    };

    Ok(Some((first, Pitch::from_index(second)?)))
}

impl Progression for NoteDistanceGame {
    type Guess = u8;

    fn game(&self) -> &GameState<u8> {
        &self.game
    }

    fn game_mut(&mut self) -> &mut GameState<u8> {
        &mut self.game
    }
}

#[async_trait]
impl GameModel for NoteDistanceGame {
    const NAME: GameName = GameName::NoteDistance;

    fn create() -> Result<Self> {
        Self::blank().reinit()
    }

    fn refresh_choices(mut self) -> Result<Self> {
        self.game.choices = distance_choices(self.game.level);
        Ok(self)
    }

    fn refresh_correct_choice(mut self) -> Result<Self> {
        let pitches = self.pitches_for_level(self.game.level)?;
        if let Some((first, second)) = next_pitches(&pitches, &self.game.choices)? {
            let distance = distance_between_pitches(first, second)?;
            self.current_pitches = Some((first, second));
            self.game.correct_choice = distance as u8;
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

    async fn present(&self, ctx: &PresentContext<'_>, should_abort: &AbortCheck) -> Result<usize> {
        let Some(pitches) = self.playback_order() else {
            return Ok(0);
        };
        debug!(
            "Note distance game playing {} then {}",
            pitches[0], pitches[1]
        );
        let played = play_sequence(
            ctx.audio,
            &pitches,
            ctx.pacing.random_note_delay(),
            should_abort,
            ctx.audio_config.single_volume,
        )
        .await;
        Ok(played)
    }

    fn guess_from(guess: GameGuess) -> Result<u8> {
        match guess {
            GameGuess::Distance(distance) => Ok(distance),
            other => Err(Error::InvalidGuess {
                game: Self::NAME,
                guess: other.to_string(),
            }),
        }
    }

    fn slot(games: &Games) -> &Self {
        &games.note_distance
    }

    fn slot_mut(games: &mut Games) -> &mut Self {
        &mut games.note_distance
    }
}
