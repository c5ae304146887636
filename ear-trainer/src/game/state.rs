//! Game progression state
//!
//! One [`GameState`] exists per game for the lifetime of the app. It is a plain
//! value: engine operations take it by value and hand back the next state, so
//! an operation that changes nothing returns a state equal to its input.

use std::collections::BTreeMap;
use std::fmt;

/// Difficulty, choice, and guess state shared by every game
#[derive(Debug, Clone, PartialEq)]
pub struct GameState<G> {
    /// Level numbers, `1..=N`, fixed when the game is created
    pub levels: Vec<u32>,

    /// Number of steps in each level, fixed when the game is created
    pub step_counts: BTreeMap<u32, u32>,

    /// Current level, 0 until the game is initialized
    pub level: u32,

    /// Current step within the level
    ///
    /// Counts from 1, except the first level also allows 0 so a new player has
    /// not completed any steps yet.
    pub step: u32,

    /// Values currently offered to the player
    pub choices: Vec<G>,

    /// The value the player must identify
    pub correct_choice: G,

    pub last_guess: Option<G>,
    pub was_last_guess_correct: Option<bool>,

    /// Counters used to detect that an in-flight operation went stale
    pub present_count: u64,
    pub guess_count: u64,
    pub guess_count_for_current_correct_choice: u64,

    /// Set by difficulty changes and guesses, cleared by a refresh
    pub should_refresh_choices: bool,
    pub should_refresh_correct_choice: bool,

    pub refresh_choices_count: u64,
    pub refresh_correct_choice_count: u64,
}

impl<G> GameState<G> {
    /// Creates an uninitialized state. Run it through `engine::init` before use.
    ///
    /// `correct_choice` is only a placeholder until the first refresh replaces it.
    pub fn new(levels: Vec<u32>, step_counts: BTreeMap<u32, u32>, correct_choice: G) -> Self {
        Self {
            levels,
            step_counts,
            level: 0,
            step: 0,
            choices: Vec::new(),
            correct_choice,
            last_guess: None,
            was_last_guess_correct: None,
            present_count: 0,
            guess_count: 0,
            guess_count_for_current_correct_choice: 0,
            should_refresh_choices: false,
            should_refresh_correct_choice: false,
            refresh_choices_count: 0,
            refresh_correct_choice_count: 0,
        }
    }

    pub fn first_level(&self) -> u32 {
        self.levels.first().copied().unwrap_or(1)
    }

    pub fn last_level(&self) -> u32 {
        self.levels.last().copied().unwrap_or(1)
    }

    /// Steps in `level`, 0 for levels the game does not have
    pub fn step_count(&self, level: u32) -> u32 {
        step_count(&self.step_counts, level)
    }
}

pub(crate) fn step_count(step_counts: &BTreeMap<u32, u32>, level: u32) -> u32 {
    step_counts.get(&level).copied().unwrap_or(0)
}

/// Anything that embeds a [`GameState`], letting the engine work on whole
/// game structs that carry extra per-game fields.
pub trait Progression {
    type Guess: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static;

    fn game(&self) -> &GameState<Self::Guess>;
    fn game_mut(&mut self) -> &mut GameState<Self::Guess>;
}

impl<G> Progression for GameState<G>
where
    G: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
{
    type Guess = G;

    fn game(&self) -> &GameState<G> {
        self
    }

    fn game_mut(&mut self) -> &mut GameState<G> {
        self
    }
}
