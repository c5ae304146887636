//! Level and step progression shared by every game
//!
//! All operations are pure: they take a game by value and return the next
//! value. The per-game choice generators are passed in as closures so the same
//! progression rules drive every game.

use super::state::{step_count, GameState, Progression};
use crate::Result;
use std::collections::BTreeMap;

/// Level numbers `1..=level_count`
pub fn create_levels(level_count: u32) -> Vec<u32> {
    (1..=level_count).collect()
}

/// Step count of every level, computed once when a game is created
pub fn step_counts_for(levels: &[u32], steps_in_level: impl Fn(u32) -> u32) -> BTreeMap<u32, u32> {
    levels
        .iter()
        .map(|&level| (level, steps_in_level(level)))
        .collect()
}

/// Puts a game into a playable state.
///
/// Keeps a previously stored level and step (level 0 means none was stored),
/// clears guess history and counters, then forces a refresh of the choices and
/// the correct choice.
pub fn init<T, C, R>(mut game: T, refresh_choices: C, refresh_correct_choice: R) -> Result<T>
where
    T: Progression,
    C: Fn(T) -> Result<T>,
    R: Fn(T) -> Result<T>,
{
    let state = game.game_mut();
    let level = if state.level == 0 { 1 } else { state.level };
    let step = state.step;

    state.last_guess = None;
    state.was_last_guess_correct = None;
    state.present_count = 0;
    state.guess_count = 0;
    state.guess_count_for_current_correct_choice = 0;
    state.refresh_choices_count = 0;
    state.refresh_correct_choice_count = 0;

    let game = set_difficulty(game, level as i64, step as i64);
    refresh(game, refresh_choices, refresh_correct_choice, true)
}

/// Moves a game to the clamped `(level, step)`, flagging a choice refresh when
/// the level changes.
pub fn set_difficulty<T: Progression>(mut game: T, level: i64, step: i64) -> T {
    let state = game.game_mut();
    let (next_level, next_step) = clamp_difficulty(&state.levels, &state.step_counts, level, step);

    if state.level != next_level {
        state.should_refresh_choices = true;
    }
    state.level = next_level;
    state.step = next_step;
    game
}

/// Maps any requested `(level, step)` onto a valid one.
///
/// Stepping past the end of a level lands on step 1 of the next level, and
/// stepping below step 1 lands on the last step of the previous level. The first
/// level bottoms out at step 0 and the last level tops out at its final step.
pub fn clamp_difficulty(
    levels: &[u32],
    step_counts: &BTreeMap<u32, u32>,
    level: i64,
    step: i64,
) -> (u32, u32) {
    let first = levels.first().copied().unwrap_or(1);
    let last = levels.last().copied().unwrap_or(first);
    let steps = |level: u32| step_count(step_counts, level);

    if level < first as i64 {
        return (first, 0);
    }
    if level > last as i64 {
        return (last, steps(last));
    }

    let level = level as u32;
    if step > steps(level) as i64 {
        if level == last {
            (last, steps(last))
        } else {
            (level + 1, 1)
        }
    } else if step < 1 {
        if level == first {
            (level, 0)
        } else {
            (level - 1, steps(level - 1))
        }
    } else {
        (level, step as u32)
    }
}

/// Regenerates choices and the correct choice when flagged, or always when
/// `force` is set.
///
/// The correct choice is also regenerated whenever the new choices no longer
/// contain it. A game with nothing flagged and no `force` is returned as-is.
pub fn refresh<T, C, R>(
    game: T,
    refresh_choices: C,
    refresh_correct_choice: R,
    force: bool,
) -> Result<T>
where
    T: Progression,
    C: Fn(T) -> Result<T>,
    R: Fn(T) -> Result<T>,
{
    let state = game.game();
    if !(force || state.should_refresh_choices || state.should_refresh_correct_choice) {
        return Ok(game);
    }

    let mut game = refresh_choices(game)?;
    {
        let state = game.game_mut();
        state.should_refresh_choices = false;
        state.refresh_choices_count += 1;
    }

    let state = game.game();
    let correct_choice_is_valid = state.choices.contains(&state.correct_choice);
    if force || state.should_refresh_correct_choice || !correct_choice_is_valid {
        game = refresh_correct_choice(game)?;
        let state = game.game_mut();
        state.should_refresh_correct_choice = false;
        state.guess_count_for_current_correct_choice = 0;
        state.refresh_correct_choice_count += 1;
    }

    Ok(game)
}

/// Records a guess and moves one step up (correct) or down (wrong).
///
/// A correct guess flags the correct choice for refresh. The refresh itself is
/// left to the next presentation.
pub fn guess<T: Progression>(mut game: T, guess: T::Guess) -> T {
    let state = game.game_mut();
    let is_correct = state.correct_choice == guess;

    state.last_guess = Some(guess);
    state.was_last_guess_correct = Some(is_correct);
    state.guess_count += 1;
    state.guess_count_for_current_correct_choice += 1;
    state.should_refresh_correct_choice = is_correct;

    let level = state.level as i64;
    let step = state.step as i64 + if is_correct { 1 } else { -1 };
    set_difficulty(game, level, step)
}

/// Forgets the last guess so its feedback is not shown after an unrelated change.
/// `was_last_guess_correct` is kept.
pub fn clear_last_guess<T: Progression>(mut game: T) -> T {
    game.game_mut().last_guess = None;
    game
}

/// True when `current` has moved on from the state a presentation started with:
/// another presentation began, a guess landed, or the correct choice changed.
pub fn should_abort_presenting<G>(original: &GameState<G>, current: &GameState<G>) -> bool {
    original.present_count != current.present_count
        || original.guess_count != current.guess_count
        || original.refresh_correct_choice_count != current.refresh_correct_choice_count
}
