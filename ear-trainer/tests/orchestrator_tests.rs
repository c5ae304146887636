//! Integration tests for present/guess orchestration
//!
//! Covers the present → guess → present cycle of each game, input gating,
//! difficulty changes, and operations overtaking each other mid-flight.

mod helpers;

use ear_common::{GameEvent, GameName, PitchClass};
use ear_trainer::game::Progression;
use ear_trainer::persistence::ProgressStore;
use ear_trainer::{Error, GameGuess};
use helpers::{events_for, TestHarness};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_present_piano_plays_correct_choice() {
    let mut harness = TestHarness::new();
    let correct = harness.games().piano.game.correct_choice;

    let played = harness
        .orchestrator
        .present(GameName::Piano, false)
        .await
        .unwrap();

    assert_eq!(played, 1);
    assert_eq!(harness.audio.singles(), vec![correct]);
    assert_eq!(harness.games().piano.game.present_count, 1);
    assert!(harness.state.is_input_enabled());
    assert_eq!(
        harness.event_types(),
        vec!["Presenting", "InputGateChanged", "InputGateChanged", "Presented"]
    );
}

#[tokio::test]
async fn test_present_note_name_plays_concert() {
    let harness = TestHarness::new();
    let correct = harness.games().note_name.game.correct_choice;

    harness
        .orchestrator
        .present(GameName::NoteName, false)
        .await
        .unwrap();

    assert_eq!(harness.audio.concerts(), vec![correct]);
    assert!(harness.audio.singles().is_empty());
}

#[tokio::test]
async fn test_present_note_distance_plays_pair() {
    let harness = TestHarness::new();
    let (first, second) = harness.games().note_distance.current_pitches.unwrap();

    let played = harness
        .orchestrator
        .present(GameName::NoteDistance, false)
        .await
        .unwrap();
    assert_eq!(played, 2);
    assert_eq!(harness.audio.singles(), vec![first, second]);

    // The next presentation of the same question plays it backwards
    harness
        .orchestrator
        .present(GameName::NoteDistance, false)
        .await
        .unwrap();
    assert_eq!(harness.audio.singles(), vec![first, second, second, first]);
}

#[tokio::test]
async fn test_forced_present_refreshes() {
    let harness = TestHarness::new();
    let before = harness.games().piano.game.refresh_correct_choice_count;

    harness.orchestrator.present(GameName::Piano, true).await.unwrap();
    assert_eq!(
        harness.games().piano.game.refresh_correct_choice_count,
        before + 1
    );

    harness.orchestrator.present(GameName::Piano, false).await.unwrap();
    assert_eq!(
        harness.games().piano.game.refresh_correct_choice_count,
        before + 1
    );
}

#[tokio::test]
async fn test_correct_guess_steps_up_and_presents_new_question() {
    let mut harness = TestHarness::new();
    let game = harness.games().note_name.game;
    let correct = game.correct_choice;

    harness
        .orchestrator
        .guess(GameName::NoteName, GameGuess::PitchClass(correct))
        .await
        .unwrap();

    let after = harness.games().note_name.game;
    assert_eq!((after.level, after.step), (1, 1));
    assert_eq!(after.guess_count, 1);
    assert_eq!(after.present_count, 1);
    assert_eq!(after.refresh_correct_choice_count, game.refresh_correct_choice_count + 1);
    assert_eq!(after.guess_count_for_current_correct_choice, 0);
    assert_ne!(after.correct_choice, correct);
    assert_eq!(harness.audio.concerts(), vec![after.correct_choice]);
    assert!(harness.state.is_input_enabled());
    assert_eq!(
        harness.state.read().last_game_guessed,
        Some(GameName::NoteName)
    );

    let events = harness.drain_events();
    assert_eq!(
        events_for(&events, GameName::NoteName),
        vec!["Guessing", "Guessed", "Presenting", "Presented"]
    );
    assert!(matches!(
        events[0],
        GameEvent::Guessing { correct: true, level: 1, step: 1, .. }
    ));
}

#[tokio::test]
async fn test_wrong_guess_replays_same_question() {
    let harness = TestHarness::new();
    let game = harness.games().note_name.game;
    let wrong = *game
        .choices
        .iter()
        .find(|choice| **choice != game.correct_choice)
        .unwrap();

    harness
        .orchestrator
        .guess(GameName::NoteName, GameGuess::PitchClass(wrong))
        .await
        .unwrap();

    let after = harness.games().note_name.game;
    assert_eq!((after.level, after.step), (1, 0));
    assert_eq!(after.correct_choice, game.correct_choice);
    assert_eq!(after.refresh_correct_choice_count, game.refresh_correct_choice_count);
    assert_eq!(after.guess_count_for_current_correct_choice, 1);
    assert_eq!(after.was_last_guess_correct, Some(false));
    assert_eq!(harness.audio.concerts(), vec![game.correct_choice]);
}

#[tokio::test]
async fn test_replay_after_wrong_guess_keeps_input_enabled() {
    let mut harness = TestHarness::new();
    let game = harness.games().piano.game;
    let wrong = *game
        .choices
        .iter()
        .find(|choice| **choice != game.correct_choice)
        .unwrap();

    harness
        .orchestrator
        .guess(GameName::Piano, GameGuess::Pitch(wrong))
        .await
        .unwrap();

    // The same question already had a guess, so replaying it never disables input
    let types = harness.event_types();
    assert!(!types.contains(&"InputGateChanged"));
    assert!(harness.state.is_input_enabled());
}

#[tokio::test]
async fn test_guess_of_wrong_kind_is_rejected() {
    let harness = TestHarness::new();
    let result = harness
        .orchestrator
        .guess(GameName::NoteDistance, GameGuess::PitchClass(PitchClass::C))
        .await;

    assert!(matches!(result, Err(Error::InvalidGuess { .. })));
    assert_eq!(harness.games().note_distance.game.guess_count, 0);
}

#[tokio::test]
async fn test_set_difficulty_presents_fresh_question() {
    let mut harness = TestHarness::new();
    let before = harness.games().piano.game;

    let played = harness
        .orchestrator
        .set_difficulty(GameName::Piano, 5, 2)
        .await
        .unwrap();

    let after = harness.games().piano.game;
    assert_eq!(played, 1);
    assert_eq!((after.level, after.step), (5, 2));
    assert_eq!(after.last_guess, None);
    assert_eq!(after.refresh_choices_count, before.refresh_choices_count + 1);
    assert_eq!(
        after.refresh_correct_choice_count,
        before.refresh_correct_choice_count + 1
    );
    assert!(after.choices.contains(&after.correct_choice));

    let events = harness.drain_events();
    assert!(matches!(
        events[0],
        GameEvent::DifficultySet { game: GameName::Piano, level: 5, step: 2, .. }
    ));
}

#[tokio::test]
async fn test_set_difficulty_clamps() {
    let harness = TestHarness::new();
    harness
        .orchestrator
        .set_difficulty(GameName::NoteName, 50, 50)
        .await
        .unwrap();

    let game = harness.games().note_name.game;
    assert_eq!((game.level, game.step), (11, 23));
    assert_eq!(game.choices.len(), 12);
}

#[tokio::test]
async fn test_set_difficulty_clears_last_guess() {
    let harness = TestHarness::new();
    let correct = harness.games().piano.game.correct_choice;
    harness
        .orchestrator
        .guess(GameName::Piano, GameGuess::Pitch(correct))
        .await
        .unwrap();
    assert!(harness.games().piano.game.last_guess.is_some());

    harness
        .orchestrator
        .set_difficulty(GameName::Piano, 2, 1)
        .await
        .unwrap();
    let game = harness.games().piano.game;
    assert_eq!(game.last_guess, None);
    assert_eq!(game.was_last_guess_correct, Some(true));
    assert_eq!(game.guess_count, 1);
}

#[tokio::test]
async fn test_newer_guess_supersedes_pending_guess() {
    let mut harness = TestHarness::new();
    let game = harness.games().note_name.game;
    let correct = game.correct_choice;
    let wrong = *game.choices.iter().find(|c| **c != correct).unwrap();

    let first_completed = Arc::new(AtomicBool::new(false));
    let second_completed = Arc::new(AtomicBool::new(false));

    let first = {
        let completed = Arc::clone(&first_completed);
        harness.orchestrator.guess_with(
            GameName::NoteName,
            GameGuess::PitchClass(correct),
            |_, _| Duration::from_millis(100),
            move |_, _| async move {
                completed.store(true, Ordering::SeqCst);
                Ok::<(), Error>(())
            },
        )
    };
    let second = {
        let completed = Arc::clone(&second_completed);
        let orchestrator = harness.orchestrator.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            orchestrator
                .guess_with(
                    GameName::NoteName,
                    GameGuess::PitchClass(wrong),
                    |_, _| Duration::from_millis(10),
                    move |_, _| async move {
                        completed.store(true, Ordering::SeqCst);
                        Ok::<(), Error>(())
                    },
                )
                .await
        }
    };

    let (first_result, second_result) = tokio::join!(first, second);
    first_result.unwrap();
    second_result.unwrap();

    assert!(!first_completed.load(Ordering::SeqCst));
    assert!(second_completed.load(Ordering::SeqCst));
    // The settling guess released the token of the guess it superseded
    assert!(harness.state.is_input_enabled());
    assert_eq!(harness.state.read().input_gate.outstanding(), 0);

    let types = harness.event_types();
    assert_eq!(types.iter().filter(|t| **t == "GuessSuperseded").count(), 1);
    assert_eq!(types.iter().filter(|t| **t == "Guessed").count(), 1);
}

#[tokio::test]
async fn test_correct_guess_disables_input_during_feedback() {
    let harness = TestHarness::new();
    let correct = harness.games().note_name.game.correct_choice;
    let orchestrator = harness.orchestrator.clone();

    let guess = tokio::spawn(async move {
        orchestrator
            .guess_with(
                GameName::NoteName,
                GameGuess::PitchClass(correct),
                |_, _| Duration::from_millis(50),
                |_, _| async { Ok::<(), Error>(()) },
            )
            .await
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!harness.state.is_input_enabled());

    guess.await.unwrap().unwrap();
    assert!(harness.state.is_input_enabled());
}

#[tokio::test]
async fn test_guess_aborts_presentation() {
    let harness = TestHarness::with_note_gap(50);
    let presenter = harness.orchestrator.clone();

    let present = tokio::spawn(async move { presenter.present(GameName::NoteDistance, false).await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    let wrong = {
        let game = harness.games().note_distance.game;
        *game.choices.iter().find(|c| **c != game.correct_choice).unwrap()
    };
    harness
        .orchestrator
        .guess_with(
            GameName::NoteDistance,
            GameGuess::Distance(wrong),
            |_, _| Duration::ZERO,
            |_, _| async { Ok::<(), Error>(()) },
        )
        .await
        .unwrap();

    let played = present.await.unwrap().unwrap();
    assert_eq!(played, 1);
    assert_eq!(harness.audio.singles().len(), 1);
    assert!(harness.state.is_input_enabled());
}

#[tokio::test]
async fn test_newer_presentation_aborts_older() {
    let harness = TestHarness::with_note_gap(50);
    let presenter = harness.orchestrator.clone();

    let first = tokio::spawn(async move { presenter.present(GameName::NoteDistance, false).await });
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = harness
        .orchestrator
        .present(GameName::NoteDistance, false)
        .await
        .unwrap();
    let first = first.await.unwrap().unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert_eq!(harness.audio.singles().len(), 3);
    assert_eq!(harness.games().note_distance.game.present_count, 2);
    assert!(harness.state.is_input_enabled());
}

#[tokio::test]
async fn test_games_progress_independently() {
    let harness = TestHarness::new();
    let correct = harness.games().piano.game.correct_choice;
    harness
        .orchestrator
        .guess(GameName::Piano, GameGuess::Pitch(correct))
        .await
        .unwrap();

    let games = harness.games();
    assert_eq!(games.piano.game().step, 1);
    assert_eq!(games.note_name.game().guess_count, 0);
    assert_eq!(games.note_distance.game().present_count, 0);
}

#[tokio::test]
async fn test_load_audio_marks_loaded() {
    let mut harness = TestHarness::new();
    assert!(!harness.state.is_audio_loaded());

    harness.orchestrator.load_audio().await.unwrap();
    assert!(harness.state.is_audio_loaded());
    assert_eq!(harness.audio.load_count(), 1);
    assert_eq!(harness.event_types(), vec!["AudioLoaded"]);
}

#[tokio::test]
async fn test_progress_saved_after_guess() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("progress.toml");
    let harness = TestHarness::new();
    let orchestrator = harness
        .orchestrator
        .clone()
        .with_progress_store(ProgressStore::new(&path));

    let correct = harness.games().note_name.game.correct_choice;
    orchestrator
        .guess(GameName::NoteName, GameGuess::PitchClass(correct))
        .await
        .unwrap();

    let saved = ProgressStore::new(&path).load().unwrap();
    assert_eq!(saved.note_name.level, Some(1));
    assert_eq!(saved.note_name.step, Some(1));
    assert_eq!(saved.piano.step, Some(0));
}

#[tokio::test]
async fn test_failed_save_does_not_fail_guess() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let harness = TestHarness::new();
    let orchestrator = harness
        .orchestrator
        .clone()
        .with_progress_store(ProgressStore::new(blocker.join("progress.toml")));

    let correct = harness.games().piano.game.correct_choice;
    orchestrator
        .guess(GameName::Piano, GameGuess::Pitch(correct))
        .await
        .unwrap();
    assert_eq!(harness.games().piano.game.step, 1);
}
