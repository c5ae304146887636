//! Present and guess orchestration
//!
//! Runs the present → guess → delay → present cycle of each game against the
//! shared session. Every operation applies its state change under a short
//! write lock, then awaits playback or a delay with the lock released.
//! In-flight operations detect that a newer operation overtook them by
//! comparing game counters when they resume.

pub mod combo;

use crate::audio::AudioPlayer;
use crate::game::{engine, GameGuess, GameModel, PresentContext, Progression};
use crate::persistence::{ProgressStore, SavedProgress};
use crate::state::SharedState;
use crate::variants::{NoteDistanceGame, NoteNameGame, PianoGame};
use crate::Result;
use chrono::Utc;
use ear_common::config::TomlConfig;
use ear_common::{GameEvent, GameName};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cloneable handle that drives the games
#[derive(Clone)]
pub struct Orchestrator {
    state: Arc<SharedState>,
    audio: Arc<dyn AudioPlayer>,
    config: Arc<TomlConfig>,
    progress: Option<Arc<ProgressStore>>,
}

impl Orchestrator {
    pub fn new(state: Arc<SharedState>, audio: Arc<dyn AudioPlayer>, config: TomlConfig) -> Self {
        Self {
            state,
            audio,
            config: Arc::new(config),
            progress: None,
        }
    }

    /// Saves progress to `store` after every guess and difficulty change
    pub fn with_progress_store(mut self, store: ProgressStore) -> Self {
        self.progress = Some(Arc::new(store));
        self
    }

    pub fn state(&self) -> &Arc<SharedState> {
        &self.state
    }

    pub fn config(&self) -> &TomlConfig {
        &self.config
    }

    /// Loads every sound asset, then marks audio as loaded
    pub async fn load_audio(&self) -> Result<()> {
        self.audio.load_all().await?;
        self.state.set_audio_loaded();
        info!("Audio loaded");
        Ok(())
    }

    /// Plays the current question of a game, refreshing it first if needed.
    ///
    /// Input is disabled while a new question plays for the first time.
    /// Returns how many notes were played before the presentation finished or
    /// was overtaken by another presentation or a guess.
    pub async fn present(&self, name: GameName, force_refresh: bool) -> Result<usize> {
        match name {
            GameName::Piano => self.present_game::<PianoGame>(force_refresh).await,
            GameName::NoteName => self.present_game::<NoteNameGame>(force_refresh).await,
            GameName::NoteDistance => self.present_game::<NoteDistanceGame>(force_refresh).await,
        }
    }

    async fn present_game<T: GameModel>(&self, force_refresh: bool) -> Result<usize> {
        let action_id = self.state.next_action_id();
        self.state.broadcast_event(GameEvent::Presenting {
            action_id,
            game: T::NAME,
            force_refresh,
            timestamp: Utc::now(),
        });

        let (presented, token, gate_closed) = {
            let mut session = self.state.write();
            let mut game = T::slot(&session.games).clone();
            game.game_mut().present_count += 1;
            let game = game.refreshed(force_refresh)?;
            *T::slot_mut(&mut session.games) = game.clone();

            if game.game().guess_count_for_current_correct_choice == 0 {
                let was_enabled = session.input_gate.is_enabled();
                let token = session.input_gate.acquire();
                (game, Some(token), was_enabled)
            } else {
                (game, None, false)
            }
        };
        if gate_closed {
            self.broadcast_input_gate(false);
        }

        debug!(
            game = %T::NAME,
            level = presented.game().level,
            step = presented.game().step,
            present_count = presented.game().present_count,
            input_disabled = token.is_some(),
            "Presenting"
        );

        let should_abort = {
            let state = Arc::clone(&self.state);
            let original = presented.game().clone();
            move || {
                let session = state.read();
                engine::should_abort_presenting(&original, T::slot(&session.games).game())
            }
        };
        let ctx = PresentContext {
            audio: self.audio.as_ref(),
            audio_config: &self.config.audio,
            pacing: &self.config.pacing,
        };
        let result = presented.present(&ctx, &should_abort).await;

        if let Some(token) = token {
            let gate_opened = {
                let mut session = self.state.write();
                let was_enabled = session.input_gate.is_enabled();
                session.input_gate.release(token);
                !was_enabled && session.input_gate.is_enabled()
            };
            if gate_opened {
                self.broadcast_input_gate(true);
            }
        }

        let played_count = result?;
        self.state.broadcast_event(GameEvent::Presented {
            action_id,
            game: T::NAME,
            played_count,
            timestamp: Utc::now(),
        });
        Ok(played_count)
    }

    /// Applies a guess, waits the game's feedback delay, then presents the
    /// game again.
    pub async fn guess(&self, name: GameName, guess: GameGuess) -> Result<()> {
        let this = self.clone();
        self.guess_with(
            name,
            guess,
            |was_correct, name| self.present_delay(name, was_correct),
            move |_, name| async move { this.present(name, false).await.map(|_| ()) },
        )
        .await
    }

    /// Applies a guess with a custom delay and completion step.
    ///
    /// `delay` picks the wait from whether the guess was correct. After the
    /// wait, a guess that was overtaken by a newer guess on the same game does
    /// nothing more. Otherwise it re-enables input and runs `on_complete`.
    pub async fn guess_with<D, C, F>(
        &self,
        name: GameName,
        guess: GameGuess,
        delay: D,
        on_complete: C,
    ) -> Result<()>
    where
        D: FnOnce(bool, GameName) -> Duration + Send,
        C: FnOnce(bool, GameName) -> F + Send,
        F: Future<Output = Result<()>> + Send,
    {
        match name {
            GameName::Piano => {
                self.guess_game::<PianoGame, _, _, _>(guess, delay, on_complete)
                    .await
            }
            GameName::NoteName => {
                self.guess_game::<NoteNameGame, _, _, _>(guess, delay, on_complete)
                    .await
            }
            GameName::NoteDistance => {
                self.guess_game::<NoteDistanceGame, _, _, _>(guess, delay, on_complete)
                    .await
            }
        }
    }

    async fn guess_game<T, D, C, F>(&self, guess: GameGuess, delay: D, on_complete: C) -> Result<()>
    where
        T: GameModel,
        D: FnOnce(bool, GameName) -> Duration + Send,
        C: FnOnce(bool, GameName) -> F + Send,
        F: Future<Output = Result<()>> + Send,
    {
        let value = T::guess_from(guess)?;
        let action_id = self.state.next_action_id();

        let (was_correct, guess_count, level, step, gate_closed) = {
            let mut session = self.state.write();
            let game = engine::guess(T::slot(&session.games).clone(), value.clone());
            let state = game.game();
            let was_correct = state.was_last_guess_correct == Some(true);
            let snapshot = (state.guess_count, state.level, state.step);
            *T::slot_mut(&mut session.games) = game;
            session.last_game_guessed = Some(T::NAME);

            let mut gate_closed = false;
            if was_correct {
                gate_closed = session.input_gate.is_enabled();
                let token = session.input_gate.acquire();
                session.hold_guess_token(T::NAME, token);
            }
            (was_correct, snapshot.0, snapshot.1, snapshot.2, gate_closed)
        };

        info!(
            "{} guess {}: {} (level {} step {})",
            T::NAME,
            value,
            if was_correct { "correct" } else { "wrong" },
            level,
            step
        );
        self.state.broadcast_event(GameEvent::Guessing {
            action_id,
            game: T::NAME,
            guess: value.to_string(),
            correct: was_correct,
            level,
            step,
            timestamp: Utc::now(),
        });
        if gate_closed {
            self.broadcast_input_gate(false);
        }
        self.save_progress();

        let wait = delay(was_correct, T::NAME);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        let settled = {
            let mut session = self.state.write();
            let current = T::slot(&session.games).game().guess_count;
            if current != guess_count {
                None
            } else {
                let was_enabled = session.input_gate.is_enabled();
                for token in session.take_guess_tokens(T::NAME) {
                    session.input_gate.release(token);
                }
                Some(!was_enabled && session.input_gate.is_enabled())
            }
        };

        let Some(gate_opened) = settled else {
            debug!("{} guess {} superseded by a newer guess", T::NAME, action_id);
            self.state.broadcast_event(GameEvent::GuessSuperseded {
                action_id,
                game: T::NAME,
                timestamp: Utc::now(),
            });
            return Ok(());
        };

        self.state.broadcast_event(GameEvent::Guessed {
            action_id,
            game: T::NAME,
            timestamp: Utc::now(),
        });
        if gate_opened {
            self.broadcast_input_gate(true);
        }

        on_complete(was_correct, T::NAME).await
    }

    /// Moves a game to a chosen difficulty and presents a fresh question
    pub async fn set_difficulty(&self, name: GameName, level: u32, step: u32) -> Result<usize> {
        let (level, step) = {
            let mut session = self.state.write();
            let games = &mut session.games;
            match name {
                GameName::Piano => apply_difficulty(&mut games.piano, level, step),
                GameName::NoteName => apply_difficulty(&mut games.note_name, level, step),
                GameName::NoteDistance => apply_difficulty(&mut games.note_distance, level, step),
            }
        };

        info!("{} difficulty set to level {} step {}", name, level, step);
        self.state.broadcast_event(GameEvent::DifficultySet {
            game: name,
            level,
            step,
            timestamp: Utc::now(),
        });
        self.save_progress();

        self.present(name, true).await
    }

    /// Wait after a guess before the game presents again
    pub fn present_delay(&self, name: GameName, was_correct: bool) -> Duration {
        let pacing = &self.config.pacing;
        match name {
            GameName::Piano => PianoGame::present_delay(was_correct, pacing),
            GameName::NoteName => NoteNameGame::present_delay(was_correct, pacing),
            GameName::NoteDistance => NoteDistanceGame::present_delay(was_correct, pacing),
        }
    }

    /// Saves every game's difficulty, logging rather than returning failures
    fn save_progress(&self) {
        let Some(store) = &self.progress else {
            return;
        };
        let progress = SavedProgress::from_games(&self.state.read().games);
        if let Err(e) = store.save(&progress) {
            warn!(
                "Failed to save progress to {}: {}",
                store.path().display(),
                e
            );
        }
    }

    fn broadcast_input_gate(&self, enabled: bool) {
        debug!("Input {}", if enabled { "enabled" } else { "disabled" });
        self.state.broadcast_event(GameEvent::InputGateChanged {
            enabled,
            timestamp: Utc::now(),
        });
    }
}

/// Returns the clamped difficulty the game ended up at
fn apply_difficulty<T: GameModel>(slot: &mut T, level: u32, step: u32) -> (u32, u32) {
    let game = engine::set_difficulty(slot.clone(), level as i64, step as i64);
    *slot = engine::clear_last_guess(game);
    (slot.game().level, slot.game().step)
}
