//! Shared session state
//!
//! Thread-safe state shared between the orchestrator, in-flight presentations,
//! and the front end.
//!
//! The session sits behind a `std::sync::RwLock` rather than an async lock
//! because presentations poll it from a synchronous abort check. Guards are
//! only held for short, non-`await`ing critical sections.

use crate::input_gate::{DisableToken, InputGate};
use crate::orchestrator::combo::ComboState;
use crate::variants::{GameView, Games};
use chrono::Utc;
use ear_common::{GameEvent, GameName};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Everything that changes while playing
#[derive(Debug, Clone)]
pub struct Session {
    pub games: Games,
    pub input_gate: InputGate,
    pub combo: ComboState,
    pub last_game_guessed: Option<GameName>,

    /// Tokens held by the feedback window after a correct guess, per game
    pending_guess_tokens: HashMap<GameName, Vec<DisableToken>>,
}

impl Session {
    pub fn new(games: Games) -> Self {
        Self {
            games,
            input_gate: InputGate::new(),
            combo: ComboState::default(),
            last_game_guessed: None,
            pending_guess_tokens: HashMap::new(),
        }
    }

    pub(crate) fn hold_guess_token(&mut self, game: GameName, token: DisableToken) {
        self.pending_guess_tokens.entry(game).or_default().push(token);
    }

    pub(crate) fn take_guess_tokens(&mut self, game: GameName) -> Vec<DisableToken> {
        self.pending_guess_tokens.remove(&game).unwrap_or_default()
    }
}

/// Shared state accessible by all components
pub struct SharedState {
    session: RwLock<Session>,

    /// Event broadcaster for front ends and tests
    pub event_tx: broadcast::Sender<GameEvent>,

    audio_loaded: AtomicBool,
    next_action_id: AtomicU64,
}

impl SharedState {
    pub fn new(games: Games) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            session: RwLock::new(Session::new(games)),
            event_tx,
            audio_loaded: AtomicBool::new(false),
            next_action_id: AtomicU64::new(1),
        }
    }

    /// Read access to the session
    ///
    /// A panic while the lock was held leaves plain data behind, so a
    /// poisoned lock is recovered rather than propagated.
    pub fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Broadcast an event to all listeners
    pub fn broadcast_event(&self, event: GameEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.event_tx.send(event);
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.event_tx.subscribe()
    }

    /// Id shared by the events of one orchestrated operation
    pub fn next_action_id(&self) -> u64 {
        self.next_action_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn is_audio_loaded(&self) -> bool {
        self.audio_loaded.load(Ordering::Acquire)
    }

    pub(crate) fn set_audio_loaded(&self) {
        self.audio_loaded.store(true, Ordering::Release);
        self.broadcast_event(GameEvent::AudioLoaded {
            timestamp: Utc::now(),
        });
    }

    pub fn is_input_enabled(&self) -> bool {
        self.read().input_gate.is_enabled()
    }

    pub fn view(&self, name: GameName) -> GameView {
        self.read().games.view(name)
    }

    /// Copy of the current games, e.g. for saving progress
    pub fn games(&self) -> Games {
        self.read().games.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SharedState {
        SharedState::new(Games::new().unwrap())
    }

    #[test]
    fn test_action_ids_increase() {
        let state = state();
        let first = state.next_action_id();
        let second = state.next_action_id();
        assert!(second > first);
    }

    #[test]
    fn test_audio_loaded_broadcasts() {
        let state = state();
        let mut rx = state.subscribe_events();
        assert!(!state.is_audio_loaded());

        state.set_audio_loaded();
        assert!(state.is_audio_loaded());
        assert_eq!(rx.try_recv().unwrap().event_type(), "AudioLoaded");
    }

    #[test]
    fn test_guess_tokens_are_per_game() {
        let state = state();
        let mut session = state.write();
        let token = session.input_gate.acquire();
        session.hold_guess_token(GameName::Piano, token);

        assert!(session.take_guess_tokens(GameName::NoteName).is_empty());
        assert_eq!(session.take_guess_tokens(GameName::Piano), vec![token]);
        assert!(session.take_guess_tokens(GameName::Piano).is_empty());
    }

    #[test]
    fn test_starts_enabled() {
        let state = state();
        assert!(state.is_input_enabled());
        assert_eq!(state.read().last_game_guessed, None);
        assert_eq!(state.read().combo.active_game, GameName::Piano);
    }
}
