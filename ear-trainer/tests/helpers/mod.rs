//! Test helpers for ear-trainer integration tests
//!
//! Provides:
//! - RecordingAudio: AudioPlayer that records every note instead of playing it
//! - TestHarness: orchestrator wired to recording audio and instant pacing

#![allow(dead_code)]

use async_trait::async_trait;
use ear_common::config::{PacingConfig, TomlConfig};
use ear_common::{GameEvent, GameName, Pitch, PitchClass};
use ear_trainer::audio::AudioPlayer;
use ear_trainer::{Games, Orchestrator, SharedState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

#[derive(Default)]
pub struct RecordingAudio {
    pub singles: Mutex<Vec<Pitch>>,
    pub concerts: Mutex<Vec<PitchClass>>,
    pub loads: AtomicUsize,
}

impl RecordingAudio {
    pub fn singles(&self) -> Vec<Pitch> {
        self.singles.lock().unwrap().clone()
    }

    pub fn concerts(&self) -> Vec<PitchClass> {
        self.concerts.lock().unwrap().clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioPlayer for RecordingAudio {
    async fn load_all(&self) -> ear_trainer::Result<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn play_single(&self, pitch: Pitch, _volume: f32) {
        self.singles.lock().unwrap().push(pitch);
    }

    fn play_concert(&self, class: PitchClass, _volume: f32) {
        self.concerts.lock().unwrap().push(class);
    }
}

pub struct TestHarness {
    pub orchestrator: Orchestrator,
    pub audio: Arc<RecordingAudio>,
    pub state: Arc<SharedState>,
    pub events: broadcast::Receiver<GameEvent>,
}

impl TestHarness {
    /// Harness with every delay set to zero
    pub fn new() -> Self {
        Self::with_pacing(PacingConfig::instant())
    }

    pub fn with_pacing(pacing: PacingConfig) -> Self {
        let config = TomlConfig {
            pacing,
            ..TomlConfig::default()
        };
        let state = Arc::new(SharedState::new(Games::new().unwrap()));
        let audio = Arc::new(RecordingAudio::default());
        let events = state.subscribe_events();
        let orchestrator = Orchestrator::new(Arc::clone(&state), audio.clone(), config);
        Self {
            orchestrator,
            audio,
            state,
            events,
        }
    }

    /// Pacing where two sequenced notes are `gap_ms` apart
    pub fn with_note_gap(gap_ms: u64) -> Self {
        Self::with_pacing(PacingConfig {
            note_delay_min_ms: gap_ms,
            note_delay_max_ms: gap_ms,
            ..PacingConfig::instant()
        })
    }

    pub fn games(&self) -> Games {
        self.state.games()
    }

    /// Every event broadcast since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn event_types(&mut self) -> Vec<&'static str> {
        self.drain_events().iter().map(GameEvent::event_type).collect()
    }
}

/// Type names of `events` belonging to `game`
pub fn events_for(events: &[GameEvent], game: GameName) -> Vec<&'static str> {
    events
        .iter()
        .filter(|event| match event {
            GameEvent::Presenting { game: g, .. }
            | GameEvent::Presented { game: g, .. }
            | GameEvent::DifficultySet { game: g, .. }
            | GameEvent::Guessing { game: g, .. }
            | GameEvent::Guessed { game: g, .. }
            | GameEvent::GuessSuperseded { game: g, .. }
            | GameEvent::ActiveGameChanged { game: g, .. } => *g == game,
            _ => false,
        })
        .map(GameEvent::event_type)
        .collect()
}
