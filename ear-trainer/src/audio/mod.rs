//! Sound playback boundary
//!
//! Games never touch a sound device directly. They call an [`AudioPlayer`],
//! which the binary backs with [`ConsoleAudio`] and tests back with recorders.

pub mod assets;
pub mod console;

pub use assets::AssetCatalog;
pub use console::ConsoleAudio;

use crate::Result;
use async_trait::async_trait;
use ear_common::{Pitch, PitchClass};
use std::time::Duration;
use tracing::debug;

/// Plays piano notes
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Prepares every sound asset. Playback before this completes may be silent.
    async fn load_all(&self) -> Result<()>;

    /// Starts one note without waiting for it to finish
    fn play_single(&self, pitch: Pitch, volume: f32);

    /// Starts every key of a pitch class at once
    fn play_concert(&self, class: PitchClass, volume: f32) {
        for pitch in class.pitches() {
            self.play_single(pitch, volume);
        }
    }
}

/// Plays `pitches` one after another with `inter_delay` between them.
///
/// `should_abort` is checked before each note and stops the sequence as soon
/// as it returns true. Returns how many notes were started.
pub async fn play_sequence(
    player: &dyn AudioPlayer,
    pitches: &[Pitch],
    inter_delay: Duration,
    should_abort: &(dyn Fn() -> bool + Send + Sync),
    volume: f32,
) -> usize {
    let mut played = 0;
    for (index, pitch) in pitches.iter().enumerate() {
        if should_abort() {
            debug!("Sequence aborted after {} of {} notes", played, pitches.len());
            break;
        }
        player.play_single(*pitch, volume);
        played += 1;

        let is_last = index + 1 == pitches.len();
        if !is_last && !inter_delay.is_zero() {
            tokio::time::sleep(inter_delay).await;
        }
    }
    played
}
