//! Saving level and step between sessions
//!
//! Only each game's level and step are kept. Everything else is regenerated
//! on startup by re-initializing the games from the restored difficulty.
//!
//! ```toml
//! [piano]
//! level = 3
//! step = 2
//!
//! [note_name]
//! level = 1
//! step = 0
//! ```

use crate::game::GameModel;
use crate::variants::Games;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stored difficulty of one game. Missing values fall back to the first level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDifficulty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedProgress {
    pub piano: SavedDifficulty,
    pub note_name: SavedDifficulty,
    pub note_distance: SavedDifficulty,
}

impl SavedProgress {
    pub fn from_games(games: &Games) -> Self {
        Self {
            piano: saved_difficulty(&games.piano),
            note_name: saved_difficulty(&games.note_name),
            note_distance: saved_difficulty(&games.note_distance),
        }
    }

    /// Applies the stored difficulty to each game and re-initializes it.
    ///
    /// Level and step are set together before `init` so `init` clamps the
    /// pair as a whole.
    pub fn restore(&self, games: Games) -> Result<Games> {
        Ok(Games {
            piano: restore_game(games.piano, self.piano)?,
            note_name: restore_game(games.note_name, self.note_name)?,
            note_distance: restore_game(games.note_distance, self.note_distance)?,
        })
    }
}

fn saved_difficulty<T: GameModel>(game: &T) -> SavedDifficulty {
    let state = game.game();
    SavedDifficulty {
        level: Some(state.level),
        step: Some(state.step),
    }
}

fn restore_game<T: GameModel>(mut game: T, saved: SavedDifficulty) -> Result<T> {
    let state = game.game_mut();
    state.level = saved.level.unwrap_or(0);
    state.step = saved.step.unwrap_or(0);
    game.reinit()
}

/// Progress file on disk
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads saved progress. A missing file is a fresh start, not an error.
    pub fn load(&self) -> Result<SavedProgress> {
        if !self.path.exists() {
            debug!("No progress file at {}", self.path.display());
            return Ok(SavedProgress::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let progress = toml::from_str(&content).map_err(|e| {
            Error::Persistence(format!(
                "Failed to parse progress file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        info!("Loaded progress from {}", self.path.display());
        Ok(progress)
    }

    /// Writes progress through a temporary file so a crash never leaves a
    /// half-written progress file behind.
    pub fn save(&self, progress: &SavedProgress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string(progress)
            .map_err(|e| Error::Persistence(format!("Failed to serialize progress: {}", e)))?;
        let tmp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        debug!("Saved progress to {}", self.path.display());
        Ok(())
    }
}
