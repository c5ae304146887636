//! Sound asset naming
//!
//! Every key has one sound file named after its position and pitch, for
//! example `41-c-4.mp3` for `C#4`.

use crate::{Error, Result};
use ear_common::{Pitch, PitchClass};
use std::path::{Path, PathBuf};

/// File names of every note sound, in keyboard order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCatalog {
    files: Vec<String>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self {
            files: Pitch::all().iter().map(|pitch| pitch.asset_file_name()).collect(),
        }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn file_for(&self, pitch: Pitch) -> &str {
        &self.files[pitch.index()]
    }

    /// Files played together for a pitch class
    pub fn concert_files(&self, class: PitchClass) -> Vec<&str> {
        class.pitches().into_iter().map(|pitch| self.file_for(pitch)).collect()
    }

    /// Files from the catalog that are missing under `dir`
    pub async fn missing_in(&self, dir: &Path) -> Vec<PathBuf> {
        let mut missing = Vec::new();
        for file in &self.files {
            let path = dir.join(file);
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                missing.push(path);
            }
        }
        missing
    }

    /// Fails with [`Error::Audio`] unless every file exists under `dir`
    pub async fn verify(&self, dir: &Path) -> Result<()> {
        let missing = self.missing_in(dir).await;
        match missing.first() {
            None => Ok(()),
            Some(first) => Err(Error::Audio(format!(
                "{} of {} sound files missing from {} (first: {})",
                missing.len(),
                self.files.len(),
                dir.display(),
                first.display()
            ))),
        }
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new()
    }
}
