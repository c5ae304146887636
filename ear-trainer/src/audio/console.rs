//! Audio player that logs notes instead of sounding them

use super::{AssetCatalog, AudioPlayer};
use crate::Result;
use async_trait::async_trait;
use ear_common::{Pitch, PitchClass};
use std::path::PathBuf;
use tracing::{debug, info};

/// Logs each note to the terminal
///
/// When an asset directory is configured, [`AudioPlayer::load_all`] checks
/// that every note file is present before the first game starts.
#[derive(Debug, Clone, Default)]
pub struct ConsoleAudio {
    asset_dir: Option<PathBuf>,
    catalog: AssetCatalog,
}

impl ConsoleAudio {
    pub fn new(asset_dir: Option<PathBuf>) -> Self {
        Self {
            asset_dir,
            catalog: AssetCatalog::new(),
        }
    }
}

#[async_trait]
impl AudioPlayer for ConsoleAudio {
    async fn load_all(&self) -> Result<()> {
        match &self.asset_dir {
            Some(dir) => {
                self.catalog.verify(dir).await?;
                info!(
                    "Found all {} sound files in {}",
                    self.catalog.files().len(),
                    dir.display()
                );
            }
            None => debug!("No asset directory configured, skipping sound file check"),
        }
        Ok(())
    }

    fn play_single(&self, pitch: Pitch, volume: f32) {
        info!(
            "♪ {} ({}) volume {:.2}",
            pitch,
            self.catalog.file_for(pitch),
            volume
        );
    }

    fn play_concert(&self, class: PitchClass, volume: f32) {
        let pitches: Vec<String> = class.pitches().iter().map(ToString::to_string).collect();
        info!("♪ {} volume {:.2}", pitches.join(" "), volume);
    }
}
