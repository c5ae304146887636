//! Error types for ear-trainer
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use ear_common::GameName;
use thiserror::Error;

/// Main error type for the ear-trainer library
#[derive(Error, Debug)]
pub enum Error {
    /// Vocabulary, game name, or configuration errors from the common library
    #[error(transparent)]
    Common(#[from] ear_common::Error),

    /// A guess of the wrong kind for the game it was made on
    #[error("Invalid guess for {game}: {guess}")]
    InvalidGuess { game: GameName, guess: String },

    /// Audio loading or playback errors
    #[error("Audio error: {0}")]
    Audio(String),

    /// Saving or loading progress failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using ear-trainer Error
pub type Result<T> = std::result::Result<T, Error>;
