//! Common error types for Ear Sharpener

use thiserror::Error;

/// Common result type for Ear Sharpener operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the library crates
#[derive(Error, Debug)]
pub enum Error {
    /// A vocabulary lookup was given an item that is not part of it
    #[error("Not found: {0}")]
    NotFound(String),

    /// A game name outside the fixed set of games
    #[error("Unknown game variant: {0}")]
    UnknownVariant(String),

    /// Invalid user input or parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
