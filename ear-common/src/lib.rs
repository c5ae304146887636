//! # Ear Sharpener Common Library
//!
//! Shared code for the ear training games including:
//! - Sequence utilities over ordered vocabularies
//! - Pitch and pitch class domain model
//! - Game names and event types (GameEvent enum)
//! - Configuration loading
//! - Error types

pub mod config;
pub mod error;
pub mod events;
pub mod pitch;
pub mod sequence;

pub use error::{Error, Result};
pub use events::{GameEvent, GameName};
pub use pitch::{Pitch, PitchClass};
