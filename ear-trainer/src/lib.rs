//! # Ear Sharpener Trainer Library (ear-trainer)
//!
//! Game progression engine for three ear-training quiz games.
//!
//! **Purpose:** Track each game's level and step, generate the choices and the
//! correct answer for the current difficulty, play the question, and pace the
//! present → guess → present cycle without letting overlapping operations
//! corrupt each other.
//!
//! **Architecture:** Pure progression engine (`game`) + per-game models
//! (`variants`) + async orchestration over shared state (`orchestrator`)

pub mod audio;
pub mod error;
pub mod game;
pub mod input_gate;
pub mod orchestrator;
pub mod persistence;
pub mod state;
pub mod variants;

pub use error::{Error, Result};
pub use game::{GameGuess, GameModel, GameState};
pub use orchestrator::Orchestrator;
pub use state::SharedState;
pub use variants::Games;
