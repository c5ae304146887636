//! Game progression engine
//!
//! [`GameState`] holds the difficulty, choices, and counters every game shares,
//! [`engine`] implements the progression rules over it, and [`GameModel`] is
//! the seam where each game supplies its own choices and playback.

pub mod engine;
pub mod model;
pub mod state;

pub use model::{AbortCheck, GameGuess, GameModel, PresentContext};
pub use state::{GameState, Progression};
