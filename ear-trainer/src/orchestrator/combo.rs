//! Combo game: cycles through every game, moving on after each correct guess

use super::Orchestrator;
use crate::game::GameGuess;
use crate::Result;
use chrono::Utc;
use ear_common::{GameEvent, GameName};
use tracing::info;

/// Which game the combo is currently playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboState {
    pub active_game: GameName,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            active_game: GameName::Piano,
        }
    }
}

/// Game that follows `name` in the combo cycle
pub fn next_game(name: GameName) -> GameName {
    match name {
        GameName::Piano => GameName::NoteDistance,
        GameName::NoteDistance => GameName::NoteName,
        GameName::NoteName => GameName::Piano,
    }
}

impl Orchestrator {
    pub fn active_game(&self) -> GameName {
        self.state().read().combo.active_game
    }

    pub fn set_active_game(&self, name: GameName) {
        let changed = {
            let mut session = self.state().write();
            let changed = session.combo.active_game != name;
            session.combo.active_game = name;
            changed
        };
        if changed {
            info!("Combo game switched to {}", name);
            self.state().broadcast_event(GameEvent::ActiveGameChanged {
                game: name,
                timestamp: Utc::now(),
            });
        }
    }

    /// Presents the combo's active game
    pub async fn present_combo(&self, force_refresh: bool) -> Result<usize> {
        self.present(self.active_game(), force_refresh).await
    }

    /// Guesses on the active game.
    ///
    /// A correct guess pauses, then switches to the next game in the cycle
    /// and presents it. A wrong guess replays the same game after its usual
    /// delay.
    pub async fn combo_guess(&self, name: GameName, guess: GameGuess) -> Result<()> {
        let pause = self.config().pacing.combo_pause();
        let delays = self.clone();
        let this = self.clone();
        self.guess_with(
            name,
            guess,
            move |was_correct, name| {
                if was_correct {
                    pause
                } else {
                    delays.present_delay(name, was_correct)
                }
            },
            move |was_correct, name| async move {
                let next = if was_correct { next_game(name) } else { name };
                this.set_active_game(next);
                this.present(next, false).await.map(|_| ())
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_visits_every_game() {
        let mut name = ComboState::default().active_game;
        let mut visited = vec![name];
        for _ in 0..3 {
            name = next_game(name);
            visited.push(name);
        }
        assert_eq!(
            visited,
            vec![
                GameName::Piano,
                GameName::NoteDistance,
                GameName::NoteName,
                GameName::Piano
            ]
        );
    }
}
