//! Game names and event types for the Ear Sharpener event system

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the pseudo-game that chains the other games together
pub const COMBO_GAME_NAME: &str = "combo-game";

/// The three quiz games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GameName {
    /// Find the played note on the piano
    Piano,
    /// Name the pitch class played across every octave
    NoteName,
    /// Count the semitones between two notes
    NoteDistance,
}

impl GameName {
    pub const ALL: [GameName; 3] = [GameName::Piano, GameName::NoteName, GameName::NoteDistance];

    pub fn as_str(self) -> &'static str {
        match self {
            GameName::Piano => "piano-game",
            GameName::NoteName => "note-name-game",
            GameName::NoteDistance => "note-distance-game",
        }
    }
}

impl fmt::Display for GameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GameName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::UnknownVariant(s.to_string()))
    }
}

impl From<GameName> for String {
    fn from(name: GameName) -> Self {
        name.as_str().to_string()
    }
}

impl TryFrom<String> for GameName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Ear Sharpener event types
///
/// Operation events carry the action id of the operation that produced them so
/// a `Presenting` can be matched with its `Presented`, and a `Guessing` with its
/// `Guessed` or `GuessSuperseded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A game is about to play its current question
    Presenting {
        action_id: u64,
        game: GameName,
        force_refresh: bool,
        timestamp: DateTime<Utc>,
    },

    /// A game finished playing (or stopped playing) its question
    Presented {
        action_id: u64,
        game: GameName,
        played_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// The player picked a difficulty
    DifficultySet {
        game: GameName,
        level: u32,
        step: u32,
        timestamp: DateTime<Utc>,
    },

    /// A guess was applied to a game
    Guessing {
        action_id: u64,
        game: GameName,
        guess: String,
        correct: bool,
        level: u32,
        step: u32,
        timestamp: DateTime<Utc>,
    },

    /// The feedback window after a guess elapsed
    Guessed {
        action_id: u64,
        game: GameName,
        timestamp: DateTime<Utc>,
    },

    /// A newer guess arrived before this guess's feedback window elapsed
    GuessSuperseded {
        action_id: u64,
        game: GameName,
        timestamp: DateTime<Utc>,
    },

    /// Player input was enabled or disabled
    InputGateChanged {
        enabled: bool,
        timestamp: DateTime<Utc>,
    },

    /// The combo game moved on to another game
    ActiveGameChanged {
        game: GameName,
        timestamp: DateTime<Utc>,
    },

    /// Every sound asset is ready to play
    AudioLoaded {
        timestamp: DateTime<Utc>,
    },
}

impl GameEvent {
    /// Event type name as used in the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::Presenting { .. } => "Presenting",
            GameEvent::Presented { .. } => "Presented",
            GameEvent::DifficultySet { .. } => "DifficultySet",
            GameEvent::Guessing { .. } => "Guessing",
            GameEvent::Guessed { .. } => "Guessed",
            GameEvent::GuessSuperseded { .. } => "GuessSuperseded",
            GameEvent::InputGateChanged { .. } => "InputGateChanged",
            GameEvent::ActiveGameChanged { .. } => "ActiveGameChanged",
            GameEvent::AudioLoaded { .. } => "AudioLoaded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_name_round_trip() {
        for name in GameName::ALL {
            assert_eq!(name.as_str().parse::<GameName>().unwrap(), name);
        }
    }

    #[test]
    fn test_unknown_game_names() {
        assert!(matches!(
            COMBO_GAME_NAME.parse::<GameName>(),
            Err(Error::UnknownVariant(_))
        ));
        assert!(matches!("chess".parse::<GameName>(), Err(Error::UnknownVariant(_))));
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = GameEvent::Guessed {
            action_id: 7,
            game: GameName::NoteDistance,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Guessed");
        assert_eq!(json["game"], "note-distance-game");
        assert_eq!(json["action_id"], 7);

        let parsed: GameEvent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(parsed.event_type(), "Guessed");
    }
}
