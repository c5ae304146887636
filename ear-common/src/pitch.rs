//! Pitch domain model
//!
//! Two closed, ordered vocabularies:
//! - [`PitchClass`]: the 12 chromatic note names, sharps only, starting at `A`
//! - [`Pitch`]: the 88 keys of a piano, `A0` through `C8`
//!
//! Both serialize as their display names (`"C#"`, `"C#4"`).

use crate::sequence;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of keys on a standard piano
pub const PITCH_COUNT: usize = 88;

/// One of the 12 chromatic note names. Sharps are used, flats are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PitchClass {
    A,
    ASharp,
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
}

impl PitchClass {
    /// Every pitch class in vocabulary order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
        }
    }

    /// Position in [`PitchClass::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Semitones above `C` within an octave (C=0, B=11)
    fn semitone_from_c(self) -> usize {
        (self.index() + 9) % 12
    }

    pub fn is_natural(self) -> bool {
        !self.name().ends_with('#')
    }

    /// Every key on the piano with this pitch class, lowest first
    pub fn pitches(self) -> Vec<Pitch> {
        Pitch::all()
            .iter()
            .copied()
            .filter(|pitch| pitch.pitch_class() == self)
            .collect()
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        PitchClass::ALL
            .iter()
            .copied()
            .find(|class| class.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidInput(format!("'{}' is not a pitch class", s)))
    }
}

impl From<PitchClass> for String {
    fn from(class: PitchClass) -> Self {
        class.name().to_string()
    }
}

impl TryFrom<String> for PitchClass {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A concrete key on the piano, stored as its index from `A0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Pitch(u8);

static PITCHES: Lazy<Vec<Pitch>> = Lazy::new(|| (0..PITCH_COUNT as u8).map(Pitch).collect());

impl Pitch {
    /// Lowest key, `A0`
    pub const LOWEST: Pitch = Pitch(0);
    /// Highest key, `C8`
    pub const HIGHEST: Pitch = Pitch(PITCH_COUNT as u8 - 1);
    /// Middle C
    pub const MIDDLE_C: Pitch = Pitch(39);

    /// Every key in ascending order
    pub fn all() -> &'static [Pitch] {
        &PITCHES
    }

    /// Builds the pitch of `class` at `octave`.
    ///
    /// Fails with [`Error::NotFound`] for combinations beyond the keyboard, like `C0`.
    pub fn new(class: PitchClass, octave: u8) -> Result<Pitch> {
        let index = octave as i64 * 12 + class.semitone_from_c() as i64 - 9;
        Self::from_index_signed(index)
            .ok_or_else(|| Error::NotFound(format!("{}{} is not on the piano", class, octave)))
    }

    pub fn from_index(index: usize) -> Result<Pitch> {
        Self::from_index_signed(index as i64)
            .ok_or_else(|| Error::NotFound(format!("pitch index {} is not on the piano", index)))
    }

    fn from_index_signed(index: i64) -> Option<Pitch> {
        (0..PITCH_COUNT as i64)
            .contains(&index)
            .then(|| Pitch(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::ALL[self.index() % 12]
    }

    pub fn octave(self) -> u8 {
        (self.0 + 9) / 12
    }

    pub fn is_natural(self) -> bool {
        self.pitch_class().is_natural()
    }

    pub fn is_pitch_class(self, class: PitchClass) -> bool {
        self.pitch_class() == class
    }

    /// Name of the sound file for this key, e.g. `41-c-4.mp3` for `C#4`
    pub fn asset_file_name(self) -> String {
        format!(
            "{}-{}.mp3",
            self.index() + 1,
            self.to_string().replace('#', "-").to_lowercase()
        )
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class(), self.octave())
    }
}

impl FromStr for Pitch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::InvalidInput(format!("'{}' has no octave", s)))?;
        let (class, octave) = trimmed.split_at(split);
        let octave: u8 = octave
            .parse()
            .map_err(|_| Error::InvalidInput(format!("'{}' has an invalid octave", s)))?;
        Pitch::new(class.parse()?, octave)
    }
}

impl From<Pitch> for String {
    fn from(pitch: Pitch) -> Self {
        pitch.to_string()
    }
}

impl TryFrom<String> for Pitch {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Gets `count` pitch classes around `anchor`, e.g. 4 around `C` is `[B, C, C#, D]`.
pub fn surrounding_pitch_classes(anchor: PitchClass, count: usize) -> Result<Vec<PitchClass>> {
    sequence::surrounding(&PitchClass::ALL, &anchor, count)
}

/// Gets `count` pitches around `anchor`, e.g. 6 around `A#3` is `[G#3 ..= C#4]`.
pub fn surrounding_pitches(anchor: Pitch, count: usize) -> Result<Vec<Pitch>> {
    sequence::surrounding(Pitch::all(), &anchor, count)
}

pub fn distance_between_pitch_classes(a: PitchClass, b: PitchClass) -> Result<usize> {
    sequence::distance(&PitchClass::ALL, &a, &b)
}

/// Semitones between two keys
pub fn distance_between_pitches(a: Pitch, b: Pitch) -> Result<usize> {
    sequence::distance(Pitch::all(), &a, &b)
}

pub fn pitch_class_at_offset(
    anchor: PitchClass,
    offset: i64,
    randomize_direction: bool,
) -> Result<PitchClass> {
    sequence::item_at_offset(&PitchClass::ALL, &anchor, offset, randomize_direction)
}

/// Pitch `offset` keys away from `anchor`, wrapping around the keyboard.
pub fn pitch_at_offset(anchor: Pitch, offset: i64, randomize_direction: bool) -> Result<Pitch> {
    sequence::item_at_offset(Pitch::all(), &anchor, offset, randomize_direction)
}

/// Extends a contiguous run of pitches to whole octaves.
///
/// The run is padded down to the nearest `octave_start` at or below its first
/// pitch and up to the pitch class just before `octave_start` at or above its
/// last pitch, stopping at the keyboard edges. `[B3, C4]` padded from `C`
/// becomes `C3 ..= B4`.
pub fn pad_octaves(pitches: &[Pitch], octave_start: PitchClass) -> Result<Vec<Pitch>> {
    let (Some(&first), Some(&last)) = (pitches.first(), pitches.last()) else {
        return Ok(Vec::new());
    };
    let octave_end = sequence::item_before(&PitchClass::ALL, &octave_start)?;
    let all = Pitch::all();

    let start = all[..=first.index()]
        .iter()
        .rposition(|pitch| pitch.is_pitch_class(octave_start))
        .unwrap_or(0);
    let end = all[last.index()..]
        .iter()
        .position(|pitch| pitch.is_pitch_class(octave_end))
        .map(|offset| last.index() + offset)
        .unwrap_or(PITCH_COUNT - 1);

    let mut padded = Vec::with_capacity(pitches.len() + 22);
    padded.extend_from_slice(&all[start..first.index()]);
    padded.extend_from_slice(pitches);
    padded.extend_from_slice(&all[last.index() + 1..=end]);
    Ok(padded)
}

/// (quality, interval number) for each semitone count within an octave
const INTERVALS: [(char, i64); 12] = [
    ('P', 1),
    ('m', 2),
    ('M', 2),
    ('m', 3),
    ('M', 3),
    ('P', 4),
    ('d', 5),
    ('P', 5),
    ('m', 6),
    ('M', 6),
    ('m', 7),
    ('M', 7),
];

/// Interval name for a semitone distance: `7 → "P5"`, `12 → "P8"`, `13 → "m9"`.
pub fn interval_name(distance: i64) -> String {
    let semitone_index = (distance % 12).unsigned_abs() as usize;
    let octave_offset = distance.div_euclid(12).abs() * 7;
    let (quality, number) = INTERVALS[semitone_index];
    format!("{}{}", quality, number + octave_offset)
}
