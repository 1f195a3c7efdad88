// Pitch classes on the 12-step chromatic ring.
//
// A `PitchClass` is an index 0-11 (C = 0). Every accepted spelling maps to
// exactly one index: a letter A-G in either case followed by up to two
// accidentals of one kind (`#`, `##`, `b`, `bb`). The reverse direction is
// one-to-many and enumerable through `spellings()`. Display uses the
// flat-preferred canonical name.
//
// Also hosts the pitch-level helpers the generators lean on: circle-of-fifths
// position, key-signature tonics, relative minor, and splitting a chord
// symbol into root + quality.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalize::compact;

/// Canonical flat-preferred names, indexed by pitch class.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// The circle of fifths starting at C, in canonical spelling.
pub const CIRCLE_OF_FIFTHS: [&str; 12] = [
    "C", "G", "D", "A", "E", "B", "Gb", "Db", "Ab", "Eb", "Bb", "F",
];

/// Major key tonics by number of flats in the key signature (0-7).
const MAJOR_BY_FLATS: [&str; 8] = ["C", "F", "Bb", "Eb", "Ab", "Db", "Gb", "Cb"];
/// Major key tonics by number of sharps in the key signature (0-7).
const MAJOR_BY_SHARPS: [&str; 8] = ["C", "G", "D", "A", "E", "B", "F#", "C#"];

const LETTERS: [(char, u8); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// One of the 12 pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Build from any integer; wraps modulo 12.
    pub fn new(index: i32) -> Self {
        PitchClass(index.rem_euclid(12) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Canonical flat-preferred name.
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    /// Parse a free-text pitch token. Returns `None` for anything that is not
    /// a letter plus at most two accidentals of one kind.
    pub fn parse(token: &str) -> Option<Self> {
        let s = compact(token);
        let mut chars = s.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let natural = LETTERS.iter().find(|(l, _)| *l == letter)?.1 as i32;
        let accidentals: Vec<char> = chars.collect();
        if accidentals.len() > 2 {
            return None;
        }
        let shift = match accidentals.first() {
            None => 0,
            Some('#') if accidentals.iter().all(|&c| c == '#') => accidentals.len() as i32,
            Some('b') if accidentals.iter().all(|&c| c == 'b') => -(accidentals.len() as i32),
            _ => return None,
        };
        Some(PitchClass::new(natural + shift))
    }

    /// `(index + semitones) mod 12`; `semitones` may be negative.
    pub fn transpose(self, semitones: i32) -> Self {
        PitchClass::new(self.0 as i32 + semitones)
    }

    /// Upward distance from `self` to `other`, in 0..12.
    pub fn semitones_to(self, other: PitchClass) -> u8 {
        (other.0 + 12 - self.0) % 12
    }

    /// Every spelling that parses to this pitch class, including double
    /// accidentals. Canonical name first.
    pub fn spellings(self) -> Vec<String> {
        self.spellings_up_to(2)
    }

    /// Spellings using at most one accidental (`Db`, `C#`; `C`, `B#`).
    /// Canonical name first.
    pub fn common_spellings(self) -> Vec<String> {
        self.spellings_up_to(1)
    }

    fn spellings_up_to(self, max_accidentals: i32) -> Vec<String> {
        let mut out = vec![self.name().to_string()];
        for shift in -max_accidentals..=max_accidentals {
            for &(letter, natural) in &LETTERS {
                if PitchClass::new(natural as i32 + shift) != self {
                    continue;
                }
                let accidental = match shift {
                    s if s < 0 => "b".repeat((-s) as usize),
                    s => "#".repeat(s as usize),
                };
                let spelled = format!("{letter}{accidental}");
                if !out.contains(&spelled) {
                    out.push(spelled);
                }
            }
        }
        out
    }

    /// Index within the circle of fifths starting at C: how many perfect
    /// fifths up from C reach this pitch class.
    pub fn cycle_of_fifths_position(self) -> u8 {
        CIRCLE_OF_FIFTHS
            .iter()
            .position(|name| *name == self.name())
            .map(|p| p as u8)
            .unwrap_or(0)
    }

    /// The relative minor of a major tonic (a minor third down).
    pub fn relative_minor(self) -> Self {
        self.transpose(-3)
    }

    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..12).map(PitchClass)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Free-function form of `PitchClass::parse` returning the bare index.
pub fn pitch_class_of(token: &str) -> Option<u8> {
    PitchClass::parse(token).map(PitchClass::index)
}

/// Accidental type of a key signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAccidental {
    Sharps,
    Flats,
}

impl SignatureAccidental {
    pub fn symbol(self) -> char {
        match self {
            SignatureAccidental::Sharps => '#',
            SignatureAccidental::Flats => 'b',
        }
    }
}

/// Tonic of the major key whose signature has `count` (0-7) accidentals.
/// Counts above 7 clamp to 7.
pub fn major_key_for_signature(accidental: SignatureAccidental, count: usize) -> &'static str {
    let count = count.min(7);
    match accidental {
        SignatureAccidental::Sharps => MAJOR_BY_SHARPS[count],
        SignatureAccidental::Flats => MAJOR_BY_FLATS[count],
    }
}

/// Split a chord symbol into its root and quality suffix: `"F#m7b5"` →
/// `(F#, "m7b5")`. The root is the letter plus any directly following
/// accidentals; `None` if the symbol does not start with a pitch.
pub fn split_chord_symbol(symbol: &str) -> Option<(PitchClass, String)> {
    let s = compact(symbol);
    let first = s.chars().next()?;
    if !LETTERS.iter().any(|(l, _)| *l == first.to_ascii_uppercase()) {
        return None;
    }
    let accidental_len = s[first.len_utf8()..]
        .chars()
        .take(2)
        .take_while(|c| *c == '#' || *c == 'b')
        .count();
    let root_len = first.len_utf8() + accidental_len;
    let root = PitchClass::parse(&s[..root_len])?;
    Some((root, s[root_len..].to_string()))
}
