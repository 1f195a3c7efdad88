// Intervals and scale numbers reduced to semitone counts.
//
// An interval is a quality plus a diatonic number (`M3`, `P5`, `m10`) or the
// compact augmented/diminished form (`+4`, `-9`). Numbers above 7 are
// compound: they fold to `number - 7` plus one octave, so `M10` is 16
// semitones and `M10 ≡ M3 (mod 12)`.
//
// Diminished lowers a perfect-type number (1, 4, 5) by one and a major-type
// number (2, 3, 6, 7) by two, i.e. one below minor. That makes `-3 ≡ M2` and
// `-2 ≡ P1`, which is what the enharmonic interval tables require.
//
// Scale numbers (`#4`, `b13`) and tensions (`b9`, `#11`) are the major-scale
// degree of the number shifted by one semitone per accidental.

use std::fmt;

use crate::normalize::compact;
use crate::pitch::PitchClass;

/// Major-scale semitone offsets of the simple numbers 1-7.
const MAJOR_SCALE: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Major,
    Minor,
    Perfect,
    Augmented,
    Diminished,
}

impl Quality {
    pub fn symbol(self) -> char {
        match self {
            Quality::Major => 'M',
            Quality::Minor => 'm',
            Quality::Perfect => 'P',
            Quality::Augmented => '+',
            Quality::Diminished => '-',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'M' => Some(Quality::Major),
            'm' => Some(Quality::Minor),
            'P' | 'p' => Some(Quality::Perfect),
            '+' => Some(Quality::Augmented),
            '-' => Some(Quality::Diminished),
            _ => None,
        }
    }

    pub const ALL: [Quality; 5] = [
        Quality::Minor,
        Quality::Major,
        Quality::Perfect,
        Quality::Augmented,
        Quality::Diminished,
    ];
}

/// Whether a diatonic number (1-based, compound allowed) is perfect-type
/// (unison, fourth, fifth and their octave extensions).
pub fn is_perfect_type(number: u32) -> bool {
    matches!((number.max(1) - 1) % 7, 0 | 3 | 4)
}

/// Semitone count of an interval. `number` is 1-based; 0 is treated as 1.
///
/// `base(simple number) + 12 * octaves + quality adjustment`.
pub fn interval_to_semitones(quality: Quality, number: u32) -> i32 {
    let n = number.max(1) - 1;
    let octaves = (n / 7) as i32;
    let base = MAJOR_SCALE[(n % 7) as usize] + 12 * octaves;
    let adjustment = match quality {
        Quality::Major | Quality::Perfect => 0,
        Quality::Minor => -1,
        Quality::Augmented => 1,
        Quality::Diminished if is_perfect_type(number) => -1,
        Quality::Diminished => -2,
    };
    base + adjustment
}

/// A parsed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub quality: Quality,
    pub number: u32,
}

impl Interval {
    pub fn new(quality: Quality, number: u32) -> Self {
        Interval { quality, number }
    }

    /// Parse `M3`, `P5`, `P.5`, `m10`, `+4`, `-9`. `None` if the quality
    /// symbol is unknown or the number is missing/zero.
    pub fn parse(text: &str) -> Option<Self> {
        let s = compact(text).replace("P.", "P");
        let mut chars = s.chars();
        let quality = Quality::from_symbol(chars.next()?)?;
        let number: u32 = chars.as_str().parse().ok()?;
        if number == 0 {
            return None;
        }
        Some(Interval { quality, number })
    }

    pub fn semitones(self) -> i32 {
        interval_to_semitones(self.quality, self.number)
    }

    /// Whether the quality is a conventional one for this number (`m`/`M`
    /// on seconds, thirds, sixths, sevenths; `P` on unisons, fourths,
    /// fifths; `+`/`-` anywhere).
    pub fn is_conventional(self) -> bool {
        match self.quality {
            Quality::Major | Quality::Minor => !is_perfect_type(self.number),
            Quality::Perfect => is_perfect_type(self.number),
            Quality::Augmented | Quality::Diminished => true,
        }
    }

    /// Pitch reached from `root` by this interval.
    pub fn above(self, root: PitchClass) -> PitchClass {
        root.transpose(self.semitones())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quality.symbol(), self.number)
    }
}

/// Semitones of a scale number with optional accidentals: `"#4"` → 6,
/// `"b13"` → 20, `"#7"` → 12. `None` for anything else.
pub fn scale_number_to_semitones(token: &str) -> Option<i32> {
    let s = compact(token);
    let digits_at = s.find(|c: char| c.is_ascii_digit())?;
    let (accidentals, digits) = s.split_at(digits_at);
    let shift = if accidentals.chars().all(|c| c == '#') {
        accidentals.len() as i32
    } else if accidentals.chars().all(|c| c == 'b') {
        -(accidentals.len() as i32)
    } else {
        return None;
    };
    let number: u32 = digits.parse().ok()?;
    if number == 0 {
        return None;
    }
    Some(interval_to_semitones(Quality::Major, number) + shift)
}

/// Semitones of a chord tension (`b9`, `#11`, `13`). Unknown tensions
/// resolve to the 9th, the most common one.
pub fn tension_to_semitones(tension: &str) -> i32 {
    scale_number_to_semitones(tension).unwrap_or(14)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semis(text: &str) -> i32 {
        Interval::parse(text).unwrap().semitones()
    }

    #[test]
    fn simple_intervals() {
        assert_eq!(semis("P1"), 0);
        assert_eq!(semis("m2"), 1);
        assert_eq!(semis("M3"), 4);
        assert_eq!(semis("P4"), 5);
        assert_eq!(semis("+4"), 6);
        assert_eq!(semis("-5"), 6);
        assert_eq!(semis("P.5"), 7);
        assert_eq!(semis("m7"), 10);
        assert_eq!(semis("M7"), 11);
        assert_eq!(semis("P8"), 12);
    }

    #[test]
    fn diminished_imperfect_intervals_sit_below_minor() {
        assert_eq!(semis("-3"), 2);
        assert_eq!(semis("-2"), 0);
        assert_eq!(semis("-7"), 9);
        assert_eq!(semis("-6"), 7);
    }

    #[test]
    fn compound_intervals_fold_to_their_simple_equivalent() {
        for quality in Quality::ALL {
            for number in 1..=7u32 {
                let simple = interval_to_semitones(quality, number);
                let compound = interval_to_semitones(quality, number + 7);
                let double = interval_to_semitones(quality, number + 14);
                assert_eq!(compound, simple + 12, "{}{}", quality.symbol(), number);
                assert_eq!(double.rem_euclid(12), simple.rem_euclid(12));
            }
        }
        assert_eq!(semis("M10"), 16);
        assert_eq!(semis("+11"), 18);
        assert_eq!(semis("-12"), 18);
    }

    #[test]
    fn parse_rejects_bad_notation() {
        for bad in ["", "X3", "M", "M0", "3", "Mx"] {
            assert!(Interval::parse(bad).is_none(), "{bad:?}");
        }
        assert_eq!(Interval::parse("m10").unwrap().to_string(), "m10");
    }

    #[test]
    fn scale_numbers_and_tensions() {
        assert_eq!(scale_number_to_semitones("#4"), Some(6));
        assert_eq!(scale_number_to_semitones("b13"), Some(20));
        assert_eq!(scale_number_to_semitones("#7"), Some(12));
        assert_eq!(scale_number_to_semitones("b8"), Some(11));
        assert_eq!(scale_number_to_semitones("9"), Some(14));
        assert_eq!(scale_number_to_semitones("#b4"), None);
        assert_eq!(scale_number_to_semitones("b"), None);
        assert_eq!(tension_to_semitones("#9"), 15);
        assert_eq!(tension_to_semitones("??"), 14);
    }

    #[test]
    fn conventional_qualities() {
        assert!(Interval::new(Quality::Major, 10).is_conventional());
        assert!(!Interval::new(Quality::Major, 5).is_conventional());
        assert!(Interval::new(Quality::Perfect, 11).is_conventional());
        assert!(!Interval::new(Quality::Perfect, 6).is_conventional());
    }
}
