// Scale degrees: Roman numerals with an optional flat/sharp prefix.
//
// The label → semitone map is many-to-one (`#I` and `bII` are both 1), so
// every semitone has one or more enharmonic labels and the generators hand
// out all of them wherever a degree is the expected answer.
//
// Lookups are forgiving: an unknown label resolves to offset 0 rather than
// an error, matching how the rest of the engine treats malformed input.

use crate::normalize::compact;
use crate::pitch::PitchClass;

/// Every degree label with its semitone offset from the tonic. Order sets
/// the preference when a semitone has several labels.
pub const DEGREES: [(&str, u8); 20] = [
    ("I", 0),
    ("bII", 1),
    ("#I", 1),
    ("II", 2),
    ("bIII", 3),
    ("#II", 3),
    ("III", 4),
    ("bIV", 4),
    ("IV", 5),
    ("#III", 5),
    ("bV", 6),
    ("#IV", 6),
    ("V", 7),
    ("bVI", 8),
    ("#V", 8),
    ("VI", 9),
    ("bVII", 10),
    ("#VI", 10),
    ("VII", 11),
    ("bI", 11),
];

/// `#VII` sits outside the main table so that `I` stays the only label
/// offered for the tonic; it still parses.
const EXTRA_DEGREES: [(&str, u8); 1] = [("#VII", 0)];

const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Solfège syllable for each chromatic degree (movable do, ascending
/// sharps and descending flats). `bI` shares Ti with VII.
pub const SOLFEGE: [(&str, &str); 18] = [
    ("I", "Do"),
    ("II", "Re"),
    ("III", "Mi"),
    ("IV", "Fa"),
    ("V", "Sol"),
    ("VI", "La"),
    ("VII", "Ti"),
    ("bII", "Ra"),
    ("bIII", "Me"),
    ("bV", "Se"),
    ("bVI", "Le"),
    ("bVII", "Te"),
    ("#I", "Di"),
    ("#II", "Ri"),
    ("#IV", "Fi"),
    ("#V", "Si"),
    ("#VI", "Li"),
    ("bI", "Ti"),
];

/// Canonicalize the spelling of a degree label: accidental prefix kept,
/// numeral upper-cased (`"biii"` → `"bIII"`). `None` when the text is not
/// an accidental followed by a Roman numeral from I to VII.
pub fn canonical_label(text: &str) -> Option<String> {
    let (label, rest) = split_degree_prefix(text)?;
    if rest.is_empty() { Some(label) } else { None }
}

/// Split a degree-prefixed symbol (`"bVIImaj7"`) into its canonical degree
/// label and the remaining suffix. The numeral is the longest run of `I`/`V`
/// characters, so `"VIIm7b5"` splits as `VII` + `m7b5`.
pub fn split_degree_prefix(text: &str) -> Option<(String, String)> {
    let s = compact(text);
    let (accidental, body) = match s.chars().next()? {
        c @ ('b' | '#') => (c.to_string(), &s[1..]),
        _ => (String::new(), s.as_str()),
    };
    let numeral_len = body
        .chars()
        .take_while(|c| matches!(c.to_ascii_uppercase(), 'I' | 'V'))
        .count();
    let numeral = body[..numeral_len].to_ascii_uppercase();
    if !NUMERALS.contains(&numeral.as_str()) {
        return None;
    }
    Some((format!("{accidental}{numeral}"), body[numeral_len..].to_string()))
}

/// Semitone offset of a degree label. Unknown labels resolve to 0.
pub fn degree_to_semitone(label: &str) -> u8 {
    lookup(label).unwrap_or(0)
}

/// Semitone offset of a degree label, or `None` if the label is unknown.
pub fn lookup(label: &str) -> Option<u8> {
    let label = canonical_label(label)?;
    DEGREES
        .iter()
        .chain(EXTRA_DEGREES.iter())
        .find(|(name, _)| *name == label)
        .map(|&(_, semi)| semi)
}

/// Every degree label denoting `semitone` (taken modulo 12), in preference
/// order. Always one or two entries.
pub fn semitone_to_degrees(semitone: i32) -> Vec<&'static str> {
    let semi = semitone.rem_euclid(12) as u8;
    DEGREES
        .iter()
        .filter(|(_, s)| *s == semi)
        .map(|&(name, _)| name)
        .collect()
}

/// The preferred label for a semitone offset.
pub fn preferred_degree(semitone: i32) -> &'static str {
    semitone_to_degrees(semitone)[0]
}

/// Preferred label for a (possibly non-canonical) degree label, so
/// enharmonic degrees compare equal: `"#I"` → `"bII"`.
pub fn enharmonic_canonical(label: &str) -> Option<&'static str> {
    lookup(label).map(|semi| preferred_degree(semi as i32))
}

/// Pitch of a degree in the key of `tonic`.
pub fn degree_pitch(tonic: PitchClass, label: &str) -> PitchClass {
    tonic.transpose(degree_to_semitone(label) as i32)
}

/// Solfège syllable for a degree label, if it has one.
pub fn solfege(label: &str) -> Option<&'static str> {
    SOLFEGE
        .iter()
        .find(|(degree, _)| *degree == label)
        .map(|&(_, syllable)| syllable)
}

/// Degree-based chord symbol → pitch-based chord symbol in `key`:
/// `("D", "bVIImaj7")` → `"Cmaj7"`. Symbols without a degree prefix are
/// appended to the key name unchanged.
pub fn degree_chord_to_pitch_chord(key: PitchClass, symbol: &str) -> String {
    match split_degree_prefix(symbol) {
        Some((degree, quality)) => format!("{}{}", degree_pitch(key, &degree), quality),
        None => format!("{key}{symbol}"),
    }
}

/// Roman ordinal used in prompts: 1 → "Ist", 2 → "IInd", 3 → "IIIrd".
pub fn ordinal(n: usize) -> String {
    match n {
        1 => "Ist".to_string(),
        2 => "IInd".to_string(),
        3 => "IIIrd".to_string(),
        4..=7 => format!("{}th", NUMERALS[n - 1]),
        _ => format!("{n}th"),
    }
}
