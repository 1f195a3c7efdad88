// Warming up: key counting, degree finding, chord spelling, key signatures,
// solfège.

use theory_drill_prng::DrillRng;

use super::{chord_tones as spell_chord, pitch_answers, random_degree, random_pitch, strings};
use crate::degree::{SOLFEGE, degree_pitch, semitone_to_degrees};
use crate::pitch::{PitchClass, SignatureAccidental, major_key_for_signature};
use crate::question::{AnswerKind, Answers, Question};
use crate::tables::TheoryTables;
use crate::topic::Topic;

/// Highest key count asked; two octaves.
const MAX_KEYS: i32 = 24;

/// Counting both ends, `n` keys up from the tonic lands on degree
/// `(n - 1) mod 12`. Landing on the tonic again also accepts `P8`.
pub(crate) fn counting_keys(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let keys = rng.range_i32_inclusive(1, MAX_KEYS);
    let semitone = (keys - 1).rem_euclid(12);
    let mut answers = strings(&semitone_to_degrees(semitone));
    if semitone == 0 && keys > 1 {
        answers.push("P8".to_string());
    }
    Question::new(
        Topic::CountingKeys,
        format!("Counting {keys} keys from the tonic (both ends included), which degree do you reach?"),
        Answers::Tokens(answers),
        AnswerKind::Degree,
    )
}

pub(crate) fn finding_degrees(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let key = random_pitch(rng);
    let degree = random_degree(rng);
    Question::new(
        Topic::FindingDegrees,
        format!("What pitch is {degree} in the key of {key}?"),
        pitch_answers(degree_pitch(key, degree)),
        AnswerKind::Pitch,
    )
}

pub(crate) fn chord_tones(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let root = random_pitch(rng);
    let formula = rng.choose(&tables.chord_formulas);
    Question::new(
        Topic::ChordTones,
        format!("Spell the chord tones of {root}{}.", formula.name),
        Answers::Tokens(spell_chord(root, &formula.offsets)),
        AnswerKind::Pitch,
    )
    .separated()
}

pub(crate) fn key_signatures(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let accidental = if rng.random_bool(0.5) {
        SignatureAccidental::Sharps
    } else {
        SignatureAccidental::Flats
    };
    let count = rng.range_usize(0, 8);
    let major = PitchClass::parse(major_key_for_signature(accidental, count)).unwrap_or(PitchClass::C);
    let minor = rng.random_bool(0.5);
    let tonic = if minor { major.relative_minor() } else { major };
    let signature = if count == 0 {
        "no sharps or flats".to_string()
    } else {
        accidental.symbol().to_string().repeat(count)
    };
    Question::new(
        Topic::KeySignatures,
        format!(
            "Which {} key has a signature of {signature}?",
            if minor { "minor" } else { "major" }
        ),
        pitch_answers(tonic),
        AnswerKind::Pitch,
    )
}

pub(crate) fn solfege(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let (degree, syllable) = *rng.choose(&SOLFEGE);
    Question::new(
        Topic::Solfege,
        format!("What is the solfège syllable for {degree}?"),
        Answers::Tokens(vec![syllable.to_string()]),
        AnswerKind::Solfege,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::grade;
    use crate::tables::default_tables;

    #[test]
    fn counting_keys_wraps_and_offers_octave() {
        let tables = default_tables();
        let mut rng = DrillRng::new(21);
        let mut saw_octave = false;
        for _ in 0..500 {
            let q = counting_keys(&tables, &mut rng);
            let keys: i32 = q
                .prompt
                .split_whitespace()
                .nth(1)
                .and_then(|n| n.parse().ok())
                .unwrap();
            let tokens = q.answers.tokens();
            if keys == 13 || keys == 25 {
                assert_eq!(tokens, vec!["I", "P8"]);
                saw_octave = true;
            }
            if keys == 1 {
                assert_eq!(tokens, vec!["I"]);
            }
            if keys == 8 {
                assert_eq!(tokens, vec!["V"]);
            }
            // One past the octave keeps counting up the keyboard.
            if keys == 14 {
                assert_eq!(tokens, vec!["bII", "#I"]);
            }
        }
        assert!(saw_octave);
    }

    #[test]
    fn chord_tones_grade_as_a_set() {
        let tables = default_tables();
        let mut rng = DrillRng::new(4);
        let q = chord_tones(&tables, &mut rng);
        let mut reversed = q.answers.tokens();
        reversed.reverse();
        assert!(grade(&q, &reversed.join(", ")));
        assert!(!grade(&q, reversed[0]));
    }

    #[test]
    fn key_signature_answers() {
        let tables = default_tables();
        let mut rng = DrillRng::new(9);
        for _ in 0..200 {
            let q = key_signatures(&tables, &mut rng);
            if q.prompt == "Which major key has a signature of bbbbbbb?" {
                assert!(grade(&q, "Cb"));
                assert!(grade(&q, "B"));
            }
            if q.prompt == "Which minor key has a signature of ###?" {
                assert!(grade(&q, "F#"));
            }
            if q.prompt.starts_with("Which minor key has a signature of no") {
                assert!(grade(&q, "A"));
            }
        }
    }

    #[test]
    fn solfege_is_literal() {
        let tables = default_tables();
        let mut rng = DrillRng::new(2);
        let q = solfege(&tables, &mut rng);
        let answer = q.answers.tokens()[0].to_string();
        assert!(grade(&q, &answer.to_uppercase()));
        assert!(!grade(&q, "Xa"));
    }
}
