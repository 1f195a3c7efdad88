// Mastery: harmonic functions, scale degrees and pitches, chord-scales,
// pivot chords and scale similarities.

use theory_drill_prng::DrillRng;

use super::{pitch_answers, random_degree, random_pitch, random_position, strings};
use crate::degree::{degree_pitch, degree_to_semitone, ordinal, semitone_to_degrees};
use crate::question::{AnswerKind, Answers, Question};
use crate::tables::TheoryTables;
use crate::topic::Topic;

/// Keys a chord quality can be diatonic to, as semitone offsets from the
/// chord root to each key's tonic: a maj7 is IV of the key a fifth up and I
/// of its own key; a 7 is V; an m7 is II, III or VI; an m7b5 is VII.
const PIVOT_KEYS: [(&str, &[i32]); 4] = [
    ("maj7", &[7, 0]),
    ("7", &[5]),
    ("m7", &[10, 8, 3]),
    ("m7b5", &[1]),
];

/// Every function a chord carries. Several functions make this an
/// all-of question.
pub(crate) fn functions(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let chords = tables.function_chords();
    let chord = *rng.choose(&chords);
    let mut found = tables.functions_of(chord);
    if found.is_empty() {
        found.push("T");
    }
    let question = Question::new(
        Topic::HarmonicFunctions,
        format!("What harmonic function does {chord} have?"),
        Answers::Tokens(strings(&found)),
        AnswerKind::Text,
    );
    if found.len() > 1 {
        question.separated()
    } else {
        question
    }
}

pub(crate) fn degrees(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let scale = rng.choose(&tables.scales);
    let n = random_position(rng);
    Question::new(
        Topic::ScaleDegrees,
        format!("What is the {} degree of {}?", ordinal(n), scale.name),
        Answers::Tokens(vec![scale.degrees[n - 1].clone()]),
        AnswerKind::Degree,
    )
}

pub(crate) fn pitches(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let key = random_pitch(rng);
    let scale = rng.choose(&tables.scales);
    let n = random_position(rng);
    Question::new(
        Topic::ScalePitches,
        format!("What is the {} note of {key} {}?", ordinal(n), scale.name),
        pitch_answers(degree_pitch(key, &scale.degrees[n - 1])),
        AnswerKind::Pitch,
    )
}

/// Any chord-scale listed for the chord is accepted.
pub(crate) fn available_scales(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let entry = rng.choose(&tables.available_scales);
    let chord = rng.choose(&entry.chords);
    Question::new(
        Topic::AvailableScales,
        format!("Name an available scale over {chord}."),
        Answers::Tokens(strings(&tables.scales_available_over(chord))),
        AnswerKind::Text,
    )
}

/// One answer group per key (either degree spelling of its tonic).
pub(crate) fn pivot(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let degree = random_degree(rng);
    let (quality, offsets) = *rng.choose(&PIVOT_KEYS);
    let semitone = degree_to_semitone(degree) as i32;
    let mut seen = Vec::new();
    let mut groups = Vec::new();
    for offset in offsets {
        let key = (semitone + offset).rem_euclid(12);
        if !seen.contains(&key) {
            seen.push(key);
            groups.push(strings(&semitone_to_degrees(key)));
        }
    }
    Question::new(
        Topic::PivotChords,
        format!("In which keys (as degrees) is {degree}{quality} a diatonic chord?"),
        Answers::Groups(groups),
        AnswerKind::Degree,
    )
    .separated()
}

/// Degrees two scales share, in the first scale's order.
pub(crate) fn similarities(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let (a, b) = rng.choose_two_distinct(&tables.scales);
    let common: Vec<&str> = a
        .degrees
        .iter()
        .filter(|d| b.degrees.contains(*d))
        .map(String::as_str)
        .collect();
    let prompt = format!("Which degrees do {} and {} have in common?", a.name, b.name);
    if common.is_empty() {
        Question::new(
            Topic::ScaleSimilarities,
            prompt,
            Answers::Tokens(vec!["(none)".to_string()]),
            AnswerKind::Degree,
        )
    } else {
        Question::new(
            Topic::ScaleSimilarities,
            prompt,
            Answers::Tokens(strings(&common)),
            AnswerKind::Degree,
        )
        .separated()
    }
}
