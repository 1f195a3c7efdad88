// Minor: diatonic chords and tensions of the natural, harmonic and melodic
// minor scales, and pitches of their degrees in a key.

use theory_drill_prng::DrillRng;

use super::{pitch_answers, random_pitch, random_position};
use crate::degree::{degree_pitch, ordinal};
use crate::question::{AnswerKind, Answers, Question};
use crate::tables::{MinorScale, Scale, TheoryTables};
use crate::topic::Topic;

/// A minor scale with its degree list. Validation guarantees every minor
/// scale has a `scales` entry; a missing one falls back to the first scale.
fn pick_minor<'a>(tables: &'a TheoryTables, rng: &mut DrillRng) -> (&'a MinorScale, &'a Scale) {
    let minor = rng.choose(&tables.minor_scales);
    let scale = tables.scale(&minor.name).unwrap_or(&tables.scales[0]);
    (minor, scale)
}

/// The diatonic chord on the n-th degree, as degree plus chord form.
pub(crate) fn chords(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let (minor, scale) = pick_minor(tables, rng);
    let n = random_position(rng);
    let chord = format!("{}{}", scale.degrees[n - 1], minor.chord_forms[n - 1]);
    Question::new(
        Topic::MinorChords,
        format!("What is the {} diatonic chord of {}, in degrees?", ordinal(n), minor.name),
        Answers::Tokens(vec![chord]),
        AnswerKind::Degree,
    )
}

pub(crate) fn tensions(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let (minor, scale) = pick_minor(tables, rng);
    let n = random_position(rng);
    Question::new(
        Topic::MinorTensions,
        format!(
            "What are the available tensions on {}{} in {}?",
            scale.degrees[n - 1],
            minor.chord_forms[n - 1],
            minor.name
        ),
        Answers::Tokens(minor.tensions[n - 1].clone()),
        AnswerKind::Tension,
    )
    .separated()
}

pub(crate) fn pitch(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let key = random_pitch(rng);
    let (minor, scale) = pick_minor(tables, rng);
    let degree = rng.choose(&scale.degrees);
    Question::new(
        Topic::MinorPitch,
        format!("In {key} {}, which pitch is {degree}?", minor.name.to_lowercase()),
        pitch_answers(degree_pitch(key, degree)),
        AnswerKind::Pitch,
    )
}
