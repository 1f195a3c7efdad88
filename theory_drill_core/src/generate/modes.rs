// Modes: alterations relative to major, characteristic tensions, and the
// diatonic seventh chords in degree or pitch form.

use theory_drill_prng::DrillRng;

use super::{chord_spellings, random_pitch, random_position, strings};
use crate::degree::{degree_pitch, ordinal, split_degree_prefix};
use crate::question::{AnswerKind, Answers, Question};
use crate::tables::{ModeEntry, TheoryTables};
use crate::topic::Topic;

/// Ionian has no alterations, so only altered modes are asked.
pub(crate) fn alterations(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let altered: Vec<&ModeEntry> = tables
        .modes
        .iter()
        .filter(|m| !m.alterations.is_empty())
        .collect();
    let mode = *rng.choose(&altered);
    Question::new(
        Topic::ModeAlterations,
        format!("Which degrees of {} differ from major?", mode.name),
        Answers::Tokens(mode.alterations.clone()),
        AnswerKind::Degree,
    )
    .separated()
}

pub(crate) fn tensions(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let mode = rng.choose(&tables.modes);
    Question::new(
        Topic::ModeTensions,
        format!("What are the characteristic tensions of {}?", mode.name),
        Answers::Tokens(strings(&mode.tensions)),
        AnswerKind::Tension,
    )
    .separated()
}

pub(crate) fn chords_by_degree(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let mode = rng.choose(&tables.modes);
    let n = random_position(rng);
    Question::new(
        Topic::ModeChordsByDegree,
        format!("What is the {} seventh chord of {}, in degrees?", ordinal(n), mode.name),
        Answers::Tokens(vec![mode.seventh_chords[n - 1].clone()]),
        AnswerKind::Degree,
    )
}

pub(crate) fn chords_in_key(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let key = random_pitch(rng);
    let mode = rng.choose(&tables.modes);
    let n = random_position(rng);
    let answers = match split_degree_prefix(&mode.seventh_chords[n - 1]) {
        Some((degree, quality)) => chord_spellings(degree_pitch(key, &degree), &quality),
        None => vec![mode.seventh_chords[n - 1].clone()],
    };
    Question::new(
        Topic::ModeChordsInKey,
        format!("What is the {} seventh chord of {key} {}?", ordinal(n), mode.name),
        Answers::Tokens(answers),
        AnswerKind::Chord,
    )
}
