// Chord forms: shared tones between qualities, degree chords spelled in C,
// ninth chords and rootless voicings.

use theory_drill_prng::DrillRng;

use super::{chord_tones, random_degree, random_pitch};
use crate::degree::degree_to_semitone;
use crate::pitch::PitchClass;
use crate::question::{AnswerKind, Answers, Question};
use crate::tables::{ChordFormula, TheoryTables};
use crate::topic::Topic;

/// A major ninth above the root.
const NINTH: u8 = 14;

/// Two distinct qualities on the same root: which tones besides the root
/// do they share? Answered with the shared tones, or `none`.
pub(crate) fn relationships(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let root = random_pitch(rng);
    let (a, b) = rng.choose_two_distinct(&tables.chord_formulas);
    let shared: Vec<u8> = a
        .offsets
        .iter()
        .copied()
        .filter(|o| *o != 0 && b.offsets.contains(o))
        .collect();
    let prompt = format!(
        "Besides the root, which tones do {root}{} and {root}{} share? (answer 'none' if they share nothing)",
        a.name, b.name
    );
    if shared.is_empty() {
        Question::new(
            Topic::ChordRelationships,
            prompt,
            Answers::Tokens(vec!["none".to_string()]),
            AnswerKind::Text,
        )
    } else {
        Question::new(
            Topic::ChordRelationships,
            prompt,
            Answers::Tokens(chord_tones(root, &shared)),
            AnswerKind::Pitch,
        )
        .separated()
    }
}

pub(crate) fn extract_degree(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let degree = random_degree(rng);
    let formula = rng.choose(&tables.chord_formulas);
    let root = PitchClass::C.transpose(degree_to_semitone(degree) as i32);
    Question::new(
        Topic::ChordExtractDegree,
        format!("In the key of C, spell {degree}{}.", formula.name),
        Answers::Tokens(chord_tones(root, &formula.offsets)),
        AnswerKind::Pitch,
    )
    .separated()
}

pub(crate) fn ninth(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let root = random_pitch(rng);
    let formula = extension_form(tables, rng);
    let mut offsets = formula.offsets.clone();
    offsets.push(NINTH);
    Question::new(
        Topic::NinthChord,
        format!("Spell {root}{} with a 9th added.", formula.name),
        Answers::Tokens(chord_tones(root, &offsets)),
        AnswerKind::Pitch,
    )
    .separated()
}

/// Ninth chord with the root left out.
pub(crate) fn rootless(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let root = random_pitch(rng);
    let formula = extension_form(tables, rng);
    let offsets: Vec<u8> = formula
        .offsets
        .iter()
        .copied()
        .filter(|&o| o != 0)
        .chain([NINTH])
        .collect();
    Question::new(
        Topic::RootlessVoicing,
        format!("Spell the rootless voicing of {root}{}(9).", formula.name),
        Answers::Tokens(chord_tones(root, &offsets)),
        AnswerKind::Pitch,
    )
    .separated()
}

fn extension_form<'a>(tables: &'a TheoryTables, rng: &mut DrillRng) -> &'a ChordFormula {
    let name = rng.choose(&tables.extension_forms);
    tables
        .chord_formula(name)
        .unwrap_or(&tables.chord_formulas[0])
}
