// Tritones: the pitch or degree a tritone away, the tritone substitute of a
// dominant, and the diminished-seventh tritone partner.

use theory_drill_prng::DrillRng;

use super::{chord_spellings, degree_answers, pitch_answers, random_degree, random_pitch};
use crate::degree::degree_to_semitone;
use crate::question::{AnswerKind, Answers, Question};
use crate::tables::TheoryTables;
use crate::topic::Topic;

const TRITONE: i32 = 6;

pub(crate) fn pitch(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let p = random_pitch(rng);
    Question::new(
        Topic::TritonePitch,
        format!("What pitch is a tritone from {p}?"),
        pitch_answers(p.transpose(TRITONE)),
        AnswerKind::Pitch,
    )
}

pub(crate) fn degree(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let d = random_degree(rng);
    Question::new(
        Topic::TritoneDegree,
        format!("What degree is a tritone from {d}?"),
        degree_answers(degree_to_semitone(d) as i32 + TRITONE),
        AnswerKind::Degree,
    )
}

/// Tritone substitution: `G7` → `Db7`.
pub(crate) fn dominant(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let root = random_pitch(rng);
    Question::new(
        Topic::TritoneDominant,
        format!("What is the tritone substitute of {root}7?"),
        Answers::Tokens(chord_spellings(root.transpose(TRITONE), "7")),
        AnswerKind::Chord,
    )
}

/// A diminished seventh chord repeats every minor third, so the root a
/// tritone away names the same chord.
pub(crate) fn diminished(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let root = random_pitch(rng);
    Question::new(
        Topic::TritoneDiminished,
        format!("{root}dim7 contains which pitch a tritone above its root?"),
        pitch_answers(root.transpose(TRITONE)),
        AnswerKind::Pitch,
    )
}
