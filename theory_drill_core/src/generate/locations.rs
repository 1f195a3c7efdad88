// Locations: degree to pitch and back, in a random key.

use theory_drill_prng::DrillRng;

use super::{degree_answers, pitch_answers, random_degree, random_pitch};
use crate::degree::degree_pitch;
use crate::question::{AnswerKind, Question};
use crate::tables::TheoryTables;
use crate::topic::Topic;

pub(crate) fn degree_to_pitch(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let key = random_pitch(rng);
    let degree = random_degree(rng);
    Question::new(
        Topic::DegreeToPitch,
        format!("Key of {key}: which pitch is {degree}?"),
        pitch_answers(degree_pitch(key, degree)),
        AnswerKind::Pitch,
    )
}

pub(crate) fn pitch_to_degree(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let key = random_pitch(rng);
    let pitch = random_pitch(rng);
    Question::new(
        Topic::PitchToDegree,
        format!("Key of {key}: which degree is {pitch}?"),
        degree_answers(key.semitones_to(pitch) as i32),
        AnswerKind::Degree,
    )
}
