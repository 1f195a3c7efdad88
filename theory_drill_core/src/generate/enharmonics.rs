// Enharmonics: name the other spellings of a degree, scale number or interval.
//
// The shown token is never part of its own answer key, and these questions
// compare literally so the learner cannot echo it back.

use theory_drill_prng::DrillRng;

use super::strings;
use crate::question::{AnswerKind, Answers, Question};
use crate::tables::TheoryTables;
use crate::topic::Topic;

pub(crate) fn degrees(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let [a, b] = rng.choose(&tables.enharmonic_degree_pairs);
    let (shown, answer) = if rng.random_bool(0.5) { (a, b) } else { (b, a) };
    Question::new(
        Topic::EnharmonicDegrees,
        format!("What is the enharmonic spelling of {shown}?"),
        Answers::Tokens(vec![answer.clone()]),
        AnswerKind::Degree,
    )
    .literal()
}

pub(crate) fn numbers(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let (shown, others) = split_group(rng, &tables.enharmonic_number_groups);
    Question::new(
        Topic::EnharmonicNumbers,
        format!("List every enharmonic scale number of {shown}."),
        Answers::Tokens(others),
        AnswerKind::Number,
    )
    .separated()
}

pub(crate) fn natural_form(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let (shown, others) = split_group(rng, &tables.enharmonic_interval_groups);
    Question::new(
        Topic::EnharmonicNaturalForm,
        format!("List every enharmonic interval of {shown}."),
        Answers::Tokens(others),
        AnswerKind::Interval,
    )
    .separated()
}

/// Pick a group, then one member to show. Returns the shown member and the
/// rest of the group in table order.
pub(crate) fn split_group(rng: &mut DrillRng, groups: &[Vec<String>]) -> (String, Vec<String>) {
    let group = rng.choose(groups);
    let shown = rng.range_usize(0, group.len());
    let others = group
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != shown)
        .map(|(_, t)| t.as_str())
        .collect::<Vec<_>>();
    (group[shown].clone(), strings(&others))
}
