// Intervals: alternative interval spellings, and tracking an interval from a
// root pitch.

use theory_drill_prng::DrillRng;

use super::enharmonics::split_group;
use super::{pitch_answers, random_pitch};
use crate::interval::{Interval, Quality, is_perfect_type};
use crate::question::{AnswerKind, Answers, Question};
use crate::tables::TheoryTables;
use crate::topic::Topic;

/// Largest interval number asked when tracking; up to a 14th.
const MAX_NUMBER: u32 = 14;

pub(crate) fn alternatives(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let (shown, others) = split_group(rng, &tables.enharmonic_interval_groups);
    Question::new(
        Topic::IntervalAlternatives,
        format!("What are the alternative names for the interval {shown}?"),
        Answers::Tokens(others),
        AnswerKind::Interval,
    )
    .separated()
}

/// A random conventional interval: `P`/`+`/`-` on perfect-type numbers,
/// `m`/`M`/`+`/`-` on the rest.
pub(crate) fn random_interval(rng: &mut DrillRng) -> Interval {
    let number = rng.range_u64(1, MAX_NUMBER as u64 + 1) as u32;
    let qualities: &[Quality] = if is_perfect_type(number) {
        &[Quality::Perfect, Quality::Augmented, Quality::Diminished]
    } else {
        &[Quality::Minor, Quality::Major, Quality::Augmented, Quality::Diminished]
    };
    Interval::new(*rng.choose(qualities), number)
}

pub(crate) fn tracking(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let root = random_pitch(rng);
    let interval = random_interval(rng);
    Question::new(
        Topic::IntervalTracking,
        format!("Which pitch is a {interval} above {root}?"),
        pitch_answers(interval.above(root)),
        AnswerKind::Pitch,
    )
}
