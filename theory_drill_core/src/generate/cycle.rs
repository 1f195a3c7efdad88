// Cycle of fifths: stepping a fifth, counting fifths from C, and spelling
// II-V-I progressions.

use theory_drill_prng::DrillRng;

use super::{chord_spellings, random_degree, random_pitch};
use crate::degree::{degree_pitch, split_degree_prefix};
use crate::interval::{Interval, tension_to_semitones};
use crate::pitch::PitchClass;
use crate::question::{AnswerKind, Answers, Question};
use crate::tables::TheoryTables;
use crate::topic::Topic;

/// A perfect fifth in semitones.
const FIFTH: i32 = 7;

/// The II-V-I progression in degree form.
const TWO_FIVE_ONE: [&str; 3] = ["IIm7", "V7", "Imaj7"];

pub(crate) fn fifth_down(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let pitch = random_pitch(rng);
    Question::new(
        Topic::FifthDown,
        format!("What is a perfect 5th below {pitch}?"),
        super::pitch_answers(pitch.transpose(-FIFTH)),
        AnswerKind::Pitch,
    )
}

pub(crate) fn fifth_up(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let pitch = random_pitch(rng);
    Question::new(
        Topic::FifthUp,
        format!("What is a perfect 5th above {pitch}?"),
        super::pitch_answers(pitch.transpose(FIFTH)),
        AnswerKind::Pitch,
    )
}

/// How many fifths up from C reach a target given as a degree, an interval
/// or a tension (all measured from C).
pub(crate) fn fifths_count(tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let (shown, target) = match rng.range_usize(0, 3) {
        0 => {
            let degree = random_degree(rng);
            (format!("the degree {degree}"), degree_pitch(PitchClass::C, degree))
        }
        1 => {
            let text = rng.choose(&tables.r_count_intervals);
            let target = Interval::parse(text)
                .map(|i| i.above(PitchClass::C))
                .unwrap_or(PitchClass::C);
            (format!("the interval {text}"), target)
        }
        _ => {
            let tension = rng.choose(&tables.tensions);
            (
                format!("the tension {tension}"),
                PitchClass::C.transpose(tension_to_semitones(tension)),
            )
        }
    };
    Question::new(
        Topic::FifthsCount,
        format!("Counting fifths up from C (r), how many r reach {shown}?"),
        Answers::Tokens(vec![target.cycle_of_fifths_position().to_string()]),
        AnswerKind::Number,
    )
}

/// One answer group per chord; any root spelling is accepted.
pub(crate) fn two_five_one(_tables: &TheoryTables, rng: &mut DrillRng) -> Question {
    let key = random_pitch(rng);
    let groups = TWO_FIVE_ONE
        .iter()
        .filter_map(|symbol| split_degree_prefix(symbol))
        .map(|(degree, quality)| chord_spellings(degree_pitch(key, &degree), &quality))
        .collect();
    Question::new(
        Topic::TwoFiveOne,
        format!("Spell the II-V-I in {key} (e.g. Dm7, G7, Cmaj7)."),
        Answers::Groups(groups),
        AnswerKind::Chord,
    )
    .separated()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::grade;
    use crate::tables::default_tables;

    #[test]
    fn fifths_are_inverse() {
        let tables = default_tables();
        let mut rng = DrillRng::new(40);
        for _ in 0..50 {
            let q = fifth_up(&tables, &mut rng);
            let shown = q.prompt.trim_end_matches('?').rsplit(' ').next().unwrap();
            let shown = PitchClass::parse(shown).unwrap();
            let up = PitchClass::parse(q.answers.tokens()[0]).unwrap();
            assert_eq!(up.transpose(-FIFTH), shown);
        }
    }

    #[test]
    fn fifths_count_matches_circle_position() {
        let tables = default_tables();
        let mut rng = DrillRng::new(41);
        for _ in 0..300 {
            let q = fifths_count(&tables, &mut rng);
            match q.prompt.trim_end_matches('?').rsplit(' ').next().unwrap() {
                "V" | "P5" => assert!(grade(&q, "1")),
                "bVI" | "m6" | "b13" => assert!(grade(&q, "8")),
                "+11" | "#11" => assert!(grade(&q, "6")),
                "9" => assert!(grade(&q, "2")),
                _ => {}
            }
        }
    }

    #[test]
    fn two_five_one_in_c_sharp() {
        let tables = default_tables();
        let mut rng = DrillRng::new(42);
        for _ in 0..200 {
            let q = two_five_one(&tables, &mut rng);
            if q.prompt.starts_with("Spell the II-V-I in Db ") {
                assert!(grade(&q, "Ebm7, Ab7, Dbmaj7"));
                assert!(grade(&q, "D#m7, G#7, C#maj7"));
                assert!(!grade(&q, "Ebm7, Ab7"));
                assert!(!grade(&q, "Ebm7, Ab7, Dbm7"));
                return;
            }
        }
        panic!("never drew Db");
    }
}
