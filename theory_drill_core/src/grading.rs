// Answer grading.
//
// `grade` never fails: input that cannot be parsed is simply a wrong answer.
// Both sides are normalized (glyphs, whitespace), split on the question's
// separator, reduced to a comparison key per token, and then compared with
// the question's `CompareMode`.
//
// Comparison keys are case-insensitive except where case carries meaning:
// interval qualities (`m3` vs `M3`) and the `M` of chord qualities (`CM7` is
// `Cmaj7`, not `Cm7`) are rewritten to case-free words before lowercasing.
// Under `Spelling::Enharmonic` pitch, degree and chord roots are first
// replaced by their canonical spelling, so `C#` matches `Db` and `#IVm7b5`
// matches `bVm7b5`.

use std::collections::BTreeSet;

use tracing::trace;

use crate::degree::{enharmonic_canonical, split_degree_prefix};
use crate::interval::{Interval, Quality};
use crate::normalize::normalize;
use crate::pitch::{PitchClass, split_chord_symbol};
use crate::question::{AnswerKind, Answers, CompareMode, Question, Spelling};

/// Whether `raw` is an accepted answer to `question`.
pub fn grade(question: &Question, raw: &str) -> bool {
    let input = normalize(raw);
    let correct = match question.mode() {
        CompareMode::Single => grade_single(question, &input),
        CompareMode::All => grade_all(question, &input),
        CompareMode::Multi => grade_multi(question, &input),
        CompareMode::AllIndices => grade_all_indices(question, &input),
    };
    trace!(
        prompt = %question.prompt,
        input = %input,
        mode = ?question.mode(),
        correct,
        "graded answer"
    );
    correct
}

fn grade_single(question: &Question, input: &str) -> bool {
    if input.is_empty() {
        return false;
    }
    let key = comparison_key(input, question.kind, question.spelling);
    question
        .answers
        .tokens()
        .into_iter()
        .any(|answer| comparison_key(answer, question.kind, question.spelling) == key)
}

fn grade_all(question: &Question, input: &str) -> bool {
    let user = key_set(question, split_tokens(input, question.separator));
    let expected = key_set(question, question.answers.tokens());
    !user.is_empty() && user == expected
}

/// Every group must be hit. Extra tokens are ignored.
fn grade_multi(question: &Question, input: &str) -> bool {
    let Answers::Groups(groups) = &question.answers else {
        return grade_all(question, input);
    };
    let user = key_set(question, split_tokens(input, question.separator));
    if user.is_empty() {
        return false;
    }
    groups
        .iter()
        .map(|g| key_set(question, g.iter().map(String::as_str)))
        .all(|g| !g.is_disjoint(&user))
}

/// Compare as pitch-class sets. Tokens that are not pitches are dropped.
fn grade_all_indices(question: &Question, input: &str) -> bool {
    let user: BTreeSet<PitchClass> = split_tokens(input, question.separator)
        .into_iter()
        .filter_map(PitchClass::parse)
        .collect();
    let expected: BTreeSet<PitchClass> = question
        .answers
        .tokens()
        .into_iter()
        .filter_map(PitchClass::parse)
        .collect();
    !user.is_empty() && user == expected
}

fn split_tokens(input: &str, separator: Option<char>) -> Vec<&str> {
    match separator {
        Some(sep) => input
            .split(sep)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect(),
        None => {
            let trimmed = input.trim();
            if trimmed.is_empty() { Vec::new() } else { vec![trimmed] }
        }
    }
}

fn key_set<'a>(question: &Question, tokens: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    tokens
        .into_iter()
        .map(|t| comparison_key(t, question.kind, question.spelling))
        .collect()
}

/// The lowercase key a token is compared by.
pub fn comparison_key(token: &str, kind: AnswerKind, spelling: Spelling) -> String {
    let token = token.trim();
    let enharmonic = spelling == Spelling::Enharmonic;
    let key = match kind {
        AnswerKind::Pitch if enharmonic => PitchClass::parse(token)
            .map(|pc| pc.name().to_string())
            .unwrap_or_else(|| token.to_string()),
        AnswerKind::Degree => match split_degree_prefix(token) {
            Some((label, suffix)) => {
                let label = if enharmonic {
                    enharmonic_canonical(&label).map(str::to_string).unwrap_or(label)
                } else {
                    label
                };
                format!("{label}{}", quality_key(&suffix))
            }
            None => token.to_string(),
        },
        AnswerKind::Chord => match split_chord_symbol(token) {
            Some((root, quality)) if enharmonic => {
                format!("{}{}", root.name(), quality_key(&quality))
            }
            _ => token.to_string(),
        },
        AnswerKind::Interval => match Interval::parse(token) {
            Some(interval) => format!("{}{}", quality_word(interval.quality), interval.number),
            None => token.to_string(),
        },
        _ => token.to_string(),
    };
    key.to_lowercase()
}

/// Chord-quality suffix with a bare upper-case `M` spelled out. An `M`
/// already starting `Maj`/`MAJ` is left alone.
fn quality_key(suffix: &str) -> String {
    let mut key = String::with_capacity(suffix.len() + 2);
    for (i, c) in suffix.char_indices() {
        let spelled_out = suffix
            .get(i + 1..i + 3)
            .is_some_and(|rest| rest.eq_ignore_ascii_case("aj"));
        if c == 'M' && !spelled_out {
            key.push_str("maj");
        } else {
            key.push(c);
        }
    }
    key
}

fn quality_word(quality: Quality) -> &'static str {
    match quality {
        Quality::Major => "maj",
        Quality::Minor => "min",
        Quality::Perfect => "perf",
        Quality::Augmented => "aug",
        Quality::Diminished => "dim",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::Topic;

    fn tokens(items: &[&str]) -> Answers {
        Answers::Tokens(items.iter().map(|s| s.to_string()).collect())
    }

    fn groups(items: &[&[&str]]) -> Answers {
        Answers::Groups(
            items
                .iter()
                .map(|g| g.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn single_accepts_enharmonic_spelling() {
        let q = Question::new(Topic::TritonePitch, "q", tokens(&["Db"]), AnswerKind::Pitch);
        assert!(grade(&q, "c#"));
        assert!(grade(&q, "Db"));
        assert!(grade(&q, " D♭ "));
        assert!(!grade(&q, "D"));
        assert!(!grade(&q, ""));
    }

    #[test]
    fn all_requires_exact_set() {
        let q = Question::new(
            Topic::ModeAlterations,
            "q",
            tokens(&["bIII", "bVII"]),
            AnswerKind::Degree,
        )
        .separated();
        assert!(grade(&q, "bVII, bIII"));
        assert!(grade(&q, "biii,bvii"));
        assert!(grade(&q, "#II, #VI"));
        assert!(!grade(&q, "bIII"));
        assert!(!grade(&q, "bIII, bVII, bVI"));
        assert!(!grade(&q, " , "));
    }

    #[test]
    fn multi_needs_every_group_and_ignores_extras() {
        let q = Question::new(
            Topic::ChordRelationships,
            "q",
            groups(&[&["Em6"], &["F#6"]]),
            AnswerKind::Chord,
        )
        .separated();
        assert!(grade(&q, "Em6, F#6"));
        assert!(grade(&q, "Gb6, Em6"));
        assert!(!grade(&q, "Em6"));
        assert!(grade(&q, "em6, f#6, g7"));
        assert!(!grade(&q, "G7, Am"));
    }

    #[test]
    fn all_indices_compares_pitch_classes() {
        let q = Question::new(
            Topic::ChordTones,
            "q",
            tokens(&["C", "E", "G", "B"]),
            AnswerKind::Pitch,
        )
        .separated();
        assert!(grade(&q, "B, G, E, C"));
        assert!(grade(&q, "C, Fb, G, Cb"));
        assert!(grade(&q, "C, E, G, B, C"));
        assert!(!grade(&q, "C, E, G"));
        assert!(!grade(&q, "C, E, G, H"));
        assert!(!grade(&q, ""));
    }

    #[test]
    fn all_indices_skips_tokens_that_are_not_pitches() {
        let q = Question::new(
            Topic::ChordTones,
            "q",
            tokens(&["C", "E", "G", "B"]),
            AnswerKind::Pitch,
        )
        .separated();
        assert!(grade(&q, "c, e, g, b, h"));
        assert!(!grade(&q, "h"));
        assert!(!grade(&q, "h, x"));
    }

    #[test]
    fn literal_spelling_rejects_enharmonic_twin() {
        let q = Question::new(Topic::EnharmonicDegrees, "q", tokens(&["bII"]), AnswerKind::Degree)
            .literal();
        assert!(grade(&q, "bii"));
        assert!(!grade(&q, "#I"));
    }

    #[test]
    fn interval_quality_case_matters() {
        let q = Question::new(
            Topic::IntervalAlternatives,
            "q",
            tokens(&["m3", "m10", "+9"]),
            AnswerKind::Interval,
        )
        .separated()
        .literal();
        assert!(grade(&q, "m3, m10, +9"));
        assert!(grade(&q, "+9 , m10,m3"));
        assert!(!grade(&q, "M3, M10, +9"));
    }

    #[test]
    fn chord_quality_case_matters() {
        let q = Question::new(Topic::TritoneDominant, "q", tokens(&["Cmaj7"]), AnswerKind::Chord);
        assert!(grade(&q, "CM7"));
        assert!(grade(&q, "B#maj7"));
        assert!(grade(&q, "CMaj7"));
        assert!(grade(&q, "CMAJ7"));
        assert!(!grade(&q, "Cm7"));

        let degree_chord =
            Question::new(Topic::MinorChords, "q", tokens(&["ImM7"]), AnswerKind::Degree);
        assert!(grade(&degree_chord, "Immaj7"));
        assert!(!grade(&degree_chord, "Im7"));
    }

    #[test]
    fn degree_chords_accept_enharmonic_roots() {
        let q = Question::new(
            Topic::ModeChordsByDegree,
            "q",
            tokens(&["#IVm7b5"]),
            AnswerKind::Degree,
        );
        assert!(grade(&q, "bVm7b5"));
        assert!(grade(&q, "#ivm7b5"));
        assert!(!grade(&q, "IVm7b5"));
    }

    #[test]
    fn unparseable_input_is_simply_wrong() {
        let q = Question::new(Topic::FifthUp, "q", tokens(&["G"]), AnswerKind::Pitch);
        assert!(!grade(&q, "???"));
        assert!(!grade(&q, "G, D"));
    }
}
