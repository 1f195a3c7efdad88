// Question generation: one pure rule per topic.
//
// Every rule has the signature `fn(&TheoryTables, &mut DrillRng) -> Question`
// and derives its answer key only from the arithmetic modules and the
// tables, never from another rule's output, so each can be tested on its
// own. Where several spellings are correct the rule returns all of them and
// leaves "any one" vs "all of" to the grader.
//
// Submodules group rules by category:
// - enharmonics.rs: degree pairs, scale-number and interval groups
// - warmup.rs: counting keys, finding degrees, chord tones, key signatures, solfège
// - intervals.rs: alternative spellings, interval tracking from a root
// - chords.rs: chord-form relationships, degree chords, 9ths, rootless voicings
// - cycle.rs: fifths up/down, fifth counting, 2-5-1
// - locations.rs: degree ↔ pitch in a key
// - tritones.rs: tritone pitch/degree/substitution
// - modes.rs, minor.rs: modal and minor-scale harmony
// - mastery.rs: functions, scale degrees/pitches, chord-scales, pivots, similarities

mod chords;
mod cycle;
mod enharmonics;
mod intervals;
mod locations;
mod mastery;
mod minor;
mod modes;
mod tritones;
mod warmup;

use theory_drill_prng::DrillRng;
use tracing::{debug, warn};

use crate::degree::{DEGREES, semitone_to_degrees};
use crate::pitch::PitchClass;
use crate::question::{AnswerKind, Answers, Question};
use crate::tables::TheoryTables;
use crate::topic::Topic;

/// A question-generation rule.
pub type GeneratorFn = fn(&TheoryTables, &mut DrillRng) -> Question;

/// The rule for a topic. Exhaustive: every topic has exactly one.
pub fn generator_for(topic: Topic) -> GeneratorFn {
    match topic {
        Topic::EnharmonicDegrees => enharmonics::degrees,
        Topic::EnharmonicNumbers => enharmonics::numbers,
        Topic::EnharmonicNaturalForm => enharmonics::natural_form,
        Topic::CountingKeys => warmup::counting_keys,
        Topic::FindingDegrees => warmup::finding_degrees,
        Topic::ChordTones => warmup::chord_tones,
        Topic::KeySignatures => warmup::key_signatures,
        Topic::Solfege => warmup::solfege,
        Topic::IntervalAlternatives => intervals::alternatives,
        Topic::IntervalTracking => intervals::tracking,
        Topic::ChordRelationships => chords::relationships,
        Topic::ChordExtractDegree => chords::extract_degree,
        Topic::NinthChord => chords::ninth,
        Topic::RootlessVoicing => chords::rootless,
        Topic::FifthDown => cycle::fifth_down,
        Topic::FifthUp => cycle::fifth_up,
        Topic::FifthsCount => cycle::fifths_count,
        Topic::TwoFiveOne => cycle::two_five_one,
        Topic::DegreeToPitch => locations::degree_to_pitch,
        Topic::PitchToDegree => locations::pitch_to_degree,
        Topic::TritonePitch => tritones::pitch,
        Topic::TritoneDegree => tritones::degree,
        Topic::TritoneDominant => tritones::dominant,
        Topic::TritoneDiminished => tritones::diminished,
        Topic::ModeAlterations => modes::alterations,
        Topic::ModeTensions => modes::tensions,
        Topic::ModeChordsByDegree => modes::chords_by_degree,
        Topic::ModeChordsInKey => modes::chords_in_key,
        Topic::MinorChords => minor::chords,
        Topic::MinorTensions => minor::tensions,
        Topic::MinorPitch => minor::pitch,
        Topic::HarmonicFunctions => mastery::functions,
        Topic::ScaleDegrees => mastery::degrees,
        Topic::ScalePitches => mastery::pitches,
        Topic::AvailableScales => mastery::available_scales,
        Topic::PivotChords => mastery::pivot,
        Topic::ScaleSimilarities => mastery::similarities,
    }
}

/// Generate a fresh question for `topic`.
pub fn generate(tables: &TheoryTables, rng: &mut DrillRng, topic: Topic) -> Question {
    let question = generator_for(topic)(tables, rng);
    debug!(
        topic = %topic,
        answers = question.answers.tokens().len(),
        "generated question"
    );
    question
}

/// Generate by display names. Unknown pairs get a placeholder question
/// rather than an error.
pub fn generate_named(
    tables: &TheoryTables,
    rng: &mut DrillRng,
    category: &str,
    subcategory: &str,
) -> Question {
    match Topic::from_names(category, subcategory) {
        Some(topic) => generate(tables, rng, topic),
        None => {
            warn!(category, subcategory, "no generator registered; using placeholder");
            placeholder(category, subcategory)
        }
    }
}

/// The degenerate question used for unregistered category/subcategory pairs.
pub fn placeholder(category: &str, subcategory: &str) -> Question {
    Question::named(
        category,
        subcategory,
        format!("Determine the {subcategory}."),
        Answers::Tokens(vec!["C".to_string()]),
        AnswerKind::Text,
    )
}

// ---------------------------------------------------------------------------
// Shared sampling and answer-building helpers
// ---------------------------------------------------------------------------

pub(crate) fn random_pitch(rng: &mut DrillRng) -> PitchClass {
    PitchClass::new(rng.range_usize(0, 12) as i32)
}

pub(crate) fn random_degree(rng: &mut DrillRng) -> &'static str {
    rng.choose(&DEGREES).0
}

/// A number 1..=7 for ordinal questions.
pub(crate) fn random_position(rng: &mut DrillRng) -> usize {
    rng.range_usize(1, 8)
}

pub(crate) fn strings<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}

/// Every common spelling of a pitch class.
pub(crate) fn pitch_answers(pc: PitchClass) -> Answers {
    Answers::Tokens(pc.common_spellings())
}

/// Every degree label for a semitone offset.
pub(crate) fn degree_answers(semitone: i32) -> Answers {
    Answers::Tokens(strings(&semitone_to_degrees(semitone)))
}

/// Every common root spelling of a chord with the given quality.
pub(crate) fn chord_spellings(root: PitchClass, quality: &str) -> Vec<String> {
    root.common_spellings()
        .into_iter()
        .map(|r| format!("{r}{quality}"))
        .collect()
}

/// Chord tones in formula order, canonical spelling.
pub(crate) fn chord_tones(root: PitchClass, offsets: &[u8]) -> Vec<String> {
    offsets
        .iter()
        .map(|&o| root.transpose(o as i32).name().to_string())
        .collect()
}
