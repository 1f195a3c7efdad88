// Theory Drill Engine
//
// A music-theory practice engine: generates randomized questions across 37
// topics (enharmonics, intervals, chord forms, cycle of fifths, modes,
// minor scales, harmonic functions...), grades free-text answers, and
// adapts topic sampling weights to the learner's practice history.
//
// Everything is in 12-TET with pitch classes 0-11 (C = 0). Degrees are
// Roman numerals relative to a tonic, intervals are quality+number
// tokens (`m3`, `P5`, `+4`).
//
// Architecture:
// - normalize.rs: Free-text folding of accidental glyphs and whitespace
// - pitch.rs: Pitch classes, spellings and enharmonic canonicalization
// - degree.rs: Roman-numeral degrees, scale numbers, tensions, ordinals
// - interval.rs: Interval tokens and semitone arithmetic
// - tables.rs: The embedded theory data tables (formulas, scales, modes...)
// - topic.rs: The closed set of categories and topics
// - question.rs: The `Question` value and its comparison/spelling policy
// - generate/: One generator per topic, grouped by category
// - grading.rs: Answer tokenization and the four comparison modes
// - recommend.rs: Practice features, weight recommendation, weighted pick
// - drill.rs: The `Drill` service (tables + RNG + weights)
// - session.rs: Quiz session state machine with retry rounds
// - store.rs: History and weight repositories (memory and JSON file)
// - config.rs: `DrillConfig` loaded from JSON
// - error.rs: `DrillError`
// - main.rs: The `drill` terminal front end
//
// The engine is deterministic given a seed: all randomness flows through
// one `DrillRng` owned by the `Drill`.

pub mod config;
pub mod degree;
pub mod drill;
pub mod error;
pub mod generate;
pub mod grading;
pub mod interval;
pub mod normalize;
pub mod pitch;
pub mod question;
pub mod recommend;
pub mod session;
pub mod store;
pub mod tables;
pub mod topic;

pub use config::DrillConfig;
pub use drill::{Drill, TopicSelection};
pub use error::{DrillError, Result};
pub use question::{AnswerKind, Answers, CompareMode, Question};
pub use session::{Attempt, QuizSession, SessionState, Verdict};
pub use tables::{TheoryTables, default_tables};
pub use topic::{Category, Topic};
