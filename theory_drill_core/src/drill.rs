// The `Drill` service: theory tables, the random source and the current
// topic weights, owned together and passed explicitly to whoever needs to
// generate questions. There is no global state; two `Drill`s with the same
// tables, seed and weights produce the same question stream.
//
// See also: `session.rs`, which drives a `Drill` through a quiz, and
// `recommend.rs` for how weights are computed.

use theory_drill_prng::DrillRng;

use crate::generate;
use crate::question::Question;
use crate::recommend::{TopicWeights, weighted_pick};
use crate::tables::TheoryTables;
use crate::topic::Topic;

/// How a session chooses the topic of each question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicSelection {
    Fixed(Topic),
    /// Every question's topic is drawn by weight.
    Weighted,
}

pub struct Drill {
    tables: TheoryTables,
    rng: DrillRng,
    weights: TopicWeights,
}

impl Drill {
    pub fn new(tables: TheoryTables, rng: DrillRng) -> Self {
        Self {
            tables,
            rng,
            weights: TopicWeights::new(),
        }
    }

    pub fn with_weights(mut self, weights: TopicWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn tables(&self) -> &TheoryTables {
        &self.tables
    }

    pub fn weights(&self) -> &TopicWeights {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: TopicWeights) {
        self.weights = weights;
    }

    pub fn generate(&mut self, topic: Topic) -> Question {
        generate::generate(&self.tables, &mut self.rng, topic)
    }

    /// Generate by display names; unknown names yield the placeholder.
    pub fn generate_named(&mut self, category: &str, subcategory: &str) -> Question {
        generate::generate_named(&self.tables, &mut self.rng, category, subcategory)
    }

    pub fn pick_topic(&mut self) -> Topic {
        weighted_pick(&self.weights, &mut self.rng)
    }

    pub fn next_question(&mut self, selection: TopicSelection) -> Question {
        let topic = match selection {
            TopicSelection::Fixed(topic) => topic,
            TopicSelection::Weighted => self.pick_topic(),
        };
        self.generate(topic)
    }
}
