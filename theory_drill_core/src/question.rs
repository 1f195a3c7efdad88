// The `Question` value passed from the generators to the grader.
//
// A question is created fresh per draw and never mutated. It carries its
// own answer key plus the three facts the grader needs: how the answer is
// tokenized (`separator`), how tokens are compared (`CompareMode`, inferred
// from the answer shape and kind), and whether enharmonic respellings count
// as the same answer (`Spelling`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::topic::Topic;

/// Input affordance; also selects the default spelling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKind {
    Pitch,
    Degree,
    Number,
    Interval,
    Solfege,
    Tension,
    Chord,
    Text,
}

/// The accepted answers: a flat token list, or one group of alternatives
/// per required part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answers {
    Tokens(Vec<String>),
    Groups(Vec<Vec<String>>),
}

impl Answers {
    /// Non-empty, and for groups every group is non-empty.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Answers::Tokens(tokens) => !tokens.is_empty(),
            Answers::Groups(groups) => !groups.is_empty() && groups.iter().all(|g| !g.is_empty()),
        }
    }

    /// Every accepted token, flattened.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Answers::Tokens(tokens) => tokens.iter().map(String::as_str).collect(),
            Answers::Groups(groups) => groups.iter().flatten().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for Answers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answers::Tokens(tokens) => f.write_str(&tokens.join(", ")),
            Answers::Groups(groups) => {
                let parts: Vec<String> = groups.iter().map(|g| g.join(" | ")).collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

/// How the user's tokens are compared with the answer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareMode {
    /// The whole input equals any one accepted answer.
    Single,
    /// The token set hits every answer group.
    Multi,
    /// The token set equals the answer set.
    All,
    /// The pitch-class set of the tokens equals that of the answers.
    AllIndices,
}

/// Whether differently spelled but enharmonically equal tokens match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    Enharmonic,
    Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub category: String,
    pub subcategory: String,
    pub prompt: String,
    pub answers: Answers,
    pub kind: AnswerKind,
    pub separator: Option<char>,
    pub spelling: Spelling,
}

impl Question {
    pub fn new(topic: Topic, prompt: impl Into<String>, answers: Answers, kind: AnswerKind) -> Self {
        Question::named(topic.category().name(), topic.subcategory(), prompt, answers, kind)
    }

    /// Build a question for an arbitrary category/subcategory pair.
    pub fn named(
        category: &str,
        subcategory: &str,
        prompt: impl Into<String>,
        answers: Answers,
        kind: AnswerKind,
    ) -> Self {
        let spelling = match kind {
            AnswerKind::Pitch | AnswerKind::Degree | AnswerKind::Chord => Spelling::Enharmonic,
            _ => Spelling::Literal,
        };
        Question {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            prompt: prompt.into(),
            answers,
            kind,
            separator: None,
            spelling,
        }
    }

    /// Answers are comma-separated tokens.
    pub fn separated(mut self) -> Self {
        self.separator = Some(',');
        self
    }

    /// Compare spellings literally, for questions about enharmonic identity
    /// where the shown token itself must not count as an answer.
    pub fn literal(mut self) -> Self {
        self.spelling = Spelling::Literal;
        self
    }

    pub fn topic(&self) -> Option<Topic> {
        Topic::from_names(&self.category, &self.subcategory)
    }

    /// Comparison mode, inferred from the answer shape and kind.
    pub fn mode(&self) -> CompareMode {
        match (&self.answers, self.separator, self.kind) {
            (Answers::Groups(_), _, _) => CompareMode::Multi,
            (Answers::Tokens(_), Some(_), AnswerKind::Pitch) => CompareMode::AllIndices,
            (Answers::Tokens(_), Some(_), _) => CompareMode::All,
            (Answers::Tokens(_), None, _) => CompareMode::Single,
        }
    }
}
