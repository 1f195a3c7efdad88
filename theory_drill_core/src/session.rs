// Quiz session controller.
//
// A small state machine: `Idle` → `Active` → `Finished`. `start()` draws
// the first question. Each `submit()` grades one attempt:
//
// - correct: the attempt is recorded as a success and the session advances;
// - wrong: the miss counter grows; at `max_misses` the question is recorded
//   as a failure, pushed onto the retry pool, and the session advances;
//   below that the learner stays on the same question.
//
// When the advancing index reaches the limit the session is `Finished`.
// A finished session with failed questions can spawn a retry session over
// exactly those questions. Retry sessions record nothing, add nothing to a
// pool and do not score.
//
// The controller never writes storage itself: each attempt hands back an
// optional `PracticeRecord` for the caller to append.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::SessionSettings;
use crate::drill::{Drill, TopicSelection};
use crate::grading::grade;
use crate::question::{Answers, Question};
use crate::recommend::PracticeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Finished,
}

/// Result of grading one attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Correct,
    /// Wrong, but the learner may try the same question again.
    Incorrect { misses_left: u32 },
    /// Wrong for the last time; the accepted answers are revealed.
    GaveUp { answers: Answers },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub verdict: Verdict,
    /// What to append to the history, if anything.
    pub record: Option<PracticeRecord>,
    /// The session finished with this attempt.
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    user: String,
    selection: Option<TopicSelection>,
    settings: SessionSettings,
    state: SessionState,
    is_retry: bool,
    limit: usize,
    index: usize,
    misses: u32,
    score: usize,
    current: Option<Question>,
    /// Questions still to ask in a retry session.
    queue: VecDeque<Question>,
    retry_pool: Vec<Question>,
}

impl QuizSession {
    pub fn new(user: impl Into<String>, settings: SessionSettings) -> Self {
        Self {
            user: user.into(),
            selection: None,
            limit: settings.limit,
            settings,
            state: SessionState::Idle,
            is_retry: false,
            index: 0,
            misses: 0,
            score: 0,
            current: None,
            queue: VecDeque::new(),
            retry_pool: Vec::new(),
        }
    }

    /// Begin a session of `limit` questions. Restarting discards any
    /// previous progress and retry pool.
    pub fn start(&mut self, drill: &mut Drill, selection: TopicSelection, limit: usize) {
        self.selection = Some(selection);
        self.is_retry = false;
        self.limit = limit.max(1);
        self.index = 0;
        self.misses = 0;
        self.score = 0;
        self.queue.clear();
        self.retry_pool.clear();
        self.current = Some(drill.next_question(selection));
        self.state = SessionState::Active;
        info!(user = %self.user, ?selection, limit = self.limit, "quiz started");
    }

    /// A new active session over this session's failed questions, or
    /// `None` if it is not finished or nothing failed.
    pub fn retry_session(&self) -> Option<QuizSession> {
        if self.state != SessionState::Finished || self.retry_pool.is_empty() {
            return None;
        }
        let mut queue: VecDeque<Question> = self.retry_pool.iter().cloned().collect();
        let current = queue.pop_front();
        info!(user = %self.user, questions = self.retry_pool.len(), "retry round started");
        Some(QuizSession {
            user: self.user.clone(),
            selection: self.selection,
            settings: self.settings.clone(),
            state: SessionState::Active,
            is_retry: true,
            limit: self.retry_pool.len(),
            index: 0,
            misses: 0,
            score: 0,
            current,
            queue,
            retry_pool: Vec::new(),
        })
    }

    /// Grade one attempt at the current question. `None` when the session
    /// is not active.
    pub fn submit(&mut self, drill: &mut Drill, answer: &str, now: DateTime<Utc>) -> Option<Attempt> {
        if self.state != SessionState::Active {
            return None;
        }
        let question = self.current.clone()?;
        if grade(&question, answer) {
            let record = self.record(&question, true, now);
            if !self.is_retry {
                self.score += 1;
            }
            let finished = self.advance(drill);
            return Some(Attempt { verdict: Verdict::Correct, record, finished });
        }

        self.misses += 1;
        if self.misses < self.settings.max_misses {
            debug!(misses = self.misses, "wrong answer");
            return Some(Attempt {
                verdict: Verdict::Incorrect {
                    misses_left: self.settings.max_misses - self.misses,
                },
                record: None,
                finished: false,
            });
        }

        let record = self.record(&question, false, now);
        let answers = question.answers.clone();
        if !self.is_retry {
            self.retry_pool.push(question);
        }
        let finished = self.advance(drill);
        Some(Attempt { verdict: Verdict::GaveUp { answers }, record, finished })
    }

    fn record(&self, question: &Question, is_correct: bool, now: DateTime<Utc>) -> Option<PracticeRecord> {
        if self.is_retry {
            return None;
        }
        let topic = question.topic()?;
        Some(PracticeRecord {
            user: self.user.clone(),
            topic,
            timestamp: now,
            is_correct,
            is_retry: false,
        })
    }

    /// Move to the next question. Returns whether the session finished.
    fn advance(&mut self, drill: &mut Drill) -> bool {
        self.index += 1;
        self.misses = 0;
        if self.index >= self.limit {
            self.current = None;
            self.state = SessionState::Finished;
            info!(
                user = %self.user,
                score = self.score,
                limit = self.limit,
                retry = self.is_retry,
                failed = self.retry_pool.len(),
                "quiz finished"
            );
            return true;
        }
        self.current = if self.is_retry {
            self.queue.pop_front()
        } else {
            self.selection.map(|s| drill.next_question(s))
        };
        false
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn is_retry(&self) -> bool {
        self.is_retry
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Zero-based index of the current question.
    pub fn progress(&self) -> usize {
        self.index
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn retry_pool(&self) -> &[Question] {
        &self.retry_pool
    }
}
