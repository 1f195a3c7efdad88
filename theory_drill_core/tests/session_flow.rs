// End-to-end quiz flow: a weighted session recorded into a store, a retry
// round over the misses, then recommendation and weight persistence
// feeding back into the next session's topic draw.

use chrono::{DateTime, Duration, Utc};
use theory_drill_core::config::SessionSettings;
use theory_drill_core::recommend::{self, WeightPolicy};
use theory_drill_core::store::{
    HistoryRepository, MemoryStore, WeightRepository, apply_recommendation,
};
use theory_drill_core::{
    Answers, CompareMode, Drill, Question, QuizSession, SessionState, Topic, TopicSelection,
    Verdict, default_tables,
};
use theory_drill_prng::DrillRng;

fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_717_243_200, 0).unwrap()
}

fn right_answer(q: &Question) -> String {
    match (&q.answers, q.mode()) {
        (Answers::Tokens(t), CompareMode::Single) => t[0].clone(),
        (Answers::Tokens(t), _) => t.join(", "),
        (Answers::Groups(g), _) => g.iter().map(|g| g[0].clone()).collect::<Vec<_>>().join(", "),
    }
}

#[test]
fn session_records_misses_and_retry_round_does_not() {
    let mut store = MemoryStore::new();
    let mut drill = Drill::new(default_tables(), DrillRng::new(2024))
        .with_weights(store.load_weights().unwrap());
    let mut session = QuizSession::new("ana", SessionSettings::default());
    session.start(&mut drill, TopicSelection::Weighted, 6);

    // Answer even-numbered questions, give up on odd ones.
    let mut now = start_time();
    while let Some(q) = session.current().cloned() {
        let give_up = session.progress() % 2 == 1;
        loop {
            let answer = if give_up { "???".to_string() } else { right_answer(&q) };
            let attempt = session.submit(&mut drill, &answer, now).unwrap();
            now += Duration::seconds(5);
            if let Some(record) = attempt.record {
                store.append(record).unwrap();
            }
            if !matches!(attempt.verdict, Verdict::Incorrect { .. }) {
                break;
            }
        }
    }

    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(session.score(), 3);
    let history = store.load_all("ana").unwrap();
    assert_eq!(history.len(), 6);
    assert_eq!(history.iter().filter(|r| r.is_correct).count(), 3);
    assert_eq!(session.retry_pool().len(), 3);

    let mut retry = session.retry_session().unwrap();
    let replayed: Vec<Question> = session.retry_pool().to_vec();
    let mut seen = Vec::new();
    while let Some(q) = retry.current().cloned() {
        seen.push(q.clone());
        let attempt = retry.submit(&mut drill, &right_answer(&q), now).unwrap();
        assert_eq!(attempt.verdict, Verdict::Correct);
        assert!(attempt.record.is_none());
    }
    assert_eq!(seen, replayed);
    assert_eq!(retry.state(), SessionState::Finished);
    assert_eq!(store.load_all("ana").unwrap().len(), 6);
}

#[test]
fn recommended_weights_steer_the_next_session() {
    let mut store = MemoryStore::new();
    let now = start_time();
    // Twenty misses on one topic, twenty hits on another.
    for i in 0..20 {
        for (topic, is_correct) in [(Topic::TritoneDominant, false), (Topic::FifthUp, true)] {
            store
                .append(recommend::PracticeRecord {
                    user: "ana".into(),
                    topic,
                    timestamp: now - Duration::hours(i),
                    is_correct,
                    is_retry: false,
                })
                .unwrap();
        }
    }

    let policy = WeightPolicy::default();
    let history = store.load_all("ana").unwrap();
    let weights = recommend::recommend(&history, now, &policy);
    // low-accuracy band plus the wrong-streak boost
    let weak = weights[&Topic::TritoneDominant];
    assert!(weak > policy.base + 2.0 && weak <= policy.ceil);
    assert!(weights[&Topic::FifthUp] < policy.base);
    assert_eq!(weights[&Topic::Solfege], policy.base);

    apply_recommendation(&mut store, &weights, "recommender", now).unwrap();
    let stored = store.load_weights().unwrap();
    assert_eq!(stored.get(Topic::TritoneDominant), weak);

    // Only the failing topic keeps a positive weight.
    let only_weak = Topic::ALL
        .iter()
        .map(|&t| (t, if t == Topic::TritoneDominant { stored.get(t) } else { 0.0 }))
        .collect();
    let mut drill = Drill::new(default_tables(), DrillRng::new(5)).with_weights(only_weak);
    let mut session = QuizSession::new("ana", SessionSettings::default());
    session.start(&mut drill, TopicSelection::Weighted, 4);
    while let Some(q) = session.current().cloned() {
        assert_eq!(q.topic(), Some(Topic::TritoneDominant));
        session.submit(&mut drill, &right_answer(&q), now).unwrap();
    }
    assert_eq!(session.score(), 4);
}

#[test]
fn every_topic_can_be_drilled_start_to_finish() {
    let mut drill = Drill::new(default_tables(), DrillRng::new(77));
    for &topic in Topic::ALL {
        let mut session = QuizSession::new("ana", SessionSettings::default());
        session.start(&mut drill, TopicSelection::Fixed(topic), 3);
        while let Some(q) = session.current().cloned() {
            let attempt = session.submit(&mut drill, &right_answer(&q), start_time()).unwrap();
            assert_eq!(attempt.verdict, Verdict::Correct, "{topic}: {}", q.prompt);
            assert_eq!(attempt.record.unwrap().topic, topic);
        }
        assert_eq!(session.score(), 3, "{topic}");
    }
}
