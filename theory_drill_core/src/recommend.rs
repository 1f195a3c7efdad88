// Adaptive topic weighting.
//
// Turns practice history into per-topic sampling weights. The pipeline is
// split into pure pieces so each can be tested without storage:
//
// 1. `topic_features()` aggregates non-retry records per topic: solved,
//    accuracy, recent solved/accuracy within a window, trailing wrong
//    streak, and days since last seen. `now` is always passed in.
// 2. `recommend_weight()` maps one topic's features to a weight under a
//    `WeightPolicy`: low-volume guard, accuracy bands, volume confidence,
//    streak urgency, recency nudge, clamp.
// 3. `recommend()` runs both for every topic.
// 4. `weighted_pick()` samples a topic proportionally to stored weights,
//    falling back to uniform when every weight is zero.
//
// Accuracies are percentages (0-100) throughout.
//
// Retry-round attempts are excluded in step 1. They measure remediation of
// questions just missed, not skill, and must not move the weights.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use theory_drill_prng::DrillRng;
use tracing::{debug, warn};

use crate::error::{DrillError, Result};
use crate::topic::{Category, Topic};

/// `last_seen_days` for a topic with no attempts.
pub const NEVER_SEEN_DAYS: u32 = 999;

/// Sampling weight of a topic nobody has set.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One logged attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeRecord {
    pub user: String,
    pub topic: Topic,
    pub timestamp: DateTime<Utc>,
    pub is_correct: bool,
    #[serde(default)]
    pub is_retry: bool,
}

/// Aggregates for one topic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicFeatures {
    pub solved: u32,
    pub correct: u32,
    /// Percent correct over all attempts; 0 when unsolved.
    pub accuracy: f64,
    pub recent_solved: u32,
    pub recent_accuracy: f64,
    pub wrong_streak: u32,
    pub last_seen_days: u32,
}

impl Default for TopicFeatures {
    fn default() -> Self {
        TopicFeatures {
            solved: 0,
            correct: 0,
            accuracy: 0.0,
            recent_solved: 0,
            recent_accuracy: 0.0,
            wrong_streak: 0,
            last_seen_days: NEVER_SEEN_DAYS,
        }
    }
}

impl TopicFeatures {
    /// Recent accuracy when the recent sample is large enough, otherwise
    /// all-time accuracy.
    pub fn effective_accuracy(&self, min_recent: u32) -> f64 {
        if self.recent_solved >= min_recent {
            self.recent_accuracy
        } else {
            self.accuracy
        }
    }

    /// Display ordering score: weak, streaky and stale topics first.
    pub fn priority(&self, min_recent: u32) -> f64 {
        (100.0 - self.effective_accuracy(min_recent))
            + 8.0 * self.wrong_streak as f64
            + 0.2 * self.last_seen_days.min(60) as f64
    }
}

fn percent(correct: u32, solved: u32) -> f64 {
    if solved == 0 {
        0.0
    } else {
        correct as f64 * 100.0 / solved as f64
    }
}

/// Features for every topic (topics without history get the defaults).
/// Retry records are ignored.
pub fn topic_features(
    history: &[PracticeRecord],
    now: DateTime<Utc>,
    window_days: u32,
) -> BTreeMap<Topic, TopicFeatures> {
    let cutoff = now - Duration::days(window_days as i64);
    let mut by_topic: BTreeMap<Topic, Vec<&PracticeRecord>> = BTreeMap::new();
    for record in history.iter().filter(|r| !r.is_retry) {
        by_topic.entry(record.topic).or_default().push(record);
    }

    let mut out: BTreeMap<Topic, TopicFeatures> = Topic::ALL
        .iter()
        .map(|&t| (t, TopicFeatures::default()))
        .collect();
    for (topic, mut records) in by_topic {
        records.sort_by_key(|r| r.timestamp);
        let solved = records.len() as u32;
        let correct = records.iter().filter(|r| r.is_correct).count() as u32;
        let recent: Vec<&&PracticeRecord> =
            records.iter().filter(|r| r.timestamp >= cutoff).collect();
        let recent_solved = recent.len() as u32;
        let recent_correct = recent.iter().filter(|r| r.is_correct).count() as u32;
        let wrong_streak = records.iter().rev().take_while(|r| !r.is_correct).count() as u32;
        let last_seen_days = records
            .last()
            .map(|r| (now - r.timestamp).num_days().max(0) as u32)
            .unwrap_or(NEVER_SEEN_DAYS);
        out.insert(
            topic,
            TopicFeatures {
                solved,
                correct,
                accuracy: percent(correct, solved),
                recent_solved,
                recent_accuracy: percent(recent_correct, recent_solved),
                wrong_streak,
                last_seen_days,
            },
        );
    }
    out
}

/// An accuracy band: accuracies below `below` (and at or above the
/// previous band) get `adjustment`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyBand {
    pub below: f64,
    pub adjustment: f64,
}

/// A threshold tier; the highest `min` not exceeding the value applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub min: u32,
    pub boost: f64,
}

/// Volume-confidence tier: past `min_solved` attempts, weak topics get
/// `weak_boost` and strong ones `strong_adjustment`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeTier {
    pub min_solved: u32,
    pub weak_boost: f64,
    pub strong_adjustment: f64,
}

/// Tunable constants of the weighting heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightPolicy {
    pub base: f64,
    pub floor: f64,
    pub ceil: f64,
    pub window_days: u32,
    /// Below this many attempts the weight stays at `base`.
    pub min_solved: u32,
    /// Recent attempts needed before recent accuracy is trusted.
    pub min_recent: u32,
    /// Ascending by `below`; the first band containing the accuracy applies.
    pub accuracy_bands: Vec<AccuracyBand>,
    /// Applied when the accuracy is above every band.
    pub top_adjustment: f64,
    /// Accuracy below which a topic counts as weak for volume confidence.
    pub weak_below: f64,
    pub volume: Vec<VolumeTier>,
    pub streak: Vec<Tier>,
    pub recency: Vec<Tier>,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        WeightPolicy {
            base: DEFAULT_WEIGHT,
            floor: 0.0,
            ceil: 5.0,
            window_days: 30,
            min_solved: 8,
            min_recent: 5,
            accuracy_bands: vec![
                AccuracyBand { below: 45.0, adjustment: 2.0 },
                AccuracyBand { below: 65.0, adjustment: 1.2 },
                AccuracyBand { below: 80.0, adjustment: 0.5 },
                AccuracyBand { below: 87.0, adjustment: 0.0 },
                AccuracyBand { below: 92.0, adjustment: -0.3 },
            ],
            top_adjustment: -0.6,
            weak_below: 70.0,
            volume: vec![
                VolumeTier { min_solved: 30, weak_boost: 0.15, strong_adjustment: -0.1 },
                VolumeTier { min_solved: 60, weak_boost: 0.3, strong_adjustment: -0.2 },
            ],
            streak: vec![
                Tier { min: 2, boost: 0.25 },
                Tier { min: 3, boost: 0.5 },
                Tier { min: 4, boost: 0.8 },
            ],
            recency: vec![Tier { min: 14, boost: 0.2 }, Tier { min: 30, boost: 0.35 }],
        }
    }
}

impl WeightPolicy {
    /// Reject policies that would break the heuristic's guarantees.
    pub fn validate(&self) -> Result<()> {
        let bad = |reason: &str| Err(DrillError::Config(format!("weight policy: {reason}")));
        if !(self.floor.is_finite() && self.ceil.is_finite() && self.base.is_finite()) {
            return bad("base, floor and ceil must be finite");
        }
        if self.floor < 0.0 {
            return bad("floor must be non-negative");
        }
        if self.floor > self.ceil {
            return bad("floor exceeds ceil");
        }
        if self.base < self.floor || self.base > self.ceil {
            return bad("base outside [floor, ceil]");
        }
        for pair in self.accuracy_bands.windows(2) {
            if pair[0].below >= pair[1].below {
                return bad("accuracy bands must be ascending");
            }
            if pair[0].adjustment < pair[1].adjustment {
                return bad("accuracy adjustments must not increase with accuracy");
            }
        }
        if self
            .accuracy_bands
            .last()
            .is_some_and(|last| last.adjustment < self.top_adjustment)
        {
            return bad("top adjustment exceeds the last band");
        }
        if self.volume.iter().any(|v| v.weak_boost < v.strong_adjustment) {
            return bad("volume tiers must favour weak topics");
        }
        Ok(())
    }

    /// Accuracy-band adjustment: non-increasing in `accuracy`.
    pub fn accuracy_adjustment(&self, accuracy: f64) -> f64 {
        self.accuracy_bands
            .iter()
            .find(|band| accuracy < band.below)
            .map(|band| band.adjustment)
            .unwrap_or(self.top_adjustment)
    }

    fn volume_adjustment(&self, solved: u32, accuracy: f64) -> f64 {
        self.volume
            .iter()
            .filter(|v| solved >= v.min_solved)
            .max_by_key(|v| v.min_solved)
            .map(|v| {
                if accuracy < self.weak_below {
                    v.weak_boost
                } else {
                    v.strong_adjustment
                }
            })
            .unwrap_or(0.0)
    }
}

fn tier_boost(tiers: &[Tier], value: u32) -> f64 {
    tiers
        .iter()
        .filter(|t| value >= t.min)
        .max_by_key(|t| t.min)
        .map(|t| t.boost)
        .unwrap_or(0.0)
}

/// Recommended weight for one topic. Exactly `policy.base` below the
/// low-volume guard; otherwise the full heuristic, clamped.
pub fn recommend_weight(features: &TopicFeatures, policy: &WeightPolicy) -> f64 {
    if features.solved < policy.min_solved {
        return policy.base;
    }
    let accuracy = features.effective_accuracy(policy.min_recent);
    let weight = policy.base
        + policy.accuracy_adjustment(accuracy)
        + policy.volume_adjustment(features.solved, accuracy)
        + tier_boost(&policy.streak, features.wrong_streak)
        + tier_boost(&policy.recency, features.last_seen_days);
    weight.clamp(policy.floor, policy.ceil)
}

/// Recommended weights for every topic.
pub fn recommend(
    history: &[PracticeRecord],
    now: DateTime<Utc>,
    policy: &WeightPolicy,
) -> BTreeMap<Topic, f64> {
    topic_features(history, now, policy.window_days)
        .into_iter()
        .map(|(topic, features)| {
            let weight = recommend_weight(&features, policy);
            debug!(topic = %topic, solved = features.solved, weight, "recommended weight");
            (topic, weight)
        })
        .collect()
}

/// Topics with their features, highest priority first (ties: more recent
/// attempts, then more attempts).
pub fn ranked(
    features: &BTreeMap<Topic, TopicFeatures>,
    policy: &WeightPolicy,
) -> Vec<(Topic, TopicFeatures)> {
    let mut rows: Vec<(Topic, TopicFeatures)> = features.iter().map(|(&t, &f)| (t, f)).collect();
    rows.sort_by(|(_, a), (_, b)| {
        b.priority(policy.min_recent)
            .total_cmp(&a.priority(policy.min_recent))
            .then(b.recent_solved.cmp(&a.recent_solved))
            .then(b.solved.cmp(&a.solved))
    });
    rows
}

/// Per-topic sampling weights. Unset topics weigh `DEFAULT_WEIGHT`;
/// stored weights are never negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicWeights {
    weights: BTreeMap<Topic, f64>,
}

impl TopicWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, topic: Topic) -> f64 {
        self.weights.get(&topic).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// Set a weight. Negative and non-finite values are stored as 0.
    pub fn set(&mut self, topic: Topic, weight: f64) {
        let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        self.weights.insert(topic, weight);
    }

    /// Every topic with its effective weight, in topic order.
    pub fn iter(&self) -> impl Iterator<Item = (Topic, f64)> + '_ {
        Topic::ALL.iter().map(|&t| (t, self.get(t)))
    }
}

impl FromIterator<(Topic, f64)> for TopicWeights {
    fn from_iter<I: IntoIterator<Item = (Topic, f64)>>(iter: I) -> Self {
        let mut weights = TopicWeights::new();
        for (topic, weight) in iter {
            weights.set(topic, weight);
        }
        weights
    }
}

/// Draw a topic with probability proportional to its weight. If no topic
/// has a positive weight, draw uniformly.
pub fn weighted_pick(weights: &TopicWeights, rng: &mut DrillRng) -> Topic {
    let values: Vec<f64> = weights.iter().map(|(_, w)| w).collect();
    match rng.weighted_index(&values) {
        Some(i) => Topic::ALL[i],
        None => {
            warn!("all topic weights are zero; picking uniformly");
            *rng.choose(Topic::ALL)
        }
    }
}

/// Solved/correct counts for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryStats {
    pub category: Category,
    pub solved: u32,
    pub correct: u32,
}

impl CategoryStats {
    pub fn accuracy(&self) -> f64 {
        percent(self.correct, self.solved)
    }
}

/// Totals over a user's history, optionally within a window.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub solved: u32,
    pub correct: u32,
    pub by_category: Vec<CategoryStats>,
}

impl StatsSummary {
    pub fn accuracy(&self) -> f64 {
        percent(self.correct, self.solved)
    }
}

pub fn summarize(
    history: &[PracticeRecord],
    now: DateTime<Utc>,
    window_days: Option<u32>,
) -> StatsSummary {
    let cutoff = window_days.map(|d| now - Duration::days(d as i64));
    let mut by_category: Vec<CategoryStats> = Category::ALL
        .iter()
        .map(|&category| CategoryStats { category, solved: 0, correct: 0 })
        .collect();
    for record in history
        .iter()
        .filter(|r| !r.is_retry)
        .filter(|r| cutoff.is_none_or(|c| r.timestamp >= c))
    {
        if let Some(stats) = by_category
            .iter_mut()
            .find(|s| s.category == record.topic.category())
        {
            stats.solved += 1;
            stats.correct += record.is_correct as u32;
        }
    }
    StatsSummary {
        solved: by_category.iter().map(|s| s.solved).sum(),
        correct: by_category.iter().map(|s| s.correct).sum(),
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn record(topic: Topic, days_ago: i64, is_correct: bool) -> PracticeRecord {
        PracticeRecord {
            user: "ana".to_string(),
            topic,
            timestamp: now() - Duration::days(days_ago),
            is_correct,
            is_retry: false,
        }
    }

    fn features(solved: u32, accuracy: f64) -> TopicFeatures {
        TopicFeatures {
            solved,
            correct: (solved as f64 * accuracy / 100.0) as u32,
            accuracy,
            recent_solved: 0,
            recent_accuracy: 0.0,
            wrong_streak: 0,
            last_seen_days: 0,
        }
    }

    #[test]
    fn features_aggregate_history() {
        let t = Topic::TritonePitch;
        let history = vec![
            record(t, 40, true),
            record(t, 3, true),
            record(t, 2, false),
            record(t, 1, false),
            record(Topic::FifthUp, 0, true),
        ];
        let f = topic_features(&history, now(), 30);
        let tp = f[&t];
        assert_eq!(tp.solved, 4);
        assert_eq!(tp.correct, 2);
        assert_eq!(tp.accuracy, 50.0);
        assert_eq!(tp.recent_solved, 3);
        assert!((tp.recent_accuracy - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(tp.wrong_streak, 2);
        assert_eq!(tp.last_seen_days, 1);

        let unseen = f[&Topic::Solfege];
        assert_eq!(unseen.solved, 0);
        assert_eq!(unseen.wrong_streak, 0);
        assert_eq!(unseen.last_seen_days, NEVER_SEEN_DAYS);
        assert_eq!(f.len(), Topic::ALL.len());
    }

    #[test]
    fn streak_uses_chronological_order_not_input_order() {
        let t = Topic::Solfege;
        let history = vec![record(t, 1, true), record(t, 5, false), record(t, 3, false)];
        assert_eq!(topic_features(&history, now(), 30)[&t].wrong_streak, 0);
    }

    #[test]
    fn retry_records_are_excluded() {
        let t = Topic::ChordTones;
        let mut history: Vec<PracticeRecord> = (0..10).map(|d| record(t, d, true)).collect();
        let before = topic_features(&history, now(), 30)[&t];
        for d in 0..20 {
            let mut r = record(t, d, false);
            r.is_retry = true;
            history.push(r);
        }
        let after = topic_features(&history, now(), 30)[&t];
        assert_eq!(before, after);
        let policy = WeightPolicy::default();
        assert_eq!(
            recommend(&history, now(), &policy)[&t],
            recommend(&history[..10], now(), &policy)[&t]
        );
    }

    #[test]
    fn low_volume_stays_at_base() {
        let policy = WeightPolicy::default();
        for solved in 0..8 {
            let mut f = features(solved, 0.0);
            f.wrong_streak = solved;
            f.last_seen_days = NEVER_SEEN_DAYS;
            assert_eq!(recommend_weight(&f, &policy), policy.base);
        }
    }

    #[test]
    fn weight_is_non_increasing_in_accuracy() {
        let policy = WeightPolicy::default();
        for solved in [8, 30, 60, 200] {
            let mut previous = f64::INFINITY;
            for step in 0..=1000 {
                let accuracy = step as f64 / 10.0;
                let w = recommend_weight(&features(solved, accuracy), &policy);
                assert!(w <= previous, "solved {solved}, accuracy {accuracy}: {w} > {previous}");
                previous = w;
            }
        }
    }

    #[test]
    fn heuristic_matches_band_constants() {
        let policy = WeightPolicy::default();
        let approx = |a: f64, b: f64| (a - b).abs() < 1e-9;
        assert!(approx(recommend_weight(&features(10, 40.0), &policy), 3.0));
        assert!(approx(recommend_weight(&features(10, 83.0), &policy), 1.0));
        assert!(approx(recommend_weight(&features(10, 95.0), &policy), 0.4));
        assert!(approx(recommend_weight(&features(60, 40.0), &policy), 3.3));
        assert!(approx(recommend_weight(&features(35, 95.0), &policy), 0.3));

        let mut streaky = features(10, 83.0);
        streaky.wrong_streak = 3;
        streaky.last_seen_days = 20;
        assert!(approx(recommend_weight(&streaky, &policy), 1.7));
    }

    #[test]
    fn recent_accuracy_needs_enough_samples() {
        let mut f = features(20, 90.0);
        f.recent_solved = 4;
        f.recent_accuracy = 10.0;
        assert_eq!(f.effective_accuracy(5), 90.0);
        f.recent_solved = 5;
        assert_eq!(f.effective_accuracy(5), 10.0);
    }

    #[test]
    fn clamped_to_policy_range() {
        let policy = WeightPolicy { ceil: 2.0, ..WeightPolicy::default() };
        let mut f = features(100, 0.0);
        f.wrong_streak = 10;
        f.last_seen_days = 100;
        assert_eq!(recommend_weight(&f, &policy), 2.0);
        let policy = WeightPolicy { floor: 0.9, ..WeightPolicy::default() };
        assert_eq!(recommend_weight(&features(100, 100.0), &policy), 0.9);
    }

    #[test]
    fn policy_validation() {
        assert!(WeightPolicy::default().validate().is_ok());
        let bad = WeightPolicy { floor: 3.0, ceil: 2.0, ..WeightPolicy::default() };
        assert!(bad.validate().is_err());
        let mut bands = WeightPolicy::default();
        bands.accuracy_bands[1].adjustment = 5.0;
        assert!(bands.validate().is_err());
        let base = WeightPolicy { base: 9.0, ..WeightPolicy::default() };
        assert!(base.validate().is_err());
    }

    #[test]
    fn weighted_pick_follows_weights() {
        let mut weights: TopicWeights = Topic::ALL.iter().map(|&t| (t, 0.0)).collect();
        weights.set(Topic::PivotChords, 2.0);
        let mut rng = DrillRng::new(5);
        for _ in 0..100 {
            assert_eq!(weighted_pick(&weights, &mut rng), Topic::PivotChords);
        }
    }

    #[test]
    fn all_zero_weights_fall_back_to_uniform() {
        let weights: TopicWeights = Topic::ALL.iter().map(|&t| (t, 0.0)).collect();
        let mut rng = DrillRng::new(6);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..2000 {
            seen.insert(weighted_pick(&weights, &mut rng));
        }
        assert_eq!(seen.len(), Topic::ALL.len());
    }

    #[test]
    fn weights_default_and_clamp() {
        let mut weights = TopicWeights::new();
        assert_eq!(weights.get(Topic::Solfege), DEFAULT_WEIGHT);
        weights.set(Topic::Solfege, -3.0);
        assert_eq!(weights.get(Topic::Solfege), 0.0);
        weights.set(Topic::Solfege, f64::NAN);
        assert_eq!(weights.get(Topic::Solfege), 0.0);
        assert_eq!(weights.iter().count(), Topic::ALL.len());
    }

    #[test]
    fn ranking_puts_weak_topics_first() {
        let policy = WeightPolicy::default();
        let mut f = BTreeMap::new();
        f.insert(Topic::Solfege, features(20, 95.0));
        let mut weak = features(20, 30.0);
        weak.wrong_streak = 2;
        f.insert(Topic::PivotChords, weak);
        f.insert(Topic::FifthUp, features(20, 60.0));
        let order: Vec<Topic> = ranked(&f, &policy).into_iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec![Topic::PivotChords, Topic::FifthUp, Topic::Solfege]);
    }

    #[test]
    fn summary_counts_by_category_and_window() {
        let history = vec![
            record(Topic::TritonePitch, 1, true),
            record(Topic::TritoneDegree, 2, false),
            record(Topic::Solfege, 50, true),
        ];
        let all = summarize(&history, now(), None);
        assert_eq!(all.solved, 3);
        assert_eq!(all.correct, 2);
        let tritones = all
            .by_category
            .iter()
            .find(|s| s.category == Category::Tritones)
            .unwrap();
        assert_eq!(tritones.solved, 2);
        assert_eq!(tritones.accuracy(), 50.0);

        let recent = summarize(&history, now(), Some(30));
        assert_eq!(recent.solved, 2);
        assert_eq!(summarize(&[], now(), None).accuracy(), 0.0);
    }
}
