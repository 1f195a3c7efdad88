// Practice history and topic weight storage.
//
// Two small repository traits keep the engine independent of where data
// lives. `MemoryStore` backs tests and throwaway runs; `JsonFileStore`
// keeps one JSON document on disk:
//
//     { "history": [PracticeRecord...], "weights": [WeightRow...] }
//
// Every write rewrites the whole document to `<path>.tmp` and renames it
// over the original, so a crash mid-write leaves the previous file intact.
// A missing file reads as empty.
//
// Weight rows are read leniently: a row naming an unknown topic is skipped
// with a warning, and negative weights read as 0. History rows must parse.
//
// See also: `recommend.rs` for `PracticeRecord` and `TopicWeights`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::recommend::{PracticeRecord, TopicWeights};
use crate::topic::Topic;

pub trait HistoryRepository {
    fn append(&mut self, record: PracticeRecord) -> Result<()>;

    /// Every record for `user`, oldest first.
    fn load_all(&self, user: &str) -> Result<Vec<PracticeRecord>>;
}

pub trait WeightRepository {
    fn load_weights(&self) -> Result<TopicWeights>;

    fn upsert(
        &mut self,
        topic: Topic,
        weight: f64,
        updated_by: &str,
        now: DateTime<Utc>,
    ) -> Result<()>;
}

/// Persist every recommended weight, attributed to `updated_by`.
pub fn apply_recommendation(
    store: &mut impl WeightRepository,
    weights: &BTreeMap<Topic, f64>,
    updated_by: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    for (&topic, &weight) in weights {
        store.upsert(topic, weight, updated_by, now)?;
    }
    debug!(count = weights.len(), updated_by, "applied recommended weights");
    Ok(())
}

/// One stored weight. `topic` stays a string so rows for topics this
/// build does not know survive a rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRow {
    pub topic: String,
    pub weight: f64,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    history: Vec<PracticeRecord>,
    #[serde(default)]
    weights: Vec<WeightRow>,
}

impl StoreDocument {
    fn history_for(&self, user: &str) -> Vec<PracticeRecord> {
        self.history.iter().filter(|r| r.user == user).cloned().collect()
    }

    fn weights(&self) -> TopicWeights {
        let mut weights = TopicWeights::new();
        for row in &self.weights {
            match Topic::parse_key(&row.topic) {
                Ok(topic) => weights.set(topic, row.weight),
                Err(_) => warn!(topic = %row.topic, "ignoring weight for unknown topic"),
            }
        }
        weights
    }

    fn upsert(&mut self, topic: Topic, weight: f64, updated_by: &str, now: DateTime<Utc>) {
        let key = topic.key();
        let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        let row = WeightRow {
            topic: key.clone(),
            weight,
            updated_by: updated_by.to_string(),
            updated_at: now,
        };
        match self.weights.iter_mut().find(|r| r.topic == key) {
            Some(existing) => *existing = row,
            None => self.weights.push(row),
        }
    }

    fn weight_row(&self, topic: Topic) -> Option<&WeightRow> {
        let key = topic.key();
        self.weights.iter().find(|r| r.topic == key)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    doc: StoreDocument,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight_row(&self, topic: Topic) -> Option<&WeightRow> {
        self.doc.weight_row(topic)
    }
}

impl HistoryRepository for MemoryStore {
    fn append(&mut self, record: PracticeRecord) -> Result<()> {
        self.doc.history.push(record);
        Ok(())
    }

    fn load_all(&self, user: &str) -> Result<Vec<PracticeRecord>> {
        Ok(self.doc.history_for(user))
    }
}

impl WeightRepository for MemoryStore {
    fn load_weights(&self) -> Result<TopicWeights> {
        Ok(self.doc.weights())
    }

    fn upsert(
        &mut self,
        topic: Topic,
        weight: f64,
        updated_by: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.doc.upsert(topic, weight, updated_by, now);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// The whole document is read on open and held in memory; every mutation
/// writes it back.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = if path.exists() {
            let json = fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            debug!(path = %path.display(), "store file missing; starting empty");
            StoreDocument::default()
        };
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn weight_row(&self, topic: Topic) -> Option<&WeightRow> {
        self.doc.weight_row(topic)
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.doc)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HistoryRepository for JsonFileStore {
    fn append(&mut self, record: PracticeRecord) -> Result<()> {
        self.doc.history.push(record);
        self.save()
    }

    fn load_all(&self, user: &str) -> Result<Vec<PracticeRecord>> {
        Ok(self.doc.history_for(user))
    }
}

impl WeightRepository for JsonFileStore {
    fn load_weights(&self) -> Result<TopicWeights> {
        Ok(self.doc.weights())
    }

    fn upsert(
        &mut self,
        topic: Topic,
        weight: f64,
        updated_by: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.doc.upsert(topic, weight, updated_by, now);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DrillError;
    use crate::recommend::DEFAULT_WEIGHT;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn record(user: &str, topic: Topic, is_correct: bool) -> PracticeRecord {
        PracticeRecord {
            user: user.to_string(),
            topic,
            timestamp: now(),
            is_correct,
            is_retry: false,
        }
    }

    #[test]
    fn memory_store_filters_history_by_user() {
        let mut store = MemoryStore::new();
        store.append(record("ana", Topic::Solfege, true)).unwrap();
        store.append(record("ben", Topic::Solfege, false)).unwrap();
        store.append(record("ana", Topic::FifthUp, false)).unwrap();
        let ana = store.load_all("ana").unwrap();
        assert_eq!(ana.len(), 2);
        assert_eq!(ana[1].topic, Topic::FifthUp);
        assert!(store.load_all("nobody").unwrap().is_empty());
    }

    #[test]
    fn upsert_replaces_and_clamps() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load_weights().unwrap().get(Topic::PivotChords), DEFAULT_WEIGHT);
        store.upsert(Topic::PivotChords, 3.5, "ana", now()).unwrap();
        store.upsert(Topic::PivotChords, -2.0, "owner", now()).unwrap();
        let row = store.weight_row(Topic::PivotChords).unwrap();
        assert_eq!(row.weight, 0.0);
        assert_eq!(row.updated_by, "owner");
        assert_eq!(store.load_weights().unwrap().get(Topic::PivotChords), 0.0);
    }

    #[test]
    fn apply_recommendation_writes_every_topic() {
        let mut store = MemoryStore::new();
        let weights: BTreeMap<Topic, f64> = Topic::ALL.iter().map(|&t| (t, 2.0)).collect();
        apply_recommendation(&mut store, &weights, "recommender", now()).unwrap();
        let loaded = store.load_weights().unwrap();
        assert!(loaded.iter().all(|(_, w)| w == 2.0));
        assert_eq!(
            store.weight_row(Topic::Solfege).unwrap().updated_by,
            "recommender"
        );
    }

    #[test]
    fn json_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.append(record("ana", Topic::TritonePitch, true)).unwrap();
            store.upsert(Topic::TritonePitch, 0.5, "ana", now()).unwrap();
        }
        assert!(!dir.path().join("store.tmp").exists());

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.load_all("ana").unwrap(), vec![record("ana", Topic::TritonePitch, true)]);
        assert_eq!(store.load_weights().unwrap().get(Topic::TritonePitch), 0.5);
        assert_eq!(store.weight_row(Topic::TritonePitch).unwrap().updated_at, now());
    }

    #[test]
    fn json_store_reads_leniently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(
            &path,
            r#"{
                "weights": [
                    { "topic": "Modes/Bebop", "weight": 4.0, "updated_by": "x",
                      "updated_at": "2024-01-01T00:00:00Z" },
                    { "topic": "Tritones/Pitch", "weight": -1.0, "updated_by": "x",
                      "updated_at": "2024-01-01T00:00:00Z" }
                ]
            }"#,
        )
        .unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        let weights = store.load_weights().unwrap();
        assert_eq!(weights.get(Topic::TritonePitch), 0.0);
        assert_eq!(weights.get(Topic::ModeTensions), DEFAULT_WEIGHT);
        assert!(store.load_all("ana").unwrap().is_empty());
    }

    #[test]
    fn unknown_topic_rows_survive_a_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(
            &path,
            r#"{ "weights": [ { "topic": "Modes/Bebop", "weight": 4.0, "updated_by": "x",
                                "updated_at": "2024-01-01T00:00:00Z" } ] }"#,
        )
        .unwrap();
        let mut store = JsonFileStore::open(&path).unwrap();
        store.upsert(Topic::Solfege, 1.5, "ana", now()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Modes/Bebop"));
    }

    #[test]
    fn missing_file_is_empty_but_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("none.json")).unwrap();
        assert!(store.load_all("ana").unwrap().is_empty());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "not json").unwrap();
        assert!(matches!(JsonFileStore::open(&bad), Err(DrillError::Json(_))));
    }
}
