use chrono::NaiveDate;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::config::{Computed, Config};
use crate::dates;
use crate::error::StoreError;
use crate::fs::{read_or_create, to_json_pretty, write_atomic};
use crate::models::{FieldValue, Topic, TopicAction};

#[derive(Debug, Clone)]
struct Entry {
    /// Position in file order; replaced topics move to the end.
    seq: u64,
    topic: Topic,
}

/// Topics persisted as a JSON array in `topics.json`, keyed by ID in memory.
///
/// Records that cannot be addressed (no usable `id`, or an earlier record
/// shadowed by a later one with the same `id`) are kept aside as raw JSON
/// and written back unchanged at their place in file order.
pub struct TopicsStore {
    path: PathBuf,
    entries: BTreeMap<i64, Entry>,
    unindexed: Vec<(u64, Value)>,
    next_seq: u64,
    /// Highest ID ever held; allocation continues above it.
    high_water: i64,
}

impl TopicsStore {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.to_path_buf(),
            entries: BTreeMap::new(),
            unindexed: Vec::new(),
            next_seq: 0,
            high_water: 0,
        };

        let content = read_or_create(path, "[]\n")?;
        if content.trim().is_empty() {
            return Ok(store);
        }

        let root: Value = serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))?;
        let Value::Array(records) = root else {
            return Err(StoreError::InvalidFormat {
                path: path.to_path_buf(),
                reason: "expected a list of topics".to_string(),
            });
        };

        let total = records.len();
        let parsed: Vec<Option<Topic>> = records.iter().map(parse_topic).collect();
        let last_index: HashMap<i64, usize> = parsed
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (t.id, i)))
            .collect();

        for (i, (record, topic)) in records.into_iter().zip(parsed).enumerate() {
            match topic {
                Some(topic) if last_index.get(&topic.id) == Some(&i) => store.insert(topic),
                Some(topic) => {
                    log::warn!("Duplicate topic ID {} in {}; keeping the later record", topic.id, path.display());
                    store.high_water = store.high_water.max(topic.id);
                    store.keep_unindexed(record);
                }
                None => {
                    log::warn!("Topic without a usable ID in {} is kept but not editable", path.display());
                    store.keep_unindexed(record);
                }
            }
        }

        log::info!("Loaded {} topics from {}", total, path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Topics in file order.
    #[allow(dead_code)]
    pub fn all_records(&self) -> Vec<&Topic> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| &e.topic).collect()
    }

    pub fn by_id(&self, id: i64) -> Option<&Topic> {
        self.entries.get(&id).map(|e| &e.topic)
    }

    pub fn ids(&self) -> impl DoubleEndedIterator<Item = i64> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One above the highest ID seen since load, so deleted IDs are not
    /// handed out again. 1 for an empty store.
    pub fn next_id(&self) -> i64 {
        self.high_water + 1
    }

    pub fn create(&mut self, topic: Topic) -> Result<(), StoreError> {
        if self.entries.contains_key(&topic.id) {
            log::warn!("Topic with ID {} already exists and is replaced", topic.id);
        }
        self.insert(topic);
        self.save()
    }

    /// Replace a topic. Unknown IDs are logged and ignored (`Ok(false)`).
    pub fn update(&mut self, id: i64, mut topic: Topic) -> Result<bool, StoreError> {
        if !self.entries.contains_key(&id) {
            log::warn!("Topic with ID {} not found.", id);
            return Ok(false);
        }
        topic.id = id;
        self.insert(topic);
        self.save()?;
        Ok(true)
    }

    /// Remove a topic; absent IDs are a no-op (`Ok(false)`).
    pub fn delete(&mut self, id: i64) -> Result<bool, StoreError> {
        if self.entries.remove(&id).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let mut ordered: Vec<(u64, Value)> = self
            .entries
            .values()
            .map(|e| (e.seq, e.topic.to_json()))
            .collect();
        ordered.extend(self.unindexed.iter().cloned());
        ordered.sort_by_key(|(seq, _)| *seq);
        let records: Vec<Value> = ordered.into_iter().map(|(_, v)| v).collect();

        let bytes = to_json_pretty(&records, &self.path)?;
        write_atomic(&self.path, &bytes)?;
        log::info!("Saved {} topics to {}", records.len(), self.path.display());
        Ok(())
    }

    fn insert(&mut self, topic: Topic) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.high_water = self.high_water.max(topic.id);
        self.entries.insert(topic.id, Entry { seq, topic });
    }

    fn keep_unindexed(&mut self, record: Value) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.unindexed.push((seq, record));
    }
}

/// Set computed date fields to `today`: `created_date` only on create,
/// `edit_date` on create and edit. Other fields are left alone.
pub fn apply_computed_fields(topic: &mut Topic, action: TopicAction, today: NaiveDate, config: &Config) {
    let today = dates::format(today);
    for def in &config.columns {
        if def.name == "id" {
            continue;
        }
        let apply = match (def.computed, action) {
            (Some(Computed::CreatedDate), TopicAction::Create) => true,
            (Some(Computed::EditDate), _) => true,
            _ => false,
        };
        if apply {
            topic.set(&def.name, FieldValue::Text(today.clone()));
        }
    }
}

/// A new topic with every configured field empty and computed fields applied.
pub fn new_topic(id: i64, today: NaiveDate, config: &Config) -> Topic {
    let mut topic = Topic::new(id);
    for def in &config.columns {
        if def.name != "id" {
            topic.set(&def.name, FieldValue::empty());
        }
    }
    apply_computed_fields(&mut topic, TopicAction::Create, today, config);
    topic
}

fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_topic(record: &Value) -> Option<Topic> {
    let object = record.as_object()?;
    let id = parse_id(object.get("id")?)?;

    let mut topic = Topic::new(id);
    for (name, value) in object {
        if name == "id" {
            continue;
        }
        let (value, lossy) = FieldValue::from_json(value);
        if lossy {
            log::warn!("Topic {}: field '{}' converted to text", id, name);
        }
        topic.fields.push((name.clone(), value));
    }
    Some(topic)
}
