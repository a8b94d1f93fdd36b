//! In-process `DocumentStore`.
//!
//! Holds every collection in one mutex, so a commit's precondition checks
//! and writes happen under a single lock and are atomic with respect to
//! other callers. Used by tests and by the CLI's JSON store files.

use std::collections::BTreeMap;
use std::sync::mpsc;

use parking_lot::Mutex;
use serde_json::Value;
use uuid::Uuid;

use crate::lenient::integer_from_value;
use crate::store::{
    CommitReceipt, DocRef, Document, DocumentStore, Query, SnapshotResult, StoreError,
    Subscription, WriteBatch, WriteOp,
};

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

struct Subscriber {
    query: Query,
    tx: mpsc::Sender<SnapshotResult>,
}

#[derive(Default)]
struct Inner {
    collections: Collections,
    subscribers: Vec<Subscriber>,
    outage: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `{collection: {id: document}}` JSON dump.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        let collections: Collections = serde_json::from_str(input)?;
        Ok(Self {
            inner: Mutex::new(Inner { collections, ..Inner::default() }),
        })
    }

    /// Dump all collections in the format accepted by [`MemoryStore::from_json`].
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let inner = self.inner.lock();
        serde_json::to_string_pretty(&inner.collections)
    }

    /// Insert or replace a document and notify subscribers.
    pub fn insert(&self, collection: &str, id: &str, data: Value) {
        let mut inner = self.inner.lock();
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        notify(&mut inner, &[collection.to_string()]);
    }

    pub fn count(&self, collection: &str) -> usize {
        self.inner.lock().collections.get(collection).map_or(0, BTreeMap::len)
    }

    /// Simulate the backend going away (`Some(reason)`) or coming back
    /// (`None`). Subscribers receive an error or a fresh snapshot.
    pub fn set_outage(&self, reason: Option<String>) {
        let mut inner = self.inner.lock();
        inner.outage = reason;
        let all: Vec<String> = inner.subscribers.iter().map(|s| s.query.collection.clone()).collect();
        notify(&mut inner, &all);
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let inner = self.inner.lock();
        if let Some(reason) = &inner.outage {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        Ok(inner
            .collections
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.lock();
        if let Some(reason) = &inner.outage {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        Ok(run_query(&inner.collections, query))
    }

    fn subscribe(&self, query: Query) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.inner.lock();
        let first = match &inner.outage {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(run_query(&inner.collections, &query)),
        };
        // A fresh channel cannot be disconnected yet.
        let _ = tx.send(first);
        inner.subscribers.push(Subscriber { query, tx });
        Ok(Subscription::new(rx))
    }

    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        let mut inner = self.inner.lock();
        if let Some(reason) = &inner.outage {
            return Err(StoreError::Unavailable(reason.clone()));
        }

        for p in &batch.preconditions {
            let doc = lookup(&inner.collections, &p.collection, &p.id).ok_or_else(|| {
                StoreError::NotFound { collection: p.collection.clone(), id: p.id.clone() }
            })?;
            let actual = doc.get(&p.field).and_then(integer_from_value).unwrap_or(0);
            if actual < p.at_least {
                return Err(StoreError::PreconditionFailed {
                    collection: p.collection.clone(),
                    id: p.id.clone(),
                    field: p.field.clone(),
                    required: p.at_least,
                    actual,
                });
            }
        }

        // Stage every write first; nothing touches `collections` until all
        // ops have validated.
        let mut staged: BTreeMap<(String, String), Value> = BTreeMap::new();
        let mut created = Vec::new();

        for op in batch.ops {
            match op {
                WriteOp::Create { collection, id, data } => {
                    let id = id.unwrap_or_else(|| Uuid::new_v4().simple().to_string());
                    if !data.is_object() {
                        return Err(StoreError::InvalidDocument {
                            collection,
                            id,
                            reason: "document body must be an object".into(),
                        });
                    }
                    let key = (collection.clone(), id.clone());
                    if staged.contains_key(&key) || lookup(&inner.collections, &collection, &id).is_some() {
                        return Err(StoreError::InvalidDocument {
                            collection,
                            id,
                            reason: "document already exists".into(),
                        });
                    }
                    staged.insert(key, data);
                    created.push(DocRef { collection, id });
                }
                WriteOp::Increment { collection, id, field, delta } => {
                    let key = (collection.clone(), id.clone());
                    let mut doc = match staged.get(&key) {
                        Some(v) => v.clone(),
                        None => lookup(&inner.collections, &collection, &id)
                            .cloned()
                            .ok_or_else(|| StoreError::NotFound {
                                collection: collection.clone(),
                                id: id.clone(),
                            })?,
                    };
                    let invalid = |reason: String| StoreError::InvalidDocument {
                        collection: collection.clone(),
                        id: id.clone(),
                        reason,
                    };
                    let body = doc
                        .as_object_mut()
                        .ok_or_else(|| invalid("document body is not an object".into()))?;
                    let current = match body.get(&field) {
                        None | Some(Value::Null) => 0,
                        Some(v) => integer_from_value(v)
                            .ok_or_else(|| invalid(format!("field '{field}' is not numeric")))?,
                    };
                    let next = current
                        .checked_add(delta)
                        .ok_or_else(|| invalid(format!("field '{field}' overflowed")))?;
                    body.insert(field, Value::from(next));
                    staged.insert(key, doc);
                }
            }
        }

        let mut touched: Vec<String> = Vec::new();
        for ((collection, id), data) in staged {
            if !touched.contains(&collection) {
                touched.push(collection.clone());
            }
            inner.collections.entry(collection).or_default().insert(id, data);
        }
        log::debug!("memory store commit: {} created, collections {:?}", created.len(), touched);
        notify(&mut inner, &touched);

        Ok(CommitReceipt { created })
    }
}

fn lookup<'a>(collections: &'a Collections, collection: &str, id: &str) -> Option<&'a Value> {
    collections.get(collection).and_then(|c| c.get(id))
}

fn run_query(collections: &Collections, query: &Query) -> Vec<Document> {
    collections
        .get(&query.collection)
        .map(|docs| {
            docs.iter()
                .filter(|(_, data)| query.matches(data))
                .map(|(id, data)| Document::new(id.clone(), data.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Push the current result set to every subscriber watching a touched
/// collection. Subscribers whose receiver is gone are dropped.
fn notify(inner: &mut Inner, touched: &[String]) {
    let Inner { collections, subscribers, outage } = inner;
    subscribers.retain(|s| {
        if !touched.contains(&s.query.collection) {
            return true;
        }
        let snapshot = match outage {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(run_query(collections, &s.query)),
        };
        s.tx.send(snapshot).is_ok()
    });
}
