//! Document store seam.
//!
//! The backing store is an external service. This module fixes the small
//! surface the rest of the workspace relies on: point reads, filtered
//! collection queries, live subscriptions that push the full result set on
//! every change, and atomic write batches guarded by preconditions.

use std::sync::mpsc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient::integer_from_value;

/// A stored document: its id plus the raw JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self { id: id.into(), data }
    }

    /// Read a numeric field as an integer. Missing or non-numeric is `None`.
    pub fn integer_field(&self, field: &str) -> Option<i64> {
        self.data.get(field).and_then(integer_from_value)
    }
}

/// Parse an exported JSON array of document bodies. The id comes from each
/// body's `id` field; bodies without one are numbered by position.
pub fn documents_from_json(input: &str) -> Result<Vec<Document>, serde_json::Error> {
    let bodies: Vec<Value> = serde_json::from_str(input)?;
    Ok(bodies
        .into_iter()
        .enumerate()
        .map(|(i, data)| {
            let id = match data.get("id") {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => format!("#{i}"),
            };
            Document::new(id, data)
        })
        .collect())
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("precondition failed on {collection}/{id}.{field}: requires at least {required}, found {actual}")]
    PreconditionFailed {
        collection: String,
        id: String,
        field: String,
        required: i64,
        actual: i64,
    },

    #[error("invalid document {collection}/{id}: {reason}")]
    InvalidDocument {
        collection: String,
        id: String,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `data[field] == value`
    Eq { field: String, value: Value },
    /// `data[field]` is an array containing `value`
    ArrayContains { field: String, value: Value },
}

impl Filter {
    pub fn matches(&self, data: &Value) -> bool {
        match self {
            Self::Eq { field, value } => data.get(field) == Some(value),
            Self::ArrayContains { field, value } => data
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        }
    }
}

/// A collection query. All filters must match.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
}

impl Query {
    pub fn collection(name: impl Into<String>) -> Self {
        Self { collection: name.into(), filters: Vec::new() }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq { field: field.into(), value: value.into() });
        self
    }

    pub fn where_array_contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::ArrayContains { field: field.into(), value: value.into() });
        self
    }

    pub fn matches(&self, data: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(data))
    }
}

// ---------------------------------------------------------------------------
// Write batches
// ---------------------------------------------------------------------------

/// Guard evaluated inside the commit: `collection/id.field >= at_least`.
/// A missing field reads as 0; a missing document fails the commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Precondition {
    pub collection: String,
    pub id: String,
    pub field: String,
    pub at_least: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert a new document. `id = None` lets the store assign one.
    Create { collection: String, id: Option<String>, data: Value },
    /// Add `delta` to an integer field of an existing document.
    Increment { collection: String, id: String, field: String, delta: i64 },
}

/// Preconditions and writes applied all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    pub preconditions: Vec<Precondition>,
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_at_least(mut self, collection: &str, id: &str, field: &str, at_least: i64) -> Self {
        self.preconditions.push(Precondition {
            collection: collection.into(),
            id: id.into(),
            field: field.into(),
            at_least,
        });
        self
    }

    pub fn create(mut self, collection: &str, data: Value) -> Self {
        self.ops.push(WriteOp::Create { collection: collection.into(), id: None, data });
        self
    }

    pub fn increment(mut self, collection: &str, id: &str, field: &str, delta: i64) -> Self {
        self.ops.push(WriteOp::Increment {
            collection: collection.into(),
            id: id.into(),
            field: field.into(),
            delta,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Reference to a document created by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocRef {
    pub collection: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitReceipt {
    /// Created documents, in batch order.
    pub created: Vec<DocRef>,
}

impl CommitReceipt {
    /// Id of the first document created in `collection`.
    pub fn created_in(&self, collection: &str) -> Option<&str> {
        self.created
            .iter()
            .find(|r| r.collection == collection)
            .map(|r| r.id.as_str())
    }
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// One pushed snapshot: the full current result set, or the store error
/// that interrupted the feed.
pub type SnapshotResult = Result<Vec<Document>, StoreError>;

/// Receiving end of a live query. Iterating blocks until the next push and
/// ends when the store drops the subscription.
pub struct Subscription {
    rx: mpsc::Receiver<SnapshotResult>,
}

impl Subscription {
    pub fn new(rx: mpsc::Receiver<SnapshotResult>) -> Self {
        Self { rx }
    }

    /// Next snapshot if one is already queued.
    pub fn try_next(&self) -> Option<SnapshotResult> {
        self.rx.try_recv().ok()
    }
}

impl Iterator for Subscription {
    type Item = SnapshotResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.rx.recv().ok()
    }
}

pub trait DocumentStore: Send + Sync {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Start a live query. The current result set is pushed immediately.
    fn subscribe(&self, query: Query) -> Result<Subscription, StoreError>;

    /// Apply a batch atomically. On any error nothing is written.
    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_and_array_contains() {
        let data = json!({"hostId": "h1", "tags": ["wifi", "pool"]});
        assert!(Query::collection("listings").where_eq("hostId", "h1").matches(&data));
        assert!(!Query::collection("listings").where_eq("hostId", "h2").matches(&data));
        assert!(Query::collection("listings").where_array_contains("tags", "pool").matches(&data));
        assert!(!Query::collection("listings").where_array_contains("hostId", "h1").matches(&data));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(Query::collection("x").matches(&json!({})));
    }

    #[test]
    fn receipt_lookup() {
        let receipt = CommitReceipt {
            created: vec![
                DocRef { collection: "a".into(), id: "1".into() },
                DocRef { collection: "b".into(), id: "2".into() },
            ],
        };
        assert_eq!(receipt.created_in("b"), Some("2"));
        assert_eq!(receipt.created_in("c"), None);
    }

    #[test]
    fn exported_array_ids() {
        let docs = documents_from_json(r#"[{"id": "r1", "a": 1}, {"id": 7}, {"b": 2}]"#).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["r1", "7", "#2"]);
        assert!(documents_from_json("{}").is_err());
    }
}
