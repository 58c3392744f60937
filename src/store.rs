//! Persistent buckets of captured fields, keyed by `CompositeKey`.
//!
//! Binding merges per field: a later capture for the same key overwrites
//! fields it names and leaves the others in place. Buckets are never removed
//! while the store lives.

use crate::capture::{CapturedBatch, CompositeKey};
use crate::query::FieldQuery;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Field name to captured value for one entity.
pub type FieldBucket = BTreeMap<String, Value>;

#[derive(Debug, Default)]
/// Shared store written by identity lookups during load and read afterwards.
pub struct FieldStore {
    buckets: RwLock<BTreeMap<CompositeKey, FieldBucket>>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `batch` to the entity `name`, merging into any existing bucket.
    ///
    /// The bucket is created even when the batch is empty, so a bound entity
    /// always has a bucket.
    pub fn bind(&self, batch: CapturedBatch, name: &str) -> CompositeKey {
        let key = CompositeKey::compose(&batch.scope, name);
        let field_count = batch.fields.len();
        let mut buckets = self.write();
        let bucket = buckets.entry(key.clone()).or_default();
        bucket.extend(batch.fields);
        debug!(key = %key, fields = field_count, "Bound custom fields");
        key
    }

    /// Copy of the bucket stored under `key`.
    pub fn bucket(&self, key: &str) -> Option<FieldBucket> {
        self.read().get(&CompositeKey(key.to_string())).cloned()
    }

    /// Bound keys in stable order.
    pub fn keys(&self) -> Vec<CompositeKey> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Log every bound key with its fields once loading has finished.
    pub fn log_summary(&self) {
        let buckets = self.read();
        for (key, bucket) in buckets.iter() {
            let fields = Value::Object(bucket.clone().into_iter().collect());
            info!(key = %key, fields = %fields, "Custom fields captured");
        }
    }

    /// Immutable snapshot for lock-free reads after the load phase.
    pub fn freeze(&self) -> FrozenFields {
        FrozenFields {
            buckets: self.read().clone(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<CompositeKey, FieldBucket>> {
        self.buckets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<CompositeKey, FieldBucket>> {
        self.buckets.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FieldQuery for FieldStore {
    fn get_raw(&self, key: &str, field: &str) -> Option<Value> {
        self.read()
            .get(&CompositeKey(key.to_string()))?
            .get(field)
            .cloned()
    }
}

#[derive(Clone, Debug, Default)]
/// Read-only copy of a [`FieldStore`].
pub struct FrozenFields {
    buckets: BTreeMap<CompositeKey, FieldBucket>,
}

impl FrozenFields {
    pub fn bucket(&self, key: &str) -> Option<&FieldBucket> {
        self.buckets.get(&CompositeKey(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &CompositeKey> {
        self.buckets.keys()
    }
}

impl FieldQuery for FrozenFields {
    fn get_raw(&self, key: &str, field: &str) -> Option<Value> {
        self.bucket(key)?.get(field).cloned()
    }
}
