use crate::capture::identity::ModScope;
use serde_json::Value;
use std::collections::BTreeMap;

/// Fields pulled from one marker, tagged with the scope they were read under.
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedBatch {
    pub scope: ModScope,
    pub fields: BTreeMap<String, Value>,
}

/// Single slot for a batch that has been captured but not yet bound.
#[derive(Debug, Default)]
pub struct PendingCapture {
    batch: Option<CapturedBatch>,
}

impl PendingCapture {
    /// Replace the slot contents. Returns the unbound batch that was dropped,
    /// if any.
    pub fn set(&mut self, batch: CapturedBatch) -> Option<CapturedBatch> {
        self.batch.replace(batch)
    }

    /// Consume the pending batch, leaving the slot empty.
    pub fn take(&mut self) -> Option<CapturedBatch> {
        self.batch.take()
    }

    pub fn is_pending(&self) -> bool {
        self.batch.is_some()
    }
}
