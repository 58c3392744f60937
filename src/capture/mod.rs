//! Capture side of the pipeline.
//!
//! `marker` reads the reserved field out of a raw definition node, `pending`
//! holds the resulting batch until the entity name is known, and `identity`
//! defines the scope and composite-key types the batch is bound under.

pub mod identity;
pub mod marker;
pub mod pending;

pub use identity::{CompositeKey, KEY_SEPARATOR, ModScope};
pub use marker::{capture_marker, marker_fields};
pub use pending::{CapturedBatch, PendingCapture};
