//! Custom fields for JSON content definitions.
//!
//! A host application deserializes definition files with its own schema and
//! drops fields it does not know. This crate lets a definition carry one
//! reserved marker field (`"customJson"` by default) whose children are kept
//! and bound to the entity the file defines:
//!
//! ```json
//! { "type": "turret", "health": 120, "customJson": { "tier": 3, "label": "alpha" } }
//! ```
//!
//! The host wraps two of its functions: the deserializer, through
//! [`ParseIntercept`], and the name-to-entity lookup, through
//! [`IdentityIntercept`]. The parse side stashes the marker's children in a
//! pending slot; the first lookup afterwards binds them under
//! `"<mod>-<name>"` in a shared [`FieldStore`]. Callers read values back with
//! the [`FieldQuery`] getters once loading has passed that lookup.
//!
//! Hosts that can pass the entity name explicitly skip the intercepts and use
//! [`capture_marker`] followed by [`FieldStore::bind`].

pub mod capture;
pub mod config;
pub mod host;
pub mod intercept;
pub mod query;
pub mod store;

pub use capture::{
    CapturedBatch, CompositeKey, KEY_SEPARATOR, ModScope, PendingCapture, capture_marker,
    marker_fields,
};
pub use config::{CaptureOptions, DEFAULT_MARKER_FIELD};
pub use host::{ContentDeserializer, ContentLookup, LoadContext};
pub use intercept::{IdentityIntercept, LoadSession, ParseIntercept};
pub use query::FieldQuery;
pub use store::{FieldBucket, FieldStore, FrozenFields};
