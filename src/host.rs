//! Hook points the host application hands to the intercepts.
//!
//! Each trait is implemented for plain closures so a host can pass its
//! existing functions without writing adapter types.

use anyhow::Result;
use serde_json::Value;

/// Accessor for the mod package currently being loaded.
pub trait LoadContext {
    /// Name of the active mod. Errors mean the host is not in a loading state.
    fn current_scope(&self) -> Result<String>;
}

/// The host's deserialization entry point for one definition node.
pub trait ContentDeserializer {
    type Output;

    fn deserialize(&self, node: &Value) -> Result<Self::Output>;
}

/// The host's name-to-entity lookup.
pub trait ContentLookup {
    type Entity;

    /// Resolve `name`; `None` is the host's own absence marker.
    fn lookup(&self, name: &str) -> Option<Self::Entity>;
}

impl<F> LoadContext for F
where
    F: Fn() -> Result<String>,
{
    fn current_scope(&self) -> Result<String> {
        self()
    }
}

impl<F, T> ContentDeserializer for F
where
    F: Fn(&Value) -> Result<T>,
{
    type Output = T;

    fn deserialize(&self, node: &Value) -> Result<T> {
        self(node)
    }
}

impl<F, E> ContentLookup for F
where
    F: Fn(&str) -> Option<E>,
{
    type Entity = E;

    fn lookup(&self, name: &str) -> Option<E> {
        self(name)
    }
}
