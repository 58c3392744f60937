use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator placed between the mod scope and the entity name.
pub const KEY_SEPARATOR: &str = "-";

/// Name of the mod package that was loading when a marker was captured
/// (e.g., `alpha`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModScope(pub String);

/// Address of one entity's field bucket: `scope + "-" + name`.
///
/// Built once when a batch is bound and used verbatim afterwards; callers
/// never split it back into scope and name.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeKey(pub String);

impl ModScope {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CompositeKey {
    /// Join a scope and an entity name into the bucket address.
    pub fn compose(scope: &ModScope, name: &str) -> Self {
        CompositeKey(format!("{}{}{}", scope.0, KEY_SEPARATOR, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModScope {
    fn from(value: &str) -> Self {
        ModScope(value.to_string())
    }
}
