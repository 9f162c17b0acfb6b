use std::fmt;

use serde::{Deserialize, Serialize};

use super::Context;

/// Namespace used when the context does not carry one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Tenant scope that partitions repositories and caches.
///
/// Identical entity IDs in different namespaces never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_string())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Namespace {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Resolves the namespace of a context.
///
/// Pure: the same context always yields the same namespace. Contexts without
/// an explicit namespace resolve to [`DEFAULT_NAMESPACE`].
pub fn namespace_of(ctx: &Context) -> Namespace {
    ctx.namespace().cloned().unwrap_or_default()
}
