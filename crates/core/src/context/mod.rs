//! Request-scoped context.
//!
//! Every repository, event store and event handler call receives a
//! [`Context`]. The context carries the tenant [`Namespace`] that partitions
//! stored and cached data.

mod namespace;

pub use namespace::{namespace_of, Namespace, DEFAULT_NAMESPACE};

/// Request-scoped context passed by reference through every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    namespace: Option<Namespace>,
}

impl Context {
    /// Creates a context without an explicit namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this context scoped to the given namespace.
    pub fn with_namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// The namespace explicitly set on this context, if any.
    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }
}
