use std::fmt::Debug;
use std::sync::Arc;

use uuid::Uuid;

/// A read-model value identified by a globally unique ID.
///
/// Entities are treated as immutable values once stored: they are replaced
/// wholesale on refresh, never mutated in place.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// The ID of the entity, usually the ID of the aggregate it projects.
    fn entity_id(&self) -> Uuid;
}

/// Produces a fresh, empty entity.
///
/// Used by projectors to start a read model and by document backends as a
/// decoding template.
pub type EntityFactory<E> = Arc<dyn Fn() -> E + Send + Sync>;
