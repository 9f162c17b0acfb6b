use std::any::Any;

use async_trait::async_trait;
use uuid::Uuid;

use crate::context::Context;
use crate::entity::{Entity, EntityFactory};

use super::Result;

/// Read side of a read-model repository.
///
/// `Any` is a supertrait so that a `&dyn ReadRepository<E>` can be upcast and
/// downcast when walking a decorator chain.
#[async_trait]
pub trait ReadRepository<E: Entity>: Any + Send + Sync {
    /// Gets an entity by its ID in the context's namespace.
    async fn find(&self, ctx: &Context, id: Uuid) -> Result<E>;

    /// Gets every entity in the context's namespace.
    async fn find_all(&self, ctx: &Context) -> Result<Vec<E>>;

    /// The repository this one delegates to, for decorators.
    fn parent(&self) -> Option<&dyn ReadRepository<E>> {
        None
    }

    /// Backends that need an entity factory return themselves here.
    fn entity_factory_target(&self) -> Option<&dyn EntityFactoryAware<E>> {
        None
    }
}

/// Write side of a read-model repository.
#[async_trait]
pub trait WriteRepository<E: Entity>: Send + Sync {
    /// Inserts or replaces an entity.
    async fn save(&self, ctx: &Context, entity: &E) -> Result<()>;

    /// Removes an entity by its ID.
    async fn remove(&self, ctx: &Context, id: Uuid) -> Result<()>;
}

/// A repository supporting both reads and writes.
pub trait ReadWriteRepository<E: Entity>: ReadRepository<E> + WriteRepository<E> {}

impl<E, T> ReadWriteRepository<E> for T
where
    E: Entity,
    T: ReadRepository<E> + WriteRepository<E>,
{
}

/// Capability of backends that build entities from an [`EntityFactory`].
#[async_trait]
pub trait EntityFactoryAware<E: Entity>: Send + Sync {
    /// Installs the factory, replacing any previous one.
    async fn set_entity_factory(&self, factory: EntityFactory<E>);
}
