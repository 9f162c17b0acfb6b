//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use readcache_core::context::{namespace_of, Context, Namespace};
use readcache_core::entity::Entity;
use readcache_core::storage::{ReadRepository, RepositoryError, Result, WriteRepository};

/// In-memory storage backend.
///
/// Entities are kept per namespace in HashMaps wrapped in `Arc<RwLock<_>>`.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository<E> {
    entities: Arc<RwLock<HashMap<Namespace, HashMap<Uuid, E>>>>,
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryRepository<E> {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl<E: Entity> ReadRepository<E> for InMemoryRepository<E> {
    async fn find(&self, ctx: &Context, id: Uuid) -> Result<E> {
        let namespace = namespace_of(ctx);
        let entities = self.entities.read().await;
        entities
            .get(&namespace)
            .and_then(|stored| stored.get(&id))
            .cloned()
            .ok_or(RepositoryError::NotFound { namespace, id })
    }

    async fn find_all(&self, ctx: &Context) -> Result<Vec<E>> {
        let entities = self.entities.read().await;
        Ok(entities
            .get(&namespace_of(ctx))
            .map(|stored| stored.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl<E: Entity> WriteRepository<E> for InMemoryRepository<E> {
    async fn save(&self, ctx: &Context, entity: &E) -> Result<()> {
        let id = entity.entity_id();
        if id.is_nil() {
            return Err(RepositoryError::InvalidData("nil entity ID".to_string()));
        }

        let mut entities = self.entities.write().await;
        entities
            .entry(namespace_of(ctx))
            .or_default()
            .insert(id, entity.clone());
        Ok(())
    }

    async fn remove(&self, ctx: &Context, id: Uuid) -> Result<()> {
        let namespace = namespace_of(ctx);
        let mut entities = self.entities.write().await;
        let removed = entities
            .get_mut(&namespace)
            .and_then(|stored| stored.remove(&id));
        match removed {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound { namespace, id }),
        }
    }
}
