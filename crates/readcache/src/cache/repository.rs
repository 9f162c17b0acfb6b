//! Caching repository decorator.
//!
//! Wraps any [`ReadWriteRepository`] with a namespaced in-memory cache that
//! is kept coherent by busting entries on writes and on inbound events.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use readcache_core::context::{namespace_of, Context};
use readcache_core::entity::Entity;
use readcache_core::event::{Event, EventHandler, EventHandlerError, EventHandlerType};
use readcache_core::storage::{ReadRepository, ReadWriteRepository, Result, WriteRepository};

use super::CacheStore;

/// Cached repository decorator.
///
/// - **Reads**: `find` serves from the cache when possible, otherwise fetches
///   from the wrapped repository and populates the cache. `find_all` always
///   fetches and pre-warms the cache with the result.
/// - **Writes**: `save` and `remove` evict the entry *before* delegating, so a
///   failed write leaves the entry cold rather than stale, and again after
///   the delegated call returns, so a read that raced the write cannot leave
///   the old value behind.
/// - **Races**: a read only caches what it fetched if nothing was evicted
///   while it was fetching (see [`CacheStore`]).
/// - **Events**: as an [`EventHandler`] it evicts the entry named by the
///   event's aggregate ID. Register it on the bus with a matcher covering the
///   aggregates stored in the wrapped repository.
///
/// Intended for small collections that are read often. The cache has no
/// size limit and never expires entries on its own.
pub struct CachedRepository<E: Entity> {
    repository: Arc<dyn ReadWriteRepository<E>>,
    cache: CacheStore<E>,
    handler_type: EventHandlerType,
}

impl<E: Entity> CachedRepository<E> {
    /// Creates a cached repository wrapping `repository`.
    pub fn new<R>(repository: Arc<R>) -> Self
    where
        R: ReadWriteRepository<E>,
    {
        Self::from_dyn(repository)
    }

    /// Creates a cached repository wrapping an already type-erased repository.
    pub fn from_dyn(repository: Arc<dyn ReadWriteRepository<E>>) -> Self {
        Self {
            repository,
            cache: CacheStore::new(),
            handler_type: EventHandlerType::new(format!("repo-cache-{}", Uuid::new_v4())),
        }
    }

    /// The cache owned by this decorator.
    pub fn cache(&self) -> &CacheStore<E> {
        &self.cache
    }
}

#[async_trait]
impl<E: Entity> ReadRepository<E> for CachedRepository<E> {
    async fn find(&self, ctx: &Context, id: Uuid) -> Result<E> {
        let namespace = namespace_of(ctx);

        // Check cache first
        if let Some(entity) = self.cache.get(&namespace, id).await {
            tracing::trace!(%namespace, entity_id = %id, "Cache hit");
            return Ok(entity);
        }

        // Cache miss - fetch from repository. Errors are returned as-is and
        // nothing is cached.
        tracing::trace!(%namespace, entity_id = %id, "Cache miss");
        let epoch = self.cache.epoch().await;
        let entity = self.repository.find(ctx, id).await?;

        if !self.cache.insert_since(&namespace, entity.clone(), epoch).await {
            tracing::trace!(%namespace, entity_id = %id, "Evicted while fetching, not cached");
        }
        Ok(entity)
    }

    async fn find_all(&self, ctx: &Context) -> Result<Vec<E>> {
        let epoch = self.cache.epoch().await;
        let entities = self.repository.find_all(ctx).await?;

        let namespace = namespace_of(ctx);
        let warmed = self
            .cache
            .insert_many_since(&namespace, entities.iter().cloned(), epoch)
            .await;
        tracing::trace!(%namespace, count = entities.len(), warmed, "Cache pre-warmed");

        Ok(entities)
    }

    fn parent(&self) -> Option<&dyn ReadRepository<E>> {
        let parent: &dyn ReadRepository<E> = self.repository.as_ref();
        Some(parent)
    }
}

#[async_trait]
impl<E: Entity> WriteRepository<E> for CachedRepository<E> {
    async fn save(&self, ctx: &Context, entity: &E) -> Result<()> {
        let namespace = namespace_of(ctx);
        let id = entity.entity_id();

        // 1. Bust the cache
        self.cache.evict(&namespace, id).await;
        tracing::debug!(%namespace, entity_id = %id, "Cache busted on save");

        // 2. Persist to storage
        let result = self.repository.save(ctx, entity).await;

        // 3. Drop anything a concurrent read cached meanwhile
        self.cache.evict(&namespace, id).await;
        result
    }

    async fn remove(&self, ctx: &Context, id: Uuid) -> Result<()> {
        let namespace = namespace_of(ctx);

        // 1. Bust the cache
        self.cache.evict(&namespace, id).await;
        tracing::debug!(%namespace, entity_id = %id, "Cache busted on remove");

        // 2. Persist removal to storage
        let result = self.repository.remove(ctx, id).await;

        // 3. Drop anything a concurrent read cached meanwhile
        self.cache.evict(&namespace, id).await;
        result
    }
}

#[async_trait]
impl<E: Entity> EventHandler for CachedRepository<E> {
    fn handler_type(&self) -> EventHandlerType {
        self.handler_type.clone()
    }

    async fn handle_event(
        &self,
        ctx: &Context,
        event: &Event,
    ) -> std::result::Result<(), EventHandlerError> {
        let namespace = namespace_of(ctx);
        let evicted = self.cache.evict(&namespace, event.aggregate_id).await;
        tracing::debug!(
            %namespace,
            entity_id = %event.aggregate_id,
            event_type = %event.event_type,
            evicted,
            "Cache invalidated by event"
        );
        Ok(())
    }
}
