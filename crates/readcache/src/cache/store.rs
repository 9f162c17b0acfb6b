//! Namespaced in-memory entity store backing [`CachedRepository`].
//!
//! [`CachedRepository`]: super::CachedRepository

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use readcache_core::context::Namespace;
use readcache_core::entity::Entity;

/// Two-level map `namespace -> (entity ID -> entity)` behind one lock.
///
/// Lookups take the read lock. Namespace creation, insertion and eviction
/// take the write lock. Namespaces are created on first insert and are never
/// dropped. There is no size or age limit.
///
/// Every eviction advances an epoch. A reader that fetched an entity from
/// elsewhere passes the epoch it saw before fetching to
/// [`CacheStore::insert_since`], and the insert is dropped if anything was
/// evicted in between, so a value read before a write is never cached after
/// that write busted the entry.
#[derive(Debug)]
pub struct CacheStore<E> {
    inner: RwLock<Inner<E>>,
}

#[derive(Debug)]
struct Inner<E> {
    namespaces: HashMap<Namespace, HashMap<Uuid, E>>,
    epoch: u64,
}

impl<E: Entity> CacheStore<E> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                namespaces: HashMap::new(),
                epoch: 0,
            }),
        }
    }

    /// Returns a copy of the cached entity, if any.
    pub async fn get(&self, namespace: &Namespace, id: Uuid) -> Option<E> {
        let inner = self.inner.read().await;
        inner
            .namespaces
            .get(namespace)
            .and_then(|entities| entities.get(&id))
            .cloned()
    }

    /// Number of evictions so far.
    pub async fn epoch(&self) -> u64 {
        self.inner.read().await.epoch
    }

    /// Inserts or replaces one entity.
    pub async fn insert(&self, namespace: &Namespace, entity: E) {
        let mut inner = self.inner.write().await;
        inner
            .namespaces
            .entry(namespace.clone())
            .or_default()
            .insert(entity.entity_id(), entity);
    }

    /// Inserts one entity unless an eviction happened after `epoch`.
    /// Returns true if it was inserted.
    pub async fn insert_since(&self, namespace: &Namespace, entity: E, epoch: u64) -> bool {
        let mut inner = self.inner.write().await;
        if inner.epoch != epoch {
            return false;
        }
        inner
            .namespaces
            .entry(namespace.clone())
            .or_default()
            .insert(entity.entity_id(), entity);
        true
    }

    /// Inserts or replaces every entity under a single write lock.
    pub async fn insert_many<I>(&self, namespace: &Namespace, entities: I)
    where
        I: IntoIterator<Item = E>,
    {
        let mut inner = self.inner.write().await;
        let cached = inner.namespaces.entry(namespace.clone()).or_default();
        for entity in entities {
            cached.insert(entity.entity_id(), entity);
        }
    }

    /// Like [`CacheStore::insert_many`], but inserts nothing if an eviction
    /// happened after `epoch`. Returns true if the entities were inserted.
    pub async fn insert_many_since<I>(&self, namespace: &Namespace, entities: I, epoch: u64) -> bool
    where
        I: IntoIterator<Item = E>,
    {
        let mut inner = self.inner.write().await;
        if inner.epoch != epoch {
            return false;
        }
        let cached = inner.namespaces.entry(namespace.clone()).or_default();
        for entity in entities {
            cached.insert(entity.entity_id(), entity);
        }
        true
    }

    /// Removes one entity and advances the epoch. Returns true if it was
    /// cached.
    pub async fn evict(&self, namespace: &Namespace, id: Uuid) -> bool {
        let mut inner = self.inner.write().await;
        inner.epoch += 1;
        inner
            .namespaces
            .get_mut(namespace)
            .is_some_and(|entities| entities.remove(&id).is_some())
    }

    /// Returns true if the entity is cached.
    pub async fn contains(&self, namespace: &Namespace, id: Uuid) -> bool {
        let inner = self.inner.read().await;
        inner
            .namespaces
            .get(namespace)
            .is_some_and(|entities| entities.contains_key(&id))
    }

    /// Number of cached entities in a namespace.
    pub async fn len(&self, namespace: &Namespace) -> usize {
        let inner = self.inner.read().await;
        inner.namespaces.get(namespace).map_or(0, HashMap::len)
    }

    /// Returns true if nothing is cached in the namespace.
    pub async fn is_empty(&self, namespace: &Namespace) -> bool {
        self.len(namespace).await == 0
    }
}

impl<E: Entity> Default for CacheStore<E> {
    fn default() -> Self {
        Self::new()
    }
}
