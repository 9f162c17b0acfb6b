//! Tracing and call-counting repository decorator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use readcache_core::context::{namespace_of, Context};
use readcache_core::entity::Entity;
use readcache_core::storage::{
    EntityFactoryAware, ReadRepository, ReadWriteRepository, Result, WriteRepository,
};

/// Number of calls made through an [`InstrumentedRepository`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CallCounts {
    pub find: usize,
    pub find_all: usize,
    pub save: usize,
    pub remove: usize,
}

#[derive(Debug, Default)]
struct Counters {
    find: AtomicUsize,
    find_all: AtomicUsize,
    save: AtomicUsize,
    remove: AtomicUsize,
}

/// Decorator that logs every delegated call with its latency and outcome and
/// counts calls per operation.
///
/// It is transparent: results and errors pass through untouched, and the
/// entity factory capability of the wrapped repository is forwarded.
pub struct InstrumentedRepository<E: Entity> {
    name: &'static str,
    repository: Arc<dyn ReadWriteRepository<E>>,
    counters: Counters,
}

impl<E: Entity> InstrumentedRepository<E> {
    /// Wraps `repository`; `name` labels the log lines.
    pub fn new<R>(name: &'static str, repository: Arc<R>) -> Self
    where
        R: ReadWriteRepository<E>,
    {
        Self::from_dyn(name, repository)
    }

    pub fn from_dyn(name: &'static str, repository: Arc<dyn ReadWriteRepository<E>>) -> Self {
        Self {
            name,
            repository,
            counters: Counters::default(),
        }
    }

    /// Snapshot of the call counters.
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            find: self.counters.find.load(Ordering::SeqCst),
            find_all: self.counters.find_all.load(Ordering::SeqCst),
            save: self.counters.save.load(Ordering::SeqCst),
            remove: self.counters.remove.load(Ordering::SeqCst),
        }
    }

    fn record<T>(
        &self,
        operation: &'static str,
        ctx: &Context,
        started: Instant,
        result: &Result<T>,
    ) {
        let elapsed_us = started.elapsed().as_micros() as u64;
        match result {
            Ok(_) => tracing::debug!(
                repository = self.name,
                operation,
                namespace = %namespace_of(ctx),
                elapsed_us,
                "Repository call succeeded"
            ),
            Err(err) => tracing::debug!(
                repository = self.name,
                operation,
                namespace = %namespace_of(ctx),
                elapsed_us,
                error = %err,
                "Repository call failed"
            ),
        }
    }
}

#[async_trait]
impl<E: Entity> ReadRepository<E> for InstrumentedRepository<E> {
    async fn find(&self, ctx: &Context, id: Uuid) -> Result<E> {
        self.counters.find.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();
        let result = self.repository.find(ctx, id).await;
        self.record("find", ctx, started, &result);
        result
    }

    async fn find_all(&self, ctx: &Context) -> Result<Vec<E>> {
        self.counters.find_all.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();
        let result = self.repository.find_all(ctx).await;
        self.record("find_all", ctx, started, &result);
        result
    }

    fn parent(&self) -> Option<&dyn ReadRepository<E>> {
        let parent: &dyn ReadRepository<E> = self.repository.as_ref();
        Some(parent)
    }

    fn entity_factory_target(&self) -> Option<&dyn EntityFactoryAware<E>> {
        self.repository.entity_factory_target()
    }
}

#[async_trait]
impl<E: Entity> WriteRepository<E> for InstrumentedRepository<E> {
    async fn save(&self, ctx: &Context, entity: &E) -> Result<()> {
        self.counters.save.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();
        let result = self.repository.save(ctx, entity).await;
        self.record("save", ctx, started, &result);
        result
    }

    async fn remove(&self, ctx: &Context, id: Uuid) -> Result<()> {
        self.counters.remove.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();
        let result = self.repository.remove(ctx, id).await;
        self.record("remove", ctx, started, &result);
        result
    }
}
