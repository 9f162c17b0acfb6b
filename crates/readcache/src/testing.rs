//! Test doubles shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use readcache_core::context::{namespace_of, Context, Namespace};
use readcache_core::entity::Entity;
use readcache_core::storage::{ReadRepository, RepositoryError, Result, WriteRepository};

/// Minimal read model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub value: i64,
}

impl Note {
    pub fn new(value: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
        }
    }
}

impl Entity for Note {
    fn entity_id(&self) -> Uuid {
        self.id
    }
}

/// Namespaced repository that counts calls and can be told to fail.
#[derive(Default)]
pub struct MockRepository {
    notes: RwLock<HashMap<Namespace, HashMap<Uuid, Note>>>,
    failure: Mutex<Option<RepositoryError>>,
    find_calls: AtomicUsize,
    find_all_calls: AtomicUsize,
    save_calls: AtomicUsize,
    remove_calls: AtomicUsize,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a note directly, bypassing counters and any decorator.
    pub async fn insert(&self, ctx: &Context, note: Note) {
        self.notes
            .write()
            .await
            .entry(namespace_of(ctx))
            .or_default()
            .insert(note.id, note);
    }

    /// Makes every following call fail with `error` until [`Self::recover`].
    pub fn fail(&self, error: RepositoryError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ReadRepository<Note> for MockRepository {
    async fn find(&self, ctx: &Context, id: Uuid) -> Result<Note> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let namespace = namespace_of(ctx);
        self.notes
            .read()
            .await
            .get(&namespace)
            .and_then(|notes| notes.get(&id))
            .cloned()
            .ok_or(RepositoryError::NotFound { namespace, id })
    }

    async fn find_all(&self, ctx: &Context) -> Result<Vec<Note>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .notes
            .read()
            .await
            .get(&namespace_of(ctx))
            .map(|notes| notes.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl WriteRepository<Note> for MockRepository {
    async fn save(&self, ctx: &Context, entity: &Note) -> Result<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.insert(ctx, entity.clone()).await;
        Ok(())
    }

    async fn remove(&self, ctx: &Context, id: Uuid) -> Result<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let namespace = namespace_of(ctx);
        let removed = self
            .notes
            .write()
            .await
            .get_mut(&namespace)
            .and_then(|notes| notes.remove(&id));
        match removed {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound { namespace, id }),
        }
    }
}
