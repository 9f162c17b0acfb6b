//! JSON document repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use readcache_core::context::{namespace_of, Context, Namespace};
use readcache_core::entity::{Entity, EntityFactory};
use readcache_core::storage::{
    EntityFactoryAware, ReadRepository, RepositoryError, Result, WriteRepository,
};

/// Document storage backend.
///
/// Entities are stored as JSON documents per namespace. Reading needs an
/// [`EntityFactory`]: the factory's entity is serialized as a template and
/// the stored document is overlaid on it, so documents written before a
/// field existed decode with the factory's value for that field.
pub struct DocumentRepository<E> {
    documents: RwLock<HashMap<Namespace, HashMap<Uuid, Value>>>,
    factory: RwLock<Option<EntityFactory<E>>>,
}

impl<E> DocumentRepository<E>
where
    E: Entity + Serialize + DeserializeOwned,
{
    /// Creates an empty repository without an entity factory.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            factory: RwLock::new(None),
        }
    }

    /// Stores a raw document, bypassing entity serialization.
    pub async fn insert_document(&self, ctx: &Context, id: Uuid, document: Value) {
        let mut documents = self.documents.write().await;
        documents
            .entry(namespace_of(ctx))
            .or_default()
            .insert(id, document);
    }

    async fn template(&self) -> Result<Value> {
        let factory = self.factory.read().await;
        let factory = factory.as_ref().ok_or(RepositoryError::MissingEntityFactory)?;
        Ok(serde_json::to_value(factory())?)
    }
}

impl<E> Default for DocumentRepository<E>
where
    E: Entity + Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Overlays the top-level fields of `document` on `template`.
fn overlay(template: Value, document: &Value) -> Value {
    match (template, document) {
        (Value::Object(mut base), Value::Object(fields)) => {
            for (key, value) in fields {
                base.insert(key.clone(), value.clone());
            }
            Value::Object(base)
        }
        (_, document) => document.clone(),
    }
}

fn decode<E: DeserializeOwned>(template: &Value, document: &Value) -> Result<E> {
    Ok(serde_json::from_value(overlay(template.clone(), document))?)
}

#[async_trait]
impl<E> ReadRepository<E> for DocumentRepository<E>
where
    E: Entity + Serialize + DeserializeOwned,
{
    async fn find(&self, ctx: &Context, id: Uuid) -> Result<E> {
        let template = self.template().await?;
        let namespace = namespace_of(ctx);

        let documents = self.documents.read().await;
        let document = documents
            .get(&namespace)
            .and_then(|stored| stored.get(&id))
            .ok_or_else(|| RepositoryError::NotFound {
                namespace: namespace.clone(),
                id,
            })?;
        decode(&template, document)
    }

    async fn find_all(&self, ctx: &Context) -> Result<Vec<E>> {
        let template = self.template().await?;

        let documents = self.documents.read().await;
        let Some(stored) = documents.get(&namespace_of(ctx)) else {
            return Ok(Vec::new());
        };
        stored
            .values()
            .map(|document| decode(&template, document))
            .collect()
    }

    fn entity_factory_target(&self) -> Option<&dyn EntityFactoryAware<E>> {
        let target: &dyn EntityFactoryAware<E> = self;
        Some(target)
    }
}

#[async_trait]
impl<E> WriteRepository<E> for DocumentRepository<E>
where
    E: Entity + Serialize + DeserializeOwned,
{
    async fn save(&self, ctx: &Context, entity: &E) -> Result<()> {
        let id = entity.entity_id();
        if id.is_nil() {
            return Err(RepositoryError::InvalidData("nil entity ID".to_string()));
        }

        let document = serde_json::to_value(entity)?;
        self.insert_document(ctx, id, document).await;
        Ok(())
    }

    async fn remove(&self, ctx: &Context, id: Uuid) -> Result<()> {
        let namespace = namespace_of(ctx);
        let mut documents = self.documents.write().await;
        let removed = documents
            .get_mut(&namespace)
            .and_then(|stored| stored.remove(&id));
        match removed {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound { namespace, id }),
        }
    }
}

#[async_trait]
impl<E> EntityFactoryAware<E> for DocumentRepository<E>
where
    E: Entity + Serialize + DeserializeOwned,
{
    async fn set_entity_factory(&self, factory: EntityFactory<E>) {
        *self.factory.write().await = Some(factory);
    }
}
