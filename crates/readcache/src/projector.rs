//! Read-model projector.
//!
//! Folds events into entities and persists them in a read-model repository.

use std::sync::Arc;

use async_trait::async_trait;

use readcache_core::context::{namespace_of, Context};
use readcache_core::entity::{Entity, EntityFactory};
use readcache_core::event::{Event, EventHandler, EventHandlerError, EventHandlerType};
use readcache_core::storage::ReadWriteRepository;

/// Domain-specific folding of events into an entity.
pub trait Projection<E: Entity>: Send + Sync + 'static {
    /// Short name used to build the projector's handler type.
    fn projection_type(&self) -> &'static str;

    /// Applies an event to the current entity.
    ///
    /// Returns the entity to save, or `None` if the entity must be removed.
    fn project(&self, event: &Event, entity: E) -> Result<Option<E>, EventHandlerError>;
}

/// Event handler that keeps a read-model repository up to date.
///
/// For every event it loads the entity with the event's aggregate ID (or a
/// fresh one from the entity factory if the repository has none), projects
/// the event onto it, and saves or removes the result.
pub struct Projector<E: Entity, P> {
    projection: P,
    repository: Arc<dyn ReadWriteRepository<E>>,
    factory: EntityFactory<E>,
}

impl<E: Entity, P: Projection<E>> Projector<E, P> {
    pub fn new(
        projection: P,
        repository: Arc<dyn ReadWriteRepository<E>>,
        factory: EntityFactory<E>,
    ) -> Self {
        Self {
            projection,
            repository,
            factory,
        }
    }
}

#[async_trait]
impl<E: Entity, P: Projection<E>> EventHandler for Projector<E, P> {
    fn handler_type(&self) -> EventHandlerType {
        EventHandlerType::new(format!("projector-{}", self.projection.projection_type()))
    }

    async fn handle_event(&self, ctx: &Context, event: &Event) -> Result<(), EventHandlerError> {
        let entity = match self.repository.find(ctx, event.aggregate_id).await {
            Ok(entity) => entity,
            Err(err) if err.is_not_found() => (self.factory)(),
            Err(err) => return Err(err.into()),
        };

        match self.projection.project(event, entity)? {
            Some(entity) => {
                self.repository.save(ctx, &entity).await?;
                tracing::trace!(
                    namespace = %namespace_of(ctx),
                    entity_id = %entity.entity_id(),
                    %event,
                    "Read model projected"
                );
            }
            None => match self.repository.remove(ctx, event.aggregate_id).await {
                Ok(()) => {}
                // Nothing to remove
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err.into()),
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readcache_core::event::{AggregateType, EventType};
    use readcache_core::storage::{ReadRepository, RepositoryError};
    use serde_json::json;
    use uuid::Uuid;

    use crate::testing::{MockRepository, Note};

    const SET: EventType = EventType::from_static("note:set");
    const DELETED: EventType = EventType::from_static("note:deleted");
    const NOTE: AggregateType = AggregateType::from_static("note");

    struct NoteProjection;

    impl Projection<Note> for NoteProjection {
        fn projection_type(&self) -> &'static str {
            "note"
        }

        fn project(
            &self,
            event: &Event,
            mut note: Note,
        ) -> Result<Option<Note>, EventHandlerError> {
            if event.event_type == DELETED {
                return Ok(None);
            }
            note.id = event.aggregate_id;
            note.value = event.data["value"].as_i64().ok_or_else(|| {
                EventHandlerError::Projection {
                    event_type: event.event_type.clone(),
                    reason: "missing value".to_string(),
                }
            })?;
            Ok(Some(note))
        }
    }

    fn projector(repo: Arc<MockRepository>) -> Projector<Note, NoteProjection> {
        Projector::new(NoteProjection, repo, Arc::new(|| Note::new(0)))
    }

    #[tokio::test]
    async fn test_projects_new_and_existing_entities() {
        let repo = Arc::new(MockRepository::new());
        let projector = projector(repo.clone());
        let ctx = Context::new();
        let id = Uuid::new_v4();

        projector
            .handle_event(&ctx, &Event::new(SET, NOTE, id, 1, json!({ "value": 1 })))
            .await
            .unwrap();
        assert_eq!(repo.find(&ctx, id).await.unwrap().value, 1);

        projector
            .handle_event(&ctx, &Event::new(SET, NOTE, id, 2, json!({ "value": 2 })))
            .await
            .unwrap();
        assert_eq!(repo.find(&ctx, id).await.unwrap().value, 2);
        assert_eq!(repo.save_calls(), 2);
    }

    #[tokio::test]
    async fn test_removal_tolerates_missing_entity() {
        let repo = Arc::new(MockRepository::new());
        let projector = projector(repo.clone());
        let ctx = Context::new();
        let id = Uuid::new_v4();

        projector
            .handle_event(&ctx, &Event::new(DELETED, NOTE, id, 1, json!({})))
            .await
            .unwrap();
        assert_eq!(repo.remove_calls(), 1);
    }

    #[tokio::test]
    async fn test_projection_error_saves_nothing() {
        let repo = Arc::new(MockRepository::new());
        let projector = projector(repo.clone());

        let err = projector
            .handle_event(
                &Context::new(),
                &Event::new(SET, NOTE, Uuid::new_v4(), 1, json!({})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EventHandlerError::Projection { .. }));
        assert_eq!(repo.save_calls(), 0);
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let repo = Arc::new(MockRepository::new());
        repo.fail(RepositoryError::QueryFailed("down".to_string()));
        let projector = projector(repo.clone());

        let err = projector
            .handle_event(
                &Context::new(),
                &Event::new(SET, NOTE, Uuid::new_v4(), 1, json!({ "value": 1 })),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EventHandlerError::Repository(RepositoryError::QueryFailed("down".to_string()))
        );
    }

    #[test]
    fn test_handler_type() {
        let projector = projector(Arc::new(MockRepository::new()));
        assert_eq!(projector.handler_type().as_str(), "projector-note");
    }
}
