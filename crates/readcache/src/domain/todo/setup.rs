use std::sync::Arc;

use thiserror::Error;

use readcache_core::aggregate::CommandHandler;
use readcache_core::context::Context;
use readcache_core::entity::{Entity, EntityFactory};
use readcache_core::event::{EventBus, EventBusError, EventMatcher, EventStore};
use readcache_core::storage::ReadWriteRepository;

use super::aggregate::TodoAggregate;
use super::commands::TodoCommand;
use super::entity::TodoList;
use super::events::all_event_types;
use super::projection::TodoProjection;
use crate::aggregate::{AggregateCommandHandler, AggregateStore};
use crate::projector::Projector;

/// Errors that can occur when wiring a domain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Cannot register projector: {0}")]
    EventBus(#[from] EventBusError),
}

/// Wires the todo list domain.
///
/// Installs the entity factory on `repo` if it (or the repository it
/// decorates) needs one, subscribes a projector that keeps `repo` up to
/// date, and returns the command handler of the write side.
pub async fn setup_domain(
    ctx: &Context,
    event_store: Arc<dyn EventStore>,
    event_bus: Arc<dyn EventBus>,
    repo: Arc<dyn ReadWriteRepository<TodoList>>,
) -> Result<Arc<dyn CommandHandler<TodoCommand>>, SetupError> {
    let factory: EntityFactory<TodoList> = Arc::new(TodoList::default);
    if install_entity_factory(repo.as_ref(), factory.clone()).await {
        tracing::debug!("Entity factory installed for todo lists");
    }

    let projector = Projector::new(TodoProjection, repo, factory);
    event_bus
        .add_handler(
            ctx,
            EventMatcher::Events(all_event_types()),
            Arc::new(projector),
        )
        .await?;

    let store = AggregateStore::new(event_store, event_bus);
    Ok(Arc::new(AggregateCommandHandler::<TodoAggregate>::new(store)))
}

/// Hands `factory` to the repository, or to the one it directly decorates.
/// Returns whether either of them accepted it.
async fn install_entity_factory<E: Entity>(
    repo: &dyn ReadWriteRepository<E>,
    factory: EntityFactory<E>,
) -> bool {
    let target = repo
        .entity_factory_target()
        .or_else(|| repo.parent().and_then(|parent| parent.entity_factory_target()));

    match target {
        Some(target) => {
            target.set_entity_factory(factory).await;
            true
        }
        None => false,
    }
}
