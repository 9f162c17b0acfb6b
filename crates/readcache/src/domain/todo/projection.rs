use serde::de::DeserializeOwned;

use readcache_core::event::{Event, EventHandlerError};

use super::entity::{TodoItem, TodoList};
use super::events::{
    ItemAddedData, ItemCheckedData, ItemDescriptionSetData, ItemRemovedData, CREATED, DELETED,
    ITEM_ADDED, ITEM_CHECKED, ITEM_DESCRIPTION_SET, ITEM_REMOVED,
};
use crate::projector::Projection;

/// Folds todo list events into the [`TodoList`] read model.
#[derive(Debug, Default, Clone, Copy)]
pub struct TodoProjection;

fn decode<T: DeserializeOwned>(event: &Event) -> Result<T, EventHandlerError> {
    event.decode_data().map_err(|err| EventHandlerError::Projection {
        event_type: event.event_type.clone(),
        reason: err.to_string(),
    })
}

fn unknown_item(event: &Event, item_id: u32) -> EventHandlerError {
    EventHandlerError::Projection {
        event_type: event.event_type.clone(),
        reason: format!("unknown item {item_id}"),
    }
}

impl Projection<TodoList> for TodoProjection {
    fn projection_type(&self) -> &'static str {
        "todolist"
    }

    fn project(
        &self,
        event: &Event,
        mut list: TodoList,
    ) -> Result<Option<TodoList>, EventHandlerError> {
        let event_type = &event.event_type;
        if *event_type == DELETED {
            return Ok(None);
        }

        if *event_type == CREATED {
            list.created_at = event.timestamp;
        } else if *event_type == ITEM_ADDED {
            let data: ItemAddedData = decode(event)?;
            list.items.push(TodoItem {
                id: data.item_id,
                description: data.description,
                completed: false,
            });
        } else if *event_type == ITEM_REMOVED {
            let data: ItemRemovedData = decode(event)?;
            list.items.retain(|item| item.id != data.item_id);
        } else if *event_type == ITEM_DESCRIPTION_SET {
            let data: ItemDescriptionSetData = decode(event)?;
            list.item_mut(data.item_id)
                .ok_or_else(|| unknown_item(event, data.item_id))?
                .description = data.description;
        } else if *event_type == ITEM_CHECKED {
            let data: ItemCheckedData = decode(event)?;
            list.item_mut(data.item_id)
                .ok_or_else(|| unknown_item(event, data.item_id))?
                .completed = data.checked;
        } else {
            return Err(EventHandlerError::Projection {
                event_type: event_type.clone(),
                reason: "unknown event type".to_string(),
            });
        }

        list.id = event.aggregate_id;
        list.version = event.version;
        list.updated_at = event.timestamp;
        Ok(Some(list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    use readcache_core::event::EventType;

    use super::super::events::TODO_LIST;

    fn event(event_type: EventType, version: u64, data: serde_json::Value) -> Event {
        Event::new(event_type, TODO_LIST, Uuid::nil(), version, data)
    }

    #[test]
    fn test_builds_list_from_events() {
        let projection = TodoProjection;
        let list = TodoList::default();

        let list = projection
            .project(&event(CREATED, 1, json!(null)), list)
            .unwrap()
            .unwrap();
        let list = projection
            .project(
                &event(ITEM_ADDED, 2, json!({ "item_id": 0, "description": "milk" })),
                list,
            )
            .unwrap()
            .unwrap();
        let list = projection
            .project(
                &event(ITEM_CHECKED, 3, json!({ "item_id": 0, "checked": true })),
                list,
            )
            .unwrap()
            .unwrap();

        assert_eq!(list.version, 3);
        assert_eq!(list.items.len(), 1);
        assert!(list.items[0].completed);
    }

    #[test]
    fn test_deleted_removes_the_list() {
        let result = TodoProjection
            .project(&event(DELETED, 4, json!(null)), TodoList::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_unknown_item_fails() {
        let err = TodoProjection
            .project(
                &event(ITEM_DESCRIPTION_SET, 2, json!({ "item_id": 9, "description": "x" })),
                TodoList::default(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            EventHandlerError::Projection {
                event_type: ITEM_DESCRIPTION_SET,
                reason: "unknown item 9".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_payload_fails() {
        let err = TodoProjection
            .project(&event(ITEM_ADDED, 2, json!({ "item": 0 })), TodoList::default())
            .unwrap_err();
        assert!(matches!(err, EventHandlerError::Projection { .. }));
    }
}
