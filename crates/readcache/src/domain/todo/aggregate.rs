use serde::de::DeserializeOwned;

use readcache_core::aggregate::{Aggregate, AggregateError, PendingEvent};
use readcache_core::event::{AggregateType, Event};

use super::commands::TodoCommand;
use super::events::{
    ItemAddedData, ItemCheckedData, ItemDescriptionSetData, ItemRemovedData, CREATED, DELETED,
    ITEM_ADDED, ITEM_CHECKED, ITEM_DESCRIPTION_SET, ITEM_REMOVED, TODO_LIST,
};

/// Write-side state of a todo list.
#[derive(Debug, Default)]
pub struct TodoAggregate {
    created: bool,
    deleted: bool,
    items: Vec<ItemState>,
    next_item_id: u32,
}

#[derive(Debug)]
struct ItemState {
    id: u32,
    description: String,
    completed: bool,
}

type Result<T> = std::result::Result<T, AggregateError>;

impl TodoAggregate {
    fn ensure_active(&self) -> Result<()> {
        if !self.created {
            return Err(AggregateError::Rejected("todo list does not exist".to_string()));
        }
        if self.deleted {
            return Err(AggregateError::Rejected("todo list is deleted".to_string()));
        }
        Ok(())
    }

    fn item(&self, item_id: u32) -> Result<&ItemState> {
        self.items
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| AggregateError::Rejected(format!("item {item_id} does not exist")))
    }

    fn item_mut(&mut self, event: &Event, item_id: u32) -> Result<&mut ItemState> {
        self.items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| AggregateError::Apply {
                event_type: event.event_type.clone(),
                reason: format!("unknown item {item_id}"),
            })
    }
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(AggregateError::Rejected("item description is empty".to_string()));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(event: &Event) -> Result<T> {
    event.decode_data().map_err(|err| AggregateError::Apply {
        event_type: event.event_type.clone(),
        reason: err.to_string(),
    })
}

impl Aggregate for TodoAggregate {
    type Command = TodoCommand;

    const AGGREGATE_TYPE: AggregateType = TODO_LIST;

    fn handle_command(&self, command: &TodoCommand) -> Result<Vec<PendingEvent>> {
        if let TodoCommand::Create { .. } = command {
            if self.created {
                return Err(AggregateError::Rejected("todo list already exists".to_string()));
            }
            return Ok(vec![PendingEvent::empty(CREATED)]);
        }

        self.ensure_active()?;

        match command {
            TodoCommand::Create { .. } => Ok(Vec::new()),
            TodoCommand::Delete { .. } => Ok(vec![PendingEvent::empty(DELETED)]),
            TodoCommand::AddItem { description, .. } => {
                validate_description(description)?;
                let data = ItemAddedData {
                    item_id: self.next_item_id,
                    description: description.clone(),
                };
                Ok(vec![PendingEvent::new(ITEM_ADDED, &data)?])
            }
            TodoCommand::RemoveItem { item_id, .. } => {
                let item = self.item(*item_id)?;
                Ok(vec![PendingEvent::new(
                    ITEM_REMOVED,
                    &ItemRemovedData { item_id: item.id },
                )?])
            }
            TodoCommand::RemoveCompleted { .. } => self
                .items
                .iter()
                .filter(|item| item.completed)
                .map(|item| PendingEvent::new(ITEM_REMOVED, &ItemRemovedData { item_id: item.id }))
                .collect(),
            TodoCommand::SetItemDescription {
                item_id,
                description,
                ..
            } => {
                validate_description(description)?;
                let item = self.item(*item_id)?;
                if item.description == *description {
                    return Ok(Vec::new());
                }
                let data = ItemDescriptionSetData {
                    item_id: item.id,
                    description: description.clone(),
                };
                Ok(vec![PendingEvent::new(ITEM_DESCRIPTION_SET, &data)?])
            }
            TodoCommand::CheckItem {
                item_id, checked, ..
            } => {
                let item = self.item(*item_id)?;
                if item.completed == *checked {
                    return Ok(Vec::new());
                }
                let data = ItemCheckedData {
                    item_id: item.id,
                    checked: *checked,
                };
                Ok(vec![PendingEvent::new(ITEM_CHECKED, &data)?])
            }
            TodoCommand::CheckAllItems { checked, .. } => self
                .items
                .iter()
                .filter(|item| item.completed != *checked)
                .map(|item| {
                    PendingEvent::new(
                        ITEM_CHECKED,
                        &ItemCheckedData {
                            item_id: item.id,
                            checked: *checked,
                        },
                    )
                })
                .collect(),
        }
    }

    fn apply_event(&mut self, event: &Event) -> Result<()> {
        match &event.event_type {
            t if *t == CREATED => self.created = true,
            t if *t == DELETED => self.deleted = true,
            t if *t == ITEM_ADDED => {
                let data: ItemAddedData = decode(event)?;
                let item_id = data.item_id;
                self.next_item_id = item_id.checked_add(1).ok_or_else(|| AggregateError::Apply {
                    event_type: event.event_type.clone(),
                    reason: format!("item ID {item_id} exhausts the ID space"),
                })?;
                self.items.push(ItemState {
                    id: data.item_id,
                    description: data.description,
                    completed: false,
                });
            }
            t if *t == ITEM_REMOVED => {
                let data: ItemRemovedData = decode(event)?;
                self.items.retain(|item| item.id != data.item_id);
            }
            t if *t == ITEM_DESCRIPTION_SET => {
                let data: ItemDescriptionSetData = decode(event)?;
                self.item_mut(event, data.item_id)?.description = data.description;
            }
            t if *t == ITEM_CHECKED => {
                let data: ItemCheckedData = decode(event)?;
                self.item_mut(event, data.item_id)?.completed = data.checked;
            }
            _ => {
                return Err(AggregateError::Apply {
                    event_type: event.event_type.clone(),
                    reason: "unknown event type".to_string(),
                })
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Handles `command` and applies the resulting events, the way the
    /// command handler would after a successful save.
    fn execute(aggregate: &mut TodoAggregate, id: Uuid, command: TodoCommand) -> Vec<Event> {
        let pending = aggregate.handle_command(&command).unwrap();
        let events: Vec<Event> = pending
            .into_iter()
            .map(|p| Event::new(p.event_type, TODO_LIST, id, 0, p.data))
            .collect();
        for event in &events {
            aggregate.apply_event(event).unwrap();
        }
        events
    }

    fn created() -> (TodoAggregate, Uuid) {
        let id = Uuid::new_v4();
        let mut aggregate = TodoAggregate::default();
        execute(&mut aggregate, id, TodoCommand::Create { id });
        (aggregate, id)
    }

    fn add(aggregate: &mut TodoAggregate, id: Uuid, description: &str) {
        execute(
            aggregate,
            id,
            TodoCommand::AddItem {
                id,
                description: description.to_string(),
            },
        );
    }

    #[test]
    fn test_create_twice_is_rejected() {
        let (aggregate, id) = created();
        let err = aggregate.handle_command(&TodoCommand::Create { id }).unwrap_err();
        assert!(matches!(err, AggregateError::Rejected(_)));
    }

    #[test]
    fn test_commands_on_missing_list_are_rejected() {
        let id = Uuid::new_v4();
        let err = TodoAggregate::default()
            .handle_command(&TodoCommand::AddItem {
                id,
                description: "milk".to_string(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            AggregateError::Rejected("todo list does not exist".to_string())
        );
    }

    #[test]
    fn test_deleted_list_rejects_commands() {
        let (mut aggregate, id) = created();
        execute(&mut aggregate, id, TodoCommand::Delete { id });
        let err = aggregate.handle_command(&TodoCommand::Delete { id }).unwrap_err();
        assert_eq!(err, AggregateError::Rejected("todo list is deleted".to_string()));
    }

    #[test]
    fn test_item_ids_are_never_reused() {
        let (mut aggregate, id) = created();
        add(&mut aggregate, id, "milk");
        add(&mut aggregate, id, "eggs");
        execute(&mut aggregate, id, TodoCommand::RemoveItem { id, item_id: 1 });

        let events = execute(
            &mut aggregate,
            id,
            TodoCommand::AddItem {
                id,
                description: "bread".to_string(),
            },
        );
        let data: ItemAddedData = events[0].decode_data().unwrap();
        assert_eq!(data.item_id, 2);
    }

    #[test]
    fn test_empty_description_is_rejected() {
        let (aggregate, id) = created();
        let err = aggregate
            .handle_command(&TodoCommand::AddItem {
                id,
                description: "  ".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, AggregateError::Rejected(_)));
    }

    #[test]
    fn test_unchanged_state_produces_no_events() {
        let (mut aggregate, id) = created();
        add(&mut aggregate, id, "milk");

        let pending = aggregate
            .handle_command(&TodoCommand::CheckItem {
                id,
                item_id: 0,
                checked: false,
            })
            .unwrap();
        assert!(pending.is_empty());

        let pending = aggregate
            .handle_command(&TodoCommand::SetItemDescription {
                id,
                item_id: 0,
                description: "milk".to_string(),
            })
            .unwrap();
        assert!(pending.is_empty());
    }

    #[test]
    fn test_check_all_and_remove_completed() {
        let (mut aggregate, id) = created();
        add(&mut aggregate, id, "milk");
        add(&mut aggregate, id, "eggs");
        execute(
            &mut aggregate,
            id,
            TodoCommand::CheckItem {
                id,
                item_id: 0,
                checked: true,
            },
        );

        let events = execute(
            &mut aggregate,
            id,
            TodoCommand::CheckAllItems { id, checked: true },
        );
        assert_eq!(events.len(), 1);

        let events = execute(&mut aggregate, id, TodoCommand::RemoveCompleted { id });
        assert_eq!(events.len(), 2);
        assert!(aggregate.items.is_empty());
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let (aggregate, id) = created();
        let err = aggregate
            .handle_command(&TodoCommand::RemoveItem { id, item_id: 7 })
            .unwrap_err();
        assert_eq!(err, AggregateError::Rejected("item 7 does not exist".to_string()));
    }

    #[test]
    fn test_unknown_event_fails_to_apply() {
        let mut aggregate = TodoAggregate::default();
        let event = Event::new(
            readcache_core::event::EventType::from_static("todolist:archived"),
            TODO_LIST,
            Uuid::new_v4(),
            1,
            serde_json::Value::Null,
        );
        assert!(matches!(
            aggregate.apply_event(&event),
            Err(AggregateError::Apply { .. })
        ));
    }

    #[test]
    fn test_item_id_overflow_fails_to_apply() {
        let (mut aggregate, id) = created();
        let data = ItemAddedData {
            item_id: u32::MAX,
            description: "last".to_string(),
        };
        let event = Event::new(
            ITEM_ADDED,
            TODO_LIST,
            id,
            2,
            serde_json::to_value(&data).unwrap(),
        );

        let err = aggregate.apply_event(&event).unwrap_err();
        assert_eq!(
            err,
            AggregateError::Apply {
                event_type: ITEM_ADDED,
                reason: format!("item ID {} exhausts the ID space", u32::MAX),
            }
        );
        assert!(aggregate.items.is_empty());
    }
}
