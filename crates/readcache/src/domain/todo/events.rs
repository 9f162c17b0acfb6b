use serde::{Deserialize, Serialize};

use readcache_core::event::{AggregateType, EventType};

/// Aggregate type of todo lists.
pub const TODO_LIST: AggregateType = AggregateType::from_static("todolist");

pub const CREATED: EventType = EventType::from_static("todolist:created");
pub const DELETED: EventType = EventType::from_static("todolist:deleted");
pub const ITEM_ADDED: EventType = EventType::from_static("todolist:item_added");
pub const ITEM_REMOVED: EventType = EventType::from_static("todolist:item_removed");
pub const ITEM_DESCRIPTION_SET: EventType =
    EventType::from_static("todolist:item_description_set");
pub const ITEM_CHECKED: EventType = EventType::from_static("todolist:item_checked");

/// Every event type that changes a todo list read model.
pub fn all_event_types() -> Vec<EventType> {
    vec![
        CREATED,
        DELETED,
        ITEM_ADDED,
        ITEM_REMOVED,
        ITEM_DESCRIPTION_SET,
        ITEM_CHECKED,
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAddedData {
    pub item_id: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemovedData {
    pub item_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptionSetData {
    pub item_id: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCheckedData {
    pub item_id: u32,
    pub checked: bool,
}
