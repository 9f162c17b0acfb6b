use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use readcache_core::entity::Entity;

/// Read model of a todo list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoList {
    pub id: Uuid,
    /// Version of the last event projected into this list.
    pub version: u64,
    pub items: Vec<TodoItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: u32,
    pub description: String,
    pub completed: bool,
}

impl TodoList {
    pub fn item(&self, item_id: u32) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: u32) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// Number of items not yet completed.
    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }
}

impl Entity for TodoList {
    fn entity_id(&self) -> Uuid {
        self.id
    }
}
