use uuid::Uuid;

use readcache_core::aggregate::Command;

/// Commands accepted by the todo list aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoCommand {
    Create { id: Uuid },
    Delete { id: Uuid },
    AddItem { id: Uuid, description: String },
    RemoveItem { id: Uuid, item_id: u32 },
    RemoveCompleted { id: Uuid },
    SetItemDescription { id: Uuid, item_id: u32, description: String },
    CheckItem { id: Uuid, item_id: u32, checked: bool },
    CheckAllItems { id: Uuid, checked: bool },
}

impl Command for TodoCommand {
    fn aggregate_id(&self) -> Uuid {
        match self {
            Self::Create { id }
            | Self::Delete { id }
            | Self::AddItem { id, .. }
            | Self::RemoveItem { id, .. }
            | Self::RemoveCompleted { id }
            | Self::SetItemDescription { id, .. }
            | Self::CheckItem { id, .. }
            | Self::CheckAllItems { id, .. } => *id,
        }
    }

    fn command_type(&self) -> &'static str {
        match self {
            Self::Create { .. } => "Create",
            Self::Delete { .. } => "Delete",
            Self::AddItem { .. } => "AddItem",
            Self::RemoveItem { .. } => "RemoveItem",
            Self::RemoveCompleted { .. } => "RemoveCompleted",
            Self::SetItemDescription { .. } => "SetItemDescription",
            Self::CheckItem { .. } => "CheckItem",
            Self::CheckAllItems { .. } => "CheckAllItems",
        }
    }
}
