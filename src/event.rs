use crate::{DropEffect, InsertPosition, ItemId, LayoutKind, WidgetType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A canvas event with timestamp and the revision it produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasEvent {
    pub timestamp: DateTime<Utc>,
    /// Canvas revision current after the event
    pub revision: u64,
    pub event: EventType,
}

impl CanvasEvent {
    pub fn new(revision: u64, event: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            revision,
            event,
        }
    }

    /// True if the event replaced the canvas items
    pub fn is_structural(&self) -> bool {
        !matches!(
            self.event,
            EventType::SelectionChanged { .. }
                | EventType::InsertPositionChanged { .. }
                | EventType::MutationSkipped { .. }
        )
    }
}

/// Types of events the store emits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventType {
    WidgetAdded {
        id: ItemId,
        widget_type: WidgetType,
    },

    SectionAdded {
        id: ItemId,
        layout: LayoutKind,
        index: usize,
    },

    ItemsReplaced {
        item_count: usize,
        widget_count: usize,
    },

    ItemMoved {
        id: ItemId,
        from: usize,
        to: usize,
    },

    WidgetDeleted {
        id: ItemId,
        section_id: Option<ItemId>,
    },

    WidgetDuplicated {
        source_id: ItemId,
        new_id: ItemId,
    },

    SelectionChanged {
        old: Option<ItemId>,
        new: Option<ItemId>,
    },

    InsertPositionChanged {
        position: Option<InsertPosition>,
    },

    DropApplied {
        effect: DropEffect,
    },

    Undone,

    Redone,

    DocumentImported {
        item_count: usize,
    },

    MutationSkipped {
        operation: String,
        reason: String,
    },
}
