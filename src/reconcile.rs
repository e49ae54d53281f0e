//! Drag-end reconciliation.
//!
//! Given the current items and a completed drag, compute the next item list.
//! Cases are checked in a fixed order and the first match wins:
//!
//! 1. no target: no-op
//! 2. library item onto a section area: new nested widget
//! 3. library item onto any other target: new standalone widget after the
//!    item under the pointer, or at the end
//! 4. standalone widget onto a section area: move into the area
//! 5. section widget onto a section area: move unless it is the same area
//! 6. section widget onto a section: move into its first area unless it is
//!    the same section
//! 7. section widget onto anything else: no-op
//! 8. top-level reorder by drag id
//!
//! Dropping onto the container a widget already lives in is always a no-op,
//! never a remove and reinsert.

use crate::index::{CanvasIndex, Location};
use crate::item::{move_element, position_of};
use crate::{DragSource, DropTarget, IdAllocator, Item, ItemId, LibraryItem, Skip, Widget};
use serde::{Deserialize, Serialize};

/// Structural change a drop produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DropEffect {
    InsertedIntoArea {
        widget_id: ItemId,
        section_id: ItemId,
        area_id: ItemId,
    },
    InsertedStandalone {
        widget_id: ItemId,
        index: usize,
    },
    MovedIntoArea {
        widget_id: ItemId,
        from_section: Option<ItemId>,
        section_id: ItemId,
        area_id: ItemId,
    },
    Reordered {
        id: ItemId,
        from: usize,
        to: usize,
    },
}

impl DropEffect {
    /// Widget created by the drop, if it instantiated one
    pub fn created_widget(&self) -> Option<ItemId> {
        match self {
            DropEffect::InsertedIntoArea { widget_id, .. }
            | DropEffect::InsertedStandalone { widget_id, .. } => Some(*widget_id),
            DropEffect::MovedIntoArea { .. } | DropEffect::Reordered { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    Apply { items: Vec<Item>, effect: DropEffect },
    NoOp(Skip),
}

/// Computes drop results. Holds only the id source and instantiation
/// defaults; the canvas itself is always passed in.
pub struct Reconciler<'a> {
    ids: &'a mut IdAllocator,
    default_skin: &'a str,
}

impl<'a> Reconciler<'a> {
    pub fn new(ids: &'a mut IdAllocator, default_skin: &'a str) -> Self {
        Self { ids, default_skin }
    }

    pub fn reconcile(
        &mut self,
        items: &[Item],
        source: &DragSource,
        target: Option<&DropTarget>,
    ) -> Reconciliation {
        let Some(target) = target else {
            return Reconciliation::NoOp(Skip::NoTarget);
        };

        match (source, target) {
            (
                DragSource::LibraryItem(entry),
                DropTarget::SectionArea {
                    section_id,
                    area_id,
                },
            ) => self.library_into_area(items, entry, *section_id, *area_id),

            (DragSource::LibraryItem(entry), _) => self.library_onto_canvas(items, entry, target),

            (
                DragSource::StandaloneWidget { widget_id },
                DropTarget::SectionArea {
                    section_id,
                    area_id,
                },
            ) => move_into_area(items, *widget_id, *section_id, *area_id),

            (
                DragSource::SectionWidget { widget_id, .. },
                DropTarget::SectionArea {
                    section_id,
                    area_id,
                },
            ) => move_into_area(items, *widget_id, *section_id, *area_id),

            (DragSource::SectionWidget { widget_id, .. }, DropTarget::Section { section_id }) => {
                let index = CanvasIndex::build(items);
                if index.locate(*widget_id).and_then(|l| l.section_id()) == Some(*section_id) {
                    return Reconciliation::NoOp(Skip::SameContainer);
                }
                let first_area = position_of(items, *section_id)
                    .and_then(|i| items[i].as_section())
                    .and_then(|s| s.first_area())
                    .map(|a| a.id);
                match first_area {
                    Some(area_id) => move_into_area(items, *widget_id, *section_id, area_id),
                    None => Reconciliation::NoOp(Skip::NotFound(*section_id)),
                }
            }

            (DragSource::SectionWidget { .. }, _) => Reconciliation::NoOp(Skip::InvalidTarget),

            (
                DragSource::StandaloneWidget { .. } | DragSource::TopLevelItem { .. },
                DropTarget::CanvasItem { .. } | DropTarget::Section { .. },
            ) => reorder(items, source, target),

            (DragSource::StandaloneWidget { .. } | DragSource::TopLevelItem { .. }, _) => {
                Reconciliation::NoOp(Skip::InvalidTarget)
            }
        }
    }

    fn library_into_area(
        &mut self,
        items: &[Item],
        entry: &LibraryItem,
        section_id: ItemId,
        area_id: ItemId,
    ) -> Reconciliation {
        let Some(section_index) = position_of(items, section_id) else {
            return Reconciliation::NoOp(Skip::NotFound(section_id));
        };
        let has_area = items[section_index]
            .as_section()
            .is_some_and(|s| s.area(area_id).is_some());
        if !has_area {
            return Reconciliation::NoOp(Skip::NotFound(area_id));
        }

        let widget = entry.instantiate(self.ids.next_id(), Some(section_id), self.default_skin);
        let widget_id = widget.id;

        let mut next = items.to_vec();
        if let Some(area) = next[section_index]
            .as_section_mut()
            .and_then(|s| s.area_mut(area_id))
        {
            area.widgets.push(widget);
        }

        Reconciliation::Apply {
            items: next,
            effect: DropEffect::InsertedIntoArea {
                widget_id,
                section_id,
                area_id,
            },
        }
    }

    fn library_onto_canvas(
        &mut self,
        items: &[Item],
        entry: &LibraryItem,
        target: &DropTarget,
    ) -> Reconciliation {
        let anchor = match target {
            DropTarget::CanvasItem { drag_id } => position_of(items, drag_id.item_id()),
            DropTarget::Section { section_id } => position_of(items, *section_id),
            DropTarget::SectionArea { .. } | DropTarget::Canvas => None,
        };
        let index = anchor.map_or(items.len(), |i| i + 1);

        let widget = entry.instantiate(self.ids.next_id(), None, self.default_skin);
        let widget_id = widget.id;

        let mut next = items.to_vec();
        next.insert(index, Item::Widget(widget));

        Reconciliation::Apply {
            items: next,
            effect: DropEffect::InsertedStandalone { widget_id, index },
        }
    }
}

/// Take a widget out of wherever it lives and append it to a section area.
/// Both containers change in the same new list.
fn move_into_area(
    items: &[Item],
    widget_id: ItemId,
    section_id: ItemId,
    area_id: ItemId,
) -> Reconciliation {
    let index = CanvasIndex::build(items);

    let Some(from) = index.locate(widget_id) else {
        return Reconciliation::NoOp(Skip::NotFound(widget_id));
    };
    if matches!(from, Location::Nested { area_id: current, .. } if current == area_id) {
        return Reconciliation::NoOp(Skip::SameContainer);
    }
    let target_ok = matches!(
        index.locate(area_id),
        Some(Location::Area { section_id: owner, .. }) if owner == section_id
    );
    if !target_ok {
        return Reconciliation::NoOp(Skip::NotFound(area_id));
    }

    let mut next = items.to_vec();
    let mut widget: Widget = match from {
        Location::TopLevel { index } => match next.remove(index) {
            Item::Widget(widget) => widget,
            // Sections never nest
            Item::Section(_) => return Reconciliation::NoOp(Skip::InvalidTarget),
        },
        Location::Nested {
            section_index,
            area_index,
            index,
            ..
        } => match next[section_index].as_section_mut() {
            Some(section) => section.areas[area_index].widgets.remove(index),
            None => return Reconciliation::NoOp(Skip::NotFound(widget_id)),
        },
        Location::Area { .. } => return Reconciliation::NoOp(Skip::InvalidTarget),
    };

    widget.section_id = Some(section_id);

    let Some(area) = next
        .iter_mut()
        .filter_map(Item::as_section_mut)
        .find(|s| s.id == section_id)
        .and_then(|s| s.area_mut(area_id))
    else {
        return Reconciliation::NoOp(Skip::NotFound(area_id));
    };
    area.widgets.push(widget);

    Reconciliation::Apply {
        items: next,
        effect: DropEffect::MovedIntoArea {
            widget_id,
            from_section: from.section_id(),
            section_id,
            area_id,
        },
    }
}

fn reorder(items: &[Item], source: &DragSource, target: &DropTarget) -> Reconciliation {
    let active = source.drag_id().map(|d| d.item_id());
    let over = match target {
        DropTarget::CanvasItem { drag_id } => Some(drag_id.item_id()),
        DropTarget::Section { section_id } => Some(*section_id),
        DropTarget::SectionArea { .. } | DropTarget::Canvas => None,
    };

    let (Some(active), Some(over)) = (active, over) else {
        return Reconciliation::NoOp(Skip::InvalidTarget);
    };
    let Some(from) = position_of(items, active) else {
        return Reconciliation::NoOp(Skip::NotFound(active));
    };
    let Some(to) = position_of(items, over) else {
        return Reconciliation::NoOp(Skip::NotFound(over));
    };
    if from == to {
        return Reconciliation::NoOp(Skip::SamePosition);
    }

    let mut next = items.to_vec();
    move_element(&mut next, from, to);

    Reconciliation::Apply {
        items: next,
        effect: DropEffect::Reordered {
            id: active,
            from,
            to,
        },
    }
}
