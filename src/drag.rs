//! Drag descriptors and the drag lifecycle state machine.
//!
//! A drag is classified once, at drag start, into a [`DragSource`]. While the
//! pointer moves, `Over` events only change which [`DropTarget`] is
//! highlighted. The document is touched exactly once, when `End` hands the
//! completed `(source, target)` pair to the reconciliation engine.
//!
//! ## Invariants
//!
//! 1. A drag is `Start`, zero or more `Over`, then `End` or `Cancel`.
//! 2. `Over`, `End` and `Cancel` while idle are ignored.
//! 3. `End` without a resolved target produces a drop with no target, which
//!    reconciles to a no-op.

use crate::collision::{resolve_collision, DropCandidate, Point};
use crate::index::{CanvasIndex, Location};
use crate::{Item, ItemId, LibraryItem};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

const STANDALONE_PREFIX: &str = "canvas-widget-";

/// Identifier a top-level sortable carries while dragged.
///
/// Standalone widgets get a synthetic id distinct from their item id so the
/// host can tell a canvas slot apart from the widget's own droppable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragId {
    Item(ItemId),
    StandaloneWidget(ItemId),
}

impl DragId {
    /// The real item id behind this drag id
    pub fn item_id(&self) -> ItemId {
        match self {
            DragId::Item(id) | DragId::StandaloneWidget(id) => *id,
        }
    }
}

impl fmt::Display for DragId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragId::Item(id) => write!(f, "{}", id),
            DragId::StandaloneWidget(id) => write!(f, "{}{}", STANDALONE_PREFIX, id),
        }
    }
}

impl FromStr for DragId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(STANDALONE_PREFIX) {
            Some(rest) => Ulid::from_string(rest).map(DragId::StandaloneWidget),
            None => Ulid::from_string(s).map(DragId::Item),
        }
    }
}

/// What is being dragged, classified at drag start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DragSource {
    /// Catalog entry, not yet instantiated
    LibraryItem(LibraryItem),

    /// Widget at canvas top level
    StandaloneWidget { widget_id: ItemId },

    /// Widget inside a section area
    SectionWidget {
        widget_id: ItemId,
        section_id: ItemId,
        area_id: ItemId,
    },

    /// Section or other top-level sortable, reorder only
    TopLevelItem { drag_id: DragId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragKind {
    LibraryItem,
    StandaloneWidget,
    SectionWidget,
    TopLevelItem,
}

impl DragSource {
    pub fn kind(&self) -> DragKind {
        match self {
            DragSource::LibraryItem(_) => DragKind::LibraryItem,
            DragSource::StandaloneWidget { .. } => DragKind::StandaloneWidget,
            DragSource::SectionWidget { .. } => DragKind::SectionWidget,
            DragSource::TopLevelItem { .. } => DragKind::TopLevelItem,
        }
    }

    /// Drag id used when this source takes part in top-level sorting
    pub fn drag_id(&self) -> Option<DragId> {
        match self {
            DragSource::StandaloneWidget { widget_id } => {
                Some(DragId::StandaloneWidget(*widget_id))
            }
            DragSource::TopLevelItem { drag_id } => Some(*drag_id),
            DragSource::LibraryItem(_) | DragSource::SectionWidget { .. } => None,
        }
    }

    /// Describe a drag of an existing canvas id
    pub fn classify(items: &[Item], id: ItemId) -> Option<DragSource> {
        match CanvasIndex::build(items).locate(id)? {
            Location::TopLevel { index } => Some(match &items[index] {
                Item::Widget(widget) => DragSource::StandaloneWidget {
                    widget_id: widget.id,
                },
                Item::Section(section) => DragSource::TopLevelItem {
                    drag_id: DragId::Item(section.id),
                },
            }),
            Location::Nested {
                section_id,
                area_id,
                ..
            } => Some(DragSource::SectionWidget {
                widget_id: id,
                section_id,
                area_id,
            }),
            // Areas are fixed parts of their section
            Location::Area { .. } => None,
        }
    }
}

/// Region a drag can be released over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    /// A specific area inside a section
    SectionArea { section_id: ItemId, area_id: ItemId },

    /// A section's outer boundary, no area given
    Section { section_id: ItemId },

    /// A top-level sortable slot
    CanvasItem { drag_id: DragId },

    /// The bare canvas drop zone
    Canvas,
}

impl DropTarget {
    pub fn is_section_area(&self) -> bool {
        matches!(self, DropTarget::SectionArea { .. })
    }
}

/// Drag lifecycle state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { source: DragSource },
    Resolving { source: DragSource, target: DropTarget },
}

/// Discrete events the host feeds into the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Start(DragSource),
    Over {
        pointer: Point,
        candidates: Vec<DropCandidate>,
    },
    End,
    Cancel,
}

/// What the host should do after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum DragTransition {
    /// Nothing changed
    Ignored,
    Started,
    /// Highlighted target for this frame
    Highlight(Option<DropTarget>),
    /// The drag finished; reconcile this pair
    Drop {
        source: DragSource,
        target: Option<DropTarget>,
    },
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn source(&self) -> Option<&DragSource> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { source } | DragState::Resolving { source, .. } => Some(source),
        }
    }

    /// Currently highlighted target, if any
    pub fn highlighted(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Resolving { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: DragEvent) -> DragTransition {
        let state = std::mem::take(&mut self.state);

        let (next, transition) = match (state, event) {
            (previous, DragEvent::Start(source)) => {
                if previous != DragState::Idle {
                    tracing::warn!("drag started while another was active; restarting");
                }
                (DragState::Dragging { source }, DragTransition::Started)
            }

            (DragState::Idle, _) => (DragState::Idle, DragTransition::Ignored),

            (
                DragState::Dragging { source } | DragState::Resolving { source, .. },
                DragEvent::Over {
                    pointer,
                    candidates,
                },
            ) => match resolve_collision(pointer, &candidates) {
                Some(target) => (
                    DragState::Resolving {
                        source,
                        target: target.clone(),
                    },
                    DragTransition::Highlight(Some(target)),
                ),
                None => (DragState::Dragging { source }, DragTransition::Highlight(None)),
            },

            (DragState::Dragging { source }, DragEvent::End) => (
                DragState::Idle,
                DragTransition::Drop {
                    source,
                    target: None,
                },
            ),

            (DragState::Resolving { source, target }, DragEvent::End) => (
                DragState::Idle,
                DragTransition::Drop {
                    source,
                    target: Some(target),
                },
            ),

            (_, DragEvent::Cancel) => (DragState::Idle, DragTransition::Cancelled),
        };

        self.state = next;
        transition
    }
}
