// Page Composer - Core Library

pub mod canvas;
pub mod catalog;
pub mod collision;
pub mod composer;
pub mod config;
pub mod document;
pub mod drag;
pub mod event;
pub mod id_allocator;
pub mod index;
pub mod item;
pub mod layout;
pub mod outcome;
pub mod reconcile;
pub mod validation;

// Re-export main types for convenience
pub use canvas::{CanvasObserver, CanvasStore, Snapshot, SubscriptionId};
pub use catalog::{Catalog, LibraryItem};
pub use collision::{resolve_collision, DropCandidate, Point, Rect};
pub use composer::Composer;
pub use config::ComposerConfig;
pub use document::{PageDocument, DOCUMENT_VERSION};
pub use drag::{
    DragEvent, DragId, DragKind, DragMachine, DragSource, DragState, DragTransition, DropTarget,
};
pub use event::{CanvasEvent, EventType};
pub use id_allocator::{IdAllocator, ItemId};
pub use index::{CanvasIndex, Location};
pub use item::{Area, Item, Section, Widget, WidgetType};
pub use layout::{InsertPosition, LayoutFactory, LayoutKind, Placement};
pub use outcome::{Outcome, Skip};
pub use reconcile::{DropEffect, Reconciler, Reconciliation};
pub use validation::{
    ValidatedCanvas, ValidationIssue, ValidationIssueType, ValidationResult, ValidationSeverity,
    Validator,
};
