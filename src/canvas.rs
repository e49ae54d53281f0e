use crate::index::{CanvasIndex, Location};
use crate::item::{move_element, normalize_back_references, total_widgets};
use crate::{
    CanvasEvent, ComposerConfig, DragSource, DropTarget, EventType, IdAllocator, InsertPosition,
    Item, ItemId, LayoutFactory, LayoutKind, Outcome, PageDocument, Reconciler, Reconciliation,
    Section, Skip, Validator, Widget,
};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

/// Immutable view of the top-level items at one revision
pub type Snapshot = Arc<Vec<Item>>;

pub type SubscriptionId = u64;

/// Receives every event the store emits, with the items current after it
pub trait CanvasObserver {
    fn on_canvas_event(&mut self, event: &CanvasEvent, items: &Snapshot);
}

impl<F> CanvasObserver for F
where
    F: FnMut(&CanvasEvent, &Snapshot),
{
    fn on_canvas_event(&mut self, event: &CanvasEvent, items: &Snapshot) {
        self(event, items)
    }
}

/// Authoritative container of the page's top-level items plus transient
/// UI state. Every structural change builds a new item list and swaps it
/// in through a single checkpoint.
pub struct CanvasStore {
    /// Current top-level items
    items: Snapshot,

    /// Location of every id in `items`
    index: CanvasIndex,

    /// Bumped on every swap
    revision: u64,

    selected: Option<ItemId>,

    /// Where the next layout section goes
    insert_position: Option<InsertPosition>,

    ids: IdAllocator,

    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,

    /// Event log for history tracking
    events: Vec<CanvasEvent>,

    observers: Vec<(SubscriptionId, Box<dyn CanvasObserver>)>,
    next_subscription: SubscriptionId,

    config: ComposerConfig,
}

impl CanvasStore {
    pub fn new() -> Self {
        Self::with_config(ComposerConfig::default())
    }

    pub fn with_config(config: ComposerConfig) -> Self {
        Self {
            items: Arc::new(Vec::new()),
            index: CanvasIndex::default(),
            revision: 0,
            selected: None,
            insert_position: None,
            ids: IdAllocator::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            events: Vec::new(),
            observers: Vec::new(),
            next_subscription: 0,
            config,
        }
    }

    // ========== Queries ==========

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Shared handle to the current items; stays valid across later swaps
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.items)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn widget_count(&self) -> usize {
        total_widgets(&self.items)
    }

    /// Selection as set, possibly stale
    pub fn selected_widget(&self) -> Option<ItemId> {
        self.selected
    }

    /// Selection if it still names something on the canvas
    pub fn selected_item(&self) -> Option<ItemId> {
        self.selected.filter(|id| self.index.contains(*id))
    }

    pub fn insert_position(&self) -> Option<InsertPosition> {
        self.insert_position
    }

    pub fn locate(&self, id: ItemId) -> Option<Location> {
        self.index.locate(id)
    }

    pub fn find_widget(&self, id: ItemId) -> Option<&Widget> {
        match self.index.locate(id)? {
            Location::TopLevel { index } => self.items.get(index)?.as_widget(),
            Location::Nested {
                section_index,
                area_index,
                index,
                ..
            } => self
                .items
                .get(section_index)?
                .as_section()?
                .areas
                .get(area_index)?
                .widgets
                .get(index),
            Location::Area { .. } => None,
        }
    }

    pub fn find_section(&self, id: ItemId) -> Option<&Section> {
        match self.index.locate(id)? {
            Location::TopLevel { index } => self.items.get(index)?.as_section(),
            _ => None,
        }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Mint an id for an item the caller builds itself
    pub fn next_id(&mut self) -> ItemId {
        self.ids.next_id()
    }

    // ========== Structural Operations ==========

    /// Append a standalone widget
    pub fn add_widget(&mut self, widget: Widget) -> Outcome {
        if self.index.contains(widget.id) {
            return self.skipped("add_widget", Skip::DuplicateId(widget.id));
        }

        let event = EventType::WidgetAdded {
            id: widget.id,
            widget_type: widget.widget_type,
        };
        let mut next = self.items.to_vec();
        next.push(Item::Widget(widget));

        self.apply("add_widget", next, event, Outcome::Applied)
    }

    /// Append a fully-formed section
    pub fn add_section(&mut self, section: Section) -> Outcome {
        if self.index.contains(section.id) {
            return self.skipped("add_section", Skip::DuplicateId(section.id));
        }

        let event = EventType::SectionAdded {
            id: section.id,
            layout: section.layout,
            index: self.items.len(),
        };
        let mut next = self.items.to_vec();
        next.push(Item::Section(section));

        self.apply("add_section", next, event, Outcome::Applied)
    }

    /// Replace the whole top-level list
    pub fn replace_canvas_items(&mut self, items: Vec<Item>) -> Outcome {
        let event = EventType::ItemsReplaced {
            item_count: items.len(),
            widget_count: total_widgets(&items),
        };
        self.apply("replace_canvas_items", items, event, Outcome::Applied)
    }

    /// Move the top-level item at `from` to `to`
    pub fn move_item(&mut self, from: usize, to: usize) -> Outcome {
        let len = self.items.len();
        if from >= len || to >= len {
            return self.skipped("move_item", Skip::IndexOutOfRange { from, to, len });
        }
        if from == to {
            return self.skipped("move_item", Skip::SamePosition);
        }

        let id = self.items[from].id();
        let mut next = self.items.to_vec();
        move_element(&mut next, from, to);

        self.apply("move_item", next, EventType::ItemMoved { id, from, to }, Outcome::Applied)
    }

    /// Remove a widget wherever it lives. A top-level section id removes the
    /// section with everything in it.
    pub fn delete_widget(&mut self, id: ItemId) -> Outcome {
        let mut next = self.items.to_vec();

        let section_id = match self.index.locate(id) {
            Some(Location::TopLevel { index }) => {
                next.remove(index);
                None
            }
            Some(Location::Nested {
                section_id,
                section_index,
                area_index,
                index,
                ..
            }) => {
                if let Some(section) = next[section_index].as_section_mut() {
                    section.areas[area_index].widgets.remove(index);
                }
                Some(section_id)
            }
            Some(Location::Area { .. }) => {
                return self.skipped("delete_widget", Skip::NotAWidget(id));
            }
            None => return self.skipped("delete_widget", Skip::NotFound(id)),
        };

        let outcome = self.apply(
            "delete_widget",
            next,
            EventType::WidgetDeleted { id, section_id },
            Outcome::Applied,
        );

        // Selection must not outlive what it pointed at
        if outcome.is_applied() {
            if let Some(selected) = self.selected {
                if selected == id || !self.index.contains(selected) {
                    self.select_widget(None);
                }
            }
        }

        outcome
    }

    /// Clone a widget under a fresh id, right after the original
    pub fn duplicate_widget(&mut self, id: ItemId) -> Outcome {
        let Some(original) = self.find_widget(id).cloned() else {
            let skip = match self.index.locate(id) {
                Some(_) => Skip::NotAWidget(id),
                None => Skip::NotFound(id),
            };
            return self.skipped("duplicate_widget", skip);
        };

        let copy = original.duplicate(self.ids.next_id());
        let new_id = copy.id;
        let mut next = self.items.to_vec();

        match self.index.locate(id) {
            Some(Location::TopLevel { index }) => next.insert(index + 1, Item::Widget(copy)),
            Some(Location::Nested {
                section_index,
                area_index,
                index,
                ..
            }) => {
                if let Some(section) = next[section_index].as_section_mut() {
                    section.areas[area_index].widgets.insert(index + 1, copy);
                }
            }
            _ => return self.skipped("duplicate_widget", Skip::NotFound(id)),
        }

        self.apply(
            "duplicate_widget",
            next,
            EventType::WidgetDuplicated {
                source_id: id,
                new_id,
            },
            Outcome::Created(new_id),
        )
    }

    /// Build a section for `layout` and splice it at the pending insert
    /// position, or at the end. The insert position is consumed.
    pub fn create_section_with_layout(&mut self, layout: LayoutKind) -> Outcome {
        let section = LayoutFactory::create_section(layout, &mut self.ids);
        let id = section.id;

        let position = self.insert_position.take();
        let (next, index) = LayoutFactory::splice_section(&self.items, section, position);

        let outcome = self.apply(
            "create_section_with_layout",
            next,
            EventType::SectionAdded { id, layout, index },
            Outcome::Created(id),
        );

        if outcome.is_applied() {
            if position.is_some() {
                self.emit(EventType::InsertPositionChanged { position: None });
            }
        } else {
            self.insert_position = position;
        }

        outcome
    }

    /// Reconcile a finished drag against the current items
    pub fn apply_drop(&mut self, source: &DragSource, target: Option<&DropTarget>) -> Outcome {
        let result = Reconciler::new(&mut self.ids, &self.config.default_skin).reconcile(
            &self.items,
            source,
            target,
        );

        match result {
            Reconciliation::NoOp(skip) => self.skipped("drop", skip),
            Reconciliation::Apply { items, effect } => {
                let outcome = effect
                    .created_widget()
                    .map_or(Outcome::Applied, Outcome::Created);
                self.apply("drop", items, EventType::DropApplied { effect }, outcome)
            }
        }
    }

    // ========== Transient State ==========

    /// Set or clear the selection. Existence is not checked.
    pub fn select_widget(&mut self, id: Option<ItemId>) {
        if self.selected == id {
            return;
        }
        let old = std::mem::replace(&mut self.selected, id);
        self.emit(EventType::SelectionChanged { old, new: id });
    }

    pub fn set_insert_position(&mut self, position: Option<InsertPosition>) {
        self.insert_position = position;
        self.emit(EventType::InsertPositionChanged { position });
    }

    // ========== History ==========

    pub fn undo(&mut self) -> Outcome {
        let Some(previous) = self.undo_stack.pop() else {
            return self.skipped("undo", Skip::NothingToUndo);
        };
        let current = std::mem::replace(&mut self.items, previous);
        self.redo_stack.push(current);
        self.reindex();
        self.emit(EventType::Undone);
        Outcome::Applied
    }

    pub fn redo(&mut self) -> Outcome {
        let Some(next) = self.redo_stack.pop() else {
            return self.skipped("redo", Skip::NothingToRedo);
        };
        let current = std::mem::replace(&mut self.items, next);
        self.push_undo(current);
        self.reindex();
        self.emit(EventType::Redone);
        Outcome::Applied
    }

    // ========== Import / Export ==========

    pub fn export_document(&self) -> PageDocument {
        PageDocument::new(self.items.to_vec())
    }

    pub fn export_json(&self) -> Result<String> {
        self.export_document().to_json()
    }

    /// Replace the canvas with a document's items. Parse failures are
    /// errors; structurally invalid documents are skipped like any other
    /// rejected replacement.
    pub fn import_document(&mut self, json: &str) -> Result<Outcome> {
        let document = PageDocument::from_json(json)?;

        // New ids must sort after everything the document brings in
        for id in CanvasIndex::build(&document.items).ids() {
            self.ids.observe(id);
        }

        let event = EventType::DocumentImported {
            item_count: document.items.len(),
        };
        Ok(self.apply("import_document", document.items, event, Outcome::Applied))
    }

    // ========== Observers ==========

    pub fn subscribe(&mut self, observer: impl CanvasObserver + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    // ========== Event Logging ==========

    pub fn events(&self) -> &[CanvasEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    // ========== Checkpoint ==========

    /// The one place the item list is replaced
    fn commit(&mut self, mut items: Vec<Item>) -> std::result::Result<(), Skip> {
        normalize_back_references(&mut items);

        let validation = Validator::validate_items(&items);
        if validation.has_errors() {
            return Err(Skip::Invalid(validation.summary()));
        }

        let previous = std::mem::replace(&mut self.items, Arc::new(items));
        self.push_undo(previous);
        self.redo_stack.clear();
        self.reindex();
        Ok(())
    }

    fn apply(
        &mut self,
        operation: &str,
        items: Vec<Item>,
        event: EventType,
        outcome: Outcome,
    ) -> Outcome {
        match self.commit(items) {
            Ok(()) => {
                tracing::info!(operation, revision = self.revision, "canvas updated");
                self.emit(event);
                outcome
            }
            Err(skip) => self.skipped(operation, skip),
        }
    }

    fn reindex(&mut self) {
        self.index = CanvasIndex::build(&self.items);
        self.revision += 1;
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        if self.config.history_limit == 0 {
            return;
        }
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.config.history_limit {
            let excess = self.undo_stack.len() - self.config.history_limit;
            self.undo_stack.drain(..excess);
        }
    }

    fn skipped(&mut self, operation: &str, skip: Skip) -> Outcome {
        match &skip {
            Skip::Invalid(_) | Skip::DuplicateId(_) | Skip::IndexOutOfRange { .. } => {
                tracing::warn!(operation, "ignored: {}", skip)
            }
            _ => tracing::debug!(operation, "no-op: {}", skip),
        }

        self.emit(EventType::MutationSkipped {
            operation: operation.to_string(),
            reason: skip.to_string(),
        });
        Outcome::Skipped(skip)
    }

    fn emit(&mut self, event: EventType) {
        let event = CanvasEvent::new(self.revision, event);

        for (_, observer) in self.observers.iter_mut() {
            observer.on_canvas_event(&event, &self.items);
        }

        self.events.push(event);
        if self.events.len() > self.config.event_log_limit {
            let excess = self.events.len() - self.config.event_log_limit;
            self.events.drain(..excess);
        }
    }

    // ========== Utility Methods ==========

    /// Indented text tree of the canvas, one line per node
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for item in self.items.iter() {
            match item {
                Item::Widget(widget) => {
                    out.push_str(&format!("- {} [{}]\n", widget.widget_type.label(), widget.id));
                }
                Item::Section(section) => {
                    out.push_str(&format!("+ {} ({})\n", section.name, section.layout));
                    for area in &section.areas {
                        out.push_str(&format!("  | {}\n", area.name));
                        for widget in &area.widgets {
                            out.push_str(&format!(
                                "  |   - {} [{}]\n",
                                widget.widget_type.label(),
                                widget.id
                            ));
                        }
                    }
                }
            }
        }
        out
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CanvasStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasStore")
            .field("items", &self.items)
            .field("revision", &self.revision)
            .field("selected", &self.selected)
            .field("insert_position", &self.insert_position)
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
