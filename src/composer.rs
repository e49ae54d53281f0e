use crate::collision::{DropCandidate, Point};
use crate::{
    CanvasStore, Catalog, ComposerConfig, DragEvent, DragMachine, DragSource, DragState,
    DragTransition, DropTarget, ItemId, Outcome, Skip, WidgetType,
};

/// Page composer: one canvas store, the widget library it draws from and
/// the drag session in flight.
#[derive(Debug)]
pub struct Composer {
    store: CanvasStore,
    drag: DragMachine,
    catalog: Catalog,
}

impl Composer {
    pub fn new(config: ComposerConfig) -> Self {
        Self::with_catalog(config, Catalog::standard())
    }

    pub fn with_catalog(config: ComposerConfig, catalog: Catalog) -> Self {
        Self {
            store: CanvasStore::with_config(config),
            drag: DragMachine::new(),
            catalog,
        }
    }

    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CanvasStore {
        &mut self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    // ========== Drag Lifecycle ==========

    pub fn on_drag_start(&mut self, source: DragSource) {
        tracing::debug!(kind = ?source.kind(), "drag started");
        self.drag.handle(DragEvent::Start(source));
    }

    /// Start dragging the library entry for `widget_type`
    pub fn start_library_drag(&mut self, widget_type: WidgetType) -> bool {
        match self.catalog.get(widget_type).cloned() {
            Some(entry) => {
                self.on_drag_start(DragSource::LibraryItem(entry));
                true
            }
            None => false,
        }
    }

    /// Start dragging something already on the canvas
    pub fn start_canvas_drag(&mut self, id: ItemId) -> bool {
        match DragSource::classify(self.store.items(), id) {
            Some(source) => {
                self.on_drag_start(source);
                true
            }
            None => false,
        }
    }

    /// Pointer moved; returns the target to highlight
    pub fn on_drag_over(
        &mut self,
        pointer: Point,
        candidates: Vec<DropCandidate>,
    ) -> Option<DropTarget> {
        match self.drag.handle(DragEvent::Over {
            pointer,
            candidates,
        }) {
            DragTransition::Highlight(target) => target,
            _ => None,
        }
    }

    /// Release; reconciles the drag against the store
    pub fn on_drag_end(&mut self) -> Outcome {
        match self.drag.handle(DragEvent::End) {
            DragTransition::Drop { source, target } => {
                self.store.apply_drop(&source, target.as_ref())
            }
            _ => {
                tracing::debug!("drag end without an active drag");
                Outcome::Skipped(Skip::NoTarget)
            }
        }
    }

    pub fn on_drag_cancel(&mut self) {
        if let DragTransition::Cancelled = self.drag.handle(DragEvent::Cancel) {
            tracing::debug!("drag cancelled");
        }
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(ComposerConfig::default())
    }
}
