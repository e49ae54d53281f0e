// Helper functions to build test pages with various configurations

#![allow(dead_code)]

use page_composer::{
    CanvasStore, DropCandidate, DropTarget, Item, ItemId, LayoutKind, Rect, Widget, WidgetType,
};

/// Canvas with one section of the given layout. Returns the section id and
/// its area ids in order.
pub fn create_section_page(layout: LayoutKind) -> (CanvasStore, ItemId, Vec<ItemId>) {
    let mut store = CanvasStore::new();
    let section_id = store
        .create_section_with_layout(layout)
        .created_id()
        .unwrap();
    let areas = area_ids(&store, section_id);
    (store, section_id, areas)
}

/// Canvas with a standalone text widget followed by a two-column section
pub fn create_standalone_and_section_page() -> (CanvasStore, ItemId, ItemId, Vec<ItemId>) {
    let (mut store, section_id, areas) = create_section_page(LayoutKind::TwoColumns);
    let widget = standalone(&mut store, WidgetType::Text);
    store.move_item(1, 0);
    (store, widget, section_id, areas)
}

/// Canvas with two single-column sections; the first holds one widget
pub fn create_two_section_page() -> (CanvasStore, ItemId, ItemId, ItemId) {
    let mut store = CanvasStore::new();
    let first = store
        .create_section_with_layout(LayoutKind::SingleColumn)
        .created_id()
        .unwrap();
    let second = store
        .create_section_with_layout(LayoutKind::TwoColumns)
        .created_id()
        .unwrap();

    let area = area_ids(&store, first)[0];
    let widget = nested(&mut store, first, area, WidgetType::Image);
    (store, widget, first, second)
}

/// Append a standalone widget built from a fresh id
pub fn standalone(store: &mut CanvasStore, widget_type: WidgetType) -> ItemId {
    let id = store.next_id();
    store.add_widget(Widget::new(id, widget_type, "default"));
    id
}

/// Put a widget straight into a section area through a full replacement
pub fn nested(
    store: &mut CanvasStore,
    section_id: ItemId,
    area_id: ItemId,
    widget_type: WidgetType,
) -> ItemId {
    let id = store.next_id();
    let mut items = store.items().to_vec();
    for item in items.iter_mut() {
        if let Item::Section(section) = item {
            if section.id == section_id {
                if let Some(area) = section.area_mut(area_id) {
                    area.widgets.push(Widget::new(id, widget_type, "default"));
                }
            }
        }
    }
    store.replace_canvas_items(items);
    id
}

pub fn area_ids(store: &CanvasStore, section_id: ItemId) -> Vec<ItemId> {
    store
        .find_section(section_id)
        .map(|s| s.areas.iter().map(|a| a.id).collect())
        .unwrap_or_default()
}

/// One candidate per area, laid side by side 200 units wide
pub fn area_candidates(store: &CanvasStore, section_id: ItemId) -> Vec<DropCandidate> {
    area_ids(store, section_id)
        .into_iter()
        .enumerate()
        .map(|(i, area_id)| {
            DropCandidate::new(
                DropTarget::SectionArea {
                    section_id,
                    area_id,
                },
                Rect::new(i as f32 * 200.0, 0.0, 200.0, 300.0),
            )
        })
        .collect()
}

pub fn top_level_ids(store: &CanvasStore) -> Vec<ItemId> {
    store.items().iter().map(Item::id).collect()
}
