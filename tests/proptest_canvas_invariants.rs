//! Property-based invariant tests for the canvas store and drop reconciliation.
//!
//! Random operation sequences are applied to a fresh store and these must
//! hold after every step:
//!
//! 1. Every id on the canvas is unique.
//! 2. No section is left without areas.
//! 3. Nested widgets point back at their owning section; standalone ones do not.
//! 4. Moving existing widgets never creates or loses a widget.
//! 5. A drop onto the widget's own area leaves the canvas untouched.
//! 6. Undo after an applied change restores the previous items exactly.

use page_composer::{
    CanvasStore, DragId, DragSource, DropTarget, Item, ItemId, LayoutKind, LibraryItem, Location,
    Outcome, ValidatedCanvas, WidgetType,
};
use proptest::prelude::*;
use std::collections::HashSet;

// ── Helpers ─────────────────────────────────────────────────────────────

const LAYOUTS: [LayoutKind; 7] = [
    LayoutKind::SingleColumn,
    LayoutKind::TwoColumns,
    LayoutKind::ThreeColumns,
    LayoutKind::OneThirdLeft,
    LayoutKind::OneThirdRight,
    LayoutKind::Vertical,
    LayoutKind::FullWidth,
];

#[derive(Debug, Clone)]
enum Op {
    AddSection(usize),
    LibraryOntoCanvas(usize),
    LibraryIntoArea { kind: usize, section: usize, area: usize },
    MoveIntoArea { widget: usize, section: usize, area: usize },
    MoveOntoSection { widget: usize, section: usize },
    Reorder { from: usize, to: usize },
    Delete(usize),
    Duplicate(usize),
    Undo,
    Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..LAYOUTS.len()).prop_map(Op::AddSection),
        (0usize..WidgetType::ALL.len()).prop_map(Op::LibraryOntoCanvas),
        (any::<usize>(), any::<usize>(), any::<usize>())
            .prop_map(|(kind, section, area)| Op::LibraryIntoArea { kind, section, area }),
        (any::<usize>(), any::<usize>(), any::<usize>())
            .prop_map(|(widget, section, area)| Op::MoveIntoArea { widget, section, area }),
        (any::<usize>(), any::<usize>())
            .prop_map(|(widget, section)| Op::MoveOntoSection { widget, section }),
        (0usize..16, 0usize..16).prop_map(|(from, to)| Op::Reorder { from, to }),
        any::<usize>().prop_map(Op::Delete),
        any::<usize>().prop_map(Op::Duplicate),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

fn section_ids(store: &CanvasStore) -> Vec<ItemId> {
    store
        .items()
        .iter()
        .filter_map(Item::as_section)
        .map(|s| s.id)
        .collect()
}

fn widget_ids(store: &CanvasStore) -> Vec<ItemId> {
    let mut ids = Vec::new();
    for item in store.items() {
        match item {
            Item::Widget(widget) => ids.push(widget.id),
            Item::Section(section) => ids.extend(section.widgets().map(|w| w.id)),
        }
    }
    ids
}

fn pick<T: Copy>(values: &[T], n: usize) -> Option<T> {
    if values.is_empty() {
        None
    } else {
        Some(values[n % values.len()])
    }
}

fn area_target(store: &CanvasStore, section: usize, area: usize) -> Option<DropTarget> {
    let section_id = pick(&section_ids(store), section)?;
    let areas: Vec<ItemId> = store
        .find_section(section_id)?
        .areas
        .iter()
        .map(|a| a.id)
        .collect();
    Some(DropTarget::SectionArea {
        section_id,
        area_id: pick(&areas, area)?,
    })
}

fn drag_source(store: &CanvasStore, widget: usize) -> Option<DragSource> {
    let id = pick(&widget_ids(store), widget)?;
    Some(match store.locate(id)? {
        Location::Nested {
            section_id,
            area_id,
            ..
        } => DragSource::SectionWidget {
            widget_id: id,
            section_id,
            area_id,
        },
        _ => DragSource::StandaloneWidget { widget_id: id },
    })
}

fn text_entry() -> DragSource {
    DragSource::LibraryItem(LibraryItem::new(WidgetType::Text))
}

fn apply(store: &mut CanvasStore, op: &Op) -> Outcome {
    match op {
        Op::AddSection(layout) => store.create_section_with_layout(LAYOUTS[*layout]),
        Op::LibraryOntoCanvas(kind) => store.apply_drop(
            &DragSource::LibraryItem(LibraryItem::new(WidgetType::ALL[*kind])),
            Some(&DropTarget::Canvas),
        ),
        Op::LibraryIntoArea {
            kind,
            section,
            area,
        } => {
            let entry = LibraryItem::new(WidgetType::ALL[kind % WidgetType::ALL.len()]);
            let target = area_target(store, *section, *area);
            store.apply_drop(&DragSource::LibraryItem(entry), target.as_ref())
        }
        Op::MoveIntoArea {
            widget,
            section,
            area,
        } => {
            let source = drag_source(store, *widget);
            let target = area_target(store, *section, *area);
            match source {
                Some(source) => store.apply_drop(&source, target.as_ref()),
                None => store.apply_drop(&text_entry(), None),
            }
        }
        Op::MoveOntoSection { widget, section } => {
            let source = drag_source(store, *widget);
            let target = pick(&section_ids(store), *section)
                .map(|section_id| DropTarget::Section { section_id });
            match source {
                Some(source) => store.apply_drop(&source, target.as_ref()),
                None => store.apply_drop(&text_entry(), None),
            }
        }
        Op::Reorder { from, to } => {
            let ids: Vec<ItemId> = store.items().iter().map(Item::id).collect();
            match (pick(&ids, *from), pick(&ids, *to)) {
                (Some(active), Some(over)) => store.apply_drop(
                    &DragSource::TopLevelItem {
                        drag_id: DragId::Item(active),
                    },
                    Some(&DropTarget::CanvasItem {
                        drag_id: DragId::Item(over),
                    }),
                ),
                _ => store.move_item(*from, *to),
            }
        }
        Op::Delete(n) => match pick(&widget_ids(store), *n) {
            Some(id) => store.delete_widget(id),
            None => {
                let missing = store.next_id();
                store.delete_widget(missing)
            }
        },
        Op::Duplicate(n) => match pick(&widget_ids(store), *n) {
            Some(id) => store.duplicate_widget(id),
            None => {
                let missing = store.next_id();
                store.duplicate_widget(missing)
            }
        },
        Op::Undo => store.undo(),
        Op::Redo => store.redo(),
    }
}

fn assert_structure(store: &CanvasStore) -> Result<(), TestCaseError> {
    let validation = store.validate();
    prop_assert!(!validation.has_errors(), "invalid canvas: {}", validation.summary());

    let mut seen = HashSet::new();
    for item in store.items() {
        prop_assert!(seen.insert(item.id()), "duplicate top-level id {}", item.id());
        match item {
            Item::Widget(widget) => prop_assert_eq!(widget.section_id, None),
            Item::Section(section) => {
                prop_assert!(!section.areas.is_empty());
                for area in &section.areas {
                    prop_assert!(seen.insert(area.id), "duplicate area id {}", area.id);
                    for widget in &area.widgets {
                        prop_assert!(seen.insert(widget.id), "duplicate widget id {}", widget.id);
                        prop_assert_eq!(widget.section_id, Some(section.id));
                    }
                }
            }
        }
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Structural invariants hold after any operation sequence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn structure_survives_random_operations(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut store = CanvasStore::new();
        for op in &ops {
            apply(&mut store, op);
            assert_structure(&store)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Moves conserve widgets
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn moves_conserve_widgets(
        setup in prop::collection::vec(op_strategy(), 1..30),
        moves in prop::collection::vec((any::<usize>(), any::<usize>(), any::<usize>()), 1..10),
    ) {
        let mut store = CanvasStore::new();
        for op in &setup {
            apply(&mut store, op);
        }

        let before: HashSet<ItemId> = widget_ids(&store).into_iter().collect();
        for (widget, section, area) in moves {
            apply(&mut store, &Op::MoveIntoArea { widget, section, area });
            let after: HashSet<ItemId> = widget_ids(&store).into_iter().collect();
            prop_assert_eq!(&after, &before);
            prop_assert_eq!(store.widget_count(), before.len());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Dropping onto the current area is a no-op
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn same_area_drop_is_noop(
        setup in prop::collection::vec(op_strategy(), 1..30),
        n in any::<usize>(),
    ) {
        let mut store = CanvasStore::new();
        for op in &setup {
            apply(&mut store, op);
        }

        if let Some(DragSource::SectionWidget {
            widget_id,
            section_id,
            area_id,
        }) = drag_source(&store, n)
        {
            let before = store.snapshot();
            let revision = store.revision();
            let outcome = store.apply_drop(
                &DragSource::SectionWidget { widget_id, section_id, area_id },
                Some(&DropTarget::SectionArea { section_id, area_id }),
            );
            prop_assert!(!outcome.is_applied());
            prop_assert_eq!(store.items(), before.as_slice());
            prop_assert_eq!(store.revision(), revision);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Undo restores the previous items
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn undo_restores_previous_items(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let mut store = CanvasStore::new();
        for op in &ops {
            if matches!(op, Op::Undo | Op::Redo) {
                continue;
            }
            let before = store.snapshot();
            if apply(&mut store, op).is_applied() {
                prop_assert!(store.undo().is_applied());
                prop_assert_eq!(store.items(), before.as_slice());
                prop_assert!(store.redo().is_applied());
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. move_item(i, j) then move_item(j, i) restores the order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn move_item_round_trip(
        layouts in prop::collection::vec(0usize..LAYOUTS.len(), 2..10),
        i in any::<usize>(),
        j in any::<usize>(),
    ) {
        let mut store = CanvasStore::new();
        for layout in &layouts {
            store.create_section_with_layout(LAYOUTS[*layout]);
        }
        let len = store.len();
        let (i, j) = (i % len, j % len);
        let before = store.snapshot();

        store.move_item(i, j);
        store.move_item(j, i);
        prop_assert_eq!(store.items(), before.as_slice());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Duplicate adds exactly one widget, delete removes exactly one
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn duplicate_and_delete_counts(
        setup in prop::collection::vec(op_strategy(), 1..30),
        n in any::<usize>(),
    ) {
        let mut store = CanvasStore::new();
        for op in &setup {
            apply(&mut store, op);
        }

        if let Some(id) = pick(&widget_ids(&store), n) {
            let count = store.widget_count();

            let copy = store.duplicate_widget(id).created_id();
            prop_assert!(copy.is_some());
            prop_assert_eq!(store.widget_count(), count + 1);

            prop_assert!(store.delete_widget(id).is_applied());
            prop_assert_eq!(store.widget_count(), count);
            prop_assert!(store.find_widget(id).is_none());
        }
    }
}
