use crate::{Item, ItemId};
use std::collections::HashMap;

/// Where an id lives in the canvas tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// A top-level item (standalone widget or section)
    TopLevel { index: usize },

    /// An area of a section
    Area {
        section_id: ItemId,
        section_index: usize,
        area_index: usize,
    },

    /// A widget nested in a section area
    Nested {
        section_id: ItemId,
        area_id: ItemId,
        section_index: usize,
        area_index: usize,
        index: usize,
    },
}

impl Location {
    /// Owning section, if the id lives inside one
    pub fn section_id(&self) -> Option<ItemId> {
        match self {
            Location::TopLevel { .. } => None,
            Location::Area { section_id, .. } | Location::Nested { section_id, .. } => {
                Some(*section_id)
            }
        }
    }
}

/// Lookup table from every id on a canvas to its location.
/// Rebuilt from scratch after each structural mutation.
#[derive(Debug, Clone, Default)]
pub struct CanvasIndex {
    locations: HashMap<ItemId, Location>,
    duplicates: Vec<ItemId>,
}

impl CanvasIndex {
    pub fn build(items: &[Item]) -> Self {
        let mut index = Self::default();

        for (item_index, item) in items.iter().enumerate() {
            index.record(item.id(), Location::TopLevel { index: item_index });

            if let Item::Section(section) = item {
                for (area_index, area) in section.areas.iter().enumerate() {
                    index.record(
                        area.id,
                        Location::Area {
                            section_id: section.id,
                            section_index: item_index,
                            area_index,
                        },
                    );

                    for (widget_index, widget) in area.widgets.iter().enumerate() {
                        index.record(
                            widget.id,
                            Location::Nested {
                                section_id: section.id,
                                area_id: area.id,
                                section_index: item_index,
                                area_index,
                                index: widget_index,
                            },
                        );
                    }
                }
            }
        }

        index
    }

    // First occurrence wins; later ones are reported as duplicates
    fn record(&mut self, id: ItemId, location: Location) {
        if self.locations.contains_key(&id) {
            self.duplicates.push(id);
        } else {
            self.locations.insert(id, location);
        }
    }

    pub fn locate(&self, id: ItemId) -> Option<Location> {
        self.locations.get(&id).copied()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Ids that occurred more than once while building
    pub fn duplicates(&self) -> &[ItemId] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.locations.keys().copied()
    }
}
