use crate::{ItemId, LayoutKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A unit stored in the canvas's top-level list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    Widget(Widget),
    Section(Section),
}

impl Item {
    /// Identifier of the item itself (not of anything nested in it)
    pub fn id(&self) -> ItemId {
        match self {
            Item::Widget(widget) => widget.id,
            Item::Section(section) => section.id,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Item::Section(_))
    }

    pub fn is_widget(&self) -> bool {
        matches!(self, Item::Widget(_))
    }

    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Item::Section(section) => Some(section),
            Item::Widget(_) => None,
        }
    }

    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Item::Section(section) => Some(section),
            Item::Widget(_) => None,
        }
    }

    pub fn as_widget(&self) -> Option<&Widget> {
        match self {
            Item::Widget(widget) => Some(widget),
            Item::Section(_) => None,
        }
    }

    /// Widgets this item contributes to the page (1 for a standalone widget)
    pub fn widget_count(&self) -> usize {
        match self {
            Item::Widget(_) => 1,
            Item::Section(section) => section.widget_count(),
        }
    }
}

impl From<Widget> for Item {
    fn from(widget: Widget) -> Self {
        Item::Widget(widget)
    }
}

impl From<Section> for Item {
    fn from(section: Section) -> Self {
        Item::Section(section)
    }
}

/// Widget kinds offered by the library
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
    Heading,
    Text,
    Image,
    Button,
    Divider,
    Spacer,
    Video,
    Gallery,
    ContactForm,
    Map,
}

impl WidgetType {
    pub const ALL: [WidgetType; 10] = [
        WidgetType::Heading,
        WidgetType::Text,
        WidgetType::Image,
        WidgetType::Button,
        WidgetType::Divider,
        WidgetType::Spacer,
        WidgetType::Video,
        WidgetType::Gallery,
        WidgetType::ContactForm,
        WidgetType::Map,
    ];

    /// Label shown in the widget library
    pub fn label(&self) -> &'static str {
        match self {
            WidgetType::Heading => "Heading",
            WidgetType::Text => "Text",
            WidgetType::Image => "Image",
            WidgetType::Button => "Button",
            WidgetType::Divider => "Divider",
            WidgetType::Spacer => "Spacer",
            WidgetType::Video => "Video",
            WidgetType::Gallery => "Gallery",
            WidgetType::ContactForm => "Contact Form",
            WidgetType::Map => "Map",
        }
    }
}

/// Keys the widget's own fields serialize under. The open field map never
/// holds these, or an export would carry them twice.
pub const RESERVED_FIELDS: [&str; 5] = ["kind", "id", "type", "skin", "sectionId"];

pub fn is_reserved_field(key: &str) -> bool {
    RESERVED_FIELDS.contains(&key)
}

/// A page widget, standalone or nested in a section area
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Widget {
    pub id: ItemId,

    #[serde(rename = "type")]
    pub widget_type: WidgetType,

    pub skin: String,

    /// Owning section, derived from placement. Absent for standalone widgets.
    #[serde(rename = "sectionId", default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<ItemId>,

    /// Type-specific fields, opaque to the composer
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Widget {
    /// Create a standalone widget with no type-specific fields
    pub fn new(id: ItemId, widget_type: WidgetType, skin: impl Into<String>) -> Self {
        Self {
            id,
            widget_type,
            skin: skin.into(),
            section_id: None,
            fields: Map::new(),
        }
    }

    pub fn is_standalone(&self) -> bool {
        self.section_id.is_none()
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a type-specific field. Reserved keys are refused.
    pub fn set_field(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if is_reserved_field(&key) {
            tracing::warn!(widget = %self.id, key = %key, "refusing reserved field name");
            return false;
        }
        self.fields.insert(key, value);
        true
    }

    /// Drop any reserved keys that reached the field map directly
    pub fn strip_reserved_fields(&mut self) {
        self.fields.retain(|key, _| !is_reserved_field(key));
    }

    /// Copy of this widget under a new identity
    pub fn duplicate(&self, id: ItemId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}

/// A layout container owning one or more areas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub id: ItemId,
    pub name: String,
    pub layout: LayoutKind,
    pub areas: Vec<Area>,
}

impl Section {
    pub fn area(&self, area_id: ItemId) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == area_id)
    }

    pub fn area_mut(&mut self, area_id: ItemId) -> Option<&mut Area> {
        self.areas.iter_mut().find(|a| a.id == area_id)
    }

    pub fn first_area(&self) -> Option<&Area> {
        self.areas.first()
    }

    pub fn widget_count(&self) -> usize {
        self.areas.iter().map(|a| a.widgets.len()).sum()
    }

    /// Iterate over every widget in area order
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.areas.iter().flat_map(|a| a.widgets.iter())
    }
}

/// Named, ordered widget container inside a section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Area {
    pub id: ItemId,
    pub name: String,
    pub widgets: Vec<Widget>,
}

impl Area {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            widgets: Vec::new(),
        }
    }

    pub fn position_of(&self, widget_id: ItemId) -> Option<usize> {
        self.widgets.iter().position(|w| w.id == widget_id)
    }
}

/// Total number of widgets on a canvas, standalone and nested
pub fn total_widgets(items: &[Item]) -> usize {
    items.iter().map(Item::widget_count).sum()
}

/// Position of a top-level item by id
pub fn position_of(items: &[Item], id: ItemId) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Single-element move: remove at `from`, insert at `to`.
/// Returns false (and leaves `items` alone) if either index is out of range.
pub fn move_element<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let element = items.remove(from);
    items.insert(to, element);
    true
}

/// Rewrite every widget's `section_id` from where it actually lives and
/// clear reserved keys out of the open field maps
pub fn normalize_back_references(items: &mut [Item]) {
    for item in items.iter_mut() {
        match item {
            Item::Widget(widget) => {
                widget.section_id = None;
                widget.strip_reserved_fields();
            }
            Item::Section(section) => {
                let section_id = section.id;
                for area in &mut section.areas {
                    for widget in &mut area.widgets {
                        widget.section_id = Some(section_id);
                        widget.strip_reserved_fields();
                    }
                }
            }
        }
    }
}
