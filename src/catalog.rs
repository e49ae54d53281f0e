use crate::item::is_reserved_field;
use crate::{ItemId, Widget, WidgetType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A widget library entry, not yet placed on the canvas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryItem {
    pub widget_type: WidgetType,
    pub label: String,

    /// Skin to use instead of the composer's default
    #[serde(default)]
    pub skin: Option<String>,

    /// Field values that take precedence over the type defaults
    #[serde(default)]
    pub overrides: Map<String, Value>,
}

impl LibraryItem {
    pub fn new(widget_type: WidgetType) -> Self {
        Self {
            widget_type,
            label: widget_type.label().to_string(),
            skin: None,
            overrides: Map::new(),
        }
    }

    pub fn with_skin(mut self, skin: impl Into<String>) -> Self {
        self.skin = Some(skin.into());
        self
    }

    /// Override a field value. A string `skin` sets the entry's skin; other
    /// reserved keys are ignored.
    pub fn with_override(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        match (key.as_str(), value) {
            ("skin", Value::String(skin)) => self.skin = Some(skin),
            (name, _) if is_reserved_field(name) => {
                tracing::warn!(key = name, "ignoring override of reserved field");
            }
            (_, value) => {
                self.overrides.insert(key, value);
            }
        }
        self
    }

    /// Build a widget from this entry. Defaults fill whatever the
    /// overrides leave unset, so instantiating twice yields equal fields.
    pub fn instantiate(
        &self,
        id: ItemId,
        section_id: Option<ItemId>,
        default_skin: &str,
    ) -> Widget {
        // Deserialized entries can still carry a skin in the override map
        let override_skin = match self.overrides.get("skin") {
            Some(Value::String(skin)) => Some(skin.clone()),
            _ => None,
        };

        let mut fields: Map<String, Value> = self
            .overrides
            .iter()
            .filter(|(key, _)| !is_reserved_field(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (key, value) in default_fields(self.widget_type) {
            fields.entry(key).or_insert(value);
        }

        let skin = self
            .skin
            .clone()
            .or(override_skin)
            .unwrap_or_else(|| default_skin.to_string());

        Widget {
            id,
            widget_type: self.widget_type,
            skin,
            section_id,
            fields,
        }
    }
}

/// Default type-specific fields for a freshly created widget
pub fn default_fields(widget_type: WidgetType) -> Map<String, Value> {
    let value = match widget_type {
        WidgetType::Heading => json!({ "text": "New Heading", "level": 2, "align": "left" }),
        WidgetType::Text => json!({ "content": "Add your text here.", "align": "left" }),
        WidgetType::Image => json!({ "src": "", "alt": "", "fit": "cover" }),
        WidgetType::Button => json!({ "label": "Click me", "href": "#", "variant": "primary" }),
        WidgetType::Divider => json!({ "style": "solid", "thickness": 1 }),
        WidgetType::Spacer => json!({ "height": 40 }),
        WidgetType::Video => json!({ "url": "", "autoplay": false, "controls": true }),
        WidgetType::Gallery => json!({ "images": [], "columns": 3 }),
        WidgetType::ContactForm => json!({
            "fields": ["name", "email", "message"],
            "submitLabel": "Send",
        }),
        WidgetType::Map => json!({ "address": "", "zoom": 14 }),
    };

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// The set of entries offered in the widget library
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<LibraryItem>,
}

impl Catalog {
    /// One entry per widget type, in library order
    pub fn standard() -> Self {
        Self {
            entries: WidgetType::ALL.iter().copied().map(LibraryItem::new).collect(),
        }
    }

    pub fn push(&mut self, entry: LibraryItem) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LibraryItem] {
        &self.entries
    }

    pub fn get(&self, widget_type: WidgetType) -> Option<&LibraryItem> {
        self.entries.iter().find(|e| e.widget_type == widget_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
