use crate::Item;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DOCUMENT_VERSION: &str = "1";

/// JSON-compatible export of a canvas's items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDocument {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub items: Vec<Item>,
}

impl PageDocument {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            exported_at: Utc::now(),
            items,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize page document")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: PageDocument =
            serde_json::from_str(json).context("Failed to parse page document")?;

        if document.version != DOCUMENT_VERSION {
            return Err(anyhow!(
                "Unsupported page document version: {} (expected {})",
                document.version,
                DOCUMENT_VERSION
            ));
        }

        Ok(document)
    }
}
