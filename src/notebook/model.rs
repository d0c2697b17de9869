//! Minimal nbformat model.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// A notebook document.
///
/// The raw JSON is kept untouched so it can be forwarded as-is; only the
/// parts needed for parameter discovery are typed.
#[derive(Debug, Clone)]
pub struct Notebook {
    raw: Value,
    cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct CellList {
    #[serde(default)]
    cells: Vec<Cell>,
}

/// A single notebook cell.
#[derive(Debug, Clone, Deserialize)]
pub struct Cell {
    pub cell_type: String,

    #[serde(default)]
    pub source: Source,

    #[serde(default)]
    pub metadata: CellMetadata,
}

/// Cell source: nbformat allows one string or a list of lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Text(String),
    Lines(Vec<String>),
}

impl Default for Source {
    fn default() -> Self {
        Source::Text(String::new())
    }
}

impl Source {
    /// Full source text.
    pub fn text(&self) -> String {
        match self {
            Source::Text(text) => text.clone(),
            Source::Lines(lines) => lines.concat(),
        }
    }
}

/// The cell metadata fields we look at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellMetadata {
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Cell {
    pub fn is_code(&self) -> bool {
        self.cell_type == "code"
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata
            .tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }
}

impl Notebook {
    /// Read and parse a notebook file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let raw: Value = serde_json::from_str(&content)
            .map_err(|e| Error::Notebook(format!("{}: {}", path.display(), e)))?;
        Self::from_value(raw)
    }

    /// Wrap already-parsed notebook JSON.
    pub fn from_value(raw: Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(Error::Notebook("top level is not a JSON object".to_string()));
        }

        let list: CellList = serde_json::from_value(raw.clone())
            .map_err(|e| Error::Notebook(format!("unreadable cells: {}", e)))?;

        Ok(Self {
            raw,
            cells: list.cells,
        })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The document as it was read.
    pub fn as_json(&self) -> &Value {
        &self.raw
    }

    pub fn into_json(self) -> Value {
        self.raw
    }
}
