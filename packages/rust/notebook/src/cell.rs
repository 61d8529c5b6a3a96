//! Notebook cells.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// `cell_type` of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Markdown,
    Code,
    Raw,
}

/// Cell source: nbformat allows a single string or a list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl CellSource {
    /// Split `text` into newline-terminated lines (the last line keeps no
    /// newline unless `text` ends with one).
    pub fn from_text(text: &str) -> Self {
        Self::Lines(text.split_inclusive('\n').map(str::to_string).collect())
    }

    /// The full source text.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }
}

/// A new cell id (nbformat 4.5 ids are 1-64 chars of `[A-Za-z0-9-_]`).
pub(crate) fn fresh_id() -> String {
    Uuid::now_v7().to_string()
}

/// A single notebook cell.
///
/// Keys this crate does not model (`outputs`, `execution_count`,
/// `attachments`, ...) are kept in `extra` so existing cells survive a
/// load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    pub source: CellSource,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// A new markdown cell with a fresh id.
    pub fn markdown(text: &str) -> Self {
        Self::new(CellKind::Markdown, text)
    }

    /// A new, never-executed code cell with a fresh id.
    pub fn code(text: &str) -> Self {
        let mut cell = Self::new(CellKind::Code, text);
        cell.extra.insert("execution_count".into(), Value::Null);
        cell.extra.insert("outputs".into(), Value::Array(Vec::new()));
        cell
    }

    fn new(cell_type: CellKind, text: &str) -> Self {
        Self {
            cell_type,
            id: Some(fresh_id()),
            metadata: Map::new(),
            source: CellSource::from_text(text),
            extra: Map::new(),
        }
    }

    /// The cell's source text.
    pub fn text(&self) -> String {
        self.source.text()
    }
}
