//! Jupyter notebook (`.ipynb`, nbformat 4) documents on disk.
//!
//! [`Notebook`] is a lossless-enough model of the nbformat JSON: cells this
//! crate creates are fully specified, and unknown keys on existing cells are
//! carried through untouched. Writes go to a temporary sibling file that is
//! then renamed over the target, so readers never observe a half-written
//! notebook.

mod cell;

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use leettutor_shared::{LeetTutorError, Result};

pub use cell::{Cell, CellKind, CellSource};

/// nbformat major version written by this crate.
pub const NBFORMAT: u32 = 4;

/// nbformat minor version written by this crate (cell ids are required from 4.5).
pub const NBFORMAT_MINOR: u32 = 5;

/// A notebook document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

impl Notebook {
    /// An empty notebook with the given metadata.
    pub fn new(metadata: Map<String, Value>) -> Self {
        Self {
            cells: Vec::new(),
            metadata,
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }

    /// An empty notebook bound to a Python 3 kernel, tagged with `created_by`.
    pub fn python(created_by: &str) -> Self {
        let metadata = json!({
            "kernelspec": {
                "display_name": "Python 3",
                "language": "python",
                "name": "python3"
            },
            "language_info": {
                "name": "python",
                "version": "3.8.0"
            },
            "custom": {
                "created_by": created_by
            }
        });

        match metadata {
            Value::Object(map) => Self::new(map),
            _ => Self::new(Map::new()),
        }
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Append cells after the last one.
    ///
    /// New cells carry ids, so an older 4.x notebook is raised to
    /// [`NBFORMAT_MINOR`] first.
    pub fn append(&mut self, cells: impl IntoIterator<Item = Cell>) {
        self.upgrade_minor();
        self.cells.extend(cells);
    }

    /// Raise `nbformat_minor` to [`NBFORMAT_MINOR`], giving every cell
    /// without an id a fresh one. A no-op for 4.5+ notebooks.
    pub fn upgrade_minor(&mut self) {
        if self.nbformat_minor >= NBFORMAT_MINOR {
            return;
        }
        for cell in &mut self.cells {
            if cell.id.as_deref().is_none_or(str::is_empty) {
                cell.id = Some(cell::fresh_id());
            }
        }
        debug!(from = self.nbformat_minor, to = NBFORMAT_MINOR, "nbformat upgraded");
        self.nbformat_minor = NBFORMAT_MINOR;
    }

    /// Read and parse a notebook file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LeetTutorError::io(path, e))?;
        let notebook: Self = serde_json::from_str(&content).map_err(|e| {
            LeetTutorError::validation(format!("invalid notebook {}: {e}", path.display()))
        })?;

        if notebook.nbformat != NBFORMAT {
            return Err(LeetTutorError::validation(format!(
                "unsupported nbformat {} in {} (expected {NBFORMAT})",
                notebook.nbformat,
                path.display()
            )));
        }

        debug!(cells = notebook.cells.len(), "notebook loaded");
        Ok(notebook)
    }

    /// Serialize the notebook the way Jupyter does (one-space indent,
    /// trailing newline).
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .map_err(|e| LeetTutorError::validation(format!("notebook serialization: {e}")))?;
        buf.push(b'\n');
        String::from_utf8(buf)
            .map_err(|e| LeetTutorError::validation(format!("notebook serialization: {e}")))
    }

    /// Write the notebook to `path` atomically (temp file, then rename).
    #[instrument(skip_all, fields(path = %path.display(), cells = self.cells.len()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json()?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                LeetTutorError::validation(format!("not a file path: {}", path.display()))
            })?;
        let temp = path.with_file_name(format!(".{file_name}.tmp"));

        std::fs::write(&temp, content).map_err(|e| LeetTutorError::io(&temp, e))?;
        std::fs::rename(&temp, path).map_err(|e| LeetTutorError::io(path, e))?;

        debug!("notebook written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_path(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/json")
            .join(name)
    }

    fn temp_path(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("leettutor-nb-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir.join("notebook.ipynb")
    }

    #[test]
    fn python_notebook_metadata() {
        let nb = Notebook::python("leettutor");
        assert_eq!(nb.metadata["kernelspec"]["name"], "python3");
        assert_eq!(nb.metadata["custom"]["created_by"], "leettutor");
        assert_eq!(nb.nbformat, 4);
        assert_eq!(nb.nbformat_minor, 5);
        assert_eq!(nb.cell_count(), 0);
    }

    #[test]
    fn existing_notebook_round_trips_unknown_keys() {
        let nb = Notebook::load(&fixture_path("notebook-existing.ipynb")).expect("load fixture");
        assert_eq!(nb.cell_count(), 2);
        assert_eq!(nb.cells[0].text(), "**LeetTutor**");
        assert_eq!(nb.cells[1].text(), "print('hello')\nx = 1");
        assert_eq!(nb.cells[1].extra["execution_count"], 3);

        let json: Value = serde_json::from_str(&nb.to_json().unwrap()).unwrap();
        assert_eq!(json["cells"][1]["outputs"][0]["text"][0], "hello\n");
        assert_eq!(json["cells"][1]["attachments"], json!({}));
        assert_eq!(json["cells"][1]["metadata"]["tags"][0], "scratch");
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save");
        let mut nb = Notebook::python("leettutor");
        nb.append([Cell::markdown("# Two Sum"), Cell::code("class Solution:\n    pass\n")]);
        nb.save(&path).expect("save");

        let loaded = Notebook::load(&path).expect("load");
        assert_eq!(loaded, nb);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("{\n \"cells\""));
        assert!(raw.ends_with("}\n"));

        // No temp file left behind.
        let temp = path.with_file_name(".notebook.ipynb.tmp");
        assert!(!temp.exists());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn append_upgrades_pre_4_5_notebook() {
        let mut nb = Notebook::load(&fixture_path("notebook-nbformat-44.ipynb")).expect("load");
        assert_eq!(nb.nbformat_minor, 4);
        assert!(nb.cells.iter().all(|c| c.id.is_none()));

        nb.append([Cell::markdown("# Two Sum")]);

        assert_eq!(nb.nbformat_minor, NBFORMAT_MINOR);
        assert_eq!(nb.cell_count(), 3);
        assert!(nb.cells.iter().all(|c| c.id.as_deref().is_some_and(|id| !id.is_empty())));
        assert_eq!(nb.cells[1].extra["execution_count"], 1);
    }

    #[test]
    fn append_keeps_existing_ids_on_current_minor() {
        let mut nb = Notebook::load(&fixture_path("notebook-existing.ipynb")).expect("load");
        nb.append([Cell::code("pass")]);
        assert_eq!(nb.nbformat_minor, 5);
        assert_eq!(nb.cells[0].id.as_deref(), Some("intro"));
        assert_eq!(nb.cells[1].id.as_deref(), Some("scratch"));
    }

    #[test]
    fn load_rejects_non_notebook() {
        let path = temp_path("invalid");
        std::fs::write(&path, r#"{"hello": "world"}"#).unwrap();
        let err = Notebook::load(&path).unwrap_err();
        assert!(matches!(err, LeetTutorError::Validation { .. }));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Notebook::load(Path::new("/nonexistent/leettutor.ipynb")).unwrap_err();
        assert!(matches!(err, LeetTutorError::Io { .. }));
    }
}
