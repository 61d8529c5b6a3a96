//! Document editing port.
//!
//! Pipelines never touch a document directly; they go through a
//! [`DocumentEditPort`]. [`NotebookFilePort`] edits `.ipynb` files on disk.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument};

use leettutor_notebook::{Cell, Notebook};
use leettutor_shared::{ContentBlock, DocumentHandle, LeetTutorError, Result};

/// Access to the host's currently active document.
#[async_trait]
pub trait DocumentEditPort: Send + Sync {
    /// The active document, if any.
    async fn current_document(&self) -> Result<Option<DocumentHandle>>;

    /// Number of cells currently in `document`.
    async fn cell_count(&self, document: &DocumentHandle) -> Result<usize>;

    /// Insert `blocks` at `position` as one edit.
    ///
    /// Fails with [`LeetTutorError::EditConflict`] when the document is gone or
    /// no longer has `position` cells; nothing is written in that case.
    async fn apply_insert(
        &self,
        document: &DocumentHandle,
        position: usize,
        blocks: &[ContentBlock],
    ) -> Result<()>;
}

/// Notebook cell for a content block.
pub fn to_cell(block: &ContentBlock) -> Cell {
    match block {
        ContentBlock::Markup(text) => Cell::markdown(text),
        ContentBlock::Executable(text) => Cell::code(text),
    }
}

// ---------------------------------------------------------------------------
// File-backed port
// ---------------------------------------------------------------------------

/// Port over notebook files. The active document is a path chosen by the
/// caller; it counts as open while the file exists.
#[derive(Debug, Clone)]
pub struct NotebookFilePort {
    active: Option<PathBuf>,
}

impl NotebookFilePort {
    pub fn new(active: Option<PathBuf>) -> Self {
        Self { active }
    }

    fn load_open(document: &DocumentHandle) -> Result<Notebook> {
        if !document.path().is_file() {
            return Err(LeetTutorError::EditConflict(format!(
                "{document} is no longer available"
            )));
        }
        Notebook::load(document.path())
    }
}

#[async_trait]
impl DocumentEditPort for NotebookFilePort {
    async fn current_document(&self) -> Result<Option<DocumentHandle>> {
        Ok(self
            .active
            .as_ref()
            .filter(|path| path.is_file())
            .map(DocumentHandle::new))
    }

    async fn cell_count(&self, document: &DocumentHandle) -> Result<usize> {
        Ok(Self::load_open(document)?.cell_count())
    }

    #[instrument(skip_all, fields(document = %document, position = position, blocks = blocks.len()))]
    async fn apply_insert(
        &self,
        document: &DocumentHandle,
        position: usize,
        blocks: &[ContentBlock],
    ) -> Result<()> {
        let mut notebook = Self::load_open(document)?;

        let current = notebook.cell_count();
        if current != position {
            return Err(LeetTutorError::EditConflict(format!(
                "{document} changed: expected {position} cells, found {current}"
            )));
        }

        notebook.append(blocks.iter().map(to_cell));
        notebook.save(document.path())?;

        debug!(cells = notebook.cell_count(), "notebook updated");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory port
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use std::path::Path;

    use leettutor_notebook::CellKind;

    use super::*;

    fn temp_notebook(tag: &str) -> PathBuf {
        temp_copy(tag, "notebook-existing.ipynb")
    }

    fn temp_copy(tag: &str, fixture: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("leettutor-port-{tag}-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/json")
            .join(fixture);
        let path = dir.join("work.ipynb");
        std::fs::copy(fixture, &path).unwrap();
        path
    }

    fn blocks() -> Vec<ContentBlock> {
        vec![
            ContentBlock::Markup("# Two Sum".into()),
            ContentBlock::Executable("class Solution:\n    pass\n".into()),
        ]
    }

    #[tokio::test]
    async fn current_document_requires_existing_file() {
        let path = temp_notebook("current");
        let port = NotebookFilePort::new(Some(path.clone()));
        assert_eq!(
            port.current_document().await.unwrap(),
            Some(DocumentHandle::new(&path))
        );

        let missing = NotebookFilePort::new(Some(path.with_file_name("missing.ipynb")));
        assert_eq!(missing.current_document().await.unwrap(), None);
        let unset = NotebookFilePort::new(None);
        assert_eq!(unset.current_document().await.unwrap(), None);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn insert_appends_after_existing_cells() {
        let path = temp_notebook("insert");
        let port = NotebookFilePort::new(Some(path.clone()));
        let doc = DocumentHandle::new(&path);

        assert_eq!(port.cell_count(&doc).await.unwrap(), 2);
        port.apply_insert(&doc, 2, &blocks()).await.unwrap();

        let notebook = Notebook::load(&path).unwrap();
        assert_eq!(notebook.cell_count(), 4);
        assert_eq!(notebook.cells[0].text(), "**LeetTutor**");
        assert_eq!(notebook.cells[2].cell_type, CellKind::Markdown);
        assert_eq!(notebook.cells[3].cell_type, CellKind::Code);
        assert_eq!(notebook.cells[3].text(), "class Solution:\n    pass\n");
        assert!(notebook.cells[2].id.is_some());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn insert_into_nbformat_4_4_writes_valid_4_5() {
        let path = temp_copy("nb44", "notebook-nbformat-44.ipynb");
        let port = NotebookFilePort::new(Some(path.clone()));
        let doc = DocumentHandle::new(&path);

        port.apply_insert(&doc, 2, &[ContentBlock::Markup("x".into())])
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["nbformat_minor"], 5);
        let cells = raw["cells"].as_array().unwrap();
        assert_eq!(cells.len(), 3);
        let ids: Vec<&str> = cells.iter().filter_map(|c| c["id"].as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| !id.is_empty()));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn stale_position_is_conflict_and_leaves_file_alone() {
        let path = temp_notebook("stale");
        let before = std::fs::read_to_string(&path).unwrap();
        let port = NotebookFilePort::new(Some(path.clone()));

        let err = port
            .apply_insert(&DocumentHandle::new(&path), 1, &blocks())
            .await
            .unwrap_err();

        assert!(matches!(err, LeetTutorError::EditConflict(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn closed_document_is_conflict() {
        let path = temp_notebook("closed");
        let doc = DocumentHandle::new(&path);
        std::fs::remove_file(&path).unwrap();

        let port = NotebookFilePort::new(Some(path.clone()));
        let err = port.apply_insert(&doc, 0, &blocks()).await.unwrap_err();
        assert!(matches!(err, LeetTutorError::EditConflict(_)));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn blocks_map_to_cell_kinds() {
        let markup = to_cell(&ContentBlock::Markup("x".into()));
        let code = to_cell(&ContentBlock::Executable("x".into()));
        assert_eq!(markup.cell_type, CellKind::Markdown);
        assert_eq!(code.cell_type, CellKind::Code);
    }
}
