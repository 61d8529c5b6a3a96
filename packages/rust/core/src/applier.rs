//! Appends assembled blocks to a document in one edit.

use tracing::{info, instrument};

use leettutor_shared::{ContentBlock, DocumentHandle, Result};

use crate::port::DocumentEditPort;

/// Insert `blocks` after the last cell of `document`.
///
/// Returns the position the blocks were inserted at. The edit is
/// all-or-nothing; a rejected edit surfaces as
/// [`EditConflict`](leettutor_shared::LeetTutorError::EditConflict).
#[instrument(skip_all, fields(document = %document, blocks = blocks.len()))]
pub async fn apply(
    port: &dyn DocumentEditPort,
    document: &DocumentHandle,
    blocks: &[ContentBlock],
) -> Result<usize> {
    let position = port.cell_count(document).await?;
    port.apply_insert(document, position, blocks).await?;
    info!(position, "cells appended");
    Ok(position)
}
