//! Document I/O: loading source documents and saving the merged output

use crate::layout::Rect;
use crate::render::page_box;
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Answers the questions the engine asks about uploaded documents: how many
/// pages, and how big is page N. Implemented by [`SourceLibrary`].
pub trait SourcePages {
    fn page_count(&self, source: SourceId) -> Option<usize>;

    /// Page box (MediaBox) of a page in points. `x`/`y` are the box origin,
    /// which is not always (0, 0).
    fn page_box(&self, page: SourceRef) -> Option<Rect>;
}

/// A parsed source document
#[derive(Debug)]
pub struct SourceDocument {
    name: String,
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    /// Parse PDF bytes. Unreadable or page-less input is an
    /// [`LabelError::InvalidSource`] naming the file.
    pub fn parse(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        let document = Document::load_mem(bytes).map_err(|e| LabelError::InvalidSource {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        Self::from_document(name, document)
    }

    pub fn from_document(name: impl Into<String>, document: Document) -> Result<Self> {
        let name = name.into();
        let page_ids: Vec<ObjectId> = document.get_pages().values().copied().collect();
        if page_ids.is_empty() {
            return Err(LabelError::InvalidSource {
                name,
                reason: "document has no pages".to_string(),
            });
        }
        Ok(Self {
            name,
            document,
            page_ids,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn page_id(&self, page: usize) -> Option<ObjectId> {
        self.page_ids.get(page).copied()
    }
}

/// Loaded source documents keyed by [`SourceId`]. Cloning is cheap; the
/// documents themselves are shared.
#[derive(Debug, Clone, Default)]
pub struct SourceLibrary {
    documents: HashMap<SourceId, Arc<SourceDocument>>,
    next_id: u64,
}

impl SourceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document: SourceDocument) -> SourceId {
        let id = SourceId(self.next_id);
        self.next_id += 1;
        self.documents.insert(id, Arc::new(document));
        id
    }

    /// Parse bytes off the async executor and add the document
    pub async fn load_bytes(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<SourceId> {
        let name = name.into();
        let document =
            tokio::task::spawn_blocking(move || SourceDocument::parse(name, &bytes)).await??;
        log::info!(
            "Loaded {} ({} page(s))",
            document.name(),
            document.page_count()
        );
        Ok(self.insert(document))
    }

    /// Read and add a document from disk
    pub async fn load_path(&mut self, path: impl AsRef<Path>) -> Result<SourceId> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = tokio::fs::read(path).await?;
        self.load_bytes(name, bytes).await
    }

    pub fn get(&self, id: SourceId) -> Option<&SourceDocument> {
        self.documents.get(&id).map(Arc::as_ref)
    }

    pub fn remove(&mut self, id: SourceId) -> bool {
        self.documents.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl SourcePages for SourceLibrary {
    fn page_count(&self, source: SourceId) -> Option<usize> {
        self.get(source).map(SourceDocument::page_count)
    }

    fn page_box(&self, page: SourceRef) -> Option<Rect> {
        let source = self.get(page.source)?;
        let page_id = source.page_id(page.page)?;
        Some(page_box(source.document(), page_id))
    }
}

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Serialize a document to bytes
pub fn document_to_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Save an exported document to disk
pub async fn save_pdf(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
