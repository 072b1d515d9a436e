//! Session plus the loaded documents and the last export

use crate::{Result, RuntimeError};
use label_sheets::{
    AutoAssignReport, Item, ItemId, LabelError, LabelOptions, Session, SourceId, SourceLibrary,
    SourcePages, calculate_statistics, export_pdf, save_pdf,
};
use std::path::{Path, PathBuf};

/// Bytes of a finished export
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Increases with every export of the workspace
    pub generation: u64,
    pub sheets: usize,
    pub bytes: Vec<u8>,
}

/// One file that could not be added
#[derive(Debug)]
pub struct UploadFailure {
    pub name: String,
    pub error: LabelError,
}

/// Outcome of a batch upload, one entry per file
#[derive(Debug, Default)]
pub struct UploadReport {
    pub added: Vec<(String, SourceId, AutoAssignReport)>,
    pub failed: Vec<UploadFailure>,
}

impl UploadReport {
    /// Items still without a slot after the batch. Every upload retries
    /// all pending items, so the last run holds the full count.
    pub fn unplaced_count(&self) -> usize {
        self.added
            .last()
            .map_or(0, |(_, _, report)| report.unplaced.len())
    }
}

#[derive(Debug, Default)]
pub struct Workspace {
    pub session: Session,
    library: SourceLibrary,
    last_export: Option<ExportArtifact>,
    export_in_progress: bool,
    generation: u64,
}

impl Workspace {
    pub fn new(options: LabelOptions) -> Result<Self> {
        Ok(Self {
            session: Session::new(options)?,
            ..Default::default()
        })
    }

    pub fn library(&self) -> &SourceLibrary {
        &self.library
    }

    pub fn last_export(&self) -> Option<&ExportArtifact> {
        self.last_export.as_ref()
    }

    pub fn export_in_progress(&self) -> bool {
        self.export_in_progress
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// Load one document from bytes and auto-assign its pages
    pub async fn add_bytes(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(SourceId, AutoAssignReport)> {
        let name = name.into();
        let id = self.library.load_bytes(name.clone(), bytes).await?;
        let page_count = self.library.page_count(id).unwrap_or(0);
        let report = self.session.add_document(id, &name, page_count);
        Ok((id, report))
    }

    /// Load several files in order. A file that cannot be read is recorded
    /// and skipped; the rest of the batch is still added.
    pub async fn add_files(&mut self, paths: &[PathBuf]) -> UploadReport {
        let mut report = UploadReport::default();

        for path in paths {
            let name = file_name(path);
            let result = match tokio::fs::read(path).await {
                Ok(bytes) => self.add_bytes(name.clone(), bytes).await,
                Err(e) => Err(LabelError::from(e).into()),
            };

            match result {
                Ok((id, assigned)) => report.added.push((name, id, assigned)),
                Err(e) => {
                    log::warn!("Skipping {}: {}", name, e);
                    let error = match e {
                        RuntimeError::Label(error) => error,
                        other => LabelError::InvalidSource {
                            name: name.clone(),
                            reason: other.to_string(),
                        },
                    };
                    report.failed.push(UploadFailure { name, error });
                }
            }
        }

        report
    }

    /// Remove an item. The document it came from is dropped once no
    /// remaining item uses it.
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let removed = self.session.remove_item(id)?;
        let source = removed.source().source;
        let in_use = self
            .session
            .items()
            .iter()
            .any(|item| item.source().source == source);
        if !in_use && self.library.remove(source) {
            log::debug!("Released source document {}", source);
        }
        Some(removed)
    }

    /// Drop every item and every loaded document. Options survive.
    pub fn clear(&mut self) {
        self.session.clear();
        self.library.clear();
        self.release_export();
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Export the session to PDF bytes and keep them as the current
    /// artifact.
    ///
    /// The previous artifact is released only once the new one exists; a
    /// failed export leaves it in place.
    pub async fn export(&mut self) -> Result<&ExportArtifact> {
        if self.export_in_progress {
            return Err(RuntimeError::ExportInProgress);
        }

        self.export_in_progress = true;
        let result = export_pdf(&self.session, &self.library).await;
        self.export_in_progress = false;
        let bytes = result?;

        self.release_export();
        self.generation += 1;
        let artifact = self.last_export.insert(ExportArtifact {
            generation: self.generation,
            sheets: calculate_statistics(&self.session).sheets_to_print,
            bytes,
        });
        Ok(artifact)
    }

    /// Export and write the result to `path`
    pub async fn export_to(&mut self, path: impl AsRef<Path>) -> Result<&ExportArtifact> {
        self.export().await?;
        let Some(artifact) = self.last_export.as_ref() else {
            return Err(RuntimeError::Label(LabelError::NothingToExport));
        };
        save_pdf(&artifact.bytes, path).await?;
        Ok(artifact)
    }

    /// Drop the current export artifact, if any
    pub fn release_export(&mut self) -> Option<u64> {
        let released = self.last_export.take()?;
        log::debug!("Released export #{}", released.generation);
        Some(released.generation)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
