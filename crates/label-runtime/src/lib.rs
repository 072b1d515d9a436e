use std::path::PathBuf;
use thiserror::Error;

mod worker;
mod workspace;

pub use worker::worker_task;
pub use workspace::{ExportArtifact, UploadFailure, UploadReport, Workspace};

// Re-export types from the engine crate
pub use label_sheets::{
    AutoAssignReport, ClickOutcome, DragOutcome, ItemId, LabelError, LabelOptions,
    LabelStatistics, LabelStock, OffsetPreset, SlotAdjustment, SlotCoord,
};

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error("An export is already running")]
    ExportInProgress,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Commands sent from the front end to the worker
#[derive(Debug)]
pub enum LabelCommand {
    AddFiles {
        paths: Vec<PathBuf>,
    },
    AddBytes {
        name: String,
        bytes: Vec<u8>,
    },
    ClickSlot {
        coord: SlotCoord,
    },
    DragSlot {
        from: SlotCoord,
        to: SlotCoord,
    },
    RemoveItem {
        id: ItemId,
    },
    /// Retry auto-assign for items left over after the sheet limit was hit
    AssignPending,
    AddSheet,
    SetStock {
        stock: LabelStock,
    },
    ApplyPreset {
        preset: OffsetPreset,
    },
    SetSlotAdjustment {
        slot: usize,
        adjustment: SlotAdjustment,
    },
    SetSheetOffset {
        x_mm: f32,
        y_mm: f32,
    },
    LoadConfig {
        path: PathBuf,
    },
    SaveConfig {
        path: PathBuf,
    },
    CalculateStats,
    Export {
        output_path: Option<PathBuf>,
    },
    Clear,
}

/// Updates sent from the worker to the front end
#[derive(Debug, Clone)]
pub enum LabelUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    /// A file was loaded and its pages queued
    FileAdded {
        name: String,
        page_count: usize,
        report: AutoAssignReport,
    },
    FileRejected {
        name: String,
        message: String,
    },
    /// Sheet limit reached; these items wait for a free slot
    CapacityExhausted {
        unplaced: Vec<ItemId>,
    },
    Clicked {
        outcome: ClickOutcome,
    },
    Dragged {
        outcome: DragOutcome,
    },
    /// Cells or items changed without a more specific update
    SessionChanged,
    ConfigLoaded {
        options: LabelOptions,
    },
    ConfigSaved {
        path: PathBuf,
    },
    StatsCalculated {
        stats: LabelStatistics,
    },
    ExportStarted,
    ExportComplete {
        generation: u64,
        sheets: usize,
        size: usize,
        path: Option<PathBuf>,
    },
    Error {
        message: String,
    },
}
