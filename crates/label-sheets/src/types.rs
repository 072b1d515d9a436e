use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid source document '{name}': {reason}")]
    InvalidSource { name: String, reason: String },
    #[error("Sheet limit reached ({max_sheets} sheets)")]
    SheetLimit { max_sheets: usize },
    #[error("Slot {slot} on sheet {sheet} is already occupied")]
    SlotOccupied { sheet: usize, slot: usize },
    #[error("Slot {slot} is outside the sheet (0..{slots_per_sheet})")]
    SlotOutOfRange { slot: usize, slots_per_sheet: usize },
    #[error("Sheet {sheet} does not exist ({sheets} sheets)")]
    SheetOutOfRange { sheet: usize, sheets: usize },
    #[error("Unknown item {0}")]
    UnknownItem(ItemId),
    #[error("Unknown source document {0}")]
    UnknownSource(SourceId),
    #[error("No items are assigned to label slots")]
    NothingToExport,
}

pub type Result<T> = std::result::Result<T, LabelError>;

/// Stable identity of a placeable item.
///
/// Ids are handed out from a monotonic counter and never reused within a
/// session, so sheet cells can hold them across deletions of other items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a loaded source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc{}", self.0)
    }
}

/// One page of a source document (page is zero-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRef {
    pub source: SourceId,
    pub page: usize,
}

impl SourceRef {
    pub fn new(source: SourceId, page: usize) -> Self {
        Self { source, page }
    }
}

/// A (sheet, slot) coordinate, both zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotCoord {
    pub sheet: usize,
    pub slot: usize,
}

impl SlotCoord {
    pub fn new(sheet: usize, slot: usize) -> Self {
        Self { sheet, slot }
    }

    /// Human-facing label, 1-based: `p2 / slot 3`
    pub fn label(&self) -> String {
        format!("p{} / slot {}", self.sheet + 1, self.slot + 1)
    }
}

impl fmt::Display for SlotCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sheet, self.slot)
    }
}

/// Standard paper sizes used by the label stock catalog
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get dimensions in portrait orientation (width, height)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }
}

/// Sheet margins - distance from the page edge to the slot grid
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetMargins {
    pub top_mm: f32,
    pub bottom_mm: f32,
    pub left_mm: f32,
    pub right_mm: f32,
}

impl Default for SheetMargins {
    fn default() -> Self {
        Self::uniform(5.0)
    }
}

impl SheetMargins {
    /// Create uniform margins on all sides
    pub fn uniform(margin_mm: f32) -> Self {
        Self {
            top_mm: margin_mm,
            bottom_mm: margin_mm,
            left_mm: margin_mm,
            right_mm: margin_mm,
        }
    }
}

/// How a source page is scaled into its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalingMode {
    /// Keep the page's natural size, multiplied by the slot's scale percent
    #[default]
    RespectOriginal,
    /// Scale the page so its width matches the slot, then apply the scale percent
    FitToSlotWidth,
}

/// A translation in millimeters; positive y moves content up the sheet
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub x_mm: f32,
    pub y_mm: f32,
}

impl Offset {
    pub fn new(x_mm: f32, y_mm: f32) -> Self {
        Self { x_mm, y_mm }
    }

    /// The offset converted to points (x, y)
    pub fn to_pt(self) -> (f32, f32) {
        (
            crate::constants::mm_to_pt(self.x_mm),
            crate::constants::mm_to_pt(self.y_mm),
        )
    }
}

/// Statistics about the current session
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStatistics {
    /// Total number of items (source pages) in the session
    pub items: usize,
    /// Items bound to a slot
    pub assigned: usize,
    /// Items waiting for a free slot
    pub unassigned: usize,
    /// Sheets in the sheet model, including empty trailing sheets
    pub total_sheets: usize,
    /// Sheets that an export would print
    pub sheets_to_print: usize,
    /// Empty slots across all existing sheets
    pub free_slots: usize,
    /// Empty slots still reachable by growing up to the sheet limit
    pub remaining_capacity: usize,
}
