pub mod constants;
pub mod export;
pub mod layout;
mod options;
mod registry;
mod render;
mod session;
mod sheets;
mod stats;
mod types;

pub use constants::{mm_to_pt, pt_to_mm};
pub use export::{
    ExportPlan, SheetPlan, SlotDraw, SourceDocument, SourceLibrary, SourcePages, export_pdf,
    load_pdf, plan_export, render_plan, save_pdf,
};
pub use layout::{LabelStock, LayoutSpec, Placement, PlacementPolicy, Rect};
pub use options::*;
pub use registry::{Item, ItemRegistry};
pub use render::{guide_ops, placement_ops};
pub use session::{AutoAssignReport, ClickOutcome, DragOutcome, Session};
pub use sheets::{Sheet, SheetModel};
pub use stats::calculate_statistics;
pub use types::*;
