//! Slot grid geometry
//!
//! Pure functions mapping a row-major slot index to its rectangle on the
//! sheet. Row 0 is the top row; rectangles use the bottom-up PDF axis.

use crate::constants::mm_to_pt;

use super::{GridPosition, LayoutSpec, Rect};

// =============================================================================
// Slot Positions
// =============================================================================

/// Row and column of a slot index (row-major).
///
/// # Panics
/// If `slot_index` is not below `layout.slots_per_sheet()`.
pub fn slot_position(layout: &LayoutSpec, slot_index: usize) -> GridPosition {
    assert!(
        slot_index < layout.slots_per_sheet(),
        "slot index {} out of range for a {}x{} layout",
        slot_index,
        layout.rows,
        layout.cols
    );
    GridPosition::new(slot_index / layout.cols, slot_index % layout.cols)
}

/// Rectangle of a slot on the sheet, in points.
///
/// `x = left + col * (slot_width + h_gap)`; the top edge of row `r` sits at
/// `page_height - top - r * (slot_height + v_gap)` and `y` is that minus the
/// slot height.
///
/// # Panics
/// If `slot_index` is not below `layout.slots_per_sheet()`.
pub fn slot_rect(layout: &LayoutSpec, slot_index: usize) -> Rect {
    let pos = slot_position(layout, slot_index);

    let slot_w = layout.slot_width_pt();
    let slot_h = layout.slot_height_pt();
    let h_gap = mm_to_pt(layout.h_gap_mm);
    let v_gap = mm_to_pt(layout.v_gap_mm);

    let x = mm_to_pt(layout.margins.left_mm) + pos.col as f32 * (slot_w + h_gap);
    let top = layout.page_height_pt()
        - mm_to_pt(layout.margins.top_mm)
        - pos.row as f32 * (slot_h + v_gap);

    Rect::new(x, top - slot_h, slot_w, slot_h)
}

/// Rectangles of every slot on a sheet, in slot order
pub fn slot_rects(layout: &LayoutSpec) -> Vec<Rect> {
    (0..layout.slots_per_sheet())
        .map(|slot| slot_rect(layout, slot))
        .collect()
}

/// The page area inside the sheet margins, in points
pub fn printable_area(layout: &LayoutSpec) -> Rect {
    let left = mm_to_pt(layout.margins.left_mm);
    let bottom = mm_to_pt(layout.margins.bottom_mm);
    Rect::new(
        left,
        bottom,
        layout.page_width_pt() - left - mm_to_pt(layout.margins.right_mm),
        layout.page_height_pt() - bottom - mm_to_pt(layout.margins.top_mm),
    )
}

// =============================================================================
// Tests
// =============================================================================
