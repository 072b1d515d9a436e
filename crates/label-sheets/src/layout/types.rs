//! Layout data types for label sheets
//!
//! These types describe the physical slot grid of a label stock and the
//! rectangles computed from it. All rectangles are in PDF points with a
//! bottom-up vertical axis (y = 0 is the bottom edge of the sheet).

use crate::constants::{GEOMETRY_EPSILON, mm_to_pt};
use crate::types::{LabelError, PaperSize, Result, SheetMargins};

/// Position within the slot grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when the interiors of the two rectangles intersect.
    /// Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x + GEOMETRY_EPSILON < other.right()
            && other.x + GEOMETRY_EPSILON < self.right()
            && self.y + GEOMETRY_EPSILON < other.top()
            && other.y + GEOMETRY_EPSILON < self.top()
    }

    /// True when `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.x + GEOMETRY_EPSILON >= self.x
            && other.y + GEOMETRY_EPSILON >= self.y
            && other.right() <= self.right() + GEOMETRY_EPSILON
            && other.top() <= self.top() + GEOMETRY_EPSILON
    }
}

/// Physical description of a label stock: page size, margins, gaps and a
/// `rows` x `cols` grid of equally sized slots.
///
/// Dimensions are in millimeters; the `*_pt` accessors convert to points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSpec {
    pub rows: usize,
    pub cols: usize,
    pub slot_width_mm: f32,
    pub slot_height_mm: f32,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margins: SheetMargins,
    /// Gap between adjacent columns
    pub h_gap_mm: f32,
    /// Gap between adjacent rows
    pub v_gap_mm: f32,
}

impl LayoutSpec {
    /// Build a layout whose slots fill the page inside the margins and gaps.
    pub fn fill_page(
        paper: PaperSize,
        rows: usize,
        cols: usize,
        margins: SheetMargins,
        h_gap_mm: f32,
        v_gap_mm: f32,
    ) -> Self {
        let (page_width_mm, page_height_mm) = paper.dimensions_mm();
        let usable_w = page_width_mm - margins.left_mm - margins.right_mm;
        let usable_h = page_height_mm - margins.top_mm - margins.bottom_mm;
        let gaps_w = cols.saturating_sub(1) as f32 * h_gap_mm;
        let gaps_h = rows.saturating_sub(1) as f32 * v_gap_mm;

        Self {
            rows,
            cols,
            slot_width_mm: (usable_w - gaps_w) / cols.max(1) as f32,
            slot_height_mm: (usable_h - gaps_h) / rows.max(1) as f32,
            page_width_mm,
            page_height_mm,
            margins,
            h_gap_mm,
            v_gap_mm,
        }
    }

    /// Number of slots on one sheet
    pub fn slots_per_sheet(&self) -> usize {
        self.rows * self.cols
    }

    pub fn page_width_pt(&self) -> f32 {
        mm_to_pt(self.page_width_mm)
    }

    pub fn page_height_pt(&self) -> f32 {
        mm_to_pt(self.page_height_mm)
    }

    pub fn slot_width_pt(&self) -> f32 {
        mm_to_pt(self.slot_width_mm)
    }

    pub fn slot_height_pt(&self) -> f32 {
        mm_to_pt(self.slot_height_mm)
    }

    /// Width of the whole slot grid including gaps (mm)
    pub fn grid_width_mm(&self) -> f32 {
        self.cols as f32 * self.slot_width_mm + self.cols.saturating_sub(1) as f32 * self.h_gap_mm
    }

    /// Height of the whole slot grid including gaps (mm)
    pub fn grid_height_mm(&self) -> f32 {
        self.rows as f32 * self.slot_height_mm + self.rows.saturating_sub(1) as f32 * self.v_gap_mm
    }

    /// Validate the layout
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(LabelError::Config(
                "Layout must have at least one row and one column".to_string(),
            ));
        }

        let positive = [
            ("slot width", self.slot_width_mm),
            ("slot height", self.slot_height_mm),
            ("page width", self.page_width_mm),
            ("page height", self.page_height_mm),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LabelError::Config(format!(
                    "Layout {} must be positive, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("top margin", self.margins.top_mm),
            ("bottom margin", self.margins.bottom_mm),
            ("left margin", self.margins.left_mm),
            ("right margin", self.margins.right_mm),
            ("horizontal gap", self.h_gap_mm),
            ("vertical gap", self.v_gap_mm),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LabelError::Config(format!(
                    "Layout {} must not be negative, got {}",
                    name, value
                )));
            }
        }

        let tolerance = 0.01;
        if self.margins.left_mm + self.grid_width_mm()
            > self.page_width_mm - self.margins.right_mm + tolerance
        {
            return Err(LabelError::Config(
                "Slot grid is wider than the printable page area".to_string(),
            ));
        }
        if self.margins.top_mm + self.grid_height_mm()
            > self.page_height_mm - self.margins.bottom_mm + tolerance
        {
            return Err(LabelError::Config(
                "Slot grid is taller than the printable page area".to_string(),
            ));
        }

        Ok(())
    }
}
