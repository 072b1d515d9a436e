//! Shared constants for label sheet layout
//!
//! This module centralizes magic numbers and constants used throughout
//! slot geometry, placement and export.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

/// Tolerance used when comparing geometry computed in points
pub const GEOMETRY_EPSILON: f32 = 1e-3;

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Fallback source page width in points, used when a page has no MediaBox
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Fallback source page height in points
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Slot Adjustments
// =============================================================================

/// Smallest accepted per-slot scale (percent)
pub const MIN_SCALE_PERCENT: f32 = 10.0;

/// Largest accepted per-slot scale (percent)
pub const MAX_SCALE_PERCENT: f32 = 200.0;

/// Scale used when a slot has no explicit value or the value is unusable
pub const DEFAULT_SCALE_PERCENT: f32 = 95.0;

// =============================================================================
// Sheets
// =============================================================================

/// Default upper bound on the number of label sheets in a session
pub const DEFAULT_MAX_SHEETS: usize = 40;

// =============================================================================
// Guides
// =============================================================================

/// Stroke width of the slot guide rectangles (points)
pub const GUIDE_LINE_WIDTH: f32 = 0.5;

/// Gray level of the slot guide rectangles (0 = black, 1 = white)
pub const GUIDE_GRAY: f32 = 0.2;
