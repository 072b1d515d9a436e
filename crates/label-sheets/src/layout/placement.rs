//! Content placement within slots
//!
//! This module turns a slot rectangle and a source page size into the
//! numbers a PDF writer needs to stamp the page into the slot:
//! - Scale (respect-original or fit-to-width, times the slot's percent)
//! - Optional clamp so the scaled page never exceeds the slot
//! - Draw origin after global and per-slot offsets, top-aligned to the slot
//! - Optional clip rectangle equal to the un-offset slot

use crate::options::SlotAdjustment;
use crate::types::{Offset, ScalingMode};

use super::Rect;

/// Scaling and safety policy shared by every slot of an export
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPolicy {
    pub scaling_mode: ScalingMode,
    /// Shrink the scale so the rendered page fits inside the slot
    pub clamp_to_slot: bool,
    /// Hide anything drawn outside the slot rectangle
    pub clip_to_slot: bool,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            scaling_mode: ScalingMode::RespectOriginal,
            clamp_to_slot: false,
            clip_to_slot: true,
        }
    }
}

/// Final placement of a source page inside a slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Left edge of the rendered page
    pub draw_x: f32,
    /// Bottom edge of the rendered page
    pub draw_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Rendered width (natural width x scale)
    pub width: f32,
    /// Rendered height (natural height x scale)
    pub height: f32,
    /// Clip region to apply before drawing, removed afterwards
    pub clip: Option<Rect>,
}

impl Placement {
    /// Area covered by the rendered page, before clipping
    pub fn content_rect(&self) -> Rect {
        Rect::new(self.draw_x, self.draw_y, self.width, self.height)
    }
}

/// Calculate the scale factor of a source page inside a slot.
///
/// `RespectOriginal` starts from `percent / 100`; `FitToSlotWidth` starts
/// from `slot_width / natural_width * percent / 100`. With `clamp` the
/// result is capped so the page fits the slot: both axes for
/// `RespectOriginal`, height only for `FitToSlotWidth`.
pub fn calculate_scale(
    natural_width: f32,
    natural_height: f32,
    slot_width: f32,
    slot_height: f32,
    mode: ScalingMode,
    scale_percent: f32,
    clamp: bool,
) -> f32 {
    let percent = scale_percent / 100.0;

    let base = match mode {
        ScalingMode::RespectOriginal => percent,
        ScalingMode::FitToSlotWidth if natural_width > 0.0 => {
            (slot_width / natural_width) * percent
        }
        ScalingMode::FitToSlotWidth => percent,
    };

    if !clamp {
        return base;
    }

    let fit_w = if natural_width > 0.0 {
        slot_width / natural_width
    } else {
        f32::INFINITY
    };
    let fit_h = if natural_height > 0.0 {
        slot_height / natural_height
    } else {
        f32::INFINITY
    };

    let max_scale = match mode {
        ScalingMode::RespectOriginal => fit_w.min(fit_h),
        ScalingMode::FitToSlotWidth => fit_h,
    };

    base.min(max_scale)
}

/// Place a source page of `natural_width` x `natural_height` points into
/// `slot`.
///
/// Offsets move the content only; the clip rectangle is always the
/// un-offset slot, so content pushed past the slot edge stays hidden.
pub fn place_in_slot(
    slot: &Rect,
    natural_width: f32,
    natural_height: f32,
    policy: &PlacementPolicy,
    adjustment: &SlotAdjustment,
    sheet_offset: &Offset,
) -> Placement {
    let scale = calculate_scale(
        natural_width,
        natural_height,
        slot.width,
        slot.height,
        policy.scaling_mode,
        adjustment.scale_percent,
        policy.clamp_to_slot,
    );

    let width = natural_width * scale;
    let height = natural_height * scale;

    let (sheet_dx, sheet_dy) = sheet_offset.to_pt();
    let (slot_dx, slot_dy) = adjustment.offset().to_pt();

    let draw_x = slot.x + sheet_dx + slot_dx;
    // Top edge of the content meets the (offset) top edge of the slot
    let draw_top = slot.top() + sheet_dy + slot_dy;

    Placement {
        draw_x,
        draw_y: draw_top - height,
        scale_x: scale,
        scale_y: scale,
        width,
        height,
        clip: policy.clip_to_slot.then_some(*slot),
    }
}
