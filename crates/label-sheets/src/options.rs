use crate::constants::{
    DEFAULT_MAX_SHEETS, DEFAULT_SCALE_PERCENT, MAX_SCALE_PERCENT, MIN_SCALE_PERCENT,
};
use crate::layout::{LabelStock, LayoutSpec, PlacementPolicy};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Numeric Input Coercion
// =============================================================================

/// Coerce an offset to a usable value: non-finite input becomes 0
pub fn coerce_offset_mm(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

/// Coerce a scale percent: non-finite input becomes the default,
/// everything else is clamped to the accepted range
pub fn coerce_scale_percent(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(MIN_SCALE_PERCENT, MAX_SCALE_PERCENT)
    } else {
        DEFAULT_SCALE_PERCENT
    }
}

/// Parse an offset typed by the user; blank or malformed text reads as 0
pub fn parse_offset_mm(text: &str) -> f32 {
    text.trim()
        .parse::<f32>()
        .map(coerce_offset_mm)
        .unwrap_or(0.0)
}

/// Parse a scale percent typed by the user; blank or malformed text reads
/// as the default scale
pub fn parse_scale_percent(text: &str) -> f32 {
    text.trim()
        .parse::<f32>()
        .map(coerce_scale_percent)
        .unwrap_or(DEFAULT_SCALE_PERCENT)
}

// =============================================================================
// Slot Adjustments
// =============================================================================

/// Per-slot-index nudge applied to whichever item occupies that slot on
/// any sheet
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotAdjustment {
    pub offset_x_mm: f32,
    pub offset_y_mm: f32,
    pub scale_percent: f32,
}

impl Default for SlotAdjustment {
    fn default() -> Self {
        Self {
            offset_x_mm: 0.0,
            offset_y_mm: 0.0,
            scale_percent: DEFAULT_SCALE_PERCENT,
        }
    }
}

impl SlotAdjustment {
    /// Create an adjustment, coercing each value into its valid range
    pub fn new(offset_x_mm: f32, offset_y_mm: f32, scale_percent: f32) -> Self {
        Self {
            offset_x_mm: coerce_offset_mm(offset_x_mm),
            offset_y_mm: coerce_offset_mm(offset_y_mm),
            scale_percent: coerce_scale_percent(scale_percent),
        }
    }

    /// Build an adjustment from raw text fields
    pub fn parse(x: &str, y: &str, scale: &str) -> Self {
        Self::new(
            parse_offset_mm(x),
            parse_offset_mm(y),
            parse_scale_percent(scale),
        )
    }

    /// Re-apply coercion, e.g. after deserializing hand-edited values
    pub fn coerced(self) -> Self {
        Self::new(self.offset_x_mm, self.offset_y_mm, self.scale_percent)
    }

    pub fn offset(&self) -> Offset {
        Offset::new(self.offset_x_mm, self.offset_y_mm)
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Named presets that bulk-set every slot adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OffsetPreset {
    /// Tuned for TRACX shipping labels
    Tracx,
    /// Tuned for Shopee shipping labels
    Shopee,
}

impl OffsetPreset {
    pub fn adjustment(self) -> SlotAdjustment {
        match self {
            OffsetPreset::Tracx => SlotAdjustment::new(-1.0, 4.0, 95.0),
            OffsetPreset::Shopee => SlotAdjustment::new(2.0, 0.0, 94.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OffsetPreset::Tracx => "tracx",
            OffsetPreset::Shopee => "shopee",
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Complete label placement configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelOptions {
    // Stock
    pub stock: LabelStock,

    // Placement policy
    pub scaling_mode: ScalingMode,
    pub clamp_to_slot: bool,
    pub clip_to_slot: bool,

    // Offsets
    pub sheet_offset: Offset,
    pub slot_adjustments: Vec<SlotAdjustment>,
    pub preset: Option<OffsetPreset>,

    // Output
    pub show_guide: bool,
    pub max_sheets: usize,
}

impl Default for LabelOptions {
    fn default() -> Self {
        let stock = LabelStock::default();
        let preset = OffsetPreset::Tracx;
        Self {
            slot_adjustments: vec![preset.adjustment(); stock.spec().slots_per_sheet()],
            stock,
            scaling_mode: ScalingMode::RespectOriginal,
            clamp_to_slot: false,
            clip_to_slot: true,
            sheet_offset: Offset::default(),
            preset: Some(preset),
            show_guide: true,
            max_sheets: DEFAULT_MAX_SHEETS,
        }
    }
}

impl LabelOptions {
    /// Default options for a given stock
    pub fn for_stock(stock: LabelStock) -> Self {
        let mut options = Self {
            stock,
            ..Default::default()
        };
        options.reset_adjustments();
        options
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let mut options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| LabelError::Config(format!("Failed to parse config: {}", e)))?;
        options.sheet_offset = Offset::new(
            coerce_offset_mm(options.sheet_offset.x_mm),
            coerce_offset_mm(options.sheet_offset.y_mm),
        );
        for adjustment in &mut options.slot_adjustments {
            *adjustment = adjustment.coerced();
        }
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LabelError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let layout = self.layout();
        layout.validate()?;

        if self.max_sheets == 0 {
            return Err(LabelError::Config(
                "Maximum sheet count must be at least 1".to_string(),
            ));
        }

        if self.slot_adjustments.len() != layout.slots_per_sheet() {
            return Err(LabelError::Config(format!(
                "Expected {} slot adjustments for {}, got {}",
                layout.slots_per_sheet(),
                self.stock.name(),
                self.slot_adjustments.len()
            )));
        }

        Ok(())
    }

    pub fn layout(&self) -> LayoutSpec {
        self.stock.spec()
    }

    pub fn policy(&self) -> PlacementPolicy {
        PlacementPolicy {
            scaling_mode: self.scaling_mode,
            clamp_to_slot: self.clamp_to_slot,
            clip_to_slot: self.clip_to_slot,
        }
    }

    /// Adjustment of a slot index; falls back to the default for slots the
    /// table does not cover
    pub fn adjustment_for(&self, slot: usize) -> SlotAdjustment {
        self.slot_adjustments.get(slot).copied().unwrap_or_default()
    }

    /// Rebuild the adjustment table for the current stock from the preset
    /// (or defaults when no preset is selected)
    pub fn reset_adjustments(&mut self) {
        let adjustment = self
            .preset
            .map(OffsetPreset::adjustment)
            .unwrap_or_default();
        self.slot_adjustments = vec![adjustment; self.layout().slots_per_sheet()];
    }
}
