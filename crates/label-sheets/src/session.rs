//! Assignment engine
//!
//! [`Session`] bundles the item registry, the sheet model, the selection and
//! the options into one context object. It is the only writer of sheet
//! cells and item assignments, and keeps the two in step: every occupied
//! cell holds an item whose assignment points back at that cell, and no
//! item sits in more than one cell.

use crate::layout::{LabelStock, LayoutSpec};
use crate::options::{LabelOptions, OffsetPreset, SlotAdjustment, coerce_offset_mm};
use crate::registry::{Item, ItemRegistry};
use crate::sheets::SheetModel;
use crate::types::*;

/// Result of an auto-assign run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoAssignReport {
    /// Items placed by this run, in placement order
    pub placed: Vec<(ItemId, SlotCoord)>,
    /// Items left unassigned because the sheet limit was reached
    pub unplaced: Vec<ItemId>,
}

impl AutoAssignReport {
    /// True when every requested item found a slot
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// What a click on a slot did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The slot held an item, which is now selected
    Selected(ItemId),
    /// The selected item moved into the (empty) slot
    Moved {
        item: ItemId,
        from: Option<SlotCoord>,
        to: SlotCoord,
    },
    /// Nothing happened
    Ignored,
}

/// What a drag from one slot to another did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Moved { item: ItemId, to: SlotCoord },
    Swapped { first: ItemId, second: ItemId },
    Ignored,
}

/// All state of one label layout session
#[derive(Debug, Clone)]
pub struct Session {
    options: LabelOptions,
    layout: LayoutSpec,
    items: ItemRegistry,
    sheets: SheetModel,
    selection: Option<ItemId>,
}

impl Session {
    pub fn new(options: LabelOptions) -> Result<Self> {
        options.validate()?;
        let layout = options.layout();
        Ok(Self {
            sheets: SheetModel::new(layout.slots_per_sheet()),
            items: ItemRegistry::new(),
            selection: None,
            layout,
            options,
        })
    }

    pub fn options(&self) -> &LabelOptions {
        &self.options
    }

    pub fn layout(&self) -> &LayoutSpec {
        &self.layout
    }

    pub fn items(&self) -> &ItemRegistry {
        &self.items
    }

    pub fn sheets(&self) -> &SheetModel {
        &self.sheets
    }

    pub fn selection(&self) -> Option<ItemId> {
        self.selection
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.selection.and_then(|id| self.items.get(id))
    }

    // =========================================================================
    // Adding Items
    // =========================================================================

    /// Register one unassigned item per page of a document, in page order
    pub fn add_items(&mut self, source: SourceId, name: &str, page_count: usize) -> Vec<ItemId> {
        (0..page_count)
            .map(|page| {
                let label = if page_count == 1 {
                    name.to_string()
                } else {
                    format!("{} p{}", name, page + 1)
                };
                self.items.add(SourceRef::new(source, page), label)
            })
            .collect()
    }

    /// Register a document's pages, then auto-assign every pending item.
    ///
    /// Items still waiting from an earlier upload come first, so a freed
    /// cell goes to the oldest unassigned item rather than to the new pages.
    pub fn add_document(
        &mut self,
        source: SourceId,
        name: &str,
        page_count: usize,
    ) -> AutoAssignReport {
        let ids = self.add_items(source, name, page_count);
        log::debug!("Registered {} item(s) from {}", ids.len(), name);
        self.auto_assign_pending()
    }

    // =========================================================================
    // Auto-assign
    // =========================================================================

    /// First-fit placement of `ids` in order.
    ///
    /// Each unassigned item takes the first empty cell (sheets in order,
    /// slots row-major). When no cell is empty a sheet is appended, up to
    /// `max_sheets`. At the limit the run stops and the rest are reported
    /// as unplaced; items placed so far keep their slots. Items that are
    /// already assigned or unknown are skipped.
    pub fn auto_assign(&mut self, ids: &[ItemId]) -> AutoAssignReport {
        let mut report = AutoAssignReport::default();

        for (position, &id) in ids.iter().enumerate() {
            match self.items.get(id) {
                Some(item) if !item.is_assigned() => {}
                _ => continue,
            }

            if self.sheets.first_empty().is_none()
                && self.sheets.sheet_count() < self.options.max_sheets
            {
                self.sheets.ensure_capacity(1);
            }

            let Some(coord) = self.sheets.first_empty() else {
                report.unplaced = ids[position..]
                    .iter()
                    .copied()
                    .filter(|&id| self.items.get(id).is_some_and(|item| !item.is_assigned()))
                    .collect();
                log::warn!(
                    "No free label slot left ({} sheets max, {} per sheet); {} item(s) unassigned",
                    self.options.max_sheets,
                    self.sheets.slots_per_sheet(),
                    report.unplaced.len()
                );
                break;
            };

            self.bind(id, coord);
            report.placed.push((id, coord));
        }

        report
    }

    /// Auto-assign every unassigned item in registry order
    pub fn auto_assign_pending(&mut self) -> AutoAssignReport {
        let pending = self.items.unassigned();
        self.auto_assign(&pending)
    }

    // =========================================================================
    // Selection and Moves
    // =========================================================================

    /// Select an item. Returns false (and leaves the selection alone) for
    /// unknown ids.
    pub fn select_item(&mut self, id: ItemId) -> bool {
        if self.items.get(id).is_none() {
            return false;
        }
        self.selection = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Move the selected item into an empty cell.
    ///
    /// Click moves never overwrite: nothing happens when there is no
    /// selection or the target is occupied or off the sheets.
    pub fn move_selected_to(&mut self, target: SlotCoord) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        let Some(item) = self.items.get(id) else {
            return false;
        };
        if !self.sheets.is_empty_cell(target) {
            return false;
        }

        if let Some(from) = item.assignment() {
            if self.sheets.get(from) == Some(id) {
                self.sheets.vacate(from);
            }
        }
        self.bind(id, target);
        log::debug!("Moved item {} to {}", id, target.label());
        true
    }

    /// Drag the content of `src` onto `dest`: a move when `dest` is empty,
    /// a swap when it is occupied. Ignored when `src` is empty, either cell
    /// is off the sheets, or both are the same cell.
    pub fn drag_swap(&mut self, src: SlotCoord, dest: SlotCoord) -> DragOutcome {
        if src == dest || !self.sheets.contains(src) || !self.sheets.contains(dest) {
            return DragOutcome::Ignored;
        }
        let Some(moving) = self.sheets.get(src) else {
            return DragOutcome::Ignored;
        };

        let Ok((at_src, at_dest)) = self.sheets.swap(src, dest) else {
            return DragOutcome::Ignored;
        };
        if let Some(id) = at_src {
            self.items.set_assignment(id, Some(src));
        }
        if let Some(id) = at_dest {
            self.items.set_assignment(id, Some(dest));
        }

        match at_src {
            Some(other) => {
                log::debug!("Swapped items {} and {}", moving, other);
                DragOutcome::Swapped {
                    first: moving,
                    second: other,
                }
            }
            None => {
                log::debug!("Moved item {} to {}", moving, dest.label());
                DragOutcome::Moved {
                    item: moving,
                    to: dest,
                }
            }
        }
    }

    /// Click on a slot: an occupied slot selects its item, an empty slot
    /// receives the selected item.
    pub fn click_slot(&mut self, coord: SlotCoord) -> ClickOutcome {
        if let Some(id) = self.sheets.get(coord) {
            self.selection = Some(id);
            return ClickOutcome::Selected(id);
        }

        let Some(id) = self.selection else {
            return ClickOutcome::Ignored;
        };
        let from = self.items.get(id).and_then(Item::assignment);
        if self.move_selected_to(coord) {
            ClickOutcome::Moved { item: id, from, to: coord }
        } else {
            ClickOutcome::Ignored
        }
    }

    /// Free an item's cell without removing the item
    pub fn unassign(&mut self, id: ItemId) -> bool {
        let Some(coord) = self.items.get(id).and_then(Item::assignment) else {
            return false;
        };
        if self.sheets.get(coord) == Some(id) {
            self.sheets.vacate(coord);
        }
        self.items.set_assignment(id, None)
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove an item, vacating its cell first
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let assignment = self.items.get(id)?.assignment();
        if let Some(coord) = assignment {
            if self.sheets.get(coord) == Some(id) {
                self.sheets.vacate(coord);
            }
        }
        if self.selection == Some(id) {
            self.selection = None;
        }
        let removed = self.items.remove(id);
        log::debug!("Removed item {}", id);
        removed
    }

    /// Remove the item at a display position
    pub fn remove_at(&mut self, ordinal: usize) -> Option<Item> {
        let id = self.items.at(ordinal)?.id();
        self.remove_item(id)
    }

    /// Drop every item and go back to one empty sheet. Options survive.
    pub fn clear(&mut self) {
        self.items.clear();
        self.sheets.reset();
        self.selection = None;
    }

    // =========================================================================
    // Sheets
    // =========================================================================

    /// Append an empty sheet, returning its index
    pub fn add_sheet(&mut self) -> Result<usize> {
        if self.sheets.sheet_count() >= self.options.max_sheets {
            return Err(LabelError::SheetLimit {
                max_sheets: self.options.max_sheets,
            });
        }
        Ok(self.sheets.append())
    }

    pub fn set_max_sheets(&mut self, max_sheets: usize) -> Result<()> {
        if max_sheets == 0 {
            return Err(LabelError::Config(
                "Maximum sheet count must be at least 1".to_string(),
            ));
        }
        self.options.max_sheets = max_sheets;
        Ok(())
    }

    // =========================================================================
    // Layout and Adjustments
    // =========================================================================

    /// Switch to another label stock.
    ///
    /// Slot adjustments are rebuilt from the preset, the sheet model is
    /// rebuilt for the new grid and all items are auto-assigned again in
    /// registry order.
    pub fn set_stock(&mut self, stock: LabelStock) -> Result<AutoAssignReport> {
        let layout = stock.spec();
        layout.validate()?;

        self.options.stock = stock;
        self.options.reset_adjustments();
        self.layout = layout;
        self.sheets = SheetModel::new(layout.slots_per_sheet());
        self.items.clear_assignments();

        log::info!(
            "Switched to {} ({}x{} slots)",
            stock.name(),
            layout.cols,
            layout.rows
        );
        Ok(self.auto_assign_pending())
    }

    /// Replace the whole configuration, e.g. after loading a config file.
    /// A different slot grid rebuilds the sheets as [`Session::set_stock`]
    /// does; otherwise assignments are kept.
    pub fn set_options(&mut self, options: LabelOptions) -> Result<AutoAssignReport> {
        options.validate()?;
        let layout = options.layout();
        let regrid = layout != self.layout;
        self.options = options;
        self.layout = layout;

        if !regrid {
            return Ok(AutoAssignReport::default());
        }
        self.sheets = SheetModel::new(layout.slots_per_sheet());
        self.items.clear_assignments();
        Ok(self.auto_assign_pending())
    }

    pub fn set_scaling_mode(&mut self, mode: ScalingMode) {
        self.options.scaling_mode = mode;
    }

    pub fn set_clamp_to_slot(&mut self, clamp: bool) {
        self.options.clamp_to_slot = clamp;
    }

    pub fn set_clip_to_slot(&mut self, clip: bool) {
        self.options.clip_to_slot = clip;
    }

    pub fn set_show_guide(&mut self, show: bool) {
        self.options.show_guide = show;
    }

    /// Set the global sheet offset; non-finite values read as 0
    pub fn set_sheet_offset(&mut self, x_mm: f32, y_mm: f32) {
        self.options.sheet_offset = Offset::new(coerce_offset_mm(x_mm), coerce_offset_mm(y_mm));
    }

    /// Replace the adjustment of one slot index (values are coerced)
    pub fn set_slot_adjustment(&mut self, slot: usize, adjustment: SlotAdjustment) -> Result<()> {
        let slots_per_sheet = self.layout.slots_per_sheet();
        let entry = self
            .options
            .slot_adjustments
            .get_mut(slot)
            .ok_or(LabelError::SlotOutOfRange {
                slot,
                slots_per_sheet,
            })?;
        *entry = adjustment.coerced();
        Ok(())
    }

    /// Give every slot index the same adjustment
    pub fn apply_bulk_adjustment(&mut self, adjustment: SlotAdjustment) {
        let adjustment = adjustment.coerced();
        for entry in &mut self.options.slot_adjustments {
            *entry = adjustment;
        }
    }

    /// Select a preset and apply its values to every slot
    pub fn apply_preset(&mut self, preset: OffsetPreset) {
        self.options.preset = Some(preset);
        self.apply_bulk_adjustment(preset.adjustment());
        log::debug!("Applied preset {}", preset.name());
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    /// Check that cells and assignments agree in both directions and that
    /// no item occupies more than one cell.
    pub fn check_consistency(&self) -> std::result::Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for (coord, id) in self.sheets.occupied() {
            if !seen.insert(id) {
                return Err(format!("item {} occupies more than one cell", id));
            }
            match self.items.get(id) {
                Some(item) if item.assignment() == Some(coord) => {}
                Some(item) => {
                    return Err(format!(
                        "cell {} holds item {} assigned to {:?}",
                        coord,
                        id,
                        item.assignment()
                    ));
                }
                None => return Err(format!("cell {} holds unknown item {}", coord, id)),
            }
        }

        for item in self.items.iter() {
            if let Some(coord) = item.assignment() {
                if self.sheets.get(coord) != Some(item.id()) {
                    return Err(format!(
                        "item {} assigned to {} but the cell holds {:?}",
                        item.id(),
                        coord,
                        self.sheets.get(coord)
                    ));
                }
            }
        }

        if self
            .selection
            .is_some_and(|id| self.items.get(id).is_none())
        {
            return Err("selection refers to a removed item".to_string());
        }

        Ok(())
    }

    fn bind(&mut self, id: ItemId, coord: SlotCoord) {
        if self.sheets.occupy(coord, id).is_ok() {
            self.items.set_assignment(id, Some(coord));
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        let options = LabelOptions::default();
        let layout = options.layout();
        Self {
            sheets: SheetModel::new(layout.slots_per_sheet()),
            items: ItemRegistry::new(),
            selection: None,
            layout,
            options,
        }
    }
}
