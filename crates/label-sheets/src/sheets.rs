//! Placement sheet model
//!
//! A growable list of label sheets, each a fixed-length row-major array of
//! slot cells holding an [`ItemId`] or nothing. Mutation is crate-private:
//! [`Session`](crate::Session) keeps the cells and the items' assignments in
//! step, so every write goes through it.

use crate::types::{ItemId, LabelError, Result, SlotCoord};

/// One physical output page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    cells: Vec<Option<ItemId>>,
}

impl Sheet {
    fn empty(slots: usize) -> Self {
        Self {
            cells: vec![None; slots],
        }
    }

    /// Cell contents in slot order
    pub fn cells(&self) -> &[Option<ItemId>] {
        &self.cells
    }

    pub fn get(&self, slot: usize) -> Option<ItemId> {
        self.cells.get(slot).copied().flatten()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    fn first_empty(&self) -> Option<usize> {
        self.cells.iter().position(Option::is_none)
    }
}

/// All sheets of a session. At least one sheet always exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetModel {
    slots_per_sheet: usize,
    sheets: Vec<Sheet>,
}

impl SheetModel {
    /// Create a model with a single empty sheet.
    ///
    /// # Panics
    /// If `slots_per_sheet` is zero.
    pub fn new(slots_per_sheet: usize) -> Self {
        assert!(slots_per_sheet > 0, "a sheet needs at least one slot");
        Self {
            slots_per_sheet,
            sheets: vec![Sheet::empty(slots_per_sheet)],
        }
    }

    pub fn slots_per_sheet(&self) -> usize {
        self.slots_per_sheet
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Item occupying a cell, if any. Out-of-range coordinates read as empty.
    pub fn get(&self, coord: SlotCoord) -> Option<ItemId> {
        self.sheets.get(coord.sheet)?.get(coord.slot)
    }

    pub fn contains(&self, coord: SlotCoord) -> bool {
        coord.sheet < self.sheets.len() && coord.slot < self.slots_per_sheet
    }

    pub fn is_empty_cell(&self, coord: SlotCoord) -> bool {
        self.contains(coord) && self.get(coord).is_none()
    }

    /// Total number of empty cells across all sheets
    pub fn empty_cells(&self) -> usize {
        self.sheets
            .iter()
            .map(|sheet| self.slots_per_sheet - sheet.occupied_count())
            .sum()
    }

    /// First empty cell scanning sheets in order, slots in row-major order
    pub fn first_empty(&self) -> Option<SlotCoord> {
        self.sheets
            .iter()
            .enumerate()
            .find_map(|(index, sheet)| sheet.first_empty().map(|slot| SlotCoord::new(index, slot)))
    }

    /// Cell currently holding `id`
    pub fn find(&self, id: ItemId) -> Option<SlotCoord> {
        self.occupied()
            .find(|&(_, occupant)| occupant == id)
            .map(|(coord, _)| coord)
    }

    /// Every occupied cell, in (sheet, slot) order
    pub fn occupied(&self) -> impl Iterator<Item = (SlotCoord, ItemId)> + '_ {
        self.sheets.iter().enumerate().flat_map(|(index, sheet)| {
            sheet
                .cells
                .iter()
                .enumerate()
                .filter_map(move |(slot, cell)| cell.map(|id| (SlotCoord::new(index, slot), id)))
        })
    }

    /// Index of the last sheet holding at least one item
    pub fn last_used_sheet(&self) -> Option<usize> {
        self.sheets.iter().rposition(|sheet| !sheet.is_empty())
    }

    // =========================================================================
    // Mutation (crate-private)
    // =========================================================================

    /// Append one empty sheet and return its index
    pub(crate) fn append(&mut self) -> usize {
        self.sheets.push(Sheet::empty(self.slots_per_sheet));
        self.sheets.len() - 1
    }

    /// Append sheets until at least `n` empty cells exist. Returns the
    /// number of sheets appended.
    pub(crate) fn ensure_capacity(&mut self, n: usize) -> usize {
        let mut appended = 0;
        let mut empty = self.empty_cells();
        while empty < n {
            self.append();
            empty += self.slots_per_sheet;
            appended += 1;
        }
        appended
    }

    /// Place `id` into an empty cell. Occupied cells are never overwritten.
    pub(crate) fn occupy(&mut self, coord: SlotCoord, id: ItemId) -> Result<()> {
        self.check(coord)?;
        let cell = &mut self.sheets[coord.sheet].cells[coord.slot];
        if cell.is_some() {
            return Err(LabelError::SlotOccupied {
                sheet: coord.sheet,
                slot: coord.slot,
            });
        }
        *cell = Some(id);
        Ok(())
    }

    /// Clear a cell unconditionally, returning what it held
    pub(crate) fn vacate(&mut self, coord: SlotCoord) -> Option<ItemId> {
        self.sheets
            .get_mut(coord.sheet)?
            .cells
            .get_mut(coord.slot)?
            .take()
    }

    /// Exchange the contents of two cells (either may be empty). Returns the
    /// new contents of `a` and `b`.
    pub(crate) fn swap(
        &mut self,
        a: SlotCoord,
        b: SlotCoord,
    ) -> Result<(Option<ItemId>, Option<ItemId>)> {
        self.check(a)?;
        self.check(b)?;
        let first = self.sheets[a.sheet].cells[a.slot];
        let second = self.sheets[b.sheet].cells[b.slot];
        self.sheets[a.sheet].cells[a.slot] = second;
        self.sheets[b.sheet].cells[b.slot] = first;
        Ok((second, first))
    }

    /// Drop every occupant and go back to a single empty sheet
    pub(crate) fn reset(&mut self) {
        self.sheets = vec![Sheet::empty(self.slots_per_sheet)];
    }

    fn check(&self, coord: SlotCoord) -> Result<()> {
        if coord.sheet >= self.sheets.len() {
            return Err(LabelError::SheetOutOfRange {
                sheet: coord.sheet,
                sheets: self.sheets.len(),
            });
        }
        if coord.slot >= self.slots_per_sheet {
            return Err(LabelError::SlotOutOfRange {
                slot: coord.slot,
                slots_per_sheet: self.slots_per_sheet,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_one_empty_sheet() {
        let model = SheetModel::new(6);
        assert_eq!(model.sheet_count(), 1);
        assert_eq!(model.empty_cells(), 6);
        assert_eq!(model.first_empty(), Some(SlotCoord::new(0, 0)));
        assert_eq!(model.last_used_sheet(), None);
    }

    #[test]
    fn test_ensure_capacity_appends_whole_sheets() {
        let mut model = SheetModel::new(6);
        assert_eq!(model.ensure_capacity(6), 0);
        assert_eq!(model.ensure_capacity(7), 1);
        assert_eq!(model.sheet_count(), 2);
        assert_eq!(model.ensure_capacity(13), 1);
        assert_eq!(model.sheet_count(), 3);
        assert_eq!(model.empty_cells(), 18);
    }

    #[test]
    fn test_ensure_capacity_counts_only_empty_cells() {
        let mut model = SheetModel::new(2);
        model.occupy(SlotCoord::new(0, 0), ItemId(1)).unwrap();
        assert_eq!(model.ensure_capacity(2), 1);
        assert_eq!(model.empty_cells(), 3);
    }

    #[test]
    fn test_occupy_rejects_occupied_cell() {
        let mut model = SheetModel::new(6);
        let coord = SlotCoord::new(0, 3);
        model.occupy(coord, ItemId(1)).unwrap();

        let result = model.occupy(coord, ItemId(2));
        assert!(matches!(
            result,
            Err(LabelError::SlotOccupied { sheet: 0, slot: 3 })
        ));
        assert_eq!(model.get(coord), Some(ItemId(1)));
    }

    #[test]
    fn test_occupy_out_of_range() {
        let mut model = SheetModel::new(6);
        assert!(matches!(
            model.occupy(SlotCoord::new(1, 0), ItemId(1)),
            Err(LabelError::SheetOutOfRange { sheet: 1, sheets: 1 })
        ));
        assert!(matches!(
            model.occupy(SlotCoord::new(0, 6), ItemId(1)),
            Err(LabelError::SlotOutOfRange { slot: 6, .. })
        ));
    }

    #[test]
    fn test_vacate_is_unconditional() {
        let mut model = SheetModel::new(6);
        let coord = SlotCoord::new(0, 1);
        assert_eq!(model.vacate(coord), None);
        model.occupy(coord, ItemId(4)).unwrap();
        assert_eq!(model.vacate(coord), Some(ItemId(4)));
        assert!(model.is_empty_cell(coord));
        assert_eq!(model.vacate(SlotCoord::new(9, 9)), None);
    }

    #[test]
    fn test_swap_with_empty_and_occupied() {
        let mut model = SheetModel::new(6);
        model.append();
        let a = SlotCoord::new(0, 0);
        let b = SlotCoord::new(1, 5);
        model.occupy(a, ItemId(1)).unwrap();

        assert_eq!(model.swap(a, b).unwrap(), (None, Some(ItemId(1))));
        assert_eq!(model.get(a), None);
        assert_eq!(model.get(b), Some(ItemId(1)));

        model.occupy(a, ItemId(2)).unwrap();
        assert_eq!(model.swap(a, b).unwrap(), (Some(ItemId(1)), Some(ItemId(2))));
        assert_eq!(model.find(ItemId(1)), Some(a));
        assert_eq!(model.find(ItemId(2)), Some(b));
    }

    #[test]
    fn test_sheets_survive_emptying() {
        let mut model = SheetModel::new(2);
        model.append();
        model.occupy(SlotCoord::new(1, 0), ItemId(1)).unwrap();
        assert_eq!(model.last_used_sheet(), Some(1));

        model.vacate(SlotCoord::new(1, 0));
        assert_eq!(model.sheet_count(), 2);
        assert_eq!(model.last_used_sheet(), None);

        model.reset();
        assert_eq!(model.sheet_count(), 1);
    }

    #[test]
    fn test_occupied_order() {
        let mut model = SheetModel::new(3);
        model.append();
        model.occupy(SlotCoord::new(1, 0), ItemId(1)).unwrap();
        model.occupy(SlotCoord::new(0, 2), ItemId(2)).unwrap();
        let cells: Vec<_> = model.occupied().collect();
        assert_eq!(
            cells,
            vec![
                (SlotCoord::new(0, 2), ItemId(2)),
                (SlotCoord::new(1, 0), ItemId(1)),
            ]
        );
    }
}
