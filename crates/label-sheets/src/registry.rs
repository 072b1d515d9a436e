//! Item registry
//!
//! Ordered list of placeable items, one per source page. Insertion order
//! drives auto-assignment and display order. Each item carries a stable
//! [`ItemId`]; its ordinal is just its current position and shifts down
//! when an earlier item is removed.

use crate::types::{ItemId, SlotCoord, SourceRef};

/// One source page queued for placement
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    source: SourceRef,
    name: String,
    assignment: Option<SlotCoord>,
}

impl Item {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn source(&self) -> SourceRef {
        self.source
    }

    /// Display name, usually the file name plus page number
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn assignment(&self) -> Option<SlotCoord> {
        self.assignment
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// `p1 / slot 2`, or `unassigned`
    pub fn assignment_label(&self) -> String {
        self.assignment
            .map(|coord| coord.label())
            .unwrap_or_else(|| "unassigned".to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: Vec<Item>,
    next_id: u64,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Item at a display position
    pub fn at(&self, ordinal: usize) -> Option<&Item> {
        self.items.get(ordinal)
    }

    /// Current display position of an item
    pub fn ordinal_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Ids of unassigned items in insertion order
    pub fn unassigned(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| !item.is_assigned())
            .map(|item| item.id)
            .collect()
    }

    // =========================================================================
    // Mutation (crate-private)
    // =========================================================================

    /// Append one unassigned item and return its id
    pub(crate) fn add(&mut self, source: SourceRef, name: impl Into<String>) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.push(Item {
            id,
            source,
            name: name.into(),
            assignment: None,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ItemId) -> Option<Item> {
        let ordinal = self.ordinal_of(id)?;
        Some(self.items.remove(ordinal))
    }

    pub(crate) fn set_assignment(&mut self, id: ItemId, assignment: Option<SlotCoord>) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.assignment = assignment;
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_assignments(&mut self) {
        for item in &mut self.items {
            item.assignment = None;
        }
    }

    /// Drop all items. Ids keep counting up so stale ids never match.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}
