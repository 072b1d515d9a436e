use crate::session::Session;
use crate::types::*;

/// Calculate statistics for the current session
pub fn calculate_statistics(session: &Session) -> LabelStatistics {
    let items = session.items().len();
    let assigned = session
        .items()
        .iter()
        .filter(|item| item.is_assigned())
        .count();

    let sheets = session.sheets();
    let slots_per_sheet = sheets.slots_per_sheet();
    let total_sheets = sheets.sheet_count();
    let free_slots = sheets.empty_cells();

    let growable = session.options().max_sheets.saturating_sub(total_sheets);
    let remaining_capacity = free_slots + growable * slots_per_sheet;

    LabelStatistics {
        items,
        assigned,
        unassigned: items - assigned,
        total_sheets,
        sheets_to_print: sheets_to_print(session),
        free_slots,
        remaining_capacity,
    }
}

/// Number of sheets an export prints: up to the last sheet holding an
/// item, never fewer than one
pub(crate) fn sheets_to_print(session: &Session) -> usize {
    session
        .sheets()
        .last_used_sheet()
        .map_or(1, |last| last + 1)
}
