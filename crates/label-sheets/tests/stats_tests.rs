use label_sheets::*;

#[test]
fn test_stats_empty_session() {
    let session = Session::default();
    let stats = calculate_statistics(&session);

    assert_eq!(stats.items, 0);
    assert_eq!(stats.assigned, 0);
    assert_eq!(stats.total_sheets, 1);
    // An empty session still prints one (blank) sheet
    assert_eq!(stats.sheets_to_print, 1);
    assert_eq!(stats.free_slots, 6);
    assert_eq!(stats.remaining_capacity, 40 * 6);
}

#[test]
fn test_stats_seven_items() {
    let mut session = Session::default();
    session.add_document(SourceId(0), "a.pdf", 7);

    let stats = calculate_statistics(&session);
    assert_eq!(stats.items, 7);
    assert_eq!(stats.assigned, 7);
    assert_eq!(stats.unassigned, 0);
    assert_eq!(stats.total_sheets, 2);
    assert_eq!(stats.sheets_to_print, 2);
    assert_eq!(stats.free_slots, 5);
    assert_eq!(stats.remaining_capacity, 5 + 38 * 6);
}

#[test]
fn test_stats_trailing_empty_sheet_is_not_printed() {
    let mut session = Session::default();
    session.add_document(SourceId(0), "a.pdf", 7);
    // Move the only item on sheet 2 back to sheet 1
    session.remove_at(0);
    session.drag_swap(SlotCoord::new(1, 0), SlotCoord::new(0, 0));

    let stats = calculate_statistics(&session);
    assert_eq!(stats.total_sheets, 2);
    assert_eq!(stats.sheets_to_print, 1);
}

#[test]
fn test_stats_at_sheet_limit() {
    let mut options = LabelOptions::default();
    options.max_sheets = 1;
    let mut session = Session::new(options).unwrap();
    session.add_document(SourceId(0), "a.pdf", 8);

    let stats = calculate_statistics(&session);
    assert_eq!(stats.assigned, 6);
    assert_eq!(stats.unassigned, 2);
    assert_eq!(stats.free_slots, 0);
    assert_eq!(stats.remaining_capacity, 0);
}
