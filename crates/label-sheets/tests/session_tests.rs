use label_sheets::*;

fn session() -> Session {
    Session::new(LabelOptions::default()).unwrap()
}

fn assert_consistent(session: &Session) {
    if let Err(msg) = session.check_consistency() {
        panic!("inconsistent session: {}", msg);
    }
}

#[test]
fn test_new_session_has_one_empty_sheet() {
    let session = session();
    assert_eq!(session.sheets().sheet_count(), 1);
    assert_eq!(session.sheets().slots_per_sheet(), 6);
    assert!(session.items().is_empty());
    assert_eq!(session.selection(), None);
}

#[test]
fn test_seven_pages_fill_two_sheets() {
    let mut session = session();
    let report = session.add_document(SourceId(0), "labels.pdf", 7);

    assert!(report.is_complete());
    assert_eq!(report.placed.len(), 7);
    assert_eq!(session.sheets().sheet_count(), 2);

    let items: Vec<_> = session.items().iter().collect();
    for (n, item) in items.iter().take(6).enumerate() {
        assert_eq!(item.assignment(), Some(SlotCoord::new(0, n)));
    }
    assert_eq!(items[6].assignment(), Some(SlotCoord::new(1, 0)));
    assert_eq!(items[6].assignment_label(), "p2 / slot 1");
    assert_eq!(items[0].name(), "labels.pdf p1");
    assert_consistent(&session);
}

#[test]
fn test_single_page_document_keeps_plain_name() {
    let mut session = session();
    session.add_document(SourceId(0), "one.pdf", 1);
    assert_eq!(session.items().at(0).unwrap().name(), "one.pdf");
}

#[test]
fn test_remove_middle_item_frees_its_cell() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 5);
    let ids: Vec<_> = session.items().iter().map(Item::id).collect();

    let removed = session.remove_at(2).unwrap();
    assert_eq!(removed.id(), ids[2]);
    assert_eq!(session.items().len(), 4);
    assert_eq!(session.sheets().get(SlotCoord::new(0, 2)), None);
    // Later items keep their cells, only their ordinals shift
    assert_eq!(session.sheets().get(SlotCoord::new(0, 3)), Some(ids[3]));
    assert_eq!(session.items().ordinal_of(ids[3]), Some(2));
    assert_consistent(&session);

    // The freed cell is reused first
    let report = session.add_document(SourceId(1), "b.pdf", 1);
    assert_eq!(report.placed[0].1, SlotCoord::new(0, 2));
    assert_consistent(&session);
}

#[test]
fn test_remove_selected_item_clears_selection() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 2);
    let id = session.items().at(0).unwrap().id();
    assert!(session.select_item(id));

    session.remove_item(id);
    assert_eq!(session.selection(), None);
    assert_consistent(&session);
}

#[test]
fn test_move_to_occupied_slot_is_rejected() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 3);
    let first = session.items().at(0).unwrap().id();
    let second = session.items().at(1).unwrap().id();

    session.select_item(first);
    assert!(!session.move_selected_to(SlotCoord::new(0, 1)));
    assert_eq!(session.sheets().get(SlotCoord::new(0, 0)), Some(first));
    assert_eq!(session.sheets().get(SlotCoord::new(0, 1)), Some(second));
    assert_consistent(&session);
}

#[test]
fn test_move_selected_to_empty_slot() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 2);
    let first = session.items().at(0).unwrap().id();

    session.select_item(first);
    assert!(session.move_selected_to(SlotCoord::new(0, 5)));
    assert_eq!(session.sheets().get(SlotCoord::new(0, 0)), None);
    assert_eq!(session.sheets().get(SlotCoord::new(0, 5)), Some(first));
    assert_eq!(
        session.items().get(first).unwrap().assignment(),
        Some(SlotCoord::new(0, 5))
    );
    assert_consistent(&session);
}

#[test]
fn test_move_without_selection_or_off_sheet_does_nothing() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 1);
    assert!(!session.move_selected_to(SlotCoord::new(0, 3)));

    let id = session.items().at(0).unwrap().id();
    session.select_item(id);
    assert!(!session.move_selected_to(SlotCoord::new(4, 0)));
    assert!(!session.move_selected_to(SlotCoord::new(0, 6)));
    assert_consistent(&session);
}

#[test]
fn test_drag_swaps_occupied_cells() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 2);
    let a = session.items().at(0).unwrap().id();
    let b = session.items().at(1).unwrap().id();

    let outcome = session.drag_swap(SlotCoord::new(0, 0), SlotCoord::new(0, 1));
    assert_eq!(
        outcome,
        DragOutcome::Swapped {
            first: a,
            second: b
        }
    );
    assert_eq!(session.sheets().get(SlotCoord::new(0, 0)), Some(b));
    assert_eq!(session.sheets().get(SlotCoord::new(0, 1)), Some(a));
    assert_eq!(
        session.items().get(a).unwrap().assignment(),
        Some(SlotCoord::new(0, 1))
    );
    assert_consistent(&session);
}

#[test]
fn test_drag_onto_empty_cell_moves() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 7);
    let seventh = session.items().at(6).unwrap().id();

    let outcome = session.drag_swap(SlotCoord::new(1, 0), SlotCoord::new(1, 4));
    assert_eq!(
        outcome,
        DragOutcome::Moved {
            item: seventh,
            to: SlotCoord::new(1, 4)
        }
    );
    assert_eq!(session.sheets().get(SlotCoord::new(1, 0)), None);
    assert_consistent(&session);
}

#[test]
fn test_drag_ignored_cases() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 1);

    // Empty source
    assert_eq!(
        session.drag_swap(SlotCoord::new(0, 3), SlotCoord::new(0, 0)),
        DragOutcome::Ignored
    );
    // Same cell
    assert_eq!(
        session.drag_swap(SlotCoord::new(0, 0), SlotCoord::new(0, 0)),
        DragOutcome::Ignored
    );
    // Off the sheets
    assert_eq!(
        session.drag_swap(SlotCoord::new(0, 0), SlotCoord::new(3, 0)),
        DragOutcome::Ignored
    );
    assert_consistent(&session);
}

#[test]
fn test_click_selects_then_moves() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 2);
    let a = session.items().at(0).unwrap().id();

    assert_eq!(
        session.click_slot(SlotCoord::new(0, 0)),
        ClickOutcome::Selected(a)
    );
    assert_eq!(
        session.click_slot(SlotCoord::new(0, 4)),
        ClickOutcome::Moved {
            item: a,
            from: Some(SlotCoord::new(0, 0)),
            to: SlotCoord::new(0, 4)
        }
    );
    // Clicking another occupied slot only changes the selection
    let b = session.items().at(1).unwrap().id();
    assert_eq!(
        session.click_slot(SlotCoord::new(0, 1)),
        ClickOutcome::Selected(b)
    );
    assert_consistent(&session);
}

#[test]
fn test_click_empty_slot_without_selection_is_ignored() {
    let mut session = session();
    assert_eq!(
        session.click_slot(SlotCoord::new(0, 0)),
        ClickOutcome::Ignored
    );
}

#[test]
fn test_capacity_exhaustion_reports_unplaced() {
    let mut options = LabelOptions::default();
    options.max_sheets = 2;
    let mut session = Session::new(options).unwrap();

    let report = session.add_document(SourceId(0), "big.pdf", 15);
    assert!(!report.is_complete());
    assert_eq!(report.placed.len(), 12);
    assert_eq!(report.unplaced.len(), 3);
    assert_eq!(session.sheets().sheet_count(), 2);
    assert_eq!(session.items().unassigned().len(), 3);
    assert_consistent(&session);

    // Freeing a cell lets a retry place one more
    session.remove_at(0);
    let retry = session.auto_assign_pending();
    assert_eq!(retry.placed.len(), 1);
    assert_eq!(retry.placed[0].1, SlotCoord::new(0, 0));
    assert_eq!(retry.unplaced.len(), 2);
    assert_consistent(&session);
}

#[test]
fn test_upload_places_older_pending_items_first() {
    let mut options = LabelOptions::default();
    options.max_sheets = 1;
    let mut session = Session::new(options).unwrap();

    session.add_document(SourceId(0), "a.pdf", 7);
    let waiting = session.items().at(6).unwrap().id();
    assert_eq!(session.items().unassigned(), vec![waiting]);

    session.remove_at(0);
    let report = session.add_document(SourceId(1), "b.pdf", 1);
    let newest = session.items().at(6).unwrap().id();

    assert_eq!(report.placed, vec![(waiting, SlotCoord::new(0, 0))]);
    assert_eq!(report.unplaced, vec![newest]);
    assert_eq!(
        session.items().get(waiting).unwrap().assignment(),
        Some(SlotCoord::new(0, 0))
    );
    assert!(!session.items().get(newest).unwrap().is_assigned());
    assert_consistent(&session);
}

#[test]
fn test_unassigned_item_can_be_moved_in() {
    let mut options = LabelOptions::default();
    options.max_sheets = 1;
    let mut session = Session::new(options).unwrap();
    session.add_document(SourceId(0), "a.pdf", 7);

    let waiting = session.items().at(6).unwrap().id();
    session.remove_at(0);
    session.select_item(waiting);
    assert!(session.move_selected_to(SlotCoord::new(0, 0)));
    assert!(session.items().unassigned().is_empty());
    assert_consistent(&session);
}

#[test]
fn test_add_sheet_respects_limit() {
    let mut options = LabelOptions::default();
    options.max_sheets = 2;
    let mut session = Session::new(options).unwrap();

    assert_eq!(session.add_sheet().unwrap(), 1);
    match session.add_sheet() {
        Err(LabelError::SheetLimit { max_sheets }) => assert_eq!(max_sheets, 2),
        other => panic!("Expected SheetLimit, got {:?}", other),
    }
}

#[test]
fn test_unassign_keeps_item() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 1);
    let id = session.items().at(0).unwrap().id();

    assert!(session.unassign(id));
    assert_eq!(session.items().len(), 1);
    assert!(!session.items().get(id).unwrap().is_assigned());
    assert_eq!(session.sheets().get(SlotCoord::new(0, 0)), None);
    assert!(!session.unassign(id));
    assert_consistent(&session);
}

#[test]
fn test_set_stock_reassigns_in_registry_order() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 7);
    // Shuffle a little first
    session.drag_swap(SlotCoord::new(0, 0), SlotCoord::new(0, 5));

    let report = session.set_stock(LabelStock::A4TwoByFour).unwrap();
    assert!(report.is_complete());
    assert_eq!(session.sheets().slots_per_sheet(), 8);
    assert_eq!(session.sheets().sheet_count(), 1);
    assert_eq!(session.options().slot_adjustments.len(), 8);

    for (n, item) in session.items().iter().enumerate() {
        assert_eq!(item.assignment(), Some(SlotCoord::new(0, n)));
    }
    assert_consistent(&session);
}

#[test]
fn test_clear_resets_items_and_sheets() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 9);
    session.apply_preset(OffsetPreset::Shopee);
    session.clear();

    assert!(session.items().is_empty());
    assert_eq!(session.sheets().sheet_count(), 1);
    assert_eq!(session.sheets().empty_cells(), 6);
    assert_eq!(session.options().preset, Some(OffsetPreset::Shopee));
    assert_consistent(&session);
}

#[test]
fn test_long_edit_sequence_stays_consistent() {
    let mut session = session();
    session.add_document(SourceId(0), "a.pdf", 4);
    session.add_document(SourceId(1), "b.pdf", 5);
    assert_consistent(&session);

    session.remove_at(1);
    session.drag_swap(SlotCoord::new(0, 0), SlotCoord::new(1, 2));
    session.click_slot(SlotCoord::new(1, 0));
    session.click_slot(SlotCoord::new(0, 1));
    session.remove_at(0);
    session.add_document(SourceId(2), "c.pdf", 3);
    session.drag_swap(SlotCoord::new(1, 1), SlotCoord::new(0, 3));
    assert_consistent(&session);

    let assigned = session.items().iter().filter(|i| i.is_assigned()).count();
    assert_eq!(assigned, session.sheets().occupied().count());
}

#[test]
fn test_slot_adjustments() {
    let mut session = session();
    session
        .set_slot_adjustment(2, SlotAdjustment::new(1.5, -2.0, 500.0))
        .unwrap();
    let adj = session.options().adjustment_for(2);
    assert_eq!(adj.offset_x_mm, 1.5);
    assert_eq!(adj.scale_percent, 200.0);

    assert!(matches!(
        session.set_slot_adjustment(6, SlotAdjustment::default()),
        Err(LabelError::SlotOutOfRange { slot: 6, .. })
    ));

    session.apply_bulk_adjustment(SlotAdjustment::new(0.0, 0.0, 80.0));
    assert!(
        session
            .options()
            .slot_adjustments
            .iter()
            .all(|a| a.scale_percent == 80.0)
    );

    session.set_sheet_offset(f32::NAN, 3.0);
    assert_eq!(session.options().sheet_offset, Offset::new(0.0, 3.0));
}

#[test]
fn test_invalid_options_are_rejected() {
    let mut options = LabelOptions::default();
    options.max_sheets = 0;
    assert!(Session::new(options).is_err());
}
