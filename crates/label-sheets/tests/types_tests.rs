use label_sheets::*;

#[test]
fn test_paper_sizes() {
    assert_eq!(PaperSize::A4.dimensions_mm(), (210.0, 297.0));
    assert_eq!(PaperSize::Letter.dimensions_mm(), (215.9, 279.4));
    assert_eq!(
        PaperSize::Custom {
            width_mm: 100.0,
            height_mm: 150.0
        }
        .dimensions_mm(),
        (100.0, 150.0)
    );
}

#[test]
fn test_slot_coord_labels_are_one_based() {
    let coord = SlotCoord::new(0, 0);
    assert_eq!(coord.label(), "p1 / slot 1");
    assert_eq!(SlotCoord::new(2, 5).label(), "p3 / slot 6");
    assert_eq!(SlotCoord::new(2, 5).to_string(), "2:5");
}

#[test]
fn test_slot_coord_ordering() {
    assert!(SlotCoord::new(0, 5) < SlotCoord::new(1, 0));
    assert!(SlotCoord::new(1, 0) < SlotCoord::new(1, 1));
}

#[test]
fn test_offset_to_points() {
    let (x, y) = Offset::new(25.4, -25.4).to_pt();
    assert!((x - 72.0).abs() < 1e-3);
    assert!((y + 72.0).abs() < 1e-3);
}

#[test]
fn test_unit_conversion() {
    assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-4);
    assert!((pt_to_mm(72.0) - 25.4).abs() < 1e-4);
}

#[test]
fn test_error_messages() {
    let err = LabelError::SlotOutOfRange {
        slot: 7,
        slots_per_sheet: 6,
    };
    assert!(err.to_string().contains("0..6"));
    assert_eq!(
        LabelError::UnknownSource(SourceId(3)).to_string(),
        "Unknown source document doc3"
    );
}

#[test]
fn test_ls3116_geometry() {
    let spec = LabelStock::Ls3116.spec();
    assert_eq!((spec.cols, spec.rows), (2, 3));
    // (210 - 4 - 4 - 2.5) / 2
    assert!((spec.slot_width_mm - 99.75).abs() < 1e-4);
    // (297 - 6 - 9) / 3
    assert!((spec.slot_height_mm - 94.0).abs() < 1e-4);
    assert!(spec.validate().is_ok());
}
