//! Catalog of supported label stocks

use crate::types::{PaperSize, SheetMargins};

use super::LayoutSpec;

/// Label stock choice offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LabelStock {
    /// LS-3116: A4 portrait, 2 columns x 3 rows of shipping labels
    #[default]
    Ls3116,
    /// A4 portrait, 2 x 4 labels of 99.1 x 67.7 mm
    A4TwoByFour,
    /// US Letter, 2 x 5 labels of 4 x 2 in
    LetterTwoByFive,
    /// User-defined grid
    Custom(LayoutSpec),
}

impl LabelStock {
    /// The fixed catalog entries (excludes `Custom`)
    pub fn catalog() -> [LabelStock; 3] {
        [
            LabelStock::Ls3116,
            LabelStock::A4TwoByFour,
            LabelStock::LetterTwoByFive,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            LabelStock::Ls3116 => "LS-3116",
            LabelStock::A4TwoByFour => "A4 2x4",
            LabelStock::LetterTwoByFive => "Letter 2x5",
            LabelStock::Custom(_) => "Custom",
        }
    }

    /// Resolve the stock to its physical layout
    pub fn spec(&self) -> LayoutSpec {
        match self {
            LabelStock::Ls3116 => LayoutSpec::fill_page(
                PaperSize::A4,
                3,
                2,
                SheetMargins {
                    top_mm: 6.0,
                    bottom_mm: 9.0,
                    left_mm: 4.0,
                    right_mm: 4.0,
                },
                2.5,
                0.0,
            ),
            LabelStock::A4TwoByFour => LayoutSpec {
                rows: 4,
                cols: 2,
                slot_width_mm: 99.1,
                slot_height_mm: 67.7,
                page_width_mm: 210.0,
                page_height_mm: 297.0,
                margins: SheetMargins {
                    top_mm: 13.1,
                    bottom_mm: 13.1,
                    left_mm: 4.65,
                    right_mm: 4.65,
                },
                h_gap_mm: 2.5,
                v_gap_mm: 0.0,
            },
            LabelStock::LetterTwoByFive => LayoutSpec {
                rows: 5,
                cols: 2,
                slot_width_mm: 101.6,
                slot_height_mm: 50.8,
                page_width_mm: 215.9,
                page_height_mm: 279.4,
                margins: SheetMargins {
                    top_mm: 12.7,
                    bottom_mm: 12.7,
                    left_mm: 3.9624,
                    right_mm: 3.9624,
                },
                h_gap_mm: 4.7752,
                v_gap_mm: 0.0,
            },
            LabelStock::Custom(spec) => *spec,
        }
    }
}
