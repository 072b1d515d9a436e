//! Output sheet rendering
//!
//! Turns one planned sheet into a PDF page: every draw becomes a Form
//! XObject stamped with a `cm` matrix, optionally inside a clip, and the
//! slot guides are stroked on top.

use crate::constants::{GUIDE_GRAY, GUIDE_LINE_WIDTH};
use crate::export::{SheetPlan, SourceLibrary};
use crate::layout::{Placement, Rect};
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::EmbedCache;

// =============================================================================
// Public API
// =============================================================================

/// Render one planned sheet as a page of `output`, returning the page id.
///
/// The page is `width` x `height` points and is attached to the pages tree
/// at `parent_pages_id`. Draws are emitted in plan order.
pub fn render_sheet(
    output: &mut Document,
    library: &SourceLibrary,
    cache: &mut EmbedCache,
    sheet: &SheetPlan,
    width: f32,
    height: f32,
    parent_pages_id: ObjectId,
) -> Result<ObjectId> {
    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(width),
            Object::Real(height),
        ]),
    );

    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();

    for (idx, draw) in sheet.draws.iter().enumerate() {
        let xobject_name = format!("P{}", idx);
        let xobject_id = cache.embed(output, library, draw.source)?;
        xobjects.set(xobject_name.as_bytes(), Object::Reference(xobject_id));

        content_ops.push(placement_ops(&xobject_name, &draw.page_box, &draw.placement));
    }

    if !sheet.guides.is_empty() {
        content_ops.push(guide_ops(&sheet.guides));
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

// =============================================================================
// Content Operators
// =============================================================================

/// Content stream operators that draw `xobject_name` at `placement`.
///
/// `page_box` is the source page's box; its origin is folded into the
/// translation so the box corner lands on the draw origin. A clip is
/// pushed in its own graphics state and popped after the draw.
pub fn placement_ops(xobject_name: &str, page_box: &Rect, placement: &Placement) -> String {
    let tx = placement.draw_x - page_box.x * placement.scale_x;
    let ty = placement.draw_y - page_box.y * placement.scale_y;
    let draw = format!(
        "q {} 0 0 {} {} {} cm /{} Do Q\n",
        placement.scale_x, placement.scale_y, tx, ty, xobject_name
    );

    match placement.clip {
        Some(clip) => format!(
            "q\n{} {} {} {} re W n\n{}Q\n",
            clip.x, clip.y, clip.width, clip.height, draw
        ),
        None => draw,
    }
}

/// Thin gray outline of every slot rectangle
pub fn guide_ops(guides: &[Rect]) -> String {
    let mut ops = format!(
        "q {} w {} {} {} RG\n",
        GUIDE_LINE_WIDTH, GUIDE_GRAY, GUIDE_GRAY, GUIDE_GRAY
    );
    for rect in guides {
        ops.push_str(&format!(
            "{} {} {} {} re S\n",
            rect.x, rect.y, rect.width, rect.height
        ));
    }
    ops.push_str("Q\n");
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(clip: Option<Rect>) -> Placement {
        Placement {
            draw_x: 10.0,
            draw_y: 20.0,
            scale_x: 0.5,
            scale_y: 0.5,
            width: 50.0,
            height: 100.0,
            clip,
        }
    }

    #[test]
    fn test_placement_without_clip() {
        let ops = placement_ops("P0", &Rect::new(0.0, 0.0, 100.0, 200.0), &placement(None));
        assert_eq!(ops, "q 0.5 0 0 0.5 10 20 cm /P0 Do Q\n");
    }

    #[test]
    fn test_placement_with_clip_restores_state() {
        let clip = Rect::new(5.0, 6.0, 70.0, 80.0);
        let ops = placement_ops("P3", &Rect::new(0.0, 0.0, 100.0, 200.0), &placement(Some(clip)));

        assert!(ops.starts_with("q\n5 6 70 80 re W n\n"));
        assert!(ops.contains("/P3 Do"));
        assert!(ops.ends_with("Q\nQ\n"));
    }

    #[test]
    fn test_box_origin_is_folded_into_translation() {
        let ops = placement_ops("P0", &Rect::new(20.0, 40.0, 100.0, 200.0), &placement(None));
        // 10 - 20 * 0.5 = 0, 20 - 40 * 0.5 = 0
        assert_eq!(ops, "q 0.5 0 0 0.5 0 0 cm /P0 Do Q\n");
    }

    #[test]
    fn test_guide_ops() {
        let ops = guide_ops(&[Rect::new(1.0, 2.0, 3.0, 4.0), Rect::new(5.0, 6.0, 7.0, 8.0)]);
        assert!(ops.starts_with("q 0.5 w 0.2 0.2 0.2 RG\n"));
        assert_eq!(ops.matches(" re S").count(), 2);
        assert!(ops.ends_with("Q\n"));
    }
}
