//! Export: from session state to a printable PDF
//!
//! Export happens in two steps. [`plan_export`] computes every draw
//! (which source page, which slot, where and how large) from the session
//! alone, with source documents only consulted for page boxes. Then
//! [`render_plan`] writes the plan into a new lopdf document.

mod io;

pub use io::{SourceDocument, SourceLibrary, SourcePages, document_to_bytes, load_pdf, save_pdf};

use crate::layout::{Placement, Rect, place_in_slot, slot_rects};
use crate::render::{EmbedCache, render_sheet};
use crate::session::Session;
use crate::stats::sheets_to_print;
use crate::types::*;
use lopdf::{Dictionary, Document, Object};

/// One source page drawn into one slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDraw {
    pub item: ItemId,
    pub source: SourceRef,
    pub slot: SlotCoord,
    /// Box of the source page in its own coordinates
    pub page_box: Rect,
    pub placement: Placement,
}

/// Everything drawn on one output page
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub index: usize,
    /// Draws in slot order
    pub draws: Vec<SlotDraw>,
    /// Slot outlines to stroke; empty when guides are off
    pub guides: Vec<Rect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub sheets: Vec<SheetPlan>,
}

impl ExportPlan {
    pub fn draw_count(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.draws.len()).sum()
    }
}

/// Plan an export of the current session.
///
/// Sheets are emitted from the first up to the last sheet holding an item;
/// trailing empty sheets are dropped, empty sheets in between are kept.
/// Fails with [`LabelError::NothingToExport`] when no item is assigned.
pub fn plan_export(session: &Session, sources: &impl SourcePages) -> Result<ExportPlan> {
    if session.sheets().occupied().next().is_none() {
        return Err(LabelError::NothingToExport);
    }

    let layout = session.layout();
    let options = session.options();
    let policy = options.policy();
    let slots = slot_rects(layout);
    let guides = if options.show_guide {
        slots.clone()
    } else {
        Vec::new()
    };

    let sheet_count = sheets_to_print(session);
    let mut sheets = Vec::with_capacity(sheet_count);

    for (index, sheet) in session.sheets().sheets().iter().take(sheet_count).enumerate() {
        let mut draws = Vec::new();

        for (slot, cell) in sheet.cells().iter().enumerate() {
            let Some(id) = *cell else {
                continue;
            };
            let item = session.items().get(id).ok_or(LabelError::UnknownItem(id))?;
            let source = item.source();
            let page_box = sources
                .page_box(source)
                .ok_or(LabelError::UnknownSource(source.source))?;

            let placement = place_in_slot(
                &slots[slot],
                page_box.width,
                page_box.height,
                &policy,
                &options.adjustment_for(slot),
                &options.sheet_offset,
            );

            draws.push(SlotDraw {
                item: id,
                source,
                slot: SlotCoord::new(index, slot),
                page_box,
                placement,
            });
        }

        sheets.push(SheetPlan {
            index,
            draws,
            guides: guides.clone(),
        });
    }

    log::debug!(
        "Planned {} draw(s) on {} sheet(s)",
        sheets.iter().map(|s| s.draws.len()).sum::<usize>(),
        sheets.len()
    );

    Ok(ExportPlan {
        page_width_pt: layout.page_width_pt(),
        page_height_pt: layout.page_height_pt(),
        sheets,
    })
}

/// Write a plan into a new PDF document
pub fn render_plan(plan: &ExportPlan, library: &SourceLibrary) -> Result<Document> {
    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();
    let mut cache = EmbedCache::new();
    let mut page_refs = Vec::with_capacity(plan.sheets.len());

    for sheet in &plan.sheets {
        let page_id = render_sheet(
            &mut output,
            library,
            &mut cache,
            sheet,
            plan.page_width_pt,
            plan.page_height_pt,
            pages_tree_id,
        )?;
        page_refs.push(Object::Reference(page_id));
    }

    // Create pages tree
    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    output.trailer.set("Root", catalog_id);

    log::debug!(
        "Rendered {} sheet(s) embedding {} source page(s)",
        plan.sheets.len(),
        cache.embedded_pages()
    );

    Ok(output)
}

/// Plan, render and serialize the session to PDF bytes.
///
/// Rendering runs on the blocking pool; the session itself is only read
/// while planning.
pub async fn export_pdf(session: &Session, library: &SourceLibrary) -> Result<Vec<u8>> {
    let plan = plan_export(session, library)?;
    let library = library.clone();

    let bytes = tokio::task::spawn_blocking(move || {
        let mut doc = render_plan(&plan, &library)?;
        doc.compress();
        document_to_bytes(doc)
    })
    .await??;

    log::info!("Exported label sheet PDF ({} bytes)", bytes.len());
    Ok(bytes)
}
