//! XObject creation for label sheets
//!
//! Source pages are wrapped as Form XObjects in the output document and
//! then drawn into slots with a transformation matrix.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::export::SourceLibrary;
use crate::layout::Rect;
use crate::types::{LabelError, Result, SourceId, SourceRef};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// How many `Parent` links are followed when looking up an inherited page
/// attribute
const MAX_INHERIT_DEPTH: usize = 32;

// =============================================================================
// Embedding
// =============================================================================

/// Object copies made while building one output document.
///
/// Object ids are only unique within a source document, so copies are
/// tracked per source. Embedded pages are tracked per source page so a page
/// placed on several sheets is stored once.
#[derive(Debug, Default)]
pub struct EmbedCache {
    objects: HashMap<SourceId, HashMap<ObjectId, ObjectId>>,
    pages: HashMap<SourceRef, ObjectId>,
}

impl EmbedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct source pages embedded so far
    pub fn embedded_pages(&self) -> usize {
        self.pages.len()
    }

    /// Embed a source page as a Form XObject, returning its object id.
    pub fn embed(
        &mut self,
        output: &mut Document,
        library: &SourceLibrary,
        page: SourceRef,
    ) -> Result<ObjectId> {
        if let Some(&id) = self.pages.get(&page) {
            return Ok(id);
        }

        let source = library
            .get(page.source)
            .ok_or(LabelError::UnknownSource(page.source))?;
        let page_id = source
            .page_id(page.page)
            .ok_or(LabelError::UnknownSource(page.source))?;
        let doc = source.document();
        let page_dict = doc.get_dictionary(page_id)?;

        let bbox = page_box(doc, page_id);
        let content = page_content(doc, page_dict)?;

        let mut xobject_dict = Dictionary::new();
        xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
        xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
        xobject_dict.set("FormType", Object::Integer(1));
        xobject_dict.set(
            "BBox",
            Object::Array(vec![
                Object::Real(bbox.x),
                Object::Real(bbox.y),
                Object::Real(bbox.right()),
                Object::Real(bbox.top()),
            ]),
        );

        if let Some(resources) = inherited(doc, page_dict, b"Resources") {
            let cache = self.objects.entry(page.source).or_default();
            xobject_dict.set("Resources", copy_object_deep(output, doc, resources, cache)?);
        }

        let id = output.add_object(Stream::new(xobject_dict, content));
        self.pages.insert(page, id);
        Ok(id)
    }
}

// =============================================================================
// Page Attributes
// =============================================================================

/// Look up a page attribute, following `Parent` links for inheritable keys
fn inherited<'a>(doc: &'a Document, page_dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut dict = page_dict;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Page box of a source page in points: the MediaBox, inherited if needed,
/// US Letter at the origin when missing or malformed
pub fn page_box(doc: &Document, page_id: ObjectId) -> Rect {
    let (default_w, default_h) = DEFAULT_PAGE_DIMENSIONS;
    let fallback = Rect::new(0.0, 0.0, default_w, default_h);

    let Ok(page_dict) = doc.get_dictionary(page_id) else {
        return fallback;
    };
    let Some(values) = inherited(doc, page_dict, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .and_then(|arr| arr.iter().map(extract_number).collect::<Option<Vec<f32>>>())
    else {
        return fallback;
    };

    match values.as_slice() {
        [x0, y0, x1, y1] if (x1 - x0).abs() > 0.0 && (y1 - y0).abs() > 0.0 => Rect::new(
            x0.min(*x1),
            y0.min(*y1),
            (x1 - x0).abs(),
            (y1 - y0).abs(),
        ),
        _ => fallback,
    }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Decoded content stream data of a page; an absent stream is a blank page
fn page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    let refs: Vec<ObjectId> = match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(arr) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
            _ => vec![*id],
        },
        Object::Array(arr) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
        _ => Vec::new(),
    };

    let mut data = Vec::new();
    for id in refs {
        if let Ok(stream) = doc.get_object(id)?.as_stream() {
            let content = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            data.extend_from_slice(&content);
            data.push(b'\n');
        }
    }
    Ok(data)
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from a source document into the output, following
/// references. `cache` maps source ids to already-copied output ids.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            // Reserve the id first so reference cycles terminate
            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let referenced = source.get_object(*id)?;
            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let copied: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(copied?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut copied = Dictionary::new();
    for (key, value) in dict.iter() {
        // Page tree links would drag the whole source document along
        if key.as_slice() == b"Parent" {
            continue;
        }
        copied.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(copied)
}
