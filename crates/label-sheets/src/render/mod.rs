//! PDF rendering modules for label sheets
//!
//! This module handles all PDF-specific operations:
//! - Embedding source pages as Form XObjects
//! - Content stream operators for clipped placement and slot guides
//! - Building output sheet pages

mod page;
mod xobject;

pub use page::*;
pub use xobject::{EmbedCache, page_box};
