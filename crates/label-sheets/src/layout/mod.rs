//! Layout calculation modules for label sheets
//!
//! This module handles all the geometric calculations for label placement:
//! - Layout descriptors and the label stock catalog
//! - Slot geometry (rectangle of each slot on a sheet)
//! - Content placement (offsets, scaling, clipping)

mod grid;
mod placement;
mod stock;
mod types;

pub use grid::*;
pub use placement::*;
pub use stock::*;
pub use types::*;
