//! Boardmark Render Library
//!
//! Turns the drawable state of a board into an SVG overlay: arrows, square
//! outlines and custom graphics, reconciled by fingerprint so unchanged shapes
//! are never rebuilt. The in-memory [`OverlayScene`] works everywhere; on
//! wasm32 the same pass can drive live DOM nodes.

mod defs;
mod renderer;
mod shape;
mod svg;
mod sync;

#[cfg(target_arch = "wasm32")]
mod web;

pub use defs::{SHAFT_MASK_ID, definitions_root, ensure_definitions, render_gradient, render_marker};
pub use renderer::{
    OverlayHost, OverlayLayers, OverlayScene, RenderError, RenderOutcome, RenderReport,
    RenderResult, render_overlay, reset_overlay,
};
pub use shape::{ArrowGeometry, ShapeContext, Styled, arrow_margin, line_width, opacity};
pub use svg::{HASH_ATTR, KEY_ATTR, SvgElement};
pub use sync::{Keyed, KeyedContainer, SyncStats, remove_children, sync_children};

#[cfg(target_arch = "wasm32")]
pub use web::{DomLayer, DomOverlay};
