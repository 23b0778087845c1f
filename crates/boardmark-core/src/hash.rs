//! Content fingerprints for rendered shapes.
//!
//! A fingerprint is a comma-joined list of the shape's visual inputs with unset
//! values (zero, `false`, absent, empty) dropped. Two shapes that differ only in
//! unset values therefore share a fingerprint.

use crate::brush::{Modifiers, truthy};
use crate::drawable::SyncableShape;
use crate::geometry::Bounds;
use crate::shapes::{Piece, Shape};
use crate::tally::ArrowTally;

/// Fingerprint string, stored on rendered elements as `cgHash`.
pub type Hash = String;

/// Separator between per-shape fingerprints in the aggregate.
pub const AGGREGATE_SEPARATOR: &str = ";";

/// Prefix of the custom-content sub-hash.
pub const CUSTOM_SVG_PREFIX: &str = "custom-";

fn push_number(parts: &mut Vec<String>, value: f64) {
    if truthy(value) {
        parts.push(value.to_string());
    }
}

/// Fingerprint one shape as it will be drawn in this pass.
pub fn shape_hash(shape: &Shape, tally: &ArrowTally, current: bool, bounds: Bounds) -> Hash {
    let mut parts: Vec<String> = Vec::with_capacity(10);
    push_number(&mut parts, bounds.width);
    push_number(&mut parts, bounds.height);
    if current {
        parts.push("true".to_string());
    }
    parts.push(shape.orig.to_string());
    if let Some(dest) = shape.dest {
        parts.push(dest.to_string());
    }
    if !shape.brush.is_empty() {
        parts.push(shape.brush.clone());
    }
    if shape.dest.is_some_and(|dest| tally.is_shared(dest)) {
        parts.push("true".to_string());
    }
    if let Some(piece) = &shape.piece {
        parts.push(piece_hash(piece));
    }
    if let Some(modifiers) = &shape.modifiers {
        parts.push(modifiers_hash(modifiers));
    }
    if let Some(svg) = &shape.custom_svg {
        parts.push(custom_svg_hash(svg));
    }
    parts.retain(|p| !p.is_empty());
    parts.join(",")
}

/// Sub-hash of an attached piece glyph.
pub fn piece_hash(piece: &Piece) -> Hash {
    let mut parts = vec![piece.color.name().to_string(), piece.role.name().to_string()];
    if let Some(scale) = piece.scale {
        push_number(&mut parts, scale);
    }
    parts.join(",")
}

/// Sub-hash of brush overrides. Empty when nothing is overridden.
pub fn modifiers_hash(modifiers: &Modifiers) -> Hash {
    let mut parts = Vec::with_capacity(2);
    if let Some(width) = modifiers.line_width {
        push_number(&mut parts, width);
    }
    if modifiers.hilite {
        parts.push("*".to_string());
    }
    parts.join(",")
}

/// Rolling base-31 hash over the UTF-16 code units of `svg`, wrapping at 2^32.
pub fn custom_svg_hash(svg: &str) -> Hash {
    let h = svg
        .encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as u32));
    format!("{CUSTOM_SVG_PREFIX}{h}")
}

/// Join the fingerprints of a whole pass, in render order.
pub fn aggregate_hash(shapes: &[SyncableShape<'_>]) -> Hash {
    shapes
        .iter()
        .map(|s| s.hash.as_str())
        .collect::<Vec<_>>()
        .join(AGGREGATE_SEPARATOR)
}
