//! Shared definitions: one arrowhead marker and one shaft gradient per brush key.
//!
//! The pool is append-only. Once a key is present its resources stay for the
//! lifetime of the board, even when no shape uses them any more.

use crate::sync::KeyedContainer;
use crate::svg::{KEY_ATTR, SvgElement};
use boardmark_core::{Brush, HILITE_BRUSH_KEY};
use std::collections::HashSet;

/// Id of the mask shared by every arrow shaft.
pub const SHAFT_MASK_ID: &str = "cg-shaft-mask";

pub fn marker_id(key: &str) -> String {
    format!("arrowhead-{key}")
}

pub fn gradient_id(key: &str) -> String {
    format!("gradient-{key}")
}

/// `url(#id)` reference.
pub fn url_ref(id: &str) -> String {
    format!("url(#{id})")
}

/// A fresh `<defs>` root holding the shared shaft mask.
pub fn definitions_root() -> SvgElement {
    SvgElement::new("defs").child(render_shaft_mask())
}

/// Opacity mask rounding off both ends of a shaft, in the shaft's bounding box.
fn render_shaft_mask() -> SvgElement {
    SvgElement::new("mask")
        .attr("id", SHAFT_MASK_ID)
        .attr("maskContentUnits", "objectBoundingBox")
        .child(
            SvgElement::new("rect")
                .attr("x", 0)
                .attr("y", 0)
                .attr("width", 1)
                .attr("height", 1)
                .attr("rx", 0.02)
                .attr("ry", 0.5)
                .attr("fill", "white"),
        )
}

/// Arrowhead marker drawn at the tip of the marker-carrying line.
pub fn render_marker(brush: &Brush) -> SvgElement {
    let ref_x = if brush.key.starts_with(HILITE_BRUSH_KEY) {
        1.86
    } else {
        2.05
    };
    SvgElement::new("marker")
        .attr("id", marker_id(&brush.key))
        .attr(KEY_ATTR, &brush.key)
        .attr("orient", "auto")
        .attr("overflow", "visible")
        .attr("markerWidth", 4)
        .attr("markerHeight", 4)
        .attr("refX", ref_x)
        .attr("refY", 2)
        .child(
            SvgElement::new("path")
                .attr("d", "M0,0 V4 L3,2 Z")
                .attr("fill", brush.color),
        )
}

/// Gradient fading the shaft from transparent at the origin to opaque at the tip.
pub fn render_gradient(brush: &Brush) -> SvgElement {
    let stop = |offset: u8, opacity: u8| {
        SvgElement::new("stop")
            .attr("offset", offset)
            .attr("stop-color", brush.color)
            .attr("stop-opacity", opacity)
    };
    SvgElement::new("linearGradient")
        .attr("id", gradient_id(&brush.key))
        .attr(KEY_ATTR, &brush.key)
        .attr("x1", 0)
        .attr("y1", 0)
        .attr("x2", 1)
        .attr("y2", 0)
        .child(stop(0, 0))
        .child(stop(1, 1))
}

/// Append the marker and gradient of every brush whose key is not yet in
/// `defs`. Existing entries are never touched. Returns the number of keys added.
pub fn ensure_definitions<C>(defs: &mut C, brushes: &[Brush]) -> usize
where
    C: KeyedContainer + ?Sized,
{
    let existing = defs.child_keys(KEY_ATTR);
    let mut present: HashSet<String> = existing.iter().flatten().cloned().collect();
    let mut len = existing.len();
    let mut added = 0;
    for brush in brushes {
        if !present.insert(brush.key.clone()) {
            continue;
        }
        log::debug!("adding definitions for brush {}", brush.key);
        defs.insert_child(len, render_marker(brush));
        defs.insert_child(len + 1, render_gradient(brush));
        len += 2;
        added += 1;
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardmark_core::BrushCatalog;

    #[test]
    fn test_root_has_shared_mask_only() {
        let root = definitions_root();
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].get_attr("id"), Some(SHAFT_MASK_ID));
        assert_eq!(root.children()[0].get_attr(KEY_ATTR), None);
    }

    #[test]
    fn test_marker_shape() {
        let catalog = BrushCatalog::default();
        let marker = render_marker(catalog.get("green").unwrap());
        assert_eq!(marker.get_attr("id"), Some("arrowhead-green"));
        assert_eq!(marker.get_attr("refX"), Some("2.05"));
        assert_eq!(marker.children()[0].get_attr("fill"), Some("#15781b"));

        let hilite = render_marker(&Brush::hilite());
        assert_eq!(hilite.get_attr("id"), Some("arrowhead-hilite"));
        assert_eq!(hilite.get_attr("refX"), Some("1.86"));
    }

    #[test]
    fn test_gradient_fades_in() {
        let gradient = render_gradient(&Brush::hilite());
        assert_eq!(gradient.get_attr("id"), Some("gradient-hilite"));
        let stops = gradient.children();
        assert_eq!(stops[0].get_attr("stop-opacity"), Some("0"));
        assert_eq!(stops[1].get_attr("stop-opacity"), Some("1"));
        assert_eq!(stops[1].get_attr("stop-color"), Some("#ffffff"));
    }

    #[test]
    fn test_ensure_is_append_only_and_deduplicated() {
        let catalog = BrushCatalog::default();
        let green = catalog.get("green").unwrap().clone();
        let red = catalog.get("red").unwrap().clone();
        let mut defs = definitions_root();

        assert_eq!(ensure_definitions(&mut defs, &[green.clone(), green.clone()]), 1);
        assert_eq!(defs.count_tag("marker"), 1);
        assert_eq!(defs.count_tag("linearGradient"), 1);

        let before = defs.children()[1].clone();
        assert_eq!(ensure_definitions(&mut defs, &[red, green]), 1);
        assert_eq!(defs.count_tag("marker"), 2);
        assert_eq!(defs.children()[1], before);

        assert_eq!(ensure_definitions(&mut defs, &[]), 0);
        assert_eq!(defs.count_tag("marker"), 2);
    }
}
