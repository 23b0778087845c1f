//! Overlay render entry point.

use crate::defs::{definitions_root, ensure_definitions};
use crate::shape::{ShapeContext, Styled};
use crate::svg::{HASH_ATTR, KEY_ATTR, SvgElement};
use crate::sync::{Keyed, KeyedContainer, SyncStats, remove_children, sync_children};
use boardmark_core::{BoardState, Brush, BrushCatalog, SyncableShape};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown brush: {0}")]
    UnknownBrush(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// The three live containers the overlay writes into.
pub struct OverlayLayers<'a, D: ?Sized, L: ?Sized> {
    /// Append-only brush definitions.
    pub defs: &'a mut D,
    /// Arrows and square outlines.
    pub shapes: &'a mut L,
    /// Custom inline graphics, kept apart from brush-rendered shapes.
    pub custom: &'a mut L,
}

/// A host owning the overlay's scene containers.
///
/// Implementations can keep an in-memory tree ([`OverlayScene`]) or wrap live
/// DOM nodes.
pub trait OverlayHost {
    type Defs: KeyedContainer + ?Sized;
    type Layer: KeyedContainer + ?Sized;

    fn layers(&mut self) -> OverlayLayers<'_, Self::Defs, Self::Layer>;
}

/// What one render call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The aggregate fingerprint matched the previous pass; nothing was touched.
    Unchanged,
    Rendered(RenderReport),
}

impl RenderOutcome {
    /// Total scene mutations, definitions included.
    pub fn mutations(&self) -> usize {
        match self {
            RenderOutcome::Unchanged => 0,
            RenderOutcome::Rendered(report) => {
                report.shapes.mutations() + report.custom.mutations() + report.definitions_added * 2
            }
        }
    }
}

/// Per-layer statistics of a render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub shapes: SyncStats,
    pub custom: SyncStats,
    /// Brush keys whose marker and gradient were appended.
    pub definitions_added: usize,
}

/// A shape of this pass with its brush resolved.
struct Prepared<'p, 'a> {
    syncable: &'p SyncableShape<'a>,
    styled: Styled<'a>,
}

impl Keyed for Prepared<'_, '_> {
    fn key(&self) -> &str {
        &self.syncable.hash
    }
}

fn prepare<'p, 'a>(
    shapes: &'p [SyncableShape<'a>],
    catalog: &BrushCatalog,
) -> RenderResult<Vec<Prepared<'p, 'a>>> {
    shapes
        .iter()
        .map(|syncable| -> RenderResult<Prepared<'p, 'a>> {
            let shape = syncable.shape;
            let styled = Styled::resolve(shape, catalog)
                .ok_or_else(|| RenderError::UnknownBrush(shape.brush.clone()))?;
            Ok(Prepared { syncable, styled })
        })
        .collect()
}

/// Brushes whose definitions this pass needs: every arrow brush, plus the
/// hilite brush when any shape asks for the halo.
fn required_brushes(prepared: &[Prepared<'_, '_>]) -> Vec<Brush> {
    let mut brushes: Vec<Brush> = prepared
        .iter()
        .filter_map(|p| match &p.styled {
            Styled::Arrow { brush, .. } => Some(brush.clone()),
            _ => None,
        })
        .collect();
    if prepared.iter().any(|p| p.syncable.shape.is_hilited()) {
        brushes.push(Brush::hilite());
    }
    brushes
}

fn removed(count: usize) -> SyncStats {
    SyncStats {
        removed: count,
        ..SyncStats::default()
    }
}

/// Reconcile the overlay with the board's declared shapes.
///
/// Returns [`RenderOutcome::Unchanged`] without touching the host when the
/// aggregate fingerprint equals the previous pass. Brushes are resolved before
/// any container is modified, so an error leaves the scene and the stored
/// fingerprint as they were. When the orientation differs from the previous
/// pass, the shapes and custom layers are emptied and rebuilt.
pub fn render_overlay<H>(board: &mut BoardState, host: &mut H) -> RenderResult<RenderOutcome>
where
    H: OverlayHost + ?Sized,
{
    let (report, full_hash) = {
        let drawable = &board.drawable;
        let flipped = drawable
            .prev_orientation
            .is_some_and(|o| o != board.orientation);
        let pass = drawable.prepare(board.bounds);
        if !flipped && drawable.prev_svg_hash.as_deref() == Some(pass.full_hash.as_str()) {
            log::debug!("overlay unchanged, skipping render");
            return Ok(RenderOutcome::Unchanged);
        }

        let prepared = prepare(&pass.shapes, &drawable.brushes)?;
        let (custom, regular): (Vec<_>, Vec<_>) =
            prepared.into_iter().partition(|p| p.styled.is_custom());

        let ctx = ShapeContext {
            orientation: board.orientation,
            bounds: board.bounds,
            tally: &pass.tally,
        };
        let render = |p: &Prepared<'_, '_>| ctx.render(p.syncable, &p.styled);

        let layers = host.layers();
        let (mut shapes, mut custom_stats) = (SyncStats::default(), SyncStats::default());
        if flipped {
            log::debug!("orientation changed to {:?}, rebuilding overlay", board.orientation);
            shapes = removed(remove_children(&mut *layers.shapes, HASH_ATTR, |_| true));
            custom_stats = removed(remove_children(&mut *layers.custom, HASH_ATTR, |_| true));
        }
        let definitions_added = ensure_definitions(layers.defs, &required_brushes(&regular));
        let report = RenderReport {
            shapes: shapes + sync_children(layers.shapes, HASH_ATTR, &regular, render),
            custom: custom_stats + sync_children(layers.custom, HASH_ATTR, &custom, render),
            definitions_added,
        };
        (report, pass.full_hash.clone())
    };
    log::debug!(
        "overlay rendered: shapes {:?}, custom {:?}, {} new brush definitions",
        report.shapes,
        report.custom,
        report.definitions_added
    );

    board.drawable.prev_svg_hash = Some(full_hash);
    board.drawable.prev_orientation = Some(board.orientation);
    Ok(RenderOutcome::Rendered(report))
}

/// Empty every layer, brush definitions included, and forget the previous pass.
///
/// Elements and definitions are keyed by brush name, so a brush whose color,
/// width or opacity changed under the same name needs this before the next
/// [`render_overlay`]. Returns the number of elements removed.
pub fn reset_overlay<H>(board: &mut BoardState, host: &mut H) -> usize
where
    H: OverlayHost + ?Sized,
{
    let layers = host.layers();
    let count = remove_children(layers.shapes, HASH_ATTR, |_| true)
        + remove_children(layers.custom, HASH_ATTR, |_| true)
        + remove_children(layers.defs, KEY_ATTR, |key| key.is_some());
    log::debug!("overlay reset, {count} elements removed");
    board.drawable.invalidate();
    count
}

/// In-memory overlay scene: the shapes layer (with its definitions) and the
/// separate custom-graphics layer.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayScene {
    pub defs: SvgElement,
    pub shapes: SvgElement,
    pub custom: SvgElement,
}

impl Default for OverlayScene {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayScene {
    pub fn new() -> Self {
        Self {
            defs: definitions_root(),
            shapes: SvgElement::new("g"),
            custom: SvgElement::new("g"),
        }
    }

    fn root_svg(class: &str) -> SvgElement {
        SvgElement::new("svg")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .attr("class", class)
            .attr("viewBox", "-4 -4 8 8")
            .attr("preserveAspectRatio", "xMidYMid slice")
    }

    /// `<svg class="cg-shapes">` holding the definitions and the shapes layer.
    pub fn shapes_svg(&self) -> SvgElement {
        Self::root_svg("cg-shapes")
            .child(self.defs.clone())
            .child(self.shapes.clone())
    }

    /// `<svg class="cg-custom-svgs">` holding the custom layer.
    pub fn custom_svg(&self) -> SvgElement {
        Self::root_svg("cg-custom-svgs").child(self.custom.clone())
    }

    /// Both root layers, shapes first.
    pub fn to_markup(&self) -> String {
        let mut out = self.shapes_svg().to_markup();
        out.push('\n');
        out.push_str(&self.custom_svg().to_markup());
        out
    }
}

impl OverlayHost for OverlayScene {
    type Defs = SvgElement;
    type Layer = SvgElement;

    fn layers(&mut self) -> OverlayLayers<'_, SvgElement, SvgElement> {
        OverlayLayers {
            defs: &mut self.defs,
            shapes: &mut self.shapes,
            custom: &mut self.custom,
        }
    }
}
