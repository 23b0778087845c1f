//! Drawable state snapshot and per-pass shape collection.

use crate::brush::BrushCatalog;
use crate::geometry::{Bounds, Orientation, Square};
use crate::hash::{Hash, aggregate_hash, shape_hash};
use crate::shapes::Shape;
use crate::tally::ArrowTally;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// The annotation being drawn interactively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentShape {
    pub shape: Shape,
    /// Square under the pointer, if the pointer is over the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_square: Option<Square>,
}

impl CurrentShape {
    pub fn new(shape: Shape, pointer_square: Option<Square>) -> Self {
        Self {
            shape,
            pointer_square,
        }
    }
}

/// Annotation state owned by the board.
#[derive(Debug, Clone, Default)]
pub struct DrawableState {
    /// User-declared shapes.
    pub shapes: Vec<Shape>,
    /// Shapes generated by the host (hints, engine arrows, piece previews).
    pub auto_shapes: Vec<Shape>,
    /// Shape being drawn right now.
    pub current: Option<CurrentShape>,
    pub brushes: BrushCatalog,
    /// Aggregate fingerprint of the last rendered pass.
    pub prev_svg_hash: Option<Hash>,
    /// Orientation of the last rendered pass. Fingerprints do not cover it, so
    /// the renderer rebuilds the layers when it differs.
    pub prev_orientation: Option<Orientation>,
}

/// One shape prepared for a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncableShape<'a> {
    pub shape: &'a Shape,
    /// This is the live in-progress shape.
    pub current: bool,
    pub hash: Hash,
}

/// Everything derived from the drawable state for a single pass.
#[derive(Debug, Clone)]
pub struct DrawablePass<'a> {
    /// Shapes in render order; the live shape, if any, comes last.
    pub shapes: Vec<SyncableShape<'a>>,
    pub tally: ArrowTally,
    pub full_hash: Hash,
}

impl DrawablePass<'_> {
    pub fn into_full_hash(self) -> Hash {
        self.full_hash
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl DrawableState {
    pub fn new(brushes: BrushCatalog) -> Self {
        Self {
            brushes,
            ..Self::default()
        }
    }

    pub fn set_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    pub fn set_auto_shapes(&mut self, shapes: Vec<Shape>) {
        self.auto_shapes = shapes;
    }

    pub fn set_current(&mut self, current: CurrentShape) {
        self.current = Some(current);
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Drop every declared shape, persisted and in-progress.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.current = None;
    }

    /// Forget the last rendered fingerprint so the next render reconciles.
    pub fn invalidate(&mut self) {
        self.prev_svg_hash = None;
    }

    /// The in-progress shape, when it takes part in this pass.
    ///
    /// It only counts while the pointer is over a square.
    pub fn live_shape(&self) -> Option<&Shape> {
        self.current
            .as_ref()
            .filter(|c| c.pointer_square.is_some())
            .map(|c| &c.shape)
    }

    /// Persisted shapes followed by auto shapes. Auto shapes carrying a piece are
    /// drop previews drawn by the piece layer and are left out.
    pub fn committed_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .chain(self.auto_shapes.iter().filter(|s| s.piece.is_none()))
    }

    /// Tally arrow destinations over every shape drawn this pass.
    pub fn arrow_tally(&self) -> ArrowTally {
        ArrowTally::from_shapes(self.committed_shapes().chain(self.live_shape()))
    }

    /// Collect and fingerprint the shapes of one render pass.
    pub fn prepare(&self, bounds: Bounds) -> DrawablePass<'_> {
        let tally = self.arrow_tally();
        let mut shapes: Vec<SyncableShape<'_>> = self
            .committed_shapes()
            .map(|shape| SyncableShape {
                shape,
                current: false,
                hash: shape_hash(shape, &tally, false, bounds),
            })
            .collect();
        if let Some(shape) = self.live_shape() {
            shapes.push(SyncableShape {
                shape,
                current: true,
                hash: shape_hash(shape, &tally, true, bounds),
            });
        }
        for s in &shapes {
            log::trace!("shape {} -> {}", s.shape.orig, s.hash);
        }
        let full_hash = aggregate_hash(&shapes);
        DrawablePass {
            shapes,
            tally,
            full_hash,
        }
    }
}

/// Read-only board snapshot consumed by the overlay renderer.
#[derive(Debug, Clone)]
pub struct BoardState {
    pub orientation: Orientation,
    pub bounds: Bounds,
    pub drawable: DrawableState,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            orientation: Orientation::White,
            bounds: Size::new(512.0, 512.0),
            drawable: DrawableState::default(),
        }
    }
}

impl BoardState {
    pub fn new(orientation: Orientation, bounds: Bounds, drawable: DrawableState) -> Self {
        Self {
            orientation,
            bounds,
            drawable,
        }
    }

    /// Change orientation. Fingerprints do not cover orientation, so the
    /// previous pass is invalidated and the next render rebuilds every element.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.orientation != orientation {
            self.orientation = orientation;
            self.drawable.invalidate();
        }
    }

    pub fn toggle_orientation(&mut self) {
        self.set_orientation(self.orientation.flipped());
    }

    /// Bounds are part of every fingerprint, so a resize re-renders on its own.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }
}
