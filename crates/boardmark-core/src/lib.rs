//! Boardmark Core Library
//!
//! Platform-agnostic model for the chessboard annotation overlay: board geometry,
//! brushes, declared shapes, the drawable state snapshot and shape fingerprinting.

pub mod brush;
pub mod config;
pub mod drawable;
pub mod geometry;
pub mod hash;
pub mod shapes;
pub mod tally;

pub use brush::{Brush, BrushCatalog, Modifiers, SvgColor, HILITE_BRUSH_KEY};
pub use config::{ConfigError, ConfigResult};
pub use drawable::{BoardState, CurrentShape, DrawablePass, DrawableState, SyncableShape};
pub use geometry::{Bounds, Orientation, Pos, Square};
pub use hash::{Hash, aggregate_hash, custom_svg_hash, shape_hash};
pub use shapes::{Piece, PieceColor, Role, Shape, ShapeKind};
pub use tally::ArrowTally;
