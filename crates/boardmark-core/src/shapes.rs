//! Shape definitions for board annotations.

use crate::brush::Modifiers;
use crate::geometry::Square;
use serde::{Deserialize, Serialize};

/// Brush used when a shape does not name one.
pub const DEFAULT_BRUSH: &str = "green";

fn default_brush() -> String {
    DEFAULT_BRUSH.to_string()
}

/// Side a piece belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub fn name(self) -> &'static str {
        match self {
            PieceColor::White => "white",
            PieceColor::Black => "black",
        }
    }
}

/// Piece role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::King => "king",
            Role::Queen => "queen",
            Role::Rook => "rook",
            Role::Bishop => "bishop",
            Role::Knight => "knight",
            Role::Pawn => "pawn",
        }
    }
}

/// Piece glyph attached to a shape (piece-drop previews).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub color: PieceColor,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// A declared board annotation.
///
/// Shapes are immutable values: the owner replaces the whole list on every
/// update and the renderer never edits one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Origin square.
    pub orig: Square,
    /// Destination square. Absent (or equal to `orig`) for a square highlight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<Square>,
    /// Name of the brush in the catalog.
    #[serde(default = "default_brush")]
    pub brush: String,
    /// Per-shape brush overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Modifiers>,
    /// Raw inline SVG drawn in the origin square's 100x100 frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_svg: Option<String>,
    /// Attached piece glyph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece: Option<Piece>,
}

/// What a shape renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind<'a> {
    /// Raw inline markup, drawn on the custom layer.
    Custom { svg: &'a str },
    /// Arrow from the origin to a different destination square.
    Arrow { dest: Square },
    /// Outline of the origin square.
    Square,
}

impl Shape {
    /// Arrow between two squares.
    pub fn arrow(orig: Square, dest: Square, brush: impl Into<String>) -> Self {
        Self {
            orig,
            dest: Some(dest),
            brush: brush.into(),
            modifiers: None,
            custom_svg: None,
            piece: None,
        }
    }

    /// Square highlight.
    pub fn square(orig: Square, brush: impl Into<String>) -> Self {
        Self {
            orig,
            dest: None,
            brush: brush.into(),
            modifiers: None,
            custom_svg: None,
            piece: None,
        }
    }

    /// Custom inline graphic on `orig`.
    pub fn custom(orig: Square, svg: impl Into<String>) -> Self {
        Self {
            orig,
            dest: None,
            brush: default_brush(),
            modifiers: None,
            custom_svg: Some(svg.into()),
            piece: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    pub fn with_piece(mut self, piece: Piece) -> Self {
        self.piece = Some(piece);
        self
    }

    /// Classify the shape. Custom markup wins over brush-based rendering.
    pub fn kind(&self) -> ShapeKind<'_> {
        if let Some(svg) = self.custom_svg.as_deref() {
            return ShapeKind::Custom { svg };
        }
        match self.dest {
            Some(dest) if dest != self.orig => ShapeKind::Arrow { dest },
            _ => ShapeKind::Square,
        }
    }

    /// Destination square when this shape is drawn as an arrow.
    pub fn arrow_dest(&self) -> Option<Square> {
        match self.kind() {
            ShapeKind::Arrow { dest } => Some(dest),
            _ => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.custom_svg.is_some()
    }

    /// Whether the modifiers ask for the white halo.
    pub fn is_hilited(&self) -> bool {
        self.modifiers.as_ref().is_some_and(|m| m.hilite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_kind_dispatch() {
        assert_eq!(
            Shape::arrow(sq("e2"), sq("e4"), "green").kind(),
            ShapeKind::Arrow { dest: sq("e4") }
        );
        assert_eq!(Shape::square(sq("e2"), "red").kind(), ShapeKind::Square);
        assert_eq!(Shape::arrow(sq("e2"), sq("e2"), "red").kind(), ShapeKind::Square);

        let mut custom = Shape::custom(sq("d5"), "<circle r='40'/>");
        custom.dest = Some(sq("d6"));
        assert_eq!(custom.kind(), ShapeKind::Custom { svg: "<circle r='40'/>" });
        assert_eq!(custom.arrow_dest(), None);
    }

    #[test]
    fn test_shape_json_defaults() {
        let shape: Shape = serde_json::from_str(r#"{ "orig": "a1", "dest": "h8" }"#).unwrap();
        assert_eq!(shape.brush, DEFAULT_BRUSH);
        assert_eq!(shape.arrow_dest(), Some(sq("h8")));
        assert!(!shape.is_hilited());

        let shape: Shape = serde_json::from_str(
            r#"{ "orig": "c3", "brush": "red", "modifiers": { "hilite": true },
                 "piece": { "color": "black", "role": "knight", "scale": 0.5 } }"#,
        )
        .unwrap();
        assert!(shape.is_hilited());
        assert_eq!(shape.piece.as_ref().map(|p| p.role), Some(Role::Knight));
    }
}
