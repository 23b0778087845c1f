//! Board geometry: squares, orientation and the mapping into overlay user space.
//!
//! User space is centered on the board. One square is one unit wide on a square
//! viewport; on a non-square viewport the board is squeezed along the longer axis
//! so it keeps its aspect ratio.

use crate::config::{ConfigError, ConfigResult};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Viewport pixel bounds of the board.
pub type Bounds = Size;

/// Which side of the board is at the bottom of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    White,
    Black,
}

impl Orientation {
    /// The opposite orientation.
    pub fn flipped(self) -> Self {
        match self {
            Orientation::White => Orientation::Black,
            Orientation::Black => Orientation::White,
        }
    }
}

/// Grid position on the 8x8 board, `(0, 0)` being the bottom-left corner as seen
/// by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Mirror both axes when the board is viewed from black's side.
    pub fn oriented(self, orientation: Orientation) -> Self {
        match orientation {
            Orientation::White => self,
            Orientation::Black => Pos::new(7 - self.x, 7 - self.y),
        }
    }
}

/// A board square such as `e4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Create a square from zero-based file and rank. Returns `None` off the board.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Self { file, rank })
    }

    /// Zero-based file (`a` = 0).
    pub fn file(self) -> u8 {
        self.file
    }

    /// Zero-based rank (`1` = 0).
    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Raw grid position, before orientation is applied.
    pub fn to_pos(self) -> Pos {
        Pos::new(self.file, self.rank)
    }

    /// All 64 squares, a1 first, h8 last.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl FromStr for Square {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ConfigError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::new(file, rank).ok_or_else(|| ConfigError::InvalidSquare(s.to_string()))
    }
}

impl TryFrom<String> for Square {
    type Error = ConfigError;

    fn try_from(value: String) -> ConfigResult<Self> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

/// Map a square to its on-screen grid position for the given orientation.
pub fn square_to_user_pos(square: Square, orientation: Orientation) -> Pos {
    square.to_pos().oriented(orientation)
}

/// Per-axis scale keeping the board square inside possibly non-square bounds.
pub fn board_scale(bounds: Bounds) -> (f64, f64) {
    let scale_x = f64::min(1.0, bounds.width / bounds.height);
    let scale_y = f64::min(1.0, bounds.height / bounds.width);
    (scale_x, scale_y)
}

/// Size of one square in user space.
pub fn square_size(bounds: Bounds) -> Size {
    let (scale_x, scale_y) = board_scale(bounds);
    Size::new(scale_x, scale_y)
}

/// Center of a grid position in user space. The y axis is inverted because
/// ranks grow upwards while the screen grows downwards.
pub fn pos_to_user_space(pos: Pos, bounds: Bounds) -> Point {
    let (scale_x, scale_y) = board_scale(bounds);
    Point::new(
        (pos.x as f64 - 3.5) * scale_x,
        (3.5 - pos.y as f64) * scale_y,
    )
}

/// Center of a square in user space.
pub fn square_center(square: Square, orientation: Orientation, bounds: Bounds) -> Point {
    pos_to_user_space(square_to_user_pos(square, orientation), bounds)
}
