//! Count of arrows terminating on each square.

use crate::geometry::Square;
use crate::shapes::Shape;
use std::collections::HashMap;

/// Destination square -> number of arrows ending there. Rebuilt from scratch on
/// every render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrowTally {
    counts: HashMap<Square, usize>,
}

impl ArrowTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally every arrow in `shapes`. Square highlights and custom graphics are ignored.
    pub fn from_shapes<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Self {
        let mut tally = Self::new();
        for shape in shapes {
            tally.add(shape);
        }
        tally
    }

    pub fn add(&mut self, shape: &Shape) {
        if let Some(dest) = shape.arrow_dest() {
            *self.counts.entry(dest).or_insert(0) += 1;
        }
    }

    pub fn count(&self, dest: Square) -> usize {
        self.counts.get(&dest).copied().unwrap_or(0)
    }

    /// More than one arrow ends on `dest`.
    pub fn is_shared(&self, dest: Square) -> bool {
        self.count(dest) > 1
    }
}
