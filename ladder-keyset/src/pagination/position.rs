//! Cursor positions.

use crate::types::{NavigationDirection, Value};

/// A point in a keyset sort order.
///
/// Holds the pagination schema version plus one anchor value per sort column,
/// in sort-column order. Positions only live inside a [`Cursor`] or inside an
/// encoded token; the pager creates them at page boundaries and the codec
/// checks their version and arity on the way back in.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "position must be encoded or wrapped in a Cursor"]
pub struct Position {
    version: i64,
    anchor: Vec<Value>,
}

impl Position {
    /// Create a position from a schema version and anchor values.
    pub const fn new(version: i64, anchor: Vec<Value>) -> Self {
        Self { version, anchor }
    }

    /// Pagination schema version this position was created under.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    /// Anchor values in sort-column order.
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> &[Value] {
        &self.anchor
    }

    /// Number of anchor values.
    #[inline]
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.anchor.len()
    }
}

/// A request to continue paging from a position in a direction.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "cursor must be passed to the pager"]
pub struct Cursor {
    position: Position,
    direction: NavigationDirection,
}

impl Cursor {
    /// Create a cursor.
    pub const fn new(position: Position, direction: NavigationDirection) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Cursor moving forward from `position`.
    pub const fn forward(position: Position) -> Self {
        Self::new(position, NavigationDirection::Forward)
    }

    /// Cursor moving backward from `position`.
    pub const fn backward(position: Position) -> Self {
        Self::new(position, NavigationDirection::Backward)
    }

    /// Position the cursor is anchored at.
    #[inline]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Direction of travel.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> NavigationDirection {
        self.direction
    }

    /// Split into position and direction.
    #[must_use]
    pub fn into_parts(self) -> (Position, NavigationDirection) {
        (self.position, self.direction)
    }
}
