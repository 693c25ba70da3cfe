//! Grid geometry: positions, offsets, bounds and the passability oracle.
//!
//! The battle core never owns a map. Everything it needs to know about the
//! board flows through [`GridOracle`], which callers implement on top of
//! whatever tile storage they already have. [`TileGrid`] is a small in-memory
//! implementation for encounters that do not bring their own.

mod line;
mod tile;

pub use line::line_between;
pub use tile::{Terrain, TileGrid};

use std::fmt;

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position displaced by `offset`.
    #[inline]
    pub const fn offset(self, offset: Offset) -> Self {
        Self {
            x: self.x + offset.dx,
            y: self.y + offset.dy,
        }
    }

    /// Returns the relative offset that takes `self` to `other`.
    #[inline]
    pub const fn offset_to(self, other: Position) -> Offset {
        Offset {
            dx: other.x - self.x,
            dy: other.y - self.y,
        }
    }

    /// Taxicab distance (`|dx| + |dy|`).
    #[inline]
    pub const fn manhattan(self, other: Position) -> u32 {
        self.offset_to(other).manhattan()
    }

    /// King-move distance (`max(|dx|, |dy|)`).
    #[inline]
    pub const fn chebyshev(self, other: Position) -> u32 {
        self.offset_to(other).chebyshev()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Relative displacement between two positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    #[inline]
    pub const fn manhattan(self) -> u32 {
        self.dx.unsigned_abs() + self.dy.unsigned_abs()
    }

    #[inline]
    pub const fn chebyshev(self) -> u32 {
        let ax = self.dx.unsigned_abs();
        let ay = self.dy.unsigned_abs();
        if ax > ay { ax } else { ay }
    }

    /// True when the offset lies on one of the four cardinal axes.
    #[inline]
    pub const fn is_axis_aligned(self) -> bool {
        (self.dx == 0) != (self.dy == 0)
    }
}

impl From<(i32, i32)> for Offset {
    fn from((dx, dy): (i32, i32)) -> Self {
        Self { dx, dy }
    }
}

/// Width/height of the battle grid. Valid positions are `0..width` × `0..height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
}

impl GridBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as i64) < self.width as i64
            && (position.y as i64) < self.height as i64
    }

    /// Number of tiles covered by these bounds.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Read-only view of the board used for bounds and line-of-sight decisions.
///
/// Implementations must be deterministic: the same position always yields the
/// same answer for the lifetime of a single targeting query.
pub trait GridOracle {
    fn bounds(&self) -> GridBounds;

    /// Whether the tile at `position` can be stood on and seen through.
    ///
    /// Positions outside [`GridOracle::bounds`] should report `false`.
    fn is_passable(&self, position: Position) -> bool;

    /// Whether a unit currently stands on `position`.
    ///
    /// Only consulted when unit blocking is enabled.
    fn is_occupied(&self, _position: Position) -> bool {
        false
    }

    fn contains(&self, position: Position) -> bool {
        self.bounds().contains(position)
    }
}

impl<T: GridOracle + ?Sized> GridOracle for &T {
    fn bounds(&self) -> GridBounds {
        (**self).bounds()
    }

    fn is_passable(&self, position: Position) -> bool {
        (**self).is_passable(position)
    }

    fn is_occupied(&self, position: Position) -> bool {
        (**self).is_occupied(position)
    }
}
