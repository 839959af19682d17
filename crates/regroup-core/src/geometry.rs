#![forbid(unsafe_code)]

//! Geometric primitives for hit testing and collision detection.
//!
//! Coordinates are signed so a pointer may wander outside the list; all
//! center arithmetic is done in doubled integer space to stay exact.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in host coordinates (origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another point.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// Translation that carries `self` to `other`, saturating at the `i32`
    /// range.
    #[must_use]
    pub const fn delta_to(self, other: Self) -> Offset {
        Offset::new(other.x.saturating_sub(self.x), other.y.saturating_sub(self.y))
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Narrow an `i64` to `i32`, saturating at the bounds.
#[inline]
pub(crate) fn saturate_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// A translation vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const ZERO: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// An axis-aligned rectangle for drop zones and drag proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Center scaled by two, so odd sizes stay exact.
    #[inline]
    #[must_use]
    pub const fn center_doubled(&self) -> (i64, i64) {
        (
            2 * self.x as i64 + self.width as i64,
            2 * self.y as i64 + self.height as i64,
        )
    }

    /// Squared center-to-center distance (in doubled space).
    #[must_use]
    pub fn center_distance_sq(&self, other: &Rect) -> i64 {
        let (ax, ay) = self.center_doubled();
        let (bx, by) = other.center_doubled();
        let (dx, dy) = (ax - bx, ay - by);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    #[must_use]
    pub const fn translate(&self, offset: Offset) -> Rect {
        Rect::new(
            self.x.saturating_add(offset.dx),
            self.y.saturating_add(offset.dy),
            self.width,
            self.height,
        )
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()).saturating_sub(x),
            self.bottom().max(other.bottom()).saturating_sub(y),
        )
    }
}
