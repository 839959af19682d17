#![forbid(unsafe_code)]

//! Movement constraints applied to a drag translation.
//!
//! Item drags are locked to the vertical axis and kept inside the list
//! container so the proxy never shows an ambiguous intermediate position.

use crate::geometry::{Offset, Rect, saturate_i32};

/// Restrictions applied to the raw pointer translation of a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementConstraint {
    /// Drop any horizontal component.
    pub vertical_only: bool,
    /// Keep the dragged rect inside the container bounds.
    pub within_parent: bool,
}

impl Default for MovementConstraint {
    fn default() -> Self {
        Self::LOCKED
    }
}

impl MovementConstraint {
    /// Vertical axis, inside the parent.
    pub const LOCKED: Self = Self {
        vertical_only: true,
        within_parent: true,
    };

    pub const FREE: Self = Self {
        vertical_only: false,
        within_parent: false,
    };

    /// Constrain `translation` for a proxy that started at `active`.
    #[must_use]
    pub fn apply(&self, translation: Offset, active: Rect, container: Option<Rect>) -> Offset {
        let mut out = translation;
        if self.vertical_only {
            out.dx = 0;
        }
        if self.within_parent
            && let Some(bounds) = container
        {
            out.dx = clamp_axis(active.x, active.width, out.dx, bounds.x, bounds.width);
            out.dy = clamp_axis(active.y, active.height, out.dy, bounds.y, bounds.height);
        }
        out
    }
}

/// Clamp a one-dimensional translation so `[start + delta, start + delta + size)`
/// stays within `[lo, lo + span)`. A proxy larger than the span pins to `lo`.
fn clamp_axis(start: i32, size: i32, delta: i32, lo: i32, span: i32) -> i32 {
    let (start, size, lo, span) = (
        i64::from(start),
        i64::from(size),
        i64::from(lo),
        i64::from(span),
    );
    let min_delta = lo - start;
    let max_delta = (lo + span - size - start).max(min_delta);
    saturate_i32(i64::from(delta).clamp(min_delta, max_delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: Rect = Rect::new(0, 0, 40, 30);
    const ITEM: Rect = Rect::new(0, 10, 40, 5);

    #[test]
    fn vertical_only_drops_horizontal_drift() {
        let c = MovementConstraint {
            vertical_only: true,
            within_parent: false,
        };
        assert_eq!(c.apply(Offset::new(7, 3), ITEM, None), Offset::new(0, 3));
    }

    #[test]
    fn within_parent_clamps_both_edges() {
        let c = MovementConstraint::LOCKED;
        assert_eq!(c.apply(Offset::new(0, -50), ITEM, Some(LIST)), Offset::new(0, -10));
        assert_eq!(c.apply(Offset::new(0, 50), ITEM, Some(LIST)), Offset::new(0, 15));
        assert_eq!(c.apply(Offset::new(0, 4), ITEM, Some(LIST)), Offset::new(0, 4));
    }

    #[test]
    fn oversized_proxy_pins_to_top() {
        let tall = Rect::new(0, 0, 40, 50);
        let c = MovementConstraint::LOCKED;
        assert_eq!(c.apply(Offset::new(0, 12), tall, Some(LIST)), Offset::new(0, 0));
    }

    #[test]
    fn extreme_translation_clamps_without_overflow() {
        let c = MovementConstraint::LOCKED;
        assert_eq!(c.apply(Offset::new(0, i32::MAX), ITEM, Some(LIST)), Offset::new(0, 15));
        assert_eq!(c.apply(Offset::new(0, i32::MIN), ITEM, Some(LIST)), Offset::new(0, -10));

        let edge = Rect::new(i32::MIN, i32::MIN, 5, 5);
        let huge = Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(c.apply(Offset::new(0, i32::MAX), edge, Some(huge)).dy, i32::MAX - 5);
    }

    #[test]
    fn free_passes_through() {
        let c = MovementConstraint::FREE;
        assert_eq!(c.apply(Offset::new(9, -9), ITEM, Some(LIST)), Offset::new(9, -9));
    }

    #[test]
    fn missing_container_only_locks_axis() {
        let c = MovementConstraint::LOCKED;
        assert_eq!(c.apply(Offset::new(5, 500), ITEM, None), Offset::new(0, 500));
    }
}
