//! Pivot point used by rotate and scale.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A shape's pivot.
///
/// While not overridden the position tracks the shape's default pivot and is
/// recomputed on every refresh. Once the user drops the anchor somewhere it
/// is frozen there and only moves together with the owning shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    position: Point,
    overridden: bool,
}

impl AnchorPoint {
    /// Create an anchor at the shape's default pivot.
    pub fn new(default: Point) -> Self {
        Self {
            position: default,
            overridden: false,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// Recompute from the default pivot unless overridden.
    pub fn refresh(&mut self, default: Point) {
        if !self.overridden {
            self.position = default;
        }
    }

    /// Place the anchor where the user dropped it.
    pub fn override_at(&mut self, position: Point) {
        self.position = position;
        self.overridden = true;
    }

    /// Toggle the override. Clearing it snaps back to `default`.
    pub fn set_overridden(&mut self, overridden: bool, default: Point) {
        self.overridden = overridden;
        if !overridden {
            self.position = default;
        }
    }

    /// Follow a rigid translation of the owning shape.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Follow any point mapping applied to the owning shape.
    pub fn map(&mut self, f: impl Fn(Point) -> Point) {
        self.position = f(self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_anchor_tracks_refresh() {
        let mut anchor = AnchorPoint::new(Point::new(1.0, 1.0));
        anchor.refresh(Point::new(2.0, 3.0));
        assert_eq!(anchor.position(), Point::new(2.0, 3.0));
        assert!(!anchor.is_overridden());
    }

    #[test]
    fn test_override_freezes_position() {
        let mut anchor = AnchorPoint::new(Point::ZERO);
        anchor.override_at(Point::new(5.0, -1.0));
        anchor.refresh(Point::new(9.0, 9.0));
        assert_eq!(anchor.position(), Point::new(5.0, -1.0));

        anchor.translate(Vec2::new(1.0, 1.0));
        assert_eq!(anchor.position(), Point::new(6.0, 0.0));
    }

    #[test]
    fn test_clearing_override_recomputes() {
        let mut anchor = AnchorPoint::new(Point::ZERO);
        anchor.override_at(Point::new(5.0, 5.0));
        anchor.set_overridden(false, Point::new(1.0, 2.0));
        assert!(!anchor.is_overridden());
        assert_eq!(anchor.position(), Point::new(1.0, 2.0));
    }
}
