//! Line segment shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, padded_extent, point_to_segment_dist};
use crate::anchor::AnchorPoint;
use crate::manipulation::{
    Extent, HasAnchor, Movable, PointOwner, Rotatable, Rotation, Scalable, Scaling,
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight segment between two endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub(crate) id: ShapeId,
    pub start: Point,
    pub end: Point,
    anchor: AnchorPoint,
    #[serde(default)]
    pub style: ShapeStyle,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            anchor: AnchorPoint::new(start.midpoint(end)),
            style: ShapeStyle::default(),
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }
}

impl ShapeTrait for Segment {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= tolerance
    }

    fn outline(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

impl PointOwner for Segment {
    fn owned_points(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }

    fn for_each_point_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        f(&mut self.start);
        f(&mut self.end);
    }
}

impl HasAnchor for Segment {
    fn anchor(&self) -> &AnchorPoint {
        &self.anchor
    }

    fn anchor_mut(&mut self) -> &mut AnchorPoint {
        &mut self.anchor
    }

    fn default_anchor(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

impl Movable for Segment {
    fn reference_point(&self) -> Point {
        self.start
    }

    fn translate(&mut self, offset: Vec2) {
        self.start += offset;
        self.end += offset;
        self.anchor.translate(offset);
    }
}

impl Rotatable for Segment {
    fn rotate(&mut self, rotation: &Rotation) {
        self.for_each_point_mut(&mut |p| *p = rotation.apply(*p));
        self.anchor.map(|p| rotation.apply(p));
    }
}

impl Scalable for Segment {
    fn scale(&mut self, scaling: &Scaling) {
        self.for_each_point_mut(&mut |p| *p = scaling.apply(*p));
        self.anchor.map(|p| scaling.apply(p));
    }
}

impl Extent for Segment {
    fn top_left(&self, unit: f64) -> Point {
        padded_extent(&self.owned_points(), self.style.point_radius / unit).0
    }

    fn bottom_right(&self, unit: f64) -> Point {
        padded_extent(&self.owned_points(), self.style.point_radius / unit).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_creation() {
        let segment = Segment::new(Point::ZERO, Point::new(3.0, 4.0));
        assert!((segment.length() - 5.0).abs() < f64::EPSILON);
        assert_eq!(segment.anchor().position(), Point::new(1.5, 2.0));
    }

    #[test]
    fn test_rotate_about_midpoint() {
        let mut segment = Segment::new(Point::new(-1.0, 0.0), Point::new(1.0, 0.0));
        let anchor = segment.anchor().position();
        segment.rotate(&Rotation::new(anchor, 90.0));
        assert!((segment.start.x - 0.0).abs() < 1e-9);
        assert!((segment.start.y + 1.0).abs() < 1e-9);
        assert!((segment.end.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overridden_anchor_moves_with_shape() {
        let mut segment = Segment::new(Point::ZERO, Point::new(2.0, 0.0));
        segment.drag_anchor_to(Point::new(5.0, 5.0));
        segment.translate(Vec2::new(1.0, -1.0));
        segment.refresh_anchor();
        assert_eq!(segment.anchor().position(), Point::new(6.0, 4.0));

        segment.set_anchor_overridden(false);
        assert_eq!(segment.anchor().position(), Point::new(2.0, -1.0));
    }

    #[test]
    fn test_hit_test() {
        let segment = Segment::new(Point::ZERO, Point::new(4.0, 0.0));
        assert!(segment.hit_test(Point::new(2.0, 0.1), 0.2));
        assert!(!segment.hit_test(Point::new(2.0, 1.0), 0.2));
    }
}
