//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, centroid, padded_extent, point_to_polyline_dist};
use crate::anchor::AnchorPoint;
use crate::manipulation::{
    Extent, HasAnchor, Movable, PointOwner, Rotatable, Rotation, Scalable, Scaling,
};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle stored as four corner points.
///
/// The corners are manipulated independently, so after a rotation or a
/// non-uniform scale it remains a general quadrilateral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Corners in drawing order, starting top-left for an axis-aligned rect.
    pub corners: [Point; 4],
    anchor: AnchorPoint,
    #[serde(default)]
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create an axis-aligned rectangle from two opposite corners.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::from_rect(Rect::from_points(p1, p2))
    }

    /// Create from a kurbo rect in model space (Y up).
    pub fn from_rect(rect: Rect) -> Self {
        let corners = [
            Point::new(rect.x0, rect.y1),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x0, rect.y0),
        ];
        Self {
            id: Uuid::new_v4(),
            corners,
            anchor: AnchorPoint::new(centroid(&corners)),
            style: ShapeStyle::default(),
        }
    }

    /// Closed kurbo path through the four corners.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.corners[0]);
        for corner in &self.corners[1..] {
            path.line_to(*corner);
        }
        path.close_path();
        path
    }

    /// Enclosed area (absolute, works for any quadrilateral).
    pub fn area(&self) -> f64 {
        self.to_path().area().abs()
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_polyline_dist(point, &self.outline()) <= tolerance
    }

    fn outline(&self) -> Vec<Point> {
        let mut outline = self.corners.to_vec();
        outline.push(self.corners[0]);
        outline
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

impl PointOwner for Rectangle {
    fn owned_points(&self) -> Vec<Point> {
        self.corners.to_vec()
    }

    fn for_each_point_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        self.corners.iter_mut().for_each(f);
    }
}

impl HasAnchor for Rectangle {
    fn anchor(&self) -> &AnchorPoint {
        &self.anchor
    }

    fn anchor_mut(&mut self) -> &mut AnchorPoint {
        &mut self.anchor
    }

    fn default_anchor(&self) -> Point {
        centroid(&self.corners)
    }
}

impl Movable for Rectangle {
    fn reference_point(&self) -> Point {
        self.corners[0]
    }

    fn translate(&mut self, offset: Vec2) {
        self.for_each_point_mut(&mut |p| *p += offset);
        self.anchor.translate(offset);
    }
}

impl Rotatable for Rectangle {
    fn rotate(&mut self, rotation: &Rotation) {
        self.for_each_point_mut(&mut |p| *p = rotation.apply(*p));
        self.anchor.map(|p| rotation.apply(p));
    }
}

impl Scalable for Rectangle {
    fn scale(&mut self, scaling: &Scaling) {
        self.for_each_point_mut(&mut |p| *p = scaling.apply(*p));
        self.anchor.map(|p| scaling.apply(p));
    }
}

impl Extent for Rectangle {
    fn top_left(&self, unit: f64) -> Point {
        padded_extent(&self.corners, self.style.stroke_width / unit).0
    }

    fn bottom_right(&self, unit: f64) -> Point {
        padded_extent(&self.corners, self.style.stroke_width / unit).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_from_corners() {
        let rect = Rectangle::from_corners(Point::new(4.0, -1.0), Point::new(0.0, 2.0));
        assert_eq!(rect.corners[0], Point::new(0.0, 2.0));
        assert_eq!(rect.corners[2], Point::new(4.0, -1.0));
        assert_eq!(rect.anchor().position(), Point::new(2.0, 0.5));
        assert!((rect.area() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_keeps_quadrilateral() {
        let mut rect = Rectangle::from_corners(Point::new(-2.0, -1.0), Point::new(2.0, 1.0));
        let anchor = rect.anchor().position();
        rect.rotate(&Rotation::new(anchor, 30.0));
        // Area is invariant under rotation.
        assert!((rect.area() - 8.0).abs() < 1e-5);
        assert_eq!(rect.anchor().position(), anchor);
    }

    #[test]
    fn test_scale_about_anchor() {
        let mut rect = Rectangle::from_corners(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
        let anchor = rect.anchor().position();
        rect.scale(&Scaling::new(anchor, Vec2::new(2.0, 0.5), 1.25));
        assert_eq!(rect.corners[0], Point::new(-1.0, 1.5));
        assert_eq!(rect.corners[2], Point::new(3.0, 0.5));
    }

    #[test]
    fn test_hit_test_edges_only() {
        let rect = Rectangle::from_corners(Point::ZERO, Point::new(4.0, 4.0));
        assert!(rect.hit_test(Point::new(2.0, 0.05), 0.1));
        assert!(!rect.hit_test(Point::new(2.0, 2.0), 0.1));
    }
}
