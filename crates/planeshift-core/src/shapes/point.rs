//! Free point shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, padded_extent};
use crate::manipulation::{Extent, Movable, PointOwner, Rotatable, Rotation, Scalable, Scaling};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single draggable point.
///
/// It has no anchor of its own; it only rotates or scales when a containing
/// group forwards an operation about the group's anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreePoint {
    pub(crate) id: ShapeId,
    pub position: Point,
    #[serde(default)]
    pub style: ShapeStyle,
}

impl FreePoint {
    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            style: ShapeStyle::default(),
        }
    }
}

impl ShapeTrait for FreePoint {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot() <= tolerance
    }

    fn outline(&self) -> Vec<Point> {
        vec![self.position]
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

impl PointOwner for FreePoint {
    fn owned_points(&self) -> Vec<Point> {
        vec![self.position]
    }

    fn for_each_point_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        f(&mut self.position);
    }
}

impl Movable for FreePoint {
    fn reference_point(&self) -> Point {
        self.position
    }

    fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

impl Rotatable for FreePoint {
    fn rotate(&mut self, rotation: &Rotation) {
        self.position = rotation.apply(self.position);
    }
}

impl Scalable for FreePoint {
    fn scale(&mut self, scaling: &Scaling) {
        self.position = scaling.apply(self.position);
    }
}

impl Extent for FreePoint {
    fn top_left(&self, unit: f64) -> Point {
        padded_extent(&[self.position], self.style.point_radius / unit).0
    }

    fn bottom_right(&self, unit: f64) -> Point {
        padded_extent(&[self.position], self.style.point_radius / unit).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnapBands;

    #[test]
    fn test_move_with_snap() {
        let mut p = FreePoint::new(Point::new(1.0, 1.0));
        let applied = p
            .move_by(Vec2::new(1.97, 0.3), Some(&SnapBands::default()))
            .unwrap();
        assert!((p.position.x - 3.0).abs() < f64::EPSILON);
        assert!((p.position.y - 1.3).abs() < 1e-12);
        assert!((applied.x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_move_rejects_non_finite() {
        let mut p = FreePoint::new(Point::new(1.0, 1.0));
        assert!(p.move_by(Vec2::new(f64::NAN, 0.0), None).is_err());
        assert_eq!(p.position, Point::new(1.0, 1.0));
    }

    #[test]
    fn test_extent_uses_point_radius() {
        let p = FreePoint::new(Point::new(1.0, 1.0));
        // Default radius 4 px at 40 px per unit.
        let tl = p.top_left(40.0);
        let br = p.bottom_right(40.0);
        assert!((tl.x - 0.9).abs() < 1e-12);
        assert!((tl.y - 1.1).abs() < 1e-12);
        assert!((br.x - 1.1).abs() < 1e-12);
        assert!((br.y - 0.9).abs() < 1e-12);
    }
}
