//! Circle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::anchor::AnchorPoint;
use crate::manipulation::{
    Extent, HasAnchor, Movable, PointOwner, Rotatable, Rotation, Scalable, Scaling,
};
use kurbo::{Circle as KurboCircle, Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of vertices used when the outline is flattened for mapping.
const OUTLINE_SEGMENTS: usize = 64;

/// A circle defined by its center and radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    pub center: Point,
    /// Radius in model units.
    radius: f64,
    anchor: AnchorPoint,
    #[serde(default)]
    pub style: ShapeStyle,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius: radius.abs(),
            anchor: AnchorPoint::new(center),
            style: ShapeStyle::default(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Get as a kurbo Circle.
    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(self.center, self.radius)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Outline only: the rim within tolerance.
        let dist = (point - self.center).hypot();
        (dist - self.radius).abs() <= tolerance
    }

    fn outline(&self) -> Vec<Point> {
        (0..=OUTLINE_SEGMENTS)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / OUTLINE_SEGMENTS as f64;
                self.center + Vec2::from_angle(angle) * self.radius
            })
            .collect()
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

impl PointOwner for Circle {
    fn owned_points(&self) -> Vec<Point> {
        vec![self.center]
    }

    fn for_each_point_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        f(&mut self.center);
    }
}

impl HasAnchor for Circle {
    fn anchor(&self) -> &AnchorPoint {
        &self.anchor
    }

    fn anchor_mut(&mut self) -> &mut AnchorPoint {
        &mut self.anchor
    }

    fn default_anchor(&self) -> Point {
        self.center
    }
}

impl Movable for Circle {
    fn reference_point(&self) -> Point {
        self.center
    }

    fn translate(&mut self, offset: Vec2) {
        self.center += offset;
        self.anchor.translate(offset);
    }
}

impl Rotatable for Circle {
    fn rotate(&mut self, rotation: &Rotation) {
        self.center = rotation.apply(self.center);
        self.anchor.map(|p| rotation.apply(p));
    }
}

impl Scalable for Circle {
    fn scale(&mut self, scaling: &Scaling) {
        let Some(radius) = scaling.scale_length(self.radius) else {
            log::debug!(
                "Skipping circle scale: radius {} by {} is not a positive length",
                self.radius,
                scaling.change_factor
            );
            return;
        };
        self.radius = radius;
        self.center = scaling.apply(self.center);
        self.anchor.map(|p| scaling.apply(p));
    }
}

impl Extent for Circle {
    fn top_left(&self, unit: f64) -> Point {
        let r = self.radius + self.style.stroke_width / unit;
        Point::new(self.center.x - r, self.center.y + r)
    }

    fn bottom_right(&self, unit: f64) -> Point {
        let r = self.radius + self.style.stroke_width / unit;
        Point::new(self.center.x + r, self.center.y - r)
    }
}
