//! Shape definitions for the manipulation plane.

mod bezier;
mod circle;
mod group;
mod path;
mod point;
mod rectangle;
mod segment;

pub use bezier::{Bezier, BezierNode};
pub use circle::Circle;
pub use group::Group;
pub use path::Path;
pub use point::FreePoint;
pub use rectangle::Rectangle;
pub use segment::Segment;

use crate::anchor::AnchorPoint;
use crate::manipulation::{Extent, Movable, PointOwner, Rotatable, Rotation, Scalable, Scaling};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Style properties that affect a shape's extent.
///
/// Both values are in device pixels and are divided by the unit size when
/// computing model-space extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke width of outlines (circle rims, rectangle edges).
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Radius of the dots drawn for vertices and handles.
    #[serde(default = "default_point_radius")]
    pub point_radius: f64,
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_point_radius() -> f64 {
    4.0
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_width: default_stroke_width(),
            point_radius: default_point_radius(),
        }
    }
}

/// Calculate distance from a point to a line segment.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    if let [single] = points {
        return (point - *single).hypot();
    }
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Arithmetic mean of a point set. Returns the origin for an empty set.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / points.len() as f64).to_point()
}

/// Model-space extent of a point set padded by `pad` on every side.
///
/// Returns `(top_left, bottom_right)` with Y up.
pub(crate) fn padded_extent(points: &[Point], pad: f64) -> (Point, Point) {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (
        Point::new(min.x - pad, max.y + pad),
        Point::new(max.x + pad, min.y - pad),
    )
}

/// Behaviour common to all shapes beyond the manipulation contract.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Check if a model-space point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Outline as a model-space polyline, for mapping to device space.
    fn outline(&self) -> Vec<Point>;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Point(FreePoint),
    Segment(Segment),
    Circle(Circle),
    Rectangle(Rectangle),
    Path(Path),
    Bezier(Bezier),
    Group(Group),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Point($s) => $body,
            Shape::Segment($s) => $body,
            Shape::Circle($s) => $body,
            Shape::Rectangle($s) => $body,
            Shape::Path($s) => $body,
            Shape::Bezier($s) => $body,
            Shape::Group($s) => $body,
        }
    };
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        dispatch!(self, s => s.id())
    }

    /// Human-readable kind, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Point(_) => "point",
            Shape::Segment(_) => "segment",
            Shape::Circle(_) => "circle",
            Shape::Rectangle(_) => "rectangle",
            Shape::Path(_) => "path",
            Shape::Bezier(_) => "bezier",
            Shape::Group(_) => "group",
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        dispatch!(self, s => s.hit_test(point, tolerance))
    }

    pub fn outline(&self) -> Vec<Point> {
        dispatch!(self, s => s.outline())
    }

    pub fn style(&self) -> &ShapeStyle {
        dispatch!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        dispatch!(self, s => s.style_mut())
    }

    /// The shape's anchor, if it has one. Free points do not.
    pub fn anchor(&self) -> Option<&AnchorPoint> {
        use crate::manipulation::HasAnchor;
        match self {
            Shape::Point(_) => None,
            Shape::Segment(s) => Some(s.anchor()),
            Shape::Circle(s) => Some(s.anchor()),
            Shape::Rectangle(s) => Some(s.anchor()),
            Shape::Path(s) => Some(s.anchor()),
            Shape::Bezier(s) => Some(s.anchor()),
            Shape::Group(s) => Some(s.anchor()),
        }
    }

    /// Mutable access to the anchor, if any.
    pub fn anchor_mut(&mut self) -> Option<&mut AnchorPoint> {
        use crate::manipulation::HasAnchor;
        match self {
            Shape::Point(_) => None,
            Shape::Segment(s) => Some(s.anchor_mut()),
            Shape::Circle(s) => Some(s.anchor_mut()),
            Shape::Rectangle(s) => Some(s.anchor_mut()),
            Shape::Path(s) => Some(s.anchor_mut()),
            Shape::Bezier(s) => Some(s.anchor_mut()),
            Shape::Group(s) => Some(s.anchor_mut()),
        }
    }

    /// Default pivot for shapes with an anchor.
    pub fn default_anchor(&self) -> Option<Point> {
        use crate::manipulation::HasAnchor;
        match self {
            Shape::Point(_) => None,
            Shape::Segment(s) => Some(s.default_anchor()),
            Shape::Circle(s) => Some(s.default_anchor()),
            Shape::Rectangle(s) => Some(s.default_anchor()),
            Shape::Path(s) => Some(s.default_anchor()),
            Shape::Bezier(s) => Some(s.default_anchor()),
            Shape::Group(s) => Some(s.default_anchor()),
        }
    }

    /// Recompute the anchor unless it is overridden.
    pub fn refresh_anchor(&mut self) {
        use crate::manipulation::HasAnchor;
        match self {
            Shape::Point(_) => {}
            Shape::Segment(s) => s.refresh_anchor(),
            Shape::Circle(s) => s.refresh_anchor(),
            Shape::Rectangle(s) => s.refresh_anchor(),
            Shape::Path(s) => s.refresh_anchor(),
            Shape::Bezier(s) => s.refresh_anchor(),
            Shape::Group(s) => s.refresh_anchor(),
        }
    }

    /// Toggle the anchor override. Returns false for shapes without an anchor.
    pub fn set_anchor_overridden(&mut self, overridden: bool) -> bool {
        use crate::manipulation::HasAnchor;
        match self {
            Shape::Point(_) => return false,
            Shape::Segment(s) => s.set_anchor_overridden(overridden),
            Shape::Circle(s) => s.set_anchor_overridden(overridden),
            Shape::Rectangle(s) => s.set_anchor_overridden(overridden),
            Shape::Path(s) => s.set_anchor_overridden(overridden),
            Shape::Bezier(s) => s.set_anchor_overridden(overridden),
            Shape::Group(s) => s.set_anchor_overridden(overridden),
        }
        true
    }

    /// Check if this is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Shape::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }
}

impl PointOwner for Shape {
    fn owned_points(&self) -> Vec<Point> {
        dispatch!(self, s => s.owned_points())
    }

    fn for_each_point_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        dispatch!(self, s => s.for_each_point_mut(f))
    }
}

impl Movable for Shape {
    fn reference_point(&self) -> Point {
        dispatch!(self, s => s.reference_point())
    }

    fn translate(&mut self, offset: Vec2) {
        dispatch!(self, s => s.translate(offset))
    }
}

impl Rotatable for Shape {
    fn rotate(&mut self, rotation: &Rotation) {
        dispatch!(self, s => s.rotate(rotation))
    }
}

impl Scalable for Shape {
    fn scale(&mut self, scaling: &Scaling) {
        dispatch!(self, s => s.scale(scaling))
    }
}

impl Extent for Shape {
    fn top_left(&self, unit: f64) -> Point {
        dispatch!(self, s => s.top_left(unit))
    }

    fn bottom_right(&self, unit: f64) -> Point {
        dispatch!(self, s => s.bottom_right(unit))
    }
}

impl From<FreePoint> for Shape {
    fn from(s: FreePoint) -> Self {
        Shape::Point(s)
    }
}

impl From<Segment> for Shape {
    fn from(s: Segment) -> Self {
        Shape::Segment(s)
    }
}

impl From<Circle> for Shape {
    fn from(s: Circle) -> Self {
        Shape::Circle(s)
    }
}

impl From<Rectangle> for Shape {
    fn from(s: Rectangle) -> Self {
        Shape::Rectangle(s)
    }
}

impl From<Path> for Shape {
    fn from(s: Path) -> Self {
        Shape::Path(s)
    }
}

impl From<Bezier> for Shape {
    fn from(s: Bezier) -> Self {
        Shape::Bezier(s)
    }
}

impl From<Group> for Shape {
    fn from(s: Group) -> Self {
        Shape::Group(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_to_segment_dist() {
        let d = point_to_segment_dist(Point::new(1.0, 1.0), Point::ZERO, Point::new(2.0, 0.0));
        assert!((d - 1.0).abs() < f64::EPSILON);
        // Beyond the end clamps to the endpoint.
        let d = point_to_segment_dist(Point::new(5.0, 0.0), Point::ZERO, Point::new(2.0, 0.0));
        assert!((d - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_centroid() {
        let c = centroid(&[Point::ZERO, Point::new(2.0, 0.0), Point::new(1.0, 3.0)]);
        assert!((c.x - 1.0).abs() < f64::EPSILON);
        assert!((c.y - 1.0).abs() < f64::EPSILON);
        assert_eq!(centroid(&[]), Point::ZERO);
    }

    #[test]
    fn test_padded_extent_is_y_up() {
        let (tl, br) = padded_extent(&[Point::new(-1.0, 2.0), Point::new(3.0, -4.0)], 0.5);
        assert_eq!(tl, Point::new(-1.5, 2.5));
        assert_eq!(br, Point::new(3.5, -4.5));
    }

    #[test]
    fn test_shape_dispatch() {
        let shape: Shape = Circle::new(Point::new(1.0, 1.0), 2.0).into();
        assert_eq!(shape.kind(), "circle");
        assert!(shape.anchor().is_some());
        assert!(!shape.is_group());

        let point: Shape = FreePoint::new(Point::ZERO).into();
        assert!(point.anchor().is_none());
        assert_eq!(point.default_anchor(), None);
    }

    #[test]
    fn test_shape_serialization() {
        let shape: Shape = Segment::new(Point::ZERO, Point::new(3.0, 4.0)).into();
        let json = serde_json::to_string(&shape).unwrap();
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), shape.id());
        assert_eq!(back.owned_points(), shape.owned_points());
    }

    #[test]
    fn test_short_path_is_rejected_on_load() {
        let shape: Shape = Path::new(vec![Point::ZERO, Point::new(1.0, 0.0)], true)
            .unwrap()
            .into();
        let mut value = serde_json::to_value(&shape).unwrap();
        value["Path"]["points"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Shape>(value).is_err());
    }
}
