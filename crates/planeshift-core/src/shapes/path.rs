//! Polyline / polygon shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, centroid, padded_extent, point_to_polyline_dist};
use crate::anchor::AnchorPoint;
use crate::error::{GeometryError, GeometryResult};
use crate::manipulation::{
    Extent, HasAnchor, Movable, PointOwner, Rotatable, Rotation, Scalable, Scaling,
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum number of points a path keeps.
pub const MIN_PATH_POINTS: usize = 2;

/// Where a point inserted at index `k` of `points` goes.
///
/// Between two neighbours it is their midpoint; at the front of the list the
/// average of the first and last point; past the end the last point plus
/// `delta`.
pub(crate) fn insertion_point(points: &[Point], k: usize, delta: Vec2) -> Point {
    let len = points.len();
    if k == 0 {
        points[0].midpoint(points[len - 1])
    } else if k < len {
        points[k - 1].midpoint(points[k])
    } else {
        points[len - 1] + delta
    }
}

/// An ordered list of points, optionally closed into a polygon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPath")]
pub struct Path {
    pub(crate) id: ShapeId,
    points: Vec<Point>,
    pub closed: bool,
    anchor: AnchorPoint,
    pub style: ShapeStyle,
}

/// Serialized form, checked against the minimum length before use.
#[derive(Deserialize)]
struct RawPath {
    id: ShapeId,
    points: Vec<Point>,
    #[serde(default)]
    closed: bool,
    anchor: AnchorPoint,
    #[serde(default)]
    style: ShapeStyle,
}

impl TryFrom<RawPath> for Path {
    type Error = GeometryError;

    fn try_from(raw: RawPath) -> GeometryResult<Self> {
        let mut shape = Self::new(raw.points, raw.closed)?;
        shape.id = raw.id;
        shape.anchor = raw.anchor;
        shape.style = raw.style;
        Ok(shape)
    }
}

impl Path {
    /// Create a path. Fails with fewer than two points.
    pub fn new(points: Vec<Point>, closed: bool) -> GeometryResult<Self> {
        if points.len() < MIN_PATH_POINTS {
            return Err(GeometryError::InsufficientPoints {
                required: MIN_PATH_POINTS,
                actual: points.len(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            anchor: AnchorPoint::new(centroid(&points)),
            points,
            closed,
            style: ShapeStyle::default(),
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a path never drops below two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Insert a point at index `k` (clamped to the end). See
    /// [`insertion_point`] for where it lands. Returns the inserted index.
    pub fn insert_point(&mut self, k: usize, delta: Vec2) -> usize {
        let k = k.min(self.points.len());
        let point = insertion_point(&self.points, k, delta);
        self.points.insert(k, point);
        self.refresh_anchor();
        k
    }

    /// Remove the point at `k`, refusing to go below two points.
    pub fn remove_point(&mut self, k: usize) -> GeometryResult<Point> {
        if self.points.len() <= MIN_PATH_POINTS {
            return Err(GeometryError::InsufficientPoints {
                required: MIN_PATH_POINTS,
                actual: self.points.len() - 1,
            });
        }
        let k = k.min(self.points.len() - 1);
        let removed = self.points.remove(k);
        self.refresh_anchor();
        Ok(removed)
    }

    /// Move a single vertex to a new position.
    pub fn set_point(&mut self, k: usize, position: Point) -> bool {
        match self.points.get_mut(k) {
            Some(p) => {
                *p = position;
                true
            }
            None => false,
        }
    }
}

impl ShapeTrait for Path {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_polyline_dist(point, &self.outline()) <= tolerance
    }

    fn outline(&self) -> Vec<Point> {
        let mut outline = self.points.clone();
        if self.closed {
            outline.push(self.points[0]);
        }
        outline
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

impl PointOwner for Path {
    fn owned_points(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn for_each_point_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        self.points.iter_mut().for_each(f);
    }
}

impl HasAnchor for Path {
    fn anchor(&self) -> &AnchorPoint {
        &self.anchor
    }

    fn anchor_mut(&mut self) -> &mut AnchorPoint {
        &mut self.anchor
    }

    fn default_anchor(&self) -> Point {
        centroid(&self.points)
    }
}

impl Movable for Path {
    fn reference_point(&self) -> Point {
        self.points[0]
    }

    fn translate(&mut self, offset: Vec2) {
        self.for_each_point_mut(&mut |p| *p += offset);
        self.anchor.translate(offset);
    }
}

impl Rotatable for Path {
    fn rotate(&mut self, rotation: &Rotation) {
        self.for_each_point_mut(&mut |p| *p = rotation.apply(*p));
        self.anchor.map(|p| rotation.apply(p));
    }
}

impl Scalable for Path {
    fn scale(&mut self, scaling: &Scaling) {
        self.for_each_point_mut(&mut |p| *p = scaling.apply(*p));
        self.anchor.map(|p| scaling.apply(p));
    }
}

impl Extent for Path {
    fn top_left(&self, unit: f64) -> Point {
        padded_extent(&self.points, self.style.point_radius / unit).0
    }

    fn bottom_right(&self, unit: f64) -> Point {
        padded_extent(&self.points, self.style.point_radius / unit).1
    }
}
