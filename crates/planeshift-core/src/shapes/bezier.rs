//! Cubic Bézier curve shape.

use super::path::{MIN_PATH_POINTS, insertion_point};
use super::{ShapeId, ShapeStyle, ShapeTrait, centroid, padded_extent};
use crate::anchor::AnchorPoint;
use crate::error::{GeometryError, GeometryResult};
use crate::manipulation::{
    Extent, HasAnchor, Movable, PointOwner, Rotatable, Rotation, Scalable, Scaling,
};
use kurbo::{BezPath, CubicBez, ParamCurveNearest, PathEl, Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flattening tolerance for outlines, in model units.
const FLATTEN_TOLERANCE: f64 = 0.01;

/// Accuracy passed to kurbo's nearest-point search.
const NEAREST_ACCURACY: f64 = 1e-6;

/// An on-curve point with its two control handles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierNode {
    pub point: Point,
    /// Control point of the segment arriving at this node.
    pub handle_in: Point,
    /// Control point of the segment leaving this node.
    pub handle_out: Point,
}

impl BezierNode {
    /// A node whose handles sit on the point (a corner).
    pub fn corner(point: Point) -> Self {
        Self {
            point,
            handle_in: point,
            handle_out: point,
        }
    }

    pub fn new(point: Point, handle_in: Point, handle_out: Point) -> Self {
        Self {
            point,
            handle_in,
            handle_out,
        }
    }
}

/// A chain of cubic segments between consecutive nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawBezier")]
pub struct Bezier {
    pub(crate) id: ShapeId,
    nodes: Vec<BezierNode>,
    pub closed: bool,
    anchor: AnchorPoint,
    pub style: ShapeStyle,
}

/// Serialized form, checked against the minimum length before use.
#[derive(Deserialize)]
struct RawBezier {
    id: ShapeId,
    nodes: Vec<BezierNode>,
    #[serde(default)]
    closed: bool,
    anchor: AnchorPoint,
    #[serde(default)]
    style: ShapeStyle,
}

impl TryFrom<RawBezier> for Bezier {
    type Error = GeometryError;

    fn try_from(raw: RawBezier) -> GeometryResult<Self> {
        let mut shape = Self::new(raw.nodes, raw.closed)?;
        shape.id = raw.id;
        shape.anchor = raw.anchor;
        shape.style = raw.style;
        Ok(shape)
    }
}

impl Bezier {
    /// Create a curve. Fails with fewer than two nodes.
    pub fn new(nodes: Vec<BezierNode>, closed: bool) -> GeometryResult<Self> {
        if nodes.len() < MIN_PATH_POINTS {
            return Err(GeometryError::InsufficientPoints {
                required: MIN_PATH_POINTS,
                actual: nodes.len(),
            });
        }
        let on_curve: Vec<Point> = nodes.iter().map(|n| n.point).collect();
        Ok(Self {
            id: Uuid::new_v4(),
            anchor: AnchorPoint::new(centroid(&on_curve)),
            nodes,
            closed,
            style: ShapeStyle::default(),
        })
    }

    pub fn nodes(&self) -> &[BezierNode] {
        &self.nodes
    }

    pub fn node_mut(&mut self, k: usize) -> Option<&mut BezierNode> {
        self.nodes.get_mut(k)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn on_curve_points(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| n.point).collect()
    }

    /// Insert a corner node at index `k` (clamped), placed with the same
    /// rules as [`super::Path::insert_point`].
    pub fn insert_node(&mut self, k: usize, delta: Vec2) -> usize {
        let k = k.min(self.nodes.len());
        let point = insertion_point(&self.on_curve_points(), k, delta);
        self.nodes.insert(k, BezierNode::corner(point));
        self.refresh_anchor();
        k
    }

    /// Remove the node at `k`, refusing to go below two nodes.
    pub fn remove_node(&mut self, k: usize) -> GeometryResult<BezierNode> {
        if self.nodes.len() <= MIN_PATH_POINTS {
            return Err(GeometryError::InsufficientPoints {
                required: MIN_PATH_POINTS,
                actual: self.nodes.len() - 1,
            });
        }
        let k = k.min(self.nodes.len() - 1);
        let removed = self.nodes.remove(k);
        self.refresh_anchor();
        Ok(removed)
    }

    /// The cubic segments, including the closing one when closed.
    pub fn segments(&self) -> Vec<CubicBez> {
        let mut segments: Vec<CubicBez> = self
            .nodes
            .windows(2)
            .map(|w| CubicBez::new(w[0].point, w[0].handle_out, w[1].handle_in, w[1].point))
            .collect();
        if self.closed {
            let last = self.nodes[self.nodes.len() - 1];
            let first = self.nodes[0];
            segments.push(CubicBez::new(
                last.point,
                last.handle_out,
                first.handle_in,
                first.point,
            ));
        }
        segments
    }

    /// Convert to a kurbo path.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.nodes[0].point);
        for segment in self.segments() {
            path.curve_to(segment.p1, segment.p2, segment.p3);
        }
        if self.closed {
            path.close_path();
        }
        path
    }
}

impl ShapeTrait for Bezier {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.segments()
            .iter()
            .any(|seg| seg.nearest(point, NEAREST_ACCURACY).distance_sq <= tolerance * tolerance)
    }

    fn outline(&self) -> Vec<Point> {
        let mut outline = Vec::new();
        kurbo::flatten(self.to_bez_path(), FLATTEN_TOLERANCE, |el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => outline.push(p),
            PathEl::ClosePath => {
                if let Some(&first) = outline.first() {
                    outline.push(first);
                }
            }
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
        });
        outline
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

impl PointOwner for Bezier {
    /// On-curve points followed by their handles.
    fn owned_points(&self) -> Vec<Point> {
        self.nodes
            .iter()
            .flat_map(|n| [n.point, n.handle_in, n.handle_out])
            .collect()
    }

    fn for_each_point_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        for node in &mut self.nodes {
            f(&mut node.point);
            f(&mut node.handle_in);
            f(&mut node.handle_out);
        }
    }
}

impl HasAnchor for Bezier {
    fn anchor(&self) -> &AnchorPoint {
        &self.anchor
    }

    fn anchor_mut(&mut self) -> &mut AnchorPoint {
        &mut self.anchor
    }

    fn default_anchor(&self) -> Point {
        centroid(&self.on_curve_points())
    }
}

impl Movable for Bezier {
    fn reference_point(&self) -> Point {
        self.nodes[0].point
    }

    fn translate(&mut self, offset: Vec2) {
        self.for_each_point_mut(&mut |p| *p += offset);
        self.anchor.translate(offset);
    }
}

impl Rotatable for Bezier {
    fn rotate(&mut self, rotation: &Rotation) {
        self.for_each_point_mut(&mut |p| *p = rotation.apply(*p));
        self.anchor.map(|p| rotation.apply(p));
    }
}

impl Scalable for Bezier {
    fn scale(&mut self, scaling: &Scaling) {
        self.for_each_point_mut(&mut |p| *p = scaling.apply(*p));
        self.anchor.map(|p| scaling.apply(p));
    }
}

impl Extent for Bezier {
    fn top_left(&self, unit: f64) -> Point {
        padded_extent(&self.owned_points(), self.style.point_radius / unit).0
    }

    fn bottom_right(&self, unit: f64) -> Point {
        padded_extent(&self.owned_points(), self.style.point_radius / unit).1
    }
}
