//! Group shape for manipulating several shapes as one.

use super::{ShapeId, ShapeStyle, ShapeTrait, centroid};
use crate::anchor::AnchorPoint;
use crate::manipulation::{
    Extent, HasAnchor, Movable, PointOwner, Rotatable, Rotation, Scalable, Scaling,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A weak collection of shapes.
///
/// The group only names its members; they stay top-level shapes owned by the
/// canvas, which forwards every move/rotate/scale issued to the group. The
/// four corners track the members' bounding outline and are recomputed on
/// refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub(crate) id: ShapeId,
    members: Vec<ShapeId>,
    /// Outline corners: top-left, top-right, bottom-right, bottom-left.
    corners: [Point; 4],
    anchor: AnchorPoint,
    #[serde(default)]
    style: ShapeStyle,
}

impl Group {
    /// Create a group naming `members`. The outline is empty until the
    /// first refresh.
    pub fn new(members: Vec<ShapeId>) -> Self {
        let mut unique = Vec::with_capacity(members.len());
        for id in members {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self {
            id: Uuid::new_v4(),
            members: unique,
            corners: [Point::ZERO; 4],
            anchor: AnchorPoint::new(Point::ZERO),
            style: ShapeStyle::default(),
        }
    }

    pub fn members(&self) -> &[ShapeId] {
        &self.members
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.members.contains(&id)
    }

    /// Add a member. Returns false if it was already present or is the
    /// group itself.
    pub fn add_member(&mut self, id: ShapeId) -> bool {
        if id == self.id || self.members.contains(&id) {
            return false;
        }
        self.members.push(id);
        true
    }

    pub fn remove_member(&mut self, id: ShapeId) -> bool {
        let before = self.members.len();
        self.members.retain(|&m| m != id);
        self.members.len() != before
    }

    /// Drop member ids for which `exists` is false. Returns how many were
    /// removed.
    pub fn prune(&mut self, exists: impl Fn(ShapeId) -> bool) -> usize {
        let before = self.members.len();
        self.members.retain(|&m| exists(m));
        before - self.members.len()
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    /// Set the outline from a model-space bounding rect.
    pub fn set_outline(&mut self, rect: Rect) {
        self.corners = [
            Point::new(rect.x0, rect.y1),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x0, rect.y0),
        ];
    }

    /// Bounding rect of the current outline.
    pub fn outline_rect(&self) -> Rect {
        self.corners
            .iter()
            .fold(Rect::from_points(self.corners[0], self.corners[0]), |r, &p| {
                r.union_pt(p)
            })
    }
}

impl ShapeTrait for Group {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.outline_rect().inflate(tolerance, tolerance).contains(point)
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

impl PointOwner for Group {
    fn owned_points(&self) -> Vec<Point> {
        self.corners.to_vec()
    }

    fn for_each_point_mut(&mut self, f: &mut dyn FnMut(&mut Point)) {
        self.corners.iter_mut().for_each(f);
    }
}

impl HasAnchor for Group {
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

// The group's own transforms only touch its corners and anchor; members are
// reached through the canvas.
impl Movable for Group {
    fn reference_point(&self) -> Point {
        self.corners[0]
    }

    fn translate(&mut self, offset: Vec2) {
        self.for_each_point_mut(&mut |p| *p += offset);
        self.anchor.translate(offset);
    }
}

impl Rotatable for Group {
    fn rotate(&mut self, rotation: &Rotation) {
        self.for_each_point_mut(&mut |p| *p = rotation.apply(*p));
        self.anchor.map(|p| rotation.apply(p));
    }
}

impl Scalable for Group {
    fn scale(&mut self, scaling: &Scaling) {
        self.for_each_point_mut(&mut |p| *p = scaling.apply(*p));
        self.anchor.map(|p| scaling.apply(p));
    }
}

impl Extent for Group {
    fn top_left(&self, _unit: f64) -> Point {
        let rect = self.outline_rect();
        Point::new(rect.x0, rect.y1)
    }

    fn bottom_right(&self, _unit: f64) -> Point {
        let rect = self.outline_rect();
        Point::new(rect.x1, rect.y0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_membership() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut group = Group::new(vec![a, b, a]);
        assert_eq!(group.members(), &[a, b]);
        assert!(!group.add_member(a));
        assert!(!group.add_member(group.id()));
        assert!(group.remove_member(a));
        assert!(!group.contains(a));
    }

    #[test]
    fn test_prune_dangling() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut group = Group::new(vec![a, b]);
        assert_eq!(group.prune(|id| id == b), 1);
        assert_eq!(group.members(), &[b]);
    }

    #[test]
    fn test_outline_and_anchor() {
        let mut group = Group::new(Vec::new());
        group.set_outline(Rect::new(-5.0, -5.0, 5.0, 5.0));
        assert_eq!(group.corners()[0], Point::new(-5.0, 5.0));
        assert_eq!(group.top_left(40.0), Point::new(-5.0, 5.0));
        assert_eq!(group.bottom_right(40.0), Point::new(5.0, -5.0));
        group.refresh_anchor();
        assert_eq!(group.anchor().position(), Point::ZERO);
        assert!(group.hit_test(Point::new(1.0, 1.0), 0.1));
    }
}
