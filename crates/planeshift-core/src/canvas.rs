//! Canvas: shape storage, view state and the pointer-driven manipulation session.

use crate::config::EngineConfig;
use crate::error::{GeometryResult, ensure_finite};
use crate::input::{InputContext, MouseButton, PointerEvent};
use crate::manipulation::{
    DragTarget, Extent, HasAnchor, ManipulationState, Movable, Rotatable, Rotation, Scalable,
    Scaling, ScaleStep, angle_delta, pointer_angle,
};
use crate::shapes::{Group, Shape, ShapeId};
use crate::snap::snap_point;
use crate::transform::ViewTransform;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use std::collections::{HashMap, HashSet};

/// Zoom factor per scroll notch, as (up, down).
const SCROLL_ZOOM: (f64, f64) = (1.1, 0.9);

/// Owns every top-level shape plus the view that maps them to the device.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// All shapes, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
    pub viewport: Viewport,
    /// Active view transform.
    pub view: ViewTransform,
    pub config: EngineConfig,
    session: ManipulationState,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::with_config(800.0, 600.0, EngineConfig::default())
    }
}

impl Canvas {
    /// Create an empty canvas with the default configuration.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_config(width, height, EngineConfig::default())
    }

    pub fn with_config(width: f64, height: f64, config: EngineConfig) -> Self {
        Self {
            shapes: HashMap::new(),
            z_order: Vec::new(),
            viewport: Viewport::with_config(width, height, &config),
            view: ViewTransform::Identity,
            config,
            session: ManipulationState::Idle,
        }
    }

    /// Add a shape on top of the others. Returns its ID.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> ShapeId {
        let shape = shape.into();
        let id = shape.id();
        log::debug!("Adding {} {}", shape.kind(), id);
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    /// Remove a shape. Groups naming it keep a dangling ID until the next
    /// refresh.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        if self.session.shape_id() == Some(id) {
            self.cancel();
        }
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    /// Remove every shape and end any session.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
        self.cancel();
    }

    /// Get a shape by ID.
    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Bring a shape to the front (topmost).
    pub fn bring_to_front(&mut self, id: ShapeId) {
        if self.shapes.contains_key(&id) {
            self.z_order.retain(|&shape_id| shape_id != id);
            self.z_order.push(id);
        }
    }

    /// Send a shape to the back (bottommost).
    pub fn send_to_back(&mut self, id: ShapeId) {
        if self.shapes.contains_key(&id) {
            self.z_order.retain(|&shape_id| shape_id != id);
            self.z_order.insert(0, id);
        }
    }

    /// Move a shape one layer forward (towards front).
    /// Returns true if the shape was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ShapeId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&shape_id| shape_id == id) {
            if pos + 1 < self.z_order.len() {
                self.z_order.swap(pos, pos + 1);
                return true;
            }
        }
        false
    }

    /// Move a shape one layer backward (towards back).
    /// Returns true if the shape was moved, false if already at back.
    pub fn send_backward(&mut self, id: ShapeId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&shape_id| shape_id == id) {
            if pos > 0 {
                self.z_order.swap(pos, pos - 1);
                return true;
            }
        }
        false
    }

    /// Group existing shapes. Unknown IDs are ignored; returns `None` when
    /// none of them exist.
    pub fn create_group(&mut self, ids: &[ShapeId]) -> Option<ShapeId> {
        let members: Vec<ShapeId> = ids
            .iter()
            .copied()
            .filter(|id| self.shapes.contains_key(id))
            .collect();
        if members.is_empty() {
            log::warn!("Refusing to create a group without existing members");
            return None;
        }
        let id = self.add_shape(Group::new(members));
        self.refresh_group(id, &mut HashSet::new(), &mut HashSet::new());
        Some(id)
    }

    /// Dissolve a group, returning the IDs it named. Members are untouched.
    pub fn ungroup(&mut self, id: ShapeId) -> Option<Vec<ShapeId>> {
        if !self.shapes.get(&id).is_some_and(Shape::is_group) {
            return None;
        }
        match self.remove_shape(id) {
            Some(Shape::Group(group)) => Some(group.members().to_vec()),
            _ => None,
        }
    }

    /// Recompute derived state: prune dangling group members, recompute
    /// group outlines (nested groups first) and every non-overridden anchor.
    pub fn refresh(&mut self) {
        let existing: HashSet<ShapeId> = self.shapes.keys().copied().collect();
        for (id, shape) in self.shapes.iter_mut() {
            if let Some(group) = shape.as_group_mut() {
                let pruned = group.prune(|m| existing.contains(&m));
                if pruned > 0 {
                    log::debug!("Pruned {} dangling members from group {}", pruned, id);
                }
            }
        }

        for shape in self.shapes.values_mut() {
            if !shape.is_group() {
                shape.refresh_anchor();
            }
        }

        let groups: Vec<ShapeId> = self
            .z_order
            .iter()
            .copied()
            .filter(|id| self.shapes.get(id).is_some_and(Shape::is_group))
            .collect();
        let mut done = HashSet::new();
        for id in groups {
            self.refresh_group(id, &mut done, &mut HashSet::new());
        }
    }

    fn refresh_group(
        &mut self,
        id: ShapeId,
        done: &mut HashSet<ShapeId>,
        visiting: &mut HashSet<ShapeId>,
    ) {
        if done.contains(&id) || !visiting.insert(id) {
            return;
        }
        let members = match self.shapes.get(&id).and_then(Shape::as_group) {
            Some(group) => group.members().to_vec(),
            None => return,
        };

        let unit = self.viewport.unit;
        let mut bounds: Option<Rect> = None;
        for member in members {
            if self.shapes.get(&member).is_some_and(Shape::is_group) {
                self.refresh_group(member, done, visiting);
            }
            if visiting.contains(&member) {
                log::warn!("Group {} contains itself through {}", id, member);
                continue;
            }
            if let Some(shape) = self.shapes.get(&member) {
                let rect = shape.extent_rect(unit);
                bounds = Some(bounds.map_or(rect, |b| b.union(rect)));
            }
        }

        visiting.remove(&id);
        done.insert(id);
        if let Some(group) = self.shapes.get_mut(&id).and_then(Shape::as_group_mut) {
            if let Some(rect) = bounds {
                group.set_outline(rect);
            }
            group.refresh_anchor();
        }
    }

    /// The shape itself followed by every shape it reaches through group
    /// membership, each listed once.
    fn fan_out(&self, id: ShapeId) -> Vec<ShapeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(shape) = self.shapes.get(&current) else {
                continue;
            };
            order.push(current);
            if let Some(group) = shape.as_group() {
                stack.extend(group.members().iter().rev());
            }
        }
        order
    }

    /// Move a shape (and, for groups, every member) by a model-space offset.
    ///
    /// With `snap`, the shape's reference point lands on a snap attractor and
    /// the same corrected offset is applied to everything it owns. Returns
    /// the offset actually applied.
    pub fn move_shape(&mut self, id: ShapeId, offset: Vec2, snap: bool) -> GeometryResult<Vec2> {
        ensure_finite("move offset x", offset.x)?;
        ensure_finite("move offset y", offset.y)?;
        let targets = self.fan_out(id);
        let Some((&root, rest)) = targets.split_first() else {
            return Ok(Vec2::ZERO);
        };
        let bands = snap.then_some(self.config.snap);
        let applied = match self.shapes.get_mut(&root) {
            Some(shape) => shape.move_by(offset, bands.as_ref())?,
            None => return Ok(Vec2::ZERO),
        };
        for member in rest {
            if let Some(shape) = self.shapes.get_mut(member) {
                shape.translate(applied);
            }
        }
        Ok(applied)
    }

    /// Rotate a shape (and group members) about the shape's anchor.
    ///
    /// Returns false when the shape is missing or has no anchor.
    pub fn rotate_shape(&mut self, id: ShapeId, degrees: f64) -> GeometryResult<bool> {
        ensure_finite("rotation angle", degrees)?;
        let Some(anchor) = self.anchor_position(id) else {
            return Ok(false);
        };
        let rotation =
            Rotation::new(anchor, degrees).with_precision(self.config.rotation_precision);
        for target in self.fan_out(id) {
            if let Some(shape) = self.shapes.get_mut(&target) {
                shape.rotate(&rotation);
            }
        }
        Ok(true)
    }

    /// Scale a shape (and group members) about the shape's anchor.
    ///
    /// Returns false when the shape is missing or has no anchor.
    pub fn scale_shape(
        &mut self,
        id: ShapeId,
        factors: Vec2,
        change_factor: f64,
    ) -> GeometryResult<bool> {
        let Some(anchor) = self.anchor_position(id) else {
            return Ok(false);
        };
        let scaling = Scaling::new(anchor, factors, change_factor);
        scaling.validate()?;
        for target in self.fan_out(id) {
            if let Some(shape) = self.shapes.get_mut(&target) {
                shape.scale(&scaling);
            }
        }
        Ok(true)
    }

    /// Drop a shape's anchor at a model-space position, overriding it.
    pub fn drag_anchor(&mut self, id: ShapeId, position: Point) -> GeometryResult<bool> {
        ensure_finite("anchor x", position.x)?;
        ensure_finite("anchor y", position.y)?;
        match self.shapes.get_mut(&id).and_then(Shape::anchor_mut) {
            Some(anchor) => {
                anchor.override_at(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Toggle a shape's anchor override. Returns false when not applicable.
    pub fn set_anchor_overridden(&mut self, id: ShapeId, overridden: bool) -> bool {
        self.shapes
            .get_mut(&id)
            .is_some_and(|shape| shape.set_anchor_overridden(overridden))
    }

    /// Insert a vertex into a path, or a corner node into a Bézier curve, at
    /// index `k` (clamped to the end). Appending places it at the last point
    /// plus the configured insert delta. Returns the index used, or `None`
    /// when the shape has no vertex list.
    pub fn insert_point(&mut self, id: ShapeId, k: usize) -> Option<usize> {
        let delta = self.config.insert_delta;
        match self.shapes.get_mut(&id)? {
            Shape::Path(path) => Some(path.insert_point(k, delta)),
            Shape::Bezier(curve) => Some(curve.insert_node(k, delta)),
            _ => None,
        }
    }

    /// Remove the vertex at index `k` of a path or Bézier curve.
    ///
    /// Fails with `InsufficientPoints` rather than going below two points.
    pub fn remove_point(&mut self, id: ShapeId, k: usize) -> GeometryResult<Option<Point>> {
        match self.shapes.get_mut(&id) {
            Some(Shape::Path(path)) => path.remove_point(k).map(Some),
            Some(Shape::Bezier(curve)) => curve.remove_node(k).map(|node| Some(node.point)),
            _ => Ok(None),
        }
    }

    fn anchor_position(&self, id: ShapeId) -> Option<Point> {
        self.shapes
            .get(&id)
            .and_then(Shape::anchor)
            .map(|anchor| anchor.position())
    }

    /// Map a model point to device space through the active view.
    pub fn to_device(&self, point: Point) -> GeometryResult<Point> {
        self.view.to_device(point, &self.viewport, &self.config)
    }

    /// Map a device point back to model space through the active view.
    pub fn to_model(&self, point: Point) -> GeometryResult<Point> {
        self.view.to_model(point, &self.viewport, &self.config)
    }

    /// A shape's outline mapped to device space, ready for a renderer.
    pub fn device_outline(&self, id: ShapeId) -> GeometryResult<Option<Vec<Point>>> {
        let Some(shape) = self.shapes.get(&id) else {
            return Ok(None);
        };
        self.view
            .to_device_all(&shape.outline(), &self.viewport, &self.config)
            .map(Some)
    }

    /// Topmost shape under a model-space point.
    pub fn shape_at(&self, point: Point) -> Option<ShapeId> {
        let tolerance = self.viewport.device_length_to_model(self.config.hit_tolerance_px);
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|id| self.shapes.get(id).is_some_and(|s| s.hit_test(point, tolerance)))
    }

    /// Topmost shape whose anchor handle is under a model-space point.
    pub fn anchor_at(&self, point: Point) -> Option<ShapeId> {
        let tolerance = self
            .viewport
            .device_length_to_model(self.config.anchor_hit_tolerance_px);
        self.z_order.iter().rev().copied().find(|id| {
            self.shapes
                .get(id)
                .and_then(Shape::anchor)
                .is_some_and(|anchor| (anchor.position() - point).hypot() <= tolerance)
        })
    }

    /// Current manipulation session.
    pub fn session(&self) -> &ManipulationState {
        &self.session
    }

    /// Abandon the current session without touching shapes.
    pub fn cancel(&mut self) {
        if !self.session.is_idle() {
            log::debug!("Manipulation cancelled");
        }
        self.session = ManipulationState::Idle;
    }

    /// Feed a pointer event to the manipulation session.
    ///
    /// Returns true when shapes or the viewport changed. On error the event
    /// is dropped and prior state is kept.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        input: &InputContext,
    ) -> GeometryResult<bool> {
        match *event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move { position } => {
                let changed = self.pointer_move(position, input)?;
                if changed {
                    self.refresh();
                }
                Ok(changed)
            }
            PointerEvent::Up { button, .. } => {
                self.pointer_up(button);
                Ok(false)
            }
            PointerEvent::Scroll { position, delta } => {
                if delta.y == 0.0 {
                    return Ok(false);
                }
                let factor = if delta.y > 0.0 {
                    SCROLL_ZOOM.0
                } else {
                    SCROLL_ZOOM.1
                };
                self.viewport.zoom_at(position, factor);
                Ok(true)
            }
        }
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton) -> GeometryResult<bool> {
        if !self.session.is_idle() {
            return Ok(false);
        }
        let model = self.to_model(position)?;
        self.session = match button {
            MouseButton::Primary => {
                if let Some(id) = self.anchor_at(model) {
                    let start_reference = self.anchor_position(id).unwrap_or(model);
                    ManipulationState::Dragging {
                        target: DragTarget::Anchor(id),
                        start_pointer: position,
                        start_reference,
                    }
                } else if let Some(id) = self.shape_at(model) {
                    let start_reference = self
                        .shapes
                        .get(&id)
                        .map_or(model, |s| s.reference_point());
                    ManipulationState::Dragging {
                        target: DragTarget::Shape(id),
                        start_pointer: position,
                        start_reference,
                    }
                } else {
                    ManipulationState::Idle
                }
            }
            MouseButton::Secondary => match self.shape_at(model) {
                Some(id) if self.anchor_position(id).is_some() => ManipulationState::Rotating {
                    shape_id: id,
                    previous_pointer: model,
                },
                _ => ManipulationState::Idle,
            },
            MouseButton::Middle => ManipulationState::Idle,
        };
        if !self.session.is_idle() {
            log::debug!("Manipulation started: {:?}", self.session);
        }
        Ok(false)
    }

    fn pointer_move(&mut self, position: Point, input: &InputContext) -> GeometryResult<bool> {
        match self.session.clone() {
            ManipulationState::Idle => Ok(false),
            ManipulationState::Dragging {
                target,
                start_pointer,
                start_reference,
            } => {
                // Accumulated through the active view, so the grabbed point
                // tracks the pointer under affine and projective views too.
                let total = self.to_model(position)? - self.to_model(start_pointer)?;
                let desired = start_reference + total;
                match target {
                    DragTarget::Shape(id) => {
                        let Some(current) = self.shapes.get(&id).map(|s| s.reference_point())
                        else {
                            return Ok(false);
                        };
                        self.move_shape(id, desired - current, input.snap_enabled())?;
                        Ok(true)
                    }
                    DragTarget::Anchor(id) => {
                        let position = if input.snap_enabled() {
                            snap_point(desired, &self.config.snap).point
                        } else {
                            desired
                        };
                        self.drag_anchor(id, position)
                    }
                }
            }
            ManipulationState::Rotating {
                shape_id,
                previous_pointer,
            } => {
                let Some(anchor) = self.anchor_position(shape_id) else {
                    return Ok(false);
                };
                let current = self.to_model(position)?;
                let changed = if input.scale_requested() {
                    let step = ScaleStep::between(
                        previous_pointer - anchor,
                        current - anchor,
                        input.uniform_scale(),
                        &self.config,
                    );
                    log::trace!(
                        "Scale step ({}, {}) change {}",
                        step.factors.x,
                        step.factors.y,
                        step.change_factor
                    );
                    self.scale_shape(shape_id, step.factors, step.change_factor)?
                } else {
                    let delta = angle_delta(
                        pointer_angle(anchor, previous_pointer),
                        pointer_angle(anchor, current),
                    );
                    log::trace!("Rotate step {} degrees", delta);
                    self.rotate_shape(shape_id, delta)?
                };
                self.session = ManipulationState::Rotating {
                    shape_id,
                    previous_pointer: current,
                };
                Ok(changed)
            }
        }
    }

    fn pointer_up(&mut self, button: MouseButton) {
        let captured = match self.session {
            ManipulationState::Idle => return,
            ManipulationState::Dragging { .. } => MouseButton::Primary,
            ManipulationState::Rotating { .. } => MouseButton::Secondary,
        };
        if button == captured {
            log::debug!("Manipulation finished: {:?}", self.session);
            self.session = ManipulationState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Bezier, BezierNode, Circle, FreePoint, Path, Segment, ShapeTrait};
    use crate::transform::AffineTransform;

    fn canvas() -> Canvas {
        Canvas::new(800.0, 600.0)
    }

    #[test]
    fn test_add_and_remove_shape() {
        let mut canvas = canvas();
        let id = canvas.add_shape(Circle::new(Point::ZERO, 1.0));
        assert_eq!(canvas.len(), 1);
        assert!(canvas.get_shape(id).is_some());
        assert!(canvas.remove_shape(id).is_some());
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_z_order() {
        let mut canvas = canvas();
        let a = canvas.add_shape(FreePoint::new(Point::ZERO));
        let b = canvas.add_shape(FreePoint::new(Point::ZERO));
        let c = canvas.add_shape(FreePoint::new(Point::ZERO));

        canvas.send_to_back(c);
        let order: Vec<ShapeId> = canvas.shapes_ordered().map(Shape::id).collect();
        assert_eq!(order, vec![c, a, b]);

        assert!(canvas.bring_forward(c));
        assert!(!canvas.bring_forward(b));
        canvas.bring_to_front(a);
        let order: Vec<ShapeId> = canvas.shapes_ordered().map(Shape::id).collect();
        assert_eq!(order, vec![c, b, a]);
        assert!(canvas.send_backward(a));
        assert!(!canvas.send_backward(c));
    }

    #[test]
    fn test_group_bounding_box() {
        let mut canvas = canvas();
        let circle = canvas.add_shape(Circle::new(Point::ZERO, 2.0));
        let path = canvas.add_shape(
            Path::new(vec![Point::new(5.0, 5.0), Point::new(-5.0, -5.0)], false).unwrap(),
        );
        let group = canvas.create_group(&[circle, path]).unwrap();
        let shape = canvas.get_shape(group).unwrap();
        let tl = shape.top_left(canvas.viewport.unit);
        let br = shape.bottom_right(canvas.viewport.unit);
        assert!(tl.x <= -5.0 && tl.y >= 5.0);
        assert!(br.x >= 5.0 && br.y <= -5.0);
    }

    #[test]
    fn test_group_move_fans_out() {
        let mut canvas = canvas();
        let a = canvas.add_shape(FreePoint::new(Point::new(1.0, 1.0)));
        let b = canvas.add_shape(Segment::new(Point::ZERO, Point::new(2.0, 0.0)));
        let group = canvas.create_group(&[a, b]).unwrap();

        canvas.move_shape(group, Vec2::new(1.0, -2.0), false).unwrap();
        let Some(Shape::Point(p)) = canvas.get_shape(a) else {
            panic!("expected a point");
        };
        assert_eq!(p.position, Point::new(2.0, -1.0));
        let Some(Shape::Segment(s)) = canvas.get_shape(b) else {
            panic!("expected a segment");
        };
        assert_eq!(s.start, Point::new(1.0, -2.0));
        assert_eq!(s.end, Point::new(3.0, -2.0));
    }

    #[test]
    fn test_nested_group_cycle_is_safe() {
        let mut canvas = canvas();
        let a = canvas.add_shape(FreePoint::new(Point::ZERO));
        let inner = canvas.create_group(&[a]).unwrap();
        let outer = canvas.create_group(&[inner]).unwrap();
        // Close the loop by hand.
        canvas
            .get_shape_mut(inner)
            .and_then(Shape::as_group_mut)
            .unwrap()
            .add_member(outer);

        canvas.refresh();
        canvas.move_shape(outer, Vec2::new(1.0, 0.0), false).unwrap();
        let Some(Shape::Point(p)) = canvas.get_shape(a) else {
            panic!("expected a point");
        };
        // Moved exactly once.
        assert_eq!(p.position, Point::new(1.0, 0.0));
    }

    #[test]
    fn test_refresh_prunes_dangling_members() {
        let mut canvas = canvas();
        let a = canvas.add_shape(FreePoint::new(Point::ZERO));
        let b = canvas.add_shape(FreePoint::new(Point::new(3.0, 3.0)));
        let group = canvas.create_group(&[a, b]).unwrap();
        canvas.remove_shape(b);
        canvas.refresh();
        let members = canvas.get_shape(group).and_then(Shape::as_group).unwrap().members();
        assert_eq!(members, &[a]);
    }

    #[test]
    fn test_ungroup_keeps_members() {
        let mut canvas = canvas();
        let a = canvas.add_shape(FreePoint::new(Point::ZERO));
        let group = canvas.create_group(&[a]).unwrap();
        assert_eq!(canvas.ungroup(group), Some(vec![a]));
        assert!(canvas.get_shape(a).is_some());
        assert!(canvas.get_shape(group).is_none());
        assert_eq!(canvas.ungroup(a), None);
    }

    #[test]
    fn test_create_group_requires_members() {
        let mut canvas = canvas();
        assert!(canvas.create_group(&[uuid::Uuid::new_v4()]).is_none());
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_rejects_non_finite_operations() {
        let mut canvas = canvas();
        let id = canvas.add_shape(Circle::new(Point::new(1.0, 1.0), 1.0));
        assert!(canvas.move_shape(id, Vec2::new(f64::INFINITY, 0.0), false).is_err());
        assert!(canvas.rotate_shape(id, f64::NAN).is_err());
        assert!(canvas.scale_shape(id, Vec2::new(f64::NAN, 1.0), 1.0).is_err());
        let Some(Shape::Circle(c)) = canvas.get_shape(id) else {
            panic!("expected a circle");
        };
        assert_eq!(c.center, Point::new(1.0, 1.0));
        assert!((c.radius() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotate_free_point_is_refused() {
        let mut canvas = canvas();
        let id = canvas.add_shape(FreePoint::new(Point::new(1.0, 0.0)));
        assert!(!canvas.rotate_shape(id, 90.0).unwrap());
    }

    #[test]
    fn test_shape_at_prefers_topmost() {
        let mut canvas = canvas();
        let below = canvas.add_shape(Segment::new(Point::new(-1.0, 0.0), Point::new(1.0, 0.0)));
        let above = canvas.add_shape(Segment::new(Point::new(0.0, -1.0), Point::new(0.0, 1.0)));
        assert_eq!(canvas.shape_at(Point::ZERO), Some(above));
        canvas.bring_to_front(below);
        assert_eq!(canvas.shape_at(Point::ZERO), Some(below));
        assert_eq!(canvas.shape_at(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_device_outline_through_view() {
        let mut canvas = canvas();
        canvas.viewport.unit = 10.0;
        let id = canvas.add_shape(Segment::new(Point::ZERO, Point::new(1.0, 0.0)));
        let outline = canvas.device_outline(id).unwrap().unwrap();
        assert_eq!(outline, vec![Point::new(400.0, 300.0), Point::new(410.0, 300.0)]);

        canvas.view = ViewTransform::Affine(AffineTransform::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
        let outline = canvas.device_outline(id).unwrap().unwrap();
        assert!((outline[1].x - 420.0).abs() < 1e-9);
        assert!(canvas.device_outline(uuid::Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_drag_shape_with_pointer() {
        let mut canvas = canvas();
        canvas.viewport.unit = 10.0;
        let id = canvas.add_shape(Segment::new(Point::ZERO, Point::new(4.0, 0.0)));
        let input = InputContext::new();

        // Model (0.5, 0) is device (405, 300), clear of the anchor at (2, 0).
        canvas
            .handle_pointer(
                &PointerEvent::Down {
                    position: Point::new(405.0, 300.0),
                    button: MouseButton::Primary,
                },
                &input,
            )
            .unwrap();
        assert!(matches!(
            canvas.session(),
            ManipulationState::Dragging {
                target: DragTarget::Shape(_),
                ..
            }
        ));

        canvas
            .handle_pointer(&PointerEvent::Move { position: Point::new(425.0, 290.0) }, &input)
            .unwrap();
        let Some(Shape::Segment(s)) = canvas.get_shape(id) else {
            panic!("expected a segment");
        };
        assert!((s.start.x - 2.0).abs() < 1e-12);
        assert!((s.start.y - 1.0).abs() < 1e-12);

        canvas
            .handle_pointer(
                &PointerEvent::Up {
                    position: Point::new(425.0, 290.0),
                    button: MouseButton::Primary,
                },
                &input,
            )
            .unwrap();
        assert!(canvas.session().is_idle());
        assert_eq!(canvas.get_shape(id).map(|s| s.id()), Some(id));
    }

    #[test]
    fn test_insert_point_uses_configured_delta() {
        let config = EngineConfig {
            insert_delta: Vec2::new(2.0, -1.0),
            ..EngineConfig::default()
        };
        let mut canvas = Canvas::with_config(800.0, 600.0, config);
        let id = canvas.add_shape(
            Path::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)], false).unwrap(),
        );

        assert_eq!(canvas.insert_point(id, usize::MAX), Some(2));
        assert_eq!(canvas.insert_point(id, 1), Some(1));
        let Some(Shape::Path(path)) = canvas.get_shape(id) else {
            panic!("expected a path");
        };
        assert_eq!(
            path.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(4.0, -1.0)
            ]
        );

        let point = canvas.add_shape(FreePoint::new(Point::ZERO));
        assert_eq!(canvas.insert_point(point, 0), None);
    }

    #[test]
    fn test_remove_point_keeps_minimum() {
        let mut canvas = canvas();
        let curve = canvas.add_shape(
            Bezier::new(
                vec![
                    BezierNode::corner(Point::new(0.0, 0.0)),
                    BezierNode::corner(Point::new(4.0, 0.0)),
                ],
                false,
            )
            .unwrap(),
        );
        assert_eq!(canvas.insert_point(curve, 1), Some(1));
        assert_eq!(canvas.remove_point(curve, 1).unwrap(), Some(Point::new(2.0, 0.0)));
        let err = canvas.remove_point(curve, 0).unwrap_err();
        assert!(matches!(err, crate::GeometryError::InsufficientPoints { .. }));

        let circle = canvas.add_shape(Circle::new(Point::ZERO, 1.0));
        assert_eq!(canvas.remove_point(circle, 0).unwrap(), None);
    }

    #[test]
    fn test_scroll_zooms_viewport() {
        let mut canvas = canvas();
        let before = canvas.viewport.unit;
        let changed = canvas
            .handle_pointer(
                &PointerEvent::Scroll {
                    position: Point::new(400.0, 300.0),
                    delta: Vec2::new(0.0, 1.0),
                },
                &InputContext::new(),
            )
            .unwrap();
        assert!(changed);
        assert!((canvas.viewport.unit - before * 1.1).abs() < 1e-9);
    }
}
