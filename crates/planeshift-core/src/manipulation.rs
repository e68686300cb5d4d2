//! Move/rotate/scale contract shared by every shape.
//!
//! Shapes compose the capability traits below instead of inheriting from a
//! common base. Containers fan each operation out to what they own, so a
//! move is always a rigid translation and a rotate or scale always uses the
//! same anchor for every sub-point.

use crate::anchor::AnchorPoint;
use crate::config::{EngineConfig, SnapBands};
use crate::error::{GeometryResult, ensure_finite};
use crate::shapes::ShapeId;
use crate::snap::snap_point;
use kurbo::{Point, Rect, Vec2};

/// Decimal places kept after a rotation unless configured otherwise.
pub const DEFAULT_ROTATION_DECIMALS: u32 = 6;

/// Largest rotation precision a configuration may ask for.
pub const MAX_ROTATION_DECIMALS: u32 = 15;

/// Access to the structural points a shape owns (vertices, control handles).
pub trait PointOwner {
    /// Every owned point, in model space.
    fn owned_points(&self) -> Vec<Point>;

    /// Visit every owned point mutably.
    fn for_each_point_mut(&mut self, f: &mut dyn FnMut(&mut Point));
}

/// Rigid translation.
pub trait Movable {
    /// The point that snapping is applied to when the shape is dragged.
    fn reference_point(&self) -> Point;

    /// Translate the shape and everything it owns by a model-space offset.
    fn translate(&mut self, offset: Vec2);

    /// Move by a model-space offset, optionally snapping the reference
    /// point. Returns the offset actually applied.
    fn move_by(&mut self, offset: Vec2, snap: Option<&SnapBands>) -> GeometryResult<Vec2> {
        ensure_finite("move offset x", offset.x)?;
        ensure_finite("move offset y", offset.y)?;
        let reference = self.reference_point();
        let mut target = reference + offset;
        if let Some(bands) = snap {
            target = snap_point(target, bands).point;
        }
        let applied = target - reference;
        self.translate(applied);
        Ok(applied)
    }
}

/// Rotation about an anchor.
pub trait Rotatable {
    fn rotate(&mut self, rotation: &Rotation);
}

/// Per-axis scaling about an anchor.
pub trait Scalable {
    fn scale(&mut self, scaling: &Scaling);
}

/// Shapes with a pivot.
pub trait HasAnchor {
    fn anchor(&self) -> &AnchorPoint;

    fn anchor_mut(&mut self) -> &mut AnchorPoint;

    /// Shape-specific pivot used while the anchor is not overridden.
    fn default_anchor(&self) -> Point;

    /// Recompute the anchor from the default rule unless overridden.
    fn refresh_anchor(&mut self) {
        let default = self.default_anchor();
        self.anchor_mut().refresh(default);
    }

    /// Toggle the override; clearing it recomputes the default pivot.
    fn set_anchor_overridden(&mut self, overridden: bool) {
        let default = self.default_anchor();
        self.anchor_mut().set_overridden(overridden, default);
    }

    /// The user dropped the anchor at `position`.
    fn drag_anchor_to(&mut self, position: Point) {
        self.anchor_mut().override_at(position);
    }
}

/// Bounding extent in model space (Y-up: top-left is min x, max y).
///
/// `unit` converts device-pixel decorations such as stroke width into model
/// units.
pub trait Extent {
    fn top_left(&self, unit: f64) -> Point;

    fn bottom_right(&self, unit: f64) -> Point;

    fn extent_rect(&self, unit: f64) -> Rect {
        Rect::from_points(self.top_left(unit), self.bottom_right(unit))
    }
}

/// Rotate `point` around `anchor` by `degrees` (counter-clockwise in model
/// space), rounding the result to `decimals` places.
///
/// A coordinate whose scaled value overflows is kept unrounded.
pub fn rotate_point(point: Point, anchor: Point, degrees: f64, decimals: u32) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - anchor;
    let x = anchor.x + d.x * cos - d.y * sin;
    let y = anchor.y + d.x * sin + d.y * cos;
    let scale = 10f64.powi(decimals.min(i32::MAX as u32) as i32);
    Point::new(round_to(x, scale), round_to(y, scale))
}

fn round_to(value: f64, scale: f64) -> f64 {
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Angle of `pointer` as seen from `anchor`, in degrees.
pub fn pointer_angle(anchor: Point, pointer: Point) -> f64 {
    let d = pointer - anchor;
    d.y.atan2(d.x).to_degrees()
}

/// Smallest signed difference `current - previous`, in (-180, 180].
pub fn angle_delta(previous: f64, current: f64) -> f64 {
    let mut delta = (current - previous) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

/// A rotation about an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub anchor: Point,
    pub degrees: f64,
    pub decimals: u32,
}

impl Rotation {
    pub fn new(anchor: Point, degrees: f64) -> Self {
        Self {
            anchor,
            degrees,
            decimals: DEFAULT_ROTATION_DECIMALS,
        }
    }

    pub fn with_precision(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn apply(&self, point: Point) -> Point {
        rotate_point(point, self.anchor, self.degrees, self.decimals)
    }
}

/// A per-axis scale about an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaling {
    pub anchor: Point,
    /// Per-axis factors applied to owned points.
    pub factors: Vec2,
    /// Scalar factor for attributes that cannot take a vector (radius).
    pub change_factor: f64,
}

impl Scaling {
    pub fn new(anchor: Point, factors: Vec2, change_factor: f64) -> Self {
        Self {
            anchor,
            factors,
            change_factor,
        }
    }

    pub fn identity(anchor: Point) -> Self {
        Self::new(anchor, Vec2::new(1.0, 1.0), 1.0)
    }

    pub fn apply(&self, point: Point) -> Point {
        let d = point - self.anchor;
        Point::new(
            self.anchor.x + d.x * self.factors.x,
            self.anchor.y + d.y * self.factors.y,
        )
    }

    /// Scale a scalar attribute by `|change_factor|`.
    ///
    /// Returns `None` when the result would not be a finite positive length.
    pub fn scale_length(&self, length: f64) -> Option<f64> {
        let scaled = length * self.change_factor.abs();
        (scaled.is_finite() && scaled > 0.0).then_some(scaled)
    }

    /// Check that every factor is finite.
    pub fn validate(&self) -> GeometryResult<()> {
        ensure_finite("scale factor x", self.factors.x)?;
        ensure_finite("scale factor y", self.factors.y)?;
        ensure_finite("change factor", self.change_factor)?;
        Ok(())
    }
}

/// Scale factors derived from two consecutive pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleStep {
    pub factors: Vec2,
    pub change_factor: f64,
    /// The unstable-ratio fallback was used.
    pub guarded: bool,
}

impl ScaleStep {
    /// Compare the anchor-to-pointer vector at the previous event with the
    /// current one.
    ///
    /// Guards, in order: a previous component below the threshold forces the
    /// fallback factor on both axes; a non-finite factor becomes 1; the
    /// uniform modifier replaces both axes with the mean magnitude, keeping
    /// each axis's sign.
    pub fn between(previous: Vec2, current: Vec2, uniform: bool, config: &EngineConfig) -> Self {
        let threshold = config.scale_guard_threshold;
        let guarded = previous.x.abs() < threshold || previous.y.abs() < threshold;
        let (mut sx, mut sy) = if guarded {
            log::debug!(
                "Unstable scale ratio from ({}, {}), using fallback {}",
                previous.x,
                previous.y,
                config.scale_fallback
            );
            (config.scale_fallback, config.scale_fallback)
        } else {
            (current.x / previous.x, current.y / previous.y)
        };

        if !sx.is_finite() {
            sx = 1.0;
        }
        if !sy.is_finite() {
            sy = 1.0;
        }

        let change_factor = (sx + sy) / 2.0;

        if uniform {
            let magnitude = (sx.abs() + sy.abs()) / 2.0;
            sx = magnitude.copysign(sx);
            sy = magnitude.copysign(sy);
        }

        Self {
            factors: Vec2::new(sx, sy),
            change_factor,
            guarded,
        }
    }

    /// Turn the step into a scaling about `anchor`.
    pub fn about(&self, anchor: Point) -> Scaling {
        Scaling::new(anchor, self.factors, self.change_factor)
    }
}

/// What a primary drag is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// The whole shape.
    Shape(ShapeId),
    /// The shape's anchor handle.
    Anchor(ShapeId),
}

impl DragTarget {
    pub fn shape_id(&self) -> ShapeId {
        match self {
            DragTarget::Shape(id) | DragTarget::Anchor(id) => *id,
        }
    }
}

/// Pointer-driven manipulation session.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ManipulationState {
    #[default]
    Idle,
    /// Primary button held on a shape or an anchor.
    Dragging {
        target: DragTarget,
        /// Pointer at drag start, device pixels.
        start_pointer: Point,
        /// Reference point (or anchor) at drag start, model space.
        start_reference: Point,
    },
    /// Secondary button held on a shape with an anchor.
    Rotating {
        shape_id: ShapeId,
        /// Pointer at the previous event, model space.
        previous_pointer: Point,
    },
}

impl ManipulationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ManipulationState::Idle)
    }

    /// Shape the session is acting on, if any.
    pub fn shape_id(&self) -> Option<ShapeId> {
        match self {
            ManipulationState::Idle => None,
            ManipulationState::Dragging { target, .. } => Some(target.shape_id()),
            ManipulationState::Rotating { shape_id, .. } => Some(*shape_id),
        }
    }
}
