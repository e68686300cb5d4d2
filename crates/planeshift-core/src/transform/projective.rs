//! Projective engine.
//!
//! Two forward variants exist. [`ProjectiveVariant::Centered`] recenters on
//! the viewport the same way the affine engine does and is the one new code
//! should use. [`ProjectiveVariant::LegacyOffset`] works in raw device
//! coordinates and shifts the result by a fixed [`LEGACY_DEVICE_OFFSET`]; it
//! is kept only for behavioural parity with older curve definitions.
//!
//! The forward map divides by `|w|`, so the sign of the denominator is lost.
//! The inverse assumes `w > 0`; points behind the plane at infinity do not
//! round-trip.

use super::{DegeneracyPolicy, ProjectiveTransform, ProjectiveVariant};
use crate::error::{GeometryError, GeometryResult};
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};

/// Device offset added by the legacy variant on both axes.
pub const LEGACY_DEVICE_OFFSET: f64 = 5.0;

/// Numerator coefficients, pre-multiplied by the weight row.
#[derive(Debug, Clone, Copy)]
struct Numerators {
    xx: f64,
    xy: f64,
    yx: f64,
    yy: f64,
    ox: f64,
    oy: f64,
}

impl Numerators {
    fn new(t: &ProjectiveTransform, unit: f64) -> Self {
        Self {
            xx: t.xx() * t.wx(),
            xy: t.xy() * t.wx(),
            yx: t.yx() * t.wy(),
            yy: t.yy() * t.wy(),
            ox: t.ox() * unit * t.wo(),
            oy: t.oy() * unit * t.wo(),
        }
    }
}

/// Frame origin for a variant, in device pixels.
fn frame_origin(variant: ProjectiveVariant, viewport: &Viewport) -> (Vec2, Vec2) {
    match variant {
        // (subtracted from input, added to output)
        ProjectiveVariant::Centered => {
            let center = viewport.center().to_vec2();
            (center, center)
        }
        ProjectiveVariant::LegacyOffset => (
            Vec2::ZERO,
            Vec2::new(LEGACY_DEVICE_OFFSET, LEGACY_DEVICE_OFFSET),
        ),
    }
}

/// Map an identity-mapped device point through the projective transform.
pub fn to_device(
    point: Point,
    transform: &ProjectiveTransform,
    viewport: &Viewport,
    variant: ProjectiveVariant,
    policy: DegeneracyPolicy,
) -> GeometryResult<Point> {
    let (input_origin, output_origin) = frame_origin(variant, viewport);
    let local = point - input_origin;
    let (x, y) = (local.x, local.y);

    let w = transform.denominator(x, y);
    if w == 0.0 || !w.is_finite() {
        return match policy {
            DegeneracyPolicy::Error => Err(GeometryError::degenerate(format!(
                "projective denominator is {} at ({}, {})",
                w, point.x, point.y
            ))),
            DegeneracyPolicy::Fallback => {
                log::warn!(
                    "Projective denominator vanished at ({}, {}), returning origin",
                    point.x,
                    point.y
                );
                Ok(Point::ORIGIN)
            }
        };
    }

    let n = Numerators::new(transform, viewport.unit);
    let w = w.abs();
    let u = (n.xx * x + n.yx * y + n.ox) / w;
    let v = (n.xy * x + n.yy * y + n.oy) / w;
    Ok(Point::new(u, v) + output_origin)
}

/// Invert [`to_device`] by solving the 2×2 linear system with Cramer's rule.
pub fn to_model(
    point: Point,
    transform: &ProjectiveTransform,
    viewport: &Viewport,
    variant: ProjectiveVariant,
    policy: DegeneracyPolicy,
) -> GeometryResult<Point> {
    let (input_origin, output_origin) = frame_origin(variant, viewport);
    let local = point - output_origin;
    let (u, v) = (local.x, local.y);
    let n = Numerators::new(transform, viewport.unit);

    let a1 = n.xx - u * transform.wx();
    let b1 = n.yx - u * transform.wy();
    let c1 = u * transform.wo() - n.ox;
    let a2 = n.xy - v * transform.wx();
    let b2 = n.yy - v * transform.wy();
    let c2 = v * transform.wo() - n.oy;

    let det = a1 * b2 - a2 * b1;
    if det == 0.0 || !det.is_finite() {
        return match policy {
            DegeneracyPolicy::Error => Err(GeometryError::degenerate(format!(
                "projective system determinant is {} at ({}, {})",
                det, point.x, point.y
            ))),
            DegeneracyPolicy::Fallback => {
                log::warn!(
                    "Projective inverse singular at ({}, {}), using identity",
                    point.x,
                    point.y
                );
                Ok(point)
            }
        };
    }

    let x = (c1 * b2 - c2 * b1) / det;
    let y = (a1 * c2 - a2 * c1) / det;
    Ok(Point::new(x, y) + input_origin)
}
