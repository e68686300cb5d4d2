//! Affine engine: a linear map acting around the viewport center.

use super::{AffineTransform, DegeneracyPolicy};
use crate::error::{GeometryError, GeometryResult};
use crate::viewport::Viewport;
use kurbo::{Affine, Point};

/// Full device-space matrix: recenter, apply the linear map and translation,
/// then re-add the viewport center.
fn centered(transform: &AffineTransform, viewport: &Viewport) -> Affine {
    let center = viewport.center().to_vec2();
    Affine::translate(center) * transform.to_kurbo(viewport.unit) * Affine::translate(-center)
}

/// Map an identity-mapped device point through the affine transform.
pub fn to_device(point: Point, transform: &AffineTransform, viewport: &Viewport) -> Point {
    centered(transform, viewport) * point
}

/// Invert [`to_device`].
///
/// A singular linear part is reported as [`GeometryError::DegenerateTransform`]
/// under [`DegeneracyPolicy::Error`]; under [`DegeneracyPolicy::Fallback`] the
/// point is returned unchanged.
pub fn to_model(
    point: Point,
    transform: &AffineTransform,
    viewport: &Viewport,
    policy: DegeneracyPolicy,
) -> GeometryResult<Point> {
    let det = transform.determinant();
    if det == 0.0 || !det.is_finite() {
        return match policy {
            DegeneracyPolicy::Error => Err(GeometryError::degenerate(format!(
                "affine determinant is {}",
                det
            ))),
            DegeneracyPolicy::Fallback => {
                log::warn!("Singular affine transform (det = {}), using identity", det);
                Ok(point)
            }
        };
    }
    Ok(centered(transform, viewport).inverse() * point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let mut viewport = Viewport::new(200.0, 100.0);
        viewport.unit = 10.0;
        viewport
    }

    #[test]
    fn test_identity_is_noop() {
        let p = Point::new(37.0, 12.5);
        let out = to_device(p, &AffineTransform::identity(), &viewport());
        assert!((out.x - p.x).abs() < 1e-12);
        assert!((out.y - p.y).abs() < 1e-12);
    }

    #[test]
    fn test_acts_around_viewport_center() {
        // Uniform 2x scale keeps the center fixed.
        let transform = AffineTransform::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let center = to_device(Point::new(100.0, 50.0), &transform, &viewport());
        assert!((center.x - 100.0).abs() < 1e-12);
        assert!((center.y - 50.0).abs() < 1e-12);

        let out = to_device(Point::new(110.0, 40.0), &transform, &viewport());
        assert!((out.x - 120.0).abs() < 1e-12);
        assert!((out.y - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_forward_formula() {
        // x = 10, y = -10 after recentering.
        let transform = AffineTransform::new(1.0, 0.5, 0.25, 2.0, 1.0, -2.0);
        let out = to_device(Point::new(110.0, 40.0), &transform, &viewport());
        // Xx*x + Yx*y + Ox*unit = 10 - 2.5 + 10
        assert!((out.x - (100.0 + 17.5)).abs() < 1e-12);
        // Xy*x + Yy*y + Oy*unit = 5 - 20 - 20
        assert!((out.y - (50.0 - 35.0)).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let transform = AffineTransform::new(1.2, -0.3, 0.4, 0.9, 2.0, -1.5);
        let p = Point::new(13.0, 77.0);
        let device = to_device(p, &transform, &viewport());
        let back = to_model(device, &transform, &viewport(), DegeneracyPolicy::Error).unwrap();
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_singular_inverse_errors() {
        let transform = AffineTransform::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
        let result = to_model(
            Point::new(1.0, 1.0),
            &transform,
            &viewport(),
            DegeneracyPolicy::Error,
        );
        assert!(result.unwrap_err().is_degenerate());
    }

    #[test]
    fn test_singular_inverse_fallback() {
        let transform = AffineTransform::new(0.0, 0.0, 0.0, 0.0, 1.0, 1.0);
        let p = Point::new(5.0, 6.0);
        let back = to_model(p, &transform, &viewport(), DegeneracyPolicy::Fallback).unwrap();
        assert_eq!(back, p);
    }
}
