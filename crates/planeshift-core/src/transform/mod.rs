//! Coordinate transformation engine.
//!
//! Maps model (unit) space to device (pixel) space and back. Every mapping
//! first goes through the viewport's identity mapping (unit scaling, Y flip,
//! centering); the affine and projective engines then act on the resulting
//! device point around the viewport center.

pub mod affine;
mod model;
pub mod projective;

pub use model::{AffineTransform, ChangeNotifier, Listener, ProjectiveTransform, SubscriptionId};

use crate::config::EngineConfig;
use crate::error::GeometryResult;
use crate::viewport::Viewport;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What an inverse (or projective forward) map does when the transform is
/// degenerate at the requested point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DegeneracyPolicy {
    /// Report [`crate::GeometryError::DegenerateTransform`].
    #[default]
    Error,
    /// Fall back to identity (inverse) or the origin sentinel (projective forward).
    Fallback,
}

/// Forward projective variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectiveVariant {
    /// Recenter on the viewport.
    #[default]
    Centered,
    /// Raw device coordinates plus a fixed 5 px offset.
    LegacyOffset,
}

/// The view transform currently applied to a viewport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ViewTransform {
    #[default]
    Identity,
    Affine(AffineTransform),
    Projective(ProjectiveTransform),
}

impl ViewTransform {
    /// Check whether the transform reduces to the identity mapping.
    pub fn is_identity(&self) -> bool {
        match self {
            ViewTransform::Identity => true,
            ViewTransform::Affine(t) => t.is_identity(),
            ViewTransform::Projective(t) => t.is_identity(),
        }
    }

    /// Reset the active model to identity, keeping its kind.
    pub fn reset(&mut self) {
        match self {
            ViewTransform::Identity => {}
            ViewTransform::Affine(t) => t.reset(),
            ViewTransform::Projective(t) => t.reset(),
        }
    }

    /// Convert a model point to device coordinates.
    pub fn to_device(
        &self,
        point: Point,
        viewport: &Viewport,
        config: &EngineConfig,
    ) -> GeometryResult<Point> {
        let device = viewport.model_to_device(point);
        if self.is_identity() {
            return Ok(device);
        }
        match self {
            ViewTransform::Identity => Ok(device),
            ViewTransform::Affine(t) => Ok(affine::to_device(device, t, viewport)),
            ViewTransform::Projective(t) => projective::to_device(
                device,
                t,
                viewport,
                config.projective_variant,
                config.degeneracy,
            ),
        }
    }

    /// Convert a device point to model coordinates.
    pub fn to_model(
        &self,
        point: Point,
        viewport: &Viewport,
        config: &EngineConfig,
    ) -> GeometryResult<Point> {
        if self.is_identity() {
            return Ok(viewport.device_to_model(point));
        }
        let device = match self {
            ViewTransform::Identity => point,
            ViewTransform::Affine(t) => affine::to_model(point, t, viewport, config.degeneracy)?,
            ViewTransform::Projective(t) => projective::to_model(
                point,
                t,
                viewport,
                config.projective_variant,
                config.degeneracy,
            )?,
        };
        Ok(viewport.device_to_model(device))
    }

    /// Map a list of model points to device space, e.g. a shape outline.
    pub fn to_device_all(
        &self,
        points: &[Point],
        viewport: &Viewport,
        config: &EngineConfig,
    ) -> GeometryResult<Vec<Point>> {
        points
            .iter()
            .map(|&p| self.to_device(p, viewport, config))
            .collect()
    }
}
