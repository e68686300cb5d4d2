//! Viewport module for the identity model/device mapping.

use crate::config::{DEFAULT_UNIT, EngineConfig};
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Viewport manages the identity mapping between model space and device space.
///
/// Model space is Y-up with the origin at the viewport center (shifted by
/// `pan`); device space is Y-down with the origin at the top-left corner.
/// One model unit spans `unit` device pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Rendering surface size in device pixels.
    pub size: Size,
    /// Device pixels per model unit.
    pub unit: f64,
    /// Pan offset in device pixels.
    pub pan: Vec2,
    /// Minimum allowed unit size
    pub min_unit: f64,
    /// Maximum allowed unit size
    pub max_unit: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: Size::new(800.0, 600.0),
            unit: DEFAULT_UNIT,
            pan: Vec2::ZERO,
            min_unit: 4.0,
            max_unit: 1000.0,
        }
    }
}

impl Viewport {
    /// Create a viewport of the given size with default unit.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            ..Self::default()
        }
    }

    /// Create a viewport using the unit limits from a config.
    pub fn with_config(width: f64, height: f64, config: &EngineConfig) -> Self {
        Self {
            size: Size::new(width, height),
            unit: clamp_unit(config.unit, config.min_unit, config.max_unit),
            pan: Vec2::ZERO,
            min_unit: config.min_unit,
            max_unit: config.max_unit,
        }
    }

    /// Center of the rendering surface in device pixels.
    pub fn center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// Resize the rendering surface.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = Size::new(width, height);
    }

    /// Get the affine transform from model space to device space.
    pub fn transform(&self) -> Affine {
        let center = self.center();
        Affine::new([
            self.unit,
            0.0,
            0.0,
            -self.unit,
            center.x + self.pan.x,
            center.y + self.pan.y,
        ])
    }

    /// Get the inverse transform, from device space to model space.
    pub fn inverse_transform(&self) -> Affine {
        let center = self.center();
        Affine::scale_non_uniform(1.0 / self.unit, -1.0 / self.unit)
            * Affine::translate(-(center.to_vec2() + self.pan))
    }

    /// Convert a model point to device coordinates.
    pub fn model_to_device(&self, model_point: Point) -> Point {
        self.transform() * model_point
    }

    /// Convert a device point to model coordinates.
    pub fn device_to_model(&self, device_point: Point) -> Point {
        self.inverse_transform() * device_point
    }

    /// Convert a length in device pixels into model units.
    pub fn device_length_to_model(&self, length: f64) -> f64 {
        length / self.unit
    }

    /// Pan the view by a delta in device pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Zoom the view, keeping the given device point fixed.
    pub fn zoom_at(&mut self, device_point: Point, factor: f64) {
        let new_unit = clamp_unit(self.unit * factor, self.min_unit, self.max_unit);
        if (new_unit - self.unit).abs() < f64::EPSILON {
            return;
        }

        let model_point = self.device_to_model(device_point);
        self.unit = new_unit;

        // Adjust pan so model_point stays under device_point
        let moved = self.model_to_device(model_point);
        self.pan += device_point - moved;
    }

    /// Reset pan and unit size.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.unit = clamp_unit(DEFAULT_UNIT, self.min_unit, self.max_unit);
    }
}

/// Clamp a unit size into `[min, max]` without panicking on inverted or NaN
/// limits; the upper limit wins when they conflict.
fn clamp_unit(unit: f64, min: f64, max: f64) -> f64 {
    unit.max(min).min(max)
}
