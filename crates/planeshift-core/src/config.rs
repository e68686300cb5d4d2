//! Engine configuration.
//!
//! Every tunable constant of the manipulation protocol lives here so the host
//! application can override it from a JSON file. Missing fields fall back to
//! their defaults.

use crate::error::{GeometryError, GeometryResult};
use crate::manipulation::MAX_ROTATION_DECIMALS;
use crate::transform::{DegeneracyPolicy, ProjectiveVariant};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of device pixels per model unit.
pub const DEFAULT_UNIT: f64 = 40.0;

/// Attractor bands used by the snapping utility.
///
/// Values are fractional parts in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapBands {
    /// Fractions at or below this snap down to the integer.
    pub lower: f64,
    /// Fractions at or above this snap up to the next integer.
    pub upper: f64,
    /// Lower edge of the half-integer band.
    pub half_low: f64,
    /// Upper edge of the half-integer band.
    pub half_high: f64,
}

impl Default for SnapBands {
    fn default() -> Self {
        Self {
            lower: 0.1,
            upper: 0.9,
            half_low: 0.45,
            half_high: 0.55,
        }
    }
}

/// Tunables for the transform engine and manipulation protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub snap: SnapBands,
    /// Decimal places kept after each incremental rotation.
    #[serde(default = "default_rotation_precision")]
    pub rotation_precision: u32,
    /// Smallest previous-vector component (model units) a scale ratio is
    /// computed from.
    #[serde(default = "default_scale_guard_threshold")]
    pub scale_guard_threshold: f64,
    /// Factor used on both axes when the ratio would be unstable.
    #[serde(default = "default_scale_fallback")]
    pub scale_fallback: f64,
    /// Offset from the last point when a path point is appended.
    #[serde(default = "default_insert_delta")]
    pub insert_delta: Vec2,
    /// Shape hit tolerance in device pixels.
    #[serde(default = "default_hit_tolerance_px")]
    pub hit_tolerance_px: f64,
    /// Anchor handle hit tolerance in device pixels.
    #[serde(default = "default_anchor_hit_tolerance_px")]
    pub anchor_hit_tolerance_px: f64,
    #[serde(default)]
    pub degeneracy: DegeneracyPolicy,
    #[serde(default)]
    pub projective_variant: ProjectiveVariant,
    /// Initial unit size in pixels.
    #[serde(default = "default_unit")]
    pub unit: f64,
    #[serde(default = "default_min_unit")]
    pub min_unit: f64,
    #[serde(default = "default_max_unit")]
    pub max_unit: f64,
}

fn default_rotation_precision() -> u32 {
    6
}

fn default_scale_guard_threshold() -> f64 {
    0.01
}

fn default_scale_fallback() -> f64 {
    1.1
}

fn default_insert_delta() -> Vec2 {
    Vec2::new(1.0, 1.0)
}

fn default_hit_tolerance_px() -> f64 {
    6.0
}

fn default_anchor_hit_tolerance_px() -> f64 {
    8.0
}

fn default_unit() -> f64 {
    DEFAULT_UNIT
}

fn default_min_unit() -> f64 {
    4.0
}

fn default_max_unit() -> f64 {
    1000.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap: SnapBands::default(),
            rotation_precision: default_rotation_precision(),
            scale_guard_threshold: default_scale_guard_threshold(),
            scale_fallback: default_scale_fallback(),
            insert_delta: default_insert_delta(),
            hit_tolerance_px: default_hit_tolerance_px(),
            anchor_hit_tolerance_px: default_anchor_hit_tolerance_px(),
            degeneracy: DegeneracyPolicy::default(),
            projective_variant: ProjectiveVariant::default(),
            unit: default_unit(),
            min_unit: default_min_unit(),
            max_unit: default_max_unit(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> GeometryResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GeometryError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> GeometryResult<()> {
        let b = &self.snap;
        let finite_bands = [b.lower, b.half_low, b.half_high, b.upper]
            .iter()
            .all(|v| v.is_finite());
        if !finite_bands
            || b.lower < 0.0
            || b.upper > 1.0
            || !(b.lower < b.half_low && b.half_low <= b.half_high && b.half_high < b.upper)
        {
            return Err(GeometryError::Config(format!(
                "snap bands must satisfy 0 <= lower < half_low <= half_high < upper <= 1, got {:?}",
                b
            )));
        }
        if !(self.min_unit.is_finite() && self.min_unit > 0.0) {
            return Err(GeometryError::Config(format!(
                "min_unit must be positive, got {}",
                self.min_unit
            )));
        }
        if !(self.max_unit.is_finite() && self.max_unit >= self.min_unit) {
            return Err(GeometryError::Config(format!(
                "max_unit must be at least min_unit ({}), got {}",
                self.min_unit, self.max_unit
            )));
        }
        if !(self.unit.is_finite() && self.unit > 0.0) {
            return Err(GeometryError::Config(format!("unit must be positive, got {}", self.unit)));
        }
        if !(self.scale_guard_threshold.is_finite() && self.scale_guard_threshold > 0.0) {
            return Err(GeometryError::Config(format!(
                "scale_guard_threshold must be positive, got {}",
                self.scale_guard_threshold
            )));
        }
        if !self.scale_fallback.is_finite() {
            return Err(GeometryError::Config(format!(
                "scale_fallback must be finite, got {}",
                self.scale_fallback
            )));
        }
        if self.rotation_precision > MAX_ROTATION_DECIMALS {
            return Err(GeometryError::Config(format!(
                "rotation_precision must be at most {}, got {}",
                MAX_ROTATION_DECIMALS, self.rotation_precision
            )));
        }
        if !(self.insert_delta.x.is_finite() && self.insert_delta.y.is_finite()) {
            return Err(GeometryError::Config("insert_delta must be finite".to_string()));
        }
        for (name, tolerance) in [
            ("hit_tolerance_px", self.hit_tolerance_px),
            ("anchor_hit_tolerance_px", self.anchor_hit_tolerance_px),
        ] {
            if !(tolerance.is_finite() && tolerance >= 0.0) {
                return Err(GeometryError::Config(format!(
                    "{} must be non-negative, got {}",
                    name, tolerance
                )));
            }
        }
        Ok(())
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> GeometryResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            GeometryError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.rotation_precision, 6);
        assert!((config.scale_fallback - 1.1).abs() < f64::EPSILON);
        assert_eq!(config.degeneracy, DegeneracyPolicy::Error);
        assert_eq!(config.projective_variant, ProjectiveVariant::Centered);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "scale_fallback": 1.25 }"#).unwrap();
        assert!((config.scale_fallback - 1.25).abs() < f64::EPSILON);
        assert_eq!(config.snap, SnapBands::default());
        assert!((config.unit - DEFAULT_UNIT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = EngineConfig::default();
        config.degeneracy = DegeneracyPolicy::Fallback;
        let json = config.to_json().unwrap();
        let back = EngineConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "rotation_precision": 3, "degeneracy": "Fallback" }}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.rotation_precision, 3);
        assert_eq!(config.degeneracy, DegeneracyPolicy::Fallback);
    }

    #[test]
    fn test_rejects_inverted_unit_limits() {
        let result = EngineConfig::from_json(r#"{ "min_unit": 100.0, "max_unit": 10.0 }"#);
        assert!(matches!(result, Err(GeometryError::Config(_))));
        assert!(EngineConfig::from_json(r#"{ "min_unit": 0.0 }"#).is_err());
    }

    #[test]
    fn test_rejects_bad_bands_and_guards() {
        let mut config = EngineConfig::default();
        config.snap.lower = 0.5;
        assert!(config.validate().is_err());
        config.snap = SnapBands {
            upper: 0.5,
            ..SnapBands::default()
        };
        assert!(config.validate().is_err());
        config.snap = SnapBands {
            half_low: 0.6,
            ..SnapBands::default()
        };
        assert!(config.validate().is_err());
        assert!(EngineConfig::from_json(r#"{ "scale_guard_threshold": 0.0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "scale_guard_threshold": -1.0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "hit_tolerance_px": -2.0 }"#).is_err());
    }

    #[test]
    fn test_rotation_precision_is_capped() {
        assert!(EngineConfig::from_json(r#"{ "rotation_precision": 15 }"#).is_ok());
        assert!(EngineConfig::from_json(r#"{ "rotation_precision": 400 }"#).is_err());
    }

    #[test]
    fn test_validate_catches_direct_edits() {
        let mut config = EngineConfig::default();
        assert!(config.validate().is_ok());
        config.scale_fallback = f64::NAN;
        assert!(config.validate().is_err());
        config = EngineConfig::default();
        config.max_unit = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "min_unit": 100.0, "max_unit": 10.0 }}"#).unwrap();
        let result = EngineConfig::load(file.path());
        assert!(matches!(result, Err(GeometryError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(GeometryError::Config(_))));
    }
}
