//! Transform parameter models with change notification.

use crate::error::{GeometryResult, ensure_finite};
use kurbo::Affine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Identifier returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked with the model's new revision after every change.
pub type Listener = Rc<dyn Fn(u64)>;

/// Explicit observer list owned by a transform model.
///
/// Cloning a model yields a fresh notifier: observers belong to the
/// instance they subscribed to.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    revision: u64,
}

impl ChangeNotifier {
    /// Register an observer.
    pub fn subscribe(&mut self, listener: impl Fn(u64) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Number of changes published so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn notify(&mut self) {
        self.revision += 1;
        for (_, listener) in &self.listeners {
            listener(self.revision);
        }
    }
}

impl Clone for ChangeNotifier {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

/// Generates a getter and a notifying, finite-checked setter per field.
macro_rules! notifying_fields {
    ($($field:ident, $setter:ident, $label:literal;)*) => {
        $(
            pub fn $field(&self) -> f64 {
                self.$field
            }

            pub fn $setter(&mut self, value: f64) -> GeometryResult<()> {
                self.$field = ensure_finite($label, value)?;
                self.notifier.notify();
                Ok(())
            }
        )*
    };
}

/// Affine view transform: a 2×2 linear part plus a translation in model units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffineTransform {
    xx: f64,
    xy: f64,
    yx: f64,
    yy: f64,
    ox: f64,
    oy: f64,
    #[serde(skip)]
    notifier: ChangeNotifier,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    /// Create a transform from its six coefficients.
    pub fn new(xx: f64, xy: f64, yx: f64, yy: f64, ox: f64, oy: f64) -> Self {
        Self {
            xx,
            xy,
            yx,
            yy,
            ox,
            oy,
            notifier: ChangeNotifier::default(),
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    notifying_fields! {
        xx, set_xx, "affine Xx";
        xy, set_xy, "affine Xy";
        yx, set_yx, "affine Yx";
        yy, set_yy, "affine Yy";
        ox, set_ox, "affine Ox";
        oy, set_oy, "affine Oy";
    }

    /// Replace the linear part in one notification.
    pub fn set_linear(&mut self, xx: f64, xy: f64, yx: f64, yy: f64) -> GeometryResult<()> {
        let values = [
            ensure_finite("affine Xx", xx)?,
            ensure_finite("affine Xy", xy)?,
            ensure_finite("affine Yx", yx)?,
            ensure_finite("affine Yy", yy)?,
        ];
        [self.xx, self.xy, self.yx, self.yy] = values;
        self.notifier.notify();
        Ok(())
    }

    /// Replace the translation in one notification.
    pub fn set_translation(&mut self, ox: f64, oy: f64) -> GeometryResult<()> {
        self.ox = ensure_finite("affine Ox", ox)?;
        self.oy = ensure_finite("affine Oy", oy)?;
        self.notifier.notify();
        Ok(())
    }

    /// Reset to the identity transform.
    pub fn reset(&mut self) {
        [self.xx, self.xy, self.yx, self.yy, self.ox, self.oy] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        self.notifier.notify();
    }

    /// Check whether this is the identity transform.
    pub fn is_identity(&self) -> bool {
        self.xx == 1.0
            && self.yy == 1.0
            && self.xy == 0.0
            && self.yx == 0.0
            && self.ox == 0.0
            && self.oy == 0.0
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.xx * self.yy - self.xy * self.yx
    }

    /// The transform as a kurbo affine, translation scaled by `unit`.
    pub fn to_kurbo(&self, unit: f64) -> Affine {
        Affine::new([
            self.xx,
            self.xy,
            self.yx,
            self.yy,
            self.ox * unit,
            self.oy * unit,
        ])
    }

    /// Compare coefficients within `epsilon`.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.xx - other.xx).abs() <= epsilon
            && (self.xy - other.xy).abs() <= epsilon
            && (self.yx - other.yx).abs() <= epsilon
            && (self.yy - other.yy).abs() <= epsilon
            && (self.ox - other.ox).abs() <= epsilon
            && (self.oy - other.oy).abs() <= epsilon
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }
}

impl PartialEq for AffineTransform {
    fn eq(&self, other: &Self) -> bool {
        self.xx == other.xx
            && self.xy == other.xy
            && self.yx == other.yx
            && self.yy == other.yy
            && self.ox == other.ox
            && self.oy == other.oy
    }
}

/// Projective view transform: a homogeneous 3×3 matrix whose third row is
/// `(wx, wy, wo)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectiveTransform {
    xx: f64,
    xy: f64,
    yx: f64,
    yy: f64,
    ox: f64,
    oy: f64,
    wx: f64,
    wy: f64,
    wo: f64,
    #[serde(skip)]
    notifier: ChangeNotifier,
}

impl Default for ProjectiveTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ProjectiveTransform {
    /// Create a transform from its nine coefficients.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        xx: f64,
        xy: f64,
        yx: f64,
        yy: f64,
        ox: f64,
        oy: f64,
        wx: f64,
        wy: f64,
        wo: f64,
    ) -> Self {
        Self {
            xx,
            xy,
            yx,
            yy,
            ox,
            oy,
            wx,
            wy,
            wo,
            notifier: ChangeNotifier::default(),
        }
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0)
    }

    notifying_fields! {
        xx, set_xx, "projective Xx";
        xy, set_xy, "projective Xy";
        yx, set_yx, "projective Yx";
        yy, set_yy, "projective Yy";
        ox, set_ox, "projective Ox";
        oy, set_oy, "projective Oy";
        wx, set_wx, "projective wX";
        wy, set_wy, "projective wY";
        wo, set_wo, "projective wO";
    }

    /// Replace the homogeneous weight row in one notification.
    pub fn set_weights(&mut self, wx: f64, wy: f64, wo: f64) -> GeometryResult<()> {
        let values = [
            ensure_finite("projective wX", wx)?,
            ensure_finite("projective wY", wy)?,
            ensure_finite("projective wO", wo)?,
        ];
        [self.wx, self.wy, self.wo] = values;
        self.notifier.notify();
        Ok(())
    }

    /// Reset to the identity matrix.
    pub fn reset(&mut self) {
        [
            self.xx, self.xy, self.yx, self.yy, self.ox, self.oy, self.wx, self.wy, self.wo,
        ] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        self.notifier.notify();
    }

    /// Check whether this is the identity matrix.
    pub fn is_identity(&self) -> bool {
        self.xx == 1.0
            && self.yy == 1.0
            && self.wo == 1.0
            && self.xy == 0.0
            && self.yx == 0.0
            && self.ox == 0.0
            && self.oy == 0.0
            && self.wx == 0.0
            && self.wy == 0.0
    }

    /// Perspective denominator for a (frame-local) point.
    pub fn denominator(&self, x: f64, y: f64) -> f64 {
        x * self.wx + y * self.wy + self.wo
    }

    /// Compare coefficients within `epsilon`.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.xx - other.xx).abs() <= epsilon
            && (self.xy - other.xy).abs() <= epsilon
            && (self.yx - other.yx).abs() <= epsilon
            && (self.yy - other.yy).abs() <= epsilon
            && (self.ox - other.ox).abs() <= epsilon
            && (self.oy - other.oy).abs() <= epsilon
            && (self.wx - other.wx).abs() <= epsilon
            && (self.wy - other.wy).abs() <= epsilon
            && (self.wo - other.wo).abs() <= epsilon
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }
}

impl PartialEq for ProjectiveTransform {
    fn eq(&self, other: &Self) -> bool {
        self.xx == other.xx
            && self.xy == other.xy
            && self.yx == other.yx
            && self.yy == other.yy
            && self.ox == other.ox
            && self.oy == other.oy
            && self.wx == other.wx
            && self.wy == other.wy
            && self.wo == other.wo
    }
}
