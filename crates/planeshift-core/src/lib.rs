//! Planeshift Core Library
//!
//! Coordinate transformation engine and anchor-relative manipulation of
//! shapes on a 2D plane. Rendering and the outer UI are left to the host.

pub mod anchor;
pub mod canvas;
pub mod config;
pub mod error;
pub mod input;
pub mod manipulation;
pub mod shapes;
pub mod snap;
pub mod transform;
pub mod viewport;

pub use anchor::AnchorPoint;
pub use canvas::Canvas;
pub use config::{EngineConfig, SnapBands};
pub use error::{GeometryError, GeometryResult};
pub use input::{InputContext, Modifiers, MouseButton, PointerEvent};
pub use manipulation::{
    DragTarget, Extent, HasAnchor, ManipulationState, Movable, PointOwner, Rotatable, Rotation,
    Scalable, ScaleStep, Scaling, rotate_point,
};
pub use shapes::{
    Bezier, BezierNode, Circle, FreePoint, Group, Path, Rectangle, Segment, Shape, ShapeId,
    ShapeStyle, ShapeTrait,
};
pub use snap::{SnapResult, snap_point, snap_value, snap_value_with};
pub use transform::{
    AffineTransform, ChangeNotifier, DegeneracyPolicy, ProjectiveTransform, ProjectiveVariant,
    ViewTransform,
};
pub use viewport::Viewport;
