//! Input context for pointer and modifier state.
//!
//! Handlers never look up modifier keys or the pointer globally; the host
//! keeps an [`InputContext`] current and passes it to every call.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Drags shapes and anchors.
    Primary,
    /// Rotates (or, with the scale modifier, scales) around the anchor.
    Secondary,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Pointer event in device coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

impl PointerEvent {
    /// Device position carried by the event.
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Scroll { position, .. } => *position,
        }
    }
}

/// Pointer and modifier state passed explicitly to manipulation handlers.
#[derive(Debug, Clone, Default)]
pub struct InputContext {
    /// Current pointer position in device coordinates.
    pub pointer_position: Point,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
}

impl InputContext {
    /// Create a new input context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with the given modifiers held.
    pub fn with_modifiers(modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            ..Self::default()
        }
    }

    /// Track the pointer position carried by an event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        self.pointer_position = event.position();
    }

    /// Update modifier keys state.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Ctrl: commit moves through the snapping utility.
    pub fn snap_enabled(&self) -> bool {
        self.modifiers.ctrl
    }

    /// Shift: a secondary drag scales instead of rotating.
    pub fn scale_requested(&self) -> bool {
        self.modifiers.shift
    }

    /// Alt: scale both axes by the same magnitude.
    pub fn uniform_scale(&self) -> bool {
        self.modifiers.alt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_pointer_position() {
        let mut input = InputContext::new();
        input.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Primary,
        });
        assert_eq!(input.pointer_position, Point::new(100.0, 100.0));

        input.handle_pointer_event(&PointerEvent::Move {
            position: Point::new(150.0, 120.0),
        });
        assert_eq!(input.pointer_position, Point::new(150.0, 120.0));
    }

    #[test]
    fn test_modifier_roles() {
        let input = InputContext::with_modifiers(Modifiers {
            ctrl: true,
            alt: true,
            ..Modifiers::default()
        });
        assert!(input.snap_enabled());
        assert!(!input.scale_requested());
        assert!(input.uniform_scale());
    }
}
