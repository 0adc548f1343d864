use crate::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,   // Left mouse, touch
    Tertiary,  // Middle mouse
    Secondary, // Right mouse
    Other(u32),
}

impl MouseButton {
    /// Maps the 1-based button index native toolkits report.
    pub fn from_native(button: u32) -> Self {
        match button {
            1 => MouseButton::Primary,
            2 => MouseButton::Tertiary,
            3 => MouseButton::Secondary,
            n => MouseButton::Other(n),
        }
    }
}

/// A press delivered to a node, in logical units relative to the origin of
/// the native object that received it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    pub position: Position,
    pub button: MouseButton,
}

/// Capability for nodes that react to clicks.
pub trait Clickable {
    fn on_clicked(&self, event: &MouseEvent);
}
