use std::fmt;

/// Keyboard keys the runtime reacts to.
///
/// Everything else maps to `Key::Unknown` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,
    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Lifecycle stage of one touch contact.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Platform-agnostic input events, positions in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },

    /// Pointer left the window surface.
    PointerLeft,

    Touch {
        id: u64,
        phase: TouchPhase,
        x: f32,
        y: f32,
    },

    Key {
        key: Key,
        state: KeyState,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    /// Window focus change.
    Focused(bool),
}

/// What an input event means for the background surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SurfaceInput {
    /// A pointer or primary-touch position in logical pixels.
    Sample { x: f32, y: f32 },
    /// The pointer left or the primary touch lifted.
    Leave,
    /// A key went down (repeats excluded).
    KeyPressed(Key),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
