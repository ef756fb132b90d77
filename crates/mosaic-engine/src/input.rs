//! Input translation
//!
//! Turns pointer, wheel and resize notifications into pan deltas.

/// Raw input delivered to a mosaic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerLeave,
    Wheel { delta_x: f32, delta_y: f32 },
    /// Observed CSS size of the canvas
    Resize { width: f32, height: f32 },
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerDown { .. } => EventKind::PointerDown,
            Self::PointerMove { .. } => EventKind::PointerMove,
            Self::PointerUp => EventKind::PointerUp,
            Self::PointerLeave => EventKind::PointerLeave,
            Self::Wheel { .. } => EventKind::Wheel,
            Self::Resize { .. } => EventKind::Resize,
        }
    }
}

/// Event type a listener is registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerLeave,
    Wheel,
    Resize,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        Self::PointerDown,
        Self::PointerMove,
        Self::PointerUp,
        Self::PointerLeave,
        Self::Wheel,
        Self::Resize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::PointerLeave => "pointerleave",
            Self::Wheel => "wheel",
            Self::Resize => "resize",
        }
    }
}

/// Outcome of dispatching one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// A listener consumed the event
    pub handled: bool,
    /// The host should suppress its default action (page scroll)
    pub prevent_default: bool,
}

impl EventResponse {
    pub const IGNORED: EventResponse = EventResponse {
        handled: false,
        prevent_default: false,
    };
}

/// Pointer drag tracking
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    dragging: bool,
    last_x: f32,
    last_y: f32,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn start(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.last_x = x;
        self.last_y = y;
    }

    /// Delta since the previous pointer position, or `None` when not dragging
    pub fn update(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        if !self.dragging {
            return None;
        }
        let delta = (x - self.last_x, y - self.last_y);
        self.last_x = x;
        self.last_y = y;
        Some(delta)
    }

    pub fn end(&mut self) {
        self.dragging = false;
    }
}

/// Wheel scrolls vertically: content follows the finger, so the delta flips
pub fn wheel_delta(_delta_x: f32, delta_y: f32) -> (f32, f32) {
    (0.0, -delta_y)
}
