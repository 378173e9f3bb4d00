//! Raw pointer event types mirroring the platform's touch dispatch.

use serde::{Deserialize, Serialize};

/// Maximum pointers carried by one event; excess pointers are truncated on
/// rewrite, never rejected.
pub const POINTER_CAPACITY: usize = 10;

/// Button-state bitmask values, compatible with the platform constants.
pub mod buttons {
    pub const PRIMARY: u32 = 1 << 0;
    pub const SECONDARY: u32 = 1 << 1;
    pub const TERTIARY: u32 = 1 << 2;
    pub const BACK: u32 = 1 << 3;
    pub const FORWARD: u32 = 1 << 4;
    pub const STYLUS_PRIMARY: u32 = 1 << 5;
    pub const STYLUS_SECONDARY: u32 = 1 << 6;
}

/// One physical contact within an event. Opaque to the sanitizer; samples
/// are forwarded unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub id: i32,
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    pub size: f32,
    pub orientation: f32,
}

/// Masked action kind of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Down,
    Move,
    Up,
    Cancel,
}

/// Tool type of the primary pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolType {
    Finger,
    Stylus,
    Mouse,
    Eraser,
    Unknown,
}

/// One raw input event as delivered by the platform's touch dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Contacts in platform order; the first is the primary pointer
    pub pointers: Vec<PointerSample>,
    /// Tool type of the primary pointer
    pub tool_type: ToolType,
    pub action: Action,
    /// Timestamp of the gesture's initial down, in milliseconds
    pub down_time_ms: u64,
    /// Timestamp of this event, in milliseconds
    pub event_time_ms: u64,
    /// Button-state bitmask, see [`buttons`]
    pub button_state: u32,
    pub meta_state: u32,
    pub device_id: i32,
    pub source: u32,
    pub flags: u32,
    pub x_precision: f32,
    pub y_precision: f32,
}

impl InputEvent {
    /// Whether the stylus side button bit is set on this event.
    pub fn side_button_pressed(&self) -> bool {
        self.button_state & buttons::STYLUS_PRIMARY != 0
    }
}
