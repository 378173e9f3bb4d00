//! Stylus input model and event sanitizer for the inkhost shell.
//!
//! The hosted drawing canvas distinguishes draw from pan/erase gestures by
//! the primary-button bit of each pointer event. Side-button reporting on
//! stylus hardware is flaky mid-stroke, so raw events pass through a
//! sanitizer that pins the forwarded button state for the whole stroke.

pub mod event;
pub mod sanitizer;

pub use event::{Action, InputEvent, PointerSample, ToolType, POINTER_CAPACITY};
pub use sanitizer::{ButtonEdge, ChordState, Outcome, Sanitized, StylusSanitizer};
