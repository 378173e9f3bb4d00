//! Side-button chord tracking and button-state rewriting.

use tracing::debug;

use crate::event::{buttons, Action, InputEvent, ToolType, POINTER_CAPACITY};

/// A physical side-button transition, reported exactly once per edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Pressed,
    Released,
}

/// Chord state owned by the sanitizer.
///
/// Held as an explicit object rather than host-scoped globals so the
/// sanitizer can be driven and inspected without a UI host. All mutation
/// happens on the input-dispatch thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChordState {
    /// Last observed side-button level, for edge detection
    pub side_button_held: bool,
    /// Whether a stroke (down..up/cancel) is in progress
    pub stroke_active: bool,
    /// Whether the side button was held when the current stroke started.
    /// This is what keeps a stroke drawing when the physical button is
    /// released mid-stroke.
    pub chord_latched: bool,
}

/// Forwarding decision for one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Forward the raw event untouched
    Passthrough,
    /// Forward this event instead, with the button state pinned
    Rewritten(InputEvent),
}

/// Result of sanitizing one event. The caller forwards exactly one event to
/// the platform dispatch path and raises the edge notification, if any, to
/// the hosted content.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub outcome: Outcome,
    pub edge: Option<ButtonEdge>,
}

impl Sanitized {
    fn passthrough(edge: Option<ButtonEdge>) -> Self {
        Self {
            outcome: Outcome::Passthrough,
            edge,
        }
    }
}

/// Rewrites stylus events so the hosted canvas sees one continuous
/// "primary button held" gesture per chorded stroke.
///
/// The canvas uses the primary-button bit to tell draw gestures from
/// pan/erase. Hardware reports the side button unreliably mid-stroke, so
/// once a stroke starts with the button held, every forwarded event in that
/// stroke carries the primary bit until the stroke ends, regardless of what
/// the hardware reports in between. Edge notifications stay faithful to the
/// physical transitions so the content can still track discrete presses.
#[derive(Debug, Default)]
pub struct StylusSanitizer {
    chord: ChordState,
}

impl StylusSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a known chord state.
    pub fn with_state(chord: ChordState) -> Self {
        Self { chord }
    }

    /// Current chord state.
    pub fn chord(&self) -> ChordState {
        self.chord
    }

    /// Sanitize one raw event.
    ///
    /// Never fails: malformed input (non-stylus tool, zero pointers) falls
    /// through to unmodified forwarding without touching the chord state.
    pub fn sanitize(&mut self, event: &InputEvent) -> Sanitized {
        if event.tool_type != ToolType::Stylus || event.pointers.is_empty() {
            return Sanitized::passthrough(None);
        }

        let side_pressed = event.side_button_pressed();

        match event.action {
            Action::Down => {
                self.chord.stroke_active = true;
                self.chord.chord_latched = side_pressed;
            }
            Action::Up | Action::Cancel => {
                self.chord.stroke_active = false;
                self.chord.chord_latched = false;
            }
            Action::Move => {}
        }

        let edge = if side_pressed != self.chord.side_button_held {
            self.chord.side_button_held = side_pressed;
            let edge = if side_pressed {
                ButtonEdge::Pressed
            } else {
                ButtonEdge::Released
            };
            debug!(?edge, stroke_active = self.chord.stroke_active, "side button edge");
            Some(edge)
        } else {
            None
        };

        if side_pressed || (self.chord.chord_latched && self.chord.stroke_active) {
            let forced = if self.chord.stroke_active {
                buttons::PRIMARY
            } else {
                0
            };
            Sanitized {
                outcome: Outcome::Rewritten(self.rewrite(event, forced)),
                edge,
            }
        } else {
            Sanitized::passthrough(edge)
        }
    }

    /// Clone the event with the button state pinned. Pointer samples pass
    /// through unchanged, truncated to [`POINTER_CAPACITY`].
    fn rewrite(&self, event: &InputEvent, forced_button_state: u32) -> InputEvent {
        let mut pointers = event.pointers.clone();
        pointers.truncate(POINTER_CAPACITY);
        InputEvent {
            pointers,
            tool_type: event.tool_type,
            action: event.action,
            down_time_ms: event.down_time_ms,
            event_time_ms: event.event_time_ms,
            button_state: forced_button_state,
            meta_state: event.meta_state,
            device_id: event.device_id,
            source: event.source,
            flags: event.flags,
            x_precision: event.x_precision,
            y_precision: event.y_precision,
        }
    }
}
