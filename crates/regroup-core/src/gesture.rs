#![forbid(unsafe_code)]

//! Gesture recognition: turns raw pointer/keyboard input into drag signals.
//!
//! [`GestureRecognizer`] is a small stateful processor. Hosts feed it
//! [`InputEvent`]s from their UI runtime and forward the resulting
//! [`DragSignal`]s to a [`DragHandler`](crate::drag::DragHandler)
//! implementation.
//!
//! # State Machine
//!
//! - **Pointer**: down on a handle → move past the activation distance emits
//!   `Start` followed by `Move`; further moves emit `Move`; up emits `End`.
//!   A press released before crossing the threshold emits nothing (a click).
//! - **Keyboard**: Space/Enter on a focused handle emits `Start`; Up/Down
//!   emit `Step`; Space/Enter again emits `End`.
//!
//! # Invariants
//!
//! 1. Every drag sequence is well-formed: `Start` → zero or more `Move`/`Step`
//!    → exactly one of `End` or `Cancel`.
//! 2. At most one drag sequence is open; a pointer-down or keyboard activation
//!    during a drag never emits a second `Start`.
//! 3. Escape or focus loss during a drag emits `Cancel`.
//! 4. After `reset()` the recognizer is idle and emits nothing on its own.

use crate::drag::{DragKind, DraggableId, Direction};
use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Keys the recognizer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Enter,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Tab,
    Other,
}

/// Raw input as reported by the host UI runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer pressed; `handle` is the drag handle under the pointer, if any.
    PointerDown {
        pos: Point,
        handle: Option<DraggableId>,
    },
    PointerMove {
        pos: Point,
    },
    PointerUp {
        pos: Point,
    },
    /// Key pressed while `focused` drag handle (if any) has focus.
    Key {
        key: Key,
        focused: Option<DraggableId>,
    },
    FocusLost,
}

/// Drag lifecycle signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSignal {
    Start { origin: DraggableId, pointer: Point },
    Move { pointer: Point },
    Step(Direction),
    End { origin: DraggableId, kind: DragKind },
    Cancel,
}

impl DragSignal {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End { .. } | Self::Cancel)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for gesture recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureConfig {
    /// Minimum manhattan distance before a pressed handle starts dragging
    /// (default: 3).
    pub activation_distance: u32,
    /// Whether Space/Enter on a focused handle starts a keyboard drag
    /// (default: true).
    pub keyboard: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            activation_distance: 3,
            keyboard: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Recognizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tracking {
    Idle,
    /// Pointer is down on a handle but has not crossed the threshold.
    Pressed { origin: DraggableId, start: Point },
    PointerDrag { origin: DraggableId },
    KeyboardDrag { origin: DraggableId },
}

/// Stateful pointer/keyboard drag recognizer.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    config: GestureConfig,
    tracking: Tracking,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            tracking: Tracking::Idle,
        }
    }

    /// Process one raw event, returning the signals it produced (0 to 2).
    pub fn process(&mut self, event: &InputEvent) -> Vec<DragSignal> {
        let mut out = Vec::with_capacity(2);
        match event {
            InputEvent::PointerDown { pos, handle } => self.on_pointer_down(*pos, handle.as_ref()),
            InputEvent::PointerMove { pos } => self.on_pointer_move(*pos, &mut out),
            InputEvent::PointerUp { .. } => self.on_pointer_up(&mut out),
            InputEvent::Key { key, focused } => self.on_key(*key, focused.as_ref(), &mut out),
            InputEvent::FocusLost => {
                if self.is_dragging() {
                    out.push(DragSignal::Cancel);
                }
                self.tracking = Tracking::Idle;
            }
        }
        out
    }

    /// Whether a drag sequence is open.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(
            self.tracking,
            Tracking::PointerDrag { .. } | Tracking::KeyboardDrag { .. }
        )
    }

    /// Return to idle without emitting anything.
    pub fn reset(&mut self) {
        self.tracking = Tracking::Idle;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureRecognizer {
    fn on_pointer_down(&mut self, pos: Point, handle: Option<&DraggableId>) {
        if self.is_dragging() {
            return;
        }
        self.tracking = match handle {
            Some(origin) => Tracking::Pressed {
                origin: origin.clone(),
                start: pos,
            },
            None => Tracking::Idle,
        };
    }

    fn on_pointer_move(&mut self, pos: Point, out: &mut Vec<DragSignal>) {
        match &self.tracking {
            Tracking::Pressed { origin, start } => {
                if start.manhattan_distance(pos) >= self.config.activation_distance {
                    out.push(DragSignal::Start {
                        origin: origin.clone(),
                        pointer: *start,
                    });
                    out.push(DragSignal::Move { pointer: pos });
                    self.tracking = Tracking::PointerDrag {
                        origin: origin.clone(),
                    };
                }
            }
            Tracking::PointerDrag { .. } => out.push(DragSignal::Move { pointer: pos }),
            Tracking::Idle | Tracking::KeyboardDrag { .. } => {}
        }
    }

    fn on_pointer_up(&mut self, out: &mut Vec<DragSignal>) {
        match std::mem::replace(&mut self.tracking, Tracking::Idle) {
            Tracking::PointerDrag { origin } => out.push(DragSignal::End {
                kind: origin.kind(),
                origin,
            }),
            // A keyboard drag ignores stray pointer releases.
            keyboard @ Tracking::KeyboardDrag { .. } => self.tracking = keyboard,
            Tracking::Pressed { .. } | Tracking::Idle => {}
        }
    }

    fn on_key(&mut self, key: Key, focused: Option<&DraggableId>, out: &mut Vec<DragSignal>) {
        match (&self.tracking, key) {
            (Tracking::PointerDrag { .. } | Tracking::KeyboardDrag { .. }, Key::Escape) => {
                out.push(DragSignal::Cancel);
                self.tracking = Tracking::Idle;
            }
            (Tracking::Pressed { .. }, Key::Escape) => self.tracking = Tracking::Idle,
            (Tracking::KeyboardDrag { origin }, Key::Space | Key::Enter) => {
                out.push(DragSignal::End {
                    origin: origin.clone(),
                    kind: origin.kind(),
                });
                self.tracking = Tracking::Idle;
            }
            (Tracking::KeyboardDrag { .. }, Key::Up) => out.push(DragSignal::Step(Direction::Up)),
            (Tracking::KeyboardDrag { .. }, Key::Down) => {
                out.push(DragSignal::Step(Direction::Down));
            }
            (Tracking::Idle, Key::Space | Key::Enter) if self.config.keyboard => {
                if let Some(origin) = focused {
                    out.push(DragSignal::Start {
                        origin: origin.clone(),
                        pointer: Point::default(),
                    });
                    self.tracking = Tracking::KeyboardDrag {
                        origin: origin.clone(),
                    };
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
