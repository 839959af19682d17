#![forbid(unsafe_code)]

//! Core: section model, grouping, optimistic order state, and drag mechanics.
//!
//! # Role in regroup
//! `regroup-core` is the pure, synchronous layer. It owns the data model and
//! every transition a drag can cause, but performs no I/O and holds no clock.
//!
//! # Primary responsibilities
//! - **Section / Grouping**: the `{id, type, index, data}` model and its
//!   partition into contiguous same-kind runs.
//! - **LocalOrder / OrderState**: the optimistic copy of the list with its
//!   `{confirmed, speculative}` orders.
//! - **DragMachine**: the `Idle ⇄ Dragging` state machine, closest-center
//!   collision, and movement constraints.
//! - **GestureRecognizer**: raw pointer/keyboard input to drag signals.
//!
//! # How it fits in the system
//! `regroup-runtime` wraps one instance of each of these in a `SectionBoard`
//! and adds persistence, notices, and rendering on top.

pub mod collision;
pub mod constraint;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod group;
pub mod order;
pub mod section;

pub use collision::{CollisionScope, DropZone, DropZones, closest_center};
pub use constraint::MovementConstraint;
pub use drag::{
    ActiveDrag, Direction, DragConstraints, DragHandler, DragKind, DragMachine, DragRejected,
    DragState, DraggableId, DropResolution,
};
pub use error::{ReorderError, Result};
pub use geometry::{Offset, Point, Rect};
pub use gesture::{DragSignal, GestureConfig, GestureRecognizer, InputEvent, Key};
pub use group::{Group, GroupKey, Grouping, group, group_entries};
pub use order::{LocalOrder, Order, OrderState, array_move};
pub use section::{ResumeId, Section, SectionId, SectionType, dedup_sections};
