#![forbid(unsafe_code)]

//! Regroup public facade crate.
//!
//! Re-exports the pure model from `regroup-core` and the board, persistence
//! and notice layers from `regroup-runtime`, plus a prelude for hosts that
//! embed a section board.
//!
//! A host owns one [`SectionBoard`] per list. It feeds raw input through
//! [`SectionBoard::handle_input`], registers a drop zone per rendered row,
//! sends each [`CommitRequest`] to its [`RearrangeSections`] backend and
//! hands the [`CommitOutcome`] back to [`SectionBoard::settle`].

// --- Core re-exports -------------------------------------------------------

pub use regroup_core::{
    ActiveDrag, CollisionScope, Direction, DragConstraints, DragHandler, DragKind, DragMachine,
    DragRejected, DragSignal, DragState, DraggableId, DropResolution, DropZone, DropZones,
    GestureConfig, GestureRecognizer, Group, GroupKey, Grouping, InputEvent, Key, LocalOrder,
    MovementConstraint, Offset, Order, OrderState, Point, Rect, ReorderError, ResumeId, Section,
    SectionId, SectionType, array_move, closest_center, dedup_sections, group, group_entries,
};

// --- Runtime re-exports ----------------------------------------------------

pub use regroup_runtime::{
    BoardConfig, BridgeStats, CommitOutcome, CommitRequest, CommitTicket, ConfigError,
    ConstraintPolicy, DragOverlay, DropOutcome, GesturePolicy, Notice, NoticeConfig, NoticeLevel,
    NoticePolicy, NoticeQueue, NoticeStats, PersistError, PersistenceBridge, RearrangeSections,
    RenderSection, RenderedGroup, RenderedSection, SectionBoard, SectionView, Settlement,
    SyncOutcome, render_groups, render_overlay,
};

/// Standard result type for model operations.
pub type Result<T> = regroup_core::Result<T>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CommitOutcome, CommitRequest, DragKind, DraggableId, DropOutcome, GroupKey, InputEvent,
        Key, Notice, NoticeLevel, Order, PersistError, Point, Rect, RearrangeSections, Result,
        ResumeId, Section, SectionBoard, SectionId, SectionType, SectionView, SyncOutcome,
    };

    pub use crate::{core, runtime};
}

pub use regroup_core as core;
pub use regroup_runtime as runtime;
