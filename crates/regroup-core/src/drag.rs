#![forbid(unsafe_code)]

//! Drag state machine for item and group drags.
//!
//! ```text
//!            start (pointer past threshold / keyboard activate)
//!   Idle ─────────────────────────────────────────────► Dragging
//!    ▲                                                     │
//!    └──────────── drop | cancel | invalid target ◄────────┘
//! ```
//!
//! # Invariants
//! 1. At most one drag is active. [`DragMachine::start`] while dragging is
//!    rejected and leaves the active drag untouched.
//! 2. Every terminal transition returns to [`DragState::Idle`].
//! 3. The machine never mutates order state. A drop yields a
//!    [`DropResolution`] the caller applies; a cancel yields nothing.
//! 4. `over` is always admitted by the drag's [`CollisionScope`]: items only
//!    target sections of their own group, groups only target groups.
//!
//! # Failure Modes
//! - Origin not present in the current grouping: start is rejected.
//! - Drop resolves to no target, a target of the wrong kind, or a target that
//!   vanished from the grouping: the drag is cancelled silently.

use std::fmt;

use crate::collision::{CollisionScope, DropZones, closest_center};
use crate::constraint::MovementConstraint;
use crate::geometry::{Offset, Point, Rect, saturate_i32};
use crate::group::{GroupKey, Grouping};
use crate::section::SectionId;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Whether a drag moves one section or a whole group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragKind {
    Item,
    Group,
}

/// Something that can be dragged or dropped onto.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DraggableId {
    Section(SectionId),
    Group(GroupKey),
}

impl DraggableId {
    /// The scope of the handle determines the kind of drag it starts.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> DragKind {
        match self {
            Self::Section(_) => DragKind::Item,
            Self::Group(_) => DragKind::Group,
        }
    }
}

impl fmt::Display for DraggableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section(id) => write!(f, "section:{id}"),
            Self::Group(key) => write!(f, "group:{key}"),
        }
    }
}

/// Keyboard navigation direction for an active drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

// ---------------------------------------------------------------------------
// Capability interface
// ---------------------------------------------------------------------------

/// Callbacks a gesture system drives. Any UI runtime that can report drag
/// start, movement and end for a handle can back a board through this trait.
pub trait DragHandler {
    /// Result of finishing a drag.
    type Outcome;

    fn on_drag_start(&mut self, origin: DraggableId, pointer: Point) -> Result<(), DragRejected>;

    /// Pointer moved; returns the current drop target, if any.
    fn on_drag_move(&mut self, pointer: Point) -> Option<DraggableId>;

    /// Keyboard step to the neighbouring target.
    fn on_drag_step(&mut self, direction: Direction) -> Option<DraggableId>;

    fn on_drag_end(
        &mut self,
        origin: &DraggableId,
        over: Option<DraggableId>,
        kind: DragKind,
    ) -> Self::Outcome;

    fn on_drag_cancel(&mut self);
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Why a drag could not start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragRejected {
    /// Another drag is active.
    AlreadyDragging,
    /// The handle does not belong to the current grouping.
    UnknownOrigin(DraggableId),
}

impl fmt::Display for DragRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyDragging => write!(f, "a drag is already active"),
            Self::UnknownOrigin(id) => write!(f, "unknown drag origin {id}"),
        }
    }
}

impl std::error::Error for DragRejected {}

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag {
    pub kind: DragKind,
    pub origin: DraggableId,
    /// Member index within the group (items) or group index (groups).
    pub origin_index: usize,
    /// Group the origin belonged to when the drag started.
    pub origin_group: usize,
    pub scope: CollisionScope,
    /// Origin rect at drag start; a zero-size rect at the pointer when the
    /// host never registered one.
    pub initial_rect: Rect,
    pub pointer_start: Point,
    /// Constrained translation of the proxy.
    pub translation: Offset,
    pub over: Option<DraggableId>,
}

impl ActiveDrag {
    /// Where the drag proxy should be drawn.
    #[must_use]
    pub fn proxy_rect(&self) -> Rect {
        self.initial_rect.translate(self.translation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// What a drop asks the order state to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropResolution {
    /// Move one section within group `group_index`.
    Items {
        group_index: usize,
        from: usize,
        to: usize,
    },
    /// Move group `from` to position `to`.
    Groups { from: usize, to: usize },
    /// Dropped at the origin: nothing to do.
    NoOp(DragKind),
    /// No valid target: the drag was cancelled.
    Cancelled,
    /// No drag was active.
    NotDragging,
}

impl DropResolution {
    /// Whether the drop changes the order.
    #[must_use]
    pub fn is_reorder(&self) -> bool {
        matches!(self, Self::Items { .. } | Self::Groups { .. })
    }
}

/// Per-kind movement constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragConstraints {
    pub item: MovementConstraint,
    pub group: MovementConstraint,
}

impl Default for DragConstraints {
    fn default() -> Self {
        Self {
            item: MovementConstraint::LOCKED,
            group: MovementConstraint {
                vertical_only: false,
                within_parent: true,
            },
        }
    }
}

impl DragConstraints {
    #[must_use]
    pub fn for_kind(&self, kind: DragKind) -> MovementConstraint {
        match kind {
            DragKind::Item => self.item,
            DragKind::Group => self.group,
        }
    }
}

// ---------------------------------------------------------------------------
// DragMachine
// ---------------------------------------------------------------------------

/// The drag state machine of one list.
#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    state: DragState,
    constraints: DragConstraints,
}

impl DragMachine {
    #[must_use]
    pub fn new(constraints: DragConstraints) -> Self {
        Self {
            state: DragState::Idle,
            constraints,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveDrag> {
        match &self.state {
            DragState::Dragging(active) => Some(active),
            DragState::Idle => None,
        }
    }

    #[must_use]
    pub fn over(&self) -> Option<&DraggableId> {
        self.active().and_then(|active| active.over.as_ref())
    }

    #[must_use]
    pub fn constraints(&self) -> DragConstraints {
        self.constraints
    }

    pub fn set_constraints(&mut self, constraints: DragConstraints) {
        self.constraints = constraints;
    }

    /// Begin dragging `origin`.
    pub fn start(
        &mut self,
        origin: DraggableId,
        pointer: Point,
        grouping: &Grouping,
        zones: &DropZones,
    ) -> Result<(), DragRejected> {
        if let Some(active) = self.active() {
            tracing::debug!(
                target: "regroup.drag",
                active = %active.origin,
                rejected = %origin,
                "overlapping drag start rejected"
            );
            return Err(DragRejected::AlreadyDragging);
        }

        let (origin_group, origin_index, scope) = locate_origin(&origin, grouping)?;

        let initial_rect = zones
            .rect_of(&origin)
            .unwrap_or(Rect::new(pointer.x, pointer.y, 0, 0));
        let over = closest_center(initial_rect, zones, &scope).map(|zone| zone.id.clone());

        tracing::trace!(
            target: "regroup.drag",
            origin = %origin,
            origin_index,
            "drag started"
        );
        self.state = DragState::Dragging(ActiveDrag {
            kind: origin.kind(),
            origin,
            origin_index,
            origin_group,
            scope,
            initial_rect,
            pointer_start: pointer,
            translation: Offset::ZERO,
            over,
        });
        Ok(())
    }

    /// Follow the pointer and recompute the drop target.
    pub fn move_to(&mut self, pointer: Point, zones: &DropZones) -> Option<&DraggableId> {
        let constraints = self.constraints;
        let DragState::Dragging(active) = &mut self.state else {
            return None;
        };
        let raw = active.pointer_start.delta_to(pointer);
        active.translation =
            constraints
                .for_kind(active.kind)
                .apply(raw, active.initial_rect, zones.container());
        active.over =
            closest_center(active.proxy_rect(), zones, &active.scope).map(|zone| zone.id.clone());
        active.over.as_ref()
    }

    /// Move the drag to the previous/next admitted target (keyboard drag).
    ///
    /// Stops at the ends of the list rather than wrapping.
    pub fn step(&mut self, direction: Direction, zones: &DropZones) -> Option<&DraggableId> {
        let DragState::Dragging(active) = &mut self.state else {
            return None;
        };
        let targets = zones.sorted_candidates(&active.scope);
        if targets.is_empty() {
            return None;
        }
        let anchor = active.over.as_ref().unwrap_or(&active.origin);
        let current = targets.iter().position(|zone| &zone.id == anchor);
        let next = match (current, direction) {
            (Some(i), Direction::Up) => i.saturating_sub(1),
            (Some(i), Direction::Down) => (i + 1).min(targets.len() - 1),
            (None, Direction::Up) => targets.len() - 1,
            (None, Direction::Down) => 0,
        };
        let target = targets[next];
        let (tx, ty) = target.rect.center_doubled();
        let (ix, iy) = active.initial_rect.center_doubled();
        active.translation = Offset::new(saturate_i32((tx - ix) / 2), saturate_i32((ty - iy) / 2));
        active.over = Some(target.id.clone());
        active.over.as_ref()
    }

    /// Finish the drag on `over` (or on the machine's own target when the host
    /// passes `None` for `over` through [`DragMachine::drop_current`]).
    pub fn drop_on(&mut self, over: Option<&DraggableId>, grouping: &Grouping) -> DropResolution {
        let DragState::Dragging(active) = std::mem::take(&mut self.state) else {
            return DropResolution::NotDragging;
        };

        let Some(over) = over.filter(|target| active.scope.kind == target.kind()) else {
            tracing::debug!(
                target: "regroup.drag",
                origin = %active.origin,
                "drop without a valid target, cancelled"
            );
            return DropResolution::Cancelled;
        };

        let resolution = match (&active.kind, over) {
            (DragKind::Item, DraggableId::Section(id)) => match grouping.locate(id) {
                Some((group_index, to)) if group_index == active.origin_group => {
                    if to == active.origin_index {
                        DropResolution::NoOp(DragKind::Item)
                    } else {
                        DropResolution::Items {
                            group_index,
                            from: active.origin_index,
                            to,
                        }
                    }
                }
                _ => DropResolution::Cancelled,
            },
            (DragKind::Group, DraggableId::Group(key)) => match grouping.position_of_key(key) {
                Some(to) if to == active.origin_index => DropResolution::NoOp(DragKind::Group),
                Some(to) => DropResolution::Groups {
                    from: active.origin_index,
                    to,
                },
                None => DropResolution::Cancelled,
            },
            _ => DropResolution::Cancelled,
        };

        tracing::trace!(
            target: "regroup.drag",
            origin = %active.origin,
            over = %over,
            ?resolution,
            "drag dropped"
        );
        resolution
    }

    /// Finish the drag on the target computed from pointer/keyboard movement.
    pub fn drop_current(&mut self, grouping: &Grouping) -> DropResolution {
        let over = self.over().cloned();
        self.drop_on(over.as_ref(), grouping)
    }

    /// Re-resolve the active drag's origin against a rebuilt `grouping`.
    ///
    /// Keeps the drag alive when the list changed under it (a rollback, for
    /// instance): the origin index, group and collision scope follow the
    /// origin id, and a target that left the scope is dropped. Cancels and
    /// returns `false` when the origin no longer exists.
    pub fn rebase(&mut self, grouping: &Grouping) -> bool {
        let DragState::Dragging(active) = &mut self.state else {
            return false;
        };
        let Ok((origin_group, origin_index, scope)) = locate_origin(&active.origin, grouping)
        else {
            tracing::debug!(
                target: "regroup.drag",
                origin = %active.origin,
                "drag origin vanished on rebase, cancelled"
            );
            self.state = DragState::Idle;
            return false;
        };

        let still_admitted = |over: &DraggableId| match over {
            DraggableId::Section(id) => grouping
                .locate(id)
                .is_some_and(|(group_index, _)| {
                    scope.kind == DragKind::Item && group_index == origin_group
                }),
            DraggableId::Group(key) => {
                scope.kind == DragKind::Group && grouping.position_of_key(key).is_some()
            }
        };
        if active.over.as_ref().is_some_and(|over| !still_admitted(over)) {
            active.over = None;
        }
        active.origin_group = origin_group;
        active.origin_index = origin_index;
        active.scope = scope;
        tracing::trace!(
            target: "regroup.drag",
            origin = %active.origin,
            origin_index,
            "drag rebased"
        );
        true
    }

    /// Abort the drag. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        let was = self.is_dragging();
        if was {
            tracing::trace!(target: "regroup.drag", "drag cancelled");
        }
        self.state = DragState::Idle;
        was
    }
}

/// Group index, origin index and collision scope of `origin` in `grouping`.
fn locate_origin(
    origin: &DraggableId,
    grouping: &Grouping,
) -> Result<(usize, usize, CollisionScope), DragRejected> {
    match origin {
        DraggableId::Section(id) => {
            let (group_index, member) = grouping
                .locate(id)
                .ok_or_else(|| DragRejected::UnknownOrigin(origin.clone()))?;
            let key = grouping
                .get(group_index)
                .map(|group| group.key.clone())
                .ok_or_else(|| DragRejected::UnknownOrigin(origin.clone()))?;
            let scope = CollisionScope {
                kind: DragKind::Item,
                group: Some(key),
            };
            Ok((group_index, member, scope))
        }
        DraggableId::Group(key) => {
            let group_index = grouping
                .position_of_key(key)
                .ok_or_else(|| DragRejected::UnknownOrigin(origin.clone()))?;
            let scope = CollisionScope {
                kind: DragKind::Group,
                group: None,
            };
            Ok((group_index, group_index, scope))
        }
    }
}
