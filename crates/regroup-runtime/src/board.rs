#![forbid(unsafe_code)]

//! Section board: the per-list context that owns every piece of drag state.
//!
//! A [`SectionBoard`] is an ordinary value. Hosts create one per rendered
//! list and pass it explicitly; any number of boards can coexist.
//!
//! ```text
//!  InputEvent ─► GestureRecognizer ─► DragSignal ─► DragHandler (board)
//!                                                        │
//!                       LocalOrder ◄── DropResolution ◄──┘
//!                           │
//!                           └─► PersistenceBridge ─► CommitRequest ─► host
//!                                        ▲
//!  host ─► CommitOutcome ─► settle ──────┘
//! ```
//!
//! # Invariants
//! 1. The board never awaits. Commits leave as [`CommitRequest`]s and come
//!    back through [`SectionBoard::settle`], so drags keep working while a
//!    commit is outstanding.
//! 2. An older commit's reply never overwrites a newer gesture's visible
//!    order: confirmation only moves the confirmed baseline.
//! 3. A failed commit that is not superseded rolls back once and raises one
//!    warning notice.
//! 4. Server echoes that disagree with the local order are ignored while a
//!    drag or commit is outstanding.
//!
//! # Failure Modes
//! - Invalid drop target: the drag is cancelled, nothing else happens.
//! - Reorder error (stale indices): logged at `DEBUG`, treated as a cancel.
//! - Rollback during a drag: the drag is rebased onto the restored order by
//!   origin id and stays active; its target is cleared if it left the
//!   drag's scope. The host should re-run its layout pass.

use regroup_core::collision::DropZones;
use regroup_core::drag::{
    ActiveDrag, Direction, DragHandler, DragKind, DragMachine, DragRejected, DraggableId,
    DropResolution,
};
use regroup_core::geometry::Point;
use regroup_core::gesture::{DragSignal, GestureRecognizer, InputEvent};
use regroup_core::group::{Group, Grouping};
use regroup_core::order::{LocalOrder, Order, OrderState};
use regroup_core::section::{ResumeId, Section, dedup_sections};

use crate::config::BoardConfig;
use crate::error::ConfigError;
use crate::notice::{Notice, NoticeQueue};
use crate::persistence::{
    BridgeStats, CommitOutcome, CommitRequest, PersistenceBridge, Settlement,
};
use crate::render::{DragOverlay, RenderSection, RenderedGroup, render_groups, render_overlay};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of finishing a drag on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropOutcome {
    pub resolution: DropResolution,
    /// The visible order after the drop, when it changed.
    pub order: Option<Order>,
    /// Commit the host must dispatch now, if any.
    pub commit: Option<CommitRequest>,
}

impl DropOutcome {
    fn unchanged(resolution: DropResolution) -> Self {
        Self {
            resolution,
            order: None,
            commit: None,
        }
    }
}

/// How [`SectionBoard::sync_sections`] treated an incoming list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Same order as shown: payloads refreshed.
    Refreshed,
    /// Different set of sections: adopted as the new baseline, drag cancelled.
    Adopted,
    /// Same sections in a new order while idle: adopted as the new baseline.
    Rebased,
    /// Same sections in a new order while busy: payloads refreshed, order
    /// ignored.
    StaleEcho,
}

// ---------------------------------------------------------------------------
// SectionBoard
// ---------------------------------------------------------------------------

/// Drag-and-drop reordering context for one résumé's section list.
#[derive(Debug)]
pub struct SectionBoard<D = ()> {
    resume_id: ResumeId,
    local: LocalOrder<D>,
    machine: DragMachine,
    recognizer: GestureRecognizer,
    zones: DropZones,
    bridge: PersistenceBridge,
    notices: NoticeQueue,
    config: BoardConfig,
}

impl<D> SectionBoard<D> {
    /// Board with default configuration.
    #[must_use]
    pub fn new(resume_id: ResumeId, sections: Vec<Section<D>>) -> Self {
        Self::build(resume_id, sections, BoardConfig::default())
    }

    /// Board with a validated configuration.
    pub fn with_config(
        resume_id: ResumeId,
        sections: Vec<Section<D>>,
        config: BoardConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self::build(resume_id, sections, config.validated()?))
    }

    fn build(resume_id: ResumeId, sections: Vec<Section<D>>, config: BoardConfig) -> Self {
        tracing::debug!(
            target: "regroup.board",
            resume_id = %resume_id,
            sections = sections.len(),
            "board created"
        );
        Self {
            local: LocalOrder::new(sections),
            machine: DragMachine::new(config.to_drag_constraints()),
            recognizer: GestureRecognizer::new(config.to_gesture_config()),
            zones: DropZones::new(),
            bridge: PersistenceBridge::new(resume_id.clone()),
            notices: NoticeQueue::new(config.to_notice_config()),
            resume_id,
            config,
        }
    }

    // -- Read access --------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn resume_id(&self) -> &ResumeId {
        &self.resume_id
    }

    /// Sections in visible order.
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &[Section<D>] {
        self.local.sections()
    }

    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        self.local.groups()
    }

    #[inline]
    #[must_use]
    pub fn grouping(&self) -> &Grouping {
        self.local.grouping()
    }

    /// The visible (speculative) order.
    #[inline]
    #[must_use]
    pub fn order(&self) -> &Order {
        self.local.order()
    }

    #[inline]
    #[must_use]
    pub fn order_state(&self) -> &OrderState {
        self.local.state()
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.machine.is_dragging()
    }

    #[must_use]
    pub fn active_drag(&self) -> Option<&ActiveDrag> {
        self.machine.active()
    }

    /// Whether a commit is in flight or queued.
    #[must_use]
    pub fn is_committing(&self) -> bool {
        self.bridge.is_pending()
    }

    #[must_use]
    pub fn bridge_stats(&self) -> &BridgeStats {
        self.bridge.stats()
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    // -- Layout -------------------------------------------------------------

    #[must_use]
    pub fn drop_zones(&self) -> &DropZones {
        &self.zones
    }

    /// Drop zones, for the host to register rects after each layout pass.
    pub fn drop_zones_mut(&mut self) -> &mut DropZones {
        &mut self.zones
    }

    // -- Notices ------------------------------------------------------------

    #[must_use]
    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    /// Take every pending notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    // -- Input --------------------------------------------------------------

    /// Feed one raw input event through the gesture recognizer.
    ///
    /// Returns the outcome when the event finished a drag.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<DropOutcome> {
        let mut finished = None;
        for signal in self.recognizer.process(event) {
            if let Some(outcome) = self.apply_signal(signal) {
                finished = Some(outcome);
            }
        }
        finished
    }

    /// Drive the board with a drag signal from any gesture source.
    pub fn apply_signal(&mut self, signal: DragSignal) -> Option<DropOutcome> {
        match signal {
            DragSignal::Start { origin, pointer } => {
                if self.on_drag_start(origin, pointer).is_err() {
                    self.recognizer.reset();
                }
                None
            }
            DragSignal::Move { pointer } => {
                self.on_drag_move(pointer);
                None
            }
            DragSignal::Step(direction) => {
                self.on_drag_step(direction);
                None
            }
            DragSignal::End { origin, kind } => {
                let over = self.machine.over().cloned();
                Some(self.on_drag_end(&origin, over, kind))
            }
            DragSignal::Cancel => {
                self.on_drag_cancel();
                None
            }
        }
    }

    // -- Persistence --------------------------------------------------------

    /// Apply a backend reply. Returns the follow-up commit to dispatch, if any.
    pub fn settle(&mut self, outcome: CommitOutcome) -> Option<CommitRequest> {
        let ticket = outcome.ticket;
        match self.bridge.settle(outcome, self.local.confirmed()) {
            Settlement::Confirmed { order, next } => {
                self.local.confirm(order);
                next
            }
            Settlement::RolledBack { error } => {
                match self.local.rollback() {
                    Ok(order) => tracing::debug!(
                        target: "regroup.board",
                        resume_id = %self.resume_id,
                        sections = order.len(),
                        %error,
                        "order rolled back"
                    ),
                    Err(err) => tracing::debug!(
                        target: "regroup.board",
                        resume_id = %self.resume_id,
                        %err,
                        "rollback target no longer matches the list"
                    ),
                }
                // A drag started after the failed gesture follows its origin.
                if self.machine.is_dragging() && !self.machine.rebase(self.local.grouping()) {
                    self.recognizer.reset();
                }
                self.notices
                    .push(Notice::warning(self.config.rollback_message.clone()).for_commit(ticket));
                None
            }
            Settlement::Superseded { next, .. } => next,
            Settlement::Stale => None,
        }
    }

    // -- Model sync ---------------------------------------------------------

    /// Reconcile with a freshly supplied section list for the same résumé.
    pub fn sync_sections(&mut self, mut sections: Vec<Section<D>>) -> SyncOutcome {
        dedup_sections(&mut sections);
        let incoming = Order::of(&sections);
        let current = self.local.order();

        let outcome = if &incoming == current {
            self.local.refresh(sections);
            SyncOutcome::Refreshed
        } else if !incoming.same_members(current) {
            self.cancel_drag();
            self.bridge.reset(self.resume_id.clone());
            self.local = LocalOrder::new(sections);
            SyncOutcome::Adopted
        } else if !self.machine.is_dragging() && !self.bridge.is_pending() {
            self.local = LocalOrder::new(sections);
            SyncOutcome::Rebased
        } else {
            self.local.refresh(sections);
            SyncOutcome::StaleEcho
        };

        tracing::trace!(
            target: "regroup.board",
            resume_id = %self.resume_id,
            ?outcome,
            "sections synced"
        );
        outcome
    }

    /// Switch to a different résumé, discarding all local state.
    pub fn replace(&mut self, resume_id: ResumeId, sections: Vec<Section<D>>) {
        tracing::debug!(
            target: "regroup.board",
            from = %self.resume_id,
            to = %resume_id,
            "board replaced"
        );
        self.cancel_drag();
        self.bridge.reset(resume_id.clone());
        self.zones.clear();
        self.notices.clear();
        self.local = LocalOrder::new(sections);
        self.resume_id = resume_id;
    }

    // -- Rendering ----------------------------------------------------------

    /// Render the visible order through `delegate`.
    pub fn render<R>(&self, delegate: &R) -> Vec<RenderedGroup<R::Output>>
    where
        R: RenderSection<D> + ?Sized,
    {
        render_groups(&self.local, delegate)
    }

    /// Render the drag proxy through `delegate`, while dragging.
    pub fn overlay<R>(&self, delegate: &R) -> Option<DragOverlay<R::Output>>
    where
        R: RenderSection<D> + ?Sized,
    {
        let active = self.machine.active()?;
        render_overlay(&self.local, active, delegate)
    }

    fn cancel_drag(&mut self) {
        self.machine.cancel();
        self.recognizer.reset();
    }

    /// Apply a reorder resolution to the local order.
    fn apply_resolution(&mut self, resolution: &DropResolution) -> Option<Order> {
        let result = match *resolution {
            DropResolution::Items {
                group_index,
                from,
                to,
            } => self.local.reorder_within_group(group_index, from, to),
            DropResolution::Groups { from, to } => self.local.reorder_groups(from, to),
            DropResolution::NoOp(_) | DropResolution::Cancelled | DropResolution::NotDragging => {
                return None;
            }
        };
        match result {
            Ok(order) => Some(order),
            Err(err) => {
                tracing::debug!(
                    target: "regroup.board",
                    resume_id = %self.resume_id,
                    %err,
                    "drop no longer applies, cancelled"
                );
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DragHandler
// ---------------------------------------------------------------------------

impl<D> DragHandler for SectionBoard<D> {
    type Outcome = DropOutcome;

    fn on_drag_start(&mut self, origin: DraggableId, pointer: Point) -> Result<(), DragRejected> {
        self.machine
            .start(origin, pointer, self.local.grouping(), &self.zones)
    }

    fn on_drag_move(&mut self, pointer: Point) -> Option<DraggableId> {
        self.machine.move_to(pointer, &self.zones).cloned()
    }

    fn on_drag_step(&mut self, direction: Direction) -> Option<DraggableId> {
        self.machine.step(direction, &self.zones).cloned()
    }

    fn on_drag_end(
        &mut self,
        origin: &DraggableId,
        over: Option<DraggableId>,
        kind: DragKind,
    ) -> DropOutcome {
        let matches_active = self
            .machine
            .active()
            .is_some_and(|active| &active.origin == origin && active.kind == kind);
        if !matches_active {
            let resolution = if self.machine.cancel() {
                DropResolution::Cancelled
            } else {
                DropResolution::NotDragging
            };
            tracing::debug!(
                target: "regroup.drag",
                origin = %origin,
                "drag end does not match the active drag"
            );
            return DropOutcome::unchanged(resolution);
        }

        let resolution = self.machine.drop_on(over.as_ref(), self.local.grouping());
        let Some(order) = self.apply_resolution(&resolution) else {
            let resolution = if resolution.is_reorder() {
                DropResolution::Cancelled
            } else {
                resolution
            };
            return DropOutcome::unchanged(resolution);
        };

        let commit = self.bridge.submit(order.clone(), self.local.confirmed());
        DropOutcome {
            resolution,
            order: Some(order),
            commit,
        }
    }

    fn on_drag_cancel(&mut self) {
        self.machine.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regroup_core::geometry::Rect;
    use regroup_core::group::GroupKey;
    use regroup_core::section::{SectionId, SectionType};

    use crate::error::PersistError;

    fn board() -> SectionBoard {
        let mut board = SectionBoard::new(
            ResumeId::new("r1"),
            vec![
                Section::bare("a1", "education", 0),
                Section::bare("a2", "education", 1),
                Section::bare("b1", "experience", 2),
            ],
        );
        layout(&mut board);
        board
    }

    fn layout(board: &mut SectionBoard) {
        let groups: Vec<Group> = board.groups().to_vec();
        let zones = board.drop_zones_mut();
        zones.clear();
        zones.set_container(Rect::new(0, 0, 40, 15));
        for g in groups {
            let top = 5 * g.start as i32;
            zones.register_group(g.key.clone(), Rect::new(0, top, 40, 5 * g.len() as i32));
            for (i, id) in g.section_ids.iter().enumerate() {
                zones.register_section(id.clone(), g.key.clone(), Rect::new(0, top + 5 * i as i32, 40, 5));
            }
        }
    }

    fn ids(board: &SectionBoard) -> Vec<&str> {
        board.order().iter().map(SectionId::as_str).collect()
    }

    fn section(id: &str) -> DraggableId {
        DraggableId::Section(id.into())
    }

    #[test]
    fn drop_on_other_item_commits_once() {
        let mut b = board();
        b.on_drag_start(section("a2"), Point::new(1, 6)).unwrap();
        let outcome = b.on_drag_end(&section("a2"), Some(section("a1")), DragKind::Item);
        assert_eq!(ids(&b), ["a2", "a1", "b1"]);
        let commit = outcome.commit.unwrap();
        assert_eq!(commit.order, b.order().clone());
        assert_eq!(b.bridge_stats().sent, 1);
    }

    #[test]
    fn drop_on_self_sends_nothing() {
        let mut b = board();
        b.on_drag_start(section("a1"), Point::new(1, 1)).unwrap();
        let outcome = b.on_drag_end(&section("a1"), Some(section("a1")), DragKind::Item);
        assert_eq!(outcome.resolution, DropResolution::NoOp(DragKind::Item));
        assert!(outcome.commit.is_none());
        assert_eq!(b.bridge_stats().sent, 0);
    }

    #[test]
    fn mismatched_end_cancels() {
        let mut b = board();
        b.on_drag_start(section("a1"), Point::new(1, 1)).unwrap();
        let outcome = b.on_drag_end(&section("b1"), Some(section("a2")), DragKind::Item);
        assert_eq!(outcome.resolution, DropResolution::Cancelled);
        assert!(!b.is_dragging());
        assert_eq!(ids(&b), ["a1", "a2", "b1"]);
    }

    #[test]
    fn rollback_pushes_one_warning() {
        let mut b = board();
        b.on_drag_start(section("a2"), Point::new(1, 6)).unwrap();
        let commit = b
            .on_drag_end(&section("a2"), Some(section("a1")), DragKind::Item)
            .commit
            .unwrap();
        let next = b.settle(CommitOutcome {
            ticket: commit.ticket,
            result: Err(PersistError::Timeout),
        });
        assert!(next.is_none());
        assert_eq!(ids(&b), ["a1", "a2", "b1"]);
        let notices = b.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].ticket, Some(commit.ticket));
    }

    #[test]
    fn rollback_keeps_a_later_drag_alive() {
        let mut b = board();
        b.on_drag_start(section("a2"), Point::new(1, 6)).unwrap();
        let commit = b
            .on_drag_end(&section("a2"), Some(section("a1")), DragKind::Item)
            .commit
            .unwrap();
        assert_eq!(ids(&b), ["a2", "a1", "b1"]);

        // a1 is second in the optimistic order when this drag starts.
        b.on_drag_start(section("a1"), Point::new(1, 1)).unwrap();
        assert_eq!(b.active_drag().unwrap().origin_index, 1);

        b.settle(CommitOutcome {
            ticket: commit.ticket,
            result: Err(PersistError::Timeout),
        });
        assert_eq!(ids(&b), ["a1", "a2", "b1"]);
        assert!(b.is_dragging());
        assert_eq!(b.active_drag().unwrap().origin_index, 0);

        let outcome = b.on_drag_end(&section("a1"), Some(section("a2")), DragKind::Item);
        assert_eq!(ids(&b), ["a2", "a1", "b1"]);
        assert!(outcome.commit.is_some());
        assert_eq!(b.drain_notices().len(), 1);
    }

    #[test]
    fn sync_classifies_incoming_lists() {
        let mut b = board();
        let same = vec![
            Section::bare("a1", "education", 0),
            Section::bare("a2", "education", 1),
            Section::bare("b1", "experience", 2),
        ];
        assert_eq!(b.sync_sections(same), SyncOutcome::Refreshed);

        let reordered = vec![
            Section::bare("b1", "experience", 0),
            Section::bare("a1", "education", 1),
            Section::bare("a2", "education", 2),
        ];
        assert_eq!(b.sync_sections(reordered.clone()), SyncOutcome::Rebased);
        assert_eq!(ids(&b), ["b1", "a1", "a2"]);
        assert!(!b.order_state().is_dirty());

        b.on_drag_start(section("a1"), Point::new(1, 1)).unwrap();
        let grown = vec![
            Section::bare("b1", "experience", 0),
            Section::bare("a1", "education", 1),
            Section::bare("a2", "education", 2),
            Section::bare("c1", "skill", 3),
        ];
        assert_eq!(b.sync_sections(grown), SyncOutcome::Adopted);
        assert!(!b.is_dragging());
        assert_eq!(b.groups().len(), 3);
    }

    #[test]
    fn group_handle_overlay_renders_whole_group() {
        let mut b = board();
        let key = GroupKey::new(SectionType::Education, 0);
        b.on_drag_start(DraggableId::Group(key.clone()), Point::new(1, 1)).unwrap();
        let delegate = |s: &Section, _first: bool| crate::render::SectionView::new(s.id.to_string());
        let Some(DragOverlay::Group(group)) = b.overlay(&delegate) else {
            panic!("expected a group overlay");
        };
        assert_eq!(group.key, key);
        assert_eq!(group.sections.len(), 2);
    }

    #[test]
    fn replace_resets_everything() {
        let mut b = board();
        b.on_drag_start(section("a2"), Point::new(1, 6)).unwrap();
        b.on_drag_end(&section("a2"), Some(section("a1")), DragKind::Item);
        assert!(b.is_committing());

        b.replace(ResumeId::new("r2"), vec![Section::bare("x", "skill", 0)]);
        assert_eq!(b.resume_id().as_str(), "r2");
        assert!(!b.is_committing());
        assert!(b.drop_zones().is_empty());
        assert_eq!(ids(&b), ["x"]);
    }
}
