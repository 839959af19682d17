//! Shared fixtures for runtime integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::future::Future;

use regroup_core::drag::DraggableId;
use regroup_core::geometry::{Point, Rect};
use regroup_core::gesture::{InputEvent, Key};
use regroup_core::group::Group;
use regroup_core::order::Order;
use regroup_core::section::{ResumeId, Section, SectionId};
use regroup_runtime::board::SectionBoard;
use regroup_runtime::error::PersistError;
use regroup_runtime::persistence::{CommitOutcome, CommitRequest, RearrangeSections};

/// Height of one rendered section.
pub const ROW: i32 = 5;
pub const WIDTH: i32 = 40;

/// In-memory backend that records every call.
#[derive(Debug, Default)]
pub struct Backend {
    calls: RefCell<Vec<(ResumeId, Order)>>,
    fail: Cell<bool>,
}

impl Backend {
    pub fn failing() -> Self {
        let backend = Self::default();
        backend.fail.set(true);
        backend
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn calls(&self) -> Vec<(ResumeId, Order)> {
        self.calls.borrow().clone()
    }
}

impl RearrangeSections for Backend {
    fn rearrange_sections(
        &self,
        resume_id: &ResumeId,
        order: &Order,
    ) -> impl Future<Output = Result<(), PersistError>> {
        self.calls
            .borrow_mut()
            .push((resume_id.clone(), order.clone()));
        let fail = self.fail.get();
        async move {
            if fail {
                Err(PersistError::Rejected("conflict".into()))
            } else {
                Ok(())
            }
        }
    }
}

/// Run one request to completion.
pub fn send(request: CommitRequest, backend: &Backend) -> CommitOutcome {
    pollster::block_on(request.send(backend))
}

/// Run a request and every follow-up it causes until the board is idle.
pub fn drive(board: &mut SectionBoard, request: Option<CommitRequest>, backend: &Backend) {
    let mut next = request;
    while let Some(request) = next {
        let outcome = send(request, backend);
        next = board.settle(outcome);
    }
}

pub fn sections(rows: &[(&str, &str)]) -> Vec<Section> {
    rows.iter()
        .enumerate()
        .map(|(i, (id, kind))| Section::bare(*id, *kind, i))
        .collect()
}

pub fn board(rows: &[(&str, &str)]) -> SectionBoard {
    let mut board = SectionBoard::new(ResumeId::new("resume-1"), sections(rows));
    layout(&mut board);
    board
}

/// Register one row per section, in visible order, like a host layout pass.
pub fn layout(board: &mut SectionBoard) {
    let groups: Vec<Group> = board.groups().to_vec();
    let total = board.sections().len() as i32;
    let zones = board.drop_zones_mut();
    zones.clear();
    zones.set_container(Rect::new(0, 0, WIDTH, ROW * total));
    for g in groups {
        let top = ROW * g.start as i32;
        zones.register_group(g.key.clone(), Rect::new(0, top, WIDTH, ROW * g.len() as i32));
        for (i, id) in g.section_ids.iter().enumerate() {
            let y = top + ROW * i as i32;
            zones.register_section(id.clone(), g.key.clone(), Rect::new(0, y, WIDTH, ROW));
        }
    }
}

pub fn ids(board: &SectionBoard) -> Vec<&str> {
    board.order().iter().map(SectionId::as_str).collect()
}

pub fn order(ids: &[&str]) -> Order {
    Order::from(ids.to_vec())
}

pub fn section_handle(id: &str) -> DraggableId {
    DraggableId::Section(id.into())
}

pub fn down(y: i32, handle: DraggableId) -> InputEvent {
    InputEvent::PointerDown {
        pos: Point::new(1, y),
        handle: Some(handle),
    }
}

pub fn move_to(y: i32) -> InputEvent {
    InputEvent::PointerMove {
        pos: Point::new(1, y),
    }
}

pub fn up(y: i32) -> InputEvent {
    InputEvent::PointerUp {
        pos: Point::new(1, y),
    }
}

pub fn key(key: Key, focused: &DraggableId) -> InputEvent {
    InputEvent::Key {
        key,
        focused: Some(focused.clone()),
    }
}

/// Pointer-drag section `id` from row `from_y` to row `to_y` and release.
pub fn drag_section(
    board: &mut SectionBoard,
    id: &str,
    from_y: i32,
    to_y: i32,
) -> Option<regroup_runtime::board::DropOutcome> {
    board.handle_input(&down(from_y, section_handle(id)));
    board.handle_input(&move_to(to_y));
    board.handle_input(&up(to_y))
}
