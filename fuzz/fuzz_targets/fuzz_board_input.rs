#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use regroup_core::{DraggableId, Group, InputEvent, Key, Point, Rect, ResumeId, Section};
use regroup_runtime::{CommitOutcome, CommitRequest, PersistError, SectionBoard};

const ROW: i32 = 4;
const WIDTH: i32 = 30;
const KINDS: [&str; 4] = ["skill", "project", "award", "other"];

#[derive(Debug, Arbitrary)]
enum Op {
    Down { y: u8, row: u8, group: bool },
    Move { x: i8, y: u8 },
    Up { y: u8 },
    Key { key: u8, row: u8, group: bool },
    FocusLost,
    Reply { ok: bool },
}

#[derive(Debug, Arbitrary)]
struct Input {
    kinds: Vec<u8>,
    ops: Vec<Op>,
}

fn layout(board: &mut SectionBoard) {
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

fn handle(board: &SectionBoard, row: u8, group: bool) -> DraggableId {
    let order = board.order();
    let id = &order.as_slice()[usize::from(row) % order.len()];
    if group {
        let key = board
            .grouping()
            .group_of(id)
            .map(|g| g.key.clone())
            .expect("every visible section has a group");
        DraggableId::Group(key)
    } else {
        DraggableId::Section(id.clone())
    }
}

fn key_of(raw: u8) -> Key {
    match raw % 8 {
        0 => Key::Space,
        1 => Key::Enter,
        2 => Key::Escape,
        3 => Key::Up,
        4 => Key::Down,
        5 => Key::Left,
        6 => Key::Right,
        _ => Key::Tab,
    }
}

fuzz_target!(|input: Input| {
    if input.kinds.is_empty() || input.kinds.len() > 16 {
        return;
    }
    let sections: Vec<Section> = input
        .kinds
        .iter()
        .enumerate()
        .map(|(i, k)| Section::bare(format!("s{i}"), KINDS[usize::from(*k) % KINDS.len()], i))
        .collect();
    let mut board = SectionBoard::new(ResumeId::new("fuzz"), sections);
    layout(&mut board);
    let original = board.order().clone();
    let mut in_flight: Option<CommitRequest> = None;

    for op in input.ops.iter().take(256) {
        let event = match op {
            Op::Down { y, row, group } => Some(InputEvent::PointerDown {
                pos: Point::new(1, i32::from(*y)),
                handle: Some(handle(&board, *row, *group)),
            }),
            Op::Move { x, y } => Some(InputEvent::PointerMove {
                pos: Point::new(i32::from(*x), i32::from(*y)),
            }),
            Op::Up { y } => Some(InputEvent::PointerUp {
                pos: Point::new(1, i32::from(*y)),
            }),
            Op::Key { key, row, group } => Some(InputEvent::Key {
                key: key_of(*key),
                focused: Some(handle(&board, *row, *group)),
            }),
            Op::FocusLost => Some(InputEvent::FocusLost),
            Op::Reply { ok } => {
                if let Some(request) = in_flight.take() {
                    let result = if *ok {
                        Ok(())
                    } else {
                        Err(PersistError::Timeout)
                    };
                    in_flight = board.settle(CommitOutcome {
                        ticket: request.ticket,
                        result,
                    });
                    layout(&mut board);
                }
                None
            }
        };

        if let Some(event) = event
            && let Some(outcome) = board.handle_input(&event)
        {
            if let Some(request) = outcome.commit {
                assert!(in_flight.is_none(), "two commits in flight");
                in_flight = Some(request);
            }
            layout(&mut board);
        }

        assert!(board.order().same_members(&original));
        assert_eq!(board.is_committing(), in_flight.is_some());
        let _ = board.drain_notices();
    }
});
