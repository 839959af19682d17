#![no_main]

use libfuzzer_sys::fuzz_target;
use regroup_core::{LocalOrder, Order, Section};

const KINDS: [&str; 6] = ["skill", "project", "experience", "education", "hobby", "custom"];

fuzz_target!(|data: &[u8]| {
    // First byte: section count (1..=24). Next `count` bytes: kinds.
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let count = usize::from(count % 24) + 1;
    if rest.len() < count {
        return;
    }
    let (kinds, ops) = rest.split_at(count);

    let sections: Vec<Section> = kinds
        .iter()
        .enumerate()
        .map(|(i, k)| Section::bare(format!("s{i}"), KINDS[usize::from(*k) % KINDS.len()], i))
        .collect();
    let mut local = LocalOrder::new(sections);
    let original = local.order().clone();

    for op in ops.chunks_exact(3) {
        let groups = local.groups().len();
        let result = if op[0] & 1 == 0 {
            let g = usize::from(op[0] >> 1) % groups;
            let len = local.groups()[g].len();
            local.reorder_within_group(g, usize::from(op[1]) % len, usize::from(op[2]) % len)
        } else {
            local.reorder_groups(usize::from(op[1]) % groups, usize::from(op[2]) % groups)
        };
        let order = result.expect("in-bounds reorder must succeed");

        assert!(order.same_members(&original), "reorder lost or duplicated a section");
        assert_eq!(&order, local.order());

        // Groups tile the visible order and never coalesce neighbours.
        let flat: Order = local
            .groups()
            .iter()
            .flat_map(|g| g.section_ids.iter().cloned())
            .collect();
        assert_eq!(&flat, local.order());
        for pair in local.groups().windows(2) {
            assert!(pair[0].range().end == pair[1].start);
            assert!(!pair[0].kind().coalesces_with(pair[1].kind()));
        }
    }

    // Rollback always restores the confirmed order.
    let restored = local.rollback().expect("rollback to a permutation");
    assert_eq!(restored, original);
});
