//! Property-based invariant tests for grouping and local order state.
//!
//! 1. Grouping is deterministic
//! 2. Concatenated group members reproduce the input order
//! 3. Adjacent groups never coalesce
//! 4. Exactly one first-in-group section per group
//! 5. Item reorder keeps every group's membership and key
//! 6. Group reorder keeps each moved group contiguous and in member order
//! 7. `from == to` is a no-op and leaves the state clean
//! 8. Rollback after any sequence of reorders restores the confirmed order
//! 9. Indices stay dense after every mutation

use regroup_core::group::{Grouping, group};
use regroup_core::order::{LocalOrder, Order};
use regroup_core::section::{Section, SectionId};
use proptest::prelude::*;
use proptest::sample::Index;

// ── Strategies ──────────────────────────────────────────────────────────

const KINDS: &[&str] = &[
    "experience",
    "education",
    "skill",
    "project",
    "award",
    "mystery",
];

fn sections_strategy() -> impl Strategy<Value = Vec<Section>> {
    prop::collection::vec(0..KINDS.len(), 0..24).prop_map(|kinds| {
        kinds
            .into_iter()
            .enumerate()
            .map(|(i, k)| Section::bare(format!("s{i}"), KINDS[k], i))
            .collect()
    })
}

fn non_empty_sections() -> impl Strategy<Value = Vec<Section>> {
    sections_strategy().prop_filter("need at least one section", |s| !s.is_empty())
}

#[derive(Debug, Clone)]
enum Op {
    Items(Index, Index, Index),
    Groups(Index, Index),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<Index>(), any::<Index>(), any::<Index>()).prop_map(|(g, a, b)| Op::Items(g, a, b)),
        (any::<Index>(), any::<Index>()).prop_map(|(a, b)| Op::Groups(a, b)),
    ]
}

fn apply(local: &mut LocalOrder, op: &Op) {
    let groups = local.groups().len();
    if groups == 0 {
        return;
    }
    let result = match op {
        Op::Items(g, a, b) => {
            let g = g.index(groups);
            let len = local.groups()[g].len();
            local.reorder_within_group(g, a.index(len), b.index(len))
        }
        Op::Groups(a, b) => local.reorder_groups(a.index(groups), b.index(groups)),
    };
    assert!(result.is_ok(), "in-range reorder failed: {result:?}");
}

fn ids(sections: &[Section]) -> Vec<SectionId> {
    sections.iter().map(|s| s.id.clone()).collect()
}

// ── Grouping ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn grouping_is_deterministic(sections in sections_strategy()) {
        prop_assert_eq!(group(&sections), group(&sections));
    }

    #[test]
    fn groups_concatenate_to_input(sections in sections_strategy()) {
        let flat: Vec<SectionId> = group(&sections)
            .into_iter()
            .flat_map(|g| g.section_ids)
            .collect();
        prop_assert_eq!(flat, ids(&sections));
    }

    #[test]
    fn adjacent_groups_never_coalesce(sections in sections_strategy()) {
        let groups = group(&sections);
        for pair in groups.windows(2) {
            prop_assert!(!pair[0].kind().coalesces_with(pair[1].kind()));
        }
    }

    #[test]
    fn one_first_per_group(sections in sections_strategy()) {
        let grouping = Grouping::build(&sections);
        let firsts: Vec<&SectionId> = sections
            .iter()
            .map(|s| &s.id)
            .filter(|id| grouping.is_first_in_group(id))
            .collect();
        prop_assert_eq!(firsts.len(), grouping.len());
        for (first, g) in firsts.iter().zip(grouping.groups()) {
            prop_assert_eq!(Some(*first), g.first());
        }
    }
}

// ── Local order ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn item_reorder_preserves_membership(
        sections in non_empty_sections(),
        g in any::<Index>(),
        a in any::<Index>(),
        b in any::<Index>(),
    ) {
        let mut local = LocalOrder::new(sections);
        let before = local.groups().to_vec();
        let g = g.index(before.len());
        let len = before[g].len();
        local.reorder_within_group(g, a.index(len), b.index(len)).unwrap();

        let after = local.groups();
        prop_assert_eq!(after.len(), before.len());
        for (old, new) in before.iter().zip(after) {
            prop_assert_eq!(&old.key, &new.key);
            let mut old_ids = old.section_ids.clone();
            let mut new_ids = new.section_ids.clone();
            old_ids.sort();
            new_ids.sort();
            prop_assert_eq!(old_ids, new_ids);
        }
    }

    #[test]
    fn group_reorder_keeps_blocks_contiguous(
        sections in non_empty_sections(),
        a in any::<Index>(),
        b in any::<Index>(),
    ) {
        let mut local = LocalOrder::new(sections);
        let before = local.groups().to_vec();
        let order = local
            .reorder_groups(a.index(before.len()), b.index(before.len()))
            .unwrap();

        prop_assert!(order.same_members(local.confirmed()));
        for old in &before {
            let start = order
                .iter()
                .position(|id| Some(id) == old.first())
                .unwrap();
            prop_assert_eq!(&order[start..start + old.len()], old.section_ids.as_slice());
        }
    }

    #[test]
    fn same_position_is_noop(sections in non_empty_sections(), g in any::<Index>(), p in any::<Index>()) {
        let mut local = LocalOrder::new(sections);
        let original = local.order().clone();
        let groups = local.groups().len();
        let g = g.index(groups);
        let len = local.groups()[g].len();
        let p_item = p.index(len);

        prop_assert_eq!(&local.reorder_within_group(g, p_item, p_item).unwrap(), &original);
        prop_assert_eq!(&local.reorder_groups(g, g).unwrap(), &original);
        prop_assert!(!local.state().is_dirty());
    }

    #[test]
    fn rollback_restores_confirmed(
        sections in sections_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..16),
    ) {
        let mut local = LocalOrder::new(sections);
        let confirmed: Order = local.confirmed().clone();
        for op in &ops {
            apply(&mut local, op);
        }
        let restored = local.rollback().unwrap();
        prop_assert_eq!(&restored, &confirmed);
        prop_assert_eq!(Order::of(local.sections()), confirmed);
        prop_assert!(!local.state().is_dirty());
    }

    #[test]
    fn indices_stay_dense(
        sections in sections_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..16),
    ) {
        let mut local = LocalOrder::new(sections);
        for op in &ops {
            apply(&mut local, op);
            for (i, section) in local.sections().iter().enumerate() {
                prop_assert_eq!(section.index, i);
            }
            prop_assert_eq!(&Order::of(local.sections()), local.order());
        }
    }
}
