#![forbid(unsafe_code)]

//! Local order state: the optimistic copy of the section list.
//!
//! [`OrderState`] is the explicit two-state value `{confirmed, speculative}`.
//! `speculative` is what the user sees; `confirmed` is the last order the
//! server accepted. [`LocalOrder`] materializes the speculative order as a
//! section list plus its [`Grouping`].
//!
//! # Invariants
//! 1. `sections` is always a permutation of the ids in `confirmed`.
//! 2. `sections[i].index == i` after every mutation.
//! 3. After [`LocalOrder::reorder_within_group`] or
//!    [`LocalOrder::reorder_groups`], regrouping reproduces the same group
//!    memberships (modulo two equal-kind groups merging when a group move
//!    makes them adjacent).
//! 4. Failed operations leave every field untouched.

use std::ops::Deref;

use ahash::AHashMap;

use crate::error::{ReorderError, Result};
use crate::group::{Group, Grouping};
use crate::section::{Section, SectionId, dedup_sections};

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// A flattened id sequence: the unit of commit and rollback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Order(Vec<SectionId>);

impl Order {
    #[must_use]
    pub fn new(ids: Vec<SectionId>) -> Self {
        Self(ids)
    }

    #[must_use]
    pub fn of<D>(sections: &[Section<D>]) -> Self {
        sections.iter().map(|s| s.id.clone()).collect()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SectionId] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<SectionId> {
        self.0
    }

    /// Whether both orders contain exactly the same ids, ignoring position.
    #[must_use]
    pub fn same_members(&self, other: &Self) -> bool {
        if self.0.len() != other.0.len() {
            return false;
        }
        let mut ours: Vec<&SectionId> = self.0.iter().collect();
        let mut theirs: Vec<&SectionId> = other.0.iter().collect();
        ours.sort_unstable();
        theirs.sort_unstable();
        ours == theirs
    }
}

impl Deref for Order {
    type Target = [SectionId];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<SectionId> for Order {
    fn from_iter<I: IntoIterator<Item = SectionId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<S: Into<SectionId>> From<Vec<S>> for Order {
    fn from(ids: Vec<S>) -> Self {
        ids.into_iter().map(Into::into).collect()
    }
}

// ---------------------------------------------------------------------------
// Array move
// ---------------------------------------------------------------------------

/// Move the element at `from` so it ends up at `to`, shifting the elements in
/// between by one. Out-of-range positions leave the slice untouched and
/// return `false`.
pub fn array_move<T>(items: &mut [T], from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else if to < from {
        items[to..=from].rotate_right(1);
    }
    true
}

// ---------------------------------------------------------------------------
// OrderState
// ---------------------------------------------------------------------------

/// Confirmed and speculative orders for one list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderState {
    confirmed: Order,
    speculative: Order,
}

impl OrderState {
    /// Start from a server-confirmed order.
    #[must_use]
    pub fn confirmed_at(order: Order) -> Self {
        Self {
            speculative: order.clone(),
            confirmed: order,
        }
    }

    #[inline]
    #[must_use]
    pub fn confirmed(&self) -> &Order {
        &self.confirmed
    }

    #[inline]
    #[must_use]
    pub fn speculative(&self) -> &Order {
        &self.speculative
    }

    /// True when the visible order has not been accepted by the server yet.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.confirmed != self.speculative
    }

    /// Record an optimistic change.
    pub fn apply(&mut self, order: Order) {
        self.speculative = order;
    }

    /// Record a server acceptance. Leaves the speculative order alone: a newer
    /// gesture may already be showing.
    pub fn confirm(&mut self, order: Order) {
        self.confirmed = order;
    }

    /// Discard the optimistic change and return the order now visible.
    pub fn rollback(&mut self) -> &Order {
        self.speculative = self.confirmed.clone();
        &self.speculative
    }
}

// ---------------------------------------------------------------------------
// LocalOrder
// ---------------------------------------------------------------------------

/// The engine's mutable copy of the section list.
#[derive(Debug, Clone)]
pub struct LocalOrder<D = ()> {
    sections: Vec<Section<D>>,
    grouping: Grouping,
    state: OrderState,
}

impl<D> Default for LocalOrder<D> {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            grouping: Grouping::default(),
            state: OrderState::default(),
        }
    }
}

impl<D> LocalOrder<D> {
    /// Adopt a server-supplied list as the confirmed baseline.
    #[must_use]
    pub fn new(mut sections: Vec<Section<D>>) -> Self {
        dedup_sections(&mut sections);
        reindex(&mut sections);
        let grouping = Grouping::build(&sections);
        let state = OrderState::confirmed_at(Order::of(&sections));
        Self {
            sections,
            grouping,
            state,
        }
    }

    #[inline]
    #[must_use]
    pub fn sections(&self) -> &[Section<D>] {
        &self.sections
    }

    #[inline]
    #[must_use]
    pub fn grouping(&self) -> &Grouping {
        &self.grouping
    }

    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        self.grouping.groups()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &OrderState {
        &self.state
    }

    /// The order currently shown.
    #[inline]
    #[must_use]
    pub fn order(&self) -> &Order {
        self.state.speculative()
    }

    #[inline]
    #[must_use]
    pub fn confirmed(&self) -> &Order {
        self.state.confirmed()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&Section<D>> {
        self.grouping
            .locate(id)
            .and_then(|(g, member)| self.grouping.get(g).map(|group| group.start + member))
            .and_then(|flat| self.sections.get(flat))
    }

    /// Move one section within its group.
    ///
    /// Returns the new flat order. Does not touch group order or any other
    /// group's membership.
    pub fn reorder_within_group(
        &mut self,
        group_index: usize,
        from: usize,
        to: usize,
    ) -> Result<Order> {
        let group = self
            .grouping
            .get(group_index)
            .ok_or(ReorderError::GroupOutOfBounds {
                index: group_index,
                len: self.grouping.len(),
            })?;
        let range = group.range();
        for position in [from, to] {
            if position >= range.len() {
                return Err(ReorderError::PositionOutOfBounds {
                    position,
                    len: range.len(),
                });
            }
        }

        array_move(&mut self.sections[range], from, to);
        tracing::trace!(
            target: "regroup.order",
            group = group_index,
            from,
            to,
            "reordered within group"
        );
        Ok(self.settle())
    }

    /// Move a whole group, as one block, to a new position among groups.
    pub fn reorder_groups(&mut self, from: usize, to: usize) -> Result<Order> {
        let len = self.grouping.len();
        for index in [from, to] {
            if index >= len {
                return Err(ReorderError::GroupOutOfBounds { index, len });
            }
        }

        let groups = self.grouping.groups();
        let moved = groups[from].len();
        if from < to {
            let span = groups[from].start..groups[to].range().end;
            self.sections[span].rotate_left(moved);
        } else if to < from {
            let span = groups[to].start..groups[from].range().end;
            self.sections[span].rotate_right(moved);
        }
        tracing::trace!(target: "regroup.order", from, to, "reordered groups");
        Ok(self.settle())
    }

    /// Rearrange the visible list to match `order`.
    ///
    /// `order` must be a permutation of the current ids.
    pub fn apply_order(&mut self, order: &Order) -> Result<()> {
        if order.len() != self.sections.len() {
            let missing = self
                .sections
                .iter()
                .find(|s| !order.contains(&s.id))
                .map(|s| s.id.clone())
                .or_else(|| order.first().cloned())
                .unwrap_or_else(|| SectionId::new(""));
            return Err(ReorderError::UnknownSection(missing));
        }

        let positions: AHashMap<&SectionId, usize> = self
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| (&s.id, i))
            .collect();
        let mut permutation = Vec::with_capacity(order.len());
        let mut seen = vec![false; order.len()];
        for id in order.iter() {
            let &position = positions
                .get(id)
                .ok_or_else(|| ReorderError::UnknownSection(id.clone()))?;
            if std::mem::replace(&mut seen[position], true) {
                return Err(ReorderError::UnknownSection(id.clone()));
            }
            permutation.push(position);
        }

        let current = std::mem::take(&mut self.sections);
        let mut slots: Vec<Option<Section<D>>> = current.into_iter().map(Some).collect();
        self.sections = permutation
            .into_iter()
            .filter_map(|position| slots[position].take())
            .collect();
        self.settle();
        Ok(())
    }

    /// Record a server acceptance of `order`.
    pub fn confirm(&mut self, order: Order) {
        self.state.confirm(order);
    }

    /// Revert the visible list to the confirmed order.
    pub fn rollback(&mut self) -> Result<Order> {
        let confirmed = self.state.confirmed().clone();
        self.apply_order(&confirmed)?;
        Ok(confirmed)
    }

    /// Replace payloads and kinds for ids already present, keeping the current
    /// order. Unknown ids are ignored.
    pub fn refresh(&mut self, incoming: Vec<Section<D>>) {
        let mut by_id: AHashMap<SectionId, Section<D>> =
            incoming.into_iter().map(|s| (s.id.clone(), s)).collect();
        for section in &mut self.sections {
            if let Some(fresh) = by_id.remove(&section.id) {
                section.kind = fresh.kind;
                section.data = fresh.data;
            }
        }
        self.grouping = Grouping::build(&self.sections);
    }

    /// Reindex, regroup and record the visible order as speculative.
    fn settle(&mut self) -> Order {
        reindex(&mut self.sections);
        self.grouping = Grouping::build(&self.sections);
        let order = Order::of(&self.sections);
        self.state.apply(order.clone());
        order
    }
}

fn reindex<D>(sections: &mut [Section<D>]) {
    for (i, section) in sections.iter_mut().enumerate() {
        section.index = i;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(rows: &[(&str, &str)]) -> LocalOrder {
        LocalOrder::new(
            rows.iter()
                .enumerate()
                .map(|(i, (id, kind))| Section::bare(*id, *kind, i))
                .collect(),
        )
    }

    fn ids(order: &Order) -> Vec<&str> {
        order.iter().map(SectionId::as_str).collect()
    }

    #[test]
    fn array_move_forward_and_back() {
        let mut v = vec![1, 2, 3, 4];
        assert!(array_move(&mut v, 0, 2));
        assert_eq!(v, [2, 3, 1, 4]);
        assert!(array_move(&mut v, 3, 0));
        assert_eq!(v, [4, 2, 3, 1]);
        assert!(array_move(&mut v, 1, 1));
        assert_eq!(v, [4, 2, 3, 1]);
        assert!(!array_move(&mut v, 4, 0));
    }

    #[test]
    fn within_group_moves_only_members() {
        let mut order = local(&[
            ("a1", "education"),
            ("a2", "education"),
            ("b1", "experience"),
        ]);
        let new = order.reorder_within_group(0, 1, 0).unwrap();
        assert_eq!(ids(&new), ["a2", "a1", "b1"]);
        assert_eq!(order.sections()[0].index, 0);
        assert_eq!(order.sections()[1].id.as_str(), "a1");
        assert_eq!(order.sections()[1].index, 1);
        assert!(order.state().is_dirty());
    }

    #[test]
    fn group_move_forward() {
        let mut order = local(&[
            ("a1", "education"),
            ("a2", "education"),
            ("b1", "experience"),
        ]);
        let new = order.reorder_groups(0, 1).unwrap();
        assert_eq!(ids(&new), ["b1", "a1", "a2"]);
        assert_eq!(order.groups().len(), 2);
        assert_eq!(order.groups()[1].len(), 2);
    }

    #[test]
    fn group_move_backward_across_several() {
        let mut order = local(&[
            ("a", "summary"),
            ("b1", "skill"),
            ("b2", "skill"),
            ("c", "award"),
            ("d1", "project"),
            ("d2", "project"),
        ]);
        let new = order.reorder_groups(3, 1).unwrap();
        assert_eq!(ids(&new), ["a", "d1", "d2", "b1", "b2", "c"]);
    }

    #[test]
    fn out_of_range_leaves_state_untouched() {
        let mut order = local(&[("a", "skill"), ("b", "skill")]);
        let before = order.order().clone();
        assert_eq!(
            order.reorder_within_group(0, 0, 5),
            Err(ReorderError::PositionOutOfBounds { position: 5, len: 2 })
        );
        assert_eq!(
            order.reorder_groups(0, 3),
            Err(ReorderError::GroupOutOfBounds { index: 3, len: 1 })
        );
        assert_eq!(order.order(), &before);
        assert!(!order.state().is_dirty());
    }

    #[test]
    fn rollback_restores_confirmed() {
        let mut order = local(&[("a", "skill"), ("b", "skill"), ("c", "award")]);
        order.reorder_within_group(0, 0, 1).unwrap();
        let restored = order.rollback().unwrap();
        assert_eq!(ids(&restored), ["a", "b", "c"]);
        assert_eq!(order.sections()[0].id.as_str(), "a");
        assert!(!order.state().is_dirty());
    }

    #[test]
    fn apply_order_rejects_foreign_ids() {
        let mut order = local(&[("a", "skill"), ("b", "skill")]);
        let err = order.apply_order(&Order::from(vec!["a", "zz"])).unwrap_err();
        assert_eq!(err, ReorderError::UnknownSection("zz".into()));
        assert!(order.apply_order(&Order::from(vec!["a"])).is_err());
    }

    #[test]
    fn refresh_keeps_order_and_regroups() {
        let mut order = local(&[("a", "skill"), ("b", "skill")]);
        order.reorder_within_group(0, 0, 1).unwrap();
        order.refresh(vec![Section::bare("a", "award", 0), Section::bare("b", "skill", 1)]);
        assert_eq!(ids(order.order()), ["b", "a"]);
        assert_eq!(order.groups().len(), 2);
    }

    #[test]
    fn same_members_ignores_position() {
        let a = Order::from(vec!["x", "y"]);
        assert!(a.same_members(&Order::from(vec!["y", "x"])));
        assert!(!a.same_members(&Order::from(vec!["y", "z"])));
    }

    #[test]
    fn section_lookup_follows_order() {
        let mut order = local(&[("a", "skill"), ("b", "skill")]);
        order.reorder_within_group(0, 0, 1).unwrap();
        assert_eq!(order.section(&"a".into()).map(|s| s.index), Some(1));
    }
}
