#![forbid(unsafe_code)]

//! Grouping engine: partitions a flat section list into contiguous runs.
//!
//! A [`Group`] is a derived view, never persisted. It is rebuilt from the flat
//! order on every pass, which is what keeps two same-kind groups from ever
//! sitting next to each other: adjacency simply re-merges them.
//!
//! # Invariants
//! 1. Deterministic and total: the same input always yields the same groups,
//!    and every input (including an empty one) yields a result.
//! 2. Sections at positions `i` and `i + 1` share a group iff their kinds
//!    coalesce ([`SectionType::coalesces_with`]).
//! 3. Concatenating the groups' members reproduces the input order exactly.
//! 4. Only contiguous runs merge. A kind that reappears later in the list
//!    starts a fresh group with the next ordinal.

use std::fmt;
use std::ops::Range;

use ahash::AHashMap;

use crate::section::{Section, SectionId, SectionType};

// ---------------------------------------------------------------------------
// GroupKey
// ---------------------------------------------------------------------------

/// Synthetic address of a group: its kind plus how many earlier groups share
/// that kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub kind: SectionType,
    pub ordinal: usize,
}

impl GroupKey {
    #[must_use]
    pub const fn new(kind: SectionType, ordinal: usize) -> Self {
        Self { kind, ordinal }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.label(), self.ordinal)
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A contiguous run of same-kind sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: GroupKey,
    /// Flat position of the first member.
    pub start: usize,
    pub section_ids: Vec<SectionId>,
}

impl Group {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &SectionType {
        &self.key.kind
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.section_ids.len()
    }

    /// Groups are never empty once built; provided for API symmetry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.section_ids.is_empty()
    }

    /// Flat positions covered by this group.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.section_ids.len()
    }

    /// The section that carries the group title.
    #[must_use]
    pub fn first(&self) -> Option<&SectionId> {
        self.section_ids.first()
    }

    #[must_use]
    pub fn contains(&self, id: &SectionId) -> bool {
        self.section_ids.contains(id)
    }
}

// ---------------------------------------------------------------------------
// Grouping functions
// ---------------------------------------------------------------------------

/// Group an ordered section list.
#[must_use]
pub fn group<D>(sections: &[Section<D>]) -> Vec<Group> {
    group_entries(sections.iter().map(|s| (&s.id, &s.kind)))
}

/// Group bare `(id, kind)` entries in iteration order.
pub fn group_entries<'a, I>(entries: I) -> Vec<Group>
where
    I: IntoIterator<Item = (&'a SectionId, &'a SectionType)>,
{
    let mut groups: Vec<Group> = Vec::new();
    let mut ordinals: AHashMap<SectionType, usize> = AHashMap::new();

    for (position, (id, kind)) in entries.into_iter().enumerate() {
        if let Some(current) = groups.last_mut()
            && current.key.kind.coalesces_with(kind)
        {
            current.section_ids.push(id.clone());
            continue;
        }

        let ordinal = ordinals.entry(kind.clone()).or_insert(0);
        groups.push(Group {
            key: GroupKey::new(kind.clone(), *ordinal),
            start: position,
            section_ids: vec![id.clone()],
        });
        *ordinal += 1;
    }

    groups
}

// ---------------------------------------------------------------------------
// Grouping (indexed view)
// ---------------------------------------------------------------------------

/// Groups plus an id index for O(1) lookups during drags and render passes.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    groups: Vec<Group>,
    /// id -> (group index, member index)
    positions: AHashMap<SectionId, (usize, usize)>,
}

impl Grouping {
    /// Build the indexed view over an ordered section list.
    #[must_use]
    pub fn build<D>(sections: &[Section<D>]) -> Self {
        Self::from_groups(group(sections))
    }

    #[must_use]
    pub fn from_groups(groups: Vec<Group>) -> Self {
        let mut positions = AHashMap::with_capacity(groups.iter().map(Group::len).sum());
        for (group_index, group) in groups.iter().enumerate() {
            for (member, id) in group.section_ids.iter().enumerate() {
                positions.insert(id.clone(), (group_index, member));
            }
        }
        Self { groups, positions }
    }

    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn get(&self, group_index: usize) -> Option<&Group> {
        self.groups.get(group_index)
    }

    /// `(group index, member index)` of a section.
    #[must_use]
    pub fn locate(&self, id: &SectionId) -> Option<(usize, usize)> {
        self.positions.get(id).copied()
    }

    #[must_use]
    pub fn group_of(&self, id: &SectionId) -> Option<&Group> {
        self.locate(id).and_then(|(g, _)| self.groups.get(g))
    }

    #[must_use]
    pub fn position_of_key(&self, key: &GroupKey) -> Option<usize> {
        self.groups.iter().position(|g| &g.key == key)
    }

    /// True only for the earliest member of its group.
    #[must_use]
    pub fn is_first_in_group(&self, id: &SectionId) -> bool {
        matches!(self.locate(id), Some((_, 0)))
    }

    #[must_use]
    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}
