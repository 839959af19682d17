#![forbid(unsafe_code)]

//! Drop zones and closest-center collision detection.
//!
//! Hosts register one [`DropZone`] per rendered section and per rendered
//! group after layout. While a drag is active, the zone whose center lies
//! nearest the dragged proxy's center is the drop target.
//!
//! # Scoping
//! Candidates are filtered by [`CollisionScope`] before distances are
//! measured: an item drag only sees section zones of its own group, and a
//! group drag only sees group zones. Without this, a single-item drag could
//! resolve to a group zone and be read as a group reorder, or an item could
//! be dropped into a group of another kind.

use crate::drag::{DragKind, DraggableId};
use crate::geometry::Rect;
use crate::group::GroupKey;
use crate::section::SectionId;

/// A registered droppable region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropZone {
    pub id: DraggableId,
    pub rect: Rect,
    /// Owning group for section zones; `None` for group zones.
    pub scope: Option<GroupKey>,
}

impl DropZone {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> DragKind {
        self.id.kind()
    }
}

/// Which zones a drag may collide with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionScope {
    pub kind: DragKind,
    /// Restricts section zones to one group.
    pub group: Option<GroupKey>,
}

impl CollisionScope {
    #[must_use]
    pub fn admits(&self, zone: &DropZone) -> bool {
        zone.kind() == self.kind
            && match (&self.group, self.kind) {
                (Some(group), DragKind::Item) => zone.scope.as_ref() == Some(group),
                _ => true,
            }
    }
}

/// All drop zones of one list, in registration order.
#[derive(Debug, Clone, Default)]
pub struct DropZones {
    zones: Vec<DropZone>,
    container: Option<Rect>,
}

impl DropZones {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every zone (call before re-registering after a layout pass).
    pub fn clear(&mut self) {
        self.zones.clear();
        self.container = None;
    }

    /// Set the list container bounds used by movement constraints.
    pub fn set_container(&mut self, rect: Rect) {
        self.container = Some(rect);
    }

    #[must_use]
    pub fn container(&self) -> Option<Rect> {
        self.container
    }

    /// Register (or move) the zone of one section.
    pub fn register_section(&mut self, id: SectionId, group: GroupKey, rect: Rect) {
        self.upsert(DropZone {
            id: DraggableId::Section(id),
            rect,
            scope: Some(group),
        });
    }

    /// Register (or move) the zone of one group.
    pub fn register_group(&mut self, key: GroupKey, rect: Rect) {
        self.upsert(DropZone {
            id: DraggableId::Group(key),
            rect,
            scope: None,
        });
    }

    #[must_use]
    pub fn get(&self, id: &DraggableId) -> Option<&DropZone> {
        self.zones.iter().find(|zone| &zone.id == id)
    }

    #[must_use]
    pub fn rect_of(&self, id: &DraggableId) -> Option<Rect> {
        self.get(id).map(|zone| zone.rect)
    }

    /// Zones admitted by `scope`, in registration order.
    pub fn candidates<'a>(&'a self, scope: &'a CollisionScope) -> impl Iterator<Item = &'a DropZone> {
        self.zones.iter().filter(move |zone| scope.admits(zone))
    }

    /// Candidates sorted top-to-bottom (then left-to-right), for keyboard
    /// navigation.
    #[must_use]
    pub fn sorted_candidates<'a>(&'a self, scope: &'a CollisionScope) -> Vec<&'a DropZone> {
        let mut out: Vec<&DropZone> = self.candidates(scope).collect();
        out.sort_by_key(|zone| (zone.rect.y, zone.rect.x));
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    fn upsert(&mut self, zone: DropZone) {
        match self.zones.iter_mut().find(|z| z.id == zone.id) {
            Some(existing) => *existing = zone,
            None => self.zones.push(zone),
        }
    }
}

/// Closest-center strategy: the admitted zone whose center is nearest the
/// center of `active`. Ties go to the earliest registered zone.
#[must_use]
pub fn closest_center<'a>(
    active: Rect,
    zones: &'a DropZones,
    scope: &CollisionScope,
) -> Option<&'a DropZone> {
    zones
        .zones
        .iter()
        .filter(|zone| scope.admits(zone))
        .min_by_key(|zone| active.center_distance_sq(&zone.rect))
}
