#![forbid(unsafe_code)]

//! Render delegate: projects the local order into caller-rendered views.
//!
//! The delegate is a pure function of `(section, is_first_in_group)`. It never
//! sees drag state or order state, which is what keeps the drag overlay
//! identical to the in-list rendering: both go through the same call.
//!
//! # Invariants
//! 1. [`render_groups`] calls the delegate exactly once per section, in flat
//!    order.
//! 2. Exactly one section per group is rendered with
//!    `is_first_in_group = true`: the earliest in flat order.
//! 3. A title returned for a non-first section is discarded.

use regroup_core::drag::{ActiveDrag, DraggableId};
use regroup_core::group::{Group, GroupKey};
use regroup_core::order::LocalOrder;
use regroup_core::section::{Section, SectionId};

/// What the delegate returns for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView<T> {
    /// Group heading; only honoured for the first section of a group.
    pub title: Option<T>,
    pub content: T,
}

impl<T> SectionView<T> {
    #[must_use]
    pub fn new(content: T) -> Self {
        Self {
            title: None,
            content,
        }
    }

    #[must_use]
    pub fn with_title(title: T, content: T) -> Self {
        Self {
            title: Some(title),
            content,
        }
    }
}

/// Caller-supplied rendering of a single section.
pub trait RenderSection<D> {
    type Output;

    fn render_section(&self, section: &Section<D>, is_first_in_group: bool)
    -> SectionView<Self::Output>;
}

impl<D, T, F> RenderSection<D> for F
where
    F: Fn(&Section<D>, bool) -> SectionView<T>,
{
    type Output = T;

    fn render_section(&self, section: &Section<D>, is_first_in_group: bool) -> SectionView<T> {
        self(section, is_first_in_group)
    }
}

/// One rendered section, in list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection<T> {
    pub id: SectionId,
    pub is_first_in_group: bool,
    pub title: Option<T>,
    pub content: T,
}

/// One rendered group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGroup<T> {
    pub key: GroupKey,
    pub sections: Vec<RenderedSection<T>>,
}

impl<T> RenderedGroup<T> {
    /// The group heading, carried by its first section.
    #[must_use]
    pub fn title(&self) -> Option<&T> {
        self.sections.first().and_then(|s| s.title.as_ref())
    }
}

/// Drag proxy content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOverlay<T> {
    Item(RenderedSection<T>),
    Group(RenderedGroup<T>),
}

fn render_one<D, R>(delegate: &R, section: &Section<D>, is_first: bool) -> RenderedSection<R::Output>
where
    R: RenderSection<D> + ?Sized,
{
    let SectionView { title, content } = delegate.render_section(section, is_first);
    RenderedSection {
        id: section.id.clone(),
        is_first_in_group: is_first,
        title: if is_first { title } else { None },
        content,
    }
}

fn render_group<D, R>(local: &LocalOrder<D>, group: &Group, delegate: &R) -> RenderedGroup<R::Output>
where
    R: RenderSection<D> + ?Sized,
{
    let members = local.sections().get(group.range()).unwrap_or_default();
    RenderedGroup {
        key: group.key.clone(),
        sections: members
            .iter()
            .enumerate()
            .map(|(i, section)| render_one(delegate, section, i == 0))
            .collect(),
    }
}

/// Render every group of the visible (speculative) order.
pub fn render_groups<D, R>(local: &LocalOrder<D>, delegate: &R) -> Vec<RenderedGroup<R::Output>>
where
    R: RenderSection<D> + ?Sized,
{
    local
        .groups()
        .iter()
        .map(|group| render_group(local, group, delegate))
        .collect()
}

/// Render the proxy of an active drag through the same delegate.
///
/// Returns `None` when the origin is no longer part of the list.
pub fn render_overlay<D, R>(
    local: &LocalOrder<D>,
    active: &ActiveDrag,
    delegate: &R,
) -> Option<DragOverlay<R::Output>>
where
    R: RenderSection<D> + ?Sized,
{
    match &active.origin {
        DraggableId::Section(id) => {
            let section = local.section(id)?;
            let is_first = local.grouping().is_first_in_group(id);
            Some(DragOverlay::Item(render_one(delegate, section, is_first)))
        }
        DraggableId::Group(key) => {
            let grouping = local.grouping();
            let group = grouping.get(grouping.position_of_key(key)?)?;
            Some(DragOverlay::Group(render_group(local, group, delegate)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> LocalOrder {
        LocalOrder::new(vec![
            Section::bare("a1", "education", 0),
            Section::bare("a2", "education", 1),
            Section::bare("b1", "experience", 2),
        ])
    }

    /// Always proposes a title, so discarding is observable.
    fn eager(section: &Section, _first: bool) -> SectionView<String> {
        SectionView::with_title(section.kind.label().to_uppercase(), section.id.to_string())
    }

    #[test]
    fn titles_only_on_first_in_group() {
        let rendered = render_groups(&local(), &eager);
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].title().map(String::as_str), Some("EDUCATION"));
        assert_eq!(rendered[0].sections[1].title, None);
        assert!(!rendered[0].sections[1].is_first_in_group);
        assert_eq!(rendered[1].title().map(String::as_str), Some("EXPERIENCE"));
    }

    #[test]
    fn delegate_called_once_per_section_in_order() {
        let calls = std::cell::RefCell::new(Vec::new());
        let delegate = |section: &Section, first: bool| {
            calls.borrow_mut().push((section.id.to_string(), first));
            SectionView::new(())
        };
        render_groups(&local(), &delegate);
        assert_eq!(
            calls.into_inner(),
            [
                ("a1".to_string(), true),
                ("a2".to_string(), false),
                ("b1".to_string(), true),
            ]
        );
    }

    #[test]
    fn empty_list_renders_nothing() {
        let empty: LocalOrder = LocalOrder::new(Vec::new());
        assert!(render_groups(&empty, &eager).is_empty());
    }

    struct Counter;

    impl RenderSection<()> for Counter {
        type Output = usize;

        fn render_section(&self, section: &Section, _first: bool) -> SectionView<usize> {
            SectionView::new(section.index)
        }
    }

    #[test]
    fn trait_objects_and_structs_work_as_delegates() {
        let delegate: &dyn RenderSection<(), Output = usize> = &Counter;
        let rendered = render_groups(&local(), delegate);
        let contents: Vec<usize> = rendered
            .iter()
            .flat_map(|g| g.sections.iter().map(|s| s.content))
            .collect();
        assert_eq!(contents, [0, 1, 2]);
    }
}
