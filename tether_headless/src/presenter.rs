// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained view tree kept in memory.
//!
//! Mirrors what a platform presenter would do to native views: views are
//! attached under the screen or under another entity's view, and each carries
//! the visuals of its latest applied sync. World positions are computed the
//! way a compositor would: a view's translation is added to its parent's.

use core::fmt;

use kurbo::{Point, Vec2};
use log::warn;
use tether_core::backend::{Presenter, Visuals};
use tether_core::entity::{Anchor, EntityId};

/// One native view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct View {
    /// Where the view is attached, if anywhere.
    pub parent: Option<Anchor>,
    /// Visuals of the latest applied sync.
    pub visuals: Option<Visuals>,
    /// Number of applied syncs.
    pub applied: u64,
}

/// Operation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresenterStats {
    /// Calls to [`Presenter::attach`].
    pub attaches: u64,
    /// Calls to [`Presenter::detach`].
    pub detaches: u64,
    /// Calls to [`Presenter::apply`].
    pub applies: u64,
}

/// A [`Presenter`] backed by plain vectors.
///
/// Views are stored by entity slot index. Children keep attach order, the
/// same order a native view group would paint them in.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    views: Vec<Option<View>>,
    screen_children: Vec<EntityId>,
    entity_children: Vec<Vec<EntityId>>,
    stats: PresenterStats,
}

impl HeadlessPresenter {
    /// Creates an empty presenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view of an entity, if it was ever attached.
    #[must_use]
    pub fn view(&self, id: EntityId) -> Option<&View> {
        self.views
            .get(id.index() as usize)
            .and_then(|slot| slot.as_ref())
    }

    /// Returns the visuals of the latest applied sync of an entity.
    #[must_use]
    pub fn visuals(&self, id: EntityId) -> Option<Visuals> {
        self.view(id).and_then(|view| view.visuals)
    }

    /// Returns whether the entity's view is in the tree.
    #[must_use]
    pub fn is_attached(&self, id: EntityId) -> bool {
        self.view(id).is_some_and(|view| view.parent.is_some())
    }

    /// Returns the views attached directly under `parent`, in attach order.
    #[must_use]
    pub fn children(&self, parent: Anchor) -> &[EntityId] {
        match parent {
            Anchor::Screen => &self.screen_children,
            Anchor::Entity(id) => self
                .entity_children
                .get(id.index() as usize)
                .map_or(&[], Vec::as_slice),
        }
    }

    /// Returns the number of attached views.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.views
            .iter()
            .flatten()
            .filter(|view| view.parent.is_some())
            .count()
    }

    /// Returns the operation counters.
    #[must_use]
    pub fn stats(&self) -> PresenterStats {
        self.stats
    }

    /// Returns the presented top-left corner of an entity's view in screen
    /// space, or `None` if the view (or an ancestor view) is detached.
    ///
    /// This is the sum of the applied translations from the view up to the
    /// screen, so it is in scaled units.
    #[must_use]
    pub fn world_origin(&self, id: EntityId) -> Option<Point> {
        let mut origin = Vec2::ZERO;
        let mut current = id;
        for _ in 0..=self.views.len() {
            let view = self.view(current)?;
            origin += view.visuals?.transform.translation();
            match view.parent? {
                Anchor::Screen => return Some(origin.to_point()),
                Anchor::Entity(parent) => current = parent,
            }
        }
        warn!(entity:? = id; "view tree contains a cycle");
        None
    }

    /// Returns a displayable dump of the attached tree.
    #[must_use]
    pub fn dump(&self) -> TreeDump<'_> {
        TreeDump { presenter: self }
    }

    fn slot_mut(&mut self, id: EntityId) -> &mut View {
        let idx = id.index() as usize;
        if self.views.len() <= idx {
            self.views.resize_with(idx + 1, || None);
        }
        self.views[idx].get_or_insert_with(View::default)
    }

    fn children_mut(&mut self, parent: Anchor) -> &mut Vec<EntityId> {
        match parent {
            Anchor::Screen => &mut self.screen_children,
            Anchor::Entity(id) => {
                let idx = id.index() as usize;
                if self.entity_children.len() <= idx {
                    self.entity_children.resize_with(idx + 1, Vec::new);
                }
                &mut self.entity_children[idx]
            }
        }
    }
}

impl Presenter for HeadlessPresenter {
    fn parent(&self, id: EntityId) -> Option<Anchor> {
        self.view(id).and_then(|view| view.parent)
    }

    fn attach(&mut self, id: EntityId, parent: Anchor) {
        self.stats.attaches += 1;
        let view = self.slot_mut(id);
        debug_assert!(view.parent.is_none(), "attach of an attached view");
        view.parent = Some(parent);
        self.children_mut(parent).push(id);
    }

    fn detach(&mut self, id: EntityId) {
        self.stats.detaches += 1;
        let Some(parent) = self.slot_mut(id).parent.take() else {
            return;
        };
        let siblings = self.children_mut(parent);
        if let Some(pos) = siblings.iter().position(|&child| child == id) {
            siblings.remove(pos);
        }
    }

    fn apply(&mut self, id: EntityId, visuals: &Visuals) {
        self.stats.applies += 1;
        if !visuals.transform.is_finite() {
            warn!(entity:? = id; "non-finite transform applied");
        }
        let view = self.slot_mut(id);
        view.visuals = Some(*visuals);
        view.applied += 1;
    }
}

/// Text rendering of a [`HeadlessPresenter`] tree, one view per line.
///
/// Created by [`HeadlessPresenter::dump`].
#[derive(Debug)]
pub struct TreeDump<'a> {
    presenter: &'a HeadlessPresenter,
}

impl TreeDump<'_> {
    fn write_children(
        &self,
        f: &mut fmt::Formatter<'_>,
        parent: Anchor,
        depth: usize,
    ) -> fmt::Result {
        // Each view has one parent, so a loop never hangs off the screen.
        for &child in self.presenter.children(parent) {
            write!(f, "{:indent$}{child:?}", "", indent = depth * 2)?;
            if let Some(visuals) = self.presenter.visuals(child) {
                let t = visuals.transform.translation();
                write!(
                    f,
                    " at ({:.1}, {:.1}) z={:.1} alpha={:.2}",
                    t.x,
                    t.y,
                    visuals.transform.elevation(),
                    visuals.alpha
                )?;
            }
            writeln!(f)?;
            self.write_children(f, Anchor::Entity(child), depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Screen")?;
        self.write_children(f, Anchor::Screen, 1)
    }
}
