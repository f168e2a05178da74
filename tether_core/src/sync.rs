// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-flight sync scheduling.
//!
//! Every entity has a `sync_pending` flag. Requesting a sync flips it from
//! `false` to `true` and posts one task to the render queue; while it is
//! `true`, further requests are absorbed. The task clears the flag *before*
//! reading any state, so a write that races with a running sync schedules
//! exactly one follow-up sync instead of being lost.
//!
//! # Applied sync
//!
//! On the render thread, against the live state of the entity:
//!
//! 1. Clear `sync_pending`.
//! 2. Decide attachment: attached iff visible and `opacity > MIN_OPACITY`.
//! 3. Reconcile the presenter's tree: detach from a wrong parent; if the
//!    entity should not be attached, stop here. Otherwise attach under the
//!    anchor.
//! 4. Run [`Renderable::sync_visuals`](crate::backend::Renderable::sync_visuals).
//! 5. Apply visibility, alpha, and the scaled relative offset (elevation
//!    unscaled) via [`Presenter::apply`].
//! 6. Run change listeners in registration order.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use log::{debug, trace, warn};

use crate::backend::{Presenter, Visuals};
use crate::entity::EntityId;
use crate::entity::state::EntityState;
use crate::screen::Screen;
use crate::transform::Transform3d;

/// Opacity at or below which an entity is detached rather than drawn
/// transparent.
pub const MIN_OPACITY: f32 = 0.0001;

/// Returns whether an entity with the given visibility and opacity belongs
/// in the presenter's tree.
#[must_use]
pub fn should_attach(visible: bool, opacity: f32) -> bool {
    visible && opacity > MIN_OPACITY
}

impl Screen {
    /// Requests a sync of the entity unless one is already pending.
    ///
    /// Returns whether a new sync was scheduled. Property setters call this
    /// on change; call it directly when renderable content changed (for
    /// example its size) without any entity property changing.
    pub fn request_sync(&self, id: EntityId) -> bool {
        self.request_sync_of(&self.state(id))
    }

    /// Requests a sync of every entity on this screen.
    ///
    /// Returns the number of newly scheduled syncs.
    pub fn request_sync_all(&self) -> usize {
        self.states()
            .iter()
            .filter(|state| self.request_sync_of(state))
            .count()
    }

    pub(crate) fn request_sync_of(&self, state: &Arc<EntityState>) -> bool {
        if state.sync_pending.swap(true, Ordering::AcqRel) {
            trace!(entity:? = state.id; "sync coalesced");
            return false;
        }
        let screen = self.clone();
        let target = Arc::clone(state);
        let dispatched = self
            .dispatcher()
            .dispatch(move |presenter| screen.apply_sync(&target, presenter));
        if let Err(err) = dispatched {
            state.sync_pending.store(false, Ordering::Release);
            warn!(entity:? = state.id, err:%; "sync dropped");
            return false;
        }
        true
    }

    /// Runs the applied-sync procedure. Render thread only.
    pub(crate) fn apply_sync(&self, state: &EntityState, presenter: &mut dyn Presenter) {
        // Acquire pairs with the producer's swap so writes made before a
        // coalesced request are visible here.
        state.sync_pending.swap(false, Ordering::AcqRel);

        let id = state.id;
        let visible = state.visible();
        let opacity = state.opacity.load();
        let expected = should_attach(visible, opacity).then(|| state.anchor());
        let current = presenter.parent(id);
        if current.is_some() && current != expected {
            debug!(entity:? = id, parent:? = current; "detach");
            presenter.detach(id);
        }
        // Detached entities stay untouched until they qualify again.
        let Some(parent) = expected else {
            return;
        };
        if current != expected {
            debug!(entity:? = id, parent:? = parent; "attach");
            presenter.attach(id, parent);
        }

        state.renderable.sync_visuals();

        let offset = self.relative_offset_of(state) * self.scale();
        let visuals = Visuals {
            visible,
            alpha: opacity,
            transform: Transform3d::from_translation(offset.x, offset.y, state.z.load()),
        };
        trace!(entity:? = id, visuals:?; "sync applied");
        presenter.apply(id, &visuals);

        state.notify_listeners();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use float_cmp::assert_approx_eq;
    use kurbo::{Size, Vec2};

    use super::*;
    use crate::align::{XAlign, YAlign};
    use crate::dispatch::RenderQueue;
    use crate::entity::Anchor;
    use crate::screen::ScreenConfig;
    use crate::testing::{RecordingPresenter, fixed};

    fn setup(config: ScreenConfig) -> (Screen, RenderQueue, RecordingPresenter) {
        let (screen, queue) = Screen::new(config);
        (screen, queue, RecordingPresenter::default())
    }

    fn counter(screen: &Screen, id: EntityId) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        screen.add_change_listener(id, move || {
            handle.fetch_add(1, Ordering::Relaxed);
        });
        count
    }

    #[test]
    fn attach_threshold() {
        assert!(should_attach(true, 1.0));
        assert!(should_attach(true, MIN_OPACITY * 2.0));
        assert!(!should_attach(true, MIN_OPACITY), "equal to threshold detaches");
        assert!(!should_attach(true, 0.0));
        assert!(!should_attach(false, 1.0));
    }

    #[test]
    fn rapid_mutations_coalesce_into_one_sync() {
        let (screen, queue, mut presenter) = setup(ScreenConfig::new(Size::new(1000.0, 600.0)));
        let id = screen.create_entity(fixed(100.0, 50.0));
        queue.drain(&mut presenter);
        let syncs = counter(&screen, id);

        assert!(screen.set_x(id, 10.0));
        assert!(screen.set_opacity(id, 0.5));
        assert!(screen.set_z(id, 4.0));
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.drain(&mut presenter), 1);
        assert_eq!(syncs.load(Ordering::Relaxed), 1);
        let visuals = presenter.visuals_of(id).unwrap();
        assert_eq!(visuals.alpha, 0.5);
        assert_eq!(visuals.transform.translation(), Vec2::new(460.0, 275.0));
        assert_eq!(visuals.transform.elevation(), 4.0);
    }

    #[test]
    fn scale_applies_to_translation_not_elevation() {
        let (screen, queue, mut presenter) =
            setup(ScreenConfig::new(Size::new(1000.0, 600.0)).with_scale(2.0));
        let id = screen.create_entity(fixed(100.0, 50.0));
        screen.set_z(id, 3.0);
        queue.drain(&mut presenter);

        let visuals = presenter.visuals_of(id).unwrap();
        assert_eq!(visuals.transform.translation(), Vec2::new(900.0, 550.0));
        assert_eq!(visuals.transform.elevation(), 3.0);
    }

    #[test]
    fn transparent_or_hidden_entities_detach() {
        let (screen, queue, mut presenter) = setup(ScreenConfig::new(Size::new(100.0, 100.0)));
        let id = screen.create_entity(fixed(10.0, 10.0));
        queue.drain(&mut presenter);
        assert_eq!(presenter.parent_of(id), Some(Anchor::Screen));
        let syncs = counter(&screen, id);
        let applied = presenter.apply_count(id);

        screen.set_opacity(id, MIN_OPACITY);
        queue.drain(&mut presenter);
        assert_eq!(presenter.parent_of(id), None);
        assert_eq!(presenter.apply_count(id), applied, "detached: no visuals");
        assert_eq!(syncs.load(Ordering::Relaxed), 0, "detached: no listeners");

        screen.set_opacity(id, 1.0);
        queue.drain(&mut presenter);
        assert_eq!(presenter.parent_of(id), Some(Anchor::Screen));
        assert_eq!(syncs.load(Ordering::Relaxed), 1);

        screen.set_visible(id, false);
        queue.drain(&mut presenter);
        assert_eq!(presenter.parent_of(id), None);
        let applied = presenter.apply_count(id);
        let detaches = presenter.detach_count(id);

        // Already detached: later syncs leave the view alone.
        assert!(screen.set_opacity(id, 0.5));
        assert!(screen.set_x(id, 3.0));
        assert_eq!(queue.drain(&mut presenter), 1);
        assert_eq!(presenter.parent_of(id), None);
        assert_eq!(presenter.apply_count(id), applied);
        assert_eq!(presenter.detach_count(id), detaches);
        assert_eq!(syncs.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn reanchoring_moves_the_view() {
        let (screen, queue, mut presenter) = setup(ScreenConfig::new(Size::new(1000.0, 600.0)));
        let a = screen.create_entity(fixed(100.0, 50.0));
        let b = screen.create_entity(fixed(20.0, 20.0));
        queue.drain(&mut presenter);
        assert_eq!(presenter.parent_of(b), Some(Anchor::Screen));

        screen.set_anchor(b, a);
        screen.set_x_align(b, XAlign::Left);
        screen.set_y_align(b, YAlign::Top);
        screen.set_offset(b, 5.0, 5.0);
        queue.drain(&mut presenter);

        assert_eq!(presenter.parent_of(b), Some(Anchor::Entity(a)));
        assert_eq!(presenter.detach_count(b), 1);
        let visuals = presenter.visuals_of(b).unwrap();
        assert_eq!(visuals.transform.translation(), Vec2::new(105.0, 55.0));
    }

    #[test]
    fn sync_hook_runs_only_when_attached() {
        let (screen, queue, mut presenter) = setup(ScreenConfig::new(Size::new(100.0, 100.0)));
        let renderable = fixed(10.0, 10.0);
        let id = screen.create_entity(renderable.clone());
        queue.drain(&mut presenter);
        assert_eq!(renderable.synced(), 1);

        screen.set_visible(id, false);
        queue.drain(&mut presenter);
        assert_eq!(renderable.synced(), 1);

        screen.set_opacity(id, 0.5);
        screen.request_sync(id);
        queue.drain(&mut presenter);
        assert_eq!(renderable.synced(), 1);

        screen.set_visible(id, true);
        queue.drain(&mut presenter);
        assert_eq!(renderable.synced(), 2);
        assert_eq!(presenter.parent_of(id), Some(Anchor::Screen));
    }

    #[test]
    fn write_during_sync_schedules_follow_up() {
        let (screen, queue, mut presenter) = setup(ScreenConfig::new(Size::new(100.0, 100.0)));
        let id = screen.create_entity(fixed(10.0, 10.0));
        queue.drain(&mut presenter);

        // A listener runs after the pending flag was cleared, like a racing
        // producer would.
        let writer = screen.clone();
        screen.add_change_listener(id, move || {
            writer.set_x(id, 42.0);
        });
        screen.set_x(id, 1.0);

        assert_eq!(queue.drain(&mut presenter), 2);
        assert_approx_eq!(
            f64,
            presenter.visuals_of(id).unwrap().transform.translation().x,
            45.0 + 42.0
        );
    }

    #[test]
    fn request_sync_reports_coalescing() {
        let (screen, queue, mut presenter) = setup(ScreenConfig::new(Size::new(100.0, 100.0)));
        let a = screen.create_entity(fixed(10.0, 10.0));
        let b = screen.create_entity(fixed(10.0, 10.0));
        assert!(!screen.request_sync(a), "creation already queued one");
        queue.drain(&mut presenter);

        assert!(screen.request_sync(a));
        assert_eq!(screen.request_sync_all(), 1, "only b was idle");
        assert!(screen.is_sync_pending(b));
        assert_eq!(queue.drain(&mut presenter), 2);
    }

    #[test]
    fn disconnected_queue_drops_requests_silently() {
        let (screen, queue) = Screen::new(ScreenConfig::new(Size::new(100.0, 100.0)));
        drop(queue);
        let id = screen.create_entity(fixed(10.0, 10.0));
        assert!(!screen.is_sync_pending(id));
        assert!(screen.set_x(id, 3.0), "the value still changes");
        assert_eq!(screen.x(id), 3.0);
        assert!(!screen.is_sync_pending(id));
    }

    #[test]
    fn concurrent_producers_coalesce() {
        let (screen, queue, mut presenter) = setup(ScreenConfig::new(Size::new(1000.0, 1000.0)));
        let ids: Vec<_> = (0..4).map(|_| screen.create_entity(fixed(10.0, 10.0))).collect();
        queue.drain(&mut presenter);

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let screen = screen.clone();
                std::thread::spawn(move || {
                    for step in 1..=100 {
                        screen.set_x(id, f64::from(step));
                        screen.set_y(id, -f64::from(step));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(queue.len() <= ids.len(), "at most one pending sync per entity");
        queue.drain(&mut presenter);
        for id in ids {
            let translation = presenter.visuals_of(id).unwrap().transform.translation();
            assert_eq!(translation, Vec2::new(495.0 + 100.0, 495.0 + 100.0));
        }
    }
}
