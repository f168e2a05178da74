// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioned entities.
//!
//! A *positioned entity* wraps a [`Renderable`] and places it relative to an
//! [`Anchor`]. Each entity has:
//!
//! - An identity ([`EntityId`]): a handle into the screen's registry. Entities
//!   are never removed, so handles never go stale on their own screen.
//! - An offset `(x, y, z)`. X and Y are measured from the anchor according to
//!   the entity's [`XAlign`]/[`YAlign`] (see [`resolve`](crate::resolve)); Z is
//!   an elevation applied as-is.
//! - An opacity, clamped to `[0, 1]` on write, and a visibility flag.
//!   Together they decide whether the entity's view is attached at all (see
//!   [`sync`](crate::sync)).
//! - Change listeners, run on the render thread after every applied sync.
//!
//! # Mutation
//!
//! Every setter follows the same contract: if the new value equals the
//! current one, nothing happens and the setter returns `false`. Otherwise the
//! value is stored and a sync is requested, and the setter returns `true`.
//! Setters may be called from any thread. Concurrent writes to the same
//! property are last-writer-wins; the applied sync reads live values, so it
//! always reflects the latest write to every property.

mod id;
pub(crate) mod state;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use kurbo::Vec2;

use crate::align::{XAlign, YAlign};
use crate::backend::Renderable;
use crate::screen::Screen;

pub use id::{Anchor, EntityId};
pub(crate) use id::SCREEN;

impl Screen {
    // -- Property getters --

    /// Returns the horizontal offset of an entity.
    #[must_use]
    pub fn x(&self, id: EntityId) -> f64 {
        self.state(id).x.load()
    }

    /// Returns the vertical offset of an entity.
    #[must_use]
    pub fn y(&self, id: EntityId) -> f64 {
        self.state(id).y.load()
    }

    /// Returns the elevation of an entity.
    #[must_use]
    pub fn z(&self, id: EntityId) -> f64 {
        self.state(id).z.load()
    }

    /// Returns the `(x, y)` offset of an entity.
    #[must_use]
    pub fn offset(&self, id: EntityId) -> Vec2 {
        let state = self.state(id);
        Vec2::new(state.x.load(), state.y.load())
    }

    /// Returns the horizontal alignment of an entity.
    #[must_use]
    pub fn x_align(&self, id: EntityId) -> XAlign {
        self.state(id).x_align()
    }

    /// Returns the vertical alignment of an entity.
    #[must_use]
    pub fn y_align(&self, id: EntityId) -> YAlign {
        self.state(id).y_align()
    }

    /// Returns the opacity of an entity, in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self, id: EntityId) -> f32 {
        self.state(id).opacity.load()
    }

    /// Returns the visibility flag of an entity.
    #[must_use]
    pub fn is_visible(&self, id: EntityId) -> bool {
        self.state(id).visible()
    }

    /// Returns the anchor of an entity.
    #[must_use]
    pub fn anchor(&self, id: EntityId) -> Anchor {
        self.state(id).anchor()
    }

    /// Returns the renderable wrapped by an entity.
    #[must_use]
    pub fn renderable(&self, id: EntityId) -> Arc<dyn Renderable> {
        Arc::clone(&self.state(id).renderable)
    }

    /// Returns whether a sync of the entity is queued and has not started.
    #[must_use]
    pub fn is_sync_pending(&self, id: EntityId) -> bool {
        self.state(id).sync_pending.load(Ordering::Acquire)
    }

    // -- Mutation API (requests a sync on change) --

    /// Sets the horizontal offset of an entity.
    pub fn set_x(&self, id: EntityId, x: f64) -> bool {
        let state = self.state(id);
        if state.x.swap(x) == x {
            return false;
        }
        self.request_sync_of(&state);
        true
    }

    /// Sets the vertical offset of an entity.
    pub fn set_y(&self, id: EntityId, y: f64) -> bool {
        let state = self.state(id);
        if state.y.swap(y) == y {
            return false;
        }
        self.request_sync_of(&state);
        true
    }

    /// Sets the elevation of an entity.
    pub fn set_z(&self, id: EntityId, z: f64) -> bool {
        let state = self.state(id);
        if state.z.swap(z) == z {
            return false;
        }
        self.request_sync_of(&state);
        true
    }

    /// Sets both offset components. Returns whether either changed.
    ///
    /// At most one sync is requested.
    pub fn set_offset(&self, id: EntityId, x: f64, y: f64) -> bool {
        let state = self.state(id);
        let x_changed = state.x.swap(x) != x;
        let y_changed = state.y.swap(y) != y;
        if !(x_changed || y_changed) {
            return false;
        }
        self.request_sync_of(&state);
        true
    }

    /// Sets the horizontal alignment of an entity.
    pub fn set_x_align(&self, id: EntityId, align: XAlign) -> bool {
        let state = self.state(id);
        let old = state.x_align.swap(align as u8, Ordering::Relaxed);
        if old == align as u8 {
            return false;
        }
        self.request_sync_of(&state);
        true
    }

    /// Sets the vertical alignment of an entity.
    pub fn set_y_align(&self, id: EntityId, align: YAlign) -> bool {
        let state = self.state(id);
        let old = state.y_align.swap(align as u8, Ordering::Relaxed);
        if old == align as u8 {
            return false;
        }
        self.request_sync_of(&state);
        true
    }

    /// Sets the opacity of an entity.
    ///
    /// The value is clamped to `[0, 1]` (NaN becomes `0`) before it is
    /// compared with the current opacity.
    pub fn set_opacity(&self, id: EntityId, opacity: f32) -> bool {
        let opacity = clamp_opacity(opacity);
        let state = self.state(id);
        if state.opacity.swap(opacity) == opacity {
            return false;
        }
        self.request_sync_of(&state);
        true
    }

    /// Sets the visibility flag of an entity.
    ///
    /// Invisible entities are detached from the presenter's tree.
    pub fn set_visible(&self, id: EntityId, visible: bool) -> bool {
        let state = self.state(id);
        if state.visible.swap(visible, Ordering::Relaxed) == visible {
            return false;
        }
        self.request_sync_of(&state);
        true
    }

    /// Re-anchors an entity to the screen or another entity.
    ///
    /// Anchor graphs are expected to be acyclic. A cycle is not rejected
    /// here; absolute-position queries stop walking when they detect one.
    ///
    /// # Panics
    ///
    /// Panics if `anchor` names an entity from another screen.
    pub fn set_anchor(&self, id: EntityId, anchor: impl Into<Anchor>) -> bool {
        let anchor = anchor.into();
        if let Anchor::Entity(anchor_id) = anchor {
            assert!(
                self.contains(anchor_id),
                "stale EntityId: {anchor_id:?} used as anchor"
            );
        }
        let state = self.state(id);
        let old = state.anchor.swap(anchor.to_bits(), Ordering::Relaxed);
        if old == anchor.to_bits() {
            return false;
        }
        self.request_sync_of(&state);
        true
    }

    /// Registers a callback run on the render thread after every applied
    /// sync of the entity, after all previously registered callbacks.
    ///
    /// Safe to call while listeners are running, including from a listener.
    /// Listeners live as long as the screen; one that captures a [`Screen`]
    /// handle keeps the render queue connected.
    pub fn add_change_listener<F>(&self, id: EntityId, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state(id).add_listener(Arc::new(listener));
    }
}

/// Clamps an opacity to `[0, 1]`, mapping NaN to `0`.
#[must_use]
pub fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}
