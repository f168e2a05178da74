// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-entity live state.
//!
//! Scalars live in atomic cells so producer threads can write them while the
//! render thread reads them without torn values. No lock covers more than
//! one property; a sync reads whatever is current when it runs.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::align::{XAlign, YAlign};
use crate::backend::Renderable;

use super::id::{Anchor, EntityId};

/// A change listener. Invoked on the render thread after every applied sync.
pub(crate) type Listener = Arc<dyn Fn() + Send + Sync>;

/// An `f64` stored as its bit pattern.
#[derive(Debug)]
pub(crate) struct AtomicF64(AtomicU64);

impl AtomicF64 {
    pub(crate) fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    pub(crate) fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Stores `value` and returns the previous value.
    pub(crate) fn swap(&self, value: f64) -> f64 {
        f64::from_bits(self.0.swap(value.to_bits(), Ordering::Relaxed))
    }
}

/// An `f32` stored as its bit pattern.
#[derive(Debug)]
pub(crate) struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub(crate) fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub(crate) fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn swap(&self, value: f32) -> f32 {
        f32::from_bits(self.0.swap(value.to_bits(), Ordering::Relaxed))
    }
}

/// Live state of one positioned entity.
pub(crate) struct EntityState {
    pub(crate) id: EntityId,
    pub(crate) x: AtomicF64,
    pub(crate) y: AtomicF64,
    pub(crate) z: AtomicF64,
    pub(crate) x_align: AtomicU8,
    pub(crate) y_align: AtomicU8,
    pub(crate) opacity: AtomicF32,
    pub(crate) visible: AtomicBool,
    pub(crate) anchor: AtomicU32,
    /// Set while a sync is queued but has not started.
    pub(crate) sync_pending: AtomicBool,
    /// Guarded separately from the screen registry; the two locks are never
    /// held together.
    pub(crate) listeners: Mutex<Vec<Listener>>,
    pub(crate) renderable: Arc<dyn Renderable>,
}

impl core::fmt::Debug for EntityState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EntityState")
            .field("id", &self.id)
            .field("x", &self.x.load())
            .field("y", &self.y.load())
            .field("z", &self.z.load())
            .field("x_align", &self.x_align())
            .field("y_align", &self.y_align())
            .field("opacity", &self.opacity.load())
            .field("visible", &self.visible())
            .field("anchor", &self.anchor())
            .field("sync_pending", &self.sync_pending.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EntityState {
    /// Creates the state of a fresh entity: zero offset, centered on both
    /// axes, fully opaque, visible, anchored to the screen.
    pub(crate) fn new(id: EntityId, renderable: Arc<dyn Renderable>) -> Self {
        Self {
            id,
            x: AtomicF64::new(0.0),
            y: AtomicF64::new(0.0),
            z: AtomicF64::new(0.0),
            x_align: AtomicU8::new(XAlign::Center as u8),
            y_align: AtomicU8::new(YAlign::Center as u8),
            opacity: AtomicF32::new(1.0),
            visible: AtomicBool::new(true),
            anchor: AtomicU32::new(Anchor::Screen.to_bits()),
            sync_pending: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
            renderable,
        }
    }

    pub(crate) fn x_align(&self) -> XAlign {
        XAlign::from_bits(self.x_align.load(Ordering::Relaxed))
    }

    pub(crate) fn y_align(&self) -> YAlign {
        YAlign::from_bits(self.y_align.load(Ordering::Relaxed))
    }

    pub(crate) fn visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    pub(crate) fn anchor(&self) -> Anchor {
        Anchor::from_bits(self.anchor.load(Ordering::Relaxed), self.id.screen)
    }

    pub(crate) fn add_listener(&self, listener: Listener) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Invokes every listener in registration order.
    ///
    /// Runs from a snapshot so listeners may register further listeners.
    pub(crate) fn notify_listeners(&self) {
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in &snapshot {
            listener();
        }
    }
}
