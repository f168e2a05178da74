// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The root container.
//!
//! A [`Screen`] is the terminal anchor of every anchor chain, the registry of
//! all entities created against it, and the owner of the [`Dispatcher`] that
//! feeds its [`RenderQueue`]. `Screen` is a cheap, cloneable, `Send + Sync`
//! handle; clones share state.
//!
//! # Locking
//!
//! The registry is guarded by one mutex. Each entity's listener list has its
//! own mutex (see [`entity`](crate::entity)). The two are unordered: no code
//! path holds both at once.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kurbo::Size;
use log::debug;

use crate::backend::Renderable;
use crate::dispatch::{self, Dispatcher, RenderQueue};
use crate::entity::state::{AtomicF64, EntityState};
use crate::entity::{EntityId, SCREEN};

/// Source of screen tags embedded in [`EntityId`]s.
static NEXT_SCREEN_TAG: AtomicU32 = AtomicU32::new(0);

/// Configuration for a [`Screen`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenConfig {
    /// Initial screen size in layout units.
    pub size: Size,
    /// Multiplier applied to resolved offsets when they are handed to the
    /// presenter.
    pub scale: f64,
    /// Bound on queued render tasks. `None` means unbounded.
    ///
    /// When bounded, producers block while the queue is full. Render-thread
    /// code (change listeners included) must not mutate entities while the
    /// queue is full.
    pub queue_capacity: Option<usize>,
}

impl ScreenConfig {
    /// Unscaled screen of the given size with an unbounded render queue.
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self {
            size,
            scale: 1.0,
            queue_capacity: None,
        }
    }

    /// Sets the offset scale factor.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Bounds the render queue to `capacity` tasks.
    #[must_use]
    pub const fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }
}

#[derive(Debug)]
struct ScreenInner {
    tag: u32,
    width: AtomicF64,
    height: AtomicF64,
    scale: AtomicF64,
    registry: Mutex<Vec<Arc<EntityState>>>,
    dispatcher: Dispatcher,
}

/// Root container and entity registry.
///
/// Created together with the [`RenderQueue`] that must be run on the render
/// thread. Entity properties are read and written through the screen by
/// [`EntityId`]; see [`entity`](crate::entity) for the property API.
#[derive(Clone, Debug)]
pub struct Screen {
    inner: Arc<ScreenInner>,
}

impl Screen {
    /// Creates a screen and the render queue that applies its syncs.
    #[must_use]
    pub fn new(config: ScreenConfig) -> (Self, RenderQueue) {
        let (dispatcher, queue) = dispatch::channel(config.queue_capacity);
        let inner = ScreenInner {
            tag: NEXT_SCREEN_TAG.fetch_add(1, Ordering::Relaxed),
            width: AtomicF64::new(config.size.width),
            height: AtomicF64::new(config.size.height),
            scale: AtomicF64::new(config.scale),
            registry: Mutex::new(Vec::new()),
            dispatcher,
        };
        (
            Self {
                inner: Arc::new(inner),
            },
            queue,
        )
    }

    /// Returns the dispatcher feeding this screen's render queue.
    ///
    /// Applications may post their own render-thread work through it; it is
    /// serialized with entity syncs.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    // -- Registry --

    /// Creates a positioned entity wrapping `renderable` and schedules its
    /// first sync.
    ///
    /// The entity starts at offset zero, centered on both axes, fully
    /// opaque, visible, and anchored to the screen.
    pub fn create_entity(&self, renderable: Arc<dyn Renderable>) -> EntityId {
        let state = {
            let mut registry = self.registry();
            let idx = u32::try_from(registry.len())
                .ok()
                .filter(|&idx| idx != SCREEN)
                .unwrap_or_else(|| panic!("entity registry full"));
            let id = EntityId {
                idx,
                screen: self.inner.tag,
            };
            let state = Arc::new(EntityState::new(id, renderable));
            registry.push(Arc::clone(&state));
            state
        };
        debug!(entity:? = state.id; "entity created");
        self.request_sync_of(&state);
        state.id
    }

    /// Returns the number of entities created on this screen.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.registry().len()
    }

    /// Returns the handles of all entities, in creation order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        self.registry().iter().map(|state| state.id).collect()
    }

    /// Returns whether `id` was created on this screen.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        id.screen == self.inner.tag && (id.idx as usize) < self.registry().len()
    }

    // -- Metrics --

    /// Returns the screen size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.inner.width.load(), self.inner.height.load())
    }

    /// Returns the screen width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.inner.width.load()
    }

    /// Returns the screen height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.inner.height.load()
    }

    /// Returns the offset scale factor.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.inner.scale.load()
    }

    /// Resizes the screen and schedules a sync of every entity.
    ///
    /// Returns `false` (and schedules nothing) if the size is unchanged.
    pub fn set_size(&self, size: Size) -> bool {
        let old_width = self.inner.width.swap(size.width);
        let old_height = self.inner.height.swap(size.height);
        if old_width == size.width && old_height == size.height {
            return false;
        }
        debug!(width = size.width, height = size.height; "screen resized");
        self.request_sync_all();
        true
    }

    /// Changes the offset scale factor and schedules a sync of every entity.
    ///
    /// Returns `false` (and schedules nothing) if the scale is unchanged.
    pub fn set_scale(&self, scale: f64) -> bool {
        if self.inner.scale.swap(scale) == scale {
            return false;
        }
        debug!(scale; "screen rescaled");
        self.request_sync_all();
        true
    }

    // -- Internal helpers --

    fn registry(&self) -> MutexGuard<'_, Vec<Arc<EntityState>>> {
        self.inner
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up the live state of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another screen.
    pub(crate) fn state(&self, id: EntityId) -> Arc<EntityState> {
        let registry = self.registry();
        assert!(
            id.screen == self.inner.tag && (id.idx as usize) < registry.len(),
            "stale EntityId: {id:?} (screen tag {}, {} entities)",
            self.inner.tag,
            registry.len()
        );
        Arc::clone(&registry[id.idx as usize])
    }

    /// Returns a snapshot of every entity's state.
    pub(crate) fn states(&self) -> Vec<Arc<EntityState>> {
        self.registry().clone()
    }
}
