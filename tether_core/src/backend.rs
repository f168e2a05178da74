// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! The core never draws anything. Two collaborators do that work:
//!
//! - **Renderable**: the concrete thing an entity wraps (a line, an image, a
//!   text run). The core asks it for its current size, from any thread, and
//!   gives it a chance to push type-specific visual state (stroke color and
//!   the like) during each applied sync.
//!
//! - **Presenter**: the platform-native view tree, owned by the render
//!   thread. It is the attach/detach target for entity views and receives
//!   the resolved [`Visuals`] of every applied sync.
//!
//! # Crate boundaries
//!
//! `tether_core` owns the data model, offset resolution, and scheduling.
//! Backend crates depend on `tether_core` and implement these traits.
//! Application code wires a [`Screen`](crate::screen::Screen) to a backend by
//! running the [`RenderQueue`](crate::dispatch::RenderQueue) against its
//! presenter:
//!
//! ```rust,ignore
//! let (screen, queue) = Screen::new(ScreenConfig::new(size));
//! std::thread::spawn(move || produce_content(screen));
//! queue.run(&mut presenter);
//! ```

use crate::entity::{Anchor, EntityId};
use crate::transform::Transform3d;
use kurbo::Size;

/// The drawable content wrapped by a positioned entity.
///
/// Sizes are read from producer threads (absolute-position queries) as well
/// as from the render thread, so implementations must be `Send + Sync` and
/// use interior mutability for anything that changes.
pub trait Renderable: Send + Sync {
    /// Returns the current unscaled size of the content.
    fn size(&self) -> Size;

    /// Pushes type-specific visual state to the native view.
    ///
    /// Called on the render thread during every applied sync of an attached
    /// entity, after attachment and before [`Presenter::apply`].
    fn sync_visuals(&self) {}
}

/// Visual state resolved by an applied sync.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visuals {
    /// Whether the view is shown.
    pub visible: bool,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Scaled anchor-relative translation on X/Y, elevation on Z.
    pub transform: Transform3d,
}

/// Applies entity state to a platform-native view tree.
///
/// Presenters live on the render thread and are only ever touched from
/// tasks run by a [`RenderQueue`](crate::dispatch::RenderQueue).
pub trait Presenter {
    /// Returns the parent the entity's view is currently attached to.
    fn parent(&self, id: EntityId) -> Option<Anchor>;

    /// Attaches the entity's view under `parent`, sized to wrap its content.
    ///
    /// Only called while the view is detached.
    fn attach(&mut self, id: EntityId, parent: Anchor);

    /// Removes the entity's view from its current parent.
    fn detach(&mut self, id: EntityId);

    /// Applies resolved visibility, alpha, and transform to the view.
    fn apply(&mut self, id: EntityId, visuals: &Visuals);
}
