// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored positioning and coalesced render-thread synchronization.
//!
//! `tether_core` positions entities of a retained widget tree relative to an
//! *anchor* (the [`Screen`](screen::Screen) or another entity) rather than in
//! absolute coordinates, and batches property writes from arbitrary threads
//! into a single visual update per entity, applied on one render thread.
//!
//! # Architecture
//!
//! ```text
//!   any thread                                  render thread
//!   ──────────                                  ─────────────
//!   Screen::set_x / set_opacity / ...
//!       │ (atomic store, returns "changed")
//!       ▼
//!   request_sync ── pending? ──yes──► coalesced (no-op)
//!       │ no
//!       ▼
//!   Dispatcher::dispatch ─────────────────► RenderQueue::run / drain
//!                                               │
//!                                               ▼
//!                                  attach/detach ─► Renderable::sync_visuals
//!                                               │
//!                                               ▼
//!                         resolve offset ─► Presenter::apply ─► listeners
//! ```
//!
//! **[`screen`]**: The root container. Owns the entity registry, the screen
//! size and scale, and the dispatcher feeding the render queue. Entities are
//! addressed through [`EntityId`](entity::EntityId) handles.
//!
//! **[`entity`]**: Entity handles, anchors, and the per-entity property API
//! (offset, alignment, opacity, visibility, anchor, change listeners).
//!
//! **[`align`]**: Horizontal and vertical alignment modes.
//!
//! **[`resolve`]**: The anchored offset formula and the anchor-chain walk
//! that produces absolute screen positions.
//!
//! **[`sync`]**: The single-flight sync scheduler and the applied-sync
//! procedure run on the render thread.
//!
//! **[`dispatch`]**: The serial task queue between producer threads and the
//! render thread.
//!
//! **[`backend`]**: The [`Renderable`](backend::Renderable) and
//! [`Presenter`](backend::Presenter) contracts that platform integrations
//! implement.
//!
//! **[`transform`]**: The translation-plus-elevation transform handed to
//! presenters.

pub mod align;
pub mod backend;
pub mod dispatch;
pub mod entity;
pub mod resolve;
pub mod screen;
pub mod sync;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;
