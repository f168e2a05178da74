// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory backend for `tether_core`.
//!
//! - [`presenter::HeadlessPresenter`]: a [`Presenter`] that keeps the
//!   attached view tree and the last applied visuals in memory, and can
//!   compute presented world positions and dump the tree as text.
//! - [`shapes`]: stock [`Renderable`]s ([`Line`](shapes::Line),
//!   [`Block`](shapes::Block)) whose color is pushed to the presented state
//!   during each applied sync.
//!
//! [`Presenter`]: tether_core::backend::Presenter
//! [`Renderable`]: tether_core::backend::Renderable

pub mod presenter;
pub mod shapes;
