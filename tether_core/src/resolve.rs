// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored offset resolution.
//!
//! An entity's *relative offset* is the translation of its view inside its
//! anchor's view. It depends on the entity's offset and alignment, the
//! entity's size, and the anchor's size:
//!
//! | anchor | align | X | Y |
//! |---|---|---|---|
//! | screen | start | `x` | `y` |
//! | screen | end | `W - x - w` | `H - h - y` |
//! | screen | center | `(W - w)/2 + x` | `(H - h)/2 - y` |
//! | entity | start | `aw + x` | `ah + y` |
//! | entity | end | `-x - w` | `-y - h` |
//! | entity | center | `(aw - w)/2 + x` | `(ah - h)/2 - y` |
//!
//! Centered offsets are additive on X and subtractive on Y, so a positive Y
//! moves a centered entity up. Start/end against an entity place the view
//! just past the anchor's far edge or just before its near edge.
//!
//! The *screen center* of an entity sums the relative offsets along its
//! anchor chain. Nothing is cached: every call recomputes from live state,
//! so moving an ancestor moves every descendant's reported position.

use kurbo::{Point, Size, Vec2};
use log::warn;

use crate::align::{XAlign, YAlign};
use crate::entity::state::EntityState;
use crate::entity::{Anchor, EntityId};
use crate::screen::Screen;

/// The extent of an anchor along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnchorExtent {
    /// The anchor is the screen, with the given extent.
    Screen(f64),
    /// The anchor is another entity, with the given extent.
    Entity(f64),
}

/// Resolves an X offset against its anchor.
#[must_use]
pub fn resolve_x(align: XAlign, x: f64, width: f64, anchor: AnchorExtent) -> f64 {
    match (anchor, align) {
        (AnchorExtent::Screen(_), XAlign::Left) => x,
        (AnchorExtent::Screen(sw), XAlign::Right) => sw - x - width,
        (AnchorExtent::Screen(sw), XAlign::Center) => (sw - width) / 2.0 + x,
        (AnchorExtent::Entity(aw), XAlign::Left) => aw + x,
        (AnchorExtent::Entity(_), XAlign::Right) => -x - width,
        (AnchorExtent::Entity(aw), XAlign::Center) => (aw - width) / 2.0 + x,
    }
}

/// Resolves a Y offset against its anchor.
#[must_use]
pub fn resolve_y(align: YAlign, y: f64, height: f64, anchor: AnchorExtent) -> f64 {
    match (anchor, align) {
        (AnchorExtent::Screen(_), YAlign::Top) => y,
        (AnchorExtent::Screen(sh), YAlign::Bottom) => sh - height - y,
        (AnchorExtent::Screen(sh), YAlign::Center) => (sh - height) / 2.0 - y,
        (AnchorExtent::Entity(ah), YAlign::Top) => ah + y,
        (AnchorExtent::Entity(_), YAlign::Bottom) => -y - height,
        (AnchorExtent::Entity(ah), YAlign::Center) => (ah - height) / 2.0 - y,
    }
}

impl Screen {
    /// Returns the unscaled translation of the entity's view inside its
    /// anchor's view.
    #[must_use]
    pub fn relative_offset(&self, id: EntityId) -> Vec2 {
        self.relative_offset_of(&self.state(id))
    }

    /// Returns the absolute position of the entity's center, in unscaled
    /// screen coordinates.
    ///
    /// Walks the anchor chain up to the screen. If the chain loops back on
    /// itself the walk stops at the first repeated entity and the sum so far
    /// is returned.
    #[must_use]
    pub fn screen_center(&self, id: EntityId) -> Point {
        let state = self.state(id);
        let size = state.renderable.size();
        let mut center = self.relative_offset_of(&state) + size.to_vec2() / 2.0;

        let mut visited = vec![id];
        let mut current = state.anchor();
        while let Anchor::Entity(anchor_id) = current {
            if visited.contains(&anchor_id) {
                warn!(entity:? = id, anchor:? = anchor_id; "anchor cycle detected");
                break;
            }
            visited.push(anchor_id);
            let anchor = self.state(anchor_id);
            center += self.relative_offset_of(&anchor);
            current = anchor.anchor();
        }
        center.to_point()
    }

    /// Returns the X coordinate of [`screen_center`](Self::screen_center).
    #[must_use]
    pub fn screen_center_x(&self, id: EntityId) -> f64 {
        self.screen_center(id).x
    }

    /// Returns the Y coordinate of [`screen_center`](Self::screen_center).
    #[must_use]
    pub fn screen_center_y(&self, id: EntityId) -> f64 {
        self.screen_center(id).y
    }

    pub(crate) fn relative_offset_of(&self, state: &EntityState) -> Vec2 {
        let size = state.renderable.size();
        let (ax, ay) = match state.anchor() {
            Anchor::Screen => {
                let screen = self.size();
                (
                    AnchorExtent::Screen(screen.width),
                    AnchorExtent::Screen(screen.height),
                )
            }
            Anchor::Entity(anchor_id) => {
                let anchor: Size = self.state(anchor_id).renderable.size();
                (
                    AnchorExtent::Entity(anchor.width),
                    AnchorExtent::Entity(anchor.height),
                )
            }
        };
        Vec2::new(
            resolve_x(state.x_align(), state.x.load(), size.width, ax),
            resolve_y(state.y_align(), state.y.load(), size.height, ay),
        )
    }
}
