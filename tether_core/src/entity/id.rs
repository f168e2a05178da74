// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity and anchor identity types.

use core::fmt;

/// Sentinel stored in anchor slots to mean "anchored to the screen".
pub(crate) const SCREEN: u32 = u32::MAX;

/// A handle to a positioned entity in a [`Screen`](crate::screen::Screen).
///
/// Contains the slot index in the screen's registry plus a tag identifying
/// the screen, so handles from a different screen are rejected instead of
/// silently aliasing another entity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    /// Slot index into the registry.
    pub(crate) idx: u32,
    /// Tag of the owning screen.
    pub(crate) screen: u32,
}

impl EntityId {
    /// Returns the raw slot index.
    ///
    /// Indices are dense and stable: entities are never removed, so the n-th
    /// entity created on a screen has index `n`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}@screen{})", self.idx, self.screen)
    }
}

/// What an entity's offset is measured from.
///
/// The screen is the terminal anchor; anchor chains end there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// The root container.
    #[default]
    Screen,
    /// Another positioned entity on the same screen.
    Entity(EntityId),
}

impl Anchor {
    /// Returns the anchoring entity, or `None` for the screen.
    #[inline]
    #[must_use]
    pub const fn entity(self) -> Option<EntityId> {
        match self {
            Self::Screen => None,
            Self::Entity(id) => Some(id),
        }
    }

    pub(crate) const fn to_bits(self) -> u32 {
        match self {
            Self::Screen => SCREEN,
            Self::Entity(id) => id.idx,
        }
    }

    pub(crate) const fn from_bits(bits: u32, screen: u32) -> Self {
        if bits == SCREEN {
            Self::Screen
        } else {
            Self::Entity(EntityId { idx: bits, screen })
        }
    }
}

impl From<EntityId> for Anchor {
    fn from(id: EntityId) -> Self {
        Self::Entity(id)
    }
}
