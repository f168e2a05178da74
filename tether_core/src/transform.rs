// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement transform handed to presenters.
//!
//! Entity views are only ever translated: on X/Y by the resolved, scaled
//! offset, and on Z by the entity's elevation.

use kurbo::Vec2;

/// A translation in the view plane plus an elevation above it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform3d {
    /// X/Y translation inside the parent view, in presenter units.
    pub offset: Vec2,
    /// Z translation. Higher values paint above lower ones.
    pub elevation: f64,
}

impl Transform3d {
    /// Creates a transform translating by `(x, y)` at elevation `z`.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            offset: Vec2::new(x, y),
            elevation: z,
        }
    }

    /// Returns the X/Y translation.
    #[inline]
    #[must_use]
    pub const fn translation(self) -> Vec2 {
        self.offset
    }

    /// Returns the Z translation.
    #[inline]
    #[must_use]
    pub const fn elevation(self) -> f64 {
        self.elevation
    }

    /// Returns whether every component is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.offset.is_finite() && self.elevation.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_untranslated() {
        assert_eq!(Transform3d::default().translation(), Vec2::ZERO);
        assert_eq!(Transform3d::default().elevation(), 0.0);
    }

    #[test]
    fn from_translation_splits_plane_and_elevation() {
        let placed = Transform3d::from_translation(5.0, 6.0, 7.0);
        assert_eq!(placed.translation(), Vec2::new(5.0, 6.0));
        assert_eq!(placed.elevation(), 7.0);
    }

    #[test]
    fn non_finite_components_are_detected() {
        assert!(Transform3d::from_translation(1.0, 2.0, 3.0).is_finite());
        assert!(!Transform3d::from_translation(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Transform3d::from_translation(0.0, 0.0, f64::INFINITY).is_finite());
    }
}
