// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alignment modes.
//!
//! Alignment selects which variant of the anchored offset formula applies on
//! each axis (see [`resolve`](crate::resolve)). Both enums default to
//! `Center`.

/// Horizontal alignment of an entity against its anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum XAlign {
    /// Measure from the leading edge.
    Left = 0,
    /// Center on the anchor; positive offsets move right.
    #[default]
    Center = 1,
    /// Measure from the trailing edge.
    Right = 2,
}

impl XAlign {
    /// Decodes a value produced by `as u8`, falling back to `Center`.
    pub(crate) const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Left,
            2 => Self::Right,
            _ => Self::Center,
        }
    }
}

/// Vertical alignment of an entity against its anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum YAlign {
    /// Measure from the top edge.
    Top = 0,
    /// Center on the anchor; positive offsets move up.
    #[default]
    Center = 1,
    /// Measure from the bottom edge.
    Bottom = 2,
}

impl YAlign {
    /// Decodes a value produced by `as u8`, falling back to `Center`.
    pub(crate) const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Top,
            2 => Self::Bottom,
            _ => Self::Center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_center() {
        assert_eq!(XAlign::default(), XAlign::Center);
        assert_eq!(YAlign::default(), YAlign::Center);
    }

    #[test]
    fn bits_decode_back() {
        for align in [XAlign::Left, XAlign::Center, XAlign::Right] {
            assert_eq!(XAlign::from_bits(align as u8), align);
        }
        for align in [YAlign::Top, YAlign::Center, YAlign::Bottom] {
            assert_eq!(YAlign::from_bits(align as u8), align);
        }
    }
}
