// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stock renderables.
//!
//! Colors are packed `0xRRGGBBAA`. Each shape keeps a *requested* color,
//! writable from any thread, and a *presented* color that only changes when
//! the render thread runs [`Renderable::sync_visuals`]. Content changes do
//! not schedule a sync on their own; follow them with
//! [`Screen::request_sync`](tether_core::screen::Screen::request_sync).

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use kurbo::{Line as Segment, Point, Shape, Size};
use tether_core::backend::Renderable;

/// Opaque black.
pub const BLACK: u32 = 0x0000_00ff;

#[derive(Debug)]
struct Paint {
    requested: AtomicU32,
    presented: AtomicU32,
}

impl Paint {
    fn new(color: u32) -> Self {
        Self {
            requested: AtomicU32::new(color),
            presented: AtomicU32::new(color),
        }
    }

    fn set(&self, color: u32) -> bool {
        self.requested.swap(color, Ordering::Relaxed) != color
    }

    fn present(&self) {
        let color = self.requested.load(Ordering::Relaxed);
        self.presented.store(color, Ordering::Relaxed);
    }
}

/// A straight stroked segment.
///
/// The size is the segment's bounding box, so an entity holding a line is
/// positioned by that box.
#[derive(Debug)]
pub struct Line {
    segment: Mutex<Segment>,
    paint: Paint,
}

impl Line {
    /// Creates a black line between two points.
    #[must_use]
    pub fn new(p0: Point, p1: Point) -> Self {
        Self::with_color(p0, p1, BLACK)
    }

    /// Creates a line with the given stroke color.
    #[must_use]
    pub fn with_color(p0: Point, p1: Point, color: u32) -> Self {
        Self {
            segment: Mutex::new(Segment::new(p0, p1)),
            paint: Paint::new(color),
        }
    }

    /// Returns the current endpoints.
    #[must_use]
    pub fn segment(&self) -> Segment {
        *self.segment.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the endpoints.
    pub fn set_points(&self, p0: Point, p1: Point) {
        *self.segment.lock().unwrap_or_else(PoisonError::into_inner) = Segment::new(p0, p1);
    }

    /// Sets the stroke color. Returns whether it changed.
    pub fn set_color(&self, color: u32) -> bool {
        self.paint.set(color)
    }

    /// Returns the stroke color as of the latest applied sync.
    #[must_use]
    pub fn presented_color(&self) -> u32 {
        self.paint.presented.load(Ordering::Relaxed)
    }
}

impl Renderable for Line {
    fn size(&self) -> Size {
        self.segment().bounding_box().size()
    }

    fn sync_visuals(&self) {
        self.paint.present();
    }
}

/// A filled rectangle.
#[derive(Debug)]
pub struct Block {
    size: Mutex<Size>,
    paint: Paint,
}

impl Block {
    /// Creates a black block.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self::with_color(size, BLACK)
    }

    /// Creates a block with the given fill color.
    #[must_use]
    pub fn with_color(size: Size, color: u32) -> Self {
        Self {
            size: Mutex::new(size),
            paint: Paint::new(color),
        }
    }

    /// Resizes the block.
    pub fn set_size(&self, size: Size) {
        *self.size.lock().unwrap_or_else(PoisonError::into_inner) = size;
    }

    /// Sets the fill color. Returns whether it changed.
    pub fn set_color(&self, color: u32) -> bool {
        self.paint.set(color)
    }

    /// Returns the fill color as of the latest applied sync.
    #[must_use]
    pub fn presented_color(&self) -> u32 {
        self.paint.presented.load(Ordering::Relaxed)
    }
}

impl Renderable for Block {
    fn size(&self) -> Size {
        *self.size.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sync_visuals(&self) {
        self.paint.present();
    }
}
