// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric value types and coordinate conversions.
//!
//! This module provides the small set of `f64` value types shared by the
//! engine, plus utilities for converting between pixel coordinates and
//! normalized (image-fraction) coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point. Depending on context this is in screen pixels or in
/// normalized image fractions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True once both dimensions have been measured (non-zero, not NaN).
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Rectangle spanned by two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Position of `p` as a fraction of this box.
    ///
    /// An axis with zero extent maps to 0 (top-left anchor).
    pub fn fraction_of(&self, p: Point) -> Point {
        let fx = if self.width != 0.0 {
            (p.x - self.x) / self.width
        } else {
            0.0
        };
        let fy = if self.height != 0.0 {
            (p.y - self.y) / self.height
        } else {
            0.0
        };
        Point::new(fx, fy)
    }

    /// Screen position of a fractional point inside this box.
    pub fn point_at(&self, fraction: Point) -> Point {
        Point::new(
            self.x + fraction.x * self.width,
            self.y + fraction.y * self.height,
        )
    }

    /// Map a rectangle given in fractions of this box to absolute coordinates.
    pub fn sub_rect(&self, fraction: &Rect) -> Rect {
        Rect::from_origin_size(
            self.point_at(fraction.origin()),
            Size::new(fraction.width * self.width, fraction.height * self.height),
        )
    }
}
