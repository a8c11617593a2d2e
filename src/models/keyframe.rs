// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyframe data structures.
//!
//! A keyframe is a rectangle over the image in normalized coordinates
//! (fractions of the image's natural size), plus a short display label.
//! List order is playback order.

use crate::util::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque keyframe identifier, unique within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyframeId(pub u64);

impl fmt::Display for KeyframeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized rectangle over the image.
///
/// Width and height are kept non-negative by the editor. `x`/`y` are not
/// clamped and may leave `[0, 1]`, and imported data is taken as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub id: KeyframeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub label: String,
}

impl Keyframe {
    pub fn new(id: KeyframeId, rect: Rect, label: impl Into<String>) -> Self {
        Self {
            id,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            label: label.into(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Apply a partial update in place.
    pub fn apply_patch(&mut self, patch: &KeyframePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(label) = &patch.label {
            self.label.clone_from(label);
        }
    }
}

/// Partial update of one keyframe record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub label: Option<String>,
}

impl KeyframePatch {
    /// Patch replacing the full geometry.
    pub fn geometry(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            label: None,
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }
}

/// A proposed mutation of the keyframe list.
///
/// Surfaces never mutate the list themselves; they hand these to the owner
/// of the project, which applies and persists them.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyframeChange {
    Update { id: KeyframeId, patch: KeyframePatch },
    Insert { index: usize, keyframe: Keyframe },
    Delete { id: KeyframeId },
    Reorder { from: usize, to: usize },
}
