// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyframe-to-container projection.
//!
//! Where [`compute_fitting_scale`](super::fit::compute_fitting_scale) fits the
//! whole image, [`project`] fits one keyframe rectangle and then places the
//! full, oversized image so that rectangle sits centered in the container.
//! Editor preview and presentation both use this, so the ceil/floor steps
//! below must stay exactly as they are: neighbouring frames then share pixel
//! seams and transitions do not open gaps.

use crate::models::keyframe::Keyframe;
use crate::util::geometry::Rect;

/// Absolute placement of the full image inside a container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Transform {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Component-wise interpolation, `t` in `[0, 1]`.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            left: lerp(self.left, to.left, t),
            top: lerp(self.top, to.top, t),
            width: lerp(self.width, to.width, t),
            height: lerp(self.height, to.height, t),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// All intermediate results of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projection {
    pub scale: f64,
    /// Where to draw the full image.
    pub image: Transform,
    /// Where the keyframe rectangle lands inside the container.
    pub keyframe: Transform,
}

impl Projection {
    /// The part of the image a container of this size shows, as image
    /// fractions. Wider than the keyframe on the non-limiting axis.
    pub fn visible_region(&self, container_width: f64, container_height: f64) -> Rect {
        let image = &self.image;
        if image.width <= 0.0 || image.height <= 0.0 {
            return Rect::default();
        }
        Rect::new(
            -image.left / image.width,
            -image.top / image.height,
            container_width / image.width,
            container_height / image.height,
        )
    }
}

/// Project `keyframe` so it exactly fills the container's limiting axis.
pub fn project(
    keyframe: &Keyframe,
    image_natural_width: f64,
    image_natural_height: f64,
    container_width: f64,
    container_height: f64,
) -> Transform {
    project_detailed(
        &keyframe.rect(),
        image_natural_width,
        image_natural_height,
        container_width,
        container_height,
    )
    .image
}

/// Same as [`project`], for a bare normalized rectangle, keeping the
/// intermediate scale and keyframe box.
pub fn project_detailed(
    rect: &Rect,
    image_natural_width: f64,
    image_natural_height: f64,
    container_width: f64,
    container_height: f64,
) -> Projection {
    let kw = (rect.width * image_natural_width).ceil();
    let kh = (rect.height * image_natural_height).ceil();

    let mut scale = if kw != 0.0 { container_width / kw } else { 0.0 };
    if scale * kh > container_height {
        scale = if kh != 0.0 { container_height / kh } else { 0.0 };
    }

    let scaled_image_width = (image_natural_width * scale).ceil();
    let scaled_image_height = (image_natural_height * scale).ceil();

    let scaled_keyframe_x = (rect.x * scaled_image_width).floor();
    let scaled_keyframe_y = (rect.y * scaled_image_height).floor();

    let scaled_keyframe_width = (kw * scale).ceil();
    let scaled_keyframe_height = (kh * scale).ceil();

    let left = (container_width - scaled_keyframe_width) / 2.0 - scaled_keyframe_x;
    let top = (container_height - scaled_keyframe_height) / 2.0 - scaled_keyframe_y;

    Projection {
        scale,
        image: Transform::new(left, top, scaled_image_width, scaled_image_height),
        keyframe: Transform::new(
            left + scaled_keyframe_x,
            top + scaled_keyframe_y,
            scaled_keyframe_width,
            scaled_keyframe_height,
        ),
    }
}
