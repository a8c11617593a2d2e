// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pan and zoom state for one interactive surface.
//!
//! A [`ViewportState`] is owned by exactly one canvas. Pan offsets are
//! whole pixels: every update rounds, so subpixel error never accumulates
//! into a blurry render. Updates that would produce a non-finite value are
//! rejected and leave the state untouched.

use super::error::ViewportError;
use super::fit::FittingScale;
use crate::util::geometry::{Point, Rect, Size};

/// The (pan-x, pan-y, user-scale) triple of a surface.
///
/// `pan_x`/`pan_y` place the top-left corner of the rendered image relative
/// to the container's top-left corner. `user_scale` multiplies the base fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pan_x: f64,
    pan_y: f64,
    user_scale: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    pub fn new() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            user_scale: 1.0,
        }
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn user_scale(&self) -> f64 {
        self.user_scale
    }

    /// Translate by a pixel delta.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<(), ViewportError> {
        self.set_pan(self.pan_x + dx, self.pan_y + dy)
    }

    /// Place the image's top-left corner at an absolute pixel offset.
    pub fn set_pan(&mut self, x: f64, y: f64) -> Result<(), ViewportError> {
        let x = finite("pan_x", x)?;
        let y = finite("pan_y", y)?;
        self.pan_x = x.round();
        self.pan_y = y.round();
        Ok(())
    }

    pub fn set_user_scale(&mut self, factor: f64) -> Result<(), ViewportError> {
        self.user_scale = valid_scale(factor)?;
        Ok(())
    }

    /// Change scale and pan together; either both apply or neither does.
    pub fn apply_zoom(&mut self, scale: f64, dx: f64, dy: f64) -> Result<(), ViewportError> {
        let scale = valid_scale(scale)?;
        let x = finite("pan_x", self.pan_x + dx)?;
        let y = finite("pan_y", self.pan_y + dy)?;
        self.user_scale = scale;
        self.pan_x = x.round();
        self.pan_y = y.round();
        Ok(())
    }

    /// Center the fitted image in the container and reset the user scale.
    pub fn recenter(
        &mut self,
        container_width: f64,
        container_height: f64,
        fit: &FittingScale,
    ) -> Result<(), ViewportError> {
        let x = finite("pan_x", (container_width - fit.scaled_width) / 2.0)?;
        let y = finite("pan_y", (container_height - fit.scaled_height) / 2.0)?;
        self.pan_x = x.round();
        self.pan_y = y.round();
        self.user_scale = 1.0;
        log::debug!("Recentered viewport at ({}, {})", self.pan_x, self.pan_y);
        Ok(())
    }

    /// Rendered image size: base fit times user scale.
    pub fn scaled_size(&self, fit: &FittingScale) -> Size {
        Size::new(
            fit.scaled_width * self.user_scale,
            fit.scaled_height * self.user_scale,
        )
    }

    /// Rendered image box in the coordinate space of `container_origin`.
    pub fn image_rect(&self, container_origin: Point, fit: &FittingScale) -> Rect {
        Rect::from_origin_size(
            Point::new(container_origin.x + self.pan_x, container_origin.y + self.pan_y),
            self.scaled_size(fit),
        )
    }

    /// Zoom indicator value, e.g. `150` for a 1.5 user scale.
    pub fn zoom_percent(&self) -> f64 {
        (self.user_scale * 100.0).round()
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ViewportError> {
    if value.is_finite() {
        Ok(value)
    } else {
        log::error!("Rejected non-finite {}: {}", field, value);
        Err(ViewportError::NonFinite { field, value })
    }
}

fn valid_scale(value: f64) -> Result<f64, ViewportError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        log::error!("Rejected user scale: {}", value);
        Err(ViewportError::InvalidScale(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fit::compute_fitting_scale;

    #[test]
    fn test_pan_rounds_to_whole_pixels() {
        let mut vp = ViewportState::new();
        vp.pan(10.4, -3.6).unwrap();
        assert_eq!(vp.pan_x(), 10.0);
        assert_eq!(vp.pan_y(), -4.0);

        vp.pan(0.4, 0.4).unwrap();
        vp.pan(0.4, 0.4).unwrap();
        // Each step rounds, so sub-pixel drags do not accumulate.
        assert_eq!(vp.pan_x(), 10.0);
        assert_eq!(vp.pan_y(), -4.0);
    }

    #[test]
    fn test_non_finite_pan_is_rejected() {
        let mut vp = ViewportState::new();
        vp.pan(5.0, 5.0).unwrap();

        let err = vp.pan(f64::NAN, 0.0).unwrap_err();
        assert!(matches!(err, ViewportError::NonFinite { field: "pan_x", .. }));
        assert!(vp.pan(0.0, f64::INFINITY).is_err());

        assert_eq!(vp.pan_x(), 5.0);
        assert_eq!(vp.pan_y(), 5.0);
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let mut vp = ViewportState::new();
        assert_eq!(
            vp.set_user_scale(0.0),
            Err(ViewportError::InvalidScale(0.0))
        );
        assert!(vp.set_user_scale(-1.0).is_err());
        assert!(vp.set_user_scale(f64::NAN).is_err());
        assert_eq!(vp.user_scale(), 1.0);

        vp.set_user_scale(250.0).unwrap();
        assert_eq!(vp.user_scale(), 250.0);
    }

    #[test]
    fn test_apply_zoom_is_atomic() {
        let mut vp = ViewportState::new();
        vp.set_pan(20.0, 30.0).unwrap();
        assert!(vp.apply_zoom(2.0, f64::NAN, 0.0).is_err());
        assert_eq!(vp.user_scale(), 1.0);
        assert_eq!(vp.pan_x(), 20.0);
    }

    #[test]
    fn test_recenter_centers_fitted_image() {
        let fit = compute_fitting_scale(800.0, 600.0, 1600.0, 400.0);
        let mut vp = ViewportState::new();
        vp.set_user_scale(3.0).unwrap();
        vp.recenter(800.0, 600.0, &fit).unwrap();
        assert_eq!(vp.pan_x(), 0.0);
        assert_eq!(vp.pan_y(), 200.0);
        assert_eq!(vp.user_scale(), 1.0);
    }

    #[test]
    fn test_recenter_with_nan_container_fails_loudly() {
        let fit = compute_fitting_scale(800.0, 600.0, 1600.0, 400.0);
        let mut vp = ViewportState::new();
        assert!(vp.recenter(f64::NAN, 600.0, &fit).is_err());
    }

    #[test]
    fn test_image_rect_follows_pan_and_scale() {
        let fit = compute_fitting_scale(800.0, 600.0, 800.0, 600.0);
        let mut vp = ViewportState::new();
        vp.apply_zoom(1.5, 10.0, 20.0).unwrap();
        let rect = vp.image_rect(Point::new(100.0, 100.0), &fit);
        assert_eq!(rect, Rect::new(110.0, 120.0, 1200.0, 900.0));
        assert_eq!(vp.zoom_percent(), 150.0);
    }
}
