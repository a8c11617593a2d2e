// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Translate pointer, wheel and pinch input into viewport updates.
//!
//! Drag pans 1:1 with the pointer, wheel pans in the opposite direction
//! (two-finger scroll convention), and pinch zooms around its origin so the
//! image point under the fingers stays put.

use super::error::ViewportError;
use super::fit::FittingScale;
use super::viewport::ViewportState;
use crate::util::geometry::{Point, Rect, Size};

/// One raw input event, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Drag { dx: f64, dy: f64 },
    Wheel { dx: f64, dy: f64 },
    PinchStart,
    /// `scale_delta` is additive: the new user scale is `user_scale + scale_delta`.
    Pinch { origin: Point, scale_delta: f64 },
    PinchEnd,
}

/// Zoom policy applied by callers before handing deltas to the translator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    /// Multiplicative step for toolbar zoom buttons.
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 20.0,
            step: 1.25,
        }
    }
}

impl ZoomLimits {
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }

    /// Restrict an additive pinch delta so the resulting scale stays in range.
    pub fn clamp_delta(&self, current: f64, delta: f64) -> f64 {
        self.clamp(current + delta) - current
    }

    pub fn zoom_in(&self, current: f64) -> f64 {
        self.clamp(current * self.step)
    }

    pub fn zoom_out(&self, current: f64) -> f64 {
        self.clamp(current / self.step)
    }
}

/// Image point held under the pinch origin for the rest of a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchAnchor {
    origin: Point,
    fraction: Point,
}

/// Stateful input translator for one surface.
///
/// Tracks whether a pinch is in progress (wheel events arriving during a
/// pinch are ignored) and which image point the pinch is holding.
#[derive(Debug, Default)]
pub struct GestureTranslator {
    pinching: bool,
    anchor: Option<PinchAnchor>,
}

impl GestureTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    /// Apply one event to `viewport`.
    ///
    /// `container_origin` is the screen position of the surface's top-left
    /// corner, so the rendered image sits at `container_origin + pan`.
    /// Returns whether the viewport was touched.
    pub fn handle(
        &mut self,
        viewport: &mut ViewportState,
        fit: &FittingScale,
        container_origin: Point,
        event: GestureEvent,
    ) -> Result<bool, ViewportError> {
        match event {
            GestureEvent::Drag { dx, dy } => {
                viewport.pan(dx, dy)?;
                Ok(true)
            }
            GestureEvent::Wheel { dx, dy } => {
                if self.pinching {
                    return Ok(false);
                }
                viewport.pan(-dx, -dy)?;
                Ok(true)
            }
            GestureEvent::PinchStart => {
                self.pinching = true;
                self.anchor = None;
                Ok(false)
            }
            GestureEvent::Pinch {
                origin,
                scale_delta,
            } => {
                self.pinching = true;
                let image_box = viewport.image_rect(container_origin, fit);
                // The fraction is fixed while the origin stays put, so pan
                // rounding cannot accumulate across the gesture.
                let anchor = match self.anchor {
                    Some(anchor) if anchor.origin == origin => anchor,
                    _ => PinchAnchor {
                        origin,
                        fraction: image_box.fraction_of(origin),
                    },
                };
                hold_point(
                    viewport,
                    fit,
                    image_box.origin(),
                    origin,
                    anchor.fraction,
                    viewport.user_scale() + scale_delta,
                )?;
                self.anchor = Some(anchor);
                Ok(true)
            }
            GestureEvent::PinchEnd => {
                self.pinching = false;
                self.anchor = None;
                Ok(false)
            }
        }
    }
}

/// Zoom by `scale_delta` keeping the image point under `origin` fixed.
///
/// `image_position` is the on-screen top-left corner of the rendered image.
pub fn pinch_zoom(
    viewport: &mut ViewportState,
    fit: &FittingScale,
    image_position: Point,
    origin: Point,
    scale_delta: f64,
) -> Result<(), ViewportError> {
    let image_box = Rect::from_origin_size(image_position, viewport.scaled_size(fit));
    hold_point(
        viewport,
        fit,
        image_position,
        origin,
        image_box.fraction_of(origin),
        viewport.user_scale() + scale_delta,
    )
}

/// Rescale so the image point at `fraction` lands exactly on `origin`.
///
/// The pan is solved from `origin` rather than accumulated, so the error
/// never exceeds the half pixel lost to rounding. An axis with no rendered
/// extent keeps its pan.
fn hold_point(
    viewport: &mut ViewportState,
    fit: &FittingScale,
    image_position: Point,
    origin: Point,
    fraction: Point,
    new_scale: f64,
) -> Result<(), ViewportError> {
    let next = Size::new(fit.scaled_width * new_scale, fit.scaled_height * new_scale);
    let dx = if fit.scaled_width != 0.0 {
        origin.x - fraction.x * next.width - image_position.x
    } else {
        0.0
    };
    let dy = if fit.scaled_height != 0.0 {
        origin.y - fraction.y * next.height - image_position.y
    } else {
        0.0
    };
    viewport.apply_zoom(new_scale, dx, dy)
}

/// Zoom to `target_scale` around a fractional anchor of the image
/// (`(0.5, 0.5)` zooms around the image center).
pub fn zoom_to(
    viewport: &mut ViewportState,
    fit: &FittingScale,
    target_scale: f64,
    fx: f64,
    fy: f64,
) -> Result<(), ViewportError> {
    anchored_zoom(viewport, fit, Point::new(fx, fy), target_scale)
}

fn anchored_zoom(
    viewport: &mut ViewportState,
    fit: &FittingScale,
    fraction: Point,
    new_scale: f64,
) -> Result<(), ViewportError> {
    let current = viewport.scaled_size(fit);
    let next = Size::new(fit.scaled_width * new_scale, fit.scaled_height * new_scale);

    let image_delta_x = fraction.x * current.width;
    let image_delta_y = fraction.y * current.height;
    let new_image_delta_x = fraction.x * next.width;
    let new_image_delta_y = fraction.y * next.height;

    viewport.apply_zoom(
        new_scale,
        -(new_image_delta_x - image_delta_x),
        -(new_image_delta_y - image_delta_y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fit::compute_fitting_scale;

    fn setup() -> (ViewportState, FittingScale) {
        let fit = compute_fitting_scale(800.0, 600.0, 1600.0, 1200.0);
        let mut vp = ViewportState::new();
        vp.recenter(800.0, 600.0, &fit).unwrap();
        (vp, fit)
    }

    /// Image fraction currently under a screen point.
    fn fraction_under(vp: &ViewportState, fit: &FittingScale, origin: Point, p: Point) -> Point {
        vp.image_rect(origin, fit).fraction_of(p)
    }

    #[test]
    fn test_drag_pans_one_to_one() {
        let (mut vp, fit) = setup();
        let mut gestures = GestureTranslator::new();
        gestures
            .handle(&mut vp, &fit, Point::default(), GestureEvent::Drag { dx: 12.0, dy: -7.0 })
            .unwrap();
        assert_eq!((vp.pan_x(), vp.pan_y()), (12.0, -7.0));
    }

    #[test]
    fn test_wheel_pans_inverted() {
        let (mut vp, fit) = setup();
        let mut gestures = GestureTranslator::new();
        gestures
            .handle(&mut vp, &fit, Point::default(), GestureEvent::Wheel { dx: 5.0, dy: 9.0 })
            .unwrap();
        assert_eq!((vp.pan_x(), vp.pan_y()), (-5.0, -9.0));
    }

    #[test]
    fn test_wheel_ignored_during_pinch() {
        let (mut vp, fit) = setup();
        let mut gestures = GestureTranslator::new();
        let origin = Point::default();
        gestures
            .handle(&mut vp, &fit, origin, GestureEvent::PinchStart)
            .unwrap();
        let moved = gestures
            .handle(&mut vp, &fit, origin, GestureEvent::Wheel { dx: 5.0, dy: 5.0 })
            .unwrap();
        assert!(!moved);
        assert_eq!((vp.pan_x(), vp.pan_y()), (0.0, 0.0));

        gestures
            .handle(&mut vp, &fit, origin, GestureEvent::PinchEnd)
            .unwrap();
        assert!(gestures
            .handle(&mut vp, &fit, origin, GestureEvent::Wheel { dx: 5.0, dy: 5.0 })
            .unwrap());
    }

    fn pinch(
        gestures: &mut GestureTranslator,
        vp: &mut ViewportState,
        fit: &FittingScale,
        container: Point,
        origin: Point,
        scale_delta: f64,
    ) {
        gestures
            .handle(vp, fit, container, GestureEvent::Pinch { origin, scale_delta })
            .unwrap();
    }

    #[test]
    fn test_pinch_keeps_point_under_origin() {
        let (mut vp, fit) = setup();
        let mut gestures = GestureTranslator::new();
        let container = Point::new(40.0, 25.0);
        let origin = Point::new(237.0, 411.0);
        let held = fraction_under(&vp, &fit, container, origin);

        gestures
            .handle(&mut vp, &fit, container, GestureEvent::PinchStart)
            .unwrap();
        for delta in [0.5, 0.25, -0.6, 1.7, 0.05, -0.9] {
            pinch(&mut gestures, &mut vp, &fit, container, origin, delta);
            let now = fraction_under(&vp, &fit, container, origin);
            let size = vp.scaled_size(&fit);
            assert!(((now.x - held.x) * size.width).abs() <= 1.0);
            assert!(((now.y - held.y) * size.height).abs() <= 1.0);
        }
        assert!((vp.user_scale() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_sequence_does_not_drift() {
        let (_, fit) = setup();
        let mut gestures = GestureTranslator::new();
        let container = Point::default();
        for i in 0..79 {
            let origin = Point::new(3.0 + 10.0 * f64::from(i), 7.0 + 7.5 * f64::from(i));
            let (mut vp, _) = setup();
            let held = fraction_under(&vp, &fit, container, origin);

            gestures
                .handle(&mut vp, &fit, container, GestureEvent::PinchStart)
                .unwrap();
            for _ in 0..10 {
                pinch(&mut gestures, &mut vp, &fit, container, origin, 0.3);
            }
            gestures
                .handle(&mut vp, &fit, container, GestureEvent::PinchEnd)
                .unwrap();

            let now = fraction_under(&vp, &fit, container, origin);
            let size = vp.scaled_size(&fit);
            assert!(((now.x - held.x) * size.width).abs() <= 1.0, "x drift at {:?}", origin);
            assert!(((now.y - held.y) * size.height).abs() <= 1.0, "y drift at {:?}", origin);
        }
    }

    #[test]
    fn test_moved_origin_reanchors() {
        let (mut vp, fit) = setup();
        let mut gestures = GestureTranslator::new();
        let container = Point::default();
        gestures
            .handle(&mut vp, &fit, container, GestureEvent::PinchStart)
            .unwrap();
        pinch(&mut gestures, &mut vp, &fit, container, Point::new(100.0, 100.0), 0.5);

        let moved = Point::new(500.0, 350.0);
        let held = fraction_under(&vp, &fit, container, moved);
        pinch(&mut gestures, &mut vp, &fit, container, moved, 0.5);
        let now = fraction_under(&vp, &fit, container, moved);
        let size = vp.scaled_size(&fit);
        assert!(((now.x - held.x) * size.width).abs() <= 1.0);
        assert!(((now.y - held.y) * size.height).abs() <= 1.0);
    }

    #[test]
    fn test_pinch_is_not_centered_zoom() {
        let (mut vp, fit) = setup();
        // Anchor at the image's top-left corner: pan must not move.
        pinch_zoom(&mut vp, &fit, Point::new(0.0, 0.0), Point::new(0.0, 0.0), 1.0).unwrap();
        assert_eq!((vp.pan_x(), vp.pan_y()), (0.0, 0.0));
        assert_eq!(vp.user_scale(), 2.0);
    }

    #[test]
    fn test_pinch_on_unsized_image_anchors_top_left() {
        let fit = FittingScale::default();
        let mut vp = ViewportState::new();
        vp.set_pan(10.0, 10.0).unwrap();
        pinch_zoom(&mut vp, &fit, Point::new(10.0, 10.0), Point::new(300.0, 200.0), 0.5)
            .unwrap();
        assert_eq!((vp.pan_x(), vp.pan_y()), (10.0, 10.0));
        assert_eq!(vp.user_scale(), 1.5);
    }

    #[test]
    fn test_pinch_to_non_positive_scale_is_rejected() {
        let (mut vp, fit) = setup();
        let err = pinch_zoom(&mut vp, &fit, Point::default(), Point::new(1.0, 1.0), -1.0);
        assert!(err.is_err());
        assert_eq!(vp.user_scale(), 1.0);
    }

    #[test]
    fn test_zoom_to_center_anchor() {
        let (mut vp, fit) = setup();
        zoom_to(&mut vp, &fit, 2.0, 0.5, 0.5).unwrap();
        // 800x600 grows to 1600x1200; center stays at (400, 300).
        assert_eq!((vp.pan_x(), vp.pan_y()), (-400.0, -300.0));

        zoom_to(&mut vp, &fit, 1.0, 0.5, 0.5).unwrap();
        assert_eq!((vp.pan_x(), vp.pan_y()), (0.0, 0.0));
    }

    #[test]
    fn test_zoom_limits() {
        let limits = ZoomLimits::default();
        assert_eq!(limits.clamp(100.0), limits.max);
        assert_eq!(limits.clamp_delta(19.5, 5.0), 0.5);
        assert!((limits.zoom_in(1.0) - 1.25).abs() < 1e-12);
        assert!((limits.zoom_out(1.25) - 1.0).abs() < 1e-12);
    }
}
