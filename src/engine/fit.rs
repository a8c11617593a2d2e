// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Fit an element of fixed aspect ratio inside a container.
//!
//! This is the `object-fit: contain` rule: the largest box with the
//! element's aspect ratio that never overflows either container axis.

/// Result of fitting an element into a container.
///
/// All fields are zero when either the container or the element has not
/// been measured yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FittingScale {
    pub scale_factor: f64,
    pub scaled_width: f64,
    pub scaled_height: f64,
}

impl FittingScale {
    pub fn is_empty(&self) -> bool {
        self.scale_factor == 0.0
    }
}

/// Compute the base scale that fits `element` inside `container`.
///
/// Scaled dimensions are not rounded; rounding happens once, at render time.
pub fn compute_fitting_scale(
    container_width: f64,
    container_height: f64,
    element_width: f64,
    element_height: f64,
) -> FittingScale {
    let measured = [container_width, container_height, element_width, element_height]
        .iter()
        .all(|d| *d > 0.0);
    if !measured {
        return FittingScale::default();
    }

    let mut scale = container_width / element_width;
    if scale * element_height > container_height {
        scale = container_height / element_height;
    }

    FittingScale {
        scale_factor: scale,
        scaled_width: element_width * scale,
        scaled_height: element_height * scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_zero_dimension_degenerates() {
        let cases = [
            (0.0, 600.0, 1600.0, 1200.0),
            (800.0, 0.0, 1600.0, 1200.0),
            (800.0, 600.0, 0.0, 1200.0),
            (800.0, 600.0, 1600.0, 0.0),
        ];
        for (cw, ch, ew, eh) in cases {
            assert_eq!(
                compute_fitting_scale(cw, ch, ew, eh),
                FittingScale::default()
            );
        }
    }

    #[test]
    fn test_wide_image_limited_by_width() {
        let fit = compute_fitting_scale(800.0, 600.0, 1600.0, 400.0);
        assert!((fit.scale_factor - 0.5).abs() < EPS);
        assert!((fit.scaled_width - 800.0).abs() < EPS);
        assert!((fit.scaled_height - 200.0).abs() < EPS);
    }

    #[test]
    fn test_tall_image_limited_by_height() {
        let fit = compute_fitting_scale(800.0, 600.0, 300.0, 1200.0);
        assert!((fit.scale_factor - 0.5).abs() < EPS);
        assert!((fit.scaled_width - 150.0).abs() < EPS);
        assert!((fit.scaled_height - 600.0).abs() < EPS);
    }

    #[test]
    fn test_small_image_is_scaled_up() {
        let fit = compute_fitting_scale(800.0, 600.0, 80.0, 60.0);
        assert!((fit.scale_factor - 10.0).abs() < EPS);
    }

    #[test]
    fn test_never_overflows_and_touches_one_axis() {
        let containers = [(800.0, 600.0), (1280.0, 720.0), (333.0, 777.0), (1.0, 1.0)];
        let elements = [(1600.0, 1200.0), (17.0, 3.0), (3.0, 17.0), (4000.0, 4001.0)];
        for (cw, ch) in containers {
            for (ew, eh) in elements {
                let fit = compute_fitting_scale(cw, ch, ew, eh);
                assert!(fit.scaled_width <= cw + EPS, "{cw}x{ch} / {ew}x{eh}");
                assert!(fit.scaled_height <= ch + EPS, "{cw}x{ch} / {ew}x{eh}");
                let touches =
                    (fit.scaled_width - cw).abs() < 1e-6 || (fit.scaled_height - ch).abs() < 1e-6;
                assert!(touches, "{cw}x{ch} / {ew}x{eh} touches neither axis");
            }
        }
    }
}
