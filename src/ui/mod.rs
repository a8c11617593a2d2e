// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the PANFRAME application.

pub mod canvas;
pub mod presentation;
pub mod properties;
pub mod toolbar;

use panframe::util::geometry::{Point, Rect};

/// Convert an egui screen position to an engine point.
pub fn to_point(pos: egui::Pos2) -> Point {
    Point::new(f64::from(pos.x), f64::from(pos.y))
}

/// Convert an engine rectangle to an egui screen rectangle.
pub fn to_egui_rect(rect: &Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

/// Full-texture UV rectangle.
pub fn full_uv() -> egui::Rect {
    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0))
}
