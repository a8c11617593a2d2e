// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Presentation surface: the image framed on the current keyframe.

use crate::ui::full_uv;
use egui::{Align2, Color32, FontId, Sense};
use panframe::engine::{DecodeError, TransitionScheduler};
use panframe::util::geometry::Size;
use std::time::Instant;

/// Read-only inputs for one frame of the presentation.
pub struct PresentationView<'a> {
    pub texture: Option<&'a egui::TextureHandle>,
    pub natural: Size,
    pub loading: bool,
    pub failure: Option<&'a DecodeError>,
    /// Transient message shown over the image, e.g. an unresolved start keyframe.
    pub notice: Option<&'a str>,
}

/// Show the presentation surface. Clicking the right half advances, the
/// left half steps back.
pub fn show(ui: &mut egui::Ui, view: PresentationView, scheduler: &mut TransitionScheduler) {
    let now = Instant::now();
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Color32::BLACK);

    scheduler.set_stage(
        view.natural,
        Size::new(f64::from(rect.width()), f64::from(rect.height())),
    );

    if let Some(pos) = response.interact_pointer_pos().filter(|_| response.clicked()) {
        if pos.x >= rect.center().x {
            scheduler.next(now);
        } else {
            scheduler.previous(now);
        }
    }

    let centered = |text: &str| {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(22.0),
            Color32::GRAY,
        );
    };

    match (view.texture, scheduler.sample(now)) {
        (Some(texture), Some(transform)) => {
            let image_rect = egui::Rect::from_min_size(
                rect.min + egui::vec2(transform.left as f32, transform.top as f32),
                egui::vec2(transform.width as f32, transform.height as f32),
            );
            painter.image(texture.id(), image_rect, full_uv(), Color32::WHITE);
        }
        _ if view.loading => {
            centered("Rendering...");
            ui.ctx().request_repaint();
        }
        (None, _) => match view.failure {
            Some(DecodeError::NotFound(source)) => centered(&format!("Image not found: {}", source)),
            Some(err) => centered(&err.to_string()),
            None => centered("No image"),
        },
        (Some(_), None) if scheduler.is_empty() => centered("No keyframes to present"),
        (Some(_), None) => {}
    }

    if let Some(keyframe) = scheduler.current_keyframe() {
        let index = scheduler.current_index().map_or(0, |i| i + 1);
        let caption = if keyframe.label.is_empty() {
            format!("{} / {}", index, scheduler.len())
        } else {
            format!("{} / {}  {}", index, scheduler.len(), keyframe.label)
        };
        painter.text(
            rect.center_bottom() + egui::vec2(0.0, -12.0),
            Align2::CENTER_BOTTOM,
            caption,
            FontId::proportional(15.0),
            Color32::from_white_alpha(200),
        );
    }

    if let Some(notice) = view.notice {
        painter.text(
            rect.center_top() + egui::vec2(0.0, 12.0),
            Align2::CENTER_TOP,
            notice,
            FontId::proportional(15.0),
            Color32::LIGHT_RED,
        );
    }

    if scheduler.is_animating(Instant::now()) {
        ui.ctx().request_repaint();
    }
}
