// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar for the editor and presentation screens.
//!
//! The toolbar only reports what was clicked; the app owns every state
//! change.

use panframe::engine::{EditorMode, TransitionScheduler};

/// Buttons the toolbar can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    NewKeyframe,
    ZoomIn,
    ZoomOut,
    ResetView,
    Present,
    First,
    Previous,
    Next,
    Last,
    ExitPresentation,
}

/// Editor toolbar: keyframe creation and zoom controls.
pub fn show_editor(
    ui: &mut egui::Ui,
    mode: EditorMode,
    zoom_percent: f64,
    has_image: bool,
    keyframe_count: usize,
) -> Option<ToolbarAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let creating = mode == EditorMode::CreateKeyframe;
        if ui
            .add_enabled(has_image && !creating, egui::Button::new("＋ Keyframe"))
            .clicked()
        {
            action = Some(ToolbarAction::NewKeyframe);
        }

        ui.separator();

        if ui.add_enabled(has_image, egui::Button::new("－")).clicked() {
            action = Some(ToolbarAction::ZoomOut);
        }
        ui.label(format!("{:.0}%", zoom_percent));
        if ui.add_enabled(has_image, egui::Button::new("＋")).clicked() {
            action = Some(ToolbarAction::ZoomIn);
        }
        if ui.add_enabled(has_image, egui::Button::new("Fit")).clicked() {
            action = Some(ToolbarAction::ResetView);
        }

        ui.separator();

        if ui
            .add_enabled(keyframe_count > 0, egui::Button::new("▶ Present"))
            .clicked()
        {
            action = Some(ToolbarAction::Present);
        }

        ui.separator();

        let hint = match mode {
            EditorMode::View => "Drag to pan, scroll or pinch to zoom, click a keyframe to edit it",
            EditorMode::CreateKeyframe => {
                "Drag across the image to frame the keyframe, Escape to cancel"
            }
            EditorMode::EditKeyframe => "Drag the box to move it or a corner to resize it",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });
    action
}

/// Presentation toolbar: navigation and position.
pub fn show_presentation(ui: &mut egui::Ui, scheduler: &TransitionScheduler) -> Option<ToolbarAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui
            .add_enabled(scheduler.can_previous(), egui::Button::new("⏮"))
            .clicked()
        {
            action = Some(ToolbarAction::First);
        }
        if ui
            .add_enabled(scheduler.can_previous(), egui::Button::new("◀"))
            .clicked()
        {
            action = Some(ToolbarAction::Previous);
        }

        let position = scheduler.current_index().map_or(0, |i| i + 1);
        ui.label(format!("{} / {}", position, scheduler.len()));

        if ui
            .add_enabled(scheduler.can_next(), egui::Button::new("▶"))
            .clicked()
        {
            action = Some(ToolbarAction::Next);
        }
        if ui
            .add_enabled(scheduler.can_next(), egui::Button::new("⏭"))
            .clicked()
        {
            action = Some(ToolbarAction::Last);
        }

        ui.separator();

        if ui.button("✕ Exit").clicked() {
            action = Some(ToolbarAction::ExitPresentation);
        }
    });
    action
}
