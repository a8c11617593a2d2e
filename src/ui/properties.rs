// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyframe list and playback settings panel.

use panframe::engine::Easing;
use panframe::models::keyframe::{KeyframeChange, KeyframeId, KeyframePatch};
use panframe::models::project::{PlaybackSettings, Project};

/// Edits requested from the properties panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    Select(KeyframeId),
    /// Structural change; recorded in history.
    Change(KeyframeChange),
    /// Label edit; applied without a history entry per keystroke.
    Rename(KeyframeChange),
    Settings(PlaybackSettings),
}

/// Show the properties panel for `project`.
pub fn show(
    ui: &mut egui::Ui,
    project: &Project,
    active: Option<KeyframeId>,
) -> Vec<PropertiesAction> {
    let mut actions = Vec::new();

    ui.heading("Keyframes");
    ui.separator();

    if project.keyframes.is_empty() {
        ui.label(egui::RichText::new("No keyframes yet").italics().weak());
    }

    let count = project.keyframes.len();
    egui::ScrollArea::vertical()
        .max_height(ui.available_height() * 0.6)
        .show(ui, |ui| {
            for (index, keyframe) in project.keyframes.iter().enumerate() {
                ui.horizontal(|ui| {
                    let title = if keyframe.label.is_empty() {
                        format!("{}. (untitled)", index + 1)
                    } else {
                        format!("{}. {}", index + 1, keyframe.label)
                    };
                    if ui
                        .selectable_label(active == Some(keyframe.id), title)
                        .clicked()
                    {
                        actions.push(PropertiesAction::Select(keyframe.id));
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                            actions.push(PropertiesAction::Change(KeyframeChange::Delete {
                                id: keyframe.id,
                            }));
                        }
                        if ui
                            .add_enabled(index + 1 < count, egui::Button::new("⏷").small())
                            .clicked()
                        {
                            actions.push(PropertiesAction::Change(KeyframeChange::Reorder {
                                from: index,
                                to: index + 1,
                            }));
                        }
                        if ui
                            .add_enabled(index > 0, egui::Button::new("⏶").small())
                            .clicked()
                        {
                            actions.push(PropertiesAction::Change(KeyframeChange::Reorder {
                                from: index,
                                to: index - 1,
                            }));
                        }
                    });
                });
            }
        });

    if let Some(keyframe) = active.and_then(|id| project.keyframe(id)) {
        ui.separator();
        ui.label(egui::RichText::new(format!("Keyframe {}", keyframe.id)).strong());

        let mut label = keyframe.label.clone();
        ui.horizontal(|ui| {
            ui.label("Label:");
            if ui.text_edit_singleline(&mut label).changed() {
                actions.push(PropertiesAction::Rename(KeyframeChange::Update {
                    id: keyframe.id,
                    patch: KeyframePatch::label(label.clone()),
                }));
            }
        });

        egui::Grid::new("keyframe_geometry")
            .num_columns(2)
            .show(ui, |ui| {
                for (name, value) in [
                    ("x", keyframe.x),
                    ("y", keyframe.y),
                    ("width", keyframe.width),
                    ("height", keyframe.height),
                ] {
                    ui.label(name);
                    ui.label(format!("{:.3}", value));
                    ui.end_row();
                }
            });
    }

    ui.separator();
    ui.heading("Playback");

    let mut settings = project.settings;
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label("Duration:");
        changed |= ui
            .add(egui::Slider::new(&mut settings.animation_duration_ms, 0..=5000).suffix(" ms"))
            .changed();
    });
    ui.horizontal(|ui| {
        ui.label("Easing:");
        egui::ComboBox::from_id_source("easing")
            .selected_text(easing_name(settings.animation_type))
            .show_ui(ui, |ui| {
                for easing in [Easing::Ease, Easing::Linear] {
                    changed |= ui
                        .selectable_value(&mut settings.animation_type, easing, easing_name(easing))
                        .changed();
                }
            });
    });
    if changed {
        actions.push(PropertiesAction::Settings(settings));
    }

    actions
}

fn easing_name(easing: Easing) -> &'static str {
    match easing {
        Easing::Linear => "linear",
        Easing::Ease => "ease",
    }
}
