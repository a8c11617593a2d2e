// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor canvas: the image under pan/zoom with keyframe boxes on top.
//!
//! The canvas owns no project state. It routes pointer input to the
//! viewport, the gesture translator and the keyframe editor, and hands
//! proposed keyframe changes back to the app.

use crate::ui::{full_uv, to_egui_rect, to_point};
use egui::{Align2, Color32, FontId, PointerButton, Sense, Stroke};
use panframe::engine::editor::keyframe_screen_rect;
use panframe::engine::gesture::zoom_to;
use panframe::engine::projection::project_detailed;
use panframe::engine::{
    compute_fitting_scale, DecodeError, DragTarget, EditorMode, FittingScale, GestureEvent,
    GestureTranslator, KeyframeEditor, ViewportState,
};
use panframe::models::keyframe::{KeyframeChange, KeyframeId};
use panframe::models::project::Project;
use panframe::util::geometry::{Point, Rect, Size};

const KEYFRAME_COLOR: Color32 = Color32::from_rgb(100, 200, 255);
const ACTIVE_COLOR: Color32 = Color32::from_rgb(255, 200, 0);
const HANDLE_SIZE: f32 = 5.0;

/// What the canvas wants the app to do after this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    /// A drag on a keyframe started; snapshot for undo.
    BeginEdit,
    /// Apply this change to the project.
    Propose(KeyframeChange),
}

/// Read-only inputs for one frame of the canvas.
pub struct CanvasView<'a> {
    pub project: Option<&'a Project>,
    pub texture: Option<&'a egui::TextureHandle>,
    pub natural: Size,
    pub loading: bool,
    pub failure: Option<&'a DecodeError>,
}

/// Mutable engine state driven by the canvas.
pub struct CanvasEngine<'a> {
    pub editor: &'a mut KeyframeEditor,
    pub viewport: &'a mut ViewportState,
    pub gestures: &'a mut GestureTranslator,
    /// Set when a new image was installed; cleared once the view is centered.
    pub needs_recenter: &'a mut bool,
}

/// Show the editor canvas.
pub fn show(ui: &mut egui::Ui, view: CanvasView, engine: CanvasEngine) -> Vec<CanvasAction> {
    let CanvasEngine {
        editor,
        viewport,
        gestures,
        needs_recenter,
    } = engine;
    let mut actions = Vec::new();
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Color32::from_gray(30));

    let Some(project) = view.project else {
        status(&painter, rect, "Open an image or a project to begin");
        return actions;
    };

    let Some(texture) = view.texture else {
        if view.loading {
            status(&painter, rect, "Loading image...");
            ui.ctx().request_repaint();
        } else if let Some(DecodeError::NotFound(source)) = view.failure {
            status(&painter, rect, &format!("Image not found: {}", source));
        } else if let Some(err) = view.failure {
            status(&painter, rect, &err.to_string());
        }
        return actions;
    };

    let container = Size::new(f64::from(rect.width()), f64::from(rect.height()));
    let fit = compute_fitting_scale(
        container.width,
        container.height,
        view.natural.width,
        view.natural.height,
    );
    if *needs_recenter && !fit.is_empty() {
        if let Err(e) = viewport.recenter(container.width, container.height, &fit) {
            log::error!("Failed to recenter view: {}", e);
        }
        *needs_recenter = false;
    }

    let origin = to_point(rect.min);
    let image_box = viewport.image_rect(origin, &fit);
    painter.image(
        texture.id(),
        to_egui_rect(&image_box),
        full_uv(),
        Color32::WHITE,
    );
    draw_keyframes(&painter, project, editor, &image_box);
    draw_presentation_frame(&painter, project, editor, &image_box, view.natural, container);

    // A failed reload keeps the previous image on screen.
    if let Some(err) = view.failure {
        painter.text(
            rect.left_bottom() + egui::vec2(8.0, -8.0),
            Align2::LEFT_BOTTOM,
            err.to_string(),
            FontId::proportional(13.0),
            Color32::LIGHT_RED,
        );
    }

    let surface = Surface {
        fit,
        origin,
        image_box,
    };
    handle_pointer(ui, &response, project, editor, viewport, gestures, &surface, &mut actions);
    handle_zoom_and_scroll(ui, &response, editor, viewport, gestures, &surface);

    actions
}

/// Per-frame layout shared by the input handlers.
struct Surface {
    fit: FittingScale,
    origin: Point,
    image_box: Rect,
}

fn dispatch(
    gestures: &mut GestureTranslator,
    viewport: &mut ViewportState,
    surface: &Surface,
    event: GestureEvent,
) {
    if let Err(e) = gestures.handle(viewport, &surface.fit, surface.origin, event) {
        log::warn!("Ignored gesture {:?}: {}", event, e);
    }
}

fn status(painter: &egui::Painter, rect: egui::Rect, text: &str) {
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(18.0),
        Color32::GRAY,
    );
}

fn draw_keyframes(
    painter: &egui::Painter,
    project: &Project,
    editor: &KeyframeEditor,
    image_box: &Rect,
) {
    for (index, keyframe) in project.keyframes.iter().enumerate() {
        let active = editor.active_id() == Some(keyframe.id);
        let color = if active { ACTIVE_COLOR } else { KEYFRAME_COLOR };
        let screen = to_egui_rect(&keyframe_screen_rect(keyframe, image_box));

        painter.rect_stroke(screen, 0.0, Stroke::new(if active { 2.5 } else { 1.5 }, color));

        let caption = if keyframe.label.is_empty() {
            format!("{}", index + 1)
        } else {
            format!("{}. {}", index + 1, keyframe.label)
        };
        painter.text(
            screen.left_top() + egui::vec2(4.0, 2.0),
            Align2::LEFT_TOP,
            caption,
            FontId::proportional(13.0),
            color,
        );

        if active && editor.mode() == EditorMode::EditKeyframe {
            for corner in [
                screen.left_top(),
                screen.right_top(),
                screen.left_bottom(),
                screen.right_bottom(),
            ] {
                painter.circle_filled(corner, HANDLE_SIZE, color);
                painter.circle_stroke(corner, HANDLE_SIZE, Stroke::new(1.0, Color32::BLACK));
            }
        }
    }
}

/// Outline what presenting the active keyframe in a surface of this size
/// would reveal around it.
fn draw_presentation_frame(
    painter: &egui::Painter,
    project: &Project,
    editor: &KeyframeEditor,
    image_box: &Rect,
    natural: Size,
    container: Size,
) {
    let Some(keyframe) = editor.active_id().and_then(|id| project.keyframe(id)) else {
        return;
    };
    let region = project_detailed(
        &keyframe.rect(),
        natural.width,
        natural.height,
        container.width,
        container.height,
    )
    .visible_region(container.width, container.height);
    painter.rect_stroke(
        to_egui_rect(&image_box.sub_rect(&region)),
        0.0,
        Stroke::new(1.0, Color32::from_white_alpha(90)),
    );
}

/// Find the keyframe under `point`, preferring the active one.
fn pick(
    project: &Project,
    editor: &KeyframeEditor,
    point: Point,
    image_box: &Rect,
) -> Option<(KeyframeId, DragTarget)> {
    let active = editor
        .active_id()
        .and_then(|id| project.keyframe(id))
        .into_iter();
    // Topmost (last drawn) first.
    let others = project
        .keyframes
        .iter()
        .rev()
        .filter(|k| Some(k.id) != editor.active_id());
    active.chain(others).find_map(|keyframe| {
        let screen = keyframe_screen_rect(keyframe, image_box);
        editor
            .hit_test(point, &screen)
            .map(|target| (keyframe.id, target))
    })
}

/// Anchor and movement of the primary drag for this frame.
///
/// egui only reports a drag once the pointer has left its click threshold,
/// so on the starting frame the press origin is the real anchor and all
/// travel since the press belongs to this frame's delta.
fn drag_step(
    started: bool,
    press: Option<Point>,
    pointer: Option<Point>,
    frame_delta: (f64, f64),
) -> (Option<Point>, (f64, f64)) {
    if !started {
        return (pointer, frame_delta);
    }
    let anchor = press.or(pointer);
    let delta = match (anchor, pointer) {
        (Some(a), Some(p)) => (p.x - a.x, p.y - a.y),
        _ => frame_delta,
    };
    (anchor, delta)
}

fn handle_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    project: &Project,
    editor: &mut KeyframeEditor,
    viewport: &mut ViewportState,
    gestures: &mut GestureTranslator,
    surface: &Surface,
    actions: &mut Vec<CanvasAction>,
) {
    let pointer = response.interact_pointer_pos().map(to_point);
    let press = ui.input(|i| i.pointer.press_origin()).map(to_point);
    let image_box = surface.image_box;
    let started = response.drag_started_by(PointerButton::Primary);
    let frame_delta = response.drag_delta();
    let (anchor, (dx, dy)) = drag_step(
        started,
        press,
        pointer,
        (f64::from(frame_delta.x), f64::from(frame_delta.y)),
    );

    if started {
        if let Some(point) = anchor {
            if editor.mode() == EditorMode::CreateKeyframe {
                editor.pointer_down(point, image_box);
            } else if let Some((id, target)) = pick(project, editor, point, &image_box) {
                editor.select(id);
                if editor.begin_drag(target) {
                    actions.push(CanvasAction::BeginEdit);
                }
            }
        }
    }

    if response.dragged_by(PointerButton::Primary) {
        if editor.is_capturing() {
            let change = match pointer {
                Some(point) if editor.mode() == EditorMode::CreateKeyframe => {
                    editor.pointer_move(point, image_box)
                }
                _ => editor
                    .active_id()
                    .and_then(|id| project.keyframe(id))
                    .and_then(|keyframe| {
                        editor.drag(dx, dy, viewport.scaled_size(&surface.fit), keyframe)
                    }),
            };
            if let Some(change) = change {
                actions.push(CanvasAction::Propose(change));
            }
        } else if dx != 0.0 || dy != 0.0 {
            dispatch(gestures, viewport, surface, GestureEvent::Drag { dx, dy });
        }
    }

    if response.drag_stopped() {
        editor.pointer_up();
        editor.end_drag();
    }

    if response.clicked() {
        if let Some(point) = pointer {
            match pick(project, editor, point, &image_box) {
                Some((id, _)) => {
                    editor.select(id);
                }
                None => editor.clear_selection(),
            }
        }
    }

    // Double-click toggles between fit and 2x around the pointer.
    if response.double_clicked() && editor.accepts_gestures() {
        if let Some(point) = pointer {
            let anchor = image_box.fraction_of(point);
            let target = if (viewport.user_scale() - 1.0).abs() < 1e-9 {
                2.0
            } else {
                1.0
            };
            if let Err(e) = zoom_to(viewport, &surface.fit, target, anchor.x, anchor.y) {
                log::warn!("Double-click zoom failed: {}", e);
            }
        }
    }
}

fn handle_zoom_and_scroll(
    ui: &egui::Ui,
    response: &egui::Response,
    editor: &KeyframeEditor,
    viewport: &mut ViewportState,
    gestures: &mut GestureTranslator,
    surface: &Surface,
) {
    let (zoom_delta, scroll) = ui.input(|i| (i.zoom_delta(), i.smooth_scroll_delta));
    let hover = response.hover_pos().filter(|_| response.hovered());

    if zoom_delta == 1.0 {
        if gestures.is_pinching() {
            dispatch(gestures, viewport, surface, GestureEvent::PinchEnd);
        }
    } else if let Some(pos) = hover.filter(|_| editor.accepts_gestures()) {
        if !gestures.is_pinching() {
            dispatch(gestures, viewport, surface, GestureEvent::PinchStart);
        }
        let limits = editor.config().zoom;
        let current = viewport.user_scale();
        let scale_delta = limits.clamp_delta(current, current * (f64::from(zoom_delta) - 1.0));
        dispatch(
            gestures,
            viewport,
            surface,
            GestureEvent::Pinch {
                origin: to_point(pos),
                scale_delta,
            },
        );
    }

    if scroll != egui::Vec2::ZERO && hover.is_some() && editor.accepts_gestures() {
        // egui reports scroll as content motion; wheel deltas are the opposite.
        let event = GestureEvent::Wheel {
            dx: -f64::from(scroll.x),
            dy: -f64::from(scroll.y),
        };
        dispatch(gestures, viewport, surface, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panframe::engine::{Corner, EditorConfig};
    use panframe::models::keyframe::Keyframe;

    #[test]
    fn test_drag_start_anchors_at_press() {
        let press = Point::new(100.0, 100.0);
        let crossed = Point::new(107.0, 100.0);
        let (anchor, delta) = drag_step(true, Some(press), Some(crossed), (2.0, 0.0));
        assert_eq!(anchor, Some(press));
        assert_eq!(delta, (7.0, 0.0));
    }

    #[test]
    fn test_drag_continues_with_frame_delta() {
        let pointer = Point::new(120.0, 90.0);
        let (anchor, delta) = drag_step(false, Some(Point::default()), Some(pointer), (3.0, -1.0));
        assert_eq!(anchor, Some(pointer));
        assert_eq!(delta, (3.0, -1.0));
    }

    #[test]
    fn test_drag_start_without_press_uses_pointer() {
        let pointer = Point::new(5.0, 6.0);
        let (anchor, delta) = drag_step(true, None, Some(pointer), (1.0, 1.0));
        assert_eq!(anchor, Some(pointer));
        assert_eq!(delta, (0.0, 0.0));
    }

    #[test]
    fn test_corner_grab_uses_press_point() {
        let mut editor = KeyframeEditor::new(EditorConfig::default());
        let mut project = Project::new("test", "image.png");
        let id = project.allocate_id();
        project.keyframes.push(Keyframe::new(id, Rect::new(0.1, 0.1, 0.5, 0.5), ""));
        editor.select(id);
        let image_box = Rect::new(0.0, 0.0, 1000.0, 1000.0);

        // Pressed on the top-left handle at (100, 100), then moved past the
        // drag threshold before egui reported the drag.
        let (anchor, _) = drag_step(
            true,
            Some(Point::new(101.0, 101.0)),
            Some(Point::new(110.0, 104.0)),
            (0.0, 0.0),
        );
        let anchor = anchor.unwrap();
        assert_eq!(
            pick(&project, &editor, anchor, &image_box),
            Some((id, DragTarget::Corner(Corner::TopLeft)))
        );
        assert_eq!(
            pick(&project, &editor, Point::new(110.0, 104.0), &image_box),
            Some((id, DragTarget::Move))
        );
    }
}
