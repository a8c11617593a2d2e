// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive keyframe editing.
//!
//! The editor is a small state machine (`View`, `CreateKeyframe`,
//! `EditKeyframe`) that turns pointer input into proposed
//! [`KeyframeChange`]s. It works in normalized image-fraction space and
//! never touches the keyframe list itself.
//!
//! Only one consumer owns the pointer at a time: while a create or edit
//! drag is captured, [`KeyframeEditor::accepts_gestures`] is false and the
//! canvas must not pan or zoom.

use super::gesture::ZoomLimits;
use crate::models::keyframe::{Keyframe, KeyframeChange, KeyframeId, KeyframePatch};
use crate::util::geometry::{Point, Rect, Size};

/// Tunables for the editor surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Geometry given to a freshly created keyframe.
    pub default_keyframe: Rect,
    /// Grab radius around corner handles, in screen pixels.
    pub handle_radius: f64,
    pub zoom: ZoomLimits,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_keyframe: Rect::new(0.25, 0.25, 0.5, 0.5),
            handle_radius: 8.0,
            zoom: ZoomLimits::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    View,
    CreateKeyframe,
    EditKeyframe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    fn moves_left_edge(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    /// Screen position of this corner on `rect`.
    pub fn of(self, rect: &Rect) -> Point {
        let x = if self.moves_left_edge() { rect.x } else { rect.right() };
        let y = if self.moves_top_edge() { rect.y } else { rect.bottom() };
        Point::new(x, y)
    }
}

/// What a drag on an existing keyframe manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Move,
    Corner(Corner),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Capture {
    Create { anchor: Point },
    Drag { target: DragTarget },
}

/// Editor state for one canvas.
#[derive(Debug)]
pub struct KeyframeEditor {
    config: EditorConfig,
    mode: EditorMode,
    active_id: Option<KeyframeId>,
    capture: Option<Capture>,
}

impl Default for KeyframeEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl KeyframeEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            mode: EditorMode::View,
            active_id: None,
            capture: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn active_id(&self) -> Option<KeyframeId> {
        self.active_id
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    /// Whether pan/zoom gestures may run right now.
    pub fn accepts_gestures(&self) -> bool {
        self.capture.is_none()
    }

    /// Select an existing keyframe for editing.
    pub fn select(&mut self, id: KeyframeId) -> bool {
        if self.capture.is_some() || self.mode == EditorMode::CreateKeyframe {
            return false;
        }
        self.mode = EditorMode::EditKeyframe;
        self.active_id = Some(id);
        log::debug!("Editing keyframe {}", id);
        true
    }

    pub fn clear_selection(&mut self) {
        if self.capture.is_some() {
            return;
        }
        self.mode = EditorMode::View;
        self.active_id = None;
    }

    /// Start creating a keyframe with the default geometry at `index`.
    ///
    /// The returned insert must be applied by the caller; the new keyframe
    /// becomes the active one.
    pub fn begin_create(
        &mut self,
        id: KeyframeId,
        index: usize,
        label: impl Into<String>,
    ) -> Option<KeyframeChange> {
        if self.capture.is_some() || self.mode == EditorMode::CreateKeyframe {
            return None;
        }
        self.mode = EditorMode::CreateKeyframe;
        self.active_id = Some(id);
        log::debug!("Creating keyframe {} at index {}", id, index);
        Some(KeyframeChange::Insert {
            index,
            keyframe: Keyframe::new(id, self.config.default_keyframe, label),
        })
    }

    /// Pointer pressed while creating: fix the anchor corner.
    ///
    /// `image_box` is the on-screen rectangle of the rendered image.
    pub fn pointer_down(&mut self, point: Point, image_box: Rect) -> bool {
        if self.mode != EditorMode::CreateKeyframe || self.capture.is_some() {
            return false;
        }
        self.capture = Some(Capture::Create {
            anchor: image_box.fraction_of(point),
        });
        true
    }

    /// Pointer moved while creating: span the keyframe from anchor to pointer.
    pub fn pointer_move(&mut self, point: Point, image_box: Rect) -> Option<KeyframeChange> {
        let Some(Capture::Create { anchor }) = self.capture else {
            return None;
        };
        let id = self.active_id?;
        let rect = Rect::from_corners(anchor, image_box.fraction_of(point));
        Some(KeyframeChange::Update {
            id,
            patch: KeyframePatch::geometry(rect),
        })
    }

    /// Pointer released while creating: commit and return to `View`.
    pub fn pointer_up(&mut self) -> bool {
        if !matches!(self.capture, Some(Capture::Create { .. })) {
            return false;
        }
        self.capture = None;
        self.mode = EditorMode::View;
        log::debug!("Committed keyframe {:?}", self.active_id);
        true
    }

    /// Escape/Enter. Abandons a pending creation by deleting the new
    /// keyframe; leaves edit mode otherwise.
    pub fn cancel(&mut self) -> Option<KeyframeChange> {
        let change = match self.mode {
            EditorMode::CreateKeyframe => self.active_id.map(|id| KeyframeChange::Delete { id }),
            EditorMode::EditKeyframe | EditorMode::View => None,
        };
        self.capture = None;
        self.mode = EditorMode::View;
        self.active_id = None;
        change
    }

    /// Start dragging the body or a corner of the active keyframe.
    pub fn begin_drag(&mut self, target: DragTarget) -> bool {
        if self.mode != EditorMode::EditKeyframe || self.active_id.is_none() || self.capture.is_some()
        {
            return false;
        }
        self.capture = Some(Capture::Drag { target });
        true
    }

    /// Apply a screen-pixel drag delta to the active keyframe.
    ///
    /// `scaled_image` is the current on-screen size of the whole image.
    pub fn drag(
        &mut self,
        dx: f64,
        dy: f64,
        scaled_image: Size,
        keyframe: &Keyframe,
    ) -> Option<KeyframeChange> {
        let Some(Capture::Drag { target }) = self.capture else {
            return None;
        };
        if self.active_id != Some(keyframe.id) {
            return None;
        }
        let fdx = if scaled_image.width != 0.0 {
            dx / scaled_image.width
        } else {
            0.0
        };
        let fdy = if scaled_image.height != 0.0 {
            dy / scaled_image.height
        } else {
            0.0
        };
        let rect = resize_rect(keyframe.rect(), target, fdx, fdy);
        Some(KeyframeChange::Update {
            id: keyframe.id,
            patch: KeyframePatch::geometry(rect),
        })
    }

    pub fn end_drag(&mut self) -> bool {
        if !matches!(self.capture, Some(Capture::Drag { .. })) {
            return false;
        }
        self.capture = None;
        true
    }

    /// Propose deleting `id`. Deleting the active keyframe returns to `View`.
    pub fn delete(&mut self, id: KeyframeId) -> KeyframeChange {
        if self.active_id == Some(id) {
            self.capture = None;
            self.mode = EditorMode::View;
            self.active_id = None;
        }
        KeyframeChange::Delete { id }
    }

    /// Drop a selection that no longer resolves (after undo, import, ...).
    pub fn sync(&mut self, keyframes: &[Keyframe]) {
        if let Some(id) = self.active_id {
            if !keyframes.iter().any(|k| k.id == id) {
                log::debug!("Active keyframe {} disappeared", id);
                self.capture = None;
                self.mode = EditorMode::View;
                self.active_id = None;
            }
        }
    }

    /// Resolve a pointer position to a drag target on a keyframe's screen box.
    pub fn hit_test(&self, point: Point, keyframe_box: &Rect) -> Option<DragTarget> {
        let radius = self.config.handle_radius;
        let corner = Corner::ALL.into_iter().find(|corner| {
            let c = corner.of(keyframe_box);
            (point.x - c.x).abs() <= radius && (point.y - c.y).abs() <= radius
        });
        match corner {
            Some(corner) => Some(DragTarget::Corner(corner)),
            None if keyframe_box.contains(point) => Some(DragTarget::Move),
            None => None,
        }
    }
}

/// On-screen box of a keyframe drawn over `image_box`.
pub fn keyframe_screen_rect(keyframe: &Keyframe, image_box: &Rect) -> Rect {
    image_box.sub_rect(&keyframe.rect())
}

/// Move or resize `rect` by a normalized delta.
///
/// Corner drags keep the opposite corner fixed and floor width/height at 0.
pub fn resize_rect(rect: Rect, target: DragTarget, dx: f64, dy: f64) -> Rect {
    let corner = match target {
        DragTarget::Move => {
            return Rect::new(rect.x + dx, rect.y + dy, rect.width, rect.height);
        }
        DragTarget::Corner(corner) => corner,
    };

    let (mut x, mut y, mut width, mut height) = (rect.x, rect.y, rect.width, rect.height);
    if corner.moves_left_edge() {
        let right = rect.right();
        width = (width - dx).max(0.0);
        x = right - width;
    } else {
        width = (width + dx).max(0.0);
    }
    if corner.moves_top_edge() {
        let bottom = rect.bottom();
        height = (height - dy).max(0.0);
        y = bottom - height;
    } else {
        height = (height + dy).max(0.0);
    }
    Rect::new(x, y, width, height)
}
