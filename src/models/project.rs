// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! A project ties one image source to an ordered keyframe list and the
//! playback settings used when presenting it. The project is the only
//! owner of the keyframe list; editing surfaces propose
//! [`KeyframeChange`]s and the project applies them.

use super::keyframe::{Keyframe, KeyframeChange, KeyframeId};
use crate::engine::transition::Easing;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from applying a proposed keyframe change.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectError {
    #[error("keyframe {0} not found")]
    UnknownKeyframe(KeyframeId),

    #[error("keyframe {0} already exists")]
    DuplicateKeyframe(KeyframeId),

    #[error("index {index} out of range for {len} keyframes")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Project-level playback settings, read by the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSettings {
    pub animation_duration_ms: u32,
    pub animation_type: Easing,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            animation_duration_ms: 1000,
            animation_type: Easing::Ease,
        }
    }
}

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Opaque reference to the image, resolved by the media loader.
    pub image_source: String,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
    #[serde(default)]
    pub settings: PlaybackSettings,
    #[serde(default)]
    next_id: u64,
}

impl Project {
    /// Create a new project for the given image source.
    pub fn new(name: impl Into<String>, image_source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_source: image_source.into(),
            keyframes: Vec::new(),
            settings: PlaybackSettings::default(),
            next_id: 1,
        }
    }

    /// Reserve a fresh keyframe id.
    pub fn allocate_id(&mut self) -> KeyframeId {
        let max_existing = self.keyframes.iter().map(|k| k.id.0).max().unwrap_or(0);
        let id = self.next_id.max(max_existing + 1);
        self.next_id = id + 1;
        KeyframeId(id)
    }

    pub fn keyframe(&self, id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == id)
    }

    pub fn index_of(&self, id: KeyframeId) -> Option<usize> {
        self.keyframes.iter().position(|k| k.id == id)
    }

    /// Apply a proposed change to the keyframe list.
    pub fn apply(&mut self, change: KeyframeChange) -> Result<(), ProjectError> {
        match change {
            KeyframeChange::Update { id, patch } => {
                let keyframe = self
                    .keyframes
                    .iter_mut()
                    .find(|k| k.id == id)
                    .ok_or(ProjectError::UnknownKeyframe(id))?;
                keyframe.apply_patch(&patch);
            }
            KeyframeChange::Insert { index, keyframe } => {
                let len = self.keyframes.len();
                if index > len {
                    return Err(ProjectError::IndexOutOfRange { index, len });
                }
                if self.keyframe(keyframe.id).is_some() {
                    return Err(ProjectError::DuplicateKeyframe(keyframe.id));
                }
                self.next_id = self.next_id.max(keyframe.id.0 + 1);
                log::debug!("Inserting keyframe {} at {}", keyframe.id, index);
                self.keyframes.insert(index, keyframe);
            }
            KeyframeChange::Delete { id } => {
                let index = self.index_of(id).ok_or(ProjectError::UnknownKeyframe(id))?;
                self.keyframes.remove(index);
                log::debug!("Deleted keyframe {}, total: {}", id, self.keyframes.len());
            }
            KeyframeChange::Reorder { from, to } => {
                let len = self.keyframes.len();
                for index in [from, to] {
                    if index >= len {
                        return Err(ProjectError::IndexOutOfRange { index, len });
                    }
                }
                let keyframe = self.keyframes.remove(from);
                self.keyframes.insert(to, keyframe);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::keyframe::KeyframePatch;
    use crate::util::geometry::Rect;

    fn project_with(ids: &[u64]) -> Project {
        let mut project = Project::new("test", "image.png");
        for (i, id) in ids.iter().enumerate() {
            project
                .apply(KeyframeChange::Insert {
                    index: i,
                    keyframe: Keyframe::new(KeyframeId(*id), Rect::new(0.0, 0.0, 1.0, 1.0), ""),
                })
                .unwrap();
        }
        project
    }

    fn ids(project: &Project) -> Vec<u64> {
        project.keyframes.iter().map(|k| k.id.0).collect()
    }

    #[test]
    fn test_allocate_id_skips_existing() {
        let mut project = project_with(&[1, 5]);
        assert_eq!(project.allocate_id(), KeyframeId(6));
        assert_eq!(project.allocate_id(), KeyframeId(7));
    }

    #[test]
    fn test_insert_rejects_duplicates_and_bad_index() {
        let mut project = project_with(&[1]);
        let kf = Keyframe::new(KeyframeId(1), Rect::default(), "");
        assert_eq!(
            project.apply(KeyframeChange::Insert { index: 0, keyframe: kf }),
            Err(ProjectError::DuplicateKeyframe(KeyframeId(1)))
        );
        let kf = Keyframe::new(KeyframeId(2), Rect::default(), "");
        assert_eq!(
            project.apply(KeyframeChange::Insert { index: 5, keyframe: kf }),
            Err(ProjectError::IndexOutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_update_and_delete() {
        let mut project = project_with(&[1, 2, 3]);
        project
            .apply(KeyframeChange::Update {
                id: KeyframeId(2),
                patch: KeyframePatch::label("middle"),
            })
            .unwrap();
        assert_eq!(project.keyframe(KeyframeId(2)).unwrap().label, "middle");

        project.apply(KeyframeChange::Delete { id: KeyframeId(2) }).unwrap();
        assert_eq!(ids(&project), vec![1, 3]);
        assert_eq!(
            project.apply(KeyframeChange::Delete { id: KeyframeId(2) }),
            Err(ProjectError::UnknownKeyframe(KeyframeId(2)))
        );
    }

    #[test]
    fn test_reorder() {
        let mut project = project_with(&[1, 2, 3]);
        project.apply(KeyframeChange::Reorder { from: 0, to: 2 }).unwrap();
        assert_eq!(ids(&project), vec![2, 3, 1]);
        assert!(project.apply(KeyframeChange::Reorder { from: 3, to: 0 }).is_err());
    }

    #[test]
    fn test_settings_wire_names() {
        let settings: PlaybackSettings =
            serde_json::from_str(r#"{"animationDurationMs":750,"animationType":"linear"}"#)
                .unwrap();
        assert_eq!(settings.animation_duration_ms, 750);
        assert_eq!(settings.animation_type, Easing::Linear);
    }
}
