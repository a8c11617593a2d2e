// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: keyframes, projects and edit history.

pub mod history;
pub mod keyframe;
pub mod project;
