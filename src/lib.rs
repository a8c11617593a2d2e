// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! PANFRAME - keyframed pan/zoom presentations over a single image
//!
//! The library holds the viewport and gesture engine, the keyframe data
//! model and the media/project I/O used by the desktop application.

pub mod engine;
pub mod io;
pub mod models;
pub mod util;
