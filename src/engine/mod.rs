// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewport transform and gesture engine.
//!
//! Everything in here is plain geometry and state: no drawing and no I/O.
//! Surfaces feed in container sizes, image sizes and input events, and read
//! back pan/zoom state and [`Transform`]s to apply to their drawable.

pub mod editor;
pub mod error;
pub mod fit;
pub mod gesture;
pub mod image_source;
pub mod projection;
pub mod transition;
pub mod viewport;

pub use editor::{Corner, DragTarget, EditorConfig, EditorMode, KeyframeEditor};
pub use error::{DecodeError, ViewportError};
pub use fit::{compute_fitting_scale, FittingScale};
pub use gesture::{GestureEvent, GestureTranslator, ZoomLimits};
pub use image_source::{DecodeTicket, DecodedImage, ImageSlot, Resolution};
pub use projection::{project, Transform};
pub use transition::{Easing, SchedulerState, TransitionScheduler};
pub use viewport::ViewportState;
