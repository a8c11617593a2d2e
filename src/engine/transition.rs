// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timed keyframe-to-keyframe playback.
//!
//! The scheduler keeps the presentation's current keyframe index and turns
//! index changes into transforms over wall-clock time. The very first
//! transform after mounting is emitted as-is; later index changes animate
//! from whatever is on screen at that moment. Starting a new transition
//! replaces the running one, so nothing is ever queued.

use super::projection::{project, Transform};
use crate::models::keyframe::{Keyframe, KeyframeId};
use crate::models::project::PlaybackSettings;
use crate::util::geometry::Size;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Interpolation family for transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Easing {
    Linear,
    /// The CSS `ease` curve, `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    #[default]
    Ease,
}

impl Easing {
    /// Map linear progress in `[0, 1]` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Ease => CubicBezier::new(0.25, 0.1, 0.25, 1.0).solve(t),
        }
    }
}

/// Unit cubic bezier timing curve through (0,0) and (1,1).
#[derive(Debug, Clone, Copy)]
struct CubicBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

impl CubicBezier {
    fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        Self {
            ax: 1.0 - cx - bx,
            bx,
            cx,
            ay: 1.0 - cy - by,
            by,
            cy,
        }
    }

    fn sample_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    fn sample_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    fn slope_x(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    /// Curve parameter whose x equals `x`: Newton first, bisection fallback.
    fn parameter_for(&self, x: f64) -> f64 {
        const EPSILON: f64 = 1e-7;

        let mut t = x;
        for _ in 0..8 {
            let err = self.sample_x(t) - x;
            if err.abs() < EPSILON {
                return t;
            }
            let slope = self.slope_x(t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..64 {
            let value = self.sample_x(t);
            if (value - x).abs() < EPSILON {
                break;
            }
            if x > value {
                lo = t;
            } else {
                hi = t;
            }
            t = lo + (hi - lo) / 2.0;
        }
        t
    }

    fn solve(&self, x: f64) -> f64 {
        self.sample_y(self.parameter_for(x))
    }
}

/// Lifecycle of a presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Playing { index: usize },
}

/// The single in-flight animation. Replacing it is the cancellation.
#[derive(Debug, Clone, Copy)]
struct ActiveTransition {
    from: Transform,
    to: Transform,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

impl ActiveTransition {
    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn value_at(&self, now: Instant) -> Transform {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(&self.to, self.easing.apply(t))
    }
}

/// Drives playback over an ordered keyframe list.
#[derive(Debug)]
pub struct TransitionScheduler {
    settings: PlaybackSettings,
    keyframes: Vec<Keyframe>,
    image: Size,
    container: Size,
    state: SchedulerState,
    /// Set on the first emitted transform; stays set until `stop`.
    mounted: bool,
    resting: Option<Transform>,
    transition: Option<ActiveTransition>,
}

impl TransitionScheduler {
    pub fn new(settings: PlaybackSettings) -> Self {
        Self {
            settings,
            keyframes: Vec::new(),
            image: Size::default(),
            container: Size::default(),
            state: SchedulerState::Idle,
            mounted: false,
            resting: None,
            transition: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, SchedulerState::Playing { .. })
    }

    pub fn settings(&self) -> PlaybackSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: PlaybackSettings) {
        self.settings = settings;
    }

    /// Begin playback at `initial`, or at the first keyframe.
    pub fn start(&mut self, keyframes: &[Keyframe], initial: Option<KeyframeId>) {
        self.keyframes = keyframes.to_vec();
        let index = initial.map_or(0, |id| self.resolve(id));
        self.state = SchedulerState::Playing { index };
        self.mounted = false;
        self.resting = None;
        self.transition = None;
        log::debug!("Playback started at index {} of {}", index, self.keyframes.len());
    }

    /// End playback, releasing any running transition.
    pub fn stop(&mut self) {
        self.state = SchedulerState::Idle;
        self.mounted = false;
        self.resting = None;
        self.transition = None;
    }

    /// Replace the keyframe snapshot.
    ///
    /// A different ordered id list resets playback to the first keyframe;
    /// geometry-only edits keep the index. Either way the surface snaps.
    pub fn set_keyframes(&mut self, keyframes: &[Keyframe]) {
        let same_ids = self.keyframes.len() == keyframes.len()
            && self
                .keyframes
                .iter()
                .zip(keyframes)
                .all(|(a, b)| a.id == b.id);
        if same_ids && self.keyframes.as_slice() == keyframes {
            return;
        }
        self.keyframes = keyframes.to_vec();
        if !same_ids && self.is_playing() {
            log::debug!("Keyframe list changed, resetting to first keyframe");
            self.state = SchedulerState::Playing { index: 0 };
        }
        self.snap();
    }

    /// Update the image natural size and container size.
    ///
    /// Recomputes from scratch, so repeated notifications are harmless.
    pub fn set_stage(&mut self, image: Size, container: Size) {
        if self.image == image && self.container == container {
            return;
        }
        self.image = image;
        self.container = container;
        self.snap();
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            SchedulerState::Playing { index } => Some(index),
            SchedulerState::Idle => None,
        }
    }

    pub fn current_keyframe(&self) -> Option<&Keyframe> {
        self.keyframes.get(self.current_index()?)
    }

    pub fn can_next(&self) -> bool {
        self.current_index()
            .is_some_and(|i| i + 1 < self.keyframes.len())
    }

    pub fn can_previous(&self) -> bool {
        self.current_index().is_some_and(|i| i > 0)
    }

    pub fn first(&mut self, now: Instant) -> bool {
        self.select(0, now)
    }

    pub fn last(&mut self, now: Instant) -> bool {
        let last = self.keyframes.len().saturating_sub(1);
        self.select(last, now)
    }

    /// Advance one keyframe; a no-op on the last one.
    pub fn next(&mut self, now: Instant) -> bool {
        if !self.can_next() {
            return false;
        }
        let index = self.current_index().map_or(0, |i| i + 1);
        self.select(index, now)
    }

    /// Step back one keyframe; a no-op on the first one.
    pub fn previous(&mut self, now: Instant) -> bool {
        if !self.can_previous() {
            return false;
        }
        let index = self.current_index().map_or(0, |i| i - 1);
        self.select(index, now)
    }

    /// Jump to `id`, falling back to the first keyframe when it is unknown.
    pub fn go_to(&mut self, id: KeyframeId, now: Instant) -> bool {
        let index = self.resolve(id);
        self.select(index, now)
    }

    /// Whether a transition is still running at `now`.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition.is_some_and(|t| t.progress(now) < 1.0)
    }

    /// Transform to render at `now`, or `None` while nothing can be shown
    /// (idle, no keyframes, or image/container not measured yet).
    pub fn sample(&mut self, now: Instant) -> Option<Transform> {
        if let Some(transition) = self.transition {
            if transition.progress(now) < 1.0 {
                return Some(transition.value_at(now));
            }
            self.transition = None;
            self.resting = Some(transition.to);
            return self.resting;
        }
        if self.resting.is_none() {
            let target = self.target()?;
            log::debug!("Presentation mounted");
            self.mounted = true;
            self.resting = Some(target);
        }
        self.resting
    }

    fn resolve(&self, id: KeyframeId) -> usize {
        match self.keyframes.iter().position(|k| k.id == id) {
            Some(index) => index,
            None => {
                log::warn!("Keyframe {} not found, showing the first keyframe", id);
                0
            }
        }
    }

    fn select(&mut self, index: usize, now: Instant) -> bool {
        let SchedulerState::Playing { index: current } = self.state else {
            return false;
        };
        if index == current || index >= self.keyframes.len() {
            return false;
        }
        let from = self.value_at(now);
        self.state = SchedulerState::Playing { index };

        match (self.mounted, from, self.target()) {
            (true, Some(from), Some(to)) => {
                let duration = Duration::from_millis(u64::from(self.settings.animation_duration_ms));
                self.transition = Some(ActiveTransition {
                    from,
                    to,
                    started: now,
                    duration,
                    easing: self.settings.animation_type,
                });
                self.resting = Some(to);
            }
            _ => {
                self.transition = None;
                self.resting = None;
            }
        }
        log::debug!("Moved to keyframe index {}", index);
        true
    }

    /// On-screen value right now, without settling the transition.
    fn value_at(&self, now: Instant) -> Option<Transform> {
        match self.transition {
            Some(transition) => Some(transition.value_at(now)),
            None => self.resting,
        }
    }

    /// Drop any running transition and jump to the current target.
    fn snap(&mut self) {
        self.transition = None;
        self.resting = if self.mounted { self.target() } else { None };
    }

    fn target(&self) -> Option<Transform> {
        if !self.image.is_measured() || !self.container.is_measured() {
            return None;
        }
        let keyframe = self.current_keyframe()?;
        Some(project(
            keyframe,
            self.image.width,
            self.image.height,
            self.container.width,
            self.container.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::geometry::Rect;

    fn keyframes(n: u64) -> Vec<Keyframe> {
        (0..n)
            .map(|i| {
                let x = i as f64 * 0.25;
                Keyframe::new(KeyframeId(i + 1), Rect::new(x, 0.0, 0.25, 0.25), "")
            })
            .collect()
    }

    fn settings(ms: u32, easing: Easing) -> PlaybackSettings {
        PlaybackSettings {
            animation_duration_ms: ms,
            animation_type: easing,
        }
    }

    fn playing(n: u64, easing: Easing) -> TransitionScheduler {
        let mut scheduler = TransitionScheduler::new(settings(1000, easing));
        scheduler.set_stage(Size::new(1600.0, 1200.0), Size::new(800.0, 600.0));
        scheduler.start(&keyframes(n), None);
        scheduler
    }

    fn target_of(index: u64) -> Transform {
        let kfs = keyframes(4);
        project(&kfs[index as usize], 1600.0, 1200.0, 800.0, 600.0)
    }

    #[test]
    fn test_easing_endpoints_and_shape() {
        for easing in [Easing::Linear, Easing::Ease] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
        assert!((Easing::Ease.apply(0.5) - 0.8024).abs() < 1e-3);
        assert!((Easing::Ease.apply(0.25) - 0.4085).abs() < 1e-3);

        let mut last = 0.0;
        for step in 1..=100 {
            let v = Easing::Ease.apply(f64::from(step) / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_idle_until_started() {
        let mut scheduler = TransitionScheduler::new(PlaybackSettings::default());
        let now = Instant::now();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(!scheduler.next(now));
        assert_eq!(scheduler.sample(now), None);
    }

    #[test]
    fn test_bounds_and_can_flags() {
        let mut scheduler = playing(3, Easing::Linear);
        let now = Instant::now();
        assert!(!scheduler.can_previous());
        assert!(scheduler.can_next());
        assert!(!scheduler.previous(now));
        assert_eq!(scheduler.current_index(), Some(0));

        assert!(scheduler.next(now));
        assert!(scheduler.next(now));
        assert!(!scheduler.can_next());
        assert!(!scheduler.next(now));
        assert_eq!(scheduler.current_index(), Some(2));

        assert!(scheduler.first(now));
        assert_eq!(scheduler.current_index(), Some(0));
        assert!(scheduler.last(now));
        assert_eq!(scheduler.current_index(), Some(2));
    }

    #[test]
    fn test_single_keyframe_has_no_navigation() {
        let mut scheduler = playing(1, Easing::Linear);
        assert!(!scheduler.can_next());
        assert!(!scheduler.can_previous());
        assert!(!scheduler.last(Instant::now()));
    }

    #[test]
    fn test_go_to_unknown_falls_back_to_first() {
        let mut scheduler = playing(3, Easing::Linear);
        let now = Instant::now();
        scheduler.go_to(KeyframeId(3), now);
        assert_eq!(scheduler.current_index(), Some(2));
        scheduler.go_to(KeyframeId(99), now);
        assert_eq!(scheduler.current_index(), Some(0));

        let mut scheduler = TransitionScheduler::new(PlaybackSettings::default());
        scheduler.start(&keyframes(3), Some(KeyframeId(42)));
        assert_eq!(scheduler.current_index(), Some(0));
    }

    #[test]
    fn test_first_emission_snaps() {
        let mut scheduler = TransitionScheduler::new(settings(1000, Easing::Linear));
        scheduler.set_stage(Size::new(1600.0, 1200.0), Size::new(800.0, 600.0));
        scheduler.start(&keyframes(3), Some(KeyframeId(2)));
        let now = Instant::now();
        assert_eq!(scheduler.sample(now), Some(target_of(1)));
        assert!(!scheduler.is_animating(now));
    }

    #[test]
    fn test_navigation_before_mount_does_not_animate() {
        let mut scheduler = playing(3, Easing::Linear);
        let now = Instant::now();
        scheduler.next(now);
        assert_eq!(scheduler.sample(now), Some(target_of(1)));
    }

    #[test]
    fn test_later_changes_animate_over_duration() {
        let mut scheduler = playing(3, Easing::Linear);
        let t0 = Instant::now();
        let start = scheduler.sample(t0).unwrap();

        scheduler.next(t0);
        let end = target_of(1);
        assert!(scheduler.is_animating(t0));
        assert_eq!(scheduler.sample(t0), Some(start));

        let mid = scheduler.sample(t0 + Duration::from_millis(500)).unwrap();
        let expected = start.lerp(&end, 0.5);
        assert!((mid.left - expected.left).abs() < 1e-6);

        assert_eq!(scheduler.sample(t0 + Duration::from_millis(1000)), Some(end));
        assert!(!scheduler.is_animating(t0 + Duration::from_millis(1000)));
        assert_eq!(scheduler.sample(t0 + Duration::from_secs(5)), Some(end));
    }

    #[test]
    fn test_restart_begins_from_interpolated_value() {
        let mut scheduler = playing(4, Easing::Linear);
        let t0 = Instant::now();
        let start = scheduler.sample(t0).unwrap();

        scheduler.next(t0);
        let t1 = t0 + Duration::from_millis(250);
        let in_flight = start.lerp(&target_of(1), 0.25);

        scheduler.next(t1);
        assert_eq!(scheduler.current_index(), Some(2));
        let at_restart = scheduler.sample(t1).unwrap();
        assert!((at_restart.left - in_flight.left).abs() < 1e-6);

        // The new flight takes the full duration from the restart.
        let halfway = scheduler.sample(t1 + Duration::from_millis(500)).unwrap();
        let expected = in_flight.lerp(&target_of(2), 0.5);
        assert!((halfway.left - expected.left).abs() < 1e-6);
        assert_eq!(
            scheduler.sample(t1 + Duration::from_millis(1000)),
            Some(target_of(2))
        );
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let mut scheduler = TransitionScheduler::new(settings(0, Easing::Ease));
        scheduler.set_stage(Size::new(1600.0, 1200.0), Size::new(800.0, 600.0));
        scheduler.start(&keyframes(2), None);
        let now = Instant::now();
        scheduler.sample(now);
        scheduler.next(now);
        assert!(!scheduler.is_animating(now));
        assert_eq!(scheduler.sample(now), Some(target_of(1)));
    }

    #[test]
    fn test_unmeasured_stage_renders_nothing() {
        let mut scheduler = TransitionScheduler::new(PlaybackSettings::default());
        scheduler.start(&keyframes(2), None);
        let now = Instant::now();
        assert_eq!(scheduler.sample(now), None);

        scheduler.set_stage(Size::new(1600.0, 1200.0), Size::default());
        assert_eq!(scheduler.sample(now), None);

        scheduler.set_stage(Size::new(1600.0, 1200.0), Size::new(800.0, 600.0));
        assert_eq!(scheduler.sample(now), Some(target_of(0)));
    }

    #[test]
    fn test_resize_snaps_to_new_target() {
        let mut scheduler = playing(3, Easing::Linear);
        let t0 = Instant::now();
        scheduler.sample(t0);
        scheduler.next(t0);

        scheduler.set_stage(Size::new(1600.0, 1200.0), Size::new(400.0, 300.0));
        let t1 = t0 + Duration::from_millis(100);
        assert!(!scheduler.is_animating(t1));
        let kfs = keyframes(3);
        assert_eq!(
            scheduler.sample(t1),
            Some(project(&kfs[1], 1600.0, 1200.0, 400.0, 300.0))
        );
    }

    #[test]
    fn test_new_keyframe_list_resets_index() {
        let mut scheduler = playing(3, Easing::Linear);
        let now = Instant::now();
        scheduler.last(now);

        // Same ids, new geometry: index kept.
        let mut edited = keyframes(3);
        edited[2].width = 0.5;
        scheduler.set_keyframes(&edited);
        assert_eq!(scheduler.current_index(), Some(2));

        // Different ids: back to the start.
        scheduler.set_keyframes(&keyframes(2));
        assert_eq!(scheduler.current_index(), Some(0));
    }

    #[test]
    fn test_stop_returns_to_idle() {
        let mut scheduler = playing(2, Easing::Linear);
        let now = Instant::now();
        scheduler.sample(now);
        scheduler.next(now);
        scheduler.stop();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(!scheduler.is_animating(now));
        assert_eq!(scheduler.sample(now), None);
    }
}
