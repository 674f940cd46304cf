//! Animated camera transitions driven by the host's frame clock.
//!
//! A transition is a pure value interpolation between two views. The
//! engine samples it on every tick with the host-supplied time; there is
//! no internal timer, so starting, sampling, and cancelling are all
//! plain function calls.

use crate::camera::Camera;
use kurbo::Vec2;

/// Default transition duration in seconds.
pub const DEFAULT_TRANSITION_SECS: f64 = 0.25;

/// A camera view as an interpolation endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub offset: Vec2,
    pub zoom: f64,
}

impl View {
    pub fn new(offset: Vec2, zoom: f64) -> Self {
        Self { offset, zoom }
    }

    /// The camera's current view.
    pub fn of(camera: &Camera) -> Self {
        Self {
            offset: camera.offset,
            zoom: camera.report_zoom(),
        }
    }
}

/// Cubic ease-in-out progress curve.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// An in-flight interpolation between two camera views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    pub from: View,
    pub to: View,
    pub start_time: f64,
    pub duration: f64,
}

impl CameraTransition {
    pub fn new(from: View, to: View, start_time: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start_time,
            // A zero-length transition still samples to its endpoint.
            duration: duration.max(0.0),
        }
    }

    /// Sample the eased view at `now`.
    pub fn sample(&self, now: f64) -> View {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ease_in_out_cubic((now - self.start_time) / self.duration);
        View {
            offset: Vec2::new(
                lerp(self.from.offset.x, self.to.offset.x, t),
                lerp(self.from.offset.y, self.to.offset.y, t),
            ),
            zoom: lerp(self.from.zoom, self.to.zoom, t),
        }
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now - self.start_time >= self.duration
    }
}

/// Drives at most one camera transition at a time.
///
/// Starting a new transition replaces the one in flight; the two are
/// never composed.
#[derive(Debug, Clone, Default)]
pub struct CameraAnimator {
    active: Option<CameraTransition>,
}

impl CameraAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin animating `camera` toward `target`, replacing any in-flight
    /// transition.
    pub fn animate_to(&mut self, camera: &Camera, target: View, now: f64, duration: f64) {
        self.active = Some(CameraTransition::new(View::of(camera), target, now, duration));
    }

    /// Drop the in-flight transition, leaving the camera wherever the
    /// last tick put it.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Advance the transition and apply the sampled view to `camera`.
    /// Returns true if the camera changed (a repaint is needed).
    pub fn tick(&mut self, now: f64, camera: &mut Camera) -> bool {
        let Some(transition) = self.active else {
            return false;
        };

        let view = transition.sample(now);
        let changed = view != View::of(camera);
        camera.set_view(view.offset, view.zoom);

        if transition.is_finished(now) {
            self.active = None;
        }
        changed
    }
}
