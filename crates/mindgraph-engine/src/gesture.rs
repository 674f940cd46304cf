//! Gesture disambiguation for raw pointer streams.
//!
//! One explicit state machine per pointer id, held in a plain map: no
//! framework timers, no lifecycle coupling. The host feeds pointer
//! events (with its own timestamps) and calls [`GestureRecognizer::tick`]
//! once per frame; the recognizer answers with classified gestures.
//!
//! Per-pointer states are `Pressed -> {tap | Dragging | LongPressed}`.
//! Two or more concurrent touch pointers leave the per-pointer machines
//! and enter a joint scaling state keyed by focal-point recomputation.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Host-assigned identifier for one pointer stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointerId(pub u64);

/// Input device class of a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Touch,
    Stylus,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keyboard modifier state, sampled by the host per event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform multi-select modifier is held.
    pub fn multi_select(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// A raw pointer event. Positions are screen coordinates; `time` is the
/// host clock in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        pointer: PointerId,
        kind: PointerKind,
        button: PointerButton,
        position: Point,
        modifiers: Modifiers,
        time: f64,
    },
    Move {
        pointer: PointerId,
        kind: PointerKind,
        position: Point,
        time: f64,
    },
    Up {
        pointer: PointerId,
        position: Point,
        time: f64,
    },
    Cancel {
        pointer: PointerId,
        time: f64,
    },
}

/// A classified gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Tap {
        position: Point,
        modifiers: Modifiers,
    },
    DoubleTap {
        position: Point,
        modifiers: Modifiers,
    },
    LongPress {
        pointer: PointerId,
        position: Point,
    },
    /// Drag recognized; `origin` is the pointer-down position, not the
    /// position where the threshold was crossed.
    DragStart {
        pointer: PointerId,
        origin: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    DragUpdate {
        pointer: PointerId,
        position: Point,
        delta: Vec2,
    },
    DragEnd {
        pointer: PointerId,
        position: Point,
        velocity: Vec2,
    },
    /// Focal-point motion of an active two-finger gesture.
    PanUpdate {
        delta: Vec2,
    },
    /// Pinch update: `scale` is the inter-pointer distance relative to
    /// the distance at gesture start, `focal` the pointer midpoint.
    ScaleUpdate {
        scale: f64,
        focal: Point,
    },
    /// Buttonless mouse movement.
    Hover {
        position: Point,
    },
}

/// Recognition thresholds. Defaults are typical desktop values; touch
/// profiles usually widen the distances. None of these are normative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Movement (px) before a press becomes a drag.
    pub drag_threshold: f64,
    /// Hold duration (s) before a press becomes a long press.
    pub long_press_duration: f64,
    /// Window (s) within which two taps merge into a double tap.
    pub double_tap_window: f64,
    /// Maximum distance (px) between two taps of a double tap.
    pub double_tap_radius: f64,
    /// Smoothing window (s) for release velocity.
    pub velocity_window: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 6.0,
            long_press_duration: 0.5,
            double_tap_window: 0.3,
            double_tap_radius: 24.0,
            velocity_window: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerPhase {
    Pressed,
    Dragging,
    LongPressed,
}

#[derive(Debug, Clone, Copy)]
struct PointerRecord {
    kind: PointerKind,
    button: PointerButton,
    modifiers: Modifiers,
    origin: Point,
    down_time: f64,
    last_position: Point,
    last_time: f64,
    velocity: Vec2,
    phase: PointerPhase,
}

/// A completed tap waiting out the double-tap window.
#[derive(Debug, Clone, Copy)]
struct PendingTap {
    position: Point,
    time: f64,
    kind: PointerKind,
    modifiers: Modifiers,
}

/// Joint state of an active multi-touch scale gesture.
#[derive(Debug, Clone, Copy)]
struct ScaleState {
    /// Scale already accumulated before the current baseline (pointer
    /// count changes re-baseline the distance to stay continuous).
    base_scale: f64,
    baseline_distance: f64,
    last_midpoint: Point,
    /// Most recently emitted scale; the continuity anchor when the
    /// pointer set changes.
    last_scale: f64,
}

/// Classifies raw pointer events into gestures.
#[derive(Debug, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    pointers: HashMap<PointerId, PointerRecord>,
    pending_tap: Option<PendingTap>,
    scaling: Option<ScaleState>,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            pointers: HashMap::new(),
            pending_tap: None,
            scaling: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Whether a multi-touch scale gesture is in progress.
    pub fn is_scaling(&self) -> bool {
        self.scaling.is_some()
    }

    /// Process one raw pointer event, in arrival order.
    pub fn handle_event(&mut self, event: PointerEvent) -> Vec<Gesture> {
        match event {
            PointerEvent::Down {
                pointer,
                kind,
                button,
                position,
                modifiers,
                time,
            } => self.on_down(pointer, kind, button, position, modifiers, time),
            PointerEvent::Move {
                pointer,
                kind,
                position,
                time,
            } => self.on_move(pointer, kind, position, time),
            PointerEvent::Up {
                pointer,
                position,
                time,
            } => self.on_up(pointer, position, time),
            PointerEvent::Cancel { pointer, time } => self.on_cancel(pointer, time),
        }
    }

    /// Advance time-based transitions: long-press deadlines and expired
    /// pending taps. Call once per frame, after the frame's events.
    ///
    /// Moves are handled eagerly in [`Self::handle_event`], so a move
    /// past the drag threshold that arrives in the same frame as the
    /// long-press deadline always wins over the long press.
    pub fn tick(&mut self, now: f64) -> Vec<Gesture> {
        let mut out = Vec::new();

        if let Some(pending) = self.pending_tap {
            if now - pending.time > self.config.double_tap_window {
                self.pending_tap = None;
                out.push(Gesture::Tap {
                    position: pending.position,
                    modifiers: pending.modifiers,
                });
            }
        }

        if self.scaling.is_none() {
            for (&pointer, record) in &mut self.pointers {
                if record.phase == PointerPhase::Pressed
                    && now - record.down_time >= self.config.long_press_duration
                {
                    record.phase = PointerPhase::LongPressed;
                    out.push(Gesture::LongPress {
                        pointer,
                        position: record.origin,
                    });
                }
            }
        }

        out
    }

    /// Discard all pointer state without emitting anything. For focus
    /// loss; open drag sessions are the engine's to cancel.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.pending_tap = None;
        self.scaling = None;
    }

    fn on_down(
        &mut self,
        pointer: PointerId,
        kind: PointerKind,
        button: PointerButton,
        position: Point,
        modifiers: Modifiers,
        time: f64,
    ) -> Vec<Gesture> {
        let mut out = Vec::new();

        if self.pointers.contains_key(&pointer) {
            log::warn!("duplicate pointer-down for {pointer:?}, restarting its stream");
        }

        // A pending tap that cannot merge with this press flushes now so
        // its Tap is not reordered after the new pointer's gestures.
        if let Some(pending) = self.pending_tap {
            let mergeable = pending.kind == kind
                && time - pending.time <= self.config.double_tap_window
                && (position - pending.position).hypot() <= self.config.double_tap_radius;
            if !mergeable {
                self.pending_tap = None;
                out.push(Gesture::Tap {
                    position: pending.position,
                    modifiers: pending.modifiers,
                });
            }
        }

        self.pointers.insert(
            pointer,
            PointerRecord {
                kind,
                button,
                modifiers,
                origin: position,
                down_time: time,
                last_position: position,
                last_time: time,
                velocity: Vec2::ZERO,
                phase: PointerPhase::Pressed,
            },
        );

        if kind == PointerKind::Touch && self.touch_count() >= 2 {
            if self.scaling.is_some() {
                // An extra finger joined an active pinch: keep the
                // accumulated scale continuous.
                self.rebaseline_scaling();
            } else {
                out.extend(self.enter_scaling());
            }
        }

        out
    }

    fn on_move(
        &mut self,
        pointer: PointerId,
        kind: PointerKind,
        position: Point,
        time: f64,
    ) -> Vec<Gesture> {
        let Some(record) = self.pointers.get_mut(&pointer) else {
            // No button down: mouse movement reports hover.
            if kind == PointerKind::Mouse {
                return vec![Gesture::Hover { position }];
            }
            return Vec::new();
        };

        let previous = record.last_position;
        let dt = time - record.last_time;
        if dt > 0.0 {
            let instantaneous = (position - previous) * (1.0 / dt);
            let alpha = (dt / self.config.velocity_window).clamp(0.0, 1.0);
            record.velocity += (instantaneous - record.velocity) * alpha;
        }
        record.last_position = position;
        record.last_time = time;

        let is_touch = record.kind == PointerKind::Touch;
        let phase = record.phase;
        let origin = record.origin;
        let button = record.button;
        let modifiers = record.modifiers;

        if self.scaling.is_some() && is_touch {
            return self.scale_update();
        }

        let crossed = (position - origin).hypot() >= self.config.drag_threshold;
        match phase {
            PointerPhase::Dragging => vec![Gesture::DragUpdate {
                pointer,
                position,
                delta: position - previous,
            }],
            // Movement past the threshold wins over both the pending tap
            // and an already-fired long press.
            PointerPhase::Pressed | PointerPhase::LongPressed if crossed => {
                if let Some(record) = self.pointers.get_mut(&pointer) {
                    record.phase = PointerPhase::Dragging;
                }
                vec![
                    Gesture::DragStart {
                        pointer,
                        origin,
                        button,
                        modifiers,
                    },
                    Gesture::DragUpdate {
                        pointer,
                        position,
                        delta: position - origin,
                    },
                ]
            }
            _ => Vec::new(),
        }
    }

    fn on_up(&mut self, pointer: PointerId, position: Point, time: f64) -> Vec<Gesture> {
        let Some(record) = self.pointers.remove(&pointer) else {
            return Vec::new();
        };

        if self.scaling.is_some() && record.kind == PointerKind::Touch {
            return self.maybe_end_scaling();
        }

        match record.phase {
            PointerPhase::Pressed => {
                if time - record.down_time >= self.config.long_press_duration {
                    // Deadline passed without a tick; classify as the
                    // long press it already was.
                    return vec![Gesture::LongPress {
                        pointer,
                        position: record.origin,
                    }];
                }
                self.settle_tap(record, position, time)
            }
            PointerPhase::Dragging => vec![Gesture::DragEnd {
                pointer,
                position,
                velocity: record.velocity,
            }],
            PointerPhase::LongPressed => Vec::new(),
        }
    }

    fn on_cancel(&mut self, pointer: PointerId, _time: f64) -> Vec<Gesture> {
        let Some(record) = self.pointers.remove(&pointer) else {
            return Vec::new();
        };

        if self.scaling.is_some() && record.kind == PointerKind::Touch {
            return self.maybe_end_scaling();
        }

        match record.phase {
            // A cancelled drag still closes with a DragEnd so session
            // owners can release; the velocity is whatever was tracked.
            PointerPhase::Dragging => vec![Gesture::DragEnd {
                pointer,
                position: record.last_position,
                velocity: record.velocity,
            }],
            _ => Vec::new(),
        }
    }

    /// Resolve a released press into a tap, merging with a pending tap
    /// into a double tap when the window and radius allow.
    fn settle_tap(&mut self, record: PointerRecord, position: Point, time: f64) -> Vec<Gesture> {
        let mut out = Vec::new();

        if let Some(pending) = self.pending_tap {
            let merges = pending.kind == record.kind
                && time - pending.time <= self.config.double_tap_window
                && (position - pending.position).hypot() <= self.config.double_tap_radius;
            self.pending_tap = None;
            if merges {
                out.push(Gesture::DoubleTap {
                    position,
                    modifiers: record.modifiers,
                });
                return out;
            }
            // The stale tap surfaces before the new one is parked.
            out.push(Gesture::Tap {
                position: pending.position,
                modifiers: pending.modifiers,
            });
        }

        self.pending_tap = Some(PendingTap {
            position,
            time,
            kind: record.kind,
            modifiers: record.modifiers,
        });
        out
    }

    fn touch_count(&self) -> usize {
        self.pointers
            .values()
            .filter(|r| r.kind == PointerKind::Touch)
            .count()
    }

    fn touch_positions(&self) -> Vec<Point> {
        let mut touches: Vec<(PointerId, Point)> = self
            .pointers
            .iter()
            .filter(|(_, r)| r.kind == PointerKind::Touch)
            .map(|(&id, r)| (id, r.last_position))
            .collect();
        touches.sort_by_key(|(id, _)| *id);
        touches.into_iter().map(|(_, p)| p).collect()
    }

    fn focal_and_spread(&self) -> (Point, f64) {
        let positions = self.touch_positions();
        let n = positions.len() as f64;
        let centroid = positions
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2())
            * (1.0 / n);
        let centroid = centroid.to_point();
        let spread = positions
            .iter()
            .map(|p| (*p - centroid).hypot())
            .sum::<f64>()
            / n;
        (centroid, spread)
    }

    /// Enter the joint scaling state, overriding per-pointer gestures.
    fn enter_scaling(&mut self) -> Vec<Gesture> {
        let mut out = Vec::new();

        // A single-pointer drag in progress ends here; presses and any
        // pending tap are swallowed.
        let dragging: Vec<PointerId> = self
            .pointers
            .iter()
            .filter(|(_, r)| r.kind == PointerKind::Touch && r.phase == PointerPhase::Dragging)
            .map(|(&id, _)| id)
            .collect();
        for pointer in dragging {
            let record = self.pointers[&pointer];
            out.push(Gesture::DragEnd {
                pointer,
                position: record.last_position,
                velocity: record.velocity,
            });
        }
        self.pending_tap = None;

        let (focal, spread) = self.focal_and_spread();
        self.scaling = Some(ScaleState {
            base_scale: 1.0,
            baseline_distance: spread.max(f64::EPSILON),
            last_midpoint: focal,
            last_scale: 1.0,
        });
        out
    }

    /// Recompute scale and focal point after a touch moved.
    fn scale_update(&mut self) -> Vec<Gesture> {
        let (focal, spread) = self.focal_and_spread();
        let Some(state) = self.scaling.as_mut() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let delta = focal - state.last_midpoint;
        if delta.hypot2() > 0.0 {
            out.push(Gesture::PanUpdate { delta });
        }
        state.last_midpoint = focal;

        let scale = state.base_scale * spread / state.baseline_distance;
        state.last_scale = scale;
        out.push(Gesture::ScaleUpdate { scale, focal });
        out
    }

    /// After a touch lifted: either re-baseline (still >= 2 touches) or
    /// end the scale gesture, returning survivors to idle.
    fn maybe_end_scaling(&mut self) -> Vec<Gesture> {
        if self.touch_count() >= 2 {
            self.rebaseline_scaling();
            return Vec::new();
        }

        self.scaling = None;
        // Remaining touches return to idle, not to taps or drags.
        self.pointers.retain(|_, r| r.kind != PointerKind::Touch);
        Vec::new()
    }

    /// Re-anchor the baseline at the new pointer set so a pointer count
    /// change does not jump the emitted scale.
    fn rebaseline_scaling(&mut self) {
        let (focal, spread) = self.focal_and_spread();
        if let Some(state) = self.scaling.as_mut() {
            state.base_scale = state.last_scale;
            state.baseline_distance = spread.max(f64::EPSILON);
            state.last_midpoint = focal;
        }
    }
}
