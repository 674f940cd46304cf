//! The per-canvas engine: classified input in, scene mutations and
//! navigation out.
//!
//! One `CanvasEngine` is constructed per canvas with its document
//! delegate injected; there is no process-wide state. All entry points
//! are synchronous and complete within the frame that calls them.

use crate::animation::{CameraAnimator, View};
use crate::camera::Camera;
use crate::drag::{DragManager, DragOutcome};
use crate::error::EngineError;
use crate::gesture::{
    Gesture, GestureConfig, GestureRecognizer, Modifiers, PointerEvent, PointerId,
};
use crate::hittest::{hit_test_edge, hit_test_node};
use crate::scene::{EdgeId, NodeId, SceneDelegate, SelectionModifier};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Engine tuning knobs. Distances are screen pixels, durations seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub gesture: GestureConfig,
    /// Hit distance for edge paths.
    pub edge_hit_tolerance: f64,
    /// Padding around content for zoom-to-fit.
    pub fit_padding: f64,
    /// Duration of animated view transitions.
    pub transition_duration: f64,
    /// Zoom step applied by a double tap on empty canvas.
    pub double_tap_zoom_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            edge_hit_tolerance: 8.0,
            fit_padding: 48.0,
            transition_duration: crate::animation::DEFAULT_TRANSITION_SECS,
            double_tap_zoom_factor: 1.6,
        }
    }
}

/// Semantic events the engine surfaces to its host. Selection changes
/// are applied through the delegate before the event is emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    NodeTapped {
        node: NodeId,
        modifiers: Modifiers,
    },
    /// Tap on empty canvas; the selection was cleared.
    CanvasTapped {
        position: Point,
    },
    NodeDoubleTapped {
        node: NodeId,
    },
    EdgeTapped {
        edge: EdgeId,
        modifiers: Modifiers,
    },
    NodeLongPressed {
        node: NodeId,
        position: Point,
    },
    CanvasLongPressed {
        position: Point,
    },
    /// The hovered node changed (mouse only).
    HoverChanged {
        node: Option<NodeId>,
    },
    /// A drag finished and the node's position was committed.
    DragCommitted {
        node: NodeId,
        position: Point,
        velocity: Vec2,
    },
}

/// What one frame tick produced.
#[derive(Debug, Default)]
pub struct TickOutcome {
    pub events: Vec<EngineEvent>,
    /// The camera moved this tick; the host should repaint.
    pub view_changed: bool,
}

/// Interactive viewport and gesture engine for one canvas.
pub struct CanvasEngine<D: SceneDelegate> {
    delegate: D,
    camera: Camera,
    animator: CameraAnimator,
    recognizer: GestureRecognizer,
    drag: DragManager,
    config: EngineConfig,
    viewport: Size,
    hovered: Option<NodeId>,
    /// Pointers panning the canvas (drags that started on empty space).
    pan_pointers: HashSet<PointerId>,
    /// Camera zoom when the current pinch began.
    pinch_base_zoom: Option<f64>,
    /// Latest host timestamp seen, so gesture-initiated transitions can
    /// start without waiting for the next tick.
    clock: f64,
}

impl<D: SceneDelegate> CanvasEngine<D> {
    pub fn new(delegate: D, viewport: Size, config: EngineConfig) -> Self {
        Self {
            delegate,
            camera: Camera::new(),
            animator: CameraAnimator::new(),
            recognizer: GestureRecognizer::new(config.gesture),
            drag: DragManager::new(),
            config,
            viewport,
            hovered: None,
            pan_pointers: HashSet::new(),
            pinch_base_zoom: None,
            clock: 0.0,
        }
    }

    /// The current view transform, for the render surface.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    pub fn hovered_node(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn set_viewport_size(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Feed one raw pointer event and dispatch whatever it classified
    /// into.
    pub fn pointer_event(&mut self, event: PointerEvent) -> Vec<EngineEvent> {
        self.clock = match event {
            PointerEvent::Down { time, .. }
            | PointerEvent::Move { time, .. }
            | PointerEvent::Up { time, .. }
            | PointerEvent::Cancel { time, .. } => self.clock.max(time),
        };

        // A restarted pointer stream orphans its old drag session; close
        // it before the recognizer can produce a second DragStart.
        if let PointerEvent::Down { pointer, .. } = event {
            if self.drag.is_dragging(pointer) {
                log::warn!("pointer {pointer:?} restarted mid-drag, cancelling its session");
                self.drag.cancel(pointer, &mut self.delegate);
            }
            self.pan_pointers.remove(&pointer);
        }

        let gestures = self.recognizer.handle_event(event);

        if self.recognizer.is_scaling() {
            if self.pinch_base_zoom.is_none() {
                self.pinch_base_zoom = Some(self.camera.report_zoom());
            }
        } else {
            self.pinch_base_zoom = None;
        }

        self.dispatch(gestures)
    }

    /// Advance the frame clock: fires gesture deadlines and steps any
    /// view transition. Call once per frame.
    pub fn tick(&mut self, now: f64) -> TickOutcome {
        self.clock = self.clock.max(now);
        let gestures = self.recognizer.tick(now);
        let events = self.dispatch(gestures);
        let view_changed = self.animator.tick(now, &mut self.camera);
        TickOutcome {
            events,
            view_changed,
        }
    }

    /// Wheel/trackpad scroll: pans the canvas, or zooms about the cursor
    /// while the platform zoom modifier is held.
    pub fn scroll(&mut self, delta: Vec2, position: Point, modifiers: Modifiers) {
        self.animator.cancel();
        if modifiers.ctrl || modifiers.meta {
            let factor = 1.0 - delta.y / 500.0;
            if (factor - 1.0).abs() > 0.001 {
                self.camera.zoom_by(position, factor);
            }
        } else {
            self.camera.pan(delta);
        }
    }

    /// Pan directly (keyboard navigation, scrollbars). Cancels any
    /// transition in flight.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.animator.cancel();
        self.camera.pan(delta);
    }

    /// Zoom to an absolute scale about a screen anchor, optionally
    /// animated.
    pub fn zoom_to_point(&mut self, anchor: Point, target_scale: f64, animate: bool, now: f64) {
        if animate {
            let (offset, zoom) = self.camera.zoomed_view(anchor, target_scale);
            self.animator.animate_to(
                &self.camera,
                View::new(offset, zoom),
                now,
                self.config.transition_duration,
            );
        } else {
            self.animator.cancel();
            self.camera.zoom_to_point(anchor, target_scale);
        }
    }

    /// Fit the visible content in the viewport. Empty or degenerate
    /// scenes leave the view unchanged.
    pub fn zoom_to_fit_content(&mut self, animate: bool, now: f64) {
        let Some(bounds) = self.delegate.snapshot().content_bounds() else {
            log::debug!("zoom_to_fit_content skipped: empty scene");
            return;
        };
        self.zoom_to_fit(bounds, animate, now);
    }

    /// Fit an explicit canvas rectangle in the viewport.
    pub fn zoom_to_fit(&mut self, bounds: Rect, animate: bool, now: f64) {
        if animate {
            let Some((offset, zoom)) =
                self.camera
                    .fitted_view(bounds, self.viewport, self.config.fit_padding)
            else {
                return;
            };
            self.animator.animate_to(
                &self.camera,
                View::new(offset, zoom),
                now,
                self.config.transition_duration,
            );
        } else {
            self.animator.cancel();
            self.camera
                .zoom_to_fit(bounds, self.viewport, self.config.fit_padding);
        }
    }

    /// Commit solver-produced positions through the delegate, then
    /// optionally fit the new extent.
    pub fn apply_layout_result<I>(&mut self, positions: I, fit_after: bool, now: f64)
    where
        I: IntoIterator<Item = (NodeId, Point)>,
    {
        for (node, position) in positions {
            self.delegate.commit_node_position(node, position);
        }
        if fit_after {
            self.zoom_to_fit_content(true, now);
        }
    }

    /// Abort everything interactive: open drags are discarded (nodes
    /// restored), pointer state is forgotten, transitions stop. For
    /// window/focus loss or escape.
    pub fn cancel_interactions(&mut self) {
        self.drag.cancel_all(&mut self.delegate);
        self.recognizer.reset();
        self.animator.cancel();
        self.pan_pointers.clear();
        self.pinch_base_zoom = None;
    }

    fn dispatch(&mut self, gestures: Vec<Gesture>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        for gesture in gestures {
            match gesture {
                Gesture::Tap {
                    position,
                    modifiers,
                } => self.on_tap(position, modifiers, &mut events),
                Gesture::DoubleTap { position, .. } => self.on_double_tap(position, &mut events),
                Gesture::LongPress { position, .. } => self.on_long_press(position, &mut events),
                Gesture::DragStart {
                    pointer, origin, ..
                } => self.on_drag_start(pointer, origin),
                Gesture::DragUpdate {
                    pointer,
                    position,
                    delta,
                } => self.on_drag_update(pointer, position, delta),
                Gesture::DragEnd {
                    pointer,
                    position,
                    velocity,
                } => self.on_drag_end(pointer, position, velocity, &mut events),
                Gesture::PanUpdate { delta } => {
                    self.animator.cancel();
                    self.camera.pan(delta);
                }
                Gesture::ScaleUpdate { scale, focal } => {
                    self.animator.cancel();
                    let base = self.pinch_base_zoom.unwrap_or_else(|| self.camera.report_zoom());
                    self.camera.zoom_to_point(focal, base * scale);
                }
                Gesture::Hover { position } => self.on_hover(position, &mut events),
            }
        }
        events
    }

    fn on_tap(&mut self, position: Point, modifiers: Modifiers, events: &mut Vec<EngineEvent>) {
        let canvas_point = self.camera.screen_to_canvas(position);
        let snapshot = self.delegate.snapshot();

        if let Some(node) = hit_test_node(&snapshot.nodes, canvas_point) {
            let modifier = if modifiers.multi_select() {
                SelectionModifier::Toggle
            } else {
                SelectionModifier::Replace
            };
            self.delegate.select_node(node, modifier);
            events.push(EngineEvent::NodeTapped { node, modifiers });
            return;
        }

        let tolerance = self.config.edge_hit_tolerance / self.camera.report_zoom();
        if let Some(edge) = hit_test_edge(&snapshot.edges, canvas_point, tolerance) {
            events.push(EngineEvent::EdgeTapped { edge, modifiers });
            return;
        }

        self.delegate.clear_selection();
        events.push(EngineEvent::CanvasTapped {
            position: canvas_point,
        });
    }

    fn on_double_tap(&mut self, position: Point, events: &mut Vec<EngineEvent>) {
        let canvas_point = self.camera.screen_to_canvas(position);
        let snapshot = self.delegate.snapshot();

        if let Some(node) = hit_test_node(&snapshot.nodes, canvas_point) {
            events.push(EngineEvent::NodeDoubleTapped { node });
            return;
        }

        // Empty canvas: step the zoom in about the tap point.
        let target = self.camera.report_zoom() * self.config.double_tap_zoom_factor;
        self.zoom_to_point(position, target, true, self.clock);
    }

    fn on_long_press(&mut self, position: Point, events: &mut Vec<EngineEvent>) {
        let canvas_point = self.camera.screen_to_canvas(position);
        let snapshot = self.delegate.snapshot();

        match hit_test_node(&snapshot.nodes, canvas_point) {
            Some(node) => events.push(EngineEvent::NodeLongPressed {
                node,
                position: canvas_point,
            }),
            None => events.push(EngineEvent::CanvasLongPressed {
                position: canvas_point,
            }),
        }
    }

    fn on_drag_start(&mut self, pointer: PointerId, origin: Point) {
        // Direct manipulation supersedes any animated transition.
        self.animator.cancel();

        let canvas_origin = self.camera.screen_to_canvas(origin);
        let snapshot = self.delegate.snapshot();

        let Some(node) = hit_test_node(&snapshot.nodes, canvas_origin) else {
            self.pan_pointers.insert(pointer);
            return;
        };
        let Some(node_start) = snapshot
            .nodes
            .iter()
            .find(|n| n.id == node)
            .map(|n| n.position())
        else {
            return;
        };

        // The recognizer already applied the screen-space threshold, so
        // the session's own threshold is zero.
        match self.drag.begin(pointer, node, node_start, canvas_origin, 0.0) {
            Ok(()) => {}
            Err(err @ EngineError::ReentrantDrag { .. }) => {
                log::error!("{err}");
                debug_assert!(false, "{err}");
            }
            Err(err) => log::error!("{err}"),
        }
    }

    fn on_drag_update(&mut self, pointer: PointerId, position: Point, delta: Vec2) {
        if self.drag.is_dragging(pointer) {
            let canvas_point = self.camera.screen_to_canvas(position);
            self.drag.update(pointer, canvas_point, &mut self.delegate);
        } else if self.pan_pointers.contains(&pointer) {
            self.camera.pan(delta);
        }
    }

    fn on_drag_end(
        &mut self,
        pointer: PointerId,
        position: Point,
        velocity: Vec2,
        events: &mut Vec<EngineEvent>,
    ) {
        if self.pan_pointers.remove(&pointer) {
            return;
        }

        let canvas_point = self.camera.screen_to_canvas(position);
        let canvas_velocity = velocity * (1.0 / self.camera.report_zoom());
        match self
            .drag
            .end(pointer, canvas_point, canvas_velocity, &mut self.delegate)
        {
            Some(DragOutcome::Committed {
                node,
                position,
                velocity,
            }) => events.push(EngineEvent::DragCommitted {
                node,
                position,
                velocity,
            }),
            // Engine sessions open post-threshold, so a tap outcome only
            // reaches hosts driving the DragManager directly.
            Some(DragOutcome::Tap { .. }) | None => {}
        }
    }

    fn on_hover(&mut self, position: Point, events: &mut Vec<EngineEvent>) {
        let canvas_point = self.camera.screen_to_canvas(position);
        let snapshot = self.delegate.snapshot();
        let node = hit_test_node(&snapshot.nodes, canvas_point);
        if node != self.hovered {
            self.hovered = node;
            events.push(EngineEvent::HoverChanged { node });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{PointerButton, PointerKind};
    use crate::scene::{SceneEdge, SceneNode, SceneSnapshot};
    use uuid::Uuid;

    /// A minimal document: nodes move when told to, selection and
    /// commits are recorded.
    #[derive(Default)]
    struct StubDocument {
        nodes: Vec<SceneNode>,
        edges: Vec<SceneEdge>,
        selections: Vec<(NodeId, SelectionModifier)>,
        clears: usize,
        commits: Vec<(NodeId, Point)>,
    }

    impl StubDocument {
        fn node_position(&self, node: NodeId) -> Point {
            self.nodes
                .iter()
                .find(|n| n.id == node)
                .map(|n| n.position())
                .unwrap()
        }

        fn move_node(&mut self, node: NodeId, position: Point) {
            if let Some(n) = self.nodes.iter_mut().find(|n| n.id == node) {
                let size = n.bounds.size();
                n.bounds = Rect::from_origin_size(position, size);
            }
        }
    }

    impl SceneDelegate for StubDocument {
        fn snapshot(&self) -> SceneSnapshot {
            SceneSnapshot {
                nodes: self.nodes.clone(),
                edges: self.edges.clone(),
            }
        }
        fn set_node_position(&mut self, node: NodeId, position: Point) {
            self.move_node(node, position);
        }
        fn commit_node_position(&mut self, node: NodeId, position: Point) {
            self.move_node(node, position);
            self.commits.push((node, position));
        }
        fn select_node(&mut self, node: NodeId, modifier: SelectionModifier) {
            self.selections.push((node, modifier));
        }
        fn clear_selection(&mut self) {
            self.clears += 1;
        }
    }

    fn engine_with_scene() -> (CanvasEngine<StubDocument>, NodeId, EdgeId) {
        let node = Uuid::new_v4();
        let edge = Uuid::new_v4();
        let other = Uuid::new_v4();
        let document = StubDocument {
            nodes: vec![
                SceneNode::new(node, Rect::new(10.0, 10.0, 110.0, 60.0), 1),
                SceneNode::new(other, Rect::new(400.0, 400.0, 450.0, 450.0), 0),
            ],
            edges: vec![SceneEdge::new(
                edge,
                node,
                other,
                vec![Point::new(200.0, 200.0), Point::new(300.0, 200.0)],
            )],
            ..StubDocument::default()
        };
        let engine = CanvasEngine::new(document, Size::new(800.0, 600.0), EngineConfig::default());
        (engine, node, edge)
    }

    fn down(id: u64, kind: PointerKind, x: f64, y: f64, time: f64) -> PointerEvent {
        PointerEvent::Down {
            pointer: PointerId(id),
            kind,
            button: PointerButton::Primary,
            position: Point::new(x, y),
            modifiers: Modifiers::default(),
            time,
        }
    }

    fn mv(id: u64, kind: PointerKind, x: f64, y: f64, time: f64) -> PointerEvent {
        PointerEvent::Move {
            pointer: PointerId(id),
            kind,
            position: Point::new(x, y),
            time,
        }
    }

    fn up(id: u64, x: f64, y: f64, time: f64) -> PointerEvent {
        PointerEvent::Up {
            pointer: PointerId(id),
            position: Point::new(x, y),
            time,
        }
    }

    #[test]
    fn test_tap_selects_node() {
        let (mut engine, node, _) = engine_with_scene();
        engine.pointer_event(down(1, PointerKind::Mouse, 50.0, 30.0, 0.0));
        engine.pointer_event(up(1, 50.0, 30.0, 0.05));
        let outcome = engine.tick(1.0);

        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, EngineEvent::NodeTapped { node: n, .. } if *n == node)));
        assert_eq!(
            engine.delegate().selections,
            vec![(node, SelectionModifier::Replace)]
        );
    }

    #[test]
    fn test_modifier_tap_toggles_selection() {
        let (mut engine, node, _) = engine_with_scene();
        engine.pointer_event(PointerEvent::Down {
            pointer: PointerId(1),
            kind: PointerKind::Mouse,
            button: PointerButton::Primary,
            position: Point::new(50.0, 30.0),
            modifiers: Modifiers {
                shift: true,
                ..Modifiers::default()
            },
            time: 0.0,
        });
        engine.pointer_event(up(1, 50.0, 30.0, 0.05));
        engine.tick(1.0);

        assert_eq!(
            engine.delegate().selections,
            vec![(node, SelectionModifier::Toggle)]
        );
    }

    #[test]
    fn test_tap_empty_canvas_clears_selection() {
        let (mut engine, _, _) = engine_with_scene();
        engine.pointer_event(down(1, PointerKind::Mouse, 600.0, 100.0, 0.0));
        engine.pointer_event(up(1, 600.0, 100.0, 0.05));
        let outcome = engine.tick(1.0);

        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, EngineEvent::CanvasTapped { .. })));
        assert_eq!(engine.delegate().clears, 1);
    }

    #[test]
    fn test_tap_near_edge_path() {
        let (mut engine, _, edge) = engine_with_scene();
        engine.pointer_event(down(1, PointerKind::Mouse, 250.0, 203.0, 0.0));
        engine.pointer_event(up(1, 250.0, 203.0, 0.05));
        let outcome = engine.tick(1.0);

        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, EngineEvent::EdgeTapped { edge: d, .. } if *d == edge)));
        assert_eq!(engine.delegate().clears, 0);
    }

    #[test]
    fn test_drag_moves_node_live_and_commits() {
        let (mut engine, node, _) = engine_with_scene();
        engine.pointer_event(down(1, PointerKind::Mouse, 50.0, 30.0, 0.0));
        engine.pointer_event(mv(1, PointerKind::Mouse, 80.0, 30.0, 0.1));
        // Provisional move visible mid-drag.
        assert_eq!(engine.delegate().node_position(node), Point::new(40.0, 10.0));

        let events = engine.pointer_event(up(1, 80.0, 30.0, 0.2));
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::DragCommitted { node: n, .. } if *n == node)));
        assert_eq!(engine.delegate().commits, vec![(node, Point::new(40.0, 10.0))]);

        // No tap sneaks out afterwards.
        assert!(engine.tick(2.0).events.is_empty());
    }

    #[test]
    fn test_drag_respects_zoomed_camera() {
        let (mut engine, node, _) = engine_with_scene();
        engine.zoom_to_point(Point::ZERO, 2.0, false, 0.0);

        // Node top-left (10, 10) is at screen (20, 20); grab its middle.
        engine.pointer_event(down(1, PointerKind::Mouse, 100.0, 40.0, 0.0));
        engine.pointer_event(mv(1, PointerKind::Mouse, 140.0, 40.0, 0.1));

        // 40 screen px at 2x zoom is 20 canvas units.
        assert_eq!(engine.delegate().node_position(node), Point::new(30.0, 10.0));
    }

    #[test]
    fn test_drag_on_empty_canvas_pans() {
        let (mut engine, _, _) = engine_with_scene();
        engine.pointer_event(down(1, PointerKind::Mouse, 600.0, 100.0, 0.0));
        engine.pointer_event(mv(1, PointerKind::Mouse, 620.0, 110.0, 0.1));
        engine.pointer_event(up(1, 620.0, 110.0, 0.2));

        assert!((engine.camera().offset.x - 20.0).abs() < 1e-9);
        assert!((engine.camera().offset.y - 10.0).abs() < 1e-9);
        assert!(engine.delegate().commits.is_empty());
    }

    #[test]
    fn test_wheel_zoom_preserves_anchor() {
        let (mut engine, _, _) = engine_with_scene();
        let anchor = Point::new(400.0, 300.0);
        let before = engine.camera().screen_to_canvas(anchor);

        engine.scroll(
            Vec2::new(0.0, -500.0),
            anchor,
            Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        );

        assert!((engine.camera().report_zoom() - 2.0).abs() < 1e-9);
        let after = engine.camera().screen_to_canvas(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_without_modifier_pans() {
        let (mut engine, _, _) = engine_with_scene();
        engine.scroll(Vec2::new(15.0, -25.0), Point::new(400.0, 300.0), Modifiers::default());
        assert!((engine.camera().offset.x - 15.0).abs() < 1e-9);
        assert!((engine.camera().offset.y + 25.0).abs() < 1e-9);
        assert!((engine.camera().report_zoom() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_zooms_about_focal_point() {
        let (mut engine, _, _) = engine_with_scene();
        engine.pointer_event(down(1, PointerKind::Touch, 500.0, 100.0, 0.0));
        engine.pointer_event(down(2, PointerKind::Touch, 600.0, 100.0, 0.01));
        engine.pointer_event(mv(1, PointerKind::Touch, 450.0, 100.0, 0.05));
        engine.pointer_event(mv(2, PointerKind::Touch, 650.0, 100.0, 0.1));

        assert!((engine.camera().report_zoom() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_tap_empty_canvas_zooms_in_animated() {
        let (mut engine, _, _) = engine_with_scene();
        engine.pointer_event(down(1, PointerKind::Mouse, 600.0, 100.0, 0.0));
        engine.pointer_event(up(1, 600.0, 100.0, 0.05));
        engine.pointer_event(down(1, PointerKind::Mouse, 600.0, 100.0, 0.15));
        engine.pointer_event(up(1, 600.0, 100.0, 0.2));

        // Transition started at the double tap; run it out.
        let outcome = engine.tick(1.0);
        assert!(outcome.view_changed);
        let expected = EngineConfig::default().double_tap_zoom_factor;
        assert!((engine.camera().report_zoom() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_double_tap_on_node_is_surfaced() {
        let (mut engine, node, _) = engine_with_scene();
        engine.pointer_event(down(1, PointerKind::Mouse, 50.0, 30.0, 0.0));
        engine.pointer_event(up(1, 50.0, 30.0, 0.05));
        engine.pointer_event(down(1, PointerKind::Mouse, 50.0, 30.0, 0.15));
        let events = engine.pointer_event(up(1, 50.0, 30.0, 0.2));

        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::NodeDoubleTapped { node: n } if *n == node)));
        assert!((engine.camera().report_zoom() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_hover_transitions() {
        let (mut engine, node, _) = engine_with_scene();
        let events = engine.pointer_event(mv(9, PointerKind::Mouse, 50.0, 30.0, 0.0));
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::HoverChanged { node: Some(n) } if *n == node)));
        assert_eq!(engine.hovered_node(), Some(node));

        // Repeated hover over the same node stays quiet.
        assert!(engine.pointer_event(mv(9, PointerKind::Mouse, 55.0, 32.0, 0.1)).is_empty());

        let events = engine.pointer_event(mv(9, PointerKind::Mouse, 700.0, 500.0, 0.2));
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::HoverChanged { node: None })));
    }

    #[test]
    fn test_cancel_interactions_restores_drag() {
        let (mut engine, node, _) = engine_with_scene();
        engine.pointer_event(down(1, PointerKind::Mouse, 50.0, 30.0, 0.0));
        engine.pointer_event(mv(1, PointerKind::Mouse, 150.0, 130.0, 0.1));
        assert_ne!(engine.delegate().node_position(node), Point::new(10.0, 10.0));

        engine.cancel_interactions();
        assert_eq!(engine.delegate().node_position(node), Point::new(10.0, 10.0));
        assert!(engine.delegate().commits.is_empty());
    }

    #[test]
    fn test_zoom_to_fit_content_immediate() {
        let (mut engine, _, _) = engine_with_scene();
        engine.zoom_to_fit_content(false, 0.0);

        // Content spans (10,10)-(450,450); the padded viewport must
        // contain it entirely.
        let camera = engine.camera();
        let top_left = camera.canvas_to_screen(Point::new(10.0, 10.0));
        let bottom_right = camera.canvas_to_screen(Point::new(450.0, 450.0));
        assert!(top_left.x >= 0.0 && top_left.y >= 0.0);
        assert!(bottom_right.x <= 800.0 && bottom_right.y <= 600.0);
    }

    #[test]
    fn test_apply_layout_result_commits_positions() {
        let (mut engine, node, _) = engine_with_scene();
        let target = Point::new(-120.0, 80.0);
        engine.apply_layout_result(vec![(node, target)], false, 0.0);

        assert_eq!(engine.delegate().commits, vec![(node, target)]);
        assert_eq!(engine.delegate().node_position(node), target);
    }

    #[test]
    fn test_user_pan_cancels_transition() {
        let (mut engine, _, _) = engine_with_scene();
        engine.zoom_to_point(Point::new(400.0, 300.0), 3.0, true, 0.0);
        engine.tick(0.05);
        let mid_zoom = engine.camera().report_zoom();
        assert!(mid_zoom < 3.0);

        engine.pan_by(Vec2::new(10.0, 0.0));
        let outcome = engine.tick(0.2);
        assert!(!outcome.view_changed);
        assert!((engine.camera().report_zoom() - mid_zoom).abs() < 1e-9);
    }
}
