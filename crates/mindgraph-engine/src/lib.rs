//! Mindgraph Canvas Engine
//!
//! Platform-agnostic viewport, hit-testing, gesture, and drag-session
//! machinery for the mindgraph editor. The host owns windowing, input,
//! rendering, and the document; this crate turns raw pointer streams
//! into scene mutations and view transforms.

pub mod animation;
pub mod camera;
pub mod drag;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod hittest;
pub mod scene;

pub use animation::{CameraAnimator, CameraTransition, View};
pub use camera::Camera;
pub use drag::{DragManager, DragOutcome, DragSession};
pub use engine::{CanvasEngine, EngineConfig, EngineEvent, TickOutcome};
pub use error::{EngineError, EngineResult};
pub use gesture::{
    Gesture, GestureConfig, GestureRecognizer, Modifiers, PointerButton, PointerEvent, PointerId,
    PointerKind,
};
pub use hittest::{distance_to_polyline, hit_test_edge, hit_test_node, nodes_in_rect};
pub use scene::{
    EdgeId, NodeId, SceneDelegate, SceneEdge, SceneNode, SceneSnapshot, SelectionModifier,
};
