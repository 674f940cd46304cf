//! Read-only scene views and the document collaborator contract.
//!
//! The engine never owns graph data. The document collaborator hands it
//! snapshots to query and receives node mutations through the
//! [`SceneDelegate`] trait; everything else flows one way, document to
//! engine.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node.
pub type NodeId = Uuid;
/// Unique identifier for an edge.
pub type EdgeId = Uuid;

/// A node as the engine sees it: canvas-space bounds plus the display
/// flags that matter for hit-testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    /// Bounding rectangle in canvas coordinates.
    pub bounds: Rect,
    /// Stacking order; higher is drawn later and hit-tested first.
    pub z_order: i32,
    pub visible: bool,
    pub selected: bool,
    pub hovered: bool,
}

impl SceneNode {
    pub fn new(id: NodeId, bounds: Rect, z_order: i32) -> Self {
        Self {
            id,
            bounds,
            z_order,
            visible: true,
            selected: false,
            hovered: false,
        }
    }

    /// Top-left corner of the node, the anchor `set_node_position` moves.
    pub fn position(&self) -> Point {
        Point::new(self.bounds.x0, self.bounds.y0)
    }
}

/// An edge as the engine sees it: a pre-flattened canvas-space polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Path points in canvas coordinates. Curved edges arrive already
    /// flattened by the document.
    pub path_points: Vec<Point>,
    pub visible: bool,
}

impl SceneEdge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, path_points: Vec<Point>) -> Self {
        Self {
            id,
            source,
            target,
            path_points,
            visible: true,
        }
    }
}

/// A consistent view of the scene taken at query time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

impl SceneSnapshot {
    /// Union of the visible node bounds, or `None` for an empty scene.
    /// This is the fit target for zoom-to-fit.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.nodes
            .iter()
            .filter(|n| n.visible)
            .map(|n| n.bounds)
            .reduce(|acc, b| acc.union(b))
    }
}

/// How a tap combines with the current selection.
///
/// Sampled from the keyboard modifier state at tap time; it rides on the
/// emitted event and never alters the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionModifier {
    /// Replace the selection with the tapped node.
    Replace,
    /// Toggle the tapped node in and out of the selection.
    Toggle,
}

/// The document collaborator: provides scene data, consumes mutations.
///
/// `set_node_position` is a provisional, live update so rendering stays
/// in sync mid-drag; `commit_node_position` is the final,
/// undo-recordable change.
pub trait SceneDelegate {
    /// A read-only view of the current scene.
    fn snapshot(&self) -> SceneSnapshot;

    /// Provisionally move a node (not recorded for undo).
    fn set_node_position(&mut self, node: NodeId, position: Point);

    /// Finalize a node position as a committed, undoable change.
    fn commit_node_position(&mut self, node: NodeId, position: Point);

    /// Select a node, replacing or toggling per the modifier.
    fn select_node(&mut self, node: NodeId, modifier: SelectionModifier);

    /// Clear the selection.
    fn clear_selection(&mut self);
}
