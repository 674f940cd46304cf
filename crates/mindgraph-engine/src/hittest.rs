//! Hit-testing over scene read views.
//!
//! Pure queries: nothing here mutates the scene, and "nothing hit" is an
//! ordinary `None`. Linear scans are fine at the scene sizes this engine
//! targets; callers with much larger graphs can layer a spatial index on
//! top without changing these contracts.

use crate::scene::{EdgeId, NodeId, SceneEdge, SceneNode};
use kurbo::{Point, Rect, Vec2};

/// Find the topmost visible node containing `point`.
///
/// Nodes are compared by descending `z_order`; among equal z-orders the
/// later entry wins, matching paint order. The result is reproducible
/// for a given snapshot.
pub fn hit_test_node(nodes: &[SceneNode], point: Point) -> Option<NodeId> {
    let mut best: Option<(&SceneNode, usize)> = None;
    for (index, node) in nodes.iter().enumerate() {
        if !node.visible || !node.bounds.contains(point) {
            continue;
        }
        let on_top = match best {
            Some((current, _)) => node.z_order >= current.z_order,
            None => true,
        };
        if on_top {
            best = Some((node, index));
        }
    }
    best.map(|(node, _)| node.id)
}

/// Find the visible edge whose path comes within `tolerance` of `point`,
/// preferring the smallest distance on ties.
pub fn hit_test_edge(edges: &[SceneEdge], point: Point, tolerance: f64) -> Option<EdgeId> {
    let mut best: Option<(EdgeId, f64)> = None;
    for edge in edges {
        if !edge.visible {
            continue;
        }
        let distance = distance_to_polyline(&edge.path_points, point);
        if distance > tolerance {
            continue;
        }
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((edge.id, distance));
        }
    }
    best.map(|(id, _)| id)
}

/// Minimum distance from `point` to a polyline.
///
/// An empty path is infinitely far away; a single-point path is treated
/// as a point.
pub fn distance_to_polyline(path: &[Point], point: Point) -> f64 {
    match path {
        [] => f64::INFINITY,
        [only] => (point - *only).hypot(),
        _ => path
            .windows(2)
            .map(|seg| distance_to_segment(seg[0], seg[1], point))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Distance from `point` to the segment `start`..`end`.
fn distance_to_segment(start: Point, end: Point, point: Point) -> f64 {
    let line_vec = end - start;
    let point_vec = point - start;

    let line_len_sq = line_vec.hypot2();
    if line_len_sq < f64::EPSILON {
        // Segment is a point.
        return point_vec.hypot();
    }

    // Project the point onto the line, clamped to the segment.
    let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = start + Vec2::new(t * line_vec.x, t * line_vec.y);
    (point - projection).hypot()
}

/// All visible nodes whose bounds intersect `rect` (marquee selection).
pub fn nodes_in_rect(nodes: &[SceneNode], rect: Rect) -> Vec<NodeId> {
    nodes
        .iter()
        .filter(|n| n.visible && !n.bounds.intersect(rect).is_zero_area())
        .map(|n| n.id)
        .collect()
}
