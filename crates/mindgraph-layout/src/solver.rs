//! The asynchronous layout-computation collaborator.
//!
//! Solving is the engine's only suspension point: the registry packages
//! the current configuration, hands it to the solver, and awaits the
//! position assignment. Implementations clone whatever they need out of
//! the borrowed arguments; the returned future only borrows the solver.

use crate::error::LayoutResult;
use crate::params::LayoutConfiguration;
use crate::registry::LayoutRegistry;
use kurbo::Point;
use mindgraph_engine::{NodeId, SceneSnapshot};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// Node id -> new canvas position, as produced by a solver.
pub type PositionAssignment = HashMap<NodeId, Point>;

/// Boxed future for solver results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A layout algorithm backend (worker thread, web worker, remote
/// service). Position solving itself is outside the engine; only this
/// contract is.
pub trait LayoutSolver {
    /// Compute positions for the snapshot under the given configuration.
    fn compute_layout(
        &self,
        config: &LayoutConfiguration,
        scene: &SceneSnapshot,
    ) -> BoxFuture<'_, LayoutResult<PositionAssignment>>;
}

impl LayoutRegistry {
    /// Package the current configuration for `layout_id` and run the
    /// solver with it.
    ///
    /// On failure the error is reported upward and nothing else happens:
    /// no positions change, the viewport is untouched. On success the
    /// caller typically feeds the assignment to
    /// `CanvasEngine::apply_layout_result`.
    pub async fn request_apply(
        &mut self,
        layout_id: &str,
        solver: &dyn LayoutSolver,
        scene: &SceneSnapshot,
    ) -> LayoutResult<PositionAssignment> {
        let config = self.get_configuration(layout_id)?.clone();
        log::debug!("requesting {layout_id} layout for {} nodes", scene.nodes.len());
        solver.compute_layout(&config, scene).await
    }
}
