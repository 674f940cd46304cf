//! Mindgraph Layout Registry
//!
//! Parameter schema, per-algorithm configuration registry, and the
//! asynchronous solver contract for the mindgraph layout collaborator.
//! Position solving itself lives behind the [`LayoutSolver`] trait.

pub mod error;
pub mod params;
pub mod registry;
pub mod solver;

pub use error::{LayoutError, LayoutResult};
pub use params::{LayoutConfiguration, LayoutParameter, ParamSpec, ParamValue};
pub use registry::{ChangeListener, LayoutRegistry, FORCE, RADIAL, TREE};
pub use solver::{BoxFuture, LayoutSolver, PositionAssignment};
