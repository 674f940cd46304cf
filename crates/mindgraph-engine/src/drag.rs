//! Drag sessions: live provisional node moves with a final commit.
//!
//! While a session is open it is the sole owner of position updates for
//! its node. Updates flow to the document as provisional
//! `set_node_position` calls so rendering stays in sync; only
//! [`DragManager::end`] turns the move into a committed, undoable
//! change.

use crate::error::{EngineError, EngineResult};
use crate::gesture::PointerId;
use crate::scene::{NodeId, SceneDelegate};
use kurbo::{Point, Vec2};
use std::collections::HashMap;

/// An open drag for one pointer.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    /// The node being dragged.
    pub node: NodeId,
    /// Node position when the session opened; restored on cancel.
    pub node_start: Point,
    /// Pointer position (canvas space) when the session opened.
    pub origin: Point,
    /// Last pointer position reported to the session.
    pub last_position: Point,
    /// Canvas-space movement needed before the drag counts as real.
    pub threshold: f64,
    /// Whether movement ever exceeded the threshold.
    pub crossed_threshold: bool,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// The node moved; the position was committed as an undoable change.
    Committed {
        node: NodeId,
        position: Point,
        velocity: Vec2,
    },
    /// The pointer never crossed the drag threshold: the node is
    /// untouched and the release should be treated as a tap.
    Tap { node: NodeId },
}

/// Owns at most one [`DragSession`] per pointer.
#[derive(Debug, Default)]
pub struct DragManager {
    sessions: HashMap<PointerId, DragSession>,
}

impl DragManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self, pointer: PointerId) -> bool {
        self.sessions.contains_key(&pointer)
    }

    pub fn session(&self, pointer: PointerId) -> Option<&DragSession> {
        self.sessions.get(&pointer)
    }

    pub fn has_open_sessions(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Open a session. Does not touch the node yet.
    ///
    /// A second begin for the same pointer without an intervening end or
    /// cancel is a programming error and leaves the open session intact.
    pub fn begin(
        &mut self,
        pointer: PointerId,
        node: NodeId,
        node_start: Point,
        origin: Point,
        threshold: f64,
    ) -> EngineResult<()> {
        if self.sessions.contains_key(&pointer) {
            return Err(EngineError::ReentrantDrag { pointer });
        }
        self.sessions.insert(
            pointer,
            DragSession {
                node,
                node_start,
                origin,
                last_position: origin,
                threshold,
                crossed_threshold: false,
            },
        );
        Ok(())
    }

    /// Report a new pointer position. Issues a provisional position
    /// update for the dragged node; no-op when the pointer has no open
    /// session.
    pub fn update<D: SceneDelegate + ?Sized>(
        &mut self,
        pointer: PointerId,
        position: Point,
        delegate: &mut D,
    ) {
        let Some(session) = self.sessions.get_mut(&pointer) else {
            return;
        };
        session.last_position = position;
        if !session.crossed_threshold
            && (position - session.origin).hypot() >= session.threshold
        {
            session.crossed_threshold = true;
        }
        if session.crossed_threshold {
            let new_position = session.node_start + (position - session.origin);
            delegate.set_node_position(session.node, new_position);
        }
    }

    /// Close the session, committing the final position if the drag ever
    /// crossed its threshold. A below-threshold release leaves the node
    /// untouched and reports [`DragOutcome::Tap`].
    pub fn end<D: SceneDelegate + ?Sized>(
        &mut self,
        pointer: PointerId,
        position: Point,
        velocity: Vec2,
        delegate: &mut D,
    ) -> Option<DragOutcome> {
        let session = self.sessions.remove(&pointer)?;

        if !session.crossed_threshold {
            return Some(DragOutcome::Tap { node: session.node });
        }

        let final_position = session.node_start + (position - session.origin);
        delegate.commit_node_position(session.node, final_position);
        Some(DragOutcome::Committed {
            node: session.node,
            position: final_position,
            velocity,
        })
    }

    /// Discard the session without committing, restoring the node's
    /// pre-drag position. Returns false when no session was open.
    pub fn cancel<D: SceneDelegate + ?Sized>(
        &mut self,
        pointer: PointerId,
        delegate: &mut D,
    ) -> bool {
        let Some(session) = self.sessions.remove(&pointer) else {
            return false;
        };
        if session.crossed_threshold {
            delegate.set_node_position(session.node, session.node_start);
        }
        log::debug!("drag for {:?} cancelled", session.node);
        true
    }

    /// Cancel every open session (window or focus loss).
    pub fn cancel_all<D: SceneDelegate + ?Sized>(&mut self, delegate: &mut D) {
        let pointers: Vec<PointerId> = self.sessions.keys().copied().collect();
        for pointer in pointers {
            self.cancel(pointer, delegate);
        }
    }
}
