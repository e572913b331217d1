//! Bookkeeping for deferred scene mutation.
//!
//! While a traversal pass (update, render or hit test) is walking the tree,
//! structural changes are not applied to the hierarchy. Instead they are
//! queued here and applied, in request order, when the outermost pass ends.
//! Nodes scheduled for removal are recorded in a detaching set so the
//! running traversal can skip them (and their subtree) right away.
//!
//! Outside a pass the scene API applies changes immediately and this queue
//! stays empty.

use bevy_ecs::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// Kind of traversal currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Update,
    Render,
    HitTest,
}

/// A structural change waiting for the end of the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    Attach { parent: Entity, child: Entity },
    Detach { child: Entity },
    Destroy { entity: Entity },
}

#[derive(Resource, Debug, Default)]
pub struct SceneGraph {
    passes: Vec<Pass>,
    pending: Vec<PendingOp>,
    detaching: FxHashSet<Entity>,
    /// Child → parent of queued attachments.
    attaching: FxHashMap<Entity, Entity>,
}

impl SceneGraph {
    pub fn begin_pass(&mut self, pass: Pass) {
        self.passes.push(pass);
    }

    /// Returns `true` when the outermost pass ended and the queue should be flushed.
    pub fn end_pass(&mut self) -> bool {
        self.passes.pop();
        self.passes.is_empty()
    }

    pub fn in_pass(&self) -> bool {
        !self.passes.is_empty()
    }

    pub fn current_pass(&self) -> Option<Pass> {
        self.passes.last().copied()
    }

    pub fn is_detaching(&self, entity: Entity) -> bool {
        self.detaching.contains(&entity)
    }

    /// Parent a queued attachment will give `child`.
    pub fn pending_parent(&self, child: Entity) -> Option<Entity> {
        self.attaching.get(&child).copied()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &[PendingOp] {
        &self.pending
    }

    pub(crate) fn queue(&mut self, op: PendingOp) {
        match op {
            PendingOp::Attach { parent, child } => {
                self.attaching.insert(child, parent);
            }
            PendingOp::Detach { child } => {
                self.attaching.remove(&child);
                self.detaching.insert(child);
            }
            PendingOp::Destroy { entity } => {
                self.attaching.remove(&entity);
                self.detaching.insert(entity);
            }
        }
        self.pending.push(op);
    }

    /// Drain the queue and forget the per-pass marks.
    pub(crate) fn take_pending(&mut self) -> Vec<PendingOp> {
        self.detaching.clear();
        self.attaching.clear();
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_passes_flush_at_outermost_end() {
        let mut graph = SceneGraph::default();
        graph.begin_pass(Pass::Render);
        graph.begin_pass(Pass::HitTest);
        assert_eq!(graph.current_pass(), Some(Pass::HitTest));
        assert!(!graph.end_pass());
        assert!(graph.end_pass());
        assert!(!graph.in_pass());
    }

    #[test]
    fn detach_cancels_pending_attach_mark() {
        let mut world = World::new();
        let parent = world.spawn_empty().id();
        let child = world.spawn_empty().id();
        let mut graph = SceneGraph::default();
        graph.queue(PendingOp::Attach { parent, child });
        assert_eq!(graph.pending_parent(child), Some(parent));
        graph.queue(PendingOp::Detach { child });
        assert_eq!(graph.pending_parent(child), None);
        assert!(graph.is_detaching(child));
        assert_eq!(graph.take_pending().len(), 2);
        assert!(!graph.is_detaching(child));
    }
}
