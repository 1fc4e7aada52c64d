use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::render::{StylePatch, ToastNode};
use crate::types::NodeId;

/// Where toast nodes are shown.
///
/// Implementations must treat detaching an absent node as a no-op.
pub trait DisplaySurface: Send + Sync + 'static {
    fn insert(&self, node: ToastNode);

    /// Applies a style patch to `node` (a toast root or one of its children).
    /// Returns `false` if no attached toast owns `node`.
    fn apply(&self, node: NodeId, patch: StylePatch) -> bool;

    /// Detaches the toast whose root is `root`. Returns `false` if it was not attached.
    fn detach(&self, root: NodeId) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceOp {
    Inserted(NodeId),
    Styled {
        node: NodeId,
        property: &'static str,
        value: String,
    },
    Detached(NodeId),
}

/// In-memory surface keeping attached toasts and a log of every mutation.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    nodes: Vec<ToastNode>,
    log: Vec<SurfaceOp>,
}

impl MemorySurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().nodes.is_empty()
    }

    /// Copies of the attached toasts, in insertion order.
    #[must_use]
    pub fn nodes(&self) -> Vec<ToastNode> {
        self.lock().nodes.clone()
    }

    #[must_use]
    pub fn node(&self, root: NodeId) -> Option<ToastNode> {
        self.lock().nodes.iter().find(|n| n.root == root).cloned()
    }

    #[must_use]
    pub fn log(&self) -> Vec<SurfaceOp> {
        self.lock().log.clone()
    }

    /// Renders every attached toast as markup, one per line.
    #[must_use]
    pub fn render(&self) -> String {
        self.lock()
            .nodes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DisplaySurface for MemorySurface {
    fn insert(&self, node: ToastNode) {
        let mut state = self.lock();
        debug!(node = %node.root, severity = %node.severity, "toast inserted");
        state.log.push(SurfaceOp::Inserted(node.root));
        state.nodes.push(node);
    }

    fn apply(&self, node: NodeId, patch: StylePatch) -> bool {
        let mut state = self.lock();
        let applied = state
            .nodes
            .iter_mut()
            .any(|toast| toast.apply(node, &patch));
        if applied {
            state.log.push(SurfaceOp::Styled {
                node,
                property: patch.property,
                value: patch.value,
            });
        }
        applied
    }

    fn detach(&self, root: NodeId) -> bool {
        let mut state = self.lock();
        let Some(pos) = state.nodes.iter().position(|n| n.root == root) else {
            return false;
        };
        state.nodes.remove(pos);
        state.log.push(SurfaceOp::Detached(root));
        debug!(node = %root, "toast detached");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplaySurface, MemorySurface, SurfaceOp};
    use crate::render::{StylePatch, ToastNode};
    use crate::types::Severity;

    #[test]
    fn detach_twice_is_a_no_op() {
        let surface = MemorySurface::new();
        let node = ToastNode::build(Severity::Info, "hello");
        let root = node.root;
        surface.insert(node);

        assert!(surface.detach(root));
        assert!(!surface.detach(root));
        assert!(surface.is_empty());
        assert_eq!(
            surface.log(),
            vec![SurfaceOp::Inserted(root), SurfaceOp::Detached(root)]
        );
    }

    #[test]
    fn apply_to_detached_node_is_not_logged() {
        let surface = MemorySurface::new();
        let node = ToastNode::build(Severity::Info, "hello");
        let root = node.root;
        surface.insert(node);
        surface.detach(root);

        assert!(!surface.apply(root, StylePatch::fade_out()));
        assert_eq!(surface.log().len(), 2);
    }

    #[test]
    fn apply_updates_attached_node() {
        let surface = MemorySurface::new();
        let node = ToastNode::build(Severity::Error, "oops");
        let root = node.root;
        surface.insert(node);

        assert!(surface.apply(root, StylePatch::slide_in()));
        let stored = surface.node(root).map(|n| n.style.get("transform").map(str::to_owned));
        assert_eq!(stored, Some(Some("translateX(0)".to_string())));
        assert!(surface.render().contains("custom-notification--error"));
    }
}
