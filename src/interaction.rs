use tokio::sync::broadcast;
use tracing::trace;

use crate::types::NodeId;

/// A click-equivalent interaction anywhere on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interaction {
    /// Node that received the interaction, `None` for the page background.
    pub target: Option<NodeId>,
}

impl Interaction {
    #[must_use]
    pub const fn on(target: NodeId) -> Self {
        Self {
            target: Some(target),
        }
    }

    #[must_use]
    pub const fn background() -> Self {
        Self { target: None }
    }

    /// Whether this interaction missed every node in `own`. Background clicks always miss.
    #[must_use]
    pub fn lands_outside(&self, own: &[NodeId]) -> bool {
        self.target.is_none_or(|target| !own.contains(&target))
    }
}

/// Page-wide interaction stream. Every subscriber is a registered listener
/// until its receiver is dropped.
#[derive(Clone, Debug)]
pub struct InteractionBus {
    tx: broadcast::Sender<Interaction>,
}

impl InteractionBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Delivers an interaction to every registered listener and returns how many saw it.
    pub fn publish(&self, interaction: Interaction) -> usize {
        let reached = self.tx.send(interaction).unwrap_or(0);
        trace!(target_node = ?interaction.target, reached, "interaction published");
        reached
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Interaction> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for InteractionBus {
    fn default() -> Self {
        Self::new(64)
    }
}
