use crate::schedule::TimerHandle;
use crate::types::{LifecycleState, NodeId, NotificationId, Severity};

/// The live notification held in the presenter slot, with every handle armed for it.
#[derive(Debug)]
pub(super) struct Notification {
    pub(super) id: NotificationId,
    pub(super) message: String,
    pub(super) severity: Severity,
    pub(super) state: LifecycleState,
    pub(super) root: NodeId,
    pub(super) close_button: NodeId,
    pub(super) entrance: Option<TimerHandle>,
    pub(super) auto_dismiss: Option<TimerHandle>,
    pub(super) outside_click: Option<TimerHandle>,
    pub(super) removal: Option<TimerHandle>,
}

impl Notification {
    pub(super) const fn new(
        id: NotificationId,
        message: String,
        severity: Severity,
        root: NodeId,
        close_button: NodeId,
    ) -> Self {
        Self {
            id,
            message,
            severity,
            state: LifecycleState::Presenting,
            root,
            close_button,
            entrance: None,
            auto_dismiss: None,
            outside_click: None,
            removal: None,
        }
    }

    /// Drops every dismissal trigger and the pending entrance.
    pub(super) fn cancel_triggers(&mut self) {
        self.entrance.take();
        self.auto_dismiss.take();
        self.outside_click.take();
    }

    pub(super) fn cancel_all(&mut self) {
        self.cancel_triggers();
        self.removal.take();
    }

    pub(super) fn pending_timers(&self) -> Vec<&'static str> {
        [
            &self.entrance,
            &self.auto_dismiss,
            &self.outside_click,
            &self.removal,
        ]
        .into_iter()
        .flatten()
        .filter(|handle| !handle.is_finished())
        .map(TimerHandle::label)
        .collect()
    }

    pub(super) fn info(&self) -> NotificationInfo {
        NotificationInfo {
            id: self.id,
            message: self.message.clone(),
            severity: self.severity,
            state: self.state,
            root: self.root,
            close_button: self.close_button,
        }
    }
}

/// Read-only view of the current notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationInfo {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub state: LifecycleState,
    pub root: NodeId,
    pub close_button: NodeId,
}
