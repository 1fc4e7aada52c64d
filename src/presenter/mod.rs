//! Single-slot toast presenter.
//!
//! The presenter owns the only notification that may be on the surface. Every
//! deferred step of its lifecycle (entrance, auto-dismiss, outside-click
//! observer, removal after the exit animation) is a
//! [`TimerHandle`](crate::schedule::TimerHandle) stored on
//! the notification itself, so whichever trigger wins cancels the others.
//!
//! ```text
//! presenting -> visible -> dismissing -> removed
//!      \___________________^  (timeout | close | outside click)
//! ```

mod notification;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::Result;
use crate::interaction::InteractionBus;
use crate::render::{StylePatch, ToastNode};
use crate::schedule::Scheduler;
use crate::surface::DisplaySurface;
use crate::types::{DismissReason, LifecycleState, NodeId, NotificationId, Severity};

use notification::Notification;
pub use notification::NotificationInfo;

/// Fixed delays of the notification lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Delay before the entrance transition, so the node is laid out first.
    pub entrance_delay: Duration,
    pub auto_dismiss: Duration,
    /// Outside clicks are ignored for this long after presentation.
    pub outside_click_grace: Duration,
    pub exit_animation: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            entrance_delay: Duration::from_millis(16),
            auto_dismiss: Duration::from_millis(5_000),
            outside_click_grace: Duration::from_millis(500),
            exit_animation: Duration::from_millis(300),
        }
    }
}

#[derive(Clone)]
pub struct Presenter {
    shared: Arc<Shared>,
}

struct Shared {
    this: Weak<Shared>,
    surface: Arc<dyn DisplaySurface>,
    bus: InteractionBus,
    scheduler: Scheduler,
    timings: Timings,
    slot: Mutex<Option<Notification>>,
}

impl Presenter {
    /// Creates a presenter scheduling its timers on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside of a tokio runtime.
    pub fn new(
        surface: Arc<dyn DisplaySurface>,
        bus: InteractionBus,
        timings: Timings,
    ) -> Result<Self> {
        Ok(Self::with_scheduler(
            surface,
            bus,
            timings,
            Scheduler::current()?,
        ))
    }

    #[must_use]
    pub fn with_scheduler(
        surface: Arc<dyn DisplaySurface>,
        bus: InteractionBus,
        timings: Timings,
        scheduler: Scheduler,
    ) -> Self {
        Self {
            shared: Arc::new_cyclic(|this| Shared {
                this: this.clone(),
                surface,
                bus,
                scheduler,
                timings,
                slot: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn bus(&self) -> &InteractionBus {
        &self.shared.bus
    }

    #[must_use]
    pub fn timings(&self) -> Timings {
        self.shared.timings
    }

    /// Shows `message`, replacing whatever notification is currently displayed.
    ///
    /// The replaced notification is detached at once, without exit animation.
    pub fn present(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let message = message.into();
        let shared = &self.shared;
        let timings = shared.timings;
        let node = ToastNode::build(severity, &message);
        let (root, close_button) = (node.root, node.close_button);
        let id = NotificationId::new();

        let mut slot = shared.lock_slot();
        if let Some(mut previous) = slot.take() {
            previous.cancel_all();
            shared.surface.detach(previous.root);
            debug!(notification_id = %previous.id, "superseded notification removed");
        }

        shared.surface.insert(node);

        let mut notification = Notification::new(id, message, severity, root, close_button);

        let weak = shared.this.clone();
        notification.entrance = Some(shared.scheduler.after(
            timings.entrance_delay,
            "entrance",
            async move {
                if let Some(shared) = weak.upgrade() {
                    shared.enter(id);
                }
            },
        ));

        let weak = shared.this.clone();
        notification.auto_dismiss = Some(shared.scheduler.after(
            timings.auto_dismiss,
            "auto-dismiss",
            async move {
                if let Some(shared) = weak.upgrade() {
                    shared.dismiss(id, DismissReason::Timeout);
                }
            },
        ));

        notification.outside_click = Some(shared.scheduler.spawn(
            "outside-click",
            observe_outside(
                shared.this.clone(),
                shared.bus.clone(),
                id,
                [root, close_button],
                timings.outside_click_grace,
            ),
        ));

        info!(
            notification_id = %id,
            severity = %severity,
            node = %root,
            message_len = notification.message.len(),
            "notification presented"
        );
        *slot = Some(notification);
        id
    }

    /// Like [`present`](Self::present), degrading a missing or unknown severity to `info`.
    pub fn present_str(&self, message: impl Into<String>, severity: Option<&str>) -> NotificationId {
        let severity = severity.map(Severity::parse_lossy).unwrap_or_default();
        self.present(message, severity)
    }

    /// The close control: cancels the auto-dismiss timer, then dismisses.
    pub fn close(&self, id: NotificationId) -> bool {
        let shared = &self.shared;
        let mut slot = shared.lock_slot();
        let Some(notification) = current_mut(&mut slot, id) else {
            return false;
        };
        notification.auto_dismiss.take();
        shared.begin_dismissal(notification, DismissReason::CloseAction)
    }

    /// Starts the exit sequence of `id`. Returns `false` if it is no longer
    /// current or already leaving.
    pub fn dismiss(&self, id: NotificationId, reason: DismissReason) -> bool {
        self.shared.dismiss(id, reason)
    }

    /// Pointer entering or leaving the close control.
    pub fn hover_close(&self, id: NotificationId, hovered: bool) -> bool {
        let shared = &self.shared;
        let slot = shared.lock_slot();
        slot.as_ref()
            .filter(|n| n.id == id)
            .is_some_and(|n| {
                shared
                    .surface
                    .apply(n.close_button, StylePatch::close_hover(hovered))
            })
    }

    /// Cancels every pending timer and observer and detaches the current node.
    pub fn shutdown(&self) {
        let shared = &self.shared;
        let mut slot = shared.lock_slot();
        if let Some(mut notification) = slot.take() {
            notification.cancel_all();
            notification.state = LifecycleState::Removed;
            shared.surface.detach(notification.root);
            info!(notification_id = %notification.id, "presenter shut down");
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<NotificationInfo> {
        self.shared.lock_slot().as_ref().map(Notification::info)
    }

    /// Lifecycle state of `id`; anything no longer in the slot is `Removed`.
    #[must_use]
    pub fn state(&self, id: NotificationId) -> LifecycleState {
        self.shared
            .lock_slot()
            .as_ref()
            .filter(|n| n.id == id)
            .map_or(LifecycleState::Removed, |n| n.state)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.lock_slot().is_none()
    }

    /// Labels of the timers and observers still armed for the current notification.
    #[must_use]
    pub fn pending_timers(&self) -> Vec<&'static str> {
        self.shared
            .lock_slot()
            .as_ref()
            .map(Notification::pending_timers)
            .unwrap_or_default()
    }
}

impl Shared {
    fn lock_slot(&self) -> MutexGuard<'_, Option<Notification>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self, id: NotificationId) {
        let mut slot = self.lock_slot();
        let Some(notification) = current_mut(&mut slot, id) else {
            return;
        };
        if notification.state != LifecycleState::Presenting {
            return;
        }
        self.surface.apply(notification.root, StylePatch::slide_in());
        notification.state = LifecycleState::Visible;
        debug!(notification_id = %id, "notification visible");
    }

    fn dismiss(&self, id: NotificationId, reason: DismissReason) -> bool {
        let mut slot = self.lock_slot();
        match current_mut(&mut slot, id) {
            Some(notification) => self.begin_dismissal(notification, reason),
            None => {
                debug!(notification_id = %id, %reason, "dismissal ignored for stale notification");
                false
            }
        }
    }

    fn begin_dismissal(&self, notification: &mut Notification, reason: DismissReason) -> bool {
        let id = notification.id;
        if !notification.state.is_dismissable() {
            debug!(notification_id = %id, %reason, state = %notification.state, "already leaving");
            return false;
        }

        notification.cancel_triggers();
        notification.state = LifecycleState::Dismissing;
        self.surface.apply(notification.root, StylePatch::slide_out());
        self.surface.apply(notification.root, StylePatch::fade_out());

        let weak = self.this.clone();
        notification.removal = Some(self.scheduler.after(
            self.timings.exit_animation,
            "removal",
            async move {
                if let Some(shared) = weak.upgrade() {
                    shared.finish_removal(id);
                }
            },
        ));

        info!(notification_id = %id, %reason, "notification dismissing");
        true
    }

    fn finish_removal(&self, id: NotificationId) {
        let mut slot = self.lock_slot();
        let leaving = slot
            .as_ref()
            .is_some_and(|n| n.id == id && n.state == LifecycleState::Dismissing);
        if !leaving {
            return;
        }
        if let Some(mut notification) = slot.take() {
            notification.cancel_all();
            notification.state = LifecycleState::Removed;
            let detached = self.surface.detach(notification.root);
            info!(notification_id = %id, detached, "notification removed");
        }
    }
}

fn current_mut(slot: &mut Option<Notification>, id: NotificationId) -> Option<&mut Notification> {
    slot.as_mut().filter(|n| n.id == id)
}

/// Waits out the grace period, then dismisses `id` on the first interaction
/// landing outside its nodes. Returning drops the receiver, which deregisters
/// the listener.
async fn observe_outside(
    shared: Weak<Shared>,
    bus: InteractionBus,
    id: NotificationId,
    own_nodes: [NodeId; 2],
    grace: Duration,
) {
    sleep(grace).await;
    let mut rx = bus.subscribe();
    debug!(notification_id = %id, "outside-click observer armed");

    loop {
        match rx.recv().await {
            Ok(interaction) => {
                if !interaction.lands_outside(&own_nodes) {
                    continue;
                }
                if let Some(shared) = shared.upgrade() {
                    shared.dismiss(id, DismissReason::OutsideInteraction);
                }
                break;
            }
            Err(RecvError::Lagged(skipped)) => {
                debug!(notification_id = %id, skipped, "outside-click observer lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
