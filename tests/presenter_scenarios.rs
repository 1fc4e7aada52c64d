#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use toaster::contact::{self, ContactForm, SubmitButton, thank_you};
use toaster::interaction::{Interaction, InteractionBus};
use toaster::presenter::{Presenter, Timings};
use toaster::surface::{DisplaySurface, MemorySurface, SurfaceOp};
use toaster::types::{LifecycleState, Severity};

fn presenter() -> (Presenter, Arc<MemorySurface>) {
    let surface = Arc::new(MemorySurface::new());
    let presenter = Presenter::new(
        Arc::clone(&surface) as Arc<dyn DisplaySurface>,
        InteractionBus::new(16),
        Timings::default(),
    )
    .expect("presenter inside runtime");
    (presenter, surface)
}

async fn step(ms: u64) {
    sleep(Duration::from_millis(ms)).await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn saved_toast_lives_its_full_lifecycle() {
    let (presenter, surface) = presenter();
    let id = presenter.present_str("Saved.", Some("success"));
    let root = presenter.current().unwrap().root;

    step(20).await;
    assert_eq!(presenter.state(id), LifecycleState::Visible);
    let node = surface.node(root).unwrap();
    assert_eq!(node.severity, Severity::Success);
    assert_eq!(node.style.get("transform"), Some("translateX(0)"));

    step(4990).await;
    assert_eq!(presenter.state(id), LifecycleState::Dismissing);
    assert!(surface.node(root).is_some());

    step(295).await;
    assert!(surface.is_empty());
    assert_eq!(presenter.state(id), LifecycleState::Removed);
    assert_eq!(surface.log().last(), Some(&SurfaceOp::Detached(root)));
    assert!(presenter.pending_timers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn error_toast_closed_right_away() {
    let (presenter, surface) = presenter();
    let id = presenter.present_str("Bad email.", Some("error"));
    assert_eq!(presenter.current().unwrap().severity, Severity::Error);

    assert!(presenter.close(id));
    assert_eq!(presenter.state(id), LifecycleState::Dismissing);

    step(310).await;
    assert!(surface.is_empty());

    // nothing left to fire once the auto-dismiss deadline passes
    step(5000).await;
    let detaches = surface
        .log()
        .iter()
        .filter(|op| matches!(op, SurfaceOp::Detached(_)))
        .count();
    assert_eq!(detaches, 1);
}

#[tokio::test(start_paused = true)]
async fn only_the_latest_toast_reacts_to_outside_clicks() {
    let (presenter, surface) = presenter();
    let first = presenter.present("first", Severity::Info);
    step(600).await;
    let second = presenter.present("second", Severity::Info);

    assert_eq!(presenter.state(first), LifecycleState::Removed);
    assert_eq!(surface.len(), 1);

    // still inside the second toast's grace period
    step(100).await;
    presenter.bus().publish(Interaction::background());
    step(1).await;
    assert_eq!(presenter.state(second), LifecycleState::Visible);

    step(500).await;
    presenter.bus().publish(Interaction::background());
    step(1).await;
    assert_eq!(presenter.state(second), LifecycleState::Dismissing);

    step(310).await;
    assert!(surface.is_empty());
    assert_eq!(presenter.bus().listener_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn contact_submission_acknowledges_and_clears_the_form() {
    let (presenter, surface) = presenter();
    let button = SubmitButton::default();
    let mut form = ContactForm::new("  Ada ", "ada@example.org", "Hello there");

    let submission = contact::submit(&mut form, &button, &presenter, Duration::from_millis(1200))
        .await
        .unwrap();

    assert_eq!(submission.name, "Ada");
    assert_eq!(form, ContactForm::default());
    let current = presenter.current().unwrap();
    assert_eq!(current.severity, Severity::Success);
    assert_eq!(current.message, thank_you("Ada"));
    assert_eq!(surface.len(), 1);
    assert!(!button.is_disabled());
}

#[tokio::test(start_paused = true)]
async fn rejected_submission_keeps_the_form() {
    let (presenter, _surface) = presenter();
    let button = SubmitButton::default();
    let mut form = ContactForm::new("Ada", "", "Hello there");

    let err = contact::submit(&mut form, &button, &presenter, Duration::from_millis(1200))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), presenter.current().unwrap().message);
    assert_eq!(form.name, "Ada");
}
