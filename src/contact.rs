//! Contact form validation and simulated submission.

use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use regex::Regex;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::presenter::Presenter;
use crate::types::Severity;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

/// First validation failure, in field order. `Display` is the message shown to the visitor.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter your name.")]
    MissingName,
    #[error("Please enter your email address.")]
    MissingEmail,
    #[error("Please enter a message.")]
    MissingMessage,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    /// The submit button is disabled while a message is in flight.
    #[error("Your message is already being sent.")]
    Busy,
}

impl FormError {
    /// Field that should receive focus.
    #[must_use]
    pub const fn field(self) -> Option<Field> {
        match self {
            Self::MissingName => Some(Field::Name),
            Self::MissingEmail | Self::InvalidEmail => Some(Field::Email),
            Self::MissingMessage => Some(Field::Message),
            Self::Busy => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A trimmed, validated form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// # Errors
    ///
    /// Returns the first failing check: name, email, message presence, then email shape.
    pub fn validate(&self) -> Result<Submission, FormError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        if email.is_empty() {
            return Err(FormError::MissingEmail);
        }
        if message.is_empty() {
            return Err(FormError::MissingMessage);
        }
        if !is_valid_email(email) {
            return Err(FormError::InvalidEmail);
        }

        Ok(Submission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

#[must_use]
pub fn thank_you(name: &str) -> String {
    format!(
        "Thank you, {name}! Your message has been sent successfully. I'll get back to you soon."
    )
}

const DEFAULT_LABEL: &str = "Send Message";
const SENDING_LABEL: &str = "Sending...";

/// Submit control of the form.
///
/// While a submission is in flight the button reads "Sending...", is disabled
/// and dimmed to 0.7 opacity.
#[derive(Debug)]
pub struct SubmitButton {
    label: String,
    sending: AtomicBool,
}

impl SubmitButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sending: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        if self.is_sending() {
            SENDING_LABEL
        } else {
            &self.label
        }
    }

    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.is_sending()
    }

    #[must_use]
    pub fn opacity(&self) -> &'static str {
        if self.is_sending() { "0.7" } else { "1" }
    }

    /// Enters the loading state, or `None` if a submission already holds it.
    pub fn try_begin(&self) -> Option<SendingGuard<'_>> {
        self.sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SendingGuard { button: self })
    }
}

impl Default for SubmitButton {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}

/// Restores the button when dropped, including when a submission is cancelled.
#[must_use]
#[derive(Debug)]
pub struct SendingGuard<'a> {
    button: &'a SubmitButton,
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.button.sending.store(false, Ordering::Release);
    }
}

/// Validates `form` and pretends to send it.
///
/// Failures are shown as an error notification. A valid form is "sent" after
/// `delay`, with `button` in its loading state, then acknowledged with a
/// success notification and cleared.
///
/// # Errors
///
/// Returns the validation failure that was shown, or [`FormError::Busy`]
/// without any notification while another submission holds `button`.
pub async fn submit(
    form: &mut ContactForm,
    button: &SubmitButton,
    presenter: &Presenter,
    delay: Duration,
) -> Result<Submission, FormError> {
    let Some(_sending) = button.try_begin() else {
        debug!("submit ignored, button disabled");
        return Err(FormError::Busy);
    };

    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(err) => {
            warn!(field = ?err.field(), "contact form rejected");
            presenter.present(err.to_string(), Severity::Error);
            return Err(err);
        }
    };

    info!(
        preview = %preview(&submission.message),
        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        "contact form sending"
    );
    sleep(delay).await;

    presenter.present(thank_you(&submission.name), Severity::Success);
    form.reset();
    info!("contact form sent");
    Ok(submission)
}

fn preview(message: &str) -> String {
    let mut out: String = message.chars().take(50).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::{ContactForm, Field, FormError, SubmitButton, is_valid_email, preview, submit};
    use crate::interaction::InteractionBus;
    use crate::presenter::{Presenter, Timings};
    use crate::surface::{DisplaySurface, MemorySurface};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    fn presenter() -> Presenter {
        Presenter::new(
            Arc::new(MemorySurface::new()) as Arc<dyn DisplaySurface>,
            InteractionBus::new(4),
            Timings::default(),
        )
        .unwrap()
    }

    #[test]
    fn checks_run_in_field_order() {
        assert_eq!(
            ContactForm::new("", "", "").validate(),
            Err(FormError::MissingName)
        );
        assert_eq!(
            ContactForm::new("Ada", "   ", "").validate(),
            Err(FormError::MissingEmail)
        );
        assert_eq!(
            ContactForm::new("Ada", "nope", "").validate(),
            Err(FormError::MissingMessage)
        );
        assert_eq!(
            ContactForm::new("Ada", "nope", "hi").validate(),
            Err(FormError::InvalidEmail)
        );
    }

    #[test]
    fn valid_form_is_trimmed() {
        let submission = ContactForm::new("  Ada ", " ada@example.org ", " hello\n")
            .validate()
            .unwrap();
        assert_eq!(submission.name, "Ada");
        assert_eq!(submission.email, "ada@example.org");
        assert_eq!(submission.message, "hello");
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("first.last+tag@sub.example.io"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@example.c"));
        assert!(!is_valid_email("ada example@x.org"));
    }

    #[test]
    fn errors_point_at_fields() {
        assert_eq!(FormError::InvalidEmail.field(), Some(Field::Email));
        assert_eq!(FormError::MissingMessage.field(), Some(Field::Message));
        assert_eq!(FormError::Busy.field(), None);
    }

    #[test]
    fn button_loading_state_follows_guard() {
        let button = SubmitButton::default();
        assert_eq!(button.label(), "Send Message");

        let guard = button.try_begin().unwrap();
        assert_eq!(button.label(), "Sending...");
        assert!(button.is_disabled());
        assert_eq!(button.opacity(), "0.7");
        assert!(button.try_begin().is_none());

        drop(guard);
        assert_eq!(button.label(), "Send Message");
        assert!(!button.is_disabled());
        assert_eq!(button.opacity(), "1");
    }

    #[tokio::test(start_paused = true)]
    async fn button_is_busy_while_message_is_sent() {
        let presenter = presenter();
        let button = SubmitButton::default();
        let mut form = ContactForm::new("Ada", "ada@example.org", "Hello there");

        let during = async {
            sleep(Duration::from_millis(600)).await;
            (button.label().to_owned(), button.is_disabled())
        };
        let (sent, during) = tokio::join!(
            submit(&mut form, &button, &presenter, Duration::from_millis(1200)),
            during
        );

        assert!(sent.is_ok());
        assert_eq!(during, ("Sending...".to_owned(), true));
        assert_eq!(button.label(), "Send Message");
        assert!(!button.is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn second_submit_is_refused_silently() {
        let presenter = presenter();
        let button = SubmitButton::default();
        let _in_flight = button.try_begin().unwrap();
        let mut form = ContactForm::new("Ada", "ada@example.org", "Hello there");

        let err = submit(&mut form, &button, &presenter, Duration::from_millis(1200))
            .await
            .unwrap_err();

        assert_eq!(err, FormError::Busy);
        assert!(presenter.is_empty());
        assert_eq!(form.name, "Ada");
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_form_releases_the_button() {
        let presenter = presenter();
        let button = SubmitButton::default();
        let mut form = ContactForm::new("Ada", "nope", "Hello there");

        let err = submit(&mut form, &button, &presenter, Duration::from_millis(1200))
            .await
            .unwrap_err();

        assert_eq!(err, FormError::InvalidEmail);
        assert!(!button.is_sending());
    }

    #[test]
    fn preview_truncates_long_messages() {
        let long = "x".repeat(80);
        assert_eq!(preview(&long).len(), 53);
    }
}
