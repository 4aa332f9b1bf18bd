//! Sign-in and identifier-recovery flows over the navigator.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::info;

use crate::ident::{
    alphabetic_position_sum, derive_identifier, is_identifier_shape, proper_case, MIN_POSITION_SUM,
};
use crate::nav::{Navigator, Target};
use crate::page::PageId;

/// Key unlocking the identifier-recovery form.
pub const ADMIN_RECOVERY_KEY: &str = "@@id";

// ---------------------------------------------------------------------------
// FormFeedback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Outcome of a form submission, worded for direct display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFeedback {
    pub kind: FeedbackKind,
    pub text: String,
}

impl FormFeedback {
    fn success(text: String) -> Self {
        Self {
            kind: FeedbackKind::Success,
            text,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == FeedbackKind::Error
    }
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

/// Validate a sign-in attempt and, on success, persist the session and
/// schedule the redirect home.
///
/// Checks run in order: enough letters in the name, identifier shape,
/// exact match against the derived identifier. The feedback returns
/// immediately; the jump home happens [`NavigatorConfig::redirect_delay`]
/// later on a spawned task.
///
/// [`NavigatorConfig::redirect_delay`]: crate::nav::NavigatorConfig::redirect_delay
pub async fn sign_in(nav: &Arc<Navigator>, name: &str, raw_id: &str) -> FormFeedback {
    if alphabetic_position_sum(name) < MIN_POSITION_SUM {
        return FormFeedback::error("Invalid Username or ID.");
    }
    if !is_identifier_shape(raw_id) {
        return FormFeedback::error("ID must be exactly 5 digits and contain only numbers.");
    }

    let expected = derive_identifier(name);
    if raw_id != expected {
        return FormFeedback::error(format!(
            "Login failed. The entered ID does not match the ID calculated for this name. \
             (Calculated ID for your name: {expected})"
        ));
    }

    let session = match nav.session().login(name, raw_id) {
        Ok(session) => session,
        Err(err) => return FormFeedback::error(format!("Could not save your session: {err}")),
    };
    info!(username = %session.username, "signed in");

    let redirect = Arc::clone(nav);
    let delay = redirect.config().redirect_delay;
    tokio::spawn(async move {
        sleep(delay).await;
        redirect.navigate_to(Target::Page(PageId::Home)).await;
    });

    FormFeedback::success(format!(
        "Login successful! Welcome, {}. Your ID {} has been verified. Redirecting...",
        session.username, session.identifier
    ))
}

/// Recover the identifier for a name, gated behind the admin key.
///
/// This deliberately discloses the derived identifier; anyone holding the
/// admin key can look up any member.
#[must_use]
pub fn recover_id(admin_key: &str, name: &str) -> FormFeedback {
    if admin_key != ADMIN_RECOVERY_KEY {
        return FormFeedback::error("Incorrect Admin key provided.");
    }
    if alphabetic_position_sum(name) < MIN_POSITION_SUM {
        return FormFeedback::error("Please enter a valid name (must contain enough letters).");
    }

    let proper = proper_case(name);
    let identifier = derive_identifier(name);
    FormFeedback::success(format!(
        "The ID calculated for '{proper}' is: {identifier}."
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
