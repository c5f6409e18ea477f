//! Private-notification primitive supplied by the host.

use std::fmt;

use thiserror::Error;

/// Delivery failure reported by the host. The dispatcher only logs these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("notification to '{recipient}' failed: {reason}")]
pub struct NotifyError {
    /// Intended recipient.
    pub recipient: String,
    /// Host-provided reason.
    pub reason: String,
}

impl NotifyError {
    /// Creates a delivery failure.
    pub fn new(recipient: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            reason: reason.into(),
        }
    }
}

/// Sends a private notice to one user. Fire-and-forget from the caller's view.
pub trait Notifier: Send + Sync {
    /// Delivers `text` to `recipient`.
    fn notify(&self, recipient: &str, text: &str) -> Result<(), NotifyError>;
}

impl fmt::Debug for dyn Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Notifier")
    }
}

/// Notifier for hosts without a private-message channel. Drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _recipient: &str, _text: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}
