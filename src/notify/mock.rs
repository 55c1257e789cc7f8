//! Recording notifier for tests.
//!
//! `RecordingNotifier` implements [`Notifier`] and captures every
//! notification for later assertion. Interactive notifications can be
//! answered with a pre-configured action key, and the transport can be
//! made unreachable.

use std::cell::{Cell, RefCell};

use crate::error::{Result, UpdateError};

use super::{Notification, Notifier};

/// Notifier that records instead of delivering.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<Notification>>,
    answer: RefCell<Option<String>>,
    unreachable: Cell<bool>,
}

impl RecordingNotifier {
    /// Create a notifier that never answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer interactive notifications with this action key.
    pub fn answer_with(&self, action: &str) {
        *self.answer.borrow_mut() = Some(action.to_string());
    }

    /// Fail every send as if `notify-send` could not be started.
    pub fn set_unreachable(&self) {
        self.unreachable.set(true);
    }

    /// All notifications sent so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.borrow().clone()
    }

    /// Bodies of all notifications sent so far.
    pub fn bodies(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|n| n.body.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, notification: &Notification) -> Result<Option<String>> {
        if self.unreachable.get() {
            return Err(UpdateError::CommandFailed {
                command: "notify-send".to_string(),
                code: None,
            });
        }
        self.sent.borrow_mut().push(notification.clone());
        if notification.is_interactive() {
            Ok(self.answer.borrow().clone())
        } else {
            Ok(None)
        }
    }
}
