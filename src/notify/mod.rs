//! User notifications.
//!
//! This module provides:
//! - [`Notifier`] trait for notification transports
//! - [`NotificationGateway`], which applies the `dbus_notify` setting
//! - [`DesktopNotifier`] for `notify-send` delivery
//! - [`RecordingNotifier`] for tests
//!
//! # Example
//!
//! ```
//! use ublue_update::notify::{Notification, NotificationGateway, RecordingNotifier};
//!
//! let notifier = RecordingNotifier::new();
//! let gateway = NotificationGateway::new(&notifier, true);
//! gateway.notify(&Notification::new("System Updater", "Updating")).unwrap();
//! assert_eq!(notifier.bodies(), vec!["Updating".to_string()]);
//! ```

pub mod desktop;
pub mod mock;
pub mod session;

pub use desktop::DesktopNotifier;
pub use mock::RecordingNotifier;
pub use session::UserSession;

use std::fmt;

use crate::error::Result;

/// Title used for every notification the updater sends.
pub const TITLE: &str = "System Updater";

/// Notification urgency level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Urgency {
    #[default]
    Normal,
    Critical,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::Normal => "normal",
            Urgency::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// A notification to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Summary line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Action buttons as `key=Label`. Non-empty makes the notification interactive.
    pub actions: Vec<String>,
    /// Urgency hint.
    pub urgency: Urgency,
}

impl Notification {
    /// Create a one-way notification with normal urgency.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            actions: Vec::new(),
            urgency: Urgency::Normal,
        }
    }

    /// Add an action button (`key=Label`).
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Set the urgency.
    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    /// Whether the notification waits for a user response.
    pub fn is_interactive(&self) -> bool {
        !self.actions.is_empty()
    }
}

/// A notification transport.
pub trait Notifier {
    /// Deliver a notification.
    ///
    /// Returns the key of the action the user chose, if any. One-way
    /// notifications always return `None`.
    fn send(&self, notification: &Notification) -> Result<Option<String>>;
}

/// Front door for notifications from the update flow.
///
/// Disabled gateways drop everything. An unreachable transport is an
/// error for the caller; a transport that runs but declines to deliver
/// reports "no answer".
pub struct NotificationGateway<'a> {
    notifier: &'a dyn Notifier,
    enabled: bool,
}

impl<'a> NotificationGateway<'a> {
    /// Create a gateway over a transport.
    pub fn new(notifier: &'a dyn Notifier, enabled: bool) -> Self {
        Self { notifier, enabled }
    }

    /// Whether notifications are delivered at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Send a notification, returning the chosen action key.
    pub fn notify(&self, notification: &Notification) -> Result<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }
        tracing::debug!("Sending notification: {}", notification.body);
        self.notifier.send(notification)
    }
}
