//! Notification handlers for triggered rules

use tokio::process::Command;

use super::config::NotificationEvent;

/// Title shown on every desktop notification
pub const NOTIFICATION_TITLE: &str = "RescueTime Alert";
/// Freedesktop icon name used when none is configured
pub const DEFAULT_ICON: &str = "weather-severe-alert";

const NOTIFY_SEND: &str = "notify-send";

/// Where a notification goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyTarget {
    /// Log to tracing
    Log,
    /// Desktop notification through `notify-send` (libnotify)
    Desktop { icon: String },
}

/// Notifier for sending rule notifications
#[derive(Debug, Clone)]
pub struct Notifier {
    targets: Vec<NotifyTarget>,
}

impl Notifier {
    /// Log and show a desktop notification with the given icon
    pub fn new(icon: impl Into<String>) -> Self {
        Self {
            targets: vec![NotifyTarget::Log, NotifyTarget::Desktop { icon: icon.into() }],
        }
    }

    /// Only log notifications
    pub fn log_only() -> Self {
        Self {
            targets: vec![NotifyTarget::Log],
        }
    }

    pub fn targets(&self) -> &[NotifyTarget] {
        &self.targets
    }

    /// Deliver to every target, logging failures instead of returning them
    pub async fn notify(&self, event: &NotificationEvent) {
        if let Err(e) = self.dispatch(event).await {
            tracing::error!(error = %e, "Failed to send notification");
        }
    }

    /// Deliver to every target, collecting failures
    pub async fn dispatch(&self, event: &NotificationEvent) -> Result<(), NotifierError> {
        let mut errors = Vec::new();

        for target in &self.targets {
            if let Err(e) = self.notify_target(target, event).await {
                errors.push(e);
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(NotifierError::Multiple(errors)),
        }
    }

    async fn notify_target(
        &self,
        target: &NotifyTarget,
        event: &NotificationEvent,
    ) -> Result<(), NotifierError> {
        match target {
            NotifyTarget::Log => {
                tracing::warn!("{}: {}", NOTIFICATION_TITLE, event.message);
                Ok(())
            }
            NotifyTarget::Desktop { icon } => self.send_desktop(icon, &event.message).await,
        }
    }

    async fn send_desktop(&self, icon: &str, message: &str) -> Result<(), NotifierError> {
        let status = Command::new(NOTIFY_SEND)
            .arg(NOTIFICATION_TITLE)
            .arg(message)
            .arg(format!("--icon={}", icon))
            .status()
            .await
            .map_err(|e| NotifierError::Desktop(format!("Failed to run {}: {}", NOTIFY_SEND, e)))?;

        if !status.success() {
            return Err(NotifierError::Desktop(format!(
                "{} exited with {}",
                NOTIFY_SEND, status
            )));
        }

        tracing::debug!(icon = %icon, "Desktop notification sent");
        Ok(())
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_ICON)
    }
}

/// Notifier errors
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Desktop notification error: {0}")]
    Desktop(String),

    #[error("Multiple notification failures: {0:?}")]
    Multiple(Vec<NotifierError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notification() {
        let notifier = Notifier::log_only();
        let event = NotificationEvent::new("test message");

        // Log notification should always succeed
        assert!(notifier.dispatch(&event).await.is_ok());
    }

    #[test]
    fn test_default_targets() {
        let notifier = Notifier::default();
        assert_eq!(
            notifier.targets(),
            &[
                NotifyTarget::Log,
                NotifyTarget::Desktop {
                    icon: DEFAULT_ICON.to_string()
                }
            ]
        );
    }
}
