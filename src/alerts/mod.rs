//! Usage rules and notifications
//!
//! Tasks are checked against fresh reports; triggered rules become
//! [`NotificationEvent`]s handed to the [`Notifier`].

pub mod checker;
pub mod config;
pub mod notifier;

pub use checker::{EvalError, ProductivitySummary, RuleChecker};
pub use config::{NotificationEvent, Task, TaskType};
pub use notifier::{Notifier, NotifierError, NotifyTarget};
