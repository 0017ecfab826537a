//! rescuetime-watch: usage rules for the RescueTime analytic API
//!
//! Fetches today's reports, checks them against a list of limits, goals, and
//! productivity targets, and raises a desktop notification for each rule that
//! triggers.
//!
//! # Example
//!
//! ```no_run
//! use rescuetime_watch::alerts::{Notifier, Task};
//! use rescuetime_watch::api::ApiClient;
//! use rescuetime_watch::config::Config;
//! use rescuetime_watch::runner::run;
//!
//! # async fn example() {
//! let config = Config::new("https://www.rescuetime.com/anapi/data", "API_KEY")
//!     .with_tasks(vec![Task::limit("Entertainment", 30), Task::productivity(300)]);
//!
//! let client = ApiClient::from_config(&config);
//! let report = run(&config, &client, &Notifier::default()).await;
//! println!("{} notifications", report.notifications().count());
//! # }
//! ```

pub mod alerts;
pub mod api;
pub mod config;
pub mod data;
pub mod plot;
pub mod runner;

// Re-export commonly used types
pub use alerts::{NotificationEvent, Notifier, Task, TaskType};
pub use api::{ApiClient, FetchError, Query};
pub use config::{Config, ConfigError};
pub use data::{RowTable, TableError, Value};
pub use runner::{run, RunReport, TaskOutcome};
