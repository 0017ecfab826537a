//! Request builder for the RescueTime analytic API

pub mod client;
pub mod query;

pub use client::{parse_report, ApiClient, FetchError};
pub use query::{Perspective, Query, ReportSchema, ResolutionTime, RestrictKind};
