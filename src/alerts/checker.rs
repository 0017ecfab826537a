//! Rule evaluation against today's reports

use super::config::{NotificationEvent, Task, TaskType};
use crate::api::{ApiClient, FetchError, Query, ResolutionTime, RestrictKind};
use crate::data::{RowTable, TableError, Value, TIME_COLUMN};

/// Productivity bucket for "very productive" time
const VERY_PRODUCTIVE: i64 = 2;
/// Productivity bucket for "productive" time
const PRODUCTIVE: i64 = 1;

/// Figures behind a productivity report
#[derive(Debug, Clone, PartialEq)]
pub struct ProductivitySummary {
    /// Efficiency score, percent
    pub score: f64,
    /// Minutes logged today
    pub logged: i64,
    pub very_productive: i64,
    pub productive: i64,
    /// Productive minutes still needed to reach the goal, never negative
    pub remaining: i64,
    pub goal: i64,
}

impl ProductivitySummary {
    pub fn message(&self) -> String {
        format!(
            "You are {:.0}% productive so far with {} minutes logged.\n\
             Very productive: {} min, productive: {} min.\n\
             {} of your {}-minute goal remaining.",
            self.score, self.logged, self.very_productive, self.productive, self.remaining, self.goal
        )
    }
}

/// Evaluates tasks by fetching fresh reports. Holds no state between checks.
pub struct RuleChecker<'a> {
    client: &'a ApiClient,
}

impl<'a> RuleChecker<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Run the queries for a task and decide whether to notify
    pub async fn check(&self, task: &Task) -> Result<Option<NotificationEvent>, EvalError> {
        match task.task_type {
            TaskType::Limit => {
                let today = self.client.fetch(&category_query()).await?;
                evaluate_limit(task, &today)
            }
            TaskType::Goal => {
                let today = self.client.fetch(&category_query()).await?;
                evaluate_goal(task, &today)
            }
            TaskType::Productivity => {
                let efficiency = self
                    .client
                    .fetch(&Query::interval(RestrictKind::Efficiency, ResolutionTime::Day))
                    .await?;
                let productivity = self
                    .client
                    .fetch(&Query::interval(RestrictKind::Productivity, ResolutionTime::Day))
                    .await?;
                evaluate_productivity(task, &efficiency, &productivity).map(Some)
            }
            TaskType::Unknown => Err(EvalError::UnsupportedTask),
        }
    }
}

/// Today's ranked per-category report
pub fn category_query() -> Query {
    Query::rank(RestrictKind::Overview)
}

/// Notify when time on the slice exceeds the limit
pub fn evaluate_limit(task: &Task, table: &RowTable) -> Result<Option<NotificationEvent>, EvalError> {
    let slice = slice_name(task)?;
    let spent = minutes_on(table, slice)?;

    if spent > task.minutes {
        Ok(Some(NotificationEvent::new(format!(
            "Spent {} of {}-minute limit on {} today",
            spent, task.minutes, slice
        ))))
    } else {
        Ok(None)
    }
}

/// Notify while time on the slice is short of the goal
pub fn evaluate_goal(task: &Task, table: &RowTable) -> Result<Option<NotificationEvent>, EvalError> {
    let slice = slice_name(task)?;
    let spent = minutes_on(table, slice)?;

    if spent < task.minutes {
        Ok(Some(NotificationEvent::new(format!(
            "Need {} more minutes on {} to reach {}-minute goal",
            task.minutes.saturating_sub(spent),
            slice,
            task.minutes
        ))))
    } else {
        Ok(None)
    }
}

/// Build the status report. Always produces a notification.
pub fn evaluate_productivity(
    task: &Task,
    efficiency: &RowTable,
    productivity: &RowTable,
) -> Result<NotificationEvent, EvalError> {
    let summary = summarize_productivity(task.minutes, efficiency, productivity)?;
    Ok(NotificationEvent::new(summary.message()))
}

pub fn summarize_productivity(
    goal: i64,
    efficiency: &RowTable,
    productivity: &RowTable,
) -> Result<ProductivitySummary, EvalError> {
    let score_column = RestrictKind::Efficiency.schema().key_column;
    let score = match efficiency.first(score_column)? {
        Some(v) => as_f64(score_column, v)?,
        None => 0.0,
    };
    let logged = match efficiency.first(TIME_COLUMN)? {
        Some(v) => as_minutes(TIME_COLUMN, v)?,
        None => 0,
    };

    let bucket_column = RestrictKind::Productivity.schema().key_column;
    let bucket_minutes = |bucket: i64| -> Result<i64, EvalError> {
        match productivity.lookup(TIME_COLUMN, bucket_column, &Value::Int(bucket))? {
            Some(v) => as_minutes(TIME_COLUMN, v),
            None => Ok(0),
        }
    };
    let very_productive = bucket_minutes(VERY_PRODUCTIVE)?;
    let productive = bucket_minutes(PRODUCTIVE)?;

    Ok(ProductivitySummary {
        score,
        logged,
        very_productive,
        productive,
        remaining: goal
            .saturating_sub(very_productive.saturating_add(productive))
            .max(0),
        goal,
    })
}

fn slice_name(task: &Task) -> Result<&str, EvalError> {
    task.slice_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(EvalError::MissingSlice(task.task_type))
}

/// Minutes spent on a category today; no row means none spent
fn minutes_on(table: &RowTable, slice: &str) -> Result<i64, EvalError> {
    let key_column = RestrictKind::Overview.schema().key_column;
    match table.lookup(TIME_COLUMN, key_column, &Value::from(slice))? {
        Some(v) => as_minutes(TIME_COLUMN, v),
        None => Ok(0),
    }
}

fn as_minutes(column: &str, value: &Value) -> Result<i64, EvalError> {
    if value.is_null() {
        return Ok(0);
    }
    value.as_i64().ok_or_else(|| EvalError::InvalidValue {
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn as_f64(column: &str, value: &Value) -> Result<f64, EvalError> {
    if value.is_null() {
        return Ok(0.0);
    }
    value.as_f64().ok_or_else(|| EvalError::InvalidValue {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Rule evaluation errors
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Report schema mismatch: {0}")]
    Table(#[from] TableError),

    #[error("{0} task needs a slice_name")]
    MissingSlice(TaskType),

    #[error("Column {column} holds non-numeric value {value}")]
    InvalidValue { column: String, value: String },

    #[error("Unsupported task type")]
    UnsupportedTask,
}
