//! Task loop

use crate::alerts::{EvalError, NotificationEvent, Notifier, RuleChecker, Task};
use crate::api::{ApiClient, Query, ResolutionTime, RestrictKind};
use crate::config::Config;
use crate::plot;

/// What happened to one task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// Rule triggered and a notification was dispatched
    Notified(NotificationEvent),
    /// Rule evaluated, nothing to report
    Silent,
    /// Task type not understood by this version
    Skipped,
    /// Query or evaluation failed; later tasks still ran
    Failed(String),
}

/// Result of a full run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Whether the run was an explore-only run
    pub explored: bool,
    /// One entry per configured task, in file order
    pub outcomes: Vec<(Task, TaskOutcome)>,
    /// Charts rendered when plotting was enabled, categories first then hours.
    /// A chart whose report failed is left out.
    pub charts: Vec<String>,
}

impl RunReport {
    pub fn notifications(&self) -> impl Iterator<Item = &NotificationEvent> {
        self.outcomes.iter().filter_map(|(_, outcome)| match outcome {
            TaskOutcome::Notified(event) => Some(event),
            _ => None,
        })
    }

    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, TaskOutcome::Failed(_)))
            .count()
    }
}

/// Diagnostic report printed in explore mode
pub fn explore_query() -> Query {
    Query::rank(RestrictKind::Overview).with_resolution(ResolutionTime::Day)
}

/// Evaluate every configured task in order, or explore if configured to.
///
/// Per-task failures are logged and recorded; they never stop the loop.
pub async fn run(config: &Config, client: &ApiClient, notifier: &Notifier) -> RunReport {
    if config.explore {
        explore(client).await;
        return RunReport {
            explored: true,
            ..Default::default()
        };
    }

    let checker = RuleChecker::new(client);
    let mut report = RunReport::default();

    for task in &config.tasks {
        let outcome = run_task(&checker, notifier, task).await;
        report.outcomes.push((task.clone(), outcome));
    }

    tracing::info!(
        tasks = report.outcomes.len(),
        notified = report.notifications().count(),
        failed = report.failures(),
        "Finished checking tasks"
    );

    if config.plot {
        match plot::category_ranking(client).await {
            Ok(chart) => {
                println!("{}", chart);
                report.charts.push(chart);
            }
            Err(e) => tracing::error!(error = %e, "Failed to plot category ranking"),
        }
        match plot::hourly_productivity(client).await {
            Ok(chart) => {
                println!("{}", chart);
                report.charts.push(chart);
            }
            Err(e) => tracing::error!(error = %e, "Failed to plot hourly productivity"),
        }
    }

    report
}

async fn run_task(checker: &RuleChecker<'_>, notifier: &Notifier, task: &Task) -> TaskOutcome {
    match checker.check(task).await {
        Ok(Some(event)) => {
            tracing::info!(task = %task.label(), "Rule triggered");
            notifier.notify(&event).await;
            TaskOutcome::Notified(event)
        }
        Ok(None) => {
            tracing::info!(task = %task.label(), "Rule satisfied");
            TaskOutcome::Silent
        }
        Err(EvalError::UnsupportedTask) => {
            tracing::warn!(task = %task.label(), "Skipping task with unknown task_type");
            TaskOutcome::Skipped
        }
        Err(e) => {
            tracing::error!(task = %task.label(), error = %e, "Task check failed");
            TaskOutcome::Failed(e.to_string())
        }
    }
}

async fn explore(client: &ApiClient) {
    let query = explore_query();
    match client.fetch(&query).await {
        Ok(table) => println!("{}", table),
        Err(e) => tracing::error!(error = %e, "Explore request failed"),
    }
}
