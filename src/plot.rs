//! Plain-text charts of today's productivity

use chrono::NaiveDateTime;

use crate::api::{ApiClient, FetchError, Query, ResolutionTime, RestrictKind};
use crate::data::{RowTable, TableError, TIME_COLUMN};

const BAR_WIDTH: usize = 40;
const DATE_COLUMN: &str = "Date";

/// Fetch today's per-category ranking and render it
pub async fn category_ranking(client: &ApiClient) -> Result<String, PlotError> {
    let today = client.fetch(&Query::rank(RestrictKind::Overview)).await?;
    Ok(render_categories(&today)?)
}

/// Fetch today's hourly efficiency report and render it
pub async fn hourly_productivity(client: &ApiClient) -> Result<String, PlotError> {
    let today = client
        .fetch(&Query::interval(RestrictKind::Efficiency, ResolutionTime::Hour))
        .await?;
    Ok(render_hourly(&today)?)
}

/// One line per hour: efficiency bar, efficiency percent, minutes logged
pub fn render_hourly(table: &RowTable) -> Result<String, TableError> {
    let score_column = RestrictKind::Efficiency.schema().key_column;
    for column in [DATE_COLUMN, TIME_COLUMN, score_column] {
        // Fails with a schema error when the column is absent
        table.first(column)?;
    }

    let mut out = format!("{:<6} {:<width$}  {:>5}  {:>7}\n", "Hour", "Efficiency", "", "Logged", width = BAR_WIDTH);

    for row in table.rows() {
        let label = row
            .get(DATE_COLUMN)
            .map(|v| hour_label(&v.to_string()))
            .unwrap_or_default();
        let score = row.get(score_column).and_then(|v| v.as_f64()).unwrap_or(0.0);
        let logged = row.get(TIME_COLUMN).and_then(|v| v.as_i64()).unwrap_or(0);

        out.push_str(&format!(
            "{:<6} {}  {:>4.0}%  {:>3} min\n",
            label,
            bar(score),
            score,
            logged
        ));
    }

    if table.is_empty() {
        out.push_str("(no activity logged today)\n");
    }

    Ok(out)
}

/// One line per category in report order, bars scaled to the busiest one
pub fn render_categories(table: &RowTable) -> Result<String, TableError> {
    let category_column = RestrictKind::Overview.schema().key_column;
    for column in [category_column, TIME_COLUMN] {
        table.first(column)?;
    }

    let entries: Vec<(String, i64)> = table
        .rows()
        .map(|row| {
            let name = row.get(category_column).map(|v| v.to_string()).unwrap_or_default();
            let minutes = row.get(TIME_COLUMN).and_then(|v| v.as_i64()).unwrap_or(0);
            (name, minutes)
        })
        .collect();

    let width = entries
        .iter()
        .map(|(name, _)| name.chars().count())
        .chain([category_column.len()])
        .max()
        .unwrap_or_default();
    let busiest = entries.iter().map(|(_, m)| *m).max().unwrap_or(0);

    let mut out = format!(
        "{:<width$} {:<bar_width$}  {:>7}\n",
        category_column,
        "",
        "Time",
        width = width,
        bar_width = BAR_WIDTH
    );

    for (name, minutes) in &entries {
        let share = if busiest > 0 {
            *minutes as f64 / busiest as f64 * 100.0
        } else {
            0.0
        };
        out.push_str(&format!(
            "{:<width$} {}  {:>3} min\n",
            name,
            bar(share),
            minutes,
            width = width
        ));
    }

    if entries.is_empty() {
        out.push_str("(no activity logged today)\n");
    }

    Ok(out)
}

/// `HH:MM` for API timestamps, the raw text otherwise
fn hour_label(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Report schema mismatch: {0}")]
    Table(#[from] TableError),
}
