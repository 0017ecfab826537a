//! Report query types for the RescueTime analytic API

use serde::{Deserialize, Serialize};

/// Axis of aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    /// Snapshot ranking
    Rank,
    /// Time series, bucketed by [`ResolutionTime`]
    Interval,
}

/// Report category; determines the response columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictKind {
    Overview,
    Category,
    Activity,
    Document,
    Efficiency,
    Productivity,
}

/// Time bucket size for interval reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionTime {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

/// Expected shape of the report returned for a [`RestrictKind`].
///
/// Every kind carries the elapsed-time column; kinds differ in the column
/// that identifies each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSchema {
    /// Column identifying what each row is about
    pub key_column: &'static str,
}

impl Perspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Rank => "rank",
            Perspective::Interval => "interval",
        }
    }
}

impl RestrictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictKind::Overview => "overview",
            RestrictKind::Category => "category",
            RestrictKind::Activity => "activity",
            RestrictKind::Document => "document",
            RestrictKind::Efficiency => "efficiency",
            RestrictKind::Productivity => "productivity",
        }
    }

    pub fn schema(&self) -> ReportSchema {
        let key_column = match self {
            RestrictKind::Overview | RestrictKind::Category => "Category",
            RestrictKind::Activity => "Activity",
            RestrictKind::Document => "Document",
            RestrictKind::Efficiency => "Efficiency (percent)",
            RestrictKind::Productivity => "Productivity",
        };
        ReportSchema { key_column }
    }
}

impl ResolutionTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionTime::Minute => "minute",
            ResolutionTime::Hour => "hour",
            ResolutionTime::Day => "day",
            ResolutionTime::Week => "week",
            ResolutionTime::Month => "month",
        }
    }
}

/// A logical report request. Unset fields are left to the API's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perspective: Option<Perspective>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_kind: Option<RestrictKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_time: Option<ResolutionTime>,
    /// Start date, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_begin: Option<String>,
    /// End date, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_end: Option<String>,
    /// Name of a category, activity, or overview to restrict to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_thing: Option<String>,
}

impl Query {
    /// Ranked report of today's usage
    pub fn rank(kind: RestrictKind) -> Self {
        Self {
            perspective: Some(Perspective::Rank),
            restrict_kind: Some(kind),
            ..Default::default()
        }
    }

    /// Time-series report of today's usage
    pub fn interval(kind: RestrictKind, resolution: ResolutionTime) -> Self {
        Self {
            perspective: Some(Perspective::Interval),
            restrict_kind: Some(kind),
            resolution_time: Some(resolution),
            ..Default::default()
        }
    }

    pub fn with_resolution(mut self, resolution: ResolutionTime) -> Self {
        self.resolution_time = Some(resolution);
        self
    }

    pub fn with_range(mut self, begin: impl Into<String>, end: impl Into<String>) -> Self {
        self.restrict_begin = Some(begin.into());
        self.restrict_end = Some(end.into());
        self
    }

    pub fn with_thing(mut self, thing: impl Into<String>) -> Self {
        self.restrict_thing = Some(thing.into());
        self
    }

    /// Schema of the report this query asks for, if the kind is set
    pub fn schema(&self) -> Option<ReportSchema> {
        self.restrict_kind.map(|k| k.schema())
    }

    /// Whether `resolution_time` has any effect on this query
    pub fn resolution_applies(&self) -> bool {
        self.resolution_time.is_none() || self.perspective == Some(Perspective::Interval)
    }

    /// Transport parameters for this query, excluding credentials.
    ///
    /// Only set, non-empty fields are emitted, in a fixed order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);

        if let Some(p) = self.perspective {
            params.push(("perspective", p.as_str().to_string()));
        }
        if let Some(k) = self.restrict_kind {
            params.push(("restrict_kind", k.as_str().to_string()));
        }
        if let Some(r) = self.resolution_time {
            params.push(("resolution_time", r.as_str().to_string()));
        }

        let text_fields = [
            ("restrict_begin", &self.restrict_begin),
            ("restrict_end", &self.restrict_end),
            ("restrict_thing", &self.restrict_thing),
        ];
        for (name, value) in text_fields {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((name, v.to_string()));
            }
        }

        params
    }
}
