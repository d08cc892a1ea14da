use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::FaqGroup;

/// Date range for a metrics request. Dates are inclusive calendar days (UTC).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MetricsRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Per-agent execution rollup, sorted by count descending in responses.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentBreakdown {
    pub agent_name: String,
    pub count: i64,
    /// Estimated spend in USD.
    pub total_cost: f64,
}

/// Per-day rollup of executions whose `started_at` falls on that UTC day.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub total_cost: f64,
    pub total_count: i64,
    pub success_count: i64,
    pub error_count: i64,
    pub total_tokens: i64,
}

/// Full dashboard summary for one date range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    /// Estimated spend across the range, in USD.
    pub total_cost: f64,
    pub total_executions: i64,
    pub success_count: i64,
    pub error_count: i64,
    /// Percentage in [0, 100]; 0 when the range has no executions.
    pub success_rate: f64,
    pub total_tokens: i64,
    /// Execution counts keyed by model name; executions without a model
    /// fall under "Unknown".
    pub model_distribution: HashMap<String, i64>,
    pub active_agents_count: i64,
    pub executions_by_agent: Vec<AgentBreakdown>,
    /// Ascending by date; days without executions are absent.
    pub timeline: Vec<TimelinePoint>,
    /// Leads captured inside the range.
    pub new_leads: i64,
    /// Leads recorded since the start of the current UTC day.
    pub leads_today: i64,
    pub top_faqs: Vec<FaqGroup>,
    /// Percent change in cost vs the preceding window of equal length.
    /// 0 when the preceding window had no cost.
    pub cost_change: f64,
    /// Percent change in captured leads vs the preceding window.
    pub leads_change: f64,
}
