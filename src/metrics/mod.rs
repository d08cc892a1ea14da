//! Request-scoped metrics aggregation.
//!
//! Every summary is computed from scratch against the current table state.
//! There is no cache and no background rollup; the data volumes here are an
//! internal team's execution log, not a telemetry firehose.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::{
    db::{DbError, DbPool, DbResult},
    faq,
    models::{
        AgentBreakdown, Execution, ExecutionStatus, MetricsRange, MetricsSummary, TimelinePoint,
    },
    pricing::{PricingTable, microcents_to_usd},
};

pub struct MetricsService {
    db: Arc<DbPool>,
    default_model: Option<String>,
}

impl MetricsService {
    pub fn new(db: Arc<DbPool>, default_model: Option<String>) -> Self {
        Self { db, default_model }
    }

    /// Build the dashboard summary for an inclusive date range.
    ///
    /// The sub-fetches are independent reads and run concurrently; if any of
    /// them fails the whole aggregation fails. No partial summaries.
    pub async fn aggregate(&self, range: MetricsRange) -> DbResult<MetricsSummary> {
        if range.start > range.end {
            return Err(DbError::Validation(
                "start date must not be after end date".to_string(),
            ));
        }

        let start = range.start.and_time(NaiveTime::MIN).and_utc();
        // End of day, millisecond precision.
        let end = range.end.and_time(NaiveTime::MIN).and_utc() + Duration::days(1)
            - Duration::milliseconds(1);

        // Preceding window of equal length, ending just before `start`.
        let window = end - start + Duration::milliseconds(1);
        let prev_start = start - window;
        let prev_end = start - Duration::milliseconds(1);

        let today_start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();

        let executions_repo = self.db.executions();
        let model_pricing_repo = self.db.model_pricing();
        let leads_repo = self.db.leads();
        let faqs_repo = self.db.faqs();
        let (executions, prev_executions, pricing_rows, new_leads, prev_leads, leads_today, faqs) =
            tokio::try_join!(
                executions_repo.list_between(start, end),
                executions_repo.list_between(prev_start, prev_end),
                model_pricing_repo.list(),
                leads_repo.count_captured_between(start, end),
                leads_repo.count_captured_between(prev_start, prev_end),
                leads_repo.count_recorded_since(today_start),
                faqs_repo.list_asked_between(start, end),
            )?;

        let table = PricingTable::new(&pricing_rows, self.default_model.as_deref());

        let mut total_cost: i64 = 0;
        let mut success_count: i64 = 0;
        let mut total_tokens: i64 = 0;
        let mut model_distribution: HashMap<String, i64> = HashMap::new();
        let mut by_agent: HashMap<String, (i64, i64)> = HashMap::new();
        let mut timeline: BTreeMap<chrono::NaiveDate, TimelineAccumulator> = BTreeMap::new();

        for execution in &executions {
            let cost = table.estimate_cost(execution);
            let tokens = effective_tokens(execution);
            let success = execution.status == ExecutionStatus::Success;

            total_cost = total_cost.saturating_add(cost);
            total_tokens = total_tokens.saturating_add(tokens);
            if success {
                success_count += 1;
            }

            let model = execution
                .model
                .clone()
                .unwrap_or_else(|| "Unknown".to_string());
            *model_distribution.entry(model).or_insert(0) += 1;

            let agent = by_agent.entry(execution.agent_name.clone()).or_insert((0, 0));
            agent.0 += 1;
            agent.1 = agent.1.saturating_add(cost);

            let day = timeline
                .entry(execution.started_at.date_naive())
                .or_default();
            day.cost = day.cost.saturating_add(cost);
            day.count += 1;
            if success {
                day.success_count += 1;
            }
            day.tokens = day.tokens.saturating_add(tokens);
        }

        let total_executions = executions.len() as i64;
        let error_count = total_executions - success_count;
        let success_rate = if total_executions > 0 {
            success_count as f64 * 100.0 / total_executions as f64
        } else {
            0.0
        };

        let mut executions_by_agent: Vec<AgentBreakdown> = by_agent
            .into_iter()
            .map(|(agent_name, (count, cost))| AgentBreakdown {
                agent_name,
                count,
                total_cost: microcents_to_usd(cost),
            })
            .collect();
        executions_by_agent
            .sort_by(|a, b| b.count.cmp(&a.count).then(a.agent_name.cmp(&b.agent_name)));

        let active_agents_count = executions_by_agent.len() as i64;

        let timeline: Vec<TimelinePoint> = timeline
            .into_iter()
            .map(|(date, acc)| TimelinePoint {
                date,
                total_cost: microcents_to_usd(acc.cost),
                total_count: acc.count,
                success_count: acc.success_count,
                error_count: acc.count - acc.success_count,
                total_tokens: acc.tokens,
            })
            .collect();

        let prev_cost: i64 = prev_executions
            .iter()
            .fold(0i64, |acc, e| acc.saturating_add(table.estimate_cost(e)));

        Ok(MetricsSummary {
            total_cost: microcents_to_usd(total_cost),
            total_executions,
            success_count,
            error_count,
            success_rate,
            total_tokens,
            model_distribution,
            active_agents_count,
            executions_by_agent,
            timeline,
            new_leads,
            leads_today,
            top_faqs: faq::dedupe(&faqs, faq::METRICS_TOP_LIMIT),
            cost_change: percent_change(prev_cost as f64, total_cost as f64),
            leads_change: percent_change(prev_leads as f64, new_leads as f64),
        })
    }
}

#[derive(Default)]
struct TimelineAccumulator {
    cost: i64,
    count: i64,
    success_count: i64,
    tokens: i64,
}

/// Reported total when present and positive, otherwise input + output.
fn effective_tokens(execution: &Execution) -> i64 {
    match execution.total_tokens {
        Some(total) if total > 0 => total,
        _ => {
            execution.input_tokens.unwrap_or(0) + execution.output_tokens.unwrap_or(0)
        }
    }
}

/// Percent change vs a baseline. A zero baseline yields 0 rather than a
/// division blowup; growth from nothing is reported as flat.
fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::{
        db::tests::harness::{create_sqlite_pool, run_sqlite_migrations},
        models::{CreateExecution, CreateFaq, CreateLead, UpsertModelPricing},
    };

    async fn create_service() -> (Arc<DbPool>, MetricsService) {
        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;
        let db = Arc::new(DbPool::from_sqlite(pool));
        let service = MetricsService::new(db.clone(), None);
        (db, service)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at_noon(date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_opt(12, 0, 0).expect("valid time").and_utc()
    }

    async fn insert_execution(
        db: &DbPool,
        agent: &str,
        model: Option<&str>,
        status: ExecutionStatus,
        started_at: DateTime<Utc>,
        input: i64,
        output: i64,
    ) {
        db.executions()
            .create(CreateExecution {
                run_id: Uuid::new_v4().to_string(),
                agent_name: agent.to_string(),
                model: model.map(|m| m.to_string()),
                status,
                started_at,
                finished_at: None,
                duration_ms: Some(1500),
                input_tokens: Some(input),
                output_tokens: Some(output),
                total_tokens: Some(input + output),
                cost_microcents: None,
                lead_id: None,
            })
            .await
            .expect("Failed to insert execution");
    }

    #[tokio::test]
    async fn test_rejects_inverted_range() {
        let (_db, service) = create_service().await;
        let result = service
            .aggregate(MetricsRange {
                start: day(2026, 3, 10),
                end: day(2026, 3, 1),
            })
            .await;
        assert!(matches!(result, Err(DbError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_range_is_all_zeroes() {
        let (_db, service) = create_service().await;
        let summary = service
            .aggregate(MetricsRange {
                start: day(2026, 3, 1),
                end: day(2026, 3, 31),
            })
            .await
            .expect("aggregate");

        assert_eq!(summary.total_executions, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.total_cost, 0.0);
        assert_eq!(summary.cost_change, 0.0);
        assert!(summary.timeline.is_empty());
        assert!(summary.top_faqs.is_empty());
    }

    #[tokio::test]
    async fn test_costs_counts_and_distribution() {
        let (db, service) = create_service().await;

        // $1/1M input, $2/1M output
        db.model_pricing()
            .upsert(UpsertModelPricing {
                model: "gpt-4o".to_string(),
                provider: "openai".to_string(),
                input_per_1m_tokens: 1_000_000,
                output_per_1m_tokens: 2_000_000,
            })
            .await
            .expect("pricing");

        let d = day(2026, 3, 10);
        insert_execution(
            &db,
            "support-bot",
            Some("gpt-4o"),
            ExecutionStatus::Success,
            at_noon(d),
            1_000_000,
            1_000_000,
        )
        .await;
        insert_execution(
            &db,
            "support-bot",
            Some("gpt-4o"),
            ExecutionStatus::Error,
            at_noon(d),
            0,
            0,
        )
        .await;
        insert_execution(
            &db,
            "sales-bot",
            None,
            ExecutionStatus::Success,
            at_noon(d),
            0,
            0,
        )
        .await;

        let summary = service
            .aggregate(MetricsRange { start: d, end: d })
            .await
            .expect("aggregate");

        assert_eq!(summary.total_executions, 3);
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.error_count, 1);
        assert!((summary.success_rate - 66.666).abs() < 0.01);
        // Only the first execution has tokens: exactly $3.00
        assert_eq!(summary.total_cost, 3.0);
        assert_eq!(summary.total_tokens, 2_000_000);
        assert_eq!(summary.model_distribution.get("gpt-4o"), Some(&2));
        assert_eq!(summary.model_distribution.get("Unknown"), Some(&1));
        assert_eq!(summary.active_agents_count, 2);
        // support-bot has more executions, so it sorts first
        assert_eq!(summary.executions_by_agent[0].agent_name, "support-bot");
        assert_eq!(summary.executions_by_agent[0].count, 2);
    }

    #[tokio::test]
    async fn test_timeline_is_ascending_by_day() {
        let (db, service) = create_service().await;

        let d1 = day(2026, 3, 10);
        let d3 = day(2026, 3, 12);
        // Inserted out of order
        insert_execution(&db, "bot", None, ExecutionStatus::Success, at_noon(d3), 0, 0).await;
        insert_execution(&db, "bot", None, ExecutionStatus::Success, at_noon(d1), 0, 0).await;
        insert_execution(&db, "bot", None, ExecutionStatus::Error, at_noon(d3), 0, 0).await;

        let summary = service
            .aggregate(MetricsRange {
                start: d1,
                end: day(2026, 3, 15),
            })
            .await
            .expect("aggregate");

        assert_eq!(summary.timeline.len(), 2);
        assert_eq!(summary.timeline[0].date, d1);
        assert_eq!(summary.timeline[1].date, d3);
        assert_eq!(summary.timeline[1].total_count, 2);
        assert_eq!(summary.timeline[1].success_count, 1);
        assert_eq!(summary.timeline[1].error_count, 1);
    }

    #[tokio::test]
    async fn test_cost_change_against_previous_window() {
        let (db, service) = create_service().await;

        db.model_pricing()
            .upsert(UpsertModelPricing {
                model: "m".to_string(),
                provider: "openai".to_string(),
                input_per_1m_tokens: 1_000_000,
                output_per_1m_tokens: 1_000_000,
            })
            .await
            .expect("pricing");

        // Previous week: $1.00; current week: $3.00 -> +200%
        insert_execution(
            &db,
            "bot",
            Some("m"),
            ExecutionStatus::Success,
            at_noon(day(2026, 3, 3)),
            500_000,
            500_000,
        )
        .await;
        insert_execution(
            &db,
            "bot",
            Some("m"),
            ExecutionStatus::Success,
            at_noon(day(2026, 3, 10)),
            1_500_000,
            1_500_000,
        )
        .await;

        let summary = service
            .aggregate(MetricsRange {
                start: day(2026, 3, 8),
                end: day(2026, 3, 14),
            })
            .await
            .expect("aggregate");

        assert_eq!(summary.total_cost, 3.0);
        assert!((summary.cost_change - 200.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_zero_baseline_changes_are_zero() {
        let (db, service) = create_service().await;

        insert_execution(
            &db,
            "bot",
            None,
            ExecutionStatus::Success,
            at_noon(day(2026, 3, 10)),
            1_000_000,
            0,
        )
        .await;
        db.leads()
            .create(CreateLead {
                name: "Jamie".to_string(),
                email: "j@example.com".to_string(),
                phone: None,
                source: "bot".to_string(),
                summary: None,
                captured_at: at_noon(day(2026, 3, 10)),
            })
            .await
            .expect("lead");

        let summary = service
            .aggregate(MetricsRange {
                start: day(2026, 3, 8),
                end: day(2026, 3, 14),
            })
            .await
            .expect("aggregate");

        assert!(summary.total_cost > 0.0);
        assert_eq!(summary.new_leads, 1);
        // No previous-window activity at all
        assert_eq!(summary.cost_change, 0.0);
        assert_eq!(summary.leads_change, 0.0);
    }

    #[tokio::test]
    async fn test_leads_today_uses_insert_time() {
        let (db, service) = create_service().await;

        // Captured long ago, but inserted right now
        db.leads()
            .create(CreateLead {
                name: "Jamie".to_string(),
                email: "j@example.com".to_string(),
                phone: None,
                source: "bot".to_string(),
                summary: None,
                captured_at: at_noon(day(2020, 1, 1)),
            })
            .await
            .expect("lead");

        let summary = service
            .aggregate(MetricsRange {
                start: day(2026, 3, 8),
                end: day(2026, 3, 14),
            })
            .await
            .expect("aggregate");

        assert_eq!(summary.new_leads, 0);
        assert_eq!(summary.leads_today, 1);
    }

    #[tokio::test]
    async fn test_top_faqs_grouped_and_capped() {
        let (db, service) = create_service().await;

        let d = day(2026, 3, 10);
        for i in 0..7 {
            db.faqs()
                .create(CreateFaq {
                    question: format!("Question number {}?", i),
                    category: None,
                    frequency: Some(i + 1),
                    agent_name: None,
                    asked_at: at_noon(d),
                })
                .await
                .expect("faq");
        }
        // Casing variant of the most frequent question merges into it
        db.faqs()
            .create(CreateFaq {
                question: "question NUMBER 6".to_string(),
                category: None,
                frequency: Some(3),
                agent_name: None,
                asked_at: at_noon(d),
            })
            .await
            .expect("faq");

        let summary = service
            .aggregate(MetricsRange { start: d, end: d })
            .await
            .expect("aggregate");

        assert_eq!(summary.top_faqs.len(), 5);
        assert_eq!(summary.top_faqs[0].frequency, 10);
    }
}
