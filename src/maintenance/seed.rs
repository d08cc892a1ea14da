//! Synthetic demo dataset, shaped to look like a month or two of real agent
//! traffic on a dashboard screenshot.

use chrono::{Duration, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::password,
    db::{DbError, DbPool, DbResult},
    models::{
        CreateExecution, CreateFaq, CreateLead, CreateUserRecord, ExecutionStatus, Role,
        UpsertModelPricing,
    },
};

const EXECUTION_COUNT: usize = 550;
const LEAD_EVERY_NTH: usize = 10;
const ERROR_RATE_PERCENT: u32 = 8;
const HISTORY_DAYS: f64 = 90.0;

const DEMO_ADMIN_EMAIL: &str = "demo@agentdesk.local";
const DEMO_VIEWER_EMAIL: &str = "observer@agentdesk.local";
const DEMO_PASSWORD: &str = "demo-password";

const AGENTS: &[(&str, &str)] = &[
    ("support-bot", "gpt-4o-mini"),
    ("sales-qualifier", "gpt-4o"),
    ("faq-bot", "gpt-4o-mini"),
    ("order-tracker", "claude-3-5-haiku"),
];

/// Rows created by one seeding run.
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub executions: u64,
    pub leads: u64,
    pub faqs: u64,
    pub users: u64,
    pub pricing_models: u64,
}

struct PlannedExecution {
    execution: CreateExecution,
    lead: Option<CreateLead>,
}

pub(super) async fn seed(db: &DbPool) -> DbResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    summary.users = seed_demo_accounts(db).await?;
    summary.pricing_models = seed_pricing(db).await?;

    // All randomness happens up front; the rng is not Send and must not be
    // held across an await.
    let planned = plan_executions();
    for PlannedExecution { mut execution, lead } in planned {
        if let Some(lead) = lead {
            let created = db.leads().create(lead).await?;
            execution.lead_id = Some(created.id);
            summary.leads += 1;
        }
        db.executions().create(execution).await?;
        summary.executions += 1;
    }

    for faq in sample_faqs() {
        db.faqs().create(faq).await?;
        summary.faqs += 1;
    }

    Ok(summary)
}

/// Create the demo admin and viewer accounts if they do not already exist.
async fn seed_demo_accounts(db: &DbPool) -> DbResult<u64> {
    let accounts = [
        (DEMO_ADMIN_EMAIL, "Demo Admin", Role::Admin),
        (DEMO_VIEWER_EMAIL, "Demo Viewer", Role::Viewer),
    ];

    for (email, name, role) in accounts {
        if db.users().get_by_email(email).await?.is_some() {
            continue;
        }
        let password_hash = password::hash_password(DEMO_PASSWORD)
            .map_err(|e| DbError::Internal(format!("Failed to hash demo password: {}", e)))?;
        db.users()
            .create(CreateUserRecord {
                email: email.to_string(),
                password_hash,
                name: name.to_string(),
                role,
            })
            .await?;
    }

    Ok(accounts.len() as u64)
}

async fn seed_pricing(db: &DbPool) -> DbResult<u64> {
    let rows = [
        ("gpt-4o-mini", "openai", 150_000, 600_000),
        ("gpt-4o", "openai", 2_500_000, 10_000_000),
        ("claude-3-5-haiku", "anthropic", 800_000, 4_000_000),
        ("claude-sonnet-4", "anthropic", 3_000_000, 15_000_000),
    ];

    for (model, provider, input, output) in rows {
        db.model_pricing()
            .upsert(UpsertModelPricing {
                model: model.to_string(),
                provider: provider.to_string(),
                input_per_1m_tokens: input,
                output_per_1m_tokens: output,
            })
            .await?;
    }

    Ok(rows.len() as u64)
}

fn plan_executions() -> Vec<PlannedExecution> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let mut planned = Vec::with_capacity(EXECUTION_COUNT);

    for i in 0..EXECUTION_COUNT {
        let (agent, model) = AGENTS[rng.gen_range(0..AGENTS.len())];

        // Quadratic skew: most of the synthetic history is recent.
        let u: f64 = rng.r#gen();
        let age_days = u * u * HISTORY_DAYS;
        let started_at = now
            - Duration::seconds((age_days * 86_400.0) as i64)
            - Duration::seconds(rng.gen_range(0..3_600));

        let failed = rng.gen_range(0..100) < ERROR_RATE_PERCENT;
        let duration_ms = rng.gen_range(800..45_000);
        let input_tokens: i64 = rng.gen_range(300..6_000);
        let output_tokens: i64 = rng.gen_range(50..1_500);

        // A slice of the history only reports combined token counts, the way
        // older workflow versions did.
        let combined_only = rng.gen_range(0..100) < 10;
        let (input, output, total) = if combined_only {
            (None, None, Some(input_tokens + output_tokens))
        } else {
            (
                Some(input_tokens),
                Some(output_tokens),
                Some(input_tokens + output_tokens),
            )
        };

        let lead = (!failed && i % LEAD_EVERY_NTH == 0).then(|| CreateLead {
            name: format!("Demo Lead {}", i),
            email: format!("lead{}@example.com", i),
            phone: (i % 3 == 0).then(|| format!("+1-555-01{:02}", i % 100)),
            source: agent.to_string(),
            summary: Some("Asked about pricing and requested a follow-up call".to_string()),
            captured_at: started_at,
        });

        planned.push(PlannedExecution {
            execution: CreateExecution {
                run_id: format!("demo-{}", Uuid::new_v4().simple()),
                agent_name: agent.to_string(),
                model: Some(model.to_string()),
                status: if failed {
                    ExecutionStatus::Error
                } else {
                    ExecutionStatus::Success
                },
                started_at,
                finished_at: Some(started_at + Duration::milliseconds(duration_ms)),
                duration_ms: Some(duration_ms),
                input_tokens: input,
                output_tokens: output,
                total_tokens: total,
                cost_microcents: None,
                lead_id: None,
            },
            lead,
        });
    }

    planned
}

fn sample_faqs() -> Vec<CreateFaq> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    [
        ("What are your opening hours?", "faq-bot", 42),
        ("How do I reset my password?", "support-bot", 31),
        ("Do you ship internationally?", "order-tracker", 27),
        ("What is your refund policy?", "support-bot", 24),
        ("Can I change my order after placing it?", "order-tracker", 18),
        ("Do you offer volume discounts?", "sales-qualifier", 12),
        ("Where can I find my invoice?", "support-bot", 9),
        ("Is there a free trial?", "sales-qualifier", 7),
    ]
    .into_iter()
    .map(|(question, agent, frequency)| CreateFaq {
        question: question.to_string(),
        category: None,
        frequency: Some(frequency),
        agent_name: Some(agent.to_string()),
        asked_at: now - Duration::hours(rng.gen_range(1..720)),
    })
    .collect()
}
