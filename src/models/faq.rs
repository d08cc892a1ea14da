use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A question asked of an agent, as logged by the workflow engine.
///
/// Rows are near-duplicates of each other by design; grouping happens at read
/// time in the deduplicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    pub id: Uuid,
    pub question: String,
    pub category: Option<String>,
    /// Occurrence count reported by the source. `None` or 0 counts as 1.
    pub frequency: Option<i64>,
    pub agent_name: Option<String>,
    pub asked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Request to record a question.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFaq {
    #[validate(length(min = 1, max = 1024))]
    pub question: String,
    pub category: Option<String>,
    pub frequency: Option<i64>,
    pub agent_name: Option<String>,
    pub asked_at: DateTime<Utc>,
}

/// Filters applied before FAQ grouping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqFilter {
    pub agent: Option<String>,
    /// Case-insensitive substring match on the raw question text.
    pub search: Option<String>,
}

/// A group of equivalent questions, produced by the deduplicator.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FaqGroup {
    /// Representative question text (first raw text seen for the group).
    pub question: String,
    pub frequency: i64,
    pub agent_name: Option<String>,
    /// Most recent `asked_at` across the group.
    pub last_asked_at: DateTime<Utc>,
}
