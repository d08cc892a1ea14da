use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A contact captured by an agent during a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Label of the agent or channel that captured the lead.
    pub source: String,
    pub summary: Option<String>,
    /// When the conversation that produced the lead happened.
    pub captured_at: DateTime<Utc>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Request to record a lead.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLead {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub source: String,
    pub summary: Option<String>,
    pub captured_at: DateTime<Utc>,
}

/// Filters for listing leads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub source: Option<String>,
    pub limit: Option<i64>,
}
