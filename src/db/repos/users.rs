use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateUserRecord, UpdateUserRecord, User},
};

/// Repository for dashboard user accounts.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Create a user. Email must be unique.
    async fn create(&self, input: CreateUserRecord) -> DbResult<User>;

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> DbResult<Option<User>>;

    /// List all users, newest first.
    async fn list(&self) -> DbResult<Vec<User>>;

    async fn update(&self, id: Uuid, input: UpdateUserRecord) -> DbResult<User>;

    /// Stamp `last_login_at` with the current time.
    async fn record_login(&self, id: Uuid) -> DbResult<()>;

    async fn delete(&self, id: Uuid) -> DbResult<()>;

    async fn count(&self) -> DbResult<i64>;
}
