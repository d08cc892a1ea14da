use uuid::Uuid;

use crate::db::error::{DbError, DbResult};

/// Parse a UUID stored as TEXT, mapping corruption to an internal error.
pub(crate) fn parse_uuid(s: &str) -> DbResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DbError::Internal(format!("Invalid UUID in database: {}", e)))
}
