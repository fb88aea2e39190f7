use thiserror::Error;

use crate::model::repo::ResourceType;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("resource not found: {resource_type:?}")]
    NotFound { resource_type: ResourceType },
}

impl DatabaseError {
    /// True when the underlying driver reported a unique constraint
    /// violation (duplicate username, email, slug or (user, course) /
    /// (user, unit) pair). Callers translate this into a conflict for the
    /// request layer.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::SqlxError(sqlx::Error::Database(e)) => {
                // postgres unique_violation
                e.code().as_deref() == Some("23505")
            }
            _ => false,
        }
    }
}
