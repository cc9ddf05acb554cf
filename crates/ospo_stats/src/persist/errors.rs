use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur in the persistence gateway.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_error_converts_from_db_err() {
        let err: PersistError = DbErr::RecordNotFound("repo".to_string()).into();
        let msg = err.to_string();
        assert!(msg.contains("Database error"));
        assert!(msg.contains("repo"));
    }
}
