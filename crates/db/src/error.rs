use thiserror::Error;

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type returned by every store operation.
///
/// Unique-constraint violations get their own variant so the service layer
/// can surface the create/create race (two concurrent inserts passing the
/// uniqueness pre-check) as a conflict instead of a server error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated (Postgres error code 23505).
    #[error("Duplicate value violates unique constraint: {constraint}")]
    UniqueViolation { constraint: String },

    /// Any other database failure.
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}
