use thiserror::Error;

/// Failure reported by the store, classified by the constraint it hit.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unique constraint violated ({constraint})")]
    UniqueViolation { constraint: String },
    #[error("foreign key constraint violated ({constraint})")]
    ForeignKeyViolation { constraint: String },
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            if db_err.is_unique_violation() {
                return Self::UniqueViolation { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKeyViolation { constraint };
            }
        }
        Self::Database(err)
    }
}
