//! Error types for jobly

use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Error types for query construction and repository operations.
///
/// The first group are domain errors: terminal, never retried, and meant to be
/// translated into a status by the request layer. Everything after them is an
/// infrastructure failure reported as-is.
#[derive(Debug, Error)]
pub enum JoblyError {
    /// A partial update named zero fields
    #[error("No data: {0}")]
    EmptyInput(String),

    /// Contradictory filter bounds
    #[error("Invalid range: {0}")]
    Range(String),

    /// Create conflicts with an existing key
    #[error("Duplicate {0}")]
    Duplicate(String),

    /// Key does not resolve to a row
    #[error("Not found: {0}")]
    NotFound(String),

    /// Field outside an entity's updatable set
    #[error("Unknown field for {entity}: {field}")]
    UnknownField { entity: &'static str, field: String },

    /// Column name that cannot be rendered as a quoted identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[error("Pool error: {0}")]
    Pool(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl JoblyError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a duplicate error
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a duplicate error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Check if this is a foreign key violation error
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::ForeignKeyViolation(_))
    }

    /// Whether this error comes from the store or its plumbing rather than
    /// from a caller mistake.
    pub fn is_infrastructure(&self) -> bool {
        !matches!(
            self,
            Self::EmptyInput(_)
                | Self::Range(_)
                | Self::Duplicate(_)
                | Self::NotFound(_)
                | Self::UnknownField { .. }
                | Self::InvalidIdentifier(_)
        )
    }

    /// Parse a tokio_postgres error into a more specific JoblyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

impl From<deadpool_postgres::PoolError> for JoblyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

impl From<refinery::Error> for JoblyError {
    fn from(err: refinery::Error) -> Self {
        Self::Migration(err.to_string())
    }
}
