use thiserror::Error;

/// Error types for the persistence layer
#[derive(Error, Debug)]
pub enum DaoError {
    /// Error from the database: connectivity, constraint violations, bad SQL
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A field name that does not resolve to a mapped column
    #[error("Unknown column '{column}' on entity '{entity}'")]
    UnknownColumn { entity: String, column: String },

    /// A filter value whose type does not fit the column
    #[error("Type mismatch on {entity}.{column}: expected a {expected} value")]
    TypeMismatch {
        entity: String,
        column: String,
        expected: String,
    },

    /// A fixture script that could not be applied
    #[error("Fixture error: {0}")]
    Fixture(String),

    /// File system errors while reading scripts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DaoError {
    /// True for errors caused by referencing a missing or incompatible column.
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            DaoError::UnknownColumn { .. } | DaoError::TypeMismatch { .. }
        )
    }
}

/// Type alias for Result with DaoError
pub type Result<T> = std::result::Result<T, DaoError>;
