use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Authentication error: {0}")]
    Unauthenticated(String),

    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    // Covers both "absent" and "owned by someone else"; callers must not tell them apart.
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ValidationErrors> for AgendaError {
    fn from(errors: ValidationErrors) -> Self {
        AgendaError::Validation(errors)
    }
}

impl AgendaError {
    /// True for failures whose detail must stay on the server side.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AgendaError::Database(_) | AgendaError::Internal(_))
    }
}

pub type AgendaResult<T> = Result<T, AgendaError>;
