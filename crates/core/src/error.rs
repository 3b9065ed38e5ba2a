use lepcare_uuid::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or incomplete observation set, or a wizard used out of order.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Malformed patient or treatment input.
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("record not found: {0}")]
    NotFound(RecordId),
    #[error("treatment ledger is empty")]
    EmptyLedger,
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("fixture schema mismatch at {path}: {message}")]
    Fixture { path: String, message: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Id(#[from] lepcare_uuid::IdError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
