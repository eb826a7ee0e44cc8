use thiserror::Error;

/// Failures at the crate's boundary. Notes that cannot be placed and
/// infeasible shifts are ordinary results, not errors.
#[derive(Error, Debug)]
pub enum FretError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    /// Search or weight settings that cannot drive a search.
    #[error("Invalid Settings: {0}")]
    Config(String),

    /// Malformed instrument or event input.
    #[error("Invalid Input: {0}")]
    Validation(String),
}

pub type FretResult<T> = Result<T, FretError>;
