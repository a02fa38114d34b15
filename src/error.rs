use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffwalkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid diff summary at line {line}: {reason}")]
    InvalidSummary { line: usize, reason: String },

    #[error("Cursor does not address a line in the diff: {0}")]
    InvalidCursor(String),
}

pub type Result<T> = std::result::Result<T, DiffwalkError>;
