use thiserror::Error;

#[derive(Error, Debug)]
pub enum SarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    #[error("incorrect password for {filename}")]
    PasswordMismatch { filename: String },

    #[error("transform failed: {0}")]
    Transform(String),

    #[error("invalid argument: {0}")]
    Argument(String),
}

impl SarError {
    pub fn corrupt(msg: impl Into<String>) -> Self {
        SarError::CorruptRecord(msg.into())
    }

    pub fn transform(msg: impl Into<String>) -> Self {
        SarError::Transform(msg.into())
    }

    pub fn is_password_mismatch(&self) -> bool {
        matches!(self, SarError::PasswordMismatch { .. })
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, SarError>;
