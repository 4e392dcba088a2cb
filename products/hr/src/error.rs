use thiserror::Error;

/// Result of a record store call.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result of an HR service call.
pub type HrResult<T> = Result<T, HrError>;

/// Failures reported by a [`RecordStore`](crate::store::RecordStore).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An add would collide with a record that already holds this id.
    #[error("employee id already in use: {id}")]
    DuplicateId { id: String },
    /// A remove targeted a record that does not exist.
    #[error("no stored employee with id {id}")]
    MissingRecord { id: String },
    /// The backing engine failed.
    #[error("store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HrError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
