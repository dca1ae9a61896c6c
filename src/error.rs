use thiserror::Error;

use crate::attachments::{MAX_ATTACHMENTS_PER_ROW, MAX_ATTACHMENT_BYTES};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Unrecognized role: {0}")]
    UnknownRole(String),

    #[error("Cannot compare year {0} against itself")]
    SameYearComparison(String),

    #[error("Invalid year key: {0}")]
    InvalidYearKey(String),

    #[error("Year {year} is outside the allowed range {min}-{max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Year {0} already exists")]
    YearAlreadyExists(String),

    #[error("Row index {0} is out of bounds")]
    RowOutOfBounds(usize),

    #[error("Row {0} is not an entry row")]
    NotAnEntryRow(usize),

    #[error("Attachment type not allowed: {0}")]
    AttachmentTypeNotAllowed(String),

    #[error("Attachment is {size} bytes, above the {MAX_ATTACHMENT_BYTES} byte limit")]
    AttachmentTooLarge { size: u64 },

    #[error("Row {0} already holds the maximum of {MAX_ATTACHMENTS_PER_ROW} attachments")]
    AttachmentLimitReached(usize),

    #[error("Attachment index {0} is out of bounds")]
    AttachmentOutOfBounds(usize),

    #[error("Row store error: {0}")]
    Storage(String),

    #[error("Blob store error: {0}")]
    Blob(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
