//! Attachment validation and blob path conventions.

use crate::error::{LedgerError, Result};
use crate::model::LedgerRow;

pub const MAX_ATTACHMENTS_PER_ROW: usize = 5;
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Allowed (extension, declared MIME type) pairs. Both sides must match.
const ALLOWED_TYPES: [(&str, &str); 6] = [
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
];

/// Lower-cases the name and replaces every character outside `[a-z0-9.\-_]`
/// with an underscore.
pub fn sanitize_filename(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Blob path for an upload: `attachments/{year}/{rowIndex}/{timestamp}_{file}`.
pub fn attachment_path(
    year: &str,
    row_index: usize,
    timestamp_millis: i64,
    filename: &str,
) -> String {
    format!(
        "attachments/{year}/{row_index}/{timestamp_millis}_{}",
        sanitize_filename(filename)
    )
}

/// Checks an upload against the per-row cap, the size limit, and the allowed
/// type list. Runs before any blob-store call; a failure leaves the row's
/// existing attachments untouched.
pub fn validate_upload(
    row: &LedgerRow,
    row_index: usize,
    filename: &str,
    mime_type: &str,
    size: u64,
) -> Result<()> {
    if row.attachments.len() >= MAX_ATTACHMENTS_PER_ROW {
        return Err(LedgerError::AttachmentLimitReached(row_index));
    }
    if size > MAX_ATTACHMENT_BYTES {
        return Err(LedgerError::AttachmentTooLarge { size });
    }

    let lowered = filename.to_lowercase();
    let extension = lowered.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    let allowed = ALLOWED_TYPES
        .iter()
        .any(|(ext, mime)| *ext == extension && *mime == mime_type);
    if !allowed {
        return Err(LedgerError::AttachmentTypeNotAllowed(format!(
            "{filename} ({mime_type})"
        )));
    }

    Ok(())
}
