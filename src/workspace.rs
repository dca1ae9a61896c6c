//! In-memory working copy of one ledger year plus its persistence plumbing.
//!
//! Every mutation is optimistic: the in-memory snapshot changes first, then
//! the full row list is re-sent to the row store. A failed write surfaces an
//! error but the in-memory state is not rolled back; concurrent sessions are
//! resolved last-write-wins at the store.

use chrono::Utc;
use log::{debug, info, warn};

use crate::attachments::{attachment_path, validate_upload};
use crate::classify::{can_edit_field, classify, RowKind, FIRST_ENTRY_INDEX};
use crate::error::{LedgerError, Result};
use crate::model::{Attachment, Field, Ledger, LedgerRow, Role};
use crate::store::{BlobStore, RowStore};

pub struct LedgerWorkspace<'a, S: RowStore, B: BlobStore> {
    year: String,
    role: Role,
    rows: Vec<LedgerRow>,
    row_store: &'a S,
    blob_store: &'a B,
}

impl<'a, S: RowStore, B: BlobStore> LedgerWorkspace<'a, S, B> {
    /// Opens the year's row set; a missing document reads as an empty list.
    pub fn open(row_store: &'a S, blob_store: &'a B, year: &str, role: Role) -> Result<Self> {
        let rows = row_store.load(year)?.unwrap_or_default();
        info!("opened ledger {year} with {} rows", rows.len());
        Ok(Self {
            year: year.to_string(),
            role,
            rows,
            row_store,
            blob_store,
        })
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    /// Current snapshot as a [`Ledger`], ready for the aggregators.
    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.year.clone(), self.rows.clone())
    }

    /// Replaces the whole snapshot, as the live subscription does when the
    /// backing document changes.
    pub fn apply_snapshot(&mut self, rows: Vec<LedgerRow>) {
        self.rows = rows;
    }

    /// Edits one field. Denied edits (read-only role, wrong row for the
    /// field) are silent no-ops, guarded before any state change; an
    /// out-of-range index is a surfaced error.
    pub fn set_field(&mut self, index: usize, field: Field, value: &str) -> Result<()> {
        if index >= self.rows.len() {
            return Err(LedgerError::RowOutOfBounds(index));
        }
        if !can_edit_field(index, self.role, field) {
            debug!("edit of {field:?} on row {index} denied; ignoring");
            return Ok(());
        }
        self.rows[index].set(field, value);
        self.persist()
    }

    /// Appends a blank row at the end.
    pub fn add_row(&mut self) -> Result<()> {
        if !self.editor_guard("add_row") {
            return Ok(());
        }
        self.rows.push(LedgerRow::blank());
        self.persist()
    }

    /// Blanks every text field of an entry row. Attachments keep their own
    /// lifecycle and are not touched.
    pub fn clear_row(&mut self, index: usize) -> Result<()> {
        if !self.editor_guard("clear_row") {
            return Ok(());
        }
        self.entry_row_mut(index)?.clear_text_fields();
        self.persist()
    }

    /// Deletes an entry row, cascading its attachments out of blob storage
    /// first. A blob that fails to delete is logged and left orphaned; the
    /// row is removed regardless.
    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        if !self.editor_guard("delete_row") {
            return Ok(());
        }
        self.check_entry_row(index)?;
        for attachment in &self.rows[index].attachments {
            if let Err(err) = self.blob_store.delete(&attachment.path) {
                warn!("orphaning blob {}: {err}", attachment.path);
            }
        }
        self.rows.remove(index);
        self.persist()
    }

    /// Swaps an entry row with its upper neighbor. Moves that would push a
    /// row into the pinned header/metadata positions are silent no-ops.
    pub fn move_row_up(&mut self, index: usize) -> Result<()> {
        if !self.editor_guard("move_row_up") {
            return Ok(());
        }
        if index <= FIRST_ENTRY_INDEX || index >= self.rows.len() {
            return Ok(());
        }
        self.rows.swap(index, index - 1);
        self.persist()
    }

    /// Swaps an entry row with its lower neighbor.
    pub fn move_row_down(&mut self, index: usize) -> Result<()> {
        if !self.editor_guard("move_row_down") {
            return Ok(());
        }
        if index < FIRST_ENTRY_INDEX || index + 1 >= self.rows.len() {
            return Ok(());
        }
        self.rows.swap(index, index + 1);
        self.persist()
    }

    /// Uploads a file and attaches it to an entry row. Validation (type,
    /// size, per-row cap) runs before the blob store is called; a rejected
    /// upload leaves the row's attachment list unchanged.
    pub fn upload_attachment(
        &mut self,
        index: usize,
        filename: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<()> {
        if !self.editor_guard("upload_attachment") {
            return Ok(());
        }
        self.check_entry_row(index)?;
        validate_upload(
            &self.rows[index],
            index,
            filename,
            mime_type,
            bytes.len() as u64,
        )?;

        let uploaded_at = Utc::now();
        let path = attachment_path(&self.year, index, uploaded_at.timestamp_millis(), filename);
        let url = self.blob_store.put(&path, bytes, mime_type)?;

        self.rows[index].attachments.push(Attachment {
            name: filename.to_string(),
            mime_type: mime_type.to_string(),
            path,
            url,
            size: bytes.len() as u64,
            uploaded_at,
            visible: true,
        });
        self.persist()
    }

    /// Removes an attachment. Blob removal and metadata removal are two
    /// independent steps: if the blob delete fails the metadata is removed
    /// anyway, since an orphaned blob beats an unremovable row entry.
    pub fn delete_attachment(&mut self, index: usize, attachment_index: usize) -> Result<()> {
        if !self.editor_guard("delete_attachment") {
            return Ok(());
        }
        let row = self.entry_row_mut(index)?;
        if attachment_index >= row.attachments.len() {
            return Err(LedgerError::AttachmentOutOfBounds(attachment_index));
        }
        let attachment = row.attachments.remove(attachment_index);
        if let Err(err) = self.blob_store.delete(&attachment.path) {
            warn!("orphaning blob {}: {err}", attachment.path);
        }
        self.persist()
    }

    pub fn set_attachment_visibility(
        &mut self,
        index: usize,
        attachment_index: usize,
        visible: bool,
    ) -> Result<()> {
        if !self.editor_guard("set_attachment_visibility") {
            return Ok(());
        }
        let row = self.entry_row_mut(index)?;
        let attachment = row
            .attachments
            .get_mut(attachment_index)
            .ok_or(LedgerError::AttachmentOutOfBounds(attachment_index))?;
        attachment.visible = visible;
        self.persist()
    }

    fn editor_guard(&self, action: &str) -> bool {
        if self.role.can_edit() {
            true
        } else {
            debug!("{action} denied for read-only role; ignoring");
            false
        }
    }

    fn check_entry_row(&self, index: usize) -> Result<()> {
        if index >= self.rows.len() {
            return Err(LedgerError::RowOutOfBounds(index));
        }
        if classify(index) != RowKind::Entry {
            return Err(LedgerError::NotAnEntryRow(index));
        }
        Ok(())
    }

    fn entry_row_mut(&mut self, index: usize) -> Result<&mut LedgerRow> {
        self.check_entry_row(index)?;
        Ok(&mut self.rows[index])
    }

    /// Best-effort full-list write. On failure the in-memory snapshot stays
    /// ahead of the store; the caller reports the error to the user.
    fn persist(&self) -> Result<()> {
        self.row_store.replace(&self.year, &self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBlobStore, MemoryRowStore};

    fn seeded_store(n_entries: usize) -> MemoryRowStore {
        let store = MemoryRowStore::new();
        let mut rows = vec![LedgerRow::blank(), LedgerRow::blank()];
        rows[1].contract_ceiling = "10000".to_string();
        for i in 0..n_entries {
            let mut row = LedgerRow::blank();
            row.activity = format!("actividad {i}");
            row.expense = format!("{}", (i + 1) * 100);
            rows.push(row);
        }
        store.replace("2024", &rows).unwrap();
        store
    }

    #[test]
    fn test_set_field_persists_for_editor() {
        let store = seeded_store(2);
        let blobs = MemoryBlobStore::new();
        let mut ws = LedgerWorkspace::open(&store, &blobs, "2024", Role::Editor).unwrap();

        ws.set_field(2, Field::Expense, "$450.75").unwrap();
        assert_eq!(ws.rows()[2].expense, "$450.75");
        assert_eq!(store.load("2024").unwrap().unwrap()[2].expense, "$450.75");
    }

    #[test]
    fn test_set_field_is_silent_noop_when_denied() {
        let store = seeded_store(2);
        let blobs = MemoryBlobStore::new();

        let mut ws = LedgerWorkspace::open(&store, &blobs, "2024", Role::Lector).unwrap();
        ws.set_field(2, Field::Expense, "999").unwrap();
        assert_eq!(ws.rows()[2].expense, "100");

        // Editor trying the ceiling on an entry row: also a no-op.
        let mut ws = LedgerWorkspace::open(&store, &blobs, "2024", Role::Editor).unwrap();
        ws.set_field(2, Field::ContractCeiling, "123").unwrap();
        assert_eq!(ws.rows()[2].contract_ceiling, "");

        // Out of range is a surfaced error, not a no-op.
        assert!(matches!(
            ws.set_field(99, Field::Expense, "1"),
            Err(LedgerError::RowOutOfBounds(99))
        ));
    }

    #[test]
    fn test_reorder_round_trip_restores_order() {
        let store = seeded_store(5); // entries at indices 2..=6
        let blobs = MemoryBlobStore::new();
        let mut ws = LedgerWorkspace::open(&store, &blobs, "2024", Role::Editor).unwrap();
        let original: Vec<String> = ws.rows().iter().map(|r| r.activity.clone()).collect();

        ws.move_row_up(5).unwrap();
        ws.move_row_up(4).unwrap();
        ws.move_row_down(3).unwrap();
        ws.move_row_down(4).unwrap();

        let after: Vec<String> = ws.rows().iter().map(|r| r.activity.clone()).collect();
        assert_eq!(original, after);
    }

    #[test]
    fn test_reorder_never_crosses_pinned_rows() {
        let store = seeded_store(2);
        let blobs = MemoryBlobStore::new();
        let mut ws = LedgerWorkspace::open(&store, &blobs, "2024", Role::Editor).unwrap();
        let first_entry = ws.rows()[2].activity.clone();

        // First entry row cannot move into the metadata slot.
        ws.move_row_up(2).unwrap();
        assert_eq!(ws.rows()[2].activity, first_entry);

        // Metadata/header rows cannot be moved down into entry space.
        ws.move_row_down(1).unwrap();
        assert_eq!(ws.rows()[2].activity, first_entry);

        // Last row cannot move further down.
        ws.move_row_down(3).unwrap();
        assert_eq!(ws.rows().len(), 4);
    }

    #[test]
    fn test_clear_row_blanks_text_but_not_header_rows() {
        let store = seeded_store(1);
        let blobs = MemoryBlobStore::new();
        let mut ws = LedgerWorkspace::open(&store, &blobs, "2024", Role::Editor).unwrap();

        ws.clear_row(2).unwrap();
        assert_eq!(ws.rows()[2].activity, "");
        assert_eq!(ws.rows()[2].expense, "");

        assert!(matches!(
            ws.clear_row(1),
            Err(LedgerError::NotAnEntryRow(1))
        ));
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        struct FailingStore(MemoryRowStore);
        impl RowStore for FailingStore {
            fn load(&self, year: &str) -> Result<Option<Vec<LedgerRow>>> {
                self.0.load(year)
            }
            fn replace(&self, _: &str, _: &[LedgerRow]) -> Result<()> {
                Err(LedgerError::Storage("write refused".to_string()))
            }
            fn list_years(&self) -> Result<Vec<String>> {
                self.0.list_years()
            }
            fn create_year(&self, year: &str) -> Result<()> {
                self.0.create_year(year)
            }
        }

        let store = FailingStore(seeded_store(1));
        let blobs = MemoryBlobStore::new();
        let mut ws = LedgerWorkspace::open(&store, &blobs, "2024", Role::Editor).unwrap();

        let result = ws.set_field(2, Field::Expense, "777");
        assert!(matches!(result, Err(LedgerError::Storage(_))));
        // Optimistic update stands even though the write failed.
        assert_eq!(ws.rows()[2].expense, "777");
    }
}
