//! Trait seams for the backing document database and blob storage.
//!
//! The dashboard never performs partial updates server-side: every mutation
//! re-sends the full row list for the year, and the store replaces the
//! document atomically. In-memory implementations are provided for tests and
//! for embedding the engine without a remote backend.

use std::collections::HashMap;
use std::sync::Mutex;

use log::info;

use crate::error::{LedgerError, Result};
use crate::model::LedgerRow;

/// Row-set store keyed by year string.
pub trait RowStore: Send + Sync {
    /// Reads the full row list for a year. `None` when the year has no
    /// document at all (distinct from an existing empty list).
    fn load(&self, year: &str) -> Result<Option<Vec<LedgerRow>>>;

    /// Atomically replaces the year's entire row list.
    fn replace(&self, year: &str, rows: &[LedgerRow]) -> Result<()>;

    fn list_years(&self) -> Result<Vec<String>>;

    /// Creates a year with an empty row list. Existence checks belong to the
    /// caller (see [`create_year`]).
    fn create_year(&self, year: &str) -> Result<()>;
}

/// Blob storage for row attachments.
pub trait BlobStore: Send + Sync {
    /// Stores the bytes under `path` and returns a retrievable URL.
    fn put(&self, path: &str, bytes: &[u8], mime_type: &str) -> Result<String>;

    fn delete(&self, path: &str) -> Result<()>;
}

/// Bounds on which ledger years may be created.
#[derive(Debug, Clone, Copy)]
pub struct YearPolicy {
    pub min: i32,
    pub max: i32,
}

impl Default for YearPolicy {
    fn default() -> Self {
        Self {
            min: 2024,
            max: 2030,
        }
    }
}

impl YearPolicy {
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// Validates and creates a new ledger year. The key must be numeric, inside
/// the policy range, and not already present; each failure is surfaced as a
/// blocking error with no partial action taken.
pub fn create_year(store: &impl RowStore, policy: YearPolicy, year: &str) -> Result<()> {
    let parsed: i32 = year
        .trim()
        .parse()
        .map_err(|_| LedgerError::InvalidYearKey(year.to_string()))?;

    if !policy.contains(parsed) {
        return Err(LedgerError::YearOutOfRange {
            year: parsed,
            min: policy.min,
            max: policy.max,
        });
    }
    if store.list_years()?.iter().any(|y| y == year) {
        return Err(LedgerError::YearAlreadyExists(year.to_string()));
    }

    info!("creating ledger year {year}");
    store.create_year(year)
}

/// In-memory row store.
#[derive(Default)]
pub struct MemoryRowStore {
    tables: Mutex<HashMap<String, Vec<LedgerRow>>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowStore for MemoryRowStore {
    fn load(&self, year: &str) -> Result<Option<Vec<LedgerRow>>> {
        let tables = self
            .tables
            .lock()
            .map_err(|_| LedgerError::Storage("row store lock poisoned".to_string()))?;
        Ok(tables.get(year).cloned())
    }

    fn replace(&self, year: &str, rows: &[LedgerRow]) -> Result<()> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| LedgerError::Storage("row store lock poisoned".to_string()))?;
        tables.insert(year.to_string(), rows.to_vec());
        Ok(())
    }

    fn list_years(&self) -> Result<Vec<String>> {
        let tables = self
            .tables
            .lock()
            .map_err(|_| LedgerError::Storage("row store lock poisoned".to_string()))?;
        let mut years: Vec<String> = tables.keys().cloned().collect();
        years.sort();
        Ok(years)
    }

    fn create_year(&self, year: &str) -> Result<()> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| LedgerError::Storage("row store lock poisoned".to_string()))?;
        tables.entry(year.to_string()).or_default();
        Ok(())
    }
}

/// In-memory blob store.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs
            .lock()
            .map(|blobs| blobs.contains_key(path))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, path: &str, bytes: &[u8], mime_type: &str) -> Result<String> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| LedgerError::Blob("blob store lock poisoned".to_string()))?;
        blobs.insert(path.to_string(), (bytes.to_vec(), mime_type.to_string()));
        Ok(format!("memory://{path}"))
    }

    fn delete(&self, path: &str) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| LedgerError::Blob("blob store lock poisoned".to_string()))?;
        blobs
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| LedgerError::Blob(format!("no blob at {path}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_row_store_round_trip() {
        let store = MemoryRowStore::new();
        assert_eq!(store.load("2024").unwrap(), None);

        let rows = vec![LedgerRow::blank(), LedgerRow::blank()];
        store.replace("2024", &rows).unwrap();
        assert_eq!(store.load("2024").unwrap().unwrap().len(), 2);
        assert_eq!(store.list_years().unwrap(), vec!["2024".to_string()]);
    }

    #[test]
    fn test_create_year_validates_before_touching_store() {
        let store = MemoryRowStore::new();
        let policy = YearPolicy::default();

        assert!(matches!(
            create_year(&store, policy, "veinte"),
            Err(LedgerError::InvalidYearKey(_))
        ));
        assert!(matches!(
            create_year(&store, policy, "2023"),
            Err(LedgerError::YearOutOfRange { .. })
        ));
        assert!(matches!(
            create_year(&store, policy, "2031"),
            Err(LedgerError::YearOutOfRange { .. })
        ));
        assert!(store.list_years().unwrap().is_empty());

        create_year(&store, policy, "2025").unwrap();
        assert!(matches!(
            create_year(&store, policy, "2025"),
            Err(LedgerError::YearAlreadyExists(_))
        ));
        assert_eq!(store.list_years().unwrap(), vec!["2025".to_string()]);
    }

    #[test]
    fn test_memory_blob_store_put_and_delete() {
        let blobs = MemoryBlobStore::new();
        let url = blobs
            .put("attachments/2024/2/1_factura.pdf", b"%PDF", "application/pdf")
            .unwrap();
        assert_eq!(url, "memory://attachments/2024/2/1_factura.pdf");
        assert!(blobs.contains("attachments/2024/2/1_factura.pdf"));

        blobs.delete("attachments/2024/2/1_factura.pdf").unwrap();
        assert!(blobs.is_empty());
        assert!(blobs.delete("attachments/2024/2/1_factura.pdf").is_err());
    }
}
