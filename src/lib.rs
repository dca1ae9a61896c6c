//! # Contract Ledger
//!
//! Aggregation engine for a contract/expense ledger dashboard: an ordered row
//! set per year, where row 0 holds column labels, row 1 holds the contract
//! ceiling ("OS" amount), and every later row is a real expense entry typed
//! in by a human.
//!
//! ## Core Concepts
//!
//! - **Everything is text**: amounts and dates are stored exactly as typed
//!   and recovered by parsing; rows that fail to parse are skipped per
//!   computation, never dropped from the ledger or counted as zero.
//! - **Derived aggregates**: monthly summaries, contract state and
//!   year-vs-year comparisons are pure functions of a ledger snapshot plus a
//!   reference date. They never mutate anything and carry no hidden caches.
//! - **Trait seams**: the document database, blob storage, and spreadsheet or
//!   PDF renderers sit behind [`store::RowStore`], [`store::BlobStore`] and
//!   [`export::TableRenderer`]; in-memory stores back the tests.
//!
//! ## Example
//!
//! ```rust
//! use contract_ledger::{monthly_summary, Ledger, LedgerRow, Month};
//! use chrono::NaiveDate;
//!
//! let mut rows = vec![LedgerRow::blank(), LedgerRow::blank()];
//! rows[1].contract_ceiling = "10000".to_string();
//!
//! let mut entry = LedgerRow::blank();
//! entry.activity = "Taller de seguridad".to_string();
//! entry.date_spec = "5/3/2024, 12/3/2024".to_string();
//! entry.expense = "$850.00".to_string();
//! rows.push(entry);
//!
//! let ledger = Ledger::new("2024", rows);
//! let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let summary = monthly_summary(&ledger, Month::Marzo, today);
//!
//! assert_eq!(summary.total, 850.0);
//! assert_eq!(summary.daily_series[0].day_label, "Día 5 y 12");
//! ```

pub mod attachments;
pub mod classify;
pub mod comparison;
pub mod contract;
pub mod error;
pub mod export;
pub mod model;
pub mod monthly;
pub mod normalize;
pub mod session;
pub mod store;
pub mod workspace;

pub use attachments::{
    attachment_path, sanitize_filename, validate_upload, MAX_ATTACHMENTS_PER_ROW,
    MAX_ATTACHMENT_BYTES,
};
pub use classify::{can_edit_field, classify, RowKind};
pub use comparison::{
    compare_years, load_comparison, BudgetOutcome, ContractDelta, YearComparison, YearFigures,
};
pub use contract::{contract_ceiling, contract_state, paid_to_date, spent_to_date, ContractState};
pub use error::{LedgerError, Result};
pub use export::{general_table, monthly_sheet, ColumnSpec, TableExport, TableRenderer};
pub use model::{Attachment, Field, Ledger, LedgerRow, Month, Role, PAID_STATUS};
pub use monthly::{monthly_summary, DayAmount, MonthlySummary, SummaryDetail};
pub use normalize::{parse_currency, parse_dates};
pub use session::{Session, View};
pub use store::{create_year, BlobStore, MemoryBlobStore, MemoryRowStore, RowStore, YearPolicy};
pub use workspace::LedgerWorkspace;

use chrono::NaiveDate;
use log::debug;

/// Convenience entry point for callers that hold the month as the name the
/// selector passes around. Unknown names yield `None`.
pub fn summarize_month_by_name(
    ledger: &Ledger,
    month_name: &str,
    today: NaiveDate,
) -> Option<MonthlySummary> {
    let month = Month::from_name(month_name)?;
    debug!(
        "summarizing {} for year {} ({} rows)",
        month.name(),
        ledger.year,
        ledger.rows.len()
    );
    Some(monthly_summary(ledger, month, today))
}
