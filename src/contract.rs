//! Cumulative spend against the contract ceiling ("OS" amount).

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Ledger, PAID_STATUS};
use crate::normalize::{parse_currency, parse_dates};

/// Contract-level financial position as of a given date. Derived, recomputed
/// on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContractState {
    /// Authorized maximum spend. `None` when the metadata row's ceiling field
    /// fails to parse or is not positive.
    pub ceiling: Option<f64>,

    /// Sum of expenses whose date field holds at least one date on or before
    /// the reference date. A row counts in full when any of its dates
    /// qualifies; it is never pro-rated.
    pub spent_to_date: f64,

    /// `max(ceiling - spent_to_date, 0)`. Clamped: overspend is not surfaced
    /// as a negative balance. `None` when the ceiling is unavailable.
    pub remaining_balance: Option<f64>,

    /// Sum of expenses on rows marked exactly "Pagado".
    pub paid_to_date: f64,

    /// `max(spent_to_date - paid_to_date, 0)`.
    pub pending_payment: f64,
}

/// Parses the ceiling from the contract-metadata row. A value that fails to
/// parse or is <= 0 is treated as absent, not as an error: every dependent
/// figure becomes unavailable rather than zero.
pub fn contract_ceiling(ledger: &Ledger) -> Option<f64> {
    let raw = ledger
        .contract_meta()
        .map(|row| row.contract_ceiling.as_str())
        .unwrap_or("");
    parse_currency(raw).filter(|v| *v > 0.0)
}

/// Total spend over entry rows with at least one date token on or before
/// `today`. Rows with an empty date or expense field, or an unparseable
/// expense, are skipped.
pub fn spent_to_date(ledger: &Ledger, today: NaiveDate) -> f64 {
    let mut total = 0.0;
    for (_, row) in ledger.entries() {
        if row.date_spec.is_empty() || row.expense.is_empty() {
            continue;
        }
        let Some(amount) = parse_currency(&row.expense) else {
            continue;
        };
        if parse_dates(&row.date_spec).iter().any(|d| *d <= today) {
            total += amount;
        }
    }
    total
}

/// Total spend over entry rows whose administrative status equals "Pagado"
/// exactly. Case-sensitive: "pagado" does not count.
pub fn paid_to_date(ledger: &Ledger) -> f64 {
    let mut total = 0.0;
    for (_, row) in ledger.entries() {
        if row.administrative_status != PAID_STATUS {
            continue;
        }
        if let Some(amount) = parse_currency(&row.expense) {
            total += amount;
        }
    }
    total
}

/// Computes the full contract position as of `today`. Pure function of the
/// ledger snapshot and the reference date.
pub fn contract_state(ledger: &Ledger, today: NaiveDate) -> ContractState {
    let ceiling = contract_ceiling(ledger);
    let spent = spent_to_date(ledger, today);
    let paid = paid_to_date(ledger);

    ContractState {
        ceiling,
        spent_to_date: spent,
        remaining_balance: ceiling.map(|c| (c - spent).max(0.0)),
        paid_to_date: paid,
        pending_payment: (spent - paid).max(0.0),
    }
}
